#![no_main]

use libfuzzer_sys::fuzz_target;
use revision_bisect::{locate_introduction, max_probes, BisectionOutcome};

fuzz_target!(|input: (u16, u16)| {
    let (raw_len, raw_boundary) = input;
    let len = (raw_len as usize % 4096) + 1;
    let boundary = raw_boundary as usize % (len + 1);

    let mut probes = 0u64;
    let outcome = locate_introduction(len, |idx| {
        probes += 1;
        assert!(idx < len, "probe index {} outside range of {}", idx, len);
        Ok::<_, ()>(idx >= boundary)
    })
    .unwrap();

    assert!(
        probes <= max_probes(len),
        "{} probes for len {} exceeds budget {}",
        probes,
        len,
        max_probes(len)
    );

    // A single-flip predicate must resolve to exactly the flip index.
    let expected = if boundary == 0 {
        BisectionOutcome::PresentAcrossRange
    } else if boundary == len {
        BisectionOutcome::NeverReproduced
    } else {
        BisectionOutcome::FoundAt(boundary)
    };
    assert_eq!(outcome, expected);
});
