#![no_main]

use libfuzzer_sys::fuzz_target;
use revision_bisect::{locate_fix, max_probes, BisectionOutcome};

fuzz_target!(|input: (u16, u16)| {
    let (raw_len, raw_boundary) = input;
    let len = (raw_len as usize % 4096) + 1;
    let boundary = raw_boundary as usize % (len + 1);

    // Falling step: failing strictly below `boundary`, clean from it onward.
    let mut probes = 0u64;
    let outcome = locate_fix(len, |idx| {
        probes += 1;
        assert!(idx < len, "probe index {} outside range of {}", idx, len);
        Ok::<_, ()>(idx < boundary)
    })
    .unwrap();

    assert!(
        probes <= max_probes(len),
        "{} probes for len {} exceeds budget {}",
        probes,
        len,
        max_probes(len)
    );

    let expected = if boundary == 0 {
        BisectionOutcome::NeverReproduced
    } else if boundary == len {
        BisectionOutcome::PresentAcrossRange
    } else {
        BisectionOutcome::FoundAt(boundary)
    };
    assert_eq!(outcome, expected);
});
