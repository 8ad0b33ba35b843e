#![no_main]

use libfuzzer_sys::fuzz_target;
use revision_bisect::{locate_introduction, max_probes};
use std::collections::HashSet;

// The presence table is arbitrary here, so the monotonicity assumption can be
// violated freely: the search must still terminate inside its probe budget,
// stay inside the range, never re-probe an index, and return some outcome.
fuzz_target!(|table: Vec<bool>| {
    if table.is_empty() || table.len() > 100_000 {
        return;
    }
    let len = table.len();

    let mut probes = 0u64;
    let mut seen = HashSet::new();
    let outcome = locate_introduction(len, |idx| {
        probes += 1;
        assert!(idx < len, "probe index {} outside range of {}", idx, len);
        assert!(seen.insert(idx), "index {} probed twice", idx);
        Ok::<_, ()>(table[idx])
    });

    assert!(outcome.is_ok());
    assert!(
        probes <= max_probes(len),
        "{} probes for len {} exceeds budget {}",
        probes,
        len,
        max_probes(len)
    );
});
