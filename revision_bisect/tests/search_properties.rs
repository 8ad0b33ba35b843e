use proptest::prelude::*;

use revision_bisect::{locate_fix, locate_introduction, max_probes, BisectionOutcome};

fn expected_introduction(len: usize, boundary: usize) -> BisectionOutcome {
    if boundary == 0 {
        BisectionOutcome::PresentAcrossRange
    } else if boundary >= len {
        BisectionOutcome::NeverReproduced
    } else {
        BisectionOutcome::FoundAt(boundary)
    }
}

proptest! {
    /// For any range length and any single-flip probe, the engine returns
    /// exactly the flip index (or the matching degenerate outcome).
    #[test]
    fn single_flip_contract(len in 1usize..1024, raw in 0usize..2048) {
        let boundary = raw % (len + 1);
        let outcome = locate_introduction(len, |idx| Ok::<_, ()>(idx >= boundary)).unwrap();
        prop_assert_eq!(outcome, expected_introduction(len, boundary));
    }

    /// Probe invocations stay within ceil(log2 n) + 1 for monotonic input.
    #[test]
    fn probe_budget_holds(len in 1usize..4096, raw in 0usize..8192) {
        let boundary = raw % (len + 1);
        let mut probes = 0u64;
        locate_introduction(len, |idx| {
            probes += 1;
            Ok::<_, ()>(idx >= boundary)
        })
        .unwrap();
        prop_assert!(probes <= max_probes(len));
    }

    /// A probe that violates the monotonicity assumption still terminates
    /// within the budget and yields some outcome; it must never diverge or
    /// probe outside the range.
    #[test]
    fn multi_flip_terminates(table in proptest::collection::vec(any::<bool>(), 1..512)) {
        let len = table.len();
        let mut probes = 0u64;
        let outcome = locate_introduction(len, |idx| {
            probes += 1;
            prop_assert!(idx < len);
            Ok(table[idx])
        });
        prop_assert!(outcome.is_ok());
        prop_assert!(probes <= max_probes(len));
    }

    /// Re-running the search over a constant-in-time probe yields the
    /// identical outcome.
    #[test]
    fn rerun_is_idempotent(table in proptest::collection::vec(any::<bool>(), 1..256)) {
        let run = || locate_introduction(table.len(), |idx| Ok::<_, ()>(table[idx])).unwrap();
        prop_assert_eq!(run(), run());
    }

    /// The fix search mirrors the introduction search over a falling step.
    #[test]
    fn fix_search_mirror(len in 1usize..1024, raw in 0usize..2048) {
        let boundary = raw % (len + 1);
        // Failing strictly below `boundary`, clean from it onward.
        let outcome = locate_fix(len, |idx| Ok::<_, ()>(idx < boundary)).unwrap();
        let expected = if boundary == 0 {
            BisectionOutcome::NeverReproduced
        } else if boundary >= len {
            BisectionOutcome::PresentAcrossRange
        } else {
            BisectionOutcome::FoundAt(boundary)
        };
        prop_assert_eq!(outcome, expected);
    }

    /// The fix search obeys the same probe budget.
    #[test]
    fn fix_probe_budget_holds(len in 1usize..4096, raw in 0usize..8192) {
        let boundary = raw % (len + 1);
        let mut probes = 0u64;
        locate_fix(len, |idx| {
            probes += 1;
            Ok::<_, ()>(idx < boundary)
        })
        .unwrap();
        prop_assert!(probes <= max_probes(len));
    }
}
