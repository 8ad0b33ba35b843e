//! Bisection search over an ordered revision range.
//!
//! The engine walks a 0-indexed revision list (index 0 = oldest, index n-1 =
//! newest) looking for the boundary index `b` at which a failure predicate
//! flips. For an introduction search the predicate is assumed to be a rising
//! step function: false for every index below `b`, true for every index at or
//! above it. A fix search assumes the mirrored falling step.
//!
//! # Algorithm
//!
//! An explicit loop over `(low, high)` bounds plus a tracked best-known
//! matching index, rather than recursive narrowing. Each step probes the
//! floor midpoint `(low + high) / 2`; on a two-element range this probes the
//! lower element first, which fixes which of two adjacent revisions is
//! reported when the flip sits exactly between them. The loop terminates when
//! `low > high`.
//!
//! # Cost
//!
//! The probe is the expensive part: each call checks out, builds and runs a
//! fuzz target, potentially minutes of wall clock. The search performs at
//! most [`max_probes`] calls (`ceil(log2 n) + 1`) and never probes the same
//! index twice.
//!
//! # Limits
//!
//! A predicate that flips more than once (flaky reproduction, reverted
//! ranges) is not detected. The search still terminates within its probe
//! budget and returns an answer consistent with *some* single flip, but that
//! answer carries no guarantee.

/// Terminal result of a bisection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisectionOutcome {
    /// The predicate flips at this index: the boundary revision.
    FoundAt(usize),
    /// The failure already held at the oldest supplied revision; the true
    /// boundary is older than the visible range.
    PresentAcrossRange,
    /// The failure matched at no probed revision.
    NeverReproduced,
}

/// Upper bound on the number of probe calls for a range of `len` revisions.
pub fn max_probes(len: usize) -> u64 {
    if len <= 1 {
        return 1;
    }
    let ceil_log2 = u64::from(usize::BITS - (len - 1).leading_zeros());
    ceil_log2 + 1
}

/// Finds the revision at which a failure was introduced.
///
/// `probe(i)` must report whether the failure reproduces at index `i`, and is
/// assumed to be a rising step function over `0..len`. Any error from the
/// probe aborts the search immediately; the engine has no recovery policy of
/// its own (skipping an unprobeable revision would break the monotonicity
/// assumption the search rests on).
///
/// A single-revision range is probed once and classified as either
/// [`BisectionOutcome::PresentAcrossRange`] or
/// [`BisectionOutcome::NeverReproduced`], never as a boundary.
pub fn locate_introduction<E>(
    len: usize,
    probe: impl FnMut(usize) -> Result<bool, E>,
) -> Result<BisectionOutcome, E> {
    Ok(match first_matching(len, probe)? {
        Some(0) => BisectionOutcome::PresentAcrossRange,
        Some(idx) => BisectionOutcome::FoundAt(idx),
        None => BisectionOutcome::NeverReproduced,
    })
}

/// Finds the revision at which a previously-present failure was fixed.
///
/// The mirror of [`locate_introduction`]: `probe` is assumed to be a falling
/// step function (failing at the old end, clean from the fix onward). Returns
/// the first clean index as the boundary; a range that is clean even at its
/// oldest revision maps to [`BisectionOutcome::NeverReproduced`], and a range
/// that still fails at its newest maps to
/// [`BisectionOutcome::PresentAcrossRange`].
pub fn locate_fix<E>(
    len: usize,
    mut probe: impl FnMut(usize) -> Result<bool, E>,
) -> Result<BisectionOutcome, E> {
    Ok(match first_matching(len, |idx| Ok(!probe(idx)?))? {
        Some(0) => BisectionOutcome::NeverReproduced,
        Some(idx) => BisectionOutcome::FoundAt(idx),
        None => BisectionOutcome::PresentAcrossRange,
    })
}

/// Returns the smallest index in `0..len` where `pred` holds, assuming `pred`
/// is a rising step function. `None` when it holds nowhere.
fn first_matching<E>(
    len: usize,
    mut pred: impl FnMut(usize) -> Result<bool, E>,
) -> Result<Option<usize>, E> {
    if len == 0 {
        return Ok(None);
    }
    let mut low = 0usize;
    let mut high = len - 1;
    let mut best = None;
    while low <= high {
        let mid = low + (high - low) / 2;
        if pred(mid)? {
            best = Some(mid);
            if mid == 0 {
                // Smallest possible index already matched.
                break;
            }
            high = mid - 1;
        } else {
            low = mid + 1;
        }
    }
    Ok(best)
}
