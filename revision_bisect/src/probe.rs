use std::path::PathBuf;

use crate::error::ProbeError;
use crate::oracle::{Baseline, BuildConfig, BuildOracle, ReproductionOracle, Signal};
use crate::revisions::{RevisionList, RevisionSource};

/// Turns `(revision, build config, testcase)` into a single comparison
/// against the baseline signal.
///
/// One probe is `checkout -> build -> run -> compare`, executed strictly
/// sequentially over the shared working copy. The adapter never caches
/// results: a correct search never asks for the same index twice, and a
/// repeated observation (the baseline endpoint) is deliberately re-run.
pub struct ProbeAdapter<S, B, R> {
    source: S,
    builder: B,
    runner: R,
    config: BuildConfig,
    testcase: PathBuf,
}

impl<S, B, R> ProbeAdapter<S, B, R>
where
    S: RevisionSource,
    B: BuildOracle,
    R: ReproductionOracle,
{
    pub fn new(source: S, builder: B, runner: R, config: BuildConfig, testcase: PathBuf) -> Self {
        ProbeAdapter {
            source,
            builder,
            runner,
            config,
            testcase,
        }
    }

    /// Checkout, build and run at one revision, yielding the raw signal.
    ///
    /// Used once before the search to capture the baseline at the reference
    /// endpoint, and by [`probe`](Self::probe) for every narrowing step.
    pub fn observe(
        &mut self,
        revisions: &RevisionList,
        index: usize,
    ) -> Result<Signal, ProbeError> {
        let revision = revisions
            .get(index)
            .expect("probe index inside revision list");
        self.source.checkout(revision)?;
        let artifact = self.builder.build(revision, &self.config)?;
        self.runner
            .run(&artifact, &self.testcase)
            .map_err(|source| ProbeError::Execution {
                revision: revision.to_string(),
                source,
            })
    }

    /// True when the signal observed at `index` matches the baseline.
    ///
    /// If the oracle reports rich signals, a crash with a different code than
    /// the baseline does not match; this keeps the originally-reported bug
    /// apart from an unrelated bug that also happens to crash.
    pub fn probe(
        &mut self,
        revisions: &RevisionList,
        index: usize,
        baseline: Baseline,
    ) -> Result<bool, ProbeError> {
        Ok(self.observe(revisions, index)? == baseline)
    }
}
