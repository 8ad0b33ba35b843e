pub mod engine;
pub mod error;
pub mod oracle;
pub mod probe;
pub mod revisions;

pub use engine::{locate_fix, locate_introduction, max_probes, BisectionOutcome};
pub use error::{BuildError, CheckoutError, ExecutionError, ProbeError, RangeError};
pub use oracle::{
    Baseline, BuildArtifact, BuildConfig, BuildOracle, ReproductionOracle, Signal,
};
pub use probe::ProbeAdapter;
pub use revisions::{RevisionList, RevisionSource};
