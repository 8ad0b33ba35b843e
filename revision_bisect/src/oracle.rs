use std::fmt;
use std::path::Path;

use crate::error::{BuildError, ExecutionError};

/// Build configuration forwarded opaquely to the build oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub engine: String,
    pub sanitizer: String,
    pub architecture: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            engine: "libfuzzer".to_string(),
            sanitizer: "address".to_string(),
            architecture: "x86_64".to_string(),
        }
    }
}

/// Handle to a fuzz target built at one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub project: String,
    pub fuzzer: String,
    pub revision: String,
}

/// Observed outcome of one reproduction run.
///
/// A crash is a normal value here, not an error: the code preserves the
/// crash classification (exit code, or 128+signo for signal-killed targets)
/// so that two different crashes remain distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Clean,
    Crashed { code: i32 },
}

impl Signal {
    pub fn is_crash(self) -> bool {
        matches!(self, Signal::Crashed { .. })
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Clean => write!(f, "no crash"),
            Signal::Crashed { code } => write!(f, "crashed with code {}", code),
        }
    }
}

/// The signal captured once at the reference revision. Every probe compares
/// its observed signal against this value, not against a bare
/// crashed/not-crashed boolean.
pub type Baseline = Signal;

/// Produces a runnable fuzz target for a pinned revision.
pub trait BuildOracle {
    fn build(&mut self, revision: &str, config: &BuildConfig) -> Result<BuildArtifact, BuildError>;
}

/// Runs a fuzz target against a fixed input and reports how it exited.
///
/// Timeouts are this oracle's responsibility: a hung execution must give up
/// on its own and report [`Signal::Clean`] ("no crash within budget").
pub trait ReproductionOracle {
    fn run(&mut self, artifact: &BuildArtifact, testcase: &Path) -> Result<Signal, ExecutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuildConfig::default();
        assert_eq!(config.engine, "libfuzzer");
        assert_eq!(config.sanitizer, "address");
        assert_eq!(config.architecture, "x86_64");
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(Signal::Clean.to_string(), "no crash");
        assert_eq!(Signal::Crashed { code: 77 }.to_string(), "crashed with code 77");
    }

    #[test]
    fn test_distinct_crashes_differ() {
        assert_ne!(Signal::Crashed { code: 77 }, Signal::Crashed { code: 66 });
        assert!(Signal::Crashed { code: 1 }.is_crash());
        assert!(!Signal::Clean.is_crash());
    }
}
