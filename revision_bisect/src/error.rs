use thiserror::Error;

/// Endpoint or range resolution failure. Reported before any probing starts
/// and never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("revision `{id}` does not exist in history")]
    UnknownRevision { id: String },

    #[error("`{old}` is not an ancestor of `{new}`")]
    NotAncestor { old: String, new: String },

    #[error("failed to enumerate revisions: {reason}")]
    Enumeration { reason: String },
}

/// Failure to pin the shared working copy to a revision.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to check out revision `{revision}`: {reason}")]
pub struct CheckoutError {
    pub revision: String,
    pub reason: String,
}

/// A revision that does not build under the requested configuration.
///
/// Fatal to the run: silently skipping an unbuildable revision would break
/// the monotonicity assumption the search depends on, so the offending
/// revision is surfaced for a human to investigate separately.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("build failed at revision `{revision}`: {reason}")]
pub struct BuildError {
    pub revision: String,
    pub reason: String,
}

/// Infrastructure failure while running a built fuzz target (artifact
/// missing, sandbox unavailable). A crash of the target itself is a
/// [`Signal`](crate::Signal) value, never this error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ExecutionError {
    pub reason: String,
}

/// Any collaborator failure observed while probing one revision.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("reproduction failed at revision `{revision}`: {source}")]
    Execution {
        revision: String,
        source: ExecutionError,
    },
}

impl ProbeError {
    /// The revision the probe was examining when the collaborator failed.
    pub fn revision(&self) -> &str {
        match self {
            ProbeError::Checkout(e) => &e.revision,
            ProbeError::Build(e) => &e.revision,
            ProbeError::Execution { revision, .. } => revision,
        }
    }
}
