use thiserror::Error;

/// Operator-facing validation failures. Messages are shown verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please provide at least one master and one worker node.")]
    InsufficientTopology,

    #[error("Please provide a password for the HAProxy configuration.")]
    MissingCredential,

    #[error("Please provide a vip for the HAProxy configuration.")]
    MissingVip,

    #[error("Please provide a domain name for the HAProxy configuration.")]
    MissingDomain,

    #[error(
        "the k8s version selected '{0}' is not compatible with the actual versions of CRI \
         supported on this release. Choose a supported k8s version!"
    )]
    UnsupportedVersionCombination(String),
}

/// Anything that stops a compilation
#[derive(Error, Debug, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to render document for node '{0}': {1}")]
    Render(String, String),

    #[error("Failed to serialize manifest: {0}")]
    Manifest(String),
}

impl CompileError {
    /// The validation failure behind this error, if any
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            CompileError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
