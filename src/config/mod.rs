pub mod cluster;
pub mod load_balancer;
pub mod request;
pub mod secrets;

pub use cluster::{ClusterSettings, KubeconfigMethod, MasterType, NodeRecord, NodeRole, PortScope};
pub use load_balancer::{
    Exposure, LbState, LoadBalancerCommonConfig, LoadBalancerInput, LoadBalancerInstance,
};
pub use request::{parse_request, CompileRequest, RequestError, RequestFormat};
pub use secrets::{
    referenced_variables, resolve_credentials, resolve_from_environment, CredentialError,
};

use std::path::Path;

use thiserror::Error;
use tracing::debug;

/// Errors for file I/O operations (separate from pure parsing errors)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Request error: {0}")]
    RequestError(#[from] RequestError),

    #[error("Credential error: {0}")]
    CredentialError(#[from] CredentialError),
}

// ============================================================================
// SBIO: I/O wrapper - thin layer over pure functions
// ============================================================================

/// Load a request file from disk and resolve its credential references
/// against the process environment.
pub fn load_request_file(path: &Path) -> Result<CompileRequest, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let request = parse_request(&content, RequestFormat::from_path(path))?;
    let variables = referenced_variables(&request);
    if !variables.is_empty() {
        debug!(?variables, "resolving credential references");
    }
    let request = resolve_from_environment(&request)?;
    Ok(request)
}
