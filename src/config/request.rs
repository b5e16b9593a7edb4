use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cluster::{ClusterSettings, NodeRecord};
use super::load_balancer::LoadBalancerInput;

/// Errors that can occur while parsing a request document
#[derive(Error, Debug, PartialEq)]
pub enum RequestError {
    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("YAML parse error: {0}")]
    Yaml(String),
}

/// Everything one compilation needs
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompileRequest {
    pub settings: ClusterSettings,

    #[serde(default)]
    pub nodes: Vec<NodeRecord>,

    #[serde(default)]
    pub load_balancer: LoadBalancerInput,
}

/// On-disk encoding of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    Yaml,
}

impl RequestFormat {
    /// Pick the format from the file extension. Anything that is not
    /// `.yaml`/`.yml` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => RequestFormat::Yaml,
            _ => RequestFormat::Json,
        }
    }
}

// ============================================================================
// SBIO: Pure parsing functions (no I/O)
// ============================================================================

/// Parse a request document.
/// This is a pure function - no I/O.
pub fn parse_request(content: &str, format: RequestFormat) -> Result<CompileRequest, RequestError> {
    match format {
        RequestFormat::Json => {
            serde_json::from_str(content).map_err(|e| RequestError::Json(e.to_string()))
        }
        RequestFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| RequestError::Yaml(e.to_string()))
        }
    }
}

impl CompileRequest {
    /// All master nodes, in input order
    pub fn masters(&self) -> Vec<&NodeRecord> {
        self.nodes.iter().filter(|n| n.is_master()).collect()
    }

    /// All worker nodes, in input order
    pub fn workers(&self) -> Vec<&NodeRecord> {
        self.nodes.iter().filter(|n| n.is_worker()).collect()
    }

    pub fn has_load_balancer(&self) -> bool {
        !self.load_balancer.instances.is_empty()
    }
}
