use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compiler::VersionMatrix;

/// Default output directory for bundles, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Default config file location: ~/.clusterforge/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".clusterforge")
        .join("config.yaml")
}

/// Errors that can occur while reading or writing the tool config
#[derive(Error, Debug)]
pub enum ToolConfigError {
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Failed to write config: {0}")]
    WriteError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The tool config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolConfig {
    /// Extra or overriding Kubernetes -> runtime version pairs
    #[serde(default)]
    pub compatibility: VersionMatrix,

    /// Use only `compatibility`, ignoring the built-in table
    #[serde(default)]
    pub replace_builtin: bool,

    /// Where `compile` writes bundles unless `--output` is given
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            compatibility: VersionMatrix::new(),
            replace_builtin: false,
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl ToolConfig {
    /// The compatibility table compilations should use
    pub fn version_matrix(&self) -> VersionMatrix {
        if self.replace_builtin {
            self.compatibility.clone()
        } else {
            VersionMatrix::builtin().merged_with(&self.compatibility)
        }
    }
}

// ============================================================================
// SBIO: Pure business logic (no I/O)
// ============================================================================

/// Parse config from YAML string
pub fn parse_config(content: &str) -> Result<ToolConfig, ToolConfigError> {
    serde_yaml::from_str(content).map_err(|e| ToolConfigError::ParseError(e.to_string()))
}

/// Serialize config to YAML string
pub fn serialize_config(config: &ToolConfig) -> Result<String, ToolConfigError> {
    serde_yaml::to_string(config).map_err(|e| ToolConfigError::WriteError(e.to_string()))
}

// ============================================================================
// I/O boundary functions
// ============================================================================

/// Load config from a specific path. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<ToolConfig, ToolConfigError> {
    if !path.exists() {
        return Ok(ToolConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Save config to a specific path
pub fn save_config_to(config: &ToolConfig, path: &Path) -> Result<(), ToolConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serialize_config(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
