//! Command implementations for the CLI
//!
//! SBIO pattern: Commands return Results, I/O is handled by caller

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::compiler::{compile_cluster, CompileError, CompiledCluster};
use crate::config::{load_request_file, CompileRequest, ConfigError};
use crate::package::{
    check_bundle, DirectoryAssembler, PackageAssembler, PackageError, PackageReceipt,
};
use crate::toolconfig::{save_config_to, ToolConfig, ToolConfigError};

/// Errors that can occur during command execution
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    #[error("Tool config error: {0}")]
    ToolConfig(#[from] ToolConfigError),

    #[error("Version '{0}' is not in the config file")]
    UnknownVersion(String),
}

/// Result type for commands
pub type CommandResult<T> = Result<T, CommandError>;

// ============================================================================
// Compile Commands
// ============================================================================

/// Load a request file and compile it in memory
pub fn compile_file(path: &Path, config: &ToolConfig) -> CommandResult<CompiledCluster> {
    let request = load_request_file(path)?;
    info!(
        masters = request.masters().len(),
        workers = request.workers().len(),
        load_balancer = request.has_load_balancer(),
        "loaded request {}",
        path.display()
    );
    for missing in missing_key_paths(&request) {
        warn!("SSH key {} does not exist on this machine", missing);
    }
    let compiled = compile_cluster(&request, &config.version_matrix())?;
    Ok(compiled)
}

/// Hand a compiled bundle to the directory assembler
pub fn write_bundle(
    compiled: &CompiledCluster,
    output_dir: &Path,
) -> CommandResult<PackageReceipt> {
    let mut assembler = DirectoryAssembler::new(output_dir);
    let receipt = assembler.assemble(&compiled.bundle)?;
    Ok(receipt)
}

/// Output directory for `compile`: the flag wins over the config file
pub fn resolve_output_dir(flag: Option<&Path>, config: &ToolConfig) -> PathBuf {
    let dir = flag.unwrap_or(config.output_dir.as_path());
    PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned())
}

/// SSH key paths referenced by the request that are not present locally.
/// The generated documents keep the paths verbatim; this only feeds a warning.
pub fn missing_key_paths(request: &CompileRequest) -> Vec<String> {
    let node_keys = request.nodes.iter().map(|n| n.ssh_key_path.as_str());
    let lb_keys = request
        .load_balancer
        .instances
        .iter()
        .map(|i| i.ssh_key_path.as_str());

    let mut missing: Vec<String> = node_keys
        .chain(lb_keys)
        .filter(|p| !p.is_empty())
        .filter(|p| !Path::new(&*shellexpand::tilde(p)).exists())
        .map(String::from)
        .collect();
    missing.sort();
    missing.dedup();
    missing
}

// ============================================================================
// Validate Commands
// ============================================================================

/// Result of validating a request
#[derive(Debug)]
pub struct ValidationReport {
    pub valid: bool,
    pub cluster_name: Option<String>,
    pub nodes: usize,
    pub load_balancers: usize,
    pub error: Option<String>,
}

/// Compile a request and run the checks the assembler makes before writing
fn compile_and_check(path: &Path, config: &ToolConfig) -> CommandResult<CompiledCluster> {
    let compiled = compile_file(path, config)?;
    check_bundle(&compiled.bundle)?;
    Ok(compiled)
}

/// Validate a request file by compiling it without writing anything
pub fn validate_file(path: &Path, config: &ToolConfig) -> ValidationReport {
    match compile_and_check(path, config) {
        Ok(compiled) => ValidationReport {
            valid: true,
            cluster_name: Some(compiled.settings.cluster_name.clone()),
            nodes: compiled.node_documents.len(),
            load_balancers: compiled.load_balancer.haproxy_to_configure.len(),
            error: None,
        },
        Err(e) => {
            warn!("{} failed validation: {}", path.display(), e);
            ValidationReport {
                valid: false,
                cluster_name: None,
                nodes: 0,
                load_balancers: 0,
                error: Some(e.to_string()),
            }
        }
    }
}

// ============================================================================
// Versions Commands
// ============================================================================

/// Add a compatibility pair to the config and save it
pub fn versions_add(
    config: &mut ToolConfig,
    config_path: &Path,
    k8s_version: &str,
    cri_version: &str,
) -> CommandResult<Option<String>> {
    let previous = config.compatibility.insert(k8s_version, cri_version);
    save_config_to(config, config_path)?;
    Ok(previous)
}

/// Remove a compatibility pair from the config and save it
pub fn versions_remove(
    config: &mut ToolConfig,
    config_path: &Path,
    k8s_version: &str,
) -> CommandResult<String> {
    let removed = config
        .compatibility
        .remove(k8s_version)
        .ok_or_else(|| CommandError::UnknownVersion(k8s_version.to_string()))?;
    save_config_to(config, config_path)?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolconfig::load_config_from;
    use tempfile::TempDir;

    const REQUEST: &str = r#"{
        "settings": {
            "cluster_name": "lab-cluster",
            "k8s_version": "1.32.3-1.1",
            "cri_os": "xUbuntu_22.04",
            "pod_cidr": "10.244.0.0/16",
            "kubeconfig_method": "local",
            "kubeconfig_path": "/tmp/kube",
            "env": "dev",
            "project_git_path": "/srv/infra"
        },
        "nodes": [
            {"hostname": "lab-master-1", "ip": "10.0.0.1", "ansible_host": "10.0.0.1",
             "ssh_user": "ubuntu", "ssh_key_path": "/nonexistent/key", "role": "master",
             "physical_env": "lab"},
            {"hostname": "lab-worker-1", "ip": "10.0.0.2", "ansible_host": "10.0.0.2",
             "ssh_user": "ubuntu", "ssh_key_path": "/nonexistent/key", "role": "worker",
             "physical_env": "lab"}
        ]
    }"#;

    fn write_request(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("request.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_compile_and_write_bundle() {
        let tmp = TempDir::new().unwrap();
        let path = write_request(&tmp, REQUEST);

        let compiled = compile_file(&path, &ToolConfig::default()).unwrap();
        let receipt = write_bundle(&compiled, &tmp.path().join("out")).unwrap();

        assert_eq!(receipt.files, 3);
        assert!(receipt.location.join("lab_cluster.json").exists());
        assert!(receipt.location.join("lab_master_1.yml").exists());
        assert!(receipt.location.join("lab_worker_1.yml").exists());
    }

    #[test]
    fn test_validate_report_failure_message() {
        let tmp = TempDir::new().unwrap();
        let content = REQUEST.replace("\"role\": \"worker\"", "\"role\": \"master\"");
        let path = write_request(&tmp, &content);

        let report = validate_file(&path, &ToolConfig::default());
        assert!(!report.valid);
        assert_eq!(
            report.error.as_deref(),
            Some("Please provide at least one master and one worker node.")
        );
    }

    #[test]
    fn test_validate_report_success() {
        let tmp = TempDir::new().unwrap();
        let path = write_request(&tmp, REQUEST);

        let report = validate_file(&path, &ToolConfig::default());
        assert!(report.valid);
        assert_eq!(report.cluster_name.as_deref(), Some("lab-cluster"));
        assert_eq!(report.nodes, 2);
        assert_eq!(report.load_balancers, 0);
    }

    #[test]
    fn test_validate_report_colliding_hostnames() {
        let tmp = TempDir::new().unwrap();
        let content = REQUEST
            .replace("lab-master-1", "lab-node")
            .replace("lab-worker-1", "lab_node");
        let path = write_request(&tmp, &content);

        let report = validate_file(&path, &ToolConfig::default());
        assert!(!report.valid);
        assert_eq!(
            report.error.as_deref(),
            Some("Package error: Duplicate bundle entry: lab_node.yml")
        );
        assert!(matches!(
            compile_and_check(&path, &ToolConfig::default()),
            Err(CommandError::Package(PackageError::DuplicateEntry(_)))
        ));
    }

    #[test]
    fn test_missing_key_paths_deduplicated() {
        let tmp = TempDir::new().unwrap();
        let path = write_request(&tmp, REQUEST);
        let request = load_request_file(&path).unwrap();

        assert_eq!(missing_key_paths(&request), vec!["/nonexistent/key"]);
    }

    #[test]
    fn test_resolve_output_dir() {
        let config = ToolConfig::default();
        assert_eq!(resolve_output_dir(None, &config), PathBuf::from("dist"));
        assert_eq!(
            resolve_output_dir(Some(Path::new("/tmp/x")), &config),
            PathBuf::from("/tmp/x")
        );
    }

    #[test]
    fn test_versions_add_and_remove() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        let mut config = ToolConfig::default();

        let previous = versions_add(&mut config, &config_path, "1.33.1-1.1", "1.33").unwrap();
        assert_eq!(previous, None);
        let saved = load_config_from(&config_path).unwrap();
        assert_eq!(saved.compatibility.get("1.33.1-1.1"), Some("1.33"));

        let removed = versions_remove(&mut config, &config_path, "1.33.1-1.1").unwrap();
        assert_eq!(removed, "1.33");
        assert!(matches!(
            versions_remove(&mut config, &config_path, "1.33.1-1.1"),
            Err(CommandError::UnknownVersion(_))
        ));
    }
}
