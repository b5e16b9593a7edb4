//! Cluster compiler
//!
//! Turns a [`CompileRequest`] into the artifacts the provisioning pipeline
//! consumes. Stages run in a fixed order and stop at the first failure:
//!
//! 1. [`validate_topology`]: at least one master and one worker
//! 2. [`VersionMatrix::resolve`]: container runtime version for the chosen
//!    Kubernetes version
//! 3. [`compile_load_balancer`]: normalized HAProxy configuration
//! 4. [`render_node_document`]: one inventory document per node
//! 5. [`compile_manifest`]: the consolidated cluster manifest
//!
//! Nothing here performs I/O; the result is handed to a
//! [`PackageAssembler`](crate::package::PackageAssembler).

mod error;
pub mod load_balancer;
pub mod manifest;
pub mod node_document;
pub mod paths;
pub mod topology;
pub mod versions;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{CompileError, ValidationError};
pub use load_balancer::{compile_load_balancer, CompiledLoadBalancerConfig, DnsOrIp, SslConfig};
pub use manifest::{compile_manifest, ClusterManifest, ManifestNode};
pub use node_document::{hostnames_digest, render_node_document, NodeDocument};
pub use topology::validate_topology;
pub use versions::VersionMatrix;

use tracing::info;

use crate::config::{ClusterSettings, CompileRequest};
use crate::package::{Bundle, BundleEntry};

/// Everything produced by one successful compilation
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCluster {
    /// Request settings with the runtime version filled in
    pub settings: ClusterSettings,
    pub load_balancer: CompiledLoadBalancerConfig,
    /// In input order
    pub node_documents: Vec<NodeDocument>,
    pub manifest: ClusterManifest,
    /// Serialized manifest, identical to the manifest entry of `bundle`
    pub manifest_json: String,
    pub bundle: Bundle,
}

/// Run the full pipeline on one request.
/// Pure function - no I/O.
pub fn compile_cluster(
    request: &CompileRequest,
    matrix: &VersionMatrix,
) -> Result<CompiledCluster, CompileError> {
    validate_topology(&request.nodes)?;

    let settings = ClusterSettings {
        cri_version: matrix
            .resolve(&request.settings.k8s_version, &request.settings.cri_version)?,
        ..request.settings.clone()
    };

    let lb = compile_load_balancer(
        &request.load_balancer.common,
        &request.load_balancer.instances,
        settings.dns_provider_name(),
    )?;

    let digest = hostnames_digest(&request.nodes);
    let node_documents = request
        .nodes
        .iter()
        .map(|node| render_node_document(&settings, node, &lb, &digest))
        .collect::<Result<Vec<_>, _>>()?;

    let manifest = compile_manifest(&settings, &request.nodes, &lb);
    let manifest_json = manifest.to_json()?;

    let entries = std::iter::once(BundleEntry::new(
        paths::manifest_filename(&settings.cluster_name),
        manifest_json.clone(),
    ))
    .chain(
        node_documents
            .iter()
            .map(|doc| BundleEntry::new(doc.filename.clone(), doc.content.clone())),
    )
    .collect();
    let bundle = Bundle::new(paths::normalize(&settings.cluster_name), entries);

    info!(
        cluster = %settings.cluster_name,
        nodes = node_documents.len(),
        load_balancer = lb.enabled,
        "compiled cluster"
    );

    Ok(CompiledCluster {
        settings,
        load_balancer: lb,
        node_documents,
        manifest,
        manifest_json,
        bundle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LbState, NodeRole};

    #[test]
    fn test_compile_minimal_request() {
        let compiled = compile_cluster(&fixtures::request(), &VersionMatrix::builtin()).unwrap();

        assert_eq!(compiled.node_documents.len(), 2);
        assert_eq!(compiled.bundle.name, "prod_cluster");
        let names: Vec<_> = compiled
            .bundle
            .entries
            .iter()
            .map(|e| e.filename.as_str())
            .collect();
        assert_eq!(names, ["prod_cluster.json", "k8s_master_1.yml", "k8s_worker_1.yml"]);
        assert_eq!(compiled.bundle.entries[0].content, compiled.manifest_json);
    }

    #[test]
    fn test_runtime_version_resolved_from_table() {
        let mut request = fixtures::request();
        request.settings.cri_version = String::new();

        let compiled = compile_cluster(&request, &VersionMatrix::builtin()).unwrap();
        assert_eq!(compiled.settings.cri_version, "1.28");
        assert_eq!(compiled.manifest.cri_version, "1.28");
    }

    #[test]
    fn test_unsupported_version_stops_pipeline() {
        let mut request = fixtures::request();
        request.settings.k8s_version = "1.20.0-00".to_string();
        request.settings.cri_version = String::new();

        let err = compile_cluster(&request, &VersionMatrix::builtin()).unwrap_err();
        assert_eq!(
            err,
            CompileError::Validation(ValidationError::UnsupportedVersionCombination(
                "1.20.0-00".to_string()
            ))
        );
    }

    #[test]
    fn test_topology_checked_before_versions() {
        let mut request = fixtures::request();
        request.nodes.retain(|n| n.role == NodeRole::Master);
        request.settings.k8s_version = "1.20.0-00".to_string();
        request.settings.cri_version = String::new();

        let err = compile_cluster(&request, &VersionMatrix::builtin()).unwrap_err();
        assert_eq!(err.validation(), Some(&ValidationError::InsufficientTopology));
    }

    #[test]
    fn test_load_balancer_error_surfaces() {
        let mut request = fixtures::request();
        request.load_balancer.instances =
            vec![fixtures::lb_instance("lb-1", LbState::Master, "10.0.0.10")];

        let err = compile_cluster(&request, &VersionMatrix::builtin()).unwrap_err();
        assert_eq!(err.validation(), Some(&ValidationError::MissingCredential));
    }

    #[test]
    fn test_request_not_mutated() {
        let mut request = fixtures::request();
        request.settings.cri_version = String::new();
        let before = request.clone();

        compile_cluster(&request, &VersionMatrix::builtin()).unwrap();
        assert_eq!(request, before);
    }
}
