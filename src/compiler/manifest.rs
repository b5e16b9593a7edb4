//! Cluster manifest
//!
//! One JSON document describing the whole compiled topology. Field order is
//! fixed by the struct declarations, so identical input gives byte-identical
//! output.

use serde::Serialize;
use tracing::debug;

use super::error::CompileError;
use super::load_balancer::CompiledLoadBalancerConfig;
use super::paths::inventory_path;
use crate::config::{ClusterSettings, NodeRecord};

/// Per-node entry of `nodes_to_configure`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestNode {
    pub node_type: String,
    pub ssh_user_password: String,
    pub path_vars_ansible_file: String,
    pub hostname: String,
    pub ip: String,
    pub physical_env: String,
    pub ssh_username: String,
    pub ssh_key_path: String,
    pub net_ports_conf: String,
    pub ports_open_method: String,
    pub ansible_host: String,
    pub master_type: String,
}

impl ManifestNode {
    fn from_record(cluster_name: &str, node: &NodeRecord) -> Self {
        Self {
            node_type: node.role.as_str().to_string(),
            ssh_user_password: node.ssh_password.clone(),
            path_vars_ansible_file: inventory_path(cluster_name, &node.hostname),
            hostname: node.hostname.clone(),
            ip: node.ip.clone(),
            physical_env: node.physical_env.clone(),
            ssh_username: node.ssh_user.clone(),
            ssh_key_path: node.ssh_key_path.clone(),
            net_ports_conf: node.required_ports.to_string(),
            ports_open_method: node.open_ports.as_str().to_string(),
            ansible_host: node.ansible_host.clone(),
            master_type: node.master_type.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterManifest {
    /// Inventory file of the primary master
    pub path_vars_file_master_node_ansible: String,
    pub ssh_user_password_master_node: String,
    pub cluster_name: String,
    pub kubeconfig_method: String,
    pub kubeconfig_path: String,
    pub kubeconfig_setup: String,
    pub pod_cidr: String,
    pub k8s_version: String,
    pub cri_version: String,
    pub cri_os: String,
    pub ports_env: String,
    pub project_git_path: String,
    pub nodes_to_configure: Vec<ManifestNode>,
    /// Nodes pending addition in a later run; empty on a fresh compile
    pub nodes_to_add: Vec<ManifestNode>,
    pub haproxy: CompiledLoadBalancerConfig,
}

impl ClusterManifest {
    /// Pretty JSON, two-space indent
    pub fn to_json(&self) -> Result<String, CompileError> {
        serde_json::to_string_pretty(self).map_err(|e| CompileError::Manifest(e.to_string()))
    }

    /// The node whose credentials were promoted to the top-level fields
    pub fn primary_master(&self) -> Option<&ManifestNode> {
        self.nodes_to_configure
            .iter()
            .find(|n| n.path_vars_ansible_file == self.path_vars_file_master_node_ansible)
    }
}

/// Assemble the manifest. The first master in input order becomes the
/// primary master.
/// Pure function - no I/O.
pub fn compile_manifest(
    settings: &ClusterSettings,
    nodes: &[NodeRecord],
    lb: &CompiledLoadBalancerConfig,
) -> ClusterManifest {
    let cluster_name = &settings.cluster_name;
    let primary = nodes.iter().find(|n| n.is_master());

    // An unvalidated list has no master; the fields are left empty.
    let (master_path, master_password) = primary
        .map(|m| (inventory_path(cluster_name, &m.hostname), m.ssh_password.clone()))
        .unwrap_or_default();

    let nodes_to_configure: Vec<_> = nodes
        .iter()
        .map(|n| ManifestNode::from_record(cluster_name, n))
        .collect();
    debug!(
        nodes = nodes_to_configure.len(),
        primary_master = primary.map(|m| m.hostname.as_str()).unwrap_or(""),
        "compiled manifest"
    );

    ClusterManifest {
        path_vars_file_master_node_ansible: master_path,
        ssh_user_password_master_node: master_password,
        cluster_name: cluster_name.clone(),
        kubeconfig_method: settings.kubeconfig_method.as_str().to_string(),
        kubeconfig_path: settings.kubeconfig_path.clone(),
        kubeconfig_setup: "true".to_string(),
        pod_cidr: settings.pod_cidr.clone(),
        k8s_version: settings.k8s_version.clone(),
        cri_version: settings.cri_version.clone(),
        cri_os: settings.cri_os.clone(),
        ports_env: settings.env.clone(),
        project_git_path: settings.project_git_path.clone(),
        nodes_to_configure,
        nodes_to_add: Vec::new(),
        haproxy: lb.clone(),
    }
}
