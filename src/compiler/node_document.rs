//! Per-node inventory documents
//!
//! Each node gets one YAML file under the cluster's group_vars directory.
//! The document is a typed struct so a field cannot be silently left out;
//! `serde_yaml` does the quoting.

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::error::CompileError;
use super::load_balancer::{display_as_string, CompiledLoadBalancerConfig};
use super::paths::{inventory_path, node_filename};
use crate::config::{ClusterSettings, NodeRecord};

/// SSH options passed through to Ansible for every node
pub const SSH_COMMON_ARGS: &str = "-o StrictHostKeyChecking=no";

const HEADER: &str = "# Inventory variables generated by clusterforge. Do not edit by hand.\n";

/// A rendered node document, ready for the bundle
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDocument {
    pub hostname: String,
    /// Bundle entry name, e.g. `k8s_master_1.yml`
    pub filename: String,
    /// Where the provisioning repo expects this file
    pub inventory_path: String,
    pub content: String,
}

/// Field set of a node document, in the order the playbooks list them
#[derive(Debug, Serialize)]
struct NodeVars<'a> {
    // node
    ansible_host: &'a str,
    node_name: &'a str,
    node_ssh_user: &'a str,
    ssh_private_key_path: &'a str,
    ansible_ssh_common_args: &'static str,
    kubeconfig_method: &'static str,
    kubeconfig_path: &'a str,
    cluster_name: &'a str,
    path_vars_ansible_file: &'a str,

    // tools
    k8s_version: &'a str,
    cri_version: &'a str,
    cri_os: &'a str,
    #[serde(serialize_with = "display_as_string")]
    required_ports: bool,
    open_ports_for_master_or_worker: &'static str,
    json_hostnames: &'a str,
    new_json_hostnames: &'static str,
    node_type: &'static str,
    master_type: &'static str,
    node_ip: &'a str,
    pod_cidr: &'a str,

    // system
    env: &'a str,
    local_path_git: &'a str,

    // haproxy
    #[serde(serialize_with = "display_as_string")]
    haproxy_enabled: bool,
    #[serde(serialize_with = "display_as_string")]
    haproxy_port: u16,
    haproxy_dns_or_ip: &'static str,
    haproxy_ip: &'a str,
    haproxy_dns: &'a str,
    haproxy_dns_provider: &'a str,
}

/// Hostname/IP listing of every node, flattened to one line with its
/// double quotes backslash-escaped so it can be embedded as a string value
/// and later handed to a shell.
pub fn hostnames_digest(nodes: &[NodeRecord]) -> String {
    let hostnames: Vec<_> = nodes
        .iter()
        .map(|n| json!({ "hostname": n.hostname, "ip": n.ip }))
        .collect();
    json!({ "hostnames": hostnames })
        .to_string()
        .replace('"', "\\\"")
}

/// Render the inventory document for one node.
/// Pure function - no I/O.
pub fn render_node_document(
    settings: &ClusterSettings,
    node: &NodeRecord,
    lb: &CompiledLoadBalancerConfig,
    hostnames_digest: &str,
) -> Result<NodeDocument, CompileError> {
    let path = inventory_path(&settings.cluster_name, &node.hostname);

    let vars = NodeVars {
        ansible_host: &node.ansible_host,
        node_name: &node.hostname,
        node_ssh_user: &node.ssh_user,
        ssh_private_key_path: &node.ssh_key_path,
        ansible_ssh_common_args: SSH_COMMON_ARGS,
        kubeconfig_method: settings.kubeconfig_method.as_str(),
        kubeconfig_path: &settings.kubeconfig_path,
        cluster_name: &settings.cluster_name,
        path_vars_ansible_file: &path,
        k8s_version: &settings.k8s_version,
        cri_version: &settings.cri_version,
        cri_os: &settings.cri_os,
        required_ports: node.required_ports,
        open_ports_for_master_or_worker: node.open_ports.as_str(),
        json_hostnames: hostnames_digest,
        new_json_hostnames: "",
        node_type: node.role.as_str(),
        master_type: node.master_type.as_str(),
        node_ip: &node.ip,
        pod_cidr: &settings.pod_cidr,
        env: &settings.env,
        local_path_git: &settings.project_git_path,
        haproxy_enabled: lb.enabled,
        haproxy_port: lb.ssl.port,
        haproxy_dns_or_ip: lb.ssl.dns_or_ip.as_str(),
        haproxy_ip: &lb.haproxy_common_cfg.vip,
        haproxy_dns: &lb.ssl.dns,
        haproxy_dns_provider: &lb.ssl.dns_provider,
    };

    let body = serde_yaml::to_string(&vars)
        .map_err(|e| CompileError::Render(node.hostname.clone(), e.to_string()))?;
    debug!(hostname = %node.hostname, path = %path, "rendered node document");

    Ok(NodeDocument {
        hostname: node.hostname.clone(),
        filename: node_filename(&node.hostname),
        inventory_path: path,
        content: format!("{}{}", HEADER, body),
    })
}
