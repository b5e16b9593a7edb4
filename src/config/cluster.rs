use std::fmt;

use serde::{Deserialize, Serialize};

/// Cluster-wide settings from the request file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClusterSettings {
    pub cluster_name: String,

    /// Kubernetes package version, e.g. "1.32.3-1.1"
    pub k8s_version: String,

    /// Container runtime version. Usually left empty and derived from
    /// `k8s_version` through the compatibility table.
    #[serde(default)]
    pub cri_version: String,

    /// Runtime repository OS tag, e.g. "xUbuntu_22.04"
    pub cri_os: String,

    pub pod_cidr: String,

    pub kubeconfig_method: KubeconfigMethod,

    pub kubeconfig_path: String,

    /// Deployment environment tag ("prod", "dev")
    pub env: String,

    /// Local checkout of the provisioning repository
    pub project_git_path: String,

    /// DNS provider used for certificate issuance
    #[serde(default)]
    pub dns_provider: Option<String>,
}

impl ClusterSettings {
    /// DNS provider name, or "" when unset
    pub fn dns_provider_name(&self) -> &str {
        self.dns_provider.as_deref().unwrap_or("")
    }
}

/// How the provisioning pipeline fetches the kubeconfig after bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KubeconfigMethod {
    Local,
    Onedrive,
}

impl KubeconfigMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            KubeconfigMethod::Local => "local",
            KubeconfigMethod::Onedrive => "onedrive",
        }
    }
}

/// A cluster member
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeRecord {
    pub hostname: String,

    pub ip: String,

    /// Address Ansible connects to over SSH
    pub ansible_host: String,

    pub ssh_user: String,

    /// SSH password; accepts `$env.NAME` references
    #[serde(default)]
    pub ssh_password: String,

    pub ssh_key_path: String,

    pub role: NodeRole,

    /// Control-plane HA role. Only meaningful for masters.
    #[serde(default)]
    pub master_type: MasterType,

    pub physical_env: String,

    /// Whether firewall ports must be opened on this node
    #[serde(default)]
    pub required_ports: bool,

    /// Which role's port set to open
    #[serde(default)]
    pub open_ports: PortScope,
}

impl NodeRecord {
    pub fn is_master(&self) -> bool {
        self.role == NodeRole::Master
    }

    pub fn is_worker(&self) -> bool {
        self.role == NodeRole::Worker
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Master,
    Worker,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Master => "master",
            NodeRole::Worker => "worker",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MasterType {
    #[default]
    NotConfigured,
    Master,
    Backup,
}

impl MasterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MasterType::NotConfigured => "not_configured",
            MasterType::Master => "master",
            MasterType::Backup => "backup",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortScope {
    Master,
    #[default]
    Worker,
    Both,
    All,
}

impl PortScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortScope::Master => "master",
            PortScope::Worker => "worker",
            PortScope::Both => "both",
            PortScope::All => "all",
        }
    }
}
