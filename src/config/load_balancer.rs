use serde::{Deserialize, Serialize};

/// Load-balancer block of the request. Absent means no load balancer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoadBalancerInput {
    #[serde(default)]
    pub common: LoadBalancerCommonConfig,

    #[serde(default)]
    pub instances: Vec<LoadBalancerInstance>,
}

/// Settings shared by the whole load-balancer tier
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoadBalancerCommonConfig {
    /// Stats/admin password; accepts `$env.NAME` references
    #[serde(default)]
    pub password: String,

    /// Virtual IP floated between instances
    #[serde(default)]
    pub vip: String,

    #[serde(default)]
    pub ssl_enabled: bool,

    /// Domain the control plane is published under when SSL is on
    #[serde(default)]
    pub domain: String,
}

/// One HAProxy/keepalived machine. Serialized field order is what the
/// provisioning playbooks read.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoadBalancerInstance {
    pub ip: String,
    pub lan_interface: String,
    pub state: LbState,
    pub hostname: String,
    pub router_id: String,
    pub priority: String,
    pub ssh_endpoint: String,
    pub ssh_username: String,
    #[serde(default)]
    pub ssh_password: String,
    pub ssh_key_path: String,
    pub physical_env: String,
    #[serde(default)]
    pub internal_or_external: Exposure,
}

/// VRRP state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LbState {
    Master,
    Backup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Exposure {
    Internal,
    #[default]
    External,
}
