//! Load-balancer configuration compiler
//!
//! Turns the operator's raw HAProxy/keepalived inputs into the normalized
//! object every later stage reads. Rules are checked in a fixed order and
//! only the first violation is reported:
//! 1. admin password present when instances exist
//! 2. virtual IP present when instances exist
//! 3. domain present when SSL termination applies
//!
//! SSL termination only applies when at least one instance is configured; a
//! request for SSL without instances is silently downgraded to plain 6443.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use super::error::ValidationError;
use crate::config::{LoadBalancerCommonConfig, LoadBalancerInstance};

/// API server port when HAProxy terminates TLS
pub const SSL_PORT: u16 = 443;

/// API server port otherwise
pub const PLAIN_PORT: u16 = 6443;

/// Written when no DNS provider was chosen
pub const DNS_PROVIDER_UNSET: &str = "not_configured";

/// The provisioning playbooks read booleans and ports as strings
pub(crate) fn display_as_string<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

/// Whether clients reach the control plane by name or by address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DnsOrIp {
    Dns,
    Ip,
}

impl DnsOrIp {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsOrIp::Dns => "dns",
            DnsOrIp::Ip => "ip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SslConfig {
    #[serde(serialize_with = "display_as_string")]
    pub enabled: bool,
    pub dns: String,
    pub dns_or_ip: DnsOrIp,
    #[serde(serialize_with = "display_as_string")]
    pub port: u16,
    pub dns_provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommonCredentials {
    pub password: String,
    pub vip: String,
}

/// Normalized load-balancer configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledLoadBalancerConfig {
    #[serde(serialize_with = "display_as_string")]
    pub enabled: bool,
    pub ssl: SslConfig,
    pub haproxy_common_cfg: CommonCredentials,
    pub haproxy_to_configure: Vec<LoadBalancerInstance>,
    /// Instances pending addition in a later run; empty on a fresh compile
    pub haproxy_to_add: Vec<LoadBalancerInstance>,
}

impl SslConfig {
    fn terminated(domain: &str, dns_provider: String) -> Self {
        Self {
            enabled: true,
            dns: domain.to_string(),
            dns_or_ip: DnsOrIp::Dns,
            port: SSL_PORT,
            dns_provider,
        }
    }

    fn passthrough(dns_provider: String) -> Self {
        Self {
            enabled: false,
            dns: String::new(),
            dns_or_ip: DnsOrIp::Ip,
            port: PLAIN_PORT,
            dns_provider,
        }
    }
}

/// Compile the load-balancer tier.
/// Pure function - inputs are only borrowed.
pub fn compile_load_balancer(
    common: &LoadBalancerCommonConfig,
    instances: &[LoadBalancerInstance],
    dns_provider_name: &str,
) -> Result<CompiledLoadBalancerConfig, ValidationError> {
    let dns_provider = if dns_provider_name.is_empty() {
        DNS_PROVIDER_UNSET.to_string()
    } else {
        dns_provider_name.to_string()
    };

    let enabled = !instances.is_empty();
    let (credentials, ssl_requested) = if enabled {
        if common.password.is_empty() {
            return Err(ValidationError::MissingCredential);
        }
        if common.vip.is_empty() {
            return Err(ValidationError::MissingVip);
        }
        let credentials = CommonCredentials {
            password: common.password.clone(),
            vip: common.vip.clone(),
        };
        (credentials, common.ssl_enabled)
    } else {
        (CommonCredentials::default(), false)
    };

    let ssl = if ssl_requested {
        if common.domain.is_empty() {
            return Err(ValidationError::MissingDomain);
        }
        SslConfig::terminated(&common.domain, dns_provider)
    } else {
        SslConfig::passthrough(dns_provider)
    };

    debug!(
        enabled,
        instances = instances.len(),
        ssl = ssl.enabled,
        port = ssl.port,
        "compiled load balancer"
    );

    Ok(CompiledLoadBalancerConfig {
        enabled,
        ssl,
        haproxy_common_cfg: credentials,
        haproxy_to_configure: instances.to_vec(),
        haproxy_to_add: Vec::new(),
    })
}
