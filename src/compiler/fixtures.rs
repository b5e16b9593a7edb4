//! Shared builders for compiler unit tests

use crate::config::{
    ClusterSettings, CompileRequest, Exposure, KubeconfigMethod, LbState, LoadBalancerCommonConfig,
    LoadBalancerInput, LoadBalancerInstance, MasterType, NodeRecord, NodeRole, PortScope,
};

pub fn settings() -> ClusterSettings {
    ClusterSettings {
        cluster_name: "prod-cluster".to_string(),
        k8s_version: "1.32.3-1.1".to_string(),
        cri_version: "1.28".to_string(),
        cri_os: "xUbuntu_22.04".to_string(),
        pod_cidr: "10.244.0.0/16".to_string(),
        kubeconfig_method: KubeconfigMethod::Local,
        kubeconfig_path: "/home/ops/.kube".to_string(),
        env: "prod".to_string(),
        project_git_path: "/srv/infra".to_string(),
        dns_provider: None,
    }
}

pub fn node(hostname: &str, role: NodeRole, ip: &str) -> NodeRecord {
    NodeRecord {
        hostname: hostname.to_string(),
        ip: ip.to_string(),
        ansible_host: ip.to_string(),
        ssh_user: "ubuntu".to_string(),
        ssh_password: format!("{}-pw", hostname),
        ssh_key_path: "/home/ops/.ssh/id_rsa".to_string(),
        role,
        master_type: MasterType::NotConfigured,
        physical_env: "on-prem".to_string(),
        required_ports: true,
        open_ports: match role {
            NodeRole::Master => PortScope::Master,
            NodeRole::Worker => PortScope::Worker,
        },
    }
}

pub fn two_nodes() -> Vec<NodeRecord> {
    vec![
        node("k8s-master-1", NodeRole::Master, "10.0.0.1"),
        node("k8s-worker-1", NodeRole::Worker, "10.0.0.2"),
    ]
}

pub fn common(
    password: &str,
    vip: &str,
    ssl_enabled: bool,
    domain: &str,
) -> LoadBalancerCommonConfig {
    LoadBalancerCommonConfig {
        password: password.to_string(),
        vip: vip.to_string(),
        ssl_enabled,
        domain: domain.to_string(),
    }
}

pub fn lb_instance(hostname: &str, state: LbState, ip: &str) -> LoadBalancerInstance {
    LoadBalancerInstance {
        ip: ip.to_string(),
        lan_interface: "eth0".to_string(),
        state,
        hostname: hostname.to_string(),
        router_id: "51".to_string(),
        priority: match state {
            LbState::Master => "101".to_string(),
            LbState::Backup => "100".to_string(),
        },
        ssh_endpoint: ip.to_string(),
        ssh_username: "ubuntu".to_string(),
        ssh_password: "lb-pw".to_string(),
        ssh_key_path: "/home/ops/.ssh/id_rsa".to_string(),
        physical_env: "on-prem".to_string(),
        internal_or_external: Exposure::External,
    }
}

pub fn request() -> CompileRequest {
    CompileRequest {
        settings: settings(),
        nodes: two_nodes(),
        load_balancer: LoadBalancerInput::default(),
    }
}
