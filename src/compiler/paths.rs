//! File and inventory path derivation
//!
//! Every place a hostname or cluster name becomes part of a path goes through
//! [`normalize`], otherwise the manifest would point at inventory files that
//! do not exist in the bundle.

/// Root of the per-cluster group_vars tree inside the provisioning repo
pub const INVENTORY_ROOT: &str = "ansible/k8s_cluster_creation/inventory/group_vars";

/// Replace every `-` with `_`
pub fn normalize(name: &str) -> String {
    name.replace('-', "_")
}

/// Bundle entry name of a node document: `<hostname>.yml`
pub fn node_filename(hostname: &str) -> String {
    format!("{}.yml", normalize(hostname))
}

/// Bundle entry name of the manifest: `<cluster_name>.json`
pub fn manifest_filename(cluster_name: &str) -> String {
    format!("{}.json", normalize(cluster_name))
}

/// Inventory path of a node document, relative to the provisioning repo
pub fn inventory_path(cluster_name: &str, hostname: &str) -> String {
    format!(
        "{}/{}/{}",
        INVENTORY_ROOT,
        normalize(cluster_name),
        node_filename(hostname)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("k8s-master-1"), "k8s_master_1");
        assert_eq!(normalize("plain"), "plain");
        assert_eq!(normalize("--"), "__");
    }

    #[test]
    fn test_node_filename() {
        assert_eq!(node_filename("k8s-worker-1"), "k8s_worker_1.yml");
    }

    #[test]
    fn test_manifest_filename() {
        assert_eq!(manifest_filename("prod-cluster"), "prod_cluster.json");
    }

    #[test]
    fn test_inventory_path_normalizes_both_segments() {
        assert_eq!(
            inventory_path("prod-cluster", "k8s-master-1"),
            "ansible/k8s_cluster_creation/inventory/group_vars/prod_cluster/k8s_master_1.yml"
        );
    }

    #[test]
    fn test_filename_and_path_agree() {
        for hostname in ["a-b-c", "node-01", "-lead", "trail-", "no_hyphen"] {
            let filename = node_filename(hostname);
            let path = inventory_path("c", hostname);
            assert!(!filename.contains('-'));
            assert!(path.ends_with(&format!("/{}", filename)));
        }
    }
}
