use tracing::debug;

use super::error::ValidationError;
use crate::config::NodeRecord;

/// Check the node list has at least one master and one worker.
///
/// Only role counts are checked. Hostname uniqueness is enforced by the
/// package assembler; node addresses (`ip`, `ansible_host`) are copied
/// through as given, empty or not.
/// Pure function - no I/O.
pub fn validate_topology(nodes: &[NodeRecord]) -> Result<(), ValidationError> {
    let masters = nodes.iter().filter(|n| n.is_master()).count();
    let workers = nodes.iter().filter(|n| n.is_worker()).count();
    debug!(masters, workers, "validating topology");

    if masters == 0 || workers == 0 {
        return Err(ValidationError::InsufficientTopology);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::fixtures;
    use crate::config::NodeRole;

    fn node(hostname: &str, role: NodeRole) -> NodeRecord {
        fixtures::node(hostname, role, "10.0.0.1")
    }

    #[test]
    fn test_empty_list_fails() {
        assert_eq!(validate_topology(&[]), Err(ValidationError::InsufficientTopology));
    }

    #[test]
    fn test_missing_role_fails() {
        for count in 1..4 {
            let masters: Vec<_> = (0..count)
                .map(|i| node(&format!("m{i}"), NodeRole::Master))
                .collect();
            let workers: Vec<_> = (0..count)
                .map(|i| node(&format!("w{i}"), NodeRole::Worker))
                .collect();
            assert_eq!(validate_topology(&masters), Err(ValidationError::InsufficientTopology));
            assert_eq!(validate_topology(&workers), Err(ValidationError::InsufficientTopology));
        }
    }

    #[test]
    fn test_one_of_each_passes() {
        let nodes = vec![node("m", NodeRole::Master), node("w", NodeRole::Worker)];
        assert!(validate_topology(&nodes).is_ok());
    }

    #[test]
    fn test_empty_ip_not_checked() {
        let mut worker = node("w", NodeRole::Worker);
        worker.ip = String::new();
        let nodes = vec![node("m", NodeRole::Master), worker];
        assert!(validate_topology(&nodes).is_ok());
    }

    #[test]
    fn test_duplicate_hostnames_not_checked() {
        let nodes = vec![
            node("same", NodeRole::Master),
            node("same", NodeRole::Worker),
            node("same", NodeRole::Worker),
        ];
        assert!(validate_topology(&nodes).is_ok());
    }
}
