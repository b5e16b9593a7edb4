use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ValidationError;

/// Kubernetes package versions known to work with CRI-O 1.28
const BUILTIN_CRI_1_28: &[&str] = &[
    "1.28.2-00",
    "1.28.4-1.1",
    "1.32.1-00",
    "1.32.3-1.1",
    "1.32.2-1.1",
    "1.32.1-1.1",
    "1.32.0-1.1",
];

/// Kubernetes version -> container runtime version
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VersionMatrix {
    entries: BTreeMap<String, String>,
}

impl VersionMatrix {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with this release
    pub fn builtin() -> Self {
        let entries = BUILTIN_CRI_1_28
            .iter()
            .map(|k8s| (k8s.to_string(), "1.28".to_string()))
            .collect();
        Self { entries }
    }

    pub fn with_pair(
        mut self,
        k8s_version: impl Into<String>,
        cri_version: impl Into<String>,
    ) -> Self {
        self.insert(k8s_version, cri_version);
        self
    }

    /// Add or replace a pair, returning the previous runtime version
    pub fn insert(
        &mut self,
        k8s_version: impl Into<String>,
        cri_version: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(k8s_version.into(), cri_version.into())
    }

    pub fn remove(&mut self, k8s_version: &str) -> Option<String> {
        self.entries.remove(k8s_version)
    }

    /// Entries of `other` take precedence
    pub fn merged_with(mut self, other: &VersionMatrix) -> Self {
        self.entries
            .extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn get(&self, k8s_version: &str) -> Option<&str> {
        self.entries.get(k8s_version).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick the runtime version for `k8s_version`. A table entry wins over
    /// the operator's value; the operator's value is only used for versions
    /// the table does not know.
    pub fn resolve(
        &self,
        k8s_version: &str,
        requested_cri: &str,
    ) -> Result<String, ValidationError> {
        let resolved = match self.get(k8s_version) {
            Some(cri) => cri.to_string(),
            None => requested_cri.to_string(),
        };

        if resolved.is_empty() {
            return Err(ValidationError::UnsupportedVersionCombination(
                k8s_version.to_string(),
            ));
        }
        debug!(k8s_version, cri_version = %resolved, "resolved runtime version");
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let matrix = VersionMatrix::builtin();
        assert_eq!(matrix.len(), 7);
        for k8s in BUILTIN_CRI_1_28 {
            assert_eq!(matrix.get(k8s), Some("1.28"));
        }
    }

    #[test]
    fn test_table_wins_over_requested() {
        let matrix = VersionMatrix::builtin();
        assert_eq!(matrix.resolve("1.32.3-1.1", "1.30").unwrap(), "1.28");
    }

    #[test]
    fn test_requested_used_for_unknown_version() {
        let matrix = VersionMatrix::builtin();
        assert_eq!(matrix.resolve("1.33.0-1.1", "1.33").unwrap(), "1.33");
    }

    #[test]
    fn test_unknown_without_request_fails() {
        let matrix = VersionMatrix::builtin();
        assert_eq!(
            matrix.resolve("1.27.0-00", ""),
            Err(ValidationError::UnsupportedVersionCombination(
                "1.27.0-00".to_string()
            ))
        );
    }

    #[test]
    fn test_empty_table_entry_is_unsupported() {
        let matrix = VersionMatrix::new().with_pair("1.30.0-1.1", "");
        assert!(matrix.resolve("1.30.0-1.1", "1.30").is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let overrides = VersionMatrix::new()
            .with_pair("1.32.3-1.1", "1.32")
            .with_pair("1.33.1-1.1", "1.33");
        let matrix = VersionMatrix::builtin().merged_with(&overrides);

        assert_eq!(matrix.len(), 8);
        assert_eq!(matrix.get("1.32.3-1.1"), Some("1.32"));
        assert_eq!(matrix.get("1.32.0-1.1"), Some("1.28"));
    }

    #[test]
    fn test_yaml_shape() {
        let matrix: VersionMatrix = serde_yaml::from_str("1.33.1-1.1: '1.33'\n").unwrap();
        assert_eq!(matrix.get("1.33.1-1.1"), Some("1.33"));
    }
}
