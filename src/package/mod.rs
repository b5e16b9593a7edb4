//! Artifact packaging
//!
//! The compiler hands over a [`Bundle`] of named text blobs; a
//! [`PackageAssembler`] decides how they are stored. The compiler never knows
//! about the storage format.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Errors while assembling a package
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Duplicate bundle entry: {0}")]
    DuplicateEntry(String),

    #[error("Bundle '{0}' has no entries")]
    Empty(String),

    #[error("Invalid bundle name '{0}': must be a single path segment")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One named file of a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    pub filename: String,
    pub content: String,
}

impl BundleEntry {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Ordered set of artifacts from one compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Normalized cluster name
    pub name: String,
    pub entries: Vec<BundleEntry>,
}

impl Bundle {
    pub fn new(name: impl Into<String>, entries: Vec<BundleEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn entry(&self, filename: &str) -> Option<&BundleEntry> {
        self.entries.iter().find(|e| e.filename == filename)
    }

    /// First filename that appears more than once
    pub fn find_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.filename.as_str())
            .find(|name| !seen.insert(*name))
    }

    pub fn total_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.content.len()).sum()
    }
}

/// What an assembler produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReceipt {
    /// Where the package now lives
    pub location: PathBuf,
    pub files: usize,
    pub bytes: usize,
}

/// Stores a bundle somewhere
pub trait PackageAssembler {
    fn assemble(&mut self, bundle: &Bundle) -> Result<PackageReceipt, PackageError>;
}

/// A name that stays inside the directory it is joined to
fn is_single_segment(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Checks every assembler must make before writing anything
pub fn check_bundle(bundle: &Bundle) -> Result<(), PackageError> {
    if bundle.entries.is_empty() {
        return Err(PackageError::Empty(bundle.name.clone()));
    }
    let names = std::iter::once(bundle.name.as_str())
        .chain(bundle.entries.iter().map(|e| e.filename.as_str()));
    for name in names {
        if !is_single_segment(name) {
            return Err(PackageError::InvalidName(name.to_string()));
        }
    }
    if let Some(name) = bundle.find_duplicate() {
        return Err(PackageError::DuplicateEntry(name.to_string()));
    }
    Ok(())
}

// ============================================================================
// I/O boundary
// ============================================================================

/// Writes each bundle into `<output_dir>/<bundle name>/`.
///
/// Entries are written to a staging directory next to the target, which is
/// renamed into place once every entry is on disk. A failed write leaves the
/// previous bundle, if any, untouched.
#[derive(Debug, Clone)]
pub struct DirectoryAssembler {
    output_dir: PathBuf,
}

impl DirectoryAssembler {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory a given bundle is written to
    pub fn bundle_dir(&self, bundle: &Bundle) -> PathBuf {
        self.output_dir.join(&bundle.name)
    }

    fn staging_dir(&self, bundle: &Bundle) -> PathBuf {
        self.output_dir.join(format!(".{}.partial", bundle.name))
    }

    fn write_entries(dir: &Path, bundle: &Bundle) -> Result<(), PackageError> {
        std::fs::create_dir_all(dir)?;
        for entry in &bundle.entries {
            let path = dir.join(&entry.filename);
            std::fs::write(&path, &entry.content)?;
            debug!(path = %path.display(), bytes = entry.content.len(), "wrote bundle entry");
        }
        Ok(())
    }
}

impl PackageAssembler for DirectoryAssembler {
    fn assemble(&mut self, bundle: &Bundle) -> Result<PackageReceipt, PackageError> {
        check_bundle(bundle)?;

        let dir = self.bundle_dir(bundle);
        let staging = self.staging_dir(bundle);
        if staging.exists() {
            std::fs::remove_dir_all(&staging)?;
        }
        if let Err(e) = Self::write_entries(&staging, bundle) {
            let _ = std::fs::remove_dir_all(&staging);
            return Err(e);
        }

        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::rename(&staging, &dir)?;

        info!(location = %dir.display(), files = bundle.entries.len(), "bundle written");
        Ok(PackageReceipt {
            location: dir,
            files: bundle.entries.len(),
            bytes: bundle.total_bytes(),
        })
    }
}
