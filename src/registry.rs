//! Approach registry: which metrics file belongs to which approach
//!
//! The registry table is a header-less two-column CSV:
//!
//! ```text
//! ObVi-SLAM,/data/metrics/obvi_slam.json
//! ORB-SLAM3,/data/metrics/orb_slam3.json
//! ```
//!
//! The approach in the first row is the primary approach. Paths are not
//! checked here; a missing metrics file fails when it is read.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Error, Result};

/// Ordered approach name → metrics file mapping with a designated primary.
///
/// Iteration order is the order in which names first appear in the table.
/// A repeated name keeps its first position and takes the later path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproachRegistry {
    primary: String,
    entries: Vec<(String, PathBuf)>,
}

impl ApproachRegistry {
    /// Load the registry from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a row has fewer than two
    /// columns, or the table has no rows.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Parse the registry from any reader. `source` names it in error messages.
    ///
    /// # Errors
    ///
    /// Same as [`ApproachRegistry::load`].
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut primary = None;
        let mut entries: Vec<(String, PathBuf)> = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            let (Some(name), Some(metrics_file)) = (record.get(0), record.get(1)) else {
                return Err(Error::MalformedRow {
                    file: source.to_string(),
                    line,
                    reason: "expected 'approach_name,metrics_file_path'".to_string(),
                });
            };
            if record.len() > 2 {
                warn!(file = source, line, "Ignoring extra columns in approach registry row");
            }

            let metrics_file = PathBuf::from(metrics_file.trim());
            if primary.is_none() {
                primary = Some(name.to_string());
            }

            if let Some(entry) = entries.iter_mut().find(|(n, _)| n == name) {
                warn!(approach = name, "Approach listed twice; keeping the later metrics file");
                entry.1 = metrics_file;
            } else {
                entries.push((name.to_string(), metrics_file));
            }
        }

        let primary =
            primary.ok_or_else(|| Error::EmptyRegistry(source.to_string()))?;
        debug!(primary = %primary, approaches = entries.len(), "Loaded approach registry");

        Ok(Self { primary, entries })
    }

    /// Name of the primary (reference) approach.
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Metrics file for `approach`, if registered.
    #[must_use]
    pub fn metrics_file(&self, approach: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(name, _)| name == approach)
            .map(|(_, path)| path.as_path())
    }

    /// Approaches and their metrics files, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    /// Approach names in registry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of registered approaches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a loaded registry (the primary row exists).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(table: &str) -> Result<ApproachRegistry> {
        ApproachRegistry::from_reader(table.as_bytes(), "inline.csv")
    }

    #[test]
    fn test_first_row_is_primary() {
        let registry = parse("A,fileA\nB,fileB\n").unwrap();
        assert_eq!(registry.primary(), "A");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.metrics_file("A"), Some(Path::new("fileA")));
        assert_eq!(registry.metrics_file("B"), Some(Path::new("fileB")));
    }

    #[test]
    fn test_path_whitespace_trimmed() {
        let registry = parse("ObVi-SLAM, /tmp/obvi.json \n").unwrap();
        assert_eq!(
            registry.metrics_file("ObVi-SLAM"),
            Some(Path::new("/tmp/obvi.json"))
        );
    }

    #[test]
    fn test_duplicate_name_last_wins_keeps_position() {
        let registry = parse("A,first\nB,fileB\nA,second\n").unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(registry.metrics_file("A"), Some(Path::new("second")));
        assert_eq!(registry.primary(), "A");
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(matches!(parse(""), Err(Error::EmptyRegistry(_))));
    }

    #[test]
    fn test_single_column_row_rejected() {
        let err = parse("A,fileA\nB\n").unwrap_err();
        match err {
            Error::MalformedRow { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
