//! Error-type tags and where each chart should be saved
//!
//! The optional save-path table is a header-less CSV with up to two rows:
//!
//! ```text
//! transl_cdf,/tmp/transl_cdf.png
//! orient_cdf,/tmp/orient_cdf.png
//! ```
//!
//! Nothing in this table is fatal. A missing file, an unreadable row or an
//! unknown tag only produces a warning, and the affected chart is displayed
//! instead of saved.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::Error;

/// Kind of error a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// CDF of waypoint position deviations
    TranslCdf,
    /// CDF of waypoint orientation deviations
    OrientCdf,
    /// Per-trajectory translation ATE RMSE
    TranslAte,
    /// Per-trajectory rotation ATE RMSE
    OrientAte,
}

impl ErrorType {
    /// Tags accepted in the save-path table.
    pub const SAVEABLE: [Self; 2] = [Self::TranslCdf, Self::OrientCdf];

    /// Tag used in tables and file names.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::TranslCdf => "transl_cdf",
            Self::OrientCdf => "orient_cdf",
            Self::TranslAte => "transl_ate",
            Self::OrientAte => "orient_ate",
        }
    }

    /// Y-axis label of the RMSE chart for this error type.
    #[must_use]
    pub const fn rmse_axis_label(self) -> &'static str {
        match self {
            Self::TranslCdf | Self::TranslAte => "RMSE (m)",
            Self::OrientCdf | Self::OrientAte => "RMSE (deg)",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ErrorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "transl_cdf" => Ok(Self::TranslCdf),
            "orient_cdf" => Ok(Self::OrientCdf),
            "transl_ate" => Ok(Self::TranslAte),
            "orient_ate" => Ok(Self::OrientAte),
            other => Err(Error::InvalidInput(format!("unknown error type '{other}'"))),
        }
    }
}

/// Resolved save paths for the two CDF charts. `None` means display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavePaths {
    transl_cdf: Option<PathBuf>,
    orient_cdf: Option<PathBuf>,
}

impl SavePaths {
    /// Both charts displayed.
    #[must_use]
    pub fn display_all() -> Self {
        Self::default()
    }

    /// Resolve save paths from the optional table at `path`.
    ///
    /// An absent, empty or nonexistent path yields [`SavePaths::display_all`].
    #[must_use]
    pub fn resolve(path: Option<&Path>) -> Self {
        let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
            warn!("No error-type/save-path file given; displaying charts instead of saving");
            return Self::display_all();
        };

        match std::fs::File::open(path) {
            Ok(file) => Self::from_reader(file, &path.display().to_string()),
            Err(e) => {
                warn!(
                    file = %path.display(),
                    error = %e,
                    "Save-path file doesn't exist or can't be opened; not saving files"
                );
                Self::display_all()
            }
        }
    }

    /// Parse the save-path table from any reader. `source` names it in warnings.
    ///
    /// Only the first two rows are considered.
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Self {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut resolved = Self::display_all();
        let mut rows = 0usize;

        for record in csv_reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!(file = source, error = %e, "Unreadable save-path row; skipping");
                    continue;
                }
            };
            rows += 1;
            if rows > ErrorType::SAVEABLE.len() {
                warn!(
                    file = source,
                    row = rows,
                    "Save-path file has more than two rows; ignoring the rest"
                );
                break;
            }

            let tag = record.get(0).unwrap_or_default();
            let error_type = match tag.parse::<ErrorType>() {
                Ok(t) if ErrorType::SAVEABLE.contains(&t) => t,
                _ => {
                    warn!(
                        file = source,
                        tag,
                        "Found invalid error type; not saving files for that entry"
                    );
                    continue;
                }
            };

            let save_path = record
                .get(1)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from);
            if save_path.is_none() {
                warn!(file = source, tag, "Error type has no save path; chart will be displayed");
            }
            resolved.set(error_type, save_path);
        }

        if rows < ErrorType::SAVEABLE.len() {
            warn!(file = source, rows, "Save-path file should list both transl_cdf and orient_cdf");
        }
        debug!(?resolved, "Resolved chart save paths");

        resolved
    }

    /// Save path for `error_type`, if any.
    #[must_use]
    pub fn get(&self, error_type: ErrorType) -> Option<&Path> {
        match error_type {
            ErrorType::TranslCdf => self.transl_cdf.as_deref(),
            ErrorType::OrientCdf => self.orient_cdf.as_deref(),
            ErrorType::TranslAte | ErrorType::OrientAte => None,
        }
    }

    fn set(&mut self, error_type: ErrorType, path: Option<PathBuf>) {
        match error_type {
            ErrorType::TranslCdf => self.transl_cdf = path,
            ErrorType::OrientCdf => self.orient_cdf = path,
            ErrorType::TranslAte | ErrorType::OrientAte => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(table: &str) -> SavePaths {
        SavePaths::from_reader(table.as_bytes(), "inline.csv")
    }

    #[test]
    fn test_both_tags() {
        let paths = parse("transl_cdf,/tmp/t.png\norient_cdf,/tmp/o.png\n");
        assert_eq!(paths.get(ErrorType::TranslCdf), Some(Path::new("/tmp/t.png")));
        assert_eq!(paths.get(ErrorType::OrientCdf), Some(Path::new("/tmp/o.png")));
    }

    #[test]
    fn test_reversed_order() {
        let paths = parse("orient_cdf,/tmp/o.png\ntransl_cdf,/tmp/t.png\n");
        assert_eq!(paths.get(ErrorType::TranslCdf), Some(Path::new("/tmp/t.png")));
        assert_eq!(paths.get(ErrorType::OrientCdf), Some(Path::new("/tmp/o.png")));
    }

    #[test]
    fn test_invalid_tag_dropped() {
        let paths = parse("transl_cdf,/tmp/out.png\nbogus,/tmp/bogus.png\n");
        assert_eq!(paths.get(ErrorType::TranslCdf), Some(Path::new("/tmp/out.png")));
        assert_eq!(paths.get(ErrorType::OrientCdf), None);
    }

    #[test]
    fn test_ate_tag_not_saveable() {
        let paths = parse("transl_ate,/tmp/ate.png\norient_cdf,/tmp/o.png\n");
        assert_eq!(paths.get(ErrorType::TranslCdf), None);
        assert_eq!(paths.get(ErrorType::TranslAte), None);
        assert_eq!(paths.get(ErrorType::OrientCdf), Some(Path::new("/tmp/o.png")));
    }

    #[test]
    fn test_third_row_ignored() {
        let paths = parse("transl_cdf,/a.png\nbogus,/b.png\norient_cdf,/c.png\n");
        assert_eq!(paths.get(ErrorType::OrientCdf), None);
    }

    #[test]
    fn test_missing_path_column_displays() {
        let paths = parse("transl_cdf\norient_cdf,/tmp/o.png\n");
        assert_eq!(paths.get(ErrorType::TranslCdf), None);
        assert_eq!(paths.get(ErrorType::OrientCdf), Some(Path::new("/tmp/o.png")));
    }

    #[test]
    fn test_resolve_absent_path() {
        assert_eq!(SavePaths::resolve(None), SavePaths::display_all());
        assert_eq!(
            SavePaths::resolve(Some(Path::new(""))),
            SavePaths::display_all()
        );
        assert_eq!(
            SavePaths::resolve(Some(Path::new("/nonexistent/waypoint-eval/savepaths.csv"))),
            SavePaths::display_all()
        );
    }

    #[test]
    fn test_error_type_tags() {
        for t in [
            ErrorType::TranslCdf,
            ErrorType::OrientCdf,
            ErrorType::TranslAte,
            ErrorType::OrientAte,
        ] {
            assert_eq!(t.tag().parse::<ErrorType>().unwrap(), t);
        }
        assert_eq!(ErrorType::TranslAte.rmse_axis_label(), "RMSE (m)");
        assert_eq!(ErrorType::OrientAte.rmse_axis_label(), "RMSE (deg)");
    }
}
