//! JSON metrics reader
//!
//! Metrics files are JSON documents. Pose-error tools commonly emit infinity
//! as a string (`"inf"`, `".inf"`, `"Infinity"`), since JSON has no literal for
//! it, so every numeric field accepts those spellings too.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use super::{ApproachMetrics, MetricsReader};
use crate::{Error, Result};

/// Reads [`ApproachMetrics`] from JSON metrics files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonMetricsReader;

impl JsonMetricsReader {
    /// Parse metrics from an in-memory JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetricsFile`] if the document does not match the schema.
    pub fn parse_str(source: &str, json: &str) -> Result<ApproachMetrics> {
        serde_json::from_str(json).map_err(|e| Error::MetricsFile {
            path: source.to_string(),
            reason: e.to_string(),
        })
    }
}

impl MetricsReader for JsonMetricsReader {
    fn read(&self, path: &Path) -> Result<ApproachMetrics> {
        let file = File::open(path).map_err(|e| Error::MetricsFile {
            path: path.display().to_string(),
            reason: format!("Failed to open: {e}"),
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::MetricsFile {
            path: path.display().to_string(),
            reason: format!("Failed to parse: {e}"),
        })
    }
}

/// A numeric field as it appears on disk.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSample {
    Number(f64),
    Text(String),
}

impl RawSample {
    fn into_f64<E: de::Error>(self) -> std::result::Result<f64, E> {
        match self {
            Self::Number(v) => Ok(v),
            Self::Text(text) => parse_special(&text)
                .ok_or_else(|| E::custom(format!("expected a number or infinity, got '{text}'"))),
        }
    }
}

fn parse_special(text: &str) -> Option<f64> {
    match text.trim().to_ascii_lowercase().as_str() {
        "inf" | "+inf" | ".inf" | "+.inf" | "infinity" | "+infinity" => Some(f64::INFINITY),
        "-inf" | "-.inf" | "-infinity" => Some(f64::NEG_INFINITY),
        "nan" | ".nan" => Some(f64::NAN),
        other => other.parse().ok(),
    }
}

pub(super) fn deserialize_sample<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    RawSample::deserialize(deserializer)?.into_f64()
}

pub(super) fn deserialize_samples<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<RawSample>::deserialize(deserializer)?
        .into_iter()
        .map(RawSample::into_f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS_JSON: &str = r#"{
        "sequence_metrics": {
            "all_translation_deviations": [0.5, "inf", 1.25],
            "all_rotation_deviations": [0.01, ".inf"],
            "ate_results": { "rmse_transl_err": 2.0, "rmse_rot_err": "Infinity" }
        },
        "indiv_trajectory_metrics": [
            { "ate_results": { "rmse_transl_err": 1.0, "rmse_rot_err": 0.1 } },
            { "ate_results": { "rmse_transl_err": "inf", "rmse_rot_err": 0.2 } }
        ]
    }"#;

    #[test]
    fn test_parse_infinity_spellings() {
        let metrics = JsonMetricsReader::parse_str("inline", METRICS_JSON).unwrap();
        let seq = metrics.sequence_metrics();

        assert_eq!(seq.all_translation_deviations(), &[0.5, f64::INFINITY, 1.25]);
        assert_eq!(seq.all_rotation_deviations(), &[0.01, f64::INFINITY]);
        assert!(seq.ate_results().rmse_rot_err().is_infinite());
        assert_eq!(metrics.trajectory_transl_rmses(), vec![1.0, f64::INFINITY]);
    }

    #[test]
    fn test_parse_special_tokens() {
        assert_eq!(parse_special("INF"), Some(f64::INFINITY));
        assert_eq!(parse_special(" -Infinity "), Some(f64::NEG_INFINITY));
        assert!(parse_special("nan").is_some_and(f64::is_nan));
        assert_eq!(parse_special("3.5"), Some(3.5));
        assert_eq!(parse_special("lost"), None);
    }

    #[test]
    fn test_missing_trajectories_defaults_empty() {
        let json = r#"{
            "sequence_metrics": {
                "all_translation_deviations": [],
                "all_rotation_deviations": [],
                "ate_results": { "rmse_transl_err": 0.0, "rmse_rot_err": 0.0 }
            }
        }"#;
        let metrics = JsonMetricsReader::parse_str("inline", json).unwrap();
        assert!(metrics.trajectory_metrics().is_empty());
    }

    #[test]
    fn test_bad_token_names_source() {
        let json = METRICS_JSON.replace("\"inf\", 1.25", "\"lost\", 1.25");
        let err = JsonMetricsReader::parse_str("approach.json", &json).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("approach.json"));
        assert!(msg.contains("lost"));
    }
}
