//! Analysis configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use wst_graph::DEFAULT_PARTICIPANTS;
use wst_sketch::{HyperLogLog, DEFAULT_PRECISION};
use wst_utils::LogFormat;

use crate::MetricsError;

/// How anonsets are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnonsetMode {
    /// One walk per mix. Exact, quadratic on long-lived pools.
    Exact,
    /// One pass over mergeable sketches.
    #[default]
    Streaming,
}

impl FromStr for AnonsetMode {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "streaming" => Ok(Self::Streaming),
            other => Err(MetricsError::Config(format!(
                "unknown mode {other:?} (expected \"exact\" or \"streaming\")"
            ))),
        }
    }
}

impl fmt::Display for AnonsetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exact => "exact",
            Self::Streaming => "streaming",
        })
    }
}

/// Configuration of an analysis run.
///
/// Can be loaded from a TOML file via [`AnalysisConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Directory holding the snapshot CSVs.
    #[serde(default = "default_snapshots_dir")]
    pub snapshots_dir: PathBuf,

    /// Where result CSVs are written. Falls back to `snapshots_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    /// Outputs of a standard mix.
    #[serde(default = "default_participants")]
    pub participants: u32,

    #[serde(default)]
    pub mode: AnonsetMode,

    /// HyperLogLog register-index bits.
    #[serde(default = "default_sketch_precision")]
    pub sketch_precision: u8,

    /// Rounds between progress log lines.
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_snapshots_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

fn default_participants() -> u32 {
    DEFAULT_PARTICIPANTS
}

fn default_sketch_precision() -> u8 {
    DEFAULT_PRECISION
}

fn default_progress_every() -> usize {
    1000
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AnalysisConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, MetricsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MetricsError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, MetricsError> {
        toml::from_str(s).map_err(|e| MetricsError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, MetricsError> {
        toml::to_string_pretty(self).map_err(|e| MetricsError::Config(e.to_string()))
    }

    pub fn export_dir(&self) -> &Path {
        self.export_dir.as_deref().unwrap_or(&self.snapshots_dir)
    }

    /// Empty sketch at the configured precision.
    pub fn sketch(&self) -> Result<HyperLogLog, MetricsError> {
        Ok(HyperLogLog::new(self.sketch_precision)?)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            snapshots_dir: default_snapshots_dir(),
            export_dir: None,
            participants: default_participants(),
            mode: AnonsetMode::default(),
            sketch_precision: default_sketch_precision(),
            progress_every: default_progress_every(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AnalysisConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = AnalysisConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = AnalysisConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.snapshots_dir, PathBuf::from("/tmp"));
        assert_eq!(config.participants, 5);
        assert_eq!(config.mode, AnonsetMode::Streaming);
        assert_eq!(config.sketch_precision, 14);
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            snapshots_dir = "/data/whirlpool"
            mode = "exact"
            log_format = "json"
        "#;
        let config = AnalysisConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.mode, AnonsetMode::Exact);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.progress_every, 1000); // default
        assert_eq!(config.export_dir(), Path::new("/data/whirlpool"));
    }

    #[test]
    fn export_dir_overrides_snapshots_dir() {
        let config = AnalysisConfig::from_toml_str("export_dir = \"/out\"").unwrap();
        assert_eq!(config.export_dir(), Path::new("/out"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(AnalysisConfig::from_toml_str("mode = \"fast\"").is_err());
        assert!("fast".parse::<AnonsetMode>().is_err());
        assert_eq!("EXACT".parse::<AnonsetMode>().unwrap(), AnonsetMode::Exact);
    }

    #[test]
    fn out_of_range_precision_fails_on_sketch() {
        let config = AnalysisConfig {
            sketch_precision: 30,
            ..Default::default()
        };
        assert!(matches!(config.sketch(), Err(MetricsError::Sketch(_))));
        assert_eq!(AnalysisConfig::default().sketch().unwrap().precision(), 14);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wst.toml");
        std::fs::write(&path, "participants = 7\n").unwrap();
        let config = AnalysisConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.participants, 7);

        let missing = AnalysisConfig::from_toml_file(dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(MetricsError::Config(_))));
    }
}
