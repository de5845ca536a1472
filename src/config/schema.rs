//! Configuration schema for `config.yml`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dynamic::DetectorLimits;
use crate::report::OutputFormat;

/// Root of a pitfall configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitfallConfig {
    pub output: OutputSettings,
    pub limits: ScanLimits,
    pub detection: DetectionSettings,
    /// Registry file replacing the embedded registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,
}

/// How results are rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

/// Bounds on how much of a project is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanLimits {
    pub max_source_files: usize,
    pub max_config_files: usize,
    pub max_depth: usize,
    /// README characters included per tool in a supplementary prompt.
    pub readme_excerpt_chars: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        let detector = DetectorLimits::default();
        Self {
            max_source_files: detector.max_source_files,
            max_config_files: detector.max_config_files,
            max_depth: detector.max_depth,
            readme_excerpt_chars: 1000,
        }
    }
}

/// Detection switches and thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Minimum dynamic detection confidence to report a framework.
    pub confidence_threshold: f32,
    pub agents: bool,
    /// Probe registry default ports on localhost.
    pub probe_services: bool,
    pub probe_timeout_ms: u64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: DetectorLimits::default().confidence_threshold,
            agents: true,
            probe_services: false,
            probe_timeout_ms: 200,
        }
    }
}

impl PitfallConfig {
    /// Detector limits from the scan and detection settings.
    pub fn detector_limits(&self) -> DetectorLimits {
        DetectorLimits {
            max_source_files: self.limits.max_source_files,
            max_config_files: self.limits.max_config_files,
            max_depth: self.limits.max_depth,
            confidence_threshold: self.detection.confidence_threshold,
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.detection.probe_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: PitfallConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, PitfallConfig::default());
        assert_eq!(config.limits.max_source_files, 50);
        assert_eq!(config.limits.max_config_files, 30);
        assert_eq!(config.limits.readme_excerpt_chars, 1000);
        assert!(!config.detection.probe_services);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = r#"
output:
  format: json
limits:
  max_depth: 3
detection:
  confidence_threshold: 0.25
"#;
        let config: PitfallConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.color);

        let limits = config.detector_limits();
        assert_eq!(limits.max_depth, 3);
        assert_eq!(limits.max_source_files, 50);
        assert!((limits.confidence_threshold - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn probe_timeout_in_millis() {
        let mut config = PitfallConfig::default();
        config.detection.probe_timeout_ms = 50;
        assert_eq!(config.probe_timeout(), Duration::from_millis(50));
    }
}
