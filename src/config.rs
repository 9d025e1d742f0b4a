//! # Engine Configuration
//!
//! Options for the full [`crate::render`] pipeline, read from YAML.
//!
//! ```yaml
//! transpose: -2
//! legacy-wrap: true
//! wrap-width: 32
//! detect-links: false
//! place-markers: true
//! marker:
//!   height: 20
//!   padding: 3
//!   gap: 6
//!   raise-factor: 0.3
//! grid:
//!   cell-width: 9
//!   line-height: 40
//! ```
//!
//! Every key is optional. Unknown keys are rejected so typos surface as errors
//! instead of being silently ignored.

use crate::error::TabError;
use crate::layout::{GridConfig, MarkerConfig};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WRAP_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Half steps applied to every chord before annotation.
    pub transpose: i32,
    /// Also produce fixed-width wrapped lines for each tab block.
    pub legacy_wrap: bool,
    pub wrap_width: usize,
    pub detect_links: bool,
    /// Place chord markers over each block on a fixed-width grid.
    pub place_markers: bool,
    pub marker: MarkerConfig,
    pub grid: GridConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transpose: 0,
            legacy_wrap: false,
            wrap_width: DEFAULT_WRAP_WIDTH,
            detect_links: true,
            place_markers: false,
            marker: MarkerConfig::default(),
            grid: GridConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a YAML document. An empty document yields the defaults.
    ///
    /// # Errors
    /// Returns [`TabError::ConfigError`] for malformed YAML, unknown keys or
    /// values of the wrong type.
    pub fn from_yaml(content: &str) -> Result<Self, TabError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: EngineConfig =
            serde_yaml::from_str(content).map_err(|e| TabError::ConfigError(e.to_string()))?;
        Ok(config.normalized())
    }

    pub fn to_yaml(&self) -> Result<String, TabError> {
        serde_yaml::to_string(self).map_err(|e| TabError::ConfigError(e.to_string()))
    }

    /// Clamp values the engine cannot work with.
    pub fn normalized(mut self) -> Self {
        if self.wrap_width < 1 {
            log::warn!("wrap-width {} is below 1, using 1", self.wrap_width);
            self.wrap_width = 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_yaml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.wrap_width, 40);
        assert!(config.detect_links);
        assert_eq!(config.marker.raise_factor, 0.25);
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
transpose: -2
legacy-wrap: true
wrap-width: 32
detect-links: false
place-markers: true
marker:
  height: 20
  padding: 1
  gap: 6
  raise-factor: 0.5
grid:
  cell-width: 8
  line-height: 30
"#;
        let config = EngineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.transpose, -2);
        assert!(config.legacy_wrap);
        assert_eq!(config.wrap_width, 32);
        assert!(!config.detect_links);
        assert!(config.place_markers);
        assert_eq!(
            config.grid,
            GridConfig {
                cell_width: 8.0,
                line_height: 30.0,
            }
        );
        assert_eq!(
            config.marker,
            MarkerConfig {
                height: 20.0,
                padding: 1.0,
                gap: 6.0,
                raise_factor: 0.5,
            }
        );
    }

    #[test]
    fn test_partial_marker_keeps_defaults() {
        let config = EngineConfig::from_yaml("marker:\n  gap: 10\n").unwrap();
        assert_eq!(config.marker.gap, 10.0);
        assert_eq!(config.marker.height, 24.0);
    }

    #[test]
    fn test_zero_width_clamped() {
        let config = EngineConfig::from_yaml("wrap-width: 0").unwrap();
        assert_eq!(config.wrap_width, 1);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = EngineConfig::from_yaml("wrap_widht: 10").unwrap_err();
        assert!(matches!(err, TabError::ConfigError(_)));
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(EngineConfig::from_yaml("transpose: up").is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = EngineConfig {
            transpose: 3,
            legacy_wrap: true,
            ..EngineConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(EngineConfig::from_yaml(&yaml).unwrap(), config);
    }
}
