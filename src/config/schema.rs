//! Configuration schema types for `linesign.toml`
//!
//! Defines the structure and validation rules for sign generation settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::compose::LayoutPolicy;

/// Largest accepted tile size in pixels.
pub const MAX_CELL_SIZE: u32 = 4096;

/// Input, asset and output locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Line description file
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Directory holding the tile PNGs
    #[serde(default = "default_assets")]
    pub assets: PathBuf,
    /// Directory rendered signs are written to
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { input: default_input(), assets: default_assets(), out: default_out() }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from("stations.txt")
}

fn default_assets() -> PathBuf {
    PathBuf::from("images")
}

fn default_out() -> PathBuf {
    PathBuf::from("output")
}

/// Render settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Worker threads for rendering; `None` uses all cores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

/// Complete `linesign.toml` configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub layout: LayoutPolicy,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "layout.cell_size")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "linesign.toml: '{}' {}", self.field, self.message)
    }
}

impl SignConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let layout = &self.layout;

        if layout.cell_size == 0 {
            errors.push(ConfigValidationError {
                field: "layout.cell_size".to_string(),
                message: "must be a positive integer".to_string(),
            });
        } else if layout.cell_size > MAX_CELL_SIZE {
            errors.push(ConfigValidationError {
                field: "layout.cell_size".to_string(),
                message: format!("must be at most {}", MAX_CELL_SIZE),
            });
        }

        if layout.detailed_length == 0 {
            errors.push(ConfigValidationError {
                field: "layout.detailed_length".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        // The boundary variant shortens the row by one cell
        if layout.compact_length < 2 {
            errors.push(ConfigValidationError {
                field: "layout.compact_length".to_string(),
                message: "must be at least 2".to_string(),
            });
        }

        if layout.compact_boundary_max_stations >= layout.compact_length {
            errors.push(ConfigValidationError {
                field: "layout.compact_boundary_max_stations".to_string(),
                message: format!(
                    "must be less than layout.compact_length ({})",
                    layout.compact_length
                ),
            });
        }

        if self.render.jobs == Some(0) {
            errors.push(ConfigValidationError {
                field: "render.jobs".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SignConfig::default();
        assert!(config.is_valid(), "{:?}", config.validate());
        assert_eq!(config.project.input, PathBuf::from("stations.txt"));
        assert_eq!(config.project.assets, PathBuf::from("images"));
        assert_eq!(config.project.out, PathBuf::from("output"));
        assert_eq!(config.layout, LayoutPolicy::default());
    }

    #[test]
    fn test_parse_partial_layout_keeps_defaults() {
        let config: SignConfig = toml::from_str("[layout]\ncell_size = 64\n").unwrap();
        assert_eq!(config.layout.cell_size, 64);
        assert_eq!(config.layout.detailed_length, 20);
        assert_eq!(config.layout.compact_length, 15);
        assert_eq!(config.layout.compact_boundary_max_stations, 14);
    }

    #[test]
    fn test_parse_empty_document() {
        let config: SignConfig = toml::from_str("").unwrap();
        assert_eq!(config, SignConfig::default());
    }

    #[test]
    fn test_validate_reports_each_field() {
        let mut config = SignConfig::default();
        config.layout.cell_size = 0;
        config.layout.detailed_length = 0;
        config.layout.compact_length = 1;
        config.render.jobs = Some(0);

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "layout.cell_size",
                "layout.detailed_length",
                "layout.compact_length",
                "layout.compact_boundary_max_stations",
                "render.jobs",
            ]
        );
    }

    #[test]
    fn test_validate_caps_cell_size() {
        let mut config = SignConfig::default();
        config.layout.cell_size = MAX_CELL_SIZE;
        assert!(config.is_valid());

        config.layout.cell_size = MAX_CELL_SIZE + 1;
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "layout.cell_size");
        assert!(errors[0].message.contains("4096"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "layout.cell_size".to_string(),
            message: "must be a positive integer".to_string(),
        };
        assert_eq!(err.to_string(), "linesign.toml: 'layout.cell_size' must be a positive integer");
    }
}
