#![forbid(unsafe_code)]

//! Configuration for the whole interaction stack.
//!
//! [`TaskdeckConfig`] groups every tunable (gesture thresholds, drag and
//! dissolve timing, stack and toast geometry) into one struct that loads from
//! TOML or JSON. Every section is optional; a missing field keeps its default.
//!
//! ```toml
//! [gesture]
//! drag_threshold = 5.0
//!
//! [drag]
//! snap_back = 200
//!
//! [dissolve]
//! duration = 1200
//! cell_size = 2.0
//!
//! [panel]
//! dissolve_duration = 700
//! ```
//!
//! Durations are integer milliseconds.

use std::path::Path;

use serde::{Deserialize, Serialize};
use taskdeck_core::gesture::GestureConfig;
use taskdeck_core::swipe::SwipeConfig;
use taskdeck_fx::DissolveConfig;
use taskdeck_layout::{StackConfig, ToastConfig};

use crate::drag::DragConfig;
use crate::panel::PanelConfig;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskdeckConfig {
    pub gesture: GestureConfig,
    pub swipe: SwipeConfig,
    pub drag: DragConfig,
    pub dissolve: DissolveConfig,
    pub stack: StackConfig,
    pub toast: ToastConfig,
    pub panel: PanelConfig,
}

impl TaskdeckConfig {
    /// Parse from a TOML string without validating.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse from a JSON string without validating.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load a file, picking the format from its extension (`.json` is JSON,
    /// anything else TOML), and reject it if validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path)?,
            _ => Self::from_toml_file(path)?,
        };
        config.validated()
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            tracing::debug!(target: "taskdeck.config", "configuration accepted");
            Ok(self)
        } else {
            tracing::warn!(target: "taskdeck.config", count = errors.len(), "configuration rejected");
            Err(ConfigError::Validation(errors))
        }
    }

    /// Every problem across all sections; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.gesture.drag_threshold >= 0.0) {
            errors.push(format!(
                "gesture.drag_threshold must be >= 0, got {}",
                self.gesture.drag_threshold
            ));
        }

        if !(self.swipe.click_threshold >= 0.0) {
            errors.push(format!(
                "swipe.click_threshold must be >= 0, got {}",
                self.swipe.click_threshold
            ));
        }
        if self.swipe.dismiss_distance < self.swipe.click_threshold {
            errors.push("swipe.dismiss_distance must be >= click_threshold".into());
        }
        if !(self.swipe.dismiss_velocity > 0.0) {
            errors.push(format!(
                "swipe.dismiss_velocity must be > 0, got {}",
                self.swipe.dismiss_velocity
            ));
        }

        errors.extend(self.dissolve.validate());
        errors.extend(self.stack.validate());
        errors.extend(self.toast.validate());

        if self.panel.dissolve_duration.is_zero() {
            errors.push("panel.dissolve_duration must be > 0".into());
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
    /// Parsed, but out of range.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_time::Duration;

    #[test]
    fn defaults_are_valid() {
        assert!(TaskdeckConfig::default().validate().is_empty());
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = TaskdeckConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, TaskdeckConfig::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let cfg = TaskdeckConfig::from_toml_str(
            r#"
            [gesture]
            drag_threshold = 8.0

            [drag]
            snap_back = 150

            [toast]
            visible_toasts = 4
            "#,
        )
        .unwrap();
        assert_eq!(cfg.gesture.drag_threshold, 8.0);
        assert_eq!(cfg.drag.snap_back, Duration::from_millis(150));
        assert_eq!(cfg.toast.visible_toasts, 4);
        assert_eq!(cfg.toast.gap, 6.0);
        assert_eq!(cfg.dissolve, DissolveConfig::default());
    }

    #[test]
    fn json_sections() {
        let cfg = TaskdeckConfig::from_json_str(
            r#"{"panel": {"dissolve_duration": 900}, "swipe": {"dismiss_distance": 120.0}}"#,
        )
        .unwrap();
        assert_eq!(cfg.panel.dissolve_duration, Duration::from_millis(900));
        assert_eq!(cfg.swipe.dismiss_distance, 120.0);
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut cfg = TaskdeckConfig::default();
        cfg.gesture.drag_threshold = -1.0;
        cfg.swipe.dismiss_velocity = 0.0;
        cfg.dissolve.cell_size = 0.0;
        cfg.panel.dissolve_duration = Duration::ZERO;
        let errors = cfg.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");

        match cfg.validated() {
            Err(ConfigError::Validation(v)) => assert_eq!(v.len(), 4),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn parse_errors_are_typed() {
        assert!(matches!(
            TaskdeckConfig::from_toml_str("[gesture\n"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            TaskdeckConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
        let err = TaskdeckConfig::from_toml_file("/nonexistent/taskdeck.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
