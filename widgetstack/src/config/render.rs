//! Per-render settings.

use crate::errors::{InvalidConfigurationError, WidgetError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with configuration keys that name no field of the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Skip the key silently.
    #[default]
    Ignore,
    /// Fail construction with `InvalidConfiguration`.
    Reject,
}

/// Settings for a single render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Handling of unknown configuration keys.
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
    /// Prefix for auto-generated widget ids.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

fn default_id_prefix() -> String {
    "w".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::default(),
            id_prefix: default_id_prefix(),
        }
    }
}

impl RenderConfig {
    /// Creates a new render configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unknown field policy.
    #[must_use]
    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Rejects unknown configuration keys.
    #[must_use]
    pub fn strict(self) -> Self {
        self.with_unknown_fields(UnknownFieldPolicy::Reject)
    }

    /// Sets the widget id prefix.
    #[must_use]
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, WidgetError> {
        serde_json::from_str(json).map_err(|e| {
            InvalidConfigurationError::new(format!("Malformed render configuration: {e}")).into()
        })
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `InvalidConfiguration` if
    /// its contents are malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WidgetError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
