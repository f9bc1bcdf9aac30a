//! Error types for widget construction and nesting.
//!
//! Every error raised by this crate signals a programmer mistake at the call
//! site (a malformed configuration, or begin/end calls that do not pair up).
//! None of them are meant to be caught and retried.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Error code for configuration failures.
pub const CODE_INVALID_CONFIGURATION: &str = "WIDGET-001-CONFIG";
/// Error code for `end()` calls with no open widget.
pub const CODE_UNBALANCED_NESTING: &str = "WIDGET-002-UNBALANCED";
/// Error code for `end()` calls closing the wrong widget.
pub const CODE_MISMATCHED_NESTING: &str = "WIDGET-003-MISMATCH";
/// Error code for failures reported by a widget itself.
pub const CODE_RUN_FAILED: &str = "WIDGET-004-RUN";
/// Error code for output sink failures.
pub const CODE_IO: &str = "WIDGET-005-IO";

/// The main error type for widget operations.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The configuration could not be turned into a widget.
    #[error("{0}")]
    InvalidConfiguration(#[from] InvalidConfigurationError),

    /// `end()` was called with no matching `begin()`, or a render finished
    /// with widgets still open.
    #[error("{0}")]
    UnbalancedNesting(#[from] UnbalancedNestingError),

    /// `end()` was called for a different widget than the one currently open.
    #[error("{0}")]
    MismatchedNesting(#[from] MismatchedNestingError),

    /// A widget's `init` or `run` reported a failure.
    #[error("Widget run failed: {class} - {reason}")]
    Run {
        /// The widget class.
        class: String,
        /// The reason for failure.
        reason: String,
    },

    /// IO error from an output sink.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WidgetError {
    /// Creates a run failure for the given widget class.
    #[must_use]
    pub fn run_failed(class: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Run {
            class: class.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => CODE_INVALID_CONFIGURATION,
            Self::UnbalancedNesting(_) => CODE_UNBALANCED_NESTING,
            Self::MismatchedNesting(_) => CODE_MISMATCHED_NESTING,
            Self::Run { .. } => CODE_RUN_FAILED,
            Self::Io(_) => CODE_IO,
        }
    }

    /// True for the nesting errors, which leave no safe way to continue the
    /// current render.
    #[must_use]
    pub const fn is_nesting_error(&self) -> bool {
        matches!(self, Self::UnbalancedNesting(_) | Self::MismatchedNesting(_))
    }

    /// Builds diagnostic info for this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        let info = ErrorInfo::new(self.code(), self.to_string());
        match self {
            Self::InvalidConfiguration(err) => {
                let mut info = info.with_fix_hint(
                    "Pass a string class name, or a mapping with a string 'class' entry \
                     naming a registered widget.",
                );
                if let Some(ref class) = err.class {
                    info = info.with_context_entry("class", class);
                }
                if let Some(ref field) = err.field {
                    info = info.with_context_entry("field", field);
                }
                info
            }
            Self::UnbalancedNesting(err) => {
                let mut info = info
                    .with_fix_hint("Make sure every end() call is preceded by a matching begin().");
                if let Some(ref class) = err.class {
                    info = info.with_context_entry("class", class);
                }
                if !err.open.is_empty() {
                    info = info.with_context_entry("open", err.open.join(","));
                }
                info
            }
            Self::MismatchedNesting(err) => info
                .with_fix_hint("Close widgets in the reverse order they were opened.")
                .with_context_entry("expected", &err.expected)
                .with_context_entry("found", &err.found),
            Self::Run { class, .. } => info.with_context_entry("class", class),
            Self::Io(_) => info,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        self.error_info().to_dict()
    }
}

/// Diagnostic metadata about an error.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Error code (e.g., "WIDGET-003-MISMATCH").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::Value::String(self.code.clone()));
        map.insert("summary".to_string(), serde_json::Value::String(self.summary.clone()));

        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::Value::String(hint.clone()));
        }
        if !self.context.is_empty() {
            let context_map: serde_json::Map<String, serde_json::Value> = self
                .context
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            map.insert("context".to_string(), serde_json::Value::Object(context_map));
        }

        map
    }
}

/// Error raised when a configuration cannot produce a widget.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid configuration: {message}")]
pub struct InvalidConfigurationError {
    /// The error message.
    pub message: String,
    /// The class involved, when known.
    pub class: Option<String>,
    /// The field involved, when known.
    pub field: Option<String>,
}

impl InvalidConfigurationError {
    /// Creates a new invalid configuration error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            class: None,
            field: None,
        }
    }

    /// Sets the class involved.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Sets the field involved.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// The mapping has no `class` entry.
    #[must_use]
    pub fn missing_class() -> Self {
        Self::new("Object configuration must be an array containing a \"class\" element.")
    }

    /// The `class` entry is not a string.
    #[must_use]
    pub fn class_not_string(found: &serde_json::Value) -> Self {
        Self::new(format!("The \"class\" element must be a string, found {found}"))
    }

    /// The configuration is neither a class name nor a mapping.
    #[must_use]
    pub fn unsupported_shape(found: &serde_json::Value) -> Self {
        Self::new(format!("Unsupported configuration type: {found}"))
    }

    /// No widget is registered under the class name.
    #[must_use]
    pub fn unknown_class(class: impl Into<String>) -> Self {
        let class = class.into();
        Self::new(format!("Failed to instantiate \"{class}\": class is not registered"))
            .with_class(class)
    }

    /// The class name is not a well-formed identifier.
    #[must_use]
    pub fn invalid_class_name(class: impl Into<String>) -> Self {
        let class = class.into();
        Self::new(format!("Invalid class name \"{class}\"")).with_class(class)
    }

    /// A key does not name a field of the class (strict policy only).
    #[must_use]
    pub fn unknown_field(class: impl Into<String>, field: impl Into<String>) -> Self {
        let class = class.into();
        let field = field.into();
        Self::new(format!("Setting unknown property: {class}::{field}"))
            .with_class(class)
            .with_field(field)
    }

    /// A value has the wrong shape for its field.
    #[must_use]
    pub fn invalid_field(
        class: impl Into<String>,
        field: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        let class = class.into();
        let field = field.into();
        Self::new(format!("Invalid value for {class}::{field}: {reason}"))
            .with_class(class)
            .with_field(field)
    }
}

/// Error raised when `end()` finds no open widget, or when a render finishes
/// with widgets still open.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct UnbalancedNestingError {
    /// The error message.
    pub message: String,
    /// The class whose `end()` was called, if any.
    pub class: Option<String>,
    /// Classes still open, innermost last.
    pub open: Vec<String>,
}

impl UnbalancedNestingError {
    /// `end()` was called on an empty stack.
    #[must_use]
    pub fn unexpected_end(class: impl Into<String>) -> Self {
        let class = class.into();
        Self {
            message: format!("Unexpected {class}::end() call. A matching begin() is not found."),
            class: Some(class),
            open: Vec::new(),
        }
    }

    /// A render finished while widgets were still open.
    #[must_use]
    pub fn left_open(open: Vec<String>) -> Self {
        Self {
            message: format!(
                "Each begin() should have a matching end() call. Still open: {}",
                open.join(", ")
            ),
            class: None,
            open,
        }
    }
}

/// Error raised when `end()` closes a different widget than the one open.
///
/// By the time this error is returned the open widget has already been
/// removed from the stack.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Expecting end() of {expected}, found {found}")]
pub struct MismatchedNestingError {
    /// The class that was open at the top of the stack.
    pub expected: String,
    /// The class whose `end()` was called.
    pub found: String,
}

impl MismatchedNestingError {
    /// Creates a new mismatched nesting error.
    #[must_use]
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
