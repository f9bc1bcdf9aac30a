//! Widget construction configuration.

use crate::errors::InvalidConfigurationError;
use serde_json::{Map, Value};

/// The reserved key naming the concrete widget class.
pub const CLASS_KEY: &str = "class";

/// Name-value pairs used to select a widget class and initialise its fields.
///
/// The class is kept apart from the field assignments so that it can be
/// forced by `begin`/`widget` without touching the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetConfig {
    class: Option<String>,
    fields: Map<String, Value>,
}

impl WidgetConfig {
    /// Creates an empty configuration with no class.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration naming only a class.
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            fields: Map::new(),
        }
    }

    /// Parses a configuration from a JSON value.
    ///
    /// A string is a bare class name. An object may carry a `class` entry;
    /// every other entry becomes a field assignment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfigurationError` for any other JSON type, or when
    /// the `class` entry is present but not a string.
    pub fn from_value(value: Value) -> Result<Self, InvalidConfigurationError> {
        match value {
            Value::String(class) => Ok(Self::class(class)),
            Value::Object(mut fields) => {
                let class = match fields.remove(CLASS_KEY) {
                    None => None,
                    Some(Value::String(class)) => Some(class),
                    Some(other) => return Err(InvalidConfigurationError::class_not_string(&other)),
                };
                Ok(Self { class, fields })
            }
            other => Err(InvalidConfigurationError::unsupported_shape(&other)),
        }
    }

    /// Sets the class, replacing any previous value.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Adds a field assignment.
    ///
    /// Using the reserved `class` key sets the class instead, when the value
    /// is a string.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Adds a field assignment in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if key == CLASS_KEY {
            if let Value::String(class) = value {
                self.class = Some(class);
                return;
            }
        }
        self.fields.insert(key, value);
    }

    /// Returns the class name, if any.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Returns the class name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfigurationError` when no class was given.
    pub fn require_class(&self) -> Result<&str, InvalidConfigurationError> {
        self.class_name().ok_or_else(InvalidConfigurationError::missing_class)
    }

    /// Gets a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the field assignments, excluding the class.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns the number of field assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no field assignments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Splits into the class and field assignments.
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, Map<String, Value>) {
        (self.class, self.fields)
    }
}

impl From<&str> for WidgetConfig {
    fn from(class: &str) -> Self {
        Self::class(class)
    }
}

impl From<String> for WidgetConfig {
    fn from(class: String) -> Self {
        Self::class(class)
    }
}

impl TryFrom<Map<String, Value>> for WidgetConfig {
    type Error = InvalidConfigurationError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_value(Value::Object(fields))
    }
}

impl TryFrom<Value> for WidgetConfig {
    type Error = InvalidConfigurationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}
