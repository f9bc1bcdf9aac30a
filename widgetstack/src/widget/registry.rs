//! Registry resolving class names to widget constructors.

use super::{Widget, WidgetClass};
use crate::errors::{InvalidConfigurationError, WidgetError};
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Factory function type for creating widgets.
pub type WidgetFactory = Arc<dyn Fn() -> Box<dyn Widget> + Send + Sync>;

#[allow(clippy::expect_used)]
static CLASS_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:(?:\\|::)[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("class name pattern is valid")
});

/// Checks that `class` is a well-formed class identifier.
///
/// Namespaced names may use either `\` or `::` as the separator.
#[must_use]
pub fn is_valid_class_name(class: &str) -> bool {
    CLASS_NAME.is_match(class)
}

/// Registry of widget factories keyed by class name.
///
/// A registry is typically populated once at startup and then shared by
/// every render context through an `Arc`.
#[derive(Default)]
pub struct WidgetRegistry {
    factories: RwLock<HashMap<String, WidgetFactory>>,
}

impl WidgetRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a widget type under its class name.
    ///
    /// Registering the same class again replaces the previous factory.
    pub fn register<T: WidgetClass>(&self) {
        let factory: WidgetFactory = Arc::new(|| Box::new(T::default()) as Box<dyn Widget>);
        self.factories.write().insert(T::CLASS.to_string(), factory);
    }

    /// Registers a custom factory under `class`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `class` is not a well-formed class
    /// identifier.
    pub fn register_factory(
        &self,
        class: impl Into<String>,
        factory: WidgetFactory,
    ) -> Result<(), WidgetError> {
        let class = class.into();
        if !is_valid_class_name(&class) {
            return Err(InvalidConfigurationError::invalid_class_name(class).into());
        }
        self.factories.write().insert(class, factory);
        Ok(())
    }

    /// Checks if a class is registered.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.factories.read().contains_key(class)
    }

    /// Creates the default instance of a registered class.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the class is not registered.
    pub fn instantiate(&self, class: &str) -> Result<Box<dyn Widget>, WidgetError> {
        // Clone the factory out so user code never runs under the lock.
        let factory = self
            .factories
            .read()
            .get(class)
            .cloned()
            .ok_or_else(|| InvalidConfigurationError::unknown_class(class))?;
        Ok(factory())
    }

    /// Lists registered class names, sorted.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self.factories.read().keys().cloned().collect();
        classes.sort();
        classes
    }

    /// Returns the number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }

    /// Clears all registrations.
    pub fn clear(&self) {
        self.factories.write().clear();
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("classes", &self.classes())
            .finish()
    }
}
