//! Widget trait and configuration binding.
//!
//! A widget is a unit of renderable content. It can be used as a block
//! (`begin` ... `end`) or inline (`widget`). Construction always follows the
//! same steps. The type's default value is created, each configuration
//! entry is offered to [`Widget::set_field`], and then [`Widget::init`] runs.

mod registry;

pub use registry::{is_valid_class_name, WidgetFactory, WidgetRegistry};

use crate::config::UnknownFieldPolicy;
use crate::context::RenderContext;
use crate::errors::{InvalidConfigurationError, WidgetError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt::Debug;
use tracing::debug;

/// Outcome of offering a configuration entry to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// The key named a field and the value was stored.
    Assigned,
    /// The key names no field on this widget.
    Unknown,
}

/// Result of a single field assignment.
///
/// A deserialization error means the key named a field but the value had the
/// wrong shape.
pub type FieldResult = Result<FieldStatus, serde_json::Error>;

/// Trait for widgets.
pub trait Widget: Debug {
    /// Assigns a configuration value to the field called `name`.
    ///
    /// Implementations match on the names they expose and delegate to
    /// [`assign`]. Every other name must return `Ok(FieldStatus::Unknown)`.
    fn set_field(&mut self, name: &str, value: Value) -> FieldResult;

    /// Called once after all configuration has been applied.
    fn init(&mut self) -> Result<(), WidgetError> {
        Ok(())
    }

    /// Renders the widget.
    ///
    /// Content may be written to the context's output channel as a side
    /// effect. The returned string follows that content.
    fn run(&mut self, ctx: &mut RenderContext) -> Result<String, WidgetError>;
}

/// A widget type with a statically known class name.
///
/// This is what `begin`, `end` and `widget` are generic over. The class
/// entry of their configuration is always forced to `CLASS`.
pub trait WidgetClass: Widget + Default + 'static {
    /// The class identifier used in configurations and the registry.
    const CLASS: &'static str;
}

/// Deserializes `value` into `slot`.
///
/// # Example
///
/// ```rust,ignore
/// fn set_field(&mut self, name: &str, value: Value) -> FieldResult {
///     match name {
///         "label" => assign(&mut self.label, value),
///         _ => Ok(FieldStatus::Unknown),
///     }
/// }
/// ```
pub fn assign<T: DeserializeOwned>(slot: &mut T, value: Value) -> FieldResult {
    *slot = serde_json::from_value(value)?;
    Ok(FieldStatus::Assigned)
}

/// Applies configuration entries to a freshly created widget and runs its
/// `init` hook.
pub(crate) fn configure(
    widget: &mut dyn Widget,
    class: &str,
    fields: Map<String, Value>,
    policy: UnknownFieldPolicy,
) -> Result<(), WidgetError> {
    for (key, value) in fields {
        let status = widget
            .set_field(&key, value)
            .map_err(|e| InvalidConfigurationError::invalid_field(class, &key, e))?;

        if status == FieldStatus::Unknown {
            match policy {
                UnknownFieldPolicy::Ignore => {
                    debug!(class, field = %key, "Ignoring unknown configuration key");
                }
                UnknownFieldPolicy::Reject => {
                    return Err(InvalidConfigurationError::unknown_field(class, key).into());
                }
            }
        }
    }

    widget.init()
}
