//! Configuration for widget construction and rendering.

mod render;
mod widget_config;

pub use render::{RenderConfig, UnknownFieldPolicy};
pub use widget_config::{WidgetConfig, CLASS_KEY};
