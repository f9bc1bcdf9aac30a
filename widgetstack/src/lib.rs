//! # Widgetstack
//!
//! Nested, stack-scoped widgets for templating layers.
//!
//! Widgetstack provides:
//!
//! - **Block widgets**: `begin` opens a widget, `end` closes and renders it,
//!   with fail-fast checks that calls are properly nested
//! - **Inline widgets**: `widget` renders in one call, capturing whatever the
//!   widget writes and appending the value it returns
//! - **Configuration binding**: widgets are built from a class name plus
//!   field assignments, resolved through a shared registry
//! - **Per-render isolation**: each render owns its own stack and output
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use widgetstack::prelude::*;
//!
//! let registry = Arc::new(WidgetRegistry::new());
//! registry.register::<Menu>();
//!
//! let mut ctx = RenderContext::new(registry);
//! ctx.begin::<Panel>(WidgetConfig::new().with("title", "Navigation"))?;
//! let menu = ctx.widget::<Menu>(WidgetConfig::new().with("items", 3))?;
//! ctx.write(&menu)?;
//! ctx.end::<Panel>()?;
//! ctx.finish()?;
//!
//! let page = ctx.take_output();
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod context;
pub mod errors;
pub mod observability;
pub mod testing;
pub mod widget;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{RenderConfig, UnknownFieldPolicy, WidgetConfig};
    pub use crate::context::{
        NullSink, OutputSink, RenderContext, StringSink, WidgetStack, WriterSink,
    };
    pub use crate::errors::{
        InvalidConfigurationError, MismatchedNestingError, UnbalancedNestingError, WidgetError,
    };
    pub use crate::widget::{
        assign, FieldResult, FieldStatus, Widget, WidgetClass, WidgetRegistry,
    };
    pub use std::sync::Arc;
}
