//! Render context management.
//!
//! This module provides:
//! - The per-render context exposing `begin`, `end` and `widget`
//! - The LIFO stack of open widgets
//! - Output sinks and nestable output capture

#[cfg(test)]
mod context_tests;
mod output;
mod render;
mod stack;

pub use output::{NullSink, OutputChannel, OutputSink, StringSink, WriterSink};
pub use render::RenderContext;
pub use stack::{OpenWidget, WidgetStack};
