//! Testing utilities for widget renders.
//!
//! This module provides:
//! - Mock widgets with predictable output
//! - A render fixture backed by a mock registry

mod fixtures;
mod mocks;

pub use fixtures::{mock_registry, TestRender};
pub use mocks::{FailingWidget, RecordingWidget, StaticWidget};
