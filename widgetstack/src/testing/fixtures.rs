//! Test fixtures for render testing.

use std::sync::Arc;

use super::mocks::{FailingWidget, RecordingWidget, StaticWidget};
use crate::config::RenderConfig;
use crate::context::RenderContext;
use crate::errors::WidgetError;
use crate::widget::WidgetRegistry;

/// A render context wired to a registry holding the mock widgets.
#[derive(Debug)]
pub struct TestRender {
    /// The shared registry.
    pub registry: Arc<WidgetRegistry>,
    /// The render context under test.
    pub context: RenderContext,
}

impl TestRender {
    /// Creates a fixture with default render settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    /// Creates a fixture with the given render settings.
    #[must_use]
    pub fn with_config(config: RenderConfig) -> Self {
        let registry = Arc::new(mock_registry());
        let context = RenderContext::new(Arc::clone(&registry)).with_config(config);
        Self { registry, context }
    }

    /// Runs `f` against the context and returns everything written to the
    /// page, after checking that every widget was closed.
    pub fn render(
        &mut self,
        f: impl FnOnce(&mut RenderContext) -> Result<(), WidgetError>,
    ) -> Result<String, WidgetError> {
        f(&mut self.context)?;
        self.context.finish()?;
        Ok(self.context.take_output().unwrap_or_default())
    }
}

impl Default for TestRender {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a registry containing every mock widget.
#[must_use]
pub fn mock_registry() -> WidgetRegistry {
    let registry = WidgetRegistry::new();
    registry.register::<StaticWidget>();
    registry.register::<RecordingWidget>();
    registry.register::<FailingWidget>();
    registry
}
