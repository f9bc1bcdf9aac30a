//! Mock widgets for testing.

use serde_json::Value;

use crate::context::RenderContext;
use crate::errors::WidgetError;
use crate::widget::{assign, FieldResult, FieldStatus, Widget, WidgetClass};

/// A widget that returns fixed content without writing anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticWidget {
    /// The content returned by `run`.
    pub content: String,
}

impl StaticWidget {
    /// Creates a static widget with the given content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl Widget for StaticWidget {
    fn set_field(&mut self, name: &str, value: Value) -> FieldResult {
        match name {
            "content" => assign(&mut self.content, value),
            _ => Ok(FieldStatus::Unknown),
        }
    }

    fn run(&mut self, _ctx: &mut RenderContext) -> Result<String, WidgetError> {
        Ok(self.content.clone())
    }
}

impl WidgetClass for StaticWidget {
    const CLASS: &'static str = "StaticWidget";
}

/// A widget that records its lifecycle.
///
/// On `run` it writes `prefix` to the output channel and returns `suffix`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingWidget {
    /// Text written during `run`.
    pub prefix: String,
    /// Text returned from `run`.
    pub suffix: String,
    /// Whether `init` has been called.
    pub initialised: bool,
    /// Number of times `run` has been called.
    pub runs: u32,
}

impl Widget for RecordingWidget {
    fn set_field(&mut self, name: &str, value: Value) -> FieldResult {
        match name {
            "prefix" => assign(&mut self.prefix, value),
            "suffix" => assign(&mut self.suffix, value),
            _ => Ok(FieldStatus::Unknown),
        }
    }

    fn init(&mut self) -> Result<(), WidgetError> {
        self.initialised = true;
        Ok(())
    }

    fn run(&mut self, ctx: &mut RenderContext) -> Result<String, WidgetError> {
        self.runs += 1;
        ctx.write(&self.prefix)?;
        Ok(self.suffix.clone())
    }
}

impl WidgetClass for RecordingWidget {
    const CLASS: &'static str = "RecordingWidget";
}

/// A widget that writes partial output and then fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailingWidget {
    /// Text written before failing.
    pub partial: String,
    /// The failure reason.
    pub reason: String,
}

impl Default for FailingWidget {
    fn default() -> Self {
        Self {
            partial: "partial".to_string(),
            reason: "Simulated failure".to_string(),
        }
    }
}

impl Widget for FailingWidget {
    fn set_field(&mut self, name: &str, value: Value) -> FieldResult {
        match name {
            "partial" => assign(&mut self.partial, value),
            "reason" => assign(&mut self.reason, value),
            _ => Ok(FieldStatus::Unknown),
        }
    }

    fn run(&mut self, ctx: &mut RenderContext) -> Result<String, WidgetError> {
        ctx.write(&self.partial)?;
        Err(WidgetError::run_failed(Self::CLASS, &self.reason))
    }
}

impl WidgetClass for FailingWidget {
    const CLASS: &'static str = "FailingWidget";
}
