//! The per-render context owning the widget stack and output channel.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use super::output::{OutputChannel, OutputSink};
use super::stack::{OpenWidget, WidgetStack};
use crate::config::{RenderConfig, WidgetConfig};
use crate::errors::{
    InvalidConfigurationError, MismatchedNestingError, UnbalancedNestingError, WidgetError,
};
use crate::observability::SpanTimer;
use crate::widget::{configure, Widget, WidgetClass, WidgetRegistry};

/// State for one render pass.
///
/// Every render gets its own context, so concurrent renders never share a
/// stack. Only the registry is shared between contexts.
#[derive(Debug)]
pub struct RenderContext {
    render_id: Uuid,
    config: RenderConfig,
    registry: Arc<WidgetRegistry>,
    stack: WidgetStack,
    output: OutputChannel,
    id_counter: usize,
}

impl RenderContext {
    /// Creates a context buffering its output in memory.
    #[must_use]
    pub fn new(registry: Arc<WidgetRegistry>) -> Self {
        Self {
            render_id: Uuid::new_v4(),
            config: RenderConfig::default(),
            registry,
            stack: WidgetStack::new(),
            output: OutputChannel::default(),
            id_counter: 0,
        }
    }

    /// Sets the render configuration.
    #[must_use]
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the base output sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl OutputSink + 'static) -> Self {
        self.output = OutputChannel::new(Box::new(sink));
        self
    }

    /// Returns the unique id of this render.
    #[must_use]
    pub const fn render_id(&self) -> Uuid {
        self.render_id
    }

    /// Returns the render configuration.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Returns the widget registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<WidgetRegistry> {
        &self.registry
    }

    /// Writes text to the ambient output channel.
    pub fn write(&mut self, text: &str) -> Result<(), WidgetError> {
        self.output.write(text)
    }

    /// Runs `f` with all output captured and returns the captured text
    /// together with `f`'s result.
    ///
    /// The capture scope is closed even when `f` fails.
    pub fn capture<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, WidgetError>,
    ) -> Result<(String, R), WidgetError> {
        self.output.begin_capture();
        let result = f(self);
        let captured = self.output.end_capture().unwrap_or_default();
        result.map(|value| (captured, value))
    }

    /// Drains the output buffered by the base sink.
    ///
    /// Returns `None` when the base sink does not buffer.
    pub fn take_output(&mut self) -> Option<String> {
        self.output.take_output()
    }

    /// Returns a fresh widget id for this render (`w0`, `w1`, ...).
    pub fn next_widget_id(&mut self) -> String {
        let id = format!("{}{}", self.config.id_prefix, self.id_counter);
        self.id_counter += 1;
        id
    }

    /// Creates and configures a widget of the class named in `config`.
    ///
    /// `config` may be a bare class name or a [`WidgetConfig`].
    pub fn create_object(
        &self,
        config: impl Into<WidgetConfig>,
    ) -> Result<Box<dyn Widget>, WidgetError> {
        let (class, fields) = config.into().into_parts();
        let class = class.ok_or_else(InvalidConfigurationError::missing_class)?;

        let mut widget = self.registry.instantiate(&class)?;
        configure(widget.as_mut(), &class, fields, self.config.unknown_fields)?;
        Ok(widget)
    }

    /// Creates and configures a `T`, ignoring any class named in `config`.
    pub fn create<T: WidgetClass>(
        &self,
        config: impl Into<WidgetConfig>,
    ) -> Result<T, WidgetError> {
        let (_, fields) = config.into().into_parts();

        let mut widget = T::default();
        configure(&mut widget, T::CLASS, fields, self.config.unknown_fields)?;
        Ok(widget)
    }

    /// Begins a `T` block widget.
    ///
    /// A matching [`end`](Self::end) must follow. The returned handle is the
    /// same one `end` will return.
    pub fn begin<T: WidgetClass>(
        &mut self,
        config: impl Into<WidgetConfig>,
    ) -> Result<Rc<RefCell<T>>, WidgetError> {
        let widget = Rc::new(RefCell::new(self.create::<T>(config)?));
        self.stack.push(OpenWidget::new(Rc::clone(&widget)));

        debug!(
            render_id = %self.render_id,
            class = T::CLASS,
            depth = self.stack.len(),
            "Widget begun"
        );
        Ok(widget)
    }

    /// Ends the innermost block widget, which must be a `T`, and runs it.
    ///
    /// The widget emits its content by writing to the output channel; the
    /// value returned by its `run` is discarded. The entry is popped before
    /// anything else is checked, so after any error it is gone from the
    /// stack.
    pub fn end<T: WidgetClass>(&mut self) -> Result<Rc<RefCell<T>>, WidgetError> {
        let entry = self
            .stack
            .pop()
            .ok_or_else(|| UnbalancedNestingError::unexpected_end(T::CLASS))?;

        let widget = entry
            .downcast::<T>()
            .map_err(|open| MismatchedNestingError::new(open.class(), T::CLASS))?;

        let timer = SpanTimer::start();
        {
            let mut guard = widget
                .try_borrow_mut()
                .map_err(|_| WidgetError::run_failed(T::CLASS, "widget is borrowed"))?;
            guard.run(self)?;
        }

        debug!(
            render_id = %self.render_id,
            class = T::CLASS,
            depth = self.stack.len(),
            duration_ms = timer.finish(),
            "Widget ended"
        );
        Ok(widget)
    }

    /// Creates a `T`, runs it, and returns its rendering.
    ///
    /// The result is everything the widget wrote while running followed by
    /// the value its `run` returned.
    pub fn widget<T: WidgetClass>(
        &mut self,
        config: impl Into<WidgetConfig>,
    ) -> Result<String, WidgetError> {
        let mut widget = self.create::<T>(config)?;
        self.render_inline(T::CLASS, &mut widget)
    }

    /// Like [`widget`](Self::widget), resolving the class from `config`
    /// through the registry.
    pub fn render_widget(
        &mut self,
        config: impl Into<WidgetConfig>,
    ) -> Result<String, WidgetError> {
        let config = config.into();
        let class = config.require_class()?.to_string();
        let mut widget = self.create_object(config)?;
        self.render_inline(&class, widget.as_mut())
    }

    fn render_inline(&mut self, class: &str, widget: &mut dyn Widget) -> Result<String, WidgetError> {
        let timer = SpanTimer::start();
        let (captured, returned) = self.capture(|ctx| widget.run(ctx))?;

        debug!(
            render_id = %self.render_id,
            class,
            duration_ms = timer.finish(),
            "Widget rendered"
        );
        Ok(captured + &returned)
    }

    /// Returns the number of open block widgets.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the open block widget classes, outermost first.
    #[must_use]
    pub fn open_classes(&self) -> Vec<String> {
        self.stack.classes()
    }

    /// Checks that every begun widget has been ended and flushes the sink.
    ///
    /// # Errors
    ///
    /// Returns `UnbalancedNesting` listing the widgets still open. They are
    /// discarded.
    pub fn finish(&mut self) -> Result<(), WidgetError> {
        if !self.stack.is_empty() {
            let open = self.stack.classes();
            self.stack.clear();
            return Err(UnbalancedNestingError::left_open(open).into());
        }
        self.output.flush()
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        if !self.stack.is_empty() {
            warn!(
                render_id = %self.render_id,
                open = ?self.stack.classes(),
                "Render context dropped with open widgets"
            );
        }
    }
}
