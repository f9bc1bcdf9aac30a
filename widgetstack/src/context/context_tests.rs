//! Render scenarios exercising begin/end nesting and inline capture.

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::config::{RenderConfig, WidgetConfig};
    use crate::context::{RenderContext, WriterSink};
    use crate::errors::WidgetError;
    use crate::testing::{FailingWidget, RecordingWidget, StaticWidget, TestRender};
    use crate::widget::{assign, FieldResult, FieldStatus, Widget, WidgetClass, WidgetRegistry};

    #[derive(Debug, Default)]
    struct Foo {
        x: i64,
    }

    impl Widget for Foo {
        fn set_field(&mut self, name: &str, value: Value) -> FieldResult {
            match name {
                "x" => assign(&mut self.x, value),
                _ => Ok(FieldStatus::Unknown),
            }
        }

        fn run(&mut self, _ctx: &mut RenderContext) -> Result<String, WidgetError> {
            Ok(format!("foo:{}", self.x))
        }
    }

    impl WidgetClass for Foo {
        const CLASS: &'static str = "Foo";
    }

    #[derive(Debug, Default)]
    struct Greeter;

    impl Widget for Greeter {
        fn set_field(&mut self, _name: &str, _value: Value) -> FieldResult {
            Ok(FieldStatus::Unknown)
        }

        fn run(&mut self, ctx: &mut RenderContext) -> Result<String, WidgetError> {
            ctx.write("Hello, ")?;
            Ok("World".to_string())
        }
    }

    impl WidgetClass for Greeter {
        const CLASS: &'static str = "Greeter";
    }

    #[derive(Debug, Default)]
    struct Inner;

    impl Widget for Inner {
        fn set_field(&mut self, _name: &str, _value: Value) -> FieldResult {
            Ok(FieldStatus::Unknown)
        }

        fn run(&mut self, ctx: &mut RenderContext) -> Result<String, WidgetError> {
            ctx.write("[")?;
            Ok("]".to_string())
        }
    }

    impl WidgetClass for Inner {
        const CLASS: &'static str = "Inner";
    }

    /// Renders `Inner` inline, then writes `!`.
    #[derive(Debug, Default)]
    struct Outer;

    impl Widget for Outer {
        fn set_field(&mut self, _name: &str, _value: Value) -> FieldResult {
            Ok(FieldStatus::Unknown)
        }

        fn run(&mut self, ctx: &mut RenderContext) -> Result<String, WidgetError> {
            let inner = ctx.render_widget(WidgetConfig::from_value(json!({"class": "Inner"}))?)?;
            ctx.write(&inner)?;
            ctx.write("!")?;
            Ok(String::new())
        }
    }

    impl WidgetClass for Outer {
        const CLASS: &'static str = "Outer";
    }

    /// A block widget used through begin/end from inside another widget.
    #[derive(Debug, Default)]
    struct Panel {
        title: String,
    }

    impl Widget for Panel {
        fn set_field(&mut self, name: &str, value: Value) -> FieldResult {
            match name {
                "title" => assign(&mut self.title, value),
                _ => Ok(FieldStatus::Unknown),
            }
        }

        fn run(&mut self, ctx: &mut RenderContext) -> Result<String, WidgetError> {
            let id = ctx.next_widget_id();
            ctx.write(&format!("<div id=\"{id}\">{}</div>", self.title))?;
            Ok(String::new())
        }
    }

    impl WidgetClass for Panel {
        const CLASS: &'static str = "Panel";
    }

    /// Uses a Panel block internally while rendered inline.
    #[derive(Debug, Default)]
    struct Card;

    impl Widget for Card {
        fn set_field(&mut self, _name: &str, _value: Value) -> FieldResult {
            Ok(FieldStatus::Unknown)
        }

        fn run(&mut self, ctx: &mut RenderContext) -> Result<String, WidgetError> {
            ctx.begin::<Panel>(WidgetConfig::new().with("title", "card"))?;
            ctx.end::<Panel>()?;
            Ok("<footer/>".to_string())
        }
    }

    impl WidgetClass for Card {
        const CLASS: &'static str = "Card";
    }

    fn registry() -> Arc<WidgetRegistry> {
        let registry = crate::testing::mock_registry();
        registry.register::<Foo>();
        registry.register::<Greeter>();
        registry.register::<Inner>();
        registry.register::<Outer>();
        registry.register::<Panel>();
        registry.register::<Card>();
        Arc::new(registry)
    }

    fn context() -> RenderContext {
        RenderContext::new(registry())
    }

    fn config(value: Value) -> WidgetConfig {
        WidgetConfig::from_value(value).unwrap()
    }

    #[test]
    fn test_create_object_ignores_unknown_field() {
        let ctx = context();
        let mut widget = ctx
            .create_object(config(json!({"class": "Foo", "x": 1, "unknownField": 2})))
            .unwrap();

        let mut render_ctx = context();
        assert_eq!(widget.run(&mut render_ctx).unwrap(), "foo:1");
    }

    #[test]
    fn test_create_object_from_bare_class() {
        let ctx = context();
        let mut widget = ctx.create_object("Foo").unwrap();

        let mut render_ctx = context();
        assert_eq!(widget.run(&mut render_ctx).unwrap(), "foo:0");
    }

    #[test]
    fn test_create_object_without_class() {
        let ctx = context();
        let err = ctx.create_object(config(json!({}))).unwrap_err();
        assert!(matches!(err, WidgetError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_create_object_unregistered_class() {
        let ctx = context();
        let err = ctx.create_object("Missing").unwrap_err();
        assert!(matches!(err, WidgetError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_create_object_strict_rejects_unknown_field() {
        let ctx = context().with_config(RenderConfig::new().strict());
        let err = ctx
            .create_object(config(json!({"class": "Foo", "x": 1, "unknownField": 2})))
            .unwrap_err();

        match err {
            WidgetError::InvalidConfiguration(e) => {
                assert_eq!(e.class.as_deref(), Some("Foo"));
                assert_eq!(e.field.as_deref(), Some("unknownField"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_create_forces_class() {
        let ctx = context();
        let foo = ctx
            .create::<Foo>(config(json!({"class": "Greeter", "x": 7})))
            .unwrap();
        assert_eq!(foo.x, 7);
    }

    #[test]
    fn test_begin_runs_init_and_pushes() {
        let mut ctx = context();
        let widget = ctx
            .begin::<RecordingWidget>(WidgetConfig::new().with("prefix", "<ul>"))
            .unwrap();

        assert!(widget.borrow().initialised);
        assert_eq!(widget.borrow().runs, 0);
        assert_eq!(ctx.depth(), 1);
        assert_eq!(ctx.open_classes(), vec![RecordingWidget::CLASS.to_string()]);

        ctx.end::<RecordingWidget>().unwrap();
    }

    #[test]
    fn test_nested_begin_end_returns_same_instances() {
        let mut ctx = context();

        let outer = ctx.begin::<RecordingWidget>(WidgetConfig::new()).unwrap();
        let inner = ctx.begin::<StaticWidget>(WidgetConfig::new()).unwrap();
        let innermost = ctx.begin::<RecordingWidget>(WidgetConfig::new()).unwrap();
        assert_eq!(ctx.depth(), 3);

        let ended = ctx.end::<RecordingWidget>().unwrap();
        assert!(Rc::ptr_eq(&ended, &innermost));
        let ended = ctx.end::<StaticWidget>().unwrap();
        assert!(Rc::ptr_eq(&ended, &inner));
        let ended = ctx.end::<RecordingWidget>().unwrap();
        assert!(Rc::ptr_eq(&ended, &outer));

        assert_eq!(ctx.depth(), 0);
        assert_eq!(outer.borrow().runs, 1);
        assert_eq!(innermost.borrow().runs, 1);
        ctx.finish().unwrap();
    }

    #[test]
    fn test_end_discards_run_return_value() {
        let mut ctx = context();
        ctx.write("<body>").unwrap();
        let widget = ctx
            .begin::<RecordingWidget>(
                WidgetConfig::new().with("prefix", "<nav>").with("suffix", "RETURNED"),
            )
            .unwrap();
        widget.borrow_mut().prefix.push_str("home");
        ctx.end::<RecordingWidget>().unwrap();
        ctx.write("</body>").unwrap();

        assert_eq!(ctx.take_output().unwrap(), "<body><nav>home</body>");
        assert_eq!(widget.borrow().runs, 1);
    }

    #[test]
    fn test_end_with_outstanding_borrow() {
        let mut ctx = context();
        let widget = ctx.begin::<RecordingWidget>(WidgetConfig::new()).unwrap();
        let guard = widget.borrow();

        let err = ctx.end::<RecordingWidget>().unwrap_err();
        match err {
            WidgetError::Run { ref class, ref reason } => {
                assert_eq!(class, RecordingWidget::CLASS);
                assert!(reason.contains("borrowed"));
            }
            ref other => panic!("unexpected error: {other}"),
        }
        assert_eq!(guard.runs, 0);
        drop(guard);
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_end_propagates_run_failure() {
        let mut ctx = context();
        ctx.write("<main>").unwrap();
        ctx.begin::<RecordingWidget>(WidgetConfig::new()).unwrap();
        ctx.begin::<FailingWidget>(WidgetConfig::new().with("partial", "<half>"))
            .unwrap();

        let err = ctx.end::<FailingWidget>().unwrap_err();
        assert!(matches!(err, WidgetError::Run { .. }));
        assert!(!err.is_nesting_error());

        // The failed widget is gone; its parent is still open.
        assert_eq!(ctx.open_classes(), vec![RecordingWidget::CLASS.to_string()]);
        ctx.end::<RecordingWidget>().unwrap();

        // Block widgets write straight to the page, so the partial output stays.
        assert_eq!(ctx.take_output().unwrap(), "<main><half>");
    }

    #[test]
    fn test_mismatched_end_removes_entry() {
        let mut ctx = context();
        let widget = ctx.begin::<RecordingWidget>(WidgetConfig::new()).unwrap();

        let err = ctx.end::<StaticWidget>().unwrap_err();
        match err {
            WidgetError::MismatchedNesting(ref e) => {
                assert_eq!(e.expected, RecordingWidget::CLASS);
                assert_eq!(e.found, StaticWidget::CLASS);
            }
            ref other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_nesting_error());

        // The open entry was popped before the type check and never ran.
        assert_eq!(ctx.depth(), 0);
        assert_eq!(widget.borrow().runs, 0);
    }

    #[test]
    fn test_end_on_empty_stack() {
        let mut ctx = context();
        let err = ctx.end::<RecordingWidget>().unwrap_err();

        assert!(matches!(err, WidgetError::UnbalancedNesting(_)));
        assert_eq!(
            err.to_string(),
            "Unexpected RecordingWidget::end() call. A matching begin() is not found."
        );
    }

    #[test]
    fn test_widget_concatenates_captured_then_returned() {
        let mut ctx = context();
        let out = ctx.widget::<Greeter>(WidgetConfig::new()).unwrap();
        assert_eq!(out, "Hello, World");

        // Nothing leaked to the page.
        assert_eq!(ctx.take_output().unwrap(), "");
    }

    #[test]
    fn test_render_widget_by_class() {
        let mut ctx = context();
        let out = ctx.render_widget(config(json!({"class": "Greeter"}))).unwrap();
        assert_eq!(out, "Hello, World");
    }

    #[test]
    fn test_render_widget_requires_class() {
        let mut ctx = context();
        let err = ctx.render_widget(WidgetConfig::new()).unwrap_err();
        assert!(matches!(err, WidgetError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_nested_widget_capture() {
        let mut ctx = context();
        ctx.write("before|").unwrap();
        let out = ctx.widget::<Outer>(WidgetConfig::new()).unwrap();
        ctx.write("|after").unwrap();

        assert_eq!(out, "[]!");
        assert_eq!(ctx.take_output().unwrap(), "before||after");
    }

    #[test]
    fn test_widget_with_internal_block() {
        let mut ctx = context();
        let out = ctx.widget::<Card>(WidgetConfig::new()).unwrap();

        assert_eq!(out, "<div id=\"w0\">card</div><footer/>");
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_widget_does_not_touch_open_blocks() {
        let mut ctx = context();
        ctx.begin::<RecordingWidget>(WidgetConfig::new()).unwrap();

        ctx.widget::<Greeter>(WidgetConfig::new()).unwrap();
        assert_eq!(ctx.open_classes(), vec![RecordingWidget::CLASS.to_string()]);

        ctx.end::<RecordingWidget>().unwrap();
    }

    #[test]
    fn test_capture_restored_after_failure() {
        let mut ctx = context();
        ctx.write("a").unwrap();

        let err = ctx.widget::<FailingWidget>(WidgetConfig::new()).unwrap_err();
        assert!(matches!(err, WidgetError::Run { .. }));

        // The failed widget's partial output was discarded with its capture.
        ctx.write("b").unwrap();
        assert_eq!(ctx.take_output().unwrap(), "ab");
    }

    #[test]
    fn test_capture_returns_value() {
        let mut ctx = context();
        let (captured, value) = ctx
            .capture(|ctx| {
                ctx.write("x")?;
                Ok(42)
            })
            .unwrap();

        assert_eq!(captured, "x");
        assert_eq!(value, 42);
    }

    #[test]
    fn test_widget_ids_are_sequential() {
        let mut ctx = context().with_config(RenderConfig::new().with_id_prefix("nav-"));
        assert_eq!(ctx.next_widget_id(), "nav-0");
        assert_eq!(ctx.next_widget_id(), "nav-1");
    }

    #[test]
    fn test_finish_reports_open_widgets() {
        let mut ctx = context();
        ctx.begin::<RecordingWidget>(WidgetConfig::new()).unwrap();
        ctx.begin::<StaticWidget>(WidgetConfig::new()).unwrap();

        match ctx.finish().unwrap_err() {
            WidgetError::UnbalancedNesting(e) => {
                assert_eq!(
                    e.open,
                    vec![RecordingWidget::CLASS.to_string(), StaticWidget::CLASS.to_string()]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_renders_are_isolated() {
        let registry = registry();
        let mut first = RenderContext::new(Arc::clone(&registry));
        let mut second = RenderContext::new(registry);
        assert_ne!(first.render_id(), second.render_id());

        first.begin::<RecordingWidget>(WidgetConfig::new()).unwrap();
        assert_eq!(second.depth(), 0);
        assert!(second.end::<RecordingWidget>().is_err());
        first.end::<RecordingWidget>().unwrap();
    }

    #[test]
    fn test_writer_sink_receives_page() {
        let mut ctx = context().with_sink(WriterSink::new(Vec::new()));
        ctx.write("<p>").unwrap();
        let out = ctx.widget::<Greeter>(WidgetConfig::new()).unwrap();
        ctx.write(&out).unwrap();

        // Writer sinks do not buffer.
        assert!(ctx.take_output().is_none());
        ctx.finish().unwrap();
    }

    #[test]
    fn test_fixture_page() {
        let mut render = TestRender::new();
        let page = render
            .render(|ctx| {
                ctx.begin::<Panel>(WidgetConfig::new().with("title", "Menu"))?;
                let item = ctx.widget::<StaticWidget>(WidgetConfig::new().with("content", "<li/>"))?;
                ctx.write(&item)?;
                ctx.end::<Panel>()?;
                Ok(())
            })
            .unwrap();

        assert_eq!(page, "<li/><div id=\"w0\">Menu</div>");
    }
}
