//! The stack of open widgets.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

use crate::widget::WidgetClass;

/// A widget whose `begin` has been called but whose `end` has not.
#[derive(Debug)]
pub struct OpenWidget {
    class: &'static str,
    type_id: TypeId,
    handle: Rc<dyn Any>,
}

impl OpenWidget {
    /// Wraps a begun widget handle.
    #[must_use]
    pub fn new<T: WidgetClass>(handle: Rc<RefCell<T>>) -> Self {
        Self {
            class: T::CLASS,
            type_id: TypeId::of::<T>(),
            handle,
        }
    }

    /// Returns the class name.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        self.class
    }

    /// True if this entry holds a `T`.
    #[must_use]
    pub fn is<T: WidgetClass>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Recovers the typed handle, or gives the entry back on a type mismatch.
    pub fn downcast<T: WidgetClass>(self) -> Result<Rc<RefCell<T>>, Self> {
        let Self {
            class,
            type_id,
            handle,
        } = self;
        handle.downcast::<RefCell<T>>().map_err(|handle| Self {
            class,
            type_id,
            handle,
        })
    }
}

/// LIFO stack of open widgets, innermost last.
#[derive(Debug, Default)]
pub struct WidgetStack {
    entries: Vec<OpenWidget>,
}

impl WidgetStack {
    /// Creates a new empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an entry.
    pub fn push(&mut self, entry: OpenWidget) {
        self.entries.push(entry);
    }

    /// Pops the innermost entry.
    pub fn pop(&mut self) -> Option<OpenWidget> {
        self.entries.pop()
    }

    /// Returns the innermost entry.
    #[must_use]
    pub fn peek(&self) -> Option<&OpenWidget> {
        self.entries.last()
    }

    /// Returns the number of open widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no widget is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards every open entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the open class names, outermost first.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.class.to_string()).collect()
    }
}
