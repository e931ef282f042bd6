//! Class registry: class name → factory, with built descriptors cached.

use std::cell::RefCell;
use std::rc::Rc;

use super::{ClassBuilder, ClassDescriptor};
use crate::table::StringTable;

/// Produces a fresh builder for a class (and its whole parent chain).
pub type ClassFactory = Rc<dyn Fn() -> ClassBuilder>;

pub struct ClassRegistry {
    factories: StringTable<ClassFactory>,
    built: RefCell<StringTable<Rc<ClassDescriptor>>>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self {
            factories: StringTable::new(),
            built: RefCell::new(StringTable::new()),
        }
    }
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.names())
            .finish()
    }
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in classes.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("dialog", super::dialog_class);
        registry.register("vbox", super::vbox_class);
        registry.register("hbox", super::hbox_class);
        registry.register("label", super::label_class);
        registry.register("button", super::button_class);
        registry.register("canvas", super::canvas_class);
        registry.register("timer", super::timer_class);
        registry
    }

    /// Register (or replace) the factory for `name`. Elements created
    /// earlier keep the descriptor they were created with.
    pub fn register(&mut self, name: &str, factory: impl Fn() -> ClassBuilder + 'static) {
        tracing::debug!(class = name, "registering class");
        self.factories.set(name.to_owned(), Rc::new(factory));
        self.built.borrow_mut().remove(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Descriptor for `name`, built on first use.
    pub fn get(&self, name: &str) -> Option<Rc<ClassDescriptor>> {
        if let Some(class) = self.built.borrow().get(name) {
            return Some(Rc::clone(class));
        }
        let factory = Rc::clone(self.factories.get(name)?);
        let class = Rc::new(factory().build());
        self.built.borrow_mut().set(name.to_owned(), Rc::clone(&class));
        Some(class)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
