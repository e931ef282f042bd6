//! The toolkit context.
//!
//! [`Toolkit`] owns everything the element model needs: the element arena,
//! the class registry, the driver and the process-wide registries (function
//! names, handle names, dialog list, focus). Element operations are
//! `impl Toolkit` blocks spread over the `element`, `layout` and `state`
//! modules.

use std::rc::Rc;

use slotmap::SlotMap;
use tracing::debug;

use crate::attrib::AttributeStore;
use crate::class::{ClassBuilder, ClassDescriptor, ClassRegistry};
use crate::config::ToolkitConfig;
use crate::driver::Driver;
use crate::element::{Element, ElementId};
use crate::error::{Error, Result};
use crate::state::{DialogList, FocusState, FunctionRegistry, HandleRegistry};
use crate::types::Size;

pub struct Toolkit {
    pub(crate) elements: SlotMap<ElementId, Element>,
    pub(crate) classes: ClassRegistry,
    pub(crate) driver: Box<dyn Driver>,
    pub(crate) functions: FunctionRegistry,
    pub(crate) handles: HandleRegistry,
    pub(crate) dialogs: DialogList,
    pub(crate) focus: FocusState,
    pub(crate) globals: AttributeStore,
    pub(crate) config: ToolkitConfig,
}

impl std::fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolkit")
            .field("elements", &self.elements.len())
            .field("classes", &self.classes.names())
            .field("dialogs", &self.dialogs)
            .field("focus", &self.focus)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Toolkit {
    /// A toolkit with the built-in classes and default configuration.
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self::with_config(driver, ToolkitConfig::default())
    }

    pub fn with_config(driver: impl Driver + 'static, config: ToolkitConfig) -> Self {
        let mut globals = AttributeStore::new();
        globals.set_str("DEFAULTFONT", &config.default_font);
        debug!(?config, "toolkit created");
        Self {
            elements: SlotMap::with_key(),
            classes: ClassRegistry::with_builtin(),
            driver: Box::new(driver),
            functions: FunctionRegistry::new(),
            handles: HandleRegistry::new(),
            dialogs: DialogList::new(),
            focus: FocusState::new(config.focus_history),
            globals,
            config,
        }
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    // =========================================================================
    // Arena
    // =========================================================================

    /// The element behind `id`, or `None` if it was destroyed.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Number of live elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub(crate) fn class_of(&self, id: ElementId) -> Result<Rc<ClassDescriptor>> {
        self.element(id)
            .map(|el| el.class_rc())
            .ok_or(Error::NoSuchElement)
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Register a class. The factory runs once, on first `create`.
    /// Registering an existing name replaces it for classes not yet built.
    pub fn register_class(&mut self, name: &str, factory: impl Fn() -> ClassBuilder + 'static) {
        self.classes.register(name, factory);
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.names()
    }

    // =========================================================================
    // Driver
    // =========================================================================

    /// Ask the driver for the content size of `id`.
    pub fn measure_intrinsic(&self, id: ElementId) -> Size {
        match self.elements.get(id) {
            Some(el) => self.driver.measure_intrinsic(id, el),
            None => Size::ZERO,
        }
    }

    /// Push the geometry of a mapped element to its native object.
    pub fn update_native_geometry(&mut self, id: ElementId) {
        if let Some(el) = self.elements.get(id).filter(|el| el.is_mapped()) {
            self.driver.update_geometry(id, el);
        }
    }

    // =========================================================================
    // Globals
    // =========================================================================

    /// Set a toolkit-wide attribute. `None` removes it.
    pub fn set_global(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.globals.set_str(name, value);
            }
            None => {
                self.globals.remove(name);
            }
        }
    }

    pub fn get_global(&self, name: &str) -> Option<&str> {
        self.globals.get_str(name)
    }
}
