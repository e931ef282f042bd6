//! Callbacks stored as element attributes.
//!
//! A callback slot holds either a function value or the name of a function
//! in the toolkit's function registry. Names are resolved on first read and
//! the resolved function replaces the name in the store.

use tracing::trace;

use super::ElementId;
use crate::attrib::{AttrValue, Callback};
use crate::toolkit::Toolkit;
use crate::types::CallbackAction;

impl Toolkit {
    /// Install `callback` under `name`, returning the previous function.
    pub fn set_callback(&mut self, id: ElementId, name: &str, callback: Callback) -> Option<Callback> {
        self.element_mut(id)?.attributes.set_func(name, callback)
    }

    /// Point `name` at the registered function `function`.
    pub fn set_callback_name(&mut self, id: ElementId, name: &str, function: &str) {
        if let Some(el) = self.element_mut(id) {
            el.attributes.set(name, AttrValue::Str(function.to_owned()));
        }
    }

    pub fn remove_callback(&mut self, id: ElementId, name: &str) -> Option<Callback> {
        match self.element_mut(id)?.attributes.remove(name)? {
            AttrValue::Func(callback) => Some(callback),
            _ => None,
        }
    }

    /// The callback under `name`, resolving a function name if needed.
    pub fn get_callback(&mut self, id: ElementId, name: &str) -> Option<Callback> {
        let function = match self.element(id)?.attributes().get(name)? {
            AttrValue::Func(callback) => return Some(callback.clone()),
            AttrValue::Str(function) => function.clone(),
            AttrValue::Opaque(_) => return None,
        };

        let callback = self.functions.lookup(&function)?;
        trace!(?id, name, function = %function, "resolved callback by name");
        if let Some(el) = self.element_mut(id) {
            el.attributes.set_func(name, callback.clone());
        }
        Some(callback)
    }

    /// Invoke the callback under `name`. A missing callback yields
    /// [`CallbackAction::Default`].
    pub fn call_callback(&mut self, id: ElementId, name: &str) -> CallbackAction {
        match self.get_callback(id, name) {
            Some(callback) => callback(self, id),
            None => CallbackAction::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::attrib::Callback;
    use crate::driver::HeadlessDriver;
    use crate::element::ElementId;
    use crate::toolkit::Toolkit;
    use crate::types::CallbackAction;

    #[test]
    fn test_direct_callback() {
        let mut tk = Toolkit::new(HeadlessDriver::default());
        let button = tk.create("button").expect("button");
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);

        let previous = tk.set_callback(
            button,
            "ACTION",
            Rc::new(move |_: &mut Toolkit, _: ElementId| {
                counter.set(counter.get() + 1);
                CallbackAction::Close
            }),
        );

        assert!(previous.is_none());
        assert_eq!(tk.call_callback(button, "ACTION"), CallbackAction::Close);
        assert_eq!(hits.get(), 1);
        assert!(tk.remove_callback(button, "ACTION").is_some());
        assert_eq!(tk.call_callback(button, "ACTION"), CallbackAction::Default);
    }

    #[test]
    fn test_callback_by_name_resolves_lazily() {
        let mut tk = Toolkit::new(HeadlessDriver::default());
        let button = tk.create("button").expect("button");
        tk.set_callback_name(button, "ACTION", "quit_cb");

        // Not registered yet.
        assert!(tk.get_callback(button, "ACTION").is_none());

        let quit: Callback = Rc::new(|_: &mut Toolkit, _: ElementId| CallbackAction::Close);
        tk.register_function("quit_cb", Rc::clone(&quit));

        let resolved = tk.get_callback(button, "ACTION").expect("resolved");
        assert!(Rc::ptr_eq(&resolved, &quit));

        // Cached: unregistering does not affect the element any more.
        tk.unregister_function("quit_cb");
        assert_eq!(tk.call_callback(button, "ACTION"), CallbackAction::Close);
    }

    #[test]
    fn test_callback_may_touch_toolkit() {
        let mut tk = Toolkit::new(HeadlessDriver::default());
        let button = tk.create("button").expect("button");
        tk.set_callback(
            button,
            "ACTION",
            Rc::new(|tk: &mut Toolkit, id: ElementId| {
                tk.set_attribute(id, "TITLE", Some("clicked"));
                CallbackAction::Default
            }),
        );

        tk.call_callback(button, "ACTION");
        assert_eq!(tk.get_attribute(button, "TITLE").as_deref(), Some("clicked"));
    }
}
