//! Function registry - global name → callback table used to bind callbacks
//! by name.

use crate::attrib::Callback;
use crate::table::StringTable;
use crate::toolkit::Toolkit;

#[derive(Default)]
pub struct FunctionRegistry {
    functions: StringTable<Callback>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under `name`, returning the one it replaces.
    pub fn register(&mut self, name: &str, function: Callback) -> Option<Callback> {
        self.functions.set(name.to_owned(), function)
    }

    pub fn unregister(&mut self, name: &str) -> Option<Callback> {
        self.functions.remove(name)
    }

    pub fn lookup(&self, name: &str) -> Option<Callback> {
        self.functions.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Toolkit {
    pub fn register_function(&mut self, name: &str, function: Callback) -> Option<Callback> {
        self.functions.register(name, function)
    }

    pub fn unregister_function(&mut self, name: &str) -> Option<Callback> {
        self.functions.unregister(name)
    }

    pub fn lookup_function(&self, name: &str) -> Option<Callback> {
        self.functions.lookup(name)
    }

    pub fn function_names(&self) -> Vec<&str> {
        self.functions.names()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::element::ElementId;
    use crate::types::CallbackAction;

    fn callback(action: CallbackAction) -> Callback {
        Rc::new(move |_: &mut Toolkit, _: ElementId| action)
    }

    #[test]
    fn test_register_lookup_replace() {
        let mut registry = FunctionRegistry::new();
        let close = callback(CallbackAction::Close);
        assert!(registry.register("done", Rc::clone(&close)).is_none());

        let found = registry.lookup("done").expect("registered");
        assert!(Rc::ptr_eq(&found, &close));

        let previous = registry.register("done", callback(CallbackAction::Ignore));
        assert!(previous.is_some_and(|p| Rc::ptr_eq(&p, &close)));

        registry.register("abort", callback(CallbackAction::Default));
        assert_eq!(registry.names(), ["abort", "done"]);

        assert!(registry.unregister("done").is_some());
        assert!(registry.lookup("done").is_none());
        assert!(registry.unregister("done").is_none());
    }
}
