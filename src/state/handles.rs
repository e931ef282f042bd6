//! Handle registry - global names bound to elements.
//!
//! Names map to elements through a string-keyed table; the reverse mapping
//! is an identity-keyed table on the element id. Setting the `NAME`
//! attribute of an element registers it here.

use crate::element::ElementId;
use crate::table::{IdentityKey, IdentityTable, StringTable};
use crate::toolkit::Toolkit;

#[derive(Debug, Default)]
pub struct HandleRegistry {
    by_name: StringTable<ElementId>,
    by_element: IdentityTable<String>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `id`, or unbind it with `None`.
    pub fn set(&mut self, name: &str, id: Option<ElementId>) {
        if let Some(previous) = self.by_name.remove(name) {
            self.by_element.remove(&IdentityKey::from(previous));
        }
        if let Some(id) = id {
            self.by_name.set(name.to_owned(), id);
            self.by_element.set(IdentityKey::from(id), name.to_owned());
        }
    }

    pub fn get(&self, name: &str) -> Option<ElementId> {
        self.by_name.get(name).copied()
    }

    /// Last name bound to `id`.
    pub fn name_of(&self, id: ElementId) -> Option<&str> {
        self.by_element.get(&IdentityKey::from(id)).map(String::as_str)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Toolkit {
    pub fn set_handle(&mut self, name: &str, id: Option<ElementId>) {
        self.handles.set(name, id);
    }

    pub fn get_handle(&self, name: &str) -> Option<ElementId> {
        self.handles.get(name)
    }

    pub fn get_name(&self, id: ElementId) -> Option<&str> {
        self.handles.name_of(id)
    }

    pub fn all_names(&self) -> Vec<&str> {
        self.handles.names()
    }
}
