//! Attribute Store - per-element name → value table.
//!
//! Every element owns one [`AttributeStore`]. Values are type-tagged:
//!
//! - `Str`: an owned copy of the string.
//! - `Opaque`: a shared reference the store does not own exclusively.
//! - `Func`: a callback.
//!
//! Setting a `Str` equal to the one already stored keeps the existing
//! allocation, so frequently re-set attributes do not churn memory.

mod parse;

use std::any::Any;
use std::fmt;
use std::rc::Rc;

pub use parse::*;

use crate::element::ElementId;
use crate::table::{StringTable, Table, TableSize};
use crate::toolkit::Toolkit;
use crate::types::CallbackAction;

/// Element callback. Receives the toolkit and the element it fired on.
pub type Callback = Rc<dyn Fn(&mut Toolkit, ElementId) -> CallbackAction>;

// =============================================================================
// AttrValue
// =============================================================================

/// A stored attribute value.
#[derive(Clone)]
pub enum AttrValue {
    Str(String),
    Opaque(Rc<dyn Any>),
    Func(Callback),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Rc<dyn Any>> {
        match self {
            Self::Opaque(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&Callback> {
        match self {
            Self::Func(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.debug_tuple("Str").field(value).finish(),
            Self::Opaque(value) => write!(f, "Opaque({:p})", Rc::as_ptr(value)),
            Self::Func(value) => write!(f, "Func({:p})", Rc::as_ptr(value)),
        }
    }
}

// =============================================================================
// AttributeStore
// =============================================================================

/// String-keyed attribute table owned by one element.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    table: StringTable<AttrValue>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(size: TableSize) -> Self {
        Self {
            table: Table::with_size(size),
        }
    }

    /// Store an owned string copy. Returns `false` when an equal string was
    /// already stored (nothing changes, not even the allocation).
    pub fn set_str(&mut self, name: &str, value: &str) -> bool {
        match self.table.get_mut(name) {
            Some(AttrValue::Str(current)) if current == value => false,
            Some(slot) => {
                *slot = AttrValue::Str(value.to_owned());
                true
            }
            None => {
                self.table.set(name.to_owned(), AttrValue::Str(value.to_owned()));
                true
            }
        }
    }

    /// Store a shared opaque value.
    pub fn set_opaque(&mut self, name: &str, value: Rc<dyn Any>) {
        self.set(name, AttrValue::Opaque(value));
    }

    /// Store a callback, returning the previous one if any.
    pub fn set_func(&mut self, name: &str, value: Callback) -> Option<Callback> {
        match self.set(name, AttrValue::Func(value)) {
            Some(AttrValue::Func(previous)) => Some(previous),
            _ => None,
        }
    }

    /// Insert or replace any value, returning the previous one.
    pub fn set(&mut self, name: &str, value: AttrValue) -> Option<AttrValue> {
        match self.table.get_mut(name) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => self.table.set(name.to_owned(), value),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.table.get(name)
    }

    /// The value if it is stored as a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Remove a value. Never fails when the name is absent.
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.table.remove(name)
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.table.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// All stored names.
    pub fn names(&self) -> Vec<String> {
        self.table.keys().cloned().collect()
    }

    /// Start the store's single iteration cursor.
    pub fn first(&mut self) -> Option<&str> {
        self.table.first().map(String::as_str)
    }

    /// Advance the cursor; `None` at the end or after a resize/removal.
    pub fn next(&mut self) -> Option<&str> {
        self.table.next().map(String::as_str)
    }

    /// Value under the cursor.
    pub fn cursor_value(&self) -> Option<&AttrValue> {
        self.table.cursor_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_then_get_is_absent() {
        let mut store = AttributeStore::new();
        for name in ["TITLE", "FONT", "EXPAND"] {
            store.set_str(name, "x");
        }
        for name in ["TITLE", "FONT", "EXPAND"] {
            store.remove(name);
            assert!(store.get(name).is_none());
        }
        assert!(store.is_empty());
        assert!(store.remove("MISSING").is_none());
    }

    #[test]
    fn test_equal_string_keeps_allocation() {
        let mut store = AttributeStore::new();
        assert!(store.set_str("TITLE", "Hello"));
        let before = store.get_str("TITLE").map(str::as_ptr);

        assert!(!store.set_str("TITLE", "Hello"));
        let after = store.get_str("TITLE").map(str::as_ptr);
        assert_eq!(before, after);

        assert!(store.set_str("TITLE", "World"));
        assert_eq!(store.get_str("TITLE"), Some("World"));
    }

    #[test]
    fn test_kind_replacement() {
        let mut store = AttributeStore::new();
        store.set_str("DATA", "text");
        store.set_opaque("DATA", Rc::new(42u32));

        assert!(store.get_str("DATA").is_none());
        let value = store.get("DATA").and_then(AttrValue::as_opaque).cloned();
        assert_eq!(value.and_then(|v| v.downcast_ref::<u32>().copied()), Some(42));

        assert!(store.set_str("DATA", "text again"));
        assert_eq!(store.get_str("DATA"), Some("text again"));
    }

    #[test]
    fn test_many_insertions_survive_resize() {
        let mut store = AttributeStore::new();
        let initial = store.bucket_count();
        for i in 0..500 {
            store.set_str(&format!("ATTR{i}"), &i.to_string());
        }
        assert_eq!(store.len(), 500);
        assert!(store.bucket_count() > initial);
        for i in 0..500 {
            assert_eq!(store.get_str(&format!("ATTR{i}")), Some(i.to_string().as_str()));
        }
    }

    #[test]
    fn test_cursor_walk() {
        let mut store = AttributeStore::new();
        store.set_str("A", "1");
        store.set_str("B", "2");

        let mut names = Vec::new();
        let mut name = store.first().map(str::to_owned);
        while let Some(n) = name {
            assert!(store.cursor_value().is_some());
            names.push(n);
            name = store.next().map(str::to_owned);
        }
        names.sort();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_set_func_returns_previous() {
        let mut store = AttributeStore::new();
        let first: Callback = Rc::new(|_, _| CallbackAction::Default);
        let second: Callback = Rc::new(|_, _| CallbackAction::Close);

        assert!(store.set_func("ACTION", first.clone()).is_none());
        let previous = store.set_func("ACTION", second);
        assert!(previous.is_some_and(|p| Rc::ptr_eq(&p, &first)));
    }
}
