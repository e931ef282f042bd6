//! Attribute accessor table.
//!
//! A class registers typed accessors for the attributes it understands. The
//! table is built once per class chain at registration time and shared
//! read-only by every element of the class afterwards.

use crate::element::ElementId;
use crate::table::StringTable;
use crate::toolkit::Toolkit;

/// Computes an attribute value.
pub type AttrGetter = fn(&Toolkit, ElementId) -> Option<String>;

/// Applies an attribute value. `None` means the attribute is being reset.
pub type AttrSetter = fn(&mut Toolkit, ElementId, Option<&str>) -> SetterOutcome;

/// What the store should do with the raw string after a setter ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetterOutcome {
    /// Keep the string in the element's store.
    Store,
    /// The setter consumed the value; do not store it.
    Consumed,
}

bitflags::bitflags! {
    /// Accessor behavior flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct AccessorFlags: u16 {
        /// Writes are ignored.
        const READ_ONLY = 1 << 0;
        /// Reads return nothing.
        const WRITE_ONLY = 1 << 1;
        /// Getter/setter also run while the element is not mapped.
        const NOT_MAPPED = 1 << 2;
        /// Unset values are looked up on the element's ancestors.
        const INHERIT = 1 << 3;
        /// The raw string is never kept in the store once applied.
        const NO_STRING = 1 << 4;
        /// The registered default is not returned by reads.
        const NO_DEFAULT = 1 << 5;
        /// Backed by the native system through the driver.
        const NATIVE = 1 << 6;
    }
}

/// One registered attribute.
#[derive(Debug, Clone, Default)]
pub struct Accessor {
    pub getter: Option<AttrGetter>,
    pub setter: Option<AttrSetter>,
    pub default: Option<String>,
    pub flags: AccessorFlags,
}

impl Accessor {
    pub fn is_inheritable(&self) -> bool {
        self.flags.contains(AccessorFlags::INHERIT)
    }

    /// Whether getter/setter may run for an element in this mapped state.
    pub fn usable(&self, mapped: bool) -> bool {
        mapped || self.flags.contains(AccessorFlags::NOT_MAPPED)
    }
}

/// Name → accessor table shared along a class chain.
#[derive(Debug, Clone, Default)]
pub struct AccessorTable {
    table: StringTable<Accessor>,
}

impl AccessorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the accessor for `name`.
    pub fn register(
        &mut self,
        name: &str,
        getter: Option<AttrGetter>,
        setter: Option<AttrSetter>,
        default: Option<&str>,
        flags: AccessorFlags,
    ) {
        self.table.set(
            name.to_owned(),
            Accessor {
                getter,
                setter,
                default: default.map(str::to_owned),
                flags,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Accessor> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Accessor)> {
        self.table.iter().map(|(name, accessor)| (name.as_str(), accessor))
    }
}
