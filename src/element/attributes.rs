//! Attribute resolution.
//!
//! Reads go: internal name → store only; otherwise the class getter (or the
//! driver for native attributes), then the element's store, then for
//! inheritable attributes the same two steps on each ancestor, then the
//! registered default. Unregistered names are plain store entries.
//!
//! Writes go through the class setter when the element is mapped or the
//! accessor allows unmapped use; otherwise the raw string is stored and
//! replayed through the setter at map time.

use std::any::Any;
use std::rc::Rc;

use tracing::{debug, trace};

use super::ElementId;
use crate::attrib::{parse_bool, parse_int, parse_list, parse_size};
use crate::class::{Accessor, AccessorFlags, SetterOutcome};
use crate::toolkit::Toolkit;
use crate::types::Size;

/// Names starting with this prefix are private to the toolkit: they bypass
/// accessors, inheritance and defaults, and are hidden from listings.
pub const INTERNAL_PREFIX: &str = "_TRELLIS";

/// Last map error of an element.
pub const LAST_ERROR: &str = "_TRELLIS_LAST_ERROR";

pub fn is_internal_name(name: &str) -> bool {
    name.starts_with(INTERNAL_PREFIX)
}

impl Toolkit {
    // =========================================================================
    // Read
    // =========================================================================

    /// Effective value of `name` on `id`.
    pub fn get_attribute(&self, id: ElementId, name: &str) -> Option<String> {
        let el = self.element(id)?;
        if is_internal_name(name) {
            return el.attributes().get_str(name).map(str::to_owned);
        }

        let class = el.class();
        let Some(accessor) = class.accessor(name) else {
            return el.attributes().get_str(name).map(str::to_owned);
        };
        if accessor.flags.contains(AccessorFlags::WRITE_ONLY) {
            return None;
        }

        let value = self
            .own_value(id, name, accessor)
            .or_else(|| self.inherited_value(id, name, accessor));

        value.or_else(|| {
            if accessor.flags.contains(AccessorFlags::NO_DEFAULT) {
                None
            } else {
                accessor.default.clone()
            }
        })
    }

    /// Getter (or native query) then store, on `id` alone.
    fn own_value(&self, id: ElementId, name: &str, accessor: &Accessor) -> Option<String> {
        let el = self.element(id)?;
        let mapped = el.is_mapped();
        if accessor.usable(mapped) {
            match accessor.getter {
                Some(getter) => {
                    if let Some(value) = getter(self, id) {
                        return Some(value);
                    }
                }
                None if mapped && accessor.flags.contains(AccessorFlags::NATIVE) => {
                    if let Some(value) = self.driver.get_native_attribute(id, el, name) {
                        return Some(value);
                    }
                }
                None => {}
            }
        }
        el.attributes().get_str(name).map(str::to_owned)
    }

    /// Value of inheritable `name` on the nearest ancestor of `id` that has
    /// one, read through each ancestor's own accessor.
    fn inherited_value(&self, id: ElementId, name: &str, accessor: &Accessor) -> Option<String> {
        if !accessor.is_inheritable() {
            return None;
        }
        self.ancestors(id).find_map(|ancestor| {
            let accessor = self
                .element(ancestor)
                .and_then(|a| a.class().accessor(name))
                .unwrap_or(accessor);
            self.own_value(ancestor, name, accessor)
        })
    }

    /// Raw stored string of `name` on `id` or its nearest ancestor holding
    /// one. Accessors and defaults are not consulted.
    pub fn get_inherited(&self, id: ElementId, name: &str) -> Option<&str> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|e| self.element(e)?.attributes().get_str(name))
    }

    pub fn get_int(&self, id: ElementId, name: &str) -> Option<i32> {
        self.get_attribute(id, name).as_deref().and_then(parse_int)
    }

    /// Missing values read as `false`.
    pub fn get_bool(&self, id: ElementId, name: &str) -> bool {
        self.get_attribute(id, name).is_some_and(|v| parse_bool(&v))
    }

    pub fn get_size(&self, id: ElementId, name: &str) -> Option<Size> {
        self.get_attribute(id, name).map(|v| parse_size(&v))
    }

    /// `name` followed by the index, as in `ITEM3`.
    pub fn get_attribute_id(&self, id: ElementId, name: &str, index: i32) -> Option<String> {
        self.get_attribute(id, &format!("{name}{index}"))
    }

    /// Names of the string attributes stored on `id`, excluding internal ones.
    pub fn get_all_attributes(&self, id: ElementId) -> Vec<String> {
        let Some(el) = self.element(id) else {
            return Vec::new();
        };
        let mut names: Vec<String> = el
            .attributes()
            .iter()
            .filter(|(name, value)| !is_internal_name(name) && value.as_str().is_some())
            .map(|(name, _)| name.to_owned())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn get_opaque(&self, id: ElementId, name: &str) -> Option<Rc<dyn Any>> {
        self.element(id)?.attributes().get(name)?.as_opaque().cloned()
    }

    // =========================================================================
    // Write
    // =========================================================================

    /// Set (`Some`) or reset (`None`) `name` on `id`.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: Option<&str>) {
        let Some(el) = self.element(id) else {
            trace!(?id, name, "set on missing element");
            return;
        };
        let class = el.class_rc();
        let mapped = el.is_mapped();

        let accessor = match class.accessor(name) {
            Some(accessor) if !is_internal_name(name) => accessor,
            _ => {
                self.store(id, name, value);
                return;
            }
        };
        if accessor.flags.contains(AccessorFlags::READ_ONLY) {
            debug!(?id, name, "ignoring write to read-only attribute");
            return;
        }

        if accessor.usable(mapped) {
            // A mapped element losing its own value shows the inherited one.
            let applied = match value {
                None if mapped => self.inherited_value(id, name, accessor),
                _ => value.map(str::to_owned),
            };
            match self.apply_accessor(id, name, accessor, applied.as_deref()) {
                SetterOutcome::Store => self.store(id, name, value),
                SetterOutcome::Consumed => self.store(id, name, None),
            }
        } else {
            self.store(id, name, value);
        }

        if accessor.is_inheritable() {
            let effective = self.get_attribute(id, name);
            self.notify_descendants(id, name, effective.as_deref());
        }
    }

    /// Reset `name` on `id` to its inherited or default value.
    pub fn reset_attribute(&mut self, id: ElementId, name: &str) {
        self.set_attribute(id, name, None);
    }

    pub fn set_int(&mut self, id: ElementId, name: &str, value: i32) {
        self.set_attribute(id, name, Some(&value.to_string()));
    }

    /// Apply a list such as `TITLE="Hello, world", EXPAND=YES`. A name
    /// without a value resets it.
    pub fn set_attributes(&mut self, id: ElementId, list: &str) {
        for (name, value) in parse_list(list) {
            self.set_attribute(id, &name, value.as_deref());
        }
    }

    /// Set `name` followed by the index, as in `ITEM3`.
    pub fn set_attribute_id(&mut self, id: ElementId, name: &str, index: i32, value: Option<&str>) {
        self.set_attribute(id, &format!("{name}{index}"), value);
    }

    /// Store a shared opaque value. Accessors are bypassed.
    pub fn set_opaque(&mut self, id: ElementId, name: &str, value: Rc<dyn Any>) {
        if let Some(el) = self.element_mut(id) {
            el.attributes.set_opaque(name, value);
        }
    }

    fn store(&mut self, id: ElementId, name: &str, value: Option<&str>) {
        let Some(el) = self.element_mut(id) else { return };
        match value {
            Some(value) => {
                el.attributes.set_str(name, value);
            }
            None => {
                el.attributes.remove(name);
            }
        }
    }

    /// Run the setter and forward native values to the driver. Only call
    /// when the accessor is usable in the element's current state.
    pub(crate) fn apply_accessor(
        &mut self,
        id: ElementId,
        name: &str,
        accessor: &Accessor,
        value: Option<&str>,
    ) -> SetterOutcome {
        let mapped = self.element(id).is_some_and(|el| el.is_mapped());
        if !accessor.usable(mapped) {
            return SetterOutcome::Store;
        }
        trace!(?id, name, ?value, "applying attribute");

        let outcome = match accessor.setter {
            Some(setter) => setter(self, id, value),
            None => SetterOutcome::Store,
        };
        if mapped && accessor.flags.contains(AccessorFlags::NATIVE) {
            if let Some(el) = self.elements.get(id) {
                self.driver.set_native_attribute(id, el, name, value);
            }
        }

        if accessor.flags.contains(AccessorFlags::NO_STRING) {
            SetterOutcome::Consumed
        } else {
            outcome
        }
    }

    /// Apply `value`, the new effective value of inheritable `name`, to
    /// every descendant of `id` that does not store its own value.
    fn notify_descendants(&mut self, id: ElementId, name: &str, value: Option<&str>) {
        for child in self.children(id) {
            let Some(el) = self.element(child) else { continue };
            if el.attributes().contains(name) {
                continue;
            }
            let class = el.class_rc();
            if let Some(accessor) = class.accessor(name) {
                self.apply_accessor(child, name, accessor, value);
            }
            self.notify_descendants(child, name, value);
        }
    }
}
