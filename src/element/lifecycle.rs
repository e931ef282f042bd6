//! Create, map, unmap and destroy.

use tracing::{debug, warn};

use super::{Element, ElementId, LAST_ERROR};
use crate::attrib::AttributeStore;
use crate::class::{AccessorFlags, SetterOutcome};
use crate::error::{Error, Result};
use crate::toolkit::Toolkit;

impl Toolkit {
    // =========================================================================
    // Create
    // =========================================================================

    /// Create an unmapped, parentless element of class `class_name`.
    pub fn create(&mut self, class_name: &str) -> Result<ElementId> {
        let class = self
            .classes
            .get(class_name)
            .ok_or_else(|| Error::UnknownClass(class_name.to_owned()))?;
        let store = AttributeStore::with_size(self.config.attribute_table_size);
        let is_dialog = class.is_dialog();
        let id = self.elements.insert(Element::new(class.clone(), store));

        if let Err(err) = class.run_create(self, id) {
            warn!(class = class_name, %err, "create failed");
            self.elements.remove(id);
            return Err(err);
        }
        if is_dialog {
            self.dialogs.add(id);
        }

        debug!(?id, class = class_name, "created");
        Ok(id)
    }

    /// Create an element and apply an attribute list such as `"TITLE=Ok, EXPAND=YES"`.
    pub fn create_with(&mut self, class_name: &str, attributes: &str) -> Result<ElementId> {
        let id = self.create(class_name)?;
        self.set_attributes(id, attributes);
        Ok(id)
    }

    // =========================================================================
    // Map
    // =========================================================================

    /// Create the native object for `id` and, recursively, its children.
    ///
    /// The parent must already be mapped. If a descendant fails, children
    /// mapped before it stay mapped, the failing element stays unmapped and
    /// the error is returned. The error text is also stored under
    /// [`LAST_ERROR`] on the failing element.
    pub fn map(&mut self, id: ElementId) -> Result<()> {
        let el = self.element(id).ok_or(Error::NoSuchElement)?;
        if el.is_mapped() {
            return Ok(());
        }
        if let Some(parent) = el.parent() {
            if !self.element(parent).is_some_and(Element::is_mapped) {
                return self.fail(id, Error::ParentNotMapped);
            }
        }

        let handle = match self.driver.map(id, &self.elements[id]) {
            Ok(handle) => handle,
            Err(err) => return self.fail(id, err),
        };
        if let Some(el) = self.element_mut(id) {
            el.handle = Some(handle);
        }

        let class = self.class_of(id)?;
        if let Err(err) = class.run_map(self, id) {
            self.release_native(id);
            return self.fail(id, err);
        }
        debug!(?id, class = class.name(), ?handle, "mapped");

        self.replay_attributes(id);

        for child in self.children(id) {
            self.map(child)?;
        }
        Ok(())
    }

    fn fail(&mut self, id: ElementId, err: Error) -> Result<()> {
        warn!(?id, %err, "map failed");
        if let Some(el) = self.element_mut(id) {
            el.attributes.set_str(LAST_ERROR, &err.to_string());
        }
        Err(err)
    }

    /// Push values stored while unmapped through their setters and the
    /// driver, then apply inherited native values.
    fn replay_attributes(&mut self, id: ElementId) {
        let Ok(class) = self.class_of(id) else { return };
        let stored: Vec<(String, String)> = self
            .element(id)
            .map(|el| {
                el.attributes()
                    .iter()
                    .filter_map(|(name, value)| Some((name.to_owned(), value.as_str()?.to_owned())))
                    .collect()
            })
            .unwrap_or_default();

        for (name, value) in stored {
            let Some(accessor) = class.accessor(&name) else { continue };
            if accessor.flags.contains(AccessorFlags::NOT_MAPPED) {
                // Already applied when it was set.
                if accessor.flags.contains(AccessorFlags::NATIVE) {
                    self.driver
                        .set_native_attribute(id, &self.elements[id], &name, Some(&value));
                }
                continue;
            }
            if self.apply_accessor(id, &name, accessor, Some(&value)) == SetterOutcome::Consumed {
                if let Some(el) = self.element_mut(id) {
                    el.attributes.remove(&name);
                }
            }
        }

        for (name, accessor) in class.accessors().iter() {
            let wants_inherited = accessor.is_inheritable()
                && accessor.flags.contains(AccessorFlags::NATIVE)
                && !self.element(id).is_some_and(|el| el.attributes().contains(name));
            if !wants_inherited {
                continue;
            }
            if let Some(value) = self.get_inherited(id, name).map(str::to_owned) {
                self.apply_accessor(id, name, accessor, Some(&value));
            }
        }
    }

    // =========================================================================
    // Unmap
    // =========================================================================

    /// Release the native objects of `id`'s subtree, children first. The
    /// elements and their attributes stay.
    pub fn unmap(&mut self, id: ElementId) {
        if !self.element(id).is_some_and(Element::is_mapped) {
            return;
        }
        for child in self.children(id) {
            self.unmap(child);
        }
        if let Ok(class) = self.class_of(id) {
            class.run_unmap(self, id);
        }
        self.release_native(id);
        self.focus.forget(id);
        debug!(?id, "unmapped");
    }

    fn release_native(&mut self, id: ElementId) {
        let Some(el) = self.elements.get(id) else { return };
        if el.is_mapped() {
            self.driver.unmap(id, el);
        }
        if let Some(el) = self.elements.get_mut(id) {
            el.handle = None;
        }
    }

    // =========================================================================
    // Destroy
    // =========================================================================

    /// Destroy `id` and its subtree. Stale ids are ignored.
    pub fn destroy(&mut self, id: ElementId) {
        if !self.contains(id) {
            return;
        }
        self.unmap(id);
        for child in self.children(id) {
            self.destroy(child);
        }
        if let Ok(class) = self.class_of(id) {
            class.run_destroy(self, id);
        }
        if let Some(parent) = self.parent(id) {
            self.unlink(parent, id);
        }

        if let Some(name) = self.element(id).and_then(|el| el.attributes().get_str("NAME")) {
            let name = name.to_owned();
            if self.get_handle(&name) == Some(id) {
                self.set_handle(&name, None);
            }
        }
        self.dialogs.remove(id);
        self.focus.forget(id);
        self.elements.remove(id);
        debug!(?id, "destroyed");
    }
}

#[cfg(test)]
mod tests {
    use crate::class::{ClassBuilder, ClassOp, ClassOps};
    use crate::driver::{DriverCall, HeadlessDriver};
    use crate::element::{ElementId, LAST_ERROR};
    use crate::error::{Error, Result};
    use crate::toolkit::Toolkit;

    fn setup() -> (Toolkit, HeadlessDriver) {
        let driver = HeadlessDriver::default();
        (Toolkit::new(driver.clone()), driver)
    }

    #[test]
    fn test_unknown_class() {
        let (mut tk, _) = setup();
        assert_eq!(tk.create("nope"), Err(Error::UnknownClass("nope".into())));
    }

    #[test]
    fn test_map_order_parent_first_unmap_children_first() {
        let (mut tk, driver) = setup();
        let dialog = tk.create("dialog").expect("dialog");
        let vbox = tk.create("vbox").expect("vbox");
        let label = tk.create("label").expect("label");
        tk.append(dialog, vbox).expect("append");
        tk.append(vbox, label).expect("append");

        tk.map(dialog).expect("map");
        assert!(tk.element(label).is_some_and(|e| e.is_mapped()));
        let mapped: Vec<ElementId> = driver
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                DriverCall::Map(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(mapped, [dialog, vbox, label]);

        driver.clear_calls();
        tk.unmap(dialog);
        let unmapped: Vec<ElementId> = driver
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                DriverCall::Unmap(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(unmapped, [label, vbox, dialog]);
        assert!(tk.element(vbox).is_some_and(|e| !e.is_mapped()));
    }

    #[test]
    fn test_parent_not_mapped() {
        let (mut tk, _) = setup();
        let vbox = tk.create("vbox").expect("vbox");
        let label = tk.create("label").expect("label");
        tk.append(vbox, label).expect("append");

        assert_eq!(tk.map(label), Err(Error::ParentNotMapped));
        assert!(tk.get_attribute(label, LAST_ERROR).is_some());
        assert!(tk.element(label).is_some_and(|e| e.handle().is_none()));
    }

    #[test]
    fn test_failed_child_keeps_earlier_siblings_mapped() {
        let (mut tk, driver) = setup();
        let vbox = tk.create("vbox").expect("vbox");
        let first = tk.create("label").expect("label");
        let bad = tk.create("canvas").expect("canvas");
        let last = tk.create("label").expect("label");
        for child in [first, bad, last] {
            tk.append(vbox, child).expect("append");
        }
        driver.fail_map_for("canvas");

        assert!(matches!(tk.map(vbox), Err(Error::Driver(_))));
        assert!(tk.element(first).is_some_and(|e| e.is_mapped()));
        assert!(tk.element(bad).is_some_and(|e| !e.is_mapped()));
        assert!(tk.element(last).is_some_and(|e| !e.is_mapped()));
        assert!(tk.get_attribute(bad, LAST_ERROR).is_some());
    }

    #[test]
    fn test_replay_unmapped_native_attribute() {
        let (mut tk, driver) = setup();
        let label = tk.create("label").expect("label");
        tk.set_attribute(label, "TITLE", Some("Hello"));
        assert_eq!(driver.native_value(label, "TITLE"), None);

        tk.map(label).expect("map");
        assert_eq!(driver.native_value(label, "TITLE").as_deref(), Some("Hello"));
    }

    #[test]
    fn test_map_applies_inherited_native_values() {
        let (mut tk, driver) = setup();
        let vbox = tk.create("vbox").expect("vbox");
        let label = tk.create("label").expect("label");
        tk.append(vbox, label).expect("append");
        tk.set_attribute(vbox, "FONT", Some("Mono, 12"));

        tk.map(vbox).expect("map");
        assert_eq!(driver.native_value(label, "FONT").as_deref(), Some("Mono, 12"));
    }

    #[test]
    fn test_destroy_removes_subtree_and_registrations() {
        let (mut tk, _) = setup();
        let dialog = tk.create("dialog").expect("dialog");
        let vbox = tk.create("vbox").expect("vbox");
        let button = tk.create("button").expect("button");
        tk.append(dialog, vbox).expect("append");
        tk.append(vbox, button).expect("append");
        tk.set_attribute(button, "NAME", Some("ok"));
        tk.map(dialog).expect("map");
        assert_eq!(tk.dialog_count(), 1);

        tk.destroy(dialog);

        for id in [dialog, vbox, button] {
            assert!(!tk.contains(id));
        }
        assert_eq!(tk.get_handle("ok"), None);
        assert_eq!(tk.dialog_count(), 0);
        tk.destroy(dialog);
    }

    #[test]
    fn test_destroy_child_unlinks_from_parent() {
        let (mut tk, _) = setup();
        let vbox = tk.create("vbox").expect("vbox");
        let a = tk.create("label").expect("label");
        let b = tk.create("label").expect("label");
        tk.append(vbox, a).expect("append");
        tk.append(vbox, b).expect("append");

        tk.destroy(a);

        assert_eq!(tk.children(vbox), [b]);
    }

    thread_local! {
        static LOG: std::cell::RefCell<Vec<String>> = const { std::cell::RefCell::new(Vec::new()) };
    }

    struct Recorder(&'static str);

    impl ClassOps for Recorder {
        fn create(&self, _tk: &mut Toolkit, _id: ElementId) -> Result<()> {
            LOG.with(|log| log.borrow_mut().push(format!("create {}", self.0)));
            Ok(())
        }

        fn map(&self, _tk: &mut Toolkit, _id: ElementId) -> Result<()> {
            LOG.with(|log| log.borrow_mut().push(format!("map {}", self.0)));
            Ok(())
        }

        fn destroy(&self, _tk: &mut Toolkit, _id: ElementId) {
            LOG.with(|log| log.borrow_mut().push(format!("destroy {}", self.0)));
        }
    }

    #[test]
    fn test_class_chain_runs_in_lifecycle_order() {
        let (mut tk, _) = setup();
        let ops = ClassOp::CREATE | ClassOp::MAP | ClassOp::DESTROY;
        tk.register_class("fancy", move || {
            let outer = ClassBuilder::inherit("outer", crate::class::base_class())
                .ops(Recorder("outer"), ops);
            ClassBuilder::inherit("fancy", outer).ops(Recorder("fancy"), ops)
        });
        LOG.with(|log| log.borrow_mut().clear());

        let id = tk.create("fancy").expect("fancy");
        tk.map(id).expect("map");
        tk.destroy(id);

        let log = LOG.with(|log| log.borrow().clone());
        assert_eq!(
            log,
            [
                "create outer",
                "create fancy",
                "map outer",
                "map fancy",
                "destroy fancy",
                "destroy outer",
            ]
        );
    }
}
