//! In-memory driver.
//!
//! Native objects are counters, native attributes are kept per element and
//! text is measured on a fixed character grid. Every call is journaled so
//! hosts and tests can inspect what the toolkit asked for. Clones share
//! state, so a copy kept outside the toolkit observes the one inside it.

use std::cell::RefCell;
use std::rc::Rc;

use super::text_measure::{text_extent, wrapped_line_count};
use super::{Driver, HeadlessConfig, NativeHandle};
use crate::attrib::parse_bool;
use crate::element::{Element, ElementId};
use crate::error::{Error, Result};
use crate::table::{IdentityKey, IdentityTable, StringTable};
use crate::types::{Point, Size};

/// One journaled driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Map(ElementId),
    Unmap(ElementId),
    Measure(ElementId),
    SetAttribute(ElementId, String, Option<String>),
    UpdateGeometry(ElementId),
}

#[derive(Default)]
struct HeadlessState {
    config: HeadlessConfig,
    next_handle: u64,
    calls: Vec<DriverCall>,
    failing_classes: Vec<String>,
    intrinsic: IdentityTable<Size>,
    native: IdentityTable<StringTable<String>>,
    geometry: IdentityTable<(Point, Size)>,
}

#[derive(Clone, Default)]
pub struct HeadlessDriver {
    state: Rc<RefCell<HeadlessState>>,
}

impl std::fmt::Debug for HeadlessDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessDriver")
            .field("config", &state.config)
            .field("calls", &state.calls.len())
            .finish()
    }
}

impl HeadlessDriver {
    pub fn new(config: HeadlessConfig) -> Self {
        let driver = Self::default();
        driver.state.borrow_mut().config = config;
        driver
    }

    /// Journal of calls since creation or the last [`clear_calls`](Self::clear_calls).
    pub fn calls(&self) -> Vec<DriverCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Make `map` fail for every element of `class`.
    pub fn fail_map_for(&self, class: &str) {
        self.state.borrow_mut().failing_classes.push(class.to_owned());
    }

    /// Report `size` as the intrinsic size of `id` instead of measuring it.
    pub fn set_intrinsic(&self, id: ElementId, size: Size) {
        self.state.borrow_mut().intrinsic.set(IdentityKey::from(id), size);
    }

    /// Current native value of attribute `name` on `id`.
    pub fn native_value(&self, id: ElementId, name: &str) -> Option<String> {
        self.state
            .borrow()
            .native
            .get(&IdentityKey::from(id))?
            .get(name)
            .cloned()
    }

    /// Geometry last pushed by `update_geometry`.
    pub fn geometry(&self, id: ElementId) -> Option<(Point, Size)> {
        self.state.borrow().geometry.get(&IdentityKey::from(id)).copied()
    }

    fn record(&self, call: DriverCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Driver for HeadlessDriver {
    fn map(&mut self, id: ElementId, element: &Element) -> Result<NativeHandle> {
        self.record(DriverCall::Map(id));
        let mut state = self.state.borrow_mut();
        let class = element.class().name();
        if state.failing_classes.iter().any(|c| c == class) {
            return Err(Error::Driver(format!("cannot create native {class} object")));
        }
        state.next_handle += 1;
        Ok(NativeHandle(state.next_handle))
    }

    fn unmap(&mut self, id: ElementId, _element: &Element) {
        self.record(DriverCall::Unmap(id));
        let mut state = self.state.borrow_mut();
        state.native.remove(&IdentityKey::from(id));
        state.geometry.remove(&IdentityKey::from(id));
    }

    fn measure_intrinsic(&self, id: ElementId, element: &Element) -> Size {
        self.record(DriverCall::Measure(id));
        let state = self.state.borrow();
        if let Some(size) = state.intrinsic.get(&IdentityKey::from(id)) {
            return *size;
        }

        let config = &state.config;
        let Some(title) = element.attributes().get_str("TITLE") else {
            return Size::ZERO;
        };
        let (columns, mut lines) = text_extent(title);

        let user_width = element.user_size().width;
        let wraps = element
            .attributes()
            .get_str("WORDWRAP")
            .is_some_and(parse_bool);
        if wraps && user_width > 0 && config.char_width > 0 {
            let cells = user_width
                .saturating_sub(config.padding.width.saturating_mul(2))
                .max(0)
                / config.char_width;
            lines = wrapped_line_count(title, usize::try_from(cells).unwrap_or(0));
        }

        let cells = |count: usize, cell: i32| i32::try_from(count).unwrap_or(i32::MAX).saturating_mul(cell);
        Size::new(
            cells(columns, config.char_width).saturating_add(config.padding.width.saturating_mul(2)),
            cells(lines, config.char_height).saturating_add(config.padding.height.saturating_mul(2)),
        )
    }

    fn set_native_attribute(
        &mut self,
        id: ElementId,
        _element: &Element,
        name: &str,
        value: Option<&str>,
    ) {
        self.record(DriverCall::SetAttribute(id, name.to_owned(), value.map(str::to_owned)));
        let mut state = self.state.borrow_mut();
        let key = IdentityKey::from(id);
        match value {
            Some(value) => {
                if state.native.get(&key).is_none() {
                    state.native.set(key, StringTable::new());
                }
                if let Some(attributes) = state.native.get_mut(&key) {
                    attributes.set(name.to_owned(), value.to_owned());
                }
            }
            None => {
                if let Some(attributes) = state.native.get_mut(&key) {
                    attributes.remove(name);
                }
            }
        }
    }

    fn get_native_attribute(&self, id: ElementId, _element: &Element, name: &str) -> Option<String> {
        self.native_value(id, name)
    }

    fn update_geometry(&mut self, id: ElementId, element: &Element) {
        self.record(DriverCall::UpdateGeometry(id));
        self.state
            .borrow_mut()
            .geometry
            .set(IdentityKey::from(id), (element.position(), element.current_size()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::Toolkit;

    fn setup() -> (Toolkit, HeadlessDriver) {
        let driver = HeadlessDriver::new(HeadlessConfig {
            char_width: 10,
            char_height: 20,
            padding: Size::new(2, 1),
        });
        (Toolkit::new(driver.clone()), driver)
    }

    #[test]
    fn test_measure_with_padding_and_lines() {
        let (mut tk, _) = setup();
        let label = tk.create("label").expect("label");
        tk.set_attribute(label, "TITLE", Some("ab\nabcd"));
        assert_eq!(tk.measure_intrinsic(label), Size::new(40 + 4, 40 + 2));
    }

    #[test]
    fn test_measure_wraps_at_user_width() {
        let (mut tk, _) = setup();
        let label = tk
            .create_with("label", "TITLE=abcdefghij, WORDWRAP=YES, RASTERSIZE=54x")
            .expect("label");
        // 50 usable pixels = 5 cells, 10 characters = 2 lines.
        tk.compute_natural_size(label);
        assert_eq!(tk.element(label).map(|e| e.natural_size()), Some(Size::new(54, 42)));
    }

    #[test]
    fn test_intrinsic_override() {
        let (mut tk, driver) = setup();
        let canvas = tk.create("canvas").expect("canvas");
        driver.set_intrinsic(canvas, Size::new(7, 9));
        assert_eq!(tk.measure_intrinsic(canvas), Size::new(7, 9));
    }

    #[test]
    fn test_handles_are_unique_and_native_state_is_dropped_on_unmap() {
        let (mut tk, driver) = setup();
        let a = tk.create("label").expect("label");
        let b = tk.create("label").expect("label");
        tk.map(a).expect("map");
        tk.map(b).expect("map");
        let handle = |id| tk.element(id).and_then(|e| e.handle());
        assert_ne!(handle(a), handle(b));

        tk.set_attribute(a, "TITLE", Some("x"));
        assert_eq!(driver.native_value(a, "TITLE").as_deref(), Some("x"));
        tk.unmap(a);
        assert_eq!(driver.native_value(a, "TITLE"), None);
    }

    #[test]
    fn test_geometry_is_pushed() {
        let (mut tk, driver) = setup();
        let dialog = tk.create("dialog").expect("dialog");
        let label = tk.create_with("label", "TITLE=abc").expect("label");
        tk.append(dialog, label).expect("append");
        tk.map(dialog).expect("map");
        tk.refresh(dialog);

        assert_eq!(
            driver.geometry(label),
            Some((Point::ORIGIN, Size::new(30 + 4, 20 + 2)))
        );
    }
}
