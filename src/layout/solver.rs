//! The three layout passes plus `layout_update`, as `Toolkit` methods.

use tracing::{debug, trace};

use super::NaturalSize;
use crate::element::ElementId;
use crate::toolkit::Toolkit;
use crate::types::{ElementFlags, Expand, Point, Size};

impl Toolkit {
    // =========================================================================
    // Entry points
    // =========================================================================

    /// Lay out the dialog (or topmost ancestor) containing `id` and sync the
    /// native objects. `SHRINK` on that element selects the shrink policy.
    pub fn refresh(&mut self, id: ElementId) {
        if !self.contains(id) {
            return;
        }
        let top = self.dialog_of(id).unwrap_or_else(|| self.root_of(id));
        let shrink = self.get_bool(top, "SHRINK");
        debug!(?top, shrink, "refresh");

        self.compute_natural_size(top);
        let Some(el) = self.element(top) else { return };
        let offered = non_zero_or(el.current_size(), el.natural_size());
        let position = el.position();
        self.set_current_size(top, offered.width, offered.height, shrink);
        self.set_position(top, position.x, position.y);
        self.layout_update(top);
    }

    /// Run the three passes on the subtree at `id`, offering `width` x
    /// `height` (0 on an axis offers the natural size). The subtree root
    /// keeps its position.
    pub fn compute_layout(&mut self, id: ElementId, width: i32, height: i32, shrink: bool) {
        self.compute_natural_size(id);
        let Some(el) = self.element(id) else { return };
        let offered = non_zero_or(Size::new(width, height), el.natural_size());
        let position = el.position();
        self.set_current_size(id, offered.width, offered.height, shrink);
        self.set_position(id, position.x, position.y);
    }

    /// Re-arrange the children of `id` inside its current allocation, then
    /// sync the native objects of the subtree.
    pub fn refresh_children(&mut self, id: ElementId) {
        let Some(class) = self.element(id).map(|el| el.class_rc()) else {
            return;
        };
        let top = self.dialog_of(id).unwrap_or_else(|| self.root_of(id));
        let shrink = self.get_bool(top, "SHRINK");

        // Children only; the element's own size stays as allocated.
        for child in self.children(id) {
            self.compute_natural_size(child);
        }
        class.run_set_children_current_size(self, id, shrink);
        class.run_set_children_position(self, id);
        self.layout_update(id);
    }

    // =========================================================================
    // Pass 1: natural size
    // =========================================================================

    /// Compute the natural size and expand policy of `id` and its subtree.
    pub fn compute_natural_size(&mut self, id: ElementId) {
        let Some(el) = self.element(id) else { return };
        if el.is_layout_ignored() {
            return;
        }
        let class = el.class_rc();
        let user = el.user_size();
        let current = el.current_size();
        let requested = self
            .get_attribute(id, "EXPAND")
            .map(|v| Expand::parse(&v))
            .unwrap_or_default();

        let (natural, expand) = if class.is_dialog() || class.is_container() {
            let mut content = NaturalSize::default();
            class.run_compute_natural_size(self, id, &mut content);
            if class.is_dialog() {
                let pick = |user: i32, current: i32, content: i32| {
                    if user != 0 { user } else { current.max(content) }
                };
                (
                    Size::new(
                        pick(user.width, current.width, content.width),
                        pick(user.height, current.height, content.height),
                    ),
                    requested | content.children_expand,
                )
            } else {
                (
                    Size::new(user.width.max(content.width), user.height.max(content.height)),
                    requested & content.children_expand,
                )
            }
        } else if user.width == 0 || user.height == 0 {
            let mut measured = NaturalSize::default();
            class.run_compute_natural_size(self, id, &mut measured);
            (
                Size::new(
                    if user.width == 0 { measured.width } else { user.width },
                    if user.height == 0 { measured.height } else { user.height },
                ),
                requested,
            )
        } else {
            (user, requested)
        };

        let natural = self.clamp_min_max(id, natural);
        trace!(?id, ?natural, ?expand, "natural size");
        if let Some(el) = self.element_mut(id) {
            el.set_natural_size(natural);
            el.set_expand(expand);
        }
    }

    /// Clamp to `MAXSIZE`, then raise to `MINSIZE`: a minimum larger than
    /// the maximum wins. A 0 maximum on an axis leaves it unbounded.
    fn clamp_min_max(&self, id: ElementId, size: Size) -> Size {
        let Some(flags) = self.element(id).map(|el| el.flags()) else {
            return size;
        };
        let min = flags
            .contains(ElementFlags::MIN_SIZE)
            .then(|| self.get_size(id, "MINSIZE"))
            .flatten()
            .unwrap_or(Size::ZERO);
        let max = flags
            .contains(ElementFlags::MAX_SIZE)
            .then(|| self.get_size(id, "MAXSIZE"))
            .flatten()
            .unwrap_or(Size::ZERO);

        let clamp = |value: i32, min: i32, max: i32| {
            let value = value.max(min).max(0);
            if max > 0 { value.min(max.max(min)) } else { value }
        };
        Size::new(
            clamp(size.width, min.width, max.width),
            clamp(size.height, min.height, max.height),
        )
    }

    // =========================================================================
    // Pass 2: current size
    // =========================================================================

    /// Allocate `width` x `height` to `id` and distribute it to the subtree.
    pub fn set_current_size(&mut self, id: ElementId, width: i32, height: i32, shrink: bool) {
        let Some(el) = self.element(id) else { return };
        if el.is_layout_ignored() {
            return;
        }
        let class = el.class_rc();
        let natural = el.natural_size();
        let current = el.current_size();
        let expand = el.expand();

        let size = if class.is_dialog() {
            // An earlier allocation is kept.
            non_zero_or(current, natural)
        } else {
            let (mut width, mut height) = (width.max(0), height.max(0));
            if class.is_container() && !shrink {
                width = width.max(natural.width);
                height = height.max(natural.height);
            }
            let size = Size::new(
                if expand.horizontal() { width } else { natural.width },
                if expand.vertical() { height } else { natural.height },
            );
            if expand.is_empty() { size } else { self.clamp_min_max(id, size) }
        };

        trace!(?id, ?size, "current size");
        if let Some(el) = self.element_mut(id) {
            el.set_current_size(size);
        }
        class.run_set_children_current_size(self, id, shrink);
    }

    // =========================================================================
    // Pass 3: position
    // =========================================================================

    /// Place `id` at `x`, `y` relative to its parent and arrange its children.
    pub fn set_position(&mut self, id: ElementId, x: i32, y: i32) {
        let Some(el) = self.element_mut(id) else { return };
        if el.is_layout_ignored() {
            return;
        }
        el.set_position(Point::new(x, y));
        let class = el.class_rc();
        class.run_set_children_position(self, id);
    }

    /// Place a floating element at its `CX`, `CY` attributes.
    pub fn place_floating(&mut self, id: ElementId) {
        let x = self.get_int(id, "CX").unwrap_or(0);
        let y = self.get_int(id, "CY").unwrap_or(0);
        self.set_position(id, x, y);
    }

    // =========================================================================
    // Native sync
    // =========================================================================

    /// Push geometry to the native objects of the mapped elements of the
    /// subtree, parents first.
    pub fn layout_update(&mut self, id: ElementId) {
        let Some(el) = self.element(id) else { return };
        if !el.is_mapped() || el.is_layout_ignored() {
            return;
        }
        let class = el.class_rc();
        class.run_layout_update(self, id);
        for child in self.children(id) {
            self.layout_update(child);
        }
    }
}

fn non_zero_or(size: Size, fallback: Size) -> Size {
    Size::new(
        if size.width > 0 { size.width } else { fallback.width },
        if size.height > 0 { size.height } else { fallback.height },
    )
}

#[cfg(test)]
mod tests {
    use crate::driver::{DriverCall, HeadlessConfig, HeadlessDriver};
    use crate::element::ElementId;
    use crate::toolkit::Toolkit;
    use crate::types::{Expand, Point, Size};

    fn setup() -> (Toolkit, HeadlessDriver) {
        let driver = HeadlessDriver::new(HeadlessConfig {
            char_width: 10,
            char_height: 20,
            ..Default::default()
        });
        (Toolkit::new(driver.clone()), driver)
    }

    fn geometry(tk: &Toolkit, ids: &[ElementId]) -> Vec<(Size, Size, Point)> {
        ids.iter()
            .filter_map(|&id| tk.element(id))
            .map(|el| (el.natural_size(), el.current_size(), el.position()))
            .collect()
    }

    /// A(vbox) holding B(label, 100x20).
    fn scenario(tk: &mut Toolkit) -> (ElementId, ElementId) {
        let a = tk.create("vbox").expect("vbox");
        let b = tk.create_with("label", "TITLE=0123456789").expect("label");
        tk.append(a, b).expect("append");
        (a, b)
    }

    #[test]
    fn test_end_to_end_container_and_leaf() {
        let (mut tk, _) = setup();
        let (a, b) = scenario(&mut tk);

        tk.compute_natural_size(a);
        assert_eq!(tk.element(a).map(|e| e.natural_size()), Some(Size::new(100, 20)));
        assert_eq!(tk.element(a).map(|e| e.expand()), Some(Expand::empty()));

        tk.set_current_size(a, 200, 20, false);
        assert_eq!(tk.element(a).map(|e| e.current_size()), Some(Size::new(100, 20)));
        assert_eq!(tk.element(b).map(|e| e.current_size()), Some(Size::new(100, 20)));

        tk.set_position(a, 0, 0);
        assert_eq!(tk.element(b).map(|e| e.position()), Some(Point::ORIGIN));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let (mut tk, _) = setup();
        let dialog = tk.create("dialog").expect("dialog");
        let (a, b) = scenario(&mut tk);
        let c = tk.create_with("button", "TITLE=ok, EXPAND=HORIZONTAL").expect("button");
        tk.append(a, c).expect("append");
        tk.append(dialog, a).expect("append");
        tk.set_attribute(dialog, "RASTERSIZE", Some("300x100"));

        let ids = [dialog, a, b, c];
        tk.refresh(dialog);
        let first = geometry(&tk, &ids);
        tk.refresh(dialog);
        assert_eq!(geometry(&tk, &ids), first);
    }

    #[test]
    fn test_children_expand() {
        let (mut tk, _) = setup();
        let (a, b) = scenario(&mut tk);
        tk.compute_natural_size(a);
        assert_eq!(tk.element(a).map(|e| e.expand()), Some(Expand::empty()));

        tk.set_attribute(b, "EXPAND", Some("VERTICAL"));
        tk.compute_natural_size(a);
        assert_eq!(tk.element(a).map(|e| e.expand()), Some(Expand::HEIGHT));
    }

    #[test]
    fn test_dialog_grows_if_any_child_expands() {
        let (mut tk, _) = setup();
        let dialog = tk.create("dialog").expect("dialog");
        tk.set_attribute(dialog, "EXPAND", Some("NO"));
        let (a, b) = scenario(&mut tk);
        tk.set_attribute(b, "EXPAND", Some("HORIZONTAL"));
        tk.append(dialog, a).expect("append");

        tk.compute_natural_size(dialog);
        assert_eq!(tk.element(dialog).map(|e| e.expand()), Some(Expand::WIDTH));
    }

    #[test]
    fn test_shrink_policy() {
        let (mut tk, _) = setup();
        let (a, b) = scenario(&mut tk);
        tk.set_attribute(b, "EXPAND", Some("YES"));
        tk.compute_natural_size(a);

        tk.set_current_size(a, 40, 10, false);
        assert_eq!(tk.element(a).map(|e| e.current_size()), Some(Size::new(100, 20)));

        tk.set_current_size(a, 40, 10, true);
        assert_eq!(tk.element(a).map(|e| e.current_size()), Some(Size::new(40, 10)));

        tk.set_attribute(a, "MINSIZE", Some("60x15"));
        tk.compute_natural_size(a);
        tk.set_current_size(a, 40, 10, true);
        assert_eq!(tk.element(a).map(|e| e.current_size()), Some(Size::new(60, 15)));
    }

    #[test]
    fn test_min_wins_over_max() {
        let (mut tk, _) = setup();
        let label = tk.create_with("label", "TITLE=0123456789").expect("label");
        tk.set_attributes(label, "MINSIZE=50x30, MAXSIZE=40x0");
        tk.compute_natural_size(label);
        // Width: max 40 is raised to the 50 minimum. Height: 0 max is unbounded.
        assert_eq!(tk.element(label).map(|e| e.natural_size()), Some(Size::new(50, 30)));

        tk.set_attribute(label, "MAXSIZE", Some("80x25"));
        tk.compute_natural_size(label);
        assert_eq!(tk.element(label).map(|e| e.natural_size()), Some(Size::new(80, 30)));
    }

    #[test]
    fn test_expanding_axis_is_reclamped_with_min_winning() {
        let (mut tk, _) = setup();
        let vbox = tk.create("vbox").expect("vbox");
        let label = tk
            .create_with("label", "EXPAND=YES, MINSIZE=80x30, MAXSIZE=50x20")
            .expect("label");
        tk.append(vbox, label).expect("append");

        tk.compute_layout(vbox, 300, 200, false);

        assert_eq!(tk.element(vbox).map(|e| e.current_size()), Some(Size::new(300, 200)));
        // Offered 300x200, capped by the max, raised back to the min.
        assert_eq!(tk.element(label).map(|e| e.current_size()), Some(Size::new(80, 30)));
    }

    #[test]
    fn test_user_size_fills_only_set_axes() {
        let (mut tk, _) = setup();
        let label = tk.create_with("label", "TITLE=0123456789, RASTERSIZE=x50").expect("label");
        tk.compute_natural_size(label);
        assert_eq!(tk.element(label).map(|e| e.natural_size()), Some(Size::new(100, 50)));
    }

    #[test]
    fn test_user_size_on_container_is_a_floor() {
        let (mut tk, _) = setup();
        let (a, _) = scenario(&mut tk);
        tk.set_attribute(a, "RASTERSIZE", Some("50x60"));
        tk.compute_natural_size(a);
        assert_eq!(tk.element(a).map(|e| e.natural_size()), Some(Size::new(100, 60)));
    }

    #[test]
    fn test_floating_ignore_is_untouched() {
        let (mut tk, _) = setup();
        let (a, b) = scenario(&mut tk);
        tk.set_attribute(b, "FLOATING", Some("IGNORE"));
        tk.compute_layout(a, 0, 0, false);
        assert_eq!(tk.element(b).map(|e| e.natural_size()), Some(Size::ZERO));
        assert_eq!(tk.element(a).map(|e| e.natural_size()), Some(Size::ZERO));
    }

    #[test]
    fn test_dialog_keeps_earlier_allocation() {
        let (mut tk, _) = setup();
        let dialog = tk.create("dialog").expect("dialog");
        let (a, b) = scenario(&mut tk);
        tk.append(dialog, a).expect("append");

        tk.refresh(dialog);
        assert_eq!(tk.element(dialog).map(|e| e.current_size()), Some(Size::new(100, 20)));

        tk.set_attribute(b, "TITLE", Some("01234"));
        tk.refresh(dialog);
        assert_eq!(tk.element(dialog).map(|e| e.current_size()), Some(Size::new(100, 20)));
        assert_eq!(tk.element(b).map(|e| e.current_size()), Some(Size::new(50, 20)));
    }

    #[test]
    fn test_layout_update_only_for_mapped() {
        let (mut tk, driver) = setup();
        let dialog = tk.create("dialog").expect("dialog");
        let (a, b) = scenario(&mut tk);
        tk.append(dialog, a).expect("append");

        tk.refresh(dialog);
        assert!(driver.calls().iter().all(|c| !matches!(c, DriverCall::UpdateGeometry(_))));

        tk.map(dialog).expect("map");
        driver.clear_calls();
        tk.refresh(dialog);
        let updated: Vec<ElementId> = driver
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                DriverCall::UpdateGeometry(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(updated, [dialog, a, b]);
    }

    #[test]
    fn test_refresh_children_keeps_own_allocation() {
        let (mut tk, _) = setup();
        let (a, b) = scenario(&mut tk);
        tk.set_attribute(b, "EXPAND", Some("HORIZONTAL"));
        tk.compute_layout(a, 300, 0, false);
        assert_eq!(tk.element(b).map(|e| e.current_size()), Some(Size::new(300, 20)));

        tk.set_attribute(b, "TITLE", Some("0123456789012"));
        tk.refresh_children(a);
        assert_eq!(tk.element(a).map(|e| e.current_size()), Some(Size::new(300, 20)));
        assert_eq!(tk.element(b).map(|e| e.current_size()), Some(Size::new(300, 20)));
    }
}
