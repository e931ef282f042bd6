//! Stacking containers: `vbox` and `hbox`.
//!
//! Children are laid out along the main axis separated by `GAP`, inside a
//! `MARGIN`. Free main-axis space is split evenly among the children that
//! expand along that axis; on the cross axis every child is offered the
//! full client size and aligned with `ALIGNMENT`.

use super::{AccessorFlags, ClassBuilder, ClassOp, ClassOps};
use crate::attrib::parse_size;
use crate::element::ElementId;
use crate::layout::NaturalSize;
use crate::toolkit::Toolkit;
use crate::types::{Alignment, ChildPolicy, Expand, Size};

const EARLY: AccessorFlags = AccessorFlags::NOT_MAPPED;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// (main, cross) components of a size.
    fn split(self, size: Size) -> (i32, i32) {
        match self {
            Self::Vertical => (size.height, size.width),
            Self::Horizontal => (size.width, size.height),
        }
    }

    fn join(self, main: i32, cross: i32) -> Size {
        match self {
            Self::Vertical => Size::new(cross, main),
            Self::Horizontal => Size::new(main, cross),
        }
    }

    fn expands_main(self, expand: Expand) -> bool {
        match self {
            Self::Vertical => expand.vertical(),
            Self::Horizontal => expand.horizontal(),
        }
    }
}

/// Abstract parent of the stacking boxes.
pub fn box_class() -> ClassBuilder {
    ClassBuilder::inherit("box", super::base_class())
        .child_policy(ChildPolicy::Many)
        .attribute("EXPAND", None, None, Some("YES"), EARLY)
        .attribute("GAP", None, None, Some("0"), EARLY)
        .attribute("MARGIN", None, None, Some("0x0"), EARLY)
        .attribute("ALIGNMENT", None, None, None, EARLY)
}

pub fn vbox_class() -> ClassBuilder {
    ClassBuilder::inherit("vbox", box_class())
        .ops(BoxOps(Orientation::Vertical), ClassOp::LAYOUT)
        .terminal(ClassOp::LAYOUT)
}

pub fn hbox_class() -> ClassBuilder {
    ClassBuilder::inherit("hbox", box_class())
        .ops(BoxOps(Orientation::Horizontal), ClassOp::LAYOUT)
        .terminal(ClassOp::LAYOUT)
}

struct BoxOps(Orientation);

/// Total gap space between `count` children.
fn gaps(gap: i32, count: i32) -> i32 {
    gap.saturating_mul((count - 1).max(0))
}

struct BoxSpacing {
    margin: Size,
    gap: i32,
    alignment: Alignment,
}

fn spacing(tk: &Toolkit, id: ElementId) -> BoxSpacing {
    BoxSpacing {
        margin: tk.get_attribute(id, "MARGIN").map(|m| parse_size(&m)).unwrap_or_default(),
        gap: tk.get_int(id, "GAP").unwrap_or(0).max(0),
        alignment: tk
            .get_attribute(id, "ALIGNMENT")
            .map(|a| Alignment::parse(&a))
            .unwrap_or_default(),
    }
}

impl ClassOps for BoxOps {
    fn compute_natural_size(&self, tk: &mut Toolkit, id: ElementId, natural: &mut NaturalSize) {
        let orientation = self.0;
        let spacing = spacing(tk, id);

        let mut main: i32 = 0;
        let mut cross = 0;
        let mut count = 0;
        let mut children_expand = Expand::empty();

        for child in tk.children(id) {
            tk.compute_natural_size(child);
            let Some(el) = tk.element(child) else { continue };
            if el.is_floating() {
                continue;
            }
            children_expand |= el.expand() & Expand::BOTH;
            let (child_main, child_cross) = orientation.split(el.natural_size());
            main = main.saturating_add(child_main);
            cross = cross.max(child_cross);
            count += 1;
        }

        main = main.saturating_add(gaps(spacing.gap, count));
        let (margin_main, margin_cross) = orientation.split(spacing.margin);
        let size = orientation.join(
            main.saturating_add(margin_main.saturating_mul(2)),
            cross.saturating_add(margin_cross.saturating_mul(2)),
        );

        natural.width = size.width;
        natural.height = size.height;
        natural.children_expand = children_expand;
    }

    fn set_children_current_size(&self, tk: &mut Toolkit, id: ElementId, shrink: bool) {
        let orientation = self.0;
        let spacing = spacing(tk, id);
        let Some(el) = tk.element(id) else { return };

        let (margin_main, margin_cross) = orientation.split(spacing.margin);
        let (current_main, current_cross) = orientation.split(el.current_size());
        let client_main = current_main.saturating_sub(margin_main.saturating_mul(2)).max(0);
        let client_cross = current_cross.saturating_sub(margin_cross.saturating_mul(2)).max(0);

        let children = tk.children(id);
        let mut used: i32 = 0;
        let mut count = 0;
        let mut expanding = 0;
        for &child in &children {
            let Some(c) = tk.element(child) else { continue };
            if c.is_floating() {
                continue;
            }
            used = used.saturating_add(orientation.split(c.natural_size()).0);
            count += 1;
            if orientation.expands_main(c.expand()) {
                expanding += 1;
            }
        }
        used = used.saturating_add(gaps(spacing.gap, count));

        let free = client_main.saturating_sub(used).max(0);
        let (share, mut remainder) = if expanding > 0 {
            (free / expanding, free % expanding)
        } else {
            (0, 0)
        };

        for child in children {
            let Some(c) = tk.element(child) else { continue };
            let natural = c.natural_size();
            if c.is_floating() {
                tk.set_current_size(child, natural.width, natural.height, shrink);
                continue;
            }

            let (mut main, _) = orientation.split(natural);
            if orientation.expands_main(c.expand()) {
                main = main.saturating_add(share);
                if remainder > 0 {
                    main = main.saturating_add(1);
                    remainder -= 1;
                }
            }
            let size = orientation.join(main, client_cross);
            tk.set_current_size(child, size.width, size.height, shrink);
        }
    }

    fn set_children_position(&self, tk: &mut Toolkit, id: ElementId) {
        let orientation = self.0;
        let spacing = spacing(tk, id);
        let Some(el) = tk.element(id) else { return };

        let (margin_main, margin_cross) = orientation.split(spacing.margin);
        let client_cross = orientation
            .split(el.current_size())
            .1
            .saturating_sub(margin_cross.saturating_mul(2))
            .max(0);

        let mut offset = margin_main;
        for child in tk.children(id) {
            let Some(c) = tk.element(child) else { continue };
            if c.is_floating() {
                tk.place_floating(child);
                continue;
            }
            let (child_main, child_cross) = orientation.split(c.current_size());
            let cross = margin_cross.saturating_add(spacing.alignment.offset(client_cross, child_cross));
            let position = orientation.join(offset, cross);
            tk.set_position(child, position.width, position.height);
            offset = offset.saturating_add(child_main).saturating_add(spacing.gap);
        }
    }
}
