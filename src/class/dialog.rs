//! The `dialog` class: a top-level window holding one child.

use super::base::{get_raster_size, set_raster_size};
use super::{AccessorFlags, ClassBuilder, ClassOp, ClassOps, SetterOutcome};
use crate::element::ElementId;
use crate::layout::NaturalSize;
use crate::toolkit::Toolkit;
use crate::types::{ChildPolicy, Expand, NativeType, Size};

pub fn dialog_class() -> ClassBuilder {
    ClassBuilder::inherit("dialog", super::base_class())
        .native_type(NativeType::Dialog)
        .child_policy(ChildPolicy::One)
        .ops(DialogOps, ClassOp::LAYOUT)
        .terminal(ClassOp::LAYOUT)
        .attribute("TITLE", None, None, None, AccessorFlags::NATIVE)
        .attribute(
            "RASTERSIZE",
            Some(get_raster_size),
            Some(set_dialog_raster_size),
            None,
            AccessorFlags::NOT_MAPPED | AccessorFlags::NO_STRING,
        )
        .attribute("EXPAND", None, None, Some("YES"), AccessorFlags::NOT_MAPPED)
        .attribute("SHRINK", None, None, Some("NO"), AccessorFlags::NOT_MAPPED)
        .attribute("VISIBLE", None, None, Some("NO"), AccessorFlags::NATIVE)
        .attribute("DEFAULTENTER", None, None, None, AccessorFlags::NOT_MAPPED)
        .attribute("DEFAULTESC", None, None, None, AccessorFlags::NOT_MAPPED)
}

/// A new user size drops the current allocation so the next layout
/// starts from it.
fn set_dialog_raster_size(tk: &mut Toolkit, id: ElementId, value: Option<&str>) -> SetterOutcome {
    if let Some(el) = tk.element_mut(id) {
        el.set_current_size(Size::ZERO);
    }
    set_raster_size(tk, id, value)
}

struct DialogOps;

impl ClassOps for DialogOps {
    fn compute_natural_size(&self, tk: &mut Toolkit, id: ElementId, natural: &mut NaturalSize) {
        let Some(child) = tk.first_child(id) else {
            natural.children_expand = Expand::empty();
            return;
        };
        tk.compute_natural_size(child);
        if let Some(el) = tk.element(child) {
            let size = el.natural_size();
            natural.width = size.width;
            natural.height = size.height;
            natural.children_expand = el.expand() & Expand::BOTH;
        }
    }

    fn set_children_current_size(&self, tk: &mut Toolkit, id: ElementId, shrink: bool) {
        let Some(size) = tk.element(id).map(|el| el.current_size()) else {
            return;
        };
        if let Some(child) = tk.first_child(id) {
            tk.set_current_size(child, size.width, size.height, shrink);
        }
    }

    fn set_children_position(&self, tk: &mut Toolkit, id: ElementId) {
        if let Some(child) = tk.first_child(id) {
            tk.set_position(child, 0, 0);
        }
    }
}
