//! The `base` class: attributes and operations shared by every element.

use super::{AccessorFlags, ClassBuilder, ClassOp, ClassOps, SetterOutcome};
use crate::attrib::{format_size, parse_size};
use crate::element::ElementId;
use crate::layout::NaturalSize;
use crate::toolkit::Toolkit;
use crate::types::{ElementFlags, Size};

const EARLY: AccessorFlags = AccessorFlags::NOT_MAPPED;
const READ: AccessorFlags = AccessorFlags::READ_ONLY.union(AccessorFlags::NOT_MAPPED);

/// Builder for the root of every class chain.
pub fn base_class() -> ClassBuilder {
    ClassBuilder::new("base")
        .ops(BaseOps, ClassOp::COMPUTE_NATURAL_SIZE | ClassOp::LAYOUT_UPDATE)
        // Identity
        .attribute("NAME", None, Some(set_name), None, EARLY)
        .attribute("CLASSNAME", Some(get_class_name), None, None, READ)
        .attribute("WID", Some(get_wid), None, None, AccessorFlags::READ_ONLY)
        .attribute("CHILDCOUNT", Some(get_child_count), None, None, READ)
        // Geometry
        .attribute(
            "RASTERSIZE",
            Some(get_raster_size),
            Some(set_raster_size),
            None,
            EARLY.union(AccessorFlags::NO_STRING),
        )
        .attribute("NATURALSIZE", Some(get_natural_size), None, None, READ)
        .attribute("CURRENTSIZE", Some(get_current_size), None, None, READ)
        .attribute("POSITION", Some(get_position), None, None, READ)
        .attribute("EXPAND", None, None, Some("NO"), EARLY)
        .attribute("MINSIZE", None, Some(set_min_size), None, EARLY)
        .attribute("MAXSIZE", None, Some(set_max_size), None, EARLY)
        .attribute("FLOATING", None, Some(set_floating), Some("NO"), EARLY)
        .attribute("CX", None, None, None, EARLY)
        .attribute("CY", None, None, None, EARLY)
        // Native state
        .attribute(
            "ACTIVE",
            None,
            None,
            Some("YES"),
            AccessorFlags::INHERIT | AccessorFlags::NATIVE,
        )
        .attribute("VISIBLE", None, None, Some("YES"), AccessorFlags::NATIVE)
        .attribute("FONT", None, None, None, AccessorFlags::INHERIT | AccessorFlags::NATIVE)
        .attribute("BGCOLOR", None, None, None, AccessorFlags::INHERIT | AccessorFlags::NATIVE)
        .attribute("FGCOLOR", None, None, None, AccessorFlags::NATIVE)
        .attribute("TIP", None, None, None, AccessorFlags::NATIVE)
        .attribute("CANFOCUS", None, None, Some("NO"), EARLY)
}

struct BaseOps;

impl ClassOps for BaseOps {
    fn compute_natural_size(&self, tk: &mut Toolkit, id: ElementId, natural: &mut NaturalSize) {
        let measured = tk.measure_intrinsic(id);
        natural.width = measured.width;
        natural.height = measured.height;
    }

    fn layout_update(&self, tk: &mut Toolkit, id: ElementId) {
        tk.update_native_geometry(id);
    }
}

// =============================================================================
// Identity
// =============================================================================

fn set_name(tk: &mut Toolkit, id: ElementId, value: Option<&str>) -> SetterOutcome {
    if let Some(old) = tk.element(id).and_then(|el| el.attributes().get_str("NAME")) {
        let old = old.to_owned();
        if tk.get_handle(&old) == Some(id) {
            tk.set_handle(&old, None);
        }
    }
    if let Some(name) = value {
        tk.set_handle(name, Some(id));
    }
    SetterOutcome::Store
}

fn get_class_name(tk: &Toolkit, id: ElementId) -> Option<String> {
    tk.element(id).map(|el| el.class().name().to_owned())
}

fn get_wid(tk: &Toolkit, id: ElementId) -> Option<String> {
    tk.element(id)?.handle().map(|handle| handle.0.to_string())
}

fn get_child_count(tk: &Toolkit, id: ElementId) -> Option<String> {
    Some(tk.child_count(id).to_string())
}

// =============================================================================
// Geometry
// =============================================================================

pub(super) fn get_raster_size(tk: &Toolkit, id: ElementId) -> Option<String> {
    let user = tk.element(id)?.user_size();
    (user != Size::ZERO).then(|| format_size(user))
}

pub(super) fn set_raster_size(tk: &mut Toolkit, id: ElementId, value: Option<&str>) -> SetterOutcome {
    let size = value.map(parse_size).unwrap_or(Size::ZERO);
    if let Some(el) = tk.element_mut(id) {
        el.set_user_size(size);
    }
    SetterOutcome::Consumed
}

fn get_natural_size(tk: &Toolkit, id: ElementId) -> Option<String> {
    tk.element(id).map(|el| format_size(el.natural_size()))
}

fn get_current_size(tk: &Toolkit, id: ElementId) -> Option<String> {
    tk.element(id).map(|el| format_size(el.current_size()))
}

fn get_position(tk: &Toolkit, id: ElementId) -> Option<String> {
    tk.element(id).map(|el| {
        let position = el.position();
        format!("{},{}", position.x, position.y)
    })
}

fn set_flag(tk: &mut Toolkit, id: ElementId, flag: ElementFlags, on: bool) {
    if let Some(el) = tk.element_mut(id) {
        el.set_flags(flag, on);
    }
}

fn set_min_size(tk: &mut Toolkit, id: ElementId, value: Option<&str>) -> SetterOutcome {
    set_flag(tk, id, ElementFlags::MIN_SIZE, value.is_some());
    SetterOutcome::Store
}

fn set_max_size(tk: &mut Toolkit, id: ElementId, value: Option<&str>) -> SetterOutcome {
    set_flag(tk, id, ElementFlags::MAX_SIZE, value.is_some());
    SetterOutcome::Store
}

fn set_floating(tk: &mut Toolkit, id: ElementId, value: Option<&str>) -> SetterOutcome {
    let value = value.unwrap_or("NO").trim().to_ascii_uppercase();
    set_flag(tk, id, ElementFlags::FLOATING, value == "YES");
    set_flag(tk, id, ElementFlags::FLOATING_IGNORE, value == "IGNORE");
    SetterOutcome::Store
}
