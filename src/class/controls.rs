//! Leaf classes: `label`, `button`, `canvas` and `timer`.
//!
//! Their natural size comes from the driver's intrinsic measurement; the
//! only layout knob they carry is `RASTERSIZE` inherited from `base`.

use super::{AccessorFlags, ClassBuilder, ClassOp, ClassOps};
use crate::attrib::parse_bool;
use crate::element::ElementId;
use crate::toolkit::Toolkit;
use crate::types::NativeType;

const EARLY: AccessorFlags = AccessorFlags::NOT_MAPPED;

pub fn label_class() -> ClassBuilder {
    ClassBuilder::inherit("label", super::base_class())
        .native_type(NativeType::Control)
        .attribute("TITLE", None, None, None, AccessorFlags::NATIVE)
        .attribute("ALIGNMENT", None, None, Some("ALEFT"), AccessorFlags::NATIVE)
        .attribute("WORDWRAP", None, None, Some("NO"), EARLY)
}

pub fn button_class() -> ClassBuilder {
    ClassBuilder::inherit("button", super::base_class())
        .native_type(NativeType::Control)
        .attribute("TITLE", None, None, None, AccessorFlags::NATIVE)
        .attribute("CANFOCUS", None, None, Some("YES"), EARLY)
        .attribute("FLAT", None, None, Some("NO"), EARLY)
}

pub fn canvas_class() -> ClassBuilder {
    ClassBuilder::inherit("canvas", super::base_class())
        .native_type(NativeType::Canvas)
        .attribute("CANFOCUS", None, None, Some("YES"), EARLY)
        .attribute("BORDER", None, None, Some("YES"), EARLY)
}

/// A non-visual element. `RUN` only tracks the requested state; driving the
/// clock is up to the host.
pub fn timer_class() -> ClassBuilder {
    ClassBuilder::inherit("timer", super::base_class())
        .native_type(NativeType::Void)
        .ops(TimerOps, ClassOp::UNMAP)
        .attribute("TIME", None, None, Some("0"), EARLY | AccessorFlags::NO_DEFAULT)
        .attribute("RUN", None, None, Some("NO"), EARLY)
}

struct TimerOps;

impl ClassOps for TimerOps {
    fn unmap(&self, tk: &mut Toolkit, id: ElementId) {
        if tk.get_bool(id, "RUN") {
            tracing::debug!(?id, "stopping timer on unmap");
            tk.set_attribute(id, "RUN", Some("NO"));
        }
    }
}

/// Whether a timer was asked to run.
pub fn timer_running(tk: &Toolkit, id: ElementId) -> bool {
    tk.get_attribute(id, "RUN").is_some_and(|run| parse_bool(&run))
}
