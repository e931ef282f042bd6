//! Driver boundary - the native backend behind the element model.
//!
//! The toolkit consumes exactly these operations from a backend: creating
//! and releasing native objects, measuring leaf controls, native attribute
//! get/set and geometry sync. [`HeadlessDriver`] implements them in memory.

mod headless;
mod text_measure;

pub use crate::config::HeadlessConfig;
pub use headless::{DriverCall, HeadlessDriver};
pub use text_measure::{char_cells, grapheme_cells, line_cells, text_extent, wrapped_line_count};

use crate::element::{Element, ElementId};
use crate::error::Result;
use crate::types::Size;

/// Opaque native object reference, owned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// Native backend operations.
///
/// Every method gets the element's id and a shared view of the element, so
/// a driver can read its class, attributes and geometry.
#[allow(unused_variables)]
pub trait Driver {
    /// Create the native object. Called once per mapped lifetime, parents
    /// before children.
    fn map(&mut self, id: ElementId, element: &Element) -> Result<NativeHandle>;

    /// Release the native object. Called once per mapped lifetime, children
    /// before parents.
    fn unmap(&mut self, id: ElementId, element: &Element);

    /// Size of a leaf control's content.
    fn measure_intrinsic(&self, id: ElementId, element: &Element) -> Size;

    /// Apply a native attribute. `None` resets it.
    fn set_native_attribute(
        &mut self,
        id: ElementId,
        element: &Element,
        name: &str,
        value: Option<&str>,
    );

    /// Read a native attribute back. `None` defers to the stored value.
    fn get_native_attribute(&self, id: ElementId, element: &Element, name: &str) -> Option<String> {
        None
    }

    /// Move and resize the native object to the element's geometry.
    fn update_geometry(&mut self, id: ElementId, element: &Element) {}
}
