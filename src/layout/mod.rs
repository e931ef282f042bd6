//! Layout solver.
//!
//! Geometry is computed in three strictly ordered passes over an element
//! subtree:
//!
//! 1. **Natural size** (bottom-up): the size an element wants. Leaves ask the
//!    driver unless `RASTERSIZE` fixes both axes; containers fold their
//!    children's natural sizes through their class's arrangement.
//! 2. **Current size** (top-down): the size an element gets. Only axes in
//!    the element's expand policy take the offered size; the others keep the
//!    natural size.
//! 3. **Position** (top-down): each container places its children relative
//!    to its own origin.
//!
//! A fourth pass, `layout_update`, pushes the result to the native objects of
//! mapped elements.
//!
//! # Example
//!
//! ```
//! use trellis::{HeadlessDriver, Size, Toolkit};
//!
//! let mut tk = Toolkit::new(HeadlessDriver::default());
//! let dialog = tk.create("dialog").unwrap();
//! let vbox = tk.create("vbox").unwrap();
//! let label = tk.create_with("label", "RASTERSIZE=100x20").unwrap();
//! tk.append(vbox, label).unwrap();
//! tk.append(dialog, vbox).unwrap();
//!
//! tk.refresh(dialog);
//! assert_eq!(tk.element(label).unwrap().current_size(), Size::new(100, 20));
//! ```

mod solver;

use crate::types::Expand;

/// Result of a class's natural size computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalSize {
    pub width: i32,
    pub height: i32,
    /// Union of the expand policies of the non-floating children.
    pub children_expand: Expand,
}
