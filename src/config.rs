//! Toolkit and headless driver configuration.
//!
//! Plain structs with `Default`; override fields with struct-update syntax:
//!
//! ```
//! use trellis::{HeadlessDriver, Toolkit, ToolkitConfig};
//!
//! let tk = Toolkit::with_config(
//!     HeadlessDriver::default(),
//!     ToolkitConfig {
//!         default_font: "Mono, 10".into(),
//!         ..Default::default()
//!     },
//! );
//! assert_eq!(tk.get_global("DEFAULTFONT"), Some("Mono, 10"));
//! ```

use crate::table::TableSize;
use crate::types::Size;

/// Toolkit-wide settings fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitConfig {
    /// Initial size class of each element's attribute store.
    pub attribute_table_size: TableSize,
    /// Seeds the `DEFAULTFONT` global attribute.
    pub default_font: String,
    /// Maximum number of focus history entries.
    pub focus_history: usize,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            attribute_table_size: TableSize::Small,
            default_font: "Sans, 10".to_owned(),
            focus_history: 10,
        }
    }
}

/// Character grid used by the headless driver to measure text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessConfig {
    /// Pixels per character cell horizontally.
    pub char_width: i32,
    /// Pixels per text line.
    pub char_height: i32,
    /// Space added on each side of measured text.
    pub padding: Size,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            char_width: 8,
            char_height: 16,
            padding: Size::ZERO,
        }
    }
}
