//! # trellis
//!
//! Element model, attribute dispatch and layout solver for cross-platform
//! widget toolkits.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! observable focus state.
//!
//! ## Architecture
//!
//! Every widget is an [`Element`] in an arena owned by the [`Toolkit`]. An
//! element points at a [`ClassDescriptor`] that chains to its parent class;
//! class operations walk that chain. Elements are configured through
//! string-keyed attributes: a registered accessor may intercept reads and
//! writes, inheritable attributes resolve through ancestors and native
//! attributes are forwarded to the [`Driver`] once the element is mapped.
//!
//! ```text
//! create ─▶ set attributes ─▶ append ─▶ map ─▶ refresh ─▶ native geometry
//!                                         │        │
//!                                      Driver   natural → current → position
//! ```
//!
//! ## Example
//!
//! ```
//! use trellis::{HeadlessDriver, Point, Size, Toolkit};
//!
//! let mut tk = Toolkit::new(HeadlessDriver::default());
//! let dialog = tk.create("dialog").unwrap();
//! let column = tk.create_with("vbox", "GAP=5").unwrap();
//! let a = tk.create_with("label", "RASTERSIZE=100x20").unwrap();
//! let b = tk.create_with("label", "RASTERSIZE=60x20").unwrap();
//! tk.append(dialog, column).unwrap();
//! tk.append(column, a).unwrap();
//! tk.append(column, b).unwrap();
//!
//! tk.show(dialog).unwrap();
//! assert_eq!(tk.element(dialog).unwrap().current_size(), Size::new(100, 45));
//! assert_eq!(tk.element(b).unwrap().position(), Point::new(0, 25));
//! ```
//!
//! ## Modules
//!
//! - [`table`] - Hash table behind attribute stores and registries
//! - [`attrib`] - Attribute values, stores and string conversions
//! - [`class`] - Class descriptors, accessors and the built-in classes
//! - [`element`] - Element arena, tree editing, lifecycle, attribute access
//! - [`layout`] - Three-pass layout solver
//! - [`state`] - Focus, dialog list, function and handle registries
//! - [`driver`] - Native backend trait and the headless driver

pub mod attrib;
pub mod class;
pub mod config;
pub mod driver;
pub mod element;
pub mod error;
pub mod layout;
pub mod state;
pub mod table;
pub mod toolkit;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use attrib::{
    AttrValue, AttributeStore, Callback, format_size, parse_bool, parse_int, parse_list,
    parse_point, parse_size,
};

pub use class::{
    Accessor, AccessorFlags, ClassBuilder, ClassDescriptor, ClassOp, ClassOps, ClassRegistry,
    AccessorTable, AttrGetter, AttrSetter, SetterOutcome, base_class,
};

pub use config::{HeadlessConfig, ToolkitConfig};

pub use driver::{Driver, DriverCall, HeadlessDriver, NativeHandle};

pub use element::{Element, ElementId, INTERNAL_PREFIX, LAST_ERROR, is_internal_name};

pub use error::{Error, Result};

pub use layout::NaturalSize;

pub use state::{DialogList, FocusState, FunctionRegistry, HandleRegistry};

pub use table::{IdentityKey, IdentityTable, StringTable, Table, TableSize};

pub use toolkit::Toolkit;
