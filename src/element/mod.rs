//! Elements - one live instance of a control.
//!
//! Elements live in the [`Toolkit`](crate::Toolkit)'s arena and are
//! addressed by [`ElementId`]. Tree links are ids into the same arena: a
//! parent back-reference plus a first-child / next-sibling chain.
//!
//! The `impl Toolkit` blocks in the submodules carry the element
//! operations:
//!
//! - `tree` - insertion, removal and navigation
//! - `lifecycle` - create, map, unmap, destroy
//! - `attributes` - attribute resolution through the class accessors
//! - `callbacks` - callbacks stored as attributes

mod attributes;
mod callbacks;
mod lifecycle;
mod tree;

use std::rc::Rc;

pub use attributes::{INTERNAL_PREFIX, LAST_ERROR, is_internal_name};

use crate::attrib::AttributeStore;
use crate::class::ClassDescriptor;
use crate::driver::NativeHandle;
use crate::table::IdentityKey;
use crate::types::{ElementFlags, Expand, Point, Size};

slotmap::new_key_type! {
    /// Stable handle to an element in a toolkit arena.
    pub struct ElementId;
}

impl From<ElementId> for IdentityKey {
    fn from(id: ElementId) -> Self {
        IdentityKey(slotmap::Key::data(&id).as_ffi())
    }
}

/// One live control.
#[derive(Debug)]
pub struct Element {
    class: Rc<ClassDescriptor>,
    attributes: AttributeStore,

    parent: Option<ElementId>,
    first_child: Option<ElementId>,
    next_sibling: Option<ElementId>,

    handle: Option<NativeHandle>,

    user_size: Size,
    natural_size: Size,
    current_size: Size,
    position: Point,
    expand: Expand,
    flags: ElementFlags,
}

impl Element {
    pub(crate) fn new(class: Rc<ClassDescriptor>, attributes: AttributeStore) -> Self {
        Self {
            class,
            attributes,
            parent: None,
            first_child: None,
            next_sibling: None,
            handle: None,
            user_size: Size::ZERO,
            natural_size: Size::ZERO,
            current_size: Size::ZERO,
            position: Point::ORIGIN,
            expand: Expand::empty(),
            flags: ElementFlags::empty(),
        }
    }

    pub fn class(&self) -> &ClassDescriptor {
        &self.class
    }

    pub(crate) fn class_rc(&self) -> Rc<ClassDescriptor> {
        Rc::clone(&self.class)
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }

    // -------------------------------------------------------------------------
    // Tree links
    // -------------------------------------------------------------------------

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<ElementId> {
        self.first_child
    }

    pub fn next_sibling(&self) -> Option<ElementId> {
        self.next_sibling
    }

    // -------------------------------------------------------------------------
    // Native handle
    // -------------------------------------------------------------------------

    pub fn handle(&self) -> Option<NativeHandle> {
        self.handle
    }

    pub fn is_mapped(&self) -> bool {
        self.handle.is_some()
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    /// Size explicitly requested through `RASTERSIZE`; 0 means unconstrained.
    pub fn user_size(&self) -> Size {
        self.user_size
    }

    pub fn set_user_size(&mut self, size: Size) {
        self.user_size = Size::new(size.width.max(0), size.height.max(0));
    }

    pub fn natural_size(&self) -> Size {
        self.natural_size
    }

    pub(crate) fn set_natural_size(&mut self, size: Size) {
        self.natural_size = size;
    }

    pub fn current_size(&self) -> Size {
        self.current_size
    }

    pub(crate) fn set_current_size(&mut self, size: Size) {
        self.current_size = size;
    }

    /// Position relative to the parent element.
    pub fn position(&self) -> Point {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Expand policy computed by the last natural size pass.
    pub fn expand(&self) -> Expand {
        self.expand
    }

    pub(crate) fn set_expand(&mut self, expand: Expand) {
        self.expand = expand;
    }

    pub fn flags(&self) -> ElementFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: ElementFlags, on: bool) {
        self.flags.set(flags, on);
    }

    /// Excluded from the parent's arrangement (`FLOATING=YES` or `IGNORE`).
    pub fn is_floating(&self) -> bool {
        self.flags
            .intersects(ElementFlags::FLOATING | ElementFlags::FLOATING_IGNORE)
    }

    /// Excluded from layout entirely (`FLOATING=IGNORE`).
    pub fn is_layout_ignored(&self) -> bool {
        self.flags.contains(ElementFlags::FLOATING_IGNORE)
    }
}
