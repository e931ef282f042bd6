//! Class descriptors - per-type metadata and chained operations.
//!
//! Every element points at a [`ClassDescriptor`]. A descriptor holds one
//! layer of operations ([`ClassOps`]) and optionally a parent descriptor,
//! giving single inheritance:
//!
//! ```text
//! vbox ──parent──▶ box ──parent──▶ base
//!   │                │               │
//!   └──── one shared AccessorTable ──┘
//! ```
//!
//! Operations walk the chain. Pre-order operations (create, map, layout)
//! run the root-most layer first; post-order operations (unmap, destroy,
//! child removal) run the most-derived layer first. A layer that declares an
//! operation terminal stops the walk: its parents' version of that operation
//! does not run.
//!
//! Descriptors are built from [`ClassBuilder`]s. A child builder is created
//! from a freshly built parent builder, so every class gets its own instance
//! of the whole parent chain and its own accessor table.

mod accessor;
mod base;
mod boxes;
mod controls;
mod dialog;
mod registry;

use std::fmt;
use std::rc::Rc;

pub use accessor::*;
pub use base::base_class;
pub use boxes::{box_class, hbox_class, vbox_class};
pub use controls::{button_class, canvas_class, label_class, timer_class, timer_running};
pub use dialog::dialog_class;
pub use registry::*;

use crate::element::ElementId;
use crate::error::Result;
use crate::layout::NaturalSize;
use crate::toolkit::Toolkit;
use crate::types::{ChildPolicy, NativeType};

// =============================================================================
// Operations
// =============================================================================

bitflags::bitflags! {
    /// The overridable class operations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ClassOp: u16 {
        const CREATE = 1 << 0;
        const MAP = 1 << 1;
        const UNMAP = 1 << 2;
        const DESTROY = 1 << 3;
        const COMPUTE_NATURAL_SIZE = 1 << 4;
        const SET_CHILDREN_CURRENT_SIZE = 1 << 5;
        const SET_CHILDREN_POSITION = 1 << 6;
        const CHILD_ADDED = 1 << 7;
        const CHILD_REMOVED = 1 << 8;
        const LAYOUT_UPDATE = 1 << 9;

        /// Geometry operations.
        const LAYOUT = Self::COMPUTE_NATURAL_SIZE.bits()
            | Self::SET_CHILDREN_CURRENT_SIZE.bits()
            | Self::SET_CHILDREN_POSITION.bits();
    }
}

impl ClassOp {
    /// Operations that run the most-derived layer first.
    const POST_ORDER: Self = Self::UNMAP.union(Self::DESTROY).union(Self::CHILD_REMOVED);
}

/// One layer of class behavior. Every method defaults to a no-op; a layer
/// only has its methods called for the operations it declares in
/// [`ClassBuilder::ops`].
#[allow(unused_variables)]
pub trait ClassOps {
    /// Element was just created.
    fn create(&self, tk: &mut Toolkit, id: ElementId) -> Result<()> {
        Ok(())
    }

    /// Native object was created; finish native setup.
    fn map(&self, tk: &mut Toolkit, id: ElementId) -> Result<()> {
        Ok(())
    }

    /// Native object is about to be released.
    fn unmap(&self, tk: &mut Toolkit, id: ElementId) {}

    /// Element is being destroyed.
    fn destroy(&self, tk: &mut Toolkit, id: ElementId) {}

    /// Fill `natural` with the content size and, for containers, the
    /// children's expand policy. Containers compute their children first.
    fn compute_natural_size(&self, tk: &mut Toolkit, id: ElementId, natural: &mut NaturalSize) {}

    /// Distribute the element's current size to its children.
    fn set_children_current_size(&self, tk: &mut Toolkit, id: ElementId, shrink: bool) {}

    /// Place children relative to the element's origin.
    fn set_children_position(&self, tk: &mut Toolkit, id: ElementId) {}

    fn child_added(&self, tk: &mut Toolkit, id: ElementId, child: ElementId) {}

    /// `position` is where the child was in the sibling list.
    fn child_removed(&self, tk: &mut Toolkit, id: ElementId, child: ElementId, position: usize) {}

    /// Push the computed geometry to the native object.
    fn layout_update(&self, tk: &mut Toolkit, id: ElementId) {}
}

struct NoOps;

impl ClassOps for NoOps {}

// =============================================================================
// ClassDescriptor
// =============================================================================

/// Immutable per-type metadata and operation chain.
pub struct ClassDescriptor {
    name: String,
    native_type: NativeType,
    child_policy: ChildPolicy,
    accessors: Rc<AccessorTable>,
    ops: Box<dyn ClassOps>,
    implements: ClassOp,
    terminal: ClassOp,
    parent: Option<Box<ClassDescriptor>>,
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("native_type", &self.native_type)
            .field("child_policy", &self.child_policy)
            .field("implements", &self.implements)
            .field("terminal", &self.terminal)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .finish()
    }
}

impl ClassDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn native_type(&self) -> NativeType {
        self.native_type
    }

    pub fn child_policy(&self) -> ChildPolicy {
        self.child_policy
    }

    pub fn is_container(&self) -> bool {
        self.child_policy != ChildPolicy::None
    }

    pub fn is_dialog(&self) -> bool {
        self.native_type == NativeType::Dialog
    }

    pub fn parent(&self) -> Option<&ClassDescriptor> {
        self.parent.as_deref()
    }

    pub fn accessors(&self) -> &AccessorTable {
        &self.accessors
    }

    /// Accessor for `name`. The table is shared by the whole chain, so this
    /// is a single lookup.
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    /// Whether this class or one of its ancestors is called `name`.
    pub fn is_a(&self, name: &str) -> bool {
        self.chain().any(|layer| layer.name == name)
    }

    /// Whether any layer implements `op`.
    pub fn implements(&self, op: ClassOp) -> bool {
        self.chain().any(|layer| layer.implements.contains(op))
    }

    /// This descriptor followed by its ancestors.
    pub fn chain(&self) -> impl Iterator<Item = &ClassDescriptor> {
        std::iter::successors(Some(self), |layer| layer.parent())
    }

    /// Layers that run `op`, in execution order.
    fn layers(&self, op: ClassOp) -> Vec<&ClassDescriptor> {
        let mut layers = Vec::new();
        for layer in self.chain() {
            if layer.implements.contains(op) {
                layers.push(layer);
            }
            if layer.terminal.contains(op) {
                break;
            }
        }
        if !ClassOp::POST_ORDER.contains(op) {
            layers.reverse();
        }
        layers
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    pub(crate) fn run_create(&self, tk: &mut Toolkit, id: ElementId) -> Result<()> {
        for layer in self.layers(ClassOp::CREATE) {
            layer.ops.create(tk, id)?;
        }
        Ok(())
    }

    pub(crate) fn run_map(&self, tk: &mut Toolkit, id: ElementId) -> Result<()> {
        for layer in self.layers(ClassOp::MAP) {
            layer.ops.map(tk, id)?;
        }
        Ok(())
    }

    pub(crate) fn run_unmap(&self, tk: &mut Toolkit, id: ElementId) {
        for layer in self.layers(ClassOp::UNMAP) {
            layer.ops.unmap(tk, id);
        }
    }

    pub(crate) fn run_destroy(&self, tk: &mut Toolkit, id: ElementId) {
        for layer in self.layers(ClassOp::DESTROY) {
            layer.ops.destroy(tk, id);
        }
    }

    pub(crate) fn run_compute_natural_size(
        &self,
        tk: &mut Toolkit,
        id: ElementId,
        natural: &mut NaturalSize,
    ) {
        for layer in self.layers(ClassOp::COMPUTE_NATURAL_SIZE) {
            layer.ops.compute_natural_size(tk, id, natural);
        }
    }

    pub(crate) fn run_set_children_current_size(&self, tk: &mut Toolkit, id: ElementId, shrink: bool) {
        for layer in self.layers(ClassOp::SET_CHILDREN_CURRENT_SIZE) {
            layer.ops.set_children_current_size(tk, id, shrink);
        }
    }

    pub(crate) fn run_set_children_position(&self, tk: &mut Toolkit, id: ElementId) {
        for layer in self.layers(ClassOp::SET_CHILDREN_POSITION) {
            layer.ops.set_children_position(tk, id);
        }
    }

    pub(crate) fn run_child_added(&self, tk: &mut Toolkit, id: ElementId, child: ElementId) {
        for layer in self.layers(ClassOp::CHILD_ADDED) {
            layer.ops.child_added(tk, id, child);
        }
    }

    pub(crate) fn run_child_removed(
        &self,
        tk: &mut Toolkit,
        id: ElementId,
        child: ElementId,
        position: usize,
    ) {
        for layer in self.layers(ClassOp::CHILD_REMOVED) {
            layer.ops.child_removed(tk, id, child, position);
        }
    }

    pub(crate) fn run_layout_update(&self, tk: &mut Toolkit, id: ElementId) {
        for layer in self.layers(ClassOp::LAYOUT_UPDATE) {
            layer.ops.layout_update(tk, id);
        }
    }
}

// =============================================================================
// ClassBuilder
// =============================================================================

/// Mutable class description used while registering a class.
pub struct ClassBuilder {
    name: String,
    native_type: NativeType,
    child_policy: ChildPolicy,
    accessors: AccessorTable,
    ops: Box<dyn ClassOps>,
    implements: ClassOp,
    terminal: ClassOp,
    parent: Option<Box<ClassBuilder>>,
}

impl ClassBuilder {
    /// A root class with no parent.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            native_type: NativeType::Void,
            child_policy: ChildPolicy::None,
            accessors: AccessorTable::new(),
            ops: Box::new(NoOps),
            implements: ClassOp::empty(),
            terminal: ClassOp::empty(),
            parent: None,
        }
    }

    /// A subclass of `parent`. The parent must be a fresh builder; the child
    /// takes over its accessor table and starts with an empty operation set.
    /// Native type and child policy are inherited until overridden.
    pub fn inherit(name: &str, mut parent: ClassBuilder) -> Self {
        let accessors = std::mem::take(&mut parent.accessors);
        Self {
            name: name.to_owned(),
            native_type: parent.native_type,
            child_policy: parent.child_policy,
            accessors,
            ops: Box::new(NoOps),
            implements: ClassOp::empty(),
            terminal: ClassOp::empty(),
            parent: Some(Box::new(parent)),
        }
    }

    pub fn native_type(mut self, native_type: NativeType) -> Self {
        self.native_type = native_type;
        self
    }

    pub fn child_policy(mut self, child_policy: ChildPolicy) -> Self {
        self.child_policy = child_policy;
        self
    }

    /// Install this layer's operations and declare which ones it implements.
    pub fn ops(mut self, ops: impl ClassOps + 'static, implements: ClassOp) -> Self {
        self.ops = Box::new(ops);
        self.implements = implements;
        self
    }

    /// Declare operations that override, rather than chain to, the parent.
    pub fn terminal(mut self, ops: ClassOp) -> Self {
        self.terminal = ops;
        self
    }

    /// Register an attribute accessor (replacing any previous one).
    pub fn attribute(
        mut self,
        name: &str,
        getter: Option<AttrGetter>,
        setter: Option<AttrSetter>,
        default: Option<&str>,
        flags: AccessorFlags,
    ) -> Self {
        self.register_attribute(name, getter, setter, default, flags);
        self
    }

    pub fn register_attribute(
        &mut self,
        name: &str,
        getter: Option<AttrGetter>,
        setter: Option<AttrSetter>,
        default: Option<&str>,
        flags: AccessorFlags,
    ) {
        self.accessors.register(name, getter, setter, default, flags);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Freeze into a descriptor. The accessor table becomes one shared
    /// object referenced by every layer of the chain.
    pub fn build(mut self) -> ClassDescriptor {
        let accessors = Rc::new(std::mem::take(&mut self.accessors));
        self.finish(&accessors)
    }

    fn finish(self, accessors: &Rc<AccessorTable>) -> ClassDescriptor {
        ClassDescriptor {
            name: self.name,
            native_type: self.native_type,
            child_policy: self.child_policy,
            accessors: Rc::clone(accessors),
            ops: self.ops,
            implements: self.implements,
            terminal: self.terminal,
            parent: self.parent.map(|parent| Box::new(parent.finish(accessors))),
        }
    }
}
