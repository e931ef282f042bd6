//! Tree editing and navigation.
//!
//! Children form a singly linked sibling chain hanging off the parent's
//! `first_child`. Positions are indexes in that chain.

use tracing::trace;

use super::ElementId;
use crate::error::{Error, Result};
use crate::toolkit::Toolkit;
use crate::types::ChildPolicy;

impl Toolkit {
    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id)?.parent()
    }

    pub fn first_child(&self, id: ElementId) -> Option<ElementId> {
        self.element(id)?.first_child()
    }

    pub fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        self.element(id)?.next_sibling()
    }

    /// Lazily walks the children of `id` in order.
    pub fn iter_children(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.first_child(id), |&child| self.next_sibling(child))
    }

    /// Snapshot of the children of `id`, safe to hold across mutation.
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.iter_children(id).collect()
    }

    pub fn child_count(&self, id: ElementId) -> usize {
        self.iter_children(id).count()
    }

    pub fn child_at(&self, id: ElementId, position: usize) -> Option<ElementId> {
        self.iter_children(id).nth(position)
    }

    pub fn child_position(&self, parent: ElementId, child: ElementId) -> Option<usize> {
        self.iter_children(parent).position(|c| c == child)
    }

    /// Ancestors of `id`, nearest first, not including `id`.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.parent(id), |&ancestor| self.parent(ancestor))
    }

    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Topmost ancestor of `id` (or `id` itself).
    pub fn root_of(&self, id: ElementId) -> ElementId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Nearest dialog containing `id`, including `id` itself.
    pub fn dialog_of(&self, id: ElementId) -> Option<ElementId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&e| self.element(e).is_some_and(|el| el.class().is_dialog()))
    }

    /// Depth-first pre-order walk of the subtree under `id`, excluding `id`.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            result.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        result
    }

    /// Descendant of `id`'s dialog (or root) whose `NAME` is `name`.
    pub fn get_dialog_child(&self, id: ElementId, name: &str) -> Option<ElementId> {
        let top = self.dialog_of(id).unwrap_or_else(|| self.root_of(id));
        self.descendants(top).into_iter().find(|&e| {
            self.element(e)
                .and_then(|el| el.attributes().get_str("NAME"))
                .is_some_and(|n| n == name)
        })
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.insert(parent, None, child)
    }

    /// Insert `child` before `before` (or last when `None`).
    pub fn insert(
        &mut self,
        parent: ElementId,
        before: Option<ElementId>,
        child: ElementId,
    ) -> Result<()> {
        self.check_insert(parent, before, child)?;

        let previous = match before {
            Some(before) => {
                let position = self
                    .child_position(parent, before)
                    .ok_or(Error::ChildNotAccepted("reference element is not a child"))?;
                position.checked_sub(1).and_then(|p| self.child_at(parent, p))
            }
            None => self.iter_children(parent).last(),
        };

        let el = self.element_mut(child).ok_or(Error::NoSuchElement)?;
        el.parent = Some(parent);
        el.next_sibling = before;
        match previous {
            Some(previous) => {
                if let Some(prev) = self.element_mut(previous) {
                    prev.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(p) = self.element_mut(parent) {
                    p.first_child = Some(child);
                }
            }
        }

        trace!(?parent, ?child, "child inserted");
        let class = self.class_of(parent)?;
        class.run_child_added(self, parent, child);
        Ok(())
    }

    fn check_insert(
        &self,
        parent: ElementId,
        before: Option<ElementId>,
        child: ElementId,
    ) -> Result<()> {
        let c = self.element(child).ok_or(Error::NoSuchElement)?;
        if c.parent().is_some() {
            return Err(Error::ChildNotAccepted("child already has a parent"));
        }
        self.check_target(parent, before, child)
    }

    /// Insertion checks that do not depend on the child's current parent.
    fn check_target(
        &self,
        parent: ElementId,
        before: Option<ElementId>,
        child: ElementId,
    ) -> Result<()> {
        let p = self.element(parent).ok_or(Error::NoSuchElement)?;
        let c = self.element(child).ok_or(Error::NoSuchElement)?;

        match p.class().child_policy() {
            ChildPolicy::None => return Err(Error::ChildNotAccepted("parent takes no children")),
            ChildPolicy::One if p.first_child().is_some() => {
                return Err(Error::ChildNotAccepted("parent already has its child"));
            }
            _ => {}
        }
        if c.class().is_dialog() {
            return Err(Error::ChildNotAccepted("dialogs are top-level"));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(Error::ChildNotAccepted("insertion would create a cycle"));
        }
        if before.is_some_and(|b| self.parent(b) != Some(parent)) {
            return Err(Error::ChildNotAccepted("reference element is not a child"));
        }
        Ok(())
    }

    /// Unlink `child` from its parent. The element stays alive; a mapped
    /// child is unmapped first.
    pub fn detach(&mut self, child: ElementId) -> Result<()> {
        let parent = self
            .element(child)
            .ok_or(Error::NoSuchElement)?
            .parent()
            .ok_or(Error::NoSuchElement)?;
        self.unmap(child);
        self.unlink(parent, child);
        Ok(())
    }

    /// Remove `child` from `parent`'s chain and notify the parent class.
    pub(crate) fn unlink(&mut self, parent: ElementId, child: ElementId) {
        let Some(position) = self.child_position(parent, child) else {
            return;
        };
        let next = self.next_sibling(child);
        match position.checked_sub(1).and_then(|p| self.child_at(parent, p)) {
            Some(previous) => {
                if let Some(prev) = self.element_mut(previous) {
                    prev.next_sibling = next;
                }
            }
            None => {
                if let Some(p) = self.element_mut(parent) {
                    p.first_child = next;
                }
            }
        }
        if let Some(c) = self.element_mut(child) {
            c.parent = None;
            c.next_sibling = None;
        }

        trace!(?parent, ?child, position, "child removed");
        if let Ok(class) = self.class_of(parent) {
            class.run_child_removed(self, parent, child, position);
        }
    }

    /// Move `child` under `parent`, before `before`. A mapped child is
    /// remapped when the new parent is mapped.
    pub fn reparent(
        &mut self,
        child: ElementId,
        parent: ElementId,
        before: Option<ElementId>,
    ) -> Result<()> {
        let was_mapped = self.element(child).ok_or(Error::NoSuchElement)?.is_mapped();
        if self.parent(child).is_some() {
            self.check_target(parent, before, child)?;
            self.detach(child)?;
        }
        self.insert(parent, before, child)?;
        if was_mapped && self.element(parent).is_some_and(|p| p.is_mapped()) {
            self.map(child)?;
        }
        Ok(())
    }
}
