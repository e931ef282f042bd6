//! Focus System - which element receives keyboard input.
//!
//! The focused element lives in a signal so reactive hosts can track it.
//! Moving focus fires `KILLFOCUS_CB` on the element losing it and
//! `GETFOCUS_CB` on the element gaining it, in that order.
//!
//! # Example
//!
//! ```
//! use trellis::{HeadlessDriver, Toolkit};
//!
//! let mut tk = Toolkit::new(HeadlessDriver::default());
//! let dialog = tk.create("dialog").unwrap();
//! let button = tk.create("button").unwrap();
//! tk.append(dialog, button).unwrap();
//! tk.map(dialog).unwrap();
//!
//! assert!(tk.focus(button));
//! assert_eq!(tk.focused(), Some(button));
//! ```

use spark_signals::{Signal, signal};
use tracing::trace;

use crate::element::ElementId;
use crate::toolkit::Toolkit;

// =============================================================================
// FOCUS STATE
// =============================================================================

/// Focused element and focus history.
pub struct FocusState {
    focused: Signal<Option<ElementId>>,
    history: Vec<ElementId>,
    history_limit: usize,
}

impl std::fmt::Debug for FocusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusState")
            .field("focused", &self.focused.get())
            .field("history", &self.history)
            .finish()
    }
}

impl FocusState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            focused: signal(None),
            history: Vec::new(),
            history_limit,
        }
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused.get()
    }

    /// Signal holding the focused element.
    pub fn signal(&self) -> Signal<Option<ElementId>> {
        self.focused.clone()
    }

    fn set(&self, id: Option<ElementId>) {
        self.focused.set(id);
    }

    fn push_history(&mut self, id: ElementId) {
        self.history.push(id);
        if self.history.len() > self.history_limit {
            self.history.remove(0);
        }
    }

    /// Drop every reference to `id`. Used when it is unmapped or destroyed;
    /// no callbacks fire.
    pub fn forget(&mut self, id: ElementId) {
        if self.focused() == Some(id) {
            self.set(None);
        }
        self.history.retain(|&entry| entry != id);
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

// =============================================================================
// FOCUS OPERATIONS
// =============================================================================

impl Toolkit {
    /// The focused element, if any.
    pub fn focused(&self) -> Option<ElementId> {
        self.focus.focused()
    }

    /// Signal holding the focused element.
    pub fn focus_signal(&self) -> Signal<Option<ElementId>> {
        self.focus.signal()
    }

    /// Whether `id` is mapped, active, visible and has `CANFOCUS`.
    pub fn can_accept_focus(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|el| el.is_mapped())
            && self.get_bool(id, "ACTIVE")
            && self.get_bool(id, "VISIBLE")
            && self.get_bool(id, "CANFOCUS")
    }

    /// Move focus to `id`. Returns `false` when it cannot take focus.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if !self.can_accept_focus(id) {
            return false;
        }
        self.set_focus(Some(id));
        true
    }

    /// Remove focus from the focused element.
    pub fn blur(&mut self) {
        self.set_focus(None);
    }

    fn set_focus(&mut self, new: Option<ElementId>) {
        let old = self.focus.focused();
        if old == new {
            return;
        }
        trace!(?old, ?new, "focus change");

        if let Some(old) = old {
            self.call_callback(old, "KILLFOCUS_CB");
        }
        self.focus.set(new);
        if let Some(new) = new {
            self.call_callback(new, "GETFOCUS_CB");
        }
    }

    /// Focusable elements of `id`'s dialog in depth-first order.
    fn focus_chain(&self, id: ElementId) -> Vec<ElementId> {
        let top = self.dialog_of(id).unwrap_or_else(|| self.root_of(id));
        self.descendants(top)
            .into_iter()
            .filter(|&e| self.can_accept_focus(e))
            .collect()
    }

    fn step_focus(&mut self, from: ElementId, forward: bool) -> Option<ElementId> {
        let chain = self.focus_chain(from);
        if chain.is_empty() {
            return None;
        }
        let len = chain.len();
        let next = match chain.iter().position(|&e| e == from) {
            Some(pos) if forward => chain[(pos + 1) % len],
            Some(pos) => chain[(pos + len - 1) % len],
            None if forward => chain[0],
            None => chain[len - 1],
        };
        self.save_focus_to_history();
        self.set_focus(Some(next));
        Some(next)
    }

    /// Focus the next focusable element after `from` in its dialog,
    /// wrapping around.
    pub fn next_field(&mut self, from: ElementId) -> Option<ElementId> {
        self.step_focus(from, true)
    }

    /// Focus the previous focusable element before `from`, wrapping around.
    pub fn previous_field(&mut self, from: ElementId) -> Option<ElementId> {
        self.step_focus(from, false)
    }

    /// Remember the focused element.
    pub fn save_focus_to_history(&mut self) {
        if let Some(current) = self.focus.focused() {
            self.focus.push_history(current);
        }
    }

    /// Refocus the most recent history entry that can still take focus.
    pub fn restore_focus_from_history(&mut self) -> bool {
        while let Some(entry) = self.focus.history.pop() {
            if self.focus(entry) {
                return true;
            }
        }
        false
    }
}
