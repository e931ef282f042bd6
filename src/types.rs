//! Core types for trellis.
//!
//! Geometry primitives, class categories, and the bit sets that flow through
//! the attribute model and the layout solver.

// =============================================================================
// Geometry
// =============================================================================

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Position relative to the parent element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// =============================================================================
// Class categories
// =============================================================================

/// What kind of native object a class maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum NativeType {
    /// No native object of its own (layout containers, timers).
    #[default]
    Void,
    Control,
    Canvas,
    Dialog,
    Image,
    Menu,
    Other,
}

/// How many children a class accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ChildPolicy {
    #[default]
    None,
    One,
    Many,
}

// =============================================================================
// Expand policy (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-axis expansion policy.
    ///
    /// The `*_FREE` variants expand the element itself but are not
    /// propagated to the parent container.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Expand: u8 {
        const WIDTH = 1 << 0;
        const HEIGHT = 1 << 1;
        const WIDTH_FREE = 1 << 2;
        const HEIGHT_FREE = 1 << 3;
        const BOTH = Self::WIDTH.bits() | Self::HEIGHT.bits();
    }
}

impl Expand {
    /// Parse an `EXPAND` attribute value. Unknown values mean no expansion.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "YES" => Self::BOTH,
            "HORIZONTAL" => Self::WIDTH,
            "VERTICAL" => Self::HEIGHT,
            "HORIZONTALFREE" => Self::WIDTH_FREE,
            "VERTICALFREE" => Self::HEIGHT_FREE,
            _ => Self::empty(),
        }
    }

    /// Expands along the horizontal axis (free or not).
    pub fn horizontal(self) -> bool {
        self.intersects(Self::WIDTH | Self::WIDTH_FREE)
    }

    /// Expands along the vertical axis (free or not).
    pub fn vertical(self) -> bool {
        self.intersects(Self::HEIGHT | Self::HEIGHT_FREE)
    }

    /// Attribute string for this policy.
    pub fn as_attribute(self) -> &'static str {
        if self.contains(Self::BOTH) {
            "YES"
        } else if self.contains(Self::WIDTH) {
            "HORIZONTAL"
        } else if self.contains(Self::HEIGHT) {
            "VERTICAL"
        } else if self.contains(Self::WIDTH_FREE) {
            "HORIZONTALFREE"
        } else if self.contains(Self::HEIGHT_FREE) {
            "VERTICALFREE"
        } else {
            "NO"
        }
    }
}

// =============================================================================
// Element flags
// =============================================================================

bitflags::bitflags! {
    /// Layout flags carried by every element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ElementFlags: u8 {
        /// Sized by the solver but positioned from `CX`/`CY`, outside the
        /// parent's arrangement.
        const FLOATING = 1 << 0;
        /// Skipped by the solver entirely.
        const FLOATING_IGNORE = 1 << 1;
        /// `MINSIZE` is set.
        const MIN_SIZE = 1 << 2;
        /// `MAXSIZE` is set.
        const MAX_SIZE = 1 << 3;
    }
}

// =============================================================================
// Callbacks
// =============================================================================

/// Value returned by element callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CallbackAction {
    #[default]
    Default,
    Close,
    Ignore,
    Continue,
}

// =============================================================================
// Alignment (used by the box containers)
// =============================================================================

/// Cross-axis alignment of children inside a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

impl Alignment {
    /// Parse `ALEFT`/`ATOP`, `ACENTER`, `ARIGHT`/`ABOTTOM`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACENTER" => Self::Center,
            "ARIGHT" | "ABOTTOM" => Self::End,
            _ => Self::Start,
        }
    }

    /// Offset of an item of `size` inside `space`.
    pub fn offset(self, space: i32, size: i32) -> i32 {
        let free = (space - size).max(0);
        match self {
            Self::Start => 0,
            Self::Center => free / 2,
            Self::End => free,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_parse() {
        assert_eq!(Expand::parse("YES"), Expand::BOTH);
        assert_eq!(Expand::parse("horizontal"), Expand::WIDTH);
        assert_eq!(Expand::parse("VERTICALFREE"), Expand::HEIGHT_FREE);
        assert_eq!(Expand::parse("NO"), Expand::empty());
        assert_eq!(Expand::parse("bogus"), Expand::empty());
    }

    #[test]
    fn test_expand_axes() {
        assert!(Expand::WIDTH_FREE.horizontal());
        assert!(!Expand::WIDTH_FREE.vertical());
        assert!(Expand::BOTH.horizontal() && Expand::BOTH.vertical());
        assert_eq!(Expand::HEIGHT.as_attribute(), "VERTICAL");
    }

    #[test]
    fn test_alignment_offset() {
        assert_eq!(Alignment::Start.offset(100, 40), 0);
        assert_eq!(Alignment::Center.offset(100, 40), 30);
        assert_eq!(Alignment::End.offset(100, 40), 60);
        assert_eq!(Alignment::End.offset(10, 40), 0);
    }
}
