#![forbid(unsafe_code)]

//! Canonical pointer and keyboard event types.
//!
//! Hosts translate their native events (DOM pointer events, winit events,
//! terminal mouse reports) into these types before handing them to the
//! interaction machines.
//!
//! # Design Notes
//!
//! - Coordinates are client-space pixels, see [`crate::geometry`].
//! - A pointer event carries the [`TargetRole`] of the element it started on,
//!   so machines can reject drags that begin on native controls or resize
//!   grips without querying the host tree.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Pointer(PointerEvent),
    Key(KeyEvent),
    /// The layout container changed size; cached geometry is stale.
    Resize { width: f64, height: f64 },
    /// The host window or container lost focus.
    Blur,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Host pointer id. One drag and one resize may own a pointer at a time.
    pub pointer_id: u32,
    pub kind: PointerEventKind,
    pub position: Point,
    pub button: PointerButton,
    pub pointer_type: PointerType,
    /// Role of the element the event was dispatched to.
    pub target: TargetRole,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a primary-button mouse event on plain content.
    #[must_use]
    pub const fn new(kind: PointerEventKind, pointer_id: u32, position: Point) -> Self {
        Self {
            pointer_id,
            kind,
            position,
            button: PointerButton::Primary,
            pointer_type: PointerType::Mouse,
            target: TargetRole::Content,
            modifiers: Modifiers::NONE,
        }
    }

    /// Shorthand for a pointer-down.
    #[must_use]
    pub const fn down(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down, pointer_id, Point::new(x, y))
    }

    /// Shorthand for a pointer-move.
    #[must_use]
    pub const fn moved(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, pointer_id, Point::new(x, y))
    }

    /// Shorthand for a pointer-up.
    #[must_use]
    pub const fn up(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up, pointer_id, Point::new(x, y))
    }

    /// Shorthand for a pointer-cancel.
    #[must_use]
    pub const fn cancel(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Cancel, pointer_id, Point::new(x, y))
    }

    /// Set the target role.
    #[must_use]
    pub const fn with_target(mut self, target: TargetRole) -> Self {
        self.target = target;
        self
    }

    /// Set the button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Set the pointer type.
    #[must_use]
    pub const fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    /// Set modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this event ends a pointer sequence.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.kind, PointerEventKind::Up | PointerEventKind::Cancel)
    }
}

/// Pointer lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Left mouse button, touch contact, pen tip.
    #[default]
    Primary,
    Secondary,
    Auxiliary,
}

/// Input device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// What kind of element a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetRole {
    /// Ordinary layer or panel content.
    #[default]
    Content,
    /// Native interactive control: input, textarea, select, button.
    Control,
    /// A resize grip or track resize handle.
    ResizeControl,
    /// An explicit drag handle region (floating window title bar).
    DragHandle,
}

impl TargetRole {
    /// Whether a drag may start on this role.
    #[must_use]
    pub const fn accepts_drag(self) -> bool {
        matches!(self, Self::Content | Self::DragHandle)
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is a press of Escape.
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        matches!(self.code, KeyCode::Escape) && matches!(self.kind, KeyEventKind::Press)
    }
}

/// Key codes the layout machines react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Tab,
    Home,
    End,
    Up,
    Down,
    Left,
    Right,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}
