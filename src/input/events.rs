//! Input event types consumed by the dispatcher.
//!
//! These are decoupled from crossterm so that the compositor can be driven
//! from tests, replays, or any other input source.

use bitflags::bitflags;

/// Key codes for keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Function key (F1-F12).
    F(u8),
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab key.
    Tab,
    /// Backtab (Shift+Tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
    /// Super/Command/Windows key held.
    pub super_key: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        super_key: false,
    };

    /// Only shift held.
    pub const SHIFT: Self = Self { shift: true, ..Self::NONE };

    /// Check if any modifier is active.
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.super_key
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Modifiers held during the key press.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub const fn new(code: KeyCode) -> Self {
        Self { code, modifiers: KeyModifiers::NONE }
    }

    /// A key press with modifiers.
    pub const fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Tab without shift: move focus forward.
    pub const fn is_focus_next(&self) -> bool {
        matches!(self.code, KeyCode::Tab) && !self.modifiers.shift
    }

    /// Shift-Tab (or backtab): move focus backward.
    pub const fn is_focus_prev(&self) -> bool {
        matches!(self.code, KeyCode::BackTab)
            || (matches!(self.code, KeyCode::Tab) && self.modifiers.shift)
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

bitflags! {
    /// Mouse buttons held, plus wheel motion, for one mouse event.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
    pub struct MouseButtons: u8 {
        /// Left (primary) button
        const LEFT = 0b0000_0001;
        /// Right button
        const RIGHT = 0b0000_0010;
        /// Middle button
        const MIDDLE = 0b0000_0100;
        /// Wheel scrolled up
        const WHEEL_UP = 0b0001_0000;
        /// Wheel scrolled down
        const WHEEL_DOWN = 0b0010_0000;
    }
}

impl MouseButtons {
    /// The real buttons, wheel motion excluded.
    pub const PRESSABLE: Self = Self::LEFT.union(Self::RIGHT).union(Self::MIDDLE);

    /// Wheel motion only.
    pub const WHEEL: Self = Self::WHEEL_UP.union(Self::WHEEL_DOWN);

    /// Whether any real button is held.
    pub const fn any_pressed(self) -> bool {
        self.intersects(Self::PRESSABLE)
    }

    /// Whether this event carries wheel motion.
    pub const fn is_wheel(self) -> bool {
        self.intersects(Self::WHEEL)
    }
}

/// A mouse event: the cursor position and the full button state.
///
/// Presses and releases are derived by comparing the button state with the
/// previous event, so motion while a button is held is a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
    /// Buttons held (and wheel motion) at the time of the event.
    pub buttons: MouseButtons,
    /// Key modifiers held during the mouse event.
    pub modifiers: KeyModifiers,
}

impl MouseEvent {
    /// A mouse event without modifiers.
    pub const fn new(x: u16, y: u16, buttons: MouseButtons) -> Self {
        Self { x, y, buttons, modifiers: KeyModifiers::NONE }
    }

    /// The position as signed surface coordinates.
    pub const fn position(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

/// Everything the input actor can deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key(KeyEvent),

    /// Mouse moved, pressed, released, dragged or scrolled.
    Mouse(MouseEvent),

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Terminal gained focus.
    FocusGained,

    /// Terminal lost focus.
    FocusLost,

    /// Paste event (bracketed paste).
    Paste(String),

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}
