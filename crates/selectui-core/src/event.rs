#![forbid(unsafe_code)]

//! Input events as the widgets see them.
//!
//! Only what a pointer-driven dropdown and its host need is modelled: key
//! presses, mouse buttons and wheel, resizes, focus and runtime ticks.
//! Key releases and paste are dropped at the terminal boundary.

use bitflags::bitflags;
#[cfg(not(target_arch = "wasm32"))]
use crossterm::event as ct;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal size changed (columns, rows).
    Resize { width: u16, height: u16 },
    /// Focus gained (`true`) or lost (`false`).
    Focus(bool),
    /// Periodic tick requested through `Cmd::Tick`.
    Tick,
}

impl Event {
    /// Translate a crossterm event. Returns `None` for input that has no
    /// counterpart here (key releases, paste, horizontal wheel, unmapped keys).
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub fn from_crossterm(event: ct::Event) -> Option<Self> {
        Some(match event {
            ct::Event::Key(key) if key.kind == ct::KeyEventKind::Release => return None,
            ct::Event::Key(key) => Event::Key(KeyEvent {
                code: KeyCode::from_crossterm(key.code)?,
                modifiers: Modifiers::from_crossterm(key.modifiers),
            }),
            ct::Event::Mouse(mouse) => Event::Mouse(MouseEvent::new(
                MouseEventKind::from_crossterm(mouse.kind)?,
                mouse.column,
                mouse.row,
            )),
            ct::Event::Resize(width, height) => Event::Resize { width, height },
            ct::Event::FocusGained => Event::Focus(true),
            ct::Event::FocusLost => Event::Focus(false),
            ct::Event::Paste(_) => return None,
        })
    }

    #[must_use]
    pub const fn as_mouse(&self) -> Option<&MouseEvent> {
        match self {
            Event::Mouse(m) => Some(m),
            _ => None,
        }
    }

    /// A mouse button went down (any button).
    #[must_use]
    pub fn is_pointer_down(&self) -> bool {
        matches!(self.as_mouse(), Some(m) if matches!(m.kind, MouseEventKind::Down(_)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }

    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
}

impl KeyCode {
    #[cfg(not(target_arch = "wasm32"))]
    fn from_crossterm(code: ct::KeyCode) -> Option<Self> {
        Some(match code {
            ct::KeyCode::Char(c) => KeyCode::Char(c),
            ct::KeyCode::Enter => KeyCode::Enter,
            ct::KeyCode::Esc => KeyCode::Escape,
            ct::KeyCode::Backspace => KeyCode::Backspace,
            ct::KeyCode::Tab => KeyCode::Tab,
            _ => return None,
        })
    }
}

bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1;
        const ALT = 1 << 1;
        const CTRL = 1 << 2;
    }
}

impl Modifiers {
    #[cfg(not(target_arch = "wasm32"))]
    fn from_crossterm(mods: ct::KeyModifiers) -> Self {
        [
            (ct::KeyModifiers::SHIFT, Modifiers::SHIFT),
            (ct::KeyModifiers::ALT, Modifiers::ALT),
            (ct::KeyModifiers::CONTROL, Modifiers::CTRL),
        ]
        .into_iter()
        .filter(|(from, _)| mods.contains(*from))
        .fold(Modifiers::empty(), |acc, (_, to)| acc | to)
    }
}

/// A mouse event in 0-indexed cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
}

impl MouseEvent {
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self { kind, x, y }
    }

    /// Left-button press at `(x, y)`.
    #[must_use]
    pub const fn left_down(x: u16, y: u16) -> Self {
        Self::new(MouseEventKind::Down(MouseButton::Left), x, y)
    }

    #[must_use]
    pub const fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
}

impl MouseEventKind {
    #[cfg(not(target_arch = "wasm32"))]
    fn from_crossterm(kind: ct::MouseEventKind) -> Option<Self> {
        Some(match kind {
            ct::MouseEventKind::Down(b) => MouseEventKind::Down(b.into()),
            ct::MouseEventKind::Up(b) => MouseEventKind::Up(b.into()),
            ct::MouseEventKind::Drag(b) => MouseEventKind::Drag(b.into()),
            ct::MouseEventKind::Moved => MouseEventKind::Moved,
            ct::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
            ct::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
            ct::MouseEventKind::ScrollLeft | ct::MouseEventKind::ScrollRight => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[cfg(not(target_arch = "wasm32"))]
impl From<ct::MouseButton> for MouseButton {
    fn from(button: ct::MouseButton) -> Self {
        match button {
            ct::MouseButton::Left => MouseButton::Left,
            ct::MouseButton::Right => MouseButton::Right,
            ct::MouseButton::Middle => MouseButton::Middle,
        }
    }
}
