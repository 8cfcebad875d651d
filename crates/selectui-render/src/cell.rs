#![forbid(unsafe_code)]

//! Cell types: the unit of the render buffer.

/// What a cell displays.
///
/// Wide characters occupy their head cell plus one or more
/// [`CellContent::Continuation`] cells to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CellContent {
    /// Nothing drawn; presented as a space.
    #[default]
    Empty,
    /// A single scalar value.
    Char(char),
    /// Trailing column owned by the wide character to its left.
    Continuation,
}

impl CellContent {
    /// The character in this cell, if any.
    #[inline]
    pub const fn as_char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            _ => None,
        }
    }

    /// Display width of the content in cells.
    ///
    /// Continuations report 0 since their column is owned by the head.
    #[inline]
    pub fn width(self) -> usize {
        match self {
            Self::Empty => 1,
            Self::Continuation => 0,
            Self::Char(c) => unicode_width::UnicodeWidthChar::width(c).unwrap_or(0),
        }
    }
}

/// A single terminal cell.
///
/// The default cell is empty with a transparent background, white foreground
/// and no style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub content: CellContent,
    pub fg: PackedRgba,
    pub bg: PackedRgba,
    pub flags: StyleFlags,
}

impl Cell {
    /// Placeholder for the trailing columns of a wide character.
    pub const CONTINUATION: Self = Self {
        content: CellContent::Continuation,
        fg: PackedRgba::TRANSPARENT,
        bg: PackedRgba::TRANSPARENT,
        flags: StyleFlags::empty(),
    };

    /// Create a cell with the given content and default colors.
    #[inline]
    pub const fn new(content: CellContent) -> Self {
        Self {
            content,
            fg: PackedRgba::WHITE,
            bg: PackedRgba::TRANSPARENT,
            flags: StyleFlags::empty(),
        }
    }

    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self::new(CellContent::Char(c))
    }

    #[inline]
    pub const fn is_continuation(&self) -> bool {
        matches!(self.content, CellContent::Continuation)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    /// Set the content to a character, preserving colors and flags.
    #[inline]
    pub const fn with_char(mut self, c: char) -> Self {
        self.content = CellContent::Char(c);
        self
    }

    #[inline]
    pub const fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    pub const fn with_bg(mut self, bg: PackedRgba) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    pub const fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(CellContent::Empty)
    }
}

/// A compact RGBA color.
///
/// Layout is `0xRRGGBBAA`. Alpha 0 means "terminal default" when presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Whether this color defers to the terminal default.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }
}

bitflags::bitflags! {
    /// 8-bit cell style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct StyleFlags: u8 {
        /// Bold / increased intensity.
        const BOLD          = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM           = 0b0000_0010;
        const ITALIC        = 0b0000_0100;
        const UNDERLINE     = 0b0000_1000;
        const BLINK         = 0b0001_0000;
        /// Reverse video (swap fg/bg).
        const REVERSE       = 0b0010_0000;
        const STRIKETHROUGH = 0b0100_0000;
        /// Hidden / invisible text.
        const HIDDEN        = 0b1000_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_rgba_channels() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
        assert_eq!(c.0, 0x0102_0304);
    }

    #[test]
    fn default_cell_is_empty_white_on_transparent() {
        let cell = Cell::default();
        assert!(cell.is_empty());
        assert_eq!(cell.fg, PackedRgba::WHITE);
        assert!(cell.bg.is_transparent());
        assert!(cell.flags.is_empty());
    }

    #[test]
    fn builders_preserve_other_fields() {
        let cell = Cell::from_char('a')
            .with_fg(PackedRgba::RED)
            .with_flags(StyleFlags::BOLD)
            .with_char('b');
        assert_eq!(cell.content.as_char(), Some('b'));
        assert_eq!(cell.fg, PackedRgba::RED);
        assert!(cell.flags.contains(StyleFlags::BOLD));
    }

    #[test]
    fn content_widths() {
        assert_eq!(CellContent::Char('x').width(), 1);
        assert_eq!(CellContent::Char('中').width(), 2);
        assert_eq!(CellContent::Continuation.width(), 0);
        assert_eq!(CellContent::Empty.width(), 1);
        assert!(Cell::CONTINUATION.is_continuation());
    }
}
