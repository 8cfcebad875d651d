#![forbid(unsafe_code)]

//! Optional style overrides applied onto cells.

use crate::cell::{Cell, PackedRgba, StyleFlags};

/// A set of optional overrides. `None` fields leave the cell untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    pub attrs: Option<StyleFlags>,
}

impl Style {
    #[inline]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    #[inline]
    pub const fn fg(mut self, fg: PackedRgba) -> Self {
        self.fg = Some(fg);
        self
    }

    #[inline]
    pub const fn bg(mut self, bg: PackedRgba) -> Self {
        self.bg = Some(bg);
        self
    }

    #[inline]
    pub const fn attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = Some(attrs);
        self
    }

    /// Add flags on top of any already requested.
    #[inline]
    pub fn add_attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | attrs);
        self
    }

    pub fn bold(self) -> Self {
        self.add_attrs(StyleFlags::BOLD)
    }

    pub fn dim(self) -> Self {
        self.add_attrs(StyleFlags::DIM)
    }

    pub fn reverse(self) -> Self {
        self.add_attrs(StyleFlags::REVERSE)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Layer `other` over `self`: colors in `other` win, flags are unioned.
    pub fn patch(self, other: Style) -> Self {
        let attrs = match (self.attrs, other.attrs) {
            (Some(a), Some(b)) => Some(a | b),
            (a, b) => a.or(b),
        };
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs,
        }
    }

    /// Write the overrides into a cell, preserving its content.
    pub fn apply_to(&self, cell: &mut Cell) {
        if let Some(fg) = self.fg {
            cell.fg = fg;
        }
        if let Some(bg) = self.bg {
            cell.bg = bg;
        }
        if let Some(attrs) = self.attrs {
            cell.flags = attrs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(Style::default().is_empty());
        assert!(!Style::new().bold().is_empty());
    }

    #[test]
    fn patch_prefers_other_colors_and_unions_flags() {
        let base = Style::new().fg(PackedRgba::RED).bold();
        let top = Style::new().fg(PackedRgba::BLUE).bg(PackedRgba::BLACK).dim();
        let merged = base.patch(top);
        assert_eq!(merged.fg, Some(PackedRgba::BLUE));
        assert_eq!(merged.bg, Some(PackedRgba::BLACK));
        assert_eq!(merged.attrs, Some(StyleFlags::BOLD | StyleFlags::DIM));
    }

    #[test]
    fn patch_keeps_base_when_other_empty() {
        let base = Style::new().bg(PackedRgba::GREEN);
        assert_eq!(base.patch(Style::new()), base);
    }

    #[test]
    fn apply_preserves_content() {
        let mut cell = Cell::from_char('Z');
        Style::new().fg(PackedRgba::rgb(1, 2, 3)).reverse().apply_to(&mut cell);
        assert_eq!(cell.content.as_char(), Some('Z'));
        assert_eq!(cell.fg, PackedRgba::rgb(1, 2, 3));
        assert!(cell.flags.contains(StyleFlags::REVERSE));
    }

    #[test]
    fn empty_style_is_noop() {
        let mut cell = Cell::from_char('A');
        let before = cell;
        Style::default().apply_to(&mut cell);
        assert_eq!(cell, before);
    }
}
