#![forbid(unsafe_code)]

//! Select and multi-select dropdown widgets.

pub mod dropdown;
pub mod header;
pub mod measure;
pub mod option;
pub mod option_row;
pub mod selection;
pub mod window;

pub use dropdown::Dropdown;
pub use option::SelectOption;
pub use selection::{SelectionState, SelectionValue};
pub use window::{Window, compute_window};

use selectui_core::geometry::Rect;
use selectui_render::buffer::Buffer;
use selectui_render::cell::Cell;
use selectui_render::style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Something that draws itself into a region of a [`Buffer`].
///
/// Rendering takes `&self`; widgets that must remember what they drew (for
/// hit testing) keep that in interior-mutable cells.
pub trait Widget {
    fn render(&self, area: Rect, buf: &mut Buffer);
}

/// Restyle every cell of `area` that lies inside the current scissor.
/// Cell content is left alone.
pub fn set_style_area(buf: &mut Buffer, area: Rect, style: Style) {
    if style.is_empty() {
        return;
    }
    let area = area.intersection(&buf.current_scissor());
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if let Some(cell) = buf.get_mut(x, y) {
                style.apply_to(cell);
            }
        }
    }
}

/// Write `content` starting at `(x, y)`, one grapheme per cell run.
///
/// Returns the column after the last grapheme written.
/// Stops at `max_x` (exclusive); a wide grapheme that would straddle
/// `max_x` is not drawn.
pub fn draw_text_span(
    buf: &mut Buffer,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x as usize + w > max_x as usize {
            break;
        }
        if let Some(c) = grapheme.chars().next() {
            let mut cell = Cell::from_char(c);
            style.apply_to(&mut cell);
            buf.set(x, y, cell);
        }
        x = x.saturating_add(w as u16);
    }
    x
}
