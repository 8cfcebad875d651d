#![forbid(unsafe_code)]

//! Dropdown header: the summary line and the open/closed arrow.

use selectui_core::geometry::Rect;
use selectui_render::buffer::Buffer;
use selectui_render::cell::Cell;
use selectui_render::style::Style;

use crate::option::SelectOption;
use crate::{Widget, draw_text_span, set_style_area};

/// Labels listed before collapsing into "+ N more".
pub const SUMMARY_LIMIT: usize = 3;

pub const ARROW_OPEN: char = '▲';
pub const ARROW_CLOSED: char = '▼';

/// Text for the header line.
///
/// Empty selection shows the placeholder. Multi-select with more than
/// [`SUMMARY_LIMIT`] entries shows the first few labels and a count of the
/// rest. Labels appear in selection order.
#[must_use]
pub fn summarize(selection: &[SelectOption], placeholder: &str, is_multi_select: bool) -> String {
    if selection.is_empty() {
        return placeholder.to_owned();
    }
    let join = |items: &[SelectOption]| {
        items
            .iter()
            .map(SelectOption::label)
            .collect::<Vec<_>>()
            .join(", ")
    };
    if is_multi_select && selection.len() > SUMMARY_LIMIT {
        let shown = join(&selection[..SUMMARY_LIMIT]);
        return format!("{shown} + {} more", selection.len() - SUMMARY_LIMIT);
    }
    join(selection)
}

/// One-row header widget.
#[derive(Debug, Clone)]
pub struct DropdownHeader<'a> {
    selection: &'a [SelectOption],
    placeholder: &'a str,
    multi_select: bool,
    open: bool,
    style: Style,
    placeholder_style: Style,
}

impl<'a> DropdownHeader<'a> {
    pub fn new(selection: &'a [SelectOption], placeholder: &'a str, multi_select: bool) -> Self {
        Self {
            selection,
            placeholder,
            multi_select,
            open: false,
            style: Style::default(),
            placeholder_style: Style::new().dim(),
        }
    }

    #[must_use]
    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Extra style layered over the base style when the placeholder shows.
    #[must_use]
    pub fn placeholder_style(mut self, style: Style) -> Self {
        self.placeholder_style = style;
        self
    }

    pub fn arrow(&self) -> char {
        if self.open { ARROW_OPEN } else { ARROW_CLOSED }
    }
}

impl Widget for DropdownHeader<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let Some(row) = area.row(0).filter(|r| !r.is_empty()) else {
            return;
        };
        set_style_area(buf, row, self.style);

        let arrow_x = row.right() - 1;
        let mut arrow = Cell::from_char(self.arrow());
        self.style.apply_to(&mut arrow);
        buf.set(arrow_x, row.y, arrow);

        // One column of gap before the arrow.
        let text_end = arrow_x.saturating_sub(1).max(row.x);
        let text = summarize(self.selection, self.placeholder, self.multi_select);
        let text_style = if self.selection.is_empty() {
            self.style.patch(self.placeholder_style)
        } else {
            self.style
        };
        draw_text_span(buf, row.x, row.y, &text, text_style, text_end);
    }
}
