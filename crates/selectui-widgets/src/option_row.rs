#![forbid(unsafe_code)]

//! A single option row.

use selectui_core::geometry::Rect;
use selectui_render::buffer::Buffer;
use selectui_render::style::Style;

use crate::option::SelectOption;
use crate::{Widget, draw_text_span, set_style_area};

pub const CHECKED: &str = "[x] ";
pub const UNCHECKED: &str = "[ ] ";

#[derive(Debug, Clone)]
pub struct OptionRow<'a> {
    option: &'a SelectOption,
    selected: bool,
    multi_select: bool,
    style: Style,
    highlight_style: Style,
    clipped_top: u16,
}

impl<'a> OptionRow<'a> {
    pub fn new(option: &'a SelectOption, selected: bool, multi_select: bool) -> Self {
        Self {
            option,
            selected,
            multi_select,
            style: Style::default(),
            highlight_style: Style::new().reverse(),
            clipped_top: 0,
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    /// Lines of this row scrolled out above the area it renders into. The
    /// label sits on the first line, so it is only drawn when this is 0.
    #[must_use]
    pub fn clipped_top(mut self, rows: u16) -> Self {
        self.clipped_top = rows;
        self
    }

    /// Text drawn on the row: a checkbox prefix in multi-select, then the label.
    pub fn text(&self) -> String {
        if self.multi_select {
            let mark = if self.selected { CHECKED } else { UNCHECKED };
            format!("{mark}{}", self.option.label())
        } else {
            self.option.label().to_owned()
        }
    }
}

impl Widget for OptionRow<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let style = if self.selected {
            self.style.patch(self.highlight_style)
        } else {
            self.style
        };
        set_style_area(buf, area, style);
        if self.clipped_top == 0 {
            draw_text_span(buf, area.x, area.y, &self.text(), style, area.right());
        }
    }
}

/// The part of a row that lands inside the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPlacement {
    /// Visible rows of the option, clipped to the list.
    pub area: Rect,
    /// How many of the option's lines are scrolled out above `area`.
    pub clipped_top: u16,
}

/// Where row `index` lands inside `list`, given the scroll offset.
///
/// Rows sit at `index * item_height - scroll_offset` from the list top. A row
/// straddling either edge keeps its visible lines; `None` when no line of the
/// row is inside the list.
#[must_use]
pub fn row_area(
    list: Rect,
    index: usize,
    item_height: u16,
    scroll_offset: u32,
) -> Option<RowPlacement> {
    let item_height = i64::from(item_height.max(1));
    let offset = index as i64 * item_height - i64::from(scroll_offset);
    if offset + item_height <= 0 || offset >= i64::from(list.height) {
        return None;
    }
    let clipped_top = (-offset).max(0);
    let top = list.y + offset.max(0) as u16;
    let height = (item_height - clipped_top).min(i64::from(list.bottom() - top)) as u16;
    Some(RowPlacement {
        area: Rect::new(list.x, top, list.width, height),
        clipped_top: clipped_top as u16,
    })
}
