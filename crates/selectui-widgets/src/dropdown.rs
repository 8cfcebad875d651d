#![forbid(unsafe_code)]

//! The dropdown shell.
//!
//! Owns the option list, the selection state, the open flag and the scroll
//! offset, and wires them to input:
//!
//! - a left press on the header toggles the menu (opening resets the scroll
//!   offset to the top)
//! - a press anywhere outside the header and menu closes it; this arrives
//!   through the [`EventHub`] listener acquired by [`Dropdown::mount`]
//! - a press on a row toggles that option; single-select closes the menu
//! - multi-select adds a frozen "Select All"/"Deselect All" row
//! - the wheel scrolls the list
//!
//! After every handled event, a committed selection change is delivered to
//! the change callback exactly once.
//!
//! Rendering lays out a one-row header, then (when open) the select-all row
//! and the scroll container. Only the rows in the computed [`Window`] are
//! drawn.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use selectui_core::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use selectui_core::event_hub::{EventHub, ListenerGuard, ListenerKind};
use selectui_core::geometry::Rect;
use selectui_render::buffer::Buffer;
use selectui_render::style::Style;

use crate::header::DropdownHeader;
use crate::measure::Measured;
use crate::option::SelectOption;
use crate::option_row::{OptionRow, row_area};
use crate::selection::{SelectionState, SelectionValue};
use crate::window::{
    DEFAULT_CONTAINER_HEIGHT, DEFAULT_ITEM_HEIGHT, Window, compute_window, content_height,
    max_scroll_offset,
};
use crate::{Widget, draw_text_span, set_style_area};

/// Rows scrolled per wheel notch.
pub const SCROLL_STEP_ROWS: u32 = 3;

pub const DEFAULT_PLACEHOLDER: &str = "Select...";

pub const SELECT_ALL_LABEL: &str = "Select All";
pub const DESELECT_ALL_LABEL: &str = "Deselect All";

/// Receives each committed selection change.
///
/// A dropdown built without one still commits changes to its own state; the
/// change is then only visible in the debug log.
pub type ChangeCallback = Box<dyn FnMut(SelectionValue)>;

/// What an input event did to the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownAction {
    Ignored,
    Opened,
    Closed,
    /// Option at this index was toggled.
    Toggled(usize),
    SelectAll,
    Scrolled,
}

/// Regions from the last render, used for hit testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Layout {
    header: Rect,
    select_all: Rect,
    list: Rect,
}

impl Layout {
    fn menu(&self) -> Rect {
        self.select_all.union(&self.list)
    }

    fn contains(&self, x: u16, y: u16) -> bool {
        self.header.contains(x, y) || self.menu().contains(x, y)
    }
}

/// Select / multi-select dropdown.
///
/// ```
/// use selectui_widgets::{Dropdown, SelectOption};
///
/// let options = vec![SelectOption::new("Red", "red"), SelectOption::new("Blue", "blue")];
/// let dropdown = Dropdown::new(options).multi_select(true).placeholder("Colors");
/// assert!(dropdown.selection().current().is_empty());
/// ```
pub struct Dropdown {
    options: Vec<SelectOption>,
    selection: SelectionState,
    on_change: Option<ChangeCallback>,
    placeholder: String,
    virtualize: bool,
    style: Style,
    highlight_style: Style,
    class_name: Option<String>,
    menu_height: u16,
    item_height: u16,
    scroll_offset: Cell<u32>,
    open: Rc<Cell<bool>>,
    layout: Rc<Cell<Layout>>,
    container: Measured,
    outside_click: Option<ListenerGuard>,
}

impl Dropdown {
    /// Uncontrolled single-select dropdown over `options`.
    ///
    /// Hosts that need the selection attach [`on_change`](Self::on_change);
    /// until then the change callback is a no-op.
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self {
            options,
            selection: SelectionState::uncontrolled(false),
            on_change: None,
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            virtualize: true,
            style: Style::default(),
            highlight_style: Style::new().reverse(),
            class_name: None,
            menu_height: DEFAULT_CONTAINER_HEIGHT,
            item_height: DEFAULT_ITEM_HEIGHT,
            scroll_offset: Cell::new(0),
            open: Rc::new(Cell::new(false)),
            layout: Rc::new(Cell::new(Layout::default())),
            container: Measured::new("container"),
            outside_click: None,
        }
    }

    #[must_use]
    pub fn multi_select(mut self, multi_select: bool) -> Self {
        self.selection = self.selection.with_multi_select(multi_select);
        self
    }

    /// Make the dropdown controlled, mirroring `value`.
    #[must_use]
    pub fn selected(mut self, value: SelectionValue) -> Self {
        self.selection = SelectionState::controlled(self.selection.is_multi_select(), value);
        self
    }

    /// Called once per handled event that committed a change. In controlled
    /// mode this carries the proposal; the host answers with
    /// [`set_selected`](Self::set_selected).
    #[must_use]
    pub fn on_change(mut self, callback: impl FnMut(SelectionValue) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn virtualize(mut self, virtualize: bool) -> Self {
        self.virtualize = virtualize;
        self
    }

    /// Base style for the header and rows.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Style layered over selected rows.
    #[must_use]
    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    /// Presentation tag, carried through to logs.
    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Maximum height of the scroll container, in rows.
    #[must_use]
    pub fn menu_height(mut self, rows: u16) -> Self {
        self.menu_height = rows;
        self
    }

    /// Height of one option row. Layout hands every row exactly this many
    /// terminal rows, so it is used as given rather than measured.
    #[must_use]
    pub fn item_height(mut self, rows: u16) -> Self {
        self.item_height = rows.max(1);
        self
    }

    // ========== Host-facing state ==========

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Replace the option list. Selection is kept.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
        self.clamp_scroll();
        selectui_core::debug!(
            class = self.class_name.as_deref().unwrap_or(""),
            count = self.options.len(),
            "options replaced"
        );
    }

    pub fn set_virtualize(&mut self, virtualize: bool) {
        self.virtualize = virtualize;
    }

    pub fn is_virtualize_requested(&self) -> bool {
        self.virtualize
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Feed the host's value back (controlled mode).
    pub fn set_selected(&mut self, value: SelectionValue) {
        self.selection.sync_controlled(value);
    }

    pub fn class_name_ref(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn set_open(&mut self, open: bool) {
        if open && !self.open.get() {
            self.scroll_offset.set(0);
        }
        self.open.set(open);
    }

    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset.get()
    }

    /// Container height: measured if available, else configured.
    pub fn container_height(&self) -> u16 {
        self.container.height_or(self.menu_height)
    }

    pub fn row_height(&self) -> u16 {
        self.item_height.max(1)
    }

    /// The window the next render would use.
    pub fn window(&self) -> Window {
        compute_window(
            self.options.len(),
            self.virtualize,
            u32::from(self.container_height()),
            u32::from(self.row_height()),
            self.scroll_offset.get(),
        )
    }

    fn max_scroll(&self) -> u32 {
        max_scroll_offset(
            self.options.len(),
            u32::from(self.container_height()),
            u32::from(self.row_height()),
        )
    }

    /// Pull the offset back inside `[0, max_scroll]`. Needed whenever the
    /// option count or the container height changes.
    fn clamp_scroll(&self) {
        let max = self.max_scroll();
        if self.scroll_offset.get() > max {
            selectui_core::trace!(from = self.scroll_offset.get(), to = max, "scroll clamped");
            self.scroll_offset.set(max);
        }
    }

    // ========== Lifecycle ==========

    /// Acquire the outside-click listener and the container resize observer.
    ///
    /// Mounting again releases the previous subscriptions first.
    pub fn mount(&mut self, hub: &EventHub) {
        self.unmount();
        let open = Rc::clone(&self.open);
        let layout = Rc::clone(&self.layout);
        self.outside_click = Some(hub.subscribe(ListenerKind::PointerDown, move |event| {
            let Some(mouse) = event.as_mouse() else {
                return;
            };
            if open.get() && !layout.get().contains(mouse.x, mouse.y) {
                selectui_core::debug!(x = mouse.x, y = mouse.y, "outside press closed menu");
                open.set(false);
            }
        }));
        self.container.observe(hub);
    }

    /// Release every hub subscription. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if let Some(mut guard) = self.outside_click.take() {
            guard.release();
        }
        self.container.release();
    }

    pub fn is_mounted(&self) -> bool {
        self.outside_click.is_some()
    }

    // ========== Input ==========

    /// Handle one input event, then deliver any committed change.
    pub fn handle_event(&mut self, event: &Event) -> DropdownAction {
        let action = match event {
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => DropdownAction::Ignored,
        };
        self.flush_change();
        action
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> DropdownAction {
        let layout = self.layout.get();
        let (x, y) = mouse.position();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if layout.header.contains(x, y) {
                    let open = !self.is_open();
                    self.set_open(open);
                    selectui_core::debug!(
                        class = self.class_name.as_deref().unwrap_or(""),
                        open,
                        "menu toggled"
                    );
                    return if open {
                        DropdownAction::Opened
                    } else {
                        DropdownAction::Closed
                    };
                }
                if !self.is_open() {
                    return DropdownAction::Ignored;
                }
                if layout.select_all.contains(x, y) && self.selection.select_all(&self.options) {
                    return DropdownAction::SelectAll;
                }
                if layout.list.contains(x, y) {
                    let item_height = u32::from(self.row_height());
                    let row = u32::from(y - layout.list.y);
                    let index = ((self.scroll_offset.get() + row) / item_height) as usize;
                    if let Some(option) = self.options.get(index) {
                        let outcome = self.selection.toggle(option);
                        if outcome.close_menu {
                            self.open.set(false);
                        }
                        return DropdownAction::Toggled(index);
                    }
                }
                DropdownAction::Ignored
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp
                if self.is_open() && layout.menu().contains(x, y) =>
            {
                let step = SCROLL_STEP_ROWS * u32::from(self.row_height());
                let offset = self.scroll_offset.get();
                self.scroll_offset.set(if mouse.kind == MouseEventKind::ScrollDown {
                    offset.saturating_add(step).min(self.max_scroll())
                } else {
                    offset.saturating_sub(step)
                });
                DropdownAction::Scrolled
            }
            _ => DropdownAction::Ignored,
        }
    }

    fn flush_change(&mut self) {
        let Some(value) = self.selection.take_change() else {
            return;
        };
        selectui_core::debug!(
            class = self.class_name.as_deref().unwrap_or(""),
            selected = value.as_slice().len(),
            controlled = self.selection.is_controlled(),
            "selection changed"
        );
        if let Some(callback) = self.on_change.as_mut() {
            callback(value);
        }
    }
}

impl Widget for Dropdown {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut layout = Layout::default();
        if area.is_empty() {
            self.layout.set(layout);
            return;
        }

        let (header, mut rest) = area.split_top(1);
        let multi = self.selection.is_multi_select();
        DropdownHeader::new(self.selection.current(), &self.placeholder, multi)
            .open(self.is_open())
            .style(self.style)
            .render(header, buf);
        layout.header = header;

        if self.is_open() {
            if multi {
                let (select_all, list_rest) = rest.split_top(1);
                let label = if self.selection.is_all_selected(self.options.len()) {
                    DESELECT_ALL_LABEL
                } else {
                    SELECT_ALL_LABEL
                };
                let style = self.style.bold();
                set_style_area(buf, select_all, style);
                if !select_all.is_empty() {
                    draw_text_span(buf, select_all.x, select_all.y, label, style, select_all.right());
                }
                layout.select_all = select_all;
                rest = list_rest;
            }

            let item_height = self.row_height();
            let content = content_height(self.options.len(), u32::from(item_height));
            let list_height = u64::from(self.menu_height.min(rest.height)).min(content) as u16;
            let list = Rect::new(rest.x, rest.y, rest.width, list_height);
            self.container.record(list.size());
            self.clamp_scroll();
            layout.list = list;

            let window = self.window();
            let scroll = self.scroll_offset.get();
            buf.push_scissor(list);
            set_style_area(buf, list, self.style);
            for index in window.indices() {
                let Some(row) = row_area(list, index, item_height, scroll) else {
                    continue;
                };
                let option = &self.options[index];
                OptionRow::new(option, self.selection.is_selected(option), multi)
                    .style(self.style)
                    .highlight_style(self.highlight_style)
                    .clipped_top(row.clipped_top)
                    .render(row.area, buf);
            }
            buf.pop_scissor();
            selectui_core::trace!(
                start = window.start_index,
                end = window.end_index,
                virtualized = window.is_virtualized,
                "rows rendered"
            );
        }

        self.layout.set(layout);
    }
}

impl fmt::Debug for Dropdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dropdown")
            .field("options", &self.options.len())
            .field("selection", &self.selection)
            .field("open", &self.is_open())
            .field("scroll_offset", &self.scroll_offset.get())
            .field("virtualize", &self.virtualize)
            .field("class_name", &self.class_name)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<SelectOption> {
        (1..=n)
            .map(|i| SelectOption::new(format!("Option {i}"), format!("option{i}")))
            .collect()
    }

    fn render(dropdown: &Dropdown, width: u16, height: u16) -> Buffer {
        let mut buf = Buffer::new(width, height);
        dropdown.render(Rect::new(0, 0, width, height), &mut buf);
        buf
    }

    fn click(x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent::left_down(x, y))
    }

    #[test]
    fn header_click_toggles_open() {
        let mut dd = Dropdown::new(options(3));
        render(&dd, 20, 10);
        assert_eq!(dd.handle_event(&click(2, 0)), DropdownAction::Opened);
        assert!(dd.is_open());
        render(&dd, 20, 10);
        assert_eq!(dd.handle_event(&click(2, 0)), DropdownAction::Closed);
        assert!(!dd.is_open());
    }

    #[test]
    fn clicks_ignored_before_first_render() {
        let mut dd = Dropdown::new(options(3));
        assert_eq!(dd.handle_event(&click(0, 0)), DropdownAction::Ignored);
    }

    #[test]
    fn list_height_shrinks_to_content() {
        let mut dd = Dropdown::new(options(2));
        dd.set_open(true);
        render(&dd, 20, 10);
        assert_eq!(dd.container_height(), 2);
        assert_eq!(dd.handle_event(&click(1, 3)), DropdownAction::Ignored);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut dd = Dropdown::new(options(10));
        dd.set_open(true);
        render(&dd, 20, 10);
        let wheel = |kind| Event::Mouse(MouseEvent::new(kind, 1, 2));
        for _ in 0..5 {
            dd.handle_event(&wheel(MouseEventKind::ScrollDown));
        }
        assert_eq!(dd.scroll_offset(), 4);
        dd.handle_event(&wheel(MouseEventKind::ScrollUp));
        assert_eq!(dd.scroll_offset(), 1);
        dd.handle_event(&wheel(MouseEventKind::ScrollUp));
        assert_eq!(dd.scroll_offset(), 0);
    }

    #[test]
    fn wheel_outside_menu_is_ignored() {
        let mut dd = Dropdown::new(options(10));
        dd.set_open(true);
        render(&dd, 20, 10);
        let wheel = Event::Mouse(MouseEvent::new(MouseEventKind::ScrollDown, 25, 9));
        assert_eq!(dd.handle_event(&wheel), DropdownAction::Ignored);
        assert_eq!(dd.scroll_offset(), 0);
    }

    #[test]
    fn set_options_clamps_scroll_and_keeps_selection() {
        let mut dd = Dropdown::new(options(50)).multi_select(true);
        dd.set_open(true);
        render(&dd, 20, 10);
        dd.handle_event(&click(1, 2));
        for _ in 0..20 {
            dd.handle_event(&Event::Mouse(MouseEvent::new(MouseEventKind::ScrollDown, 1, 3)));
        }
        assert_eq!(dd.scroll_offset(), 44);

        dd.set_options(options(8));
        assert_eq!(dd.scroll_offset(), 2);
        assert_eq!(dd.selection().current().len(), 1);
    }

    #[test]
    fn class_name_passes_through() {
        let dd = Dropdown::new(options(1)).class_name("fruit-picker");
        assert_eq!(dd.class_name_ref(), Some("fruit-picker"));
    }
}
