#![forbid(unsafe_code)]

//! The configurator screen.
//!
//! Hosts one [`Dropdown`] and a few knobs: single or multi-select,
//! controlled or uncontrolled, and the number of generated options. Large
//! option counts switch virtualization on.

use std::cell::RefCell;
use std::rc::Rc;

use selectui_core::event::{Event, KeyCode};
use selectui_core::event_hub::EventHub;
use selectui_core::geometry::Rect;
use selectui_render::buffer::Buffer;
use selectui_render::frame::Frame;
use selectui_render::style::Style;
use selectui_runtime::{Cmd, Model};
use selectui_widgets::{Dropdown, SelectOption, SelectionValue, Widget, draw_text_span};

/// Option counts at or above this render through the window.
pub const VIRTUALIZATION_THRESHOLD: usize = 100;
pub const MIN_OPTION_COUNT: usize = 1;
pub const MAX_OPTION_COUNT: usize = 1000;
pub const DEFAULT_OPTION_COUNT: usize = 5;

const PLACEHOLDER: &str = "Select one or more options...";
const MENU_ROWS: u16 = 6;
const DROPDOWN_WIDTH: u16 = 40;
/// Header, Select All row and the menu.
const DROPDOWN_ROWS: u16 = MENU_ROWS + 2;
const DROPDOWN_TOP: u16 = 6;
const SUMMARY_LIMIT: usize = 3;

/// Parse option-count input.
///
/// Non-numeric text yields `None` and should be ignored. Empty text counts
/// as zero. Numbers are clamped to `1..=1000` and floored.
pub fn parse_option_count(text: &str) -> Option<usize> {
    let text = text.trim();
    let value = if text.is_empty() {
        0.0
    } else {
        text.parse::<f64>().ok()?
    };
    if value.is_nan() {
        return None;
    }
    let clamped = value.clamp(MIN_OPTION_COUNT as f64, MAX_OPTION_COUNT as f64);
    Some(clamped.floor() as usize)
}

/// `count` options labelled "Option 1".. with values "option1"..
pub fn sample_options(count: usize) -> Vec<SelectOption> {
    (1..=count)
        .map(|i| SelectOption::new(format!("Option {i}"), format!("option{i}")))
        .collect()
}

/// Text after "Current Selection:" in the status area.
pub fn selection_summary(controlled: bool, selected: &SelectionValue) -> String {
    if !controlled {
        return "Uncontrolled".to_owned();
    }
    match selected {
        SelectionValue::Single(Some(option)) => option.label().to_owned(),
        SelectionValue::Single(None) => "None".to_owned(),
        SelectionValue::Multi(options) if options.is_empty() => "None".to_owned(),
        SelectionValue::Multi(options) => {
            let mut text = options
                .iter()
                .take(SUMMARY_LIMIT)
                .map(SelectOption::label)
                .collect::<Vec<_>>()
                .join(", ");
            if options.len() > SUMMARY_LIMIT {
                text.push_str(", ...");
            }
            text
        }
    }
}

/// Messages for the configurator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    ToggleMulti,
    ToggleControlled,
    /// A digit typed into the option-count field.
    CountInput(char),
    CountBackspace,
    /// Pointer input for the dropdown.
    Pointer(Event),
    Quit,
    Noop,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(k) if k.is_char('q') || (k.ctrl() && k.is_char('c')) => Msg::Quit,
            Event::Key(k) if k.is_char('m') => Msg::ToggleMulti,
            Event::Key(k) if k.is_char('c') => Msg::ToggleControlled,
            Event::Key(k) => match k.code {
                KeyCode::Char(c) if c.is_ascii_digit() => Msg::CountInput(c),
                KeyCode::Backspace => Msg::CountBackspace,
                _ => Msg::Noop,
            },
            Event::Mouse(_) => Msg::Pointer(event),
            _ => Msg::Noop,
        }
    }
}

/// Host state for the configurator.
pub struct ConfiguratorModel {
    hub: EventHub,
    dropdown: Dropdown,
    multi_select: bool,
    controlled: bool,
    option_count: usize,
    /// The host's copy of the selection. Fed back in controlled mode.
    selected: SelectionValue,
    inbox: Rc<RefCell<Option<SelectionValue>>>,
}

impl ConfiguratorModel {
    pub fn new(option_count: usize, multi_select: bool, controlled: bool) -> Self {
        let option_count = option_count.clamp(MIN_OPTION_COUNT, MAX_OPTION_COUNT);
        let hub = EventHub::default();
        let inbox = Rc::new(RefCell::new(None));
        let selected = SelectionValue::empty(multi_select);
        let dropdown = build_dropdown(
            option_count,
            multi_select,
            controlled.then(|| selected.clone()),
            &inbox,
            &hub,
        );
        Self {
            hub,
            dropdown,
            multi_select,
            controlled,
            option_count,
            selected,
            inbox,
        }
    }

    pub fn dropdown(&self) -> &Dropdown {
        &self.dropdown
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    pub fn option_count(&self) -> usize {
        self.option_count
    }

    pub fn is_virtualized(&self) -> bool {
        self.option_count >= VIRTUALIZATION_THRESHOLD
    }

    pub fn selected(&self) -> &SelectionValue {
        &self.selected
    }

    /// Area the dropdown occupies inside a frame of `area`.
    pub fn dropdown_area(area: Rect) -> Rect {
        let top = area.y.saturating_add(DROPDOWN_TOP);
        Rect::new(area.x, top, DROPDOWN_WIDTH, DROPDOWN_ROWS).intersection(&area)
    }

    /// Apply edited count text. Returns `false` when the text was rejected.
    pub fn edit_count(&mut self, text: &str) -> bool {
        let Some(count) = parse_option_count(text) else {
            return false;
        };
        if count != self.option_count {
            self.option_count = count;
            self.dropdown.set_options(sample_options(count));
            self.dropdown.set_virtualize(self.is_virtualized());
        }
        true
    }

    /// Mode flags are fixed per dropdown, so changing one rebuilds it.
    fn rebuild(&mut self) {
        self.inbox.borrow_mut().take();
        self.dropdown = build_dropdown(
            self.option_count,
            self.multi_select,
            self.controlled.then(|| self.selected.clone()),
            &self.inbox,
            &self.hub,
        );
    }

    fn take_change(&mut self) -> Cmd<Msg> {
        let Some(value) = self.inbox.borrow_mut().take() else {
            return Cmd::none();
        };
        self.selected = value.clone();
        if self.controlled {
            self.dropdown.set_selected(value);
        }
        Cmd::log(format!(
            "selection: {}",
            selection_summary(true, &self.selected)
        ))
    }
}

fn build_dropdown(
    count: usize,
    multi_select: bool,
    controlled: Option<SelectionValue>,
    inbox: &Rc<RefCell<Option<SelectionValue>>>,
    hub: &EventHub,
) -> Dropdown {
    let slot = Rc::clone(inbox);
    let mut dropdown = Dropdown::new(sample_options(count))
        .multi_select(multi_select)
        .placeholder(PLACEHOLDER)
        .virtualize(count >= VIRTUALIZATION_THRESHOLD)
        .menu_height(MENU_ROWS)
        .class_name("configurator")
        .on_change(move |value| {
            *slot.borrow_mut() = Some(value);
        });
    if let Some(value) = controlled {
        dropdown = dropdown.selected(value);
    }
    dropdown.mount(hub);
    dropdown
}

fn draw_line(buf: &mut Buffer, area: Rect, row: u16, text: &str, style: Style) {
    if let Some(line) = area.row(row) {
        draw_text_span(buf, line.x, line.y, text, style, line.right());
    }
}

fn check(on: bool) -> &'static str {
    if on { "[x]" } else { "[ ]" }
}

impl Model for ConfiguratorModel {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::log(format!(
            "configurator ready: {} options, multi={}, controlled={}",
            self.option_count, self.multi_select, self.controlled
        ))
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::ToggleMulti => {
                self.multi_select = !self.multi_select;
                self.selected = SelectionValue::empty(self.multi_select);
                self.rebuild();
                Cmd::none()
            }
            Msg::ToggleControlled => {
                self.controlled = !self.controlled;
                self.rebuild();
                Cmd::none()
            }
            Msg::CountInput(digit) => {
                let text = format!("{}{digit}", self.option_count);
                self.edit_count(&text);
                Cmd::none()
            }
            Msg::CountBackspace => {
                let mut text = self.option_count.to_string();
                text.pop();
                self.edit_count(&text);
                Cmd::none()
            }
            Msg::Pointer(event) => {
                self.dropdown.handle_event(&event);
                self.take_change()
            }
            Msg::Quit => Cmd::quit(),
            Msg::Noop => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let buf = &mut frame.buffer;
        let lines = [
            (0, "Dropdown Configurator".to_owned(), Style::new().bold()),
            (
                1,
                format!("Virtualization runs for {VIRTUALIZATION_THRESHOLD}+ options."),
                Style::new().dim(),
            ),
            (
                2,
                format!("{} Multi-select (m)", check(self.multi_select)),
                Style::new(),
            ),
            (
                3,
                format!("{} Controlled (c)", check(self.controlled)),
                Style::new(),
            ),
            (
                4,
                format!("Option Count: {} (0-9, Backspace)", self.option_count),
                Style::new(),
            ),
        ];
        for (row, text, style) in &lines {
            draw_line(buf, area, *row, text, *style);
        }

        self.dropdown.render(Self::dropdown_area(area), buf);

        let status = DROPDOWN_TOP + DROPDOWN_ROWS;
        draw_line(
            buf,
            area,
            status,
            &format!(
                "Current Selection: {}",
                selection_summary(self.controlled, &self.selected)
            ),
            Style::new(),
        );
        draw_line(
            buf,
            area,
            status + 1,
            &format!(
                "Virtualized: {}",
                if self.is_virtualized() { "yes" } else { "no" }
            ),
            Style::new(),
        );
    }

    fn event_hub(&self) -> Option<&EventHub> {
        Some(&self.hub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_clamps_and_floors() {
        assert_eq!(parse_option_count("5"), Some(5));
        assert_eq!(parse_option_count("0"), Some(1));
        assert_eq!(parse_option_count(""), Some(1));
        assert_eq!(parse_option_count("99999"), Some(1000));
        assert_eq!(parse_option_count("-4"), Some(1));
        assert_eq!(parse_option_count("42.7"), Some(42));
        assert_eq!(parse_option_count(" 12 "), Some(12));
    }

    #[test]
    fn parse_count_rejects_text() {
        assert_eq!(parse_option_count("abc"), None);
        assert_eq!(parse_option_count("12a"), None);
        assert_eq!(parse_option_count("NaN"), None);
    }

    #[test]
    fn sample_options_are_numbered_from_one() {
        let options = sample_options(3);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].label(), "Option 1");
        assert_eq!(options[2].value(), "option3");
    }

    #[test]
    fn summary_text() {
        let opts = sample_options(5);
        assert_eq!(
            selection_summary(false, &SelectionValue::Multi(opts.clone())),
            "Uncontrolled"
        );
        assert_eq!(selection_summary(true, &SelectionValue::Single(None)), "None");
        assert_eq!(selection_summary(true, &SelectionValue::Multi(vec![])), "None");
        assert_eq!(
            selection_summary(true, &SelectionValue::Single(Some(opts[1].clone()))),
            "Option 2"
        );
        assert_eq!(
            selection_summary(true, &SelectionValue::Multi(opts[..3].to_vec())),
            "Option 1, Option 2, Option 3"
        );
        assert_eq!(
            selection_summary(true, &SelectionValue::Multi(opts)),
            "Option 1, Option 2, Option 3, ..."
        );
    }

    #[test]
    fn keys_map_to_messages() {
        use selectui_core::event::{KeyEvent, Modifiers};
        let key = |code| Event::Key(KeyEvent::new(code));
        assert_eq!(Msg::from(key(KeyCode::Char('m'))), Msg::ToggleMulti);
        assert_eq!(Msg::from(key(KeyCode::Char('c'))), Msg::ToggleControlled);
        assert_eq!(Msg::from(key(KeyCode::Char('7'))), Msg::CountInput('7'));
        assert_eq!(Msg::from(key(KeyCode::Backspace)), Msg::CountBackspace);
        assert_eq!(Msg::from(key(KeyCode::Char('x'))), Msg::Noop);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        assert_eq!(Msg::from(ctrl_c), Msg::Quit);
    }

    #[test]
    fn threshold_controls_virtualization() {
        let mut model = ConfiguratorModel::new(99, false, true);
        assert!(!model.is_virtualized());
        assert!(!model.dropdown().is_virtualize_requested());
        assert!(model.edit_count("100"));
        assert!(model.is_virtualized());
        assert!(model.dropdown().is_virtualize_requested());
        assert_eq!(model.dropdown().options().len(), 100);
    }

    #[test]
    fn rejected_count_text_leaves_state() {
        let mut model = ConfiguratorModel::new(5, false, true);
        assert!(!model.edit_count("five"));
        assert_eq!(model.option_count(), 5);
    }

    #[test]
    fn dropdown_area_is_clipped_to_frame() {
        let area = ConfiguratorModel::dropdown_area(Rect::from_size(30, 10));
        assert_eq!(area, Rect::new(0, 6, 30, 4));
    }
}
