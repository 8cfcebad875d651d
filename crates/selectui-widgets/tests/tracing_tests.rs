#![forbid(unsafe_code)]

//! Logging integration tests.
//!
//! With logging compiled in:
//!   cargo test -p selectui-widgets --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p selectui-widgets --test tracing_tests -- zero_overhead

use std::sync::{Arc, Mutex};

use selectui_core::event::{Event, MouseEvent};
use selectui_core::geometry::Rect;
use selectui_render::buffer::Buffer;
use selectui_widgets::{Dropdown, SelectOption, Widget};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};

/// A captured event: its message plus the other fields, formatted.
#[derive(Debug, Clone, Default)]
struct CapturedEvent {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for CapturedEvent {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name().to_owned(), format!("{value:?}")));
        }
    }
}

#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut captured = CapturedEvent::default();
        event.record(&mut captured);
        self.events.lock().unwrap().push(captured);
    }
}

fn with_capture(run: impl FnOnce()) -> Vec<CapturedEvent> {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, run);
    let events = capture.events.lock().unwrap().clone();
    events
}

fn exercise_dropdown() {
    let options: Vec<_> = (1..=3)
        .map(|i| SelectOption::new(format!("Option {i}"), format!("option{i}")))
        .collect();
    let mut dd = Dropdown::new(options).multi_select(true).class_name("tracing-probe");
    let area = Rect::new(0, 0, 20, 8);
    let mut buf = Buffer::new(20, 8);
    dd.render(area, &mut buf);
    dd.handle_event(&Event::Mouse(MouseEvent::left_down(0, 0)));
    dd.render(area, &mut buf);
    dd.handle_event(&Event::Mouse(MouseEvent::left_down(1, 2)));
}

#[cfg(feature = "tracing")]
#[test]
fn selection_change_is_logged_with_class() {
    let events = with_capture(exercise_dropdown);
    let change = events
        .iter()
        .find(|e| e.message == "selection changed")
        .expect("selection change event");
    assert!(change
        .fields
        .iter()
        .any(|(k, v)| k == "class" && v.contains("tracing-probe")));
    assert!(change.fields.iter().any(|(k, v)| k == "selected" && v == "1"));
    assert!(events.iter().any(|e| e.message == "menu toggled"));
}

#[cfg(feature = "tracing")]
#[test]
fn measurement_is_logged_once_per_change() {
    let events = with_capture(exercise_dropdown);
    let measured = events.iter().filter(|e| e.message == "measured").count();
    // The container, recorded on the first open render only.
    assert_eq!(measured, 1);
}

#[cfg(not(feature = "tracing"))]
#[test]
fn zero_overhead_without_feature() {
    assert!(!selectui_core::logging::ENABLED);
    let events = with_capture(exercise_dropdown);
    assert!(events.is_empty(), "unexpected events: {events:?}");
}
