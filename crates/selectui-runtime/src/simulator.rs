#![forbid(unsafe_code)]

//! Headless driver for a [`Model`].
//!
//! Tests feed events or messages in and capture rendered buffers out, with no
//! terminal involved. Events go through the model's
//! [`EventHub`](selectui_core::event_hub::EventHub) first, then `update`, in
//! the same order [`Program`](crate::Program) uses. Commands run inline and
//! are recorded in [`ProgramSimulator::command_log`].
//!
//! ```ignore
//! let mut sim = ProgramSimulator::new(ConfiguratorModel::new(5, false, true));
//! sim.init();
//! sim.inject_event(Event::Mouse(MouseEvent::left_down(1, 6)));
//! let buf = sim.capture_frame(60, 18);
//! ```

use std::time::Duration;

use selectui_core::event::Event;
use selectui_render::buffer::Buffer;
use selectui_render::frame::Frame;

use crate::program::{Cmd, Model};

/// A command as executed by the simulator, minus its message payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    None,
    Quit,
    Msg,
    /// Batch with this many children.
    Batch(usize),
    /// Sequence with this many children.
    Sequence(usize),
    Tick(Duration),
    Log(String),
}

impl CmdRecord {
    fn of<M>(cmd: &Cmd<M>) -> Self {
        match cmd {
            Cmd::None => Self::None,
            Cmd::Quit => Self::Quit,
            Cmd::Msg(_) => Self::Msg,
            Cmd::Batch(cmds) => Self::Batch(cmds.len()),
            Cmd::Sequence(cmds) => Self::Sequence(cmds.len()),
            Cmd::Tick(rate) => Self::Tick(*rate),
            Cmd::Log(text) => Self::Log(text.clone()),
        }
    }
}

/// Runs a [`Model`] without a terminal.
pub struct ProgramSimulator<M: Model> {
    model: M,
    frames: Vec<Buffer>,
    command_log: Vec<CmdRecord>,
    running: bool,
    tick_rate: Option<Duration>,
    logs: Vec<String>,
}

impl<M: Model> ProgramSimulator<M> {
    /// Wrap `model`. Nothing runs until [`init`](Self::init).
    pub fn new(model: M) -> Self {
        Self {
            model,
            frames: Vec::new(),
            command_log: Vec::new(),
            running: true,
            tick_rate: None,
            logs: Vec::new(),
        }
    }

    /// Run `Model::init` and its commands.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
    }

    /// Feed events in order. Stops early once the model quits.
    pub fn inject_events(&mut self, events: &[Event]) {
        for event in events {
            if !self.running {
                break;
            }
            if let Some(hub) = self.model.event_hub() {
                hub.dispatch(event);
            }
            let msg = M::Message::from(event.clone());
            let cmd = self.model.update(msg);
            self.execute_cmd(cmd);
        }
    }

    pub fn inject_event(&mut self, event: Event) {
        self.inject_events(&[event]);
    }

    /// Send a specific message to the model, bypassing the hub.
    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    /// Render the model into a fresh `width x height` buffer and keep it.
    pub fn capture_frame(&mut self, width: u16, height: u16) -> &Buffer {
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        let index = self.frames.len();
        self.frames.push(frame.into_buffer());
        &self.frames[index]
    }

    pub fn frames(&self) -> &[Buffer] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Buffer> {
        self.frames.last()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// `false` once a `Cmd::Quit` has run.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_rate(&self) -> Option<Duration> {
        self.tick_rate
    }

    /// Text of every `Cmd::Log`, in order.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    pub fn clear_frames(&mut self) {
        self.frames.clear();
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        self.command_log.push(CmdRecord::of(&cmd));
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.running = false,
            Cmd::Msg(m) => {
                let next = self.model.update(m);
                self.execute_cmd(next);
            }
            Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                for c in cmds {
                    if !self.running {
                        break;
                    }
                    self.execute_cmd(c);
                }
            }
            Cmd::Tick(rate) => self.tick_rate = Some(rate),
            Cmd::Log(text) => self.logs.push(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selectui_core::event::{KeyCode, KeyEvent, MouseEvent};
    use selectui_core::event_hub::{EventHub, ListenerGuard, ListenerKind};
    use selectui_render::cell::Cell;
    use std::cell::Cell as StdCell;
    use std::rc::Rc;

    struct Counter {
        value: i32,
        initialized: bool,
    }

    #[derive(Debug)]
    enum CounterMsg {
        Increment,
        Reset,
        Quit,
        LogValue,
        BatchIncrement(usize),
        Ignore,
    }

    impl From<Event> for CounterMsg {
        fn from(event: Event) -> Self {
            match event {
                Event::Key(k) if k.is_char('+') => CounterMsg::Increment,
                Event::Key(k) if k.is_char('r') => CounterMsg::Reset,
                Event::Key(k) if k.is_char('q') => CounterMsg::Quit,
                _ => CounterMsg::Ignore,
            }
        }
    }

    impl Model for Counter {
        type Message = CounterMsg;

        fn init(&mut self) -> Cmd<Self::Message> {
            self.initialized = true;
            Cmd::tick(Duration::from_millis(250))
        }

        fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
            match msg {
                CounterMsg::Increment => {
                    self.value += 1;
                    Cmd::none()
                }
                CounterMsg::Reset => {
                    self.value = 0;
                    Cmd::none()
                }
                CounterMsg::Quit => Cmd::quit(),
                CounterMsg::LogValue => Cmd::log(format!("value={}", self.value)),
                CounterMsg::BatchIncrement(n) => {
                    Cmd::batch((0..n).map(|_| Cmd::msg(CounterMsg::Increment)).collect())
                }
                CounterMsg::Ignore => Cmd::none(),
            }
        }

        fn view(&self, frame: &mut Frame) {
            let text = format!("Count: {}", self.value);
            for (i, c) in text.chars().enumerate() {
                if (i as u16) < frame.width() {
                    frame.buffer.set(i as u16, 0, Cell::from_char(c));
                }
            }
        }
    }

    fn counter() -> ProgramSimulator<Counter> {
        ProgramSimulator::new(Counter {
            value: 0,
            initialized: false,
        })
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    #[test]
    fn init_runs_model_init_and_its_commands() {
        let mut sim = counter();
        assert!(!sim.model().initialized);
        sim.init();
        assert!(sim.model().initialized);
        assert_eq!(sim.tick_rate(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn injected_keys_update_the_model() {
        let mut sim = counter();
        sim.inject_events(&[key('+'), key('+'), key('+')]);
        assert_eq!(sim.model().value, 3);
        sim.inject_event(key('r'));
        assert_eq!(sim.model().value, 0);
    }

    #[test]
    fn quit_stops_further_events() {
        let mut sim = counter();
        sim.inject_events(&[key('+'), key('q'), key('+')]);
        assert!(!sim.is_running());
        assert_eq!(sim.model().value, 1);
        sim.send(CounterMsg::Increment);
        assert_eq!(sim.model().value, 1);
    }

    #[test]
    fn batch_and_log_are_recorded() {
        let mut sim = counter();
        sim.send(CounterMsg::BatchIncrement(3));
        sim.send(CounterMsg::LogValue);
        assert_eq!(sim.model().value, 3);
        assert_eq!(sim.logs(), ["value=3".to_string()]);
        assert_eq!(sim.command_log()[0], CmdRecord::Batch(3));
        assert!(sim.command_log().contains(&CmdRecord::Log("value=3".into())));
        sim.clear_logs();
        assert!(sim.logs().is_empty());
    }

    #[test]
    fn frames_are_captured_in_order() {
        let mut sim = counter();
        sim.capture_frame(12, 1);
        sim.send(CounterMsg::Increment);
        let buf = sim.capture_frame(12, 1);
        assert_eq!(buf.get(7, 0).and_then(|c| c.content.as_char()), Some('1'));
        assert_eq!(sim.frame_count(), 2);
        let first = &sim.frames()[0];
        assert_eq!(first.get(7, 0).and_then(|c| c.content.as_char()), Some('0'));
        sim.clear_frames();
        assert!(sim.last_frame().is_none());
    }

    struct HubModel {
        hub: EventHub,
        presses: Rc<StdCell<usize>>,
        presses_at_update: Vec<usize>,
        _guard: ListenerGuard,
    }

    struct AnyEvent;

    impl From<Event> for AnyEvent {
        fn from(_: Event) -> Self {
            AnyEvent
        }
    }

    impl Model for HubModel {
        type Message = AnyEvent;

        fn update(&mut self, _msg: AnyEvent) -> Cmd<AnyEvent> {
            self.presses_at_update.push(self.presses.get());
            Cmd::none()
        }

        fn view(&self, _frame: &mut Frame) {}

        fn event_hub(&self) -> Option<&EventHub> {
            Some(&self.hub)
        }
    }

    #[test]
    fn hub_sees_events_before_update() {
        let hub = EventHub::default();
        let presses = Rc::new(StdCell::new(0));
        let seen = Rc::clone(&presses);
        let guard = hub.subscribe(ListenerKind::PointerDown, move |_| {
            seen.set(seen.get() + 1);
        });
        let mut sim = ProgramSimulator::new(HubModel {
            hub,
            presses,
            presses_at_update: Vec::new(),
            _guard: guard,
        });
        sim.inject_events(&[Event::Mouse(MouseEvent::left_down(1, 1)), key('x')]);
        // The press was counted before the first update ran.
        assert_eq!(sim.model().presses_at_update, vec![1, 1]);
    }
}
