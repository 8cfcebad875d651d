#![forbid(unsafe_code)]

//! Elm-style program loop.
//!
//! State lives in a [`Model`]. Input arrives as [`Event`]s, is converted to
//! the model's message type and handed to `update`, which may return a
//! [`Cmd`]. `view` renders the state into a fresh frame after every change.
//!
//! Before `update` sees an event, it is dispatched to the model's
//! [`EventHub`], so global listeners (a dropdown closing on an outside
//! press) observe it first.
//!
//! ```ignore
//! struct Host {
//!     hub: EventHub,
//!     dropdown: Dropdown,
//! }
//!
//! impl Model for Host {
//!     type Message = Event;
//!
//!     fn update(&mut self, event: Event) -> Cmd<Event> {
//!         match event {
//!             Event::Key(k) if k.is_char('q') => Cmd::quit(),
//!             other => {
//!                 self.dropdown.handle_event(&other);
//!                 Cmd::none()
//!             }
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         self.dropdown.render(frame.area(), &mut frame.buffer);
//!     }
//!
//!     fn event_hub(&self) -> Option<&EventHub> {
//!         Some(&self.hub)
//!     }
//! }
//! ```

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use selectui_core::event::Event;
use selectui_core::event_hub::EventHub;
use selectui_core::terminal_session::{SessionOptions, TerminalSession};
use selectui_render::frame::Frame;
use selectui_render::presenter::Presenter;
use tracing::{debug, debug_span, info, info_span};

use crate::{Error, Result};

/// Application state and behavior.
pub trait Model: Sized {
    /// The message type for this model. Terminal events convert into it.
    type Message: From<Event> + 'static;

    /// Startup commands. Called once before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Draw the current state. Called with a blank frame.
    fn view(&self, frame: &mut Frame);

    /// Hub that receives every event before `update`.
    ///
    /// Models hosting widgets with global listeners return their hub here.
    fn event_hub(&self) -> Option<&EventHub> {
        None
    }
}

/// Side effects requested by `init` or `update`.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Quit the application.
    Quit,
    /// Run each command in order; stops early after a quit.
    Batch(Vec<Cmd<M>>),
    /// Same as `Batch`; kept distinct for command logs.
    Sequence(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Deliver `Event::Tick` at this interval.
    Tick(Duration),
    /// Record a log line. The alternate screen owns stdout, so this goes to
    /// the tracing subscriber.
    Log(String),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Sequence(cmds) => f.debug_tuple("Sequence").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Tick(d) => f.debug_tuple("Tick").field(d).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a quit command.
    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a tick command.
    #[inline]
    pub fn tick(duration: Duration) -> Self {
        Self::Tick(duration)
    }

    /// Create a batch of commands.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds = cmds;
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Self::Batch(cmds),
        }
    }

    /// Create a sequence of commands.
    pub fn sequence(cmds: Vec<Self>) -> Self {
        let mut cmds = cmds;
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Self::Sequence(cmds),
        }
    }

    /// Return a stable name for tracing.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Sequence(_) => "Sequence",
            Self::Msg(_) => "Msg",
            Self::Tick(_) => "Tick",
            Self::Log(_) => "Log",
        }
    }
}

/// Terminal program configuration.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    pub alternate_screen: bool,
    pub mouse: bool,
    /// Quit automatically after this long.
    pub exit_after: Option<Duration>,
    /// Upper bound on how long to block waiting for input.
    pub poll_interval: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            mouse: true,
            exit_after: None,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Drives a [`Model`] against the real terminal.
pub struct Program<M: Model> {
    model: M,
    config: ProgramConfig,
    running: bool,
    tick_rate: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl<M: Model> Program<M> {
    pub fn new(model: M, config: ProgramConfig) -> Self {
        Self {
            model,
            config,
            running: true,
            tick_rate: None,
            last_tick: Instant::now(),
            dirty: true,
        }
    }

    /// Run until the model quits or `exit_after` elapses. Returns the model.
    pub fn run(mut self) -> Result<M> {
        let session = TerminalSession::new(SessionOptions {
            alternate_screen: self.config.alternate_screen,
            mouse_capture: self.config.mouse,
            ..Default::default()
        })?;
        let mut presenter = Presenter::new(io::stdout());
        let (mut width, mut height) = session.size()?;
        if width == 0 || height == 0 {
            return Err(Error::Terminal(format!(
                "terminal reports zero size ({width}x{height})"
            )));
        }
        info!(width, height, "program started");

        let started = Instant::now();
        let cmd = self.model.init();
        self.execute_cmd(cmd);

        while self.running {
            if let Some(limit) = self.config.exit_after
                && started.elapsed() >= limit
            {
                info!(?limit, "exit-after deadline reached");
                break;
            }

            if self.dirty {
                self.render(&mut presenter, width, height)?;
                self.dirty = false;
            }

            let timeout = self.poll_timeout();
            if session.poll_event(timeout)? {
                let Some(event) = session.read_event()? else {
                    continue;
                };
                if let Event::Resize {
                    width: w,
                    height: h,
                } = event
                {
                    if w == 0 || h == 0 {
                        continue;
                    }
                    width = w;
                    height = h;
                    presenter.invalidate();
                }
                self.handle_event(event);
            }

            if let Some(rate) = self.tick_rate
                && self.last_tick.elapsed() >= rate
            {
                self.last_tick = Instant::now();
                self.handle_event(Event::Tick);
            }
        }

        drop(session);
        info!("program stopped");
        Ok(self.model)
    }

    fn poll_timeout(&self) -> Duration {
        let mut timeout = self.config.poll_interval;
        if let Some(rate) = self.tick_rate {
            timeout = timeout.min(rate.saturating_sub(self.last_tick.elapsed()));
        }
        timeout
    }

    fn handle_event(&mut self, event: Event) {
        let _span = debug_span!("event", kind = event_kind(&event)).entered();
        if let Some(hub) = self.model.event_hub() {
            let invoked = hub.dispatch(&event);
            if invoked > 0 {
                debug!(invoked, "global listeners notified");
            }
        }
        let cmd = self.model.update(M::Message::from(event));
        self.execute_cmd(cmd);
        self.dirty = true;
    }

    fn render(&self, presenter: &mut Presenter<Stdout>, width: u16, height: u16) -> Result<()> {
        let _span = info_span!("view", width, height).entered();
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        presenter.present(&frame)?;
        Ok(())
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => {
                debug!("quit requested");
                self.running = false;
            }
            Cmd::Msg(m) => {
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Tick(rate) => {
                self.tick_rate = Some(rate);
                self.last_tick = Instant::now();
            }
            Cmd::Log(text) => info!(target: "selectui::app", "{text}"),
        }
    }
}

/// Short label for an event, used in spans.
pub(crate) fn event_kind(event: &Event) -> &'static str {
    match event {
        Event::Key(_) => "key",
        Event::Mouse(_) => "mouse",
        Event::Resize { .. } => "resize",
        Event::Focus(_) => "focus",
        Event::Tick => "tick",
    }
}
