#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! A [`TerminalSession`] enters raw mode, switches on the requested
//! [`Mode`]s and remembers them. Dropping the session (including during
//! unwinding) switches them off in reverse order and leaves raw mode last.
//! A panic hook and, on unix, a SIGINT/SIGTERM watcher restore the terminal
//! on the paths where `Drop` never runs.
//!
//! ```no_run
//! use selectui_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions {
//!     alternate_screen: true,
//!     mouse_capture: true,
//!     ..Default::default()
//! })?;
//! // ... run the UI ...
//! drop(session);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};
use std::sync::Once;
use std::time::Duration;

use crossterm::{cursor, event as ct, execute, terminal};

use crate::event::Event;

/// What to switch on for the lifetime of a session. Everything is off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub alternate_screen: bool,
    /// Press, release, drag and wheel reporting.
    pub mouse_capture: bool,
    pub focus_events: bool,
}

impl SessionOptions {
    /// Modes to enable, in enable order.
    fn modes(&self) -> Vec<Mode> {
        [
            (self.alternate_screen, Mode::AlternateScreen),
            (self.mouse_capture, Mode::MouseCapture),
            (self.focus_events, Mode::FocusChange),
        ]
        .into_iter()
        .filter_map(|(on, mode)| on.then_some(mode))
        .collect()
    }
}

/// A terminal mode toggled by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    AlternateScreen,
    MouseCapture,
    FocusChange,
}

impl Mode {
    /// Every mode, in the order `best_effort_restore` disables them.
    const ALL: [Mode; 3] = [Mode::FocusChange, Mode::MouseCapture, Mode::AlternateScreen];

    fn enable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Mode::AlternateScreen => execute!(out, terminal::EnterAlternateScreen),
            Mode::MouseCapture => execute!(out, ct::EnableMouseCapture),
            Mode::FocusChange => execute!(out, ct::EnableFocusChange),
        }
    }

    fn disable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Mode::AlternateScreen => execute!(out, terminal::LeaveAlternateScreen),
            Mode::MouseCapture => execute!(out, ct::DisableMouseCapture),
            Mode::FocusChange => execute!(out, ct::DisableFocusChange),
        }
    }
}

/// Owns raw mode and the enabled [`Mode`]s. Only one should exist at a time.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    /// Modes switched on so far, in enable order.
    active: Vec<Mode>,
    #[cfg(unix)]
    _signals: SignalGuard,
}

impl TerminalSession {
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();
        #[cfg(unix)]
        let signals = SignalGuard::new()?;
        terminal::enable_raw_mode()?;

        // From here on, Drop restores whatever was switched on.
        let mut session = Self {
            options,
            active: Vec::new(),
            #[cfg(unix)]
            _signals: signals,
        };
        let mut stdout = io::stdout();
        for mode in session.options.modes() {
            mode.enable(&mut stdout)?;
            session.active.push(mode);
        }
        execute!(stdout, cursor::Hide)?;
        crate::debug!(modes = ?session.active, "terminal session started");
        Ok(session)
    }

    /// Terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Wait up to `timeout` for input.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        ct::poll(timeout)
    }

    /// Read one event. `Ok(None)` means it had no [`Event`] counterpart.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        Ok(Event::from_crossterm(ct::read()?))
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn active_modes(&self) -> &[Mode] {
        &self.active
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        while let Some(mode) = self.active.pop() {
            let _ = mode.disable(&mut stdout);
        }
        let _ = execute!(stdout, cursor::Show);
        // Raw mode last so the sequences above are not echoed.
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
        crate::debug!("terminal session restored");
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_restore();
            previous(info);
        }));
    });
}

/// Disable every mode regardless of what was enabled.
fn best_effort_restore() {
    let mut stdout = io::stdout();
    for mode in Mode::ALL {
        let _ = mode.disable(&mut stdout);
    }
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// Restores the terminal and exits on SIGINT/SIGTERM.
#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        use signal_hook::consts::signal::{SIGINT, SIGTERM};

        let mut signals =
            signal_hook::iterator::Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            if let Some(signal) = signals.forever().next() {
                crate::warn!(signal, "termination signal, restoring terminal");
                best_effort_restore();
                std::process::exit(128 + signal);
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
