#![forbid(unsafe_code)]

//! Presenter: state-tracked terminal output via crossterm.
//!
//! The presenter keeps the last presented buffer and only emits cells that
//! changed. Style and cursor position are tracked so redundant escape
//! sequences are skipped. Output is buffered and flushed once per frame.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::buffer::Buffer;
use crate::cell::{Cell, CellContent, PackedRgba, StyleFlags};
use crate::frame::Frame;

/// Size of the internal write buffer (64KB).
const BUFFER_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: PackedRgba,
    bg: PackedRgba,
    flags: StyleFlags,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            flags: cell.flags,
        }
    }
}

/// Diffing presenter over any writer.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    /// Last presented buffer. `None` forces a full repaint.
    previous: Option<Buffer>,
    /// Current style state (None = unknown/reset).
    current_style: Option<CellStyle>,
    cursor: Option<(u16, u16)>,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            previous: None,
            current_style: None,
            cursor: None,
        }
    }

    /// Present a frame, emitting only cells that differ from the last one.
    pub fn present(&mut self, frame: &Frame) -> io::Result<()> {
        let buffer = &frame.buffer;
        let full = match &self.previous {
            Some(prev) => prev.width() != buffer.width() || prev.height() != buffer.height(),
            None => true,
        };
        if full {
            queue!(self.writer, Clear(ClearType::All))?;
            self.cursor = None;
        }

        let mut emitted = 0usize;
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                if cell.is_continuation() {
                    continue;
                }
                let unchanged = !full
                    && self
                        .previous
                        .as_ref()
                        .and_then(|prev| prev.get(x, y))
                        .is_some_and(|old| old == cell);
                if unchanged {
                    continue;
                }
                self.emit_cell(x, y, cell)?;
                emitted += 1;
            }
        }

        queue!(
            self.writer,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(Color::Reset),
            SetBackgroundColor(Color::Reset)
        )?;
        self.current_style = None;

        match frame.cursor_position {
            Some((x, y)) => {
                queue!(self.writer, MoveTo(x, y), Show)?;
                self.cursor = Some((x, y));
            }
            None => queue!(self.writer, Hide)?,
        }

        self.writer.flush()?;
        self.previous = Some(buffer.clone());

        selectui_core::trace!(cells = emitted, full, "frame presented");
        Ok(())
    }

    fn emit_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if self.cursor != Some((x, y)) {
            queue!(self.writer, MoveTo(x, y))?;
        }

        let style = CellStyle::from_cell(cell);
        if self.current_style != Some(style) {
            queue!(self.writer, SetAttribute(Attribute::Reset))?;
            for attr in attributes(style.flags) {
                queue!(self.writer, SetAttribute(attr))?;
            }
            queue!(
                self.writer,
                SetForegroundColor(to_color(style.fg)),
                SetBackgroundColor(to_color(style.bg))
            )?;
            self.current_style = Some(style);
        }

        let ch = match cell.content {
            CellContent::Char(c) => c,
            CellContent::Empty | CellContent::Continuation => ' ',
        };
        queue!(self.writer, Print(ch))?;
        let advance = cell.content.width().max(1) as u16;
        self.cursor = Some((x.saturating_add(advance), y));
        Ok(())
    }

    /// Forget the last frame so the next `present` repaints everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
        self.current_style = None;
        self.cursor = None;
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Get the inner writer (consuming the presenter).
    pub fn into_inner(self) -> io::Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

fn to_color(color: PackedRgba) -> Color {
    if color.is_transparent() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r(),
            g: color.g(),
            b: color.b(),
        }
    }
}

fn attributes(flags: StyleFlags) -> impl Iterator<Item = Attribute> {
    [
        (StyleFlags::BOLD, Attribute::Bold),
        (StyleFlags::DIM, Attribute::Dim),
        (StyleFlags::ITALIC, Attribute::Italic),
        (StyleFlags::UNDERLINE, Attribute::Underlined),
        (StyleFlags::BLINK, Attribute::SlowBlink),
        (StyleFlags::REVERSE, Attribute::Reverse),
        (StyleFlags::STRIKETHROUGH, Attribute::CrossedOut),
        (StyleFlags::HIDDEN, Attribute::Hidden),
    ]
    .into_iter()
    .filter(move |(flag, _)| flags.contains(*flag))
    .map(|(_, attr)| attr)
}
