#![forbid(unsafe_code)]

//! Frame: the render target handed to `Model::view`.

use crate::buffer::Buffer;
use selectui_core::geometry::Rect;

/// A buffer plus the cursor request for this frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub buffer: Buffer,
    /// Where to place the terminal cursor after presenting. `None` hides it.
    pub cursor_position: Option<(u16, u16)>,
}

impl Frame {
    /// Create a blank frame.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        Self::from_buffer(Buffer::new(width, height))
    }

    pub fn from_buffer(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor_position: None,
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// The full frame area.
    #[inline]
    pub fn area(&self) -> Rect {
        self.buffer.bounds()
    }

    pub fn set_cursor(&mut self, position: Option<(u16, u16)>) {
        self.cursor_position = position;
    }

    /// Reset cells and cursor, keeping the allocation.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor_position = None;
    }

    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }
}
