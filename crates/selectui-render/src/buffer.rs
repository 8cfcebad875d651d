#![forbid(unsafe_code)]

//! Off-screen cell grid that widgets draw into.
//!
//! Row-major storage with a fixed size. Writes are clipped to the top of a
//! scissor stack, which is how the dropdown keeps rows inside its menu.
//! A wide glyph is stored as its head cell followed by continuation cells;
//! overwriting any part of one blanks the rest.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`, and the size never changes
//! 2. The scissor stack is never empty; its base is the full bounds and each
//!    pushed rect is intersected with the one below

use crate::cell::Cell;
use selectui_core::geometry::Rect;

/// Grid of [`Cell`]s.
///
/// ```
/// use selectui_render::buffer::Buffer;
/// use selectui_render::cell::Cell;
///
/// let mut buffer = Buffer::new(80, 24);
/// buffer.set(0, 0, Cell::from_char('H'));
/// assert_eq!(buffer.get(0, 0).and_then(|c| c.content.as_char()), Some('H'));
/// ```
#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    scissor_stack: Vec<Rect>,
}

impl Buffer {
    /// Blank `width x height` buffer.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0, "buffer width must be > 0");
        assert!(height > 0, "buffer height must be > 0");

        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
            scissor_stack: vec![Rect::from_size(width, height)],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Cell at (x, y), or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Set the cell at (x, y).
    ///
    /// Writes outside the bounds or the current scissor are dropped. Wide
    /// characters are written atomically: the head plus continuation cells
    /// all land, or nothing does.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = cell.content.width().max(1);
        let scissor = self.current_scissor();
        for i in 0..width {
            let Some(cx) = x.checked_add(i as u16) else {
                return;
            };
            if self.index(cx, y).is_none() || !scissor.contains(cx, y) {
                return;
            }
        }

        for i in 0..width {
            self.clear_wide_overlap(x + i as u16, y);
        }
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
        for i in 1..width {
            if let Some(idx) = self.index(x + i as u16, y) {
                self.cells[idx] = Cell::CONTINUATION;
            }
        }
    }

    /// Overwriting part of a wide character blanks the rest of it.
    fn clear_wide_overlap(&mut self, x: u16, y: u16) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let existing = self.cells[idx];

        if existing.is_continuation() {
            // Walk back to the head and blank it along with its tail.
            let mut hx = x;
            while hx > 0 {
                hx -= 1;
                let Some(h) = self.index(hx, y) else { break };
                if !self.cells[h].is_continuation() {
                    let w = self.cells[h].content.width();
                    if hx as usize + w > x as usize {
                        self.blank_run(hx, y, w);
                    }
                    break;
                }
            }
        } else if existing.content.width() > 1 {
            self.blank_run(x, y, existing.content.width());
        }
    }

    fn blank_run(&mut self, x: u16, y: u16, width: usize) {
        for i in 0..width {
            if let Some(idx) = x.checked_add(i as u16).and_then(|cx| self.index(cx, y)) {
                self.cells[idx] = Cell::default();
            }
        }
    }

    /// Fill a rectangular region with the given cell, clipped to the scissor.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = self.current_scissor().intersection(&rect);
        if clipped.is_empty() {
            return;
        }
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to the default.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Raw access to the cell slice, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cells of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    // ========== Scissor Stack ==========

    /// Push a clipping region. The effective scissor is the intersection of
    /// everything pushed so far.
    pub fn push_scissor(&mut self, rect: Rect) {
        let intersected = self.current_scissor().intersection(&rect);
        self.scissor_stack.push(intersected);
    }

    /// Pop a clipping region. The base scissor is never removed.
    pub fn pop_scissor(&mut self) {
        if self.scissor_stack.len() > 1 {
            self.scissor_stack.pop();
        }
    }

    #[inline]
    pub fn current_scissor(&self) -> Rect {
        self.scissor_stack
            .last()
            .copied()
            .unwrap_or_else(|| self.bounds())
    }

    #[inline]
    pub fn scissor_depth(&self) -> usize {
        self.scissor_stack.len()
    }

    /// Cell-for-cell equality, ignoring scissor state.
    pub fn content_eq(&self, other: &Buffer) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.content_eq(other)
    }
}

impl Eq for Buffer {}
