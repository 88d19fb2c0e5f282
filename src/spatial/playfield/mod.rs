//! Playfield - dense colour buffer plus a sparse index of live cells
//!
//! The dense buffer answers "what is at (x, y)" in O(1); the index lists
//! every live cell so a generation only has to look at live cells and their
//! neighbours instead of the whole grid.
//!
//! Invariant (outside of a step): every index entry points at a dense cell
//! holding the same colour, and every non-zero dense cell has exactly one
//! index entry.

use serde::Serialize;

mod resize;
mod scan;
mod seed;
mod step;

pub use seed::{expected_fill, normalize_percent, FILL_TABLE};
pub(crate) use scan::scan_live_cells;

/// Palette index of a cell. `0` is dead, `1..=K` alive.
pub type Color = u8;
pub const DEAD: Color = 0;

/// One `(color, x, y)` triple. `repr(C)` so a slice of these can be handed
/// to JS as a flat `u32` array.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct LiveCell {
    pub color: u32,
    pub x: u32,
    pub y: u32,
}

impl LiveCell {
    #[inline]
    pub fn new(color: Color, x: u32, y: u32) -> Self {
        Self {
            color: color as u32,
            x,
            y,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.color == DEAD as u32
    }
}

/// View a triple slice as flat `u32` words (`3 * len`).
pub fn as_words(cells: &[LiveCell]) -> &[u32] {
    // SAFETY: LiveCell is repr(C) with three u32 fields and no padding.
    unsafe { std::slice::from_raw_parts(cells.as_ptr() as *const u32, cells.len() * 3) }
}

/// Transient per-cell state used while a generation is being computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum CellStatus {
    #[default]
    Untouched,
    /// Dead cell whose birth rule has been evaluated and failed.
    Visited,
    /// Dead cell with exactly three live neighbours.
    PendingBirth,
}

/// Counters from the last generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StepStats {
    pub survive: u32,
    pub died: u32,
    pub birth: u32,
    /// Distinct dead cells whose birth rule was evaluated.
    pub checked: u32,
}

pub struct Playfield {
    width: u32,
    height: u32,
    cells: Vec<Color>,
    status: Vec<CellStatus>,
    index: Vec<LiveCell>,
    updates: Vec<LiveCell>,

    // Step scratch, kept to avoid per-frame allocations
    touched: Vec<usize>,
    next_index: Vec<LiveCell>,
}

impl Playfield {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![DEAD; size],
            status: vec![CellStatus::Untouched; size],
            index: Vec::new(),
            updates: Vec::new(),
            touched: Vec::new(),
            next_index: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Dense row-major buffer.
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    pub fn index(&self) -> &[LiveCell] {
        &self.index
    }

    /// Changes since the last plot. `color == 0` is a death.
    pub fn updates(&self) -> &[LiveCell] {
        &self.updates
    }

    pub fn population(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[self.offset(x, y)])
    }

    /// Write one cell, keeping index and change list in sync.
    /// Returns `false` when out of bounds or nothing changed.
    pub fn set_cell(&mut self, x: u32, y: u32, color: Color) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.offset(x, y);
        let old = self.cells[i];
        if old == color {
            return false;
        }
        self.cells[i] = color;

        if old == DEAD {
            self.index.push(LiveCell::new(color, x, y));
        } else if let Some(pos) = self.index.iter().position(|c| c.x == x && c.y == y) {
            if color == DEAD {
                self.index.swap_remove(pos);
            } else {
                self.index[pos].color = color as u32;
            }
        }
        self.updates.push(LiveCell::new(color, x, y));
        true
    }

    /// Kill every cell. Returns how many were alive.
    pub fn clear(&mut self) -> usize {
        let removed = self.index.len();
        self.cells.fill(DEAD);
        self.index.clear();
        self.updates.clear();
        removed
    }

    /// Drop the change list once a renderer has consumed it.
    pub fn clear_updates(&mut self) {
        self.updates.clear();
    }

    /// Full check of the index against the dense buffer.
    pub fn is_consistent(&self) -> bool {
        if self.index.iter().any(|c| {
            c.is_dead()
                || c.x >= self.width
                || c.y >= self.height
                || self.cells[self.offset(c.x, c.y)] as u32 != c.color
        }) {
            return false;
        }
        let mut expected = scan_live_cells(&self.cells, self.width);
        let mut actual = self.index.clone();
        expected.sort_unstable_by_key(|c| (c.y, c.x));
        actual.sort_unstable_by_key(|c| (c.y, c.x));
        expected == actual
    }
}
