//! One Game of Life generation (B3/S23) on a torus, driven by the sparse
//! index rather than a full-grid scan.
//!
//! Pass 1 walks the live cells. Each one counts its live neighbours for the
//! survival rule, and every dead neighbour gets its birth rule evaluated the
//! first time any live cell reaches it (`status` remembers the result, so a
//! shared neighbour is checked once, not up to eight times). Dying cells are
//! only marked in the index; the dense buffer is not written during pass 1,
//! so every count sees the previous generation.
//!
//! Pass 2 applies the marks: deaths clear their cell, survivors carry over,
//! and visited cells either become births or reset to untouched.

use rand::Rng;

use crate::domain::error::EngineError;
use crate::systems::color::ColorPicker;

use super::{CellStatus, LiveCell, Playfield, StepStats, DEAD};

/// The eight wrapped neighbours of `(x, y)`.
#[inline]
fn neighbours(x: u32, y: u32, width: u32, height: u32) -> [(u32, u32); 8] {
    let xm = if x == 0 { width - 1 } else { x - 1 };
    let xp = if x + 1 == width { 0 } else { x + 1 };
    let ym = if y == 0 { height - 1 } else { y - 1 };
    let yp = if y + 1 == height { 0 } else { y + 1 };
    [
        (xm, ym),
        (x, ym),
        (xp, ym),
        (xm, y),
        (xp, y),
        (xm, yp),
        (x, yp),
        (xp, yp),
    ]
}

impl Playfield {
    fn live_neighbours(&self, x: u32, y: u32) -> u32 {
        let mut live = 0;
        for (nx, ny) in neighbours(x, y, self.width, self.height) {
            if *fast!(self.cells, [self.offset(nx, ny)]) != DEAD {
                live += 1;
            }
        }
        live
    }

    /// Advance one generation. Births draw their colour from `picker`.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        picker: &ColorPicker,
        rng: &mut R,
    ) -> Result<StepStats, EngineError> {
        let mut stats = StepStats::default();
        self.touched.clear();

        // Pass 1: survival counts, birth checks, death marks.
        for i in 0..self.index.len() {
            let cell = self.index[i];
            debug_assert!(
                !cell.is_dead() && self.cells[self.offset(cell.x, cell.y)] as u32 == cell.color,
                "index entry {:?} does not match the grid",
                cell
            );

            let mut live = 0;
            for (nx, ny) in neighbours(cell.x, cell.y, self.width, self.height) {
                let ni = self.offset(nx, ny);
                if *fast!(self.cells, [ni]) != DEAD {
                    live += 1;
                    continue;
                }
                if *fast!(self.status, [ni]) == CellStatus::Untouched {
                    let status = if self.live_neighbours(nx, ny) == 3 {
                        CellStatus::PendingBirth
                    } else {
                        CellStatus::Visited
                    };
                    fast!(self.status, [ni] = status);
                    self.touched.push(ni);
                    stats.checked += 1;
                }
            }

            if live == 2 || live == 3 {
                stats.survive += 1;
            } else {
                self.index[i].color = DEAD as u32;
                stats.died += 1;
            }
        }

        // Pass 2: apply deaths, carry survivors, resolve births.
        self.next_index.clear();
        self.next_index.reserve(self.index.len());
        for i in 0..self.index.len() {
            let cell = self.index[i];
            if cell.is_dead() {
                let at = self.offset(cell.x, cell.y);
                fast!(self.cells, [at] = DEAD);
                self.updates.push(cell);
            } else {
                self.next_index.push(cell);
            }
        }

        let width = self.width as usize;
        for t in 0..self.touched.len() {
            let ni = self.touched[t];
            let status = *fast!(self.status, [ni]);
            fast!(self.status, [ni] = CellStatus::Untouched);
            if status != CellStatus::PendingBirth {
                continue;
            }
            let color = picker.sample(rng)?;
            fast!(self.cells, [ni] = color);
            let born = LiveCell::new(color, (ni % width) as u32, (ni / width) as u32);
            self.next_index.push(born);
            self.updates.push(born);
            stats.birth += 1;
        }

        std::mem::swap(&mut self.index, &mut self.next_index);
        Ok(stats)
    }
}
