use super::{scan_live_cells, Playfield};

impl Playfield {
    /// Build a `width x height` field from `previous`, keeping the overlap
    /// `[0, min(w)) x [0, min(h))` and dropping everything outside it.
    ///
    /// Without a previous field the index comes from a full rescan of the
    /// new buffer; otherwise the old index and change list are filtered.
    pub fn resized(previous: Option<&Playfield>, width: u32, height: u32) -> Playfield {
        let mut next = Playfield::new(width, height);

        let Some(old) = previous else {
            next.index = scan_live_cells(&next.cells, width);
            return next;
        };

        let keep_w = old.width.min(width) as usize;
        let keep_h = old.height.min(height) as usize;
        let old_w = old.width as usize;
        let new_w = width as usize;
        for y in 0..keep_h {
            let src = y * old_w;
            let dst = y * new_w;
            next.cells[dst..dst + keep_w].copy_from_slice(&old.cells[src..src + keep_w]);
        }

        let inside = |x: u32, y: u32| x < width && y < height;
        next.index = old
            .index
            .iter()
            .copied()
            .filter(|c| inside(c.x, c.y))
            .collect();
        next.updates = old
            .updates
            .iter()
            .copied()
            .filter(|c| inside(c.x, c.y))
            .collect();

        debug_assert!(next.is_consistent(), "resize left index and grid out of sync");
        next
    }
}
