use super::{Color, LiveCell, DEAD};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn row_cells(y: usize, row: &[Color]) -> impl Iterator<Item = LiveCell> + '_ {
    row.iter()
        .enumerate()
        .filter_map(move |(x, &c)| (c != DEAD).then(|| LiveCell::new(c, x as u32, y as u32)))
}

/// Build a sparse index by scanning the dense buffer, rows in order.
/// Rows are scanned in parallel with Rayon when the feature is enabled.
pub(crate) fn scan_live_cells(cells: &[Color], width: u32) -> Vec<LiveCell> {
    let width = width as usize;
    if width == 0 {
        return Vec::new();
    }

    #[cfg(feature = "parallel")]
    {
        cells
            .par_chunks(width)
            .enumerate()
            .flat_map_iter(|(y, row)| row_cells(y, row))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        cells
            .chunks(width)
            .enumerate()
            .flat_map(|(y, row)| row_cells(y, row))
            .collect()
    }
}
