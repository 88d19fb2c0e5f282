use serde::Serialize;

use crate::spatial::playfield::{Color, LiveCell, StepStats};

use super::WorldCore;

/// Consumer of plot and clear commands.
///
/// Called synchronously from `execute`. The snapshot borrows engine-owned
/// buffers and is only valid for the duration of the call.
pub trait Renderer {
    fn plot_the_updates(&mut self, snapshot: &GridSnapshot<'_>);
    fn clear(&mut self);
}

/// Read-only view of the engine state for rendering and debugging.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot<'a> {
    /// Dense row-major colours, `width * height`.
    pub grid: &'a [Color],
    pub index: &'a [LiveCell],
    /// Changes since the last plot.
    pub updates: &'a [LiveCell],
    pub width: u32,
    pub height: u32,
    /// ABGR colour of palette entry `i + 1`.
    pub colors: &'a [u32],
    #[serde(flatten)]
    pub stats: StepStats,
    pub queue_depth: usize,
    pub generation: u64,
}

pub(super) fn snapshot(world: &WorldCore) -> GridSnapshot<'_> {
    let (grid, index, updates, width, height) = match world.playfield.as_ref() {
        Some(f) => (f.cells(), f.index(), f.updates(), f.width(), f.height()),
        None => (&[] as &[Color], &[] as &[LiveCell], &[] as &[LiveCell], 0, 0),
    };
    GridSnapshot {
        grid,
        index,
        updates,
        width,
        height,
        colors: &world.colors,
        stats: world.stats,
        queue_depth: world.queue.depth(),
        generation: world.generation,
    }
}
