use crate::domain::error::EngineError;
use crate::queue::Instruction;
use crate::spatial::playfield::{normalize_percent, Color};

use super::WorldCore;

fn push(world: &mut WorldCore, instruction: Instruction) -> Result<bool, EngineError> {
    world.queue.push(instruction)
}

pub(super) fn request_resize(world: &mut WorldCore, width: u32, height: u32) -> Result<bool, EngineError> {
    push(world, Instruction::GridResize { width, height })
}

pub(super) fn request_seed(world: &mut WorldCore, percent: f64) -> Result<bool, EngineError> {
    let percent = normalize_percent(percent)?;
    push(world, Instruction::Seed { percent })
}

pub(super) fn request_clear(world: &mut WorldCore) -> Result<bool, EngineError> {
    push(world, Instruction::ClearCanvas)
}

pub(super) fn request_tick(world: &mut WorldCore) -> Result<bool, EngineError> {
    push(world, Instruction::NextTick)
}

pub(super) fn request_plot(world: &mut WorldCore) -> Result<bool, EngineError> {
    push(world, Instruction::PlotUpdates)
}

pub(super) fn set_cell(world: &mut WorldCore, x: u32, y: u32, color: Color) -> bool {
    if color as usize > world.picker.len() {
        return false;
    }
    let Some(field) = world.playfield.as_mut() else {
        return false;
    };
    field.set_cell(x, y, color)
}
