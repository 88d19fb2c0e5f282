use thiserror::Error;

use crate::queue::Opcode;

/// Everything the engine can fail with.
///
/// A full instruction queue is deliberately missing: it is an expected
/// condition and is reported as a `false` return from the request methods.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid opcode {code:#04x} at queue offset {offset}")]
    InvalidOpcode { code: u8, offset: usize },

    #[error("instruction at queue offset {offset} runs past the occupied region")]
    TruncatedInstruction { offset: usize },

    #[error("{opcode:?} takes {expected} argument(s), got {got}")]
    InvalidArgumentCount {
        opcode: Opcode,
        expected: usize,
        got: usize,
    },

    #[error("seed percent {0} is outside [0, 100]")]
    InvalidPercent(f64),

    #[error("colour draw {draw} fell outside the palette distribution")]
    ColorSamplingExhausted { draw: f64 },

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}
