//! Opcode codec
//!
//! A queue header packs the opcode's character code into the high byte and
//! the argument count into the low byte of a 16-bit value:
//!
//! ```text
//!  15        8 7         0
//! +-----------+-----------+
//! |  opcode   |  arg count |
//! +-----------+-----------+
//! ```

use crate::domain::error::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    GridResize = b'G',
    PlotUpdates = b'P',
    ClearCanvas = b'C',
    Seed = b'S',
    NextTick = b'T',
    /// Dead span. Its argument count is the length of the span it replaced.
    Skip = b'X',
}

impl Opcode {
    pub const ALL: [Opcode; 6] = [
        Opcode::GridResize,
        Opcode::PlotUpdates,
        Opcode::ClearCanvas,
        Opcode::Seed,
        Opcode::NextTick,
        Opcode::Skip,
    ];

    /// Fixed argument count, `None` for `Skip`.
    pub const fn arity(self) -> Option<usize> {
        match self {
            Opcode::GridResize => Some(2),
            Opcode::Seed => Some(1),
            Opcode::PlotUpdates | Opcode::ClearCanvas | Opcode::NextTick => Some(0),
            Opcode::Skip => None,
        }
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Opcode> {
        match code {
            b'G' => Some(Opcode::GridResize),
            b'P' => Some(Opcode::PlotUpdates),
            b'C' => Some(Opcode::ClearCanvas),
            b'S' => Some(Opcode::Seed),
            b'T' => Some(Opcode::NextTick),
            b'X' => Some(Opcode::Skip),
            _ => None,
        }
    }
}

/// Decoded header word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub code: u8,
    pub len: u8,
}

impl Header {
    /// Resolve the opcode, `offset` is only used for the error report.
    pub fn opcode(self, offset: usize) -> Result<Opcode, EngineError> {
        Opcode::from_code(self.code).ok_or(EngineError::InvalidOpcode {
            code: self.code,
            offset,
        })
    }

    /// Words taken by the header plus its arguments.
    #[inline]
    pub fn span(self) -> usize {
        1 + self.len as usize
    }
}

#[inline]
pub fn encode(opcode: Opcode, arg_count: u8) -> u16 {
    ((opcode.code() as u16) << 8) | arg_count as u16
}

#[inline]
pub fn decode(word: u16) -> Header {
    Header {
        code: (word >> 8) as u8,
        len: (word & 0xFF) as u8,
    }
}
