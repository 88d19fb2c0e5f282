//! Instruction queue
//!
//! A fixed-size word buffer holding variable-length encoded commands. The
//! occupied region is `[head, latest)`: `latest` is the write cursor,
//! `head` the read cursor that `execute` advances. Memory is only reclaimed
//! by compaction, which moves the surviving spans to the front.
//!
//! Every span is a header word (see [`opcode`]) followed by exactly as many
//! argument words as the header declares.

mod compact;
pub mod opcode;

pub use compact::{CompactionPlan, CompactionReport};
pub use opcode::{decode, encode, Header, Opcode};

use crate::domain::error::EngineError;

pub type Word = u32;

/// A decoded command with its inline arguments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Instruction {
    GridResize { width: u32, height: u32 },
    PlotUpdates,
    ClearCanvas,
    /// Canonical percent in `[0, 100]`.
    Seed { percent: f32 },
    NextTick,
    Skip { len: u8 },
}

pub struct InstructionQueue {
    words: Vec<Word>,
    head: usize,
    latest: usize,
    dropped: u32,
}

impl InstructionQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity],
            head: 0,
            latest: 0,
            dropped: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// Write cursor: one past the last occupied word.
    #[inline]
    pub fn latest_instruction(&self) -> usize {
        self.latest
    }

    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Words still waiting to be executed (including skipped spans).
    #[inline]
    pub fn depth(&self) -> usize {
        self.latest - self.head
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.latest
    }

    /// Requests refused because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Raw view of the whole buffer, occupied or not.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Append `opcode` with raw argument words.
    ///
    /// Returns `Ok(false)` when the command does not fit even after
    /// compaction; the queue is then left untouched.
    pub fn enqueue(&mut self, opcode: Opcode, args: &[Word]) -> Result<bool, EngineError> {
        let Some(expected) = opcode.arity() else {
            return Err(EngineError::InvalidOpcode {
                code: opcode.code(),
                offset: self.latest,
            });
        };
        if args.len() != expected {
            return Err(EngineError::InvalidArgumentCount {
                opcode,
                expected,
                got: args.len(),
            });
        }

        let need = 1 + args.len();
        if self.capacity() - self.latest < need {
            let plan = self.plan_compaction()?;
            if self.capacity() - plan.live_words() < need {
                self.dropped = self.dropped.saturating_add(1);
                tracing::warn!(?opcode, depth = self.depth(), "instruction queue full, request dropped");
                return Ok(false);
            }
            self.apply_compaction(plan);
        }

        self.words[self.latest] = encode(opcode, args.len() as u8) as Word;
        self.words[self.latest + 1..self.latest + need].copy_from_slice(args);
        self.latest += need;
        Ok(true)
    }

    /// Append a typed command.
    pub fn push(&mut self, instruction: Instruction) -> Result<bool, EngineError> {
        match instruction {
            Instruction::GridResize { width, height } => {
                self.enqueue(Opcode::GridResize, &[width, height])
            }
            Instruction::Seed { percent } => self.enqueue(Opcode::Seed, &[percent.to_bits()]),
            Instruction::PlotUpdates => self.enqueue(Opcode::PlotUpdates, &[]),
            Instruction::ClearCanvas => self.enqueue(Opcode::ClearCanvas, &[]),
            Instruction::NextTick => self.enqueue(Opcode::NextTick, &[]),
            Instruction::Skip { .. } => self.enqueue(Opcode::Skip, &[]),
        }
    }

    /// Header at `pos`, checked against the occupied region.
    pub fn header_at(&self, pos: usize) -> Result<Header, EngineError> {
        if pos >= self.latest {
            return Err(EngineError::TruncatedInstruction { offset: pos });
        }
        let header = decode(self.words[pos] as u16);
        if pos + header.span() > self.latest {
            return Err(EngineError::TruncatedInstruction { offset: pos });
        }
        Ok(header)
    }

    /// Decode the command at `pos`. Returns it with its span in words.
    pub fn instruction_at(&self, pos: usize) -> Result<(Instruction, usize), EngineError> {
        let header = self.header_at(pos)?;
        let opcode = header.opcode(pos)?;
        if let Some(expected) = opcode.arity() {
            if header.len as usize != expected {
                return Err(EngineError::InvalidArgumentCount {
                    opcode,
                    expected,
                    got: header.len as usize,
                });
            }
        }

        let args = &self.words[pos + 1..pos + header.span()];
        let instruction = match opcode {
            Opcode::GridResize => Instruction::GridResize {
                width: args[0],
                height: args[1],
            },
            Opcode::Seed => Instruction::Seed {
                percent: f32::from_bits(args[0]),
            },
            Opcode::PlotUpdates => Instruction::PlotUpdates,
            Opcode::ClearCanvas => Instruction::ClearCanvas,
            Opcode::NextTick => Instruction::NextTick,
            Opcode::Skip => Instruction::Skip { len: header.len },
        };
        Ok((instruction, header.span()))
    }

    /// Turn the span at `pos` into a `Skip` of the same length.
    pub fn mark_skip(&mut self, pos: usize) -> Result<(), EngineError> {
        let header = self.header_at(pos)?;
        self.words[pos] = encode(Opcode::Skip, header.len) as Word;
        Ok(())
    }

    /// Move the read cursor past processed commands.
    pub(crate) fn advance_head(&mut self, to: usize) {
        debug_assert!(to <= self.latest);
        self.head = to.min(self.latest);
        if self.head == self.latest {
            self.head = 0;
            self.latest = 0;
        }
    }

    /// Forget every pending command.
    pub fn clear(&mut self) {
        self.head = 0;
        self.latest = 0;
    }

    #[cfg(test)]
    pub(crate) fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_rejects_wrong_argument_count() {
        let mut queue = InstructionQueue::new(16);
        let err = queue.enqueue(Opcode::GridResize, &[4]).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidArgumentCount {
                opcode: Opcode::GridResize,
                expected: 2,
                got: 1
            }
        );
        assert_eq!(queue.latest_instruction(), 0);
    }

    #[test]
    fn enqueue_rejects_raw_skip() {
        let mut queue = InstructionQueue::new(16);
        assert!(matches!(
            queue.enqueue(Opcode::Skip, &[]),
            Err(EngineError::InvalidOpcode { .. })
        ));
    }

    #[test]
    fn push_then_decode() {
        let mut queue = InstructionQueue::new(16);
        assert_eq!(queue.push(Instruction::GridResize { width: 7, height: 9 }), Ok(true));
        assert_eq!(queue.push(Instruction::Seed { percent: 12.5 }), Ok(true));
        assert_eq!(queue.push(Instruction::NextTick), Ok(true));
        assert_eq!(queue.latest_instruction(), 3 + 2 + 1);

        let (first, span) = queue.instruction_at(0).unwrap();
        assert_eq!(first, Instruction::GridResize { width: 7, height: 9 });
        assert_eq!(span, 3);
        let (second, span) = queue.instruction_at(3).unwrap();
        assert_eq!(second, Instruction::Seed { percent: 12.5 });
        assert_eq!(span, 2);
        assert_eq!(queue.instruction_at(5).unwrap().0, Instruction::NextTick);
    }

    #[test]
    fn full_queue_of_ticks_refuses_and_stays_unchanged() {
        let mut queue = InstructionQueue::new(4);
        for _ in 0..4 {
            assert_eq!(queue.push(Instruction::NextTick), Ok(true));
        }
        let before = queue.words().to_vec();

        assert_eq!(queue.push(Instruction::NextTick), Ok(false));
        assert_eq!(queue.push(Instruction::PlotUpdates), Ok(false));
        assert_eq!(queue.words(), &before[..]);
        assert_eq!(queue.latest_instruction(), 4);
        assert_eq!(queue.dropped(), 2);
    }

    #[test]
    fn full_queue_compacts_to_make_room() {
        let mut queue = InstructionQueue::new(6);
        assert_eq!(queue.push(Instruction::GridResize { width: 1, height: 1 }), Ok(true));
        assert_eq!(queue.push(Instruction::GridResize { width: 2, height: 2 }), Ok(true));

        assert_eq!(queue.push(Instruction::NextTick), Ok(true));
        assert!(queue.latest_instruction() <= queue.capacity());
        assert_eq!(
            queue.instruction_at(0).unwrap().0,
            Instruction::GridResize { width: 2, height: 2 }
        );
        assert_eq!(queue.instruction_at(3).unwrap().0, Instruction::NextTick);
        assert_eq!(queue.latest_instruction(), 4);
    }

    #[test]
    fn mark_skip_keeps_the_span() {
        let mut queue = InstructionQueue::new(8);
        queue.push(Instruction::GridResize { width: 3, height: 3 }).unwrap();
        queue.push(Instruction::NextTick).unwrap();
        queue.mark_skip(0).unwrap();
        assert_eq!(queue.instruction_at(0).unwrap(), (Instruction::Skip { len: 2 }, 3));
        assert_eq!(queue.instruction_at(3).unwrap().0, Instruction::NextTick);
    }

    #[test]
    fn header_past_the_cursor_is_truncated() {
        let mut queue = InstructionQueue::new(8);
        queue.push(Instruction::NextTick).unwrap();
        queue.words_mut()[0] = encode(Opcode::GridResize, 2) as Word;
        assert_eq!(
            queue.instruction_at(0),
            Err(EngineError::TruncatedInstruction { offset: 0 })
        );
    }

    #[test]
    fn draining_the_head_resets_cursors() {
        let mut queue = InstructionQueue::new(8);
        queue.push(Instruction::NextTick).unwrap();
        queue.push(Instruction::PlotUpdates).unwrap();
        queue.advance_head(1);
        assert_eq!(queue.depth(), 1);
        queue.advance_head(2);
        assert!(queue.is_empty());
        assert_eq!(queue.latest_instruction(), 0);
    }
}
