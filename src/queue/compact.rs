//! Queue compaction
//!
//! Rules, each applied independently over the pending region:
//! - resize: only the most recent `GridResize` survives
//! - clear: only the most recent `ClearCanvas` survives, and every
//!   non-resize command queued before it is dropped
//! - seed: only the most recent `Seed` survives
//! - plot: only the most recent `PlotUpdates` survives
//!
//! `NextTick` is never condensed. Survivors keep their relative order and
//! are then swept to the front of the buffer.

use crate::domain::error::EngineError;

use super::{encode, InstructionQueue, Opcode, Word};

#[derive(Clone, Copy, Debug)]
struct Span {
    pos: usize,
    len: usize,
    opcode: Opcode,
}

/// Spans to drop, computed without touching the buffer.
#[derive(Debug)]
pub struct CompactionPlan {
    spans: Vec<Span>,
    dead: Vec<bool>,
    live_words: usize,
}

impl CompactionPlan {
    /// Words occupied once the plan is applied.
    pub fn live_words(&self) -> usize {
        self.live_words
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompactionReport {
    /// Occupied words before (`latest - head`).
    pub before: usize,
    pub after: usize,
    /// Commands rewritten to `Skip` by this pass.
    pub condensed: usize,
}

fn keep_last(spans: &[Span], dead: &mut [bool], opcode: Opcode) {
    let Some(last) = spans.iter().rposition(|s| s.opcode == opcode) else {
        return;
    };
    for (i, span) in spans[..last].iter().enumerate() {
        if span.opcode == opcode {
            dead[i] = true;
        }
    }
}

impl InstructionQueue {
    pub fn plan_compaction(&self) -> Result<CompactionPlan, EngineError> {
        let mut spans = Vec::new();
        let mut pos = self.head;
        while pos < self.latest {
            let header = self.header_at(pos)?;
            let opcode = header.opcode(pos)?;
            spans.push(Span {
                pos,
                len: header.span(),
                opcode,
            });
            pos += header.span();
        }

        let mut dead: Vec<bool> = spans.iter().map(|s| s.opcode == Opcode::Skip).collect();

        keep_last(&spans, &mut dead, Opcode::GridResize);

        if let Some(last_clear) = spans.iter().rposition(|s| s.opcode == Opcode::ClearCanvas) {
            for (i, span) in spans[..last_clear].iter().enumerate() {
                if span.opcode != Opcode::GridResize {
                    dead[i] = true;
                }
            }
        }

        keep_last(&spans, &mut dead, Opcode::Seed);
        keep_last(&spans, &mut dead, Opcode::PlotUpdates);

        let live_words = spans
            .iter()
            .zip(&dead)
            .filter(|(_, d)| !**d)
            .map(|(s, _)| s.len)
            .sum();

        Ok(CompactionPlan {
            spans,
            dead,
            live_words,
        })
    }

    pub(super) fn apply_compaction(&mut self, plan: CompactionPlan) -> CompactionReport {
        let before = self.depth();
        let mut condensed = 0;

        for (span, &dead) in plan.spans.iter().zip(&plan.dead) {
            if dead && span.opcode != Opcode::Skip {
                self.words[span.pos] = encode(Opcode::Skip, (span.len - 1) as u8) as Word;
                condensed += 1;
            }
        }

        let mut write = 0;
        for (span, &dead) in plan.spans.iter().zip(&plan.dead) {
            if dead {
                continue;
            }
            if span.pos != write {
                self.words.copy_within(span.pos..span.pos + span.len, write);
            }
            write += span.len;
        }
        debug_assert_eq!(write, plan.live_words);

        let old_latest = self.latest;
        self.words[write..old_latest].fill(0);
        self.head = 0;
        self.latest = write;

        CompactionReport {
            before,
            after: write,
            condensed,
        }
    }

    /// Condense superseded commands and reclaim their space.
    pub fn compact(&mut self) -> Result<CompactionReport, EngineError> {
        let plan = self.plan_compaction()?;
        let report = self.apply_compaction(plan);
        tracing::debug!(
            before = report.before,
            after = report.after,
            condensed = report.condensed,
            "instruction queue compacted"
        );
        Ok(report)
    }
}
