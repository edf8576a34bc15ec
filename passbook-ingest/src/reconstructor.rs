//! Transaction reconstructor: groups classified lines into transaction blocks.

use std::mem;

use crate::types::{BoundaryKind, ClassifiedLine, LineCategory, RawTransactionBlock, TextLine};

#[derive(Debug, Default)]
enum ReconstructorState {
    #[default]
    Idle,
    InBlock(RawTransactionBlock),
    /// Closing balance seen or input exhausted.
    Done,
}

/// Balance lines seen while reconstructing, kept for the assembler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryLines {
    /// First opening-balance line.
    pub opening: Option<TextLine>,
    /// The closing-balance line that ended the pass.
    pub closing: Option<TextLine>,
}

/// Single-pass state machine yielding one `RawTransactionBlock` per entry.
pub struct Reconstructor<I> {
    lines: I,
    state: ReconstructorState,
    boundaries: BoundaryLines,
}

impl<I> Reconstructor<I>
where
    I: Iterator<Item = ClassifiedLine>,
{
    pub fn new(lines: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            lines: lines.into_iter(),
            state: ReconstructorState::Idle,
            boundaries: BoundaryLines::default(),
        }
    }

    pub fn boundaries(&self) -> &BoundaryLines {
        &self.boundaries
    }

    pub fn into_boundaries(self) -> BoundaryLines {
        self.boundaries
    }

    /// Advance the machine by one line, returning a block if one was closed.
    fn step(&mut self, line: ClassifiedLine) -> Option<RawTransactionBlock> {
        use LineCategory::*;
        use ReconstructorState::*;

        let state = mem::take(&mut self.state);
        let (next, emitted) = match (state, line.category) {
            (Done, _) => (Done, None),

            (state, StatementBoundary(BoundaryKind::ClosingBalance)) => {
                self.boundaries.closing = Some(line.line);
                (Done, state.into_block())
            }

            (state, StatementBoundary(BoundaryKind::OpeningBalance)) => {
                if self.boundaries.opening.is_none() {
                    self.boundaries.opening = Some(line.line);
                }
                (Idle, state.into_block())
            }

            (state, TransactionStart) => (InBlock(RawTransactionBlock::new(line)), state.into_block()),

            (InBlock(mut block), Continuation) => {
                block.push(line);
                (InBlock(block), None)
            }

            // Page markers and noise suspend an open block without closing it.
            (state, _) => (state, None),
        };
        self.state = next;
        emitted
    }
}

impl ReconstructorState {
    fn into_block(self) -> Option<RawTransactionBlock> {
        match self {
            ReconstructorState::InBlock(block) => Some(block),
            _ => None,
        }
    }
}

impl<I> Iterator for Reconstructor<I>
where
    I: Iterator<Item = ClassifiedLine>,
{
    type Item = RawTransactionBlock;

    fn next(&mut self) -> Option<RawTransactionBlock> {
        loop {
            if matches!(self.state, ReconstructorState::Done) {
                return None;
            }
            match self.lines.next() {
                Some(line) => {
                    if let Some(block) = self.step(line) {
                        return Some(block);
                    }
                }
                // A statement may end mid-page: flush whatever is open.
                None => return mem::replace(&mut self.state, ReconstructorState::Done).into_block(),
            }
        }
    }
}
