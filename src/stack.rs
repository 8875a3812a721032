//! The resolution stack: LIFO follow-ups threading one action's cascade.
//!
//! A handler that needs work done *after* its nested effects finish pushes a
//! [`Frame`]. The engine's resolve loop pops the top frame only once the
//! frames above it (and any prompts they raised) have fully resolved, so
//! control always returns to effects in strict reverse order of how they
//! suspended.
//!
//! Termination is structural: every iteration of the resolve loop either
//! pops a frame (strictly decreasing depth) or suspends on a prompt. A
//! continuation that neither pops nor prompts cannot be expressed here.

use serde::{Deserialize, Serialize};

use crate::core::ids::{CardId, ZoneId};
use crate::core::player::PlayerId;
use crate::queue::QueuePhase;
use crate::engine::GameResult;

/// What a frame's continuation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameKind {
    /// A zone visit's follow-up.
    Zone,
    /// A card effect's follow-up.
    Card,
    /// Re-entry into an effect queue's drain.
    QueueContinuation,
    /// A turn-lifecycle boundary owned by the turn controller.
    Marker,
}

/// Re-entry point within a multi-step continuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Perform the visit itself (used for forced visits queued by effects).
    Arrive,
    /// Run the completion step after the immediate effect resolved.
    FollowUp,
    /// First replay step of a two-step card effect.
    FirstPlay,
    /// Second replay step of a two-step card effect.
    SecondPlay,
    /// Re-enter the queue drain for the frame's phase.
    Drain,
    /// Issue the core-action prompt (start-of-turn queue fully drained).
    CoreAction,
    /// Begin end-of-turn processing.
    EndTurn,
    /// Win check and seat advance (end-of-turn queue fully drained).
    TurnOver,
}

/// One pending follow-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub kind: FrameKind,
    /// Raw id, interpreted per kind: zone id, card id, or queue phase.
    pub id: u32,
    pub instruction: Instruction,
    /// Player the follow-up belongs to; the continuation runs on their
    /// behalf.
    pub owner: PlayerId,
}

impl Frame {
    #[must_use]
    pub fn zone(zone: ZoneId, instruction: Instruction, owner: PlayerId) -> Self {
        Self {
            kind: FrameKind::Zone,
            id: u32::from(zone.raw()),
            instruction,
            owner,
        }
    }

    #[must_use]
    pub fn card(card: CardId, instruction: Instruction, owner: PlayerId) -> Self {
        Self {
            kind: FrameKind::Card,
            id: card.raw(),
            instruction,
            owner,
        }
    }

    #[must_use]
    pub fn queue_continuation(phase: QueuePhase, owner: PlayerId) -> Self {
        Self {
            kind: FrameKind::QueueContinuation,
            id: phase as u32,
            instruction: Instruction::Drain,
            owner,
        }
    }

    #[must_use]
    pub fn marker(instruction: Instruction, owner: PlayerId) -> Self {
        Self {
            kind: FrameKind::Marker,
            id: 0,
            instruction,
            owner,
        }
    }

    /// The frame's id as a zone, for `FrameKind::Zone` frames.
    #[must_use]
    pub fn as_zone(&self) -> ZoneId {
        ZoneId::new(self.id as u16)
    }

    /// The frame's id as a card, for `FrameKind::Card` frames.
    #[must_use]
    pub fn as_card(&self) -> CardId {
        CardId::new(self.id)
    }

    /// The frame's id as a queue phase, for queue-continuation frames.
    #[must_use]
    pub fn as_phase(&self) -> Option<QueuePhase> {
        QueuePhase::from_raw(self.id)
    }
}

/// Strictly LIFO stack of pending follow-ups.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResolutionStack {
    frames: Vec<Frame>,
}

impl ResolutionStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&Frame> {
        self.frames.last()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop all frames. Used when a turn is abandoned (resignation).
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

/// Where control stands after a handler, drain step, or frame continuation.
///
/// Control flow is visible in this type: nothing in the engine infers
/// suspension by scanning players for prompts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A prompt was set; control returns to the caller until the named
    /// player answers.
    AwaitingInput(PlayerId),
    /// The immediate effect is complete; pop the next frame.
    Continue,
    /// The match has ended.
    GameOver(GameResult),
}
