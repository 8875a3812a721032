//! # chronica
//!
//! Turn-resolution engine for a timeline-themed multiplayer board game:
//! players visit zones, score and play cards, and race along a shared
//! score track while recurring effects queue up around each turn.
//!
//! ## Design Principles
//!
//! 1. **One owned state**: a match is a single [`GameState`] value. The
//!    engine holds only immutable rule data and receives the state by
//!    `&mut` per dispatch; snapshot, rollback, and persistence all fall
//!    out of plain ownership.
//!
//! 2. **Explicit control flow**: every handler reports an [`Outcome`].
//!    Suspension on a prompt is a return value, never something inferred
//!    by scanning the state afterwards.
//!
//! 3. **Closed effect set**: effects are variants of [`EffectId`] and the
//!    registry matches exhaustively, so an unhandled effect is a compile
//!    error.
//!
//! 4. **N-player first**: every seat-order computation takes the player
//!    count; nothing assumes two players.
//!
//! ## Modules
//!
//! - `core`: ids, players, configuration, RNG, actions, log, state
//! - `prompt`: the per-player decision state machine
//! - `stack`: the LIFO resolution stack and outcome type
//! - `queue`: the three phase-scoped effect queues
//! - `effects`: effect ids, card library, registry, handlers
//! - `engine`: dispatch, resolve loop, turn lifecycle
//! - `store`: split-record persistence and the match service
//! - `error`: protocol / rule / invariant / store error families

pub mod core;
pub mod effects;
pub mod engine;
pub mod error;
pub mod prompt;
pub mod queue;
pub mod stack;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    zones, ActionEnvelope, ActionId, ActionKind, ActionRecord, CardId, ColumnId, GameConfig,
    GameId, GameRng, GameState, PlayerId, PlayerMap, PlayerView, QueueItemId, ZoneConfig, ZoneId,
    COLUMN_COUNT,
};

pub use crate::effects::{standard_cards, CardDef, CardKind, CardLibrary, EffectId};

pub use crate::engine::{Engine, GameResult, Receipt};

pub use crate::error::{EngineError, InvariantError, ProtocolError, RuleViolation, StoreError};

pub use crate::prompt::{Prompt, PromptContext, PromptState};

pub use crate::queue::{EffectQueue, QueueItem, QueuePhase};

pub use crate::stack::{Frame, FrameKind, Instruction, Outcome, ResolutionStack};

pub use crate::store::{GameStore, MatchService, MemoryStore};
