//! Error taxonomy for dispatch and resolution.
//!
//! The three dispatch outcomes map onto three error families:
//!
//! * [`ProtocolError`] — the action could not be understood or is not
//!   addressed to a live decision. Rejected before any mutation; nothing
//!   is recorded.
//! * [`RuleViolation`] — a well-formed answer that breaks a game rule.
//!   The dispatcher rolls the state back to its pre-action snapshot, logs
//!   a warning, and the prompt stays open for a retry.
//! * [`InvariantError`] — internal inconsistency. Never surfaced to the
//!   caller as an error: resolution recovers by discarding the offending
//!   work, logging at error level, and bumping the audit counters.

use thiserror::Error;

use crate::core::ids::{CardId, ColumnId, QueueItemId, ZoneId};
use crate::core::player::PlayerId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("rule violation: {0}")]
    Rule(#[from] RuleViolation),

    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Malformed or misaddressed input, rejected before mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("no such player: {0}")]
    UnknownActor(PlayerId),

    #[error("{0} has resigned")]
    ActorResigned(PlayerId),

    #[error("match is already over")]
    MatchOver,

    #[error("{actor} sent {action} but owes {expected}")]
    PromptMismatch {
        actor: PlayerId,
        action: &'static str,
        expected: String,
    },
}

/// A legal-looking answer that breaks a game rule. Rolled back, retryable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("zone {0} is not among the legal destinations")]
    ZoneNotLegal(ZoneId),

    #[error("hand index {0} was not among the offered cards")]
    InvalidHandIndex(usize),

    #[error("column {0} is not advanceable here")]
    InvalidColumn(ColumnId),

    #[error("queue item {0} was not among the offered choices")]
    ItemNotOffered(QueueItemId),

    #[error("must discard exactly {expected} distinct cards, got {got}")]
    WrongDiscardCount { expected: usize, got: usize },
}

/// Internal inconsistency. Recovered in place, never returned to callers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    #[error("card {0} missing from the library")]
    MissingCard(CardId),

    #[error("zone {0} missing from the configuration")]
    MissingZone(ZoneId),

    #[error("queue item {0} vanished between offer and choice")]
    MissingQueueItem(QueueItemId),

    #[error("prompt for {0} has no matching context")]
    MissingPromptContext(PlayerId),

    #[error("card {0} has an inconsistent definition")]
    MalformedCard(CardId),

    #[error("stack frame does not decode for its kind")]
    CorruptFrame,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no match stored under {0}")]
    NotFound(crate::core::ids::GameId),

    #[error("codec failure: {0}")]
    Codec(String),

    #[error("torn record for {id}: {detail}")]
    Torn {
        id: crate::core::ids::GameId,
        detail: String,
    },
}
