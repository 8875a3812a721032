//! Action envelopes: the external input surface of the engine.
//!
//! An envelope is `{id, actor, kind}`. `kind` is a closed enum, so an
//! unhandled action is a compile-time exhaustiveness error rather than a
//! runtime fallthrough; a transport layer that fails to deserialize into
//! `ActionKind` has already rejected the unknown type at the boundary.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ids::{ActionId, ColumnId, QueueItemId, ZoneId};
use crate::core::player::PlayerId;
use crate::prompt::Prompt;

/// A complete player action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Answer the core-action prompt by visiting a zone.
    Visit { zone: ZoneId },

    /// Score a card from hand (pay its cost, gain its crowns).
    ScoreCard { hand_index: usize },

    /// Play a card from hand (pay its cost, run its effect).
    PlayCard { hand_index: usize },

    /// Discard the given hand indices.
    /// Most discards are 1-2 cards; the indices stay inline.
    Discard { hand_indices: SmallVec<[usize; 2]> },

    /// Place pending crowns onto a score-track column.
    AdvanceCrowns { column: ColumnId },

    /// Answer a forced-movement prompt.
    MoveTo { zone: ZoneId },

    /// Pick which of several simultaneously pending queue items resolves
    /// next.
    ChooseQueueItem { item: QueueItemId },

    /// Decline an optional prompt.
    Pass,

    /// Leave the match.
    Resign,
}

/// What the dispatcher requires of the actor's outstanding prompt before the
/// handler runs. Checked centrally, not per handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptRequirement {
    /// The actor must hold exactly this prompt.
    Exact(Prompt),
    /// The actor must hold a declinable prompt.
    Declinable,
    /// The actor must hold one of the queue-choice prompts.
    QueueChoice,
    /// No prompt requirement (legal with or without one).
    Free,
}

impl ActionKind {
    #[must_use]
    pub fn requirement(&self) -> PromptRequirement {
        match self {
            ActionKind::Visit { .. } => PromptRequirement::Exact(Prompt::Visit),
            ActionKind::ScoreCard { .. } => PromptRequirement::Exact(Prompt::Score),
            ActionKind::PlayCard { .. } => PromptRequirement::Exact(Prompt::Play),
            ActionKind::Discard { .. } => PromptRequirement::Exact(Prompt::Discard),
            ActionKind::AdvanceCrowns { .. } => PromptRequirement::Exact(Prompt::Advance),
            ActionKind::MoveTo { .. } => PromptRequirement::Exact(Prompt::Move),
            ActionKind::ChooseQueueItem { .. } => PromptRequirement::QueueChoice,
            ActionKind::Pass => PromptRequirement::Declinable,
            ActionKind::Resign => PromptRequirement::Free,
        }
    }

    /// Stable name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Visit { .. } => "visit",
            ActionKind::ScoreCard { .. } => "score-card",
            ActionKind::PlayCard { .. } => "play-card",
            ActionKind::Discard { .. } => "discard",
            ActionKind::AdvanceCrowns { .. } => "advance-crowns",
            ActionKind::MoveTo { .. } => "move-to",
            ActionKind::ChooseQueueItem { .. } => "choose-queue-item",
            ActionKind::Pass => "pass",
            ActionKind::Resign => "resign",
        }
    }
}

/// One action as delivered by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    /// Unique per action; repeated ids are committed no-ops.
    pub id: ActionId,
    pub actor: PlayerId,
    pub kind: ActionKind,
}

impl ActionEnvelope {
    pub fn new(id: impl Into<String>, actor: PlayerId, kind: ActionKind) -> Self {
        Self {
            id: ActionId::new(id),
            actor,
            kind,
        }
    }
}

/// History record of an applied action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: ActionId,
    pub actor: PlayerId,
    pub kind: ActionKind,
    /// Round number at the time the action was applied.
    pub turn: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements() {
        let visit = ActionKind::Visit {
            zone: ZoneId::new(1),
        };
        assert_eq!(visit.requirement(), PromptRequirement::Exact(Prompt::Visit));
        assert_eq!(ActionKind::Pass.requirement(), PromptRequirement::Declinable);
        assert_eq!(ActionKind::Resign.requirement(), PromptRequirement::Free);
        assert_eq!(
            ActionKind::ChooseQueueItem {
                item: QueueItemId::new(1)
            }
            .requirement(),
            PromptRequirement::QueueChoice
        );
    }

    #[test]
    fn test_discard_indices_inline() {
        let action = ActionKind::Discard {
            hand_indices: SmallVec::from_slice(&[0, 2]),
        };
        match action {
            ActionKind::Discard { hand_indices } => {
                assert_eq!(hand_indices.as_slice(), &[0, 2]);
                assert!(!hand_indices.spilled());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_envelope_serialization() {
        let env = ActionEnvelope::new(
            "a-1",
            PlayerId::new(0),
            ActionKind::AdvanceCrowns {
                column: ColumnId::new(2),
            },
        );
        let json = serde_json::to_string(&env).unwrap();
        let back: ActionEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(env, back);
    }
}
