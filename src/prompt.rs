//! Prompts: the per-player "you owe a decision" state machine.
//!
//! A player holds at most one outstanding prompt. The prompt kind and its
//! context payload live in a single `Option<PromptState>`, so they are set
//! and cleared together by construction; stale context can never leak into
//! a new prompt's handler.

use serde::{Deserialize, Serialize};

use crate::core::ids::{QueueItemId, ZoneId};
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::queue::QueuePhase;

/// Kind of an outstanding decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prompt {
    /// Choose a zone for the turn's core action.
    Visit,
    /// Optionally score an affordable card.
    Score,
    /// Optionally play an affordable card.
    Play,
    /// Discard a required number of cards.
    Discard,
    /// Place pending crowns on a score-track column.
    Advance,
    /// Forced movement: choose a zone.
    Move,
    /// Pick resolution order in the start-of-turn queue.
    StartChoice,
    /// Pick resolution order in the post-visit queue.
    PostVisitChoice,
    /// Pick resolution order in the end-of-turn queue.
    EndChoice,
}

impl Prompt {
    /// Whether the player may decline with a `Pass` action.
    #[must_use]
    pub fn is_declinable(self) -> bool {
        matches!(self, Prompt::Score | Prompt::Play)
    }

    /// Whether this is one of the queue-order choice prompts.
    #[must_use]
    pub fn is_queue_choice(self) -> bool {
        matches!(
            self,
            Prompt::StartChoice | Prompt::PostVisitChoice | Prompt::EndChoice
        )
    }

    /// The choice prompt for a queue phase.
    #[must_use]
    pub fn for_queue(phase: QueuePhase) -> Self {
        match phase {
            QueuePhase::StartOfTurn => Prompt::StartChoice,
            QueuePhase::PostVisit => Prompt::PostVisitChoice,
            QueuePhase::EndOfTurn => Prompt::EndChoice,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Prompt::Visit => "visit",
            Prompt::Score => "score",
            Prompt::Play => "play",
            Prompt::Discard => "discard",
            Prompt::Advance => "advance",
            Prompt::Move => "move",
            Prompt::StartChoice => "start-of-turn-choice",
            Prompt::PostVisitChoice => "post-visit-choice",
            Prompt::EndChoice => "end-of-turn-choice",
        }
    }
}

/// Payload scoped to the current prompt only. Discarded with the prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptContext {
    /// No payload.
    None,
    /// Zones the player may pick from.
    Zones { legal: Vec<ZoneId> },
    /// Hand indices the player can currently afford.
    CardChoice { affordable: Vec<usize> },
    /// Number of cards that must be discarded.
    DiscardCount { count: usize },
    /// Crowns pending placement on the score track.
    Crowns { count: u32 },
    /// Simultaneously pending queue items the player must order.
    QueueItems {
        phase: QueuePhase,
        items: Vec<QueueItemId>,
    },
}

/// An outstanding prompt plus its context, stored as one value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptState {
    pub kind: Prompt,
    pub context: PromptContext,
}

/// Set a player's prompt, overwriting kind and context together.
pub fn set_prompt(state: &mut GameState, player: PlayerId, kind: Prompt, context: PromptContext) {
    tracing::debug!(%player, prompt = kind.name(), "prompt set");
    state.players[player].prompt = Some(PromptState { kind, context });
}

/// Clear a player's prompt and its context.
pub fn clear_prompt(state: &mut GameState, player: PlayerId) {
    if state.players[player].prompt.take().is_some() {
        tracing::debug!(%player, "prompt cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;

    fn blank_state() -> GameState {
        GameState::new(&GameConfig::standard(2), 42)
    }

    #[test]
    fn test_set_writes_kind_and_context_together() {
        let mut state = blank_state();
        let p = PlayerId::new(0);

        set_prompt(
            &mut state,
            p,
            Prompt::Discard,
            PromptContext::DiscardCount { count: 2 },
        );

        let ps = state.players[p].prompt.as_ref().unwrap();
        assert_eq!(ps.kind, Prompt::Discard);
        assert_eq!(ps.context, PromptContext::DiscardCount { count: 2 });
    }

    #[test]
    fn test_set_overwrites_stale_context() {
        let mut state = blank_state();
        let p = PlayerId::new(1);

        set_prompt(
            &mut state,
            p,
            Prompt::Score,
            PromptContext::CardChoice { affordable: vec![0] },
        );
        set_prompt(&mut state, p, Prompt::Advance, PromptContext::Crowns { count: 3 });

        let ps = state.players[p].prompt.as_ref().unwrap();
        assert_eq!(ps.kind, Prompt::Advance);
        assert_eq!(ps.context, PromptContext::Crowns { count: 3 });
    }

    #[test]
    fn test_clear_drops_both() {
        let mut state = blank_state();
        let p = PlayerId::new(0);

        set_prompt(&mut state, p, Prompt::Visit, PromptContext::None);
        clear_prompt(&mut state, p);

        assert!(state.players[p].prompt.is_none());
    }

    #[test]
    fn test_declinable() {
        assert!(Prompt::Score.is_declinable());
        assert!(Prompt::Play.is_declinable());
        assert!(!Prompt::Discard.is_declinable());
        assert!(!Prompt::Visit.is_declinable());
    }

    #[test]
    fn test_queue_choice_mapping() {
        assert_eq!(Prompt::for_queue(QueuePhase::EndOfTurn), Prompt::EndChoice);
        assert!(Prompt::EndChoice.is_queue_choice());
        assert!(!Prompt::Advance.is_queue_choice());
    }
}
