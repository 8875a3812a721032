//! Randomized walks over whole matches, checking structural invariants at
//! every step.

use proptest::prelude::*;

use chronica::{
    ActionEnvelope, ActionKind, ColumnId, Engine, GameConfig, GameState, Outcome, PlayerId,
    Prompt, PromptContext, COLUMN_COUNT,
};

/// Build a legal answer to the player's outstanding prompt, using `pick`
/// to choose among the alternatives.
fn legal_answer(state: &GameState, player: PlayerId, pick: u8) -> ActionKind {
    let prompt = state.players[player]
        .prompt
        .as_ref()
        .expect("awaiting player must hold a prompt");
    let pick = pick as usize;
    match (&prompt.kind, &prompt.context) {
        (Prompt::Visit, PromptContext::Zones { legal }) => ActionKind::Visit {
            zone: legal[pick % legal.len()],
        },
        (Prompt::Move, PromptContext::Zones { legal }) => ActionKind::MoveTo {
            zone: legal[pick % legal.len()],
        },
        (Prompt::Score, PromptContext::CardChoice { affordable }) => {
            if pick % 3 == 0 {
                ActionKind::Pass
            } else {
                ActionKind::ScoreCard {
                    hand_index: affordable[pick % affordable.len()],
                }
            }
        }
        (Prompt::Play, PromptContext::CardChoice { affordable }) => {
            if pick % 3 == 0 {
                ActionKind::Pass
            } else {
                ActionKind::PlayCard {
                    hand_index: affordable[pick % affordable.len()],
                }
            }
        }
        (Prompt::Discard, PromptContext::DiscardCount { count }) => ActionKind::Discard {
            hand_indices: (0..*count).collect(),
        },
        (Prompt::Advance, PromptContext::Crowns { .. }) => ActionKind::AdvanceCrowns {
            column: ColumnId::new((pick % COLUMN_COUNT) as u8),
        },
        (kind, PromptContext::QueueItems { items, .. }) if kind.is_queue_choice() => {
            ActionKind::ChooseQueueItem {
                item: items[pick % items.len()],
            }
        }
        (kind, context) => panic!("prompt {kind:?} with mismatched context {context:?}"),
    }
}

fn check_invariants(state: &GameState) {
    for (id, player) in state.players.iter() {
        assert!(
            player.resources.coins >= 0,
            "{id} went into debt: {}",
            player.resources.coins
        );
        assert_eq!(
            player.resources.crowns,
            player.score_track.iter().sum::<u32>(),
            "{id} crown total disagrees with the score track"
        );
        assert_eq!(
            player.hand_count as usize,
            state.hand(id).len(),
            "{id} hand count mirror out of sync"
        );
    }
    assert_eq!(
        state.audit.invariant_violations, 0,
        "a recovery path fired during a legal walk"
    );
    // A state with nothing owed and nothing queued has nothing to run.
    if state.is_stable() {
        assert!(
            state.stack.is_empty(),
            "stable state left frames on the stack"
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any sequence of legal answers keeps the match consistent: a receipt
    /// that awaits a player matches an outstanding prompt for exactly that
    /// player, and a finished or suspended engine never leaves a stable
    /// state with frames on the stack.
    #[test]
    fn random_walks_stay_consistent(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<u8>(), 120),
    ) {
        let engine = Engine::new(GameConfig::standard(3));
        let (mut state, mut outcome) = engine.new_match(seed);
        check_invariants(&state);

        for (step, pick) in picks.into_iter().enumerate() {
            let player = match outcome {
                Outcome::AwaitingInput(player) => player,
                Outcome::GameOver(_) => break,
                Outcome::Continue => panic!("engine yielded without a prompt or a result"),
            };
            let kind = legal_answer(&state, player, pick);
            let receipt = engine
                .dispatch(&mut state, ActionEnvelope::new(format!("w-{step}"), player, kind))
                .expect("legal answer must not be a protocol error");
            prop_assert!(receipt.applied, "legal answer bounced: {:?}", receipt.rejection);

            check_invariants(&state);
            if let Outcome::AwaitingInput(p) = &receipt.outcome {
                prop_assert!(state.players[*p].prompt.is_some());
            }
            outcome = receipt.outcome;
        }

        match outcome {
            Outcome::GameOver(_) => prop_assert!(state.result.is_some()),
            Outcome::AwaitingInput(p) => prop_assert!(state.players[p].prompt.is_some()),
            Outcome::Continue => {}
        }
    }

    /// Redelivering every earlier action id after the walk changes nothing.
    #[test]
    fn redelivery_is_idempotent(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<u8>(), 40),
    ) {
        let engine = Engine::new(GameConfig::standard(2));
        let (mut state, mut outcome) = engine.new_match(seed);
        let mut sent: Vec<ActionEnvelope> = Vec::new();

        for (step, pick) in picks.into_iter().enumerate() {
            let player = match outcome {
                Outcome::AwaitingInput(player) => player,
                _ => break,
            };
            let envelope = ActionEnvelope::new(
                format!("w-{step}"),
                player,
                legal_answer(&state, player, pick),
            );
            sent.push(envelope.clone());
            outcome = engine.dispatch(&mut state, envelope).unwrap().outcome;
        }

        let snapshot = serde_json::to_string(&state).unwrap();
        for envelope in sent {
            let receipt = engine.dispatch(&mut state, envelope).unwrap();
            prop_assert!(receipt.duplicate);
            prop_assert!(!receipt.applied);
        }
        prop_assert_eq!(serde_json::to_string(&state).unwrap(), snapshot);
    }
}
