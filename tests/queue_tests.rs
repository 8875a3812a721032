//! Effect queues: recurring effects, simultaneous-item choice, and
//! exhaustive drains around the turn.

use chronica::{
    ActionEnvelope, ActionKind, EffectId, Engine, GameConfig, Outcome, PlayerId, Prompt,
    PromptContext, QueuePhase,
};
use chronica::zones;

fn env(n: u32, actor: PlayerId, kind: ActionKind) -> ActionEnvelope {
    ActionEnvelope::new(format!("q-{n}"), actor, kind)
}

#[test]
fn test_single_end_item_resolves_without_a_prompt() {
    let engine = Engine::new(GameConfig::standard(2));
    let (mut state, _) = engine.new_match(1);
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);

    state.players[p0]
        .perpetual
        .get_mut(QueuePhase::EndOfTurn)
        .push(EffectId::StartIncome);
    let coins_before = state.players[p0].resources.coins;

    let receipt = engine
        .dispatch(&mut state, env(1, p0, ActionKind::Visit { zone: zones::ARCHIVE }))
        .unwrap();

    // One pending item never prompts; the turn passes straight on.
    assert_eq!(receipt.outcome, Outcome::AwaitingInput(p1));
    assert_eq!(state.players[p0].resources.coins, coins_before + 1);
    assert!(state.queues.get(QueuePhase::EndOfTurn).is_empty());
}

#[test]
fn test_two_simultaneous_end_items_prompt_the_owner() {
    let engine = Engine::new(GameConfig::standard(2));
    let (mut state, _) = engine.new_match(1);
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);

    state.players[p0]
        .perpetual
        .get_mut(QueuePhase::EndOfTurn)
        .push(EffectId::StartIncome);
    state.players[p0]
        .perpetual
        .get_mut(QueuePhase::EndOfTurn)
        .push(EffectId::StartIncome);
    let coins_before = state.players[p0].resources.coins;

    let receipt = engine
        .dispatch(&mut state, env(1, p0, ActionKind::Visit { zone: zones::ARCHIVE }))
        .unwrap();
    assert_eq!(receipt.outcome, Outcome::AwaitingInput(p0));

    let prompt = state.players[p0].prompt.clone().unwrap();
    assert_eq!(prompt.kind, Prompt::EndChoice);
    let items = match prompt.context {
        PromptContext::QueueItems { phase, items } => {
            assert_eq!(phase, QueuePhase::EndOfTurn);
            items
        }
        other => panic!("unexpected context: {other:?}"),
    };
    assert_eq!(items.len(), 2);

    // After the pick, the single survivor resolves by itself and the turn
    // completes.
    let receipt = engine
        .dispatch(
            &mut state,
            env(2, p0, ActionKind::ChooseQueueItem { item: items[0] }),
        )
        .unwrap();
    assert_eq!(receipt.outcome, Outcome::AwaitingInput(p1));
    assert_eq!(state.players[p0].resources.coins, coins_before + 2);
    assert!(state.queues.get(QueuePhase::EndOfTurn).is_empty());
}

#[test]
fn test_choosing_an_unoffered_item_is_rejected() {
    let engine = Engine::new(GameConfig::standard(2));
    let (mut state, _) = engine.new_match(1);
    let p0 = PlayerId::new(0);

    state.players[p0]
        .perpetual
        .get_mut(QueuePhase::EndOfTurn)
        .push(EffectId::StartIncome);
    state.players[p0]
        .perpetual
        .get_mut(QueuePhase::EndOfTurn)
        .push(EffectId::EndUpkeep);

    engine
        .dispatch(&mut state, env(1, p0, ActionKind::Visit { zone: zones::MINT }))
        .unwrap();
    assert_eq!(
        state.players[p0].prompt.as_ref().unwrap().kind,
        Prompt::EndChoice
    );

    let receipt = engine
        .dispatch(
            &mut state,
            env(
                2,
                p0,
                ActionKind::ChooseQueueItem {
                    item: chronica::QueueItemId::new(9999),
                },
            ),
        )
        .unwrap();

    assert!(!receipt.applied);
    assert!(receipt.rejection.is_some());
    // The choice is still open with both items intact.
    assert_eq!(
        state.players[p0].prompt.as_ref().unwrap().kind,
        Prompt::EndChoice
    );
    assert_eq!(state.queues.get(QueuePhase::EndOfTurn).len(), 2);
}

#[test]
fn test_start_of_turn_queue_drains_before_the_visit_prompt() {
    let engine = Engine::new(GameConfig::standard(2));
    let (mut state, _) = engine.new_match(1);
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);

    state.players[p1]
        .perpetual
        .get_mut(QueuePhase::StartOfTurn)
        .push(EffectId::StartIncome);
    let coins_before = state.players[p1].resources.coins;

    // Ending player 0's turn starts player 1's, whose start queue fires
    // before their visit prompt appears.
    let receipt = engine
        .dispatch(&mut state, env(1, p0, ActionKind::Visit { zone: zones::MINT }))
        .unwrap();

    assert_eq!(receipt.outcome, Outcome::AwaitingInput(p1));
    assert_eq!(state.players[p1].resources.coins, coins_before + 1);
    assert_eq!(
        state.players[p1].prompt.as_ref().unwrap().kind,
        Prompt::Visit
    );
}

#[test]
fn test_hourglass_payout_reaches_every_player() {
    let engine = Engine::new(GameConfig::standard(3));
    let (mut state, _) = engine.new_match(1);
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let p2 = PlayerId::new(2);

    // The standard plaza hourglass starts at 3; the third visit empties it.
    engine
        .dispatch(&mut state, env(1, p0, ActionKind::Visit { zone: zones::HOURGLASS_PLAZA }))
        .unwrap();
    engine
        .dispatch(&mut state, env(2, p1, ActionKind::Visit { zone: zones::HOURGLASS_PLAZA }))
        .unwrap();
    let before: Vec<i64> = [p0, p1, p2]
        .iter()
        .map(|&p| state.players[p].resources.coins)
        .collect();

    engine
        .dispatch(&mut state, env(3, p2, ActionKind::Visit { zone: zones::HOURGLASS_PLAZA }))
        .unwrap();

    // Visitor gains the arrival coin plus the payout; the rest gain one.
    assert_eq!(state.players[p0].resources.coins, before[0] + 1);
    assert_eq!(state.players[p1].resources.coins, before[1] + 1);
    assert_eq!(state.players[p2].resources.coins, before[2] + 2);
    // The counter reset for the next cycle.
    assert_eq!(state.hourglasses[&zones::HOURGLASS_PLAZA], 3);
}
