//! The dispatch contract: idempotent delivery, protocol rejections, and
//! rule-violation rollback.

use chronica::standard_cards::SUNDIAL;
use chronica::zones;
use chronica::{
    ActionEnvelope, ActionKind, EngineError, Engine, GameConfig, Outcome, PlayerId, Prompt,
    ProtocolError,
};

fn env(id: &str, actor: PlayerId, kind: ActionKind) -> ActionEnvelope {
    ActionEnvelope::new(id, actor, kind)
}

fn visit(zone: chronica::ZoneId) -> ActionKind {
    ActionKind::Visit { zone }
}

#[test]
fn test_duplicate_delivery_is_a_committed_noop() {
    let engine = Engine::new(GameConfig::standard(2));
    let (mut state, _) = engine.new_match(1);
    let p0 = PlayerId::new(0);

    let first = engine
        .dispatch(&mut state, env("d-1", p0, visit(zones::MINT)))
        .unwrap();
    assert!(first.applied);
    assert!(!first.duplicate);
    let coins_after = state.players[p0].resources.coins;

    // Same id redelivered, even with a different payload: acknowledged,
    // nothing changes.
    let second = engine
        .dispatch(&mut state, env("d-1", p0, visit(zones::ARCHIVE)))
        .unwrap();
    assert!(!second.applied);
    assert!(second.duplicate);
    assert_eq!(second.outcome, first.outcome);
    assert_eq!(state.players[p0].resources.coins, coins_after);
    assert_eq!(state.players[p0].position, Some(zones::MINT));
    assert_eq!(state.history.len(), 1);
}

#[test]
fn test_unknown_actor_is_rejected_without_processing() {
    let engine = Engine::new(GameConfig::standard(2));
    let (mut state, _) = engine.new_match(1);

    let err = engine.dispatch(&mut state, env("d-1", PlayerId::new(7), visit(zones::MINT)));
    assert!(matches!(
        err,
        Err(EngineError::Protocol(ProtocolError::UnknownActor(_)))
    ));
    // Protocol rejections record nothing: the same id is still fresh.
    assert!(!state.has_processed(&chronica::ActionId::new("d-1")));
}

#[test]
fn test_action_without_matching_prompt_is_rejected() {
    let engine = Engine::new(GameConfig::standard(2));
    let (mut state, _) = engine.new_match(1);
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);

    // Player 1 holds no prompt at all.
    let err = engine.dispatch(&mut state, env("d-1", p1, visit(zones::MINT)));
    assert!(matches!(
        err,
        Err(EngineError::Protocol(ProtocolError::PromptMismatch { .. }))
    ));

    // Player 0 holds a visit prompt, not a score prompt.
    let err = engine.dispatch(
        &mut state,
        env("d-2", p0, ActionKind::ScoreCard { hand_index: 0 }),
    );
    assert!(matches!(
        err,
        Err(EngineError::Protocol(ProtocolError::PromptMismatch { .. }))
    ));

    // Pass against a non-declinable prompt is a protocol error too.
    let err = engine.dispatch(&mut state, env("d-3", p0, ActionKind::Pass));
    assert!(matches!(
        err,
        Err(EngineError::Protocol(ProtocolError::PromptMismatch { .. }))
    ));
}

#[test]
fn test_resigned_actor_is_rejected() {
    let engine = Engine::new(GameConfig::standard(3));
    let (mut state, _) = engine.new_match(1);
    let p1 = PlayerId::new(1);

    engine
        .dispatch(&mut state, env("d-1", p1, ActionKind::Resign))
        .unwrap();
    let err = engine.dispatch(&mut state, env("d-2", p1, ActionKind::Resign));
    assert!(matches!(
        err,
        Err(EngineError::Protocol(ProtocolError::ActorResigned(_)))
    ));
}

#[test]
fn test_rule_violation_rolls_back_and_stays_retryable() {
    let mut config = GameConfig::standard(2);
    config.deck = vec![SUNDIAL; 6];
    let engine = Engine::new(config);
    let (mut state, _) = engine.new_match(1);
    let p0 = PlayerId::new(0);

    engine
        .dispatch(&mut state, env("d-1", p0, visit(zones::RIFT)))
        .unwrap();
    assert_eq!(
        state.players[p0].prompt.as_ref().unwrap().kind,
        Prompt::Discard
    );
    let hand_before = state.hand(p0).to_vec();
    let coins_before = state.players[p0].resources.coins;

    // Two cards where one is owed.
    let receipt = engine
        .dispatch(
            &mut state,
            env(
                "d-2",
                p0,
                ActionKind::Discard {
                    hand_indices: [0, 1].into_iter().collect(),
                },
            ),
        )
        .unwrap();

    assert!(!receipt.applied);
    assert!(receipt.rejection.is_some());
    assert_eq!(receipt.outcome, Outcome::AwaitingInput(p0));
    // Rolled back in full.
    assert_eq!(state.hand(p0), hand_before.as_slice());
    assert_eq!(state.players[p0].resources.coins, coins_before);
    assert_eq!(
        state.players[p0].prompt.as_ref().unwrap().kind,
        Prompt::Discard
    );
    // A rejected id is committed: its redelivery is a duplicate.
    let again = engine
        .dispatch(
            &mut state,
            env(
                "d-2",
                p0,
                ActionKind::Discard {
                    hand_indices: [0].into_iter().collect(),
                },
            ),
        )
        .unwrap();
    assert!(again.duplicate);

    // A fresh id with the right count goes through.
    let retry = engine
        .dispatch(
            &mut state,
            env(
                "d-3",
                p0,
                ActionKind::Discard {
                    hand_indices: [0].into_iter().collect(),
                },
            ),
        )
        .unwrap();
    assert!(retry.applied);
    assert_eq!(state.hand(p0).len(), hand_before.len() - 1);
}

#[test]
fn test_pass_declines_an_optional_prompt() {
    let mut config = GameConfig::standard(2);
    config.deck = vec![SUNDIAL; 6];
    let engine = Engine::new(config);
    let (mut state, _) = engine.new_match(1);
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);
    let coins_before = state.players[p0].resources.coins;

    engine
        .dispatch(&mut state, env("d-1", p0, visit(zones::HALL_OF_AGES)))
        .unwrap();
    assert_eq!(
        state.players[p0].prompt.as_ref().unwrap().kind,
        Prompt::Score
    );

    let receipt = engine
        .dispatch(&mut state, env("d-2", p0, ActionKind::Pass))
        .unwrap();

    assert!(receipt.applied);
    assert_eq!(receipt.outcome, Outcome::AwaitingInput(p1));
    assert_eq!(state.players[p0].resources.coins, coins_before);
    assert_eq!(state.players[p0].resources.crowns, 0);
}

#[test]
fn test_history_records_applied_actions_in_order() {
    let engine = Engine::new(GameConfig::standard(2));
    let (mut state, _) = engine.new_match(1);
    let p0 = PlayerId::new(0);
    let p1 = PlayerId::new(1);

    engine
        .dispatch(&mut state, env("d-1", p0, visit(zones::MINT)))
        .unwrap();
    engine
        .dispatch(&mut state, env("d-2", p1, visit(zones::ARCHIVE)))
        .unwrap();

    let ids: Vec<String> = state.history.iter().map(|r| r.id.0.clone()).collect();
    assert_eq!(ids, vec!["d-1", "d-2"]);
    assert_eq!(state.history[0].actor, p0);
    assert_eq!(state.history[1].actor, p1);
}
