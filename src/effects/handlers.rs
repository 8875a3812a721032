//! Effect handlers: zone arrivals, card plays, and queue items.
//!
//! Handlers mutate the state, may push frames or set prompts, and report
//! how control proceeds through their [`Outcome`] return value. None of
//! them loops; anything iterative goes back through the resolution stack.

use crate::core::ids::CardId;
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::effects::{standard_cards, CardKind};
use crate::engine::{turn, Engine};
use crate::error::EngineError;
use crate::prompt::{set_prompt, Prompt, PromptContext};
use crate::stack::{Frame, Instruction, Outcome};

// === Zone arrivals ===

/// Hall of Ages: offer scoring one affordable crown-bearing card.
pub(crate) fn arrive_scoring_hall(
    engine: &Engine,
    state: &mut GameState,
    actor: PlayerId,
) -> Result<Outcome, EngineError> {
    let affordable = scorable_indices(engine, state, actor);
    if affordable.is_empty() {
        state
            .log
            .info(state.turn_number, format!("{actor} has nothing to score"));
        return Ok(Outcome::Continue);
    }
    set_prompt(
        state,
        actor,
        Prompt::Score,
        PromptContext::CardChoice { affordable },
    );
    Ok(Outcome::AwaitingInput(actor))
}

pub(crate) fn arrive_mint(
    state: &mut GameState,
    actor: PlayerId,
) -> Result<Outcome, EngineError> {
    state.players[actor].resources.coins += 2;
    state
        .log
        .info(state.turn_number, format!("{actor} mints 2 coins"));
    Ok(Outcome::Continue)
}

pub(crate) fn arrive_archive(
    state: &mut GameState,
    actor: PlayerId,
) -> Result<Outcome, EngineError> {
    let mut drawn = 0;
    for _ in 0..2 {
        if state.draw_card(actor).is_some() {
            drawn += 1;
        }
    }
    state.log.info(
        state.turn_number,
        format!("{actor} draws {drawn} from the archive"),
    );
    Ok(Outcome::Continue)
}

/// Atelier: offer playing one affordable card with a play use.
pub(crate) fn arrive_atelier(
    engine: &Engine,
    state: &mut GameState,
    actor: PlayerId,
) -> Result<Outcome, EngineError> {
    let affordable = playable_indices(engine, state, actor);
    if affordable.is_empty() {
        state
            .log
            .info(state.turn_number, format!("{actor} has nothing to play"));
        return Ok(Outcome::Continue);
    }
    set_prompt(
        state,
        actor,
        Prompt::Play,
        PromptContext::CardChoice { affordable },
    );
    Ok(Outcome::AwaitingInput(actor))
}

/// Rift: forced discard of one card, skipped on an empty hand.
pub(crate) fn arrive_rift(
    state: &mut GameState,
    actor: PlayerId,
) -> Result<Outcome, EngineError> {
    if state.hand(actor).is_empty() {
        state.log.info(
            state.turn_number,
            format!("{actor} has nothing for the rift"),
        );
        return Ok(Outcome::Continue);
    }
    set_prompt(
        state,
        actor,
        Prompt::Discard,
        PromptContext::DiscardCount { count: 1 },
    );
    Ok(Outcome::AwaitingInput(actor))
}

pub(crate) fn arrive_hourglass_plaza(
    state: &mut GameState,
    actor: PlayerId,
) -> Result<Outcome, EngineError> {
    state.players[actor].resources.coins += 1;
    state
        .log
        .info(state.turn_number, format!("{actor} gains a coin at the plaza"));
    Ok(Outcome::Continue)
}

// === Card plays ===

/// Time Loop: two forced visits of the player's choice, in sequence.
///
/// The first-play frame sits beneath the first visit's cascade; popping it
/// issues the second movement prompt.
pub(crate) fn play_time_loop(
    engine: &Engine,
    state: &mut GameState,
    actor: PlayerId,
) -> Result<Outcome, EngineError> {
    state.stack.push(Frame::card(
        standard_cards::TIME_LOOP,
        Instruction::FirstPlay,
        actor,
    ));
    prompt_move(engine, state, actor);
    Ok(Outcome::AwaitingInput(actor))
}

/// Second movement prompt of Time Loop, after the first visit resolved.
pub(crate) fn time_loop_second_visit(
    engine: &Engine,
    state: &mut GameState,
    frame: &Frame,
) -> Result<Outcome, EngineError> {
    let actor = frame.owner;
    state
        .stack
        .push(Frame::card(frame.as_card(), Instruction::SecondPlay, actor));
    prompt_move(engine, state, actor);
    Ok(Outcome::AwaitingInput(actor))
}

/// Rift Call: forced visit to the rift, no choice involved.
pub(crate) fn play_rift_call(
    state: &mut GameState,
    actor: PlayerId,
) -> Result<Outcome, EngineError> {
    state.stack.push(Frame::zone(
        crate::core::config::zones::RIFT,
        Instruction::Arrive,
        actor,
    ));
    Ok(Outcome::Continue)
}

pub(crate) fn play_sands_of_haste(
    state: &mut GameState,
    actor: PlayerId,
) -> Result<Outcome, EngineError> {
    let player = &mut state.players[actor];
    player.extra_turns = player.extra_turns.saturating_add(1);
    state
        .log
        .info(state.turn_number, format!("{actor} banks an extra turn"));
    Ok(Outcome::Continue)
}

/// A played momentary card finished resolving; it goes to the discard pile.
pub(crate) fn finish_card(
    state: &mut GameState,
    owner: PlayerId,
    card: CardId,
) -> Result<Outcome, EngineError> {
    state.players[owner].discard.push(card);
    tracing::debug!(%owner, %card, "card resolved to discard");
    Ok(Outcome::Continue)
}

// === Queue items ===

pub(crate) fn queue_start_income(
    state: &mut GameState,
    owner: PlayerId,
) -> Result<Outcome, EngineError> {
    state.players[owner].resources.coins += 1;
    state
        .log
        .info(state.turn_number, format!("{owner} collects start income"));
    Ok(Outcome::Continue)
}

pub(crate) fn queue_end_upkeep(
    state: &mut GameState,
    owner: PlayerId,
) -> Result<Outcome, EngineError> {
    if state.draw_card(owner).is_some() {
        state
            .log
            .info(state.turn_number, format!("{owner} draws for upkeep"));
    }
    Ok(Outcome::Continue)
}

/// One coin per score-track column the owner strictly rules.
pub(crate) fn queue_age_tribute(
    state: &mut GameState,
    owner: PlayerId,
) -> Result<Outcome, EngineError> {
    let ruled = turn::ruled_columns(state, owner);
    state.players[owner].resources.coins += i64::from(ruled);
    state.log.info(
        state.turn_number,
        format!("{owner} collects tribute for {ruled} ruled columns"),
    );
    Ok(Outcome::Continue)
}

/// Hourglass payout: every remaining player gains a coin.
pub(crate) fn queue_communal_payout(state: &mut GameState) -> Result<Outcome, EngineError> {
    for (_, player) in state.players.iter_mut() {
        if !player.resigned {
            player.resources.coins += 1;
        }
    }
    state
        .log
        .info(state.turn_number, "the hourglass pays every player a coin");
    Ok(Outcome::Continue)
}

// === Shared helpers ===

fn prompt_move(engine: &Engine, state: &mut GameState, actor: PlayerId) {
    let legal = turn::legal_destinations(engine, state, actor);
    state.legal_zones = legal.clone();
    set_prompt(state, actor, Prompt::Move, PromptContext::Zones { legal });
}

/// Hand indices holding crown-bearing cards the player can pay for.
pub(crate) fn scorable_indices(
    engine: &Engine,
    state: &GameState,
    player: PlayerId,
) -> Vec<usize> {
    let coins = state.players[player].resources.coins;
    state
        .hand(player)
        .iter()
        .enumerate()
        .filter(|(_, card)| {
            engine
                .cards()
                .get(**card)
                .is_some_and(|def| def.score > 0 && def.cost <= coins)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Hand indices holding cards with a play use the player can pay for.
pub(crate) fn playable_indices(
    engine: &Engine,
    state: &GameState,
    player: PlayerId,
) -> Vec<usize> {
    let coins = state.players[player].resources.coins;
    state
        .hand(player)
        .iter()
        .enumerate()
        .filter(|(_, card)| {
            engine.cards().get(**card).is_some_and(|def| {
                def.cost <= coins
                    && (def.effect.is_some() || def.kind == CardKind::Perpetual)
            })
        })
        .map(|(i, _)| i)
        .collect()
}
