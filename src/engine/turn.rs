//! Turn lifecycle: phase markers, queue drains, seat advance, win check.
//!
//! The lifecycle is threaded through the resolution stack rather than held
//! in a separate phase variable. When a turn starts, the controller pushes
//! (bottom to top) a core-action marker and a start-of-turn queue
//! continuation; the visit handler later pushes the end-of-turn marker
//! beneath the post-visit continuation. Popping frames in LIFO order then
//! walks the turn through its phases with no other scheduler.

use serde::{Deserialize, Serialize};

use crate::core::ids::{ZoneId, COLUMN_COUNT};
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::effects::{EffectId, EffectRegistry};
use crate::engine::Engine;
use crate::error::{EngineError, InvariantError};
use crate::prompt::{set_prompt, Prompt, PromptContext};
use crate::queue::QueuePhase;
use crate::stack::{Frame, Instruction, Outcome};

/// How a finished match ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Winner(PlayerId),
    /// Several players crossed the crown goal in the same round.
    Winners(Vec<PlayerId>),
    /// Every player resigned.
    Draw,
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::Winner(p) => write!(f, "{p} wins"),
            GameResult::Winners(ps) => {
                write!(f, "shared win:")?;
                for p in ps {
                    write!(f, " {p}")?;
                }
                Ok(())
            }
            GameResult::Draw => f.write_str("draw"),
        }
    }
}

/// Push the frames that constitute a fresh turn for the current active
/// player. Pop order: drain the start-of-turn queue, then issue the
/// core-action prompt.
pub(crate) fn push_turn_frames(state: &mut GameState) {
    let active = state.active_player;
    tracing::debug!(%active, turn = state.turn_number, "turn scheduled");

    state.stack.push(Frame::marker(Instruction::CoreAction, active));
    populate_phase_queue(state, QueuePhase::StartOfTurn);
    state
        .stack
        .push(Frame::queue_continuation(QueuePhase::StartOfTurn, active));
}

/// Enqueue the active player's perpetual effects for a phase.
pub(crate) fn populate_phase_queue(state: &mut GameState, phase: QueuePhase) {
    let active = state.active_player;
    let effects: Vec<EffectId> = state.players[active].perpetual.get(phase).clone();
    for effect in effects {
        state.enqueue_effect(phase, effect.name(), effect, active);
    }
}

/// Handle a popped lifecycle marker.
pub(crate) fn marker_step(
    engine: &Engine,
    state: &mut GameState,
    frame: &Frame,
) -> Result<Outcome, EngineError> {
    match frame.instruction {
        Instruction::CoreAction => {
            let active = state.active_player;
            let legal = legal_destinations(engine, state, active);
            state.legal_zones = legal.clone();
            set_prompt(state, active, Prompt::Visit, PromptContext::Zones { legal });
            Ok(Outcome::AwaitingInput(active))
        }
        Instruction::EndTurn => {
            let active = state.active_player;
            state.stack.push(Frame::marker(Instruction::TurnOver, active));
            populate_phase_queue(state, QueuePhase::EndOfTurn);
            if ruled_columns(state, active) > 0 {
                state.enqueue_effect(
                    QueuePhase::EndOfTurn,
                    EffectId::AgeTribute.name(),
                    EffectId::AgeTribute,
                    active,
                );
            }
            state
                .stack
                .push(Frame::queue_continuation(QueuePhase::EndOfTurn, active));
            Ok(Outcome::Continue)
        }
        Instruction::TurnOver => turn_over(engine, state),
        _ => Err(InvariantError::CorruptFrame.into()),
    }
}

/// One step of draining a phase queue.
///
/// Resolves the next item when its owner has exactly one pending, prompts
/// the owner when they have several, and yields once the queue is empty.
/// The re-entry continuation is pushed before each item resolves, so the
/// drain is exhaustive no matter how deep an item's cascade goes.
pub(crate) fn drain_step(
    engine: &Engine,
    state: &mut GameState,
    phase: QueuePhase,
) -> Result<Outcome, EngineError> {
    let owner = {
        let queue = state.queues.get(phase);
        match phase {
            // Turn order is meaningless mid-visit; earliest enqueued goes
            // first.
            QueuePhase::PostVisit => queue.first_owner_by_insertion(),
            _ => queue.first_owner_in(state.active_player.all_from(state.player_count())),
        }
    };
    let Some(owner) = owner else {
        return Ok(Outcome::Continue);
    };

    let items = state.queues.get(phase).items_for(owner);
    if items.len() > 1 {
        // The choice handler re-pushes the continuation once the pick
        // resolves.
        set_prompt(
            state,
            owner,
            Prompt::for_queue(phase),
            PromptContext::QueueItems { phase, items },
        );
        return Ok(Outcome::AwaitingInput(owner));
    }

    let id = items[0];
    let item = state
        .queues
        .get_mut(phase)
        .take(id)
        .ok_or(InvariantError::MissingQueueItem(id))?;
    state.stack.push(Frame::queue_continuation(phase, owner));
    tracing::debug!(%owner, phase = phase.name(), item = %item.label, "queue item resolving");
    EffectRegistry::invoke(engine, state, item.owner, item.effect)
}

/// Carry out a visit to a zone: set position, tick the hourglass, push the
/// zone follow-up, and run the arrival effect.
///
/// Used both for the turn's core visit and for forced visits queued by
/// card effects; only the former schedules the post-visit phase, which the
/// visit action handler does before calling here.
pub(crate) fn begin_visit(
    engine: &Engine,
    state: &mut GameState,
    player: PlayerId,
    zone: ZoneId,
) -> Result<Outcome, EngineError> {
    let zone_cfg = engine
        .config()
        .zone(zone)
        .ok_or(InvariantError::MissingZone(zone))?;
    let effect = zone_cfg.effect;
    let start = zone_cfg.hourglass;
    let name = zone_cfg.name.clone();

    state.players[player].position = Some(zone);
    state
        .log
        .info(state.turn_number, format!("{player} visits {name}"));

    if let (Some(start), Some(count)) = (start, state.hourglasses.get_mut(&zone)) {
        *count = count.saturating_sub(1);
        if *count == 0 {
            *count = start;
            state.enqueue_effect(
                QueuePhase::PostVisit,
                EffectId::CommunalPayout.name(),
                EffectId::CommunalPayout,
                player,
            );
            state
                .log
                .info(state.turn_number, format!("the hourglass at {name} runs out"));
        }
    }

    state.stack.push(Frame::zone(zone, Instruction::FollowUp, player));
    EffectRegistry::invoke(engine, state, player, effect)
}

/// Zones the player may pick for a visit: every configured zone except the
/// one they currently occupy.
pub(crate) fn legal_destinations(
    engine: &Engine,
    state: &GameState,
    player: PlayerId,
) -> Vec<ZoneId> {
    let here = state.players[player].position;
    engine
        .config()
        .zones
        .iter()
        .map(|z| z.id)
        .filter(|z| Some(*z) != here)
        .collect()
}

/// Columns the player strictly rules: more crowns there than every other
/// player, and at least one.
pub(crate) fn ruled_columns(state: &GameState, player: PlayerId) -> u32 {
    (0..COLUMN_COUNT)
        .filter(|&c| {
            let mine = state.players[player].score_track[c];
            mine > 0
                && state
                    .players
                    .iter()
                    .all(|(id, p)| id == player || p.score_track[c] < mine)
        })
        .count() as u32
}

/// End of a turn: win check, extra-turn bank, seat advance.
fn turn_over(engine: &Engine, state: &mut GameState) -> Result<Outcome, EngineError> {
    if let Some(result) = &state.result {
        return Ok(Outcome::GameOver(result.clone()));
    }

    let goal = engine.config().crown_goal;
    let reached: Vec<PlayerId> = state
        .players
        .iter()
        .filter(|(_, p)| !p.resigned && p.resources.crowns >= goal)
        .map(|(id, _)| id)
        .collect();
    if !reached.is_empty() {
        let result = match reached.as_slice() {
            [single] => GameResult::Winner(*single),
            _ => GameResult::Winners(reached),
        };
        state
            .log
            .info(state.turn_number, format!("match over: {result}"));
        tracing::info!(%result, "match over");
        state.result = Some(result.clone());
        return Ok(Outcome::GameOver(result));
    }

    let active = state.active_player;
    if state.players[active].extra_turns > 0 {
        state.players[active].extra_turns -= 1;
        state
            .log
            .info(state.turn_number, format!("{active} takes a banked extra turn"));
        push_turn_frames(state);
        return Ok(Outcome::Continue);
    }

    advance_seat(state);
    push_turn_frames(state);
    Ok(Outcome::Continue)
}

/// Move the active seat to the next non-resigned player, bumping the round
/// counter when play wraps back past the first seat.
pub(crate) fn advance_seat(state: &mut GameState) {
    let count = state.player_count();
    let from = state.active_player;
    let mut next = from.next(count);
    let mut wrapped = from.is_last(count);
    while state.players[next].resigned && next != from {
        wrapped |= next.is_last(count);
        next = next.next(count);
    }
    if wrapped {
        state.turn_number += 1;
    }
    state.active_player = next;
}
