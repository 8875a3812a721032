//! Action dispatch: the engine's single entry point for player input.
//!
//! Dispatch runs in three steps. Protocol checks reject malformed or
//! misaddressed input before anything mutates. The handler then runs
//! against the live state with a snapshot held aside; a rule violation
//! rolls the snapshot back, logs a warning, and leaves the prompt open for
//! a retry. Finally the resolve loop is driven until the next suspension
//! and the result is returned as a [`Receipt`].
//!
//! Action ids are the idempotency key: a repeated id is acknowledged with
//! a no-op receipt and the state untouched, so transports may redeliver
//! freely.

use serde::{Deserialize, Serialize};

use crate::core::action::{ActionEnvelope, ActionKind, ActionRecord, PromptRequirement};
use crate::core::ids::{ActionId, ColumnId, QueueItemId, ZoneId};
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::effects::{CardKind, EffectRegistry};
use crate::engine::turn::GameResult;
use crate::engine::{turn, Engine};
use crate::error::{EngineError, InvariantError, ProtocolError, RuleViolation};
use crate::prompt::{clear_prompt, set_prompt, Prompt, PromptContext, PromptState};
use crate::queue::QueuePhase;
use crate::stack::{Frame, Instruction, Outcome};

/// What happened to one delivered action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub action: ActionId,
    /// Whether the delivery changed the state.
    pub applied: bool,
    /// Set when this id had been processed before; the receipt repeats the
    /// standing outcome.
    pub duplicate: bool,
    /// Rule-violation text when the action was rejected and rolled back.
    pub rejection: Option<String>,
    /// Where control stands after this delivery.
    pub outcome: Outcome,
}

impl Engine {
    /// Apply one player action to the state.
    ///
    /// `Err` means the action was rejected at the protocol level and
    /// nothing was recorded. `Ok` means the delivery is committed, whether
    /// it applied, repeated an earlier id, or bounced off a rule.
    pub fn dispatch(
        &self,
        state: &mut GameState,
        envelope: ActionEnvelope,
    ) -> Result<Receipt, EngineError> {
        let ActionEnvelope { id, actor, kind } = envelope;

        if state.has_processed(&id) {
            tracing::debug!(%id, "duplicate delivery acknowledged");
            return Ok(Receipt {
                action: id,
                applied: false,
                duplicate: true,
                rejection: None,
                outcome: standing(state),
            });
        }
        if actor.index() >= state.player_count() {
            return Err(ProtocolError::UnknownActor(actor).into());
        }
        if state.result.is_some() {
            return Err(ProtocolError::MatchOver.into());
        }
        if state.players[actor].resigned {
            return Err(ProtocolError::ActorResigned(actor).into());
        }
        check_prompt(state, actor, &kind)?;

        let snapshot = state.clone();
        let prompt_before = state.players[actor].prompt.clone();
        tracing::debug!(%id, %actor, action = kind.name(), "dispatching");

        let (applied, rejection, outcome) = match self.apply(state, actor, &kind) {
            Ok(Outcome::Continue) => (true, None, self.resolve(state)),
            Ok(other) => (true, None, other),
            Err(EngineError::Rule(violation)) => {
                *state = snapshot;
                state.log.warning(
                    state.turn_number,
                    format!("{actor}: {} rejected: {violation}", kind.name()),
                );
                tracing::warn!(%actor, %violation, "action rejected, state rolled back");
                (false, Some(violation.to_string()), standing(state))
            }
            Err(EngineError::Invariant(err)) => {
                *state = snapshot;
                (true, None, self.recover_dispatch(state, actor, prompt_before, &err))
            }
            Err(other) => return Err(other),
        };

        state.mark_processed(id.clone());
        if applied {
            state.record_action(ActionRecord {
                id: id.clone(),
                actor,
                kind,
                turn: state.turn_number,
            });
        }
        Ok(Receipt {
            action: id,
            applied,
            duplicate: false,
            rejection,
            outcome,
        })
    }

    fn apply(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        kind: &ActionKind,
    ) -> Result<Outcome, EngineError> {
        match kind {
            ActionKind::Visit { zone } => self.handle_visit(state, actor, *zone),
            ActionKind::ScoreCard { hand_index } => {
                self.handle_score_card(state, actor, *hand_index)
            }
            ActionKind::PlayCard { hand_index } => {
                self.handle_play_card(state, actor, *hand_index)
            }
            ActionKind::Discard { hand_indices } => {
                self.handle_discard(state, actor, hand_indices)
            }
            ActionKind::AdvanceCrowns { column } => {
                self.handle_advance_crowns(state, actor, *column)
            }
            ActionKind::MoveTo { zone } => self.handle_move_to(state, actor, *zone),
            ActionKind::ChooseQueueItem { item } => {
                self.handle_choose_queue_item(state, actor, *item)
            }
            ActionKind::Pass => self.handle_pass(state, actor),
            ActionKind::Resign => self.handle_resign(state, actor),
        }
    }

    /// Answer the core-action prompt: schedule end-of-turn processing and
    /// the post-visit drain beneath the visit, then carry the visit out.
    fn handle_visit(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        zone: ZoneId,
    ) -> Result<Outcome, EngineError> {
        let legal = match prompt_context(state, actor)? {
            PromptContext::Zones { legal } => legal,
            _ => return Err(InvariantError::MissingPromptContext(actor).into()),
        };
        if !legal.contains(&zone) {
            return Err(RuleViolation::ZoneNotLegal(zone).into());
        }

        clear_prompt(state, actor);
        state.legal_zones.clear();

        state.stack.push(Frame::marker(Instruction::EndTurn, actor));
        turn::populate_phase_queue(state, QueuePhase::PostVisit);
        state
            .stack
            .push(Frame::queue_continuation(QueuePhase::PostVisit, actor));
        turn::begin_visit(self, state, actor, zone)
    }

    fn handle_score_card(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        hand_index: usize,
    ) -> Result<Outcome, EngineError> {
        let affordable = match prompt_context(state, actor)? {
            PromptContext::CardChoice { affordable } => affordable,
            _ => return Err(InvariantError::MissingPromptContext(actor).into()),
        };
        if !affordable.contains(&hand_index) {
            return Err(RuleViolation::InvalidHandIndex(hand_index).into());
        }

        let card = state
            .remove_hand_index(actor, hand_index)
            .ok_or(RuleViolation::InvalidHandIndex(hand_index))?;
        let def = self
            .cards()
            .get(card)
            .ok_or(InvariantError::MissingCard(card))?
            .clone();

        state.players[actor].resources.coins -= def.cost;
        state.players[actor].discard.push(card);
        state.log.info(
            state.turn_number,
            format!("{actor} scores {} for {} crowns", def.name, def.score),
        );

        clear_prompt(state, actor);
        set_prompt(
            state,
            actor,
            Prompt::Advance,
            PromptContext::Crowns { count: def.score },
        );
        Ok(Outcome::AwaitingInput(actor))
    }

    fn handle_play_card(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        hand_index: usize,
    ) -> Result<Outcome, EngineError> {
        let affordable = match prompt_context(state, actor)? {
            PromptContext::CardChoice { affordable } => affordable,
            _ => return Err(InvariantError::MissingPromptContext(actor).into()),
        };
        if !affordable.contains(&hand_index) {
            return Err(RuleViolation::InvalidHandIndex(hand_index).into());
        }

        let card = state
            .remove_hand_index(actor, hand_index)
            .ok_or(RuleViolation::InvalidHandIndex(hand_index))?;
        let def = self
            .cards()
            .get(card)
            .ok_or(InvariantError::MissingCard(card))?
            .clone();

        state.players[actor].resources.coins -= def.cost;
        state
            .log
            .info(state.turn_number, format!("{actor} plays {}", def.name));
        clear_prompt(state, actor);

        match def.kind {
            CardKind::Perpetual => {
                let (effect, phase) = def
                    .effect
                    .zip(def.phase)
                    .ok_or(InvariantError::MalformedCard(card))?;
                state.players[actor].cards_in_play.push(card);
                state.players[actor].perpetual.get_mut(phase).push(effect);
                Ok(Outcome::Continue)
            }
            CardKind::Momentary => {
                state
                    .stack
                    .push(Frame::card(card, Instruction::FollowUp, actor));
                match def.effect {
                    Some(effect) => EffectRegistry::invoke(self, state, actor, effect),
                    None => Ok(Outcome::Continue),
                }
            }
        }
    }

    fn handle_discard(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        hand_indices: &[usize],
    ) -> Result<Outcome, EngineError> {
        let count = match prompt_context(state, actor)? {
            PromptContext::DiscardCount { count } => count,
            _ => return Err(InvariantError::MissingPromptContext(actor).into()),
        };

        let mut sorted: Vec<usize> = hand_indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != count || hand_indices.len() != count {
            return Err(RuleViolation::WrongDiscardCount {
                expected: count,
                got: hand_indices.len(),
            }
            .into());
        }
        let hand_len = state.hand(actor).len();
        if let Some(&bad) = sorted.iter().find(|&&i| i >= hand_len) {
            return Err(RuleViolation::InvalidHandIndex(bad).into());
        }

        // Highest index first so earlier removals do not shift later ones.
        for &index in sorted.iter().rev() {
            if let Some(card) = state.remove_hand_index(actor, index) {
                state.players[actor].discard.push(card);
            }
        }
        state
            .log
            .info(state.turn_number, format!("{actor} discards {count}"));
        clear_prompt(state, actor);
        Ok(Outcome::Continue)
    }

    fn handle_advance_crowns(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        column: ColumnId,
    ) -> Result<Outcome, EngineError> {
        let count = match prompt_context(state, actor)? {
            PromptContext::Crowns { count } => count,
            _ => return Err(InvariantError::MissingPromptContext(actor).into()),
        };
        // Ids arriving over the wire bypass the checked constructor.
        let Some(column) = ColumnId::try_new(column.0) else {
            return Err(RuleViolation::InvalidColumn(column).into());
        };

        let player = &mut state.players[actor];
        player.score_track[column.index()] += count;
        player.resources.crowns += count;
        state.log.info(
            state.turn_number,
            format!("{actor} advances {count} crowns in column {column}"),
        );
        clear_prompt(state, actor);
        Ok(Outcome::Continue)
    }

    fn handle_move_to(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        zone: ZoneId,
    ) -> Result<Outcome, EngineError> {
        let legal = match prompt_context(state, actor)? {
            PromptContext::Zones { legal } => legal,
            _ => return Err(InvariantError::MissingPromptContext(actor).into()),
        };
        if !legal.contains(&zone) {
            return Err(RuleViolation::ZoneNotLegal(zone).into());
        }

        clear_prompt(state, actor);
        state.legal_zones.clear();
        state
            .stack
            .push(Frame::zone(zone, Instruction::Arrive, actor));
        Ok(Outcome::Continue)
    }

    fn handle_choose_queue_item(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        item: QueueItemId,
    ) -> Result<Outcome, EngineError> {
        let (phase, items) = match prompt_context(state, actor)? {
            PromptContext::QueueItems { phase, items } => (phase, items),
            _ => return Err(InvariantError::MissingPromptContext(actor).into()),
        };
        if !items.contains(&item) {
            return Err(RuleViolation::ItemNotOffered(item).into());
        }

        let chosen = state
            .queues
            .get_mut(phase)
            .take(item)
            .ok_or(InvariantError::MissingQueueItem(item))?;
        clear_prompt(state, actor);
        state.log.info(
            state.turn_number,
            format!("{actor} resolves {} first", chosen.label),
        );
        // Re-enter the drain for the remaining items once this one is done.
        state.stack.push(Frame::queue_continuation(phase, actor));
        EffectRegistry::invoke(self, state, chosen.owner, chosen.effect)
    }

    fn handle_pass(
        &self,
        state: &mut GameState,
        actor: PlayerId,
    ) -> Result<Outcome, EngineError> {
        state
            .log
            .info(state.turn_number, format!("{actor} declines"));
        clear_prompt(state, actor);
        Ok(Outcome::Continue)
    }

    fn handle_resign(
        &self,
        state: &mut GameState,
        actor: PlayerId,
    ) -> Result<Outcome, EngineError> {
        let prompt = state.players[actor].prompt.clone();
        state.players[actor].resigned = true;
        clear_prompt(state, actor);
        for phase in [
            QueuePhase::StartOfTurn,
            QueuePhase::PostVisit,
            QueuePhase::EndOfTurn,
        ] {
            state.queues.get_mut(phase).remove_owner(actor);
        }
        state
            .log
            .info(state.turn_number, format!("{actor} resigns"));
        tracing::info!(%actor, "player resigned");

        let remaining: Vec<PlayerId> = state
            .players
            .iter()
            .filter(|(_, p)| !p.resigned)
            .map(|(id, _)| id)
            .collect();
        match remaining.as_slice() {
            [] => {
                state.stack.clear();
                let result = GameResult::Draw;
                state.result = Some(result.clone());
                return Ok(Outcome::GameOver(result));
            }
            [last] => {
                // The abandoned turn's frames have nothing left to run.
                state.stack.clear();
                let result = GameResult::Winner(*last);
                state
                    .log
                    .info(state.turn_number, format!("match over: {result}"));
                state.result = Some(result.clone());
                return Ok(Outcome::GameOver(result));
            }
            _ => {}
        }

        if actor == state.active_player {
            // The turn is abandoned wholesale: pending follow-ups and this
            // turn's queued effects go with it.
            state.stack.clear();
            for phase in [
                QueuePhase::StartOfTurn,
                QueuePhase::PostVisit,
                QueuePhase::EndOfTurn,
            ] {
                state.queues.get_mut(phase).clear();
            }
            // Any queue-choice prompt elsewhere pointed into those queues.
            let holders: Vec<PlayerId> = state
                .players
                .iter()
                .filter(|(_, p)| p.prompt.is_some())
                .map(|(id, _)| id)
                .collect();
            for holder in holders {
                clear_prompt(state, holder);
            }
            state.legal_zones.clear();
            turn::advance_seat(state);
            turn::push_turn_frames(state);
        } else if let Some(PromptState {
            context: PromptContext::QueueItems { phase, .. },
            ..
        }) = prompt
        {
            // The resigner held up a queue drain; resume it.
            state.stack.push(Frame::queue_continuation(phase, state.active_player));
        }
        // A bystander's exit must not disturb a suspension elsewhere: if
        // somebody else still owes an answer, hold there instead of
        // resolving past their frames.
        Ok(standing(state))
    }

    /// Forward recovery for an internal inconsistency hit while applying an
    /// action: roll back happened in the caller; here the stale prompt is
    /// discarded, its origin re-issued where that is possible, and
    /// resolution continues.
    fn recover_dispatch(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        prompt: Option<PromptState>,
        err: &InvariantError,
    ) -> Outcome {
        state.audit.invariant_violations += 1;
        state.audit.dropped_effects += 1;
        state.log.error(
            state.turn_number,
            format!("recovered from internal inconsistency: {err}"),
        );
        tracing::error!(%err, %actor, "invariant violated during dispatch");

        clear_prompt(state, actor);
        match prompt {
            Some(PromptState {
                context: PromptContext::QueueItems { phase, .. },
                ..
            }) => {
                // The drain recomputes a consistent choice from the queue.
                state.stack.push(Frame::queue_continuation(phase, actor));
            }
            Some(PromptState {
                kind: Prompt::Visit,
                ..
            }) => {
                state
                    .stack
                    .push(Frame::marker(Instruction::CoreAction, actor));
            }
            _ => {}
        }
        self.resolve(state)
    }
}

/// Where control currently stands, for receipts that did not resolve
/// anything.
fn standing(state: &GameState) -> Outcome {
    if let Some(result) = &state.result {
        return Outcome::GameOver(result.clone());
    }
    match state.any_prompt() {
        Some(player) => Outcome::AwaitingInput(player),
        None => Outcome::Continue,
    }
}

/// The central prompt check: every action except `Resign` must be a valid
/// answer to the actor's outstanding prompt. Handlers never re-check this.
fn check_prompt(
    state: &GameState,
    actor: PlayerId,
    kind: &ActionKind,
) -> Result<(), ProtocolError> {
    let held = state.players[actor].prompt.as_ref().map(|p| p.kind);
    let ok = match kind.requirement() {
        PromptRequirement::Free => true,
        PromptRequirement::Exact(expected) => held == Some(expected),
        PromptRequirement::Declinable => held.is_some_and(Prompt::is_declinable),
        PromptRequirement::QueueChoice => held.is_some_and(Prompt::is_queue_choice),
    };
    if ok {
        Ok(())
    } else {
        Err(ProtocolError::PromptMismatch {
            actor,
            action: kind.name(),
            expected: held.map_or_else(|| "no prompt".to_string(), |p| p.name().to_string()),
        })
    }
}

/// Clone the context of the actor's outstanding prompt.
fn prompt_context(state: &GameState, actor: PlayerId) -> Result<PromptContext, EngineError> {
    state.players[actor]
        .prompt
        .as_ref()
        .map(|p| p.context.clone())
        .ok_or_else(|| InvariantError::MissingPromptContext(actor).into())
}
