//! The effect registry: one exhaustive match from [`EffectId`] to behavior.

use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::effects::{handlers, EffectId};
use crate::engine::{turn, Engine};
use crate::error::{EngineError, InvariantError};
use crate::stack::{Frame, FrameKind, Instruction, Outcome};

/// Maps effect identifiers and suspended frames to their handlers.
///
/// A unit struct rather than a lookup table: the effect set is closed, and
/// the compiler rejects a variant without an arm here.
pub struct EffectRegistry;

impl EffectRegistry {
    /// Run an effect for a player.
    pub fn invoke(
        engine: &Engine,
        state: &mut GameState,
        actor: PlayerId,
        effect: EffectId,
    ) -> Result<Outcome, EngineError> {
        tracing::debug!(%actor, %effect, "effect invoked");
        match effect {
            EffectId::ScoringHall => handlers::arrive_scoring_hall(engine, state, actor),
            EffectId::Mint => handlers::arrive_mint(state, actor),
            EffectId::Archive => handlers::arrive_archive(state, actor),
            EffectId::Atelier => handlers::arrive_atelier(engine, state, actor),
            EffectId::Rift => handlers::arrive_rift(state, actor),
            EffectId::HourglassPlaza => handlers::arrive_hourglass_plaza(state, actor),
            EffectId::TimeLoop => handlers::play_time_loop(engine, state, actor),
            EffectId::RiftCall => handlers::play_rift_call(state, actor),
            EffectId::SandsOfHaste => handlers::play_sands_of_haste(state, actor),
            EffectId::StartIncome => handlers::queue_start_income(state, actor),
            EffectId::EndUpkeep => handlers::queue_end_upkeep(state, actor),
            EffectId::AgeTribute => handlers::queue_age_tribute(state, actor),
            EffectId::CommunalPayout => handlers::queue_communal_payout(state),
        }
    }

    /// Resume a zone or card frame popped off the resolution stack.
    pub fn continue_frame(
        engine: &Engine,
        state: &mut GameState,
        frame: &Frame,
    ) -> Result<Outcome, EngineError> {
        match (frame.kind, frame.instruction) {
            (FrameKind::Zone, Instruction::Arrive) => {
                turn::begin_visit(engine, state, frame.owner, frame.as_zone())
            }
            (FrameKind::Zone, Instruction::FollowUp) => {
                let name = engine
                    .config()
                    .zone(frame.as_zone())
                    .map_or_else(|| frame.as_zone().to_string(), |z| z.name.clone());
                state.log.info(
                    state.turn_number,
                    format!("{} finishes at {name}", frame.owner),
                );
                Ok(Outcome::Continue)
            }
            (FrameKind::Card, Instruction::FollowUp) => {
                handlers::finish_card(state, frame.owner, frame.as_card())
            }
            (FrameKind::Card, Instruction::FirstPlay) => {
                handlers::time_loop_second_visit(engine, state, frame)
            }
            (FrameKind::Card, Instruction::SecondPlay) => {
                tracing::debug!(owner = %frame.owner, card = %frame.as_card(), "second replay done");
                Ok(Outcome::Continue)
            }
            _ => Err(InvariantError::CorruptFrame.into()),
        }
    }
}
