//! The engine: resolve loop, action dispatch, and turn control.
//!
//! An [`Engine`] is immutable rule data (configuration plus card library)
//! wired up once at construction. All mutable state lives in one owned
//! [`GameState`] that callers pass in by `&mut`; the engine holds no state
//! of its own and a single `Engine` can serve any number of matches.
//!
//! The resolve loop pops frames off the resolution stack until something
//! suspends. Every outcome is an explicit [`Outcome`] return value; nothing
//! downstream polls the state to discover whether a prompt was raised.

pub mod dispatch;
pub mod turn;

pub use dispatch::Receipt;
pub use turn::GameResult;

use crate::core::config::GameConfig;
use crate::core::state::GameState;
use crate::effects::{CardLibrary, EffectRegistry};
use crate::error::{EngineError, InvariantError};
use crate::stack::{Frame, FrameKind, Instruction, Outcome};

/// Immutable rule data for running matches.
pub struct Engine {
    config: GameConfig,
    cards: CardLibrary,
}

impl Engine {
    /// Engine over a configuration and the standard card library.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_cards(config, CardLibrary::standard())
    }

    /// Engine with a custom card library.
    #[must_use]
    pub fn with_cards(config: GameConfig, cards: CardLibrary) -> Self {
        Self { config, cards }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn cards(&self) -> &CardLibrary {
        &self.cards
    }

    /// Set up a match and run it to its first suspension (the opening
    /// visit prompt, unless a start-of-turn effect prompts earlier).
    #[must_use]
    pub fn new_match(&self, seed: u64) -> (GameState, Outcome) {
        let mut state = GameState::new(&self.config, seed);
        state.log.info(
            state.turn_number,
            format!("match created with {} players", self.config.player_count),
        );
        turn::push_turn_frames(&mut state);
        let outcome = self.resolve(&mut state);
        (state, outcome)
    }

    /// Pop and run frames until a prompt suspends, the match ends, or the
    /// stack empties.
    ///
    /// Terminates structurally: each iteration pops one frame, and a frame
    /// that pushes replacements either suspends on a prompt or makes
    /// strictly bounded progress through the turn lifecycle.
    pub(crate) fn resolve(&self, state: &mut GameState) -> Outcome {
        loop {
            if let Some(result) = &state.result {
                return Outcome::GameOver(result.clone());
            }
            let Some(frame) = state.stack.pop() else {
                // An empty stack is a resting position only while somebody
                // owes an answer. Without one, lifecycle frames were lost
                // to a recovery; re-issue the core action rather than
                // strand the match.
                match state.any_prompt() {
                    Some(player) => return Outcome::AwaitingInput(player),
                    None => {
                        state
                            .stack
                            .push(Frame::marker(Instruction::CoreAction, state.active_player));
                        continue;
                    }
                }
            };

            let outcome = match self.step(state, &frame) {
                Ok(outcome) => outcome,
                Err(err) => self.recover_frame(state, err),
            };
            match outcome {
                Outcome::Continue => continue,
                other => return other,
            }
        }
    }

    fn step(&self, state: &mut GameState, frame: &Frame) -> Result<Outcome, EngineError> {
        match frame.kind {
            FrameKind::Zone | FrameKind::Card => {
                EffectRegistry::continue_frame(self, state, frame)
            }
            FrameKind::QueueContinuation => {
                let phase = frame.as_phase().ok_or(InvariantError::CorruptFrame)?;
                turn::drain_step(self, state, phase)
            }
            FrameKind::Marker => turn::marker_step(self, state, frame),
        }
    }

    /// A frame failed to resolve. Drop it, count it, and let the loop
    /// continue with whatever sits beneath; the empty-stack guard above
    /// re-issues the core action if the turn was stranded.
    fn recover_frame(&self, state: &mut GameState, err: EngineError) -> Outcome {
        state.audit.invariant_violations += 1;
        state.audit.dropped_effects += 1;
        state.log.error(
            state.turn_number,
            format!("recovered from internal inconsistency: {err}"),
        );
        tracing::error!(%err, "frame dropped during resolution");
        Outcome::Continue
    }
}
