//! Match persistence and the dispatch-per-delivery service wrapper.
//!
//! A match is stored as two records: the public snapshot (private section
//! blanked) and the private section (hands and decks). [`GameStore`]
//! implementations must commit both atomically; loading cross-checks the
//! private hand sizes against the public mirrors and refuses a torn pair.
//!
//! [`MatchService`] is the restart-resumable loop: load, dispatch, commit.
//! One commit per delivery, after the action fully resolved; a protocol
//! rejection commits nothing.

use rustc_hash::FxHashMap;

use crate::core::action::ActionEnvelope;
use crate::core::ids::GameId;
use crate::core::player::PlayerId;
use crate::core::state::{GameState, PlayerView};
use crate::engine::{Engine, Receipt};
use crate::error::{EngineError, StoreError};
use crate::stack::Outcome;

/// Durable storage for matches.
pub trait GameStore {
    fn load(&self, id: &GameId) -> Result<GameState, StoreError>;
    fn commit(&mut self, id: &GameId, state: &GameState) -> Result<(), StoreError>;
    fn remove(&mut self, id: &GameId) -> Result<(), StoreError>;
}

/// The two records of one stored match, written together.
#[derive(Clone, Debug)]
struct StoredMatch {
    public: Vec<u8>,
    private: Vec<u8>,
}

/// In-memory store. The single map insert makes the two-record commit
/// atomic; a durable backend would use one transaction instead.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: FxHashMap<GameId, StoredMatch>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl GameStore for MemoryStore {
    fn load(&self, id: &GameId) -> Result<GameState, StoreError> {
        let record = self
            .records
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut state: GameState = bincode::deserialize(&record.public)
            .map_err(|e| StoreError::Codec(e.to_string()))?;
        let private = bincode::deserialize(&record.private)
            .map_err(|e| StoreError::Codec(e.to_string()))?;
        state.attach_private(private).map_err(|detail| StoreError::Torn {
            id: id.clone(),
            detail,
        })?;
        Ok(state)
    }

    fn commit(&mut self, id: &GameId, state: &GameState) -> Result<(), StoreError> {
        let private = bincode::serialize(&state.detach_private())
            .map_err(|e| StoreError::Codec(e.to_string()))?;
        let mut public_state = state.clone();
        public_state.strip_private();
        let public = bincode::serialize(&public_state)
            .map_err(|e| StoreError::Codec(e.to_string()))?;

        self.records.insert(id.clone(), StoredMatch { public, private });
        Ok(())
    }

    fn remove(&mut self, id: &GameId) -> Result<(), StoreError> {
        self.records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

/// Engine plus store: the full load-dispatch-commit cycle per delivery.
pub struct MatchService<S: GameStore> {
    engine: Engine,
    store: S,
}

impl<S: GameStore> MatchService<S> {
    pub fn new(engine: Engine, store: S) -> Self {
        Self { engine, store }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Create and persist a new match, returning its first suspension.
    pub fn create(&mut self, id: &GameId, seed: u64) -> Result<Outcome, EngineError> {
        let (state, outcome) = self.engine.new_match(seed);
        self.store.commit(id, &state)?;
        tracing::info!(%id, seed, "match created");
        Ok(outcome)
    }

    /// Handle one delivered action: load, dispatch, commit.
    ///
    /// Protocol rejections propagate as `Err` and commit nothing, so the
    /// stored match is untouched by garbage input.
    pub fn handle(&mut self, id: &GameId, envelope: ActionEnvelope) -> Result<Receipt, EngineError> {
        let mut state = self.store.load(id)?;
        let receipt = self.engine.dispatch(&mut state, envelope)?;
        self.store.commit(id, &state)?;
        Ok(receipt)
    }

    /// A player's redacted view of a stored match.
    pub fn view(&self, id: &GameId, viewer: PlayerId) -> Result<PlayerView, EngineError> {
        let state = self.store.load(id)?;
        Ok(state.view_for(viewer))
    }

    /// Delete a finished match.
    pub fn remove(&mut self, id: &GameId) -> Result<(), EngineError> {
        self.store.remove(id)?;
        Ok(())
    }
}
