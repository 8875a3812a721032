//! Foundation types: identifiers, players, configuration, RNG, actions,
//! the match log, and the authoritative [`state::GameState`].

pub mod action;
pub mod config;
pub mod ids;
pub mod log;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionEnvelope, ActionKind, ActionRecord, PromptRequirement};
pub use config::{zones, GameConfig, ZoneConfig};
pub use ids::{ActionId, CardId, ColumnId, GameId, QueueItemId, ZoneId, COLUMN_COUNT};
pub use log::{AuditCounters, LogEntry, LogLevel, MatchLog};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::{GameState, PlayerState, PlayerView, PrivateState, Resources};
