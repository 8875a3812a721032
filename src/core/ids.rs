//! Identifier newtypes.
//!
//! Every domain object is referenced through a typed id rather than a raw
//! integer or string. The engine never interprets the numeric values; they
//! index into the configuration (zones, card library) or into per-match
//! allocations (queue items).

use serde::{Deserialize, Serialize};

/// Identifier of a match, assigned by the embedding application.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "game {}", self.0)
    }
}

/// Identifier of a card definition in the card library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Identifier of a visitable board zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u16);

impl ZoneId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zone({})", self.0)
    }
}

/// Identifier of a pending queue item, allocated per match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueItemId(pub u32);

impl QueueItemId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for QueueItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "QueueItem({})", self.0)
    }
}

/// One of the four ordered crown columns on the score track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId(pub u8);

/// Number of crown columns on the score track.
pub const COLUMN_COUNT: usize = 4;

impl ColumnId {
    /// Create a column id. Panics if out of range; use [`ColumnId::try_new`]
    /// for untrusted input.
    #[must_use]
    pub fn new(id: u8) -> Self {
        assert!((id as usize) < COLUMN_COUNT, "column out of range");
        Self(id)
    }

    /// Create a column id from untrusted input.
    #[must_use]
    pub fn try_new(id: u8) -> Option<Self> {
        if (id as usize) < COLUMN_COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all columns in order.
    pub fn all() -> impl Iterator<Item = ColumnId> {
        (0..COLUMN_COUNT as u8).map(ColumnId)
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Column({})", self.0)
    }
}

/// Transport-supplied unique identifier of one action envelope.
///
/// The dispatcher records every processed id; a repeated id is a committed
/// no-op. This is the sole defense against duplicate delivery.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
