//! Match configuration.
//!
//! A `GameConfig` is built once at match creation and owned by the
//! [`Engine`](crate::engine::Engine). It never changes during a match; all
//! dynamic data lives in `GameState`.

use serde::{Deserialize, Serialize};

use crate::core::ids::{CardId, ZoneId};
use crate::effects::EffectId;

/// Configuration of a visitable board zone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub id: ZoneId,

    /// Human-readable name for the log and display.
    pub name: String,

    /// Arrival effect invoked when a player visits this zone.
    pub effect: EffectId,

    /// Shared countdown. Each visit decrements it; at zero a communal
    /// payout is queued and the counter resets to this value.
    pub hourglass: Option<u8>,
}

impl ZoneConfig {
    pub fn new(id: ZoneId, name: impl Into<String>, effect: EffectId) -> Self {
        Self {
            id,
            name: name.into(),
            effect,
            hourglass: None,
        }
    }

    /// Give the zone a shared hourglass counter.
    #[must_use]
    pub fn with_hourglass(mut self, start: u8) -> Self {
        self.hourglass = Some(start);
        self
    }
}

/// Complete match configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats (2-255).
    pub player_count: usize,

    /// The board.
    pub zones: Vec<ZoneConfig>,

    /// Crowns advanced onto the score track needed to complete it.
    pub crown_goal: u32,

    /// Coins each player starts with.
    pub starting_coins: i64,

    /// Cards drawn from the personal deck at setup.
    pub starting_hand: usize,

    /// Personal deck composition, identical for every player.
    pub deck: Vec<CardId>,

    /// Maximum retained match-log entries.
    pub log_cap: usize,
}

impl GameConfig {
    pub fn new(player_count: usize) -> Self {
        assert!(player_count >= 2, "Must have at least 2 players");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            player_count,
            zones: Vec::new(),
            crown_goal: 10,
            starting_coins: 3,
            starting_hand: 4,
            deck: Vec::new(),
            log_cap: 200,
        }
    }

    #[must_use]
    pub fn with_zone(mut self, zone: ZoneConfig) -> Self {
        self.zones.push(zone);
        self
    }

    #[must_use]
    pub fn with_crown_goal(mut self, goal: u32) -> Self {
        self.crown_goal = goal;
        self
    }

    #[must_use]
    pub fn with_starting_coins(mut self, coins: i64) -> Self {
        self.starting_coins = coins;
        self
    }

    #[must_use]
    pub fn with_starting_hand(mut self, cards: usize) -> Self {
        self.starting_hand = cards;
        self
    }

    #[must_use]
    pub fn with_deck(mut self, deck: Vec<CardId>) -> Self {
        self.deck = deck;
        self
    }

    #[must_use]
    pub fn zone(&self, id: ZoneId) -> Option<&ZoneConfig> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// The standard board: one zone per arrival mechanism, including an
    /// hourglass zone, paired with [`CardLibrary::standard`].
    ///
    /// [`CardLibrary::standard`]: crate::effects::CardLibrary::standard
    pub fn standard(player_count: usize) -> Self {
        use crate::effects::standard_cards;

        Self::new(player_count)
            .with_zone(ZoneConfig::new(
                zones::HALL_OF_AGES,
                "Hall of Ages",
                EffectId::ScoringHall,
            ))
            .with_zone(ZoneConfig::new(zones::MINT, "Mint", EffectId::Mint))
            .with_zone(ZoneConfig::new(zones::ARCHIVE, "Archive", EffectId::Archive))
            .with_zone(ZoneConfig::new(zones::ATELIER, "Atelier", EffectId::Atelier))
            .with_zone(ZoneConfig::new(zones::RIFT, "Rift", EffectId::Rift))
            .with_zone(
                ZoneConfig::new(
                    zones::HOURGLASS_PLAZA,
                    "Hourglass Plaza",
                    EffectId::HourglassPlaza,
                )
                .with_hourglass(3),
            )
            .with_deck(standard_cards::standard_deck())
    }
}

/// Zone ids of the standard board.
pub mod zones {
    use crate::core::ids::ZoneId;

    pub const HALL_OF_AGES: ZoneId = ZoneId(1);
    pub const MINT: ZoneId = ZoneId(2);
    pub const ARCHIVE: ZoneId = ZoneId(3);
    pub const ATELIER: ZoneId = ZoneId(4);
    pub const RIFT: ZoneId = ZoneId(5);
    pub const HOURGLASS_PLAZA: ZoneId = ZoneId(6);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = GameConfig::new(3)
            .with_crown_goal(12)
            .with_starting_coins(5)
            .with_zone(ZoneConfig::new(ZoneId::new(9), "Test", EffectId::Mint));

        assert_eq!(config.player_count, 3);
        assert_eq!(config.crown_goal, 12);
        assert_eq!(config.starting_coins, 5);
        assert!(config.zone(ZoneId::new(9)).is_some());
        assert!(config.zone(ZoneId::new(99)).is_none());
    }

    #[test]
    fn test_standard_board() {
        let config = GameConfig::standard(2);

        assert_eq!(config.zones.len(), 6);
        let plaza = config.zone(zones::HOURGLASS_PLAZA).unwrap();
        assert_eq!(plaza.hourglass, Some(3));
        assert!(!config.deck.is_empty());
    }

    #[test]
    #[should_panic(expected = "at least 2 players")]
    fn test_single_player_rejected() {
        GameConfig::new(1);
    }
}
