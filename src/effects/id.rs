//! Effect identifiers.
//!
//! `EffectId` is a closed enum: the registry matches on it exhaustively, so
//! adding a variant without a handler is a compile error, not a silent
//! runtime fallthrough. Variants cover the three places an effect can be
//! looked up from: zone arrivals, card plays, and queue items.

use serde::{Deserialize, Serialize};

/// Identifier of a registered effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectId {
    // === Zone arrivals ===
    /// Offer scoring of an affordable card.
    ScoringHall,
    /// Flat coin income.
    Mint,
    /// Draw cards from the personal deck.
    Archive,
    /// Offer playing an affordable card.
    Atelier,
    /// Forced discard.
    Rift,
    /// Coin plus the shared hourglass countdown.
    HourglassPlaza,

    // === Card plays ===
    /// Visit two zones of the player's choice in sequence.
    TimeLoop,
    /// Forced visit to the rift.
    RiftCall,
    /// Bank an extra turn.
    SandsOfHaste,

    // === Queue items ===
    /// Start-of-turn coin income (perpetual).
    StartIncome,
    /// End-of-turn card draw (perpetual).
    EndUpkeep,
    /// End-of-turn coins for strictly ruled columns.
    AgeTribute,
    /// Hourglass payout: every remaining player gains a coin.
    CommunalPayout,
}

impl EffectId {
    /// Stable name for labels and the log.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EffectId::ScoringHall => "scoring-hall",
            EffectId::Mint => "mint",
            EffectId::Archive => "archive",
            EffectId::Atelier => "atelier",
            EffectId::Rift => "rift",
            EffectId::HourglassPlaza => "hourglass-plaza",
            EffectId::TimeLoop => "time-loop",
            EffectId::RiftCall => "rift-call",
            EffectId::SandsOfHaste => "sands-of-haste",
            EffectId::StartIncome => "start-income",
            EffectId::EndUpkeep => "end-upkeep",
            EffectId::AgeTribute => "age-tribute",
            EffectId::CommunalPayout => "communal-payout",
        }
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
