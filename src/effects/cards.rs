//! Card definitions and the card library.
//!
//! A definition is static rule data: cost, crown value, momentary vs.
//! perpetual, and an optional effect. The library is the lookup table the
//! registry resolves card ids through; a missing entry on a live path is an
//! invariant violation, not a rules question.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::ids::CardId;
use crate::effects::EffectId;
use crate::queue::QueuePhase;

/// Whether a card's effect fires once or recurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    /// Fires once when played, then goes to the discard pile.
    Momentary,
    /// Stays in play; its effect is queued every time its phase comes up.
    Perpetual,
}

/// Static definition of one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDef {
    pub id: CardId,
    pub name: String,
    /// Coins to score or play this card.
    pub cost: i64,
    /// Crowns granted when scored.
    pub score: u32,
    pub kind: CardKind,
    /// Effect fired on play (momentary) or queued each phase (perpetual).
    pub effect: Option<EffectId>,
    /// For perpetual cards: the phase whose queue receives the effect.
    pub phase: Option<QueuePhase>,
}

impl CardDef {
    /// A plain scoring card with no effect.
    pub fn scoring(id: CardId, name: impl Into<String>, cost: i64, score: u32) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            score,
            kind: CardKind::Momentary,
            effect: None,
            phase: None,
        }
    }

    /// A momentary card with a play effect.
    pub fn momentary(id: CardId, name: impl Into<String>, cost: i64, effect: EffectId) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            score: 0,
            kind: CardKind::Momentary,
            effect: Some(effect),
            phase: None,
        }
    }

    /// A perpetual card whose effect recurs in the given phase.
    pub fn perpetual(
        id: CardId,
        name: impl Into<String>,
        cost: i64,
        effect: EffectId,
        phase: QueuePhase,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            score: 0,
            kind: CardKind::Perpetual,
            effect: Some(effect),
            phase: Some(phase),
        }
    }
}

/// Lookup table of card definitions.
#[derive(Clone, Debug, Default)]
pub struct CardLibrary {
    defs: FxHashMap<CardId, CardDef>,
}

impl CardLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: CardDef) {
        self.defs.insert(def.id, def);
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDef> {
        self.defs.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// The standard card set, paired with
    /// [`GameConfig::standard`](crate::core::config::GameConfig::standard).
    #[must_use]
    pub fn standard() -> Self {
        let mut lib = Self::new();
        for def in standard_cards::all() {
            lib.register(def);
        }
        lib
    }
}

/// Card ids and definitions of the standard set.
pub mod standard_cards {
    use super::*;

    pub const SUNDIAL: CardId = CardId(1);
    pub const WATER_CLOCK: CardId = CardId(2);
    pub const ASTROLABE: CardId = CardId(3);
    pub const OBELISK: CardId = CardId(4);
    pub const TIME_LOOP: CardId = CardId(10);
    pub const RIFT_CALL: CardId = CardId(11);
    pub const SANDS_OF_HASTE: CardId = CardId(12);
    pub const GILDED_RELIC: CardId = CardId(20);
    pub const CHRONOMETER: CardId = CardId(21);

    pub fn all() -> Vec<CardDef> {
        vec![
            CardDef::scoring(SUNDIAL, "Sundial", 1, 1),
            CardDef::scoring(WATER_CLOCK, "Water Clock", 2, 2),
            CardDef::scoring(ASTROLABE, "Astrolabe", 3, 3),
            CardDef::scoring(OBELISK, "Obelisk", 4, 4),
            CardDef::momentary(TIME_LOOP, "Time Loop", 2, EffectId::TimeLoop),
            CardDef::momentary(RIFT_CALL, "Rift Call", 1, EffectId::RiftCall),
            CardDef::momentary(SANDS_OF_HASTE, "Sands of Haste", 3, EffectId::SandsOfHaste),
            CardDef::perpetual(
                GILDED_RELIC,
                "Gilded Relic",
                2,
                EffectId::StartIncome,
                QueuePhase::StartOfTurn,
            ),
            CardDef::perpetual(
                CHRONOMETER,
                "Chronometer",
                2,
                EffectId::EndUpkeep,
                QueuePhase::EndOfTurn,
            ),
        ]
    }

    /// Personal deck composition for the standard set.
    pub fn standard_deck() -> Vec<CardId> {
        vec![
            SUNDIAL,
            SUNDIAL,
            WATER_CLOCK,
            WATER_CLOCK,
            ASTROLABE,
            ASTROLABE,
            OBELISK,
            TIME_LOOP,
            RIFT_CALL,
            SANDS_OF_HASTE,
            GILDED_RELIC,
            CHRONOMETER,
        ]
    }
}
