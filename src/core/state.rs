//! Authoritative match state.
//!
//! One `GameState` value owns everything dynamic about a match: players,
//! the resolution stack, the three effect queues, prompts, the log, and the
//! private section (hands and decks). Handlers receive it by `&mut` for the
//! duration of one dispatch; no component keeps a reference across
//! dispatches.
//!
//! ## Public vs. private
//!
//! Hand and deck contents live in [`PrivateState`], persisted as a separate
//! record committed atomically with the public snapshot. Other players only
//! ever observe `hand_count`; redaction for clients happens in
//! [`GameState::view_for`].

use im::{HashSet as ImHashSet, Vector};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::action::ActionRecord;
use crate::core::config::GameConfig;
use crate::core::ids::{ActionId, CardId, ZoneId, COLUMN_COUNT};
use crate::core::log::{AuditCounters, LogEntry, MatchLog};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::GameRng;
use crate::effects::EffectId;
use crate::engine::GameResult;
use crate::prompt::PromptState;
use crate::queue::{EffectQueue, PerPhase, QueueItem, QueuePhase};
use crate::stack::ResolutionStack;

/// Spendable and scored resources of one player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub coins: i64,
    /// Total crowns advanced onto the score track.
    pub crowns: u32,
}

/// Public per-player state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    pub resources: Resources,

    /// Crowns placed per ordered column.
    pub score_track: [u32; COLUMN_COUNT],

    /// Current board position, if the player has visited anywhere yet.
    pub position: Option<ZoneId>,

    /// Perpetual cards generating recurring effects.
    pub cards_in_play: Vec<CardId>,

    /// Face-up discard pile.
    pub discard: Vec<CardId>,

    /// Recurring effects bucketed by the phase whose queue receives them.
    pub perpetual: PerPhase<Vec<EffectId>>,

    /// Outstanding decision, if any. Kind and context always travel
    /// together.
    pub prompt: Option<PromptState>,

    /// Public mirror of the private hand's size.
    pub hand_count: u32,

    /// Banked extra turns.
    pub extra_turns: u8,

    pub resigned: bool,
}

impl PlayerState {
    fn new(starting_coins: i64) -> Self {
        Self {
            resources: Resources {
                coins: starting_coins,
                crowns: 0,
            },
            score_track: [0; COLUMN_COUNT],
            position: None,
            cards_in_play: Vec::new(),
            discard: Vec::new(),
            perpetual: PerPhase::default(),
            prompt: None,
            hand_count: 0,
            extra_turns: 0,
            resigned: false,
        }
    }
}

/// Hand and deck contents: the private section of the state.
///
/// Persisted as its own record; committed atomically with the public
/// snapshot so neither can be observed torn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateState {
    hands: PlayerMap<Vec<CardId>>,
    decks: PlayerMap<Vec<CardId>>,
}

impl PrivateState {
    #[must_use]
    pub fn empty(player_count: usize) -> Self {
        Self {
            hands: PlayerMap::with_default(player_count),
            decks: PlayerMap::with_default(player_count),
        }
    }
}

/// The authoritative, versioned snapshot of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    player_count: usize,

    /// Round counter: increments once when the last seat ends its turn.
    pub turn_number: u32,

    pub active_player: PlayerId,

    pub players: PlayerMap<PlayerState>,

    pub stack: ResolutionStack,

    pub queues: PerPhase<EffectQueue>,

    next_queue_item: u32,

    /// Remaining hourglass count per configured zone.
    pub hourglasses: FxHashMap<ZoneId, u8>,

    /// Zones legal for the current visit/move decision. Transient:
    /// populated when such a prompt is set, cleared when it resolves.
    pub legal_zones: Vec<ZoneId>,

    pub log: MatchLog,

    pub audit: AuditCounters,

    /// Action ids already processed; the duplicate-delivery guard.
    processed: ImHashSet<ActionId>,

    pub history: Vector<ActionRecord>,

    /// Set exactly once, by whichever end condition fires first.
    pub result: Option<GameResult>,

    pub rng: GameRng,

    private: PrivateState,
}

impl GameState {
    /// Create setup state for a match: shuffled decks, starting hands and
    /// coins, hourglasses at their configured counts. The first turn has
    /// not started yet.
    #[must_use]
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let player_count = config.player_count;
        let mut rng = GameRng::new(seed);

        let mut private = PrivateState::empty(player_count);
        for player in PlayerId::all(player_count) {
            let mut deck = config.deck.clone();
            rng.shuffle(&mut deck);
            private.decks[player] = deck;
        }

        let hourglasses = config
            .zones
            .iter()
            .filter_map(|z| z.hourglass.map(|h| (z.id, h)))
            .collect();

        let mut state = Self {
            player_count,
            turn_number: 1,
            active_player: PlayerId::new(0),
            players: PlayerMap::new(player_count, |_| {
                PlayerState::new(config.starting_coins)
            }),
            stack: ResolutionStack::new(),
            queues: PerPhase::default(),
            next_queue_item: 0,
            hourglasses,
            legal_zones: Vec::new(),
            log: MatchLog::new(config.log_cap),
            audit: AuditCounters::default(),
            processed: ImHashSet::new(),
            history: Vector::new(),
            result: None,
            rng,
            private,
        };

        for player in PlayerId::all(player_count) {
            for _ in 0..config.starting_hand {
                let _ = state.draw_card(player);
            }
        }

        state
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    // === Hands and decks (private section) ===

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[CardId] {
        &self.private.hands[player]
    }

    #[must_use]
    pub fn deck_size(&self, player: PlayerId) -> usize {
        self.private.decks[player].len()
    }

    pub fn add_to_hand(&mut self, player: PlayerId, card: CardId) {
        self.private.hands[player].push(card);
        self.players[player].hand_count += 1;
    }

    /// Remove the card at a hand index, keeping `hand_count` in sync.
    pub fn remove_hand_index(&mut self, player: PlayerId, index: usize) -> Option<CardId> {
        let hand = &mut self.private.hands[player];
        if index >= hand.len() {
            return None;
        }
        let card = hand.remove(index);
        self.players[player].hand_count -= 1;
        Some(card)
    }

    /// Draw the top deck card into the hand. `None` when the deck is empty.
    pub fn draw_card(&mut self, player: PlayerId) -> Option<CardId> {
        let card = self.private.decks[player].pop()?;
        self.add_to_hand(player, card);
        Some(card)
    }

    /// Detach the private section for a split commit.
    #[must_use]
    pub fn detach_private(&self) -> PrivateState {
        self.private.clone()
    }

    /// Replace the private section after a split load.
    ///
    /// Fails when the hand sizes disagree with the public `hand_count`
    /// mirrors: that is a torn read, exactly what the split-commit contract
    /// exists to prevent.
    pub fn attach_private(&mut self, private: PrivateState) -> Result<(), String> {
        if private.hands.player_count() != self.player_count {
            return Err("private record has wrong player count".to_string());
        }
        for (player, hand) in private.hands.iter() {
            let expected = self.players[player].hand_count as usize;
            if hand.len() != expected {
                return Err(format!(
                    "torn state: {player} hand has {} cards, public count says {expected}",
                    hand.len()
                ));
            }
        }
        self.private = private;
        Ok(())
    }

    /// Blank the private section (used when serializing the public record).
    pub fn strip_private(&mut self) {
        self.private = PrivateState::empty(self.player_count);
    }

    // === Queues ===

    /// Allocate an item id and enqueue an effect for a player.
    pub fn enqueue_effect(
        &mut self,
        phase: QueuePhase,
        label: impl Into<String>,
        effect: EffectId,
        owner: PlayerId,
    ) -> crate::core::ids::QueueItemId {
        let id = crate::core::ids::QueueItemId::new(self.next_queue_item);
        self.next_queue_item += 1;
        self.queues.get_mut(phase).enqueue(QueueItem {
            id,
            label: label.into(),
            effect,
            owner,
        });
        id
    }

    #[must_use]
    pub fn queues_empty(&self) -> bool {
        self.queues.start_of_turn.is_empty()
            && self.queues.post_visit.is_empty()
            && self.queues.end_of_turn.is_empty()
    }

    // === Prompts ===

    /// First player holding an outstanding prompt, if any.
    ///
    /// Control flow never depends on this scan; it exists for assertions
    /// and the stability predicate.
    #[must_use]
    pub fn any_prompt(&self) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|(_, p)| p.prompt.is_some())
            .map(|(id, _)| id)
    }

    /// "Nobody owes a decision": no prompt outstanding and every queue
    /// empty. In a stable state the resolution stack must be empty too.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.any_prompt().is_none() && self.queues_empty()
    }

    // === Idempotency ===

    #[must_use]
    pub fn has_processed(&self, id: &ActionId) -> bool {
        self.processed.contains(id)
    }

    pub fn mark_processed(&mut self, id: ActionId) {
        self.processed.insert(id);
    }

    pub fn record_action(&mut self, record: ActionRecord) {
        self.history.push_back(record);
    }

    // === Views ===

    /// Redacted snapshot for one viewer: own hand and prompt in full,
    /// other players reduced to public data.
    #[must_use]
    pub fn view_for(&self, viewer: PlayerId) -> PlayerView {
        PlayerView {
            viewer,
            turn_number: self.turn_number,
            active_player: self.active_player,
            hand: self.private.hands[viewer].clone(),
            prompt: self.players[viewer].prompt.clone(),
            legal_zones: self.legal_zones.clone(),
            players: self
                .players
                .iter()
                .map(|(id, p)| PlayerPublicView {
                    player: id,
                    resources: p.resources,
                    score_track: p.score_track,
                    position: p.position,
                    cards_in_play: p.cards_in_play.clone(),
                    discard: p.discard.clone(),
                    hand_count: p.hand_count,
                    has_prompt: p.prompt.is_some(),
                    resigned: p.resigned,
                })
                .collect(),
            log_tail: self.log.tail(20).cloned().collect(),
            audit: self.audit,
            result: self.result.clone(),
        }
    }
}

/// Public data of one player as seen by anyone.
#[derive(Clone, Debug, Serialize)]
pub struct PlayerPublicView {
    pub player: PlayerId,
    pub resources: Resources,
    pub score_track: [u32; COLUMN_COUNT],
    pub position: Option<ZoneId>,
    pub cards_in_play: Vec<CardId>,
    pub discard: Vec<CardId>,
    pub hand_count: u32,
    pub has_prompt: bool,
    pub resigned: bool,
}

/// Everything one client may see.
#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub viewer: PlayerId,
    pub turn_number: u32,
    pub active_player: PlayerId,
    /// The viewer's own hand, in order.
    pub hand: Vec<CardId>,
    /// The viewer's own outstanding prompt with full context.
    pub prompt: Option<PromptState>,
    pub legal_zones: Vec<ZoneId>,
    pub players: Vec<PlayerPublicView>,
    pub log_tail: Vec<LogEntry>,
    pub audit: AuditCounters,
    pub result: Option<GameResult>,
}
