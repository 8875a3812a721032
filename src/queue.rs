//! Effect queues: the three phase worklists.
//!
//! Start-of-turn, post-visit, and end-of-turn effects are pending work that
//! is ordered per player but does not nest. The three moments are mutually
//! exclusive and never interleave, so each phase gets an independent queue.
//!
//! Draining rules (implemented by the engine's drain step, data ops here):
//! exactly one pending item for a player resolves automatically; two or more
//! raise a choice prompt so the player picks resolution order.

use serde::{Deserialize, Serialize};

use crate::core::ids::QueueItemId;
use crate::core::player::PlayerId;
use crate::effects::EffectId;

/// The moment a queue's items resolve in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueuePhase {
    StartOfTurn = 0,
    PostVisit = 1,
    EndOfTurn = 2,
}

impl QueuePhase {
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(QueuePhase::StartOfTurn),
            1 => Some(QueuePhase::PostVisit),
            2 => Some(QueuePhase::EndOfTurn),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            QueuePhase::StartOfTurn => "start-of-turn",
            QueuePhase::PostVisit => "post-visit",
            QueuePhase::EndOfTurn => "end-of-turn",
        }
    }
}

/// One value per queue phase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerPhase<T> {
    pub start_of_turn: T,
    pub post_visit: T,
    pub end_of_turn: T,
}

impl<T> PerPhase<T> {
    #[must_use]
    pub fn get(&self, phase: QueuePhase) -> &T {
        match phase {
            QueuePhase::StartOfTurn => &self.start_of_turn,
            QueuePhase::PostVisit => &self.post_visit,
            QueuePhase::EndOfTurn => &self.end_of_turn,
        }
    }

    pub fn get_mut(&mut self, phase: QueuePhase) -> &mut T {
        match phase {
            QueuePhase::StartOfTurn => &mut self.start_of_turn,
            QueuePhase::PostVisit => &mut self.post_visit,
            QueuePhase::EndOfTurn => &mut self.end_of_turn,
        }
    }
}

/// A pending effect owed to one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: QueueItemId,
    /// Display label for choice prompts and the log.
    pub label: String,
    pub effect: EffectId,
    pub owner: PlayerId,
}

/// FIFO-per-player worklist for one phase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectQueue {
    items: Vec<QueueItem>,
}

impl EffectQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, item: QueueItem) {
        self.items.push(item);
    }

    /// Pending item ids for one player, in enqueue order.
    #[must_use]
    pub fn items_for(&self, owner: PlayerId) -> Vec<QueueItemId> {
        self.items
            .iter()
            .filter(|i| i.owner == owner)
            .map(|i| i.id)
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: QueueItemId) -> Option<&QueueItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Remove and return an item.
    pub fn take(&mut self, id: QueueItemId) -> Option<QueueItem> {
        let pos = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Drop every item owned by a player. Used when the player resigns.
    pub fn remove_owner(&mut self, owner: PlayerId) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.owner != owner);
        before - self.items.len()
    }

    /// Drop everything. Used when a turn is abandoned.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// First player in the given turn order holding at least one item.
    #[must_use]
    pub fn first_owner_in(
        &self,
        order: impl IntoIterator<Item = PlayerId>,
    ) -> Option<PlayerId> {
        order
            .into_iter()
            .find(|p| self.items.iter().any(|i| i.owner == *p))
    }

    /// Owner of the earliest-enqueued item. The stable order used by the
    /// post-visit queue, where turn order is not meaningful.
    #[must_use]
    pub fn first_owner_by_insertion(&self) -> Option<PlayerId> {
        self.items.first().map(|i| i.owner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueItem> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, owner: u8) -> QueueItem {
        QueueItem {
            id: QueueItemId::new(id),
            label: format!("item {id}"),
            effect: EffectId::StartIncome,
            owner: PlayerId::new(owner),
        }
    }

    #[test]
    fn test_per_player_fifo_order() {
        let mut q = EffectQueue::new();
        q.enqueue(item(1, 0));
        q.enqueue(item(2, 1));
        q.enqueue(item(3, 0));

        assert_eq!(
            q.items_for(PlayerId::new(0)),
            vec![QueueItemId::new(1), QueueItemId::new(3)]
        );
        assert_eq!(q.items_for(PlayerId::new(1)), vec![QueueItemId::new(2)]);
    }

    #[test]
    fn test_take_removes_exactly_one() {
        let mut q = EffectQueue::new();
        q.enqueue(item(1, 0));
        q.enqueue(item(2, 0));

        let taken = q.take(QueueItemId::new(1)).unwrap();
        assert_eq!(taken.id, QueueItemId::new(1));
        assert_eq!(q.len(), 1);
        assert!(q.take(QueueItemId::new(1)).is_none());
    }

    #[test]
    fn test_first_owner_in_turn_order() {
        let mut q = EffectQueue::new();
        q.enqueue(item(1, 2));
        q.enqueue(item(2, 1));

        // Turn order starting at seat 1 finds seat 1 first even though
        // seat 2's item was enqueued earlier.
        let owner = q.first_owner_in(PlayerId::new(1).all_from(3));
        assert_eq!(owner, Some(PlayerId::new(1)));
    }

    #[test]
    fn test_first_owner_by_insertion() {
        let mut q = EffectQueue::new();
        assert_eq!(q.first_owner_by_insertion(), None);
        q.enqueue(item(1, 2));
        q.enqueue(item(2, 0));
        assert_eq!(q.first_owner_by_insertion(), Some(PlayerId::new(2)));
    }

    #[test]
    fn test_phase_round_trip() {
        for phase in [
            QueuePhase::StartOfTurn,
            QueuePhase::PostVisit,
            QueuePhase::EndOfTurn,
        ] {
            assert_eq!(QueuePhase::from_raw(phase as u32), Some(phase));
        }
        assert_eq!(QueuePhase::from_raw(9), None);
    }
}
