//! Player identification and per-player storage.
//!
//! `PlayerId` is a 0-based seat index. Turn order is seat order; the helpers
//! here implement the round-robin arithmetic the turn controller relies on.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat index of a player in a match (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The next seat in turn order, wrapping after the last player.
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId(((self.0 as usize + 1) % player_count) as u8)
    }

    /// Whether advancing from this seat wraps back to seat 0.
    ///
    /// The round counter increments exactly when the last seat ends its turn.
    #[must_use]
    pub fn is_last(self, player_count: usize) -> bool {
        self.index() + 1 == player_count
    }

    /// Iterate all seats in turn order.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// Iterate all seats in turn order starting from `self` inclusive.
    pub fn all_from(self, player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count).map(move |offset| {
            PlayerId(((self.0 as usize + offset) % player_count) as u8)
        })
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Per-player storage with O(1) access, backed by a `Vec` with one entry
/// per seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Create with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps() {
        assert_eq!(PlayerId::new(0).next(3), PlayerId::new(1));
        assert_eq!(PlayerId::new(2).next(3), PlayerId::new(0));
    }

    #[test]
    fn test_is_last() {
        assert!(!PlayerId::new(0).is_last(3));
        assert!(PlayerId::new(2).is_last(3));
        assert!(PlayerId::new(0).is_last(1));
    }

    #[test]
    fn test_all_from() {
        let order: Vec<_> = PlayerId::new(2).all_from(4).collect();
        assert_eq!(
            order,
            vec![
                PlayerId::new(2),
                PlayerId::new(3),
                PlayerId::new(0),
                PlayerId::new(1),
            ]
        );
    }

    #[test]
    fn test_player_map_access() {
        let mut map: PlayerMap<i64> = PlayerMap::new(3, |p| p.index() as i64 * 10);

        assert_eq!(map[PlayerId::new(1)], 10);
        map[PlayerId::new(1)] = 99;
        assert_eq!(map[PlayerId::new(1)], 99);
        assert_eq!(map.player_count(), 3);
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<u8> = PlayerMap::with_value(2, 7);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::new(0), &7), (PlayerId::new(1), &7)]);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i64> = PlayerMap::with_default(0);
    }
}
