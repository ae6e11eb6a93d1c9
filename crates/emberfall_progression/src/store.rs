//! # Progression Store
//!
//! The [`ProgressionStore`] is the server-side collection of per-player
//! progression records. It owns one [`PlayerProgression`] per known player,
//! creates records on first touch, and exposes store-level mutation
//! operations that forward to the record and hand back the produced event
//! values for the host to dispatch.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::data::{AchievementData, PlayerProgression, ProgressionSnapshot, StatisticsData};
use crate::error::ProgressionResult;
use crate::event::{
    AchievementGrantEvent, AchievementRevokeEvent, PlayerJoinEvent, PlayerQuitEvent,
    StatisticChangeEvent,
};
use crate::registry::ProgressionRegistry;
use crate::types::PlayerId;
use crate::utils::current_timestamp;

/// Concurrent store of per-player progression records.
///
/// # Thread Safety
///
/// The store is fully thread-safe and intended to be shared as
/// `Arc<ProgressionStore>`. Each operation locks only the touched player's
/// record.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use emberfall_progression::{ProgressionRegistry, ProgressionStore, PlayerId};
///
/// let registry = Arc::new(ProgressionRegistry::new());
/// registry.load_toml_catalog(r#"
///     [[group]]
///     id = "combat"
///     name = "Combat"
///
///     [[statistic]]
///     id = "mobs_slain"
///     name = "Mobs Slain"
///     group = "combat"
/// "#)?;
///
/// let store = ProgressionStore::new(registry);
/// let player_id = PlayerId::new();
/// store.join_player(player_id, "Steve");
/// let event = store.add_to_statistic(player_id, "mobs_slain", 1)?;
/// assert_eq!(event.new_value, Some(1));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct ProgressionStore {
    /// Catalog the records validate against
    registry: Arc<ProgressionRegistry>,
    /// Per-player progression records
    players: DashMap<PlayerId, PlayerProgression>,
}

impl ProgressionStore {
    /// Creates an empty store over the given registry.
    pub fn new(registry: Arc<ProgressionRegistry>) -> Self {
        Self {
            registry,
            players: DashMap::new(),
        }
    }

    /// The registry this store validates against.
    pub fn registry(&self) -> Arc<ProgressionRegistry> {
        self.registry.clone()
    }

    /// Number of players with a record in the store.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether the given player has a record in the store.
    pub fn contains_player(&self, player_id: PlayerId) -> bool {
        self.players.contains_key(&player_id)
    }

    /// Attaches a progression record for a joining player, creating an empty
    /// one when the player is new.
    pub fn join_player(&self, player_id: PlayerId, name: &str) -> PlayerJoinEvent {
        self.players
            .entry(player_id)
            .or_insert_with(|| PlayerProgression::new(player_id, self.registry.clone()));
        info!("👤 Player {} joined ({})", name, player_id);
        PlayerJoinEvent {
            player_id,
            name: name.to_string(),
            timestamp: current_timestamp(),
        }
    }

    /// Detaches a leaving player's record, returning its final snapshot (for
    /// persistence) and the quit event. Returns `None` when the player has
    /// no record.
    pub fn quit_player(&self, player_id: PlayerId) -> Option<(ProgressionSnapshot, PlayerQuitEvent)> {
        let (_, record) = self.players.remove(&player_id)?;
        debug!("Player {} detached from progression store", player_id);
        Some((
            record.snapshot(),
            PlayerQuitEvent {
                player_id,
                timestamp: current_timestamp(),
            },
        ))
    }

    /// Restores a player's record from a snapshot, replacing any existing
    /// record for that player.
    pub fn restore(&self, snapshot: ProgressionSnapshot) {
        let player_id = snapshot.player_id;
        let record = PlayerProgression::from_snapshot(snapshot, self.registry.clone());
        self.players.insert(player_id, record);
        debug!("Restored progression record for player {}", player_id);
    }

    /// Runs a closure against a player's record, if present.
    pub fn with_player<R>(
        &self,
        player_id: PlayerId,
        f: impl FnOnce(&PlayerProgression) -> R,
    ) -> Option<R> {
        self.players.get(&player_id).map(|record| f(record.value()))
    }

    /// Produces a snapshot of a player's record, if present.
    pub fn snapshot(&self, player_id: PlayerId) -> Option<ProgressionSnapshot> {
        self.with_player(player_id, |record| record.snapshot())
    }

    /// Produces snapshots of every record in the store (for a save-all
    /// sweep).
    pub fn snapshots(&self) -> Vec<ProgressionSnapshot> {
        let mut all: Vec<_> = self
            .players
            .iter()
            .map(|entry| entry.value().snapshot())
            .collect();
        all.sort_by_key(|snapshot| snapshot.player_id.0);
        all
    }

    /// Checks whether the player has earned the given achievement.
    pub fn has_achievement(&self, player_id: PlayerId, achievement: &str) -> bool {
        self.with_player(player_id, |record| record.has_achievement(achievement))
            .unwrap_or(false)
    }

    /// Returns the player's current value for the given statistic.
    pub fn statistic(&self, player_id: PlayerId, statistic: &str) -> Option<i64> {
        self.with_player(player_id, |record| record.statistic(statistic))
            .flatten()
    }

    /// Grants an achievement to a player, creating the record on first
    /// touch. See [`AchievementData::grant_achievement`] for the cascade
    /// contract.
    pub fn grant_achievement(
        &self,
        player_id: PlayerId,
        achievement: &str,
    ) -> ProgressionResult<Vec<AchievementGrantEvent>> {
        let events = self.record_mut(player_id, |record| record.grant_achievement(achievement))?;
        for event in &events {
            info!("🏆 Player {} earned '{}' (x{})", player_id, event.achievement, event.grant_count);
        }
        Ok(events)
    }

    /// Revokes an achievement from a player. See
    /// [`AchievementData::revoke_achievement`] for the cascade contract.
    pub fn revoke_achievement(
        &self,
        player_id: PlayerId,
        achievement: &str,
    ) -> ProgressionResult<Vec<AchievementRevokeEvent>> {
        let events = self.record_mut(player_id, |record| record.revoke_achievement(achievement))?;
        for event in &events {
            info!("❌ Player {} lost '{}'", player_id, event.achievement);
        }
        Ok(events)
    }

    /// Revokes all of a player's achievements. A player without a record has
    /// nothing to revoke.
    pub fn revoke_achievements(&self, player_id: PlayerId) -> Vec<AchievementRevokeEvent> {
        match self.players.get_mut(&player_id) {
            Some(mut record) => record.value_mut().revoke_achievements(),
            None => Vec::new(),
        }
    }

    /// Adds to a player's statistic.
    pub fn add_to_statistic(
        &self,
        player_id: PlayerId,
        statistic: &str,
        amount: i64,
    ) -> ProgressionResult<StatisticChangeEvent> {
        let event = self.record_mut(player_id, |record| record.add_to_statistic(statistic, amount))?;
        debug!(
            "Player {} statistic '{}': {:?} -> {:?}",
            player_id, statistic, event.previous_value, event.new_value
        );
        Ok(event)
    }

    /// Sets a player's statistic.
    pub fn set_statistic(
        &self,
        player_id: PlayerId,
        statistic: &str,
        value: i64,
    ) -> ProgressionResult<StatisticChangeEvent> {
        self.record_mut(player_id, |record| record.set_statistic(statistic, value))
    }

    /// Resets a player's statistic.
    pub fn reset_statistic(
        &self,
        player_id: PlayerId,
        statistic: &str,
    ) -> ProgressionResult<Option<StatisticChangeEvent>> {
        self.record_mut(player_id, |record| record.reset_statistic(statistic))
    }

    /// Resets all of a player's statistics. A player without a record has
    /// nothing to reset.
    pub fn reset_statistics(&self, player_id: PlayerId) -> Vec<StatisticChangeEvent> {
        match self.players.get_mut(&player_id) {
            Some(mut record) => record.value_mut().reset_statistics(),
            None => Vec::new(),
        }
    }

    /// Locks (creating on first touch) the player's record and applies a
    /// mutation to it.
    fn record_mut<R, E>(
        &self,
        player_id: PlayerId,
        f: impl FnOnce(&mut PlayerProgression) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut record = self
            .players
            .entry(player_id)
            .or_insert_with(|| PlayerProgression::new(player_id, self.registry.clone()));
        f(record.value_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievement::Achievement;
    use crate::statistic::{Statistic, StatisticGroup};

    fn test_store() -> ProgressionStore {
        let registry = ProgressionRegistry::new();
        registry
            .register_group(StatisticGroup::new("combat", "Combat").unwrap())
            .unwrap();
        registry
            .register_statistic(
                Statistic::builder("mobs_slain")
                    .name("Mobs Slain")
                    .group("combat")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register_achievement(
                Achievement::builder("first_blood")
                    .name("First Blood")
                    .source_statistic("mobs_slain", 1)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        ProgressionStore::new(Arc::new(registry))
    }

    #[test]
    fn test_join_creates_record_once() {
        let store = test_store();
        let player_id = PlayerId::new();

        store.join_player(player_id, "Steve");
        store.set_statistic(player_id, "mobs_slain", 5).unwrap();
        store.join_player(player_id, "Steve");

        // Rejoining does not wipe the record
        assert_eq!(store.statistic(player_id, "mobs_slain"), Some(5));
        assert_eq!(store.player_count(), 1);
    }

    #[test]
    fn test_mutation_creates_record_on_first_touch() {
        let store = test_store();
        let player_id = PlayerId::new();

        assert!(!store.contains_player(player_id));
        store.grant_achievement(player_id, "first_blood").unwrap();
        assert!(store.contains_player(player_id));
        assert!(store.has_achievement(player_id, "first_blood"));
    }

    #[test]
    fn test_quit_returns_final_snapshot() {
        let store = test_store();
        let player_id = PlayerId::new();
        store.join_player(player_id, "Alex");
        store.add_to_statistic(player_id, "mobs_slain", 3).unwrap();

        let (snapshot, quit) = store.quit_player(player_id).expect("record should exist");
        assert_eq!(quit.player_id, player_id);
        assert_eq!(snapshot.statistics.get("mobs_slain"), Some(&3));
        assert!(!store.contains_player(player_id));

        // Quitting again is a no-op
        assert!(store.quit_player(player_id).is_none());
    }

    #[test]
    fn test_restore_replaces_record() {
        let store = test_store();
        let player_id = PlayerId::new();
        store.add_to_statistic(player_id, "mobs_slain", 10).unwrap();

        let mut snapshot = store.snapshot(player_id).unwrap();
        snapshot.statistics.insert("mobs_slain".to_string(), 99);
        store.restore(snapshot);

        assert_eq!(store.statistic(player_id, "mobs_slain"), Some(99));
    }

    #[test]
    fn test_snapshots_cover_all_players() {
        let store = test_store();
        store.join_player(PlayerId::new(), "a");
        store.join_player(PlayerId::new(), "b");
        assert_eq!(store.snapshots().len(), 2);
    }

    #[test]
    fn test_unknown_ids_surface_errors() {
        let store = test_store();
        let player_id = PlayerId::new();
        assert!(store.grant_achievement(player_id, "missing").is_err());
        assert!(store.add_to_statistic(player_id, "missing", 1).is_err());
    }
}
