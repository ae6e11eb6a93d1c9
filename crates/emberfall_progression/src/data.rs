//! # Data Manipulators
//!
//! Data manipulators are the capability seams of the progression API: typed
//! get/set/reset contracts over one slice of a player's persistent state.
//! This module defines the contracts ([`AchievementData`],
//! [`StatisticsData`], both extending [`DataManipulator`]) and the platform's
//! reference implementation, [`PlayerProgression`], which backs both slices
//! for a single player against a shared [`ProgressionRegistry`].
//!
//! ## Contract notes
//!
//! - Every view method returns an immutable snapshot, never a live reference
//!   into the record.
//! - Statistics that have never been set (or were reset) do not appear in
//!   any view.
//! - Mutations return the typed event values they produce; delivering those
//!   events to listeners is the host's job.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

use crate::achievement::Achievement;
use crate::error::{ProgressionError, ProgressionResult};
use crate::event::{AchievementGrantEvent, AchievementRevokeEvent, StatisticChangeEvent};
use crate::registry::ProgressionRegistry;
use crate::types::PlayerId;
use crate::utils::current_timestamp;

// ============================================================================
// Manipulator Contracts
// ============================================================================

/// Base contract for all data manipulators.
///
/// A data manipulator exposes typed operations over one slice of a player's
/// persistent state. Concrete manipulators extend this trait with their
/// slice-specific accessors and mutators.
pub trait DataManipulator: Send + Sync + std::fmt::Debug {
    /// Stable name for this manipulator kind, used in diagnostics.
    fn manipulator_name(&self) -> &'static str;

    /// The player whose state this manipulator exposes.
    fn holder(&self) -> PlayerId;

    /// True when the manipulator holds no set data.
    fn is_empty(&self) -> bool;
}

/// Manipulator contract over a player's earned achievement set.
pub trait AchievementData: DataManipulator {
    /// Checks whether the player has earned the given achievement.
    fn has_achievement(&self, achievement: &str) -> bool;

    /// Returns all achievements the player has earned, as an immutable
    /// snapshot ordered by id. Each achievement appears once regardless of
    /// how many times it was granted.
    fn achievements(&self) -> Vec<Arc<Achievement>>;

    /// Returns how many times the given achievement has been granted.
    fn grant_count(&self, achievement: &str) -> u32;

    /// Grants the given achievement. The same achievement can be granted
    /// multiple times; each grant increases its count.
    ///
    /// Un-earned prerequisite achievements are granted first, producing one
    /// grant event per newly earned ancestor (root first) before the event
    /// for the achievement itself.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::UnknownAchievement`] when the achievement
    /// is not in the registry.
    fn grant_achievement(
        &mut self,
        achievement: &str,
    ) -> ProgressionResult<Vec<AchievementGrantEvent>>;

    /// Revokes the given achievement. Dependent achievements are revoked
    /// too (deepest first), and every revoked achievement's source statistic
    /// is reset.
    ///
    /// Revoking an achievement the player has not earned produces no events.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::UnknownAchievement`] when the achievement
    /// is not in the registry.
    fn revoke_achievement(
        &mut self,
        achievement: &str,
    ) -> ProgressionResult<Vec<AchievementRevokeEvent>>;

    /// Revokes all earned achievements, resetting the source statistic of
    /// each one.
    fn revoke_achievements(&mut self) -> Vec<AchievementRevokeEvent>;
}

/// Manipulator contract over a player's named numeric statistics.
pub trait StatisticsData: DataManipulator {
    /// Returns the current value of the given statistic, or `None` when it
    /// has never been set (or was reset).
    fn statistic(&self, statistic: &str) -> Option<i64>;

    /// Returns all set statistics with their current values, as an immutable
    /// snapshot. Unset statistics are absent.
    fn statistics(&self) -> BTreeMap<String, i64>;

    /// Returns all set statistics in the given group with their current
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::UnknownStatisticGroup`] when the group is
    /// not in the registry.
    fn statistics_by_group(&self, group: &str) -> ProgressionResult<BTreeMap<String, i64>>;

    /// Adds the given amount to the statistic. An unset statistic counts as
    /// zero, and the amount may be negative; arithmetic saturates.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::UnknownStatistic`] when the statistic is
    /// not in the registry.
    fn add_to_statistic(
        &mut self,
        statistic: &str,
        amount: i64,
    ) -> ProgressionResult<StatisticChangeEvent>;

    /// Sets the statistic to the given value.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::UnknownStatistic`] when the statistic is
    /// not in the registry.
    fn set_statistic(
        &mut self,
        statistic: &str,
        value: i64,
    ) -> ProgressionResult<StatisticChangeEvent>;

    /// Resets the statistic, removing it from the player's statistics until
    /// it is set again. Returns `None` when the statistic was already unset.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::UnknownStatistic`] when the statistic is
    /// not in the registry.
    fn reset_statistic(
        &mut self,
        statistic: &str,
    ) -> ProgressionResult<Option<StatisticChangeEvent>>;

    /// Resets all statistics. Every set statistic is removed until set
    /// again.
    fn reset_statistics(&mut self) -> Vec<StatisticChangeEvent>;
}

// ============================================================================
// Reference Implementation
// ============================================================================

/// One player's progression record.
///
/// Implements both [`AchievementData`] and [`StatisticsData`] against a
/// shared [`ProgressionRegistry`]. The registry supplies the cascade
/// relationships (prerequisite chains, dependent subtrees, source-statistic
/// links) that give the mutators their semantics.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use emberfall_progression::{
///     Achievement, AchievementData, PlayerId, PlayerProgression, ProgressionRegistry,
///     Statistic, StatisticGroup, StatisticsData,
/// };
///
/// let registry = Arc::new(ProgressionRegistry::new());
/// registry.register_group(StatisticGroup::new("combat", "Combat")?)?;
/// registry.register_statistic(
///     Statistic::builder("mobs_slain").name("Mobs Slain").group("combat").build()?,
/// )?;
/// registry.register_achievement(
///     Achievement::builder("first_blood")
///         .name("First Blood")
///         .source_statistic("mobs_slain", 1)
///         .build()?,
/// )?;
///
/// let mut progression = PlayerProgression::new(PlayerId::new(), registry);
/// progression.add_to_statistic("mobs_slain", 1)?;
/// progression.grant_achievement("first_blood")?;
/// assert!(progression.has_achievement("first_blood"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct PlayerProgression {
    player_id: PlayerId,
    registry: Arc<ProgressionRegistry>,
    /// Achievement id -> grant count (absent means not earned)
    earned: BTreeMap<String, u32>,
    /// Statistic id -> value (absent means unset)
    statistics: BTreeMap<String, i64>,
}

impl PlayerProgression {
    /// Creates an empty progression record for the given player.
    pub fn new(player_id: PlayerId, registry: Arc<ProgressionRegistry>) -> Self {
        Self {
            player_id,
            registry,
            earned: BTreeMap::new(),
            statistics: BTreeMap::new(),
        }
    }

    /// The registry this record validates against.
    pub fn registry(&self) -> &Arc<ProgressionRegistry> {
        &self.registry
    }

    /// Produces a serializable snapshot of this record.
    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            player_id: self.player_id,
            earned: self.earned.clone(),
            statistics: self.statistics.clone(),
        }
    }

    /// Restores a record from a snapshot.
    ///
    /// Snapshot entries that no longer exist in the registry (the game's
    /// catalog changed between saves) are dropped with a warning.
    pub fn from_snapshot(snapshot: ProgressionSnapshot, registry: Arc<ProgressionRegistry>) -> Self {
        let mut earned = BTreeMap::new();
        for (id, count) in snapshot.earned {
            if registry.achievement(&id).is_some() {
                earned.insert(id, count);
            } else {
                warn!(
                    "Dropping unknown achievement '{}' from snapshot for player {}",
                    id, snapshot.player_id
                );
            }
        }

        let mut statistics = BTreeMap::new();
        for (id, value) in snapshot.statistics {
            if registry.statistic(&id).is_some() {
                statistics.insert(id, value);
            } else {
                warn!(
                    "Dropping unknown statistic '{}' from snapshot for player {}",
                    id, snapshot.player_id
                );
            }
        }

        Self {
            player_id: snapshot.player_id,
            registry,
            earned,
            statistics,
        }
    }

    fn grant_event(&self, achievement: &str, grant_count: u32) -> AchievementGrantEvent {
        AchievementGrantEvent {
            player_id: self.player_id,
            achievement: achievement.to_string(),
            grant_count,
            timestamp: current_timestamp(),
        }
    }

    /// Removes one earned achievement and resets its source statistic.
    /// Returns `None` when the achievement was not earned.
    fn revoke_one(&mut self, achievement: &str) -> Option<AchievementRevokeEvent> {
        self.earned.remove(achievement)?;
        let reset_statistic = self
            .registry
            .achievement(achievement)
            .and_then(|def| def.source_statistic.clone());
        if let Some(statistic) = &reset_statistic {
            self.statistics.remove(statistic);
        }
        Some(AchievementRevokeEvent {
            player_id: self.player_id,
            achievement: achievement.to_string(),
            reset_statistic,
            timestamp: current_timestamp(),
        })
    }

    fn statistic_change(
        &self,
        statistic: &str,
        previous_value: Option<i64>,
        new_value: Option<i64>,
    ) -> StatisticChangeEvent {
        StatisticChangeEvent {
            player_id: self.player_id,
            statistic: statistic.to_string(),
            previous_value,
            new_value,
            timestamp: current_timestamp(),
        }
    }
}

impl DataManipulator for PlayerProgression {
    fn manipulator_name(&self) -> &'static str {
        "player_progression"
    }

    fn holder(&self) -> PlayerId {
        self.player_id
    }

    fn is_empty(&self) -> bool {
        self.earned.is_empty() && self.statistics.is_empty()
    }
}

impl AchievementData for PlayerProgression {
    fn has_achievement(&self, achievement: &str) -> bool {
        self.earned.contains_key(achievement)
    }

    fn achievements(&self) -> Vec<Arc<Achievement>> {
        self.earned
            .keys()
            .filter_map(|id| self.registry.achievement(id))
            .collect()
    }

    fn grant_count(&self, achievement: &str) -> u32 {
        self.earned.get(achievement).copied().unwrap_or(0)
    }

    fn grant_achievement(
        &mut self,
        achievement: &str,
    ) -> ProgressionResult<Vec<AchievementGrantEvent>> {
        if self.registry.achievement(achievement).is_none() {
            return Err(ProgressionError::UnknownAchievement(achievement.to_string()));
        }

        let mut events = Vec::new();
        for ancestor in self.registry.ancestors(achievement) {
            if !self.earned.contains_key(&ancestor) {
                self.earned.insert(ancestor.clone(), 1);
                events.push(self.grant_event(&ancestor, 1));
            }
        }

        let count = self
            .earned
            .get(achievement)
            .copied()
            .unwrap_or(0)
            .saturating_add(1);
        self.earned.insert(achievement.to_string(), count);
        events.push(self.grant_event(achievement, count));
        Ok(events)
    }

    fn revoke_achievement(
        &mut self,
        achievement: &str,
    ) -> ProgressionResult<Vec<AchievementRevokeEvent>> {
        if self.registry.achievement(achievement).is_none() {
            return Err(ProgressionError::UnknownAchievement(achievement.to_string()));
        }

        let mut events = Vec::new();
        for dependent in self.registry.descendants(achievement) {
            events.extend(self.revoke_one(&dependent));
        }
        events.extend(self.revoke_one(achievement));
        Ok(events)
    }

    fn revoke_achievements(&mut self) -> Vec<AchievementRevokeEvent> {
        let all: Vec<String> = self.earned.keys().cloned().collect();
        all.iter()
            .filter_map(|id| self.revoke_one(id))
            .collect()
    }
}

impl StatisticsData for PlayerProgression {
    fn statistic(&self, statistic: &str) -> Option<i64> {
        self.statistics.get(statistic).copied()
    }

    fn statistics(&self) -> BTreeMap<String, i64> {
        self.statistics.clone()
    }

    fn statistics_by_group(&self, group: &str) -> ProgressionResult<BTreeMap<String, i64>> {
        if self.registry.group(group).is_none() {
            return Err(ProgressionError::UnknownStatisticGroup(group.to_string()));
        }
        Ok(self
            .statistics
            .iter()
            .filter(|(id, _)| {
                self.registry
                    .statistic(id)
                    .map(|def| def.group == group)
                    .unwrap_or(false)
            })
            .map(|(id, value)| (id.clone(), *value))
            .collect())
    }

    fn add_to_statistic(
        &mut self,
        statistic: &str,
        amount: i64,
    ) -> ProgressionResult<StatisticChangeEvent> {
        if self.registry.statistic(statistic).is_none() {
            return Err(ProgressionError::UnknownStatistic(statistic.to_string()));
        }
        let previous = self.statistics.get(statistic).copied();
        let value = previous.unwrap_or(0).saturating_add(amount);
        self.statistics.insert(statistic.to_string(), value);
        Ok(self.statistic_change(statistic, previous, Some(value)))
    }

    fn set_statistic(
        &mut self,
        statistic: &str,
        value: i64,
    ) -> ProgressionResult<StatisticChangeEvent> {
        if self.registry.statistic(statistic).is_none() {
            return Err(ProgressionError::UnknownStatistic(statistic.to_string()));
        }
        let previous = self.statistics.insert(statistic.to_string(), value);
        Ok(self.statistic_change(statistic, previous, Some(value)))
    }

    fn reset_statistic(
        &mut self,
        statistic: &str,
    ) -> ProgressionResult<Option<StatisticChangeEvent>> {
        if self.registry.statistic(statistic).is_none() {
            return Err(ProgressionError::UnknownStatistic(statistic.to_string()));
        }
        Ok(self
            .statistics
            .remove(statistic)
            .map(|previous| self.statistic_change(statistic, Some(previous), None)))
    }

    fn reset_statistics(&mut self) -> Vec<StatisticChangeEvent> {
        let drained: Vec<(String, i64)> = std::mem::take(&mut self.statistics).into_iter().collect();
        drained
            .into_iter()
            .map(|(id, previous)| self.statistic_change(&id, Some(previous), None))
            .collect()
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Serializable snapshot of one player's progression record.
///
/// Snapshots are what the storage layer persists; they carry only data, not
/// the registry handle, so they can be written as plain JSON and restored
/// against whatever catalog the server is currently running.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    /// Player this snapshot belongs to
    pub player_id: PlayerId,
    /// Achievement id -> grant count
    #[serde(default)]
    pub earned: BTreeMap<String, u32>,
    /// Statistic id -> value
    #[serde(default)]
    pub statistics: BTreeMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistic::{Statistic, StatisticGroup};

    fn test_registry() -> Arc<ProgressionRegistry> {
        let registry = ProgressionRegistry::new();
        registry
            .register_group(StatisticGroup::new("combat", "Combat").unwrap())
            .unwrap();
        registry
            .register_group(StatisticGroup::new("mining", "Mining").unwrap())
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
            .register_statistic(
                Statistic::builder("bosses_slain")
                    .name("Bosses Slain")
                    .group("combat")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register_statistic(
                Statistic::builder("blocks_mined")
                    .name("Blocks Mined")
                    .group("mining")
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
        registry
            .register_achievement(
                Achievement::builder("slayer_1")
                    .name("Slayer I")
                    .parent("first_blood")
                    .source_statistic("mobs_slain", 100)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register_achievement(
                Achievement::builder("slayer_2")
                    .name("Slayer II")
                    .parent("slayer_1")
                    .source_statistic("mobs_slain", 1000)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register_achievement(
                Achievement::builder("boss_hunter")
                    .name("Boss Hunter")
                    .source_statistic("bosses_slain", 1)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        Arc::new(registry)
    }

    fn progression() -> PlayerProgression {
        PlayerProgression::new(PlayerId::new(), test_registry())
    }

    #[test]
    fn test_grant_counts_repeat_grants() {
        let mut record = progression();
        record.grant_achievement("first_blood").unwrap();
        let events = record.grant_achievement("first_blood").unwrap();

        assert!(record.has_achievement("first_blood"));
        assert_eq!(record.grant_count("first_blood"), 2);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].grant_count, 2);
        // The earned view lists the achievement once
        assert_eq!(record.achievements().len(), 1);
    }

    #[test]
    fn test_grant_earns_prerequisites_root_first() {
        let mut record = progression();
        let events = record.grant_achievement("slayer_2").unwrap();

        let granted: Vec<&str> = events.iter().map(|e| e.achievement.as_str()).collect();
        assert_eq!(granted, vec!["first_blood", "slayer_1", "slayer_2"]);
        assert!(record.has_achievement("first_blood"));
        assert!(record.has_achievement("slayer_1"));
        assert!(record.has_achievement("slayer_2"));
    }

    #[test]
    fn test_grant_unknown_achievement_fails() {
        let mut record = progression();
        let result = record.grant_achievement("missing");
        assert!(matches!(result, Err(ProgressionError::UnknownAchievement(_))));
    }

    #[test]
    fn test_revoke_cascades_to_dependents_and_resets_statistics() {
        let mut record = progression();
        record.set_statistic("mobs_slain", 1500).unwrap();
        record.set_statistic("blocks_mined", 7).unwrap();
        record.grant_achievement("slayer_2").unwrap();

        let events = record.revoke_achievement("first_blood").unwrap();

        let revoked: Vec<&str> = events.iter().map(|e| e.achievement.as_str()).collect();
        assert_eq!(revoked, vec!["slayer_2", "slayer_1", "first_blood"]);
        assert!(!record.has_achievement("slayer_2"));
        assert!(!record.has_achievement("first_blood"));
        // The shared source statistic was reset by the cascade
        assert_eq!(record.statistic("mobs_slain"), None);
        // Unrelated statistics are untouched
        assert_eq!(record.statistic("blocks_mined"), Some(7));
    }

    #[test]
    fn test_revoke_not_earned_is_a_no_op() {
        let mut record = progression();
        let events = record.revoke_achievement("first_blood").unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_revoke_all_resets_linked_statistics_only() {
        let mut record = progression();
        record.set_statistic("bosses_slain", 3).unwrap();
        record.set_statistic("blocks_mined", 42).unwrap();
        record.grant_achievement("boss_hunter").unwrap();
        record.grant_achievement("first_blood").unwrap();

        let events = record.revoke_achievements();

        assert_eq!(events.len(), 2);
        assert!(record.achievements().is_empty());
        assert_eq!(record.statistic("bosses_slain"), None);
        assert_eq!(record.statistic("blocks_mined"), Some(42));
    }

    #[test]
    fn test_unset_statistic_is_absent_from_views() {
        let record = progression();
        assert_eq!(record.statistic("mobs_slain"), None);
        assert!(record.statistics().is_empty());
    }

    #[test]
    fn test_add_starts_from_zero_and_saturates() {
        let mut record = progression();
        let event = record.add_to_statistic("mobs_slain", 5).unwrap();
        assert_eq!(event.previous_value, None);
        assert_eq!(event.new_value, Some(5));

        record.set_statistic("mobs_slain", i64::MAX).unwrap();
        record.add_to_statistic("mobs_slain", 1).unwrap();
        assert_eq!(record.statistic("mobs_slain"), Some(i64::MAX));

        record.set_statistic("mobs_slain", 10).unwrap();
        record.add_to_statistic("mobs_slain", -4).unwrap();
        assert_eq!(record.statistic("mobs_slain"), Some(6));
    }

    #[test]
    fn test_reset_removes_until_set_again() {
        let mut record = progression();
        record.set_statistic("mobs_slain", 9).unwrap();

        let event = record.reset_statistic("mobs_slain").unwrap().unwrap();
        assert_eq!(event.previous_value, Some(9));
        assert_eq!(event.new_value, None);
        assert_eq!(record.statistic("mobs_slain"), None);
        assert!(!record.statistics().contains_key("mobs_slain"));

        // Resetting again produces nothing
        assert!(record.reset_statistic("mobs_slain").unwrap().is_none());
    }

    #[test]
    fn test_reset_all_statistics() {
        let mut record = progression();
        record.set_statistic("mobs_slain", 1).unwrap();
        record.set_statistic("blocks_mined", 2).unwrap();

        let events = record.reset_statistics();
        assert_eq!(events.len(), 2);
        assert!(record.statistics().is_empty());
        assert!(events.iter().all(|e| e.new_value.is_none()));
    }

    #[test]
    fn test_statistics_by_group_filters() {
        let mut record = progression();
        record.set_statistic("mobs_slain", 10).unwrap();
        record.set_statistic("bosses_slain", 2).unwrap();
        record.set_statistic("blocks_mined", 99).unwrap();

        let combat = record.statistics_by_group("combat").unwrap();
        assert_eq!(combat.len(), 2);
        assert_eq!(combat.get("mobs_slain"), Some(&10));
        assert_eq!(combat.get("bosses_slain"), Some(&2));

        let result = record.statistics_by_group("fishing");
        assert!(matches!(
            result,
            Err(ProgressionError::UnknownStatisticGroup(_))
        ));
    }

    #[test]
    fn test_unknown_statistic_operations_fail() {
        let mut record = progression();
        assert!(record.set_statistic("missing", 1).is_err());
        assert!(record.add_to_statistic("missing", 1).is_err());
        assert!(record.reset_statistic("missing").is_err());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let registry = test_registry();
        let mut record = PlayerProgression::new(PlayerId::new(), registry.clone());
        record.set_statistic("mobs_slain", 150).unwrap();
        record.grant_achievement("slayer_1").unwrap();

        let snapshot = record.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: ProgressionSnapshot = serde_json::from_str(&json).unwrap();
        let restored = PlayerProgression::from_snapshot(decoded, registry);

        assert_eq!(restored.holder(), record.holder());
        assert!(restored.has_achievement("slayer_1"));
        assert!(restored.has_achievement("first_blood"));
        assert_eq!(restored.statistic("mobs_slain"), Some(150));
    }

    #[test]
    fn test_snapshot_drops_entries_missing_from_catalog() {
        let registry = test_registry();
        let mut snapshot = ProgressionSnapshot {
            player_id: PlayerId::new(),
            ..ProgressionSnapshot::default()
        };
        snapshot.earned.insert("retired_achievement".to_string(), 1);
        snapshot.earned.insert("first_blood".to_string(), 1);
        snapshot.statistics.insert("retired_statistic".to_string(), 5);

        let restored = PlayerProgression::from_snapshot(snapshot, registry);
        assert!(restored.has_achievement("first_blood"));
        assert!(!restored.has_achievement("retired_achievement"));
        assert_eq!(restored.statistic("retired_statistic"), None);
    }

    #[test]
    fn test_manipulator_surface() {
        let mut record = progression();
        assert_eq!(record.manipulator_name(), "player_progression");
        assert!(record.is_empty());
        record.set_statistic("mobs_slain", 1).unwrap();
        assert!(!record.is_empty());
    }
}
