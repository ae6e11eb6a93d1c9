//! Milestones - Player Progression Plugin
//!
//! A progression plugin for Emberfall servers that provides:
//! - A built-in catalog of statistics and tiered achievements
//! - Automatic achievement grants when a statistic crosses its target
//! - Player join/quit progression record handling
//!
//! The plugin owns no dispatch: every handler returns the event values it
//! produced, and the host routes them to listeners.

use std::sync::Arc;
use tracing::{debug, error, info};

use emberfall_progression::{
    AchievementGrantEvent, PlayerId, PlayerJoinEvent, PlayerQuitEvent, ProgressionResult,
    ProgressionSnapshot, ProgressionStore, RegistryResult, StatisticChangeEvent,
};

pub mod definitions;

// ============================================================================
// Core Plugin Implementation
// ============================================================================

/// Milestones progression plugin.
///
/// Wraps a shared [`ProgressionStore`] and reacts to statistic changes by
/// granting the achievements whose targets have been reached.
pub struct MilestonesPlugin {
    /// Plugin name
    name: String,
    /// Plugin version
    version: String,
    /// Shared progression store
    store: Arc<ProgressionStore>,
}

impl MilestonesPlugin {
    /// Creates the plugin over an existing store. The store's registry is
    /// expected to already contain a catalog.
    pub fn new(store: Arc<ProgressionStore>) -> Self {
        Self {
            name: "milestones".to_string(),
            version: "1.0.0".to_string(),
            store,
        }
    }

    /// Creates the plugin and installs the built-in milestone catalog into
    /// the store's registry.
    pub fn with_default_catalog(store: Arc<ProgressionStore>) -> RegistryResult<Self> {
        definitions::install(&store.registry())?;
        info!("📋 Milestones catalog installed");
        Ok(Self::new(store))
    }

    /// Plugin name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plugin version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The store this plugin operates on.
    pub fn store(&self) -> Arc<ProgressionStore> {
        self.store.clone()
    }

    /// Handles a player joining: attaches their progression record.
    pub fn handle_player_join(&self, player_id: PlayerId, name: &str) -> PlayerJoinEvent {
        self.store.join_player(player_id, name)
    }

    /// Handles a player leaving: detaches their record and returns the final
    /// snapshot for the host to persist.
    pub fn handle_player_quit(
        &self,
        player_id: PlayerId,
    ) -> Option<(ProgressionSnapshot, PlayerQuitEvent)> {
        self.store.quit_player(player_id)
    }

    /// Reacts to a statistic change by granting every linked achievement
    /// whose target value has been reached and which the player has not
    /// earned yet.
    ///
    /// Grant failures are logged and skipped so one bad catalog entry cannot
    /// block the rest of the milestones.
    pub fn handle_statistic_change(
        &self,
        event: &StatisticChangeEvent,
    ) -> Vec<AchievementGrantEvent> {
        let Some(new_value) = event.new_value else {
            // Resets never trigger milestones
            return Vec::new();
        };

        let registry = self.store.registry();
        let mut grants = Vec::new();
        for achievement in registry.linked_achievements(&event.statistic) {
            let Some(target) = achievement.target_value else {
                continue;
            };
            if new_value < target || self.store.has_achievement(event.player_id, &achievement.id) {
                continue;
            }
            match self.store.grant_achievement(event.player_id, &achievement.id) {
                Ok(events) => grants.extend(events),
                Err(e) => error!(
                    "Failed to grant '{}' to player {}: {}",
                    achievement.id, event.player_id, e
                ),
            }
        }

        if !grants.is_empty() {
            debug!(
                "Statistic '{}' unlocked {} milestone grant(s) for player {}",
                event.statistic,
                grants.len(),
                event.player_id
            );
        }
        grants
    }

    /// Records a statistic delta for a player and processes any milestones
    /// it unlocks. Returns the statistic change event together with the
    /// grant events it triggered.
    pub fn record_statistic(
        &self,
        player_id: PlayerId,
        statistic: &str,
        amount: i64,
    ) -> ProgressionResult<(StatisticChangeEvent, Vec<AchievementGrantEvent>)> {
        let change = self.store.add_to_statistic(player_id, statistic, amount)?;
        let grants = self.handle_statistic_change(&change);
        Ok((change, grants))
    }
}
