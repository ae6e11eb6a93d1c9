//! # Progression Catalog Registry
//!
//! The [`ProgressionRegistry`] is the concurrent catalog of every achievement,
//! statistic, and statistic group known to the server. Game content registers
//! definitions at startup (in code through the builders, or declaratively
//! from a TOML catalog document), and the per-player data layer consults the
//! registry for validation and cascade relationships.
//!
//! Registration order matters: groups before the statistics that reference
//! them, statistics before the achievements that source them, and parent
//! achievements before their children. Because a parent must already exist
//! when a child is registered, the achievement graph is always a forest and
//! cascade traversals cannot loop.

use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::achievement::Achievement;
use crate::error::{RegistryError, RegistryResult};
use crate::statistic::{Statistic, StatisticGroup};

// ============================================================================
// Registry Implementation
// ============================================================================

/// Concurrent catalog of progression definitions.
///
/// # Thread Safety
///
/// The registry is fully thread-safe and intended to be shared as
/// `Arc<ProgressionRegistry>` between the store, storage, and any plugins.
///
/// # Examples
///
/// ```rust
/// use emberfall_progression::{Achievement, ProgressionRegistry, Statistic, StatisticGroup};
///
/// let registry = ProgressionRegistry::new();
/// registry.register_group(StatisticGroup::new("combat", "Combat")?)?;
/// registry.register_statistic(
///     Statistic::builder("mobs_slain").name("Mobs Slain").group("combat").build()?,
/// )?;
/// registry.register_achievement(
///     Achievement::builder("first_blood")
///         .name("First Blood")
///         .description("Defeat your first enemy")
///         .source_statistic("mobs_slain", 1)
///         .build()?,
/// )?;
///
/// assert!(registry.achievement("first_blood").is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct ProgressionRegistry {
    /// All achievement definitions by id
    achievements: DashMap<String, Arc<Achievement>>,
    /// All statistic definitions by id
    statistics: DashMap<String, Arc<Statistic>>,
    /// All statistic group definitions by id
    groups: DashMap<String, Arc<StatisticGroup>>,
    /// Achievement -> direct dependent achievements
    children: DashMap<String, Vec<String>>,
    /// Statistic -> achievements sourcing it
    statistic_links: DashMap<String, Vec<String>>,
    /// Group -> member statistics
    group_members: DashMap<String, Vec<String>>,
}

impl ProgressionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a statistic group.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateGroup`] if the id is already taken.
    pub fn register_group(&self, group: StatisticGroup) -> RegistryResult<()> {
        if self.groups.contains_key(&group.id) {
            return Err(RegistryError::DuplicateGroup(group.id));
        }
        debug!("Registered statistic group: {}", group.id);
        self.group_members.entry(group.id.clone()).or_default();
        self.groups.insert(group.id.clone(), Arc::new(group));
        Ok(())
    }

    /// Registers a statistic.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateStatistic`] if the id is already
    /// taken, or [`RegistryError::UnknownGroup`] if the statistic's group has
    /// not been registered yet.
    pub fn register_statistic(&self, statistic: Statistic) -> RegistryResult<()> {
        if self.statistics.contains_key(&statistic.id) {
            return Err(RegistryError::DuplicateStatistic(statistic.id));
        }
        if !self.groups.contains_key(&statistic.group) {
            return Err(RegistryError::UnknownGroup(statistic.id, statistic.group));
        }

        self.group_members
            .entry(statistic.group.clone())
            .or_default()
            .push(statistic.id.clone());
        self.statistic_links.entry(statistic.id.clone()).or_default();

        debug!("Registered statistic: {} (group {})", statistic.id, statistic.group);
        self.statistics
            .insert(statistic.id.clone(), Arc::new(statistic));
        Ok(())
    }

    /// Registers an achievement.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateAchievement`] if the id is already
    /// taken, [`RegistryError::UnknownParent`] if the parent has not been
    /// registered yet, or [`RegistryError::UnknownSourceStatistic`] if the
    /// linked statistic is missing.
    pub fn register_achievement(&self, achievement: Achievement) -> RegistryResult<()> {
        if self.achievements.contains_key(&achievement.id) {
            return Err(RegistryError::DuplicateAchievement(achievement.id));
        }
        if let Some(parent) = &achievement.parent {
            if !self.achievements.contains_key(parent) {
                return Err(RegistryError::UnknownParent(
                    achievement.id,
                    parent.clone(),
                ));
            }
        }
        if let Some(statistic) = &achievement.source_statistic {
            if !self.statistics.contains_key(statistic) {
                return Err(RegistryError::UnknownSourceStatistic(
                    achievement.id,
                    statistic.clone(),
                ));
            }
        }

        if let Some(parent) = &achievement.parent {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(achievement.id.clone());
        }
        if let Some(statistic) = &achievement.source_statistic {
            self.statistic_links
                .entry(statistic.clone())
                .or_default()
                .push(achievement.id.clone());
        }
        self.children.entry(achievement.id.clone()).or_default();

        info!("🏆 Registered achievement: {}", achievement.id);
        self.achievements
            .insert(achievement.id.clone(), Arc::new(achievement));
        Ok(())
    }

    /// Looks up an achievement definition.
    pub fn achievement(&self, id: &str) -> Option<Arc<Achievement>> {
        self.achievements.get(id).map(|entry| entry.clone())
    }

    /// Looks up a statistic definition.
    pub fn statistic(&self, id: &str) -> Option<Arc<Statistic>> {
        self.statistics.get(id).map(|entry| entry.clone())
    }

    /// Looks up a statistic group definition.
    pub fn group(&self, id: &str) -> Option<Arc<StatisticGroup>> {
        self.groups.get(id).map(|entry| entry.clone())
    }

    /// Returns all registered achievements, ordered by id.
    pub fn achievements(&self) -> Vec<Arc<Achievement>> {
        let mut all: Vec<_> = self
            .achievements
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Returns all registered statistics, ordered by id.
    pub fn statistics(&self) -> Vec<Arc<Statistic>> {
        let mut all: Vec<_> = self
            .statistics
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Returns the statistics that belong to the given group, ordered by id.
    pub fn statistics_in_group(&self, group: &str) -> Vec<Arc<Statistic>> {
        let mut members: Vec<Arc<Statistic>> = self
            .group_members
            .get(group)
            .map(|ids| ids.iter().filter_map(|id| self.statistic(id)).collect())
            .unwrap_or_default();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        members
    }

    /// Returns the direct dependents of the given achievement.
    pub fn children(&self, achievement: &str) -> Vec<String> {
        self.children
            .get(achievement)
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }

    /// Returns every transitive dependent of the given achievement.
    ///
    /// The result is ordered deepest-first so a revoke cascade can walk it
    /// directly, removing leaves before the achievements they depend on.
    pub fn descendants(&self, achievement: &str) -> Vec<String> {
        let mut ordered = Vec::new();
        let mut stack = self.children(achievement);
        while let Some(id) = stack.pop() {
            stack.extend(self.children(&id));
            ordered.push(id);
        }
        ordered.reverse();
        ordered
    }

    /// Returns the un-earned prerequisite chain of the given achievement,
    /// ordered root-first. The chain includes every ancestor up to the root.
    pub fn ancestors(&self, achievement: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self
            .achievement(achievement)
            .and_then(|def| def.parent.clone());
        while let Some(id) = current {
            current = self.achievement(&id).and_then(|def| def.parent.clone());
            chain.push(id);
        }
        chain.reverse();
        chain
    }

    /// Returns the achievements that source the given statistic.
    pub fn linked_achievements(&self, statistic: &str) -> Vec<Arc<Achievement>> {
        self.statistic_links
            .get(statistic)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.achievement(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Loads a TOML catalog document into the registry.
    ///
    /// The document lists groups, statistics, and achievements; entries are
    /// registered in that order, and achievements are registered in document
    /// order so parents can be declared before their children:
    ///
    /// ```toml
    /// [[group]]
    /// id = "combat"
    /// name = "Combat"
    ///
    /// [[statistic]]
    /// id = "mobs_slain"
    /// name = "Mobs Slain"
    /// group = "combat"
    ///
    /// [[achievement]]
    /// id = "first_blood"
    /// name = "First Blood"
    /// description = "Defeat your first enemy"
    /// source_statistic = "mobs_slain"
    /// target_value = 1
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CatalogParse`] for malformed TOML, or the
    /// relevant registration error for invalid entries. Entries registered
    /// before the failing one remain registered.
    pub fn load_toml_catalog(&self, document: &str) -> RegistryResult<()> {
        let catalog: CatalogDocument = toml::from_str(document)?;

        for entry in catalog.groups {
            self.register_group(StatisticGroup::new(entry.id, entry.name)?)?;
        }
        for entry in catalog.statistics {
            self.register_statistic(
                Statistic::builder(entry.id)
                    .name(entry.name)
                    .group(entry.group)
                    .build()?,
            )?;
        }
        for entry in catalog.achievements {
            let mut builder = Achievement::builder(entry.id)
                .name(entry.name)
                .description(entry.description.unwrap_or_default());
            if let Some(parent) = entry.parent {
                builder = builder.parent(parent);
            }
            if let (Some(statistic), Some(target)) = (entry.source_statistic, entry.target_value) {
                builder = builder.source_statistic(statistic, target);
            }
            self.register_achievement(builder.build()?)?;
        }

        info!(
            "📋 Catalog loaded: {} achievements, {} statistics, {} groups",
            self.achievements.len(),
            self.statistics.len(),
            self.groups.len()
        );
        Ok(())
    }
}

// ============================================================================
// TOML Catalog Document
// ============================================================================

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default, rename = "group")]
    groups: Vec<GroupEntry>,
    #[serde(default, rename = "statistic")]
    statistics: Vec<StatisticEntry>,
    #[serde(default, rename = "achievement")]
    achievements: Vec<AchievementEntry>,
}

#[derive(Debug, Deserialize)]
struct GroupEntry {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct StatisticEntry {
    id: String,
    name: String,
    group: String,
}

#[derive(Debug, Deserialize)]
struct AchievementEntry {
    id: String,
    name: String,
    description: Option<String>,
    parent: Option<String>,
    source_statistic: Option<String>,
    target_value: Option<i64>,
}
