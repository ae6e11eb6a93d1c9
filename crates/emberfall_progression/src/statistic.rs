//! # Statistic Definitions
//!
//! Statistics are named per-player counters (blocks broken, mobs slain, and
//! so on). Every statistic belongs to exactly one [`StatisticGroup`], which
//! gives game content a way to query related counters together.

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, DefinitionResult};
use crate::types::validate_catalog_id;

/// A grouping of related statistics.
///
/// Groups exist so that a whole family of counters ("combat", "mining") can
/// be fetched in one call. Groups must be registered before the statistics
/// that reference them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticGroup {
    /// Stable catalog identifier (lowercase snake_case)
    pub id: String,
    /// Display name shown to players
    pub name: String,
}

impl StatisticGroup {
    /// Creates a validated statistic group definition.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] when the identifier is not lowercase
    /// snake_case or the display name is empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> DefinitionResult<Self> {
        let id = id.into();
        let name = name.into();
        validate_catalog_id(&id)?;
        if name.trim().is_empty() {
            return Err(DefinitionError::EmptyName(id));
        }
        Ok(Self { id, name })
    }
}

/// A named per-player counter tracked by the progression system.
///
/// # Examples
///
/// ```rust
/// use emberfall_progression::Statistic;
///
/// let statistic = Statistic::builder("mobs_slain")
///     .name("Mobs Slain")
///     .group("combat")
///     .build()
///     .expect("valid definition");
///
/// assert_eq!(statistic.group, "combat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistic {
    /// Stable catalog identifier (lowercase snake_case)
    pub id: String,
    /// Display name shown to players
    pub name: String,
    /// Group this statistic belongs to
    pub group: String,
}

impl Statistic {
    /// Starts building a statistic definition with the given identifier.
    pub fn builder(id: impl Into<String>) -> StatisticBuilder {
        StatisticBuilder::new(id)
    }
}

/// Builder for [`Statistic`] definitions.
#[derive(Debug, Clone, Default)]
pub struct StatisticBuilder {
    id: String,
    name: Option<String>,
    group: Option<String>,
}

impl StatisticBuilder {
    /// Creates a builder for the given statistic identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the group this statistic belongs to.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Validates the definition and produces the [`Statistic`].
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] when the identifier is not lowercase
    /// snake_case or the display name or group is missing.
    pub fn build(self) -> DefinitionResult<Statistic> {
        validate_catalog_id(&self.id)?;

        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(DefinitionError::EmptyName(self.id)),
        };

        let group = match self.group {
            Some(group) if !group.trim().is_empty() => group,
            _ => return Err(DefinitionError::EmptyName(self.id)),
        };

        Ok(Statistic {
            id: self.id,
            name,
            group,
        })
    }
}
