//! # Achievement Definitions
//!
//! Achievements are named milestones a player may earn. Each definition lives
//! in the progression catalog and may name a parent achievement (earned along
//! the way to this one) and a source statistic (the counter that counts toward
//! earning it, together with the value the counter must reach).
//!
//! Definitions are built through [`AchievementBuilder`], which validates the
//! identifier format and cross-field constraints before the definition can be
//! registered.

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, DefinitionResult};
use crate::types::validate_catalog_id;

/// A named milestone a player may earn.
///
/// Achievements form a tree through their `parent` references: a parent is a
/// prerequisite earned on the way to its children, and revoking a parent also
/// revokes every dependent achievement below it.
///
/// When `source_statistic` is set, the named statistic counts toward this
/// achievement and `target_value` holds the value the counter must reach.
/// Revoking the achievement resets that statistic.
///
/// # Examples
///
/// ```rust
/// use emberfall_progression::Achievement;
///
/// let slayer = Achievement::builder("slayer_1")
///     .name("Slayer I")
///     .description("Defeat 100 enemies")
///     .parent("first_blood")
///     .source_statistic("mobs_slain", 100)
///     .build()
///     .expect("valid definition");
///
/// assert_eq!(slayer.id, "slayer_1");
/// assert_eq!(slayer.target_value, Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable catalog identifier (lowercase snake_case)
    pub id: String,
    /// Display name shown to players
    pub name: String,
    /// Description of what must be done to earn the achievement
    pub description: String,
    /// Prerequisite achievement earned on the way to this one
    pub parent: Option<String>,
    /// Statistic that counts toward earning this achievement
    pub source_statistic: Option<String>,
    /// Value the source statistic must reach
    pub target_value: Option<i64>,
}

impl Achievement {
    /// Starts building an achievement definition with the given identifier.
    pub fn builder(id: impl Into<String>) -> AchievementBuilder {
        AchievementBuilder::new(id)
    }
}

/// Builder for [`Achievement`] definitions.
#[derive(Debug, Clone, Default)]
pub struct AchievementBuilder {
    id: String,
    name: Option<String>,
    description: Option<String>,
    parent: Option<String>,
    source_statistic: Option<String>,
    target_value: Option<i64>,
}

impl AchievementBuilder {
    /// Creates a builder for the given achievement identifier.
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

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Names the prerequisite achievement.
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Links a source statistic and the value it must reach.
    pub fn source_statistic(mut self, statistic: impl Into<String>, target_value: i64) -> Self {
        self.source_statistic = Some(statistic.into());
        self.target_value = Some(target_value);
        self
    }

    /// Validates the definition and produces the [`Achievement`].
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] when the identifier is not lowercase
    /// snake_case, the display name is missing, the achievement names itself
    /// as parent, or the statistic link is incomplete or non-positive.
    pub fn build(self) -> DefinitionResult<Achievement> {
        validate_catalog_id(&self.id)?;

        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(DefinitionError::EmptyName(self.id)),
        };

        if self.parent.as_deref() == Some(self.id.as_str()) {
            return Err(DefinitionError::SelfParent(self.id));
        }

        match (&self.source_statistic, self.target_value) {
            (None, Some(_)) => return Err(DefinitionError::TargetWithoutStatistic(self.id)),
            (Some(_), None) => return Err(DefinitionError::StatisticWithoutTarget(self.id)),
            (Some(_), Some(target)) if target <= 0 => {
                return Err(DefinitionError::NonPositiveTarget(self.id, target));
            }
            _ => {}
        }

        Ok(Achievement {
            id: self.id,
            name,
            description: self.description.unwrap_or_default(),
            parent: self.parent,
            source_statistic: self.source_statistic,
            target_value: self.target_value,
        })
    }
}
