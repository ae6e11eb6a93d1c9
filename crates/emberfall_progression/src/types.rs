//! # Core Type Definitions
//!
//! This module contains the fundamental identifier types used throughout the
//! Emberfall progression system. These types are the building blocks for
//! player identity and for addressing entries in the progression catalog.
//!
//! ## Key Types
//!
//! - [`PlayerId`] - Unique identifier for players in the game world
//! - [`EntityId`] - Unique identifier for entities (players included)
//!
//! ## Design Principles
//!
//! - **Type Safety**: Wrapper types prevent ID confusion (PlayerId vs EntityId)
//! - **Serialization**: All types support JSON serialization for storage and
//!   network transmission
//! - **Stability**: Catalog identifiers are plain lowercase strings so game
//!   content can reference them from configuration files

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DefinitionError;

// ============================================================================
// Core Types (Minimal set)
// ============================================================================

/// Unique identifier for a player in the game world.
///
/// This is a wrapper around UUID that provides type safety and ensures
/// player IDs cannot be confused with other types of IDs in the system.
///
/// # Examples
///
/// ```rust
/// use emberfall_progression::PlayerId;
///
/// // Create a new random player ID
/// let player_id = PlayerId::new();
///
/// // Convert to string for logging/display
/// println!("Player ID: {}", player_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Creates a new random player ID using UUID v4.
    ///
    /// This method is cryptographically secure and provides sufficient
    /// entropy to avoid collisions in practical use.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a player ID from a string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - A string slice containing a valid UUID
    ///
    /// # Returns
    ///
    /// Returns `Ok(PlayerId)` if the string is a valid UUID, otherwise returns
    /// `Err(uuid::Error)` with details about the parsing failure.
    pub fn from_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an entity in the game world.
///
/// Players are entities, so a [`PlayerId`] converts losslessly into an
/// `EntityId` carrying the same underlying UUID. The wrapper keeps entity
/// references from being mixed up with player references in API signatures.
///
/// # Examples
///
/// ```rust
/// use emberfall_progression::{EntityId, PlayerId};
///
/// let player_id = PlayerId::new();
/// let entity_id = EntityId::from(player_id);
/// assert_eq!(entity_id.0, player_id.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Creates a new random entity ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<PlayerId> for EntityId {
    fn from(player_id: PlayerId) -> Self {
        Self(player_id.0)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Catalog Identifier Validation
// ============================================================================

/// Validates a catalog identifier (achievement, statistic, or group id).
///
/// Identifiers are lowercase `snake_case`: ASCII lowercase letters, digits,
/// and underscores, starting with a letter. They are referenced from TOML
/// catalogs and storage files, so the format is enforced at build time.
pub(crate) fn validate_catalog_id(id: &str) -> Result<(), DefinitionError> {
    if id.is_empty() {
        return Err(DefinitionError::EmptyId);
    }
    let mut chars = id.chars();
    let first_ok = chars
        .next()
        .map(|c| c.is_ascii_lowercase())
        .unwrap_or(false);
    let rest_ok = id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !first_ok || !rest_ok {
        return Err(DefinitionError::InvalidId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_uniqueness() {
        let a = PlayerId::new();
        let b = PlayerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_player_id_parse_roundtrip() {
        let id = PlayerId::new();
        let parsed = PlayerId::from_str(&id.to_string()).expect("valid uuid should parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_entity_id_from_player_id() {
        let player_id = PlayerId::new();
        let entity_id = EntityId::from(player_id);
        assert_eq!(entity_id.0, player_id.0);
    }

    #[test]
    fn test_catalog_id_validation() {
        assert!(validate_catalog_id("mobs_slain").is_ok());
        assert!(validate_catalog_id("slayer_2").is_ok());
        assert!(validate_catalog_id("").is_err());
        assert!(validate_catalog_id("MobsSlain").is_err());
        assert!(validate_catalog_id("2fast").is_err());
        assert!(validate_catalog_id("mobs-slain").is_err());
    }
}
