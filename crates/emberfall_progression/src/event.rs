//! # Progression Event Types
//!
//! Typed events describing progression occurrences: players joining and
//! leaving, achievements being granted or revoked, and statistics changing.
//!
//! Events are plain serde structs. The blanket [`Event`] implementation gives
//! every event a stable type name, JSON byte serialization, and `Any` access,
//! so the host's dispatch layer can route them without knowing their concrete
//! types.
//!
//! ## The player event tower
//!
//! Occurrences that involve a player implement the narrowing tower
//! [`EntityEvent`] → [`LivingEvent`] → [`HumanEvent`], plus [`UserEvent`],
//! all capped by [`PlayerEvent`]. For any `PlayerEvent` the entire tower
//! resolves to the same player: the entity, living, human, and user accessors
//! all return identifiers carrying the player's UUID. The
//! [`impl_player_event!`](crate::impl_player_event) macro implements the
//! tower for any event struct with a `player_id` field.
//!
//! ## Delivery
//!
//! The progression data layer *produces* these event values from mutations
//! and returns them to the caller; routing them to listeners is the host's
//! responsibility.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::any::Any;

use crate::error::EventError;
use crate::impl_player_event;
use crate::types::{EntityId, PlayerId};

// ============================================================================
// Event Trait and Blanket Implementation
// ============================================================================

/// Core trait that all events implement.
///
/// This trait provides the fundamental capabilities needed for type-safe
/// event handling:
/// - Serialization for network transmission or storage
/// - Type identification for routing
/// - Dynamic typing support for generic handlers
///
/// Types get this trait automatically through the blanket implementation if
/// they implement the required marker traits.
///
/// # Safety
///
/// Events must be Send + Sync as they may be processed across multiple
/// threads. The Debug requirement ensures events can be logged.
pub trait Event: Send + Sync + Any + std::fmt::Debug {
    /// Returns the type name of this event for debugging and routing.
    fn type_name() -> &'static str
    where
        Self: Sized;

    /// Serializes the event to bytes.
    fn serialize(&self) -> Result<Vec<u8>, EventError>;

    /// Deserializes an event from bytes.
    fn deserialize(data: &[u8]) -> Result<Self, EventError>
    where
        Self: Sized;

    /// Returns a reference to this event as `&dyn Any` for dynamic typing.
    fn as_any(&self) -> &dyn Any;
}

/// Blanket implementation of Event for types that meet the requirements.
///
/// Any type that implements Serialize + DeserializeOwned + Send + Sync + Any
/// + Debug automatically gets an Event implementation with JSON
/// serialization:
///
/// ```rust
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct MyEvent {
///     data: String,
/// }
/// // MyEvent now implements Event automatically!
/// ```
impl<T> Event for T
where
    T: Serialize + DeserializeOwned + Send + Sync + Any + std::fmt::Debug + 'static,
{
    fn type_name() -> &'static str {
        std::any::type_name::<T>()
    }

    fn serialize(&self) -> Result<Vec<u8>, EventError> {
        serde_json::to_vec(self).map_err(EventError::Serialization)
    }

    fn deserialize(data: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(data).map_err(EventError::Deserialization)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Player Event Tower
// ============================================================================

/// An event that involves an entity in the game world.
pub trait EntityEvent: Event {
    /// The entity involved in this event.
    fn entity(&self) -> EntityId;
}

/// An event that involves a living entity.
///
/// The living entity is the same entity returned by [`EntityEvent::entity`];
/// this trait narrows the contract, not the value.
pub trait LivingEvent: EntityEvent {
    /// The living entity involved in this event.
    fn living(&self) -> EntityId {
        self.entity()
    }
}

/// An event that involves a human (player-shaped) entity.
pub trait HumanEvent: LivingEvent {
    /// The human involved in this event.
    fn human(&self) -> EntityId {
        self.living()
    }
}

/// An event that involves a user (a player identity, online or offline).
pub trait UserEvent: Event {
    /// The user involved in this event.
    fn user(&self) -> PlayerId;
}

/// An event that involves an online player.
///
/// Composes [`HumanEvent`] and [`UserEvent`] and narrows every accessor in
/// the tower to the player: for any `PlayerEvent`, `player()`, `user()`,
/// `human()`, `living()`, and `entity()` all carry the same UUID.
pub trait PlayerEvent: HumanEvent + UserEvent {
    /// The player involved in this event.
    fn player(&self) -> PlayerId;
}

// ============================================================================
// Concrete Progression Events
// ============================================================================

/// Event produced when a player joins and their progression record is
/// attached.
///
/// # Examples
///
/// ```rust
/// use emberfall_progression::{current_timestamp, PlayerId, PlayerJoinEvent};
///
/// let event = PlayerJoinEvent {
///     player_id: PlayerId::new(),
///     name: "Steve".to_string(),
///     timestamp: current_timestamp(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerJoinEvent {
    /// Unique identifier for the player
    pub player_id: PlayerId,
    /// Display name the player joined with
    pub name: String,
    /// Unix timestamp when the player joined
    pub timestamp: u64,
}

/// Event produced when a player leaves and their progression record is
/// detached for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerQuitEvent {
    /// Unique identifier for the player
    pub player_id: PlayerId,
    /// Unix timestamp when the player left
    pub timestamp: u64,
}

/// Event produced when an achievement is granted to a player.
///
/// Granting an achievement whose prerequisites have not been earned yet
/// produces one grant event per newly earned ancestor, root first, followed
/// by the event for the achievement itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementGrantEvent {
    /// Unique identifier for the player
    pub player_id: PlayerId,
    /// Identifier of the granted achievement
    pub achievement: String,
    /// How many times the achievement has now been granted
    pub grant_count: u32,
    /// Unix timestamp when the grant happened
    pub timestamp: u64,
}

/// Event produced when an achievement is revoked from a player.
///
/// Revoking an achievement also revokes its dependent achievements, one
/// revoke event each, deepest dependent first. When a revoked achievement
/// has a source statistic, that statistic is reset and recorded on the
/// event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementRevokeEvent {
    /// Unique identifier for the player
    pub player_id: PlayerId,
    /// Identifier of the revoked achievement
    pub achievement: String,
    /// Source statistic that was reset along with the revoke, if any
    pub reset_statistic: Option<String>,
    /// Unix timestamp when the revoke happened
    pub timestamp: u64,
}

/// Event produced when a player's statistic changes.
///
/// `previous_value`/`new_value` are `None` when the statistic was unset on
/// that side of the change: a first set has `previous_value: None`, a reset
/// has `new_value: None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticChangeEvent {
    /// Unique identifier for the player
    pub player_id: PlayerId,
    /// Identifier of the changed statistic
    pub statistic: String,
    /// Value before the change, if the statistic was set
    pub previous_value: Option<i64>,
    /// Value after the change, or `None` when the statistic was reset
    pub new_value: Option<i64>,
    /// Unix timestamp when the change happened
    pub timestamp: u64,
}

impl_player_event!(PlayerJoinEvent);
impl_player_event!(PlayerQuitEvent);
impl_player_event!(AchievementGrantEvent);
impl_player_event!(AchievementRevokeEvent);
impl_player_event!(StatisticChangeEvent);
