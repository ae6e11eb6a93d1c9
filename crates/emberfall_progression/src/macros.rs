//! Macros for progression event types

/// Implements the player event tower for an event struct.
///
/// The struct must have a `player_id: PlayerId` field. The macro implements
/// [`EntityEvent`](crate::event::EntityEvent),
/// [`LivingEvent`](crate::event::LivingEvent),
/// [`HumanEvent`](crate::event::HumanEvent),
/// [`UserEvent`](crate::event::UserEvent), and
/// [`PlayerEvent`](crate::event::PlayerEvent), with every accessor resolving
/// to the same player.
///
/// # Examples
///
/// ```rust
/// use emberfall_progression::{impl_player_event, PlayerId};
/// use emberfall_progression::event::PlayerEvent;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct PlayerSneezeEvent {
///     player_id: PlayerId,
///     volume: f32,
/// }
///
/// impl_player_event!(PlayerSneezeEvent);
///
/// let event = PlayerSneezeEvent { player_id: PlayerId::new(), volume: 0.8 };
/// assert_eq!(event.player(), event.player_id);
/// ```
#[macro_export]
macro_rules! impl_player_event {
    ($event:ty) => {
        impl $crate::event::EntityEvent for $event {
            fn entity(&self) -> $crate::types::EntityId {
                $crate::types::EntityId::from(self.player_id)
            }
        }

        impl $crate::event::LivingEvent for $event {}

        impl $crate::event::HumanEvent for $event {}

        impl $crate::event::UserEvent for $event {
            fn user(&self) -> $crate::types::PlayerId {
                self.player_id
            }
        }

        impl $crate::event::PlayerEvent for $event {
            fn player(&self) -> $crate::types::PlayerId {
                self.player_id
            }
        }
    };
}
