//! # Emberfall Progression
//!
//! Player progression for the Emberfall game server ecosystem: per-player
//! achievement and statistic tracking behind typed data-manipulator
//! contracts, with the event types those mutations produce.
//!
//! ## Core Features
//!
//! - **Typed Data Manipulators**: [`AchievementData`] and [`StatisticsData`]
//!   expose get/set/reset contracts over one slice of a player's state
//! - **Catalog Registry**: achievements, statistics, and groups registered
//!   through validating builders or declarative TOML catalogs
//! - **Cascade Semantics**: granting earns prerequisites, revoking removes
//!   dependent achievements and resets the statistics that count toward them
//! - **Typed Events**: every mutation returns the serde-serializable event
//!   values it produced, capped by the [`event::PlayerEvent`] narrowing tower
//! - **Persistence**: per-player JSON snapshots with atomic writes
//!
//! ## Architecture Overview
//!
//! The crate is organized around three layers:
//!
//! - The **catalog** ([`ProgressionRegistry`]) holds the definitions game
//!   content registers at startup.
//! - The **data layer** ([`PlayerProgression`], [`ProgressionStore`])
//!   implements the manipulator contracts against the catalog.
//! - The **storage layer** ([`ProgressionStorage`],
//!   [`JsonProgressionStorage`]) persists plain snapshots.
//!
//! Event *delivery* is deliberately out of scope: mutations return event
//! values and the host routes them however it dispatches events.
//!
//! ## Quick Start Example
//!
//! ```rust
//! use std::sync::Arc;
//! use emberfall_progression::{create_progression_store, PlayerId, ProgressionRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(ProgressionRegistry::new());
//! registry.load_toml_catalog(r#"
//!     [[group]]
//!     id = "combat"
//!     name = "Combat"
//!
//!     [[statistic]]
//!     id = "mobs_slain"
//!     name = "Mobs Slain"
//!     group = "combat"
//!
//!     [[achievement]]
//!     id = "first_blood"
//!     name = "First Blood"
//!     description = "Defeat your first enemy"
//!     source_statistic = "mobs_slain"
//!     target_value = 1
//! "#)?;
//!
//! let store = create_progression_store(registry);
//! let player_id = PlayerId::new();
//!
//! store.join_player(player_id, "Steve");
//! store.add_to_statistic(player_id, "mobs_slain", 1)?;
//! let grants = store.grant_achievement(player_id, "first_blood")?;
//! assert_eq!(grants.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod achievement;
pub mod data;
pub mod error;
pub mod event;
mod macros;
pub mod registry;
pub mod statistic;
pub mod storage;
pub mod store;
pub mod types;
pub mod utils;

pub use achievement::{Achievement, AchievementBuilder};
pub use data::{
    AchievementData, DataManipulator, PlayerProgression, ProgressionSnapshot, StatisticsData,
};
pub use error::{
    DefinitionError, DefinitionResult, EventError, ProgressionError, ProgressionResult,
    RegistryError, RegistryResult, StorageError, StorageResult,
};
pub use event::{
    AchievementGrantEvent, AchievementRevokeEvent, EntityEvent, Event, HumanEvent, LivingEvent,
    PlayerEvent, PlayerJoinEvent, PlayerQuitEvent, StatisticChangeEvent, UserEvent,
};
pub use registry::ProgressionRegistry;
pub use statistic::{Statistic, StatisticBuilder, StatisticGroup};
pub use storage::{JsonProgressionStorage, ProgressionStorage};
pub use store::ProgressionStore;
pub use types::{EntityId, PlayerId};
pub use utils::{create_progression_store, current_timestamp};
