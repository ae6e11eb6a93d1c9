//! # Utility Functions
//!
//! Convenience helpers shared across the progression system.
//!
//! ## Key Functions
//!
//! - [`current_timestamp()`] - Consistent timestamp generation
//! - [`create_progression_store()`] - Store factory function

use std::sync::Arc;

use crate::registry::ProgressionRegistry;
use crate::store::ProgressionStore;

/// Returns the current Unix timestamp in seconds.
///
/// This function provides a consistent way to get timestamps across the
/// entire system. All events should use this function for timestamp
/// generation to ensure consistency.
///
/// # Panics
///
/// Panics if the system clock is set to a time before the Unix epoch
/// (January 1, 1970). This should never happen in practice on modern systems.
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

/// Creates a progression store over the given registry.
///
/// This is the primary factory function for hosts embedding the progression
/// system. The returned store is ready to attach player records and can be
/// safely shared across threads.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use emberfall_progression::{create_progression_store, ProgressionRegistry};
///
/// let registry = Arc::new(ProgressionRegistry::new());
/// let store = create_progression_store(registry);
/// assert_eq!(store.player_count(), 0);
/// ```
pub fn create_progression_store(registry: Arc<ProgressionRegistry>) -> Arc<ProgressionStore> {
    Arc::new(ProgressionStore::new(registry))
}
