//! End-to-end progression flow: catalog load, play session, persistence.

use std::sync::Arc;

use emberfall_progression::{
    create_progression_store, JsonProgressionStorage, PlayerId, ProgressionRegistry,
    ProgressionStorage,
};

const CATALOG: &str = r#"
[[group]]
id = "combat"
name = "Combat"

[[statistic]]
id = "mobs_slain"
name = "Mobs Slain"
group = "combat"

[[achievement]]
id = "first_blood"
name = "First Blood"
description = "Defeat your first enemy"
source_statistic = "mobs_slain"
target_value = 1

[[achievement]]
id = "slayer_1"
name = "Slayer I"
description = "Defeat 100 enemies"
parent = "first_blood"
source_statistic = "mobs_slain"
target_value = 100
"#;

#[tokio::test]
async fn test_session_survives_persistence_roundtrip() {
    let registry = Arc::new(ProgressionRegistry::new());
    registry.load_toml_catalog(CATALOG).expect("catalog should load");
    let store = create_progression_store(registry.clone());

    let dir = tempfile::tempdir().expect("temp dir");
    let storage = JsonProgressionStorage::new(dir.path().to_path_buf());

    // A short play session
    let player_id = PlayerId::new();
    store.join_player(player_id, "Steve");
    store.add_to_statistic(player_id, "mobs_slain", 120).expect("add");
    let grants = store
        .grant_achievement(player_id, "slayer_1")
        .expect("grant should succeed");
    // Prerequisite earned along the way
    assert_eq!(grants.len(), 2);

    // Player leaves; the final snapshot is persisted
    let (snapshot, _quit) = store.quit_player(player_id).expect("record should exist");
    storage.save(&snapshot).await.expect("save should succeed");
    assert!(!store.contains_player(player_id));

    // Server restart: a fresh store over the same catalog
    let store = create_progression_store(registry);
    for snapshot in storage.load_all().await.expect("load_all should succeed") {
        store.restore(snapshot);
    }

    assert!(store.has_achievement(player_id, "slayer_1"));
    assert!(store.has_achievement(player_id, "first_blood"));
    assert_eq!(store.statistic(player_id, "mobs_slain"), Some(120));

    // Revoking the root achievement clears the whole chain and its counter
    let revokes = store
        .revoke_achievement(player_id, "first_blood")
        .expect("revoke should succeed");
    assert_eq!(revokes.len(), 2);
    assert!(!store.has_achievement(player_id, "slayer_1"));
    assert_eq!(store.statistic(player_id, "mobs_slain"), None);
}
