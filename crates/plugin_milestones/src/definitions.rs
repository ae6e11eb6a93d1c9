//! Built-in milestone catalog.
//!
//! The default content shipped with the plugin: statistic groups, the
//! statistics they contain, and tiered achievements linked to those
//! statistics. Servers can extend the catalog with their own TOML documents
//! after installing this one.

use emberfall_progression::{
    Achievement, ProgressionRegistry, RegistryResult, Statistic, StatisticGroup,
};

/// Registers the built-in milestone catalog into the given registry.
pub fn install(registry: &ProgressionRegistry) -> RegistryResult<()> {
    for (id, name) in groups() {
        registry.register_group(StatisticGroup::new(id, name)?)?;
    }
    for (id, name, group) in statistics() {
        registry.register_statistic(Statistic::builder(id).name(name).group(group).build()?)?;
    }
    for achievement in achievements() {
        registry.register_achievement(achievement?)?;
    }
    Ok(())
}

fn groups() -> Vec<(&'static str, &'static str)> {
    vec![
        ("combat", "Combat"),
        ("mining", "Mining"),
        ("exploration", "Exploration"),
    ]
}

fn statistics() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("mobs_slain", "Mobs Slain", "combat"),
        ("bosses_slain", "Bosses Slain", "combat"),
        ("blocks_mined", "Blocks Mined", "mining"),
        ("chunks_explored", "Chunks Explored", "exploration"),
    ]
}

// ═══════════════════════════════════════════════════════════════
// ACHIEVEMENT TIERS
// ═══════════════════════════════════════════════════════════════
fn achievements() -> Vec<emberfall_progression::DefinitionResult<Achievement>> {
    vec![
        Achievement::builder("first_blood")
            .name("First Blood")
            .description("Defeat your first enemy")
            .source_statistic("mobs_slain", 1)
            .build(),
        Achievement::builder("slayer_1")
            .name("Slayer I")
            .description("Defeat 100 enemies")
            .parent("first_blood")
            .source_statistic("mobs_slain", 100)
            .build(),
        Achievement::builder("slayer_2")
            .name("Slayer II")
            .description("Defeat 1,000 enemies")
            .parent("slayer_1")
            .source_statistic("mobs_slain", 1_000)
            .build(),
        Achievement::builder("slayer_3")
            .name("Slayer III")
            .description("Defeat 10,000 enemies")
            .parent("slayer_2")
            .source_statistic("mobs_slain", 10_000)
            .build(),
        Achievement::builder("boss_hunter_1")
            .name("Boss Hunter I")
            .description("Defeat your first boss")
            .source_statistic("bosses_slain", 1)
            .build(),
        Achievement::builder("boss_hunter_2")
            .name("Boss Hunter II")
            .description("Defeat 10 bosses")
            .parent("boss_hunter_1")
            .source_statistic("bosses_slain", 10)
            .build(),
        Achievement::builder("getting_wood")
            .name("Getting Wood")
            .description("Mine your first block")
            .source_statistic("blocks_mined", 1)
            .build(),
        Achievement::builder("miner_1")
            .name("Miner I")
            .description("Mine 1,000 blocks")
            .parent("getting_wood")
            .source_statistic("blocks_mined", 1_000)
            .build(),
        Achievement::builder("cartographer")
            .name("Cartographer")
            .description("Explore 100 chunks")
            .source_statistic("chunks_explored", 100)
            .build(),
    ]
}
