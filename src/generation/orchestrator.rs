//! Runs every generator in dependency order inside one transaction.

use rusqlite::Transaction;
use thiserror::Error;
use tracing::{info, info_span};

use crate::config::{ConfigError, WorldConfig};
use crate::generation::items::{
    generate_armor_items, generate_consumable_items, generate_hardware_items,
    generate_implant_items, generate_software_items, generate_weapon_items, PlacementPools,
};
use crate::generation::rng::WorldRng;
use crate::generation::shops::{generate_shop_inventory, generate_shops, ItemPools};
use crate::generation::{
    buildings, characters, connections, devices, files, locations, missions, networks, puzzles,
    story, vulnerabilities,
};
use crate::model::{World, WorldId, WorldMetadata, WORLD_FORMAT_VERSION};
use crate::world::{SqliteStore, WorldDb, WorldDbError, WorldStore};

const NAME_ADJECTIVES: &[&str] = &[
    "Cyber", "Digital", "Neon", "Shadow", "Chrome", "Quantum", "Synthetic", "Virtual",
];
const NAME_NOUNS: &[&str] = &[
    "Realm", "Nexus", "Matrix", "Grid", "Domain", "Sphere", "Network", "Pulse",
];

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid world request: {0}")]
    InvalidRequest(#[from] ConfigError),
    #[error("world store error: {0}")]
    Store(#[from] WorldDbError),
    #[error("stage {stage} failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: WorldDbError,
    },
}

/// Rows written per stage, in the order the stages ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub stages: Vec<(&'static str, usize)>,
}

impl GenerationSummary {
    pub fn rows(&self, stage: &str) -> Option<usize> {
        self.stages
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, rows)| *rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedWorld {
    pub world_id: WorldId,
    pub seed: u64,
    pub summary: GenerationSummary,
}

pub fn default_world_name(rng: &mut WorldRng) -> String {
    format!("{} {}", rng.pick(NAME_ADJECTIVES), rng.pick(NAME_NOUNS))
}

/// Runs one stage inside its own savepoint. The savepoint is released when
/// the stage succeeds and rolled back when it fails.
fn run_stage<T>(
    tx: &mut Transaction<'_>,
    summary: &mut GenerationSummary,
    stage: &'static str,
    rng: &mut WorldRng,
    work: impl FnOnce(&dyn WorldStore, &mut WorldRng) -> Result<Vec<T>, WorldDbError>,
) -> Result<Vec<T>, GenerationError> {
    let stage_err = |source: WorldDbError| GenerationError::Stage { stage, source };
    let savepoint = tx
        .savepoint()
        .map_err(|err| stage_err(WorldDbError::from(err)))?;
    let rows = {
        let store = SqliteStore::new(&savepoint);
        work(&store, rng).map_err(stage_err)?
    };
    savepoint
        .commit()
        .map_err(|err| stage_err(WorldDbError::from(err)))?;
    info!(stage, rows = rows.len(), "stage complete");
    summary.stages.push((stage, rows.len()));
    Ok(rows)
}

/// Generates a whole world and commits it atomically. Any failing stage
/// rolls the entire world back.
pub fn generate_world(
    db: &mut WorldDb,
    config: &WorldConfig,
) -> Result<GeneratedWorld, GenerationError> {
    config.validate()?;
    let counts = config.counts();
    let mut rng = WorldRng::new(config.seed);
    let seed = rng.seed();
    let name = match &config.name {
        Some(name) => name.clone(),
        None => default_world_name(&mut rng),
    };
    let world_id = WorldId(rng.next_uuid());
    let span = info_span!("generate_world", world = %name, seed);
    let _guard = span.enter();
    info!(complexity = config.complexity, "generating world");

    let mut summary = GenerationSummary::default();
    let mut tx = db.transaction()?;
    let rng = &mut rng;

    let world = World {
        id: world_id,
        description: format!(
            "A procedurally generated world of complexity {}.",
            config.complexity
        ),
        name,
        author: config.author.clone(),
        version: WORLD_FORMAT_VERSION.to_string(),
        complexity: config.complexity,
        is_active: true,
        metadata: WorldMetadata { seed, counts },
    };
    run_stage(&mut tx, &mut summary, "world", rng, |store, _| {
        store.insert_world(&world)?;
        Ok(vec![world.id])
    })?;

    let cities = run_stage(&mut tx, &mut summary, "cities", rng, |store, rng| {
        locations::generate_cities(store, world_id, counts.cities, rng)
    })?;
    let districts = run_stage(&mut tx, &mut summary, "districts", rng, |store, rng| {
        locations::generate_districts(store, &cities, counts.districts_per_city, rng)
    })?;
    let specials = run_stage(&mut tx, &mut summary, "special_locations", rng, |store, rng| {
        locations::generate_special_locations(store, world_id, counts.special_locations, rng)
    })?;
    let location_ids: Vec<_> = cities
        .iter()
        .chain(&districts)
        .chain(&specials)
        .copied()
        .collect();

    run_stage(&mut tx, &mut summary, "connections", rng, |store, rng| {
        connections::generate_connections(store, world_id, &location_ids, rng)
    })?;
    let building_ids = run_stage(&mut tx, &mut summary, "buildings", rng, |store, rng| {
        buildings::generate_buildings(store, &location_ids, rng)
    })?;
    let character_ids = run_stage(&mut tx, &mut summary, "characters", rng, |store, rng| {
        characters::generate_characters(
            store,
            world_id,
            &location_ids,
            counts.characters,
            config.complexity,
            rng,
        )
    })?;
    let device_ids = run_stage(&mut tx, &mut summary, "devices", rng, |store, rng| {
        devices::generate_devices(
            store,
            world_id,
            &building_ids,
            &character_ids,
            counts.devices,
            rng,
        )
    })?;
    let network_ids = run_stage(&mut tx, &mut summary, "networks", rng, |store, rng| {
        networks::generate_networks(store, &building_ids, rng)
    })?;
    run_stage(&mut tx, &mut summary, "puzzles", rng, |store, rng| {
        puzzles::generate_puzzles(store, world_id, &device_ids, &network_ids, rng)
    })?;
    run_stage(&mut tx, &mut summary, "vulnerabilities", rng, |store, rng| {
        vulnerabilities::generate_vulnerabilities(
            store,
            world_id,
            &device_ids,
            &network_ids,
            counts.vulnerabilities,
            rng,
        )
    })?;
    run_stage(&mut tx, &mut summary, "files", rng, |store, rng| {
        files::generate_files(store, &device_ids, rng)
    })?;
    let mission_ids = run_stage(&mut tx, &mut summary, "missions", rng, |store, rng| {
        missions::generate_missions(
            store,
            world_id,
            &location_ids,
            &character_ids,
            counts.missions,
            rng,
        )
    })?;
    run_stage(&mut tx, &mut summary, "story_elements", rng, |store, rng| {
        story::generate_story_elements(
            store,
            world_id,
            &location_ids,
            &character_ids,
            &mission_ids,
            counts.story_elements,
            rng,
        )
    })?;

    let placement = PlacementPools {
        devices: &device_ids,
        buildings: &building_ids,
        characters: &character_ids,
    };
    let hardware = run_stage(&mut tx, &mut summary, "hardware_items", rng, |store, rng| {
        generate_hardware_items(store, world_id, &placement, counts.hardware_items, rng)
    })?;
    let consumables = run_stage(&mut tx, &mut summary, "consumable_items", rng, |store, rng| {
        generate_consumable_items(store, world_id, &placement, counts.consumable_items, rng)
    })?;
    let armor = run_stage(&mut tx, &mut summary, "armor_items", rng, |store, rng| {
        generate_armor_items(store, world_id, &placement, counts.armor_items, rng)
    })?;
    let software = run_stage(&mut tx, &mut summary, "software_items", rng, |store, rng| {
        generate_software_items(store, world_id, &placement, counts.software_items, rng)
    })?;
    let weapons = run_stage(&mut tx, &mut summary, "weapon_items", rng, |store, rng| {
        generate_weapon_items(store, world_id, &placement, counts.weapon_items, rng)
    })?;
    let implants = run_stage(&mut tx, &mut summary, "implant_items", rng, |store, rng| {
        generate_implant_items(store, world_id, &placement, counts.implant_items, rng)
    })?;

    let shop_ids = run_stage(&mut tx, &mut summary, "shops", rng, |store, rng| {
        generate_shops(
            store,
            world_id,
            &location_ids,
            &building_ids,
            config.shop_types(),
            counts.shops,
            config.complexity,
            rng,
        )
    })?;
    let stock = ItemPools {
        hardware: &hardware,
        consumables: &consumables,
        armor: &armor,
        software: &software,
        weapons: &weapons,
        implants: &implants,
    };
    run_stage(&mut tx, &mut summary, "shop_inventory", rng, |store, rng| {
        generate_shop_inventory(
            store,
            &shop_ids,
            &stock,
            counts.items_per_shop,
            counts.rare_items_percentage,
            rng,
        )
    })?;

    tx.commit().map_err(WorldDbError::from)?;
    info!(world_id = %world_id, "world committed");
    Ok(GeneratedWorld {
        world_id,
        seed,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_pair_adjective_and_noun() {
        let mut rng = WorldRng::new(Some(10));
        let name = default_world_name(&mut rng);
        let (adjective, noun) = name.split_once(' ').unwrap();
        assert!(NAME_ADJECTIVES.contains(&adjective));
        assert!(NAME_NOUNS.contains(&noun));
    }

    #[test]
    fn invalid_complexity_writes_nothing() {
        let mut db = WorldDb::open_in_memory().unwrap();
        let err = generate_world(&mut db, &WorldConfig::new(0)).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRequest(_)));
        assert!(db.world_ids().unwrap().is_empty());
    }

    #[test]
    fn summary_lists_stages_in_order() {
        let mut db = WorldDb::open_in_memory().unwrap();
        let generated = generate_world(&mut db, &WorldConfig::new(1).with_seed(5)).unwrap();
        let names: Vec<&str> = generated.summary.stages.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.first(), Some(&"world"));
        assert_eq!(names.last(), Some(&"shop_inventory"));
        assert_eq!(generated.summary.rows("cities"), Some(2));
        let position = |stage: &str| names.iter().position(|name| *name == stage).unwrap();
        assert_eq!(position("vulnerabilities"), position("puzzles") + 1);
        assert!(position("implant_items") < position("shops"));
        assert_eq!(names.len(), 22);
        assert_eq!(generated.seed, 5);
    }
}
