use tracing::debug;

use crate::generation::items::{level_range, rarity_multiplier, roll_rarity, PlacementPools};
use crate::generation::rng::WorldRng;
use crate::model::{
    ArmorCategory, ArmorItem, ArmorMetadata, ArmorResistances, ArmorSlot, ItemId, ItemPlacement,
    Rarity, WorldId,
};
use crate::world::{WorldDbError, WorldStore};

const CONTRABAND_CHANCE: f64 = 0.3;

fn armor_types(category: ArmorCategory) -> &'static [&'static str] {
    match category {
        ArmorCategory::Light => &["CLOTH", "LEATHER", "PADDED", "SYNTHETIC", "STEALTH"],
        ArmorCategory::Medium => &["REINFORCED", "TACTICAL", "COMBAT", "SECURITY", "MILITARY"],
        ArmorCategory::Heavy => &["PLATED", "POWERED", "EXOSKELETON", "BALLISTIC", "RIOT"],
        ArmorCategory::Special => &["HAZMAT", "EMP_PROOF", "THERMAL", "RADIATION", "NANO_FIBER"],
    }
}

fn manufacturers(category: ArmorCategory) -> &'static [&'static str] {
    match category {
        ArmorCategory::Light => &[
            "ShadowTech",
            "NimbleWear",
            "FlexArmor",
            "StealthSystems",
            "AgileSuit",
        ],
        ArmorCategory::Medium => &[
            "TacticalGear",
            "UrbanDefense",
            "CombatWear",
            "SecuriTech",
            "BattleReady",
        ],
        ArmorCategory::Heavy => &[
            "IronShield",
            "TitanArmor",
            "FortressWear",
            "MaxDefense",
            "BulletStop",
        ],
        ArmorCategory::Special => &[
            "HazGuard",
            "EnviroSafe",
            "TechShield",
            "QuantumArmor",
            "NanoDefense",
        ],
    }
}

fn category_effects(category: ArmorCategory) -> &'static [&'static str] {
    match category {
        ArmorCategory::Light => &[
            "Active camouflage",
            "Silent movement",
            "Agility boost",
            "Heat dissipation",
            "Signature dampening",
        ],
        ArmorCategory::Medium => &[
            "Ballistic lining",
            "Tactical stabilisation",
            "Movement assist",
            "Thermal regulation",
            "Threat alerts",
        ],
        ArmorCategory::Heavy => &[
            "Shock absorption",
            "Reinforced plating",
            "Hydraulic assist",
            "Blast resistance",
            "Advanced stabilisation",
        ],
        ArmorCategory::Special => &[
            "Environmental sealing",
            "EM isolation",
            "Bio regulation",
            "Climate adaptation",
            "Advanced filtration",
        ],
    }
}

fn base_price(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 80.0,
        Rarity::Uncommon => 400.0,
        Rarity::Rare => 1_600.0,
        Rarity::Epic => 6_000.0,
        Rarity::Legendary => 20_000.0,
    }
}

fn base_defense(category: ArmorCategory) -> f64 {
    match category {
        ArmorCategory::Light => 3.0,
        ArmorCategory::Medium => 6.0,
        ArmorCategory::Heavy => 10.0,
        ArmorCategory::Special => 8.0,
    }
}

fn base_weight(category: ArmorCategory) -> f64 {
    match category {
        ArmorCategory::Light => 2.0,
        ArmorCategory::Medium => 5.0,
        ArmorCategory::Heavy => 10.0,
        ArmorCategory::Special => 7.0,
    }
}

/// (defense, weight) multipliers per slot.
fn slot_multipliers(slot: ArmorSlot) -> (f64, f64) {
    match slot {
        ArmorSlot::Head => (0.7, 0.5),
        ArmorSlot::Chest => (1.0, 1.0),
        ArmorSlot::Arms => (0.6, 0.6),
        ArmorSlot::Legs => (0.8, 0.8),
        ArmorSlot::Feet => (0.5, 0.4),
        ArmorSlot::FullBody => (1.5, 2.0),
    }
}

pub fn armor_defense(
    category: ArmorCategory,
    slot: ArmorSlot,
    multiplier: f64,
    level: u8,
) -> u32 {
    let (slot_defense, _) = slot_multipliers(slot);
    (base_defense(category) * slot_defense * multiplier * (1.0 + f64::from(level) / 10.0)).max(1.0)
        as u32
}

fn resistance(physical: u8, energy: u8, thermal: u8, emp: u8, biohazard: u8) -> ArmorResistances {
    ArmorResistances {
        physical,
        energy,
        emp,
        thermal,
        biohazard,
    }
}

pub fn armor_resistances(category: ArmorCategory, armor_type: &str) -> ArmorResistances {
    match category {
        ArmorCategory::Light => resistance(10, 5, 15, 5, 0),
        ArmorCategory::Medium => resistance(20, 15, 10, 10, 10),
        ArmorCategory::Heavy => resistance(30, 20, 15, 15, 15),
        ArmorCategory::Special => match armor_type {
            "HAZMAT" => resistance(10, 10, 20, 10, 40),
            "EMP_PROOF" => resistance(10, 20, 10, 40, 10),
            "THERMAL" => resistance(10, 15, 40, 10, 10),
            "RADIATION" => resistance(10, 30, 20, 10, 20),
            _ => resistance(15, 15, 15, 15, 15),
        },
    }
}

fn mobility_penalty(category: ArmorCategory, weight_kg: f64) -> u32 {
    let base = match category {
        ArmorCategory::Light => 0,
        ArmorCategory::Medium => 5,
        ArmorCategory::Heavy => 15,
        ArmorCategory::Special => 10,
    };
    base + ((weight_kg as u32).saturating_sub(5) / 2)
}

fn special_effects(category: ArmorCategory, rarity: Rarity, rng: &mut WorldRng) -> Vec<String> {
    let count = match rarity {
        Rarity::Common => 0,
        Rarity::Uncommon | Rarity::Rare => 1,
        Rarity::Epic => 2,
        Rarity::Legendary => 3,
    };
    rng.sample(category_effects(category), count)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn description(
    category: ArmorCategory,
    slot: ArmorSlot,
    manufacturer: &str,
    effects: &[String],
) -> String {
    let slot = slot.as_str().to_lowercase().replace('_', " ");
    let pitch = match category {
        ArmorCategory::Light => format!("Light {} protection built for speed and stealth.", slot),
        ArmorCategory::Medium => format!("Tactical {} armor balancing protection and mobility.", slot),
        ArmorCategory::Heavy => format!("Heavy {} armor for the worst a street can throw.", slot),
        ArmorCategory::Special => format!("Specialised {} gear for hostile environments.", slot),
    };
    if effects.is_empty() {
        format!("{} Made by {}.", pitch, manufacturer)
    } else {
        format!(
            "{} Made by {}, featuring {}.",
            pitch,
            manufacturer,
            effects.join(", ").to_lowercase()
        )
    }
}

fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn build_armor(world_id: WorldId, placement: ItemPlacement, rng: &mut WorldRng) -> ArmorItem {
    let category = *rng.pick(ArmorCategory::ALL);
    let armor_type = *rng.pick(armor_types(category));
    let slot = *rng.pick(ArmorSlot::ALL);
    let manufacturer = *rng.pick(manufacturers(category));
    let model = format!("Mk{}", rng.range(1..=9u32));
    let name = format!(
        "{} {} {} {}",
        manufacturer,
        armor_type,
        title_case(slot.as_str()),
        model
    );

    let rarity = roll_rarity(rng);
    let (min_level, max_level) = level_range(rarity);
    let level = rng.range(min_level..=max_level);
    let price = (base_price(rarity) * (1.0 + f64::from(level) * 0.2)) as u32;
    let multiplier = rarity_multiplier(rarity, rng);
    let defense = armor_defense(category, slot, multiplier, level);
    let (_, slot_weight) = slot_multipliers(slot);
    let weight_kg = base_weight(category) * slot_weight;
    let effects = special_effects(category, rarity, rng);
    let is_legal = category != ArmorCategory::Special
        && !(rarity >= Rarity::Epic && rng.chance(CONTRABAND_CHANCE));

    ArmorItem {
        id: ItemId(rng.next_uuid()),
        world_id,
        description: description(category, slot, manufacturer, &effects),
        name,
        category,
        armor_type: armor_type.to_string(),
        slot,
        manufacturer: manufacturer.to_string(),
        rarity,
        level,
        defense,
        weight_kg,
        price,
        placement,
        resistances: armor_resistances(category, armor_type),
        metadata: ArmorMetadata {
            model,
            durability: rng.range(50..=100),
            mobility_penalty: mobility_penalty(category, weight_kg),
            special_effects: effects,
            is_legal,
        },
    }
}

pub fn generate_armor_items(
    store: &dyn WorldStore,
    world_id: WorldId,
    pools: &PlacementPools<'_>,
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<ItemId>, WorldDbError> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let placement = pools.draw(rng);
        let item = build_armor(world_id, placement, rng);
        store.insert_armor(&item)?;
        debug!(
            name = %item.name,
            defense = item.defense,
            legal = item.metadata.is_legal,
            "generated armor"
        );
        ids.push(item.id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn full_body_outguards_feet() {
        for category in ArmorCategory::ALL {
            let feet = armor_defense(*category, ArmorSlot::Feet, 1.8, 5);
            let body = armor_defense(*category, ArmorSlot::FullBody, 1.8, 5);
            assert!(body > feet);
        }
    }

    #[test]
    fn defense_scales_with_level() {
        let low = armor_defense(ArmorCategory::Heavy, ArmorSlot::Chest, 1.0, 1);
        let high = armor_defense(ArmorCategory::Heavy, ArmorSlot::Chest, 1.0, 15);
        assert_eq!(low, 11);
        assert_eq!(high, 25);
    }

    #[test]
    fn special_armor_is_never_legal() {
        let mut rng = WorldRng::new(Some(31));
        let world_id = WorldId(Uuid::from_u128(1));
        for _ in 0..100 {
            let item = build_armor(world_id, ItemPlacement::World, &mut rng);
            let (min, max) = level_range(item.rarity);
            assert!((min..=max).contains(&item.level));
            if item.category == ArmorCategory::Special {
                assert!(!item.metadata.is_legal);
            }
            if item.rarity == Rarity::Common {
                assert!(item.metadata.special_effects.is_empty());
            }
        }
    }

    #[test]
    fn hazmat_resists_biohazards() {
        let hazmat = armor_resistances(ArmorCategory::Special, "HAZMAT");
        assert_eq!(hazmat.biohazard, 40);
        assert_eq!(title_case("FULL_BODY"), "Full_body");
    }

    #[test]
    fn every_category_has_catalogues() {
        for category in ArmorCategory::ALL {
            assert!(!armor_types(*category).is_empty());
            assert!(!manufacturers(*category).is_empty());
            assert!(!category_effects(*category).is_empty());
        }
    }
}
