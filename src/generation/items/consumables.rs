use tracing::debug;

use crate::generation::items::effects::{consumable_effects, duration_minutes};
use crate::generation::items::{price_variation, roll_rarity, PlacementPools};
use crate::generation::rng::WorldRng;
use crate::model::{
    ConsumableItem, ConsumableMetadata, ConsumableType, ItemId, ItemPlacement, Rarity, WorldId,
};
use crate::world::{WorldDbError, WorldStore};

const PREFIXES: &[&str] = &[
    "Cyber", "Neuro", "Quantum", "Data", "Code", "Synth", "Hack", "Pulse", "Crypt", "Ghost",
];
const SUFFIXES: &[&str] = &[
    "Boost", "Chip", "Key", "Pack", "Patch", "Wave", "Surge", "Lock", "Break", "Link",
];
const MANUFACTURERS: &[&str] = &[
    "DataDynamics",
    "NeuraSoft",
    "CyberWare",
    "CodeFlow",
    "PulseTech",
    "SynthLogic",
    "QuantumByte",
    "NetRunner",
    "GhostSec",
    "CryptoCorp",
];
const FOOD_PREFIXES: &[&str] = &[
    "Synth", "Nutri", "Vita", "Protein", "Energy", "Bio", "Eco", "Hydra", "Calori", "Macro",
];
const FOOD_SUFFIXES: &[&str] = &[
    "Bar", "Pack", "Meal", "Ration", "Cube", "Drink", "Snack", "Pill", "Capsule", "Powder",
];
const FOOD_FLAVORS: &[&str] = &[
    "Original", "Spicy", "Sweet", "Savory", "Tangy", "Bitter", "Umami", "Fruity", "Herbal",
    "Neutral",
];
const FOOD_MANUFACTURERS: &[&str] = &[
    "NutriCorp",
    "SynthMeal",
    "VitaFoods",
    "ProteinTech",
    "MealMatrix",
    "BioNutrients",
    "EcoFeeds",
    "HydraFuel",
    "CaloriSystems",
    "MacroNourish",
];
const SIDE_EFFECTS: &[&str] = &[
    "Mild nausea",
    "Passing headache",
    "Dizziness",
    "Blurred vision",
    "Raised body temperature",
    "Brief confusion",
    "Hyperactivity",
    "Fatigue",
];
const SIDE_EFFECT_CHANCE: f64 = 0.4;

/// Uses per item: a base roll by type, topped up for Rare and better.
pub fn roll_uses(consumable_type: ConsumableType, rarity: Rarity, rng: &mut WorldRng) -> u8 {
    let rare = rarity.is_rare_or_better();
    match consumable_type {
        ConsumableType::DataChip | ConsumableType::CryptoKey | ConsumableType::SecurityToken => {
            let base: u8 = rng.range(1..=3);
            base + if rare { rng.range(1..=3) } else { 0 }
        }
        ConsumableType::NeuralBooster | ConsumableType::BatteryPack => {
            let base: u8 = rng.range(2..=5);
            base + if rare { rng.range(2..=5) } else { 0 }
        }
        ConsumableType::Food => {
            let base: u8 = rng.range(1..=3);
            base + if rare { rng.range(1..=2) } else { 0 }
        }
        _ => 1,
    }
}

fn consumable_name(consumable_type: ConsumableType, rng: &mut WorldRng) -> (String, &'static str) {
    if consumable_type == ConsumableType::Food {
        let prefix = rng.pick(FOOD_PREFIXES);
        let suffix = rng.pick(FOOD_SUFFIXES);
        let flavor = rng.pick(FOOD_FLAVORS);
        let maker = *rng.pick(FOOD_MANUFACTURERS);
        (format!("{} {}{} {}", maker, prefix, suffix, flavor), maker)
    } else {
        let prefix = rng.pick(PREFIXES);
        let suffix = rng.pick(SUFFIXES);
        let maker = *rng.pick(MANUFACTURERS);
        let major: u32 = rng.range(1..=9);
        let minor: u32 = rng.range(0..=9);
        (
            format!(
                "{} {}{} {} v{}.{}",
                maker, prefix, suffix, consumable_type, major, minor
            ),
            maker,
        )
    }
}

pub fn build_consumable(
    world_id: WorldId,
    placement: ItemPlacement,
    rng: &mut WorldRng,
) -> ConsumableItem {
    let consumable_type = *rng.pick(ConsumableType::ALL);
    let (name, maker) = consumable_name(consumable_type, rng);
    let rarity = roll_rarity(rng);
    let uses = roll_uses(consumable_type, rarity, rng);
    let base_price = 50.0 + f64::from(rng.range(10..=50u32));
    let price = (base_price
        * rarity.price_multiplier()
        * (f64::from(uses) * 0.5 + 0.5)
        * price_variation(rng)) as u32;
    let effects = consumable_effects(consumable_type, rarity, rng);

    let side_effects = if rarity.is_rare_or_better() && rng.chance(SIDE_EFFECT_CHANCE) {
        let count = rng.range(1..=2);
        rng.sample(SIDE_EFFECTS, count)
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    let description = if consumable_type == ConsumableType::Food {
        format!(
            "A {} synthetic ration with {} serving(s), made by {}.",
            rarity.as_str().to_lowercase(),
            uses,
            maker
        )
    } else {
        format!(
            "A {} {} with {} use(s), made by {}.",
            rarity.as_str().to_lowercase(),
            consumable_type,
            uses,
            maker
        )
    };

    ConsumableItem {
        id: ItemId(rng.next_uuid()),
        world_id,
        name,
        description,
        consumable_type,
        rarity,
        uses,
        price,
        placement,
        metadata: ConsumableMetadata {
            side_effects,
            duration_minutes: duration_minutes(&effects.profile),
        },
        effects,
    }
}

pub fn generate_consumable_items(
    store: &dyn WorldStore,
    world_id: WorldId,
    pools: &PlacementPools<'_>,
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<ItemId>, WorldDbError> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let placement = pools.draw(rng);
        let item = build_consumable(world_id, placement, rng);
        store.insert_consumable(&item)?;
        debug!(name = %item.name, uses = item.uses, "generated consumable");
        ids.push(item.id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EffectProfile;
    use uuid::Uuid;

    #[test]
    fn uses_follow_type_and_rarity() {
        let mut rng = WorldRng::new(Some(40));
        for _ in 0..30 {
            assert_eq!(roll_uses(ConsumableType::SignalJammer, Rarity::Legendary, &mut rng), 1);
            let common = roll_uses(ConsumableType::BatteryPack, Rarity::Common, &mut rng);
            assert!((2..=5).contains(&common));
            let rare = roll_uses(ConsumableType::BatteryPack, Rarity::Rare, &mut rng);
            assert!((4..=10).contains(&rare));
        }
    }

    #[test]
    fn food_is_named_with_a_flavor() {
        let mut rng = WorldRng::new(Some(2));
        let (name, maker) = consumable_name(ConsumableType::Food, &mut rng);
        assert!(name.starts_with(maker));
        assert!(FOOD_FLAVORS.iter().any(|flavor| name.ends_with(flavor)));
    }

    #[test]
    fn side_effects_only_on_rare_items() {
        let mut rng = WorldRng::new(Some(77));
        let world_id = WorldId(Uuid::from_u128(1));
        for _ in 0..100 {
            let item = build_consumable(world_id, ItemPlacement::World, &mut rng);
            if !item.rarity.is_rare_or_better() {
                assert!(item.metadata.side_effects.is_empty());
            }
            if item.consumable_type == ConsumableType::Food {
                assert!(matches!(item.effects.profile, EffectProfile::General { .. }));
            }
        }
    }
}
