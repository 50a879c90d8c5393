use std::collections::BTreeMap;

use tracing::debug;

use crate::generation::items::{gear_price, level_range, roll_rarity, PlacementPools};
use crate::generation::rng::WorldRng;
use crate::model::{
    Attribute, ImplantItem, ImplantMetadata, ImplantType, ItemId, ItemPlacement, Rarity, WorldId,
};
use crate::world::{WorldDbError, WorldStore};

const CONTRABAND_CHANCE: f64 = 0.4;

const PREFIXES: &[&str] = &[
    "Neuro", "Cyber", "Bio", "Synth", "Quantum", "Nano", "Hyper", "Mecha", "Tech", "Pulse",
];
const MID_PARTS: &[&str] = &[
    "Link", "Core", "Mesh", "Net", "Wave", "Sync", "Flex", "Boost", "Sense", "Guard",
];
const SUFFIXES: &[&str] = &[
    "X", "Pro", "Elite", "Plus", "Max", "Alpha", "Prime", "Ultra", "Omega", "Zero",
];
const MANUFACTURERS: &[&str] = &[
    "NeuraTech",
    "CyberSystems",
    "BioForge",
    "SynthCorp",
    "QuantumWare",
    "NanoMedics",
    "HyperLogic",
    "MechaLife",
    "TechFusion",
    "PulseGen",
];

fn primary_attributes(implant_type: ImplantType) -> &'static [Attribute] {
    match implant_type {
        ImplantType::Neural => &[Attribute::Intelligence, Attribute::Perception],
        ImplantType::Optical => &[Attribute::Perception],
        ImplantType::Skeletal => &[Attribute::Strength, Attribute::Agility],
        ImplantType::Dermal => &[Attribute::Strength],
        ImplantType::Circulatory => &[Attribute::Agility, Attribute::Strength],
    }
}

fn type_effects(implant_type: ImplantType) -> &'static [&'static str] {
    match implant_type {
        ImplantType::Neural => &[
            "Direct matrix access",
            "Enhanced neural interface",
            "Photographic memory",
            "Accelerated data processing",
            "Predictive analysis",
            "Wireless network link",
            "Instant translation",
            "Advanced calculation",
            "Mental intrusion resistance",
            "Accelerated learning",
        ],
        ImplantType::Optical => &[
            "Night vision",
            "Optical zoom",
            "Spectral analysis",
            "Thermal detection",
            "Augmented reality",
            "Visual recording",
            "Facial recognition",
            "Weakness scanner",
            "X-ray vision",
            "Lie detection",
        ],
        ImplantType::Skeletal => &[
            "Augmented strength",
            "Enhanced reflexes",
            "Damage resistance",
            "Shock absorption",
            "Amplified jump",
            "Aim stabilisation",
            "Increased endurance",
            "Reinforced joints",
            "Increased running speed",
            "Toxin resistance",
        ],
        ImplantType::Dermal => &[
            "Subdermal armor",
            "Thermoregulation",
            "Active camouflage",
            "Electrical resistance",
            "Self repair",
            "Energy absorption",
            "Toxin filtration",
            "Tactile interface",
            "Fire resistance",
            "Improved conductivity",
        ],
        ImplantType::Circulatory => &[
            "Improved oxygenation",
            "Rapid clotting",
            "Toxin filtration",
            "Synthetic adrenaline",
            "Thermal regulation",
            "Reinforced immunity",
            "Accelerated recovery",
            "Nanobot distribution",
            "Fatigue resistance",
            "Environmental adaptation",
        ],
    }
}

fn type_side_effects(implant_type: ImplantType) -> &'static [&'static str] {
    match implant_type {
        ImplantType::Neural => &[
            "Occasional migraines",
            "Sleep disorders",
            "Random memory flashes",
            "Sensitivity to electromagnetic interference",
            "Uncontrollable lucid dreams",
        ],
        ImplantType::Optical => &[
            "Temporary blurred vision",
            "Light sensitivity",
            "Minor visual hallucinations",
            "Eye strain",
            "Colour distortion",
        ],
        ImplantType::Skeletal => &[
            "Joint pain",
            "Muscle stiffness",
            "Audible clicking when moving",
            "Sensitivity to temperature changes",
            "Occasional cramps",
        ],
        ImplantType::Dermal => &[
            "Skin discolouration",
            "Reduced tactile sensitivity",
            "Excessive sweating",
            "Allergic reactions",
            "Slow healing",
        ],
        ImplantType::Circulatory => &[
            "Blood pressure swings",
            "Hot flushes",
            "Heart palpitations",
            "Excessive thirst",
            "Sensitivity to stimulants",
        ],
    }
}

fn bonus_ranges(implant_type: ImplantType) -> &'static [(&'static str, u32, u32)] {
    match implant_type {
        ImplantType::Neural => &[
            ("aim_assist", 0, 15),
            ("hack_speed", 5, 30),
            ("reaction_time", 5, 25),
        ],
        ImplantType::Optical => &[
            ("critical_chance", 1, 10),
            ("accuracy", 5, 20),
            ("target_acquisition", 5, 25),
        ],
        ImplantType::Skeletal => &[
            ("melee_damage", 5, 25),
            ("reload_speed", 5, 20),
            ("movement_speed", 5, 15),
        ],
        ImplantType::Dermal => &[
            ("damage_reduction", 2, 15),
            ("energy_resistance", 5, 20),
            ("physical_resistance", 5, 20),
        ],
        ImplantType::Circulatory => &[
            ("health_regen", 1, 10),
            ("stamina", 10, 30),
            ("bleed_resistance", 10, 50),
        ],
    }
}

fn tier(rarity: Rarity) -> usize {
    match rarity {
        Rarity::Common => 0,
        Rarity::Uncommon => 1,
        Rarity::Rare => 2,
        Rarity::Epic => 3,
        Rarity::Legendary => 4,
    }
}

/// Humanity lost to the surgery: a per-type base scaled by rarity.
pub fn humanity_cost(implant_type: ImplantType, rarity: Rarity) -> u32 {
    let base = match implant_type {
        ImplantType::Neural => 8.0,
        ImplantType::Optical => 6.0,
        ImplantType::Skeletal => 10.0,
        ImplantType::Dermal => 4.0,
        ImplantType::Circulatory => 7.0,
    };
    let scale = [0.8, 1.0, 1.2, 1.5, 2.0][tier(rarity)];
    (base * scale) as u32
}

fn surgery_range(implant_type: ImplantType) -> (u8, u8) {
    match implant_type {
        ImplantType::Neural => (6, 10),
        ImplantType::Optical => (4, 8),
        ImplantType::Skeletal | ImplantType::Circulatory => (5, 9),
        ImplantType::Dermal => (2, 6),
    }
}

/// One bonus per tier step. Primary attributes come first and roll up to the
/// tier cap; the rest roll one lower.
pub fn stats_bonus(
    implant_type: ImplantType,
    rarity: Rarity,
    rng: &mut WorldRng,
) -> BTreeMap<Attribute, u8> {
    let slots = tier(rarity) + 1;
    let cap = slots as u8;
    let mut bonus = BTreeMap::new();
    for attribute in primary_attributes(implant_type).iter().take(slots) {
        bonus.insert(*attribute, rng.range(1..=cap));
    }
    let remaining: Vec<Attribute> = Attribute::ALL
        .iter()
        .copied()
        .filter(|attribute| !bonus.contains_key(attribute))
        .collect();
    let extra = slots.saturating_sub(bonus.len());
    for attribute in rng.sample(&remaining, extra) {
        bonus.insert(attribute, rng.range(1..=cap.saturating_sub(1).max(1)));
    }
    bonus
}

fn special_effects(implant_type: ImplantType, rarity: Rarity, rng: &mut WorldRng) -> Vec<String> {
    let count = [1, 1, 2, 3, 4][tier(rarity)];
    rng.sample(type_effects(implant_type), count)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn side_effects(implant_type: ImplantType, rarity: Rarity, rng: &mut WorldRng) -> Vec<String> {
    let (probability, most) = [(0.8, 3), (0.6, 2), (0.4, 2), (0.3, 1), (0.2, 1)][tier(rarity)];
    if !rng.chance(probability) {
        return Vec::new();
    }
    let count = rng.range(1..=most);
    rng.sample(type_side_effects(implant_type), count)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn combat_bonus(
    implant_type: ImplantType,
    rarity: Rarity,
    rng: &mut WorldRng,
) -> BTreeMap<String, u32> {
    let (scale, count) = [(0.6, 1), (0.8, 1), (1.0, 2), (1.3, 2), (1.6, 3)][tier(rarity)];
    rng.sample(bonus_ranges(implant_type), count)
        .into_iter()
        .map(|(key, min, max)| {
            let value = (f64::from(rng.range(min..=max)) * scale) as u32;
            (key.to_string(), value)
        })
        .collect()
}

fn description(
    implant_type: ImplantType,
    rarity: Rarity,
    manufacturer: &str,
    effects: &[String],
) -> String {
    let pitch = match implant_type {
        ImplantType::Neural => "A neural implant wired into the cortex to sharpen thought.",
        ImplantType::Optical => "Cybernetic optics that push sight past human limits.",
        ImplantType::Skeletal => "Alloy bone reinforcement for strength and endurance.",
        ImplantType::Dermal => "A subdermal mesh that turns skin into a barrier.",
        ImplantType::Circulatory => "A circulatory upgrade that filters blood and speeds recovery.",
    };
    let grade = ["standard", "improved", "superior", "revolutionary", "legendary"][tier(rarity)];
    format!(
        "{} This {} model from {} offers {}.",
        pitch,
        grade,
        manufacturer,
        effects.join(", ").to_lowercase()
    )
}

pub fn build_implant(world_id: WorldId, placement: ItemPlacement, rng: &mut WorldRng) -> ImplantItem {
    let implant_type = *rng.pick(ImplantType::ALL);
    let manufacturer = *rng.pick(MANUFACTURERS);
    let version = format!("v{}.{}", rng.range(1..=9u8), rng.range(0..=9u8));
    let name = format!(
        "{} {}{} {} {} {}",
        manufacturer,
        rng.pick(PREFIXES),
        rng.pick(MID_PARTS),
        implant_type,
        rng.pick(SUFFIXES),
        version
    );

    let rarity = roll_rarity(rng);
    let (min_level, max_level) = level_range(rarity);
    let level = rng.range(min_level..=max_level);
    let (min_surgery, max_surgery) = surgery_range(implant_type);
    let surgery_difficulty = rng.range(min_surgery..=max_surgery);
    let stats_bonus = stats_bonus(implant_type, rarity, rng);
    let effects = special_effects(implant_type, rarity, rng);
    let is_legal = !(rarity >= Rarity::Epic && rng.chance(CONTRABAND_CHANCE));

    ImplantItem {
        id: ItemId(rng.next_uuid()),
        world_id,
        description: description(implant_type, rarity, manufacturer, &effects),
        name,
        implant_type,
        manufacturer: manufacturer.to_string(),
        rarity,
        level,
        price: gear_price(rarity, level),
        humanity_cost: humanity_cost(implant_type, rarity),
        surgery_difficulty,
        stats_bonus,
        special_effects: effects,
        is_legal,
        placement,
        metadata: ImplantMetadata {
            version,
            body_location: implant_type.as_str().to_lowercase(),
            compatibility: vec!["HUMAN".to_string(), "CYBORG".to_string()],
            power_consumption: rng.range(1..=5),
            combat_bonus: combat_bonus(implant_type, rarity, rng),
            side_effects: side_effects(implant_type, rarity, rng),
        },
    }
}

pub fn generate_implant_items(
    store: &dyn WorldStore,
    world_id: WorldId,
    pools: &PlacementPools<'_>,
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<ItemId>, WorldDbError> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let placement = pools.draw(rng);
        let item = build_implant(world_id, placement, rng);
        store.insert_implant(&item)?;
        debug!(
            name = %item.name,
            humanity_cost = item.humanity_cost,
            legal = item.is_legal,
            "generated implant"
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
    fn bonus_count_and_cap_follow_rarity() {
        let mut rng = WorldRng::new(Some(3));
        for rarity in Rarity::ALL {
            for implant_type in ImplantType::ALL {
                let bonus = stats_bonus(*implant_type, *rarity, &mut rng);
                let slots = tier(*rarity) + 1;
                assert_eq!(bonus.len(), slots);
                assert!(bonus.values().all(|value| (1..=slots as u8).contains(value)));
                let first = primary_attributes(*implant_type)[0];
                assert!(bonus.contains_key(&first));
            }
        }
    }

    #[test]
    fn humanity_cost_climbs_with_rarity() {
        assert_eq!(humanity_cost(ImplantType::Skeletal, Rarity::Common), 8);
        assert_eq!(humanity_cost(ImplantType::Skeletal, Rarity::Legendary), 20);
        for implant_type in ImplantType::ALL {
            for pair in Rarity::ALL.windows(2) {
                assert!(humanity_cost(*implant_type, pair[0]) <= humanity_cost(*implant_type, pair[1]));
            }
        }
    }

    #[test]
    fn generated_implants_stay_in_bounds() {
        let mut rng = WorldRng::new(Some(23));
        let world_id = WorldId(Uuid::from_u128(1));
        for _ in 0..150 {
            let item = build_implant(world_id, ItemPlacement::World, &mut rng);
            let (min, max) = surgery_range(item.implant_type);
            assert!((min..=max).contains(&item.surgery_difficulty));
            assert!((1..=10).contains(&item.surgery_difficulty));
            assert!(!item.special_effects.is_empty());
            assert!(item.metadata.side_effects.len() <= 3);
            assert_eq!(
                item.metadata.body_location,
                item.implant_type.as_str().to_lowercase()
            );
            if item.rarity < Rarity::Epic {
                assert!(item.is_legal);
            }
        }
    }

    #[test]
    fn every_type_has_catalogues() {
        for implant_type in ImplantType::ALL {
            assert!(!primary_attributes(*implant_type).is_empty());
            assert!(type_effects(*implant_type).len() >= 4);
            assert!(type_side_effects(*implant_type).len() >= 3);
            assert!(bonus_ranges(*implant_type).len() >= 3);
        }
    }
}
