use std::collections::BTreeMap;

use tracing::debug;

use crate::generation::items::{gear_price, level_range, rarity_multiplier, roll_rarity, PlacementPools};
use crate::generation::rng::WorldRng;
use crate::model::{ItemId, ItemPlacement, Rarity, WeaponCategory, WeaponItem, WeaponMetadata, WorldId};
use crate::world::{WorldDbError, WorldStore};

const CONTRABAND_CHANCE: f64 = 0.4;

fn weapon_types(category: WeaponCategory) -> &'static [&'static str] {
    match category {
        WeaponCategory::Melee => &[
            "KNIFE", "SWORD", "AXE", "HAMMER", "CLUB", "STAFF", "KATANA", "MACHETE", "CHAINSAW",
        ],
        WeaponCategory::Ranged => &[
            "PISTOL",
            "RIFLE",
            "SHOTGUN",
            "SMG",
            "SNIPER",
            "ASSAULT_RIFLE",
            "GRENADE_LAUNCHER",
            "ROCKET_LAUNCHER",
        ],
        WeaponCategory::Energy => &[
            "LASER_PISTOL",
            "PLASMA_RIFLE",
            "ENERGY_CANNON",
            "PULSE_RIFLE",
            "ION_BLASTER",
            "TESLA_GUN",
        ],
        WeaponCategory::Smart => &[
            "SMART_PISTOL",
            "SMART_RIFLE",
            "GUIDED_MISSILE",
            "DRONE_CONTROLLER",
            "NANOBLADE",
            "NEURAL_DISRUPTOR",
        ],
        WeaponCategory::Exotic => &[
            "SONIC_EMITTER",
            "GRAVITY_GUN",
            "FREEZE_RAY",
            "ANTIMATTER_PROJECTOR",
            "QUANTUM_DISRUPTOR",
        ],
    }
}

fn two_handed(category: WeaponCategory, weapon_type: &str) -> bool {
    match category {
        WeaponCategory::Melee => weapon_type != "KNIFE",
        WeaponCategory::Ranged => matches!(
            weapon_type,
            "RIFLE" | "SHOTGUN" | "SNIPER" | "ASSAULT_RIFLE" | "GRENADE_LAUNCHER" | "ROCKET_LAUNCHER"
        ),
        WeaponCategory::Energy => {
            matches!(weapon_type, "PLASMA_RIFLE" | "ENERGY_CANNON" | "PULSE_RIFLE")
        }
        WeaponCategory::Smart => {
            matches!(weapon_type, "SMART_RIFLE" | "GUIDED_MISSILE" | "DRONE_CONTROLLER")
        }
        WeaponCategory::Exotic => matches!(
            weapon_type,
            "GRAVITY_GUN" | "ANTIMATTER_PROJECTOR" | "QUANTUM_DISRUPTOR"
        ),
    }
}

fn ammo_type(weapon_type: &str) -> &'static str {
    match weapon_type {
        "PISTOL" => "9MM",
        "RIFLE" | "ASSAULT_RIFLE" => "5.56MM",
        "SNIPER" => "7.62MM",
        "SMG" => "9MM",
        "SHOTGUN" => "12GAUGE",
        "GRENADE_LAUNCHER" => "40MM_GRENADE",
        "ROCKET_LAUNCHER" => "ROCKET",
        "LASER_PISTOL" | "ION_BLASTER" | "TESLA_GUN" => "ENERGY_CELL",
        "PLASMA_RIFLE" | "PULSE_RIFLE" | "ENERGY_CANNON" => "PLASMA_CELL",
        "SMART_PISTOL" | "SMART_RIFLE" => "SMART_ROUNDS",
        "GUIDED_MISSILE" => "MICRO_MISSILE",
        _ => "STANDARD",
    }
}

fn name_prefixes(category: WeaponCategory) -> &'static [&'static str] {
    match category {
        WeaponCategory::Melee => &[
            "Razor", "Blade", "Edge", "Slash", "Hack", "Crush", "Smash", "Slice", "Cleave", "Rend",
        ],
        WeaponCategory::Ranged => &[
            "Thunder", "Storm", "Bullet", "Shot", "Trigger", "Barrel", "Hammer", "Recoil", "Scope",
            "Muzzle",
        ],
        WeaponCategory::Energy => &[
            "Plasma", "Laser", "Pulse", "Ion", "Beam", "Flux", "Glow", "Charge", "Volt", "Photon",
        ],
        WeaponCategory::Smart => &[
            "Neural", "Cyber", "Synth", "Logic", "Cortex", "Chip", "Link", "Net", "Code", "Data",
        ],
        WeaponCategory::Exotic => &[
            "Void", "Chaos", "Quantum", "Warp", "Phase", "Rift", "Nexus", "Vortex", "Dimension",
            "Paradox",
        ],
    }
}

fn name_suffixes(category: WeaponCategory) -> &'static [&'static str] {
    match category {
        WeaponCategory::Melee => &[
            "Blade", "Edge", "Cutter", "Slicer", "Chopper", "Smasher", "Crusher", "Ripper",
            "Cleaver", "Slasher",
        ],
        WeaponCategory::Ranged => &[
            "Shot", "Blaster", "Cannon", "Shooter", "Gunner", "Sniper", "Hunter", "Marksman",
            "Ranger", "Gunslinger",
        ],
        WeaponCategory::Energy => &[
            "Beam", "Ray", "Blaster", "Emitter", "Projector", "Cannon", "Discharger", "Generator",
            "Radiator", "Pulser",
        ],
        WeaponCategory::Smart => &[
            "Brain", "Mind", "Cortex", "System", "Network", "Interface", "Protocol", "Algorithm",
            "Matrix", "Processor",
        ],
        WeaponCategory::Exotic => &[
            "Disruptor", "Shifter", "Warper", "Bender", "Twister", "Distorter", "Manipulator",
            "Controller", "Shaper",
        ],
    }
}

fn manufacturers(category: WeaponCategory) -> &'static [&'static str] {
    match category {
        WeaponCategory::Melee => &["BladeWorks", "EdgeForge", "SteelCraft", "IronWorks", "CarbonEdge"],
        WeaponCategory::Ranged => &[
            "GunTech",
            "BarrelIndustries",
            "TriggerCorp",
            "AmmoSystems",
            "RecoilArms",
        ],
        WeaponCategory::Energy => &[
            "PlasmaCore",
            "LaserTech",
            "EnergyDynamics",
            "FluxSystems",
            "PhotonIndustries",
        ],
        WeaponCategory::Smart => &[
            "NeuralWeapons",
            "CyberArms",
            "SynthTech",
            "LogicFire",
            "CortexSystems",
        ],
        WeaponCategory::Exotic => &[
            "QuantumArms",
            "VoidTech",
            "ChaosSystems",
            "WarpIndustries",
            "RiftWeapons",
        ],
    }
}

fn damage_types(category: WeaponCategory) -> &'static [&'static str] {
    match category {
        WeaponCategory::Melee => &["PHYSICAL", "SLASHING", "BLUNT", "PIERCING"],
        WeaponCategory::Ranged => &["PHYSICAL", "PIERCING", "EXPLOSIVE", "IMPACT"],
        WeaponCategory::Energy => &["ENERGY", "THERMAL", "PLASMA", "ELECTRICAL", "RADIATION"],
        WeaponCategory::Smart => &["PHYSICAL", "ENERGY", "NEURAL", "NANITE", "GUIDED"],
        WeaponCategory::Exotic => &["SONIC", "GRAVITATIONAL", "TEMPORAL", "QUANTUM", "DIMENSIONAL"],
    }
}

fn category_effects(category: WeaponCategory) -> &'static [&'static str] {
    match category {
        WeaponCategory::Melee => &[
            "Bleeding",
            "Critical strike",
            "Armor break",
            "Stun",
            "Disarm",
            "Spin attack",
            "Fatal blow",
            "Combo",
            "Parry",
            "Counterattack",
        ],
        WeaponCategory::Ranged => &[
            "Armor piercing",
            "Explosive rounds",
            "Incendiary rounds",
            "Ricochet",
            "Precision shot",
            "Rapid fire",
            "Headshot",
            "Suppression",
            "Fragmentation",
            "Perforation",
        ],
        WeaponCategory::Energy => &[
            "Overload",
            "Ionization",
            "Fusion",
            "Chain discharge",
            "Pulse",
            "Area burn",
            "Radiation",
            "Electrocution",
            "EMP effect",
            "Disintegration",
        ],
        WeaponCategory::Smart => &[
            "Lock-on",
            "Guidance",
            "Target analysis",
            "Weak point detection",
            "Trajectory adjustment",
            "Shield bypass",
            "Neural hack",
            "Multi-target",
            "Nanite swarm",
            "Neural interface",
        ],
        WeaponCategory::Exotic => &[
            "Teleportation",
            "Time distortion",
            "Gravity manipulation",
            "Freezing",
            "Disintegration",
            "Dimensional rift",
            "Quantum field",
            "Phase shift",
            "Probability distortion",
            "Temporal anomaly",
        ],
    }
}

/// Combat bonus keys with their base roll range.
fn bonus_ranges(category: WeaponCategory) -> &'static [(&'static str, u32, u32)] {
    match category {
        WeaponCategory::Melee => &[
            ("critical_chance", 5, 20),
            ("critical_damage", 10, 50),
            ("attack_speed", 5, 20),
            ("bleed_chance", 5, 25),
            ("stun_chance", 5, 15),
        ],
        WeaponCategory::Ranged => &[
            ("headshot_damage", 10, 50),
            ("reload_speed", 5, 25),
            ("fire_rate", 5, 20),
            ("armor_penetration", 5, 30),
            ("stability", 5, 25),
        ],
        WeaponCategory::Energy => &[
            ("charge_speed", 5, 25),
            ("heat_reduction", 5, 30),
            ("energy_efficiency", 5, 25),
            ("shield_damage", 10, 50),
            ("aoe_damage", 5, 20),
        ],
        WeaponCategory::Smart => &[
            ("target_acquisition", 5, 30),
            ("tracking_speed", 5, 25),
            ("lock_duration", 5, 30),
            ("multi_target", 1, 3),
            ("hack_chance", 5, 25),
        ],
        WeaponCategory::Exotic => &[
            ("effect_duration", 5, 30),
            ("cooldown_reduction", 5, 25),
            ("area_of_effect", 5, 30),
            ("status_chance", 5, 25),
            ("reality_distortion", 5, 20),
        ],
    }
}

/// (damage, accuracy, range in metres) before rarity scaling.
fn base_stats(category: WeaponCategory) -> (f64, f64, f64) {
    match category {
        WeaponCategory::Melee => (15.0, 90.0, 2.0),
        WeaponCategory::Ranged => (10.0, 70.0, 20.0),
        WeaponCategory::Energy => (12.0, 80.0, 15.0),
        WeaponCategory::Smart => (8.0, 95.0, 25.0),
        WeaponCategory::Exotic => (20.0, 60.0, 10.0),
    }
}

/// Damage, accuracy and range for a stat multiplier. Accuracy grows at half
/// the rate of the other stats and caps at 100.
pub fn weapon_stats(category: WeaponCategory, multiplier: f64) -> (u32, u8, u32) {
    let (damage, accuracy, range) = base_stats(category);
    let accuracy = (accuracy * (1.0 + (multiplier - 1.0) * 0.5)).min(100.0);
    (
        (damage * multiplier) as u32,
        accuracy as u8,
        (range * multiplier) as u32,
    )
}

fn special_effects(category: WeaponCategory, rarity: Rarity, rng: &mut WorldRng) -> Vec<String> {
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

fn combat_bonus(
    category: WeaponCategory,
    rarity: Rarity,
    rng: &mut WorldRng,
) -> BTreeMap<String, u32> {
    let (scale, count) = match rarity {
        Rarity::Common => (0.6, 0),
        Rarity::Uncommon => (0.8, 1),
        Rarity::Rare => (1.0, 2),
        Rarity::Epic => (1.3, 3),
        Rarity::Legendary => (1.6, 4),
    };
    rng.sample(bonus_ranges(category), count)
        .into_iter()
        .map(|(key, min, max)| {
            let value = (f64::from(rng.range(min..=max)) * scale).max(1.0) as u32;
            (key.to_string(), value)
        })
        .collect()
}

fn description(
    category: WeaponCategory,
    rarity: Rarity,
    manufacturer: &str,
    effects: &[String],
) -> String {
    let pitch = match category {
        WeaponCategory::Melee => "A close-quarters weapon for silent, brutal work.",
        WeaponCategory::Ranged => "A ballistic firearm, dependable at medium range.",
        WeaponCategory::Energy => "An energy weapon that converts stored charge into harm.",
        WeaponCategory::Smart => "A networked weapon that tracks and guides its own shots.",
        WeaponCategory::Exotic => "An experimental weapon bending physics toward violence.",
    };
    let grade = match rarity {
        Rarity::Common => "Standard issue",
        Rarity::Uncommon => "Improved",
        Rarity::Rare => "Advanced",
        Rarity::Epic => "Cutting-edge",
        Rarity::Legendary => "One of a kind",
    };
    if effects.is_empty() {
        format!("{} {} work from {}.", pitch, grade, manufacturer)
    } else {
        format!(
            "{} {} work from {}, with {}.",
            pitch,
            grade,
            manufacturer,
            effects.join(", ").to_lowercase()
        )
    }
}

pub fn build_weapon(world_id: WorldId, placement: ItemPlacement, rng: &mut WorldRng) -> WeaponItem {
    let category = *rng.pick(WeaponCategory::ALL);
    let weapon_type = *rng.pick(weapon_types(category));
    let manufacturer = *rng.pick(manufacturers(category));
    let model = format!("Mk{}", rng.range(1..=9u32));
    let name = format!(
        "{} {}-{} {}",
        manufacturer,
        rng.pick(name_prefixes(category)),
        rng.pick(name_suffixes(category)),
        model
    );

    let rarity = roll_rarity(rng);
    let (min_level, max_level) = level_range(rarity);
    let level = rng.range(min_level..=max_level);
    let multiplier = rarity_multiplier(rarity, rng);
    let (damage, accuracy, range_m) = weapon_stats(category, multiplier);
    let effects = special_effects(category, rarity, rng);
    let is_legal = category != WeaponCategory::Exotic
        && !(rarity >= Rarity::Epic && rng.chance(CONTRABAND_CHANCE));

    let damage_type = rng.pick(damage_types(category)).to_string();
    let fire_rate = rng.range(1..=10u8);
    let (reload_seconds, ammo_capacity, ammo) = if category.uses_ammo() {
        (
            rng.range(1..=5u8),
            rng.range(5..=30u8),
            Some(ammo_type(weapon_type).to_string()),
        )
    } else {
        (0, 0, None)
    };

    WeaponItem {
        id: ItemId(rng.next_uuid()),
        world_id,
        description: description(category, rarity, manufacturer, &effects),
        name,
        category,
        weapon_type: weapon_type.to_string(),
        manufacturer: manufacturer.to_string(),
        damage,
        accuracy,
        range_m,
        rarity,
        level,
        price: gear_price(rarity, level),
        is_legal,
        placement,
        metadata: WeaponMetadata {
            damage_type,
            fire_rate,
            reload_seconds,
            ammo_capacity,
            ammo_type: ammo,
            weight_kg: (rng.range(1.0..=10.0f64) * 10.0).round() / 10.0,
            durability: rng.range(50..=100),
            special_effects: effects,
            combat_bonus: combat_bonus(category, rarity, rng),
            model,
            is_two_handed: two_handed(category, weapon_type),
        },
    }
}

pub fn generate_weapon_items(
    store: &dyn WorldStore,
    world_id: WorldId,
    pools: &PlacementPools<'_>,
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<ItemId>, WorldDbError> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let placement = pools.draw(rng);
        let item = build_weapon(world_id, placement, rng);
        store.insert_weapon(&item)?;
        debug!(
            name = %item.name,
            damage = item.damage,
            legal = item.is_legal,
            "generated weapon"
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
    fn accuracy_is_capped() {
        for category in WeaponCategory::ALL {
            let (_, accuracy, _) = weapon_stats(*category, 4.4);
            assert!(accuracy <= 100);
        }
        assert_eq!(weapon_stats(WeaponCategory::Smart, 1.0), (8, 95, 25));
    }

    #[test]
    fn generated_weapons_follow_their_tier() {
        let mut rng = WorldRng::new(Some(17));
        let world_id = WorldId(Uuid::from_u128(1));
        for _ in 0..150 {
            let item = build_weapon(world_id, ItemPlacement::World, &mut rng);
            let (min, max) = level_range(item.rarity);
            assert!((min..=max).contains(&item.level));
            assert!(weapon_types(item.category).contains(&item.weapon_type.as_str()));
            if item.category == WeaponCategory::Exotic {
                assert!(!item.is_legal);
            }
            if item.rarity == Rarity::Common {
                assert!(item.metadata.special_effects.is_empty());
                assert!(item.metadata.combat_bonus.is_empty());
            }
            assert_eq!(item.metadata.ammo_type.is_some(), item.category.uses_ammo());
            if !item.category.uses_ammo() {
                assert_eq!(item.metadata.ammo_capacity, 0);
            }
        }
    }

    #[test]
    fn knives_are_the_only_one_handed_blades() {
        for weapon_type in weapon_types(WeaponCategory::Melee) {
            assert_eq!(two_handed(WeaponCategory::Melee, weapon_type), *weapon_type != "KNIFE");
        }
        assert!(!two_handed(WeaponCategory::Ranged, "PISTOL"));
        assert_eq!(ammo_type("SHOTGUN"), "12GAUGE");
    }

    #[test]
    fn every_category_has_catalogues() {
        for category in WeaponCategory::ALL {
            assert!(!weapon_types(*category).is_empty());
            assert!(!name_prefixes(*category).is_empty());
            assert!(!name_suffixes(*category).is_empty());
            assert!(!manufacturers(*category).is_empty());
            assert!(!damage_types(*category).is_empty());
            assert!(category_effects(*category).len() >= 3);
            assert!(bonus_ranges(*category).len() >= 4);
        }
    }
}
