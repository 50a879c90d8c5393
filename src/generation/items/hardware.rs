use tracing::debug;

use crate::generation::items::{price_variation, rarity_multiplier, roll_rarity, PlacementPools};
use crate::generation::rng::WorldRng;
use crate::model::{
    HardwareItem, HardwareMetadata, HardwareQuality, HardwareStats, HardwareType, ItemId,
    ItemPlacement, WorldId,
};
use crate::world::{WorldDbError, WorldStore};

const PREFIXES: &[&str] = &[
    "Quantum", "Cyber", "Neuro", "Hyper", "Nano", "Tech", "Mega", "Ultra", "Fusion", "Synth",
];
const MID_PARTS: &[&str] = &[
    "Core", "Wave", "Link", "Net", "Sync", "Pulse", "Matrix", "Node", "Flux", "Grid",
];
const SUFFIXES: &[&str] = &[
    "XL", "Pro", "Elite", "Max", "Zero", "Nova", "Prime", "Plus", "Alpha", "Omega",
];
const MANUFACTURERS: &[&str] = &[
    "NeoTech",
    "SynthCorp",
    "QuantumDynamics",
    "HyperSystems",
    "FusionTech",
    "CyberIndustries",
    "MegaCorp",
    "UltraTech",
    "NanoWorks",
    "SyncSystems",
];
const SPECIAL_FEATURES: &[&str] = &[
    "Built-in encryption",
    "Advanced cooling",
    "Overclocking",
    "Self-repair",
    "EM camouflage",
    "EMP shielding",
    "Performance boost",
    "Assistant AI",
    "Cryptomining",
];
/// 80+ Bronze through Titanium.
const PSU_EFFICIENCY: &[u32] = &[82, 85, 88, 92, 94];

const MAX_LEVEL: u8 = 10;
const INSTALLED_CHANCE: f64 = 0.7;

pub fn hardware_level(quality: HardwareQuality, rng: &mut WorldRng) -> u8 {
    let roll: i32 = rng.range(-1..=2);
    (quality.tier() as i32 * 2 + roll).clamp(1, MAX_LEVEL as i32) as u8
}

/// Doubling ladder used by memory and storage sizes: `base * 2^(level/step - 1)`.
fn doubling(base: f64, level: u8, step: u8) -> f64 {
    base * 2f64.powi(i32::from(level / step) - 1)
}

/// Stat block for `hardware_type`, every figure scaled by `level` and the
/// rarity multiplier `m`.
pub fn hardware_stats(
    hardware_type: HardwareType,
    level: u8,
    m: f64,
    rng: &mut WorldRng,
) -> HardwareStats {
    let l = f64::from(level);
    match hardware_type {
        HardwareType::Cpu => HardwareStats::Processor {
            processing_power: (l * 10.0 * m) as u32,
            cores: ((l * 0.8 * m) as u32).clamp(1, 32),
            clock_ghz: round_tenth(2.0 + (l * 0.4 + rng.range(0.0..1.0)) * m),
        },
        HardwareType::RaspberryPi => HardwareStats::Processor {
            processing_power: (l * 4.0 * m) as u32,
            cores: ((l / 2.0 * m) as u32).clamp(1, 8),
            clock_ghz: round_tenth(1.0 + (l * 0.2 + rng.range(0.0..1.0)) * m),
        },
        HardwareType::Ram => HardwareStats::Memory {
            capacity_gb: (doubling(4.0, level, 2) * m).max(1.0) as u32,
            speed_mhz: (2400.0 + l * 400.0 * m) as u32,
            latency: (20.0 - l * m * 0.5).max(1.0) as u32,
        },
        HardwareType::Gpu => HardwareStats::Graphics {
            processing_power: (l * 15.0 * m) as u32,
            vram_gb: (doubling(2.0, level, 2) * m).max(1.0) as u32,
            clock_mhz: (1000.0 + l * 200.0 * m) as u32,
        },
        HardwareType::Motherboard => HardwareStats::Board {
            ram_slots: ((l / 2.0 * m) as u32).clamp(2, 8),
            expansion_slots: ((l / 2.0 * m) as u32).clamp(1, 6),
        },
        HardwareType::UsbDrive => HardwareStats::Storage {
            capacity_gb: (doubling(16.0, level, 2) * m).max(1.0) as u32,
            read_mbps: (30.0 + l * 20.0 * m) as u32,
            write_mbps: (20.0 + l * 15.0 * m) as u32,
        },
        HardwareType::Ssd => HardwareStats::Storage {
            capacity_gb: (doubling(256.0, level, 3) * m).max(1.0) as u32,
            read_mbps: (500.0 + l * 300.0 * m) as u32,
            write_mbps: (400.0 + l * 250.0 * m) as u32,
        },
        HardwareType::Hdd | HardwareType::ExternalHdd => HardwareStats::Storage {
            capacity_gb: (doubling(1024.0, level, 2) * m).max(1.0) as u32,
            read_mbps: (80.0 + l * 20.0 * m) as u32,
            write_mbps: (70.0 + l * 15.0 * m) as u32,
        },
        HardwareType::NetworkCard => HardwareStats::Networking {
            bandwidth_mbps: *rng.pick(&[10, 100, 1_000, 10_000]),
            range_m: (l * 3.0 * m) as u32,
        },
        HardwareType::Router => HardwareStats::Networking {
            bandwidth_mbps: (doubling(100.0, level, 2) * m).max(1.0) as u32,
            range_m: (l * 5.0 * m) as u32,
        },
        HardwareType::BluetoothAdapter => HardwareStats::Networking {
            bandwidth_mbps: (1.0 + l * 0.5 * m) as u32,
            range_m: (l * 5.0 * m) as u32,
        },
        HardwareType::WifiAntenna => HardwareStats::Networking {
            bandwidth_mbps: (3.0 + l * m) as u32,
            range_m: (l * 10.0 * m) as u32,
        },
        HardwareType::CoolingSystem => HardwareStats::Cooling {
            cooling_capacity: (l * 10.0 * m) as u32,
            noise_db: (30.0 - l * m).max(5.0) as u32,
        },
        HardwareType::PowerSupply => HardwareStats::Power {
            wattage: (400.0 + l * 100.0 * m) as u32,
            efficiency_pct: *rng.pick(PSU_EFFICIENCY),
        },
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn condition(quality: HardwareQuality) -> &'static str {
    match quality {
        HardwareQuality::Broken | HardwareQuality::Poor => "poor",
        HardwareQuality::Standard => "good",
        _ => "excellent",
    }
}

fn special_features(quality: HardwareQuality, rng: &mut WorldRng) -> Vec<String> {
    if quality.tier() < HardwareQuality::HighEnd.tier() {
        return Vec::new();
    }
    let count = (quality.tier() as usize).saturating_sub(2).clamp(1, 3);
    rng.sample(SPECIAL_FEATURES, count)
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn build_hardware(
    world_id: WorldId,
    placement: ItemPlacement,
    rng: &mut WorldRng,
) -> HardwareItem {
    let hardware_type = *rng.pick(HardwareType::ALL);
    let prefix = rng.pick(PREFIXES);
    let mid = rng.pick(MID_PARTS);
    let suffix = rng.pick(SUFFIXES);
    let manufacturer = rng.pick(MANUFACTURERS);
    let name = format!(
        "{} {}{} {} {}",
        manufacturer, prefix, mid, hardware_type, suffix
    );

    let quality = *rng.pick(HardwareQuality::ALL);
    let rarity = roll_rarity(rng);
    let level = hardware_level(quality, rng);
    let price = (100.0
        * f64::from(level)
        * rarity.price_multiplier()
        * f64::from(quality.tier() + 1)
        * price_variation(rng)) as u32;
    let multiplier = rarity_multiplier(rarity, rng);
    let stats = hardware_stats(hardware_type, level, multiplier, rng);
    let is_installed = matches!(placement, ItemPlacement::Device(_)) && rng.chance(INSTALLED_CHANCE);
    let special_features = special_features(quality, rng);

    let metadata = HardwareMetadata {
        manufacturer: manufacturer.to_string(),
        model: format!("{}{} {}", prefix, mid, suffix),
        year: rng.range(2055..=2085),
        weight_kg: f64::from(rng.range(1..=50u32)) / 10.0,
        power_watts: match hardware_type {
            HardwareType::UsbDrive | HardwareType::ExternalHdd => 0,
            _ => rng.range(5..=100),
        },
        special_features,
    };

    HardwareItem {
        id: ItemId(rng.next_uuid()),
        world_id,
        description: format!(
            "A {} in {} condition, level {}, made by {}.",
            hardware_type,
            condition(quality),
            level,
            manufacturer
        ),
        name,
        hardware_type,
        quality,
        rarity,
        level,
        price,
        placement,
        is_installed,
        stats,
        metadata,
    }
}

pub fn generate_hardware_items(
    store: &dyn WorldStore,
    world_id: WorldId,
    pools: &PlacementPools<'_>,
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<ItemId>, WorldDbError> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let placement = pools.draw(rng);
        let item = build_hardware(world_id, placement, rng);
        store.insert_hardware(&item)?;
        debug!(
            name = %item.name,
            rarity = %item.rarity,
            placement = item.placement.location_type(),
            "generated hardware"
        );
        ids.push(item.id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeviceId;
    use uuid::Uuid;

    #[test]
    fn level_follows_quality_tier() {
        let mut rng = WorldRng::new(Some(6));
        for quality in HardwareQuality::ALL {
            for _ in 0..20 {
                let level = hardware_level(*quality, &mut rng);
                let base = quality.tier() as i32 * 2;
                assert!((1..=MAX_LEVEL).contains(&level));
                assert!(i32::from(level) >= (base - 1).max(1));
                assert!(i32::from(level) <= (base + 2).min(MAX_LEVEL as i32));
            }
        }
    }

    #[test]
    fn stats_grow_with_multiplier() {
        let mut rng = WorldRng::new(Some(1));
        for hardware_type in HardwareType::ALL {
            let low = hardware_stats(*hardware_type, 6, 1.0, &mut rng);
            let high = hardware_stats(*hardware_type, 6, 4.0, &mut rng);
            if *hardware_type != HardwareType::NetworkCard
                && *hardware_type != HardwareType::PowerSupply
            {
                assert!(high.primary() >= low.primary(), "{}", hardware_type);
            }
        }
    }

    #[test]
    fn only_device_items_are_installed() {
        let mut rng = WorldRng::new(Some(17));
        let world_id = WorldId(Uuid::from_u128(1));
        let device = ItemPlacement::Device(DeviceId(Uuid::from_u128(2)));
        let mut installed = 0;
        for _ in 0..40 {
            assert!(!build_hardware(world_id, ItemPlacement::World, &mut rng).is_installed);
            installed += usize::from(build_hardware(world_id, device, &mut rng).is_installed);
        }
        assert!(installed > 0);
    }

    #[test]
    fn high_end_parts_carry_features() {
        let mut rng = WorldRng::new(Some(2));
        assert!(special_features(HardwareQuality::Standard, &mut rng).is_empty());
        assert_eq!(special_features(HardwareQuality::HighEnd, &mut rng).len(), 1);
        assert_eq!(special_features(HardwareQuality::MilitaryGrade, &mut rng).len(), 2);
        assert_eq!(special_features(HardwareQuality::Prototype, &mut rng).len(), 3);
    }
}
