use tracing::debug;

use crate::generation::items::{rarity_multiplier, roll_rarity, PlacementPools};
use crate::generation::rng::WorldRng;
use crate::model::{
    Capability, ItemId, ItemPlacement, LicenseType, SoftwareItem, SoftwareMetadata,
    SoftwareRequirements, SoftwareType, WorldId,
};
use crate::world::{WorldDbError, WorldStore};

const DEVELOPERS: &[&str] = &[
    "Netsoft",
    "Microtech",
    "ByteSec",
    "CodeCorp",
    "Tenkei",
    "Futureworks",
    "OpenSense",
    "Darkcode",
    "Cryotech",
    "Bluelight",
];
const PREFIXES: &[&str] = &[
    "Cyber", "Net", "Data", "Code", "Bit", "Byte", "Quantum", "Synth", "Digi", "Tech",
];
const SUFFIXES: &[&str] = &[
    "Guardian", "Shield", "Master", "Pro", "Suite", "Elite", "Prime", "Ultimate", "Core",
    "Advanced",
];
const CAPABILITY_KINDS: &[&str] = &[
    "protection",
    "analysis",
    "optimization",
    "decryption",
    "anonymization",
    "detection",
    "virtualization",
    "automation",
];
const PLATFORMS: &[&str] = &["Windows", "Linux", "MacOS", "Android", "iOS"];

const MALWARE_CHANCE: f64 = 0.15;
const DEVICE_INSTALL_CHANCE: f64 = 0.4;
const MAX_CAPABILITY_LEVEL: u8 = 10;

/// "CyberOper Guardian": prefix, the first four letters of the type, suffix.
fn software_name(software_type: SoftwareType, rng: &mut WorldRng) -> String {
    let stem: String = software_type
        .as_str()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .take(4)
        .collect();
    format!("{}{} {}", rng.pick(PREFIXES), stem, rng.pick(SUFFIXES))
}

/// Capability levels scale with the rarity multiplier `m`.
pub fn capabilities(m: f64, rng: &mut WorldRng) -> Vec<Capability> {
    let count: usize = rng.range(1..=5);
    (0..count)
        .map(|_| {
            let kind = rng.pick(CAPABILITY_KINDS).to_string();
            let raw = f64::from(rng.range(1..=5u32)) * m;
            Capability {
                kind,
                level: (raw as u8).clamp(1, MAX_CAPABILITY_LEVEL),
            }
        })
        .collect()
}

fn license_note(license: LicenseType, price: u32) -> String {
    match license {
        LicenseType::Free => "Available for free.".to_string(),
        LicenseType::Trial => "A limited trial version is available.".to_string(),
        LicenseType::OpenSource => "Open source and freely modifiable.".to_string(),
        LicenseType::Commercial => format!("Commercial software sold for {} credits.", price),
        LicenseType::Cracked => "A pirated copy of a commercial product.".to_string(),
    }
}

pub fn build_software(
    world_id: WorldId,
    placement: ItemPlacement,
    rng: &mut WorldRng,
) -> SoftwareItem {
    let software_type = *rng.pick(SoftwareType::ALL);
    let name = software_name(software_type, rng);
    let version = format!(
        "{}.{}.{}",
        rng.range(1..=9u32),
        rng.range(0..=9u32),
        rng.range(0..=9u32)
    );
    let developer = rng.pick(DEVELOPERS).to_string();
    let license = *rng.pick(LicenseType::ALL);
    let is_malware = rng.chance(MALWARE_CHANCE);
    let rarity = roll_rarity(rng);
    let level = rng.range(1..=10);
    let price = if license.is_paid() {
        (f64::from(rng.range(50..=5_000u32)) * rarity.price_multiplier()) as u32
    } else {
        0
    };
    let multiplier = rarity_multiplier(rarity, rng);
    let capabilities = capabilities(multiplier, rng);
    let requirements = SoftwareRequirements {
        cpu_cores: rng.range(1..=8),
        ram_gb: rng.range(1..=16),
        storage_gb: rng.range(1..=100),
    };
    let platforms = rng.range(1..=PLATFORMS.len());
    let compatibility = rng
        .sample(PLATFORMS, platforms)
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut description = format!(
        "{} v{} is a {} by {}. {}",
        name,
        version,
        software_type.as_str().to_lowercase(),
        developer,
        license_note(license, price)
    );
    if is_malware {
        description.push_str(" WARNING: contains malicious code!");
    }

    SoftwareItem {
        id: ItemId(rng.next_uuid()),
        world_id,
        name,
        description,
        software_type,
        developer,
        version,
        license,
        rarity,
        level,
        price,
        is_malware,
        placement,
        metadata: SoftwareMetadata {
            capabilities,
            requirements,
            compatibility,
            install_seconds: rng.range(10..=300),
            has_updates: rng.chance(0.5),
        },
    }
}

/// Software is installed on a device 40% of the time; the rest is placed
/// like any other item.
pub fn generate_software_items(
    store: &dyn WorldStore,
    world_id: WorldId,
    pools: &PlacementPools<'_>,
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<ItemId>, WorldDbError> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let installed = if rng.chance(DEVICE_INSTALL_CHANCE) {
            rng.choose(pools.devices).map(|id| ItemPlacement::Device(*id))
        } else {
            None
        };
        let placement = match installed {
            Some(placement) => placement,
            None => pools.draw(rng),
        };
        let item = build_software(world_id, placement, rng);
        store.insert_software(&item)?;
        debug!(
            name = %item.name,
            malware = item.is_malware,
            placement = item.placement.location_type(),
            "generated software"
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
    fn free_licenses_cost_nothing() {
        let mut rng = WorldRng::new(Some(50));
        let world_id = WorldId(Uuid::from_u128(1));
        for _ in 0..100 {
            let item = build_software(world_id, ItemPlacement::World, &mut rng);
            if !item.license.is_paid() {
                assert_eq!(item.price, 0);
            }
            assert!((1..=10).contains(&item.level));
            assert_eq!(item.version.split('.').count(), 3);
            assert!(!item.metadata.compatibility.is_empty());
        }
    }

    #[test]
    fn rarer_software_has_stronger_capabilities() {
        let mut rng = WorldRng::new(Some(4));
        let weak: Vec<Capability> = (0..20).flat_map(|_| capabilities(1.0, &mut rng)).collect();
        let strong: Vec<Capability> = (0..20).flat_map(|_| capabilities(4.0, &mut rng)).collect();
        assert!(weak.iter().all(|c| c.level <= 5));
        assert!(strong.iter().all(|c| c.level >= 4));
    }

    #[test]
    fn names_use_the_type_stem() {
        let mut rng = WorldRng::new(Some(9));
        let name = software_name(SoftwareType::NetworkAnalyzer, &mut rng);
        assert!(name.contains("Netw "));
    }
}
