//! Known weaknesses of devices and networks, each with a few ways to exploit
//! it. Harder vulnerabilities are rarer.

use tracing::{debug, warn};

use crate::generation::rng::WorldRng;
use crate::model::{
    DeviceId, ExploitKind, HackTarget, NetworkId, Vulnerability, VulnerabilityExploit,
    VulnerabilityId, VulnerabilityRarity, VulnerabilityType, WorldId,
};
use crate::world::{WorldDbError, WorldStore};

const CODE_NAMES: &[&str] = &[
    "BlueScreen",
    "RedFlag",
    "DarkHole",
    "SilentBreak",
    "GhostAccess",
    "PhantomGate",
    "ShadowKey",
    "IceBreak",
    "FireWall",
    "StormFront",
    "NightCrawler",
    "DayWalker",
    "QuickSilver",
    "DeadZone",
    "LiveWire",
];

/// Device or network, chosen evenly. An empty pool hands the draw to the
/// other one; `None` when both are empty.
pub fn pick_target(
    devices: &[DeviceId],
    networks: &[NetworkId],
    rng: &mut WorldRng,
) -> Option<HackTarget> {
    let device = |id: &DeviceId| HackTarget::Device(*id);
    let network = |id: &NetworkId| HackTarget::Network(*id);
    if rng.chance(0.5) {
        rng.choose(devices)
            .map(device)
            .or_else(|| rng.choose(networks).map(network))
    } else {
        rng.choose(networks)
            .map(network)
            .or_else(|| rng.choose(devices).map(device))
    }
}

fn discovery_date(rng: &mut WorldRng) -> String {
    format!(
        "20{:02}-{:02}-{:02}",
        rng.range(70..=99u32),
        rng.range(1..=12u32),
        rng.range(1..=28u32)
    )
}

fn exploits(rng: &mut WorldRng) -> Vec<VulnerabilityExploit> {
    let count = rng.range(1..=3usize);
    (0..count)
        .map(|_| VulnerabilityExploit {
            kind: *rng.pick(ExploitKind::ALL),
            difficulty: rng.range(1..=10),
            impact: rng.range(1..=10),
        })
        .collect()
}

pub fn build_vulnerability(
    world_id: WorldId,
    target: HackTarget,
    rng: &mut WorldRng,
) -> Vulnerability {
    let vuln_type = *rng.pick(VulnerabilityType::ALL);
    let code_name = rng.pick(CODE_NAMES).to_string();
    let difficulty = rng.range(1..=10);
    let impact = rng.range(1..=10);

    Vulnerability {
        id: VulnerabilityId(rng.next_uuid()),
        world_id,
        name: format!("Vulnerability {}", vuln_type),
        description: vuln_type.summary().to_string(),
        vuln_type,
        code_name,
        target,
        difficulty,
        impact,
        rarity: VulnerabilityRarity::for_difficulty(difficulty),
        is_public: rng.chance(0.5),
        is_patched: rng.chance(0.5),
        discovery_date: discovery_date(rng),
        exploits: exploits(rng),
    }
}

pub fn generate_vulnerabilities(
    store: &dyn WorldStore,
    world_id: WorldId,
    devices: &[DeviceId],
    networks: &[NetworkId],
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<VulnerabilityId>, WorldDbError> {
    if count > 0 && devices.is_empty() && networks.is_empty() {
        warn!(count, "no devices or networks to attach vulnerabilities to");
        return Ok(Vec::new());
    }
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(target) = pick_target(devices, networks, rng) else {
            break;
        };
        let vulnerability = build_vulnerability(world_id, target, rng);
        store.insert_vulnerability(&vulnerability)?;
        debug!(
            code_name = %vulnerability.code_name,
            target = vulnerability.target.target_type(),
            difficulty = vulnerability.difficulty,
            "generated vulnerability"
        );
        ids.push(vulnerability.id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn rarity_follows_difficulty() {
        let mut rng = WorldRng::new(Some(12));
        let target = HackTarget::Device(DeviceId(Uuid::from_u128(2)));
        for _ in 0..100 {
            let vulnerability = build_vulnerability(WorldId(Uuid::from_u128(1)), target, &mut rng);
            assert!((1..=10).contains(&vulnerability.difficulty));
            assert!((1..=10).contains(&vulnerability.impact));
            assert_eq!(
                vulnerability.rarity,
                VulnerabilityRarity::for_difficulty(vulnerability.difficulty)
            );
            assert!((1..=3).contains(&vulnerability.exploits.len()));
            assert!(vulnerability.discovery_date.starts_with("20"));
        }
        assert_eq!(VulnerabilityRarity::for_difficulty(3), VulnerabilityRarity::Common);
        assert_eq!(VulnerabilityRarity::for_difficulty(9), VulnerabilityRarity::VeryRare);
    }

    #[test]
    fn empty_pool_hands_over_to_the_other() {
        let mut rng = WorldRng::new(Some(6));
        let networks = [NetworkId(Uuid::from_u128(4))];
        for _ in 0..20 {
            assert_eq!(
                pick_target(&[], &networks, &mut rng),
                Some(HackTarget::Network(networks[0]))
            );
        }
        assert_eq!(pick_target(&[], &[], &mut rng), None);
    }

    #[test]
    fn same_seed_same_vulnerability() {
        let target = HackTarget::Network(NetworkId(Uuid::from_u128(8)));
        let world_id = WorldId(Uuid::from_u128(1));
        let first = build_vulnerability(world_id, target, &mut WorldRng::new(Some(40)));
        let second = build_vulnerability(world_id, target, &mut WorldRng::new(Some(40)));
        assert_eq!(first, second);
    }
}
