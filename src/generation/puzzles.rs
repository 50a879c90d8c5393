//! Hacking challenges attached to devices and networks. Difficulty is a
//! non-decreasing function of the target's protection.

use tracing::{debug, warn};

use crate::generation::rng::WorldRng;
use crate::model::{
    DeviceId, DeviceTarget, DeviceType, HackTarget, HackingPuzzle, Network, NetworkId,
    NetworkSecurity, NetworkType, PuzzleId, PuzzleMetadata, PuzzleType, WorldId, MAX_SECURITY,
    MIN_SECURITY,
};
use crate::world::{WorldDbError, WorldStore};

const DEVICE_PUZZLE_CHANCE: f64 = 0.3;
const NETWORK_PUZZLE_CHANCE: f64 = 0.5;
const TRAP_CHANCE: f64 = 0.3;
/// Above this difficulty puzzles may be trapped and raise alarms.
const DANGER_THRESHOLD: u8 = 3;

fn device_puzzle_type(device_type: Option<DeviceType>, rng: &mut WorldRng) -> PuzzleType {
    let Some(device_type) = device_type else {
        return *rng.pick(PuzzleType::ALL);
    };
    let pool: &[PuzzleType] = match device_type {
        DeviceType::Server | DeviceType::SecuritySystem => &[
            PuzzleType::FirewallBypass,
            PuzzleType::CodeInjection,
            PuzzleType::BufferOverflow,
        ],
        DeviceType::DesktopPc | DeviceType::Laptop => &[
            PuzzleType::PasswordBruteforce,
            PuzzleType::BasicTerminal,
            PuzzleType::SequenceMatching,
        ],
        DeviceType::Smartphone | DeviceType::Tablet => &[
            PuzzleType::PasswordBruteforce,
            PuzzleType::NetworkRerouting,
        ],
        DeviceType::SmartDevice => &[PuzzleType::BasicTerminal, PuzzleType::SequenceMatching],
        _ => PuzzleType::ALL,
    };
    *rng.pick(pool)
}

fn network_puzzle_type(network_type: NetworkType, rng: &mut WorldRng) -> PuzzleType {
    let pool: &[PuzzleType] = match network_type {
        NetworkType::Corporate | NetworkType::Vpn | NetworkType::Secured => &[
            PuzzleType::FirewallBypass,
            PuzzleType::NetworkRerouting,
            PuzzleType::CodeInjection,
        ],
        NetworkType::Wifi => &[
            PuzzleType::PasswordBruteforce,
            PuzzleType::SequenceMatching,
        ],
        NetworkType::Iot => &[PuzzleType::BasicTerminal, PuzzleType::SequenceMatching],
        _ => PuzzleType::ALL,
    };
    *rng.pick(pool)
}

/// Device security maps straight onto difficulty; anything outside the
/// security scale falls back to an easy roll.
pub fn device_difficulty(security_level: Option<u8>, rng: &mut WorldRng) -> u8 {
    match security_level {
        Some(level) if (MIN_SECURITY..=MAX_SECURITY).contains(&level) => level,
        _ => rng.range(1..=3),
    }
}

pub fn network_difficulty(security: NetworkSecurity, rng: &mut WorldRng) -> u8 {
    match security {
        NetworkSecurity::Enterprise | NetworkSecurity::Wpa3 => rng.range(4..=5),
        NetworkSecurity::Wpa2 => rng.range(3..=4),
        NetworkSecurity::Wpa => rng.range(2..=3),
        NetworkSecurity::Wep => rng.range(1..=2),
        NetworkSecurity::Open => rng.range(1..=3),
    }
}

fn hints(name: &str, difficulty: u8) -> Vec<String> {
    let mut hints = vec![format!("Look for the weakest entry point of {}.", name)];
    if difficulty < 4 {
        hints.push(format!("Default credentials were never changed on {}.", name));
    }
    hints
}

struct Danger {
    has_trap: bool,
    alarm_chance: f64,
}

fn danger(difficulty: u8, rng: &mut WorldRng) -> Danger {
    if difficulty > DANGER_THRESHOLD {
        Danger {
            has_trap: rng.chance(TRAP_CHANCE),
            alarm_chance: 0.1 * difficulty as f64,
        }
    } else {
        Danger {
            has_trap: false,
            alarm_chance: 0.0,
        }
    }
}

pub fn build_device_puzzle(
    world_id: WorldId,
    device: &DeviceTarget,
    rng: &mut WorldRng,
) -> HackingPuzzle {
    let puzzle_type = device_puzzle_type(device.device_type, rng);
    let difficulty = device_difficulty(device.security_level, rng);
    let name = format!("{} Challenge", puzzle_type);
    let xp_reward = difficulty as u32 * rng.range(10..=20u32);
    let credit_reward = difficulty as u32 * rng.range(50..=200u32);
    let danger = danger(difficulty, rng);
    let metadata = PuzzleMetadata {
        hints: hints(&device.name, difficulty),
        solution_steps: rng.range(3..=5 + difficulty as u32),
        failure_consequence: (difficulty > DANGER_THRESHOLD).then(|| "data_loss".to_string()),
        connected_poi: if difficulty > DANGER_THRESHOLD {
            rng.range(0..=3)
        } else {
            0
        },
        accessible_devices: None,
    };

    HackingPuzzle {
        id: PuzzleId(rng.next_uuid()),
        world_id,
        description: format!("A {} puzzle guarding the device {}.", puzzle_type, device.name),
        name,
        puzzle_type,
        target: HackTarget::Device(device.id),
        difficulty,
        xp_reward,
        credit_reward,
        has_trap: danger.has_trap,
        alarm_chance: danger.alarm_chance,
        metadata,
    }
}

pub fn build_network_puzzle(
    world_id: WorldId,
    network: &Network,
    rng: &mut WorldRng,
) -> HackingPuzzle {
    let puzzle_type = network_puzzle_type(network.network_type, rng);
    let difficulty = network_difficulty(network.security, rng);
    let name = format!("{} Access Challenge", network.name);
    let xp_reward = difficulty as u32 * rng.range(15..=25u32);
    let credit_reward = difficulty as u32 * rng.range(75..=250u32);
    let danger = danger(difficulty, rng);
    let metadata = PuzzleMetadata {
        hints: hints(&network.name, difficulty),
        solution_steps: rng.range(2..=4 + difficulty as u32),
        failure_consequence: danger.has_trap.then(|| "trace".to_string()),
        connected_poi: 0,
        accessible_devices: Some(rng.range(1..=5)),
    };

    HackingPuzzle {
        id: PuzzleId(rng.next_uuid()),
        world_id,
        description: format!("A hacking puzzle standing between you and {}.", network.name),
        name,
        puzzle_type,
        target: HackTarget::Network(network.id),
        difficulty,
        xp_reward,
        credit_reward,
        has_trap: danger.has_trap,
        alarm_chance: danger.alarm_chance,
        metadata,
    }
}

pub fn generate_puzzles(
    store: &dyn WorldStore,
    world_id: WorldId,
    device_ids: &[DeviceId],
    network_ids: &[NetworkId],
    rng: &mut WorldRng,
) -> Result<Vec<PuzzleId>, WorldDbError> {
    let mut ids = Vec::new();

    for device_id in device_ids {
        if !rng.chance(DEVICE_PUZZLE_CHANCE) {
            continue;
        }
        let Some(device) = store.device_target(*device_id)? else {
            warn!(device_id = %device_id, "puzzle target device not found, skipping");
            continue;
        };
        if device.security_level.is_none() {
            warn!(device_id = %device_id, "device security unreadable, rolling an easy puzzle");
        }
        let puzzle = build_device_puzzle(world_id, &device, rng);
        store.insert_puzzle(&puzzle)?;
        debug!(target = %device.name, difficulty = puzzle.difficulty, "generated device puzzle");
        ids.push(puzzle.id);
    }

    for network_id in network_ids {
        if !rng.chance(NETWORK_PUZZLE_CHANCE) {
            continue;
        }
        let Some(network) = store.network(*network_id)? else {
            warn!(network_id = %network_id, "puzzle target network not found, skipping");
            continue;
        };
        if !network.requires_hacking {
            continue;
        }
        let puzzle = build_network_puzzle(world_id, &network, rng);
        store.insert_puzzle(&puzzle)?;
        debug!(target = %network.name, difficulty = puzzle.difficulty, "generated network puzzle");
        ids.push(puzzle.id);
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_difficulty_tracks_security() {
        let mut rng = WorldRng::new(Some(2));
        for level in MIN_SECURITY..=MAX_SECURITY {
            assert_eq!(device_difficulty(Some(level), &mut rng), level);
        }
        for _ in 0..20 {
            let fallback = device_difficulty(None, &mut rng);
            assert!((1..=3).contains(&fallback));
            let invalid = device_difficulty(Some(9), &mut rng);
            assert!((1..=3).contains(&invalid));
        }
    }

    #[test]
    fn network_difficulty_ranges_never_invert() {
        let mut rng = WorldRng::new(Some(14));
        let ordered = [
            NetworkSecurity::Wep,
            NetworkSecurity::Wpa,
            NetworkSecurity::Wpa2,
            NetworkSecurity::Wpa3,
        ];
        let ranges: Vec<(u8, u8)> = ordered
            .iter()
            .map(|security| {
                let rolls: Vec<u8> = (0..200)
                    .map(|_| network_difficulty(*security, &mut rng))
                    .collect();
                (
                    rolls.iter().copied().min().unwrap_or(0),
                    rolls.iter().copied().max().unwrap_or(0),
                )
            })
            .collect();
        for pair in ranges.windows(2) {
            assert!(pair[0].0 <= pair[1].0);
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn easy_puzzles_are_never_trapped() {
        let mut rng = WorldRng::new(Some(23));
        for difficulty in 1..=DANGER_THRESHOLD {
            for _ in 0..20 {
                let danger = danger(difficulty, &mut rng);
                assert!(!danger.has_trap);
                assert_eq!(danger.alarm_chance, 0.0);
            }
        }
        let hard = danger(5, &mut rng);
        assert!((hard.alarm_chance - 0.5).abs() < 1e-9);
    }

    #[test]
    fn unreadable_device_security_falls_back_to_easy_puzzles() {
        use crate::generation::generate_world;
        use crate::{WorldConfig, WorldDb};

        let mut db = WorldDb::open_in_memory().unwrap();
        let world_id = generate_world(&mut db, &WorldConfig::new(1).with_seed(12))
            .unwrap()
            .world_id;
        db.connection()
            .execute_batch(
                "PRAGMA ignore_check_constraints = ON;
                 UPDATE devices SET security_level = 'classified', device_type = 'Toaster';
                 PRAGMA ignore_check_constraints = OFF;",
            )
            .unwrap();
        let device_ids: Vec<DeviceId> = {
            let mut stmt = db.connection().prepare("SELECT id FROM devices").unwrap();
            let rows = stmt.query_map([], |row| row.get(0)).unwrap();
            rows.map(Result::unwrap).collect()
        };

        let store = db.store();
        let target = store.device_target(device_ids[0]).unwrap().unwrap();
        assert_eq!(target.security_level, None);
        assert_eq!(target.device_type, None);

        let mut rng = WorldRng::new(Some(3));
        let ids = generate_puzzles(&store, world_id, &device_ids, &[], &mut rng).unwrap();
        assert!(!ids.is_empty());
        for id in ids {
            let difficulty: u8 = db
                .connection()
                .query_row(
                    "SELECT difficulty FROM hacking_puzzles WHERE id = ?1",
                    rusqlite::params![id],
                    |row| row.get(0),
                )
                .unwrap();
            assert!((1..=3).contains(&difficulty));
        }
    }
}
