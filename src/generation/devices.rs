use std::net::Ipv4Addr;

use tracing::{debug, warn};

use crate::generation::rng::WorldRng;
use crate::model::{
    Building, BuildingId, CharacterId, Device, DeviceId, DeviceType, LocationId, Room, RoomId,
    WorldId, MIN_SECURITY,
};
use crate::world::{WorldDbError, WorldStore};

pub const OS_TYPES: &[&str] = &[
    "Windows 11",
    "Windows 10",
    "Linux Debian",
    "Linux Ubuntu",
    "Linux Kali",
    "macOS",
    "Android",
    "iOS",
    "Custom OS",
    "Legacy System",
];

const BUILDING_SHARE: f64 = 0.7;

/// Where a device ends up and the highest security it may carry there.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub location_id: LocationId,
    pub building_id: Option<BuildingId>,
    pub room_id: Option<RoomId>,
    pub owner_id: Option<CharacterId>,
    pub security_bound: u8,
}

pub fn device_name(device_type: DeviceType, rng: &mut WorldRng) -> String {
    let serial: u32 = rng.range(1..=999);
    match device_type {
        DeviceType::Server => format!(
            "SRV-{}-{:03}",
            rng.pick(&["MAIN", "DATA", "WEB", "AUTH", "DB"]),
            serial
        ),
        DeviceType::DesktopPc => format!(
            "PC-{}-{:03}",
            rng.pick(&["WORK", "DEV", "ADMIN", "USER"]),
            serial
        ),
        DeviceType::Laptop => format!(
            "LT-{}-{:03}",
            rng.pick(&["WORK", "PERSONAL", "TRAVEL"]),
            serial
        ),
        DeviceType::Smartphone => format!(
            "PHONE-{}-{:03}",
            rng.pick(&["PERSONAL", "WORK", "SECURE"]),
            serial
        ),
        other => format!(
            "{}-{:03}",
            other.as_str().to_uppercase().replace(' ', "-"),
            serial
        ),
    }
}

pub fn device_security(device_type: DeviceType, name: &str, rng: &mut WorldRng) -> u8 {
    match device_type {
        DeviceType::Server | DeviceType::SecuritySystem => rng.range(3..=5),
        DeviceType::DesktopPc | DeviceType::Laptop if name.contains("ADMIN") => rng.range(3..=4),
        _ => rng.range(1..=3),
    }
}

fn describe(device_type: DeviceType, os_type: &str, security: u8, ip: &str) -> String {
    let mut text = format!("A {} running {}.", device_type.as_str().to_lowercase(), os_type);
    if security >= 4 {
        text.push_str(" It is protected by several layers of high-grade security.");
    } else if security <= 2 {
        text.push_str(" Its security is minimal and riddled with vulnerabilities.");
    }
    match device_type {
        DeviceType::Server => {
            text.push_str(&format!(
                " It hosts critical services and answers at {}.",
                ip
            ));
        }
        DeviceType::SecuritySystem => {
            text.push_str(" It controls access and surveillance for a secured area.");
        }
        _ => {}
    }
    text
}

pub fn build_device(world_id: WorldId, placement: Placement, rng: &mut WorldRng) -> Device {
    let device_type = *rng.pick(DeviceType::ALL);
    let os_type = rng.pick(OS_TYPES).to_string();
    let name = device_name(device_type, rng);
    let security_level = device_security(device_type, &name, rng)
        .min(placement.security_bound)
        .max(MIN_SECURITY);
    let ip_address = Ipv4Addr::from(rng.range(0..=u32::MAX)).to_string();
    let description = describe(device_type, &os_type, security_level, &ip_address);

    Device {
        id: DeviceId(rng.next_uuid()),
        world_id,
        location_id: placement.location_id,
        building_id: placement.building_id,
        room_id: placement.room_id,
        owner_id: placement.owner_id,
        name,
        description,
        device_type,
        os_type,
        security_level,
        ip_address,
        is_connected: true,
    }
}

fn building_placement(building: &Building, rooms: &[Room], rng: &mut WorldRng) -> Placement {
    Placement {
        location_id: building.location_id,
        building_id: Some(building.id),
        room_id: rng.choose(rooms).map(|room| room.id),
        owner_id: None,
        security_bound: building.security_level,
    }
}

fn character_placement(
    store: &dyn WorldStore,
    character_id: CharacterId,
) -> Result<Option<Placement>, WorldDbError> {
    let Some(character) = store.character(character_id)? else {
        warn!(character_id = %character_id, "owner not found, skipping device");
        return Ok(None);
    };
    let Some(location) = store.location(character.location_id)? else {
        warn!(character_id = %character_id, "owner location not found, skipping device");
        return Ok(None);
    };
    Ok(Some(Placement {
        location_id: location.id,
        building_id: None,
        room_id: None,
        owner_id: Some(character.id),
        security_bound: location.security_level,
    }))
}

/// Devices spread over buildings (70 %) and characters (30 %). When one pool
/// is empty the other takes every device.
pub fn generate_devices(
    store: &dyn WorldStore,
    world_id: WorldId,
    building_ids: &[BuildingId],
    character_ids: &[CharacterId],
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<DeviceId>, WorldDbError> {
    let mut buildings: Vec<(Building, Vec<Room>)> = Vec::with_capacity(building_ids.len());
    for id in building_ids {
        match store.building(*id)? {
            Some(building) => {
                let rooms = store.rooms_for_building(building.id)?;
                buildings.push((building, rooms));
            }
            None => warn!(building_id = %id, "building not found, leaving it without devices"),
        }
    }

    if buildings.is_empty() && character_ids.is_empty() {
        warn!(count, "no buildings or characters to hold devices");
        return Ok(Vec::new());
    }

    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let in_building = if buildings.is_empty() {
            false
        } else if character_ids.is_empty() {
            true
        } else {
            rng.chance(BUILDING_SHARE)
        };

        let placement = if in_building {
            let Some((building, rooms)) = rng.choose(&buildings) else {
                continue;
            };
            building_placement(building, rooms, rng)
        } else {
            let Some(&owner) = rng.choose(character_ids) else {
                continue;
            };
            match character_placement(store, owner)? {
                Some(placement) => placement,
                None => continue,
            }
        };

        let device = build_device(world_id, placement, rng);
        store.insert_device(&device)?;
        debug!(name = %device.name, kind = %device.device_type, "generated device");
        ids.push(device.id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn placement(bound: u8) -> Placement {
        Placement {
            location_id: LocationId(Uuid::from_u128(2)),
            building_id: None,
            room_id: None,
            owner_id: Some(CharacterId(Uuid::from_u128(9))),
            security_bound: bound,
        }
    }

    #[test]
    fn names_follow_type_templates() {
        let mut rng = WorldRng::new(Some(4));
        let server = device_name(DeviceType::Server, &mut rng);
        assert!(server.starts_with("SRV-"));
        assert_eq!(server.rsplit('-').next().map(str::len), Some(3));
        let atm = device_name(DeviceType::Atm, &mut rng);
        assert!(atm.starts_with("ATM-"));
        let smart = device_name(DeviceType::SmartDevice, &mut rng);
        assert!(smart.starts_with("SMART-DEVICE-"));
    }

    #[test]
    fn security_never_exceeds_owner_bound() {
        let mut rng = WorldRng::new(Some(8));
        for bound in 1..=5 {
            for _ in 0..40 {
                let device = build_device(WorldId(Uuid::from_u128(1)), placement(bound), &mut rng);
                assert!(device.security_level <= bound);
                assert!(device.security_level >= MIN_SECURITY);
                assert!(device.ip_address.parse::<Ipv4Addr>().is_ok());
            }
        }
    }

    #[test]
    fn servers_start_hardened() {
        let mut rng = WorldRng::new(Some(5));
        for _ in 0..50 {
            let level = device_security(DeviceType::Server, "SRV-DB-001", &mut rng);
            assert!((3..=5).contains(&level));
            let admin = device_security(DeviceType::DesktopPc, "PC-ADMIN-002", &mut rng);
            assert!((3..=4).contains(&admin));
        }
    }
}
