use tracing::{debug, warn};

use crate::generation::rng::WorldRng;
use crate::model::{
    clamp_level, Building, BuildingId, BuildingMetadata, BuildingType, Location, LocationId,
    Room, RoomId, MAX_SECURITY, MIN_SECURITY,
};
use crate::world::{WorldDbError, WorldStore};

const HQ_CORPS: &[&str] = &["NeoTech", "CyberSys", "QuantumCorp", "SynthInc", "MegaData"];
const LAB_PREFIXES: &[&str] = &["Advanced", "Quantum", "Cyber", "Neural", "Bio"];
const NIGHTCLUB_NAMES: &[&str] = &["Neon Dreams", "Pulse", "Circuit", "Zero Day", "The Matrix"];
const OWNER_CORPS: &[&str] = &[
    "NeoTech Corp",
    "CyberSys Inc",
    "QuantumCorp",
    "SynthInc",
    "MegaData Ltd",
];
const GOVERNMENT_OWNER: &str = "Government";

/// Floors beyond this get no rooms.
const MAX_ROOM_FLOORS: u32 = 10;

const SENSITIVE_ROOMS: &[&str] = &[
    "Server Room",
    "Executive Suite",
    "Evidence Room",
    "Security Office",
    "Control Room",
];

fn building_count(population: u64, rng: &mut WorldRng) -> usize {
    if population > 1_000_000 {
        rng.range(5..=10)
    } else if population > 100_000 {
        rng.range(3..=7)
    } else if population > 10_000 {
        rng.range(2..=5)
    } else {
        rng.range(1..=3)
    }
}

fn building_name(building_type: BuildingType, location_name: &str, rng: &mut WorldRng) -> String {
    match building_type {
        BuildingType::CorporateHq => format!("{} Headquarters", rng.pick(HQ_CORPS)),
        BuildingType::ResearchLab => format!("{} Research Laboratory", rng.pick(LAB_PREFIXES)),
        BuildingType::Nightclub => rng.pick(NIGHTCLUB_NAMES).to_string(),
        other => format!("{} {}", location_name, other),
    }
}

pub fn build_building(location: &Location, rng: &mut WorldRng) -> Building {
    let building_type = *rng.pick(BuildingType::ALL);
    let name = building_name(building_type, &location.name, rng);
    let floors: u32 = if building_type.is_tower() {
        rng.range(10..=50)
    } else {
        rng.range(1..=10)
    };

    let base = location.security_level as i32;
    let security_level = if building_type.is_hardened() {
        clamp_level(base + rng.range(0..=2), MIN_SECURITY, MAX_SECURITY)
    } else if building_type.is_public_venue() {
        clamp_level(base - rng.range(0..=2), MIN_SECURITY, MAX_SECURITY)
    } else {
        clamp_level(base, MIN_SECURITY, MAX_SECURITY)
    };

    let owner = match building_type {
        BuildingType::CorporateHq | BuildingType::ResearchLab | BuildingType::DataCenter => {
            Some(rng.pick(OWNER_CORPS).to_string())
        }
        BuildingType::GovernmentBuilding
        | BuildingType::PoliceStation
        | BuildingType::MilitaryBase => Some(GOVERNMENT_OWNER.to_string()),
        _ => None,
    };

    let mut description = format!(
        "A {}-floor {} in {}.",
        floors,
        building_type.as_str().to_lowercase(),
        location.name
    );
    if security_level >= 4 {
        description.push_str(" Security is extremely tight, with advanced surveillance.");
    } else if security_level <= 2 {
        description.push_str(" Security is minimal, making it an easy target.");
    }
    if let Some(owner) = &owner {
        description.push_str(&format!(" Owned by {}.", owner));
    }

    Building {
        id: BuildingId(rng.next_uuid()),
        world_id: location.world_id,
        location_id: location.id,
        name,
        description,
        building_type,
        floors,
        security_level,
        metadata: BuildingMetadata { owner },
    }
}

fn room_types(building_type: BuildingType) -> &'static [&'static str] {
    match building_type {
        BuildingType::CorporateHq => &[
            "Office",
            "Meeting Room",
            "Server Room",
            "Executive Suite",
            "Lobby",
            "Cafeteria",
        ],
        BuildingType::ApartmentComplex => &["Apartment", "Lobby", "Maintenance Room", "Rooftop"],
        BuildingType::ShoppingMall => &["Store", "Food Court", "Security Office", "Storage Room"],
        BuildingType::ResearchLab => &[
            "Laboratory",
            "Office",
            "Server Room",
            "Testing Chamber",
            "Storage",
        ],
        BuildingType::DataCenter => &[
            "Server Room",
            "Control Room",
            "Cooling System",
            "Security Office",
        ],
        BuildingType::Hospital => &[
            "Patient Room",
            "Operating Room",
            "Pharmacy",
            "Reception",
            "Doctor's Office",
        ],
        BuildingType::PoliceStation => &[
            "Office",
            "Holding Cell",
            "Interrogation Room",
            "Evidence Room",
        ],
        BuildingType::Nightclub => &["Dance Floor", "Bar", "VIP Area", "DJ Booth", "Storage"],
        BuildingType::Restaurant => &["Dining Area", "Kitchen", "Storage", "Office"],
        BuildingType::Hotel => &["Room", "Lobby", "Restaurant", "Pool", "Gym"],
        BuildingType::Factory => &["Production Floor", "Office", "Storage", "Control Room"],
        BuildingType::Warehouse => &["Storage Area", "Loading Dock", "Office"],
        BuildingType::GovernmentBuilding => &[
            "Office",
            "Meeting Room",
            "Archive",
            "Security Checkpoint",
        ],
        BuildingType::School => &["Classroom", "Office", "Cafeteria", "Gym", "Library"],
        BuildingType::University => &[
            "Lecture Hall",
            "Laboratory",
            "Office",
            "Library",
            "Student Center",
        ],
        BuildingType::MilitaryBase => &["Room", "Office", "Storage"],
    }
}

fn room_name(room_type: &str, floor: u32, rng: &mut WorldRng) -> String {
    match room_type {
        "Server Room" if rng.chance(0.5) => {
            format!("Server {}-{}", rng.pick(&['A', 'B', 'C', 'D']), floor)
        }
        "Office" if rng.chance(0.5) => format!("Office {}-{}", floor, rng.range(1..=10u32)),
        "Room" | "Apartment" => format!("{} {}-{}", room_type, floor, rng.range(1..=20u32)),
        _ => format!("{} (Floor {})", room_type, floor),
    }
}

pub fn build_rooms(building: &Building, rng: &mut WorldRng) -> Vec<Room> {
    let types = room_types(building.building_type);
    let per_floor = rng.range(1..=5usize);
    let floors = building.floors.min(MAX_ROOM_FLOORS);
    let mut rooms = Vec::with_capacity(floors as usize * per_floor);

    for floor in 1..=floors {
        for _ in 0..per_floor {
            let room_type = *rng.pick(types);
            let name = room_name(room_type, floor, rng);

            let mut is_locked = false;
            let mut is_restricted = false;
            let mut security_level = MIN_SECURITY;
            if SENSITIVE_ROOMS.contains(&room_type)
                && (building.security_level >= 3 || rng.chance(0.7))
            {
                is_locked = true;
                security_level = (building.security_level + 1).min(MAX_SECURITY);
                is_restricted = rng.chance(0.5);
            }

            let size_sqm: u32 = match room_type {
                "Production Floor" | "Storage Area" => rng.range(100..=500),
                "Server Room" | "Executive Suite" | "Lecture Hall" => rng.range(40..=100),
                _ => rng.range(15..=40),
            };

            rooms.push(Room {
                id: RoomId(rng.next_uuid()),
                world_id: building.world_id,
                building_id: building.id,
                name,
                floor,
                room_type: room_type.to_string(),
                is_locked,
                is_restricted,
                security_level,
                size_sqm,
            });
        }
    }
    rooms
}

/// Buildings and their rooms for every physical location.
pub fn generate_buildings(
    store: &dyn WorldStore,
    location_ids: &[LocationId],
    rng: &mut WorldRng,
) -> Result<Vec<BuildingId>, WorldDbError> {
    let mut ids = Vec::new();
    let mut room_total = 0usize;
    for location_id in location_ids {
        let Some(location) = store.location(*location_id)? else {
            warn!(location_id = %location_id, "location not found, skipping its buildings");
            continue;
        };
        if location.is_virtual {
            continue;
        }

        for _ in 0..building_count(location.population, rng) {
            let building = build_building(&location, rng);
            store.insert_building(&building)?;
            let rooms = build_rooms(&building, rng);
            for room in &rooms {
                store.insert_room(room)?;
            }
            room_total += rooms.len();
            debug!(
                name = %building.name,
                location = %location.name,
                rooms = rooms.len(),
                "generated building"
            );
            ids.push(building.id);
        }
    }
    debug!(buildings = ids.len(), rooms = room_total, "generated buildings");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, LocationKind, LocationMetadata, WorldId};
    use uuid::Uuid;

    fn location(security_level: u8) -> Location {
        Location {
            id: LocationId(Uuid::from_u128(3)),
            world_id: WorldId(Uuid::from_u128(1)),
            name: "Corp Row".to_string(),
            description: String::new(),
            kind: LocationKind::District,
            parent_id: None,
            coordinates: Coordinates::ORIGIN,
            security_level,
            population: 2_000_000,
            services: Vec::new(),
            tags: Vec::new(),
            is_virtual: false,
            is_special: false,
            is_dangerous: false,
            metadata: LocationMetadata::default(),
        }
    }

    #[test]
    fn building_security_tracks_location() {
        let mut rng = WorldRng::new(Some(12));
        let loc = location(3);
        for _ in 0..100 {
            let building = build_building(&loc, &mut rng);
            let delta = building.security_level as i32 - 3;
            if building.building_type.is_hardened() {
                assert!((0..=2).contains(&delta));
            } else if building.building_type.is_public_venue() {
                assert!((-2..=0).contains(&delta));
            } else {
                assert_eq!(delta, 0);
            }
            if building.building_type.is_tower() {
                assert!(building.floors >= 10);
            }
        }
    }

    #[test]
    fn locked_rooms_sit_above_building_security() {
        let mut rng = WorldRng::new(Some(30));
        let loc = location(4);
        for _ in 0..30 {
            let building = build_building(&loc, &mut rng);
            let rooms = build_rooms(&building, &mut rng);
            assert!(!rooms.is_empty());
            for room in rooms {
                assert!(room.floor >= 1 && room.floor <= MAX_ROOM_FLOORS);
                if room.is_locked {
                    assert!(SENSITIVE_ROOMS.contains(&room.room_type.as_str()));
                    assert_eq!(
                        room.security_level,
                        (building.security_level + 1).min(MAX_SECURITY)
                    );
                } else {
                    assert!(!room.is_restricted);
                }
            }
        }
    }

    #[test]
    fn every_building_type_has_room_types() {
        for building_type in BuildingType::ALL {
            assert!(!room_types(*building_type).is_empty());
        }
    }
}
