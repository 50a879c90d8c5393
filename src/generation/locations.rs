//! Cities, their districts, and the special or virtual places outside them.

use tracing::{debug, warn};

use crate::content::names::{NamePool, CITY_NAMES, CITY_PREFIXES};
use crate::content::synthetic_name;
use crate::generation::rng::WorldRng;
use crate::model::{
    clamp_level, Coordinates, DistrictArchetype, Location, LocationId, LocationKind,
    LocationMetadata, WorldId, MAX_SECURITY, MIN_SECURITY,
};
use crate::world::{WorldDbError, WorldStore};

const CITY_BASE_SERVICES: &[&str] = &["commerce", "transport"];
const CITY_OPTIONAL_SERVICES: &[&str] = &[
    "hacking",
    "medical",
    "finance",
    "entertainment",
    "information",
    "black market",
];
const DISTRICT_EXTRA_SERVICES: &[&str] =
    &["medical", "transport", "entertainment", "luxury", "information"];
const SPECIAL_OPTIONAL_SERVICES: &[&str] =
    &["medical", "transport", "entertainment", "luxury", "information"];

const MEGALOPOLIS_POPULATION: u64 = 10_000_000;
const SECURITY_LABELS: [&str; 5] = ["minimal", "low", "moderate", "high", "maximal"];

fn security_label(level: u8) -> &'static str {
    SECURITY_LABELS[(clamp_level(level as i32, MIN_SECURITY, MAX_SECURITY) - 1) as usize]
}

fn join_services(services: &[String]) -> String {
    match services.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => "nothing of note".to_string(),
    }
}

fn is_dangerous(security_level: u8) -> bool {
    security_level <= 2
}

pub fn build_city(
    world_id: WorldId,
    base_name: &str,
    rng: &mut WorldRng,
) -> Location {
    let name = if rng.chance(0.5) {
        format!("{}{}", rng.pick(CITY_PREFIXES), base_name)
    } else {
        base_name.to_string()
    };
    let coordinates = Coordinates {
        latitude: rng.range(-90.0..90.0),
        longitude: rng.range(-180.0..180.0),
    };
    let population: u64 = rng.range(100_000..=20_000_000);
    let security_level: u8 = rng.range(MIN_SECURITY..=MAX_SECURITY);

    let mut services: Vec<String> = CITY_BASE_SERVICES.iter().map(|s| s.to_string()).collect();
    let optional = rng.range(0..=CITY_OPTIONAL_SERVICES.len());
    services.extend(
        rng.sample(CITY_OPTIONAL_SERVICES, optional)
            .into_iter()
            .map(str::to_string),
    );

    let mut tags = vec!["city".to_string()];
    if population > MEGALOPOLIS_POPULATION {
        tags.push("megalopolis".to_string());
    }
    if security_level >= 4 {
        tags.push("high security".to_string());
    } else if is_dangerous(security_level) {
        tags.push("danger zone".to_string());
    }

    let mood = *rng.pick(&["bustling", "teeming", "towering", "sprawling"]);
    let known_for = *rng.pick(&[
        "its dizzying skyscrapers",
        "its crowded markets",
        "its cutting-edge technology",
        "its unique architecture",
    ]);
    let description = format!(
        "{} is a {} city of {} people. Known for {}. Security is {}. Offers {}.",
        name,
        mood,
        population,
        known_for,
        security_label(security_level),
        join_services(&services)
    );

    Location {
        id: LocationId(rng.next_uuid()),
        world_id,
        name,
        description,
        kind: LocationKind::City,
        parent_id: None,
        coordinates,
        security_level,
        population,
        services,
        tags,
        is_virtual: false,
        is_special: false,
        is_dangerous: is_dangerous(security_level),
        metadata: LocationMetadata::default(),
    }
}

pub fn generate_cities(
    store: &dyn WorldStore,
    world_id: WorldId,
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<LocationId>, WorldDbError> {
    let mut pool = NamePool::new(CITY_NAMES);
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let base_name = pool.draw(rng);
        let city = build_city(world_id, &base_name, rng);
        store.insert_location(&city)?;
        debug!(name = %city.name, id = %city.id, "generated city");
        ids.push(city.id);
    }
    Ok(ids)
}

fn district_name(city: &str, archetype: DistrictArchetype, rng: &mut WorldRng) -> String {
    match archetype {
        DistrictArchetype::Financial => format!("Wall Street {}", rng.range(2..=9u8)),
        DistrictArchetype::Entertainment => "Neon Valley".to_string(),
        DistrictArchetype::Slums => "The Pit".to_string(),
        DistrictArchetype::Underground => "Subterranea".to_string(),
        DistrictArchetype::Corporate => "Corp Row".to_string(),
        _ => format!("{} - {}", city, archetype),
    }
}

pub fn build_district(
    city: &Location,
    archetype: DistrictArchetype,
    rng: &mut WorldRng,
) -> Location {
    let name = district_name(&city.name, archetype, rng);
    let variation = *rng.pick(&[-1, 0, 0, 1]);
    let security_level = clamp_level(
        city.security_level as i32 + variation,
        MIN_SECURITY,
        MAX_SECURITY,
    );
    let population = (city.population as f64 * rng.range(0.1..0.3)) as u64;
    let coordinates = Coordinates {
        latitude: city.coordinates.latitude + rng.range(-0.05..0.05),
        longitude: city.coordinates.longitude + rng.range(-0.05..0.05),
    };

    let mut services: Vec<String> = archetype
        .base_services()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let extras = rng.range(0..=2usize);
    for extra in rng.sample(DISTRICT_EXTRA_SERVICES, extras) {
        if !services.iter().any(|s| s == extra) {
            services.push(extra.to_string());
        }
    }

    let mut tags = vec![
        "district".to_string(),
        archetype.as_str().to_lowercase(),
    ];
    if is_dangerous(security_level) {
        tags.push("danger zone".to_string());
    }

    let mood = *rng.pick(&["lively", "teeming", "quiet", "noisy"]);
    let description = format!(
        "{} is a {} {} district of {}, home to about {} people. Security is {}. Mostly offers {}.",
        name,
        mood,
        archetype.as_str().to_lowercase(),
        city.name,
        population,
        security_label(security_level),
        join_services(&services)
    );

    Location {
        id: LocationId(rng.next_uuid()),
        world_id: city.world_id,
        name,
        description,
        kind: LocationKind::District,
        parent_id: Some(city.id),
        coordinates,
        security_level,
        population,
        services,
        tags,
        is_virtual: false,
        is_special: false,
        is_dangerous: is_dangerous(security_level),
        metadata: LocationMetadata {
            archetype: Some(archetype.as_str().to_string()),
        },
    }
}

/// Districts for each city, at most one per archetype. Cities that cannot
/// be read back are skipped.
pub fn generate_districts(
    store: &dyn WorldStore,
    city_ids: &[LocationId],
    per_city: usize,
    rng: &mut WorldRng,
) -> Result<Vec<LocationId>, WorldDbError> {
    let mut ids = Vec::new();
    for city_id in city_ids {
        let Some(city) = store.location(*city_id)? else {
            warn!(city_id = %city_id, "city not found, skipping its districts");
            continue;
        };
        for archetype in rng.sample(DistrictArchetype::ALL, per_city) {
            let district = build_district(&city, archetype, rng);
            store.insert_location(&district)?;
            debug!(name = %district.name, city = %city.name, "generated district");
            ids.push(district.id);
        }
    }
    Ok(ids)
}

#[derive(Debug, Clone, Copy)]
struct SpecialArchetype {
    name: &'static str,
    blurb: &'static str,
    is_virtual: bool,
    is_special: bool,
}

const SPECIAL_ARCHETYPES: &[SpecialArchetype] = &[
    SpecialArchetype {
        name: "Darknet Hub",
        blurb: "A virtual place reachable only through the net, the core of the global darknet.",
        is_virtual: true,
        is_special: false,
    },
    SpecialArchetype {
        name: "Orbital Station",
        blurb: "A station in low orbit, reserved for the elite and for bleeding-edge research.",
        is_virtual: false,
        is_special: true,
    },
    SpecialArchetype {
        name: "Wasteland",
        blurb: "A former urban core ruined by the corporate wars, now home to outcasts.",
        is_virtual: false,
        is_special: false,
    },
    SpecialArchetype {
        name: "Underground Bunker",
        blurb: "A fortified bunker left over from the old wars, turned into a refuge.",
        is_virtual: false,
        is_special: false,
    },
    SpecialArchetype {
        name: "AI Nexus",
        blurb: "A quantum computing centre where the most advanced AIs live.",
        is_virtual: false,
        is_special: true,
    },
    SpecialArchetype {
        name: "Black Market",
        blurb: "An international black market open only to insiders with the right contacts.",
        is_virtual: false,
        is_special: false,
    },
    SpecialArchetype {
        name: "Corporate Island",
        blurb: "An artificial island owned by a megacorp that writes its own laws.",
        is_virtual: false,
        is_special: true,
    },
    SpecialArchetype {
        name: "Virtual Resort",
        blurb: "A virtual paradise where the rich live out their fantasies without limits.",
        is_virtual: true,
        is_special: false,
    },
];

const SPECIAL_SUFFIXES: &[&str] = &["Alpha", "Prime", "Zero", "Omega", "X"];

const SYNTHETIC_SECTOR: SpecialArchetype = SpecialArchetype {
    name: "Sector",
    blurb: "An uncharted sector beyond the reach of the city grids.",
    is_virtual: false,
    is_special: false,
};

fn build_special(world_id: WorldId, archetype: SpecialArchetype, rng: &mut WorldRng) -> Location {
    let base_name = if archetype.name == SYNTHETIC_SECTOR.name {
        format!("Sector {}", synthetic_name(rng, 3))
    } else {
        archetype.name.to_string()
    };
    let name = if rng.chance(0.3) {
        format!("{} {}", base_name, rng.pick(SPECIAL_SUFFIXES))
    } else {
        base_name
    };

    let coordinates = if archetype.is_virtual {
        Coordinates::ORIGIN
    } else {
        Coordinates {
            latitude: rng.range(-90.0..90.0),
            longitude: rng.range(-180.0..180.0),
        }
    };
    let population: u64 = if archetype.is_virtual {
        0
    } else if archetype.is_special {
        rng.range(100..=10_000)
    } else {
        rng.range(1_000..=100_000)
    };
    let security_level: u8 = if archetype.is_special {
        rng.range(4..=5)
    } else if matches!(archetype.name, "Wasteland" | "Black Market") {
        rng.range(1..=2)
    } else {
        rng.range(MIN_SECURITY..=MAX_SECURITY)
    };

    let base: &[&str] = if archetype.is_virtual {
        &["information", "hacking"]
    } else if archetype.is_special {
        &["research", "security"]
    } else if archetype.name == "Black Market" {
        &["black market", "smuggling"]
    } else {
        &["commerce"]
    };
    let mut services: Vec<String> = base.iter().map(|s| s.to_string()).collect();
    let optional = rng.range(0..=3usize);
    services.extend(
        rng.sample(SPECIAL_OPTIONAL_SERVICES, optional)
            .into_iter()
            .map(str::to_string),
    );

    let mut tags = Vec::new();
    if archetype.is_virtual {
        tags.push("virtual".to_string());
    }
    if archetype.is_special {
        tags.push("special".to_string());
    }
    if is_dangerous(security_level) {
        tags.push("dangerous".to_string());
    }
    match archetype.name {
        "Orbital Station" => tags.push("space".to_string()),
        "AI Nexus" => tags.push("artificial intelligence".to_string()),
        _ => {}
    }

    let mut description = archetype.blurb.to_string();
    if archetype.is_virtual {
        description.push(' ');
        description.push_str(*rng.pick(&[
            "Reachable only over secured links.",
            "A digital world with its own rules.",
            "Reality there is malleable and dangerous.",
        ]));
    }
    if archetype.is_special {
        description.push(' ');
        description.push_str(*rng.pick(&[
            "Access is strictly controlled.",
            "Reserved for a privileged few.",
            "Guarded by advanced security systems.",
        ]));
    }
    if is_dangerous(security_level) {
        description.push(' ');
        description.push_str(*rng.pick(&[
            "The law does not reach this place.",
            "Dangerous for outsiders.",
            "Survival is a daily struggle.",
        ]));
    }

    let kind = if archetype.is_virtual {
        LocationKind::Virtual
    } else {
        LocationKind::Special
    };

    Location {
        id: LocationId(rng.next_uuid()),
        world_id,
        name,
        description,
        kind,
        parent_id: None,
        coordinates,
        security_level,
        population,
        services,
        tags,
        is_virtual: archetype.is_virtual,
        is_special: archetype.is_special,
        is_dangerous: is_dangerous(security_level),
        metadata: LocationMetadata {
            archetype: Some(archetype.name.to_string()),
        },
    }
}

pub fn generate_special_locations(
    store: &dyn WorldStore,
    world_id: WorldId,
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<LocationId>, WorldDbError> {
    let mut archetypes = rng.sample(SPECIAL_ARCHETYPES, count);
    archetypes.resize(count, SYNTHETIC_SECTOR);

    let mut ids = Vec::with_capacity(count);
    for archetype in archetypes {
        let location = build_special(world_id, archetype, rng);
        store.insert_location(&location)?;
        debug!(name = %location.name, kind = %location.kind, "generated special location");
        ids.push(location.id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn world() -> WorldId {
        WorldId(Uuid::from_u128(1))
    }

    #[test]
    fn city_tags_follow_population_and_security() {
        let mut rng = WorldRng::new(Some(10));
        for _ in 0..50 {
            let city = build_city(world(), "Lagos", &mut rng);
            assert!(city.name.ends_with("Lagos"));
            assert!(city.services.starts_with(&["commerce".to_string(), "transport".to_string()]));
            assert_eq!(
                city.tags.contains(&"megalopolis".to_string()),
                city.population > MEGALOPOLIS_POPULATION
            );
            assert_eq!(city.is_dangerous, city.security_level <= 2);
        }
    }

    #[test]
    fn district_security_stays_within_one_of_city() {
        let mut rng = WorldRng::new(Some(4));
        let city = build_city(world(), "Cairo", &mut rng);
        for archetype in DistrictArchetype::ALL {
            let district = build_district(&city, *archetype, &mut rng);
            let delta = district.security_level as i32 - city.security_level as i32;
            assert!(delta.abs() <= 1);
            assert_eq!(district.parent_id, Some(city.id));
            assert!(district.population <= city.population * 3 / 10 + 1);
            for base in archetype.base_services() {
                assert!(district.services.iter().any(|s| s == base));
            }
        }
    }

    #[test]
    fn virtual_places_sit_at_origin_with_no_population() {
        let mut rng = WorldRng::new(Some(8));
        let hub = SPECIAL_ARCHETYPES[0];
        let location = build_special(world(), hub, &mut rng);
        assert_eq!(location.kind, LocationKind::Virtual);
        assert_eq!(location.coordinates, Coordinates::ORIGIN);
        assert_eq!(location.population, 0);
    }

    #[test]
    fn virtual_descriptions_gain_a_flavor_sentence() {
        let mut rng = WorldRng::new(Some(12));
        let hub = SPECIAL_ARCHETYPES[0];
        let location = build_special(world(), hub, &mut rng);
        assert!(location.description.starts_with(hub.blurb));
        assert!(location.description.len() > hub.blurb.len());
    }

    #[test]
    fn special_places_are_high_security() {
        let mut rng = WorldRng::new(Some(8));
        let station = SPECIAL_ARCHETYPES[1];
        for _ in 0..20 {
            let location = build_special(world(), station, &mut rng);
            assert!(location.security_level >= 4);
            assert!((100..=10_000).contains(&location.population));
        }
    }
}
