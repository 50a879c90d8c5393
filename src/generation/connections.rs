//! Travel links between locations. Every link is written in both directions.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::generation::rng::WorldRng;
use crate::model::{LinkId, Location, LocationId, LocationKind, LocationLink, TravelType, WorldId};
use crate::world::{WorldDbError, WorldStore};

const MAX_EXTRA_CITY_LINKS: usize = 5;
const MAX_EXTRA_DISTRICT_LINKS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub travel_type: TravelType,
    pub hours: f64,
    pub cost: u32,
}

/// Inter-city mode by planar distance in degrees.
pub fn city_route(distance: f64, rng: &mut WorldRng) -> Route {
    if distance > 50.0 {
        Route {
            travel_type: TravelType::InternationalFlight,
            hours: rng.range(5.0..15.0),
            cost: rng.range(5_000..=15_000),
        }
    } else if distance > 10.0 {
        Route {
            travel_type: TravelType::RegionalFlight,
            hours: rng.range(1.0..5.0),
            cost: rng.range(1_000..=5_000),
        }
    } else {
        Route {
            travel_type: TravelType::HighSpeedTrain,
            hours: rng.range(0.5..3.0),
            cost: rng.range(500..=2_000),
        }
    }
}

fn metro_route(rng: &mut WorldRng) -> Route {
    Route {
        travel_type: TravelType::Metro,
        hours: rng.range(0.1..0.5),
        cost: rng.range(10..=100),
    }
}

struct LinkWriter<'a> {
    store: &'a dyn WorldStore,
    world_id: WorldId,
    linked: BTreeSet<(LocationId, LocationId)>,
    ids: Vec<LinkId>,
}

impl<'a> LinkWriter<'a> {
    fn new(store: &'a dyn WorldStore, world_id: WorldId) -> Self {
        Self {
            store,
            world_id,
            linked: BTreeSet::new(),
            ids: Vec::new(),
        }
    }

    fn is_linked(&self, a: LocationId, b: LocationId) -> bool {
        self.linked.contains(&(a, b))
    }

    fn link(
        &mut self,
        a: LocationId,
        b: LocationId,
        route: Route,
        requires_hacking: bool,
        requires_special_access: bool,
        rng: &mut WorldRng,
    ) -> Result<(), WorldDbError> {
        for (source_id, destination_id) in [(a, b), (b, a)] {
            let link = LocationLink {
                id: LinkId(rng.next_uuid()),
                world_id: self.world_id,
                source_id,
                destination_id,
                travel_type: route.travel_type,
                travel_time_hours: route.hours,
                travel_cost: route.cost,
                requires_hacking,
                requires_special_access,
            };
            self.store.insert_link(&link)?;
            self.linked.insert((source_id, destination_id));
            self.ids.push(link.id);
        }
        Ok(())
    }
}

/// Random spanning tree over `nodes`, linking each newly reached node to an
/// already connected one.
fn spanning_pairs(nodes: &[LocationId], rng: &mut WorldRng) -> Vec<(LocationId, LocationId)> {
    if nodes.len() < 2 {
        return Vec::new();
    }
    let mut connected = vec![nodes[0]];
    let mut unconnected = nodes[1..].to_vec();
    let mut pairs = Vec::with_capacity(unconnected.len());
    while !unconnected.is_empty() {
        let Some(&source) = rng.choose(&connected) else {
            break;
        };
        let index = rng.range(0..unconnected.len());
        let dest = unconnected.remove(index);
        pairs.push((source, dest));
        connected.push(dest);
    }
    pairs
}

fn extra_pairs(
    nodes: &[LocationId],
    max_extra: usize,
    rng: &mut WorldRng,
) -> Vec<(LocationId, LocationId)> {
    if nodes.len() < 2 {
        return Vec::new();
    }
    let extra = (nodes.len() / 2).min(max_extra);
    (0..extra)
        .map(|_| {
            let pair = rng.sample(nodes, 2);
            (pair[0], pair[1])
        })
        .collect()
}

pub fn generate_connections(
    store: &dyn WorldStore,
    world_id: WorldId,
    location_ids: &[LocationId],
    rng: &mut WorldRng,
) -> Result<Vec<LinkId>, WorldDbError> {
    let mut locations: Vec<Location> = Vec::with_capacity(location_ids.len());
    for id in location_ids {
        match store.location(*id)? {
            Some(location) => locations.push(location),
            None => warn!(location_id = %id, "location not found, leaving it unlinked"),
        }
    }
    let find = |id: LocationId| locations.iter().find(|l| l.id == id);

    let mut writer = LinkWriter::new(store, world_id);

    for district in locations.iter().filter(|l| l.kind == LocationKind::District) {
        let Some(parent) = district.parent_id.and_then(|id| find(id)) else {
            continue;
        };
        let route = Route {
            travel_type: TravelType::LocalTransport,
            hours: 0.2,
            cost: rng.range(10..=100),
        };
        writer.link(district.id, parent.id, route, false, false, rng)?;
    }

    let cities: Vec<LocationId> = locations
        .iter()
        .filter(|l| l.kind == LocationKind::City)
        .map(|l| l.id)
        .collect();
    let mut city_pairs = spanning_pairs(&cities, rng);
    city_pairs.extend(extra_pairs(&cities, MAX_EXTRA_CITY_LINKS, rng));
    for (a, b) in city_pairs {
        if writer.is_linked(a, b) {
            continue;
        }
        let (Some(from), Some(to)) = (find(a), find(b)) else {
            continue;
        };
        let route = city_route(from.coordinates.distance_to(&to.coordinates), rng);
        writer.link(a, b, route, false, false, rng)?;
    }

    for city_id in &cities {
        let districts: Vec<LocationId> = locations
            .iter()
            .filter(|l| l.kind == LocationKind::District && l.parent_id == Some(*city_id))
            .map(|l| l.id)
            .collect();
        let mut pairs = spanning_pairs(&districts, rng);
        pairs.extend(extra_pairs(&districts, MAX_EXTRA_DISTRICT_LINKS, rng));
        for (a, b) in pairs {
            if writer.is_linked(a, b) {
                continue;
            }
            let route = metro_route(rng);
            writer.link(a, b, route, false, false, rng)?;
        }
    }

    if !cities.is_empty() {
        for place in locations
            .iter()
            .filter(|l| matches!(l.kind, LocationKind::Special | LocationKind::Virtual))
        {
            let Some(&city) = rng.choose(&cities) else {
                break;
            };
            if place.is_virtual {
                let route = Route {
                    travel_type: TravelType::Netlink,
                    hours: rng.range(0.0..0.1),
                    cost: rng.range(50..=500),
                };
                writer.link(place.id, city, route, true, false, rng)?;
            } else {
                let route = Route {
                    travel_type: TravelType::Shuttle,
                    hours: rng.range(1.0..6.0),
                    cost: rng.range(2_000..=20_000),
                };
                writer.link(place.id, city, route, false, true, rng)?;
            }
        }
    }

    debug!(links = writer.ids.len(), "generated connections");
    Ok(writer.ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ids(n: u128) -> Vec<LocationId> {
        (1..=n).map(|i| LocationId(Uuid::from_u128(i))).collect()
    }

    #[test]
    fn spanning_tree_reaches_every_node_once() {
        let mut rng = WorldRng::new(Some(21));
        let nodes = ids(7);
        let pairs = spanning_pairs(&nodes, &mut rng);
        assert_eq!(pairs.len(), nodes.len() - 1);
        let mut reached: BTreeSet<LocationId> = BTreeSet::from([nodes[0]]);
        for (from, to) in pairs {
            assert!(reached.contains(&from));
            assert!(reached.insert(to));
        }
        assert_eq!(reached.len(), nodes.len());
    }

    #[test]
    fn extra_pairs_never_self_link() {
        let mut rng = WorldRng::new(Some(2));
        let nodes = ids(10);
        let pairs = extra_pairs(&nodes, MAX_EXTRA_CITY_LINKS, &mut rng);
        assert_eq!(pairs.len(), 5);
        assert!(pairs.iter().all(|(a, b)| a != b));
    }

    #[test]
    fn long_distances_fly() {
        let mut rng = WorldRng::new(Some(1));
        assert_eq!(
            city_route(80.0, &mut rng).travel_type,
            TravelType::InternationalFlight
        );
        assert_eq!(city_route(20.0, &mut rng).travel_type, TravelType::RegionalFlight);
        let train = city_route(3.0, &mut rng);
        assert_eq!(train.travel_type, TravelType::HighSpeedTrain);
        assert!((500..=2_000).contains(&train.cost));
    }
}
