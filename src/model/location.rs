use serde::{Deserialize, Serialize};

use crate::model::ids::{LinkId, LocationId, WorldId};

labeled_enum! {
    pub enum LocationKind {
        City => "city",
        District => "district",
        Special => "special",
        Virtual => "virtual",
    }
}

labeled_enum! {
    pub enum DistrictArchetype {
        Financial => "Financial",
        Industrial => "Industrial",
        Residential => "Residential",
        Entertainment => "Entertainment",
        Commercial => "Commercial",
        Research => "Research",
        Military => "Military",
        Slums => "Slums",
        Underground => "Underground",
        Port => "Port",
        Corporate => "Corporate",
    }
}

impl DistrictArchetype {
    pub fn base_services(self) -> &'static [&'static str] {
        match self {
            DistrictArchetype::Financial => &["finance", "commerce"],
            DistrictArchetype::Corporate => &["commerce", "information"],
            DistrictArchetype::Military => &["security"],
            DistrictArchetype::Research => &["research", "medical"],
            DistrictArchetype::Commercial => &["commerce", "entertainment"],
            DistrictArchetype::Entertainment => &["entertainment", "commerce"],
            DistrictArchetype::Residential => &["housing", "commerce"],
            DistrictArchetype::Industrial => &["production", "transport"],
            DistrictArchetype::Port => &["transport", "commerce"],
            DistrictArchetype::Underground => &["black market", "hacking"],
            DistrictArchetype::Slums => &["black market"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const ORIGIN: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    /// Planar distance in degrees.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: LocationId,
    pub world_id: WorldId,
    pub name: String,
    pub description: String,
    pub kind: LocationKind,
    pub parent_id: Option<LocationId>,
    pub coordinates: Coordinates,
    pub security_level: u8,
    pub population: u64,
    pub services: Vec<String>,
    pub tags: Vec<String>,
    pub is_virtual: bool,
    pub is_special: bool,
    pub is_dangerous: bool,
    pub metadata: LocationMetadata,
}

labeled_enum! {
    pub enum TravelType {
        LocalTransport => "Local transport",
        Metro => "Metro",
        HighSpeedTrain => "High-speed train",
        RegionalFlight => "Regional flight",
        InternationalFlight => "International flight",
        Netlink => "Netlink",
        Shuttle => "Shuttle",
    }
}

/// One directed edge; links are always written as a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationLink {
    pub id: LinkId,
    pub world_id: WorldId,
    pub source_id: LocationId,
    pub destination_id: LocationId,
    pub travel_type: TravelType,
    pub travel_time_hours: f64,
    pub travel_cost: u32,
    pub requires_hacking: bool,
    pub requires_special_access: bool,
}
