use tracing::{debug, warn};

use crate::generation::rng::WorldRng;
use crate::model::{
    Building, BuildingId, BuildingType, Network, NetworkId, NetworkMetadata, NetworkSecurity,
    NetworkType,
};
use crate::world::{WorldDbError, WorldStore};

const LOWER_DIGITS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ALNUM_SYMBOLS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

fn network_count(building_type: BuildingType, rng: &mut WorldRng) -> usize {
    match building_type {
        BuildingType::CorporateHq | BuildingType::DataCenter | BuildingType::ResearchLab => {
            rng.range(3..=6)
        }
        BuildingType::GovernmentBuilding
        | BuildingType::PoliceStation
        | BuildingType::MilitaryBase => rng.range(2..=4),
        BuildingType::ShoppingMall | BuildingType::Hotel | BuildingType::University => {
            rng.range(2..=5)
        }
        _ => rng.range(1..=3),
    }
}

fn network_type(building_type: BuildingType, rng: &mut WorldRng) -> NetworkType {
    let pool: &[NetworkType] = match building_type {
        BuildingType::CorporateHq | BuildingType::DataCenter => &[
            NetworkType::Corporate,
            NetworkType::Lan,
            NetworkType::Wan,
            NetworkType::Vpn,
            NetworkType::Secured,
        ],
        BuildingType::ShoppingMall | BuildingType::Hotel => {
            &[NetworkType::Wifi, NetworkType::Public, NetworkType::Iot]
        }
        BuildingType::ApartmentComplex => &[NetworkType::Wifi, NetworkType::Iot],
        _ => NetworkType::ALL,
    };
    *rng.pick(pool)
}

fn is_restricted_type(network_type: NetworkType) -> bool {
    matches!(
        network_type,
        NetworkType::Corporate | NetworkType::Secured | NetworkType::Vpn
    )
}

/// Protection label from the building's security and the network's role.
pub fn security_label(
    building_security: u8,
    network_type: NetworkType,
    rng: &mut WorldRng,
) -> NetworkSecurity {
    if building_security >= 4 || is_restricted_type(network_type) {
        *rng.pick(&[NetworkSecurity::Wpa3, NetworkSecurity::Enterprise])
    } else if building_security >= 3 || matches!(network_type, NetworkType::Lan | NetworkType::Wan)
    {
        *rng.pick(&[NetworkSecurity::Wpa2, NetworkSecurity::Wpa3])
    } else if building_security >= 2 {
        *rng.pick(&[NetworkSecurity::Wpa, NetworkSecurity::Wpa2])
    } else if network_type == NetworkType::Public {
        NetworkSecurity::Open
    } else {
        *rng.pick(NetworkSecurity::ALL)
    }
}

pub fn encryption_for(security: NetworkSecurity, rng: &mut WorldRng) -> &'static str {
    match security {
        NetworkSecurity::Open => "None",
        NetworkSecurity::Wep => *rng.pick(&["WEP-64", "WEP-128"]),
        NetworkSecurity::Wpa => *rng.pick(&["TKIP", "TKIP/AES"]),
        NetworkSecurity::Wpa2 => *rng.pick(&["AES-128", "AES-256", "TKIP/AES"]),
        NetworkSecurity::Wpa3 => "AES-256",
        NetworkSecurity::Enterprise => *rng.pick(&["AES-256", "AES-256-GCM"]),
    }
}

/// Open networks have no password.
pub fn password_for(security: NetworkSecurity, rng: &mut WorldRng) -> String {
    let (alphabet, len) = match security {
        NetworkSecurity::Open => return String::new(),
        NetworkSecurity::Wep | NetworkSecurity::Wpa => (LOWER_DIGITS, 8),
        NetworkSecurity::Wpa2 => (ALNUM, 12),
        NetworkSecurity::Wpa3 | NetworkSecurity::Enterprise => (ALNUM_SYMBOLS, 16),
    };
    (0..len).map(|_| *rng.pick(alphabet) as char).collect()
}

fn ssid(building: &Building, network_type: NetworkType, rng: &mut WorldRng) -> String {
    let short: String = building.name.chars().take(10).collect();
    let name = match network_type {
        NetworkType::Wifi => match building.building_type {
            BuildingType::CorporateHq => format!("{}_WIFI", short),
            BuildingType::Hotel => format!("Guest_WiFi_{}", rng.range(100..=999u32)),
            _ => format!("Network_{}", rng.range(1000..=9999u32)),
        },
        NetworkType::Corporate | NetworkType::Secured => {
            format!("{}_{}", short, network_type.as_str().to_uppercase())
        }
        other => return format!("{}_{}", other, rng.range(1000..=9999u32)),
    };
    name.replace(' ', "_").to_uppercase()
}

pub fn build_network(building: &Building, rng: &mut WorldRng) -> Network {
    let network_type = network_type(building.building_type, rng);
    let name = ssid(building, network_type, rng);
    let security = security_label(building.security_level, network_type, rng);
    let encryption = encryption_for(security, rng).to_string();
    let password = password_for(security, rng);
    let is_hidden = (is_restricted_type(network_type) || security >= NetworkSecurity::Wpa3)
        && rng.chance(0.4);
    let is_honeypot = building.security_level >= 4 && rng.chance(0.1);

    Network {
        id: NetworkId(rng.next_uuid()),
        world_id: building.world_id,
        building_id: building.id,
        name,
        network_type,
        security,
        encryption,
        password,
        is_hidden,
        requires_hacking: security != NetworkSecurity::Open,
        metadata: NetworkMetadata {
            signal_strength: rng.range(1..=5),
            connected_devices: rng.range(0..=20),
            bandwidth_mbps: rng.range(10..=1000),
            is_honeypot,
        },
    }
}

pub fn generate_networks(
    store: &dyn WorldStore,
    building_ids: &[BuildingId],
    rng: &mut WorldRng,
) -> Result<Vec<NetworkId>, WorldDbError> {
    let mut ids = Vec::new();
    for building_id in building_ids {
        let Some(building) = store.building(*building_id)? else {
            warn!(building_id = %building_id, "building not found, skipping its networks");
            continue;
        };
        for _ in 0..network_count(building.building_type, rng) {
            let network = build_network(&building, rng);
            store.insert_network(&network)?;
            debug!(
                ssid = %network.name,
                security = %network.security,
                building = %building.name,
                "generated network"
            );
            ids.push(network.id);
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildingMetadata, LocationId, WorldId};
    use uuid::Uuid;

    fn building(building_type: BuildingType, security_level: u8) -> Building {
        Building {
            id: BuildingId(Uuid::from_u128(5)),
            world_id: WorldId(Uuid::from_u128(1)),
            location_id: LocationId(Uuid::from_u128(2)),
            name: "Corp Row Hotel".to_string(),
            description: String::new(),
            building_type,
            floors: 12,
            security_level,
            metadata: BuildingMetadata::default(),
        }
    }

    #[test]
    fn hardened_buildings_get_strong_labels() {
        let mut rng = WorldRng::new(Some(6));
        for _ in 0..50 {
            let network = build_network(&building(BuildingType::DataCenter, 5), &mut rng);
            assert!(network.security >= NetworkSecurity::Wpa3);
            assert_eq!(network.password.len(), 16);
            assert!(network.requires_hacking);
        }
    }

    #[test]
    fn open_networks_need_no_password_or_hack() {
        let mut rng = WorldRng::new(Some(3));
        assert_eq!(
            security_label(1, NetworkType::Public, &mut rng),
            NetworkSecurity::Open
        );
        assert!(password_for(NetworkSecurity::Open, &mut rng).is_empty());
        assert_eq!(encryption_for(NetworkSecurity::Open, &mut rng), "None");
    }

    #[test]
    fn hotel_wifi_uses_guest_ssid() {
        let mut rng = WorldRng::new(Some(11));
        let hotel = building(BuildingType::Hotel, 1);
        let name = ssid(&hotel, NetworkType::Wifi, &mut rng);
        assert!(name.starts_with("GUEST_WIFI_"));
        let corporate = ssid(&hotel, NetworkType::Corporate, &mut rng);
        assert_eq!(corporate, "CORP_ROW_H_CORPORATE");
    }
}
