use serde::{Deserialize, Serialize};

use crate::model::ids::{
    BuildingId, CharacterId, DeviceId, FileId, LocationId, NetworkId, RoomId, WorldId,
};

labeled_enum! {
    pub enum BuildingType {
        CorporateHq => "Corporate HQ",
        ApartmentComplex => "Apartment Complex",
        ShoppingMall => "Shopping Mall",
        ResearchLab => "Research Lab",
        DataCenter => "Data Center",
        Hospital => "Hospital",
        PoliceStation => "Police Station",
        Nightclub => "Nightclub",
        Restaurant => "Restaurant",
        Hotel => "Hotel",
        Factory => "Factory",
        Warehouse => "Warehouse",
        GovernmentBuilding => "Government Building",
        School => "School",
        University => "University",
        MilitaryBase => "Military Base",
    }
}

impl BuildingType {
    pub fn is_tower(self) -> bool {
        matches!(
            self,
            BuildingType::CorporateHq | BuildingType::ApartmentComplex | BuildingType::Hotel
        )
    }

    pub fn is_hardened(self) -> bool {
        matches!(
            self,
            BuildingType::CorporateHq
                | BuildingType::GovernmentBuilding
                | BuildingType::PoliceStation
                | BuildingType::MilitaryBase
        )
    }

    pub fn is_public_venue(self) -> bool {
        matches!(
            self,
            BuildingType::Nightclub | BuildingType::ShoppingMall | BuildingType::Restaurant
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub id: BuildingId,
    pub world_id: WorldId,
    pub location_id: LocationId,
    pub name: String,
    pub description: String,
    pub building_type: BuildingType,
    pub floors: u32,
    pub security_level: u8,
    pub metadata: BuildingMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub world_id: WorldId,
    pub building_id: BuildingId,
    pub name: String,
    pub floor: u32,
    pub room_type: String,
    pub is_locked: bool,
    pub is_restricted: bool,
    pub security_level: u8,
    pub size_sqm: u32,
}

labeled_enum! {
    pub enum DeviceType {
        DesktopPc => "Desktop PC",
        Laptop => "Laptop",
        Smartphone => "Smartphone",
        Tablet => "Tablet",
        Server => "Server",
        SecuritySystem => "Security System",
        SmartDevice => "Smart Device",
        Terminal => "Terminal",
        Atm => "ATM",
        Router => "Router",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: DeviceId,
    pub world_id: WorldId,
    pub location_id: LocationId,
    pub building_id: Option<BuildingId>,
    pub room_id: Option<RoomId>,
    pub owner_id: Option<CharacterId>,
    pub name: String,
    pub description: String,
    pub device_type: DeviceType,
    pub os_type: String,
    pub security_level: u8,
    pub ip_address: String,
    pub is_connected: bool,
}

labeled_enum! {
    pub enum NetworkType {
        Wifi => "WiFi",
        Lan => "LAN",
        Wan => "WAN",
        Vpn => "VPN",
        Iot => "IoT",
        Corporate => "Corporate",
        Secured => "Secured",
        Public => "Public",
    }
}

labeled_enum! {
    /// Ordered weakest to strongest.
    pub enum NetworkSecurity {
        Open => "Open",
        Wep => "WEP",
        Wpa => "WPA",
        Wpa2 => "WPA2",
        Wpa3 => "WPA3",
        Enterprise => "Enterprise",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetadata {
    pub signal_strength: u8,
    pub connected_devices: u32,
    pub bandwidth_mbps: u32,
    #[serde(default)]
    pub is_honeypot: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub id: NetworkId,
    pub world_id: WorldId,
    pub building_id: BuildingId,
    pub name: String,
    pub network_type: NetworkType,
    pub security: NetworkSecurity,
    pub encryption: String,
    pub password: String,
    pub is_hidden: bool,
    pub requires_hacking: bool,
    pub metadata: NetworkMetadata,
}

labeled_enum! {
    pub enum FileType {
        Text => "text",
        Document => "document",
        Spreadsheet => "spreadsheet",
        Image => "image",
        Audio => "audio",
        Video => "video",
        Executable => "executable",
        Archive => "archive",
        Database => "database",
        Script => "script",
        Log => "log",
        Config => "config",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub permissions: String,
    pub is_hidden: bool,
    pub is_system: bool,
    pub is_readonly: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub id: FileId,
    pub world_id: WorldId,
    pub device_id: DeviceId,
    pub name: String,
    pub file_type: FileType,
    pub size_kb: u32,
    pub security_level: u8,
    pub is_encrypted: bool,
    pub encryption_type: Option<String>,
    pub content: String,
    pub metadata: FileMetadata,
}
