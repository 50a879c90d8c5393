use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::{BuildingId, CharacterId, DeviceId, ItemId, WorldId};

labeled_enum! {
    pub enum Rarity {
        Common => "COMMON",
        Uncommon => "UNCOMMON",
        Rare => "RARE",
        Epic => "EPIC",
        Legendary => "LEGENDARY",
    }
}

impl Rarity {
    /// Draw weights, commons most likely.
    pub const WEIGHTS: [(Rarity, u32); 5] = [
        (Rarity::Common, 40),
        (Rarity::Uncommon, 30),
        (Rarity::Rare, 20),
        (Rarity::Epic, 8),
        (Rarity::Legendary, 2),
    ];

    pub fn stat_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.3,
            Rarity::Rare => 1.8,
            Rarity::Epic => 2.5,
            Rarity::Legendary => 4.0,
        }
    }

    pub fn price_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.5,
            Rarity::Rare => 3.0,
            Rarity::Epic => 6.0,
            Rarity::Legendary => 10.0,
        }
    }

    pub fn is_rare_or_better(self) -> bool {
        self >= Rarity::Rare
    }
}

labeled_enum! {
    pub enum ItemKind {
        Hardware => "hardware",
        Consumable => "consumable",
        Armor => "armor",
        Software => "software",
        Weapon => "weapon",
        Implant => "implant",
    }
}

/// Where an item sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPlacement {
    Device(DeviceId),
    Building(BuildingId),
    Character(CharacterId),
    /// Shop stock. Shops are generated after items, so the row records the
    /// building the stock is parked in, stored as `location_type = 'shop'`
    /// with the building id as `location_id`.
    Shop { building_id: BuildingId },
    World,
}

impl ItemPlacement {
    pub const WORLD_ID: &'static str = "world";

    pub fn location_type(&self) -> &'static str {
        match self {
            ItemPlacement::Device(_) => "device",
            ItemPlacement::Building(_) => "building",
            ItemPlacement::Character(_) => "character",
            ItemPlacement::Shop { .. } => "shop",
            ItemPlacement::World => "world",
        }
    }

    pub fn location_id(&self) -> String {
        match self {
            ItemPlacement::Device(id) => id.to_string(),
            ItemPlacement::Building(id) | ItemPlacement::Shop { building_id: id } => id.to_string(),
            ItemPlacement::Character(id) => id.to_string(),
            ItemPlacement::World => Self::WORLD_ID.to_string(),
        }
    }
}

/// Price and rarity of any item variant, read back for shop stocking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemListing {
    pub kind: ItemKind,
    pub id: ItemId,
    pub price: u32,
    pub rarity: Rarity,
}

labeled_enum! {
    pub enum HardwareType {
        Cpu => "CPU",
        Ram => "RAM",
        Gpu => "GPU",
        Motherboard => "Motherboard",
        Hdd => "HDD",
        Ssd => "SSD",
        NetworkCard => "Network Card",
        CoolingSystem => "Cooling System",
        PowerSupply => "Power Supply",
        UsbDrive => "USB Drive",
        ExternalHdd => "External HDD",
        Router => "Router",
        BluetoothAdapter => "Bluetooth Adapter",
        WifiAntenna => "WiFi Antenna",
        RaspberryPi => "Raspberry Pi",
    }
}

labeled_enum! {
    pub enum HardwareQuality {
        Broken => "Broken",
        Poor => "Poor",
        Standard => "Standard",
        HighEnd => "High-End",
        MilitaryGrade => "Military-Grade",
        Prototype => "Prototype",
        Custom => "Custom",
    }
}

impl HardwareQuality {
    pub fn tier(self) -> u32 {
        match self {
            HardwareQuality::Broken => 0,
            HardwareQuality::Poor => 1,
            HardwareQuality::Standard => 2,
            HardwareQuality::HighEnd => 3,
            HardwareQuality::MilitaryGrade => 4,
            HardwareQuality::Prototype | HardwareQuality::Custom => 5,
        }
    }
}

/// Stat block per hardware family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum HardwareStats {
    Processor {
        processing_power: u32,
        cores: u32,
        clock_ghz: f64,
    },
    Memory {
        capacity_gb: u32,
        speed_mhz: u32,
        latency: u32,
    },
    Graphics {
        processing_power: u32,
        vram_gb: u32,
        clock_mhz: u32,
    },
    Board {
        ram_slots: u32,
        expansion_slots: u32,
    },
    Storage {
        capacity_gb: u32,
        read_mbps: u32,
        write_mbps: u32,
    },
    Networking {
        bandwidth_mbps: u32,
        range_m: u32,
    },
    Cooling {
        cooling_capacity: u32,
        noise_db: u32,
    },
    Power {
        wattage: u32,
        efficiency_pct: u32,
    },
}

impl HardwareStats {
    /// The headline number of the block.
    pub fn primary(&self) -> u32 {
        match self {
            HardwareStats::Processor {
                processing_power, ..
            }
            | HardwareStats::Graphics {
                processing_power, ..
            } => *processing_power,
            HardwareStats::Memory { capacity_gb, .. }
            | HardwareStats::Storage { capacity_gb, .. } => *capacity_gb,
            HardwareStats::Board { ram_slots, .. } => *ram_slots,
            HardwareStats::Networking { bandwidth_mbps, .. } => *bandwidth_mbps,
            HardwareStats::Cooling {
                cooling_capacity, ..
            } => *cooling_capacity,
            HardwareStats::Power { wattage, .. } => *wattage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareMetadata {
    pub manufacturer: String,
    pub model: String,
    pub year: u16,
    pub weight_kg: f64,
    pub power_watts: u32,
    #[serde(default)]
    pub special_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HardwareItem {
    pub id: ItemId,
    pub world_id: WorldId,
    pub name: String,
    pub description: String,
    pub hardware_type: HardwareType,
    pub quality: HardwareQuality,
    pub rarity: Rarity,
    pub level: u8,
    pub price: u32,
    pub placement: ItemPlacement,
    pub is_installed: bool,
    pub stats: HardwareStats,
    pub metadata: HardwareMetadata,
}

labeled_enum! {
    pub enum ConsumableType {
        DataChip => "Data Chip",
        NeuralBooster => "Neural Booster",
        CodeFragment => "Code Fragment",
        CryptoKey => "Crypto Key",
        AccessCard => "Access Card",
        SecurityToken => "Security Token",
        FirewallBypass => "Firewall Bypass",
        SignalJammer => "Signal Jammer",
        DecryptionTool => "Decryption Tool",
        MemoryCleaner => "Memory Cleaner",
        BatteryPack => "Battery Pack",
        Food => "Food",
    }
}

/// Effect schema per consumable type. Durations in minutes unless noted,
/// chances in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectProfile {
    DataChip {
        knowledge_boost: i64,
        skill_xp: i64,
        target_skill: String,
    },
    NeuralBooster {
        mental_boost: i64,
        focus_duration: i64,
        cooldown: i64,
    },
    CodeFragment {
        unlock_level: i64,
        code_quality: i64,
        bypass_chance: i64,
    },
    CryptoKey {
        encryption_level: i64,
        /// Seconds.
        unlock_time: i64,
        detection_reduction: i64,
    },
    AccessCard {
        access_level: i64,
        building_types: Vec<String>,
        duration: i64,
    },
    SecurityToken {
        security_level: i64,
        valid_duration: i64,
        traceback_protection: i64,
    },
    FirewallBypass {
        bypass_strength: i64,
        firewall_levels: i64,
        stealth_bonus: i64,
    },
    SignalJammer {
        /// Metres.
        jamming_radius: i64,
        /// Seconds.
        duration: i64,
        effectiveness: i64,
    },
    DecryptionTool {
        decryption_power: i64,
        compatible_encryptions: i64,
        time_reduction: i64,
    },
    MemoryCleaner {
        trace_removal: i64,
        system_optimization: i64,
        cooldown_reduction: i64,
    },
    BatteryPack {
        energy_boost: i64,
        duration: i64,
        device_types: i64,
    },
    General {
        general_boost: i64,
        duration: i64,
    },
}

impl EffectProfile {
    pub fn duration_mut(&mut self) -> Option<&mut i64> {
        match self {
            EffectProfile::AccessCard { duration, .. }
            | EffectProfile::SignalJammer { duration, .. }
            | EffectProfile::BatteryPack { duration, .. }
            | EffectProfile::General { duration, .. } => Some(duration),
            _ => None,
        }
    }

    pub fn numeric_fields_mut(&mut self) -> Vec<&mut i64> {
        match self {
            EffectProfile::DataChip {
                knowledge_boost,
                skill_xp,
                ..
            } => vec![knowledge_boost, skill_xp],
            EffectProfile::NeuralBooster {
                mental_boost,
                focus_duration,
                cooldown,
            } => vec![mental_boost, focus_duration, cooldown],
            EffectProfile::CodeFragment {
                unlock_level,
                code_quality,
                bypass_chance,
            } => vec![unlock_level, code_quality, bypass_chance],
            EffectProfile::CryptoKey {
                encryption_level,
                unlock_time,
                detection_reduction,
            } => vec![encryption_level, unlock_time, detection_reduction],
            EffectProfile::AccessCard {
                access_level,
                duration,
                ..
            } => vec![access_level, duration],
            EffectProfile::SecurityToken {
                security_level,
                valid_duration,
                traceback_protection,
            } => vec![security_level, valid_duration, traceback_protection],
            EffectProfile::FirewallBypass {
                bypass_strength,
                firewall_levels,
                stealth_bonus,
            } => vec![bypass_strength, firewall_levels, stealth_bonus],
            EffectProfile::SignalJammer {
                jamming_radius,
                duration,
                effectiveness,
            } => vec![jamming_radius, duration, effectiveness],
            EffectProfile::DecryptionTool {
                decryption_power,
                compatible_encryptions,
                time_reduction,
            } => vec![decryption_power, compatible_encryptions, time_reduction],
            EffectProfile::MemoryCleaner {
                trace_removal,
                system_optimization,
                cooldown_reduction,
            } => vec![trace_removal, system_optimization, cooldown_reduction],
            EffectProfile::BatteryPack {
                energy_boost,
                duration,
                device_types,
            } => vec![energy_boost, duration, device_types],
            EffectProfile::General {
                general_boost,
                duration,
            } => vec![general_boost, duration],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableEffects {
    pub profile: EffectProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_effect: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumableMetadata {
    #[serde(default)]
    pub side_effects: Vec<String>,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumableItem {
    pub id: ItemId,
    pub world_id: WorldId,
    pub name: String,
    pub description: String,
    pub consumable_type: ConsumableType,
    pub rarity: Rarity,
    pub uses: u8,
    pub price: u32,
    pub placement: ItemPlacement,
    pub effects: ConsumableEffects,
    pub metadata: ConsumableMetadata,
}

labeled_enum! {
    pub enum ArmorCategory {
        Light => "LIGHT",
        Medium => "MEDIUM",
        Heavy => "HEAVY",
        Special => "SPECIAL",
    }
}

labeled_enum! {
    pub enum ArmorSlot {
        Head => "HEAD",
        Chest => "CHEST",
        Arms => "ARMS",
        Legs => "LEGS",
        Feet => "FEET",
        FullBody => "FULL_BODY",
    }
}

/// Percentages, 0 to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorResistances {
    pub physical: u8,
    pub energy: u8,
    pub emp: u8,
    pub thermal: u8,
    pub biohazard: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorMetadata {
    pub model: String,
    pub durability: u32,
    pub mobility_penalty: u32,
    #[serde(default)]
    pub special_effects: Vec<String>,
    pub is_legal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArmorItem {
    pub id: ItemId,
    pub world_id: WorldId,
    pub name: String,
    pub description: String,
    pub category: ArmorCategory,
    pub armor_type: String,
    pub slot: ArmorSlot,
    pub manufacturer: String,
    pub rarity: Rarity,
    pub level: u8,
    pub defense: u32,
    pub weight_kg: f64,
    pub price: u32,
    pub placement: ItemPlacement,
    pub resistances: ArmorResistances,
    pub metadata: ArmorMetadata,
}

labeled_enum! {
    pub enum SoftwareType {
        OperatingSystem => "Operating System",
        Antivirus => "Antivirus",
        Firewall => "Firewall",
        Encryption => "Encryption",
        Decoder => "Decoder",
        Database => "Database",
        OfficeSuite => "Office Suite",
        Game => "Game",
        DevTool => "Development Tool",
        SystemUtility => "System Utility",
        Browser => "Browser",
        NetworkAnalyzer => "Network Analyzer",
        VulnerabilityScanner => "Vulnerability Scanner",
        HackingTool => "Hacking Tool",
    }
}

labeled_enum! {
    pub enum LicenseType {
        Free => "free",
        Trial => "trial",
        OpenSource => "open_source",
        Commercial => "commercial",
        Cracked => "cracked",
    }
}

impl LicenseType {
    pub fn is_paid(self) -> bool {
        matches!(self, LicenseType::Trial | LicenseType::Commercial)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    #[serde(rename = "type")]
    pub kind: String,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareRequirements {
    pub cpu_cores: u8,
    pub ram_gb: u8,
    pub storage_gb: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftwareMetadata {
    pub capabilities: Vec<Capability>,
    pub requirements: SoftwareRequirements,
    pub compatibility: Vec<String>,
    pub install_seconds: u32,
    pub has_updates: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareItem {
    pub id: ItemId,
    pub world_id: WorldId,
    pub name: String,
    pub description: String,
    pub software_type: SoftwareType,
    pub developer: String,
    pub version: String,
    pub license: LicenseType,
    pub rarity: Rarity,
    pub level: u8,
    pub price: u32,
    pub is_malware: bool,
    pub placement: ItemPlacement,
    pub metadata: SoftwareMetadata,
}

labeled_enum! {
    pub enum WeaponCategory {
        Melee => "MELEE",
        Ranged => "RANGED",
        Energy => "ENERGY",
        Smart => "SMART",
        Exotic => "EXOTIC",
    }
}

impl WeaponCategory {
    /// Ranged, energy and smart weapons carry a magazine.
    pub fn uses_ammo(self) -> bool {
        matches!(
            self,
            WeaponCategory::Ranged | WeaponCategory::Energy | WeaponCategory::Smart
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponMetadata {
    pub damage_type: String,
    pub fire_rate: u8,
    pub reload_seconds: u8,
    pub ammo_capacity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammo_type: Option<String>,
    pub weight_kg: f64,
    pub durability: u32,
    #[serde(default)]
    pub special_effects: Vec<String>,
    #[serde(default)]
    pub combat_bonus: BTreeMap<String, u32>,
    pub model: String,
    pub is_two_handed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponItem {
    pub id: ItemId,
    pub world_id: WorldId,
    pub name: String,
    pub description: String,
    pub category: WeaponCategory,
    pub weapon_type: String,
    pub manufacturer: String,
    pub damage: u32,
    /// Percent, capped at 100.
    pub accuracy: u8,
    pub range_m: u32,
    pub rarity: Rarity,
    pub level: u8,
    pub price: u32,
    pub is_legal: bool,
    pub placement: ItemPlacement,
    pub metadata: WeaponMetadata,
}

labeled_enum! {
    pub enum ImplantType {
        Neural => "NEURAL",
        Optical => "OPTICAL",
        Skeletal => "SKELETAL",
        Dermal => "DERMAL",
        Circulatory => "CIRCULATORY",
    }
}

labeled_enum! {
    pub enum Attribute {
        Strength => "STRENGTH",
        Agility => "AGILITY",
        Intelligence => "INTELLIGENCE",
        Perception => "PERCEPTION",
        Charisma => "CHARISMA",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImplantMetadata {
    pub version: String,
    pub body_location: String,
    pub compatibility: Vec<String>,
    pub power_consumption: u8,
    #[serde(default)]
    pub combat_bonus: BTreeMap<String, u32>,
    #[serde(default)]
    pub side_effects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImplantItem {
    pub id: ItemId,
    pub world_id: WorldId,
    pub name: String,
    pub description: String,
    pub implant_type: ImplantType,
    pub manufacturer: String,
    pub rarity: Rarity,
    pub level: u8,
    pub price: u32,
    pub humanity_cost: u32,
    /// 1 to 10.
    pub surgery_difficulty: u8,
    pub stats_bonus: BTreeMap<Attribute, u8>,
    pub special_effects: Vec<String>,
    pub is_legal: bool,
    pub placement: ItemPlacement,
    pub metadata: ImplantMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_tiers_are_ordered() {
        for pair in Rarity::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].stat_multiplier() < pair[1].stat_multiplier());
            assert!(pair[0].price_multiplier() < pair[1].price_multiplier());
        }
    }

    #[test]
    fn effect_profile_serializes_with_tag() {
        let effects = ConsumableEffects {
            profile: EffectProfile::CryptoKey {
                encryption_level: 4,
                unlock_time: 20,
                detection_reduction: 40,
            },
            special_effect: None,
        };
        let json = serde_json::to_value(&effects).unwrap();
        assert_eq!(json["profile"]["effect"], "crypto_key");
        assert_eq!(json["profile"]["unlock_time"], 20);
        assert!(json.get("special_effect").is_none());
    }

    #[test]
    fn shop_placement_stores_the_hosting_building() {
        let building_id = BuildingId(uuid::Uuid::from_u128(77));
        let placement = ItemPlacement::Shop { building_id };
        assert_eq!(placement.location_type(), "shop");
        assert_eq!(placement.location_id(), building_id.to_string());
        assert_eq!(
            placement.location_id(),
            ItemPlacement::Building(building_id).location_id()
        );
    }

    #[test]
    fn world_placement_uses_sentinel_id() {
        assert_eq!(ItemPlacement::World.location_type(), "world");
        assert_eq!(ItemPlacement::World.location_id(), "world");
    }
}
