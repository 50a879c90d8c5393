//! Typed rows produced by the generators. Metadata blobs are plain serde
//! structs here and only become JSON text inside the store.

macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl rusqlite::types::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                let text = value.as_str()?;
                $name::parse(text).ok_or_else(|| {
                    rusqlite::types::FromSqlError::Other(
                        format!("unknown {} {}", stringify!($name), text).into(),
                    )
                })
            }
        }
    };
}

pub mod actor;
pub mod ids;
pub mod item;
pub mod location;
pub mod narrative;
pub mod puzzle;
pub mod shop;
pub mod structure;
pub mod world;

pub use actor::{
    Character, CharacterMetadata, CharacterRef, CombatProfile, EnemyType, Gender, Profession,
    Resistances, Skills,
};
pub use ids::{
    BuildingId, CharacterId, DeviceId, FileId, InventoryId, ItemId, LinkId, LocationId,
    MissionId, NetworkId, ObjectiveId, PuzzleId, RoomId, ShopId, StoryElementId, VulnerabilityId,
    WorldId,
};
pub use item::{
    ArmorCategory, ArmorItem, ArmorMetadata, ArmorResistances, ArmorSlot, Attribute, Capability,
    ConsumableEffects, ConsumableItem, ConsumableMetadata, ConsumableType, EffectProfile,
    HardwareItem, HardwareMetadata, HardwareQuality, HardwareStats, HardwareType, ImplantItem,
    ImplantMetadata, ImplantType, ItemKind, ItemListing, ItemPlacement, LicenseType, Rarity,
    SoftwareItem, SoftwareMetadata, SoftwareRequirements, SoftwareType, WeaponCategory,
    WeaponItem, WeaponMetadata,
};
pub use location::{
    Coordinates, DistrictArchetype, Location, LocationKind, LocationLink, LocationMetadata,
    TravelType,
};
pub use narrative::{
    FailureConsequence, Mission, MissionMetadata, MissionRef, MissionType, Objective,
    ObjectiveType, RevealCondition, StoryElement, StoryElementType,
};
pub use puzzle::{
    DeviceTarget, ExploitKind, HackTarget, HackingPuzzle, PuzzleMetadata, PuzzleType, Vulnerability,
    VulnerabilityExploit, VulnerabilityRarity, VulnerabilityType,
};
pub use shop::{InventoryEntry, Shop, ShopMetadata, ShopType};
pub use structure::{
    Building, BuildingMetadata, BuildingType, Device, DeviceType, File, FileMetadata, FileType,
    Network, NetworkMetadata, NetworkSecurity, NetworkType, Room,
};
pub use world::{World, WorldMetadata, WORLD_FORMAT_VERSION};

/// Security levels on locations, buildings and devices run from 1 to 5.
pub const MIN_SECURITY: u8 = 1;
pub const MAX_SECURITY: u8 = 5;

pub fn clamp_level(value: i32, min: u8, max: u8) -> u8 {
    value.clamp(min as i32, max as i32) as u8
}
