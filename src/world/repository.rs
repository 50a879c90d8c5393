use crate::model::{
    ArmorItem, Building, BuildingId, Character, CharacterId, CharacterRef, ConsumableItem, Device,
    DeviceId, DeviceTarget, File, HackingPuzzle, HardwareItem, ImplantItem, InventoryEntry, ItemId,
    ItemKind, ItemListing, Location, LocationId, LocationLink, Mission, MissionId, MissionRef,
    Network, NetworkId, Objective, Room, Shop, ShopId, SoftwareItem, StoryElement, Vulnerability,
    WeaponItem, World, WorldId,
};
use crate::world::sqlite::WorldDbError;

/// Row-level gateway the generators write through. Reads return `None` for
/// ids that do not resolve so callers can skip the unit of work.
pub trait WorldStore {
    fn insert_world(&self, world: &World) -> Result<(), WorldDbError>;
    fn insert_location(&self, location: &Location) -> Result<(), WorldDbError>;
    fn insert_link(&self, link: &LocationLink) -> Result<(), WorldDbError>;
    fn insert_building(&self, building: &Building) -> Result<(), WorldDbError>;
    fn insert_room(&self, room: &Room) -> Result<(), WorldDbError>;
    fn insert_character(&self, character: &Character) -> Result<(), WorldDbError>;
    fn insert_device(&self, device: &Device) -> Result<(), WorldDbError>;
    fn insert_network(&self, network: &Network) -> Result<(), WorldDbError>;
    fn insert_file(&self, file: &File) -> Result<(), WorldDbError>;
    fn insert_puzzle(&self, puzzle: &HackingPuzzle) -> Result<(), WorldDbError>;
    fn insert_vulnerability(&self, vulnerability: &Vulnerability) -> Result<(), WorldDbError>;
    fn insert_mission(&self, mission: &Mission) -> Result<(), WorldDbError>;
    fn insert_objective(&self, objective: &Objective) -> Result<(), WorldDbError>;
    fn insert_story_element(&self, element: &StoryElement) -> Result<(), WorldDbError>;
    fn insert_hardware(&self, item: &HardwareItem) -> Result<(), WorldDbError>;
    fn insert_consumable(&self, item: &ConsumableItem) -> Result<(), WorldDbError>;
    fn insert_armor(&self, item: &ArmorItem) -> Result<(), WorldDbError>;
    fn insert_software(&self, item: &SoftwareItem) -> Result<(), WorldDbError>;
    fn insert_weapon(&self, item: &WeaponItem) -> Result<(), WorldDbError>;
    fn insert_implant(&self, item: &ImplantItem) -> Result<(), WorldDbError>;
    fn insert_shop(&self, shop: &Shop) -> Result<(), WorldDbError>;
    fn insert_inventory_entry(&self, entry: &InventoryEntry) -> Result<(), WorldDbError>;

    fn world(&self, id: WorldId) -> Result<Option<World>, WorldDbError>;
    fn location(&self, id: LocationId) -> Result<Option<Location>, WorldDbError>;
    fn building(&self, id: BuildingId) -> Result<Option<Building>, WorldDbError>;
    fn rooms_for_building(&self, id: BuildingId) -> Result<Vec<Room>, WorldDbError>;
    fn device(&self, id: DeviceId) -> Result<Option<Device>, WorldDbError>;
    /// Lenient read of a device for puzzle placement.
    fn device_target(&self, id: DeviceId) -> Result<Option<DeviceTarget>, WorldDbError>;
    fn network(&self, id: NetworkId) -> Result<Option<Network>, WorldDbError>;
    fn character(&self, id: CharacterId) -> Result<Option<CharacterRef>, WorldDbError>;
    fn mission(&self, id: MissionId) -> Result<Option<MissionRef>, WorldDbError>;
    fn shop(&self, id: ShopId) -> Result<Option<Shop>, WorldDbError>;
    fn item_listing(&self, kind: ItemKind, id: ItemId)
        -> Result<Option<ItemListing>, WorldDbError>;
}
