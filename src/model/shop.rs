use serde::{Deserialize, Serialize};

use crate::model::ids::{BuildingId, InventoryId, ItemId, LocationId, ShopId, WorldId};
use crate::model::item::ItemKind;

labeled_enum! {
    pub enum ShopType {
        Hardware => "hardware",
        Software => "software",
        BlackMarket => "black_market",
        Consumables => "consumables",
        Armor => "armor",
        General => "general",
        Electronics => "electronics",
        DigitalServices => "digital_services",
        Datachips => "datachips",
        Cybernetics => "cybernetics",
        Weapons => "weapons",
    }
}

impl ShopType {
    /// Item pools a shop of this type stocks from.
    pub fn stocks(self) -> &'static [ItemKind] {
        match self {
            ShopType::Hardware | ShopType::Electronics => &[ItemKind::Hardware],
            ShopType::Cybernetics => &[ItemKind::Implant, ItemKind::Hardware],
            ShopType::Software | ShopType::DigitalServices => &[ItemKind::Software],
            ShopType::Consumables | ShopType::Datachips => &[ItemKind::Consumable],
            ShopType::Armor => &[ItemKind::Armor],
            ShopType::Weapons => &[ItemKind::Weapon],
            ShopType::General => &[
                ItemKind::Hardware,
                ItemKind::Consumable,
                ItemKind::Armor,
                ItemKind::Software,
                ItemKind::Weapon,
            ],
            ShopType::BlackMarket => ItemKind::ALL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopMetadata {
    pub founding_date: String,
    pub popularity: u8,
    pub cleanliness: u8,
    pub security_level: u8,
    pub specialization: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shop {
    pub id: ShopId,
    pub world_id: WorldId,
    pub location_id: LocationId,
    pub building_id: Option<BuildingId>,
    pub name: String,
    pub description: String,
    pub shop_type: ShopType,
    pub reputation: u8,
    pub price_modifier: f64,
    pub is_legal: bool,
    pub metadata: ShopMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryEntry {
    pub id: InventoryId,
    pub world_id: WorldId,
    pub shop_id: ShopId,
    pub item_kind: ItemKind,
    pub item_id: ItemId,
    pub quantity: u32,
    pub price: u32,
    pub price_modifier: f64,
    pub is_featured: bool,
    pub is_limited_time: bool,
    pub expiry_days: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_item_kind_has_a_specialist_or_the_black_market() {
        assert_eq!(ShopType::BlackMarket.stocks(), ItemKind::ALL);
        for kind in ItemKind::ALL {
            let sellers = ShopType::ALL
                .iter()
                .filter(|shop_type| shop_type.stocks().contains(kind))
                .count();
            assert!(sellers >= 2, "{} is sold by {} shop types", kind, sellers);
        }
        assert_eq!(ShopType::Weapons.stocks(), &[ItemKind::Weapon]);
        assert!(ShopType::Cybernetics.stocks().contains(&ItemKind::Implant));
    }
}
