//! Shops and their stock. Shops never create items of their own; they list
//! rows the item generators already wrote.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::generation::rng::WorldRng;
use crate::model::{
    BuildingId, InventoryEntry, InventoryId, ItemId, ItemKind, ItemListing, LocationId, Shop,
    ShopId, ShopMetadata, ShopType, WorldId,
};
use crate::world::{WorldDbError, WorldStore};

const NAME_PREFIXES: &[&str] = &[
    "Neo", "Cyber", "Digital", "Tech", "Quantum", "Synth", "Hyper", "Mega", "Nano", "Net", "Data",
    "Pulse", "Virtual", "Chrome", "Holo",
];
const NAME_SUFFIXES: &[&str] = &[
    "Shop", "Mart", "Market", "Store", "Hub", "Center", "Emporium", "Outlet", "Depot",
    "Exchange", "Haven", "Corner", "Bazaar", "Bay",
];
const BRANDS: &[&str] = &[
    "NeoCorp",
    "CyberTech",
    "QuantumByte",
    "SynthWare",
    "ChromeLogic",
    "DataPulse",
    "NanoSystems",
    "VirtualEdge",
    "MegaByte",
    "NetDynamics",
    "HyperLink",
    "DigiForge",
    "TechNexus",
    "PulseSoft",
    "ByteHaven",
];

const BRAND_CHANCE: f64 = 0.3;
const TYPE_WORD_CHANCE: f64 = 0.7;
const FEATURED_CHANCE: f64 = 0.1;
const LIMITED_TIME_CHANCE: f64 = 0.15;
const MIN_STOCK: usize = 5;
const STOCK_SPREAD: f64 = 0.3;

fn type_words(shop_type: ShopType) -> &'static [&'static str] {
    match shop_type {
        ShopType::Hardware => &["Gear", "Hardware", "Components", "Parts"],
        ShopType::Software => &["Code", "Programs", "Apps", "Software"],
        ShopType::BlackMarket => &["Shadow", "Underground", "Smuggler", "Dark"],
        ShopType::Consumables => &["Snack", "Refresh", "Boost", "Supply"],
        ShopType::Armor => &["Armor", "Plate", "Kevlar", "Guard"],
        ShopType::General => &["General", "Goods", "Supply", "Stuff"],
        ShopType::Electronics => &["Circuit", "Gadget", "Device", "Tech"],
        ShopType::DigitalServices => &["Service", "Virtual", "Cloud", "Digital"],
        ShopType::Datachips => &["Data", "Memory", "Storage", "Chip"],
        ShopType::Cybernetics => &["Cyber", "Enhancement", "Augment", "Neural"],
        ShopType::Weapons => &["Arms", "Guns", "Arsenal", "Ammo"],
    }
}

fn specializations(shop_type: ShopType) -> &'static [&'static str] {
    match shop_type {
        ShopType::Hardware | ShopType::Electronics => &[
            "Computers",
            "Peripherals",
            "Components",
            "Networking",
            "Drones",
            "Surveillance gear",
        ],
        ShopType::Software | ShopType::DigitalServices => &[
            "Operating systems",
            "Security",
            "Productivity",
            "Games",
            "AI",
            "Intrusion tools",
        ],
        ShopType::BlackMarket => &[
            "Stolen goods",
            "Contraband",
            "Pirated software",
            "Forged identities",
            "Controlled substances",
        ],
        ShopType::Consumables | ShopType::Datachips => &[
            "Synthetic food",
            "Stimulants",
            "Data chips",
            "Supplements",
            "Street food",
        ],
        ShopType::Armor => &[
            "Tactical wear",
            "Ballistic plates",
            "Hazard suits",
            "Smart fabrics",
        ],
        ShopType::General => &["Odds and ends", "Survival kit", "Household goods", "Gadgets"],
        ShopType::Cybernetics => &[
            "Neural interfaces",
            "Optics",
            "Dermal plating",
            "Experimental augments",
        ],
        ShopType::Weapons => &["Firearms", "Blades", "Energy weapons", "Smart guns", "Ammunition"],
    }
}

fn shop_description(shop_type: ShopType) -> &'static str {
    match shop_type {
        ShopType::Hardware => "Sells computer parts and electronic equipment.",
        ShopType::Software => "Security suites, utilities and operating systems for every rig.",
        ShopType::BlackMarket => "A back-room market for goods you cannot buy through legal channels.",
        ShopType::Consumables => "Boosts, stimulants and snacks to keep you running.",
        ShopType::Armor => "Protective gear for anyone walking the streets after dark.",
        ShopType::General => "A bit of everything, tech and otherwise.",
        ShopType::Electronics => "Gadgets, circuits and consumer devices.",
        ShopType::DigitalServices => "Cloud space, virtual identities and remote services.",
        ShopType::Datachips => "Data chips and storage media of every grade.",
        ShopType::Cybernetics => "Augmentations and the hardware that drives them.",
        ShopType::Weapons => "Blades, firearms and stranger things, for a price.",
    }
}

pub fn shop_name(shop_type: ShopType, rng: &mut WorldRng) -> String {
    if rng.chance(BRAND_CHANCE) {
        let brand = rng.pick(BRANDS);
        return if rng.chance(0.5) {
            format!("{} {}", brand, rng.pick(NAME_SUFFIXES))
        } else {
            brand.to_string()
        };
    }
    let prefix = rng.pick(NAME_PREFIXES);
    let suffix = rng.pick(NAME_SUFFIXES);
    if !rng.chance(TYPE_WORD_CHANCE) {
        return format!("{} {}", prefix, suffix);
    }
    let word = rng.pick(type_words(shop_type));
    match rng.range(0..4u8) {
        0 => format!("{}{} {}", prefix, word, suffix),
        1 => format!("{} {} {}", prefix, word, suffix),
        2 => format!("{} {}", word, suffix),
        _ => format!("{} {}", prefix, suffix),
    }
}

/// Black markets are never legal. Software, cybernetics and weapon shops
/// turn illegal more often as complexity grows.
pub fn shop_legality(shop_type: ShopType, complexity: u8, rng: &mut WorldRng) -> bool {
    match shop_type {
        ShopType::BlackMarket => false,
        ShopType::Software | ShopType::Cybernetics | ShopType::Weapons => {
            !rng.chance(0.1 + 0.05 * f64::from(complexity))
        }
        _ => true,
    }
}

pub fn build_shop(
    world_id: WorldId,
    location_id: LocationId,
    building_id: Option<BuildingId>,
    shop_type: ShopType,
    complexity: u8,
    rng: &mut WorldRng,
) -> Shop {
    let is_legal = shop_legality(shop_type, complexity, rng);
    let mut description = shop_description(shop_type).to_string();
    if !is_legal {
        description.push_str(" (Warning: unlicensed shop)");
    }
    let metadata = ShopMetadata {
        founding_date: format!(
            "20{}-{:02}-{:02}",
            rng.range(30..=99u32),
            rng.range(1..=12u32),
            rng.range(1..=28u32)
        ),
        popularity: rng.range(1..=10),
        cleanliness: rng.range(1..=10),
        security_level: rng.range(1..=10),
        specialization: rng.pick(specializations(shop_type)).to_string(),
    };

    Shop {
        id: ShopId(rng.next_uuid()),
        world_id,
        location_id,
        building_id,
        name: shop_name(shop_type, rng),
        description,
        shop_type,
        reputation: rng.range(1..=10),
        price_modifier: rng.range(0.8..=1.5),
        is_legal,
        metadata,
    }
}

/// Shops sit in a random building and take its location. Without buildings
/// they fall back to a bare location.
#[allow(clippy::too_many_arguments)]
pub fn generate_shops(
    store: &dyn WorldStore,
    world_id: WorldId,
    location_ids: &[LocationId],
    building_ids: &[BuildingId],
    shop_types: &[ShopType],
    count: usize,
    complexity: u8,
    rng: &mut WorldRng,
) -> Result<Vec<ShopId>, WorldDbError> {
    if shop_types.is_empty() || (location_ids.is_empty() && building_ids.is_empty()) {
        warn!(
            locations = location_ids.len(),
            buildings = building_ids.len(),
            "nowhere to open shops, generating none"
        );
        return Ok(Vec::new());
    }

    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let mut site = None;
        if let Some(building_id) = rng.choose(building_ids).copied() {
            match store.building(building_id)? {
                Some(building) => site = Some((building.location_id, Some(building.id))),
                None => warn!(building_id = %building_id, "shop building not found"),
            }
        }
        if site.is_none() {
            site = rng.choose(location_ids).map(|id| (*id, None));
        }
        let Some((location_id, building_id)) = site else {
            warn!("no location left for shop, skipping");
            continue;
        };

        let Some(&shop_type) = rng.choose(shop_types) else {
            break;
        };
        let shop = build_shop(world_id, location_id, building_id, shop_type, complexity, rng);
        store.insert_shop(&shop)?;
        debug!(name = %shop.name, shop_type = %shop.shop_type, legal = shop.is_legal, "generated shop");
        ids.push(shop.id);
    }
    Ok(ids)
}

/// Item ids per family, as written by the item generators.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemPools<'a> {
    pub hardware: &'a [ItemId],
    pub consumables: &'a [ItemId],
    pub armor: &'a [ItemId],
    pub software: &'a [ItemId],
    pub weapons: &'a [ItemId],
    pub implants: &'a [ItemId],
}

impl ItemPools<'_> {
    pub fn ids(&self, kind: ItemKind) -> &[ItemId] {
        match kind {
            ItemKind::Hardware => self.hardware,
            ItemKind::Consumable => self.consumables,
            ItemKind::Armor => self.armor,
            ItemKind::Software => self.software,
            ItemKind::Weapon => self.weapons,
            ItemKind::Implant => self.implants,
        }
    }
}

/// Target stock for one shop: `items_per_shop` ±30%, never below five.
pub fn stock_size(items_per_shop: usize, rng: &mut WorldRng) -> usize {
    let factor: f64 = rng.range((1.0 - STOCK_SPREAD)..=(1.0 + STOCK_SPREAD));
    ((items_per_shop as f64 * factor).round() as usize).max(MIN_STOCK)
}

pub fn build_entry(
    shop: &Shop,
    listing: &ItemListing,
    rng: &mut WorldRng,
) -> InventoryEntry {
    let quantity = if listing.rarity.is_rare_or_better() {
        rng.range(1..=3)
    } else {
        rng.range(5..=20)
    };
    let variation: f64 = rng.range(0.8..=1.2);
    let price = (f64::from(listing.price) * shop.price_modifier * variation).round() as u32;
    let is_featured = rng.chance(FEATURED_CHANCE);
    let is_limited_time = rng.chance(LIMITED_TIME_CHANCE);

    InventoryEntry {
        id: InventoryId(rng.next_uuid()),
        world_id: shop.world_id,
        shop_id: shop.id,
        item_kind: listing.kind,
        item_id: listing.id,
        quantity,
        price,
        price_modifier: shop.price_modifier,
        is_featured,
        is_limited_time,
        expiry_days: is_limited_time.then(|| rng.range(1..=30)),
    }
}

fn load_listings(
    store: &dyn WorldStore,
    pools: &ItemPools<'_>,
) -> Result<Vec<ItemListing>, WorldDbError> {
    let mut listings = Vec::new();
    for kind in ItemKind::ALL {
        for id in pools.ids(*kind) {
            match store.item_listing(*kind, *id)? {
                Some(listing) => listings.push(listing),
                None => warn!(item_id = %id, kind = %kind, "item not found, not stocking it"),
            }
        }
    }
    Ok(listings)
}

/// Stocks every shop from the item families its type sells. With
/// `rare_percentage` chance a draw comes from the Rare-or-better subset.
/// An item is listed at most once per shop.
pub fn generate_shop_inventory(
    store: &dyn WorldStore,
    shop_ids: &[ShopId],
    pools: &ItemPools<'_>,
    items_per_shop: usize,
    rare_percentage: u8,
    rng: &mut WorldRng,
) -> Result<Vec<InventoryId>, WorldDbError> {
    let listings = load_listings(store, pools)?;
    let rare_chance = f64::from(rare_percentage.min(100)) / 100.0;
    let mut ids = Vec::new();

    for shop_id in shop_ids {
        let Some(shop) = store.shop(*shop_id)? else {
            warn!(shop_id = %shop_id, "shop not found, skipping its inventory");
            continue;
        };
        let kinds = shop.shop_type.stocks();
        let stock: Vec<&ItemListing> = listings
            .iter()
            .filter(|listing| kinds.contains(&listing.kind))
            .collect();
        if stock.is_empty() {
            warn!(shop = %shop.name, shop_type = %shop.shop_type, "no items to stock, skipping");
            continue;
        }
        let rare: Vec<&ItemListing> = stock
            .iter()
            .copied()
            .filter(|listing| listing.rarity.is_rare_or_better())
            .collect();

        let target = stock_size(items_per_shop, rng);
        let mut listed = HashSet::new();
        for _ in 0..target {
            let pool = if !rare.is_empty() && rng.chance(rare_chance) {
                &rare
            } else {
                &stock
            };
            let Some(&listing) = rng.choose(pool) else {
                break;
            };
            if !listed.insert(listing.id) {
                continue;
            }
            let entry = build_entry(&shop, listing, rng);
            store.insert_inventory_entry(&entry)?;
            ids.push(entry.id);
        }
        debug!(shop = %shop.name, entries = listed.len(), "stocked shop");
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rarity;
    use uuid::Uuid;

    fn shop(price_modifier: f64) -> Shop {
        let mut rng = WorldRng::new(Some(1));
        let mut shop = build_shop(
            WorldId(Uuid::from_u128(1)),
            LocationId(Uuid::from_u128(2)),
            None,
            ShopType::General,
            3,
            &mut rng,
        );
        shop.price_modifier = price_modifier;
        shop
    }

    fn listing(rarity: Rarity) -> ItemListing {
        ItemListing {
            kind: ItemKind::Armor,
            id: ItemId(Uuid::from_u128(9)),
            price: 1_000,
            rarity,
        }
    }

    #[test]
    fn black_markets_are_never_legal() {
        let mut rng = WorldRng::new(Some(3));
        for complexity in 1..=5 {
            assert!(!shop_legality(ShopType::BlackMarket, complexity, &mut rng));
            assert!(shop_legality(ShopType::Armor, complexity, &mut rng));
        }
        let illegal = (0..200)
            .filter(|_| !shop_legality(ShopType::Weapons, 5, &mut rng))
            .count();
        assert!(illegal > 0 && illegal < 200);
    }

    #[test]
    fn stock_size_has_a_floor() {
        let mut rng = WorldRng::new(Some(5));
        for _ in 0..50 {
            assert!(stock_size(1, &mut rng) >= MIN_STOCK);
            let size = stock_size(20, &mut rng);
            assert!((14..=26).contains(&size));
        }
    }

    #[test]
    fn rare_stock_comes_in_small_batches() {
        let mut rng = WorldRng::new(Some(8));
        let shop = shop(1.0);
        for _ in 0..30 {
            let rare = build_entry(&shop, &listing(Rarity::Epic), &mut rng);
            assert!((1..=3).contains(&rare.quantity));
            let common = build_entry(&shop, &listing(Rarity::Common), &mut rng);
            assert!((5..=20).contains(&common.quantity));
            assert!((800..=1_200).contains(&common.price));
            assert_eq!(common.expiry_days.is_some(), common.is_limited_time);
        }
    }

    #[test]
    fn entry_price_applies_shop_modifier() {
        let mut rng = WorldRng::new(Some(13));
        let shop = shop(1.5);
        for _ in 0..30 {
            let entry = build_entry(&shop, &listing(Rarity::Common), &mut rng);
            assert!((1_200..=1_800).contains(&entry.price));
            assert_eq!(entry.price_modifier, 1.5);
        }
    }

    #[test]
    fn every_shop_type_has_words_and_specializations() {
        for shop_type in ShopType::ALL {
            assert!(!type_words(*shop_type).is_empty());
            assert!(!specializations(*shop_type).is_empty());
        }
    }
}
