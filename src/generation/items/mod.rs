//! Loot and merchandise. Every item rolls a rarity, scales its numbers by
//! that rarity and lands in one of the placement pools.

pub mod armor;
pub mod consumables;
pub mod effects;
pub mod hardware;
pub mod implants;
pub mod software;
pub mod weapons;

use crate::generation::rng::WorldRng;
use crate::model::{BuildingId, CharacterId, DeviceId, ItemPlacement, Rarity};

pub use armor::generate_armor_items;
pub use consumables::generate_consumable_items;
pub use hardware::generate_hardware_items;
pub use implants::generate_implant_items;
pub use software::generate_software_items;
pub use weapons::generate_weapon_items;

/// Spread applied to the rarity stat multiplier.
const MULTIPLIER_JITTER: f64 = 0.1;

pub fn roll_rarity(rng: &mut WorldRng) -> Rarity {
    rng.pick_weighted(&Rarity::WEIGHTS).unwrap_or(Rarity::Common)
}

/// Stat multiplier of `rarity` with a ±10% wobble.
pub fn rarity_multiplier(rarity: Rarity, rng: &mut WorldRng) -> f64 {
    rng.jitter(rarity.stat_multiplier(), MULTIPLIER_JITTER)
}

/// Required level band of gear at `rarity`.
pub fn level_range(rarity: Rarity) -> (u8, u8) {
    match rarity {
        Rarity::Common => (1, 3),
        Rarity::Uncommon => (2, 5),
        Rarity::Rare => (4, 8),
        Rarity::Epic => (7, 12),
        Rarity::Legendary => (10, 15),
    }
}

/// List price of weapons and implants: a rarity base raised 20% per level.
pub(crate) fn gear_price(rarity: Rarity, level: u8) -> u32 {
    let base = match rarity {
        Rarity::Common => 100.0,
        Rarity::Uncommon => 500.0,
        Rarity::Rare => 2_000.0,
        Rarity::Epic => 8_000.0,
        Rarity::Legendary => 25_000.0,
    };
    (base * (1.0 + f64::from(level) * 0.2)) as u32
}

/// Price variation shared by every item family.
pub(crate) fn price_variation(rng: &mut WorldRng) -> f64 {
    rng.range(0.8..=1.2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Device,
    Building,
    Character,
    Shop,
    World,
}

const SLOTS: [Slot; 5] = [
    Slot::Device,
    Slot::Building,
    Slot::Character,
    Slot::Shop,
    Slot::World,
];

/// Ids an item may be placed against.
#[derive(Debug, Clone, Copy)]
pub struct PlacementPools<'a> {
    pub devices: &'a [DeviceId],
    pub buildings: &'a [BuildingId],
    pub characters: &'a [CharacterId],
}

impl PlacementPools<'_> {
    /// Uniform over the five slots. A slot whose pool is empty becomes
    /// world loot; shop stock is parked on a building.
    pub fn draw(&self, rng: &mut WorldRng) -> ItemPlacement {
        let placement = match rng.pick(&SLOTS) {
            Slot::Device => rng.choose(self.devices).map(|id| ItemPlacement::Device(*id)),
            Slot::Building => rng
                .choose(self.buildings)
                .map(|id| ItemPlacement::Building(*id)),
            Slot::Character => rng
                .choose(self.characters)
                .map(|id| ItemPlacement::Character(*id)),
            Slot::Shop => rng.choose(self.buildings).map(|id| ItemPlacement::Shop {
                building_id: *id,
            }),
            Slot::World => None,
        };
        placement.unwrap_or(ItemPlacement::World)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn empty_pools_fall_back_to_world() {
        let mut rng = WorldRng::new(Some(4));
        let pools = PlacementPools {
            devices: &[],
            buildings: &[],
            characters: &[],
        };
        for _ in 0..50 {
            assert_eq!(pools.draw(&mut rng), ItemPlacement::World);
        }
    }

    #[test]
    fn shop_stock_sits_on_a_building() {
        let mut rng = WorldRng::new(Some(9));
        let buildings = [BuildingId(Uuid::from_u128(3))];
        let pools = PlacementPools {
            devices: &[],
            buildings: &buildings,
            characters: &[],
        };
        let mut shops = 0;
        for _ in 0..100 {
            match pools.draw(&mut rng) {
                ItemPlacement::Shop { building_id } => {
                    assert_eq!(building_id, buildings[0]);
                    shops += 1;
                }
                ItemPlacement::Building(id) => assert_eq!(id, buildings[0]),
                ItemPlacement::World => {}
                other => panic!("unexpected placement {:?}", other),
            }
        }
        assert!(shops > 0);
    }

    #[test]
    fn multiplier_stays_within_jitter() {
        let mut rng = WorldRng::new(Some(11));
        for rarity in Rarity::ALL {
            for _ in 0..50 {
                let value = rarity_multiplier(*rarity, &mut rng);
                let base = rarity.stat_multiplier();
                assert!(value >= base * 0.9 - 1e-9 && value <= base * 1.1 + 1e-9);
            }
        }
    }

    /// Mean of `stat` over a batch of rolls per tier, Common first.
    fn tier_means(seed: u64, mut stat: impl FnMut(Rarity, &mut WorldRng) -> f64) -> Vec<f64> {
        const DRAWS: usize = 200;
        let mut rng = WorldRng::new(Some(seed));
        Rarity::ALL
            .iter()
            .map(|&rarity| (0..DRAWS).map(|_| stat(rarity, &mut rng)).sum::<f64>() / DRAWS as f64)
            .collect()
    }

    fn assert_rising(family: &str, means: &[f64]) {
        for (tier, pair) in means.windows(2).enumerate() {
            assert!(
                pair[1] > pair[0],
                "{} tier {} mean {} is not above tier {} mean {}",
                family,
                tier + 1,
                pair[1],
                tier,
                pair[0]
            );
        }
    }

    #[test]
    fn rarer_tiers_carry_stronger_stats() {
        use crate::model::{
            ArmorCategory, ArmorSlot, ConsumableType, EffectProfile, HardwareType, ImplantType,
            WeaponCategory,
        };

        let hardware = tier_means(1, |rarity, rng| {
            let m = rarity_multiplier(rarity, rng);
            f64::from(hardware::hardware_stats(HardwareType::Cpu, 5, m, rng).primary())
        });
        assert_rising("hardware", &hardware);

        let consumables = tier_means(2, |rarity, rng| {
            match effects::consumable_effects(ConsumableType::DataChip, rarity, rng).profile {
                EffectProfile::DataChip { skill_xp, .. } => skill_xp as f64,
                other => panic!("unexpected profile {:?}", other),
            }
        });
        assert_rising("consumables", &consumables);

        let armor = tier_means(3, |rarity, rng| {
            let (min_level, max_level) = level_range(rarity);
            let level = rng.range(min_level..=max_level);
            let m = rarity_multiplier(rarity, rng);
            f64::from(armor::armor_defense(ArmorCategory::Medium, ArmorSlot::Chest, m, level))
        });
        assert_rising("armor", &armor);

        let software = tier_means(4, |rarity, rng| {
            let m = rarity_multiplier(rarity, rng);
            let capabilities = software::capabilities(m, rng);
            let total: u32 = capabilities.iter().map(|c| u32::from(c.level)).sum();
            f64::from(total) / capabilities.len() as f64
        });
        assert_rising("software", &software);

        let weapons = tier_means(5, |rarity, rng| {
            let m = rarity_multiplier(rarity, rng);
            f64::from(weapons::weapon_stats(WeaponCategory::Ranged, m).0)
        });
        assert_rising("weapons", &weapons);

        let implants = tier_means(6, |rarity, rng| {
            let bonus = implants::stats_bonus(ImplantType::Neural, rarity, rng);
            f64::from(bonus.values().map(|value| u32::from(*value)).sum::<u32>())
        });
        assert_rising("implants", &implants);
    }
}
