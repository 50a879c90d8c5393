use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{
    ArmorItem, Building, BuildingId, Character, CharacterId, CharacterRef, ConsumableItem,
    Coordinates, Device, DeviceId, DeviceTarget, DeviceType, File, HackingPuzzle, HardwareItem,
    ImplantItem, InventoryEntry, ItemId, ItemKind, ItemListing, Location, LocationId, LocationLink,
    Mission, MissionId, MissionRef, Network, NetworkId, Objective, Room, Shop, ShopId,
    SoftwareItem, StoryElement, Vulnerability, WeaponItem, World, WorldId,
};
use crate::world::repository::WorldStore;
use crate::world::sqlite::WorldDbError;

/// `WorldStore` over any connection, including a transaction or savepoint.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, WorldDbError> {
    Ok(serde_json::to_string(value)?)
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, index: usize) -> rusqlite::Result<T> {
    let text: String = row.get(index)?;
    serde_json::from_str(&text)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

fn item_table(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Hardware => "hardware_items",
        ItemKind::Consumable => "consumable_items",
        ItemKind::Armor => "armor_items",
        ItemKind::Software => "software_items",
        ItemKind::Weapon => "weapon_items",
        ItemKind::Implant => "implant_items",
    }
}

fn location_from_row(row: &Row<'_>) -> rusqlite::Result<Location> {
    Ok(Location {
        id: row.get(0)?,
        world_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        kind: row.get(4)?,
        parent_id: row.get(5)?,
        coordinates: Coordinates {
            latitude: row.get(6)?,
            longitude: row.get(7)?,
        },
        security_level: row.get(8)?,
        population: row.get::<_, i64>(9)?.max(0) as u64,
        services: json_column(row, 10)?,
        tags: json_column(row, 11)?,
        is_virtual: row.get(12)?,
        is_special: row.get(13)?,
        is_dangerous: row.get(14)?,
        metadata: json_column(row, 15)?,
    })
}

fn building_from_row(row: &Row<'_>) -> rusqlite::Result<Building> {
    Ok(Building {
        id: row.get(0)?,
        world_id: row.get(1)?,
        location_id: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        building_type: row.get(5)?,
        floors: row.get(6)?,
        security_level: row.get(7)?,
        metadata: json_column(row, 8)?,
    })
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        world_id: row.get(1)?,
        building_id: row.get(2)?,
        name: row.get(3)?,
        floor: row.get(4)?,
        room_type: row.get(5)?,
        is_locked: row.get(6)?,
        is_restricted: row.get(7)?,
        security_level: row.get(8)?,
        size_sqm: row.get(9)?,
    })
}

fn device_from_row(row: &Row<'_>) -> rusqlite::Result<Device> {
    Ok(Device {
        id: row.get(0)?,
        world_id: row.get(1)?,
        location_id: row.get(2)?,
        building_id: row.get(3)?,
        room_id: row.get(4)?,
        owner_id: row.get(5)?,
        name: row.get(6)?,
        description: row.get(7)?,
        device_type: row.get(8)?,
        os_type: row.get(9)?,
        security_level: row.get(10)?,
        ip_address: row.get(11)?,
        is_connected: row.get(12)?,
    })
}

fn network_from_row(row: &Row<'_>) -> rusqlite::Result<Network> {
    Ok(Network {
        id: row.get(0)?,
        world_id: row.get(1)?,
        building_id: row.get(2)?,
        name: row.get(3)?,
        network_type: row.get(4)?,
        security: row.get(5)?,
        encryption: row.get(6)?,
        password: row.get(7)?,
        is_hidden: row.get(8)?,
        requires_hacking: row.get(9)?,
        metadata: json_column(row, 10)?,
    })
}

fn shop_from_row(row: &Row<'_>) -> rusqlite::Result<Shop> {
    Ok(Shop {
        id: row.get(0)?,
        world_id: row.get(1)?,
        location_id: row.get(2)?,
        building_id: row.get(3)?,
        name: row.get(4)?,
        description: row.get(5)?,
        shop_type: row.get(6)?,
        reputation: row.get(7)?,
        price_modifier: row.get(8)?,
        is_legal: row.get(9)?,
        metadata: json_column(row, 10)?,
    })
}

impl WorldStore for SqliteStore<'_> {
    fn insert_world(&self, world: &World) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO worlds (id, name, description, author, version, complexity, is_active, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                world.id,
                world.name,
                world.description,
                world.author,
                world.version,
                world.complexity,
                world.is_active,
                to_json(&world.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_location(&self, location: &Location) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO locations (id, world_id, name, description, location_type, parent_location_id, latitude, longitude, security_level, population, services, tags, is_virtual, is_special, is_dangerous, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                location.id,
                location.world_id,
                location.name,
                location.description,
                location.kind,
                location.parent_id,
                location.coordinates.latitude,
                location.coordinates.longitude,
                location.security_level,
                location.population as i64,
                to_json(&location.services)?,
                to_json(&location.tags)?,
                location.is_virtual,
                location.is_special,
                location.is_dangerous,
                to_json(&location.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_link(&self, link: &LocationLink) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO location_connections (id, world_id, source_id, destination_id, travel_type, travel_time, travel_cost, requires_hacking, requires_special_access) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                link.id,
                link.world_id,
                link.source_id,
                link.destination_id,
                link.travel_type,
                link.travel_time_hours,
                link.travel_cost,
                link.requires_hacking,
                link.requires_special_access
            ],
        )?;
        Ok(())
    }

    fn insert_building(&self, building: &Building) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO buildings (id, world_id, location_id, name, description, building_type, floors, security_level, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                building.id,
                building.world_id,
                building.location_id,
                building.name,
                building.description,
                building.building_type,
                building.floors,
                building.security_level,
                to_json(&building.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_room(&self, room: &Room) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO rooms (id, world_id, building_id, name, floor, room_type, is_locked, is_restricted, security_level, size_sqm) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                room.id,
                room.world_id,
                room.building_id,
                room.name,
                room.floor,
                room.room_type,
                room.is_locked,
                room.is_restricted,
                room.security_level,
                room.size_sqm
            ],
        )?;
        Ok(())
    }

    fn insert_character(&self, character: &Character) -> Result<(), WorldDbError> {
        let combat = &character.combat;
        self.conn.execute(
            "INSERT INTO characters (id, world_id, location_id, name, gender, profession, faction, description, importance, hacking_level, combat_level, charisma, wealth, is_hostile, is_quest_giver, is_vendor, enemy_type, health, damage, accuracy, initiative, hostility, resistances, ai_behavior, combat_style, special_abilities, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27)",
            params![
                character.id,
                character.world_id,
                character.location_id,
                character.name,
                character.gender,
                character.profession,
                character.faction,
                character.description,
                character.importance,
                character.skills.hacking,
                character.skills.combat,
                character.skills.charisma,
                character.skills.wealth,
                character.is_hostile,
                character.is_quest_giver,
                character.is_vendor,
                combat.enemy_type,
                combat.health,
                combat.damage,
                combat.accuracy,
                combat.initiative,
                combat.hostility,
                to_json(&combat.resistances)?,
                combat.ai_behavior,
                combat.combat_style,
                to_json(&combat.special_abilities)?,
                to_json(&character.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_device(&self, device: &Device) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO devices (id, world_id, location_id, building_id, room_id, owner_id, name, description, device_type, os_type, security_level, ip_address, is_connected) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                device.id,
                device.world_id,
                device.location_id,
                device.building_id,
                device.room_id,
                device.owner_id,
                device.name,
                device.description,
                device.device_type,
                device.os_type,
                device.security_level,
                device.ip_address,
                device.is_connected
            ],
        )?;
        Ok(())
    }

    fn insert_network(&self, network: &Network) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO networks (id, world_id, building_id, name, network_type, security_level, encryption, password, is_hidden, requires_hacking, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                network.id,
                network.world_id,
                network.building_id,
                network.name,
                network.network_type,
                network.security,
                network.encryption,
                network.password,
                network.is_hidden,
                network.requires_hacking,
                to_json(&network.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_file(&self, file: &File) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO files (id, world_id, device_id, name, file_type, size_kb, security_level, is_encrypted, encryption_type, content, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                file.id,
                file.world_id,
                file.device_id,
                file.name,
                file.file_type,
                file.size_kb,
                file.security_level,
                file.is_encrypted,
                file.encryption_type,
                file.content,
                to_json(&file.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_puzzle(&self, puzzle: &HackingPuzzle) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO hacking_puzzles (id, world_id, name, description, puzzle_type, target_type, target_id, difficulty, xp_reward, credit_reward, has_trap, alarm_chance, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                puzzle.id,
                puzzle.world_id,
                puzzle.name,
                puzzle.description,
                puzzle.puzzle_type,
                puzzle.target.target_type(),
                puzzle.target.target_id(),
                puzzle.difficulty,
                puzzle.xp_reward,
                puzzle.credit_reward,
                puzzle.has_trap,
                puzzle.alarm_chance,
                to_json(&puzzle.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_vulnerability(&self, vulnerability: &Vulnerability) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO vulnerabilities (id, world_id, name, description, vuln_type, code_name, target_type, target_id, difficulty, impact, rarity, is_public, is_patched, discovery_date, exploits) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                vulnerability.id,
                vulnerability.world_id,
                vulnerability.name,
                vulnerability.description,
                vulnerability.vuln_type,
                vulnerability.code_name,
                vulnerability.target.target_type(),
                vulnerability.target.target_id(),
                vulnerability.difficulty,
                vulnerability.impact,
                vulnerability.rarity,
                vulnerability.is_public,
                vulnerability.is_patched,
                vulnerability.discovery_date,
                to_json(&vulnerability.exploits)?
            ],
        )?;
        Ok(())
    }

    fn insert_mission(&self, mission: &Mission) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO missions (id, world_id, location_id, giver_id, title, description, mission_type, difficulty, reward_credits, reward_reputation, is_main_quest, is_repeatable, is_hidden, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                mission.id,
                mission.world_id,
                mission.location_id,
                mission.giver_id,
                mission.title,
                mission.description,
                mission.mission_type,
                mission.difficulty,
                mission.reward_credits,
                mission.reward_reputation,
                mission.is_main_quest,
                mission.is_repeatable,
                mission.is_hidden,
                to_json(&mission.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_objective(&self, objective: &Objective) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO objectives (id, world_id, mission_id, title, description, objective_type, target_count, is_optional, order_index) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                objective.id,
                objective.world_id,
                objective.mission_id,
                objective.title,
                objective.description,
                objective.objective_type,
                objective.target_count,
                objective.is_optional,
                objective.order_index
            ],
        )?;
        Ok(())
    }

    fn insert_story_element(&self, element: &StoryElement) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO story_elements (id, world_id, element_type, title, content, location_id, character_id, mission_id, is_revealed, reveal_condition, order_index) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                element.id,
                element.world_id,
                element.element_type,
                element.title,
                element.content,
                element.location_id,
                element.character_id,
                element.mission_id,
                element.is_revealed,
                element.reveal_condition.map(|condition| condition.to_string()),
                element.order_index
            ],
        )?;
        Ok(())
    }

    fn insert_hardware(&self, item: &HardwareItem) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO hardware_items (id, world_id, name, description, hardware_type, quality, rarity, level, price, location_type, location_id, is_installed, stats, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                item.id,
                item.world_id,
                item.name,
                item.description,
                item.hardware_type,
                item.quality,
                item.rarity,
                item.level,
                item.price,
                item.placement.location_type(),
                item.placement.location_id(),
                item.is_installed,
                to_json(&item.stats)?,
                to_json(&item.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_consumable(&self, item: &ConsumableItem) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO consumable_items (id, world_id, name, description, item_type, rarity, uses, price, location_type, location_id, effects, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                item.id,
                item.world_id,
                item.name,
                item.description,
                item.consumable_type,
                item.rarity,
                item.uses,
                item.price,
                item.placement.location_type(),
                item.placement.location_id(),
                to_json(&item.effects)?,
                to_json(&item.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_armor(&self, item: &ArmorItem) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO armor_items (id, world_id, name, description, category, armor_type, slot, manufacturer, rarity, level, defense, weight, price, location_type, location_id, resistances, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                item.id,
                item.world_id,
                item.name,
                item.description,
                item.category,
                item.armor_type,
                item.slot,
                item.manufacturer,
                item.rarity,
                item.level,
                item.defense,
                item.weight_kg,
                item.price,
                item.placement.location_type(),
                item.placement.location_id(),
                to_json(&item.resistances)?,
                to_json(&item.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_software(&self, item: &SoftwareItem) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO software_items (id, world_id, name, description, software_type, developer, version, license_type, rarity, level, price, is_malware, location_type, location_id, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                item.id,
                item.world_id,
                item.name,
                item.description,
                item.software_type,
                item.developer,
                item.version,
                item.license,
                item.rarity,
                item.level,
                item.price,
                item.is_malware,
                item.placement.location_type(),
                item.placement.location_id(),
                to_json(&item.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_weapon(&self, item: &WeaponItem) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO weapon_items (id, world_id, name, description, category, weapon_type, manufacturer, damage, accuracy, weapon_range, rarity, level, price, is_legal, location_type, location_id, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                item.id,
                item.world_id,
                item.name,
                item.description,
                item.category,
                item.weapon_type,
                item.manufacturer,
                item.damage,
                item.accuracy,
                item.range_m,
                item.rarity,
                item.level,
                item.price,
                item.is_legal,
                item.placement.location_type(),
                item.placement.location_id(),
                to_json(&item.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_implant(&self, item: &ImplantItem) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO implant_items (id, world_id, name, description, implant_type, manufacturer, rarity, level, price, humanity_cost, surgery_difficulty, stats_bonus, special_effects, is_legal, location_type, location_id, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                item.id,
                item.world_id,
                item.name,
                item.description,
                item.implant_type,
                item.manufacturer,
                item.rarity,
                item.level,
                item.price,
                item.humanity_cost,
                item.surgery_difficulty,
                to_json(&item.stats_bonus)?,
                to_json(&item.special_effects)?,
                item.is_legal,
                item.placement.location_type(),
                item.placement.location_id(),
                to_json(&item.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_shop(&self, shop: &Shop) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO shops (id, world_id, location_id, building_id, name, description, shop_type, reputation, price_modifier, is_legal, metadata) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                shop.id,
                shop.world_id,
                shop.location_id,
                shop.building_id,
                shop.name,
                shop.description,
                shop.shop_type,
                shop.reputation,
                shop.price_modifier,
                shop.is_legal,
                to_json(&shop.metadata)?
            ],
        )?;
        Ok(())
    }

    fn insert_inventory_entry(&self, entry: &InventoryEntry) -> Result<(), WorldDbError> {
        self.conn.execute(
            "INSERT INTO shop_inventory (id, world_id, shop_id, item_type, item_id, quantity, price, price_modifier, is_featured, is_limited_time, expiry_days) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                entry.id,
                entry.world_id,
                entry.shop_id,
                entry.item_kind,
                entry.item_id,
                entry.quantity,
                entry.price,
                entry.price_modifier,
                entry.is_featured,
                entry.is_limited_time,
                entry.expiry_days
            ],
        )?;
        Ok(())
    }

    fn world(&self, id: WorldId) -> Result<Option<World>, WorldDbError> {
        let world = self
            .conn
            .query_row(
                "SELECT id, name, description, author, version, complexity, is_active, metadata FROM worlds WHERE id = ?1",
                params![id],
                |row| {
                    Ok(World {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                        author: row.get(3)?,
                        version: row.get(4)?,
                        complexity: row.get(5)?,
                        is_active: row.get(6)?,
                        metadata: json_column(row, 7)?,
                    })
                },
            )
            .optional()?;
        Ok(world)
    }

    fn location(&self, id: LocationId) -> Result<Option<Location>, WorldDbError> {
        let location = self
            .conn
            .query_row(
                "SELECT id, world_id, name, description, location_type, parent_location_id, latitude, longitude, security_level, population, services, tags, is_virtual, is_special, is_dangerous, metadata FROM locations WHERE id = ?1",
                params![id],
                location_from_row,
            )
            .optional()?;
        Ok(location)
    }

    fn building(&self, id: BuildingId) -> Result<Option<Building>, WorldDbError> {
        let building = self
            .conn
            .query_row(
                "SELECT id, world_id, location_id, name, description, building_type, floors, security_level, metadata FROM buildings WHERE id = ?1",
                params![id],
                building_from_row,
            )
            .optional()?;
        Ok(building)
    }

    fn rooms_for_building(&self, id: BuildingId) -> Result<Vec<Room>, WorldDbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, world_id, building_id, name, floor, room_type, is_locked, is_restricted, security_level, size_sqm FROM rooms WHERE building_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![id], room_from_row)?;
        let mut rooms = Vec::new();
        for row in rows {
            rooms.push(row?);
        }
        Ok(rooms)
    }

    fn device(&self, id: DeviceId) -> Result<Option<Device>, WorldDbError> {
        let device = self
            .conn
            .query_row(
                "SELECT id, world_id, location_id, building_id, room_id, owner_id, name, description, device_type, os_type, security_level, ip_address, is_connected FROM devices WHERE id = ?1",
                params![id],
                device_from_row,
            )
            .optional()?;
        Ok(device)
    }

    fn device_target(&self, id: DeviceId) -> Result<Option<DeviceTarget>, WorldDbError> {
        let target = self
            .conn
            .query_row(
                "SELECT id, name, device_type, security_level FROM devices WHERE id = ?1",
                params![id],
                |row| {
                    Ok(DeviceTarget {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        device_type: row.get_ref(2)?.as_str().ok().and_then(DeviceType::parse),
                        security_level: row
                            .get_ref(3)?
                            .as_i64()
                            .ok()
                            .and_then(|level| u8::try_from(level).ok()),
                    })
                },
            )
            .optional()?;
        Ok(target)
    }

    fn network(&self, id: NetworkId) -> Result<Option<Network>, WorldDbError> {
        let network = self
            .conn
            .query_row(
                "SELECT id, world_id, building_id, name, network_type, security_level, encryption, password, is_hidden, requires_hacking, metadata FROM networks WHERE id = ?1",
                params![id],
                network_from_row,
            )
            .optional()?;
        Ok(network)
    }

    fn character(&self, id: CharacterId) -> Result<Option<CharacterRef>, WorldDbError> {
        let character = self
            .conn
            .query_row(
                "SELECT id, name, location_id, faction FROM characters WHERE id = ?1",
                params![id],
                |row| {
                    Ok(CharacterRef {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        location_id: row.get(2)?,
                        faction: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(character)
    }

    fn mission(&self, id: MissionId) -> Result<Option<MissionRef>, WorldDbError> {
        let mission = self
            .conn
            .query_row(
                "SELECT id, title, location_id FROM missions WHERE id = ?1",
                params![id],
                |row| {
                    Ok(MissionRef {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        location_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(mission)
    }

    fn shop(&self, id: ShopId) -> Result<Option<Shop>, WorldDbError> {
        let shop = self
            .conn
            .query_row(
                "SELECT id, world_id, location_id, building_id, name, description, shop_type, reputation, price_modifier, is_legal, metadata FROM shops WHERE id = ?1",
                params![id],
                shop_from_row,
            )
            .optional()?;
        Ok(shop)
    }

    fn item_listing(
        &self,
        kind: ItemKind,
        id: ItemId,
    ) -> Result<Option<ItemListing>, WorldDbError> {
        let sql = format!(
            "SELECT id, price, rarity FROM {} WHERE id = ?1",
            item_table(kind)
        );
        let listing = self
            .conn
            .query_row(&sql, params![id], |row| {
                Ok(ItemListing {
                    kind,
                    id: row.get(0)?,
                    price: row.get(1)?,
                    rarity: row.get(2)?,
                })
            })
            .optional()?;
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldCounts;
    use crate::model::{LocationKind, LocationMetadata, WorldMetadata, WORLD_FORMAT_VERSION};
    use crate::world::WorldDb;
    use uuid::Uuid;

    fn sample_world() -> World {
        World {
            id: WorldId(Uuid::from_u128(7)),
            name: "Neon Grid".to_string(),
            description: "test".to_string(),
            author: "tests".to_string(),
            version: WORLD_FORMAT_VERSION.to_string(),
            complexity: 1,
            is_active: true,
            metadata: WorldMetadata {
                seed: 42,
                counts: WorldCounts::from_complexity(1),
            },
        }
    }

    fn sample_city(world_id: WorldId) -> Location {
        Location {
            id: LocationId(Uuid::from_u128(8)),
            world_id,
            name: "Neo-Tokyo".to_string(),
            description: "city".to_string(),
            kind: LocationKind::City,
            parent_id: None,
            coordinates: Coordinates {
                latitude: 35.6,
                longitude: 139.7,
            },
            security_level: 4,
            population: 14_000_000,
            services: vec!["commerce".to_string(), "transport".to_string()],
            tags: vec!["city".to_string(), "megalopolis".to_string()],
            is_virtual: false,
            is_special: false,
            is_dangerous: false,
            metadata: LocationMetadata::default(),
        }
    }

    #[test]
    fn location_reads_back_typed() {
        let db = WorldDb::open_in_memory().unwrap();
        let store = db.store();
        let world = sample_world();
        let city = sample_city(world.id);
        store.insert_world(&world).unwrap();
        store.insert_location(&city).unwrap();

        assert_eq!(store.world(world.id).unwrap(), Some(world));
        assert_eq!(store.location(city.id).unwrap(), Some(city));
        assert_eq!(
            store.location(LocationId(Uuid::from_u128(99))).unwrap(),
            None
        );
    }

    #[test]
    fn orphan_rows_violate_foreign_keys() {
        let db = WorldDb::open_in_memory().unwrap();
        let store = db.store();
        let city = sample_city(WorldId(Uuid::from_u128(1234)));
        let err = store.insert_location(&city).unwrap_err();
        assert!(matches!(err, WorldDbError::Sqlite(_)));
    }
}
