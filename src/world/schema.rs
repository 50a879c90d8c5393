/// One ordered step of the world schema. Applied at most once per database.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: MIGRATION_V1,
    },
    Migration {
        version: 2,
        name: "world_scope_indexes",
        sql: MIGRATION_V2,
    },
    Migration {
        version: 3,
        name: "weapons_implants_vulnerabilities",
        sql: MIGRATION_V3,
    },
];

pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

const MIGRATION_V1: &str = r#"
CREATE TABLE IF NOT EXISTS worlds (
  id TEXT PRIMARY KEY,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  author TEXT NOT NULL,
  version TEXT NOT NULL,
  complexity INTEGER NOT NULL CHECK (complexity BETWEEN 1 AND 5),
  is_active INTEGER NOT NULL DEFAULT 1,
  metadata TEXT NOT NULL,
  created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS locations (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  location_type TEXT NOT NULL,
  parent_location_id TEXT REFERENCES locations(id) ON DELETE CASCADE,
  latitude REAL NOT NULL,
  longitude REAL NOT NULL,
  security_level INTEGER NOT NULL CHECK (security_level BETWEEN 1 AND 5),
  population INTEGER NOT NULL,
  services TEXT NOT NULL,
  tags TEXT NOT NULL,
  is_virtual INTEGER NOT NULL,
  is_special INTEGER NOT NULL,
  is_dangerous INTEGER NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS location_connections (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  source_id TEXT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
  destination_id TEXT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
  travel_type TEXT NOT NULL,
  travel_time REAL NOT NULL,
  travel_cost INTEGER NOT NULL,
  requires_hacking INTEGER NOT NULL,
  requires_special_access INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS buildings (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  location_id TEXT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  building_type TEXT NOT NULL,
  floors INTEGER NOT NULL,
  security_level INTEGER NOT NULL CHECK (security_level BETWEEN 1 AND 5),
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS rooms (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  building_id TEXT NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  floor INTEGER NOT NULL,
  room_type TEXT NOT NULL,
  is_locked INTEGER NOT NULL,
  is_restricted INTEGER NOT NULL,
  security_level INTEGER NOT NULL,
  size_sqm INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS characters (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  location_id TEXT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  gender TEXT NOT NULL,
  profession TEXT NOT NULL,
  faction TEXT NOT NULL,
  description TEXT NOT NULL,
  importance INTEGER NOT NULL,
  hacking_level INTEGER NOT NULL,
  combat_level INTEGER NOT NULL,
  charisma INTEGER NOT NULL,
  wealth INTEGER NOT NULL,
  is_hostile INTEGER NOT NULL,
  is_quest_giver INTEGER NOT NULL,
  is_vendor INTEGER NOT NULL,
  enemy_type TEXT NOT NULL,
  health INTEGER NOT NULL,
  damage INTEGER NOT NULL,
  accuracy REAL NOT NULL,
  initiative INTEGER NOT NULL,
  hostility INTEGER NOT NULL,
  resistances TEXT NOT NULL,
  ai_behavior TEXT NOT NULL,
  combat_style TEXT NOT NULL,
  special_abilities TEXT NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS devices (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  location_id TEXT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
  building_id TEXT REFERENCES buildings(id) ON DELETE CASCADE,
  room_id TEXT REFERENCES rooms(id) ON DELETE SET NULL,
  owner_id TEXT REFERENCES characters(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  device_type TEXT NOT NULL,
  os_type TEXT NOT NULL,
  security_level INTEGER NOT NULL CHECK (security_level BETWEEN 1 AND 5),
  ip_address TEXT NOT NULL,
  is_connected INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS networks (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  building_id TEXT NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  network_type TEXT NOT NULL,
  security_level TEXT NOT NULL,
  encryption TEXT NOT NULL,
  password TEXT NOT NULL,
  is_hidden INTEGER NOT NULL,
  requires_hacking INTEGER NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS files (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  device_id TEXT NOT NULL REFERENCES devices(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  file_type TEXT NOT NULL,
  size_kb INTEGER NOT NULL,
  security_level INTEGER NOT NULL CHECK (security_level BETWEEN 0 AND 5),
  is_encrypted INTEGER NOT NULL,
  encryption_type TEXT,
  content TEXT NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS hacking_puzzles (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  puzzle_type TEXT NOT NULL,
  target_type TEXT NOT NULL CHECK (target_type IN ('device', 'network')),
  target_id TEXT NOT NULL,
  difficulty INTEGER NOT NULL CHECK (difficulty BETWEEN 1 AND 5),
  xp_reward INTEGER NOT NULL,
  credit_reward INTEGER NOT NULL,
  has_trap INTEGER NOT NULL,
  alarm_chance REAL NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS missions (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  location_id TEXT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
  giver_id TEXT NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
  title TEXT NOT NULL,
  description TEXT NOT NULL,
  mission_type TEXT NOT NULL,
  difficulty INTEGER NOT NULL CHECK (difficulty BETWEEN 1 AND 5),
  reward_credits INTEGER NOT NULL,
  reward_reputation INTEGER NOT NULL,
  is_main_quest INTEGER NOT NULL,
  is_repeatable INTEGER NOT NULL,
  is_hidden INTEGER NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS objectives (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  mission_id TEXT NOT NULL REFERENCES missions(id) ON DELETE CASCADE,
  title TEXT NOT NULL,
  description TEXT NOT NULL,
  objective_type TEXT NOT NULL,
  target_count INTEGER NOT NULL,
  is_optional INTEGER NOT NULL,
  order_index INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS story_elements (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  element_type TEXT NOT NULL,
  title TEXT NOT NULL,
  content TEXT NOT NULL,
  location_id TEXT REFERENCES locations(id) ON DELETE SET NULL,
  character_id TEXT REFERENCES characters(id) ON DELETE SET NULL,
  mission_id TEXT REFERENCES missions(id) ON DELETE SET NULL,
  is_revealed INTEGER NOT NULL,
  reveal_condition TEXT,
  order_index INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS hardware_items (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  hardware_type TEXT NOT NULL,
  quality TEXT NOT NULL,
  rarity TEXT NOT NULL,
  level INTEGER NOT NULL,
  price INTEGER NOT NULL,
  location_type TEXT NOT NULL,
  location_id TEXT NOT NULL,
  is_installed INTEGER NOT NULL,
  stats TEXT NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS consumable_items (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  item_type TEXT NOT NULL,
  rarity TEXT NOT NULL,
  uses INTEGER NOT NULL,
  price INTEGER NOT NULL,
  location_type TEXT NOT NULL,
  location_id TEXT NOT NULL,
  effects TEXT NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS armor_items (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  category TEXT NOT NULL,
  armor_type TEXT NOT NULL,
  slot TEXT NOT NULL,
  manufacturer TEXT NOT NULL,
  rarity TEXT NOT NULL,
  level INTEGER NOT NULL,
  defense INTEGER NOT NULL,
  weight REAL NOT NULL,
  price INTEGER NOT NULL,
  location_type TEXT NOT NULL,
  location_id TEXT NOT NULL,
  resistances TEXT NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS software_items (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  software_type TEXT NOT NULL,
  developer TEXT NOT NULL,
  version TEXT NOT NULL,
  license_type TEXT NOT NULL,
  rarity TEXT NOT NULL,
  level INTEGER NOT NULL,
  price INTEGER NOT NULL,
  is_malware INTEGER NOT NULL,
  location_type TEXT NOT NULL,
  location_id TEXT NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shops (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  location_id TEXT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
  building_id TEXT REFERENCES buildings(id) ON DELETE SET NULL,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  shop_type TEXT NOT NULL,
  reputation INTEGER NOT NULL,
  price_modifier REAL NOT NULL,
  is_legal INTEGER NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shop_inventory (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  shop_id TEXT NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
  item_type TEXT NOT NULL,
  item_id TEXT NOT NULL,
  quantity INTEGER NOT NULL,
  price INTEGER NOT NULL,
  price_modifier REAL NOT NULL,
  is_featured INTEGER NOT NULL,
  is_limited_time INTEGER NOT NULL,
  expiry_days INTEGER
);
"#;

const MIGRATION_V2: &str = r#"
CREATE INDEX IF NOT EXISTS idx_locations_world ON locations(world_id);
CREATE INDEX IF NOT EXISTS idx_locations_parent ON locations(parent_location_id);
CREATE INDEX IF NOT EXISTS idx_connections_world ON location_connections(world_id);
CREATE INDEX IF NOT EXISTS idx_buildings_location ON buildings(location_id);
CREATE INDEX IF NOT EXISTS idx_rooms_building ON rooms(building_id);
CREATE INDEX IF NOT EXISTS idx_characters_world ON characters(world_id);
CREATE INDEX IF NOT EXISTS idx_devices_world ON devices(world_id);
CREATE INDEX IF NOT EXISTS idx_networks_building ON networks(building_id);
CREATE INDEX IF NOT EXISTS idx_files_device ON files(device_id);
CREATE INDEX IF NOT EXISTS idx_puzzles_target ON hacking_puzzles(target_type, target_id);
CREATE INDEX IF NOT EXISTS idx_missions_world ON missions(world_id);
CREATE INDEX IF NOT EXISTS idx_objectives_mission ON objectives(mission_id, order_index);
CREATE INDEX IF NOT EXISTS idx_story_world ON story_elements(world_id);
CREATE INDEX IF NOT EXISTS idx_hardware_world ON hardware_items(world_id);
CREATE INDEX IF NOT EXISTS idx_consumables_world ON consumable_items(world_id);
CREATE INDEX IF NOT EXISTS idx_armor_world ON armor_items(world_id);
CREATE INDEX IF NOT EXISTS idx_software_world ON software_items(world_id);
CREATE INDEX IF NOT EXISTS idx_shops_world ON shops(world_id);
CREATE INDEX IF NOT EXISTS idx_inventory_shop ON shop_inventory(shop_id);
"#;

const MIGRATION_V3: &str = r#"
CREATE TABLE IF NOT EXISTS weapon_items (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  category TEXT NOT NULL,
  weapon_type TEXT NOT NULL,
  manufacturer TEXT NOT NULL,
  damage INTEGER NOT NULL,
  accuracy INTEGER NOT NULL CHECK (accuracy BETWEEN 0 AND 100),
  weapon_range INTEGER NOT NULL,
  rarity TEXT NOT NULL,
  level INTEGER NOT NULL,
  price INTEGER NOT NULL,
  is_legal INTEGER NOT NULL,
  location_type TEXT NOT NULL,
  location_id TEXT NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS implant_items (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  implant_type TEXT NOT NULL,
  manufacturer TEXT NOT NULL,
  rarity TEXT NOT NULL,
  level INTEGER NOT NULL,
  price INTEGER NOT NULL,
  humanity_cost INTEGER NOT NULL,
  surgery_difficulty INTEGER NOT NULL CHECK (surgery_difficulty BETWEEN 1 AND 10),
  stats_bonus TEXT NOT NULL,
  special_effects TEXT NOT NULL,
  is_legal INTEGER NOT NULL,
  location_type TEXT NOT NULL,
  location_id TEXT NOT NULL,
  metadata TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vulnerabilities (
  id TEXT PRIMARY KEY,
  world_id TEXT NOT NULL REFERENCES worlds(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  description TEXT NOT NULL,
  vuln_type TEXT NOT NULL,
  code_name TEXT NOT NULL,
  target_type TEXT NOT NULL CHECK (target_type IN ('device', 'network')),
  target_id TEXT NOT NULL,
  difficulty INTEGER NOT NULL CHECK (difficulty BETWEEN 1 AND 10),
  impact INTEGER NOT NULL CHECK (impact BETWEEN 1 AND 10),
  rarity TEXT NOT NULL,
  is_public INTEGER NOT NULL,
  is_patched INTEGER NOT NULL,
  discovery_date TEXT NOT NULL,
  exploits TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_weapons_world ON weapon_items(world_id);
CREATE INDEX IF NOT EXISTS idx_implants_world ON implant_items(world_id);
CREATE INDEX IF NOT EXISTS idx_vulnerabilities_target ON vulnerabilities(target_type, target_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_strictly_increasing() {
        for pair in MIGRATIONS.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
        assert_eq!(latest_version(), 3);
    }
}
