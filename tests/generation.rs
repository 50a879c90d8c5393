use neon_worldgen::config::CountOverrides;
use neon_worldgen::model::{RevealCondition, ShopType, WorldId};
use neon_worldgen::world::WORLD_TABLES;
use neon_worldgen::{generate_world, GenerationError, WorldConfig, WorldDb};
use rusqlite::Connection;

fn small_config(seed: u64) -> WorldConfig {
    WorldConfig::new(1).with_seed(seed)
}

fn generated(seed: u64) -> (WorldDb, WorldId) {
    let mut db = WorldDb::open_in_memory().unwrap();
    let world = generate_world(&mut db, &small_config(seed)).unwrap();
    (db, world.world_id)
}

fn scalar(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

/// Every column of every world-scoped row, rendered as text and sorted, so
/// two databases can be compared without caring about insertion order.
fn dump(db: &WorldDb) -> Vec<String> {
    let conn = db.connection();
    let mut tables = vec!["worlds"];
    tables.extend_from_slice(WORLD_TABLES);
    let mut rows = Vec::new();
    for table in tables {
        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", table)).unwrap();
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let mut query = stmt.query([]).unwrap();
        while let Some(row) = query.next().unwrap() {
            let mut fields = vec![table.to_string()];
            for (index, column) in columns.iter().enumerate() {
                if column == "created_at" {
                    continue;
                }
                let value: rusqlite::types::Value = row.get(index).unwrap();
                fields.push(format!("{}={:?}", column, value));
            }
            rows.push(fields.join("|"));
        }
    }
    rows.sort();
    rows
}

#[test]
fn same_seed_produces_identical_worlds() {
    let (first, first_id) = generated(1234);
    let (second, second_id) = generated(1234);
    assert_eq!(first_id, second_id);
    assert_eq!(dump(&first), dump(&second));
}

#[test]
fn different_seeds_diverge() {
    let (first, _) = generated(1);
    let (second, _) = generated(2);
    assert_ne!(dump(&first), dump(&second));
}

#[test]
fn complexity_one_counts_are_written() {
    let (db, world_id) = generated(7);
    let count = |table: &str| db.table_count(table, world_id).unwrap();
    assert_eq!(count("worlds"), 1);
    // two cities with two districts each, no special locations
    assert_eq!(count("locations"), 6);
    assert_eq!(count("characters"), 15);
    assert_eq!(count("devices"), 25);
    assert_eq!(count("missions"), 5);
    assert_eq!(count("story_elements"), 3);
    assert_eq!(count("hardware_items"), 10);
    assert_eq!(count("consumable_items"), 10);
    assert_eq!(count("armor_items"), 6);
    assert_eq!(count("software_items"), 12);
    assert_eq!(count("weapon_items"), 6);
    assert_eq!(count("implant_items"), 4);
    assert_eq!(count("vulnerabilities"), 5);
    assert_eq!(count("shops"), 10);
    assert!(count("shop_inventory") > 0);
    assert!(count("buildings") > 0);
    assert!(count("location_connections") > 0);
}

#[test]
fn count_overrides_take_precedence() {
    let mut db = WorldDb::open_in_memory().unwrap();
    let mut config = small_config(3);
    config.counts = CountOverrides {
        characters: Some(4),
        shops: Some(0),
        ..CountOverrides::default()
    };
    let world = generate_world(&mut db, &config).unwrap();
    assert_eq!(db.table_count("characters", world.world_id).unwrap(), 4);
    assert_eq!(db.table_count("shops", world.world_id).unwrap(), 0);
    assert_eq!(db.table_count("shop_inventory", world.world_id).unwrap(), 0);
}

#[test]
fn foreign_keys_hold_after_generation() {
    let (db, _) = generated(99);
    let conn = db.connection();
    let mut stmt = conn.prepare("PRAGMA foreign_key_check").unwrap();
    let violations = stmt.query_map([], |_| Ok(())).unwrap().count();
    assert_eq!(violations, 0);
}

#[test]
fn polymorphic_references_resolve() {
    let (db, _) = generated(11);
    let conn = db.connection();
    let dangling_puzzles = scalar(
        conn,
        "SELECT COUNT(*) FROM hacking_puzzles p WHERE
           (p.target_type = 'device' AND NOT EXISTS (SELECT 1 FROM devices d WHERE d.id = p.target_id))
        OR (p.target_type = 'network' AND NOT EXISTS (SELECT 1 FROM networks n WHERE n.id = p.target_id))",
    );
    assert_eq!(dangling_puzzles, 0);

    let dangling_vulnerabilities = scalar(
        conn,
        "SELECT COUNT(*) FROM vulnerabilities v WHERE
           (v.target_type = 'device' AND NOT EXISTS (SELECT 1 FROM devices d WHERE d.id = v.target_id AND d.world_id = v.world_id))
        OR (v.target_type = 'network' AND NOT EXISTS (SELECT 1 FROM networks n WHERE n.id = v.target_id AND n.world_id = v.world_id))",
    );
    assert_eq!(dangling_vulnerabilities, 0);

    for table in [
        "hardware_items",
        "consumable_items",
        "armor_items",
        "software_items",
        "weapon_items",
        "implant_items",
    ] {
        let dangling = scalar(
            conn,
            &format!(
                "SELECT COUNT(*) FROM {t} i WHERE
                   (i.location_type = 'device' AND NOT EXISTS (SELECT 1 FROM devices d WHERE d.id = i.location_id))
                OR (i.location_type IN ('building', 'shop') AND NOT EXISTS (SELECT 1 FROM buildings b WHERE b.id = i.location_id))
                OR (i.location_type = 'character' AND NOT EXISTS (SELECT 1 FROM characters c WHERE c.id = i.location_id))
                OR (i.location_type = 'world' AND i.location_id <> 'world')",
                t = table
            ),
        );
        assert_eq!(dangling, 0, "{} has dangling placements", table);
    }

    let dangling_stock = scalar(
        conn,
        "SELECT COUNT(*) FROM shop_inventory s WHERE NOT EXISTS (
           SELECT 1 FROM hardware_items WHERE id = s.item_id AND s.item_type = 'hardware'
           UNION ALL SELECT 1 FROM consumable_items WHERE id = s.item_id AND s.item_type = 'consumable'
           UNION ALL SELECT 1 FROM armor_items WHERE id = s.item_id AND s.item_type = 'armor'
           UNION ALL SELECT 1 FROM software_items WHERE id = s.item_id AND s.item_type = 'software'
           UNION ALL SELECT 1 FROM weapon_items WHERE id = s.item_id AND s.item_type = 'weapon'
           UNION ALL SELECT 1 FROM implant_items WHERE id = s.item_id AND s.item_type = 'implant')",
    );
    assert_eq!(dangling_stock, 0);
}

#[test]
fn specialist_shops_only_list_their_own_kinds() {
    let mut db = WorldDb::open_in_memory().unwrap();
    let mut config = WorldConfig::new(3).with_seed(44);
    config.shop_types = vec![ShopType::Weapons, ShopType::Cybernetics];
    let world_id = generate_world(&mut db, &config).unwrap().world_id;
    let conn = db.connection();
    let misplaced = scalar(
        conn,
        "SELECT COUNT(*) FROM shop_inventory i JOIN shops s ON s.id = i.shop_id WHERE
           (s.shop_type = 'weapons' AND i.item_type <> 'weapon')
        OR (s.shop_type = 'cybernetics' AND i.item_type NOT IN ('implant', 'hardware'))",
    );
    assert_eq!(misplaced, 0);
    assert!(db.table_count("shop_inventory", world_id).unwrap() > 0);
    let weapon_listings = scalar(
        conn,
        "SELECT COUNT(*) FROM shop_inventory WHERE item_type = 'weapon'",
    );
    assert!(weapon_listings > 0);
}

#[test]
fn shop_stock_is_unique_per_shop() {
    let (db, _) = generated(21);
    let duplicates = scalar(
        db.connection(),
        "SELECT COUNT(*) FROM (SELECT shop_id, item_id FROM shop_inventory
           GROUP BY shop_id, item_id HAVING COUNT(*) > 1)",
    );
    assert_eq!(duplicates, 0);
}

#[test]
fn missions_have_givers_and_objectives() {
    let (db, _) = generated(5);
    let conn = db.connection();
    let without_objectives = scalar(
        conn,
        "SELECT COUNT(*) FROM missions m
         WHERE NOT EXISTS (SELECT 1 FROM objectives o WHERE o.mission_id = m.id)",
    );
    assert_eq!(without_objectives, 0);
    let bad_order = scalar(
        conn,
        "SELECT COUNT(*) FROM (SELECT mission_id, MIN(order_index) AS first FROM objectives
           GROUP BY mission_id) WHERE first <> 0",
    );
    assert_eq!(bad_order, 0);
}

#[test]
fn hidden_story_elements_carry_a_reveal_condition() {
    let (db, _) = generated(8);
    let mismatched = scalar(
        db.connection(),
        "SELECT COUNT(*) FROM story_elements
         WHERE (is_revealed = 1) <> (reveal_condition IS NULL)",
    );
    assert_eq!(mismatched, 0);
}

#[test]
fn reveal_conditions_point_at_rows_of_the_same_world() {
    let mut db = WorldDb::open_in_memory().unwrap();
    let mut config = small_config(8);
    config.counts = CountOverrides {
        story_elements: Some(40),
        ..CountOverrides::default()
    };
    let world_id = generate_world(&mut db, &config).unwrap().world_id;
    let conn = db.connection();
    let mut stmt = conn
        .prepare("SELECT reveal_condition FROM story_elements WHERE is_revealed = 0")
        .unwrap();
    let conditions: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .map(Result::unwrap)
        .collect();
    assert!(!conditions.is_empty());

    let exists = |table: &str, id: String| {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE id = ?1 AND world_id = ?2",
            table
        );
        conn.query_row(&sql, rusqlite::params![id, world_id.to_string()], |row| {
            row.get::<_, i64>(0)
        })
        .unwrap()
            == 1
    };
    for text in conditions {
        let resolved = match text.parse::<RevealCondition>().unwrap() {
            RevealCondition::CompleteMission(id) => exists("missions", id.to_string()),
            RevealCondition::VisitLocation(id) => exists("locations", id.to_string()),
            RevealCondition::MeetCharacter(id) => exists("characters", id.to_string()),
            RevealCondition::PlayerLevel(level) => (5..=20).contains(&level),
        };
        assert!(resolved, "reveal condition {} has no target", text);
    }
}

#[test]
fn virtual_locations_have_no_buildings() {
    let mut db = WorldDb::open_in_memory().unwrap();
    let world = generate_world(&mut db, &WorldConfig::new(5).with_seed(17)).unwrap();
    let in_virtual = scalar(
        db.connection(),
        &format!(
            "SELECT COUNT(*) FROM buildings b JOIN locations l ON l.id = b.location_id
             WHERE l.is_virtual = 1 AND b.world_id = '{}'",
            world.world_id
        ),
    );
    assert_eq!(in_virtual, 0);
}

#[test]
fn failed_stage_rolls_back_the_whole_world() {
    let mut db = WorldDb::open_in_memory().unwrap();
    // Any device insert now violates a constraint halfway through the run.
    db.connection()
        .execute_batch(
            "CREATE TRIGGER reject_devices BEFORE INSERT ON devices
             BEGIN SELECT RAISE(ABORT, 'devices rejected'); END;",
        )
        .unwrap();
    let err = generate_world(&mut db, &small_config(4)).unwrap_err();
    match err {
        GenerationError::Stage { stage, .. } => assert_eq!(stage, "devices"),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(db.world_ids().unwrap().is_empty());
    assert_eq!(scalar(db.connection(), "SELECT COUNT(*) FROM locations"), 0);
}

#[test]
fn deleting_a_world_cascades() {
    let (mut db, world_id) = generated(31);
    let other_id = generate_world(&mut db, &small_config(32)).unwrap().world_id;
    assert!(db.delete_world(world_id).unwrap());
    for table in WORLD_TABLES {
        assert_eq!(db.table_count(table, world_id).unwrap(), 0, "{} kept rows", table);
    }
    assert_eq!(db.table_count("worlds", other_id).unwrap(), 1);
    assert!(db.table_count("locations", other_id).unwrap() > 0);
    assert!(!db.delete_world(world_id).unwrap());
}

#[test]
fn worlds_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.db");
    let world_id = {
        let mut db = WorldDb::open(&path).unwrap();
        generate_world(&mut db, &small_config(64)).unwrap().world_id
    };
    let db = WorldDb::open(&path).unwrap();
    let world = db.world(world_id).unwrap().unwrap();
    assert_eq!(world.metadata.seed, 64);
    assert_eq!(world.complexity, 1);
    assert_eq!(db.world_ids().unwrap(), vec![world_id]);
}
