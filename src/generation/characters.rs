use tracing::{debug, warn};

use crate::content::names::random_full_name;
use crate::generation::rng::WorldRng;
use crate::model::{
    Character, CharacterId, CharacterMetadata, CombatProfile, EnemyType, Gender, Location,
    LocationId, Profession, Resistances, Skills, WorldId,
};
use crate::world::{WorldDbError, WorldStore};

pub const FACTION_NAMES: &[&str] = &[
    "NetRunners",
    "Corporate Security",
    "Street Gangs",
    "Hacktivists",
    "Black Market",
    "Government Agents",
    "Mercenaries",
    "AI Collective",
    "Resistance",
    "Cyber Cultists",
    "Tech Nomads",
    "Data Pirates",
];

const ENEMY_WEIGHTS: &[(EnemyType, u32)] = &[
    (EnemyType::Human, 40),
    (EnemyType::Guard, 20),
    (EnemyType::Cyborg, 15),
    (EnemyType::Drone, 10),
    (EnemyType::Robot, 5),
    (EnemyType::Netrunner, 5),
    (EnemyType::Militech, 3),
    (EnemyType::Beast, 2),
];

const HOSTILE_CHANCE: f64 = 0.3;
const PROFESSION_ENEMY_CHANCE: f64 = 0.7;
const QUEST_GIVER_CHANCE: f64 = 0.2;
const VENDOR_CHANCE: f64 = 0.15;

const SPECIAL_ABILITIES: &[&str] = &[
    "regeneration",
    "emp_burst",
    "stealth",
    "turret_hack",
    "adrenaline",
    "combat_drugs",
    "poison_attack",
    "fire_attack",
    "shock_attack",
    "freeze_attack",
    "nanite_injection",
];

const BACKGROUNDS: &[&str] = &[
    "Former soldier who drifted into civilian work.",
    "Grew up in the gutters and made a name by force.",
    "Graduated from a prestigious university, then chose an unconventional path.",
    "Ex-corporate employee who switched sides after learning the truth.",
    "Self-taught on the streets of the city.",
    "Born into an influential family and walked away from the inheritance.",
];

const MOTIVATIONS: &[&str] = &[
    "Chases wealth at any cost.",
    "Wants to change the system from the inside.",
    "Seeks revenge on a corporation.",
    "Protects the weak from the powerful.",
    "Pursues power and influence.",
    "Just trying to survive in a hostile world.",
];

const SECRETS: &[&str] = &[
    "Hides a secret identity.",
    "Works covertly for a rival faction.",
    "Holds compromising data on important people.",
    "Took part in a tragedy nobody knows about.",
    "Suffers from a rare disease and is desperate for a cure.",
    "Is actually an undercover agent.",
];

pub fn roll_skills(profession: Profession, combat_difficulty: u8, rng: &mut WorldRng) -> Skills {
    use Profession::*;

    let hacking = match profession {
        Hacker | SecuritySpecialist | Programmer | Engineer => rng.range(5..=10),
        CorporateExecutive | GovernmentAgent | PoliceOfficer => rng.range(2..=5),
        _ => rng.range(0..=3),
    };
    let combat_roll: i32 = match profession {
        Mercenary | PoliceOfficer => rng.range(5..=10),
        SecuritySpecialist | Smuggler | Fixer => rng.range(3..=7),
        _ => rng.range(0..=3),
    };
    let combat = (combat_roll + combat_difficulty as i32 - 3).clamp(0, 10) as u8;
    let charisma = match profession {
        Fixer | CorporateExecutive | InformationBroker | Journalist => rng.range(5..=10),
        _ => rng.range(1..=8),
    };
    let wealth = match profession {
        CorporateExecutive | InformationBroker => rng.range(5..=10),
        _ => rng.range(0..=6),
    };
    Skills {
        hacking,
        combat,
        charisma,
        wealth,
    }
}

pub fn enemy_type_for(profession: Profession, rng: &mut WorldRng) -> EnemyType {
    let drawn = rng.pick_weighted(ENEMY_WEIGHTS).unwrap_or(EnemyType::Human);
    let preferred = if profession.is_security() {
        Some(EnemyType::Guard)
    } else if profession == Profession::Mercenary {
        Some(EnemyType::Militech)
    } else if matches!(
        profession,
        Profession::Hacker | Profession::Programmer | Profession::Engineer
    ) {
        Some(EnemyType::Netrunner)
    } else {
        None
    };
    match preferred {
        Some(enemy) if rng.chance(PROFESSION_ENEMY_CHANCE) => enemy,
        _ => drawn,
    }
}

fn resistances(enemy_type: EnemyType, combat_difficulty: u8, rng: &mut WorldRng) -> Resistances {
    let modifier = (combat_difficulty as i32 - 3) * 5;
    let mut roll = |low: i32, high: i32| -> u8 {
        (rng.range(low..=high) + modifier).clamp(0, 100) as u8
    };
    let vulnerable = modifier.clamp(0, 100) as u8;
    let mut out = Resistances::default();
    match enemy_type {
        EnemyType::Human => {
            out.physical = roll(0, 10);
            out.cyber = roll(5, 15);
        }
        EnemyType::Guard => {
            out.physical = roll(10, 30);
            out.energy = roll(5, 15);
            out.emp = roll(0, 10);
        }
        EnemyType::Militech => {
            out.physical = roll(20, 50);
            out.energy = roll(15, 40);
            out.emp = roll(10, 20);
        }
        EnemyType::Netrunner => {
            out.physical = roll(0, 10);
            out.cyber = roll(30, 60);
            out.emp = roll(10, 30);
        }
        EnemyType::Cyborg => {
            out.physical = roll(15, 40);
            out.energy = roll(10, 30);
            out.cyber = roll(20, 40);
            out.emp = vulnerable;
        }
        EnemyType::Drone => {
            out.physical = roll(10, 25);
            out.energy = roll(5, 20);
            out.cyber = roll(15, 35);
            out.emp = vulnerable;
        }
        EnemyType::Robot => {
            out.physical = roll(30, 60);
            out.energy = roll(20, 45);
            out.cyber = roll(10, 30);
            out.emp = vulnerable;
        }
        EnemyType::Beast => {
            out.physical = roll(20, 40);
            out.biohazard = roll(30, 70);
            out.cyber = roll(0, 10);
        }
    }
    out
}

fn combat_styles(enemy_type: EnemyType) -> &'static [&'static str] {
    match enemy_type {
        EnemyType::Netrunner => &["ranged", "stealth", "support"],
        EnemyType::Militech => &["tank", "ranged", "melee"],
        EnemyType::Guard => &["balanced", "ranged", "tank"],
        EnemyType::Cyborg => &["melee", "tank", "balanced"],
        EnemyType::Drone => &["ranged", "balanced"],
        EnemyType::Robot => &["tank", "ranged"],
        EnemyType::Beast => &["melee", "tank"],
        EnemyType::Human => &["balanced", "melee", "ranged", "stealth", "support"],
    }
}

fn special_abilities(combat_difficulty: u8, rng: &mut WorldRng) -> Vec<String> {
    let d = combat_difficulty as f64;
    if !rng.chance(0.1 + 0.05 * d) {
        return Vec::new();
    }
    if rng.chance(0.05 + 0.02 * d) {
        rng.sample(SPECIAL_ABILITIES, 2)
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        vec![rng.pick(SPECIAL_ABILITIES).to_string()]
    }
}

/// Combat block scaled by the combat skill and the world's combat difficulty.
pub fn build_combat_profile(
    profession: Profession,
    combat_skill: u8,
    is_hostile: bool,
    combat_difficulty: u8,
    rng: &mut WorldRng,
) -> CombatProfile {
    let skill = combat_skill as f64;
    let d = combat_difficulty as f64;
    let multiplier = 0.8 + d * 0.1;

    let enemy_type = enemy_type_for(profession, rng);
    let health = ((50.0 + skill * 10.0) * multiplier) as u32 + rng.range(0..=50u32);
    let damage = ((5.0 + skill) * multiplier) as u32 + rng.range(0..=5u32);
    let accuracy =
        (0.5 + skill * 0.03 + (d - 3.0) * 0.02 + rng.range(0.0..0.1)).clamp(0.5, 0.9);
    let initiative = (3 + combat_skill as i32 / 2 + combat_difficulty as i32 - 3
        + rng.range(0..=3i32))
    .clamp(3, 10) as u8;
    let hostility = if is_hostile {
        rng.range(60..=100)
    } else {
        rng.range(0..=30)
    };
    let resistances = resistances(enemy_type, combat_difficulty, rng);
    let ai_behavior = if is_hostile {
        rng.pick_weighted(&[("offensive", 4), ("aggressive", 4), ("tactical", 2)])
            .unwrap_or("tactical")
    } else {
        rng.pick_weighted(&[("defensive", 4), ("cautious", 4), ("balanced", 2)])
            .unwrap_or("balanced")
    };
    let combat_style = rng.pick(combat_styles(enemy_type)).to_string();

    CombatProfile {
        enemy_type,
        health,
        damage,
        accuracy,
        initiative,
        hostility,
        resistances,
        ai_behavior: ai_behavior.to_string(),
        combat_style,
        special_abilities: special_abilities(combat_difficulty, rng),
    }
}

fn describe(character: &Character, location_name: &str) -> String {
    let skills = &character.skills;
    let mut text = format!(
        "{} is a {} working for {}.",
        character.name,
        character.profession.as_str().to_lowercase(),
        character.faction
    );
    if skills.hacking >= 8 {
        text.push_str(" Their hacking skills are legendary.");
    } else if skills.hacking >= 5 {
        text.push_str(" Solid with computers and intrusion.");
    }
    if skills.combat >= 8 {
        text.push_str(" A fearsome fighter few dare to challenge.");
    } else if skills.combat >= 5 {
        text.push_str(" Can hold their own and will use force if needed.");
    }
    if skills.charisma >= 8 {
        text.push_str(" Natural charm opens many doors.");
    }
    if skills.wealth >= 8 {
        text.push_str(" A considerable fortune buys access to the most exclusive circles.");
    } else if skills.wealth <= 2 {
        text.push_str(" Lives hand to mouth, always looking for a way to survive.");
    }
    if character.importance >= 4 {
        text.push_str(" An important figure in this world.");
    }
    text.push_str(&format!(" Usually found in {}.", location_name));
    text
}

pub fn build_character(
    world_id: WorldId,
    location: &Location,
    combat_difficulty: u8,
    rng: &mut WorldRng,
) -> Character {
    let gender = *rng.pick(Gender::ALL);
    let name = random_full_name(rng, gender);
    let profession = *rng.pick(Profession::ALL);
    let faction = rng.pick(FACTION_NAMES).to_string();
    let importance = rng.range(1..=5);
    let skills = roll_skills(profession, combat_difficulty, rng);
    let is_hostile = rng.chance(HOSTILE_CHANCE);
    let combat = build_combat_profile(profession, skills.combat, is_hostile, combat_difficulty, rng);
    let metadata = CharacterMetadata {
        background: rng.pick(BACKGROUNDS).to_string(),
        motivation: rng.pick(MOTIVATIONS).to_string(),
        secret: rng.pick(SECRETS).to_string(),
    };
    let is_quest_giver = rng.chance(QUEST_GIVER_CHANCE);
    let is_vendor = rng.chance(VENDOR_CHANCE);

    let mut character = Character {
        id: CharacterId(rng.next_uuid()),
        world_id,
        location_id: location.id,
        name,
        gender,
        profession,
        faction,
        description: String::new(),
        importance,
        skills,
        is_hostile,
        is_quest_giver,
        is_vendor,
        combat,
        metadata,
    };
    character.description = describe(&character, &location.name);
    character
}

/// Characters spread over the readable locations.
pub fn generate_characters(
    store: &dyn WorldStore,
    world_id: WorldId,
    location_ids: &[LocationId],
    count: usize,
    combat_difficulty: u8,
    rng: &mut WorldRng,
) -> Result<Vec<CharacterId>, WorldDbError> {
    let mut locations = Vec::with_capacity(location_ids.len());
    for id in location_ids {
        match store.location(*id)? {
            Some(location) => locations.push(location),
            None => warn!(location_id = %id, "location not found, nobody will live there"),
        }
    }
    if locations.is_empty() {
        warn!(count, "no locations to place characters in");
        return Ok(Vec::new());
    }

    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(location) = rng.choose(&locations) else {
            break;
        };
        let character = build_character(world_id, location, combat_difficulty, rng);
        store.insert_character(&character)?;
        debug!(
            name = %character.name,
            profession = %character.profession,
            enemy_type = %character.combat.enemy_type,
            "generated character"
        );
        ids.push(character.id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_stay_on_scale() {
        let mut rng = WorldRng::new(Some(9));
        for profession in Profession::ALL {
            for difficulty in 1..=5 {
                let skills = roll_skills(*profession, difficulty, &mut rng);
                assert!(skills.hacking <= 10);
                assert!(skills.combat <= 10);
                assert!((1..=10).contains(&skills.charisma));
                assert!(skills.wealth <= 10);
            }
        }
    }

    #[test]
    fn combat_block_respects_bounds() {
        let mut rng = WorldRng::new(Some(40));
        for _ in 0..100 {
            let profile = build_combat_profile(Profession::Mercenary, 10, true, 5, &mut rng);
            assert!((0.5..=0.9).contains(&profile.accuracy));
            assert!((3..=10).contains(&profile.initiative));
            assert!(profile.hostility >= 60);
            assert!(profile.special_abilities.len() <= 2);
            assert!(combat_styles(profile.enemy_type).contains(&profile.combat_style.as_str()));
            let r = profile.resistances;
            for value in [r.physical, r.energy, r.emp, r.biohazard, r.cyber, r.viral, r.nanite] {
                assert!(value <= 100);
            }
        }
    }

    #[test]
    fn security_professions_lean_towards_guards() {
        let mut rng = WorldRng::new(Some(77));
        let guards = (0..400)
            .filter(|_| enemy_type_for(Profession::PoliceOfficer, &mut rng) == EnemyType::Guard)
            .count();
        assert!(guards > 250, "only {} guards", guards);
    }

    #[test]
    fn every_enemy_type_has_combat_styles() {
        for enemy_type in EnemyType::ALL {
            assert!(!combat_styles(*enemy_type).is_empty(), "{}", enemy_type);
        }
    }
}
