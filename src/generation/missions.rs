use tracing::{debug, warn};

use crate::generation::rng::WorldRng;
use crate::model::{
    CharacterId, FailureConsequence, LocationId, Mission, MissionId, MissionMetadata,
    MissionType, Objective, ObjectiveId, ObjectiveType, WorldId,
};
use crate::world::{WorldDbError, WorldStore};

const MAIN_QUEST_CHANCE: f64 = 0.2;
const REPEATABLE_CHANCE: f64 = 0.1;
const HIDDEN_CHANCE: f64 = 0.15;
const OPTIONAL_OBJECTIVE_CHANCE: f64 = 0.2;

fn title_parts(mission_type: MissionType) -> (&'static [&'static str], &'static [&'static str]) {
    match mission_type {
        MissionType::Infiltration => (
            &["Infiltration of", "Breach of", "Penetration of"],
            &["the system", "the building", "the secure zone"],
        ),
        MissionType::Retrieval => (
            &["Retrieval of", "Extraction of", "Recovery of"],
            &["the data", "the prototype", "the hostage"],
        ),
        MissionType::Hacking => (
            &["Hack of", "Intrusion into", "Bypass of"],
            &["the database", "the network", "the server"],
        ),
        MissionType::Protection => (
            &["Protection of", "Defense of", "Securing"],
            &["the VIP", "the data", "the convoy"],
        ),
        MissionType::Delivery => (
            &["Delivery of", "Transport of", "Transfer of"],
            &["the package", "the intel", "the prototype"],
        ),
        MissionType::Elimination => (
            &["Neutralization of", "Elimination of", "Removal of"],
            &["the target", "the witness", "the threat"],
        ),
        MissionType::Sabotage => (
            &["Sabotage of", "Destruction of", "Disruption of"],
            &["the infrastructure", "the system", "the production line"],
        ),
        MissionType::Espionage => (
            &["Espionage on", "Surveillance of", "Observation of"],
            &["the meeting", "the communications", "the operations"],
        ),
        MissionType::Escort => (
            &["Escort of", "Safe passage for", "Protection of"],
            &["the VIP", "the convoy", "the witness"],
        ),
        MissionType::Investigation => (
            &["Inquiry into", "Investigation into", "Search into"],
            &["the disappearance", "the murder", "the theft"],
        ),
    }
}

fn mission_description(mission_type: MissionType) -> &'static str {
    match mission_type {
        MissionType::Infiltration => "Slip into a high-security site to reach an objective.",
        MissionType::Retrieval => "Recover an item or data and bring it back to your contact.",
        MissionType::Hacking => "Break into a computer system to extract or alter data.",
        MissionType::Protection => "Keep a target safe from incoming threats.",
        MissionType::Delivery => "Deliver a package or information to a specific recipient.",
        MissionType::Elimination => "Take out a specific target, quietly or not.",
        MissionType::Sabotage => "Sabotage equipment or infrastructure to disrupt operations.",
        MissionType::Espionage => "Spy on a target to gather sensitive information.",
        MissionType::Escort => "Escort a person or convoy safely to its destination.",
        MissionType::Investigation => "Look into a mysterious event and uncover the truth.",
    }
}

/// Objective titles per mission type; objective `i` uses entry `i % len`.
pub fn objective_templates(mission_type: MissionType) -> &'static [&'static str] {
    match mission_type {
        MissionType::Infiltration => &["Reach the area", "Find a way in", "Avoid the guards"],
        MissionType::Retrieval => &["Locate the target", "Grab the item", "Escape with the item"],
        MissionType::Hacking => &[
            "Find an access point",
            "Bypass the firewall",
            "Extract the data",
        ],
        MissionType::Protection => &[
            "Eliminate the threats",
            "Secure the perimeter",
            "Escort the target",
        ],
        MissionType::Delivery => &[
            "Pick up the package",
            "Avoid the ambushes",
            "Deliver the package",
        ],
        MissionType::Elimination => &[
            "Locate the target",
            "Eliminate the target",
            "Erase the evidence",
        ],
        MissionType::Sabotage => &[
            "Access the system",
            "Plant the virus",
            "Slip away unseen",
        ],
        MissionType::Espionage => &[
            "Watch the target",
            "Record the conversation",
            "Transmit the intel",
        ],
        MissionType::Escort => &[
            "Meet the target",
            "Protect them on the way",
            "Reach the destination",
        ],
        MissionType::Investigation => &[
            "Question the witnesses",
            "Gather evidence",
            "Identify the culprit",
        ],
    }
}

pub fn build_mission(
    world_id: WorldId,
    giver_id: CharacterId,
    location_id: LocationId,
    rng: &mut WorldRng,
) -> Mission {
    let mission_type = *rng.pick(MissionType::ALL);
    let (prefixes, objects) = title_parts(mission_type);
    let title = format!("{} {}", rng.pick(prefixes), rng.pick(objects));
    let difficulty = rng.range(1..=5);
    let reward_credits = rng.range(100..=10_000);
    let reward_items = rng.range(0..=3);
    let reward_reputation = rng.range(1..=10);
    let is_main_quest = rng.chance(MAIN_QUEST_CHANCE);
    let is_repeatable = rng.chance(REPEATABLE_CHANCE);
    let is_hidden = rng.chance(HIDDEN_CHANCE);
    let time_limit_hours = rng.chance(0.3).then(|| rng.range(1..=72));
    let failure_consequence = if rng.chance(0.5) {
        Some(*rng.pick(FailureConsequence::ALL))
    } else {
        None
    };
    let alternate_endings = if rng.chance(0.2) { rng.range(1..=3) } else { 1 };

    Mission {
        id: MissionId(rng.next_uuid()),
        world_id,
        location_id,
        giver_id,
        title,
        description: mission_description(mission_type).to_string(),
        mission_type,
        difficulty,
        reward_credits,
        reward_reputation,
        is_main_quest,
        is_repeatable,
        is_hidden,
        metadata: MissionMetadata {
            time_limit_hours,
            failure_consequence,
            alternate_endings,
            reward_items,
        },
    }
}

pub fn build_objectives(mission: &Mission, rng: &mut WorldRng) -> Vec<Objective> {
    let templates = objective_templates(mission.mission_type);
    let count: u32 = rng.range(1..=5);
    (0..count)
        .map(|i| {
            let title = templates[i as usize % templates.len()];
            Objective {
                id: ObjectiveId(rng.next_uuid()),
                world_id: mission.world_id,
                mission_id: mission.id,
                title: title.to_string(),
                description: format!("Objective {} of {}: {}", i + 1, mission.title, title),
                objective_type: *rng.pick(ObjectiveType::ALL),
                target_count: rng.range(1..=5),
                is_optional: rng.chance(OPTIONAL_OBJECTIVE_CHANCE),
                order_index: i,
            }
        })
        .collect()
}

/// Missions with their ordered objectives. Needs at least one character to
/// hand them out and one location to stage them.
pub fn generate_missions(
    store: &dyn WorldStore,
    world_id: WorldId,
    location_ids: &[LocationId],
    character_ids: &[CharacterId],
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<MissionId>, WorldDbError> {
    if character_ids.is_empty() || location_ids.is_empty() {
        warn!(
            characters = character_ids.len(),
            locations = location_ids.len(),
            "missions need a giver and a location, generating none"
        );
        return Ok(Vec::new());
    }

    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let (Some(&giver_id), Some(&location_id)) =
            (rng.choose(character_ids), rng.choose(location_ids))
        else {
            break;
        };
        let mission = build_mission(world_id, giver_id, location_id, rng);
        store.insert_mission(&mission)?;
        let objectives = build_objectives(&mission, rng);
        for objective in &objectives {
            store.insert_objective(objective)?;
        }
        debug!(
            title = %mission.title,
            objectives = objectives.len(),
            "generated mission"
        );
        ids.push(mission.id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn mission(rng: &mut WorldRng) -> Mission {
        build_mission(
            WorldId(Uuid::from_u128(1)),
            CharacterId(Uuid::from_u128(2)),
            LocationId(Uuid::from_u128(3)),
            rng,
        )
    }

    #[test]
    fn objectives_wrap_templates_in_order() {
        let mut rng = WorldRng::new(Some(33));
        for _ in 0..30 {
            let mission = mission(&mut rng);
            let templates = objective_templates(mission.mission_type);
            let objectives = build_objectives(&mission, &mut rng);
            assert!((1..=5).contains(&objectives.len()));
            for (i, objective) in objectives.iter().enumerate() {
                assert_eq!(objective.order_index as usize, i);
                assert_eq!(objective.title, templates[i % templates.len()]);
                assert_eq!(objective.mission_id, mission.id);
                assert!((1..=5).contains(&objective.target_count));
            }
        }
    }

    #[test]
    fn rewards_and_difficulty_in_range() {
        let mut rng = WorldRng::new(Some(8));
        for _ in 0..50 {
            let mission = mission(&mut rng);
            assert!((1..=5).contains(&mission.difficulty));
            assert!((100..=10_000).contains(&mission.reward_credits));
            assert!((1..=10).contains(&mission.reward_reputation));
            assert!((1..=3).contains(&mission.metadata.alternate_endings));
        }
    }

    #[test]
    fn every_mission_type_has_titles_and_objectives() {
        for mission_type in MissionType::ALL {
            let (prefixes, objects) = title_parts(*mission_type);
            assert!(!prefixes.is_empty() && !objects.is_empty());
            assert!(!objective_templates(*mission_type).is_empty());
        }
    }
}
