use tracing::{debug, warn};

use crate::generation::rng::WorldRng;
use crate::model::{
    CharacterId, CharacterRef, Location, LocationId, MissionId, MissionRef, RevealCondition,
    StoryElement, StoryElementId, StoryElementType, WorldId,
};
use crate::world::{WorldDbError, WorldStore};

const LOCATION_REF_CHANCE: f64 = 0.7;
const CHARACTER_REF_CHANCE: f64 = 0.5;
const MISSION_REF_CHANCE: f64 = 0.3;
const REVEALED_CHANCE: f64 = 0.6;

const GENERIC_SUBJECTS: &[&str] = &[
    "the City",
    "the Region",
    "the Era",
    "the Technology",
    "the Corporation",
];

fn title_prefixes(element_type: StoryElementType) -> &'static [&'static str] {
    use StoryElementType::*;
    match element_type {
        Background => &["History of", "Origins of", "The Past of"],
        Event => &["The Incident at", "The Event of", "The Catastrophe of"],
        Lore => &["Myths of", "Legends of", "Traditions of"],
        CharacterStory => &["The Story of", "The Past of", "Secrets of"],
        LocationHistory => &["History of", "Founding of", "Evolution of"],
        FactionInfo => &["Ideology of", "Structure of", "Goals of"],
        Technology => &["Development of", "Innovation in", "Advances in"],
        Mystery => &["The Mystery of", "The Enigma of", "The Secret of"],
        Rumor => &["Rumors about", "Word on", "Whispers about"],
        Legend => &["The Legend of", "The Myth of", "The Tale of"],
    }
}

fn content_templates(element_type: StoryElementType) -> &'static [&'static str] {
    use StoryElementType::*;
    match element_type {
        Background => &[
            "Long ago this region was known for its abundant natural resources.",
            "Before the great collapse this place was a thriving tech hub.",
            "The origins of this zone date back to the first orbital colonies.",
        ],
        Event => &[
            "A major incident happened here a few years ago and changed the local balance forever.",
            "The great blackout of 2077 paralysed every system for weeks.",
            "The attack on the central grid exposed critical flaws in the infrastructure.",
        ],
        Lore => &[
            "The elders say strange creatures once lived here.",
            "Local tradition holds that whoever controls information controls the world.",
            "Legends speak of a data treasure buried deep in the net.",
        ],
        CharacterStory => &[
            "Born in the gutters, this person climbed the ladder on raw intelligence.",
            "A former security agent who switched sides after learning the truth.",
            "Mysterious and solitary, few know who this individual really is.",
        ],
        LocationHistory => &[
            "Once a simple outpost, this place grew into a nerve centre.",
            "Built on the ruins of an old megacity, it still hides buried secrets.",
            "This quarter changed hands many times during the corporate wars.",
        ],
        FactionInfo => &[
            "This organisation works in the shadows, bending the world economy to its will.",
            "Founded by ex-soldiers, this faction preaches a return to the old order.",
            "A collective of idealistic hackers fighting for free information.",
        ],
        Technology => &[
            "This breakthrough changed how people interact with the net.",
            "Built for the military first, this technology spread into civilian life.",
            "The latest neural implants offer instant access to cyberspace.",
        ],
        Mystery => &[
            "Nobody knows what happened to the original inhabitants of this zone.",
            "A string of disappearances still puzzles the local authorities.",
            "The original source code was never found, fuelling countless theories.",
        ],
        Rumor => &[
            "Some say certain hackers reach net layers whose existence is denied.",
            "Witnesses claim to have seen government agents testing unknown tech.",
            "Rumor has it a rogue AI hides somewhere in the global network.",
        ],
        Legend => &[
            "The legend of the Net Ghost still fascinates young hackers.",
            "The tale of the Keeper of Codes passes from one generation to the next.",
            "The myth of the Universal Key inspires tech lovers to this day.",
        ],
    }
}

/// Entities a story element points at. Only rows that could be read are kept.
#[derive(Debug, Clone, Default)]
pub struct StoryRefs {
    pub location: Option<Location>,
    pub character: Option<CharacterRef>,
    pub mission: Option<MissionRef>,
}

/// Most specific subject first: the element's own kind, then mission,
/// location and character.
fn subject(element_type: StoryElementType, refs: &StoryRefs, rng: &mut WorldRng) -> String {
    match (element_type, refs) {
        (StoryElementType::CharacterStory, StoryRefs { character: Some(c), .. }) => c.name.clone(),
        (StoryElementType::LocationHistory, StoryRefs { location: Some(l), .. }) => l.name.clone(),
        (_, StoryRefs { mission: Some(m), .. }) => m.title.clone(),
        (_, StoryRefs { location: Some(l), .. }) => l.name.clone(),
        (_, StoryRefs { character: Some(c), .. }) => c.name.clone(),
        _ => rng.pick(GENERIC_SUBJECTS).to_string(),
    }
}

/// First resolvable gate: mission, location, character, then a player level.
pub fn reveal_condition(refs: &StoryRefs, rng: &mut WorldRng) -> RevealCondition {
    if let Some(mission) = &refs.mission {
        RevealCondition::CompleteMission(mission.id)
    } else if let Some(location) = &refs.location {
        RevealCondition::VisitLocation(location.id)
    } else if let Some(character) = &refs.character {
        RevealCondition::MeetCharacter(character.id)
    } else {
        RevealCondition::PlayerLevel(rng.range(5..=20))
    }
}

pub fn build_story_element(
    world_id: WorldId,
    refs: &StoryRefs,
    order_index: u32,
    rng: &mut WorldRng,
) -> StoryElement {
    let element_type = *rng.pick(StoryElementType::ALL);
    let prefix = rng.pick(title_prefixes(element_type));
    let title = format!("{} {}", prefix, subject(element_type, refs, rng));
    let content = rng.pick(content_templates(element_type)).to_string();
    let is_revealed = rng.chance(REVEALED_CHANCE);
    let reveal_condition = (!is_revealed).then(|| reveal_condition(refs, rng));

    StoryElement {
        id: StoryElementId(rng.next_uuid()),
        world_id,
        element_type,
        title,
        content,
        location_id: refs.location.as_ref().map(|l| l.id),
        character_id: refs.character.as_ref().map(|c| c.id),
        mission_id: refs.mission.as_ref().map(|m| m.id),
        is_revealed,
        reveal_condition,
        order_index,
    }
}

fn draw_refs(
    store: &dyn WorldStore,
    location_ids: &[LocationId],
    character_ids: &[CharacterId],
    mission_ids: &[MissionId],
    rng: &mut WorldRng,
) -> Result<StoryRefs, WorldDbError> {
    let mut refs = StoryRefs::default();
    let location_id = rng
        .chance(LOCATION_REF_CHANCE)
        .then(|| rng.choose(location_ids).copied())
        .flatten();
    if let Some(id) = location_id {
        refs.location = store.location(id)?;
        if refs.location.is_none() {
            warn!(location_id = %id, "story location not found, dropping reference");
        }
    }
    let character_id = rng
        .chance(CHARACTER_REF_CHANCE)
        .then(|| rng.choose(character_ids).copied())
        .flatten();
    if let Some(id) = character_id {
        refs.character = store.character(id)?;
        if refs.character.is_none() {
            warn!(character_id = %id, "story character not found, dropping reference");
        }
    }
    let mission_id = rng
        .chance(MISSION_REF_CHANCE)
        .then(|| rng.choose(mission_ids).copied())
        .flatten();
    if let Some(id) = mission_id {
        refs.mission = store.mission(id)?;
        if refs.mission.is_none() {
            warn!(mission_id = %id, "story mission not found, dropping reference");
        }
    }
    Ok(refs)
}

pub fn generate_story_elements(
    store: &dyn WorldStore,
    world_id: WorldId,
    location_ids: &[LocationId],
    character_ids: &[CharacterId],
    mission_ids: &[MissionId],
    count: usize,
    rng: &mut WorldRng,
) -> Result<Vec<StoryElementId>, WorldDbError> {
    let mut ids = Vec::with_capacity(count);
    for index in 0..count {
        let refs = draw_refs(store, location_ids, character_ids, mission_ids, rng)?;
        let element = build_story_element(world_id, &refs, index as u32, rng);
        store.insert_story_element(&element)?;
        debug!(
            title = %element.title,
            revealed = element.is_revealed,
            "generated story element"
        );
        ids.push(element.id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn mission_ref() -> MissionRef {
        MissionRef {
            id: MissionId(Uuid::from_u128(4)),
            title: "Hack of the server".to_string(),
            location_id: LocationId(Uuid::from_u128(2)),
        }
    }

    fn character_ref() -> CharacterRef {
        CharacterRef {
            id: CharacterId(Uuid::from_u128(6)),
            name: "Iris Clark".to_string(),
            location_id: LocationId(Uuid::from_u128(2)),
            faction: "Resistance".to_string(),
        }
    }

    #[test]
    fn mission_gate_wins_over_character() {
        let mut rng = WorldRng::new(Some(1));
        let refs = StoryRefs {
            location: None,
            character: Some(character_ref()),
            mission: Some(mission_ref()),
        };
        assert_eq!(
            reveal_condition(&refs, &mut rng),
            RevealCondition::CompleteMission(MissionId(Uuid::from_u128(4)))
        );
    }

    #[test]
    fn unreferenced_gates_use_levels() {
        let mut rng = WorldRng::new(Some(5));
        for _ in 0..30 {
            match reveal_condition(&StoryRefs::default(), &mut rng) {
                RevealCondition::PlayerLevel(level) => assert!((5..=20).contains(&level)),
                other => panic!("unexpected gate {}", other),
            }
        }
    }

    #[test]
    fn hidden_elements_always_carry_a_gate() {
        let mut rng = WorldRng::new(Some(12));
        let refs = StoryRefs {
            location: None,
            character: Some(character_ref()),
            mission: None,
        };
        for index in 0..60 {
            let element = build_story_element(WorldId(Uuid::from_u128(1)), &refs, index, &mut rng);
            assert_eq!(element.is_revealed, element.reveal_condition.is_none());
            assert_eq!(element.character_id, Some(character_ref().id));
            if element.element_type == StoryElementType::CharacterStory {
                assert!(element.title.ends_with("Iris Clark"));
            }
        }
    }

    #[test]
    fn every_element_type_has_titles_and_templates() {
        for element_type in StoryElementType::ALL {
            assert!(!title_prefixes(*element_type).is_empty());
            assert!(!content_templates(*element_type).is_empty());
        }
    }
}
