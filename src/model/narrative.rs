use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ids::{
    CharacterId, LocationId, MissionId, ObjectiveId, StoryElementId, WorldId,
};

labeled_enum! {
    pub enum MissionType {
        Infiltration => "infiltration",
        Retrieval => "retrieval",
        Hacking => "hacking",
        Protection => "protection",
        Delivery => "delivery",
        Elimination => "elimination",
        Sabotage => "sabotage",
        Espionage => "espionage",
        Escort => "escort",
        Investigation => "investigation",
    }
}

labeled_enum! {
    pub enum FailureConsequence {
        NoPenalty => "none",
        ReputationLoss => "reputation_loss",
        ItemLoss => "item_loss",
        GameOver => "game_over",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_consequence: Option<FailureConsequence>,
    pub alternate_endings: u8,
    pub reward_items: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    pub id: MissionId,
    pub world_id: WorldId,
    pub location_id: LocationId,
    pub giver_id: CharacterId,
    pub title: String,
    pub description: String,
    pub mission_type: MissionType,
    pub difficulty: u8,
    pub reward_credits: u32,
    pub reward_reputation: u8,
    pub is_main_quest: bool,
    pub is_repeatable: bool,
    pub is_hidden: bool,
    pub metadata: MissionMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionRef {
    pub id: MissionId,
    pub title: String,
    pub location_id: LocationId,
}

labeled_enum! {
    pub enum ObjectiveType {
        Goto => "goto",
        Interact => "interact",
        Collect => "collect",
        Hack => "hack",
        Eliminate => "eliminate",
        Protect => "protect",
        Escape => "escape",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub id: ObjectiveId,
    pub world_id: WorldId,
    pub mission_id: MissionId,
    pub title: String,
    pub description: String,
    pub objective_type: ObjectiveType,
    pub target_count: u8,
    pub is_optional: bool,
    pub order_index: u32,
}

labeled_enum! {
    pub enum StoryElementType {
        Background => "background",
        Event => "event",
        Lore => "lore",
        CharacterStory => "character_story",
        LocationHistory => "location_history",
        FactionInfo => "faction_info",
        Technology => "technology",
        Mystery => "mystery",
        Rumor => "rumor",
        Legend => "legend",
    }
}

/// Gate on a hidden story element, persisted as `kind:value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealCondition {
    CompleteMission(MissionId),
    VisitLocation(LocationId),
    MeetCharacter(CharacterId),
    PlayerLevel(u8),
}

impl fmt::Display for RevealCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevealCondition::CompleteMission(id) => write!(f, "complete_mission:{}", id),
            RevealCondition::VisitLocation(id) => write!(f, "visit_location:{}", id),
            RevealCondition::MeetCharacter(id) => write!(f, "meet_character:{}", id),
            RevealCondition::PlayerLevel(level) => write!(f, "player_level:{}", level),
        }
    }
}

impl FromStr for RevealCondition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, arg) = value
            .split_once(':')
            .ok_or_else(|| format!("malformed reveal condition {}", value))?;
        let uuid = || Uuid::parse_str(arg).map_err(|err| format!("{}: {}", value, err));
        let level = || arg.parse::<u8>().map_err(|err| format!("{}: {}", value, err));
        match kind {
            "complete_mission" => Ok(RevealCondition::CompleteMission(MissionId(uuid()?))),
            "visit_location" => Ok(RevealCondition::VisitLocation(LocationId(uuid()?))),
            "meet_character" => Ok(RevealCondition::MeetCharacter(CharacterId(uuid()?))),
            "player_level" => Ok(RevealCondition::PlayerLevel(level()?)),
            _ => Err(format!("unknown reveal condition {}", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryElement {
    pub id: StoryElementId,
    pub world_id: WorldId,
    pub element_type: StoryElementType,
    pub title: String,
    pub content: String,
    pub location_id: Option<LocationId>,
    pub character_id: Option<CharacterId>,
    pub mission_id: Option<MissionId>,
    pub is_revealed: bool,
    pub reveal_condition: Option<RevealCondition>,
    pub order_index: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_condition_text_parses_back() {
        let mission = MissionId(Uuid::from_u128(42));
        let cases = [
            RevealCondition::CompleteMission(mission),
            RevealCondition::PlayerLevel(12),
        ];
        for condition in cases {
            let text = condition.to_string();
            assert_eq!(text.parse::<RevealCondition>().unwrap(), condition);
        }
    }

    #[test]
    fn reveal_condition_rejects_unknown_kind() {
        assert!("open_sesame:1".parse::<RevealCondition>().is_err());
        assert!("player_level".parse::<RevealCondition>().is_err());
        assert!("hacking_skill:5".parse::<RevealCondition>().is_err());
    }
}
