use serde::{Deserialize, Serialize};

use crate::model::ids::{CharacterId, LocationId, WorldId};

labeled_enum! {
    pub enum Gender {
        Male => "M",
        Female => "F",
    }
}

labeled_enum! {
    pub enum Profession {
        Hacker => "Hacker",
        SecuritySpecialist => "Security Specialist",
        Programmer => "Programmer",
        Engineer => "Engineer",
        CorporateExecutive => "Corporate Executive",
        GovernmentAgent => "Government Agent",
        PoliceOfficer => "Police Officer",
        Mercenary => "Mercenary",
        Smuggler => "Smuggler",
        Fixer => "Fixer",
        InformationBroker => "Information Broker",
        Journalist => "Journalist",
        Doctor => "Doctor",
        Bartender => "Bartender",
        StreetVendor => "Street Vendor",
    }
}

impl Profession {
    pub fn is_technical(self) -> bool {
        matches!(
            self,
            Profession::Hacker
                | Profession::SecuritySpecialist
                | Profession::Programmer
                | Profession::Engineer
        )
    }

    pub fn is_security(self) -> bool {
        matches!(
            self,
            Profession::SecuritySpecialist | Profession::PoliceOfficer | Profession::GovernmentAgent
        )
    }
}

labeled_enum! {
    pub enum EnemyType {
        Human => "HUMAN",
        Guard => "GUARD",
        Cyborg => "CYBORG",
        Drone => "DRONE",
        Robot => "ROBOT",
        Netrunner => "NETRUNNER",
        Militech => "MILITECH",
        Beast => "BEAST",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub hacking: u8,
    pub combat: u8,
    pub charisma: u8,
    pub wealth: u8,
}

/// Percentages, 0 to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resistances {
    pub physical: u8,
    pub energy: u8,
    pub emp: u8,
    pub biohazard: u8,
    pub cyber: u8,
    pub viral: u8,
    pub nanite: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombatProfile {
    pub enemy_type: EnemyType,
    pub health: u32,
    pub damage: u32,
    pub accuracy: f64,
    pub initiative: u8,
    pub hostility: u8,
    pub resistances: Resistances,
    pub ai_behavior: String,
    pub combat_style: String,
    pub special_abilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterMetadata {
    pub background: String,
    pub motivation: String,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub id: CharacterId,
    pub world_id: WorldId,
    pub location_id: LocationId,
    pub name: String,
    pub gender: Gender,
    pub profession: Profession,
    pub faction: String,
    pub description: String,
    pub importance: u8,
    pub skills: Skills,
    pub is_hostile: bool,
    pub is_quest_giver: bool,
    pub is_vendor: bool,
    pub combat: CombatProfile,
    pub metadata: CharacterMetadata,
}

/// The slice of a character row later stages need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRef {
    pub id: CharacterId,
    pub name: String,
    pub location_id: LocationId,
    pub faction: String,
}
