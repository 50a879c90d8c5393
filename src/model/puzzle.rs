use serde::{Deserialize, Serialize};

use crate::model::ids::{DeviceId, NetworkId, PuzzleId, VulnerabilityId, WorldId};
use crate::model::structure::DeviceType;

labeled_enum! {
    pub enum PuzzleType {
        PasswordBruteforce => "PasswordBruteforce",
        BufferOverflow => "BufferOverflow",
        SequenceMatching => "SequenceMatching",
        NetworkRerouting => "NetworkRerouting",
        BasicTerminal => "BasicTerminal",
        CodeInjection => "CodeInjection",
        FirewallBypass => "FirewallBypass",
    }
}

/// What a device puzzle reads about its target. Columns holding a value
/// outside their label set or range come back as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTarget {
    pub id: DeviceId,
    pub name: String,
    pub device_type: Option<DeviceType>,
    pub security_level: Option<u8>,
}

/// Device or network a puzzle or vulnerability is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HackTarget {
    Device(DeviceId),
    Network(NetworkId),
}

impl HackTarget {
    pub fn target_type(&self) -> &'static str {
        match self {
            HackTarget::Device(_) => "device",
            HackTarget::Network(_) => "network",
        }
    }

    pub fn target_id(&self) -> String {
        match self {
            HackTarget::Device(id) => id.to_string(),
            HackTarget::Network(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PuzzleMetadata {
    pub hints: Vec<String>,
    pub solution_steps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_consequence: Option<String>,
    #[serde(default)]
    pub connected_poi: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessible_devices: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HackingPuzzle {
    pub id: PuzzleId,
    pub world_id: WorldId,
    pub name: String,
    pub description: String,
    pub puzzle_type: PuzzleType,
    pub target: HackTarget,
    pub difficulty: u8,
    pub xp_reward: u32,
    pub credit_reward: u32,
    pub has_trap: bool,
    pub alarm_chance: f64,
    pub metadata: PuzzleMetadata,
}

labeled_enum! {
    pub enum VulnerabilityType {
        BufferOverflow => "Buffer Overflow",
        SqlInjection => "SQL Injection",
        CrossSiteScripting => "Cross-Site Scripting",
        AuthenticationBypass => "Authentication Bypass",
        CommandExecution => "Command Execution",
        PrivilegeEscalation => "Privilege Escalation",
        MemoryCorruption => "Memory Corruption",
        RaceCondition => "Race Condition",
        DefaultCredentials => "Default Credentials",
        InsecureEncryption => "Insecure Encryption",
        FirmwareDowngrade => "Firmware Downgrade",
        SideChannelAttack => "Side-Channel Attack",
    }
}

impl VulnerabilityType {
    pub fn summary(self) -> &'static str {
        match self {
            VulnerabilityType::BufferOverflow => {
                "Injects code by writing past the end of a memory buffer."
            }
            VulnerabilityType::SqlInjection => {
                "Runs unauthorised SQL by tampering with query inputs."
            }
            VulnerabilityType::CrossSiteScripting => {
                "Plants a script that runs in the victim's browser."
            }
            VulnerabilityType::AuthenticationBypass => {
                "Slips past the login checks to gain unauthorised access."
            }
            VulnerabilityType::CommandExecution => {
                "Executes arbitrary system commands on the target."
            }
            VulnerabilityType::PrivilegeEscalation => "Climbs from a user account to administrator.",
            VulnerabilityType::MemoryCorruption => {
                "Bends memory state until the system misbehaves."
            }
            VulnerabilityType::RaceCondition => {
                "Abuses the timing between two operations to steer the system."
            }
            VulnerabilityType::DefaultCredentials => {
                "Logs in with factory credentials nobody changed."
            }
            VulnerabilityType::InsecureEncryption => {
                "Breaks a weak or misused encryption scheme."
            }
            VulnerabilityType::FirmwareDowngrade => {
                "Rolls firmware back to reopen long-patched holes."
            }
            VulnerabilityType::SideChannelAttack => {
                "Reads secrets from power draw, timing or radio leakage."
            }
        }
    }
}

labeled_enum! {
    /// Rarity of a weakness, inverse to how hard it is to exploit.
    pub enum VulnerabilityRarity {
        Common => "common",
        Uncommon => "uncommon",
        Rare => "rare",
        VeryRare => "very_rare",
    }
}

impl VulnerabilityRarity {
    pub fn for_difficulty(difficulty: u8) -> Self {
        match difficulty {
            0..=3 => VulnerabilityRarity::Common,
            4..=6 => VulnerabilityRarity::Uncommon,
            7..=8 => VulnerabilityRarity::Rare,
            _ => VulnerabilityRarity::VeryRare,
        }
    }
}

labeled_enum! {
    pub enum ExploitKind {
        DataTheft => "data_theft",
        AccessControl => "access_control",
        DenialOfService => "denial_of_service",
        PrivilegeEscalation => "privilege_escalation",
        CodeExecution => "code_execution",
        AuthenticationBypass => "authentication_bypass",
        DataModification => "data_modification",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityExploit {
    #[serde(rename = "type")]
    pub kind: ExploitKind,
    pub difficulty: u8,
    pub impact: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vulnerability {
    pub id: VulnerabilityId,
    pub world_id: WorldId,
    pub name: String,
    pub description: String,
    pub vuln_type: VulnerabilityType,
    pub code_name: String,
    pub target: HackTarget,
    /// 1 to 10.
    pub difficulty: u8,
    /// 1 to 10.
    pub impact: u8,
    pub rarity: VulnerabilityRarity,
    pub is_public: bool,
    pub is_patched: bool,
    pub discovery_date: String,
    pub exploits: Vec<VulnerabilityExploit>,
}
