use serde::{Deserialize, Serialize};

use crate::config::WorldCounts;
use crate::model::ids::WorldId;

pub const WORLD_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldMetadata {
    pub seed: u64,
    pub counts: WorldCounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub id: WorldId,
    pub name: String,
    pub description: String,
    pub author: String,
    pub version: String,
    pub complexity: u8,
    pub is_active: bool,
    pub metadata: WorldMetadata,
}
