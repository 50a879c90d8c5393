pub mod config;
pub mod content;
pub mod generation;
pub mod model;
pub mod world;

pub use crate::config::{load_world_config, ConfigError, WorldConfig, WorldCounts};
pub use crate::generation::{generate_world, GeneratedWorld, GenerationError, GenerationSummary};
pub use crate::world::{WorldDb, WorldDbError};
