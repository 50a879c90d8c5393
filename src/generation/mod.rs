//! Seeded generators. Each stage reads what earlier stages stored and
//! returns the ids it wrote; `orchestrator` wires them together.

pub mod buildings;
pub mod characters;
pub mod connections;
pub mod devices;
pub mod files;
pub mod items;
pub mod locations;
pub mod missions;
pub mod networks;
pub mod orchestrator;
pub mod puzzles;
pub mod rng;
pub mod shops;
pub mod story;
pub mod vulnerabilities;

pub use orchestrator::{generate_world, GeneratedWorld, GenerationError, GenerationSummary};
pub use rng::WorldRng;
