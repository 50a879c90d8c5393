pub mod names;

pub use names::{random_full_name, synthetic_name, NamePool};
