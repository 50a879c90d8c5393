use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ShopType;

pub const MIN_COMPLEXITY: u8 = 1;
pub const MAX_COMPLEXITY: u8 = 5;

const DEFAULT_COMPLEXITY: u8 = 3;
const DEFAULT_AUTHOR: &str = "worldgen";
const DEFAULT_SHOP_COUNT: usize = 10;
const DEFAULT_ITEMS_PER_SHOP: usize = 20;
const DEFAULT_RARE_ITEMS_PERCENTAGE: u8 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("{0}")]
    Validation(String),
}

/// Row counts for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldCounts {
    pub cities: usize,
    pub districts_per_city: usize,
    pub special_locations: usize,
    pub devices: usize,
    pub characters: usize,
    pub missions: usize,
    pub story_elements: usize,
    pub hardware_items: usize,
    pub consumable_items: usize,
    pub armor_items: usize,
    pub software_items: usize,
    #[serde(default)]
    pub weapon_items: usize,
    #[serde(default)]
    pub implant_items: usize,
    #[serde(default)]
    pub vulnerabilities: usize,
    pub shops: usize,
    pub items_per_shop: usize,
    pub rare_items_percentage: u8,
}

fn scaled(complexity: u8, factor: i64, offset: i64, min: i64, max: i64) -> usize {
    (complexity as i64 * factor + offset).clamp(min, max) as usize
}

impl WorldCounts {
    pub fn from_complexity(complexity: u8) -> Self {
        let complexity = complexity.clamp(MIN_COMPLEXITY, MAX_COMPLEXITY);
        let devices = scaled(complexity, 25, 0, 10, 100);
        Self {
            cities: scaled(complexity, 1, 1, 1, 8),
            districts_per_city: scaled(complexity, 1, 1, 1, 6),
            special_locations: scaled(complexity, 1, -1, 0, 5),
            devices,
            characters: scaled(complexity, 15, 0, 5, 50),
            missions: scaled(complexity, 5, 0, 3, 20),
            story_elements: scaled(complexity, 3, 0, 1, 10),
            hardware_items: scaled(complexity, 10, 0, 10, 50),
            consumable_items: scaled(complexity, 10, 0, 10, 50),
            armor_items: scaled(complexity, 6, 0, 5, 30),
            software_items: devices / 2,
            weapon_items: scaled(complexity, 6, 0, 5, 30),
            implant_items: scaled(complexity, 3, 1, 4, 16),
            vulnerabilities: scaled(complexity, 5, 0, 5, 25),
            shops: DEFAULT_SHOP_COUNT,
            items_per_shop: DEFAULT_ITEMS_PER_SHOP,
            rare_items_percentage: DEFAULT_RARE_ITEMS_PERCENTAGE,
        }
    }

    pub fn with_overrides(mut self, overrides: &CountOverrides) -> Self {
        fn apply(slot: &mut usize, value: Option<usize>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        apply(&mut self.cities, overrides.cities);
        apply(&mut self.districts_per_city, overrides.districts_per_city);
        apply(&mut self.special_locations, overrides.special_locations);
        apply(&mut self.devices, overrides.devices);
        apply(&mut self.characters, overrides.characters);
        apply(&mut self.missions, overrides.missions);
        apply(&mut self.story_elements, overrides.story_elements);
        apply(&mut self.hardware_items, overrides.hardware_items);
        apply(&mut self.consumable_items, overrides.consumable_items);
        apply(&mut self.armor_items, overrides.armor_items);
        apply(&mut self.software_items, overrides.software_items);
        apply(&mut self.weapon_items, overrides.weapon_items);
        apply(&mut self.implant_items, overrides.implant_items);
        apply(&mut self.vulnerabilities, overrides.vulnerabilities);
        apply(&mut self.shops, overrides.shops);
        apply(&mut self.items_per_shop, overrides.items_per_shop);
        if let Some(value) = overrides.rare_items_percentage {
            self.rare_items_percentage = value.min(100);
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountOverrides {
    pub cities: Option<usize>,
    pub districts_per_city: Option<usize>,
    pub special_locations: Option<usize>,
    pub devices: Option<usize>,
    pub characters: Option<usize>,
    pub missions: Option<usize>,
    pub story_elements: Option<usize>,
    pub hardware_items: Option<usize>,
    pub consumable_items: Option<usize>,
    pub armor_items: Option<usize>,
    pub software_items: Option<usize>,
    pub weapon_items: Option<usize>,
    pub implant_items: Option<usize>,
    pub vulnerabilities: Option<usize>,
    pub shops: Option<usize>,
    pub items_per_shop: Option<usize>,
    pub rare_items_percentage: Option<u8>,
}

fn default_complexity() -> u8 {
    DEFAULT_COMPLEXITY
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

/// Inputs for one `generate_world` call. Loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_complexity")]
    pub complexity: u8,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub counts: CountOverrides,
    /// Shop types to draw from; empty means every type.
    #[serde(default)]
    pub shop_types: Vec<ShopType>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: None,
            complexity: DEFAULT_COMPLEXITY,
            author: default_author(),
            seed: None,
            counts: CountOverrides::default(),
            shop_types: Vec::new(),
        }
    }
}

impl WorldConfig {
    pub fn new(complexity: u8) -> Self {
        Self {
            complexity,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn shop_types(&self) -> &[ShopType] {
        if self.shop_types.is_empty() {
            ShopType::ALL
        } else {
            &self.shop_types
        }
    }

    pub fn counts(&self) -> WorldCounts {
        WorldCounts::from_complexity(self.complexity).with_overrides(&self.counts)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_COMPLEXITY..=MAX_COMPLEXITY).contains(&self.complexity) {
            return Err(ConfigError::Validation(format!(
                "complexity must be between {} and {}, got {}",
                MIN_COMPLEXITY, MAX_COMPLEXITY, self.complexity
            )));
        }
        if self.author.trim().is_empty() {
            return Err(ConfigError::Validation(
                "author cannot be empty".to_string(),
            ));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "world name cannot be blank".to_string(),
                ));
            }
        }
        if matches!(self.counts.rare_items_percentage, Some(pct) if pct > 100) {
            return Err(ConfigError::Validation(
                "rare_items_percentage must be at most 100".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_world_config(path: impl AsRef<Path>) -> Result<WorldConfig, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: WorldConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        path: path.display().to_string(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_one_counts() {
        let counts = WorldCounts::from_complexity(1);
        assert_eq!(counts.cities, 2);
        assert_eq!(counts.districts_per_city, 2);
        assert_eq!(counts.special_locations, 0);
        assert_eq!(counts.devices, 25);
        assert_eq!(counts.characters, 15);
        assert_eq!(counts.missions, 5);
        assert_eq!(counts.story_elements, 3);
        assert_eq!(counts.hardware_items, 10);
        assert_eq!(counts.software_items, 12);
        assert_eq!(counts.weapon_items, 6);
        assert_eq!(counts.implant_items, 4);
        assert_eq!(counts.vulnerabilities, 5);
    }

    #[test]
    fn complexity_five_hits_caps() {
        let counts = WorldCounts::from_complexity(5);
        assert_eq!(counts.cities, 6);
        assert_eq!(counts.districts_per_city, 6);
        assert_eq!(counts.special_locations, 4);
        assert_eq!(counts.devices, 100);
        assert_eq!(counts.characters, 50);
        assert_eq!(counts.missions, 20);
        assert_eq!(counts.story_elements, 10);
        assert_eq!(counts.consumable_items, 50);
        assert_eq!(counts.weapon_items, 30);
        assert_eq!(counts.implant_items, 16);
        assert_eq!(counts.vulnerabilities, 25);
    }

    #[test]
    fn overrides_replace_only_given_counts() {
        let overrides = CountOverrides {
            cities: Some(1),
            shops: Some(0),
            ..CountOverrides::default()
        };
        let counts = WorldCounts::from_complexity(2).with_overrides(&overrides);
        assert_eq!(counts.cities, 1);
        assert_eq!(counts.shops, 0);
        assert_eq!(counts.districts_per_city, 3);
    }

    #[test]
    fn parses_partial_config() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "complexity": 2, "seed": 7, "counts": { "missions": 4 } }"#)
                .unwrap();
        assert_eq!(config.complexity, 2);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.author, "worldgen");
        assert_eq!(config.counts().missions, 4);
        assert_eq!(config.shop_types(), ShopType::ALL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn shop_types_parse_from_labels() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "shop_types": ["armor", "black_market"] }"#).unwrap();
        assert_eq!(config.shop_types(), &[ShopType::Armor, ShopType::BlackMarket]);
    }

    #[test]
    fn rejects_out_of_range_complexity() {
        let config = WorldConfig::new(9);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_world_config("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
