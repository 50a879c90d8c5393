//! Effect blocks for consumables. Magnitudes scale with the jittered rarity
//! multiplier; percentages are capped.

use crate::generation::items::rarity_multiplier;
use crate::generation::rng::WorldRng;
use crate::model::{ConsumableEffects, ConsumableType, EffectProfile, Rarity};

const BONUS_CHANCE: f64 = 0.3;
const SPECIAL_EFFECT_CHANCE: f64 = 0.7;

const TARGET_SKILLS: &[&str] = &["Hacking", "Cryptography", "Programming", "Networks", "Security"];
const BUILDING_CLEARANCES: &[&str] = &["Corporate", "Government", "Military", "Research", "Commercial"];

fn scaled(base: f64, m: f64) -> i64 {
    (base * m) as i64
}

fn capped(base: f64, m: f64, cap: i64) -> i64 {
    scaled(base, m).min(cap)
}

fn span(m: f64) -> i64 {
    ((1.0 + m) as i64).clamp(1, 5)
}

pub fn effect_profile(consumable_type: ConsumableType, m: f64, rng: &mut WorldRng) -> EffectProfile {
    match consumable_type {
        ConsumableType::DataChip => EffectProfile::DataChip {
            knowledge_boost: scaled(10.0, m),
            skill_xp: scaled(50.0, m),
            target_skill: rng.pick(TARGET_SKILLS).to_string(),
        },
        ConsumableType::NeuralBooster => EffectProfile::NeuralBooster {
            mental_boost: scaled(15.0, m),
            focus_duration: scaled(30.0, m),
            cooldown: (240.0 - 30.0 * m) as i64,
        },
        ConsumableType::CodeFragment => EffectProfile::CodeFragment {
            unlock_level: (1.0 + m) as i64,
            code_quality: scaled(10.0, m),
            bypass_chance: capped(30.0, m, 90),
        },
        ConsumableType::CryptoKey => EffectProfile::CryptoKey {
            encryption_level: scaled(2.0, m),
            unlock_time: (30.0 - 5.0 * m) as i64,
            detection_reduction: capped(20.0, m, 90),
        },
        ConsumableType::AccessCard => EffectProfile::AccessCard {
            access_level: (1.0 + m) as i64,
            building_types: rng
                .sample(BUILDING_CLEARANCES, span(m) as usize)
                .into_iter()
                .map(str::to_string)
                .collect(),
            duration: scaled(60.0, m),
        },
        ConsumableType::SecurityToken => EffectProfile::SecurityToken {
            security_level: scaled(2.0, m),
            valid_duration: scaled(30.0, m),
            traceback_protection: capped(30.0, m, 95),
        },
        ConsumableType::FirewallBypass => EffectProfile::FirewallBypass {
            bypass_strength: scaled(15.0, m),
            firewall_levels: (1.0 + m) as i64,
            stealth_bonus: capped(15.0, m, 75),
        },
        ConsumableType::SignalJammer => EffectProfile::SignalJammer {
            jamming_radius: scaled(10.0, m),
            duration: scaled(30.0, m),
            effectiveness: capped(50.0, m, 95),
        },
        ConsumableType::DecryptionTool => EffectProfile::DecryptionTool {
            decryption_power: scaled(10.0, m),
            compatible_encryptions: span(m),
            time_reduction: capped(20.0, m, 90),
        },
        ConsumableType::MemoryCleaner => EffectProfile::MemoryCleaner {
            trace_removal: capped(60.0, m, 100),
            system_optimization: scaled(10.0, m),
            cooldown_reduction: capped(10.0, m, 50),
        },
        ConsumableType::BatteryPack => EffectProfile::BatteryPack {
            energy_boost: scaled(20.0, m),
            duration: scaled(60.0, m),
            device_types: span(m),
        },
        ConsumableType::Food => EffectProfile::General {
            general_boost: scaled(10.0, m),
            duration: scaled(30.0, m),
        },
    }
}

/// Stretches `duration` by 10 to 40 percent, or bumps one other number by
/// 10 to 30 percent when the profile has no duration.
pub fn apply_bonus(profile: &mut EffectProfile, rng: &mut WorldRng) {
    if let Some(duration) = profile.duration_mut() {
        let factor: f64 = rng.range(1.1..1.4);
        *duration = (*duration as f64 * factor) as i64;
        return;
    }
    let mut fields = profile.numeric_fields_mut();
    if fields.is_empty() {
        return;
    }
    let index = rng.range(0..fields.len());
    let share: f64 = rng.range(0.1..0.3);
    let field = fields.swap_remove(index);
    let bump = (*field as f64 * share) as i64;
    *field += bump;
}

fn special_effect(consumable_type: ConsumableType) -> &'static str {
    match consumable_type {
        ConsumableType::DataChip => "Unlocks a hidden skill",
        ConsumableType::NeuralBooster => "Shows data streams in augmented reality",
        ConsumableType::CodeFragment => "Bypasses some security layers on its own",
        ConsumableType::CryptoKey => "Adapts itself to the target's security",
        ConsumableType::AccessCard => "Opens restricted areas",
        ConsumableType::SecurityToken => "Impersonates a system administrator",
        ConsumableType::FirewallBypass => "Brief invisibility to surveillance systems",
        ConsumableType::SignalJammer => "Can blind security cameras for a while",
        ConsumableType::DecryptionTool => "Reveals data hidden inside files",
        ConsumableType::MemoryCleaner => "Wipes every trace of your visit",
        ConsumableType::BatteryPack => "Overloads nearby electronics",
        ConsumableType::Food => "Slow regeneration",
    }
}

pub fn consumable_effects(
    consumable_type: ConsumableType,
    rarity: Rarity,
    rng: &mut WorldRng,
) -> ConsumableEffects {
    let m = rarity_multiplier(rarity, rng);
    let mut profile = effect_profile(consumable_type, m, rng);
    if rng.chance(BONUS_CHANCE) {
        apply_bonus(&mut profile, rng);
    }
    let special_effect = (rarity >= Rarity::Epic && rng.chance(SPECIAL_EFFECT_CHANCE))
        .then(|| special_effect(consumable_type).to_string());
    ConsumableEffects {
        profile,
        special_effect,
    }
}

/// How long the effect lasts, in minutes. Instant effects report zero.
pub fn duration_minutes(profile: &EffectProfile) -> u32 {
    let minutes = match profile {
        EffectProfile::NeuralBooster { focus_duration, .. } => *focus_duration,
        EffectProfile::AccessCard { duration, .. }
        | EffectProfile::BatteryPack { duration, .. }
        | EffectProfile::General { duration, .. } => *duration,
        EffectProfile::SecurityToken { valid_duration, .. } => *valid_duration,
        EffectProfile::SignalJammer { duration, .. } => duration / 60,
        _ => 0,
    };
    minutes.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_key_scales_and_caps() {
        let mut rng = WorldRng::new(Some(3));
        match effect_profile(ConsumableType::CryptoKey, 5.0, &mut rng) {
            EffectProfile::CryptoKey {
                encryption_level,
                unlock_time,
                detection_reduction,
            } => {
                assert_eq!(encryption_level, 10);
                assert_eq!(unlock_time, 5);
                assert_eq!(detection_reduction, 90);
            }
            other => panic!("unexpected profile {:?}", other),
        }
    }

    #[test]
    fn bonus_prefers_duration() {
        let mut rng = WorldRng::new(Some(8));
        let mut profile = EffectProfile::General {
            general_boost: 10,
            duration: 100,
        };
        apply_bonus(&mut profile, &mut rng);
        match profile {
            EffectProfile::General {
                general_boost,
                duration,
            } => {
                assert_eq!(general_boost, 10);
                assert!((110..140).contains(&duration));
            }
            other => panic!("unexpected profile {:?}", other),
        }
    }

    #[test]
    fn bonus_without_duration_touches_one_number() {
        let mut rng = WorldRng::new(Some(21));
        let before = EffectProfile::MemoryCleaner {
            trace_removal: 60,
            system_optimization: 10,
            cooldown_reduction: 10,
        };
        let mut after = before.clone();
        apply_bonus(&mut after, &mut rng);
        assert_ne!(before, after);
    }

    #[test]
    fn commons_never_get_special_effects() {
        let mut rng = WorldRng::new(Some(12));
        for consumable_type in ConsumableType::ALL {
            for _ in 0..10 {
                let effects = consumable_effects(*consumable_type, Rarity::Common, &mut rng);
                assert!(effects.special_effect.is_none());
            }
        }
    }

    #[test]
    fn jammer_seconds_convert_to_minutes() {
        let profile = EffectProfile::SignalJammer {
            jamming_radius: 10,
            duration: 120,
            effectiveness: 50,
        };
        assert_eq!(duration_minutes(&profile), 2);
    }
}
