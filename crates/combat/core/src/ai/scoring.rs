//! Candidate scoring.
//!
//! ```text
//! value = noise + intent + situation + context
//! ```
//!
//! | Component  | Contribution                                                    |
//! |------------|-----------------------------------------------------------------|
//! | noise      | uniform `[0, ai_noise)`, drawn once per candidate               |
//! | intent     | attack × 50, support × 60 (× 2 below half health), defense × 40 |
//! | situation  | +20 damage with enemies up, +40 heal below 30%, -30 penalties   |
//! | context    | +15 when the damage type matches the weather                    |

use crate::registry::SkillDefinition;

use super::decide::AiContext;

pub const ATTACK_WEIGHT: f64 = 50.0;
pub const SUPPORT_WEIGHT: f64 = 60.0;
pub const DEFENSE_WEIGHT: f64 = 40.0;
pub const ENEMIES_PRESENT_BONUS: f64 = 20.0;
pub const DESPERATE_HEAL_BONUS: f64 = 40.0;
pub const CAUTIOUS_ATTACK_PENALTY: f64 = -30.0;
pub const WASTED_HEAL_PENALTY: f64 = -30.0;
pub const WEATHER_SYNERGY_BONUS: f64 = 15.0;

/// Health ratio below which support skills count double.
pub const WOUNDED_RATIO: f64 = 0.5;
/// Health ratio below which healing is urgent.
pub const CRITICAL_RATIO: f64 = 0.3;

/// Scoring result for one candidate skill.
///
/// The components are kept apart so a decision can be logged and audited.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    /// Tie-breaking noise.
    pub noise: f64,
    /// Profile-weighted preference for what the skill does.
    pub intent: f64,
    /// Adjustments from the actor's and battlefield's state.
    pub situation: f64,
    /// Environmental bonuses.
    pub context: f64,
}

impl Score {
    #[inline]
    pub fn value(&self) -> f64 {
        self.noise + self.intent + self.situation + self.context
    }
}

/// Scores `skill` for the context's actor, without the noise term.
pub fn score_skill(skill: &SkillDefinition, ctx: &AiContext<'_>) -> Score {
    let profile = &ctx.actor.profile;
    let health_ratio = ctx.actor.health.ratio();

    let supports = skill.heals() || skill.applies_status();
    let defends = skill.status_effects.iter().any(|application| {
        ctx.registry
            .status(application.effect.as_str())
            .is_some_and(|def| def.is_protective())
    });

    let mut intent = 0.0;
    if skill.deals_damage() {
        intent += profile.attack_priority * ATTACK_WEIGHT;
    }
    if supports {
        let mut support = profile.support_priority * SUPPORT_WEIGHT;
        if health_ratio < WOUNDED_RATIO {
            support *= 2.0;
        }
        intent += support;
    }
    if defends {
        intent += profile.defense_priority * DEFENSE_WEIGHT;
    }

    let mut situation = 0.0;
    if skill.deals_damage() && ctx.enemies_alive() {
        situation += ENEMIES_PRESENT_BONUS;
    }
    if health_ratio < CRITICAL_RATIO {
        if skill.heals() {
            situation += DESPERATE_HEAL_BONUS;
        } else if skill.is_pure_attack() && profile.is_cautious() {
            situation += CAUTIOUS_ATTACK_PENALTY;
        }
    }
    if skill.heals() && !skill.deals_damage() && !ctx.anyone_hurt(skill) {
        situation += WASTED_HEAL_PENALTY;
    }

    let context = if skill.deals_damage() && ctx.weather.favours(skill.damage_type) {
        WEATHER_SYNERGY_BONUS
    } else {
        0.0
    };

    Score {
        noise: 0.0,
        intent,
        situation,
        context,
    }
}
