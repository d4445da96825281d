//! Encounter and party descriptions handed over by the narrative layer.

use crate::combat::Affinities;
use crate::config::EngineConfig;
use crate::ids::SkillId;
use crate::state::Controller;
use crate::stats::StatBlock;
use crate::turn::InitiativeSystem;

use super::battlefield::{EnvironmentalHazard, Weather};
use super::lifecycle::CombatResult;

/// Authored description of one participant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: StatBlock,
    pub max_health: u32,
    /// Starting health; full when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub health: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_resource: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<SkillId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub affinities: Affinities,
    /// Behavior profile tag for AI control (e.g. `"aggressive"`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub profile: Option<String>,
    /// Defaults to human control for players and AI for everyone else.
    #[cfg_attr(feature = "serde", serde(default))]
    pub controller: Option<Controller>,
}

impl CombatantSpec {
    pub fn new(name: impl Into<String>, stats: StatBlock, max_health: u32, max_resource: u32) -> Self {
        Self {
            name: name.into(),
            stats,
            max_health,
            health: None,
            max_resource,
            resource: None,
            skills: Vec::new(),
            affinities: Affinities::default(),
            profile: None,
            controller: None,
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillId>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_affinities(mut self, affinities: Affinities) -> Self {
        self.affinities = affinities;
        self
    }
}

/// Whether and how the party may flee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EscapeRule {
    pub allowed: bool,
    /// d20 target; the roll must meet or beat it.
    pub difficulty: u32,
}

impl Default for EscapeRule {
    fn default() -> Self {
        Self {
            allowed: true,
            difficulty: EngineConfig::DEFAULT_ESCAPE_DIFFICULTY,
        }
    }
}

/// Narrative nodes to resume at for each outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Routes {
    pub victory: String,
    pub defeat: String,
    pub escape: String,
    /// Falls back to `defeat` when unset.
    pub time_limit: Option<String>,
    /// Falls back to `defeat` when unset.
    pub draw: Option<String>,
}

impl Routes {
    pub fn node_for(&self, result: CombatResult) -> &str {
        match result {
            CombatResult::Victory => &self.victory,
            CombatResult::Defeat => &self.defeat,
            CombatResult::Escape => &self.escape,
            CombatResult::TimeLimit => self.time_limit.as_deref().unwrap_or(&self.defeat),
            CombatResult::Draw => self.draw.as_deref().unwrap_or(&self.defeat),
        }
    }
}

/// An inventory addition granted on victory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemGrant {
    pub item: String,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub quantity: u32,
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

/// Rewards delivered once when the party wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardGrant {
    pub experience: u32,
    pub currency: u32,
    pub items: Vec<ItemGrant>,
    pub skill_points: u32,
}

impl RewardGrant {
    pub fn is_empty(&self) -> bool {
        self.experience == 0 && self.currency == 0 && self.items.is_empty() && self.skill_points == 0
    }
}

/// Battlefield part of an encounter.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattlefieldConfig {
    pub weather: Weather,
    pub environment: String,
    pub hazards: Vec<EnvironmentalHazard>,
}

/// Everything needed to start one encounter, apart from the player party.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterConfig {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub enemies: Vec<CombatantSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub allies: Vec<CombatantSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub battlefield: BattlefieldConfig,
    /// Maximum rounds (0 = unlimited).
    #[cfg_attr(feature = "serde", serde(default))]
    pub turn_limit: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub escape: EscapeRule,
    #[cfg_attr(feature = "serde", serde(default))]
    pub initiative: InitiativeSystem,
    #[cfg_attr(feature = "serde", serde(default))]
    pub routes: Routes,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: RewardGrant,
}

impl EncounterConfig {
    pub fn new(id: impl Into<String>, enemies: Vec<CombatantSpec>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            enemies,
            allies: Vec::new(),
            battlefield: BattlefieldConfig::default(),
            turn_limit: 0,
            escape: EscapeRule::default(),
            initiative: InitiativeSystem::default(),
            routes: Routes::default(),
            rewards: RewardGrant::default(),
        }
    }
}
