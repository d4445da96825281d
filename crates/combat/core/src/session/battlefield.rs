//! Weather, environment and environmental hazards.

use crate::combat::{DamageRoll, DamageType};
use crate::ids::CombatantId;
use crate::rng::RngOracle;
use crate::state::{Combatant, Roster};

/// Weather tag of the battlefield.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Weather {
    #[default]
    Clear,
    Sunny,
    Rain,
    Storm,
    Snow,
    Fog,
    Dark,
}

impl Weather {
    /// Damage types empowered by this weather.
    pub const fn favoured(self) -> &'static [DamageType] {
        match self {
            Weather::Sunny => &[DamageType::Fire],
            Weather::Rain => &[DamageType::Water, DamageType::Lightning],
            Weather::Storm => &[DamageType::Lightning],
            Weather::Snow => &[DamageType::Ice],
            Weather::Dark => &[DamageType::Dark],
            Weather::Clear | Weather::Fog => &[],
        }
    }

    pub fn favours(self, damage_type: DamageType) -> bool {
        self.favoured().contains(&damage_type)
    }
}

/// When a hazard fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HazardTrigger {
    RoundStart,
    #[default]
    RoundEnd,
}

/// Who a hazard hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HazardScope {
    #[default]
    All,
    /// Players and allies.
    Players,
    Enemies,
    /// One living combatant chosen at random.
    Random,
}

/// Authored hazard descriptor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentalHazard {
    pub name: String,
    pub damage: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: DamageType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: HazardTrigger,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: HazardScope,
    /// `-1` permanent, `0` fires once, `n > 0` fires `n` times.
    #[cfg_attr(feature = "serde", serde(default = "permanent"))]
    pub duration: i32,
}

#[cfg(feature = "serde")]
fn permanent() -> i32 {
    -1
}

impl EnvironmentalHazard {
    pub fn new(name: impl Into<String>, damage: u32, trigger: HazardTrigger, scope: HazardScope) -> Self {
        Self {
            name: name.into(),
            damage,
            damage_type: DamageType::Physical,
            trigger,
            scope,
            duration: -1,
        }
    }

    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    pub fn with_duration(mut self, duration: i32) -> Self {
        self.duration = duration;
        self
    }
}

/// Damage one hazard dealt to one combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HazardHit {
    pub hazard: String,
    pub target: CombatantId,
    pub amount: u32,
    pub defeated: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct ActiveHazard {
    hazard: EnvironmentalHazard,
    /// Firings left; `None` for permanent hazards.
    remaining: Option<u32>,
}

/// Battlefield modifiers of one session.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battlefield {
    pub weather: Weather,
    pub environment: String,
    hazards: Vec<ActiveHazard>,
}

impl Battlefield {
    pub fn new(weather: Weather, environment: impl Into<String>, hazards: Vec<EnvironmentalHazard>) -> Self {
        let hazards = hazards
            .into_iter()
            .filter(|hazard| hazard.damage > 0)
            .map(|hazard| ActiveHazard {
                remaining: match hazard.duration {
                    d if d < 0 => None,
                    0 => Some(1),
                    d => Some(d as u32),
                },
                hazard,
            })
            .collect();
        Self {
            weather,
            environment: environment.into(),
            hazards,
        }
    }

    pub fn hazards(&self) -> impl Iterator<Item = &EnvironmentalHazard> {
        self.hazards.iter().map(|active| &active.hazard)
    }

    /// Fires every hazard with the given trigger, in authored order.
    ///
    /// Returns the hits and the names of hazards that ran out.
    pub fn trigger(
        &mut self,
        when: HazardTrigger,
        roster: &mut Roster,
        rng: &mut dyn RngOracle,
    ) -> (Vec<HazardHit>, Vec<String>) {
        let mut hits = Vec::new();

        for active in self.hazards.iter_mut().filter(|a| a.hazard.trigger == when) {
            let hazard = &active.hazard;
            let targets: Vec<CombatantId> = match hazard.scope {
                HazardScope::All => roster.living().map(|c| c.id).collect(),
                HazardScope::Players => roster.living().filter(|c| c.faction.is_party()).map(|c| c.id).collect(),
                HazardScope::Enemies => roster.living().filter(|c| !c.faction.is_party()).map(|c| c.id).collect(),
                HazardScope::Random => {
                    let living: Vec<CombatantId> = roster.living().map(|c| c.id).collect();
                    if living.is_empty() {
                        Vec::new()
                    } else {
                        vec![living[rng.index(living.len())]]
                    }
                }
            };

            for target in targets {
                if let Some(combatant) = roster.get_mut(target) {
                    hits.push(strike(hazard, combatant));
                }
            }

            if let Some(remaining) = active.remaining.as_mut() {
                *remaining = remaining.saturating_sub(1);
            }
        }

        let mut expired = Vec::new();
        self.hazards.retain(|active| {
            if active.remaining == Some(0) {
                expired.push(active.hazard.name.clone());
                false
            } else {
                true
            }
        });

        (hits, expired)
    }
}

fn strike(hazard: &EnvironmentalHazard, combatant: &mut Combatant) -> HazardHit {
    let roll = DamageRoll::new(hazard.damage as f64).with_affinity(combatant.affinities.multiplier(hazard.damage_type));
    let amount = combatant.health.deplete(roll.total());
    HazardHit {
        hazard: hazard.name.clone(),
        target: combatant.id,
        amount,
        defeated: !combatant.is_alive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Affinities;
    use crate::rng::ScriptedRng;
    use crate::state::Faction;
    use crate::stats::StatBlock;

    fn roster() -> Roster {
        Roster::new(vec![
            Combatant::new(CombatantId(0), "Hero", Faction::Player, StatBlock::uniform(5.0)),
            Combatant::new(CombatantId(1), "Salamander", Faction::Enemy, StatBlock::uniform(5.0))
                .with_affinities(Affinities::default().resist(DamageType::Fire, 1.0)),
        ])
    }

    #[test]
    fn weather_synergy_table() {
        assert!(Weather::Sunny.favours(DamageType::Fire));
        assert!(Weather::Rain.favours(DamageType::Lightning));
        assert!(!Weather::Clear.favours(DamageType::Physical));
        assert_eq!("STORM".parse::<Weather>(), Ok(Weather::Storm));
    }

    #[test]
    fn one_shot_hazard_fires_once() {
        let mut roster = roster();
        let mut rng = ScriptedRng::constant(0.0);
        let mut field = Battlefield::new(
            Weather::Clear,
            "cave",
            vec![EnvironmentalHazard::new("Rockfall", 7, HazardTrigger::RoundEnd, HazardScope::Players).with_duration(0)],
        );

        let (hits, expired) = field.trigger(HazardTrigger::RoundEnd, &mut roster, &mut rng);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].amount, 7);
        assert_eq!(expired, vec!["Rockfall".to_owned()]);

        let (hits, _) = field.trigger(HazardTrigger::RoundEnd, &mut roster, &mut rng);
        assert!(hits.is_empty());
    }

    #[test]
    fn permanent_hazard_respects_trigger_and_affinities() {
        let mut roster = roster();
        let mut rng = ScriptedRng::constant(0.0);
        let mut field = Battlefield::new(
            Weather::Sunny,
            "volcano",
            vec![
                EnvironmentalHazard::new("Lava", 10, HazardTrigger::RoundStart, HazardScope::All)
                    .with_damage_type(DamageType::Fire),
            ],
        );

        let (hits, _) = field.trigger(HazardTrigger::RoundEnd, &mut roster, &mut rng);
        assert!(hits.is_empty());

        for _ in 0..3 {
            let (hits, expired) = field.trigger(HazardTrigger::RoundStart, &mut roster, &mut rng);
            let amounts: Vec<u32> = hits.iter().map(|h| h.amount).collect();
            assert_eq!(amounts, vec![10, 1]);
            assert!(expired.is_empty());
        }
    }

    #[test]
    fn random_scope_hits_one_living_combatant() {
        let mut roster = roster();
        let mut rng = ScriptedRng::constant(0.99);
        let mut field = Battlefield::new(
            Weather::Clear,
            "ruins",
            vec![EnvironmentalHazard::new("Spikes", 4, HazardTrigger::RoundEnd, HazardScope::Random)],
        );

        let (hits, _) = field.trigger(HazardTrigger::RoundEnd, &mut roster, &mut rng);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, CombatantId(1));
    }
}
