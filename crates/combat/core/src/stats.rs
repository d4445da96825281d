//! Stat snapshots and bounded resource pools.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The five primary stats a formula may reference.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatKind {
    Strength,
    Intelligence,
    Agility,
    Vitality,
    Luck,
}

impl StatKind {
    pub const COUNT: usize = 5;

    pub const ALL: [StatKind; Self::COUNT] = [
        StatKind::Strength,
        StatKind::Intelligence,
        StatKind::Agility,
        StatKind::Vitality,
        StatKind::Luck,
    ];

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// Snapshot of a combatant's primary stats. All values are non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBlock {
    pub strength: f64,
    pub intelligence: f64,
    pub agility: f64,
    pub vitality: f64,
    pub luck: f64,
}

impl StatBlock {
    pub fn new(strength: f64, intelligence: f64, agility: f64, vitality: f64, luck: f64) -> Self {
        Self {
            strength,
            intelligence,
            agility,
            vitality,
            luck,
        }
        .clamped()
    }

    /// Every stat set to the same value.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value, value)
    }

    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Strength => self.strength,
            StatKind::Intelligence => self.intelligence,
            StatKind::Agility => self.agility,
            StatKind::Vitality => self.vitality,
            StatKind::Luck => self.luck,
        }
    }

    pub fn set(&mut self, kind: StatKind, value: f64) {
        let value = non_negative(value);
        match kind {
            StatKind::Strength => self.strength = value,
            StatKind::Intelligence => self.intelligence = value,
            StatKind::Agility => self.agility = value,
            StatKind::Vitality => self.vitality = value,
            StatKind::Luck => self.luck = value,
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, kind: StatKind, value: f64) -> Self {
        self.set(kind, value);
        self
    }

    /// Returns a copy with additive deltas applied, floored at zero.
    ///
    /// Deltas are summed per stat before the floor, so their order is irrelevant.
    pub fn modified(&self, deltas: impl IntoIterator<Item = (StatKind, f64)>) -> Self {
        let mut totals = [0.0; StatKind::COUNT];
        for (kind, delta) in deltas {
            totals[kind.as_index()] += delta;
        }
        let mut out = *self;
        for kind in StatKind::ALL {
            out.set(kind, self.get(kind) + totals[kind.as_index()]);
        }
        out
    }

    /// Highest offensive stat, used when judging how dangerous a combatant is.
    pub fn offense(&self) -> f64 {
        self.strength.max(self.intelligence)
    }

    /// Replaces negative or non-finite values with zero.
    pub fn clamped(self) -> Self {
        Self {
            strength: non_negative(self.strength),
            intelligence: non_negative(self.intelligence),
            agility: non_negative(self.agility),
            vitality: non_negative(self.vitality),
            luck: non_negative(self.luck),
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Bounded pool such as health or mana: `0 <= current <= maximum`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    current: u32,
    maximum: u32,
}

impl ResourceMeter {
    /// A full pool.
    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// A pool with an explicit current value, clamped to the maximum.
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    pub fn missing(&self) -> u32 {
        self.maximum.saturating_sub(self.current)
    }

    /// `current / maximum`, or 0 for an empty pool with no capacity.
    pub fn ratio(&self) -> f64 {
        if self.maximum == 0 {
            0.0
        } else {
            self.current as f64 / self.maximum as f64
        }
    }

    /// Removes up to `amount` and returns how much was actually removed.
    pub fn deplete(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds up to `amount` without exceeding the maximum; returns the gain.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.missing());
        self.current += gained;
        gained
    }
}
