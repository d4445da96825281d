/// Engine constants and tunable parameters.
///
/// Compile-time constants shape data structures (status slot capacity) and
/// document the fixed rules of the combat system. Runtime tunables can be
/// loaded from TOML by `combat-content`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Value substituted when a formula fails to evaluate at use time.
    pub formula_fallback: u32,

    /// Width of the uniform tiebreak added to agility when ordering turns.
    pub initiative_tiebreak: f64,

    /// Width of the uniform noise added to every AI candidate score.
    pub ai_noise: f64,

    /// Hard stop for encounters without a turn limit (0 = disabled).
    ///
    /// When the round counter exceeds this guard the encounter ends in a draw.
    pub max_rounds_guard: u32,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of distinct status effects carried by one combatant.
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== fixed rules =====
    pub const DEFAULT_FORMULA_FALLBACK: u32 = 10;
    pub const DEFAULT_INITIATIVE_TIEBREAK: f64 = 5.0;
    pub const DEFAULT_AI_NOISE: f64 = 10.0;
    pub const DEFAULT_CRITICAL_MULTIPLIER: f64 = 2.0;
    pub const DEFAULT_ESCAPE_DIFFICULTY: u32 = 10;
    /// Sides of the die rolled for escape attempts.
    pub const ESCAPE_DIE: u32 = 20;

    pub fn new() -> Self {
        Self {
            formula_fallback: Self::DEFAULT_FORMULA_FALLBACK,
            initiative_tiebreak: Self::DEFAULT_INITIATIVE_TIEBREAK,
            ai_noise: Self::DEFAULT_AI_NOISE,
            max_rounds_guard: 0,
        }
    }

    pub fn with_rounds_guard(mut self, max_rounds_guard: u32) -> Self {
        self.max_rounds_guard = max_rounds_guard;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
