//! RNG oracle for combat rolls.
//!
//! Every random decision in the engine (initiative tiebreaks, accuracy and
//! critical rolls, status procs, AI noise, escape dice) draws from an
//! [`RngOracle`] owned by the session. Implementations seeded with the same
//! value must replay the same encounter.

use std::collections::VecDeque;

/// Source of uniform draws for combat rolls.
pub trait RngOracle: Send {
    /// Next uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform value in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next_unit()
    }

    /// Uniform value in `[0, 100)`, used for percentage rolls.
    fn percent(&mut self) -> f64 {
        self.uniform(0.0, 100.0)
    }

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        let face = (self.next_unit() * sides as f64) as u32;
        face.min(sides - 1) + 1
    }

    /// Uniform index in `0..len`. Returns 0 for empty ranges.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_unit() * len as f64) as usize).min(len - 1)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: Self::pcg_step(seed.wrapping_add(Self::INCREMENT)),
        }
    }

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }
}

impl RngOracle for PcgRng {
    fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Replays a fixed list of unit draws, cycling when exhausted.
///
/// Used by tests and replays to pin every roll of an encounter.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    draws: VecDeque<f64>,
    script: Vec<f64>,
}

impl ScriptedRng {
    /// Creates a scripted source. Values are clamped into `[0, 1)`.
    pub fn new(script: impl IntoIterator<Item = f64>) -> Self {
        let script: Vec<f64> = script
            .into_iter()
            .map(|value| value.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self {
            draws: script.iter().copied().collect(),
            script,
        }
    }

    /// A source that always draws the same value.
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }

    /// Number of draws left before the script repeats.
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RngOracle for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            self.draws.extend(self.script.iter().copied());
        }
        self.draws.pop_front().unwrap_or(0.0)
    }
}

/// Compute a deterministic encounter seed from a base seed and an encounter id.
///
/// Hosts that replay the same story branch with the same base seed get the
/// same rolls in every encounter, while different encounters stay independent.
pub fn compute_seed(base_seed: u64, encounter_id: &str) -> u64 {
    let mut hash = base_seed;
    for byte in encounter_id.bytes() {
        hash ^= (byte as u64).wrapping_mul(0x9e3779b97f4a7c15);
        hash = hash.rotate_left(27).wrapping_mul(0x517cc1b727220a95);
    }

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
