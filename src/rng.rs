//! Injectable randomness.
//!
//! Every random decision in the simulation goes through [`RandomSource`], so
//! callers control determinism: the terminal game plugs in a `ThreadRng`,
//! tests a seeded `StdRng`, and tests that need an exact outcome a
//! [`ScriptedRandom`].

use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;

/// A source of uniform rolls.  Only [`RandomSource::roll`] is required; the
/// rest are derived from it so a scripted source controls them all.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// Uniform integer in `lo..=hi`.  Returns `lo` when the range is empty.
    fn int_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi as i64 - lo as i64 + 1) as f64;
        let offset = (self.roll() * span).floor() as i64;
        (lo as i64 + offset.min(span as i64 - 1)) as i32
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.roll() < p
    }
}

impl RandomSource for StdRng {
    fn roll(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl RandomSource for ThreadRng {
    fn roll(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of rolls, cycling when it runs out.
///
/// An empty script always rolls `0.0`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    rolls: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(rolls: impl Into<Vec<f64>>) -> Self {
        let rolls = rolls
            .into()
            .into_iter()
            .map(|r| r.clamp(0.0, 0.999_999_999))
            .collect();
        Self { rolls, cursor: 0 }
    }

    /// A source whose every roll is `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn roll(&mut self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        let value = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        value
    }
}

// ── Weighted choice ───────────────────────────────────────────────────────────

/// Picks an index in `0..len` with probability `weights[i] / sum(weights)`.
///
/// `None` weights mean uniform.  Returns `None` for an empty candidate list,
/// a weight list of the wrong length, or weights summing to zero.
pub fn weighted_index(
    rng: &mut impl RandomSource,
    len: usize,
    weights: Option<&[u32]>,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let Some(weights) = weights else {
        return Some(rng.int_inclusive(0, len as i32 - 1) as usize);
    };
    if weights.len() != len {
        return None;
    }
    let total: u64 = weights.iter().map(|&w| w as u64).sum();
    if total == 0 {
        return None;
    }
    let target = rng.roll() * total as f64;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w as f64;
        if target < cumulative {
            return Some(i);
        }
    }
    // Float rounding at the very top of the range lands on the last
    // non-zero weight.
    weights.iter().rposition(|&w| w > 0)
}

/// Picks one candidate, optionally weighted.  See [`weighted_index`].
pub fn choose<'a, T>(
    rng: &mut impl RandomSource,
    candidates: &'a [T],
    weights: Option<&[u32]>,
) -> Option<&'a T> {
    weighted_index(rng, candidates.len(), weights).map(|i| &candidates[i])
}
