//! Deterministic 32-bit XorShift RNG with labeled sub-stream derivation.
//!
//! Every generator decision that must be reproducible draws from a
//! sub-stream derived from the run's master seed and a label (typically
//! `testUnitId|scopeKey` or a component name), never from the master
//! stream directly — two decisions with different labels never observe
//! each other's draws, so adding a new decision point doesn't perturb
//! existing output.

/// A 32-bit XorShift generator. Never constructed with a zero state:
/// [`XorShift32::new`] maps a zero seed to a fixed nonzero constant,
/// since the all-zero state is a fixed point of the xorshift update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    const ZERO_SEED_REPLACEMENT: u32 = 0x9E37_79B9;

    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 {
                Self::ZERO_SEED_REPLACEMENT
            } else {
                seed
            },
        }
    }

    /// Next uniform 32-bit integer.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform integer in `[0, bound)` by rejection sampling: never
    /// modulo-biased, regardless of how `bound` divides 2^32.
    pub fn gen_below(&mut self, bound: u32) -> u32 {
        assert!(bound > 0, "gen_below requires a positive bound");
        if bound.is_power_of_two() {
            return self.next_u32() & (bound - 1);
        }
        let limit = u32::MAX - (u32::MAX % bound);
        loop {
            let candidate = self.next_u32();
            if candidate < limit {
                return candidate % bound;
            }
        }
    }

    /// Uniform integer in `[low, high]` inclusive.
    pub fn gen_range_inclusive(&mut self, low: i64, high: i64) -> i64 {
        assert!(low <= high, "gen_range_inclusive requires low <= high");
        let span = (high - low) as u64 + 1;
        if span > u32::MAX as u64 {
            // span exceeds one u32 draw's resolution; combine two draws.
            let hi = self.next_u32() as u64;
            let lo = self.next_u32() as u64;
            let combined = (hi << 32) | lo;
            low + (combined % span) as i64
        } else {
            low + i64::from(self.gen_below(span as u32))
        }
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        // 53 significant bits, matching f64 mantissa precision.
        let hi = (self.next_u32() >> 6) as u64;
        let lo = (self.next_u32() >> 5) as u64;
        ((hi << 27) | lo) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Normalize a user-provided master seed: `0` is not a valid xorshift
/// state, so it is remapped the same way [`XorShift32::new`] remaps it.
#[must_use]
pub fn normalize_master_seed(seed: u32) -> u32 {
    XorShift32::new(seed).state
}

/// Derive a labeled sub-stream seed from a (normalized) master seed and a
/// label string. Mixing is done with BLAKE3 over `masterSeed || label` so
/// that distinct labels land on uncorrelated streams even for adjacent
/// master seeds.
#[must_use]
pub fn derive_seed(master_seed: u32, label: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + label.len());
    input.extend_from_slice(&master_seed.to_le_bytes());
    input.extend_from_slice(label.as_bytes());
    let digest = blake3::hash(&input);
    let bytes = digest.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// A named sub-stream of the master RNG.
///
/// Construct with [`LabeledRng::derive`]; the resulting generator is
/// fully independent of the master stream and of any other label's
/// sub-stream.
#[derive(Debug, Clone)]
pub struct LabeledRng {
    label: String,
    rng: XorShift32,
}

impl LabeledRng {
    #[must_use]
    pub fn derive(master_seed: u32, label: impl Into<String>) -> Self {
        let label = label.into();
        let seed = derive_seed(normalize_master_seed(master_seed), &label);
        Self {
            label,
            rng: XorShift32::new(seed),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn inner(&mut self) -> &mut XorShift32 {
        &mut self.rng
    }
}

/// Assign a seed to each test unit id, derived from the master seed and
/// `"{unitId}|{scopeKey}"`. Mirrors the coverage planner's
/// `assignTestUnitSeeds`: seeds are assigned post-hoc, after planning has
/// decided which units exist, so planning itself never depends on RNG
/// output.
pub fn assign_test_unit_seeds<'a>(
    master_seed: u32,
    units: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<(String, u32)> {
    units
        .into_iter()
        .map(|(unit_id, scope_key)| {
            let label = format!("{unit_id}|{scope_key}");
            let seed = derive_seed(normalize_master_seed(master_seed), &label);
            (unit_id.to_string(), seed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_produces_identical_stream() {
        let mut a = XorShift32::new(2024);
        let mut b = XorShift32::new(2024);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_labels_diverge() {
        let mut a = LabeledRng::derive(42, "unit-1|schema");
        let mut b = LabeledRng::derive(42, "unit-2|schema");
        assert_ne!(a.inner().next_u32(), b.inner().next_u32());
    }

    #[test]
    fn same_label_is_reproducible() {
        let mut a = LabeledRng::derive(42, "unit-1|schema");
        let mut b = LabeledRng::derive(42, "unit-1|schema");
        assert_eq!(a.inner().next_u32(), b.inner().next_u32());
    }

    #[test]
    fn zero_seed_does_not_produce_zero_state() {
        assert_ne!(normalize_master_seed(0), 0);
        let mut rng = XorShift32::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn gen_below_stays_in_bounds() {
        let mut rng = XorShift32::new(7);
        for _ in 0..1000 {
            let v = rng.gen_below(7);
            assert!(v < 7);
        }
    }

    #[test]
    fn gen_range_inclusive_stays_in_bounds() {
        let mut rng = XorShift32::new(99);
        for _ in 0..1000 {
            let v = rng.gen_range_inclusive(-5, 5);
            assert!((-5..=5).contains(&v));
        }
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut rng = XorShift32::new(5);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn assign_test_unit_seeds_is_deterministic_and_distinct() {
        let units = vec![("unit-a", "scope-1"), ("unit-b", "scope-1")];
        let first = assign_test_unit_seeds(123, units.clone());
        let second = assign_test_unit_seeds(123, units);
        assert_eq!(first, second);
        assert_ne!(first[0].1, first[1].1);
    }
}
