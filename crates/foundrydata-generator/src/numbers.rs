//! Numeric value synthesis honoring `minimum`/`maximum`/exclusive bounds
//! and `multipleOf`. Bounds arrive already normalized to 2020-12 numeric
//! exclusive-bound form by the normalizer, so this module never sees the
//! draft-04 boolean `exclusiveMinimum`/`exclusiveMaximum` form.

use foundrydata_rng::XorShift32;
use serde_json::{Number, Value};

/// Default finite range used when a numeric node carries no bound at
/// all. Synthetic data generators need *some* concrete range to sample
/// from; this one is wide enough to exercise boundary-adjacent values
/// without risking floating-point overflow in downstream arithmetic.
const UNBOUNDED_LOW: f64 = -1_000_000.0;
const UNBOUNDED_HIGH: f64 = 1_000_000.0;

struct NumericBounds {
    lo: f64,
    lo_exclusive: bool,
    hi: f64,
    hi_exclusive: bool,
}

fn resolve_bounds(minimum: Option<f64>, maximum: Option<f64>, exclusive_minimum: Option<f64>, exclusive_maximum: Option<f64>) -> NumericBounds {
    let (lo, lo_exclusive) = match (minimum, exclusive_minimum) {
        (Some(m), Some(e)) if e >= m => (e, true),
        (Some(m), Some(_)) => (m, false),
        (Some(m), None) => (m, false),
        (None, Some(e)) => (e, true),
        (None, None) => (UNBOUNDED_LOW, false),
    };
    let (hi, hi_exclusive) = match (maximum, exclusive_maximum) {
        (Some(m), Some(e)) if e <= m => (e, true),
        (Some(m), Some(_)) => (m, false),
        (Some(m), None) => (m, false),
        (None, Some(e)) => (e, true),
        (None, None) => (UNBOUNDED_HIGH, false),
    };
    NumericBounds { lo, lo_exclusive, hi, hi_exclusive }
}

/// Synthesize an integer honoring `[minimum, maximum]` (or their
/// exclusive forms) and `multipleOf`.
#[must_use]
pub fn synthesize_integer(
    rng: &mut XorShift32,
    minimum: Option<f64>,
    maximum: Option<f64>,
    exclusive_minimum: Option<f64>,
    exclusive_maximum: Option<f64>,
    multiple_of: Option<f64>,
) -> Value {
    let bounds = resolve_bounds(minimum, maximum, exclusive_minimum, exclusive_maximum);
    let mut low = if bounds.lo_exclusive { bounds.lo.floor() as i64 + 1 } else { bounds.lo.ceil() as i64 };
    let mut high = if bounds.hi_exclusive { bounds.hi.ceil() as i64 - 1 } else { bounds.hi.floor() as i64 };
    if let Some(step) = multiple_of {
        let step = step.abs().max(1.0) as i64;
        low = ((low + step - 1) / step) * step;
        high = (high / step) * step;
        if low > high {
            return Value::Number(Number::from(low));
        }
        let span = ((high - low) / step).max(0) as u32;
        let picked = low + (rng.gen_below(span + 1) as i64) * step;
        return Value::Number(Number::from(picked));
    }
    if low > high {
        return Value::Number(Number::from(low));
    }
    Value::Number(Number::from(rng.gen_range_inclusive(low, high)))
}

/// Synthesize a non-integer number. `multipleOf` is honored by scaling
/// into integer-step space at a resolution of 1e-6 and scaling back.
#[must_use]
pub fn synthesize_number(
    rng: &mut XorShift32,
    minimum: Option<f64>,
    maximum: Option<f64>,
    exclusive_minimum: Option<f64>,
    exclusive_maximum: Option<f64>,
    multiple_of: Option<f64>,
) -> Value {
    let bounds = resolve_bounds(minimum, maximum, exclusive_minimum, exclusive_maximum);
    let epsilon = 1e-9;
    let low = if bounds.lo_exclusive { bounds.lo + epsilon } else { bounds.lo };
    let high = if bounds.hi_exclusive { bounds.hi - epsilon } else { bounds.hi };
    let raw = if high <= low { low } else { low + rng.next_f64() * (high - low) };
    let value = match multiple_of {
        Some(step) if step > 0.0 => (raw / step).round() * step,
        _ => raw,
    };
    Number::from_f64(value).map_or(Value::Number(Number::from(0)), Value::Number)
}
