//! String value synthesis. Length constraints are measured in Unicode
//! code points (§4.5 "Unicode"), never UTF-16 code units, so a generated
//! string of `minLength:1` is satisfied by a single multi-byte character.

use foundrydata_diagnostics::Envelope;
use foundrydata_regex::automaton::enumerate_names;
use foundrydata_rng::XorShift32;
use serde_json::Value;

use crate::options::PatternWitnessOptions;

const FILLER_ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v',
    'w', 'x', 'y', 'z',
];

/// The number of Unicode scalar values in `s`, the measure every length
/// constraint in this module is checked against.
#[must_use]
pub fn code_point_len(s: &str) -> usize {
    s.chars().count()
}

fn synthesize_plain(rng: &mut XorShift32, min_length: usize, max_length: usize) -> String {
    let len = if max_length <= min_length {
        min_length
    } else {
        min_length + rng.gen_below((max_length - min_length + 1) as u32) as usize
    };
    (0..len)
        .map(|_| FILLER_ALPHABET[rng.gen_below(FILLER_ALPHABET.len() as u32) as usize])
        .collect()
}

/// Synthesize a string honoring `minLength`/`maxLength` and, when present,
/// a `pattern` constraint. Pattern-constrained strings are drawn from the
/// witness set `enumerate_names` proves (structurally, or via its bounded
/// BFS fallback); an uncompilable pattern degrades to an unconstrained
/// filler string and records the regex's own diagnostic.
pub fn synthesize_string(
    rng: &mut XorShift32,
    canon_path: &str,
    min_length: Option<u64>,
    max_length: Option<u64>,
    pattern: Option<&str>,
    witness_options: &PatternWitnessOptions,
) -> (Value, Vec<Envelope>) {
    let min_length = min_length.unwrap_or(0) as usize;
    let max_length = max_length.map_or(min_length + 16, |m| m as usize);
    let mut diagnostics = Vec::new();

    if let Some(source) = pattern {
        match enumerate_names(
            source,
            &witness_options.alphabet,
            witness_options.max_length,
            witness_options.max_candidates,
            canon_path,
        ) {
            Ok(result) => {
                let candidates: Vec<&String> = result
                    .names
                    .iter()
                    .filter(|n| {
                        let len = code_point_len(n);
                        len >= min_length && len <= max_length
                    })
                    .collect();
                if let Some(pick) = candidates.get(rng.gen_below(candidates.len().max(1) as u32) as usize) {
                    return (Value::String((*pick).clone()), diagnostics);
                }
                if let Some(first) = result.names.first() {
                    return (Value::String(first.clone()), diagnostics);
                }
            }
            Err(envelope) => diagnostics.push(envelope),
        }
    }

    (Value::String(synthesize_plain(rng, min_length, max_length)), diagnostics)
}
