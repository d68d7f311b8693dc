//! Adapter binding the pipeline to an external JSON Schema validator
//! oracle (§4.7). The core depends only on [`SourceOracle`] and
//! [`foundrydata_repair::ProbeError`]; the concrete `jsonschema` binding
//! lives entirely inside this crate, behind a small LRU compile cache.

pub mod cache;
pub mod key;
pub mod oracle;

pub use cache::{ValidatorCache, MAX_VALIDATOR_CACHE_ENTRIES};
pub use key::{ValidatorCacheKey, ENGINE_CLASS, ENGINE_MAJOR};
pub use oracle::{check_flags_consistency, envelope_to_foundry_error, JsonschemaOracle, SourceOracle, ValidationReport};
