//! `foundrydata`: deterministic synthetic data generation and coverage
//! measurement from JSON Schema / OpenAPI (§1).
//!
//! This crate is a thin facade over the workspace's component crates —
//! [`foundrydata_orchestrator::execute_pipeline`] is the single
//! programmatic entry point a non-CLI embedder needs. Everything else
//! re-exported here exists so a caller building a pipeline run by hand
//! (rather than going through `foundrydata_cli`) doesn't have to depend
//! on every `foundrydata-*` crate individually.

pub use foundrydata_composer::compose;
pub use foundrydata_config::{ConfigBuilder, PipelineOptions};
pub use foundrydata_generator::generate;
pub use foundrydata_normalizer::normalize;
pub use foundrydata_orchestrator::{PipelineResult, PipelineStatus, execute_pipeline};
pub use foundrydata_resolver::ResolutionRegistry;
pub use foundrydata_validator::{JsonschemaOracle, SourceOracle};

pub use foundrydata_utils::ExitCode;
pub use foundrydata_utils::error::FoundryError;
