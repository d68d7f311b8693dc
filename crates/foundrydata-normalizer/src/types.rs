use foundrydata_diagnostics::Envelope;
use foundrydata_ptrmap::PtrMap;
use serde_json::Value;

/// `if/then/else` rewriting aggressiveness (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewriteConditionalsPolicy {
    Never,
    #[default]
    Safe,
    Aggressive,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    pub rewrite_conditionals: RewriteConditionalsPolicy,
}

#[derive(Debug, Clone)]
pub struct NormalizeOutput {
    pub canon_schema: Value,
    pub ptr_map: PtrMap,
    pub notes: Vec<Envelope>,
}
