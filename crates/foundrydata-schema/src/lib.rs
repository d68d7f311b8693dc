//! The dialect-independent schema node model. The normalizer builds a
//! tree of these from the raw JSON input; every downstream phase reads
//! `SchemaNode`s instead of re-parsing `serde_json::Value`.

mod node;

pub use foundrydata_ptrmap::{CanonPointer, PtrMap};
pub use node::{
    AdditionalProperties, ArrayNode, CompositeKind, ConditionalNode, Dialect, NumberNode,
    ObjectNode, SchemaNode, StringNode,
};

/// Default cap on `$ref` resolution depth (§9 design notes).
pub const DEFAULT_MAX_REF_DEPTH: u32 = 16;
