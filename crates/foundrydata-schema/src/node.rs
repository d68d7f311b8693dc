use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an object node does with keys that match neither `properties`
/// nor `patternProperties`.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    Allowed,
    Forbidden,
    Schema(Box<SchemaNode>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectNode {
    pub properties: BTreeMap<String, SchemaNode>,
    pub pattern_properties: BTreeMap<String, SchemaNode>,
    pub property_names: Option<Box<SchemaNode>>,
    pub required: Vec<String>,
    pub additional_properties: Option<AdditionalProperties>,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayNode {
    pub items: Option<Box<SchemaNode>>,
    pub prefix_items: Vec<SchemaNode>,
    pub contains: Option<Box<SchemaNode>>,
    pub min_contains: Option<u64>,
    pub max_contains: Option<u64>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringNode {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumberNode {
    pub is_integer: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
}

/// The combinator an allOf/anyOf/oneOf/not node expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    AllOf,
    AnyOf,
    OneOf,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalNode {
    pub if_: Box<SchemaNode>,
    pub then_: Option<Box<SchemaNode>>,
    pub else_: Option<Box<SchemaNode>>,
}

/// The normalized, dialect-independent schema node. Keywords the core
/// does not recognize fall through to [`SchemaNode::Opaque`] rather than
/// being dropped, so an unrecognized keyword never silently vanishes
/// from a round-tripped canonical schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object(ObjectNode),
    Array(ArrayNode),
    String(StringNode),
    Number(NumberNode),
    Boolean,
    Null,
    Ref(String),
    Composite(CompositeKind, Vec<SchemaNode>),
    ConditionalIf(ConditionalNode),
    Const(Value),
    Enum(Vec<Value>),
    /// `true`/`{}` (accepts anything) or `false` (accepts nothing).
    BooleanSchema(bool),
    Opaque(Value),
}

impl SchemaNode {
    #[must_use]
    pub fn is_neutral_true(&self) -> bool {
        matches!(self, Self::BooleanSchema(true))
            || matches!(self, Self::Object(o) if *o == ObjectNode::default())
    }

    #[must_use]
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, Self::BooleanSchema(false))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "https://json-schema.org/draft/2020-12/schema")]
    Draft202012,
    #[serde(rename = "https://json-schema.org/draft/2019-09/schema")]
    Draft201909,
    #[serde(rename = "http://json-schema.org/draft-07/schema#")]
    Draft07,
    #[serde(rename = "https://spec.openapis.org/oas/3.1/schema-base")]
    OpenApi31,
}

impl Dialect {
    #[must_use]
    pub fn as_uri(self) -> &'static str {
        match self {
            Self::Draft202012 => "https://json-schema.org/draft/2020-12/schema",
            Self::Draft201909 => "https://json-schema.org/draft/2019-09/schema",
            Self::Draft07 => "http://json-schema.org/draft-07/schema#",
            Self::OpenApi31 => "https://spec.openapis.org/oas/3.1/schema-base",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_schema_true_is_neutral() {
        assert!(SchemaNode::BooleanSchema(true).is_neutral_true());
        assert!(!SchemaNode::BooleanSchema(false).is_neutral_true());
    }

    #[test]
    fn empty_object_node_is_neutral() {
        let node = SchemaNode::Object(ObjectNode::default());
        assert!(node.is_neutral_true());
    }

    #[test]
    fn dialect_round_trips_through_uri() {
        assert_eq!(Dialect::Draft202012.as_uri(), Dialect::Draft202012.as_uri());
        assert_ne!(Dialect::Draft202012.as_uri(), Dialect::Draft07.as_uri());
    }
}
