//! Lifts `if`/`then`/`else` under the `rewriteConditionals` policy.
//!
//! `never` leaves conditionals untouched (the composer and generator
//! must still understand raw `if/then/else`). `safe` only drops an `if`
//! that carries neither `then` nor `else` (it adds no constraint).
//! `aggressive` rewrites the conditional into the equivalent
//! `anyOf`/`allOf`/`not` boolean form, so later phases only have to
//! reason about plain combinators for schemas this policy was applied to.

use serde_json::{json, Value};

use foundrydata_ptrmap::CanonPointer;

use crate::types::RewriteConditionalsPolicy;
use crate::walk::visit_objects_mut;

pub fn lift_conditionals(schema: &mut Value, policy: RewriteConditionalsPolicy) {
    if policy == RewriteConditionalsPolicy::Never {
        return;
    }
    visit_objects_mut(schema, &CanonPointer::root(), &mut |map, _path| {
        if !map.contains_key("if") {
            return;
        }
        let then_ = map.remove("then");
        let else_ = map.remove("else");

        if then_.is_none() && else_.is_none() {
            map.remove("if");
            return;
        }

        if policy == RewriteConditionalsPolicy::Safe {
            if let Some(t) = then_ {
                map.insert("then".to_string(), t);
            }
            if let Some(e) = else_ {
                map.insert("else".to_string(), e);
            }
            return;
        }

        let if_schema = map.remove("if").unwrap_or(Value::Bool(true));
        let not_if = json!({"not": if_schema.clone()});

        let mut branches = Vec::new();
        if let Some(t) = then_.clone() {
            branches.push(json!({"allOf": [if_schema.clone(), t]}));
        }
        match else_ {
            Some(e) => branches.push(json!({"allOf": [not_if, e]})),
            None => {
                if then_.is_some() {
                    branches.push(not_if);
                }
            }
        }

        let existing_allof = map.remove("allOf");
        let mut allof_members = match existing_allof {
            Some(Value::Array(a)) => a,
            _ => Vec::new(),
        };
        allof_members.push(json!({"anyOf": branches}));
        map.insert("allOf".to_string(), Value::Array(allof_members));
    });
}
