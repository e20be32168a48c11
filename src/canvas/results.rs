//! Mapping execution step results onto output nodes

use crate::api::ExecutionStatus;
use crate::workflow::{Node, OutputCatalog, Snapshot};
use serde_json::Value;
use std::sync::Arc;

/// Conventional response fields, checked in priority order
pub const RESPONSE_FIELDS: [&str; 4] = ["response", "result", "output", "text"];

/// Human-readable text for a step's computed value
///
/// Strings are used verbatim. Objects yield their first conventional response
/// field, falling back to pretty-printed JSON. Anything else is stringified.
pub fn result_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => RESPONSE_FIELDS
            .iter()
            .find_map(|field| map.get(*field))
            .map(|field| match field {
                Value::String(text) => text.clone(),
                other => pretty(other),
            })
            .unwrap_or_else(|| pretty(value)),
        other => other.to_string(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Build the next snapshot with result text written into every eligible output node
///
/// Returns `None` when no output node has a step result. Untouched nodes keep
/// their `Arc`s.
pub fn apply_results(
    snapshot: &Snapshot,
    status: &ExecutionStatus,
    catalog: &dyn OutputCatalog,
) -> Option<(Snapshot, usize)> {
    let mut updated = 0;
    let nodes: Vec<Arc<Node>> = snapshot
        .nodes
        .iter()
        .map(|node| {
            if !catalog.is_output(&node.data.id) {
                return Arc::clone(node);
            }
            let Some(step) = status.step_results.get(&node.id) else {
                return Arc::clone(node);
            };
            let source = match step.data() {
                Some(data) => data,
                None if !step.output_data.is_null() => &step.output_data,
                None => return Arc::clone(node),
            };

            let mut next = Node::clone(node);
            if next.data.set_output_text(result_text(source)) {
                updated += 1;
                Arc::new(next)
            } else {
                tracing::debug!("Output node '{}' has a non-output payload, skipping", node.id);
                Arc::clone(node)
            }
        })
        .collect();

    if updated == 0 {
        return None;
    }

    Some((
        Snapshot {
            nodes,
            edges: snapshot.edges.clone(),
        },
        updated,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_are_verbatim() {
        assert_eq!(result_text(&json!("plain")), "plain");
    }

    #[test]
    fn response_fields_follow_priority() {
        assert_eq!(result_text(&json!({ "text": "t", "result": "r" })), "r");
        assert_eq!(result_text(&json!({ "output": "o", "text": "t" })), "o");
        assert_eq!(result_text(&json!({ "response": "Hello" })), "Hello");
    }

    #[test]
    fn unknown_objects_fall_back_to_pretty_json() {
        assert_eq!(result_text(&json!({ "foo": "bar" })), "{\n  \"foo\": \"bar\"\n}");
    }

    #[test]
    fn non_string_fields_are_pretty_printed() {
        assert_eq!(result_text(&json!({ "result": [1] })), "[\n  1\n]");
    }

    #[test]
    fn scalars_are_stringified() {
        assert_eq!(result_text(&json!(42)), "42");
        assert_eq!(result_text(&json!(true)), "true");
        assert_eq!(result_text(&Value::Null), "null");
    }
}
