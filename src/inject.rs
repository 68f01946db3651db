// src/inject.rs

//! Input document rewrite performed by the submission handler.
//!
//! Every object that carries a `resources` key is treated as a Batch
//! container override fragment. Its `resources` object receives an
//! `Environment` list so the job containers know which workflow execution
//! they belong to. The walk runs over the parsed tree, depth-first, and
//! descends into arrays as well as objects.

use serde_json::{json, Map, Value};

use crate::error::SubmitError;
use crate::execution_id::ExecutionId;

pub const RESOURCES_KEY: &str = "resources";
pub const ENVIRONMENT_KEY: &str = "Environment";

/// Parse `input`, inject the environment overrides and merge the workflow
/// identity into the top-level object.
pub fn prepare_input(
    input: &str,
    workflow_name: &str,
    execution_id: &ExecutionId,
) -> Result<Value, SubmitError> {
    let mut doc: Value =
        serde_json::from_str(input).map_err(|e| SubmitError::InvalidInput(e.to_string()))?;

    inject_environment(&mut doc, workflow_name, execution_id);

    let top = doc.as_object_mut().ok_or_else(|| {
        SubmitError::InvalidInput("top-level document must be a JSON object".to_string())
    })?;
    merge_identity(top, workflow_name, execution_id);

    Ok(doc)
}

/// Inject `Environment` into every `resources` fragment, at any depth.
pub fn inject_environment(value: &mut Value, workflow_name: &str, execution_id: &ExecutionId) {
    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                inject_environment(child, workflow_name, execution_id);
            }

            if let Some(Value::Object(resources)) = map.get_mut(RESOURCES_KEY) {
                resources.insert(
                    ENVIRONMENT_KEY.to_string(),
                    environment_entries(workflow_name, execution_id),
                );
            }
        }
        Value::Array(items) => {
            for item in items {
                inject_environment(item, workflow_name, execution_id);
            }
        }
        _ => {}
    }
}

pub fn merge_identity(top: &mut Map<String, Value>, workflow_name: &str, execution_id: &ExecutionId) {
    top.insert("workflow_name".to_string(), Value::from(workflow_name));
    top.insert("execution_id".to_string(), Value::from(execution_id.as_str()));
}

fn environment_entries(workflow_name: &str, execution_id: &ExecutionId) -> Value {
    json!([
        { "Name": "WORKFLOW_NAME", "Value": workflow_name },
        { "Name": "EXECUTION_ID", "Value": execution_id.as_str() }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id() -> ExecutionId {
        ExecutionId("11111111-2222-3333-4444-555555555555".to_string())
    }

    fn env_of(fragment: &Value) -> &Vec<Value> {
        fragment[RESOURCES_KEY][ENVIRONMENT_KEY].as_array().unwrap()
    }

    #[test]
    fn document_without_resources_only_gains_identity() {
        let input = r#"{"a": 1, "nested": {"b": [1, 2, {"c": null}]}}"#;
        let out = prepare_input(input, "wf1", &id()).unwrap();

        let mut expected: Value = serde_json::from_str(input).unwrap();
        expected["workflow_name"] = json!("wf1");
        expected["execution_id"] = json!(id().as_str());
        assert_eq!(out, expected);
    }

    #[test]
    fn nested_resources_fragments_are_injected() {
        let input = r#"{
            "resources": {"Memory": 1024},
            "params": {
                "stepA": {"resources": {"Vcpus": 2}},
                "steps": [{"deeper": {"resources": {}}}]
            }
        }"#;
        let out = prepare_input(input, "wf1", &id()).unwrap();

        for fragment in [
            &out,
            &out["params"]["stepA"],
            &out["params"]["steps"][0]["deeper"],
        ] {
            let env = env_of(fragment);
            assert_eq!(env.len(), 2);
            assert_eq!(env[0], json!({"Name": "WORKFLOW_NAME", "Value": "wf1"}));
            assert_eq!(env[1], json!({"Name": "EXECUTION_ID", "Value": id().as_str()}));
        }
        assert_eq!(out["params"]["stepA"]["resources"]["Vcpus"], 2);
    }

    #[test]
    fn existing_environment_is_replaced() {
        let input = r#"{"resources": {"Environment": [{"Name": "X", "Value": "1"}]}}"#;
        let out = prepare_input(input, "wf1", &id()).unwrap();
        let env = env_of(&out);
        assert_eq!(env.len(), 2);
        assert_eq!(env[0]["Name"], "WORKFLOW_NAME");
    }

    #[test]
    fn non_object_resources_are_left_alone() {
        let input = r#"{"resources": "none", "list": {"resources": [1, 2]}}"#;
        let out = prepare_input(input, "wf1", &id()).unwrap();
        assert_eq!(out["resources"], "none");
        assert_eq!(out["list"]["resources"], json!([1, 2]));
    }

    #[test]
    fn identity_overwrites_existing_fields() {
        let input = r#"{"workflow_name": "old", "execution_id": "old"}"#;
        let out = prepare_input(input, "wf1", &id()).unwrap();
        assert_eq!(out["workflow_name"], "wf1");
        assert_eq!(out["execution_id"], id().as_str());
    }

    #[test]
    fn malformed_input_is_rejected() {
        let err = prepare_input("{not json", "wf1", &id()).unwrap_err();
        assert!(matches!(err, SubmitError::InvalidInput(_)));
    }

    #[test]
    fn non_object_document_is_rejected() {
        let err = prepare_input("[1, 2]", "wf1", &id()).unwrap_err();
        assert!(matches!(err, SubmitError::InvalidInput(_)));
    }

    fn count_fragments(value: &Value) -> usize {
        match value {
            Value::Object(map) => {
                let own = usize::from(matches!(map.get(RESOURCES_KEY), Some(Value::Object(_))));
                own + map.values().map(count_fragments).sum::<usize>()
            }
            Value::Array(items) => items.iter().map(count_fragments).sum(),
            _ => 0,
        }
    }

    fn all_fragments_injected(value: &Value, wf: &str, exec: &str) -> bool {
        match value {
            Value::Object(map) => {
                let own_ok = match map.get(RESOURCES_KEY) {
                    Some(Value::Object(res)) => {
                        res.get(ENVIRONMENT_KEY)
                            == Some(&json!([
                                { "Name": "WORKFLOW_NAME", "Value": wf },
                                { "Name": "EXECUTION_ID", "Value": exec }
                            ]))
                    }
                    _ => true,
                };
                own_ok && map.values().all(|v| all_fragments_injected(v, wf, exec))
            }
            Value::Array(items) => items.iter().all(|v| all_fragments_injected(v, wf, exec)),
            _ => true,
        }
    }

    fn doc_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i32>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
        ];
        leaf.prop_recursive(4, 48, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map(
                    prop_oneof![Just(RESOURCES_KEY.to_string()), "[a-z]{1,5}"],
                    inner,
                    0..4
                )
                .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn every_fragment_gets_one_environment(doc in doc_strategy()) {
            let exec = ExecutionId("exec-1".to_string());
            let mut rewritten = doc.clone();
            inject_environment(&mut rewritten, "wf", &exec);
            prop_assert_eq!(count_fragments(&rewritten), count_fragments(&doc));
            prop_assert!(all_fragments_injected(&rewritten, "wf", "exec-1"));
        }

        #[test]
        fn documents_without_fragments_are_untouched(doc in doc_strategy()) {
            prop_assume!(count_fragments(&doc) == 0);
            let exec = ExecutionId("exec-1".to_string());
            let mut rewritten = doc.clone();
            inject_environment(&mut rewritten, "wf", &exec);
            prop_assert_eq!(rewritten, doc);
        }
    }
}
