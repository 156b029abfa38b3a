use n8n_workflow::core::workflow::{
    resolve_connections, resolve_connections_with_diagnostics, ResolveDiagnostic,
};
use n8n_workflow_types::{Connections, WorkflowNode};
use serde_json::{json, Value};

fn nodes(pairs: &[(&str, &str)]) -> Vec<WorkflowNode> {
    pairs
        .iter()
        .map(|(id, name)| WorkflowNode::new(*id, *name))
        .collect()
}

fn graph(value: Value) -> Connections {
    serde_json::from_value(value).unwrap()
}

fn as_json(connections: &Connections) -> Value {
    serde_json::to_value(connections).unwrap()
}

/// Webhook -> HTTP -> Function -> Ghost, where Ghost is not a node.
///
/// Pruning works per port: the Function port that only pointed at Ghost is
/// removed, but the resolved source entry stays as `"n3": {"main": []}`
/// rather than disappearing from the graph. Only unresolvable sources are
/// dropped as a whole.
#[test]
fn test_webhook_http_function_scenario() {
    let nodes = nodes(&[("n1", "Webhook"), ("n2", "HTTP"), ("n3", "Function")]);
    let connections = graph(json!({
        "Webhook":  {"main": [[{"node": "HTTP"}]]},
        "HTTP":     {"main": [[{"node": "Function"}]]},
        "Function": {"main": [[{"node": "Ghost"}]]}
    }));

    let resolution = resolve_connections_with_diagnostics(&nodes, &connections);

    assert_eq!(
        as_json(&resolution.connections),
        json!({
            "n1": {"main": [[{"node": "n2"}]]},
            "n2": {"main": [[{"node": "n3"}]]},
            "n3": {"main": []}
        })
    );
    assert_eq!(
        resolution.diagnostics,
        vec![ResolveDiagnostic::UnknownTarget {
            source: "Function".to_string(),
            group: "main".to_string(),
            port: 0,
            target: "Ghost".to_string(),
        }]
    );
    assert_eq!(resolution.omissions(), 1);
}

#[test]
fn test_port_and_edge_order_is_preserved() {
    let nodes = nodes(&[("a", "A"), ("b", "B"), ("c", "C"), ("d", "D")]);
    let connections = graph(json!({
        "A": {"main": [
            [{"node": "D"}, {"node": "B"}, {"node": "C"}],
            [{"node": "C"}, {"node": "B"}]
        ]}
    }));

    let resolved = resolve_connections(&nodes, &connections);
    assert_eq!(
        as_json(&resolved),
        json!({"a": {"main": [
            [{"node": "d"}, {"node": "b"}, {"node": "c"}],
            [{"node": "c"}, {"node": "b"}]
        ]}})
    );
}

#[test]
fn test_source_order_follows_input() {
    let nodes = nodes(&[("1", "First"), ("2", "Second"), ("3", "Third")]);
    let connections = graph(json!({
        "Third":  {"main": [[{"node": "First"}]]},
        "First":  {"main": [[{"node": "Second"}]]},
        "Second": {"main": [[{"node": "Third"}]]}
    }));

    let resolved = resolve_connections(&nodes, &connections);
    let keys: Vec<&str> = resolved.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["3", "1", "2"]);
}

#[test]
fn test_only_node_field_is_rewritten() {
    let nodes = nodes(&[("n1", "Start"), ("n2", "IF")]);
    let connections = graph(json!({
        "Start": {"main": [[{"node": "IF", "type": "main", "index": 1, "custom": {"k": [1, 2]}}]]}
    }));

    let resolved = resolve_connections(&nodes, &connections);
    assert_eq!(
        as_json(&resolved)["n1"]["main"][0][0],
        json!({"node": "n2", "type": "main", "index": 1, "custom": {"k": [1, 2]}})
    );
}

#[test]
fn test_ai_connection_groups_survive_alongside_main() {
    let nodes = nodes(&[
        ("agent", "AI Agent"),
        ("model", "OpenAI Chat Model"),
        ("tool", "Calculator"),
        ("out", "Respond"),
    ]);
    let connections = graph(json!({
        "OpenAI Chat Model": {
            "ai_languageModel": [[{"node": "AI Agent", "type": "ai_languageModel", "index": 0}]]
        },
        "Calculator": {
            "ai_tool": [[
                {"node": "AI Agent", "type": "ai_tool", "index": 0},
                {"node": "Old Agent", "type": "ai_tool", "index": 0}
            ]]
        },
        "AI Agent": {"main": [[{"node": "Respond", "type": "main", "index": 0}]]}
    }));

    let resolution = resolve_connections_with_diagnostics(&nodes, &connections);

    assert_eq!(
        as_json(&resolution.connections),
        json!({
            "model": {
                "ai_languageModel": [[{"node": "agent", "type": "ai_languageModel", "index": 0}]]
            },
            "tool": {"ai_tool": [[{"node": "agent", "type": "ai_tool", "index": 0}]]},
            "agent": {"main": [[{"node": "out", "type": "main", "index": 0}]]}
        })
    );
    assert_eq!(
        resolution.diagnostics,
        vec![ResolveDiagnostic::UnknownTarget {
            source: "Calculator".to_string(),
            group: "ai_tool".to_string(),
            port: 0,
            target: "Old Agent".to_string(),
        }]
    );
}

#[test]
fn test_group_order_within_a_source_is_preserved() {
    let nodes = nodes(&[("a", "A"), ("b", "B")]);
    let connections = graph(json!({
        "A": {
            "main": [[{"node": "B"}]],
            "ai_tool": [[{"node": "B"}]],
            "ai_memory": [[{"node": "Gone"}]]
        }
    }));

    let resolved = resolve_connections(&nodes, &connections);
    let groups: Vec<&str> = resolved["a"].groups.keys().map(String::as_str).collect();
    assert_eq!(groups, vec!["main", "ai_tool", "ai_memory"]);
    assert_eq!(as_json(&resolved)["a"]["ai_memory"], json!([]));
}

#[test]
fn test_dangling_source_is_omitted() {
    let nodes = nodes(&[("n1", "A")]);
    let connections = graph(json!({
        "Removed": {"main": [[{"node": "A"}]]},
        "A": {"main": [[{"node": "A"}]]}
    }));

    let resolution = resolve_connections_with_diagnostics(&nodes, &connections);
    assert!(!resolution.connections.contains_key("Removed"));
    assert_eq!(resolution.connections.len(), 1);
    assert_eq!(
        resolution.diagnostics,
        vec![ResolveDiagnostic::UnknownSource {
            source: "Removed".to_string()
        }]
    );
}

#[test]
fn test_dangling_target_keeps_siblings() {
    let nodes = nodes(&[("n1", "A"), ("n2", "B"), ("n3", "C")]);
    let connections = graph(json!({
        "A": {"main": [[{"node": "B"}, {"node": "Gone"}, {"node": "C"}]]}
    }));

    let resolved = resolve_connections(&nodes, &connections);
    assert_eq!(
        as_json(&resolved),
        json!({"n1": {"main": [[{"node": "n2"}, {"node": "n3"}]]}})
    );
}

#[test]
fn test_fully_dangling_port_shrinks_main() {
    let nodes = nodes(&[("n1", "IF"), ("n2", "True"), ("n3", "Done")]);
    let connections = graph(json!({
        "IF": {"main": [
            [{"node": "True"}],
            [{"node": "Deleted"}],
            [{"node": "Done"}]
        ]}
    }));

    let resolved = resolve_connections(&nodes, &connections);
    // Port 1 disappears, so the former port 2 moves up.
    assert_eq!(
        as_json(&resolved),
        json!({"n1": {"main": [[{"node": "n2"}], [{"node": "n3"}]]}})
    );
}

#[test]
fn test_empty_input_yields_empty_output() {
    let nodes = nodes(&[("n1", "A")]);
    let resolution = resolve_connections_with_diagnostics(&nodes, &Connections::new());
    assert_eq!(as_json(&resolution.connections), json!({}));
    assert!(resolution.diagnostics.is_empty());

    let resolved = resolve_connections(&[], &graph(json!({"A": {"main": [[{"node": "A"}]]}})));
    assert!(resolved.is_empty());
}

#[test]
fn test_duplicate_names_resolve_to_later_node() {
    let nodes = nodes(&[("first", "Set"), ("start", "Start"), ("second", "Set")]);
    let connections = graph(json!({
        "Start": {"main": [[{"node": "Set"}]]},
        "Set": {"main": [[{"node": "Start"}]]}
    }));

    let resolution = resolve_connections_with_diagnostics(&nodes, &connections);
    assert_eq!(
        as_json(&resolution.connections),
        json!({
            "start": {"main": [[{"node": "second"}]]},
            "second": {"main": [[{"node": "start"}]]}
        })
    );
    assert_eq!(
        resolution.diagnostics,
        vec![ResolveDiagnostic::DuplicateNodeName {
            name: "Set".to_string(),
            kept_id: "second".to_string(),
            shadowed_id: "first".to_string(),
        }]
    );
    assert_eq!(resolution.omissions(), 0);
}

#[test]
fn test_inputs_are_not_mutated() {
    let nodes = nodes(&[("n1", "A"), ("n2", "B")]);
    let connections = graph(json!({"A": {"main": [[{"node": "B"}, {"node": "X"}]]}}));
    let before = connections.clone();

    let _ = resolve_connections(&nodes, &connections);
    assert_eq!(connections, before);
}

#[test]
fn test_diagnostics_serialize_with_kind_tag() {
    let diagnostic = ResolveDiagnostic::UnknownTarget {
        source: "Function".to_string(),
        group: "main".to_string(),
        port: 0,
        target: "Ghost".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&diagnostic).unwrap(),
        json!({
            "kind": "unknown_target",
            "source": "Function",
            "group": "main",
            "port": 0,
            "target": "Ghost"
        })
    );
    assert!(diagnostic.to_string().contains("'Ghost'"));
}
