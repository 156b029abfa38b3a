use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const N8N_VARS: &[&str] = &[
    "N8N_BASE_URL",
    "N8N_API_KEY",
    "N8N_API_PATH",
    "N8N_WEBHOOK_PREFIX",
    "N8N_REQUEST_TIMEOUT",
    "N8N_ENV",
    "NODE_ENV",
    "N8N_WORKFLOW_LOG_FILE",
    "N8N_WORKFLOW_LOG_LEVEL",
    "N8N_WORKFLOW_CONSOLE_OUTPUT",
    "RUST_LOG",
];

/// Command running in `dir` with no inherited n8n settings.
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("n8n-workflow").unwrap();
    cmd.current_dir(dir.path());
    for var in N8N_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("WORKFLOW COMMANDS"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("cleanup"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_test_command_requires_a_target() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("test")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_resolve_prints_id_keyed_connections_offline() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("workflow.json"),
        json!({
            "name": "W",
            "nodes": [
                {"id": "n1", "name": "Webhook"},
                {"id": "n2", "name": "HTTP"},
                {"id": "n3", "name": "Function"}
            ],
            "connections": {
                "Webhook": {"main": [[{"node": "HTTP"}]]},
                "HTTP": {"main": [[{"node": "Function"}]]},
                "Function": {"main": [[{"node": "Ghost"}]]}
            }
        })
        .to_string(),
    )
    .unwrap();

    let output = cli(&dir).arg("resolve").output().unwrap();
    assert!(output.status.success());

    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        printed,
        json!({
            "n1": {"main": [[{"node": "n2"}]]},
            "n2": {"main": [[{"node": "n3"}]]},
            "n3": {"main": []}
        })
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: target node 'Ghost'"));
}

#[test]
fn test_resolve_ignores_profile_and_connection_settings() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("flows")).unwrap();
    fs::write(
        dir.path().join("config.yml"),
        "default_workflow_file: flows/agent.json\nenvironments:\n  prod:\n    base_url: http://n8n.internal\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("flows/agent.json"),
        json!({
            "name": "Agent",
            "nodes": [{"id": "m1", "name": "Model"}, {"id": "a1", "name": "Agent"}],
            "connections": {"Model": {"ai_languageModel": [[{"node": "Agent"}]]}}
        })
        .to_string(),
    )
    .unwrap();

    let output = cli(&dir)
        .args(["resolve", "--env", "staging"])
        .env("N8N_REQUEST_TIMEOUT", "bogus")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, json!({"m1": {"ai_languageModel": [[{"node": "a1"}]]}}));
}

#[test]
fn test_network_command_without_configuration_fails() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("list")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: N8N base URL is not configured"));
}

#[test]
fn test_env_masks_secrets() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("env")
        .env("N8N_BASE_URL", "http://localhost:5678")
        .env("N8N_API_KEY", "abcdefghijklmnop")
        .assert()
        .success()
        .stdout(predicate::str::contains("N8N_BASE_URL=http://localhost:5678"))
        .stdout(predicate::str::contains("N8N_API_KEY=abcd...mnop"))
        .stdout(predicate::str::contains("abcdefghijklmnop").not());
}

#[test]
fn test_init_scaffolds_and_refuses_second_run() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["init", "project", "--name", "Stock alerts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workflow project \"Stock alerts\" created"));

    let workflow = fs::read_to_string(dir.path().join("project").join("workflow.json")).unwrap();
    assert!(workflow.contains("\"name\": \"Stock alerts\""));
    assert!(dir.path().join("project").join("docker-compose.yml").exists());

    cli(&dir)
        .args(["init", "project"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_against_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workflows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "wf1", "name": "Stock alerts", "active": true}],
            "nextCursor": null
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.yml"),
        format!(
            "environments:\n  dev:\n    base_url: {}\n    api_key: test-key\n",
            server.uri()
        ),
    )
    .unwrap();

    let output = tokio::task::spawn_blocking(move || {
        cli(&dir).args(["list", "--format", "json"]).output()
    })
    .await
    .unwrap()
    .unwrap();
    assert!(output.status.success());
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["id"], "wf1");
    assert_eq!(listed[0]["active"], true);
}
