//! Integration tests for the codeflow binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ASK_AND_BRANCH: &str = r#"{
  "name": "greeting",
  "description": "Ask and branch",
  "start_step": "ask",
  "steps": {
    "ask": {
      "step_type": "user_input",
      "description": "Ask for a name",
      "arguments": {"prompt": "Name? "},
      "next_on_success": "check"
    },
    "check": {
      "step_type": "conditional",
      "description": "Was a name given",
      "arguments": {"condition": "len({ask.input}) > 0"}
    }
  }
}"#;

fn write_workflow(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("flow.json");
    fs::write(&path, content).unwrap();
    path
}

fn codeflow(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("codeflow"));
    cmd.current_dir(temp.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("codeflow"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("plan"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("codeflow"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn validate_accepts_good_workflow() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let file = write_workflow(temp.path(), ASK_AND_BRANCH);

    codeflow(&temp)
        .arg("validate")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workflow 'greeting' is valid (2 steps)"));
    Ok(())
}

#[test]
fn validate_reports_dangling_edge() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let file = write_workflow(
        temp.path(),
        r#"{"name":"w","description":"","start_step":"a","steps":{
            "a":{"step_type":"user_input","description":"","arguments":{},"next_on_failure":"ghost"}}}"#,
    );

    codeflow(&temp)
        .arg("validate")
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown step 'ghost'"));
    Ok(())
}

#[test]
fn validate_missing_file_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    codeflow(&temp)
        .args(["validate", "missing.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Workflow not found"));
    Ok(())
}

#[test]
fn show_lists_steps() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let file = write_workflow(temp.path(), ASK_AND_BRANCH);

    codeflow(&temp)
        .arg("show")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Start: ask"))
        .stdout(predicate::str::contains("ask [user_input] Ask for a name"))
        .stdout(predicate::str::contains("on success -> check"));
    Ok(())
}

#[test]
fn run_answers_prompts_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let file = write_workflow(temp.path(), ASK_AND_BRANCH);
    let results = temp.path().join("results.json");

    codeflow(&temp)
        .arg("run")
        .arg(&file)
        .arg("--non-interactive")
        .arg("--results-out")
        .arg(&results)
        .env("CODEFLOW_PROMPT_ASK", "Ada")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workflow 'greeting' complete"));

    let snapshot: serde_json::Value = serde_json::from_str(&fs::read_to_string(&results)?)?;
    assert_eq!(snapshot["results"]["ask"]["input"], "Ada");
    assert_eq!(snapshot["results"]["check"]["condition"], true);
    assert_eq!(snapshot["visited"], serde_json::json!(["ask", "check"]));
    Ok(())
}

#[test]
fn run_without_prompt_answer_records_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let file = write_workflow(temp.path(), ASK_AND_BRANCH);

    codeflow(&temp)
        .arg("run")
        .arg(&file)
        .arg("--non-interactive")
        .env_remove("CODEFLOW_PROMPT_ASK")
        .assert()
        .success()
        .stderr(predicate::str::contains("CODEFLOW_PROMPT_ASK"));
    Ok(())
}

#[test]
fn run_missing_workflow_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    codeflow(&temp)
        .args(["run", "nope.json", "--non-interactive"])
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn run_missing_explicit_config_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let file = write_workflow(temp.path(), ASK_AND_BRANCH);

    codeflow(&temp)
        .arg("--config")
        .arg(temp.path().join("absent.yml"))
        .arg("run")
        .arg(&file)
        .arg("--non-interactive")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn run_unknown_start_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let file = write_workflow(temp.path(), ASK_AND_BRANCH);

    codeflow(&temp)
        .arg("run")
        .arg(&file)
        .args(["--from", "ghost", "--non-interactive"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown step: 'ghost'"));
    Ok(())
}

#[test]
fn run_generates_code_through_http_service() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"choices":[{"message":{"content":"```python\nprint('olleh')\n```"}}]}"#);
    });

    let temp = TempDir::new()?;
    let out = temp.path().join("out.txt");
    let workflow = serde_json::json!({
        "name": "reverse",
        "description": "",
        "start_step": "gen",
        "steps": {
            "gen": {
                "step_type": "code_generation",
                "description": "Generate",
                "arguments": {"task": "reverse a string"},
                "next_on_success": "save"
            },
            "save": {
                "step_type": "file_operation",
                "description": "Save",
                "arguments": {"operation": "write", "filename": out.to_string_lossy(), "previous_step": "gen"}
            }
        }
    });
    let file = write_workflow(temp.path(), &workflow.to_string());

    codeflow(&temp)
        .arg("run")
        .arg(&file)
        .arg("--non-interactive")
        .env("CODEFLOW_BASE_URL", server.url("/v1"))
        .env("CODEFLOW_MAX_RETRIES", "0")
        .assert()
        .success();

    mock.assert();
    assert_eq!(fs::read_to_string(&out)?, "print('olleh')");
    Ok(())
}

#[test]
fn project_settings_choose_model() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_includes("\"model\":\"project-model\"");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"choices":[{"message":{"content":"x = 1"}}]}"#);
    });

    let temp = TempDir::new()?;
    fs::create_dir_all(temp.path().join(".codeflow"))?;
    fs::write(
        temp.path().join(".codeflow").join("config.yml"),
        format!(
            "generation:\n  base_url: {}\n  model: project-model\nretry:\n  max_retries: 0\n",
            server.url("/v1")
        ),
    )?;
    let file = write_workflow(
        temp.path(),
        r#"{"name":"g","description":"","start_step":"gen","steps":{
            "gen":{"step_type":"code_generation","description":"","arguments":{"task":"t"}}}}"#,
    );

    codeflow(&temp)
        .arg("--project")
        .arg(temp.path())
        .arg("run")
        .arg(&file)
        .arg("--non-interactive")
        .env_remove("CODEFLOW_MODEL")
        .env_remove("CODEFLOW_BASE_URL")
        .assert()
        .success();

    mock.assert();
    Ok(())
}
