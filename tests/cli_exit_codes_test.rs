//! Exit codes of the claude-commit binary, driven by mock agent scripts.
#![cfg(unix)]

mod common;

use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::Duration;

use common::{TestRepo, assistant_text_line, create_mock_agent, result_line, stream_script};

const BIN: &str = env!("CARGO_BIN_EXE_claude-commit");

fn spawn_cli(agent: &Path, repo: &TestRepo, args: &[&str]) -> Child {
    Command::new(BIN)
        .args(args)
        .arg("--path")
        .arg(repo.path())
        .env("CLAUDE_COMMIT_CLAUDE_BIN", agent)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn claude-commit")
}

/// Run the binary to completion, feeding `stdin` to its confirmation prompt.
fn run_cli(agent: &Path, repo: &TestRepo, args: &[&str], stdin: &str) -> Output {
    let mut child = spawn_cli(agent, repo, args);
    {
        let mut input = child.stdin.take().expect("stdin is piped");
        input
            .write_all(stdin.as_bytes())
            .expect("Failed to write stdin");
    }
    child.wait_with_output().expect("Failed to wait for claude-commit")
}

fn answering_agent(message: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let text = assistant_text_line(&format!("COMMIT_MESSAGE:\n{}", message));
    let result = result_line(false);
    create_mock_agent(&stream_script(&[&text, &result]))
}

fn staged_repo() -> TestRepo {
    let repo = TestRepo::new();
    repo.write_file("b.txt", "b\n");
    repo.stage("b.txt");
    repo
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_preview_exits_zero() {
    let repo = staged_repo();
    let (_dir, agent) = answering_agent("feat: add b");

    let output = run_cli(&agent, &repo, &["--preview", "--commit"], "");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("feat: add b"));
    assert!(out.contains("Preview complete (no action taken)"));
    assert_eq!(repo.commit_count(), 1);
}

#[test]
fn test_piped_yes_commits() {
    let repo = staged_repo();
    let (_dir, agent) = answering_agent("feat: add b");

    let output = run_cli(&agent, &repo, &["--commit"], "y\n");

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Successfully committed!"));
    assert_eq!(repo.commit_count(), 2);
    assert_eq!(repo.head_message().trim_end(), "feat: add b");
}

#[test]
fn test_declined_commit_exits_zero() {
    let repo = staged_repo();
    let (_dir, agent) = answering_agent("feat: add b");

    for answer in ["n\n", "yes\n", ""] {
        let output = run_cli(&agent, &repo, &["--commit"], answer);

        assert_eq!(output.status.code(), Some(0), "answer {:?}", answer);
        assert!(stdout(&output).contains("Commit cancelled"), "answer {:?}", answer);
        assert_eq!(repo.commit_count(), 1);
    }
}

#[test]
fn test_failed_commit_exits_one() {
    // Nothing staged, so git refuses to commit
    let repo = TestRepo::new();
    let (_dir, agent) = answering_agent("feat: nothing");

    let output = run_cli(&agent, &repo, &["--commit"], "y\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to commit"));
    assert_eq!(repo.commit_count(), 1);
}

#[test]
fn test_error_result_exits_one() {
    let repo = staged_repo();
    let text = assistant_text_line("COMMIT_MESSAGE:\nfeat: unfinished");
    let result = result_line(true);
    let (_dir, agent) = create_mock_agent(&stream_script(&[&text, &result]));

    let output = run_cli(&agent, &repo, &[], "");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to generate commit message"));
}

#[test]
fn test_missing_agent_exits_one_with_install_hint() {
    let repo = staged_repo();

    let output = run_cli(Path::new("claude_commit_nonexistent_12345"), &repo, &[], "");

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Claude Code CLI not found"));
    assert!(err.contains("npm install -g @anthropic-ai/claude-code"));
}

#[test]
fn test_outside_repository_exits_one() {
    let (_dir, agent) = answering_agent("feat: x");
    let outside = tempfile::tempdir().unwrap();

    let output = Command::new(BIN)
        .arg("--path")
        .arg(outside.path())
        .env("CLAUDE_COMMIT_CLAUDE_BIN", &agent)
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Not a git repository"));
}

#[test]
fn test_interrupt_exits_130() {
    let repo = staged_repo();
    let (_dir, agent) = create_mock_agent("#!/bin/sh\nsleep 20\n");

    let child = spawn_cli(&agent, &repo, &[]);
    thread::sleep(Duration::from_millis(1500));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(130));
    assert!(stderr(&output).contains("Interrupted by user"));
}
