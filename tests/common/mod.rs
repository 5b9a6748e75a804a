//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new git repository with a committer identity and one commit.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config.set_str("user.name", "Test User").expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");
        config
            .set_bool("commit.gpgsign", false)
            .expect("Failed to disable signing");

        let test_repo = Self { dir, repo };
        test_repo.write_file("README.md", "# test\n");
        test_repo.stage("README.md");
        test_repo.commit_index("init");
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join(name), content).expect("Failed to write test file");
    }

    /// Add a file to the index.
    pub fn stage(&self, name: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Commit the current index directly through git2.
    pub fn commit_index(&self, message: &str) -> Oid {
        let sig =
            Signature::now("Test User", "test@example.com").expect("Failed to create signature");
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Message of the commit HEAD points to.
    pub fn head_message(&self) -> String {
        self.repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map(|c| c.message().unwrap_or_default().to_string())
            .expect("Failed to read HEAD commit")
    }

    pub fn commit_count(&self) -> usize {
        let mut walk = self.repo.revwalk().expect("Failed to create revwalk");
        walk.push_head().expect("Failed to push HEAD");
        walk.count()
    }
}

/// Write an executable shell script standing in for the Claude CLI.
///
/// Returns the temp directory (keep it alive) and the script path.
pub fn create_mock_agent(script_content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let script_path = temp_dir.path().join("mock_claude.sh");

    let mut file = File::create(&script_path).expect("Failed to create mock script");
    file.write_all(script_content.as_bytes())
        .expect("Failed to write mock script");
    drop(file);

    let mut perms = fs::metadata(&script_path)
        .expect("Failed to get metadata")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script_path, perms).expect("Failed to set permissions");

    (temp_dir, script_path)
}

/// A mock agent script that prints `lines` on stdout and exits 0.
pub fn stream_script(lines: &[&str]) -> String {
    format!("#!/bin/sh\ncat <<'JSON'\n{}\nJSON\n", lines.join("\n"))
}

pub const INIT_LINE: &str = r#"{"type":"system","subtype":"init","cwd":"/repo","tools":["Bash","Read","Grep","Glob"]}"#;

pub fn assistant_text_line(text: &str) -> String {
    serde_json::json!({
        "type": "assistant",
        "message": {"role": "assistant", "content": [{"type": "text", "text": text}]}
    })
    .to_string()
}

pub fn result_line(is_error: bool) -> String {
    serde_json::json!({
        "type": "result",
        "subtype": if is_error { "error_during_execution" } else { "success" },
        "is_error": is_error,
        "duration_ms": 2500,
        "num_turns": 3,
        "total_cost_usd": 0.0042
    })
    .to_string()
}
