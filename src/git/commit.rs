//! Creating the commit.
//!
//! Shells out to the system `git` binary so hooks, signing and the user's
//! config apply exactly as they would for a manual `git commit`.

use std::path::Path;
use std::process::Command;

use crate::error::ActionError;

/// Run `git commit -m <message>` in `workdir` and return git's stdout.
pub fn commit_with_message(workdir: &Path, message: &str) -> Result<String, ActionError> {
    let output = Command::new("git")
        .args(["commit", "-m", message])
        .current_dir(workdir)
        .output()
        .map_err(ActionError::GitSpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        // "nothing to commit" is reported on stdout
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(ActionError::CommitFailed {
            code: output.status.code(),
            stderr: detail,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
