//! Repository discovery.

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use crate::error::RepoError;

/// Resolve `path` to the working directory of the repository containing it.
pub fn resolve_workdir(path: &Path) -> Result<PathBuf, RepoError> {
    let repo = Repository::discover(path).map_err(|source| RepoError::NotARepository {
        path: path.to_path_buf(),
        source,
    })?;

    let workdir = repo.workdir().ok_or(RepoError::BareRepository)?;
    debug!("Resolved {} to working tree {}", path.display(), workdir.display());

    // git2 reports the working tree with a trailing separator.
    Ok(workdir.components().collect())
}
