//! Git operations.

pub mod commit;
pub mod repo;

pub use commit::commit_with_message;
pub use repo::resolve_workdir;
