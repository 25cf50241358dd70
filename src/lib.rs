//! vcslet - a miniature git-like version control system
//!
//! a content-addressed object store (blobs, trees, commits) plus the refs,
//! index, and three-way merge machinery needed to snapshot a working tree,
//! name snapshots via branches, diff arbitrary snapshots against each other,
//! and reconcile divergent histories — including push/pull against another
//! repository reachable on the local filesystem.
//!
//! # Core concepts
//!
//! - **Blob**: content-addressed file data.
//! - **Tree**: a directory listing referencing blobs and trees by hash.
//! - **Commit**: a snapshot of a tree plus 0..n parent commits.
//! - **Ref**: a named pointer to a commit (`refs/heads/<name>`, `HEAD`, ...).
//!
//! # Hash format
//!
//! every object is addressed by the SHA-256 digest of its exact serialized
//! bytes; two objects with identical payloads collapse to one.
//!
//! # Example usage
//!
//! ```no_run
//! use vcslet::{commands, Repository};
//!
//! let repo = Repository::init(std::path::Path::new("/path/to/repo"), false).unwrap();
//! commands::add(&repo, "src").unwrap();
//! commands::commit(&repo, Some("initial commit")).unwrap();
//! ```

mod clock;
mod config;
mod diff;
mod error;
mod hash;
mod index;
mod merge;
mod object;
mod refs;
mod remote;
mod repo;
mod workingcopy;

pub mod commands;

pub use config::Config;
pub use diff::{name_status, toc_diff, Diff, DiffEntry, DiffStatus};
pub use error::{Error, Result};
pub use hash::Hash;
pub use index::Index;
pub use merge::MergeState;
pub use object::{Commit, Toc, Tree, TreeEntry, TreeEntryKind};
pub use repo::Repository;
