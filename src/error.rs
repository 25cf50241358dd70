use std::path::PathBuf;

use crate::Hash;

/// error type for vcslet operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // -- location errors --------------------------------------------------
    #[error("not a vcslet repository (or any parent up to /): {0}")]
    NoRepo(PathBuf),

    #[error("repository already exists at {0}")]
    RepoExists(PathBuf),

    #[error("this operation must be run in a work tree (repository is bare)")]
    BareRepository,

    // -- input errors -------------------------------------------------------
    #[error("ref not found: {0}")]
    RefNotFound(String),

    #[error("invalid ref name: {0}")]
    InvalidRef(String),

    #[error("pathspec '{0}' did not match any files")]
    PathspecNotFound(String),

    #[error("a branch named {0} already exists")]
    BranchExists(String),

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("corrupt object: hash mismatch for {0}")]
    CorruptObject(Hash),

    #[error("not a valid object name: {0}")]
    AmbiguousArgument(String),

    #[error("remote '{0}' already exists")]
    RemoteExists(String),

    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    #[error("'{0}' is a directory, not a file")]
    IsADirectory(PathBuf),

    #[error("'{0}' does not exist and --remove was not passed")]
    DoesNotExistUseRemove(PathBuf),

    #[error("'{0}' has staged content; use --add to overwrite")]
    UseAdd(PathBuf),

    #[error("invalid tree entry name: {0}")]
    InvalidEntryName(String),

    // -- state errors -------------------------------------------------------
    #[error("nothing to commit, working directory clean")]
    NothingToCommit,

    #[error("aborting commit due to empty commit message")]
    EmptyCommitMessage,

    #[error("you have unresolved conflicts in: {0:?}")]
    UnresolvedConflicts(Vec<String>),

    #[error("error: the following untracked working tree files would be overwritten: {0:?}")]
    WouldOverwrite(Vec<String>),

    #[error("already on '{0}'")]
    AlreadyOnBranch(String),

    #[error("'{0}' does not have any commits yet")]
    NoCommitsYet(String),

    #[error("cannot remove '{0}': recursive remove not specified and it is a directory")]
    NotRecursive(PathBuf),

    #[error("cannot remove '{0}': it has uncommitted changes")]
    HasUncommittedChanges(PathBuf),

    #[error("merging is not supported while HEAD is detached")]
    DetachedHeadMerge,

    #[error("cannot push to the branch '{0}' checked out at the remote")]
    RemoteBranchCheckedOut(String),

    #[error("failed to push some refs to {0}")]
    NonFastForward(String),

    // -- not-yet-implemented --------------------------------------------------
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    // -- ambient / plumbing --------------------------------------------------
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid hash hex: {0}")]
    InvalidHashHex(String),

    #[error("malformed object: {0}")]
    MalformedObject(String),

    #[error("malformed config at {path}: {message}")]
    MalformedConfig { path: PathBuf, message: String },

    #[error("malformed index at line {line}: {message}")]
    MalformedIndex { line: usize, message: String },

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
