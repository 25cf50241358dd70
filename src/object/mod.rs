//! the content-addressed object store: blobs, trees, commits.
//!
//! Every object is stored as a single file named after the hash of its exact
//! bytes (`<repo>/objects/<hash>`) — writes are idempotent, and two objects
//! with identical payloads collapse to one (O1). No compression or packing
//! is applied, per spec's Non-goals.

mod commit;
mod tree;

pub use commit::{ancestors, is_ancestor, is_up_to_date, read_commit, write_commit, Commit};
pub use tree::{
    flatten, read_tree, write_tree, write_tree_from_toc, Toc, Tree, TreeEntry, TreeEntryKind,
};

use std::fs;
use std::path::PathBuf;

use crate::error::{IoResultExt, Result};
use crate::hash::Hash;
use crate::repo::Repository;

/// write raw bytes to the object store, returning their content-address.
/// idempotent: writing the same bytes twice is a no-op the second time.
pub fn write(repo: &Repository, content: &[u8]) -> Result<Hash> {
    let hash = Hash::of(content);
    let path = object_path(repo, &hash);
    if path.exists() {
        log::trace!("object {} already stored, skipping write", hash);
        return Ok(hash);
    }
    log::debug!("writing object {}", hash);
    fs::write(&path, content).with_path(&path)?;
    Ok(hash)
}

/// read an object's raw bytes. A missing object is not an error — it is
/// reported as `None`; callers decide what that means.
pub fn read(repo: &Repository, hash: &Hash) -> Result<Option<Vec<u8>>> {
    let path = object_path(repo, hash);
    match fs::read(&path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(crate::Error::Io { path, source: e }),
    }
}

pub fn exists(repo: &Repository, hash: &Hash) -> bool {
    object_path(repo, hash).exists()
}

/// enumerate the raw bytes of every stored object (used by the naive
/// object transfer during fetch/push — there is no delta/pack format).
pub fn all(repo: &Repository) -> Result<Vec<Vec<u8>>> {
    let dir = repo.objects_dir();
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut contents = Vec::new();
    for entry in fs::read_dir(&dir).with_path(&dir)? {
        let entry = entry.with_path(&dir)?;
        if entry.path().is_file() {
            contents.push(fs::read(entry.path()).with_path(entry.path())?);
        }
    }
    Ok(contents)
}

/// all hashes present in the object store
pub fn all_hashes(repo: &Repository) -> Result<Vec<Hash>> {
    let dir = repo.objects_dir();
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut hashes = Vec::new();
    for entry in fs::read_dir(&dir).with_path(&dir)? {
        let entry = entry.with_path(&dir)?;
        if let Some(name) = entry.file_name().to_str() {
            if let Some(hash) = Hash::parse(name) {
                hashes.push(hash);
            }
        }
    }
    Ok(hashes)
}

fn object_path(repo: &Repository, hash: &Hash) -> PathBuf {
    repo.objects_dir().join(hash.to_hex())
}

/// the three object kinds an object's bytes classify as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
}

/// classify raw bytes as `commit`, `tree`, or (falling back) `blob`.
///
/// spec.md's Open Questions flag that the system this crate is modeled on
/// misclassifies any blob whose first token is literally the word `blob` as
/// a tree — a bug in the source. This implementation instead looks at
/// whether the content actually parses as a commit header or as a sequence
/// of well-formed tree entries, which both fixes that misclassification and
/// is the only version of `type()` that a typed object-store API (rather
/// than ad hoc string-prefix checks at each call site) can express. See
/// DESIGN.md for the resolution of that Open Question.
pub fn classify(content: &[u8]) -> ObjectKind {
    let Ok(text) = std::str::from_utf8(content) else {
        return ObjectKind::Blob;
    };
    if text.starts_with("commit ") {
        return ObjectKind::Commit;
    }
    if tree::looks_like_tree(text) {
        return ObjectKind::Tree;
    }
    ObjectKind::Blob
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempdir().unwrap();
        let repo = Repository::init(&dir.path().join("repo"), false).unwrap();
        (dir, repo)
    }

    #[test]
    fn write_is_idempotent_and_content_addressed() {
        let (_dir, repo) = test_repo();
        let h1 = write(&repo, b"hello").unwrap();
        let h2 = write(&repo, b"hello").unwrap();
        assert_eq!(h1, h2);
        assert_eq!(Hash::of(b"hello"), h1);
    }

    #[test]
    fn read_missing_object_is_none_not_error() {
        let (_dir, repo) = test_repo();
        assert_eq!(read(&repo, &Hash::of(b"nope")).unwrap(), None);
    }

    #[test]
    fn read_after_write_roundtrips() {
        let (_dir, repo) = test_repo();
        let hash = write(&repo, b"payload").unwrap();
        assert_eq!(read(&repo, &hash).unwrap(), Some(b"payload".to_vec()));
        assert!(exists(&repo, &hash));
    }

    #[test]
    fn all_enumerates_every_stored_object() {
        let (_dir, repo) = test_repo();
        write(&repo, b"one").unwrap();
        write(&repo, b"two").unwrap();
        assert_eq!(all(&repo).unwrap().len(), 2);
    }

    #[test]
    fn classify_blob_that_starts_with_the_word_blob() {
        // the bug this type invites us to fix: content that happens to start
        // with "blob" is still a blob, not a tree, because it doesn't parse
        // as a sequence of tree entries.
        assert_eq!(classify(b"blob of text, not a tree"), ObjectKind::Blob);
    }

    #[test]
    fn classify_commit_and_tree() {
        assert_eq!(classify(b"commit abcd\n\n    msg\n"), ObjectKind::Commit);
        assert_eq!(
            classify(format!("blob {} name.txt\n", Hash::ZERO).as_bytes()),
            ObjectKind::Tree
        );
    }
}
