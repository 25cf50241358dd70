//! applies a diff to the on-disk working copy, and prunes directories left
//! empty afterward.

use std::fs;

use crate::diff::{Diff, DiffStatus};
use crate::error::{IoResultExt, Result};
use crate::object;
use crate::repo::Repository;

/// apply `diff` to disk: write added/modified content, delete removed
/// files, and leave whole-file conflict markers for unresolved paths.
pub fn apply(repo: &Repository, diff: &Diff) -> Result<()> {
    for (path, entry) in diff {
        let full = repo.work_tree().join(path);
        match entry.status {
            DiffStatus::Same => {}
            DiffStatus::Add => {
                let hash = entry.receiver.or(entry.giver).expect("ADD entry has no content");
                write_blob_to(repo, &full, &hash)?;
            }
            DiffStatus::Modify => {
                let hash = entry.giver.expect("MODIFY entry has no giver content");
                write_blob_to(repo, &full, &hash)?;
            }
            DiffStatus::Delete => {
                if let Err(e) = fs::remove_file(&full) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        return Err(crate::Error::Io { path: full, source: e });
                    }
                }
            }
            DiffStatus::Conflict => {
                let receiver = read_or_empty(repo, entry.receiver)?;
                let giver = read_or_empty(repo, entry.giver)?;
                let mut content = Vec::new();
                content.extend_from_slice(b"<<<<<<\n");
                content.extend_from_slice(&receiver);
                content.extend_from_slice(b"\n======\n");
                content.extend_from_slice(&giver);
                content.extend_from_slice(b"\n>>>>>>\n");
                if let Some(parent) = full.parent() {
                    fs::create_dir_all(parent).with_path(parent)?;
                }
                fs::write(&full, content).with_path(&full)?;
            }
        }
    }

    prune_empty_dirs(repo, repo.work_tree())?;
    Ok(())
}

fn read_or_empty(repo: &Repository, hash: Option<crate::hash::Hash>) -> Result<Vec<u8>> {
    match hash {
        Some(h) => Ok(object::read(repo, &h)?.unwrap_or_default()),
        None => Ok(Vec::new()),
    }
}

fn write_blob_to(repo: &Repository, path: &std::path::Path, hash: &crate::hash::Hash) -> Result<()> {
    let content = object::read(repo, hash)?.ok_or(crate::Error::ObjectNotFound(*hash))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    fs::write(path, content).with_path(path)
}

/// recursively remove directories left empty by the changes above,
/// excluding the repository's metadata directory.
fn prune_empty_dirs(repo: &Repository, dir: &std::path::Path) -> Result<bool> {
    if dir == repo.meta_dir() {
        return Ok(false);
    }
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(crate::Error::Io { path: dir.to_path_buf(), source: e }),
    };

    let mut is_empty = true;
    for entry in entries {
        let entry = entry.with_path(dir)?;
        let path = entry.path();
        if path.is_dir() {
            if prune_empty_dirs(repo, &path)? {
                let _ = fs::remove_dir(&path);
            } else {
                is_empty = false;
            }
        } else {
            is_empty = false;
        }
    }
    Ok(is_empty && dir != repo.work_tree())
}
