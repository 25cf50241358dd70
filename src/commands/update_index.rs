//! `update-index`: the single-path staging primitive `add`/`rm` are built on.
//! Implements spec.md §7's decision table literally.

use std::fs;

use crate::error::{Error, Result};
use crate::index::Index;
use crate::repo::Repository;

#[derive(Clone, Copy, Debug, Default)]
pub struct UpdateIndexOptions {
    pub add: bool,
    pub remove: bool,
}

enum OnDisk {
    Missing,
    File,
    Dir,
}

fn classify_on_disk(repo: &Repository, path: &str) -> OnDisk {
    let full = repo.work_tree().join(path);
    match fs::symlink_metadata(&full) {
        Err(_) => OnDisk::Missing,
        Ok(meta) if meta.is_dir() => OnDisk::Dir,
        Ok(_) => OnDisk::File,
    }
}

/// stage (or unstage) a single path. See spec.md §7's table:
///
/// | on-disk | in-index | add | remove | action |
/// |---|---|---|---|---|
/// | dir | – | – | – | error: is a directory |
/// | no | yes | – | yes | if in conflict: unsupported; else remove from index |
/// | no | no | – | yes | no-op |
/// | yes | no | no | – | error: use --add |
/// | yes | * | yes or in-index | – | stage file's current content |
/// | no | – | – | no | error: does not exist and --remove not passed |
pub fn update_index_path(repo: &Repository, index: &mut Index, path: &str, opts: UpdateIndexOptions) -> Result<()> {
    let full = repo.work_tree().join(path);
    let in_index = index.has_path(path);

    match classify_on_disk(repo, path) {
        OnDisk::Dir => Err(Error::IsADirectory(full)),

        OnDisk::Missing if in_index && opts.remove => {
            if index.is_conflicted(path) {
                Err(Error::Unsupported("update-index --remove on a conflicted path"))
            } else {
                index.write_rm(path);
                Ok(())
            }
        }

        OnDisk::Missing if !in_index && opts.remove => Ok(()),

        OnDisk::Missing => Err(Error::DoesNotExistUseRemove(full)),

        OnDisk::File => {
            if !in_index && !opts.add {
                return Err(Error::UseAdd(full));
            }
            let content = fs::read(&full).map_err(|e| Error::Io { path: full.clone(), source: e })?;
            index.write_non_conflict(repo, path, &content)?;
            Ok(())
        }
    }
}

/// the CLI-facing form: loads the index, stages `path`, persists it.
pub fn update_index(repo: &Repository, path: &str, opts: UpdateIndexOptions) -> Result<super::CommandOutput> {
    repo.require_work_tree()?;
    let mut index = Index::read(repo)?;
    update_index_path(repo, &mut index, path, opts)?;
    index.write(repo)?;
    Ok(super::CommandOutput::empty())
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
    fn dir_on_disk_is_an_error() {
        let (_dir, repo) = test_repo();
        fs::create_dir(repo.work_tree().join("sub")).unwrap();
        let mut index = Index::new();
        assert!(matches!(
            update_index_path(&repo, &mut index, "sub", UpdateIndexOptions::default()),
            Err(Error::IsADirectory(_))
        ));
    }

    #[test]
    fn untracked_file_without_add_is_an_error() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "hi").unwrap();
        let mut index = Index::new();
        assert!(matches!(
            update_index_path(&repo, &mut index, "a.txt", UpdateIndexOptions::default()),
            Err(Error::UseAdd(_))
        ));
    }

    #[test]
    fn untracked_file_with_add_is_staged() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "hi").unwrap();
        let mut index = Index::new();
        update_index_path(&repo, &mut index, "a.txt", UpdateIndexOptions { add: true, remove: false }).unwrap();
        assert!(index.has_file("a.txt", 0));
    }

    #[test]
    fn tracked_file_is_restaged_without_add_flag() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "v1").unwrap();
        let mut index = Index::new();
        update_index_path(&repo, &mut index, "a.txt", UpdateIndexOptions { add: true, remove: false }).unwrap();

        fs::write(repo.work_tree().join("a.txt"), "v2").unwrap();
        update_index_path(&repo, &mut index, "a.txt", UpdateIndexOptions::default()).unwrap();
        let wc_toc = index.working_copy_toc(&repo).unwrap();
        assert_eq!(index.toc().get("a.txt"), wc_toc.get("a.txt"));
    }

    #[test]
    fn missing_file_not_in_index_without_remove_is_an_error() {
        let (_dir, repo) = test_repo();
        let mut index = Index::new();
        assert!(matches!(
            update_index_path(&repo, &mut index, "gone.txt", UpdateIndexOptions::default()),
            Err(Error::DoesNotExistUseRemove(_))
        ));
    }

    #[test]
    fn missing_file_not_in_index_with_remove_is_a_no_op() {
        let (_dir, repo) = test_repo();
        let mut index = Index::new();
        update_index_path(&repo, &mut index, "gone.txt", UpdateIndexOptions { add: false, remove: true }).unwrap();
        assert!(!index.has_path("gone.txt"));
    }

    #[test]
    fn missing_file_in_index_with_remove_deletes_it() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "hi").unwrap();
        let mut index = Index::new();
        update_index_path(&repo, &mut index, "a.txt", UpdateIndexOptions { add: true, remove: false }).unwrap();

        fs::remove_file(repo.work_tree().join("a.txt")).unwrap();
        update_index_path(&repo, &mut index, "a.txt", UpdateIndexOptions { add: false, remove: true }).unwrap();
        assert!(!index.has_path("a.txt"));
    }

    #[test]
    fn missing_conflicted_file_with_remove_is_unsupported() {
        let (_dir, repo) = test_repo();
        let mut index = Index::new();
        index.write_conflict("c.txt", crate::hash::Hash::of(b"r"), crate::hash::Hash::of(b"g"), None);
        assert!(matches!(
            update_index_path(&repo, &mut index, "c.txt", UpdateIndexOptions { add: false, remove: true }),
            Err(Error::Unsupported(_))
        ));
    }
}
