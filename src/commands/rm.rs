//! `rm`: remove pathspec-matched files from the index and the working copy.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::index::Index;
use crate::repo::Repository;

use super::CommandOutput;

#[derive(Clone, Copy, Debug, Default)]
pub struct RmOptions {
    pub recursive: bool,
    /// reserved but unsupported (spec.md §7/§9 Open Questions)
    pub force: bool,
}

pub fn rm(repo: &Repository, pathspec: &str, opts: RmOptions) -> Result<CommandOutput> {
    repo.require_work_tree()?;
    if opts.force {
        return Err(Error::Unsupported("rm -f"));
    }

    let mut index = Index::read(repo)?;
    let matches = index.matching_files(pathspec);
    if matches.is_empty() {
        return Err(Error::PathspecNotFound(pathspec.to_string()));
    }

    let is_exact_file = matches.len() == 1 && matches[0] == pathspec;
    if !is_exact_file && !opts.recursive {
        return Err(Error::NotRecursive(PathBuf::from(pathspec)));
    }

    for path in &matches {
        if has_uncommitted_changes(repo, &index, path)? {
            return Err(Error::HasUncommittedChanges(PathBuf::from(path)));
        }
    }

    for path in &matches {
        index.write_rm(path);
        let full = repo.work_tree().join(path);
        let _ = fs::remove_file(&full);
    }
    index.write(repo)?;

    Ok(CommandOutput::empty())
}

fn has_uncommitted_changes(repo: &Repository, index: &Index, path: &str) -> Result<bool> {
    let Some(&staged) = index.toc().get(path) else {
        return Ok(false);
    };
    let full = repo.work_tree().join(path);
    match fs::read(&full) {
        Ok(content) => Ok(Hash::of(&content) != staged),
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempdir().unwrap();
        let repo = Repository::init(&dir.path().join("repo"), false).unwrap();
        (dir, repo)
    }

    #[test]
    fn rm_removes_a_clean_file() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "hi").unwrap();
        add(&repo, "a.txt").unwrap();

        rm(&repo, "a.txt", RmOptions::default()).unwrap();
        assert!(!repo.work_tree().join("a.txt").exists());
        assert!(!Index::read(&repo).unwrap().has_path("a.txt"));
    }

    #[test]
    fn rm_a_directory_without_recursive_is_an_error() {
        let (_dir, repo) = test_repo();
        fs::create_dir_all(repo.work_tree().join("dir")).unwrap();
        fs::write(repo.work_tree().join("dir/a.txt"), "x").unwrap();
        add(&repo, "dir").unwrap();

        assert!(matches!(rm(&repo, "dir", RmOptions::default()), Err(Error::NotRecursive(_))));
    }

    #[test]
    fn rm_a_directory_recursively_removes_every_file() {
        let (_dir, repo) = test_repo();
        fs::create_dir_all(repo.work_tree().join("dir")).unwrap();
        fs::write(repo.work_tree().join("dir/a.txt"), "x").unwrap();
        fs::write(repo.work_tree().join("dir/b.txt"), "y").unwrap();
        add(&repo, "dir").unwrap();

        rm(&repo, "dir", RmOptions { recursive: true, force: false }).unwrap();
        let index = Index::read(&repo).unwrap();
        assert!(!index.has_path("dir/a.txt"));
        assert!(!index.has_path("dir/b.txt"));
    }

    #[test]
    fn rm_refuses_uncommitted_changes() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "v1").unwrap();
        add(&repo, "a.txt").unwrap();
        fs::write(repo.work_tree().join("a.txt"), "v2").unwrap();

        assert!(matches!(
            rm(&repo, "a.txt", RmOptions::default()),
            Err(Error::HasUncommittedChanges(_))
        ));
    }

    #[test]
    fn rm_force_is_unsupported() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "hi").unwrap();
        add(&repo, "a.txt").unwrap();
        assert!(matches!(
            rm(&repo, "a.txt", RmOptions { recursive: false, force: true }),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn rm_unknown_pathspec_is_an_error() {
        let (_dir, repo) = test_repo();
        assert!(matches!(rm(&repo, "nope.txt", RmOptions::default()), Err(Error::PathspecNotFound(_))));
    }
}
