//! `status`: the current branch plus staged, unstaged, and untracked changes.

use std::path::Path;

use crate::diff::{name_status, toc_diff, DiffStatus};
use crate::error::Result;
use crate::hash::Hash;
use crate::index::{self, Index};
use crate::object::{self, Toc};
use crate::refs;
use crate::repo::Repository;

use super::CommandOutput;

fn commit_toc(repo: &Repository, hash: &Hash) -> Result<Toc> {
    let commit = object::read_commit(repo, hash)?;
    object::flatten(repo, &commit.tree)
}

fn status_line(status: DiffStatus, path: &str) -> String {
    let word = match status {
        DiffStatus::Add => "new file:",
        DiffStatus::Modify => "modified:",
        DiffStatus::Delete => "deleted:",
        DiffStatus::Conflict => "both modified:",
        DiffStatus::Same => "",
    };
    format!("\t{} {}", word, path)
}

pub fn status(repo: &Repository) -> Result<CommandOutput> {
    repo.require_work_tree()?;

    let mut lines = Vec::new();
    match refs::head_branch_name(repo)? {
        Some(branch) => lines.push(format!("On branch {}", branch)),
        None => {
            let head = refs::hash(repo, "HEAD")?;
            lines.push(format!("HEAD detached at {}", head));
        }
    }

    let index = Index::read(repo)?;
    let head_toc = match refs::try_hash(repo, "HEAD")? {
        Some(h) => commit_toc(repo, &h)?,
        None => Toc::new(),
    };

    let staged = name_status(&toc_diff(&head_toc, &index.toc(), None));
    if !staged.is_empty() {
        lines.push(String::new());
        lines.push("Changes to be committed:".to_string());
        for (path, status) in &staged {
            lines.push(status_line(*status, path));
        }
    }

    let working_copy_toc = index.working_copy_toc(repo)?;
    let unstaged = name_status(&toc_diff(&index.toc(), &working_copy_toc, None));
    if !unstaged.is_empty() {
        lines.push(String::new());
        lines.push("Changes not staged for commit:".to_string());
        for (path, status) in &unstaged {
            lines.push(status_line(*status, path));
        }
    }

    let tracked = index.toc();
    let mut untracked: Vec<String> = index::enumerate_paths(repo, Path::new("."))?
        .into_iter()
        .filter(|p| !tracked.contains_key(p))
        .collect();
    untracked.sort();
    if !untracked.is_empty() {
        lines.push(String::new());
        lines.push("Untracked files:".to_string());
        for path in &untracked {
            lines.push(format!("\t{}", path));
        }
    }

    Ok(lines.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, commit};
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempdir().unwrap();
        let repo = Repository::init(&dir.path().join("repo"), false).unwrap();
        (dir, repo)
    }

    #[test]
    fn status_after_clean_commit_has_no_sections() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "x").unwrap();
        add(&repo, "a.txt").unwrap();
        commit(&repo, Some("init")).unwrap();

        let out = status(&repo).unwrap();
        assert_eq!(out.as_str(), "On branch master");
    }

    #[test]
    fn status_reports_untracked_files() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "x").unwrap();

        let out = status(&repo).unwrap();
        assert!(out.as_str().contains("Untracked files:"));
        assert!(out.as_str().contains("a.txt"));
    }

    #[test]
    fn status_reports_staged_additions() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "x").unwrap();
        add(&repo, "a.txt").unwrap();

        let out = status(&repo).unwrap();
        assert!(out.as_str().contains("Changes to be committed:"));
        assert!(out.as_str().contains("new file: a.txt"));
    }
}
