//! `branch`: list local branches, or create one at HEAD.

use crate::error::{Error, Result};
use crate::refs;
use crate::repo::Repository;

use super::CommandOutput;

pub fn branch(repo: &Repository, name: Option<&str>) -> Result<CommandOutput> {
    match name {
        None => {
            let current = refs::head_branch_name(repo)?;
            let lines: Vec<String> = refs::list_branches(repo)?
                .into_iter()
                .map(|b| {
                    if current.as_deref() == Some(b.as_str()) {
                        format!("* {}", b)
                    } else {
                        format!("  {}", b)
                    }
                })
                .collect();
            Ok(lines.into_iter().collect())
        }
        Some(name) => {
            let head = refs::try_hash(repo, "HEAD")?.ok_or_else(|| Error::NoCommitsYet("HEAD".to_string()))?;
            let branch_ref = format!("refs/heads/{}", name);
            if refs::exists(repo, &branch_ref) {
                return Err(Error::BranchExists(name.to_string()));
            }
            refs::write(repo, &branch_ref, &head)?;
            Ok(CommandOutput::empty())
        }
    }
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
    fn branch_without_a_commit_is_an_error() {
        let (_dir, repo) = test_repo();
        assert!(matches!(branch(&repo, Some("feat")), Err(Error::NoCommitsYet(_))));
    }

    #[test]
    fn branch_creates_a_ref_at_head() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "x").unwrap();
        add(&repo, "a.txt").unwrap();
        commit(&repo, Some("init")).unwrap();
        let head = refs::hash(&repo, "HEAD").unwrap();

        branch(&repo, Some("feat")).unwrap();
        assert_eq!(refs::hash(&repo, "refs/heads/feat").unwrap(), head);
    }

    #[test]
    fn branch_already_existing_is_an_error() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "x").unwrap();
        add(&repo, "a.txt").unwrap();
        commit(&repo, Some("init")).unwrap();

        branch(&repo, Some("feat")).unwrap();
        assert!(matches!(branch(&repo, Some("feat")), Err(Error::BranchExists(_))));
    }

    #[test]
    fn branch_with_no_name_lists_and_marks_current() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "x").unwrap();
        add(&repo, "a.txt").unwrap();
        commit(&repo, Some("init")).unwrap();
        branch(&repo, Some("feat")).unwrap();

        let out = branch(&repo, None).unwrap();
        assert_eq!(out.as_str(), "* master\n  feat");
    }
}
