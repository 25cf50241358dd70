//! `commit`: promote the index into a tree+commit object and move HEAD.

use crate::clock;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::merge::{self, MergeState};
use crate::object::{self, Commit};
use crate::refs;
use crate::repo::Repository;

use super::CommandOutput;

pub fn commit(repo: &Repository, message: Option<&str>) -> Result<CommandOutput> {
    repo.require_work_tree()?;

    let index = Index::read(repo)?;
    let state = merge::merge_state(repo)?;

    let toc = index.toc();
    let tree_hash = object::write_tree_from_toc(repo, &toc)?;

    if let Some(head) = refs::try_hash(repo, "HEAD")? {
        if object::read_commit(repo, &head)?.tree == tree_hash {
            return Err(Error::NothingToCommit);
        }
    }

    if matches!(state, MergeState::Merging { .. }) && !index.conflicted_paths().is_empty() {
        return Err(Error::UnresolvedConflicts(index.conflicted_paths()));
    }

    let message = match &state {
        MergeState::Merging { message, .. } => message.clone(),
        MergeState::Clean => message.map(str::to_string).ok_or(Error::EmptyCommitMessage)?,
    };

    let parents = refs::commit_parent_hashes(repo)?;
    let commit_obj = Commit::new(tree_hash, parents, clock::now(), message);
    let commit_hash = object::write_commit(repo, &commit_obj)?;

    let terminal = refs::terminal_ref(repo, "HEAD")?;
    if terminal == "HEAD" {
        refs::write_head_detached(repo, &commit_hash)?;
    } else {
        refs::write(repo, &terminal, &commit_hash)?;
    }

    if matches!(state, MergeState::Merging { .. }) {
        refs::rm(repo, "MERGE_HEAD")?;
        let _ = std::fs::remove_file(repo.merge_msg_path());
    }

    Ok(CommandOutput::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempdir().unwrap();
        let repo = Repository::init(&dir.path().join("repo"), false).unwrap();
        (dir, repo)
    }

    #[test]
    fn first_commit_records_no_parents() {
        let (_dir, repo) = test_repo();
        fs::create_dir_all(repo.work_tree().join("a")).unwrap();
        fs::write(repo.work_tree().join("a/b.txt"), "first").unwrap();
        add(&repo, "a/b.txt").unwrap();

        commit(&repo, Some("woo")).unwrap();
        let head = refs::hash(&repo, "HEAD").unwrap();
        let commit_obj = object::read_commit(&repo, &head).unwrap();
        assert!(commit_obj.parents.is_empty());
        assert_eq!(commit_obj.message, "woo");
    }

    #[test]
    fn repeat_commit_with_no_changes_is_nothing_to_commit() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "x").unwrap();
        add(&repo, "a.txt").unwrap();
        commit(&repo, Some("first")).unwrap();

        assert!(matches!(commit(&repo, Some("woo")), Err(Error::NothingToCommit)));
    }

    #[test]
    fn second_commit_records_head_as_parent() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "v1").unwrap();
        add(&repo, "a.txt").unwrap();
        commit(&repo, Some("first")).unwrap();
        let first = refs::hash(&repo, "HEAD").unwrap();

        fs::write(repo.work_tree().join("a.txt"), "v2").unwrap();
        add(&repo, "a.txt").unwrap();
        commit(&repo, Some("second")).unwrap();

        let head = refs::hash(&repo, "HEAD").unwrap();
        let commit_obj = object::read_commit(&repo, &head).unwrap();
        assert_eq!(commit_obj.parents, vec![first]);
    }

    #[test]
    fn commit_without_message_and_not_merging_is_an_error() {
        let (_dir, repo) = test_repo();
        fs::write(repo.work_tree().join("a.txt"), "x").unwrap();
        add(&repo, "a.txt").unwrap();
        assert!(matches!(commit(&repo, None), Err(Error::EmptyCommitMessage)));
    }
}
