//! `fetch`: copy a remote branch's objects locally and record its tip.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, IoResultExt, Result};
use crate::object;
use crate::refs;
use crate::remote;
use crate::repo::Repository;

use super::CommandOutput;

fn short(hash: &crate::hash::Hash) -> String {
    hash.to_hex()[..7].to_string()
}

pub fn fetch(repo: &Repository, remote_name: &str, branch: &str) -> Result<CommandOutput> {
    let url = repo
        .config()
        .remote_url(remote_name)
        .ok_or_else(|| Error::RemoteNotFound(remote_name.to_string()))?
        .to_string();
    let remote_path = PathBuf::from(&url);
    let remote_branch_ref = format!("refs/remotes/{}/{}", remote_name, branch);

    let previous = refs::try_hash(repo, &remote_branch_ref)?;

    let new_hash = remote::run_against(&remote_path, |remote_repo| {
        let hash = refs::hash(remote_repo, &format!("refs/heads/{}", branch))?;
        remote::copy_all_objects(remote_repo, repo)?;
        Ok(hash)
    })?;

    refs::write(repo, &remote_branch_ref, &new_hash)?;

    let line = format!("{} branch {} of {}\n", new_hash.to_hex(), branch, url);
    let mut content = fs::read_to_string(repo.fetch_head_path()).unwrap_or_default();
    content.push_str(&line);
    fs::write(repo.fetch_head_path(), content).with_path(repo.fetch_head_path())?;

    let forced = match previous {
        Some(prev) => !(prev == new_hash || object::is_ancestor(repo, &prev, &new_hash)?),
        None => false,
    };

    let mut summary = format!(
        "{}..{} {} -> {}/{}",
        previous.as_ref().map(short).unwrap_or_else(|| "0000000".to_string()),
        short(&new_hash),
        branch,
        remote_name,
        branch
    );
    if forced {
        summary.push_str(" (forced)");
    }
    Ok(CommandOutput::line(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, commit, remote as remote_cmd};
    use std::fs as stdfs;
    use tempfile::tempdir;

    fn init_with_commit(path: &std::path::Path) -> Repository {
        let repo = Repository::init(path, false).unwrap();
        stdfs::write(repo.work_tree().join("a.txt"), "x").unwrap();
        add(&repo, "a.txt").unwrap();
        commit(&repo, Some("init")).unwrap();
        repo
    }

    #[test]
    fn fetch_copies_objects_and_records_remote_ref() {
        let dir = tempdir().unwrap();
        let src = init_with_commit(&dir.path().join("src"));
        let src_head = refs::hash(&src, "HEAD").unwrap();

        let mut dst = Repository::init(&dir.path().join("dst"), false).unwrap();
        remote_cmd::remote(&mut dst, "add", "origin", &src.work_tree().display().to_string()).unwrap();

        fetch(&dst, "origin", "master").unwrap();
        assert_eq!(refs::hash(&dst, "refs/remotes/origin/master").unwrap(), src_head);
        assert!(object::exists(&dst, &src_head));
    }

    #[test]
    fn refetching_the_identical_commit_is_not_forced() {
        let dir = tempdir().unwrap();
        let src = init_with_commit(&dir.path().join("src"));

        let mut dst = Repository::init(&dir.path().join("dst"), false).unwrap();
        remote_cmd::remote(&mut dst, "add", "origin", &src.work_tree().display().to_string()).unwrap();

        fetch(&dst, "origin", "master").unwrap();
        let out = fetch(&dst, "origin", "master").unwrap();
        assert!(!out.as_str().contains("(forced)"), "{}", out.as_str());
    }

    #[test]
    fn fetch_unknown_remote_is_an_error() {
        let dir = tempdir().unwrap();
        let dst = Repository::init(&dir.path().join("dst"), false).unwrap();
        assert!(matches!(fetch(&dst, "origin", "master"), Err(Error::RemoteNotFound(_))));
    }
}
