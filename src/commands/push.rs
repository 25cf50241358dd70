//! `push`: copy local objects to a remote and fast-forward its branch.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::merge;
use crate::refs;
use crate::remote;
use crate::repo::Repository;

use super::CommandOutput;

#[derive(Clone, Copy, Debug, Default)]
pub struct PushOptions {
    pub force: bool,
}

pub fn push(repo: &Repository, remote_name: &str, branch: &str, opts: PushOptions) -> Result<CommandOutput> {
    let url = repo
        .config()
        .remote_url(remote_name)
        .ok_or_else(|| Error::RemoteNotFound(remote_name.to_string()))?
        .to_string();
    let remote_path = PathBuf::from(&url);
    let local_hash = refs::hash(repo, branch)?;
    let branch_ref = format!("refs/heads/{}", branch);

    // ancestry for the fast-forward check must be decided against the
    // remote's own object store, so objects are copied before that check
    // runs; a refused push just leaves unreferenced (harmless,
    // content-addressed) objects behind on the remote.
    remote::run_against(&remote_path, |remote_repo| {
        if !remote_repo.is_bare() && refs::head_branch_name(remote_repo)?.as_deref() == Some(branch) {
            return Err(Error::RemoteBranchCheckedOut(branch.to_string()));
        }

        let remote_head = refs::try_hash(remote_repo, &branch_ref)?;
        remote::copy_all_objects(repo, remote_repo)?;

        if !opts.force && !merge::can_fast_forward(remote_repo, remote_head.as_ref(), &local_hash)? {
            return Err(Error::NonFastForward(url.clone()));
        }

        refs::write(remote_repo, &branch_ref, &local_hash)
    })?;

    refs::write(repo, &format!("refs/remotes/{}/{}", remote_name, branch), &local_hash)?;
    Ok(CommandOutput::line(format!("To {}\n   {} -> {}", url, branch, branch)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, clone, commit, remote as remote_cmd};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn push_transfers_objects_and_updates_remote_ref() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src");
        let src = Repository::init(&src_path, false).unwrap();
        fs::write(src.work_tree().join("a.txt"), "x").unwrap();
        add(&src, "a.txt").unwrap();
        commit(&src, Some("init")).unwrap();

        let dst_path = dir.path().join("dst");
        clone(&src_path, &dst_path, false).unwrap();
        let dst = Repository::open(&dst_path).unwrap();

        fs::write(dst.work_tree().join("b.txt"), "y").unwrap();
        add(&dst, "b.txt").unwrap();
        commit(&dst, Some("second")).unwrap();
        let dst_head = refs::hash(&dst, "HEAD").unwrap();

        push(&dst, "origin", "master", PushOptions::default()).unwrap();

        let src_reopened = Repository::open(&src_path).unwrap();
        assert_eq!(refs::hash(&src_reopened, "refs/heads/master").unwrap(), dst_head);
    }

    #[test]
    fn push_without_force_refuses_non_fast_forward() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src");
        Repository::init(&src_path, true).unwrap();

        let dst_path = dir.path().join("dst");
        let dst = Repository::init(&dst_path, false).unwrap();
        fs::write(dst.work_tree().join("a.txt"), "x").unwrap();
        add(&dst, "a.txt").unwrap();
        commit(&dst, Some("init")).unwrap();
        remote_cmd::remote(&mut Repository::open(&dst_path).unwrap(), "add", "origin", &src_path.display().to_string()).unwrap();
        let dst = Repository::open(&dst_path).unwrap();

        push(&dst, "origin", "master", PushOptions::default()).unwrap();

        // diverge the remote directly so the next push is non-fast-forward
        let remote_repo = Repository::open(&src_path).unwrap();
        let unrelated_tree = crate::object::write_tree(&remote_repo, &crate::object::Tree::new(vec![])).unwrap();
        let unrelated = crate::object::Commit::new(unrelated_tree, vec![], "t", "unrelated");
        let unrelated_hash = crate::object::write_commit(&remote_repo, &unrelated).unwrap();
        refs::write(&remote_repo, "refs/heads/master", &unrelated_hash).unwrap();

        fs::write(dst.work_tree().join("b.txt"), "y").unwrap();
        add(&dst, "b.txt").unwrap();
        commit(&dst, Some("second")).unwrap();

        assert!(matches!(
            push(&dst, "origin", "master", PushOptions::default()),
            Err(Error::NonFastForward(_))
        ));
    }
}
