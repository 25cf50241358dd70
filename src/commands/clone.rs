//! `clone`: lay out a new repository from a remote and fast-forward `master`.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::merge as merge_engine;
use crate::refs;
use crate::repo::Repository;

use super::{fetch, CommandOutput};

pub fn clone(src: &Path, dst: &Path, bare: bool) -> Result<CommandOutput> {
    let src_repo = Repository::open(src)?;

    if dst.exists() && fs::read_dir(dst).map(|mut entries| entries.next().is_some()).unwrap_or(false) {
        return Err(Error::RepoExists(dst.to_path_buf()));
    }

    let mut repo = Repository::init(dst, bare)?;
    let url = src_repo.work_tree().display().to_string();
    repo.config_mut().add_remote("origin", &url)?;
    repo.save_config()?;

    if refs::exists(&src_repo, "refs/heads/master") {
        fetch(&repo, "origin", "master")?;
        let giver = refs::hash(&repo, "refs/remotes/origin/master")?;
        merge_engine::write_fast_forward_merge(&repo, "master", None, &giver)?;
    }

    Ok(CommandOutput::line(format!("Cloning into '{}'...", dst.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, commit};
    use std::fs;
    use tempfile::tempdir;

    fn init_with_commit(path: &Path) -> Repository {
        let repo = Repository::init(path, false).unwrap();
        fs::write(repo.work_tree().join("a.txt"), "x").unwrap();
        add(&repo, "a.txt").unwrap();
        commit(&repo, Some("init")).unwrap();
        repo
    }

    #[test]
    fn clone_copies_the_master_branch() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src");
        let src = init_with_commit(&src_path);
        let src_head = refs::hash(&src, "HEAD").unwrap();

        let dst_path = dir.path().join("dst");
        clone(&src_path, &dst_path, false).unwrap();

        let dst = Repository::open(&dst_path).unwrap();
        assert_eq!(refs::hash(&dst, "HEAD").unwrap(), src_head);
        assert_eq!(dst.config().remote_url("origin"), Some(src_path.display().to_string()).as_deref());
        assert!(fs::read(dst.work_tree().join("a.txt")).unwrap() == b"x");
    }

    #[test]
    fn clone_refuses_a_nonempty_destination() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src");
        init_with_commit(&src_path);

        let dst_path = dir.path().join("dst");
        fs::create_dir_all(&dst_path).unwrap();
        fs::write(dst_path.join("existing.txt"), "x").unwrap();

        assert!(matches!(clone(&src_path, &dst_path, false), Err(Error::RepoExists(_))));
    }

    #[test]
    fn clone_of_non_repo_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(clone(&dir.path().join("not-a-repo"), &dir.path().join("dst"), false).is_err());
    }
}
