//! `remote`: configure named remotes. Only the `add` subcommand is supported.

use crate::error::{Error, Result};
use crate::repo::Repository;

use super::CommandOutput;

pub fn remote(repo: &mut Repository, verb: &str, name: &str, url: &str) -> Result<CommandOutput> {
    if verb != "add" {
        return Err(Error::Unsupported("remote subcommands other than add"));
    }
    repo.config_mut().add_remote(name, url)?;
    repo.save_config()?;
    Ok(CommandOutput::empty())
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
    fn remote_add_persists_url() {
        let (_dir, mut repo) = test_repo();
        remote(&mut repo, "add", "origin", "/srv/origin").unwrap();

        let reopened = Repository::open(repo.work_tree()).unwrap();
        assert_eq!(reopened.config().remote_url("origin"), Some("/srv/origin"));
    }

    #[test]
    fn remote_add_twice_is_an_error() {
        let (_dir, mut repo) = test_repo();
        remote(&mut repo, "add", "origin", "/srv/origin").unwrap();
        assert!(remote(&mut repo, "add", "origin", "/srv/other").is_err());
    }

    #[test]
    fn remote_rejects_non_add_verbs() {
        let (_dir, mut repo) = test_repo();
        assert!(matches!(
            remote(&mut repo, "remove", "origin", "/srv/origin"),
            Err(Error::Unsupported(_))
        ));
    }
}
