//! `pull`: `fetch` followed by `merge FETCH_HEAD`.

use crate::error::Result;
use crate::repo::Repository;

use super::{fetch, merge, CommandOutput};

pub fn pull(repo: &Repository, remote_name: &str, branch: &str) -> Result<CommandOutput> {
    fetch(repo, remote_name, branch)?;
    merge(repo, "FETCH_HEAD")
}
