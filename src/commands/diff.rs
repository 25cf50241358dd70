//! `diff`: resolve two refs (defaulting to the index and the working copy)
//! and print a `status path` line for every path that differs.

use crate::diff::{self as diff_engine, DiffStatus};
use crate::error::Result;
use crate::index::Index;
use crate::refs;
use crate::repo::Repository;

use super::CommandOutput;

fn status_word(status: DiffStatus) -> &'static str {
    match status {
        DiffStatus::Add => "ADD",
        DiffStatus::Modify => "MODIFY",
        DiffStatus::Delete => "DELETE",
        DiffStatus::Conflict => "CONFLICT",
        DiffStatus::Same => "SAME",
    }
}

pub fn diff(repo: &Repository, ref1: Option<&str>, ref2: Option<&str>) -> Result<CommandOutput> {
    let hash1 = ref1.map(|r| refs::hash(repo, r)).transpose()?;
    let hash2 = ref2.map(|r| refs::hash(repo, r)).transpose()?;

    let index = Index::read(repo)?;
    let result = diff_engine::diff(repo, &index, hash1.as_ref(), hash2.as_ref())?;
    let statuses = diff_engine::name_status(&result);

    let lines: Vec<String> = statuses
        .into_iter()
        .map(|(path, status)| format!("{} {}", status_word(status), path))
        .collect();
    Ok(lines.into_iter().collect())
}
