//! `add`: recursively enumerate a pathspec and stage every file it matches.

use crate::error::{Error, Result};
use crate::index;
use crate::index::Index;
use crate::repo::Repository;

use super::update_index::{update_index_path, UpdateIndexOptions};
use super::CommandOutput;

pub fn add(repo: &Repository, pathspec: &str) -> Result<CommandOutput> {
    repo.require_work_tree()?;

    let paths = index::enumerate_paths(repo, std::path::Path::new(pathspec))?;
    if paths.is_empty() {
        return Err(Error::PathspecNotFound(pathspec.to_string()));
    }

    let mut index = Index::read(repo)?;
    for path in &paths {
        update_index_path(repo, &mut index, path, UpdateIndexOptions { add: true, remove: false })?;
    }
    index.write(repo)?;

    Ok(CommandOutput::empty())
}
