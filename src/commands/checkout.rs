//! `checkout`: move HEAD (attached or detached) to another commit, refusing
//! to clobber unsaved working-copy changes.

use crate::diff::{self, Diff};
use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::index::Index;
use crate::object::{self, Toc};
use crate::refs;
use crate::repo::Repository;
use crate::workingcopy;

use super::CommandOutput;

fn commit_toc(repo: &Repository, hash: &Hash) -> Result<Toc> {
    let commit = object::read_commit(repo, hash)?;
    object::flatten(repo, &commit.tree)
}

pub fn checkout(repo: &Repository, ref_name: &str) -> Result<CommandOutput> {
    let target_hash = refs::try_hash(repo, ref_name)?.ok_or_else(|| Error::RefNotFound(ref_name.to_string()))?;
    // `read_commit` doubles as the "is this actually a commit" check.
    object::read_commit(repo, &target_hash)?;

    // a bare hash that resolves to a stored object detaches; anything else
    // (a branch name, or an unqualified name that becomes refs/heads/<name>)
    // stays attached.
    let is_detaching = Hash::parse(ref_name).is_some();

    if is_detaching {
        if refs::try_hash(repo, "HEAD")? == Some(target_hash) {
            return Err(Error::AlreadyOnBranch(ref_name.to_string()));
        }
    } else if refs::head_branch_name(repo)?.as_deref() == Some(ref_name) {
        return Err(Error::AlreadyOnBranch(ref_name.to_string()));
    }

    let mut index = Index::read(repo)?;
    let target_toc = commit_toc(repo, &target_hash)?;
    let head_hash = refs::try_hash(repo, "HEAD")?;
    let head_toc = match &head_hash {
        Some(h) => commit_toc(repo, h)?,
        None => Toc::new(),
    };

    if !repo.is_bare() {
        let overwritten = diff::changed_files_commit_would_overwrite(repo, &index, &target_hash)?;
        if !overwritten.is_empty() {
            return Err(Error::WouldOverwrite(overwritten));
        }
    }

    let application_diff: Diff = crate::diff::toc_diff(&head_toc, &target_toc, None);
    if !repo.is_bare() {
        workingcopy::apply(repo, &application_diff)?;
    }

    index.replace_with_toc(&target_toc);
    index.write(repo)?;

    if is_detaching {
        refs::write_head_detached(repo, &target_hash)?;
        Ok(CommandOutput::line(format!("Note: checking out '{}'.", ref_name)))
    } else {
        refs::write_head_symbolic(repo, &format!("refs/heads/{}", ref_name))?;
        Ok(CommandOutput::line(format!("Switched to branch {}", ref_name)))
    }
}
