//! `merge`: bring another branch into the current one, fast-forwarding when
//! possible and otherwise staging a three-way merge for `commit` to finalize.

use crate::diff;
use crate::error::{Error, Result};
use crate::index::Index;
use crate::merge as merge_engine;
use crate::object;
use crate::refs;
use crate::repo::Repository;

use super::CommandOutput;

pub fn merge(repo: &Repository, giver_ref: &str) -> Result<CommandOutput> {
    if refs::is_head_detached(repo)? {
        return Err(Error::DetachedHeadMerge);
    }
    let current_branch = refs::head_branch_name(repo)?.expect("attached HEAD always names a branch");

    let giver_hash = refs::hash(repo, giver_ref)?;
    let receiver_hash = refs::try_hash(repo, "HEAD")?;

    if let Some(r) = receiver_hash {
        if object::is_up_to_date(repo, &r, &giver_hash)? {
            return Ok(CommandOutput::line("Already up to date."));
        }
    }

    let index = Index::read(repo)?;
    let overwritten = diff::changed_files_commit_would_overwrite(repo, &index, &giver_hash)?;
    if !overwritten.is_empty() {
        return Err(Error::WouldOverwrite(overwritten));
    }

    if merge_engine::can_fast_forward(repo, receiver_hash.as_ref(), &giver_hash)? {
        merge_engine::write_fast_forward_merge(repo, &current_branch, receiver_hash.as_ref(), &giver_hash)?;
        return Ok(CommandOutput::line("Fast-forward"));
    }

    let r = receiver_hash.expect("non-fast-forward implies a defined receiver");
    let three_way = merge_engine::merge_diff(repo, &r, &giver_hash)?;
    merge_engine::write_non_fast_forward_merge(repo, giver_ref, &current_branch, &r, &giver_hash)?;

    if merge_engine::has_conflicts(&three_way) {
        Ok(CommandOutput::line("Automatic merge failed. Fix conflicts and commit the result."))
    } else {
        Ok(CommandOutput::line("Merge staged; run commit to finish."))
    }
}
