//! the three-way merge engine: common-ancestor selection, conflict
//! classification, and the fast-forward / non-fast-forward merge procedures.

use crate::diff::{toc_diff, Diff, DiffStatus};
use crate::error::Result;
use crate::hash::Hash;
use crate::index::Index;
use crate::object::{self, Toc};
use crate::refs;
use crate::repo::Repository;
use crate::workingcopy;

/// the repository's merge disposition: whether `MERGE_HEAD` is present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeState {
    Clean,
    Merging { giver: Hash, message: String },
}

pub fn merge_state(repo: &Repository) -> Result<MergeState> {
    match refs::try_hash(repo, "MERGE_HEAD")? {
        None => Ok(MergeState::Clean),
        Some(giver) => {
            let message = std::fs::read_to_string(repo.merge_msg_path()).unwrap_or_default();
            Ok(MergeState::Merging { giver, message })
        }
    }
}

fn commit_toc(repo: &Repository, commit: &Hash) -> Result<Toc> {
    let commit = object::read_commit(repo, commit)?;
    object::flatten(repo, &commit.tree)
}

/// sort `{a,b}` deterministically, then take the first hash common to both
/// `[x] ∪ ancestors(x)` sets. Selects a single most-recent common ancestor;
/// in a criss-cross history the choice is sort-order-dependent.
pub fn common_ancestor(repo: &Repository, a: &Hash, b: &Hash) -> Result<Option<Hash>> {
    let (first, second) = if a.to_hex() <= b.to_hex() { (a, b) } else { (b, a) };

    let mut first_set = vec![*first];
    first_set.extend(object::ancestors(repo, first)?);
    let mut second_set = vec![*second];
    second_set.extend(object::ancestors(repo, second)?);

    Ok(first_set.into_iter().find(|h| second_set.contains(h)))
}

/// `r` undefined (no commits yet), or `r` is an ancestor of `g`.
pub fn can_fast_forward(repo: &Repository, r: Option<&Hash>, g: &Hash) -> Result<bool> {
    let result = match r {
        None => true,
        Some(r) => object::is_ancestor(repo, r, g)?,
    };
    log::debug!("can_fast_forward({:?}, {}) = {}", r, g, result);
    Ok(result)
}

pub fn merge_diff(repo: &Repository, r: &Hash, g: &Hash) -> Result<Diff> {
    let receiver = commit_toc(repo, r)?;
    let giver = commit_toc(repo, g)?;
    let base = match common_ancestor(repo, r, g)? {
        Some(ancestor) => commit_toc(repo, &ancestor)?,
        None => Toc::new(),
    };
    Ok(toc_diff(&receiver, &giver, Some(&base)))
}

pub fn has_conflicts(diff: &Diff) -> bool {
    diff.values().any(|entry| entry.status == DiffStatus::Conflict)
}

/// point `refs/heads/<current>` at `g`, replace the index with `g`'s TOC,
/// and (if not bare) reconcile the working copy.
pub fn write_fast_forward_merge(repo: &Repository, current_branch: &str, r: Option<&Hash>, g: &Hash) -> Result<()> {
    refs::write(repo, &format!("refs/heads/{}", current_branch), g)?;

    let receiver_toc = match r {
        Some(r) => commit_toc(repo, r)?,
        None => Toc::new(),
    };
    let giver_toc = commit_toc(repo, g)?;

    let mut index = Index::read(repo)?;
    index.replace_with_toc(&giver_toc);
    index.write(repo)?;

    if !repo.is_bare() {
        let diff = toc_diff(&receiver_toc, &giver_toc, None);
        workingcopy::apply(repo, &diff)?;
    }
    Ok(())
}

/// write `MERGE_HEAD`/`MERGE_MSG`, rebuild the index from the three-way
/// diff, and (if not bare) reconcile the working copy. Leaves the repository
/// in the `Merging` state for `commit` to finalize.
pub fn write_non_fast_forward_merge(
    repo: &Repository,
    giver_ref: &str,
    current_branch: &str,
    r: &Hash,
    g: &Hash,
) -> Result<()> {
    refs::write(repo, "MERGE_HEAD", g)?;

    let diff = merge_diff(repo, r, g)?;
    let mut message = format!("Merge {} into {}\n", giver_ref, current_branch);
    let conflicted: Vec<&String> = {
        let mut paths: Vec<&String> = diff
            .iter()
            .filter(|(_, e)| e.status == DiffStatus::Conflict)
            .map(|(path, _)| path)
            .collect();
        paths.sort();
        paths
    };
    if !conflicted.is_empty() {
        message.push_str("\nConflicts:\n");
        for path in &conflicted {
            message.push('\t');
            message.push_str(path);
            message.push('\n');
        }
    }
    std::fs::write(repo.merge_msg_path(), &message).map_err(|e| crate::Error::Io {
        path: repo.merge_msg_path(),
        source: e,
    })?;

    let mut index = Index::read(repo)?;
    for (path, entry) in &diff {
        match entry.status {
            DiffStatus::Conflict => {
                index.write_conflict(path, entry.receiver.unwrap(), entry.giver.unwrap(), entry.base);
            }
            DiffStatus::Modify => {
                index.write_rm(path);
                if let Some(hash) = entry.giver {
                    index.stage_blob(path, hash);
                }
            }
            DiffStatus::Add | DiffStatus::Same => {
                index.write_rm(path);
                if let Some(hash) = entry.receiver.or(entry.giver) {
                    index.stage_blob(path, hash);
                }
            }
            DiffStatus::Delete => {
                index.write_rm(path);
            }
        }
    }
    index.write(repo)?;

    if !repo.is_bare() {
        workingcopy::apply(repo, &diff)?;
    }
    Ok(())
}
