//! the three-way diff engine: classifies every path across a receiver, a
//! giver, and (for three-way diffs) a base, relative to a table of contents.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::hash::Hash;
use crate::index::Index;
use crate::object::{self, Toc};
use crate::refs;
use crate::repo::Repository;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffStatus {
    Same,
    Add,
    Modify,
    Delete,
    Conflict,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffEntry {
    pub status: DiffStatus,
    pub receiver: Option<Hash>,
    pub base: Option<Hash>,
    pub giver: Option<Hash>,
}

pub type Diff = BTreeMap<String, DiffEntry>;

/// classify every path present in `receiver`, `base`, or `giver`. When `base`
/// is absent it defaults to `receiver` (a two-way diff).
pub fn toc_diff(receiver: &Toc, giver: &Toc, base: Option<&Toc>) -> Diff {
    let base = base.unwrap_or(receiver);

    let mut paths: BTreeSet<&String> = BTreeSet::new();
    paths.extend(receiver.keys());
    paths.extend(base.keys());
    paths.extend(giver.keys());

    let mut diff = Diff::new();
    for path in paths {
        let r = receiver.get(path).copied();
        let b = base.get(path).copied();
        let g = giver.get(path).copied();
        let status = classify(r, b, g);
        diff.insert(path.clone(), DiffEntry { status, receiver: r, base: b, giver: g });
    }
    diff
}

fn classify(r: Option<Hash>, b: Option<Hash>, g: Option<Hash>) -> DiffStatus {
    match (r, b, g) {
        (r, _, g) if r == g => DiffStatus::Same,
        // receiver≠base ∧ giver≠base is the whole CONFLICT test (spec.md's
        // table) — it doesn't require base to be present, so an absent base
        // (Some(r)/Some(g) trivially ≠ None) still flags an add/add clash.
        (Some(r), b, Some(g)) if Some(r) != b && Some(g) != b => DiffStatus::Conflict,
        (Some(_), _, Some(_)) => DiffStatus::Modify,
        (None, None, Some(_)) => DiffStatus::Add,
        (Some(_), None, None) => DiffStatus::Add,
        (Some(_), Some(_), None) => DiffStatus::Delete,
        (None, Some(_), Some(_)) => DiffStatus::Delete,
        _ => DiffStatus::Same,
    }
}

/// project a diff to path → status, dropping entries with no change.
pub fn name_status(diff: &Diff) -> BTreeMap<String, DiffStatus> {
    diff.iter()
        .filter(|(_, entry)| entry.status != DiffStatus::Same)
        .map(|(path, entry)| (path.clone(), entry.status))
        .collect()
}

fn commit_toc(repo: &Repository, commit_hash: &Hash) -> Result<Toc> {
    let commit = object::read_commit(repo, commit_hash)?;
    object::flatten(repo, &commit.tree)
}

/// the general-purpose entry point: "index vs commit", "working copy vs
/// commit", "commit vs commit", etc. The receiver is `hash1`'s commit TOC if
/// given, else the index TOC; the giver is `hash2`'s commit TOC if given,
/// else the working-copy TOC.
pub fn diff(repo: &Repository, index: &Index, hash1: Option<&Hash>, hash2: Option<&Hash>) -> Result<Diff> {
    let receiver = match hash1 {
        Some(h) => commit_toc(repo, h)?,
        None => index.toc(),
    };
    let giver = match hash2 {
        Some(h) => commit_toc(repo, h)?,
        None => index.working_copy_toc(repo)?,
    };
    Ok(toc_diff(&receiver, &giver, None))
}

/// paths changed between HEAD and the working copy, intersected with paths
/// changed between HEAD and `h`. The guard checkout/merge use to refuse
/// clobbering unsaved work.
pub fn changed_files_commit_would_overwrite(repo: &Repository, index: &Index, h: &Hash) -> Result<Vec<String>> {
    let head = refs::try_hash(repo, "HEAD")?;
    let head_toc = match head {
        Some(h) => commit_toc(repo, &h)?,
        None => Toc::new(),
    };
    let working_copy_toc = index.working_copy_toc(repo)?;
    let target_toc = commit_toc(repo, h)?;

    let local_changes = name_status(&toc_diff(&head_toc, &working_copy_toc, None));
    let target_changes = name_status(&toc_diff(&head_toc, &target_toc, None));

    let mut overlap: Vec<String> = local_changes
        .keys()
        .filter(|path| target_changes.contains_key(*path))
        .cloned()
        .collect();
    overlap.sort();
    Ok(overlap)
}

/// working-copy changes relative to HEAD, excluding deletions.
pub fn added_or_modified_files(repo: &Repository, index: &Index) -> Result<Vec<String>> {
    let head = refs::try_hash(repo, "HEAD")?;
    let head_toc = match head {
        Some(h) => commit_toc(repo, &h)?,
        None => Toc::new(),
    };
    let working_copy_toc = index.working_copy_toc(repo)?;
    let statuses = name_status(&toc_diff(&head_toc, &working_copy_toc, None));

    let mut paths: Vec<String> = statuses
        .into_iter()
        .filter(|(_, status)| *status != DiffStatus::Delete)
        .map(|(path, _)| path)
        .collect();
    paths.sort();
    Ok(paths)
}
