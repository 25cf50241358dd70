//! the staging area: a persistent `(path, stage) -> blob-hash` mapping.
//!
//! Stage 0 means "not in conflict"; stages 1/2/3 hold the base/receiver/giver
//! versions of a conflicted path. (I1) a path is present only at stage 0, or
//! at stages 2 and 3 (optionally with 1), never both. (I2) every referenced
//! hash is stored in the object store, enforced by routing all writes
//! through [`object::write`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::Hash;
use crate::object::{self, Toc};
use crate::repo::Repository;

pub type Stage = u8;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Index {
    entries: BTreeMap<(String, Stage), Hash>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_file(&self, path: &str, stage: Stage) -> bool {
        self.entries.contains_key(&(path.to_string(), stage))
    }

    /// true if `path` is recorded at any stage, clean or conflicted.
    pub fn has_path(&self, path: &str) -> bool {
        (0..=3).any(|stage| self.has_file(path, stage))
    }

    /// true if `path` currently has unresolved conflict stages.
    pub fn is_conflicted(&self, path: &str) -> bool {
        self.has_file(path, 2) || self.has_file(path, 3)
    }

    pub fn read(repo: &Repository) -> Result<Self> {
        let path = repo.index_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(Error::Io { path, source: e }),
        };

        let mut entries = BTreeMap::new();
        for (lineno, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(3, ' ');
            let (Some(path_str), Some(stage_str), Some(hash_str)) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(Error::MalformedIndex {
                    line: lineno + 1,
                    message: format!("expected '<path> <stage> <hash>', got: {}", line),
                });
            };
            let stage: Stage = stage_str.parse().map_err(|_| Error::MalformedIndex {
                line: lineno + 1,
                message: format!("invalid stage: {}", stage_str),
            })?;
            let hash = Hash::from_hex(hash_str)?;
            entries.insert((path_str.to_string(), stage), hash);
        }
        Ok(Self { entries })
    }

    pub fn write(&self, repo: &Repository) -> Result<()> {
        let mut out = String::new();
        for ((path, stage), hash) in &self.entries {
            out.push_str(path);
            out.push(' ');
            out.push_str(&stage.to_string());
            out.push(' ');
            out.push_str(&hash.to_hex());
            out.push('\n');
        }
        fs::write(repo.index_path(), out).with_path(repo.index_path())
    }

    /// the stage-0 view: paths with no unresolved conflicts.
    pub fn toc(&self) -> Toc {
        self.entries
            .iter()
            .filter(|((_, stage), _)| *stage == 0)
            .map(|((path, _), hash)| (path.clone(), *hash))
            .collect()
    }

    /// recompute hashes of the on-disk copies of every indexed stage-0 path.
    /// This is how the diff engine sees "what's different in the working
    /// copy" without needing a separate tracked-files list.
    pub fn working_copy_toc(&self, repo: &Repository) -> Result<Toc> {
        let mut toc = Toc::new();
        for path in self.toc().keys() {
            let full = repo.work_tree().join(path);
            if let Ok(content) = fs::read(&full) {
                toc.insert(path.clone(), Hash::of(&content));
            }
        }
        Ok(toc)
    }

    /// paths that currently have unresolved conflict stages (2 and/or 3).
    pub fn conflicted_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .entries
            .keys()
            .filter(|(_, stage)| *stage == 2 || *stage == 3)
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    /// repo-relative paths matching `pathspec` by prefix.
    pub fn matching_files(&self, pathspec: &str) -> Vec<String> {
        let mut matches: Vec<String> = self
            .toc()
            .keys()
            .filter(|path| matches_pathspec(path, pathspec))
            .cloned()
            .collect();
        matches.sort();
        matches
    }

    /// delete all stages recorded for `path`.
    pub fn write_rm(&mut self, path: &str) {
        self.entries.retain(|(p, _), _| p != path);
    }

    /// stage a non-conflicting version of `path`: clears any existing stages,
    /// writes the content to the object store, and records it at stage 0.
    pub fn write_non_conflict(&mut self, repo: &Repository, path: &str, content: &[u8]) -> Result<Hash> {
        self.write_rm(path);
        let hash = object::write(repo, content)?;
        self.entries.insert((path.to_string(), 0), hash);
        Ok(hash)
    }

    /// stage an already-stored blob at stage 0 directly, without rewriting
    /// it to the object store. Used by the merge engine when the content
    /// came from an existing commit's tree rather than fresh input.
    pub fn stage_blob(&mut self, path: &str, hash: Hash) {
        self.entries.insert((path.to_string(), 0), hash);
    }

    /// stage a conflicted path: receiver at stage 2, giver at stage 3, and
    /// base (if any) at stage 1. Never leaves a stage-0 entry for `path`.
    pub fn write_conflict(&mut self, path: &str, receiver: Hash, giver: Hash, base: Option<Hash>) {
        self.write_rm(path);
        self.entries.insert((path.to_string(), 2), receiver);
        self.entries.insert((path.to_string(), 3), giver);
        if let Some(base) = base {
            self.entries.insert((path.to_string(), 1), base);
        }
    }

    /// replace the whole index with a flat TOC, staging every path at 0.
    pub fn replace_with_toc(&mut self, toc: &Toc) {
        self.entries.clear();
        for (path, hash) in toc {
            self.entries.insert((path.clone(), 0), *hash);
        }
    }
}

fn matches_pathspec(path: &str, pathspec: &str) -> bool {
    if pathspec == "." || pathspec.is_empty() {
        return true;
    }
    path == pathspec || path.starts_with(&format!("{}/", pathspec))
}

/// recursively enumerate every regular file under `path` (repo-relative or
/// absolute), used by `add` to turn a directory argument into file paths.
pub fn enumerate_paths(repo: &Repository, path: &Path) -> Result<Vec<String>> {
    let full = if path.is_absolute() { path.to_path_buf() } else { repo.work_tree().join(path) };
    if !full.exists() {
        return Ok(vec![]);
    }
    let meta_dir = repo.meta_dir();
    let mut out = Vec::new();
    for entry in WalkDir::new(&full)
        .into_iter()
        .filter_entry(|e| e.path() != meta_dir)
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            if let Ok(rel) = entry.path().strip_prefix(repo.work_tree()) {
                out.push(rel.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/"));
            }
        }
    }
    out.sort();
    Ok(out)
}
