//! the ref namespace and HEAD disposition: attached, detached, mid-merge.
//!
//! `HEAD` holds either `ref: refs/heads/<name>\n` (attached) or a bare
//! `<hash>\n` (detached). `refs/heads/<name>` and `refs/remotes/<r>/<b>` hold
//! commit hashes directly. `MERGE_HEAD`'s mere presence is the merge state.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, IoResultExt, Result};
use crate::hash::Hash;
use crate::repo::Repository;

/// true if `name` is one of the qualified ref forms: `refs/heads/<branch>`,
/// `refs/remotes/<remote>/<branch>`, or one of `HEAD`/`FETCH_HEAD`/`MERGE_HEAD`.
/// Anything else is an unqualified name, always interpreted as a local branch.
pub fn is_ref(name: &str) -> bool {
    if matches!(name, "HEAD" | "FETCH_HEAD" | "MERGE_HEAD") {
        return true;
    }
    if let Some(branch) = name.strip_prefix("refs/heads/") {
        return is_ref_component(branch);
    }
    if let Some(rest) = name.strip_prefix("refs/remotes/") {
        return match rest.split_once('/') {
            Some((remote, branch)) => is_ref_component(remote) && is_ref_component(branch),
            None => false,
        };
    }
    false
}

fn is_ref_component(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
}

/// resolve `HEAD` through one symbolic indirection: to the branch ref it
/// names when attached, to the literal `"HEAD"` when detached. Any other
/// qualified ref resolves to itself; an unqualified name becomes
/// `refs/heads/<name>`.
pub fn terminal_ref(repo: &Repository, s: &str) -> Result<String> {
    if s == "HEAD" {
        let content = fs::read_to_string(repo.head_path()).with_path(repo.head_path())?;
        return match content.trim().strip_prefix("ref: ") {
            Some(branch) => Ok(branch.to_string()),
            None => Ok("HEAD".to_string()),
        };
    }
    if is_ref(s) {
        return Ok(s.to_string());
    }
    Ok(format!("refs/heads/{}", s))
}

/// resolve `s` to a commit hash: a ref name resolves through storage, but a
/// string that already looks like a hash passes straight through, so callers
/// can accept either uniformly.
pub fn hash(repo: &Repository, s: &str) -> Result<Hash> {
    try_hash(repo, s)?.ok_or_else(|| Error::RefNotFound(s.to_string()))
}

/// like [`hash`], but a ref that resolves to nothing (e.g. `HEAD` before the
/// first commit) reports `None` instead of erroring.
pub fn try_hash(repo: &Repository, s: &str) -> Result<Option<Hash>> {
    if let Some(h) = Hash::parse(s) {
        return Ok(Some(h));
    }
    if s == "FETCH_HEAD" {
        return fetch_head_hash_for_current_branch(repo);
    }

    let resolved = terminal_ref(repo, s)?;
    if resolved == "HEAD" {
        let content = fs::read_to_string(repo.head_path()).with_path(repo.head_path())?;
        return Ok(Some(Hash::from_hex(content.trim())?));
    }
    read_hash_file(&ref_file_path(repo, &resolved))
}

pub fn exists(repo: &Repository, ref_name: &str) -> bool {
    ref_file_path(repo, ref_name).is_file()
}

pub fn write(repo: &Repository, ref_name: &str, hash: &Hash) -> Result<()> {
    write_ref_file(&ref_file_path(repo, ref_name), &format!("{}\n", hash.to_hex()))
}

/// point `HEAD` at a branch (attached) or straight at a commit (detached).
pub fn write_head_symbolic(repo: &Repository, branch_ref: &str) -> Result<()> {
    write_ref_file(&repo.head_path(), &format!("ref: {}\n", branch_ref))
}

pub fn write_head_detached(repo: &Repository, commit: &Hash) -> Result<()> {
    write_ref_file(&repo.head_path(), &format!("{}\n", commit.to_hex()))
}

pub fn rm(repo: &Repository, ref_name: &str) -> Result<()> {
    let path = ref_file_path(repo, ref_name);
    fs::remove_file(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::RefNotFound(ref_name.to_string())
        } else {
            Error::Io { path, source: e }
        }
    })
}

/// the branch name `HEAD` currently points at, or `None` when detached.
pub fn head_branch_name(repo: &Repository) -> Result<Option<String>> {
    let content = fs::read_to_string(repo.head_path()).with_path(repo.head_path())?;
    Ok(content
        .trim()
        .strip_prefix("ref: refs/heads/")
        .map(|s| s.to_string()))
}

/// `HEAD` contains no `refs` substring — the literal test spec.md defines.
pub fn is_head_detached(repo: &Repository) -> Result<bool> {
    let content = fs::read_to_string(repo.head_path()).with_path(repo.head_path())?;
    Ok(!content.contains("refs"))
}

/// the parents the next commit will record.
pub fn commit_parent_hashes(repo: &Repository) -> Result<Vec<Hash>> {
    if exists(repo, "MERGE_HEAD") {
        let head = hash(repo, "HEAD")?;
        let merge_head = hash(repo, "MERGE_HEAD")?;
        return Ok(vec![head, merge_head]);
    }
    Ok(try_hash(repo, "HEAD")?.into_iter().collect())
}

/// local branch names under `refs/heads`
pub fn list_branches(repo: &Repository) -> Result<Vec<String>> {
    list_leaf_paths(&repo.refs_dir().join("heads"))
}

/// `(remote, branch)` pairs under `refs/remotes`
pub fn list_remote_branches(repo: &Repository) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for name in list_leaf_paths(&repo.refs_dir().join("remotes"))? {
        if let Some((remote, branch)) = name.split_once('/') {
            out.push((remote.to_string(), branch.to_string()));
        }
    }
    Ok(out)
}

fn list_leaf_paths(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let mut out = Vec::new();
    collect_leaf_paths(dir, dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_leaf_paths(base: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        let path = entry.path();
        if path.is_dir() {
            collect_leaf_paths(base, &path, out)?;
        } else if let Ok(rel) = path.strip_prefix(base) {
            out.push(rel.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/"));
        }
    }
    Ok(())
}

fn fetch_head_hash_for_current_branch(repo: &Repository) -> Result<Option<Hash>> {
    let Some(branch) = head_branch_name(repo)? else {
        return Ok(None);
    };
    let path = repo.fetch_head_path();
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io { path, source: e }),
    };
    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let hash_tok = parts.next();
        let _branch_kw = parts.next();
        let branch_tok = parts.next();
        if branch_tok == Some(branch.as_str()) {
            if let Some(h) = hash_tok {
                return Ok(Some(Hash::from_hex(h)?));
            }
        }
    }
    Ok(None)
}

fn read_hash_file(path: &Path) -> Result<Option<Hash>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(Hash::from_hex(content.trim())?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io { path: path.to_path_buf(), source: e }),
    }
}

fn ref_file_path(repo: &Repository, ref_name: &str) -> PathBuf {
    match ref_name {
        "HEAD" => repo.head_path(),
        "MERGE_HEAD" => repo.merge_head_path(),
        "MERGE_MSG" => repo.merge_msg_path(),
        "FETCH_HEAD" => repo.fetch_head_path(),
        other => repo.meta_dir().join(other),
    }
}

fn write_ref_file(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).with_path(dir)?;
    let mut tmp = NamedTempFile::new_in(dir).with_path(dir)?;
    tmp.write_all(content.as_bytes()).with_path(path)?;
    tmp.persist(path)
        .map_err(|e| Error::Io { path: path.to_path_buf(), source: e.error })?;
    Ok(())
}
