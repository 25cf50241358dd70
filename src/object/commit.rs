use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::repo::Repository;

/// a stored snapshot: one tree plus 0..n parent commits, a timestamp and a
/// free-text message. Two parents means a merge commit; more is permitted by
/// the on-disk format but unused by the merge engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub tree: Hash,
    pub parents: Vec<Hash>,
    pub date: String,
    pub message: String,
}

impl Commit {
    pub fn new(tree: Hash, parents: Vec<Hash>, date: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tree,
            parents,
            date: date.into(),
            message: message.into(),
        }
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    fn serialize(&self) -> String {
        let mut out = format!("commit {}\n", self.tree.to_hex());
        for parent in &self.parents {
            out.push_str("parent ");
            out.push_str(&parent.to_hex());
            out.push('\n');
        }
        out.push_str("Date:  ");
        out.push_str(&self.date);
        out.push_str("\n\n");
        for line in self.message.lines() {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let header = lines.next().ok_or_else(|| malformed("empty commit"))?;
        let tree = header
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| malformed("missing tree hash"))
            .and_then(|s| Hash::from_hex(s))?;

        let mut parents = Vec::new();
        let mut date = None;
        let mut rest: std::iter::Peekable<std::str::Lines> = lines.peekable();
        while let Some(line) = rest.peek().copied() {
            if let Some(hash) = line.strip_prefix("parent ") {
                parents.push(Hash::from_hex(hash.trim())?);
                rest.next();
            } else if let Some(value) = line.strip_prefix("Date:") {
                date = Some(value.trim().to_string());
                rest.next();
                break;
            } else {
                return Err(malformed(&format!("unexpected header line: {}", line)));
            }
        }
        let date = date.ok_or_else(|| malformed("missing Date header"))?;

        // a blank line separates the header from the message
        match rest.next() {
            Some("") => {}
            Some(other) => return Err(malformed(&format!("expected blank line, got: {}", other))),
            None => return Err(malformed("missing message separator")),
        }

        let message = rest
            .map(|line| line.strip_prefix("    ").unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Commit { tree, parents, date, message })
    }
}

fn malformed(message: &str) -> Error {
    Error::MalformedObject(format!("commit: {}", message))
}

pub fn write_commit(repo: &Repository, commit: &Commit) -> Result<Hash> {
    super::write(repo, commit.serialize().as_bytes())
}

pub fn read_commit(repo: &Repository, hash: &Hash) -> Result<Commit> {
    let bytes = super::read(repo, hash)?.ok_or(Error::ObjectNotFound(*hash))?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| malformed(&format!("{} is not valid utf-8", hash)))?;
    Commit::parse(text)
}

/// transitive closure of `hash`'s parents, including parents-of-parents;
/// duplicates are possible in criss-cross histories and are left in, since
/// callers only ever use this set for membership tests.
pub fn ancestors(repo: &Repository, hash: &Hash) -> Result<Vec<Hash>> {
    log::trace!("walking ancestors of {}", hash);
    let mut result = Vec::new();
    let mut frontier = vec![*hash];
    let mut seen = std::collections::HashSet::new();
    seen.insert(*hash);
    while let Some(current) = frontier.pop() {
        let commit = read_commit(repo, &current)?;
        for parent in commit.parents {
            result.push(parent);
            if seen.insert(parent) {
                frontier.push(parent);
            }
        }
    }
    log::debug!("{} has {} ancestor(s)", hash, result.len());
    Ok(result)
}

/// `ancestor ∈ ancestors(descendant)` — strict: a commit is never its own
/// ancestor, since `ancestors` never includes the commit it starts from.
pub fn is_ancestor(repo: &Repository, ancestor: &Hash, descendant: &Hash) -> Result<bool> {
    let result = ancestors(repo, descendant)?.contains(ancestor);
    log::trace!("is_ancestor({}, {}) = {}", ancestor, descendant, result);
    Ok(result)
}

/// true if `receiver` is `giver` itself or an ancestor of it — the same
/// "nothing would be lost moving receiver forward to giver" condition
/// `can_fast_forward` checks, phrased over hashes instead of refs.
pub fn is_up_to_date(repo: &Repository, receiver: &Hash, giver: &Hash) -> Result<bool> {
    if receiver == giver {
        return Ok(true);
    }
    is_ancestor(repo, receiver, giver)
}
