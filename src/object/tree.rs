use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::repo::Repository;

/// a table of contents: the flattened path → blob-hash view of a tree.
pub type Toc = BTreeMap<String, Hash>;

/// what a tree entry points at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeEntryKind {
    Blob(Hash),
    Tree(Hash),
}

impl TreeEntryKind {
    fn word(&self) -> &'static str {
        match self {
            TreeEntryKind::Blob(_) => "blob",
            TreeEntryKind::Tree(_) => "tree",
        }
    }

    pub fn hash(&self) -> Hash {
        match self {
            TreeEntryKind::Blob(h) | TreeEntryKind::Tree(h) => *h,
        }
    }
}

/// one line of a tree object: `"blob"|"tree" <child-hash> <name>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub kind: TreeEntryKind,
}

/// a directory listing — a node in the tree DAG, ending in blobs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn serialize(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(entry.kind.word());
            out.push(' ');
            out.push_str(&entry.kind.hash().to_hex());
            out.push(' ');
            out.push_str(&entry.name);
            out.push('\n');
        }
        out
    }

    fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            entries.push(parse_entry_line(line)?);
        }
        Ok(Self::new(entries))
    }
}

fn parse_entry_line(line: &str) -> Result<TreeEntry> {
    let mut parts = line.splitn(3, ' ');
    let (Some(kind), Some(hash), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::MalformedObject(format!("malformed tree entry: {}", line)));
    };
    let hash = Hash::from_hex(hash)?;
    let kind = match kind {
        "blob" => TreeEntryKind::Blob(hash),
        "tree" => TreeEntryKind::Tree(hash),
        other => {
            return Err(Error::MalformedObject(format!(
                "unknown tree entry kind: {}",
                other
            )))
        }
    };
    Ok(TreeEntry {
        name: name.to_string(),
        kind,
    })
}

/// true if `text` parses cleanly as a nonempty sequence of tree-entry lines.
/// Used by [`crate::object::classify`] to distinguish trees from blobs.
pub(super) fn looks_like_tree(text: &str) -> bool {
    let mut any = false;
    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        if parse_entry_line(line).is_err() {
            return false;
        }
        any = true;
    }
    any
}

pub fn write_tree(repo: &Repository, tree: &Tree) -> Result<Hash> {
    super::write(repo, tree.serialize().as_bytes())
}

pub fn read_tree(repo: &Repository, hash: &Hash) -> Result<Tree> {
    let bytes = super::read(repo, hash)?.ok_or(Error::ObjectNotFound(*hash))?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| Error::MalformedObject(format!("tree {} is not valid utf-8", hash)))?;
    Tree::parse(text)
}

/// recursively materialize a tree hash into a flattened path → blob-hash TOC.
pub fn flatten(repo: &Repository, tree_hash: &Hash) -> Result<Toc> {
    let mut toc = Toc::new();
    flatten_into(repo, tree_hash, "", &mut toc)?;
    Ok(toc)
}

fn flatten_into(repo: &Repository, tree_hash: &Hash, prefix: &str, toc: &mut Toc) -> Result<()> {
    let tree = read_tree(repo, tree_hash)?;
    for entry in tree.entries() {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{}/{}", prefix, entry.name)
        };
        match entry.kind {
            TreeEntryKind::Blob(hash) => {
                toc.insert(path, hash);
            }
            TreeEntryKind::Tree(hash) => {
                flatten_into(repo, &hash, &path, toc)?;
            }
        }
    }
    Ok(())
}

/// write a nested tree bottom-up from a flat path → blob-hash TOC, returning
/// the hash of the root tree. Blob leaves are assumed already written; only
/// the tree nodes themselves are serialized here.
pub fn write_tree_from_toc(repo: &Repository, toc: &Toc) -> Result<Hash> {
    write_level(repo, toc, "")
}

/// write the tree node for everything in `toc` under `prefix`, recursing into
/// subtrees depth-first so children are written (and their hashes known)
/// before the parent that references them.
fn write_level(repo: &Repository, toc: &Toc, prefix: &str) -> Result<Hash> {
    let mut child_names: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
    let mut entries: Vec<TreeEntry> = Vec::new();

    for (path, hash) in toc {
        let rel = if prefix.is_empty() {
            path.as_str()
        } else {
            match path.strip_prefix(prefix).and_then(|s| s.strip_prefix('/')) {
                Some(rel) => rel,
                None => continue,
            }
        };
        match rel.split_once('/') {
            None => entries.push(TreeEntry {
                name: rel.to_string(),
                kind: TreeEntryKind::Blob(*hash),
            }),
            Some((first, _)) => {
                child_names.insert(first.to_string());
            }
        }
    }

    for name in &child_names {
        let child_prefix = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };
        let child_hash = write_level(repo, toc, &child_prefix)?;
        entries.push(TreeEntry {
            name: name.clone(),
            kind: TreeEntryKind::Tree(child_hash),
        });
    }

    write_tree(repo, &Tree::new(entries))
}
