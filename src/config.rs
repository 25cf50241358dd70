//! repository configuration: `[section]` / `[section "subsection"]` blocks of
//! indented `key = value` lines, git-config's format rather than TOML — see
//! DESIGN.md for why this is hand-parsed instead of reusing a config crate.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Error, IoResultExt, Result};

/// a section name plus optional subsection, e.g. `("remote", Some("origin"))`
/// or `("core", None)`. The empty string represents "no subsection" on disk.
type SectionKey = (String, String);

/// parsed `config` file contents
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    sections: BTreeMap<SectionKey, BTreeMap<String, String>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// load config from a file; a missing file is an empty config
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path).with_path(path)?;
        Self::parse(&content, path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.serialize()).with_path(path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut sections = BTreeMap::new();
        let mut current: Option<SectionKey> = None;

        for (lineno, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') {
                let header = line
                    .strip_prefix('[')
                    .and_then(|s| s.strip_suffix(']'))
                    .ok_or_else(|| Error::MalformedConfig {
                        path: path.to_path_buf(),
                        message: format!("malformed section header at line {}", lineno + 1),
                    })?;
                current = Some(parse_header(header));
                sections
                    .entry(current.clone().unwrap())
                    .or_insert_with(BTreeMap::new);
                continue;
            }

            let key = current.clone().ok_or_else(|| Error::MalformedConfig {
                path: path.to_path_buf(),
                message: format!("key outside of any section at line {}", lineno + 1),
            })?;

            let (k, v) = raw_line.trim().split_once('=').ok_or_else(|| Error::MalformedConfig {
                path: path.to_path_buf(),
                message: format!("expected 'key = value' at line {}", lineno + 1),
            })?;
            sections
                .entry(key)
                .or_insert_with(BTreeMap::new)
                .insert(k.trim().to_string(), unquote(v.trim()));
        }

        Ok(Self { sections })
    }

    fn serialize(&self) -> String {
        let mut out = String::new();
        for ((section, subsection), entries) in &self.sections {
            if subsection.is_empty() {
                let _ = writeln!(out, "[{}]", section);
            } else {
                let _ = writeln!(out, "[{} \"{}\"]", section, subsection);
            }
            for (key, value) in entries {
                let _ = writeln!(out, "  {} = {}", key, value);
            }
        }
        out
    }

    pub fn get(&self, section: &str, subsection: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&(section.to_string(), subsection.to_string()))
            .and_then(|entries| entries.get(key))
            .map(|s| s.as_str())
    }

    pub fn set(&mut self, section: &str, subsection: &str, key: &str, value: impl Into<String>) {
        self.sections
            .entry((section.to_string(), subsection.to_string()))
            .or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.into());
    }

    pub fn has_section(&self, section: &str, subsection: &str) -> bool {
        self.sections
            .contains_key(&(section.to_string(), subsection.to_string()))
    }

    /// `core.bare`: a repository with no working copy
    pub fn is_bare(&self) -> bool {
        self.get("core", "", "bare") == Some("true")
    }

    pub fn set_bare(&mut self, bare: bool) {
        self.set("core", "", "bare", if bare { "true" } else { "false" });
    }

    /// the `url` recorded under `[remote "<name>"]`
    pub fn remote_url(&self, name: &str) -> Option<&str> {
        self.get("remote", name, "url")
    }

    pub fn add_remote(&mut self, name: &str, url: &str) -> Result<()> {
        if self.has_section("remote", name) {
            return Err(Error::RemoteExists(name.to_string()));
        }
        self.set("remote", name, "url", url);
        Ok(())
    }

    /// names of all configured remotes, in a stable order
    pub fn remote_names(&self) -> Vec<String> {
        self.sections
            .keys()
            .filter(|(section, _)| section == "remote")
            .map(|(_, subsection)| subsection.clone())
            .collect()
    }
}

fn parse_header(header: &str) -> SectionKey {
    match header.split_once(' ') {
        Some((section, rest)) => (section.trim().to_string(), unquote(rest.trim())),
        None => (header.trim().to_string(), String::new()),
    }
}

fn unquote(s: &str) -> String {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
        .to_string()
}
