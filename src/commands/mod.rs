//! command orchestration: the top-level verbs that compose the object
//! store, refs, index, diff, merge, and working-copy reconciler.
//!
//! One module per verb, mirroring the teacher crate's one-operation-per-file
//! `ops::` layout. Every function takes an explicit `&Repository` (or, for
//! `init`/`clone`, a target path) and returns [`CommandOutput`] — the line(s)
//! of text §6 says a successful command prints to stdout.

mod add;
mod branch;
mod checkout;
mod clone;
mod commit;
mod diff;
mod fetch;
mod init;
mod merge;
mod pull;
mod push;
mod remote;
mod rm;
mod status;
mod update_index;

pub use add::add;
pub use branch::branch;
pub use checkout::checkout;
pub use clone::clone;
pub use commit::commit;
pub use diff::diff;
pub use fetch::fetch;
pub use init::init;
pub use merge::merge;
pub use pull::pull;
pub use push::{push, PushOptions};
pub use remote::remote;
pub use rm::{rm, RmOptions};
pub use status::status;
pub use update_index::{update_index, UpdateIndexOptions};

/// the text a successful command prints to stdout (§6: "successful return
/// values are printed to standard output when non-empty"). Wraps a `String`
/// instead of printing directly so commands stay testable without capturing
/// process stdout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput(String);

impl CommandOutput {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CommandOutput {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromIterator<String> for CommandOutput {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect::<Vec<_>>().join("\n"))
    }
}
