use std::path::Path;

use crate::error::Result;
use crate::repo::Repository;

use super::CommandOutput;

/// lay out a new repository at `path`. Refuses if one already exists there.
pub fn init(path: &Path, bare: bool) -> Result<CommandOutput> {
    Repository::init(path, bare)?;
    let kind = if bare { "bare " } else { "" };
    Ok(CommandOutput::line(format!(
        "Initialized empty {}vcslet repository in {}",
        kind,
        path.display()
    )))
}
