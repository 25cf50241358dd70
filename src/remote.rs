//! remote transport: "execute F against repository R" is the only mechanism
//! there is — no wire protocol. A remote is just a sibling path on the same
//! filesystem, reached by temporarily making it the current repository.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{IoResultExt, Result};
use crate::object;
use crate::repo::Repository;

/// serializes all remote operations process-wide — see spec §5: concurrent
/// access to one repository is undefined behavior, and the scoped directory
/// swap below is itself shared mutable state.
static REMOTE_LOCK: Mutex<()> = Mutex::new(());

/// change the current working directory to `path`, run `f` against the
/// repository opened there, and restore the original directory on every
/// exit path — including when `f` returns an error or panics.
pub fn run_against<T>(path: &Path, f: impl FnOnce(&Repository) -> Result<T>) -> Result<T> {
    let _guard = REMOTE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let original = std::env::current_dir().with_path(".")?;
    let _restore = RestoreCwd(original);

    std::env::set_current_dir(path).with_path(path)?;
    let repo = Repository::open(path)?;
    f(&repo)
}

struct RestoreCwd(PathBuf);

impl Drop for RestoreCwd {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

/// copy every object in `src` into `dst` that `dst` doesn't already have.
/// The naive whole-store transfer the object model's Non-goals call for —
/// there is no delta or pack format.
pub fn copy_all_objects(src: &Repository, dst: &Repository) -> Result<usize> {
    let mut copied = 0;
    for hash in object::all_hashes(src)? {
        if object::exists(dst, &hash) {
            continue;
        }
        let content = object::read(src, &hash)?.expect("hash came from all_hashes, must be readable");
        object::write(dst, &content)?;
        copied += 1;
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn run_against_restores_cwd_on_success_and_error() {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("repo");
        Repository::init(&repo_path, false).unwrap();
        let before = std::env::current_dir().unwrap();

        run_against(&repo_path, |_repo| Ok(())).unwrap();
        assert_eq!(std::env::current_dir().unwrap(), before);

        let _ = run_against(&repo_path, |_repo| -> Result<()> {
            Err(crate::Error::Unsupported("boom"))
        });
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn copy_all_objects_transfers_missing_and_skips_existing() {
        let dir = tempdir().unwrap();
        let src = Repository::init(&dir.path().join("src"), true).unwrap();
        let dst = Repository::init(&dir.path().join("dst"), true).unwrap();

        let h1 = object::write(&src, b"one").unwrap();
        object::write(&src, b"two").unwrap();
        object::write(&dst, b"one").unwrap(); // already present in dst

        let copied = copy_all_objects(&src, &dst).unwrap();
        assert_eq!(copied, 1);
        assert!(object::exists(&dst, &h1));
    }
}
