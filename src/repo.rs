use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};

/// name of the metadata directory in a non-bare repository
pub const META_DIR: &str = ".vcslet";

/// a vcslet repository: its on-disk layout plus loaded config.
///
/// `work_tree` is the directory a non-bare repository's files live under;
/// for a bare repository it equals `meta_dir`. Every other subsystem takes
/// a `&Repository` explicitly rather than reaching for process-global state —
/// the only remaining global is the current directory, scoped in `remote.rs`.
#[derive(Clone, Debug)]
pub struct Repository {
    work_tree: PathBuf,
    meta_dir: PathBuf,
    config: Config,
}

impl Repository {
    /// lay out a new repository at `path`. Refuses if one already exists there.
    pub fn init(path: &Path, bare: bool) -> Result<Self> {
        let path = &absolutize(path)?;
        let meta_dir = if bare { path.to_path_buf() } else { path.join(META_DIR) };
        if meta_dir.join("HEAD").exists() {
            return Err(Error::RepoExists(path.to_path_buf()));
        }

        std::fs::create_dir_all(&meta_dir).with_path(&meta_dir)?;
        std::fs::create_dir_all(meta_dir.join("objects")).with_path(&meta_dir)?;
        std::fs::create_dir_all(meta_dir.join("refs/heads")).with_path(&meta_dir)?;
        std::fs::create_dir_all(meta_dir.join("refs/remotes")).with_path(&meta_dir)?;
        std::fs::write(meta_dir.join("HEAD"), "ref: refs/heads/master\n").with_path(&meta_dir)?;

        let mut config = Config::new();
        config.set_bare(bare);
        config.save(&meta_dir.join("config"))?;

        if !bare {
            std::fs::create_dir_all(path).with_path(path)?;
        }

        Ok(Self {
            work_tree: path.to_path_buf(),
            meta_dir,
            config,
        })
    }

    /// open a repository whose root (work tree, or bare repo directory) is
    /// exactly `path` — no upward search. Use [`Repository::discover`] to
    /// search from a starting directory the way the CLI does.
    pub fn open(path: &Path) -> Result<Self> {
        let path = &absolutize(path)?;
        let bare_candidate = path.join("HEAD");
        let non_bare_candidate = path.join(META_DIR).join("HEAD");

        let meta_dir = if non_bare_candidate.is_file() {
            path.join(META_DIR)
        } else if bare_candidate.is_file() {
            path.to_path_buf()
        } else {
            return Err(Error::NoRepo(path.to_path_buf()));
        };

        let config = Config::load(&meta_dir.join("config"))?;

        Ok(Self {
            work_tree: path.to_path_buf(),
            meta_dir,
            config,
        })
    }

    /// search `start` and its ancestors for a repository, the way commands
    /// invoked from a subdirectory of the work tree find their repository.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut dir = start.to_path_buf();
        loop {
            if let Ok(repo) = Self::open(&dir) {
                return Ok(repo);
            }
            if !dir.pop() {
                return Err(Error::NoRepo(start.to_path_buf()));
            }
        }
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    pub fn meta_dir(&self) -> &Path {
        &self.meta_dir
    }

    pub fn is_bare(&self) -> bool {
        self.config.is_bare()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.meta_dir.join("config"))
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.meta_dir.join("objects")
    }

    pub fn refs_dir(&self) -> PathBuf {
        self.meta_dir.join("refs")
    }

    pub fn head_path(&self) -> PathBuf {
        self.meta_dir.join("HEAD")
    }

    pub fn index_path(&self) -> PathBuf {
        self.meta_dir.join("index")
    }

    pub fn merge_head_path(&self) -> PathBuf {
        self.meta_dir.join("MERGE_HEAD")
    }

    pub fn merge_msg_path(&self) -> PathBuf {
        self.meta_dir.join("MERGE_MSG")
    }

    pub fn fetch_head_path(&self) -> PathBuf {
        self.meta_dir.join("FETCH_HEAD")
    }

    /// requires a work tree; refuses on bare repositories (§4.7 precondition)
    pub fn require_work_tree(&self) -> Result<()> {
        if self.is_bare() {
            return Err(Error::BareRepository);
        }
        Ok(())
    }
}

/// join a relative path onto the current directory. A `Repository`'s paths
/// must stay valid across the cwd swap `remote::run_against` performs, so
/// every path is made absolute up front rather than carried relative.
fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().with_path(".")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_lays_out_non_bare_repo() {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("project");
        let repo = Repository::init(&repo_path, false).unwrap();

        assert!(repo_path.join(META_DIR).join("HEAD").is_file());
        assert!(repo_path.join(META_DIR).join("objects").is_dir());
        assert!(repo_path.join(META_DIR).join("refs/heads").is_dir());
        assert!(!repo.is_bare());
    }

    #[test]
    fn init_lays_out_bare_repo_at_root() {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("project.vcslet");
        let repo = Repository::init(&repo_path, true).unwrap();

        assert!(repo_path.join("HEAD").is_file());
        assert!(!repo_path.join(META_DIR).exists());
        assert!(repo.is_bare());
    }

    #[test]
    fn init_refuses_when_already_a_repo() {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("project");
        Repository::init(&repo_path, false).unwrap();
        assert!(matches!(
            Repository::init(&repo_path, false),
            Err(Error::RepoExists(_))
        ));
    }

    #[test]
    fn open_rejects_non_repo() {
        let dir = tempdir().unwrap();
        assert!(matches!(Repository::open(dir.path()), Err(Error::NoRepo(_))));
    }

    #[test]
    fn discover_walks_up_from_subdirectory() {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("project");
        Repository::init(&repo_path, false).unwrap();

        let nested = repo_path.join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let repo = Repository::discover(&nested).unwrap();
        assert_eq!(repo.work_tree(), repo_path);
    }

    #[test]
    fn require_work_tree_rejects_bare() {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("bare.vcslet");
        let repo = Repository::init(&repo_path, true).unwrap();
        assert!(matches!(repo.require_work_tree(), Err(Error::BareRepository)));
    }
}
