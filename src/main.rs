//! vcs - command-line front end for the vcslet library.
//!
//! `spec.md` scopes argument parsing out as an external collaborator,
//! specifying only its contract: a command name plus positional arguments
//! plus a parsed flag map. So rather than `clap`'s derive macros (one typed
//! struct per subcommand, which would bake in a richer parse contract than
//! that), this uses `clap`'s builder API with a single catch-all subcommand
//! definition and dispatches by string name. See DESIGN.md.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Arg, Command};

use vcslet::commands::{self, CommandOutput, PushOptions, RmOptions, UpdateIndexOptions};
use vcslet::{Error, Repository, Result};

fn cli() -> Command {
    Command::new("vcs")
        .about("a miniature git-like version control system")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(Arg::new("command").required(true).help("the verb to run"))
        .arg(
            Arg::new("args")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("positional arguments and --flags for the verb"),
        )
}

/// positional arguments and `--flag`/`--flag=value` tokens, split apart. A
/// bare `--flag` maps to the string `"true"`, matching spec.md §6's "bare
/// flags get boolean true".
struct Args {
    positionals: Vec<String>,
    flags: HashMap<String, String>,
}

impl Args {
    fn parse(tokens: &[String]) -> Self {
        let mut positionals = Vec::new();
        let mut flags = HashMap::new();
        for token in tokens {
            match token.strip_prefix("--") {
                Some(rest) => match rest.split_once('=') {
                    Some((key, value)) => {
                        flags.insert(key.to_string(), value.to_string());
                    }
                    None => {
                        flags.insert(rest.to_string(), "true".to_string());
                    }
                },
                None => positionals.push(token.clone()),
            }
        }
        Self { positionals, flags }
    }

    fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    fn flag(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.flags.get(*n).map(String::as_str) == Some("true"))
    }

    fn value(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|n| self.flags.get(*n).map(String::as_str))
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let matches = cli().get_matches();
    let command = matches.get_one::<String>("command").unwrap().replace('-', "_");
    let tokens: Vec<String> = matches
        .get_many::<String>("args")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let args = Args::parse(&tokens);

    match dispatch(&command, &args) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn current_repo() -> Result<Repository> {
    let cwd = env::current_dir().map_err(|e| Error::Io { path: PathBuf::from("."), source: e })?;
    Repository::discover(&cwd)
}

fn dispatch(command: &str, args: &Args) -> Result<CommandOutput> {
    match command {
        "init" => {
            let path = args.positional(0).unwrap_or(".");
            commands::init(Path::new(path), args.flag(&["bare"]))
        }

        "add" => {
            let repo = current_repo()?;
            let pathspec = args.positional(0).ok_or_else(|| Error::PathspecNotFound(String::new()))?;
            commands::add(&repo, pathspec)
        }

        "rm" => {
            let repo = current_repo()?;
            let pathspec = args.positional(0).ok_or_else(|| Error::PathspecNotFound(String::new()))?;
            let opts = RmOptions {
                recursive: args.flag(&["r", "recursive"]),
                force: args.flag(&["f", "force"]),
            };
            commands::rm(&repo, pathspec, opts)
        }

        "update_index" => {
            let repo = current_repo()?;
            let path = args.positional(0).ok_or_else(|| Error::PathspecNotFound(String::new()))?;
            let opts = UpdateIndexOptions {
                add: args.flag(&["add"]),
                remove: args.flag(&["remove"]),
            };
            commands::update_index(&repo, path, opts)
        }

        "commit" => {
            let repo = current_repo()?;
            commands::commit(&repo, args.value(&["m", "message"]))
        }

        "branch" => {
            let repo = current_repo()?;
            commands::branch(&repo, args.positional(0))
        }

        "checkout" => {
            let repo = current_repo()?;
            let ref_name = args.positional(0).ok_or_else(|| Error::RefNotFound(String::new()))?;
            commands::checkout(&repo, ref_name)
        }

        "merge" => {
            let repo = current_repo()?;
            let ref_name = args.positional(0).ok_or_else(|| Error::RefNotFound(String::new()))?;
            commands::merge(&repo, ref_name)
        }

        "diff" => {
            let repo = current_repo()?;
            commands::diff(&repo, args.positional(0), args.positional(1))
        }

        "status" => {
            let repo = current_repo()?;
            commands::status(&repo)
        }

        "remote" => {
            let mut repo = current_repo()?;
            let verb = args.positional(0).ok_or_else(|| Error::Unsupported("remote requires a subcommand"))?;
            let name = args.positional(1).unwrap_or_default();
            let url = args.positional(2).unwrap_or_default();
            commands::remote(&mut repo, verb, name, url)
        }

        "fetch" => {
            let repo = current_repo()?;
            let remote = args.positional(0).ok_or_else(|| Error::RemoteNotFound(String::new()))?;
            let branch = args.positional(1).unwrap_or("master");
            commands::fetch(&repo, remote, branch)
        }

        "pull" => {
            let repo = current_repo()?;
            let remote = args.positional(0).ok_or_else(|| Error::RemoteNotFound(String::new()))?;
            let branch = args.positional(1).unwrap_or("master");
            commands::pull(&repo, remote, branch)
        }

        "push" => {
            let repo = current_repo()?;
            let remote = args.positional(0).ok_or_else(|| Error::RemoteNotFound(String::new()))?;
            let branch = args.positional(1).unwrap_or("master");
            let opts = PushOptions { force: args.flag(&["f", "force"]) };
            commands::push(&repo, remote, branch, opts)
        }

        "clone" => {
            let src = args.positional(0).ok_or_else(|| Error::PathspecNotFound(String::new()))?;
            let dst = args.positional(1).ok_or_else(|| Error::PathspecNotFound(String::new()))?;
            commands::clone(Path::new(src), Path::new(dst), args.flag(&["bare"]))
        }

        other => Err(Error::UnknownCommand(other.to_string())),
    }
}
