//! CLI entry point for the repo-local architecture lint.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let root = match repo_root() {
        Ok(root) => root,
        Err(err) => {
            let _ = writeln!(io::stderr().lock(), "{err}");
            return ExitCode::FAILURE;
        }
    };
    match architecture_lint::lint_workspace(&root) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut stderr = io::stderr().lock();
            let _ = writeln!(stderr, "{err}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RepoRootError;

impl fmt::Display for RepoRootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unable to locate workspace root (directory containing a workspace Cargo.toml)"
        )
    }
}

impl std::error::Error for RepoRootError {}

/// Prefer an explicit `CARGO_WORKSPACE_DIR`, then the working directory, then
/// this crate's own manifest location.
fn repo_root() -> Result<PathBuf, RepoRootError> {
    let from_env = std::env::var("CARGO_WORKSPACE_DIR").ok().map(PathBuf::from);
    let from_cwd = std::env::current_dir().ok();
    let from_manifest = Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    [from_env, from_cwd, from_manifest]
        .into_iter()
        .flatten()
        .find_map(|start| find_workspace_root(&start))
        .ok_or(RepoRootError)
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| cargo_toml_declares_workspace(&dir.join("Cargo.toml")))
        .map(Path::to_path_buf)
}

fn cargo_toml_declares_workspace(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .is_some_and(|contents| contents.contains("[workspace]"))
}
