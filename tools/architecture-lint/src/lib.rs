//! Repo-local architectural lint for the workspace.
//!
//! Two families of rules are enforced on every crate's `src/` tree:
//!
//! - crate layering: `schemas` sits at the bottom, `pagination` builds on it,
//!   `shared` builds on both, `fixtures` sees only `schemas`, and only
//!   `backend` may use Actix. Inside the
//!   backend, `domain` must not reach into the HTTP adapters, middleware or
//!   server wiring.
//! - the endpoint table is the only home of endpoint paths: a string literal
//!   naming `/health`, `/users` or `/posts` anywhere other than
//!   `crates/shared/src/endpoints.rs` is reported, including literals inside
//!   macro invocations such as `format!`.
//!
//! The lint is executed via `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use proc_macro2::{TokenStream, TokenTree};
use syn::visit::Visit;
use thiserror::Error;

/// The only file allowed to spell out endpoint paths.
pub const ENDPOINT_TABLE: &str = "crates/shared/src/endpoints.rs";

/// Path prefixes owned by the endpoint table.
pub const ENDPOINT_ROOTS: [&str; 3] = ["/health", "/users", "/posts"];

const ACTIX_CRATES: [&str; 4] = ["actix_http", "actix_rt", "actix_service", "actix_web"];

/// A single rule violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to the workspace root.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// Rust source parsing failed, or the file belongs to no known crate.
    #[error("Failed to lint {}: {message}", .file.display())]
    Parse {
        /// Offending file.
        file: PathBuf,
        /// Parser or classification failure.
        message: String,
    },
    /// One or more rule violations were found.
    #[error("Architecture violations:\n{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("- {violation}\n"))
        .collect()
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to the workspace root.
    pub file: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Lint every crate source tree below the workspace `root`.
///
/// Sources are read from `backend/src` and from `crates/*/src`.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Violations`] listing every broken rule,
/// or the I/O and parse failures met on the way.
pub fn lint_workspace(root: &Path) -> Result<(), ArchitectureLintError> {
    let mut sources = Vec::new();
    let backend_src = root.join("backend").join("src");
    if backend_src.is_dir() {
        collect_sources_under(root, &backend_src, &mut sources)?;
    }
    let crates_dir = root.join("crates");
    if crates_dir.is_dir() {
        let mut members: Vec<PathBuf> = fs::read_dir(&crates_dir)?
            .map(|entry| entry.map(|found| found.path().join("src")))
            .collect::<Result<_, _>>()?;
        members.sort();
        for src in members.iter().filter(|src| src.is_dir()) {
            collect_sources_under(root, src, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
///
/// # Errors
///
/// As for [`lint_workspace`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = Layer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "unable to infer crate layer from file path".to_owned(),
            }
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(lint_parsed_source(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// Where a file sits in the dependency order of the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Schemas,
    Pagination,
    Shared,
    Fixtures,
    BackendDomain,
    BackendInbound,
    BackendShell,
}

impl Layer {
    fn infer_from_path(relative_path: &Path) -> Option<Self> {
        let owned: Vec<String> = relative_path
            .components()
            .map(|part| part.as_os_str().to_string_lossy().into_owned())
            .collect();
        let parts: Vec<&str> = owned.iter().map(String::as_str).collect();
        match parts.as_slice() {
            ["crates", "schemas", "src", ..] => Some(Self::Schemas),
            ["crates", "pagination", "src", ..] => Some(Self::Pagination),
            ["crates", "shared", "src", ..] => Some(Self::Shared),
            ["crates", "fixtures", "src", ..] => Some(Self::Fixtures),
            ["backend", "src", "domain", ..] => Some(Self::BackendDomain),
            ["backend", "src", "inbound", ..] => Some(Self::BackendInbound),
            ["backend", "src", ..] => Some(Self::BackendShell),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Schemas => "schemas",
            Self::Pagination => "pagination",
            Self::Shared => "shared",
            Self::Fixtures => "fixtures",
            Self::BackendDomain => "backend domain",
            Self::BackendInbound => "backend inbound",
            Self::BackendShell => "backend",
        }
    }

    fn forbidden_crate_roots(self) -> BTreeSet<&'static str> {
        let mut roots = BTreeSet::new();
        match self {
            Self::Schemas => {
                roots.extend(["pagination", "shared", "fixtures", "backend"]);
                roots.extend(ACTIX_CRATES);
            }
            Self::Pagination => {
                roots.extend(["shared", "fixtures", "backend"]);
                roots.extend(ACTIX_CRATES);
            }
            Self::Shared => {
                roots.extend(["fixtures", "backend"]);
                roots.extend(ACTIX_CRATES);
            }
            Self::Fixtures => {
                roots.extend(["pagination", "shared", "backend"]);
                roots.extend(ACTIX_CRATES);
            }
            Self::BackendDomain => roots.extend(ACTIX_CRATES),
            Self::BackendInbound | Self::BackendShell => {}
        }
        roots
    }

    fn forbidden_module_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::BackendDomain => BTreeSet::from(["inbound", "middleware", "server"]),
            Self::BackendInbound => BTreeSet::from(["server"]),
            _ => BTreeSet::new(),
        }
    }

    const fn is_backend(self) -> bool {
        matches!(
            self,
            Self::BackendDomain | Self::BackendInbound | Self::BackendShell
        )
    }
}

fn lint_parsed_source(file: &Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let forbidden_modules = layer.forbidden_module_roots();
    let forbidden_crates = layer.forbidden_crate_roots();
    let layer_name = layer.name();

    let mut collector = SourceCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if layer.is_backend() {
            if let Some(root) = internal_module_root(segments) {
                if let Some(forbidden) = forbidden_modules.get(root) {
                    messages.insert(format!(
                        "{layer_name} module must not depend on crate::{forbidden}"
                    ));
                }
            }
        }
        if let Some(root) = external_crate_root(segments, layer) {
            if let Some(forbidden) = forbidden_crates.get(root) {
                messages.insert(format!(
                    "{layer_name} module must not depend on external crate `{forbidden}`"
                ));
            }
        }
    }

    if file != Path::new(ENDPOINT_TABLE) {
        for literal in collector.literals.iter().filter(|value| is_endpoint_path(value)) {
            messages.insert(format!(
                "endpoint path literal \"{literal}\" must come from shared::ApiEndpoints"
            ));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

/// Whether `value` names one of the endpoint roots or a path below one.
#[must_use]
pub fn is_endpoint_path(value: &str) -> bool {
    ENDPOINT_ROOTS.iter().any(|root| {
        value.strip_prefix(*root).is_some_and(|rest| {
            rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')
        })
    })
}

fn is_relative_module_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn internal_module_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    let start_index = match first {
        "crate" | "self" | "super" => segments
            .iter()
            .position(|segment| !is_relative_module_segment(segment.as_str()))?,
        "backend" => 1,
        _ => return None,
    };
    segments.get(start_index).map(String::as_str)
}

fn external_crate_root(segments: &[String], layer: Layer) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative_module_segment(root) || (layer.is_backend() && root == "backend") {
        return None;
    }
    Some(root)
}

#[derive(Default)]
struct SourceCollector {
    paths: BTreeSet<Vec<String>>,
    literals: BTreeSet<String>,
}

impl SourceCollector {
    fn record_path(&mut self, path: &syn::Path) {
        let segments = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect::<Vec<_>>();
        if segments.is_empty() {
            return;
        }
        self.paths.insert(segments);
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                let mut next = prefix;
                next.push(path.ident.to_string());
                self.record_use_tree(&path.tree, next);
            }
            syn::UseTree::Name(name) => {
                let mut segments = prefix;
                segments.push(name.ident.to_string());
                self.paths.insert(segments);
            }
            syn::UseTree::Rename(rename) => {
                let mut segments = prefix;
                segments.push(rename.ident.to_string());
                self.paths.insert(segments);
            }
            syn::UseTree::Glob(_) => {
                let mut segments = prefix;
                segments.push("*".to_owned());
                self.paths.insert(segments);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }

    /// Macro bodies and attribute arguments are opaque to `syn`, so string
    /// literals are dug out of the raw token stream.
    fn record_macro_tokens(&mut self, tokens: TokenStream) {
        for token in tokens {
            match token {
                TokenTree::Group(group) => self.record_macro_tokens(group.stream()),
                TokenTree::Literal(literal) => {
                    if let syn::Lit::Str(text) = syn::Lit::new(literal) {
                        self.literals.insert(text.value());
                    }
                }
                TokenTree::Ident(_) | TokenTree::Punct(_) => {}
            }
        }
    }
}

impl<'ast> Visit<'ast> for SourceCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record_path(node);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }

    fn visit_lit_str(&mut self, node: &'ast syn::LitStr) {
        self.literals.insert(node.value());
    }

    fn visit_macro(&mut self, node: &'ast syn::Macro) {
        self.record_macro_tokens(node.tokens.clone());
        syn::visit::visit_macro(self, node);
    }

    fn visit_meta_list(&mut self, node: &'ast syn::MetaList) {
        self.record_macro_tokens(node.tokens.clone());
        syn::visit::visit_meta_list(self, node);
    }
}

fn collect_sources_under(
    root: &Path,
    current: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(current)?
        .map(|entry| entry.map(|found| found.path()))
        .collect::<Result<_, _>>()?;
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_sources_under(root, &path, sources)?;
            continue;
        }

        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .map_err(|err| ArchitectureLintError::Parse {
                file: path.clone(),
                message: err.to_string(),
            })?
            .to_path_buf();
        let contents = fs::read_to_string(&path)?;
        sources.push(LintSource {
            file: relative,
            contents,
        });
    }
    Ok(())
}
