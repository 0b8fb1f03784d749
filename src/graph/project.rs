//! The analyzed project: every parsed module plus the entrypoints.
//!
//! Modules are keyed by a normalized path (forward slashes, `.` and `..`
//! collapsed lexically). Import specifiers are resolved against that key
//! space only, so a project built from in-memory sources resolves exactly
//! like one loaded from disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::ModuleGraph;
use crate::analysis::usage::module_specifiers;
use crate::parser::{tsconfig, ModuleParser, ParseError, SourceLanguage, SourceModule, TsConfigError};

/// Errors that can occur while loading a project.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    TsConfig(#[from] TsConfigError),

    #[error("Invalid glob pattern in tsconfig: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to read project directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for project loading.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Every module in the project, parsed and ready for analysis.
pub struct Project {
    modules: BTreeMap<String, SourceModule>,
    entrypoints: Vec<String>,
    parser: ModuleParser,
}

impl Project {
    /// Create an empty project.
    pub fn new() -> ProjectResult<Self> {
        Ok(Self {
            modules: BTreeMap::new(),
            entrypoints: Vec::new(),
            parser: ModuleParser::new()?,
        })
    }

    /// Build a project from `(path, source)` pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use deadexports::graph::Project;
    ///
    /// let project = Project::from_sources([
    ///     ("/p/a.ts", "export const a = 1;"),
    ///     ("/p/b.ts", "import { a } from './a';"),
    /// ]).unwrap();
    /// assert_eq!(project.resolve_import("/p/b.ts", "./a").as_deref(), Some("/p/a.ts"));
    /// ```
    pub fn from_sources<P, S>(sources: impl IntoIterator<Item = (P, S)>) -> ProjectResult<Self>
    where
        P: AsRef<Path>,
        S: Into<String>,
    {
        let mut project = Self::new()?;
        for (path, source) in sources {
            project.add_source(path, source)?;
        }
        Ok(project)
    }

    /// Parse `source` and add it under `path`, replacing any previous module
    /// with the same normalized path.
    pub fn add_source(
        &mut self,
        path: impl AsRef<Path>,
        source: impl Into<String>,
    ) -> ProjectResult<&SourceModule> {
        let key = normalize_path(path.as_ref());
        let module = self.parser.parse_source(&key, source)?;
        if module.has_errors() {
            warn!("{} contains syntax errors; analysis may be incomplete", key);
        }
        Ok(self.insert(module))
    }

    /// Read and parse a file from disk.
    pub fn add_file(&mut self, path: &Path) -> ProjectResult<&SourceModule> {
        let key = normalize_path(path);
        let module = self.parser.parse_file(path, &key)?;
        if module.has_errors() {
            warn!("{} contains syntax errors; analysis may be incomplete", key);
        }
        Ok(self.insert(module))
    }

    fn insert(&mut self, module: SourceModule) -> &SourceModule {
        let key = module.path().to_string();
        self.modules.insert(key.clone(), module);
        &self.modules[&key]
    }

    /// Declare the project's entrypoints. Paths are normalized.
    pub fn set_entrypoints<P: AsRef<Path>>(&mut self, entrypoints: impl IntoIterator<Item = P>) {
        self.entrypoints = entrypoints
            .into_iter()
            .map(|p| normalize_path(p.as_ref()))
            .collect();
    }

    pub fn entrypoints(&self) -> &[String] {
        &self.entrypoints
    }

    /// Load every module a `tsconfig.json` covers.
    ///
    /// Files listed under `files` become the entrypoints and must parse.
    /// Files picked up through `include` that fail to parse are logged and
    /// skipped.
    pub fn load_tsconfig(tsconfig_path: &Path) -> ProjectResult<Self> {
        let config = tsconfig::parse_file(tsconfig_path)?;
        let root = match tsconfig_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::canonicalize(dir)?,
            _ => std::env::current_dir()?,
        };

        let include = compile_patterns(&config.include_patterns())?;
        let exclude = compile_patterns(&config.exclude_patterns())?;

        let mut project = Self::new()?;

        for file in &config.files {
            project.add_file(&root.join(file))?;
        }
        project.set_entrypoints(config.files.iter().map(|f| root.join(f)));

        if !include.is_empty() {
            project.load_dir(&root, &include, &exclude);
        }

        debug!(
            "Loaded {} modules ({} entrypoints) from {}",
            project.len(),
            project.entrypoints.len(),
            tsconfig_path.display()
        );
        Ok(project)
    }

    fn load_dir(&mut self, root: &Path, include: &[Pattern], exclude: &[Pattern]) {
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_ignored_dir(e))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || SourceLanguage::from_path(path).is_none() {
                continue;
            }

            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");
            if !matches_any(include, &relative) || matches_any(exclude, &relative) {
                continue;
            }
            if self.modules.contains_key(&normalize_path(path)) {
                continue;
            }

            if let Err(e) = self.add_file(path) {
                warn!("Failed to analyze {}: {}", path.display(), e);
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&SourceModule> {
        self.modules.get(path)
    }

    /// All modules, in path order.
    pub fn modules(&self) -> impl Iterator<Item = &SourceModule> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Resolve an import specifier written in module `from` to a module path
    /// in this project.
    ///
    /// Only relative specifiers resolve; package imports and specifiers that
    /// point outside the project yield `None`. Candidates are tried as
    /// written, with a `.js`-style suffix swapped for its TypeScript
    /// counterpart, with each known extension appended, and as a directory
    /// `index` file.
    pub fn resolve_import(&self, from: &str, specifier: &str) -> Option<String> {
        let is_relative = specifier == "."
            || specifier == ".."
            || specifier.starts_with("./")
            || specifier.starts_with("../")
            || specifier.starts_with('/');
        if !is_relative {
            return None;
        }

        let parent = Path::new(from).parent()?;
        let base = normalize_path(&parent.join(specifier));

        candidates(&base).into_iter().find(|c| self.modules.contains_key(c))
    }

    /// Graph of resolved imports (and re-exports) between modules.
    pub fn module_graph(&self) -> ModuleGraph {
        let mut graph = ModuleGraph::with_capacity(self.modules.len(), self.modules.len() * 2);
        for path in self.modules.keys() {
            graph.add_module(path);
        }
        for module in self.modules.values() {
            for specifier in module_specifiers(module) {
                if let Some(target) = self.resolve_import(module.path(), &specifier) {
                    graph.add_edge(module.path(), &target);
                }
            }
        }
        graph
    }

    /// Module paths reachable from the entrypoints, breadth-first.
    pub fn reachable_from_entrypoints(&self) -> Vec<String> {
        self.module_graph()
            .reachable_from(&self.entrypoints)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Resolution candidates for a normalized base path, in priority order.
fn candidates(base: &str) -> Vec<String> {
    let mut out = vec![base.to_string()];

    for (js, ts) in [(".js", ".ts"), (".jsx", ".tsx"), (".mjs", ".mts"), (".cjs", ".cts")] {
        if let Some(stem) = base.strip_suffix(js) {
            out.push(format!("{stem}{ts}"));
        }
    }
    for ext in SourceLanguage::EXTENSIONS {
        out.push(format!("{base}.{ext}"));
    }
    for ext in SourceLanguage::EXTENSIONS {
        out.push(format!("{base}/index.{ext}"));
    }

    out
}

/// Lexically normalize a path into a module key.
pub fn normalize_path(path: &Path) -> String {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    let normalized: PathBuf = parts.iter().collect();
    normalized.to_string_lossy().replace('\\', "/")
}

fn compile_patterns(patterns: &[String]) -> ProjectResult<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(&expand_directory_pattern(p)).map_err(ProjectError::from))
        .collect()
}

/// A pattern naming a directory (`src`) covers everything beneath it.
fn expand_directory_pattern(pattern: &str) -> String {
    let pattern = pattern.trim_start_matches("./").trim_end_matches('/');
    let last = pattern.rsplit('/').next().unwrap_or(pattern);
    if last.contains(['*', '?', '.']) {
        pattern.to_string()
    } else {
        format!("{pattern}/**/*")
    }
}

fn matches_any(patterns: &[Pattern], relative: &str) -> bool {
    let options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    };
    patterns.iter().any(|p| p.matches_with(relative, options))
}

/// Check if a directory should be ignored during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    matches!(
        name.as_ref(),
        "node_modules" | ".git" | "dist" | "build" | ".next" | "coverage" | ".turbo"
    )
}
