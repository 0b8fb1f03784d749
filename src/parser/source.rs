//! Tree-sitter front end for JavaScript/TypeScript modules.
//!
//! Turns source text into a [`SourceModule`]: the module's path, its text and
//! the concrete syntax tree every analysis pass walks.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tree_sitter::{Language, Node, Parser, Tree};

/// Errors that can occur while parsing a module.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse file: {path}")]
    Syntax { path: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Language type for file analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
    Jsx,
}

impl SourceLanguage {
    /// Extensions the project loader picks up, in resolution priority order.
    pub const EXTENSIONS: &'static [&'static str] =
        &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::Jsx),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    /// Determine language from a path's extension.
    ///
    /// Declaration files (`.d.ts`) are ambient and never carry analyzable
    /// exports, so they map to `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
            return None;
        }
        Self::from_extension(path.extension()?.to_str()?)
    }

    /// Get tree-sitter language for this source language.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => {
                tree_sitter_javascript::LANGUAGE.into()
            }
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// One parsed module of the project.
#[derive(Debug, Clone)]
pub struct SourceModule {
    path: String,
    language: SourceLanguage,
    source: String,
    tree: Tree,
}

impl SourceModule {
    /// Normalized module path (the module's identity inside a project).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root `program` node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> &str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or_default()
    }

    /// Whether tree-sitter had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// Parser for JavaScript/TypeScript source files.
///
/// Holds one tree-sitter parser per grammar so repeated parses reuse the
/// parser allocations.
pub struct ModuleParser {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl ModuleParser {
    /// Create a new ModuleParser.
    pub fn new() -> ParseResult<Self> {
        Ok(Self {
            js_parser: Self::parser_for(SourceLanguage::JavaScript)?,
            ts_parser: Self::parser_for(SourceLanguage::TypeScript)?,
            tsx_parser: Self::parser_for(SourceLanguage::Tsx)?,
        })
    }

    fn parser_for(language: SourceLanguage) -> ParseResult<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|_| ParseError::LanguageInit)?;
        Ok(parser)
    }

    /// Read and parse a file from disk, keyed under `module_path`.
    pub fn parse_file(&mut self, path: &Path, module_path: &str) -> ParseResult<SourceModule> {
        let content = fs::read_to_string(path)?;
        self.parse_source(module_path, content)
    }

    /// Parse source code directly. The language is taken from the path's
    /// extension.
    pub fn parse_source(
        &mut self,
        module_path: &str,
        source: impl Into<String>,
    ) -> ParseResult<SourceModule> {
        let language = SourceLanguage::from_path(Path::new(module_path))
            .ok_or_else(|| ParseError::UnsupportedFileType(module_path.to_string()))?;
        self.parse_with(module_path, source.into(), language)
    }

    /// Parse source code with an explicit language.
    pub fn parse_with(
        &mut self,
        module_path: &str,
        source: String,
        language: SourceLanguage,
    ) -> ParseResult<SourceModule> {
        let parser = match language {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => &mut self.js_parser,
            SourceLanguage::TypeScript => &mut self.ts_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
        };

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| ParseError::Syntax {
                path: module_path.to_string(),
            })?;

        Ok(SourceModule {
            path: module_path.to_string(),
            language,
            source,
            tree,
        })
    }
}

/// Strip the quotes from a string literal's text.
pub fn unquote(text: &str) -> &str {
    text.trim_start_matches(['"', '\'', '`'])
        .trim_end_matches(['"', '\'', '`'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(SourceLanguage::from_extension("ts"), Some(SourceLanguage::TypeScript));
        assert_eq!(SourceLanguage::from_extension("TSX"), Some(SourceLanguage::Tsx));
        assert_eq!(SourceLanguage::from_extension("mjs"), Some(SourceLanguage::JavaScript));
        assert_eq!(SourceLanguage::from_extension("css"), None);
    }

    #[test]
    fn test_declaration_files_are_skipped() {
        assert_eq!(SourceLanguage::from_path(Path::new("/p/types.d.ts")), None);
        assert_eq!(
            SourceLanguage::from_path(Path::new("/p/types.ts")),
            Some(SourceLanguage::TypeScript)
        );
    }

    #[test]
    fn test_parse_source_builds_tree() {
        let mut parser = ModuleParser::new().unwrap();
        let module = parser
            .parse_source("/project/a.ts", "export const a: number = 1;")
            .unwrap();

        assert_eq!(module.path(), "/project/a.ts");
        assert_eq!(module.language(), SourceLanguage::TypeScript);
        assert_eq!(module.root().kind(), "program");
        assert!(!module.has_errors());
    }

    #[test]
    fn test_unsupported_extension() {
        let mut parser = ModuleParser::new().unwrap();
        let err = parser.parse_source("/project/style.css", "a {}").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFileType(_)));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'./foo'"), "./foo");
        assert_eq!(unquote("\"w\""), "w");
    }
}
