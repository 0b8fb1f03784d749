//! Parser module for deadexports.
//!
//! This module turns files on disk into syntax trees and reads the
//! project manifest that defines which files make up the project.
//!
//! # Supported Formats
//!
//! - **TypeScript** (`.ts`, `.mts`, `.cts`, `.tsx`) - tree-sitter-typescript
//! - **JavaScript** (`.js`, `.mjs`, `.cjs`, `.jsx`) - tree-sitter-javascript
//! - **tsconfig.json** - `files`, `include` and `exclude`
//!
//! # Example
//!
//! ```
//! use deadexports::parser::ModuleParser;
//!
//! let mut parser = ModuleParser::new().unwrap();
//! let module = parser.parse_source("/project/foo.ts", "export const x = 1;").unwrap();
//! assert_eq!(module.root().kind(), "program");
//! ```

pub mod source;
pub mod tsconfig;

// Re-export commonly used types for convenience
pub use source::{unquote, ModuleParser, ParseError, ParseResult, SourceLanguage, SourceModule};
pub use tsconfig::{TsConfig, TsConfigError};
