//! Parser for `tsconfig.json` files.
//!
//! Only the fields that decide which modules belong to the project are read:
//! `files`, `include` and `exclude`. The file is JSONC, so comments and
//! trailing commas are removed before handing it to `serde_json`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Errors that can occur during tsconfig parsing.
#[derive(Debug, thiserror::Error)]
pub enum TsConfigError {
    /// Failed to read the file from disk.
    #[error("Failed to read tsconfig: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse tsconfig JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// The subset of `tsconfig.json` that defines the project's module set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TsConfig {
    /// Explicitly listed files, relative to the tsconfig directory. These are
    /// the project's entrypoints.
    pub files: Vec<String>,

    /// Glob patterns of included files. `None` means everything.
    pub include: Option<Vec<String>>,

    /// Glob patterns of excluded files.
    pub exclude: Option<Vec<String>>,
}

impl TsConfig {
    /// Include patterns, defaulting to `**/*` the way `tsc` does.
    ///
    /// An explicit `files` list without `include` means only those files.
    pub fn include_patterns(&self) -> Vec<String> {
        match &self.include {
            Some(patterns) => patterns.clone(),
            None if !self.files.is_empty() => Vec::new(),
            None => vec!["**/*".to_string()],
        }
    }

    pub fn exclude_patterns(&self) -> Vec<String> {
        self.exclude.clone().unwrap_or_default()
    }
}

/// Parses a tsconfig file from a file path.
pub fn parse_file(path: &Path) -> Result<TsConfig, TsConfigError> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses a tsconfig from a string.
///
/// # Example
///
/// ```
/// use deadexports::parser::tsconfig::parse_str;
///
/// let config = parse_str(r#"{
///     // entrypoints
///     "files": ["src/index.ts",],
/// }"#).unwrap();
/// assert_eq!(config.files, vec!["src/index.ts".to_string()]);
/// ```
pub fn parse_str(content: &str) -> Result<TsConfig, TsConfigError> {
    let json = strip_trailing_commas(&strip_jsonc_comments(content));
    Ok(serde_json::from_str(&json)?)
}

/// Remove `//` and `/* */` comments, leaving string literals untouched.
fn strip_jsonc_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                out.push(ch);
                copy_string_literal(&mut chars, &mut out);
            }
            '/' if chars.peek() == Some(&'/') => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Remove commas that directly precede a closing `}` or `]`.
fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                out.push(ch);
                copy_string_literal(&mut chars, &mut out);
            }
            ',' => {
                let rest: String = chars.clone().skip_while(|c| c.is_whitespace()).take(1).collect();
                if rest != "}" && rest != "]" {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Copy the remainder of a string literal (after its opening quote).
fn copy_string_literal(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else if c == '"' {
            break;
        }
    }
}
