//! Exported symbol extraction.
//!
//! Walks the top level of a module and lists every named export together with
//! the span a reader (or a fixer) would point at:
//!
//! - `export const a = 1, b = 2;` yields one symbol per declarator, spanning
//!   only `a = 1` / `b = 2`.
//! - `export type`, `export function`, `export class`, `export interface` and
//!   `export enum` yield one symbol spanning the whole statement, `export`
//!   keyword included.
//!
//! Default exports, re-exports (`export {x} from './y'`, `export * from`),
//! export clauses and ambient (`declare`) exports are not extracted.

use serde::Serialize;
use tree_sitter::{Node, Point};

use crate::parser::SourceModule;

/// A 1-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position of byte offset `byte` (at tree-sitter `point`) in `source`.
    ///
    /// Columns count UTF-16 code units, the unit TypeScript tooling and
    /// source maps use.
    fn at(source: &str, byte: usize, point: Point) -> Self {
        let line_start = byte.saturating_sub(point.column);
        let column = source
            .get(line_start..byte)
            .map(|prefix| prefix.encode_utf16().count())
            .unwrap_or(point.column);
        Self {
            line: point.row + 1,
            column: column + 1,
        }
    }
}

/// Half-open source range; `end` is one past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceSpan {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// Span covering exactly `node` of a tree parsed from `source`.
    pub fn of(node: Node<'_>, source: &str) -> Self {
        Self {
            start: SourcePosition::at(source, node.start_byte(), node.start_position()),
            end: SourcePosition::at(source, node.end_byte(), node.end_position()),
        }
    }
}

/// A top-level named export of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExportedSymbol {
    pub name: String,
    #[serde(flatten)]
    pub span: SourceSpan,
}

impl ExportedSymbol {
    pub fn new(name: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// How a declaration statement binds top-level names.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DeclarationShape<'t> {
    /// `const`/`let`/`var` statement holding one or more declarators.
    Variables(Node<'t>),
    /// Function, class, type alias, interface or enum with a single name.
    Named { name: Node<'t> },
    /// Binds nothing this crate tracks (ambient declarations, namespaces, ...).
    Other,
}

impl<'t> DeclarationShape<'t> {
    pub(crate) fn of(declaration: Node<'t>) -> Self {
        match declaration.kind() {
            "lexical_declaration" | "variable_declaration" => Self::Variables(declaration),
            "function_declaration"
            | "generator_function_declaration"
            | "class_declaration"
            | "abstract_class_declaration"
            | "type_alias_declaration"
            | "interface_declaration"
            | "enum_declaration" => match declaration.child_by_field_name("name") {
                Some(name) => Self::Named { name },
                None => Self::Other,
            },
            _ => Self::Other,
        }
    }

    /// Identifier nodes introduced by this declaration, in source order.
    pub(crate) fn binding_nodes(&self) -> Vec<Node<'t>> {
        let mut out = Vec::new();
        match *self {
            Self::Variables(statement) => {
                for declarator in declarators(statement) {
                    if let Some(name) = declarator.child_by_field_name("name") {
                        pattern_bindings(name, &mut out);
                    }
                }
            }
            Self::Named { name } => out.push(name),
            Self::Other => {}
        }
        out
    }
}

/// The `variable_declarator` children of a `const`/`let`/`var` statement.
pub(crate) fn declarators(statement: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = statement.walk();
    let found: Vec<_> = statement
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .collect();
    found
}

/// Collect the identifiers bound by a (possibly destructuring) pattern.
pub(crate) fn pattern_bindings<'t>(pattern: Node<'t>, out: &mut Vec<Node<'t>>) {
    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => out.push(pattern),
        "pair_pattern" => {
            if let Some(value) = pattern.child_by_field_name("value") {
                pattern_bindings(value, out);
            }
        }
        "object_assignment_pattern" | "assignment_pattern" => {
            if let Some(left) = pattern.child_by_field_name("left") {
                pattern_bindings(left, out);
            }
        }
        "object_pattern" | "array_pattern" | "rest_pattern" => {
            let mut cursor = pattern.walk();
            for child in pattern.named_children(&mut cursor) {
                pattern_bindings(child, out);
            }
        }
        _ => {}
    }
}

/// The declaration carried by a named `export` statement, if it is one.
///
/// Returns `None` for re-exports, default exports, export clauses and
/// `export =` assignments.
pub(crate) fn exported_declaration(statement: Node<'_>) -> Option<Node<'_>> {
    if statement.child_by_field_name("source").is_some() {
        return None;
    }
    let mut cursor = statement.walk();
    let is_default = statement
        .children(&mut cursor)
        .any(|child| child.kind() == "default");
    if is_default {
        return None;
    }
    statement.child_by_field_name("declaration")
}

/// Extract the module's named exports in source order.
pub fn extract_exports(module: &SourceModule) -> Vec<ExportedSymbol> {
    let root = module.root();
    let mut symbols = Vec::new();
    let mut cursor = root.walk();

    for statement in root.named_children(&mut cursor) {
        if statement.kind() != "export_statement" {
            continue;
        }
        let Some(declaration) = exported_declaration(statement) else {
            continue;
        };

        match DeclarationShape::of(declaration) {
            DeclarationShape::Variables(list) => {
                for declarator in declarators(list) {
                    let Some(pattern) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    let span = SourceSpan::of(declarator, module.source());
                    let mut names = Vec::new();
                    pattern_bindings(pattern, &mut names);
                    symbols.extend(
                        names
                            .into_iter()
                            .map(|name| ExportedSymbol::new(module.text(name), span)),
                    );
                }
            }
            DeclarationShape::Named { name } => {
                symbols.push(ExportedSymbol::new(
                    module.text(name),
                    SourceSpan::of(statement, module.source()),
                ));
            }
            DeclarationShape::Other => {}
        }
    }

    symbols
}
