//! Usage resolution within a single module.
//!
//! Two questions are answered here:
//!
//! 1. Which of the module's own top-level names (imports and declarations)
//!    are referenced somewhere other than where they are declared.
//! 2. For every namespace import (`import * as ns from './mod'`), which
//!    members of `./mod` the module actually touches through `ns`.
//!
//! The second question is what lets a namespace import count as usage of
//! individual exports instead of "everything".

use std::collections::{BTreeSet, HashSet};

use tree_sitter::{Node, TreeCursor};

use super::symbols::{exported_declaration, pattern_bindings, DeclarationShape};
use crate::parser::{unquote, SourceModule};

/// One name bound by an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportBinding {
    /// `import { original as local } from 'source'`
    Named {
        local: String,
        source: String,
        original: String,
    },
    /// `import * as alias from 'source'`
    Namespace { alias: String, source: String },
    /// `import local from 'source'`
    Default { local: String, source: String },
    /// `import 'source'`
    SideEffect { source: String },
}

impl ImportBinding {
    /// The module specifier as written.
    pub fn source(&self) -> &str {
        match self {
            ImportBinding::Named { source, .. }
            | ImportBinding::Namespace { source, .. }
            | ImportBinding::Default { source, .. }
            | ImportBinding::SideEffect { source } => source,
        }
    }

    /// The name this binding introduces in the importing module.
    pub fn local_name(&self) -> Option<&str> {
        match self {
            ImportBinding::Named { local, .. } | ImportBinding::Default { local, .. } => {
                Some(local)
            }
            ImportBinding::Namespace { alias, .. } => Some(alias),
            ImportBinding::SideEffect { .. } => None,
        }
    }
}

/// Members accessed through one namespace import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceUsage {
    pub alias: String,
    pub source: String,
    /// Distinct member names, in order of first occurrence.
    pub members: Vec<String>,
}

/// Everything a module references, as seen from inside the module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageRecord {
    pub bindings: Vec<ImportBinding>,
    /// Local top-level names referenced outside their own declaration.
    pub referenced: BTreeSet<String>,
    pub namespaces: Vec<NamespaceUsage>,
}

impl UsageRecord {
    pub fn is_referenced(&self, name: &str) -> bool {
        self.referenced.contains(name)
    }
}

/// A single occurrence of a namespace alias, classified by how it is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceAccess {
    /// `ns.member` or `ns?.member`
    Property(String),
    /// `ns['member']`
    StringIndex(String),
    /// `const { a, b: c } = ns` or `({ a } = ns)`; first-level keys only.
    Destructure(Vec<String>),
    /// `ns.Member` in type position.
    QualifiedType(String),
    /// `ns[expr]` with a non-literal index.
    ComputedIndex,
    /// The alias used as a plain value.
    Bare,
}

impl NamespaceAccess {
    /// Classify the identifier `alias` at `node` by looking at its parent.
    pub fn classify(node: Node<'_>, module: &SourceModule) -> Self {
        let Some(parent) = node.parent() else {
            return Self::Bare;
        };
        let is_field = |field: &str| parent.child_by_field_name(field) == Some(node);

        match parent.kind() {
            "member_expression" if is_field("object") => parent
                .child_by_field_name("property")
                .map(|property| Self::Property(module.text(property).to_string()))
                .unwrap_or(Self::Bare),
            "nested_identifier" if is_field("object") => parent
                .child_by_field_name("property")
                .map(|property| Self::QualifiedType(module.text(property).to_string()))
                .unwrap_or(Self::Bare),
            "nested_type_identifier" if is_field("module") => parent
                .child_by_field_name("name")
                .map(|name| Self::QualifiedType(module.text(name).to_string()))
                .unwrap_or(Self::Bare),
            "subscript_expression" if is_field("object") => {
                match parent.child_by_field_name("index") {
                    Some(index) => literal_index(index, module)
                        .map(Self::StringIndex)
                        .unwrap_or(Self::ComputedIndex),
                    None => Self::ComputedIndex,
                }
            }
            "variable_declarator" if is_field("value") => {
                destructured_keys(parent.child_by_field_name("name"), module)
            }
            "assignment_expression" if is_field("right") => {
                destructured_keys(parent.child_by_field_name("left"), module)
            }
            _ => Self::Bare,
        }
    }

    /// Member names this access proves are used.
    pub fn into_members(self) -> Vec<String> {
        match self {
            Self::Property(member) | Self::StringIndex(member) | Self::QualifiedType(member) => {
                vec![member]
            }
            Self::Destructure(members) => members,
            Self::ComputedIndex | Self::Bare => Vec::new(),
        }
    }
}

fn literal_index(index: Node<'_>, module: &SourceModule) -> Option<String> {
    match index.kind() {
        "string" => Some(unquote(module.text(index)).to_string()),
        "template_string" => {
            let mut cursor = index.walk();
            let has_substitution = index
                .named_children(&mut cursor)
                .any(|child| child.kind() == "template_substitution");
            (!has_substitution).then(|| unquote(module.text(index)).to_string())
        }
        _ => None,
    }
}

fn destructured_keys(pattern: Option<Node<'_>>, module: &SourceModule) -> NamespaceAccess {
    let Some(pattern) = pattern.filter(|p| p.kind() == "object_pattern") else {
        return NamespaceAccess::Bare;
    };

    let mut keys = Vec::new();
    let mut cursor = pattern.walk();
    for property in pattern.named_children(&mut cursor) {
        let key = match property.kind() {
            "shorthand_property_identifier_pattern" => Some(property),
            "pair_pattern" => property.child_by_field_name("key"),
            "object_assignment_pattern" => property.child_by_field_name("left"),
            _ => None,
        };
        match key {
            Some(key) if key.kind() == "string" => keys.push(unquote(module.text(key)).to_string()),
            Some(key) if key.kind() != "computed_property_name" => {
                keys.push(module.text(key).to_string())
            }
            _ => {}
        }
    }
    NamespaceAccess::Destructure(keys)
}

/// Import bindings of the module, in source order.
pub fn import_bindings(module: &SourceModule) -> Vec<ImportBinding> {
    let root = module.root();
    let mut bindings = Vec::new();
    let mut cursor = root.walk();

    for statement in root.named_children(&mut cursor) {
        if statement.kind() == "import_statement" {
            parse_import(statement, module, &mut bindings);
        }
    }

    bindings
}

fn parse_import(statement: Node<'_>, module: &SourceModule, bindings: &mut Vec<ImportBinding>) {
    let Some(source) = statement
        .child_by_field_name("source")
        .map(|node| unquote(module.text(node)).to_string())
    else {
        return;
    };

    let mut cursor = statement.walk();
    let Some(clause) = statement
        .named_children(&mut cursor)
        .find(|child| child.kind() == "import_clause")
    else {
        // `import x = require('y')` has no clause either, but it does bind
        // a name; only a bare specifier is a side-effect import.
        if statement.named_child_count() == 1 {
            bindings.push(ImportBinding::SideEffect { source });
        }
        return;
    };

    let mut clause_cursor = clause.walk();
    for child in clause.named_children(&mut clause_cursor) {
        match child.kind() {
            "identifier" => bindings.push(ImportBinding::Default {
                local: module.text(child).to_string(),
                source: source.clone(),
            }),
            "namespace_import" => {
                let mut ns_cursor = child.walk();
                let alias = child
                    .named_children(&mut ns_cursor)
                    .find(|n| n.kind() == "identifier");
                if let Some(alias) = alias {
                    bindings.push(ImportBinding::Namespace {
                        alias: module.text(alias).to_string(),
                        source: source.clone(),
                    });
                }
            }
            "named_imports" => {
                let mut named_cursor = child.walk();
                for specifier in child.named_children(&mut named_cursor) {
                    if specifier.kind() != "import_specifier" {
                        continue;
                    }
                    let Some(name) = specifier.child_by_field_name("name") else {
                        continue;
                    };
                    let original = unquote(module.text(name)).to_string();
                    let local = specifier
                        .child_by_field_name("alias")
                        .map(|alias| module.text(alias).to_string())
                        .unwrap_or_else(|| original.clone());
                    bindings.push(ImportBinding::Named {
                        local,
                        source: source.clone(),
                        original,
                    });
                }
            }
            _ => {}
        }
    }
}

/// Every module specifier the module depends on: imports and re-export
/// sources, deduplicated, in source order.
pub fn module_specifiers(module: &SourceModule) -> Vec<String> {
    let root = module.root();
    let mut specifiers: Vec<String> = Vec::new();
    let mut cursor = root.walk();

    for statement in root.named_children(&mut cursor) {
        if !matches!(statement.kind(), "import_statement" | "export_statement") {
            continue;
        }
        if let Some(source) = statement.child_by_field_name("source") {
            let source = unquote(module.text(source));
            if !specifiers.iter().any(|s| s == source) {
                specifiers.push(source.to_string());
            }
        }
    }

    specifiers
}

/// Specifiers of modules imported purely for their side effects.
pub fn imports_for_side_effects(module: &SourceModule) -> Vec<String> {
    import_bindings(module)
        .into_iter()
        .filter_map(|binding| match binding {
            ImportBinding::SideEffect { source } => Some(source),
            _ => None,
        })
        .collect()
}

/// Track which members are accessed through the namespace import `statement`.
///
/// Returns an empty list when `statement` is not a namespace import.
pub fn track_namespace_uses(module: &SourceModule, statement: Node<'_>) -> Vec<String> {
    let mut bindings = Vec::new();
    parse_import(statement, module, &mut bindings);

    bindings
        .iter()
        .find_map(|binding| match binding {
            ImportBinding::Namespace { alias, .. } => Some(track_alias_uses(module, alias)),
            _ => None,
        })
        .unwrap_or_default()
}

/// Track the members accessed through `alias`, in first-occurrence order.
///
/// Nested scopes that rebind `alias` (a parameter, a local declaration) are
/// not searched.
pub fn track_alias_uses(module: &SourceModule, alias: &str) -> Vec<String> {
    let mut members: Vec<String> = Vec::new();
    let root = module.root();
    let mut cursor = root.walk();

    walk_scoped(
        &mut cursor,
        module,
        &mut Vec::new(),
        &mut |node: Node<'_>, shadowed: &[&str]| {
            if node.kind() == "import_statement" || shadowed.iter().any(|s| *s == alias) {
                return false;
            }
            if node.kind() == "identifier" && module.text(node) == alias {
                for member in NamespaceAccess::classify(node, module).into_members() {
                    if !members.contains(&member) {
                        members.push(member);
                    }
                }
            }
            true
        },
    );

    members
}

/// Identifiers a nested scope binds for its whole subtree: parameters, the
/// name of a named function expression, a `catch` parameter, a `for` head,
/// or declarations made directly inside a block. The program scope binds
/// nothing here.
fn scope_bindings(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    match node.kind() {
        "function_declaration" | "generator_function_declaration" | "method_definition" => {
            parameter_bindings(node, &mut out);
        }
        "function_expression" | "function" | "generator_function" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.push(name);
            }
            parameter_bindings(node, &mut out);
        }
        "arrow_function" => match node.child_by_field_name("parameter") {
            Some(parameter) => pattern_bindings(parameter, &mut out),
            None => parameter_bindings(node, &mut out),
        },
        "catch_clause" => {
            if let Some(parameter) = node.child_by_field_name("parameter") {
                pattern_bindings(parameter, &mut out);
            }
        }
        "for_statement" => {
            if let Some(initializer) = node.child_by_field_name("initializer") {
                out.extend(DeclarationShape::of(initializer).binding_nodes());
            }
        }
        "for_in_statement" if node.child_by_field_name("kind").is_some() => {
            if let Some(left) = node.child_by_field_name("left") {
                pattern_bindings(left, &mut out);
            }
        }
        "statement_block" => {
            let mut cursor = node.walk();
            let statements: Vec<_> = node.named_children(&mut cursor).collect();
            for statement in statements {
                out.extend(DeclarationShape::of(statement).binding_nodes());
            }
        }
        _ => {}
    }
    out
}

fn parameter_bindings<'t>(function: Node<'t>, out: &mut Vec<Node<'t>>) {
    let Some(parameters) = function.child_by_field_name("parameters") else {
        return;
    };
    let mut cursor = parameters.walk();
    let parameters: Vec<_> = parameters.named_children(&mut cursor).collect();
    for parameter in parameters {
        match parameter.kind() {
            "required_parameter" | "optional_parameter" => {
                if let Some(pattern) = parameter.child_by_field_name("pattern") {
                    pattern_bindings(pattern, out);
                }
            }
            _ => pattern_bindings(parameter, out),
        }
    }
}

/// Preorder walk that keeps track of the names nested scopes rebind.
///
/// `visit` receives each node with the names shadowed at that point and
/// returns whether to descend into it.
fn walk_scoped<'m, F>(
    cursor: &mut TreeCursor<'m>,
    module: &'m SourceModule,
    shadowed: &mut Vec<&'m str>,
    visit: &mut F,
) where
    F: FnMut(Node<'m>, &[&'m str]) -> bool,
{
    let node = cursor.node();
    let depth = shadowed.len();
    shadowed.extend(scope_bindings(node).into_iter().map(|name| module.text(name)));

    if visit(node, shadowed.as_slice()) && cursor.goto_first_child() {
        loop {
            walk_scoped(cursor, module, shadowed, visit);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    shadowed.truncate(depth);
}

/// Resolve direct and namespace usage for the module.
pub fn resolve_module_usage(module: &SourceModule) -> UsageRecord {
    let bindings = import_bindings(module);

    let mut declared: HashSet<String> = bindings
        .iter()
        .filter_map(|b| b.local_name().map(str::to_string))
        .collect();
    let mut declaration_sites = HashSet::new();

    let root = module.root();
    let mut cursor = root.walk();
    for statement in root.named_children(&mut cursor) {
        let declaration = match statement.kind() {
            "export_statement" => exported_declaration(statement),
            _ => Some(statement),
        };
        let Some(declaration) = declaration else {
            continue;
        };
        for name in DeclarationShape::of(declaration).binding_nodes() {
            declared.insert(module.text(name).to_string());
            declaration_sites.insert(name.id());
        }
    }

    let mut referenced = BTreeSet::new();
    let mut walker = root.walk();
    walk_scoped(
        &mut walker,
        module,
        &mut Vec::new(),
        &mut |node: Node<'_>, shadowed: &[&str]| {
            match node.kind() {
                "import_statement" => return false,
                "export_statement" if node.child_by_field_name("source").is_some() => {
                    return false
                }
                _ => {}
            }
            if is_reference(node) && !declaration_sites.contains(&node.id()) {
                let text = module.text(node);
                if declared.contains(text) && !shadowed.iter().any(|s| *s == text) {
                    referenced.insert(text.to_string());
                }
            }
            true
        },
    );

    let namespaces = bindings
        .iter()
        .filter_map(|binding| match binding {
            ImportBinding::Namespace { alias, source } => Some(NamespaceUsage {
                alias: alias.clone(),
                source: source.clone(),
                members: track_alias_uses(module, alias),
            }),
            _ => None,
        })
        .collect();

    UsageRecord {
        bindings,
        referenced,
        namespaces,
    }
}

/// Whether `node` names something in scope rather than a property or label.
fn is_reference(node: Node<'_>) -> bool {
    match node.kind() {
        "identifier" | "shorthand_property_identifier" | "shorthand_property_identifier_pattern" => {
            true
        }
        "type_identifier" => !node.parent().is_some_and(|parent| {
            parent.kind() == "nested_type_identifier"
                && parent.child_by_field_name("name") == Some(node)
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ModuleParser;

    fn parse(source: &str) -> SourceModule {
        ModuleParser::new()
            .unwrap()
            .parse_source("/project/test.ts", source)
            .unwrap()
    }

    fn first_import(module: &SourceModule) -> Node<'_> {
        let root = module.root();
        let mut cursor = root.walk();
        let found = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "import_statement")
            .unwrap();
        found
    }

    // ===== Import Binding Tests =====

    #[test]
    fn test_import_bindings() {
        let module = parse(
            r#"
import def, { a, b as c } from './one';
import * as ns from './two';
import './three';
"#,
        );

        assert_eq!(
            import_bindings(&module),
            vec![
                ImportBinding::Default {
                    local: "def".into(),
                    source: "./one".into()
                },
                ImportBinding::Named {
                    local: "a".into(),
                    source: "./one".into(),
                    original: "a".into()
                },
                ImportBinding::Named {
                    local: "c".into(),
                    source: "./one".into(),
                    original: "b".into()
                },
                ImportBinding::Namespace {
                    alias: "ns".into(),
                    source: "./two".into()
                },
                ImportBinding::SideEffect {
                    source: "./three".into()
                },
            ]
        );
    }

    #[test]
    fn test_type_only_import() {
        let module = parse("import type { Shape } from './shapes';");
        assert!(matches!(
            &import_bindings(&module)[..],
            [ImportBinding::Named { original, .. }] if original == "Shape"
        ));
    }

    #[test]
    fn test_side_effect_imports() {
        let module = parse("import './polyfill';\nimport { x } from './x';\n");
        assert_eq!(imports_for_side_effects(&module), vec!["./polyfill"]);

        let none = parse("import * as foo from './foo';\nconst y = foo.y;\n");
        assert!(imports_for_side_effects(&none).is_empty());
    }

    #[test]
    fn test_module_specifiers() {
        let module = parse(
            r#"
import { a } from './a';
import * as b from './b';
import { c } from './a';
export { d } from './d';
export * from './e';
export const local = 1;
"#,
        );
        assert_eq!(module_specifiers(&module), vec!["./a", "./b", "./d", "./e"]);
    }

    // ===== Namespace Tracking Tests =====

    #[test]
    fn test_namespace_access_order() {
        let module = parse(
            r#"
import * as foo from './foo';
import {UseFoo} from './use-foo';

const x = foo.x;
const {y} = foo;
const {z: {a}} = foo;
const w = foo['w'];
type ABC = foo.ABC;
"#,
        );

        let import = first_import(&module);
        assert_eq!(
            track_namespace_uses(&module, import),
            vec!["x", "y", "z", "w", "ABC"]
        );
    }

    #[test]
    fn test_namespace_members_are_deduplicated() {
        let module = parse(
            r#"
import * as ns from './ns';
ns.b();
ns.a();
ns.b();
console.log(ns?.a, ns["c"]);
"#,
        );
        assert_eq!(track_alias_uses(&module, "ns"), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_namespace_unresolvable_access() {
        let module = parse(
            r#"
import * as ns from './ns';
const key = 'a';
const v = ns[key];
register(ns);
"#,
        );
        assert!(track_alias_uses(&module, "ns").is_empty());
    }

    #[test]
    fn test_namespace_alias_shadowed_by_parameter() {
        let module = parse(
            r#"
import * as lib from './lib';
console.log(lib.a);
function f(lib: any) { return lib.b; }
"#,
        );
        assert_eq!(track_alias_uses(&module, "lib"), vec!["a"]);
    }

    #[test]
    fn test_namespace_alias_shadowed_in_nested_scopes() {
        let module = parse(
            r#"
import * as lib from './lib';
const g = (lib) => lib.b;
const h = ({ lib }) => lib.c;
try { run(); } catch (lib) { lib.d; }
{ const lib = other; lib.e; }
for (const lib of items) { lib.f; }
const k = function lib() { return lib.g; };
lib.a;
"#,
        );
        assert_eq!(track_alias_uses(&module, "lib"), vec!["a"]);
    }

    #[test]
    fn test_namespace_alias_visible_in_unrelated_scope() {
        let module = parse(
            r#"
import * as lib from './lib';
function f(other: any) { return lib.a; }
function g(lib: any) { return lib.b; }
"#,
        );
        assert_eq!(track_alias_uses(&module, "lib"), vec!["a"]);
    }

    #[test]
    fn test_namespace_destructuring_forms() {
        let module = parse(
            r#"
import * as ns from './ns';
const { a: renamed, b = 1, 'c': d, ...rest } = ns;
let e;
({ e } = ns);
"#,
        );
        assert_eq!(track_alias_uses(&module, "ns"), vec!["a", "b", "c", "e"]);
    }

    #[test]
    fn test_namespace_type_positions() {
        let module = parse(
            r#"
import * as ns from './ns';
let v: ns.Shape;
type K = typeof ns.value;
function f(p: ns.Param): void {}
"#,
        );
        assert_eq!(
            track_alias_uses(&module, "ns"),
            vec!["Shape", "value", "Param"]
        );
    }

    #[test]
    fn test_track_non_namespace_import() {
        let module = parse("import { x } from './x';\nx();\n");
        let import = first_import(&module);
        assert!(track_namespace_uses(&module, import).is_empty());
    }

    // ===== Direct Usage Tests =====

    #[test]
    fn test_declaration_alone_is_not_usage() {
        let module = parse("export const a = 1;\nexport type T = 'T';\n");
        let usage = resolve_module_usage(&module);
        assert!(usage.referenced.is_empty());
    }

    #[test]
    fn test_self_references() {
        let module = parse(
            r#"
export const a = 1;
export const b = a + 1;
export type T = string;
export function f(x: T) { return x; }
const obj = { b };
"#,
        );
        let usage = resolve_module_usage(&module);

        assert!(usage.is_referenced("a"));
        assert!(usage.is_referenced("b"));
        assert!(usage.is_referenced("T"));
        assert!(!usage.is_referenced("f"));
    }

    #[test]
    fn test_parameter_shadows_export() {
        let module = parse("export const a = 1;\nexport function f(a: number) { return a; }\n");
        let usage = resolve_module_usage(&module);
        assert!(!usage.is_referenced("a"));
    }

    #[test]
    fn test_local_bindings_shadow_exports() {
        let module = parse(
            r#"
export const a = 1;
export const b = 2;
export const c = 3;
export const d = 4;
const g = (a) => a;
function h() { const b = 0; return b; }
try { run(); } catch (c) { log(c); }
function k() { if (ok) { let d = 1; d++; } return d; }
"#,
        );
        let usage = resolve_module_usage(&module);

        assert!(!usage.is_referenced("a"));
        assert!(!usage.is_referenced("b"));
        assert!(!usage.is_referenced("c"));
        assert!(usage.is_referenced("d"));
    }

    #[test]
    fn test_property_names_are_not_references() {
        let module = parse(
            r#"
import * as ns from './ns';
export const x = 1;
type ABC = ns.ABC;
const o = { x: 2 };
const v = o.x;
"#,
        );
        let usage = resolve_module_usage(&module);

        assert!(!usage.is_referenced("x"));
        assert!(!usage.is_referenced("ABC"));
        assert!(usage.is_referenced("ns"));
    }

    #[test]
    fn test_imported_names_are_tracked() {
        let module = parse("import { a, b } from './ab';\nconsole.log(a);\n");
        let usage = resolve_module_usage(&module);

        assert!(usage.is_referenced("a"));
        assert!(!usage.is_referenced("b"));
    }

    #[test]
    fn test_usage_record_namespaces() {
        let module = parse("import * as ns from './ns';\nns.go();\n");
        let usage = resolve_module_usage(&module);

        assert_eq!(
            usage.namespaces,
            vec![NamespaceUsage {
                alias: "ns".into(),
                source: "./ns".into(),
                members: vec!["go".into()],
            }]
        );
    }
}
