//! Module import graph implementation using petgraph.
//!
//! Nodes are module paths, edges point from an importing module to the
//! module it imports. The graph is used to discover which modules are
//! reachable from the project's entrypoints.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use petgraph::Direction;
use std::collections::HashMap;

/// A directed graph of resolved imports between project modules.
///
/// # Example
///
/// ```rust
/// use deadexports::graph::ModuleGraph;
///
/// let mut graph = ModuleGraph::new();
/// graph.add_module("/p/index.ts");
/// graph.add_module("/p/util.ts");
/// graph.add_edge("/p/index.ts", "/p/util.ts");
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.reachable_from(&["/p/index.ts"]), vec!["/p/index.ts", "/p/util.ts"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    /// The underlying directed graph
    graph: DiGraph<String, ()>,
    /// Maps module paths to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
}

impl ModuleGraph {
    /// Creates a new empty module graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Adds a module to the graph.
    ///
    /// If the module already exists, returns its existing node index.
    pub fn add_module(&mut self, path: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(path) {
            return idx;
        }

        let idx = self.graph.add_node(path.to_string());
        self.node_indices.insert(path.to_string(), idx);
        idx
    }

    /// Adds an import edge from `from` to `to`.
    ///
    /// Returns `false` if either module is missing or the edge already exists.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_indices.get(from), self.node_indices.get(to))
        else {
            return false;
        };

        if self.graph.contains_edge(from_idx, to_idx) {
            return false;
        }
        self.graph.add_edge(from_idx, to_idx, ());
        true
    }

    /// Modules imported by `path`.
    pub fn get_imports(&self, path: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };

        let mut found: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].as_str())
            .collect();
        found.sort_unstable();
        found
    }

    /// Modules reachable from `entrypoints`, in breadth-first order.
    ///
    /// Entrypoints that are not in the graph are ignored. Each module appears
    /// once, at its first discovery.
    pub fn reachable_from<S: AsRef<str>>(&self, entrypoints: &[S]) -> Vec<&str> {
        let mut order = Vec::new();
        let mut seen = vec![false; self.graph.node_count()];

        for entry in entrypoints {
            let Some(&start) = self.node_indices.get(entry.as_ref()) else {
                continue;
            };
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(idx) = bfs.next(&self.graph) {
                if !seen[idx.index()] {
                    seen[idx.index()] = true;
                    order.push(self.graph[idx].as_str());
                }
            }
        }

        order
    }

    /// Returns the number of modules in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of import edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModuleGraph {
        let mut graph = ModuleGraph::new();
        for path in ["/p/a.ts", "/p/b.ts", "/p/c.ts", "/p/d.ts", "/p/orphan.ts"] {
            graph.add_module(path);
        }
        graph.add_edge("/p/a.ts", "/p/b.ts");
        graph.add_edge("/p/a.ts", "/p/c.ts");
        graph.add_edge("/p/c.ts", "/p/d.ts");
        graph.add_edge("/p/d.ts", "/p/a.ts");
        graph
    }

    #[test]
    fn test_add_module_is_idempotent() {
        let mut graph = ModuleGraph::new();
        let first = graph.add_module("/p/a.ts");
        let second = graph.add_module("/p/a.ts");

        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_edge() {
        let mut graph = sample();
        assert_eq!(graph.edge_count(), 4);
        assert!(!graph.add_edge("/p/a.ts", "/p/b.ts"));
        assert!(!graph.add_edge("/p/a.ts", "/p/missing.ts"));
    }

    #[test]
    fn test_imports() {
        let graph = sample();
        assert_eq!(graph.get_imports("/p/a.ts"), vec!["/p/b.ts", "/p/c.ts"]);
        assert_eq!(graph.get_imports("/p/d.ts"), vec!["/p/a.ts"]);
        assert!(graph.get_imports("/p/missing.ts").is_empty());
    }

    #[test]
    fn test_reachable_handles_cycles() {
        let graph = sample();
        let reachable = graph.reachable_from(&["/p/c.ts"]);

        assert_eq!(reachable[0], "/p/c.ts");
        assert_eq!(reachable.len(), 4);
        assert!(!reachable.contains(&"/p/orphan.ts"));
    }

    #[test]
    fn test_reachable_from_multiple_entrypoints() {
        let graph = sample();
        let reachable = graph.reachable_from(&["/p/orphan.ts", "/p/b.ts", "/p/nope.ts"]);
        assert_eq!(reachable, vec!["/p/orphan.ts", "/p/b.ts"]);
    }
}
