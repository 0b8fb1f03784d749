//! Graph module for the analyzed project.
//!
//! [`Project`] owns every parsed module and resolves import specifiers
//! between them; [`ModuleGraph`] models the resolved imports as a directed
//! graph so modules can be visited starting from the entrypoints.
//!
//! # Example
//!
//! ```rust
//! use deadexports::graph::Project;
//!
//! let mut project = Project::from_sources([
//!     ("/p/index.ts", "import { util } from './util';"),
//!     ("/p/util.ts", "export const util = 1;"),
//! ]).unwrap();
//! project.set_entrypoints(["/p/index.ts"]);
//!
//! let graph = project.module_graph();
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod module_graph;
mod project;

pub use module_graph::ModuleGraph;
pub use project::{normalize_path, Project, ProjectError, ProjectResult};
