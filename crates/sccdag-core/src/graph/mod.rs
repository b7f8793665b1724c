//! Directed-graph analysis pipeline.
//!
//! # Overview
//!
//! An arbitrary directed, weighted graph (cycles allowed) is decomposed into
//! strongly connected components, collapsed into its condensation DAG,
//! ordered, and then queried for shortest and longest paths. Every stage
//! returns its output together with a [`StageMetrics`](crate::metrics::StageMetrics)
//! snapshot.
//!
//! ## Pipeline
//!
//! ```text
//! Graph (adjacency lists, cycles allowed)
//!        ↓  scc::strongly_connected_components()
//! SccResult (components + vertex → component map)
//!        ↓  condense::CondensationBuilder::build()
//! Condensation (DAG over components, parallel edges collapsed)
//!        ↓  topo::topo_order_with()
//! component order
//!        ↓  paths::DagPathSolver
//! ShortestPaths (single source) / LongestPath (critical path)
//! ```
//!
//! [`pipeline::analyze`] runs all of the above in one call.
//!
//! ## Typical Usage
//!
//! ```rust
//! use sccdag_core::graph::{Graph, PipelineOptions, analyze};
//!
//! let graph = Graph::from_edges(3, [(0, 1, 1.0), (1, 0, 1.0), (1, 2, 4.0)])?;
//! let report = analyze(&graph, &PipelineOptions::default())?;
//!
//! assert_eq!(report.scc.len(), 2);
//! assert_eq!(report.longest.length, 4.0);
//! # Ok::<(), sccdag_core::error::GraphError>(())
//! ```

pub mod condense;
pub mod model;
pub mod paths;
pub mod pipeline;
pub mod scc;
pub mod topo;

// Re-export primary types at module level for convenience.
pub use condense::{Condensation, CondensationBuilder, CondensationSummary};
pub use model::{Edge, Graph};
pub use paths::{DagPathSolver, LongestPath, ShortestPaths, longest_path, shortest_paths};
pub use pipeline::{PipelineOptions, PipelineReport, SourcePaths, Stage, analyze};
pub use scc::{SccResult, strongly_connected_components};
pub use topo::{
    TopoAlgorithm, TopoOrder, dfs_order, is_topological_order, kahn_order, topo_order,
    topo_order_with,
};
