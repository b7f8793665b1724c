//! Shortest and longest paths over a DAG by topological relaxation.
//!
//! # Preconditions
//!
//! Both modes require an acyclic graph. The solver orders the graph with
//! [`kahn_order`] first and fails with [`GraphError::CycleDetected`] if no
//! order exists; it never relaxes over an arbitrary vertex enumeration.
//!
//! # Shortest paths (single source)
//!
//! `dist[source] = 0`, every other vertex `+∞`. Vertices are visited in
//! topological order; for each vertex with finite distance every outgoing edge
//! is relaxed with `dist[u] + w < dist[v]`. Unreached vertices keep `+∞`.
//!
//! # Longest path (global)
//!
//! Every vertex without incoming edges starts at `0`, every other vertex at
//! `−∞`. Relaxation maximises instead (`dist[u] + w > dist[v]`). The critical
//! path ends at the vertex with the greatest distance (lowest index on ties)
//! and starts at the first vertex without a parent when walking back.
//!
//! Weights may be negative; nothing here assumes otherwise.

#![allow(clippy::module_name_repetitions)]

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::model::Graph;
use crate::graph::topo::kahn_order;
use crate::metrics::StageMetrics;

/// Single-source shortest distances with parent pointers.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    /// The vertex distances are measured from.
    pub source: usize,
    /// Distance per vertex; `f64::INFINITY` when unreachable.
    pub distances: Vec<f64>,
    /// Predecessor on the best known path; `None` for the source and for
    /// unreachable vertices.
    pub parents: Vec<Option<usize>>,
    /// Instrumentation for this run.
    pub metrics: StageMetrics,
}

impl ShortestPaths {
    /// Distance to `target`, `+∞` if unreachable or not a vertex.
    #[must_use]
    pub fn distance(&self, target: usize) -> f64 {
        self.distances.get(target).copied().unwrap_or(f64::INFINITY)
    }

    /// Return `true` if `target` was reached from the source.
    #[must_use]
    pub fn is_reachable(&self, target: usize) -> bool {
        self.distance(target).is_finite()
    }

    /// Vertices from the source to `target`, inclusive.
    ///
    /// Empty when `target` is unreachable.
    #[must_use]
    pub fn path_to(&self, target: usize) -> Vec<usize> {
        if !self.is_reachable(target) {
            return Vec::new();
        }
        trace_back(&self.parents, target)
    }
}

/// The global longest (critical) path of a DAG.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestPath {
    /// Sum of edge weights along the path; `−∞` when there is no path.
    pub length: f64,
    /// Vertices from start to end, inclusive.
    pub path: Vec<usize>,
    /// First vertex of the path.
    pub source: Option<usize>,
    /// Last vertex of the path.
    pub target: Option<usize>,
    /// Best distance per vertex; `−∞` for vertices never reached.
    #[serde(skip)]
    pub distances: Vec<f64>,
    /// Predecessor per vertex on its best path.
    #[serde(skip)]
    pub parents: Vec<Option<usize>>,
    /// Instrumentation for this run.
    pub metrics: StageMetrics,
}

impl LongestPath {
    /// The `−∞`/empty result reported when no longest path can be computed,
    /// for example when the solver refused a cyclic graph.
    #[must_use]
    pub fn unresolved() -> Self {
        Self {
            length: f64::NEG_INFINITY,
            path: Vec::new(),
            source: None,
            target: None,
            distances: Vec::new(),
            parents: Vec::new(),
            metrics: StageMetrics::default(),
        }
    }

    /// Return `true` if a path was found.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.length.is_finite() && !self.path.is_empty()
    }
}

/// Path solver over a DAG. Each call recomputes from scratch.
#[derive(Debug, Clone, Copy)]
pub struct DagPathSolver<'a> {
    dag: &'a Graph,
}

impl<'a> DagPathSolver<'a> {
    #[must_use]
    pub const fn new(dag: &'a Graph) -> Self {
        Self { dag }
    }

    /// Shortest distances from `source` to every vertex.
    ///
    /// # Errors
    ///
    /// - [`GraphError::SourceOutOfRange`] if `source` is not a vertex.
    /// - [`GraphError::CycleDetected`] if the graph is not a DAG.
    #[instrument(skip(self), fields(vertices = self.dag.vertex_count()))]
    pub fn shortest_paths(&self, source: usize) -> Result<ShortestPaths, GraphError> {
        let started = Instant::now();
        let n = self.dag.vertex_count();
        if source >= n {
            return Err(GraphError::SourceOutOfRange {
                vertex: source,
                vertex_count: n,
            });
        }

        let order = kahn_order(self.dag).into_result()?;

        let mut metrics = StageMetrics::default();
        let mut distances = vec![f64::INFINITY; n];
        let mut parents = vec![None; n];
        distances[source] = 0.0;

        for u in order {
            if distances[u] == f64::INFINITY {
                continue;
            }
            for edge in self.dag.neighbors(u) {
                metrics.edge_traversals += 1;
                let candidate = distances[u] + edge.weight;
                if candidate < distances[edge.v] {
                    metrics.relaxations += 1;
                    distances[edge.v] = candidate;
                    parents[edge.v] = Some(u);
                }
            }
        }

        metrics.stop(started);
        debug!(
            source,
            reachable = distances.iter().filter(|d| d.is_finite()).count(),
            relaxations = metrics.relaxations,
            elapsed_ns = metrics.elapsed_ns,
            "shortest paths computed"
        );

        Ok(ShortestPaths {
            source,
            distances,
            parents,
            metrics,
        })
    }

    /// The longest path over the whole DAG.
    ///
    /// An empty graph yields [`LongestPath::unresolved`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] if the graph is not a DAG.
    #[instrument(skip(self), fields(vertices = self.dag.vertex_count()))]
    pub fn longest_path(&self) -> Result<LongestPath, GraphError> {
        let started = Instant::now();
        let n = self.dag.vertex_count();
        let order = kahn_order(self.dag).into_result()?;

        let mut metrics = StageMetrics::default();
        let mut has_incoming = vec![false; n];
        for u in 0..n {
            for edge in self.dag.neighbors(u) {
                metrics.edge_traversals += 1;
                has_incoming[edge.v] = true;
            }
        }

        let mut distances: Vec<f64> = has_incoming
            .iter()
            .map(|&incoming| if incoming { f64::NEG_INFINITY } else { 0.0 })
            .collect();
        let mut parents = vec![None; n];

        for u in order {
            if distances[u] == f64::NEG_INFINITY {
                continue;
            }
            for edge in self.dag.neighbors(u) {
                metrics.edge_traversals += 1;
                let candidate = distances[u] + edge.weight;
                if candidate > distances[edge.v] {
                    metrics.relaxations += 1;
                    distances[edge.v] = candidate;
                    parents[edge.v] = Some(u);
                }
            }
        }

        let mut length = f64::NEG_INFINITY;
        let mut target = None;
        for (v, &d) in distances.iter().enumerate() {
            if d > length {
                length = d;
                target = Some(v);
            }
        }

        let path = target.map(|t| trace_back(&parents, t)).unwrap_or_default();
        let source = path.first().copied();

        metrics.stop(started);
        debug!(
            length,
            path_len = path.len(),
            relaxations = metrics.relaxations,
            elapsed_ns = metrics.elapsed_ns,
            "longest path computed"
        );

        Ok(LongestPath {
            length,
            path,
            source,
            target,
            distances,
            parents,
            metrics,
        })
    }
}

/// Shortest distances from `source` over `dag`.
///
/// # Errors
///
/// See [`DagPathSolver::shortest_paths`].
pub fn shortest_paths(dag: &Graph, source: usize) -> Result<ShortestPaths, GraphError> {
    DagPathSolver::new(dag).shortest_paths(source)
}

/// Longest path over `dag`.
///
/// # Errors
///
/// See [`DagPathSolver::longest_path`].
pub fn longest_path(dag: &Graph) -> Result<LongestPath, GraphError> {
    DagPathSolver::new(dag).longest_path()
}

/// Follow parent pointers from `target` to a vertex without a parent, then
/// reverse into start-to-end order.
fn trace_back(parents: &[Option<usize>], target: usize) -> Vec<usize> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(prev) = parents.get(current).copied().flatten() {
        path.push(prev);
        current = prev;
        // Parent chains over a DAG are acyclic and at most n long.
        if path.len() > parents.len() {
            break;
        }
    }
    path.reverse();
    path
}
