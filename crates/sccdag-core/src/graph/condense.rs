//! Contraction of strongly connected components into an acyclic graph.
//!
//! Every original edge `(u, v, w)` is projected to
//! `(comp(u), comp(v), w)`:
//!
//! - `comp(u) == comp(v)`: the edge is internal to a component and dropped.
//! - otherwise the first edge seen for the ordered pair `(comp(u), comp(v))`
//!   is added with its weight; later parallel edges for the same pair are
//!   suppressed.
//!
//! # Parallel edge weights
//!
//! The first-seen weight wins. Whether consumers want the minimum (shortest
//! paths), the maximum (critical paths) or a sum is not settled, so callers
//! needing one of those must pre-aggregate parallel edges before building the
//! original graph. [`Condensation::suppressed_edges`] reports how many edges
//! were discarded so the loss is observable.
//!
//! The result is acyclic by construction: a cycle among components would make
//! them mutually reachable and therefore one component.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::model::Graph;
use crate::graph::scc::SccResult;
use crate::metrics::StageMetrics;

/// The condensation of a graph together with its bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Condensation {
    /// DAG over `k` component vertices.
    pub graph: Graph,
    /// Original vertices of each component, indexed by component.
    pub members: Vec<Vec<usize>>,
    /// Original edges dropped because both endpoints share a component.
    pub intra_component_edges: usize,
    /// Inter-component edges dropped as parallel to an earlier one.
    pub suppressed_edges: usize,
    /// Instrumentation for this build.
    pub metrics: StageMetrics,
}

/// Summary counts, suitable for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CondensationSummary {
    pub vertices: usize,
    pub edges: usize,
    pub intra_component_edges: usize,
    pub suppressed_edges: usize,
}

impl Condensation {
    /// Expand a path over component vertices into the original vertices,
    /// component by component in path order.
    #[must_use]
    pub fn expand(&self, components: &[usize]) -> Vec<usize> {
        components
            .iter()
            .filter_map(|&c| self.members.get(c))
            .flatten()
            .copied()
            .collect()
    }

    /// Vertex and edge counts of the condensation.
    #[must_use]
    pub fn summary(&self) -> CondensationSummary {
        CondensationSummary {
            vertices: self.graph.vertex_count(),
            edges: self.graph.edge_count(),
            intra_component_edges: self.intra_component_edges,
            suppressed_edges: self.suppressed_edges,
        }
    }
}

/// Builds the condensation of a graph from its SCC decomposition.
#[derive(Debug)]
pub struct CondensationBuilder<'a> {
    graph: &'a Graph,
    components: &'a [Vec<usize>],
    vertex_to_component: &'a [usize],
}

impl<'a> CondensationBuilder<'a> {
    /// Prepare a builder over `graph` with the given components and mapping.
    ///
    /// `vertex_to_component` must be total over `graph`'s vertices and
    /// consistent with `components`, as produced by
    /// [`crate::graph::scc::strongly_connected_components`];
    /// [`Self::build`] rejects a map that is not.
    #[must_use]
    pub const fn new(
        graph: &'a Graph,
        components: &'a [Vec<usize>],
        vertex_to_component: &'a [usize],
    ) -> Self {
        Self {
            graph,
            components,
            vertex_to_component,
        }
    }

    /// Prepare a builder from an [`SccResult`].
    #[must_use]
    pub fn from_scc(graph: &'a Graph, scc: &'a SccResult) -> Self {
        Self::new(graph, &scc.components, &scc.vertex_to_component)
    }

    /// Project every original edge and produce the condensation.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidComponentMap`] if the vertex → component
    /// map does not cover every vertex of the graph or names a component
    /// outside `[0, k)`. No partial condensation is returned.
    #[instrument(skip(self), fields(components = self.components.len()))]
    pub fn build(&self) -> Result<Condensation, GraphError> {
        let started = Instant::now();
        let mut metrics = StageMetrics::default();

        let k = self.components.len();
        self.validate_map(k)?;

        let mut graph = Graph::new(k);
        // Ordered pair (cu, cv) encoded as cu * k + cv.
        let mut seen: HashSet<u128> = HashSet::new();
        let mut intra_component_edges = 0;
        let mut suppressed_edges = 0;

        for edge in self.graph.edges() {
            metrics.edge_traversals += 1;
            let cu = self.vertex_to_component[edge.u];
            let cv = self.vertex_to_component[edge.v];

            if cu == cv {
                intra_component_edges += 1;
                continue;
            }

            let key = pair_key(cu, cv, k);
            if !seen.insert(key) {
                suppressed_edges += 1;
                continue;
            }

            graph.add_edge(cu, cv, edge.weight)?;
        }

        metrics.stop(started);
        debug!(
            vertices = k,
            edges = graph.edge_count(),
            intra_component_edges,
            suppressed_edges,
            elapsed_ns = metrics.elapsed_ns,
            "condensation built"
        );

        Ok(Condensation {
            graph,
            members: self.components.to_vec(),
            intra_component_edges,
            suppressed_edges,
            metrics,
        })
    }

    fn validate_map(&self, k: usize) -> Result<(), GraphError> {
        let n = self.graph.vertex_count();
        let invalid = (0..n).find(|&v| self.vertex_to_component.get(v).is_none_or(|&c| c >= k));
        match invalid {
            Some(vertex) => Err(GraphError::InvalidComponentMap {
                vertex,
                component_count: k,
            }),
            None => Ok(()),
        }
    }
}

/// Composite numeric key `cu * k + cv` for the ordered component pair.
const fn pair_key(cu: usize, cv: usize, k: usize) -> u128 {
    (cu as u128) * (k as u128) + (cv as u128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::scc::strongly_connected_components;
    use crate::graph::topo::kahn_order;

    fn condense(n: usize, edges: &[(usize, usize, f64)]) -> (SccResult, Condensation) {
        let g = Graph::from_edges(n, edges.iter().copied()).expect("valid graph");
        let scc = strongly_connected_components(&g);
        let c = CondensationBuilder::from_scc(&g, &scc).build().expect("consistent map");
        (scc, c)
    }

    #[test]
    fn single_scc_condenses_to_one_vertex_without_edges() {
        let (_, c) = condense(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)]);
        assert_eq!(c.graph.vertex_count(), 1);
        assert_eq!(c.graph.edge_count(), 0);
        assert_eq!(c.intra_component_edges, 4);
    }

    #[test]
    fn dag_condensation_keeps_every_edge() {
        let (scc, c) = condense(3, &[(0, 1, 2.0), (1, 2, 3.0)]);
        assert_eq!(c.graph.vertex_count(), 3);
        assert_eq!(c.graph.edge_count(), 2);
        let c0 = scc.vertex_to_component[0];
        let c1 = scc.vertex_to_component[1];
        assert_eq!(c.graph.neighbors(c0)[0].v, c1);
        assert!((c.graph.neighbors(c0)[0].weight - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parallel_inter_component_edges_keep_first_seen_weight() {
        // {0,1} cycle, both members point at 2 with different weights.
        let (scc, c) = condense(3, &[(0, 1, 1.0), (1, 0, 1.0), (1, 2, 7.0), (0, 2, 3.0)]);
        assert_eq!(c.graph.vertex_count(), 2);
        assert_eq!(c.graph.edge_count(), 1);
        assert_eq!(c.suppressed_edges, 1);

        let from = scc.vertex_to_component[0];
        let edge = c.graph.neighbors(from)[0];
        assert_eq!(edge.v, scc.vertex_to_component[2]);
        assert!(
            (edge.weight - 7.0).abs() < f64::EPSILON,
            "first-seen weight wins, not the minimum"
        );
    }

    #[test]
    fn opposite_directions_are_distinct_pairs() {
        // 0 -> 1 and 1 -> 0 would merge; use a middle vertex instead.
        let (_, c) = condense(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]);
        assert_eq!(c.graph.edge_count(), 3);
        assert_eq!(c.suppressed_edges, 0);
    }

    #[test]
    fn condensation_is_acyclic() {
        let (_, c) = condense(
            6,
            &[
                (0, 1, 1.0),
                (1, 0, 1.0),
                (1, 2, 1.0),
                (2, 3, 1.0),
                (3, 2, 1.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (5, 4, 1.0),
                (0, 5, 1.0),
            ],
        );
        assert_eq!(c.graph.vertex_count(), 3);
        assert!(kahn_order(&c.graph).order.is_some());
    }

    #[test]
    fn expand_maps_components_back_to_vertices() {
        let (scc, c) = condense(3, &[(0, 1, 1.0), (1, 0, 1.0), (1, 2, 1.0)]);
        let start = scc.vertex_to_component[0];
        let end = scc.vertex_to_component[2];
        let mut expanded = c.expand(&[start, end]);
        assert_eq!(expanded.pop(), Some(2));
        expanded.sort_unstable();
        assert_eq!(expanded, vec![0, 1]);
    }

    #[test]
    fn summary_reports_counts() {
        let (_, c) = condense(3, &[(0, 1, 1.0), (1, 0, 1.0), (1, 2, 1.0), (0, 2, 1.0)]);
        let summary = c.summary();
        assert_eq!(summary.vertices, 2);
        assert_eq!(summary.edges, 1);
        assert_eq!(summary.intra_component_edges, 2);
        assert_eq!(summary.suppressed_edges, 1);
    }

    #[test]
    fn component_outside_range_is_rejected() {
        let g = Graph::from_edges(3, [(0, 1, 1.0), (1, 2, 1.0)]).expect("valid graph");
        let components = [vec![0], vec![1], vec![2]];
        let result = CondensationBuilder::new(&g, &components, &[0, 1, 5]).build();
        assert_eq!(
            result,
            Err(GraphError::InvalidComponentMap {
                vertex: 2,
                component_count: 3
            })
        );
    }

    #[test]
    fn short_component_map_is_rejected() {
        let g = Graph::from_edges(3, [(0, 1, 1.0), (1, 2, 1.0)]).expect("valid graph");
        let components = [vec![0, 1], vec![2]];
        let result = CondensationBuilder::new(&g, &components, &[0, 0]).build();
        assert_eq!(
            result,
            Err(GraphError::InvalidComponentMap {
                vertex: 2,
                component_count: 2
            })
        );
    }

    #[test]
    fn explicit_map_accounts_for_every_edge() {
        let g = Graph::from_edges(4, [(0, 1, 1.0), (1, 0, 2.0), (1, 2, 3.0), (0, 2, 4.0), (2, 3, 5.0)])
            .expect("valid graph");
        let components = [vec![0, 1], vec![2], vec![3]];
        let c = CondensationBuilder::new(&g, &components, &[0, 0, 1, 2])
            .build()
            .expect("consistent map");
        assert_eq!(
            c.graph.edge_count() + c.intra_component_edges + c.suppressed_edges,
            g.edge_count()
        );
        assert_eq!(c.graph.edge_count(), 2);
        assert_eq!(c.intra_component_edges, 2);
        assert_eq!(c.suppressed_edges, 1);
    }

    #[test]
    fn pair_key_is_unique_per_ordered_pair() {
        let k = 4;
        let mut keys = HashSet::new();
        for a in 0..k {
            for b in 0..k {
                assert!(keys.insert(pair_key(a, b, k)));
            }
        }
    }
}
