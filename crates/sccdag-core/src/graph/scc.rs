//! Strongly connected components via low-link propagation (Tarjan).
//!
//! # Algorithm
//!
//! Each vertex gets a discovery index on first visit and a low-link value
//! initialised to that index, and is pushed onto the on-path stack.
//!
//! - Edge to an unvisited neighbor `w`: descend, then on return
//!   `low[v] = min(low[v], low[w])`.
//! - Edge to a visited `w` still on the stack: `low[v] = min(low[v], index[w])`.
//! - Edge to a visited `w` off the stack: `w` belongs to an already-closed
//!   component and is ignored.
//!
//! A vertex whose low-link equals its discovery index is a root; the stack is
//! popped down to and including it, and the popped vertices (root last) form
//! one component.
//!
//! # Traversal
//!
//! The descent is driven by an explicit frame stack of
//! `(vertex, next edge position)` pairs instead of native recursion, so long
//! chains cannot exhaust the call stack. Visitation order is identical to the
//! recursive formulation: start vertices are taken in index order `0..n` and
//! neighbors in insertion order.
//!
//! All scratch state lives in a [`TarjanContext`] owned by one call and
//! dropped when it returns.

#![allow(clippy::module_name_repetitions)]

use std::time::Instant;

use fixedbitset::FixedBitSet;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::model::Graph;
use crate::metrics::StageMetrics;

/// Output of SCC decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SccResult {
    /// Components in discovery order. Members appear in stack-pop order,
    /// so the root of each component is its last member.
    pub components: Vec<Vec<usize>>,
    /// Component index of every vertex. Always consistent with `components`.
    pub vertex_to_component: Vec<usize>,
    /// Instrumentation for this run.
    pub metrics: StageMetrics,
}

impl SccResult {
    /// Number of components `k`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Return `true` for the decomposition of an empty graph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component containing vertex `v`, or `None` if `v` is not a vertex.
    #[must_use]
    pub fn component_of(&self, v: usize) -> Option<usize> {
        self.vertex_to_component.get(v).copied()
    }

    /// Members of component `c`.
    #[must_use]
    pub fn component(&self, c: usize) -> Option<&[usize]> {
        self.components.get(c).map(Vec::as_slice)
    }

    /// Size of the largest component (0 for an empty graph).
    #[must_use]
    pub fn largest_component_size(&self) -> usize {
        self.components.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Indices of components that contain a cycle: more than one member, or
    /// a single member with a self-loop in `graph`.
    #[must_use]
    pub fn cyclic_components(&self, graph: &Graph) -> Vec<usize> {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, members)| match members.as_slice() {
                [only] => graph.has_self_loop(*only),
                _ => true,
            })
            .map(|(c, _)| c)
            .collect()
    }
}

/// Decompose `graph` into strongly connected components.
///
/// Never fails: every finite graph has a well-defined decomposition. Isolated
/// vertices and self-loop vertices become singleton components.
#[must_use]
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn strongly_connected_components(graph: &Graph) -> SccResult {
    let started = Instant::now();
    let mut ctx = TarjanContext::new(graph.vertex_count());

    for start in 0..graph.vertex_count() {
        if ctx.index[start].is_none() {
            ctx.explore(graph, start);
        }
    }

    let TarjanContext {
        components,
        mut metrics,
        ..
    } = ctx;

    let mut vertex_to_component = vec![0; graph.vertex_count()];
    for (c, members) in components.iter().enumerate() {
        for &v in members {
            vertex_to_component[v] = c;
        }
    }

    metrics.stop(started);
    debug!(
        components = components.len(),
        dfs_visits = metrics.dfs_visits,
        edge_traversals = metrics.edge_traversals,
        elapsed_ns = metrics.elapsed_ns,
        "scc decomposition complete"
    );

    SccResult {
        components,
        vertex_to_component,
        metrics,
    }
}

/// One simulated call-stack frame: the vertex being expanded and the
/// position of the next outgoing edge to examine.
#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: usize,
    next_edge: usize,
}

/// Scratch state for one decomposition.
struct TarjanContext {
    index: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: FixedBitSet,
    stack: Vec<usize>,
    frames: Vec<Frame>,
    next_index: usize,
    components: Vec<Vec<usize>>,
    metrics: StageMetrics,
}

impl TarjanContext {
    fn new(n: usize) -> Self {
        Self {
            index: vec![None; n],
            low: vec![0; n],
            on_stack: FixedBitSet::with_capacity(n),
            stack: Vec::new(),
            frames: Vec::new(),
            next_index: 0,
            components: Vec::new(),
            metrics: StageMetrics::default(),
        }
    }

    fn discover(&mut self, v: usize) {
        self.metrics.dfs_visits += 1;
        self.index[v] = Some(self.next_index);
        self.low[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack.insert(v);
        self.frames.push(Frame {
            vertex: v,
            next_edge: 0,
        });
    }

    fn explore(&mut self, graph: &Graph, start: usize) {
        self.discover(start);

        while let Some(top) = self.frames.last_mut() {
            let v = top.vertex;

            if let Some(edge) = graph.neighbors(v).get(top.next_edge) {
                top.next_edge += 1;
                self.metrics.edge_traversals += 1;
                let w = edge.v;

                match self.index[w] {
                    None => self.discover(w),
                    Some(w_index) if self.on_stack.contains(w) => {
                        self.low[v] = self.low[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            // All edges of `v` examined: return from its frame.
            self.frames.pop();
            if Some(self.low[v]) == self.index[v] {
                self.close_component(v);
            }
            if let Some(parent) = self.frames.last() {
                let p = parent.vertex;
                self.low[p] = self.low[p].min(self.low[v]);
            }
        }
    }

    fn close_component(&mut self, root: usize) {
        let mut component = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack.set(w, false);
            component.push(w);
            if w == root {
                break;
            }
        }
        self.components.push(component);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize)]) -> Graph {
        Graph::from_edges(n, edges.iter().map(|&(u, v)| (u, v, 1.0))).expect("valid graph")
    }

    fn sorted(mut members: Vec<usize>) -> Vec<usize> {
        members.sort_unstable();
        members
    }

    #[test]
    fn simple_cycle_is_one_component() {
        let scc = strongly_connected_components(&graph(3, &[(0, 1), (1, 2), (2, 0)]));
        assert_eq!(scc.len(), 1);
        assert_eq!(sorted(scc.components[0].clone()), vec![0, 1, 2]);
        assert_eq!(scc.vertex_to_component, vec![0, 0, 0]);
    }

    #[test]
    fn root_is_popped_last() {
        let scc = strongly_connected_components(&graph(3, &[(0, 1), (1, 2), (2, 0)]));
        assert_eq!(scc.components[0], vec![2, 1, 0]);
    }

    #[test]
    fn dag_has_singleton_components_in_reverse_topological_order() {
        let scc = strongly_connected_components(&graph(4, &[(0, 1), (1, 2), (2, 3)]));
        assert_eq!(scc.components, vec![vec![3], vec![2], vec![1], vec![0]]);
    }

    #[test]
    fn two_cycles_joined_by_bridge() {
        let scc = strongly_connected_components(&graph(4, &[(0, 1), (1, 0), (2, 3), (3, 2), (0, 2)]));
        assert_eq!(scc.len(), 2);
        assert_eq!(scc.component_of(0), scc.component_of(1));
        assert_eq!(scc.component_of(2), scc.component_of(3));
        assert_ne!(scc.component_of(0), scc.component_of(2));
    }

    #[test]
    fn visited_off_stack_neighbor_is_ignored() {
        // 0 -> 1, 2 -> 1, 2 -> 0: vertex 1 closes before 2 is discovered.
        let scc = strongly_connected_components(&graph(3, &[(0, 1), (2, 1), (2, 0)]));
        assert_eq!(scc.len(), 3);
        assert_eq!(scc.components, vec![vec![1], vec![0], vec![2]]);
    }

    #[test]
    fn self_loop_is_singleton_and_cyclic() {
        let g = graph(2, &[(0, 0), (0, 1)]);
        let scc = strongly_connected_components(&g);
        assert_eq!(scc.len(), 2);
        assert_eq!(scc.cyclic_components(&g), vec![scc.vertex_to_component[0]]);
    }

    #[test]
    fn empty_graph_has_no_components() {
        let scc = strongly_connected_components(&Graph::new(0));
        assert!(scc.is_empty());
        assert_eq!(scc.largest_component_size(), 0);
    }

    #[test]
    fn isolated_vertices_are_singletons() {
        let scc = strongly_connected_components(&graph(5, &[(0, 1)]));
        assert_eq!(scc.len(), 5);
        assert_eq!(scc.largest_component_size(), 1);
    }

    #[test]
    fn long_chain_does_not_overflow_the_stack() {
        let n = 200_000;
        let edges: Vec<(usize, usize, f64)> = (0..n - 1).map(|i| (i, i + 1, 1.0)).chain([(n - 1, 0, 1.0)]).collect();
        let g = Graph::from_edges(n, edges).expect("valid graph");
        let scc = strongly_connected_components(&g);
        assert_eq!(scc.len(), 1);
        assert_eq!(scc.largest_component_size(), n);
    }

    #[test]
    fn metrics_count_visits_and_edges() {
        let scc = strongly_connected_components(&graph(3, &[(0, 1), (1, 2), (2, 0)]));
        assert_eq!(scc.metrics.dfs_visits, 3);
        assert_eq!(scc.metrics.edge_traversals, 3);
    }

    #[test]
    fn nested_cycles_collapse_into_one_component() {
        // 0 -> 1 -> 2 -> 1, 2 -> 3 -> 0, plus a tail 3 -> 4.
        let scc = strongly_connected_components(&graph(5, &[(0, 1), (1, 2), (2, 1), (2, 3), (3, 0), (3, 4)]));
        assert_eq!(scc.len(), 2);
        assert_eq!(scc.components[0], vec![4]);
        assert_eq!(sorted(scc.components[1].clone()), vec![0, 1, 2, 3]);
    }
}
