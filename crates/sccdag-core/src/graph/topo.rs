//! Topological ordering and cycle detection.
//!
//! Two variants:
//!
//! - [`kahn_order`]: in-degree driven. Zero in-degree vertices seed a FIFO
//!   queue in index order; each dequeued vertex is appended to the order and
//!   its neighbors' in-degrees decremented, enqueuing those that reach zero.
//!   If fewer than `n` vertices come out, the graph has a cycle.
//! - [`dfs_order`]: reverse post-order of a depth-first traversal with an
//!   on-path marker for cycle detection, driven by an explicit frame stack.
//!
//! Both return `None` for a cyclic graph rather than a partial order. They
//! agree on the partial-order constraints (every edge's source precedes its
//! destination) but not necessarily vertex-for-vertex.

#![allow(clippy::module_name_repetitions)]

use std::collections::VecDeque;
use std::time::Instant;

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::model::Graph;
use crate::metrics::StageMetrics;

/// Which ordering algorithm to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopoAlgorithm {
    #[default]
    Kahn,
    Dfs,
}

/// Result of a topological ordering attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoOrder {
    /// A full order of all `n` vertices, or `None` if the graph is cyclic.
    pub order: Option<Vec<usize>>,
    /// Instrumentation for this run.
    pub metrics: StageMetrics,
}

impl TopoOrder {
    /// Return `true` if a cycle prevented ordering.
    #[must_use]
    pub const fn is_cyclic(&self) -> bool {
        self.order.is_none()
    }

    /// Convert the cycle signal into [`GraphError::CycleDetected`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] when no order exists.
    pub fn into_result(self) -> Result<Vec<usize>, GraphError> {
        self.order.ok_or(GraphError::CycleDetected)
    }
}

/// Kahn ordering of `graph`, or `None` if it contains a cycle.
#[must_use]
pub fn topo_order(graph: &Graph) -> Option<Vec<usize>> {
    kahn_order(graph).order
}

/// Run the selected ordering algorithm.
#[must_use]
pub fn topo_order_with(graph: &Graph, algorithm: TopoAlgorithm) -> TopoOrder {
    match algorithm {
        TopoAlgorithm::Kahn => kahn_order(graph),
        TopoAlgorithm::Dfs => dfs_order(graph),
    }
}

/// In-degree driven (Kahn) topological order.
#[must_use]
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn kahn_order(graph: &Graph) -> TopoOrder {
    let started = Instant::now();
    let mut metrics = StageMetrics::default();
    let n = graph.vertex_count();

    let mut in_degree = vec![0_usize; n];
    for u in 0..n {
        for edge in graph.neighbors(u) {
            metrics.edge_traversals += 1;
            in_degree[edge.v] += 1;
        }
    }

    let mut queue: VecDeque<usize> = VecDeque::new();
    for (v, &deg) in in_degree.iter().enumerate() {
        if deg == 0 {
            queue.push_back(v);
            metrics.queue_ops += 1;
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(u) = queue.pop_front() {
        metrics.queue_ops += 1;
        order.push(u);

        for edge in graph.neighbors(u) {
            metrics.edge_traversals += 1;
            in_degree[edge.v] -= 1;
            if in_degree[edge.v] == 0 {
                queue.push_back(edge.v);
                metrics.queue_ops += 1;
            }
        }
    }

    metrics.stop(started);
    let complete = order.len() == n;
    debug!(
        ordered = order.len(),
        vertices = n,
        cyclic = !complete,
        queue_ops = metrics.queue_ops,
        elapsed_ns = metrics.elapsed_ns,
        "kahn ordering complete"
    );

    TopoOrder {
        order: complete.then_some(order),
        metrics,
    }
}

/// Reverse post-order (DFS) topological order.
#[must_use]
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn dfs_order(graph: &Graph) -> TopoOrder {
    let started = Instant::now();
    let mut metrics = StageMetrics::default();
    let n = graph.vertex_count();

    let mut visited = FixedBitSet::with_capacity(n);
    let mut on_path = FixedBitSet::with_capacity(n);
    let mut finished: Vec<usize> = Vec::with_capacity(n);
    // (vertex, next edge position)
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut cyclic = false;

    'starts: for start in 0..n {
        if visited.contains(start) {
            continue;
        }
        metrics.dfs_visits += 1;
        visited.insert(start);
        on_path.insert(start);
        frames.push((start, 0));

        while let Some(top) = frames.last_mut() {
            let (u, pos) = *top;
            if let Some(edge) = graph.neighbors(u).get(pos) {
                top.1 += 1;
                metrics.edge_traversals += 1;
                let w = edge.v;
                if on_path.contains(w) {
                    cyclic = true;
                    break 'starts;
                }
                if !visited.contains(w) {
                    metrics.dfs_visits += 1;
                    visited.insert(w);
                    on_path.insert(w);
                    frames.push((w, 0));
                }
            } else {
                frames.pop();
                on_path.set(u, false);
                finished.push(u);
            }
        }
    }

    metrics.stop(started);
    debug!(
        vertices = n,
        cyclic,
        dfs_visits = metrics.dfs_visits,
        elapsed_ns = metrics.elapsed_ns,
        "dfs ordering complete"
    );

    let order = (!cyclic).then(|| {
        finished.reverse();
        finished
    });

    TopoOrder { order, metrics }
}

/// Check that `order` is a permutation of `0..n` in which every edge's
/// source precedes its destination.
#[must_use]
pub fn is_topological_order(graph: &Graph, order: &[usize]) -> bool {
    let n = graph.vertex_count();
    if order.len() != n {
        return false;
    }

    let mut position = vec![usize::MAX; n];
    for (pos, &v) in order.iter().enumerate() {
        if v >= n || position[v] != usize::MAX {
            return false;
        }
        position[v] = pos;
    }

    graph.edges().iter().all(|e| position[e.u] < position[e.v])
}
