//! Immutable weighted adjacency-list graph.
//!
//! Vertices are dense indices in `[0, n)`. Edges are appended during the
//! build phase and never removed; downstream stages build new graphs (for
//! example the condensation) rather than mutating their input.
//!
//! Outgoing edges keep insertion order. DFS- and BFS-based stages visit
//! neighbors in that order, which makes their output deterministic.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;

use crate::error::GraphError;

/// A directed, weighted edge `u → v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    pub weight: f64,
}

impl Edge {
    /// Return `true` if the edge starts and ends on the same vertex.
    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.u == self.v
    }
}

/// Directed multigraph over vertices `0..n`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    vertex_count: usize,
    adjacency: Vec<Vec<Edge>>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Create a graph with `n` vertices and no edges.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            vertex_count: n,
            adjacency: vec![Vec::new(); n],
            edges: Vec::new(),
        }
    }

    /// Build a graph from `(u, v, weight)` triples, in order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] on the first edge with an endpoint
    /// outside `[0, n)`; no partial graph is returned.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut graph = Self::new(n);
        for (u, v, weight) in edges {
            graph.add_edge(u, v, weight)?;
        }
        Ok(graph)
    }

    /// Append the edge `u → v`.
    ///
    /// Parallel edges and self-loops are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if either endpoint is not a vertex.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: f64) -> Result<(), GraphError> {
        for vertex in [u, v] {
            if vertex >= self.vertex_count {
                return Err(GraphError::OutOfRange {
                    vertex,
                    vertex_count: self.vertex_count,
                });
            }
        }

        let edge = Edge { u, v, weight };
        self.adjacency[u].push(edge);
        self.edges.push(edge);
        Ok(())
    }

    /// Number of vertices `n`.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Total number of edges, counting parallel edges separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Return `true` if the graph has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Outgoing edges of `u` in insertion order.
    ///
    /// Returns an empty slice for an index outside the graph.
    #[must_use]
    pub fn neighbors(&self, u: usize) -> &[Edge] {
        self.adjacency.get(u).map_or(&[], Vec::as_slice)
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// A new graph with every edge's endpoints swapped, weights unchanged.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut reversed = Self::new(self.vertex_count);
        for edge in &self.edges {
            let flipped = Edge {
                u: edge.v,
                v: edge.u,
                weight: edge.weight,
            };
            reversed.adjacency[flipped.u].push(flipped);
            reversed.edges.push(flipped);
        }
        reversed
    }

    /// In-degree of every vertex, indexed by vertex.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.vertex_count];
        for edge in &self.edges {
            degrees[edge.v] += 1;
        }
        degrees
    }

    /// Vertices with no incoming edge, ascending.
    #[must_use]
    pub fn sources(&self) -> Vec<usize> {
        self.in_degrees()
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(v, _)| v)
            .collect()
    }

    /// Return `true` if `v` has an edge to itself.
    #[must_use]
    pub fn has_self_loop(&self, v: usize) -> bool {
        self.neighbors(v).iter().any(Edge::is_self_loop)
    }
}
