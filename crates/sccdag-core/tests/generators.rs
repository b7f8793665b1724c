#![allow(dead_code)]
//! Proptest strategies and brute-force oracles shared by the property suites.

use proptest::prelude::*;
use sccdag_core::graph::Graph;

pub type EdgeList = Vec<(usize, usize, f64)>;

/// Small integer weights keep brute-force sums exact.
fn arb_weight(min: i32) -> impl Strategy<Value = f64> {
    (min..10_i32).prop_map(f64::from)
}

/// Any directed graph on 1..=`max_n` vertices, self-loops and parallel
/// edges included.
pub fn arb_graph(max_n: usize) -> impl Strategy<Value = (usize, EdgeList)> {
    (1..=max_n).prop_flat_map(|n| {
        let edges = prop::collection::vec((0..n, 0..n, arb_weight(-5)), 0..=n * 3);
        (Just(n), edges)
    })
}

/// A DAG on 1..=`max_n` vertices: every edge goes from a lower to a higher
/// index. `min_weight` bounds the weights from below.
pub fn arb_dag(max_n: usize, min_weight: i32) -> impl Strategy<Value = (usize, EdgeList)> {
    (2..=max_n).prop_flat_map(move |n| {
        let edges = prop::collection::vec((0..n, 0..n, arb_weight(min_weight)), 0..=n * 2)
            .prop_map(|raw| {
                raw.into_iter()
                    .filter(|&(u, v, _)| u != v)
                    .map(|(u, v, w)| (u.min(v), u.max(v), w))
                    .collect::<EdgeList>()
            });
        (Just(n), edges)
    })
}

pub fn to_graph(n: usize, edges: &EdgeList) -> Graph {
    Graph::from_edges(n, edges.iter().copied()).expect("generated edges are in range")
}

/// `reach[u][v]` is true iff `v` is reachable from `u` (including `u == v`).
pub fn reachability(n: usize, edges: &EdgeList) -> Vec<Vec<bool>> {
    let mut reach = vec![vec![false; n]; n];
    for (v, row) in reach.iter_mut().enumerate() {
        row[v] = true;
    }
    for &(u, v, _) in edges {
        reach[u][v] = true;
    }
    for k in 0..n {
        for i in 0..n {
            if reach[i][k] {
                for j in 0..n {
                    if reach[k][j] {
                        reach[i][j] = true;
                    }
                }
            }
        }
    }
    reach
}

/// Visit every path starting at `start`, calling `visit(vertex, weight)`
/// for each path end (the trivial path included).
fn walk_paths(n: usize, edges: &EdgeList, start: usize, visit: &mut impl FnMut(usize, f64)) {
    let mut stack = vec![(start, 0.0_f64)];
    while let Some((u, total)) = stack.pop() {
        visit(u, total);
        for &(a, b, w) in edges {
            if a == u && b < n {
                stack.push((b, total + w));
            }
        }
    }
}

/// Minimum path weight from `source` to each vertex in a DAG.
pub fn brute_force_shortest(n: usize, edges: &EdgeList, source: usize) -> Vec<f64> {
    let mut best = vec![f64::INFINITY; n];
    walk_paths(n, edges, source, &mut |v, total| {
        if total < best[v] {
            best[v] = total;
        }
    });
    best
}

/// Maximum path weight over all paths that start at a vertex without
/// incoming edges, or `−∞` for an empty graph.
pub fn brute_force_longest(n: usize, edges: &EdgeList) -> f64 {
    let mut has_incoming = vec![false; n];
    for &(_, v, _) in edges {
        has_incoming[v] = true;
    }
    let mut best = f64::NEG_INFINITY;
    for start in (0..n).filter(|&v| !has_incoming[v]) {
        walk_paths(n, edges, start, &mut |_, total| {
            if total > best {
                best = total;
            }
        });
    }
    best
}

/// Weight of `path` using the heaviest parallel edge between consecutive
/// vertices, or `None` if some hop has no edge.
pub fn heaviest_path_weight(edges: &EdgeList, path: &[usize]) -> Option<f64> {
    path.windows(2).try_fold(0.0, |acc, hop| {
        edges
            .iter()
            .filter(|&&(u, v, _)| u == hop[0] && v == hop[1])
            .map(|&(_, _, w)| w)
            .fold(None, |best: Option<f64>, w| Some(best.map_or(w, |b| b.max(w))))
            .map(|w| acc + w)
    })
}
