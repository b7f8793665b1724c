//! Seeded graph generator.
//!
//! Three shapes, all with weights drawn uniformly from `[1, 11)`:
//!
//! - [`GraphShape::Dag`]: a chain `i → i+1` plus up to `n / 3` forward
//!   branches `u → v` with `u < v`.
//! - [`GraphShape::Cyclic`]: the chain closed by `n-1 → 0`, then random extra
//!   edges until the density target is met.
//! - [`GraphShape::MultiScc`]: `max(2, n / 4)` blocks, each closed into a
//!   cycle with a few extra internal edges, linked block to block by a single
//!   forward edge.
//!
//! Apart from the mandatory chain and cycle edges no `(u, v)` pair is
//! generated twice, and no self-loops are generated.

use std::collections::HashSet;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sccdag_core::document::{EdgeRecord, GraphDocument};

use crate::rng::DeterministicRng;

const WEIGHT_LOW: f64 = 1.0;
const WEIGHT_HIGH: f64 = 11.0;

/// Structure of a generated graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphShape {
    Dag,
    Cyclic,
    MultiScc,
}

/// Parameters for one generated graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub vertices: usize,
    /// Fraction of the `n·(n-1)` possible edges to aim for, in `[0, 1]`.
    pub density: f64,
    pub shape: GraphShape,
    /// Source vertex recorded in the document.
    pub source: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            vertices: 10,
            density: 0.2,
            shape: GraphShape::Dag,
            source: 0,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// `max(n - 1, floor(density · n · (n - 1)))`, capped at `n · (n - 1)`.
    #[must_use]
    pub fn target_edges(&self) -> usize {
        let n = self.vertices;
        let possible = n.saturating_mul(n.saturating_sub(1));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let by_density = (self.density * possible as f64).floor() as usize;
        n.saturating_sub(1).max(by_density).min(possible)
    }
}

/// Accumulates edges while tracking which `(u, v)` pairs exist.
struct EdgeSink<'a> {
    rng: &'a mut DeterministicRng,
    edges: Vec<EdgeRecord>,
    pairs: HashSet<(usize, usize)>,
}

impl<'a> EdgeSink<'a> {
    fn new(rng: &'a mut DeterministicRng) -> Self {
        Self {
            rng,
            edges: Vec::new(),
            pairs: HashSet::new(),
        }
    }

    fn push(&mut self, u: usize, v: usize) {
        let w = self.rng.next_range(WEIGHT_LOW, WEIGHT_HIGH);
        self.pairs.insert((u, v));
        self.edges.push(EdgeRecord { u, v, w });
    }

    /// Add `u → v` unless it is a self-loop or already present.
    fn push_new(&mut self, u: usize, v: usize) -> bool {
        if u == v || self.pairs.contains(&(u, v)) {
            return false;
        }
        self.push(u, v);
        true
    }
}

/// Generate a graph document from `config`.
///
/// # Errors
///
/// Returns an error if the density is outside `[0, 1]` or the source is not
/// a vertex of a non-empty graph.
pub fn generate_graph(config: &GeneratorConfig) -> Result<GraphDocument> {
    if !(0.0..=1.0).contains(&config.density) {
        bail!("density must be within [0, 1], got {}", config.density);
    }
    let n = config.vertices;
    if n > 0 && config.source >= n {
        bail!("source {} is not a vertex of a {n}-vertex graph", config.source);
    }

    let mut rng = DeterministicRng::new(config.seed);
    let mut sink = EdgeSink::new(&mut rng);

    if n >= 2 {
        match config.shape {
            GraphShape::Dag => dag(&mut sink, n, config.target_edges()),
            GraphShape::Cyclic => cyclic(&mut sink, n, config.target_edges()),
            GraphShape::MultiScc => multi_scc(&mut sink, n),
        }
    }

    debug!(
        vertices = n,
        edges = sink.edges.len(),
        shape = ?config.shape,
        seed = config.seed,
        "graph generated"
    );

    let mut document = GraphDocument::new(n);
    document.edges = sink.edges;
    document.source = (n > 0).then_some(config.source);
    Ok(document)
}

fn chain(sink: &mut EdgeSink<'_>, start: usize, end: usize) {
    for i in start..end.saturating_sub(1) {
        sink.push(i, i + 1);
    }
}

fn dag(sink: &mut EdgeSink<'_>, n: usize, target: usize) {
    chain(sink, 0, n);
    let branches = (n / 3).min(target.saturating_sub(n - 1));
    for _ in 0..branches {
        let u = sink.rng.next_index(n - 1);
        let v = u + 1 + sink.rng.next_index(n - u - 1);
        sink.push_new(u, v);
    }
}

fn cyclic(sink: &mut EdgeSink<'_>, n: usize, target: usize) {
    chain(sink, 0, n);
    sink.push(n - 1, 0);
    while sink.edges.len() < target {
        let u = sink.rng.next_index(n);
        let v = sink.rng.next_index(n);
        sink.push_new(u, v);
    }
}

fn multi_scc(sink: &mut EdgeSink<'_>, n: usize) {
    let blocks = (n / 4).max(2);
    let per_block = n / blocks;
    let bounds = |b: usize| {
        let start = b * per_block;
        let end = if b == blocks - 1 { n } else { start + per_block };
        (start, end)
    };

    for b in 0..blocks {
        let (start, end) = bounds(b);
        let size = end - start;
        chain(sink, start, end);
        if size > 1 {
            sink.push(end - 1, start);
        }
        for _ in 0..size / 2 {
            let u = start + sink.rng.next_index(size);
            let v = start + sink.rng.next_index(size);
            sink.push_new(u, v);
        }
    }

    for b in 0..blocks - 1 {
        let (from_start, from_end) = bounds(b);
        let (to_start, to_end) = bounds(b + 1);
        let u = from_start + sink.rng.next_index(from_end - from_start);
        let v = to_start + sink.rng.next_index(to_end - to_start);
        sink.push(u, v);
    }
}
