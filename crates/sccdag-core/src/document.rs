//! JSON graph document: the ingestion contract between callers and the core.
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 4,
//!   "edges": [{"u": 0, "v": 1, "w": 2.0}],
//!   "source": 0,
//!   "weight_model": "edge"
//! }
//! ```
//!
//! `edges` may be omitted (no edges). `source` is optional and only used by
//! shortest-path queries. `weight_model` is carried through for reporting;
//! only edge weights are interpreted.

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::model::Graph;

/// One `(u, v, w)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: usize,
    pub v: usize,
    pub w: f64,
}

/// A serialised graph plus an optional designated source vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default = "default_directed")]
    pub directed: bool,
    pub n: usize,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
    #[serde(default = "default_weight_model")]
    pub weight_model: String,
}

const fn default_directed() -> bool {
    true
}

fn default_weight_model() -> String {
    "edge".to_string()
}

impl GraphDocument {
    /// An empty directed document over `n` vertices.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            directed: true,
            n,
            edges: Vec::new(),
            source: None,
            weight_model: default_weight_model(),
        }
    }

    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed or mistyped input.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serialise as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialisation fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Validate the document and build its [`Graph`].
    ///
    /// # Errors
    ///
    /// - [`GraphError::UndirectedInput`] when `directed` is false.
    /// - [`GraphError::InvalidWeight`] for a NaN or infinite weight.
    /// - [`GraphError::OutOfRange`] for an endpoint outside `[0, n)`.
    /// - [`GraphError::SourceOutOfRange`] for a source outside `[0, n)`.
    pub fn to_graph(&self) -> Result<Graph, GraphError> {
        if !self.directed {
            return Err(GraphError::UndirectedInput);
        }

        if let Some(index) = self.edges.iter().position(|e| !e.w.is_finite()) {
            return Err(GraphError::InvalidWeight { index });
        }

        if let Some(source) = self.source.filter(|&s| s >= self.n) {
            return Err(GraphError::SourceOutOfRange {
                vertex: source,
                vertex_count: self.n,
            });
        }

        Graph::from_edges(self.n, self.edges.iter().map(|e| (e.u, e.v, e.w)))
    }

    /// BLAKE3 hash of the vertex count and edge list, as `blake3:<hex>`.
    ///
    /// Changes whenever an edge, weight, or edge order changes.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.n as u64).to_le_bytes());
        for e in &self.edges {
            hasher.update(&(e.u as u64).to_le_bytes());
            hasher.update(&(e.v as u64).to_le_bytes());
            hasher.update(&e.w.to_bits().to_le_bytes());
        }
        format!("blake3:{}", hasher.finalize().to_hex())
    }
}
