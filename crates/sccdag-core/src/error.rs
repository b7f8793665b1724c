use std::fmt;

/// Errors raised while building or analysing a graph.
///
/// Detection happens at the lowest stage able to observe the condition:
/// endpoint validation in [`crate::graph::Graph`], cycle detection in
/// [`crate::graph::topo`]. Higher stages propagate these unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint lies outside `[0, vertex_count)`.
    #[error("vertex {vertex} out of range for graph with {vertex_count} vertices")]
    OutOfRange { vertex: usize, vertex_count: usize },

    /// A topological order was required but the graph contains a cycle.
    #[error("graph contains a cycle; no topological order exists")]
    CycleDetected,

    /// The requested path source is not a vertex of the graph.
    #[error("source vertex {vertex} out of range for graph with {vertex_count} vertices")]
    SourceOutOfRange { vertex: usize, vertex_count: usize },

    /// The input document declared an undirected graph.
    #[error("undirected graphs are not supported")]
    UndirectedInput,

    /// The input document carried a NaN or infinite edge weight.
    #[error("edge #{index} has a non-finite weight")]
    InvalidWeight { index: usize },

    /// A vertex → component map that does not cover `vertex` or assigns it
    /// a component outside `[0, component_count)`.
    #[error("vertex {vertex} has no component among {component_count} components")]
    InvalidComponentMap { vertex: usize, component_count: usize },
}

impl GraphError {
    /// The machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::OutOfRange { .. } => ErrorCode::VertexOutOfRange,
            Self::CycleDetected => ErrorCode::CycleDetected,
            Self::SourceOutOfRange { .. } => ErrorCode::SourceOutOfRange,
            Self::UndirectedInput => ErrorCode::UndirectedInput,
            Self::InvalidWeight { .. } => ErrorCode::InvalidWeight,
            Self::InvalidComponentMap { .. } => ErrorCode::InvalidComponentMap,
        }
    }
}

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    DocumentParseError,
    VertexOutOfRange,
    SourceOutOfRange,
    UndirectedInput,
    InvalidWeight,
    InvalidComponentMap,
    CycleDetected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::DocumentParseError => "E1002",
            Self::VertexOutOfRange => "E2001",
            Self::SourceOutOfRange => "E2002",
            Self::UndirectedInput => "E2003",
            Self::InvalidWeight => "E2004",
            Self::InvalidComponentMap => "E2005",
            Self::CycleDetected => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::DocumentParseError => "Graph document parse error",
            Self::VertexOutOfRange => "Edge endpoint out of range",
            Self::SourceOutOfRange => "Source vertex out of range",
            Self::UndirectedInput => "Undirected graph input",
            Self::InvalidWeight => "Non-finite edge weight",
            Self::InvalidComponentMap => "Inconsistent component map",
            Self::CycleDetected => "Cycle detected",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .sccdag/config.toml and retry."),
            Self::DocumentParseError => {
                Some("Expected {\"directed\": true, \"n\": N, \"edges\": [{\"u\", \"v\", \"w\"}]}.")
            }
            Self::VertexOutOfRange => Some("Every edge endpoint must lie in [0, n)."),
            Self::SourceOutOfRange => Some("Pick a source vertex in [0, n)."),
            Self::UndirectedInput => Some("Set \"directed\": true; only directed graphs are analysed."),
            Self::InvalidWeight => Some("Replace NaN/infinite weights with finite numbers."),
            Self::InvalidComponentMap => {
                Some("Condense with the SCC result computed from the same graph.")
            }
            Self::CycleDetected => Some("Run the analysis on the condensation instead of the raw graph."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
