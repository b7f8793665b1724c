//! End-to-end driver: SCC → condensation → topological order → paths.
//!
//! Each stage consumes the previous stage's output and none re-enters an
//! earlier one. Path queries run on the condensation, so a designated source
//! vertex is first mapped to its component.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::{info, instrument};

use crate::error::GraphError;
use crate::graph::condense::{Condensation, CondensationBuilder};
use crate::graph::model::Graph;
use crate::graph::paths::{DagPathSolver, LongestPath, ShortestPaths};
use crate::graph::scc::{SccResult, strongly_connected_components};
use crate::graph::topo::{TopoAlgorithm, topo_order_with};
use crate::metrics::StageMetrics;

/// Knobs for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Original vertex to measure shortest paths from, if any.
    pub source: Option<usize>,
    /// Algorithm used for the reported component order.
    pub topo_algorithm: TopoAlgorithm,
}

/// Pipeline stage names, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Scc,
    Condensation,
    Topological,
    ShortestPaths,
    LongestPath,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scc => "scc",
            Self::Condensation => "condensation",
            Self::Topological => "topological",
            Self::ShortestPaths => "shortest_paths",
            Self::LongestPath => "longest_path",
        }
    }
}

/// Shortest paths measured over the condensation from a source vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePaths {
    /// The original source vertex.
    pub vertex: usize,
    /// Its component, the source of `paths`.
    pub component: usize,
    pub paths: ShortestPaths,
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub scc: SccResult,
    pub condensation: Condensation,
    /// Algorithm that produced `component_order`.
    pub topo_algorithm: TopoAlgorithm,
    /// Components in topological order.
    pub component_order: Vec<usize>,
    pub topo_metrics: StageMetrics,
    /// Original vertices, component by component in `component_order`.
    pub derived_order: Vec<usize>,
    pub shortest: Option<SourcePaths>,
    /// Critical path over components.
    pub longest: LongestPath,
    /// The critical path expanded to original vertices.
    pub critical_vertices: Vec<usize>,
}

impl PipelineReport {
    /// Metrics of every stage that ran, in execution order.
    #[must_use]
    pub fn stage_metrics(&self) -> Vec<(Stage, StageMetrics)> {
        let mut stages = vec![
            (Stage::Scc, self.scc.metrics),
            (Stage::Condensation, self.condensation.metrics),
            (Stage::Topological, self.topo_metrics),
        ];
        if let Some(shortest) = &self.shortest {
            stages.push((Stage::ShortestPaths, shortest.paths.metrics));
        }
        stages.push((Stage::LongestPath, self.longest.metrics));
        stages
    }
}

/// Run the full pipeline over `graph`.
///
/// # Errors
///
/// - [`GraphError::SourceOutOfRange`] if `options.source` is not a vertex.
/// - [`GraphError::CycleDetected`] if the condensation fails to order, which
///   indicates an inconsistent decomposition.
#[instrument(skip(graph, options), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn analyze(graph: &Graph, options: &PipelineOptions) -> Result<PipelineReport, GraphError> {
    if let Some(source) = options.source.filter(|&s| s >= graph.vertex_count()) {
        return Err(GraphError::SourceOutOfRange {
            vertex: source,
            vertex_count: graph.vertex_count(),
        });
    }

    let scc = strongly_connected_components(graph);
    let condensation = CondensationBuilder::from_scc(graph, &scc).build()?;

    let topo = topo_order_with(&condensation.graph, options.topo_algorithm);
    let topo_metrics = topo.metrics;
    let component_order = topo.into_result()?;
    let derived_order = condensation.expand(&component_order);

    let solver = DagPathSolver::new(&condensation.graph);

    let shortest = match options.source {
        Some(vertex) => {
            let component = scc.vertex_to_component[vertex];
            let paths = solver.shortest_paths(component)?;
            Some(SourcePaths {
                vertex,
                component,
                paths,
            })
        }
        None => None,
    };

    let longest = solver.longest_path()?;
    let critical_vertices = condensation.expand(&longest.path);

    info!(
        components = scc.len(),
        condensed_edges = condensation.graph.edge_count(),
        critical_length = longest.length,
        "pipeline complete"
    );

    Ok(PipelineReport {
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
        scc,
        condensation,
        topo_algorithm: options.topo_algorithm,
        component_order,
        topo_metrics,
        derived_order,
        shortest,
        longest,
        critical_vertices,
    })
}
