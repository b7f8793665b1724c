pub mod analyze;
pub mod completions;
pub mod generate;
pub mod longest;
pub mod scc;
pub mod shortest;
pub mod topo;

use std::path::Path;

use anyhow::Context;
use sccdag_core::document::GraphDocument;
use sccdag_core::error::{ErrorCode, GraphError};
use sccdag_core::graph::Graph;
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error};

/// A parsed and validated input file.
#[derive(Debug)]
pub struct LoadedGraph {
    pub document: GraphDocument,
    pub graph: Graph,
}

/// Read, parse, and validate the graph document at `path`.
///
/// Failures are rendered to stderr in `output` mode before being returned.
pub fn load_graph(path: &Path, output: OutputMode) -> anyhow::Result<LoadedGraph> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("cannot read {}: {err}", path.display()),
                    "pass the path of an existing graph JSON file",
                    "input_unreadable",
                ),
            )?;
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let document = match GraphDocument::from_json_str(&text) {
        Ok(document) => document,
        Err(err) => {
            let code = ErrorCode::DocumentParseError;
            render_error(
                output,
                &CliError::with_details(
                    format!("{}: {err}", code.message()),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            return Err(err).with_context(|| format!("Failed to parse {}", path.display()));
        }
    };

    let graph = match document.to_graph() {
        Ok(graph) => graph,
        Err(err) => return graph_failure(output, err),
    };

    debug!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );

    Ok(LoadedGraph { document, graph })
}

/// Render `err` and return it as the command's failure.
pub fn graph_failure<T>(output: OutputMode, err: GraphError) -> anyhow::Result<T> {
    render_error(output, &CliError::from(&err))?;
    Err(err.into())
}

/// The source to use: the flag if given, otherwise the document's.
pub fn resolve_source(flag: Option<usize>, document: &GraphDocument) -> Option<usize> {
    flag.or(document.source)
}
