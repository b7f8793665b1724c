//! `sccdag shortest`: single-source shortest distances over the condensation.
//!
//! Every vertex inherits the distance of its component.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use sccdag_core::error::GraphError;
use sccdag_core::graph::{PipelineOptions, analyze};
use sccdag_core::metrics::StageMetrics;
use serde::Serialize;

use crate::cmd::{graph_failure, load_graph, resolve_source};
use crate::output::{
    CliError, OutputMode, format_distance, format_path, pretty_kv, pretty_section, render,
    render_error,
};

/// Arguments for `sccdag shortest`.
#[derive(Args, Debug)]
pub struct ShortestArgs {
    /// Graph document (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Source vertex (defaults to the document's `source`).
    #[arg(long)]
    pub source: Option<usize>,

    /// Report the path to this vertex.
    #[arg(long)]
    pub target: Option<usize>,
}

#[derive(Debug, Serialize)]
struct VertexDistance {
    vertex: usize,
    component: usize,
    /// `None` when unreachable.
    distance: Option<f64>,
}

#[derive(Debug, Serialize)]
struct TargetPath {
    vertex: usize,
    distance: Option<f64>,
    component_path: Vec<usize>,
    vertex_path: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct ShortestOutput {
    source: usize,
    source_component: usize,
    reachable: usize,
    distances: Vec<VertexDistance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<TargetPath>,
    metrics: StageMetrics,
}

/// Execute `sccdag shortest`.
pub fn run_shortest(args: &ShortestArgs, output: OutputMode, precision: usize) -> anyhow::Result<()> {
    let loaded = load_graph(&args.file, output)?;
    let Some(source) = resolve_source(args.source, &loaded.document) else {
        render_error(
            output,
            &CliError::with_details(
                "no source vertex given",
                "pass --source N or set \"source\" in the document",
                "source_missing",
            ),
        )?;
        anyhow::bail!("no source vertex given");
    };

    let n = loaded.graph.vertex_count();
    if let Some(target) = args.target.filter(|&t| t >= n) {
        return graph_failure(
            output,
            GraphError::OutOfRange {
                vertex: target,
                vertex_count: n,
            },
        );
    }

    let options = PipelineOptions {
        source: Some(source),
        ..PipelineOptions::default()
    };
    let report = match analyze(&loaded.graph, &options) {
        Ok(report) => report,
        Err(err) => return graph_failure(output, err),
    };
    let Some(paths) = report.shortest else {
        anyhow::bail!("pipeline produced no shortest paths for source {source}");
    };

    let distance_of = |c: usize| Some(paths.paths.distance(c)).filter(|d| d.is_finite());
    let distances: Vec<VertexDistance> = report
        .scc
        .vertex_to_component
        .iter()
        .enumerate()
        .map(|(vertex, &component)| VertexDistance {
            vertex,
            component,
            distance: distance_of(component),
        })
        .collect();

    let target = args.target.map(|vertex| {
        let component = report.scc.vertex_to_component[vertex];
        let component_path = paths.paths.path_to(component);
        let vertex_path = report.condensation.expand(&component_path);
        TargetPath {
            vertex,
            distance: distance_of(component),
            component_path,
            vertex_path,
        }
    });

    let payload = ShortestOutput {
        source,
        source_component: paths.component,
        reachable: distances.iter().filter(|d| d.distance.is_some()).count(),
        distances,
        target,
        metrics: paths.paths.metrics,
    };

    render(output, &payload, |p, w| {
        render_shortest_human(p, output.is_pretty(), precision, w)
    })
}

fn show(distance: Option<f64>, precision: usize) -> String {
    distance.map_or_else(|| "unreachable".to_string(), |d| format_distance(d, precision))
}

fn render_shortest_human(
    payload: &ShortestOutput,
    pretty: bool,
    precision: usize,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if !pretty {
        for d in &payload.distances {
            writeln!(w, "{}\t{}", d.vertex, show(d.distance, precision))?;
        }
        if let Some(t) = &payload.target {
            writeln!(w, "path\t{}", format_path(&t.vertex_path))?;
        }
        return Ok(());
    }

    pretty_section(w, &format!("Shortest paths from vertex {}", payload.source))?;
    pretty_kv(w, "component", payload.source_component.to_string())?;
    pretty_kv(
        w,
        "reachable",
        format!("{}/{}", payload.reachable, payload.distances.len()),
    )?;
    writeln!(w)?;
    for d in &payload.distances {
        writeln!(
            w,
            "  Vertex {} (SCC {}): {}",
            d.vertex,
            d.component,
            show(d.distance, precision)
        )?;
    }
    if let Some(t) = &payload.target {
        writeln!(w)?;
        pretty_kv(w, "target", t.vertex.to_string())?;
        pretty_kv(w, "distance", show(t.distance, precision))?;
        pretty_kv(w, "path", format_path(&t.vertex_path))?;
    }
    Ok(())
}
