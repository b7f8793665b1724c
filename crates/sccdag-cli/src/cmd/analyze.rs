//! `sccdag analyze`: the full SCC → condensation → order → paths report.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use sccdag_core::graph::{
    CondensationSummary, PipelineOptions, PipelineReport, Stage, TopoAlgorithm, analyze,
};
use sccdag_core::metrics::StageMetrics;
use serde::Serialize;

use crate::cmd::topo::AlgorithmArg;
use crate::cmd::{LoadedGraph, graph_failure, load_graph, resolve_source};
use crate::output::{
    OutputMode, format_distance, format_ids, format_path, pretty_kv, pretty_section, render,
};

/// Arguments for `sccdag analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Graph document (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Source vertex for shortest paths (defaults to the document's `source`).
    #[arg(long)]
    pub source: Option<usize>,

    /// Ordering algorithm for the component order.
    #[arg(long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,
}

#[derive(Debug, Serialize)]
struct GraphInfo {
    vertices: usize,
    edges: usize,
    weight_model: String,
    source: Option<usize>,
    content_hash: String,
}

#[derive(Debug, Serialize)]
struct SccSection {
    count: usize,
    components: Vec<Vec<usize>>,
    cyclic_components: Vec<usize>,
    metrics: StageMetrics,
}

#[derive(Debug, Serialize)]
struct CondensationSection {
    #[serde(flatten)]
    summary: CondensationSummary,
    metrics: StageMetrics,
}

#[derive(Debug, Serialize)]
struct TopologySection {
    algorithm: TopoAlgorithm,
    component_order: Vec<usize>,
    derived_order: Vec<usize>,
    metrics: StageMetrics,
}

#[derive(Debug, Serialize)]
struct ExamplePath {
    component: usize,
    component_path: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct ShortestSection {
    source: usize,
    source_component: usize,
    /// Per component; `None` when unreachable.
    distances: Vec<Option<f64>>,
    /// Path to the first reachable component other than the source's.
    example: Option<ExamplePath>,
    metrics: StageMetrics,
}

#[derive(Debug, Serialize)]
struct LongestSection {
    length: Option<f64>,
    component_path: Vec<usize>,
    vertex_path: Vec<usize>,
    metrics: StageMetrics,
}

#[derive(Debug, Serialize)]
struct StageRow {
    stage: Stage,
    #[serde(flatten)]
    metrics: StageMetrics,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    graph: GraphInfo,
    scc: SccSection,
    condensation: CondensationSection,
    topology: TopologySection,
    #[serde(skip_serializing_if = "Option::is_none")]
    shortest: Option<ShortestSection>,
    longest: LongestSection,
    stages: Vec<StageRow>,
}

impl AnalyzeOutput {
    fn build(loaded: &LoadedGraph, report: PipelineReport) -> Self {
        let cyclic_components = report.scc.cyclic_components(&loaded.graph);
        let stages = report
            .stage_metrics()
            .into_iter()
            .map(|(stage, metrics)| StageRow { stage, metrics })
            .collect();

        let shortest = report.shortest.map(|sp| {
            let distances: Vec<Option<f64>> = sp
                .paths
                .distances
                .iter()
                .map(|&d| Some(d).filter(|d| d.is_finite()))
                .collect();
            let example = (0..distances.len())
                .find(|&c| c != sp.component && distances[c].is_some())
                .map(|c| ExamplePath {
                    component: c,
                    component_path: sp.paths.path_to(c),
                });
            ShortestSection {
                source: sp.vertex,
                source_component: sp.component,
                distances,
                example,
                metrics: sp.paths.metrics,
            }
        });

        Self {
            graph: GraphInfo {
                vertices: report.vertex_count,
                edges: report.edge_count,
                weight_model: loaded.document.weight_model.clone(),
                source: shortest.as_ref().map(|s| s.source),
                content_hash: loaded.document.content_hash(),
            },
            scc: SccSection {
                count: report.scc.len(),
                components: report.scc.components,
                cyclic_components,
                metrics: report.scc.metrics,
            },
            condensation: CondensationSection {
                summary: report.condensation.summary(),
                metrics: report.condensation.metrics,
            },
            topology: TopologySection {
                algorithm: report.topo_algorithm,
                component_order: report.component_order,
                derived_order: report.derived_order,
                metrics: report.topo_metrics,
            },
            shortest,
            longest: LongestSection {
                length: Some(report.longest.length).filter(|l| l.is_finite()),
                component_path: report.longest.path,
                vertex_path: report.critical_vertices,
                metrics: report.longest.metrics,
            },
            stages,
        }
    }
}

/// Execute `sccdag analyze`.
pub fn run_analyze(
    args: &AnalyzeArgs,
    output: OutputMode,
    default_algorithm: TopoAlgorithm,
    precision: usize,
) -> anyhow::Result<()> {
    let loaded = load_graph(&args.file, output)?;
    let options = PipelineOptions {
        source: resolve_source(args.source, &loaded.document),
        topo_algorithm: args.algorithm.map_or(default_algorithm, TopoAlgorithm::from),
    };

    let report = match analyze(&loaded.graph, &options) {
        Ok(report) => report,
        Err(err) => return graph_failure(output, err),
    };
    let payload = AnalyzeOutput::build(&loaded, report);

    render(output, &payload, |p, w| {
        if output.is_pretty() {
            render_analyze_pretty(p, precision, w)
        } else {
            render_analyze_text(p, precision, w)
        }
    })
}

fn show(distance: Option<f64>, precision: usize) -> String {
    distance.map_or_else(|| "unreachable".to_string(), |d| format_distance(d, precision))
}

fn render_analyze_text(p: &AnalyzeOutput, precision: usize, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "vertices={} edges={}", p.graph.vertices, p.graph.edges)?;
    writeln!(w, "sccs={} cyclic={}", p.scc.count, p.scc.cyclic_components.len())?;
    writeln!(
        w,
        "condensation vertices={} edges={}",
        p.condensation.summary.vertices, p.condensation.summary.edges
    )?;
    writeln!(w, "order {}", format_ids(&p.topology.derived_order))?;
    if let Some(s) = &p.shortest {
        writeln!(w, "source {} component {}", s.source, s.source_component)?;
    }
    writeln!(
        w,
        "critical {} {}",
        show(p.longest.length, precision),
        format_path(&p.longest.vertex_path)
    )?;
    Ok(())
}

fn render_analyze_pretty(p: &AnalyzeOutput, precision: usize, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Graph")?;
    pretty_kv(w, "vertices", p.graph.vertices.to_string())?;
    pretty_kv(w, "edges", p.graph.edges.to_string())?;
    pretty_kv(w, "weight model", &p.graph.weight_model)?;
    if let Some(source) = p.graph.source {
        pretty_kv(w, "source", source.to_string())?;
    }
    pretty_kv(w, "hash", &p.graph.content_hash)?;

    writeln!(w)?;
    pretty_section(w, &format!("Strongly connected components ({})", p.scc.count))?;
    for (c, members) in p.scc.components.iter().enumerate() {
        writeln!(w, "  SCC {c}: [{}] (size {})", format_ids(members), members.len())?;
    }

    writeln!(w)?;
    pretty_section(w, "Condensation")?;
    pretty_kv(w, "vertices", p.condensation.summary.vertices.to_string())?;
    pretty_kv(w, "edges", p.condensation.summary.edges.to_string())?;
    pretty_kv(w, "intra edges", p.condensation.summary.intra_component_edges.to_string())?;
    pretty_kv(w, "suppressed", p.condensation.summary.suppressed_edges.to_string())?;

    writeln!(w)?;
    pretty_section(w, "Topological order")?;
    for (step, &c) in p.topology.component_order.iter().enumerate() {
        let members = p.scc.components.get(c).map_or(&[][..], Vec::as_slice);
        writeln!(w, "  Step {}: SCC {c} [{}]", step + 1, format_ids(members))?;
    }
    pretty_kv(w, "derived", format_ids(&p.topology.derived_order))?;

    if let Some(s) = &p.shortest {
        writeln!(w)?;
        pretty_section(w, &format!("Shortest paths from SCC {}", s.source_component))?;
        for (c, d) in s.distances.iter().enumerate() {
            writeln!(w, "  SCC {c}: {}", show(*d, precision))?;
        }
        if let Some(example) = &s.example {
            writeln!(
                w,
                "  Path to SCC {}: {}",
                example.component,
                format_path(&example.component_path)
            )?;
        }
    }

    writeln!(w)?;
    pretty_section(w, "Critical path")?;
    pretty_kv(w, "length", show(p.longest.length, precision))?;
    pretty_kv(w, "components", format_path(&p.longest.component_path))?;
    pretty_kv(w, "vertices", format_path(&p.longest.vertex_path))?;

    writeln!(w)?;
    pretty_section(w, "Metrics")?;
    writeln!(
        w,
        "  {:<16} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "stage", "ms", "edges", "visits", "queue", "relax"
    )?;
    for row in &p.stages {
        writeln!(
            w,
            "  {:<16} {:>10.3} {:>10} {:>10} {:>10} {:>10}",
            row.stage.as_str(),
            row.metrics.elapsed_millis(),
            row.metrics.edge_traversals,
            row.metrics.dfs_visits,
            row.metrics.queue_ops,
            row.metrics.relaxations
        )?;
    }

    writeln!(w)?;
    pretty_section(w, "Summary")?;
    pretty_kv(
        w,
        "sccs",
        format!("{} ({} cyclic)", p.scc.count, p.scc.cyclic_components.len()),
    )?;
    pretty_kv(w, "dag edges", p.condensation.summary.edges.to_string())?;
    pretty_kv(w, "critical", show(p.longest.length, precision))?;
    let total_ms: f64 = p.stages.iter().map(|row| row.metrics.elapsed_millis()).sum();
    pretty_kv(w, "total ms", format!("{total_ms:.3}"))?;
    Ok(())
}
