//! `sccdag longest`: critical path over the condensation or the raw graph.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use sccdag_core::error::GraphError;
use sccdag_core::graph::{
    CondensationBuilder, DagPathSolver, LongestPath, strongly_connected_components,
};
use sccdag_core::metrics::StageMetrics;
use serde::Serialize;
use tracing::warn;

use crate::cmd::{graph_failure, load_graph};
use crate::output::{OutputMode, format_distance, format_path, pretty_kv, pretty_section, render};

/// Arguments for `sccdag longest`.
#[derive(Args, Debug)]
pub struct LongestArgs {
    /// Graph document (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Solve on the input graph itself; a cyclic input reports no path.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Serialize)]
struct LongestOutput {
    /// `"condensation"` or `"graph"`.
    solved_on: &'static str,
    resolved: bool,
    cyclic: bool,
    /// `None` when no path exists.
    length: Option<f64>,
    /// Path in the solved graph's vertex ids.
    path: Vec<usize>,
    /// Path expanded to original vertices.
    vertex_path: Vec<usize>,
    metrics: StageMetrics,
}

impl LongestOutput {
    fn from_path(solved_on: &'static str, cyclic: bool, lp: &LongestPath, vertex_path: Vec<usize>) -> Self {
        Self {
            solved_on,
            resolved: lp.is_resolved(),
            cyclic,
            length: Some(lp.length).filter(|l| l.is_finite()),
            path: lp.path.clone(),
            vertex_path,
            metrics: lp.metrics,
        }
    }
}

/// Execute `sccdag longest`.
pub fn run_longest(args: &LongestArgs, output: OutputMode, precision: usize) -> anyhow::Result<()> {
    let loaded = load_graph(&args.file, output)?;

    let payload = if args.raw {
        match DagPathSolver::new(&loaded.graph).longest_path() {
            Ok(lp) => {
                let vertex_path = lp.path.clone();
                LongestOutput::from_path("graph", false, &lp, vertex_path)
            }
            Err(GraphError::CycleDetected) => {
                warn!(file = %args.file.display(), "input is cyclic; no longest path");
                LongestOutput::from_path("graph", true, &LongestPath::unresolved(), Vec::new())
            }
            Err(err) => return graph_failure(output, err),
        }
    } else {
        let scc = strongly_connected_components(&loaded.graph);
        let condensation = match CondensationBuilder::from_scc(&loaded.graph, &scc).build() {
            Ok(condensation) => condensation,
            Err(err) => return graph_failure(output, err),
        };
        let lp = match DagPathSolver::new(&condensation.graph).longest_path() {
            Ok(lp) => lp,
            Err(err) => return graph_failure(output, err),
        };
        let vertex_path = condensation.expand(&lp.path);
        LongestOutput::from_path("condensation", false, &lp, vertex_path)
    };

    render(output, &payload, |p, w| {
        render_longest_human(p, output.is_pretty(), precision, w)
    })
}

fn render_longest_human(
    payload: &LongestOutput,
    pretty: bool,
    precision: usize,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    let length = format_distance(payload.length.unwrap_or(f64::NEG_INFINITY), precision);

    if !pretty {
        writeln!(w, "{length}\t{}", format_path(&payload.vertex_path))?;
        return Ok(());
    }

    pretty_section(w, &format!("Critical path over the {}", payload.solved_on))?;
    if payload.cyclic {
        writeln!(w, "Graph is cyclic; no longest path exists.")?;
    }
    pretty_kv(w, "length", length)?;
    pretty_kv(w, "path", format_path(&payload.path))?;
    if payload.solved_on == "condensation" {
        pretty_kv(w, "vertices", format_path(&payload.vertex_path))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_output_has_no_length() {
        let out = LongestOutput::from_path("graph", true, &LongestPath::unresolved(), Vec::new());
        assert!(!out.resolved);
        assert_eq!(out.length, None);

        let value = serde_json::to_value(&out).expect("json");
        assert!(value["length"].is_null());
        assert_eq!(value["cyclic"], true);
    }

    #[test]
    fn text_for_unresolved_is_negative_infinity() {
        let out = LongestOutput::from_path("graph", true, &LongestPath::unresolved(), Vec::new());
        let mut buf = Vec::new();
        render_longest_human(&out, false, 2, &mut buf).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "-∞\t(none)\n");
    }

    #[test]
    fn pretty_mentions_cycle() {
        let out = LongestOutput::from_path("graph", true, &LongestPath::unresolved(), Vec::new());
        let mut buf = Vec::new();
        render_longest_human(&out, true, 2, &mut buf).expect("render");
        assert!(String::from_utf8(buf).expect("utf8").contains("cyclic"));
    }
}
