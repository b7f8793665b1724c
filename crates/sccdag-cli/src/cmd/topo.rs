//! `sccdag topo`: topological order of the condensation, or of the raw graph.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use sccdag_core::graph::{
    CondensationBuilder, TopoAlgorithm, strongly_connected_components, topo_order_with,
};
use sccdag_core::metrics::StageMetrics;
use serde::Serialize;

use crate::cmd::{graph_failure, load_graph};
use crate::output::{OutputMode, format_ids, pretty_kv, pretty_section, render};

/// Ordering algorithm as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    Kahn,
    Dfs,
}

impl From<AlgorithmArg> for TopoAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Kahn => Self::Kahn,
            AlgorithmArg::Dfs => Self::Dfs,
        }
    }
}

/// Arguments for `sccdag topo`.
#[derive(Args, Debug)]
pub struct TopoArgs {
    /// Graph document (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Ordering algorithm (defaults to `[topo] algorithm` from config).
    #[arg(long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Order the input graph itself instead of its condensation.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Serialize)]
struct TopoOutput {
    /// `"condensation"` or `"graph"`.
    ordered: &'static str,
    algorithm: TopoAlgorithm,
    cyclic: bool,
    order: Option<Vec<usize>>,
    /// Original vertices in component order; condensation only.
    #[serde(skip_serializing_if = "Option::is_none")]
    derived_order: Option<Vec<usize>>,
    metrics: StageMetrics,
}

/// Execute `sccdag topo`.
pub fn run_topo(
    args: &TopoArgs,
    output: OutputMode,
    default_algorithm: TopoAlgorithm,
) -> anyhow::Result<()> {
    let loaded = load_graph(&args.file, output)?;
    let algorithm = args.algorithm.map_or(default_algorithm, TopoAlgorithm::from);

    let payload = if args.raw {
        let topo = topo_order_with(&loaded.graph, algorithm);
        TopoOutput {
            ordered: "graph",
            algorithm,
            cyclic: topo.is_cyclic(),
            order: topo.order,
            derived_order: None,
            metrics: topo.metrics,
        }
    } else {
        let scc = strongly_connected_components(&loaded.graph);
        let condensation = match CondensationBuilder::from_scc(&loaded.graph, &scc).build() {
            Ok(condensation) => condensation,
            Err(err) => return graph_failure(output, err),
        };
        let topo = topo_order_with(&condensation.graph, algorithm);
        let derived_order = topo.order.as_deref().map(|order| condensation.expand(order));
        TopoOutput {
            ordered: "condensation",
            algorithm,
            cyclic: topo.is_cyclic(),
            order: topo.order,
            derived_order,
            metrics: topo.metrics,
        }
    };

    render(output, &payload, |p, w| render_topo_human(p, output.is_pretty(), w))
}

fn render_topo_human(payload: &TopoOutput, pretty: bool, w: &mut dyn Write) -> std::io::Result<()> {
    let Some(order) = &payload.order else {
        writeln!(w, "cycle detected: the {} has no topological order", payload.ordered)?;
        return Ok(());
    };

    if !pretty {
        writeln!(w, "{}", format_ids(order))?;
        if let Some(derived) = &payload.derived_order {
            writeln!(w, "{}", format_ids(derived))?;
        }
        return Ok(());
    }

    pretty_section(w, &format!("Topological order of the {}", payload.ordered))?;
    pretty_kv(w, "algorithm", format!("{:?}", payload.algorithm).to_lowercase())?;
    for (step, v) in order.iter().enumerate() {
        writeln!(w, "  Step {}: {v}", step + 1)?;
    }
    if let Some(derived) = &payload.derived_order {
        writeln!(w)?;
        pretty_kv(w, "derived", format_ids(derived))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(order: Option<Vec<usize>>) -> TopoOutput {
        TopoOutput {
            ordered: "graph",
            algorithm: TopoAlgorithm::Kahn,
            cyclic: order.is_none(),
            order,
            derived_order: None,
            metrics: StageMetrics::default(),
        }
    }

    #[test]
    fn algorithm_arg_maps_to_core() {
        assert_eq!(TopoAlgorithm::from(AlgorithmArg::Dfs), TopoAlgorithm::Dfs);
        assert_eq!(TopoAlgorithm::from(AlgorithmArg::Kahn), TopoAlgorithm::Kahn);
    }

    #[test]
    fn cyclic_rendering_reports_signal() {
        let mut out = Vec::new();
        render_topo_human(&payload(None), true, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("cycle detected"));
    }

    #[test]
    fn text_rendering_is_one_line() {
        let mut out = Vec::new();
        render_topo_human(&payload(Some(vec![2, 0, 1])), false, &mut out).expect("render");
        assert_eq!(String::from_utf8(out).expect("utf8"), "2 0 1\n");
    }

    #[test]
    fn json_encodes_missing_order_as_null() {
        let value = serde_json::to_value(payload(None)).expect("json");
        assert!(value["order"].is_null());
        assert_eq!(value["cyclic"], true);
        assert_eq!(value["algorithm"], "kahn");
        assert!(value.get("derived_order").is_none());
    }
}
