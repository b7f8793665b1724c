//! `sccdag scc`: strongly connected components of a graph file.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use sccdag_core::graph::{SccResult, strongly_connected_components};
use sccdag_core::metrics::StageMetrics;
use serde::Serialize;

use crate::cmd::load_graph;
use crate::output::{OutputMode, format_ids, pretty_kv, pretty_section, render};

/// Arguments for `sccdag scc`.
#[derive(Args, Debug)]
pub struct SccArgs {
    /// Graph document (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct SccOutput {
    vertex_count: usize,
    component_count: usize,
    largest_component: usize,
    /// Components of size > 1 or carrying a self-loop.
    cyclic_components: Vec<usize>,
    components: Vec<Vec<usize>>,
    vertex_to_component: Vec<usize>,
    metrics: StageMetrics,
}

impl SccOutput {
    fn new(vertex_count: usize, scc: SccResult, cyclic_components: Vec<usize>) -> Self {
        Self {
            vertex_count,
            component_count: scc.len(),
            largest_component: scc.largest_component_size(),
            cyclic_components,
            components: scc.components,
            vertex_to_component: scc.vertex_to_component,
            metrics: scc.metrics,
        }
    }
}

/// Execute `sccdag scc`.
pub fn run_scc(args: &SccArgs, output: OutputMode) -> anyhow::Result<()> {
    let loaded = load_graph(&args.file, output)?;
    let scc = strongly_connected_components(&loaded.graph);
    let cyclic = scc.cyclic_components(&loaded.graph);
    let payload = SccOutput::new(loaded.graph.vertex_count(), scc, cyclic);

    render(output, &payload, |p, w| render_scc_human(p, output.is_pretty(), w))
}

fn render_scc_human(payload: &SccOutput, pretty: bool, w: &mut dyn Write) -> std::io::Result<()> {
    if !pretty {
        writeln!(
            w,
            "components={} largest={} cyclic={}",
            payload.component_count,
            payload.largest_component,
            payload.cyclic_components.len()
        )?;
        for (c, members) in payload.components.iter().enumerate() {
            writeln!(w, "{c}\t{}", format_ids(members))?;
        }
        return Ok(());
    }

    pretty_section(w, &format!("Strongly connected components ({})", payload.component_count))?;
    pretty_kv(w, "vertices", payload.vertex_count.to_string())?;
    pretty_kv(w, "largest", payload.largest_component.to_string())?;
    pretty_kv(w, "cyclic", format_ids(&payload.cyclic_components))?;
    writeln!(w)?;
    for (c, members) in payload.components.iter().enumerate() {
        writeln!(w, "  SCC {c}: [{}] (size {})", format_ids(members), members.len())?;
    }
    writeln!(
        w,
        "\n{} visits, {} edge traversals",
        payload.metrics.dfs_visits, payload.metrics.edge_traversals
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sccdag_core::graph::Graph;

    fn payload() -> SccOutput {
        let g = Graph::from_edges(4, [(0, 1, 1.0), (1, 0, 1.0), (2, 3, 1.0)]).expect("valid");
        let scc = strongly_connected_components(&g);
        let cyclic = scc.cyclic_components(&g);
        SccOutput::new(g.vertex_count(), scc, cyclic)
    }

    #[test]
    fn counts_are_derived_from_result() {
        let p = payload();
        assert_eq!(p.component_count, 3);
        assert_eq!(p.largest_component, 2);
        assert_eq!(p.cyclic_components.len(), 1);
    }

    #[test]
    fn text_rendering_has_one_row_per_component() {
        let mut out = Vec::new();
        render_scc_human(&payload(), false, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.starts_with("components=3 largest=2 cyclic=1"));
        assert_eq!(rendered.lines().count(), 4);
    }

    #[test]
    fn pretty_rendering_lists_components() {
        let mut out = Vec::new();
        render_scc_human(&payload(), true, &mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");
        assert!(rendered.contains("Strongly connected components (3)"));
        assert!(rendered.contains("(size 2)"));
    }
}
