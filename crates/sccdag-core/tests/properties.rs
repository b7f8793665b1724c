//! Property tests for the SCC → condensation → order → paths pipeline.
//!
//! Brute-force oracles (transitive closure, path enumeration) check the
//! algorithms on small graphs; `petgraph` serves as an independent
//! implementation for component counts and acyclicity.

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::DiGraph;
use proptest::prelude::*;

use sccdag_core::graph::{
    CondensationBuilder, PipelineOptions, TopoAlgorithm, analyze, dfs_order,
    is_topological_order, kahn_order, longest_path, shortest_paths, strongly_connected_components,
};

#[path = "generators.rs"]
mod generators;
use generators::*;

fn petgraph_of(n: usize, edges: &EdgeList) -> DiGraph<(), f64> {
    let mut g = DiGraph::with_capacity(n, edges.len());
    let nodes: Vec<_> = (0..n).map(|_| g.add_node(())).collect();
    for &(u, v, w) in edges {
        g.add_edge(nodes[u], nodes[v], w);
    }
    g
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    // -----------------------------------------------------------------------
    // SCC decomposition
    // -----------------------------------------------------------------------

    #[test]
    fn components_partition_every_vertex((n, edges) in arb_graph(12)) {
        let scc = strongly_connected_components(&to_graph(n, &edges));

        let mut seen = vec![false; n];
        for (c, members) in scc.components.iter().enumerate() {
            prop_assert!(!members.is_empty());
            for &v in members {
                prop_assert!(!seen[v], "vertex {} listed twice", v);
                seen[v] = true;
                prop_assert_eq!(scc.vertex_to_component[v], c);
            }
        }
        prop_assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn shared_component_iff_mutually_reachable((n, edges) in arb_graph(10)) {
        let scc = strongly_connected_components(&to_graph(n, &edges));
        let reach = reachability(n, &edges);

        for u in 0..n {
            for v in 0..n {
                let together = scc.vertex_to_component[u] == scc.vertex_to_component[v];
                prop_assert_eq!(together, reach[u][v] && reach[v][u], "u={} v={}", u, v);
            }
        }
    }

    #[test]
    fn component_count_matches_petgraph((n, edges) in arb_graph(16)) {
        let ours = strongly_connected_components(&to_graph(n, &edges));
        let theirs = tarjan_scc(&petgraph_of(n, &edges));
        prop_assert_eq!(ours.len(), theirs.len());
    }

    // -----------------------------------------------------------------------
    // Condensation and ordering
    // -----------------------------------------------------------------------

    #[test]
    fn condensation_is_always_acyclic((n, edges) in arb_graph(16)) {
        let g = to_graph(n, &edges);
        let scc = strongly_connected_components(&g);
        let condensation = CondensationBuilder::from_scc(&g, &scc).build().expect("consistent map");

        let kahn = kahn_order(&condensation.graph).order;
        prop_assert!(kahn.is_some());
        prop_assert!(is_topological_order(&condensation.graph, &kahn.unwrap_or_default()));

        let dfs = dfs_order(&condensation.graph).order;
        prop_assert!(dfs.is_some());
        prop_assert!(is_topological_order(&condensation.graph, &dfs.unwrap_or_default()));

        prop_assert!(condensation.graph.edges().iter().all(|e| !e.is_self_loop()));
        prop_assert_eq!(
            condensation.graph.edge_count()
                + condensation.intra_component_edges
                + condensation.suppressed_edges,
            edges.len()
        );
    }

    #[test]
    fn cycle_signal_matches_petgraph((n, edges) in arb_graph(10)) {
        let g = to_graph(n, &edges);
        let acyclic = toposort(&petgraph_of(n, &edges), None).is_ok();
        prop_assert_eq!(kahn_order(&g).order.is_some(), acyclic);
        prop_assert_eq!(dfs_order(&g).order.is_some(), acyclic);
    }

    #[test]
    fn derived_order_is_a_permutation((n, edges) in arb_graph(12), dfs in any::<bool>()) {
        let options = PipelineOptions {
            source: None,
            topo_algorithm: if dfs { TopoAlgorithm::Dfs } else { TopoAlgorithm::Kahn },
        };
        let report = analyze(&to_graph(n, &edges), &options).expect("pipeline");
        let mut derived = report.derived_order.clone();
        derived.sort_unstable();
        prop_assert_eq!(derived, (0..n).collect::<Vec<_>>());
    }

    // -----------------------------------------------------------------------
    // Paths
    // -----------------------------------------------------------------------

    #[test]
    fn shortest_distances_match_enumeration((n, edges) in arb_dag(8, -5), pick in any::<prop::sample::Index>()) {
        let source = pick.index(n);
        let sp = shortest_paths(&to_graph(n, &edges), source).expect("dag");
        let expected = brute_force_shortest(n, &edges, source);

        prop_assert_eq!(sp.distance(source), 0.0);
        for v in 0..n {
            prop_assert_eq!(sp.distance(v), expected[v], "vertex {}", v);
        }
    }

    #[test]
    fn shortest_distances_never_decrease_along_parents((n, edges) in arb_dag(12, 0), pick in any::<prop::sample::Index>()) {
        let source = pick.index(n);
        let sp = shortest_paths(&to_graph(n, &edges), source).expect("dag");

        prop_assert_eq!(sp.distance(source), 0.0);
        for v in 0..n {
            if let Some(parent) = sp.parents[v] {
                prop_assert!(sp.distance(parent) <= sp.distance(v));
            }
            let path = sp.path_to(v);
            if sp.is_reachable(v) {
                prop_assert_eq!(path.first(), Some(&source));
                prop_assert_eq!(path.last(), Some(&v));
            } else {
                prop_assert!(path.is_empty());
            }
        }
        for &(u, v, w) in &edges {
            if sp.is_reachable(u) {
                prop_assert!(sp.distance(v) <= sp.distance(u) + w);
            }
        }
    }

    #[test]
    fn longest_length_matches_enumeration((n, edges) in arb_dag(8, -5)) {
        let lp = longest_path(&to_graph(n, &edges)).expect("dag");
        prop_assert_eq!(lp.length, brute_force_longest(n, &edges));

        let walked = heaviest_path_weight(&edges, &lp.path);
        prop_assert_eq!(walked, Some(lp.length));
        prop_assert_eq!(lp.path.first().copied(), lp.source);
        prop_assert_eq!(lp.path.last().copied(), lp.target);
    }
}
