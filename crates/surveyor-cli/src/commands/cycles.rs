use crate::support::{load_snapshot_or_exit, print_json_or_exit};
use serde_json::json;
use surveyor_logic::DependencyGraph;

const CHECK_KIND: &str = "surveyor.rule_cycles.v1";

pub fn run(snapshot_path: String, json_output: bool) {
    let snapshot = load_snapshot_or_exit(&snapshot_path);
    let graph = DependencyGraph::from_rules(snapshot.rules());
    let groups = graph.cycle_groups();
    let participants = graph.cycle_participants();

    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        cycles = groups.len(),
        "rule dependency graph analyzed"
    );

    if json_output {
        let payload = json!({
            "schema": 1,
            "checkKind": CHECK_KIND,
            "snapshotPath": snapshot_path,
            "result": if groups.is_empty() { "accepted" } else { "rejected" },
            "nodeCount": graph.node_count(),
            "edgeCount": graph.edge_count(),
            "participants": participants,
            "groups": groups,
        });
        print_json_or_exit(&payload, "cycles");
    } else if groups.is_empty() {
        println!(
            "[cycles] OK (questions={}, edges={})",
            graph.node_count(),
            graph.edge_count()
        );
    } else {
        println!("[cycles] FAIL ({} cycle(s))", groups.len());
        for group in &groups {
            println!("  - {}", group.join(", "));
        }
    }

    if !groups.is_empty() {
        std::process::exit(1);
    }
}
