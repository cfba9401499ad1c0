use crate::support::{load_snapshot_or_exit, parse_status_or_exit, print_json_or_exit};
use serde_json::json;
use surveyor_logic::can_transition;
use surveyor_model::SurveyStatus;

const CHECK_KIND: &str = "surveyor.status_transition.v1";

pub fn run(snapshot_path: String, to: String, from: Option<String>, json_output: bool) {
    let snapshot = load_snapshot_or_exit(&snapshot_path);
    let next = parse_status_or_exit(&to);
    let current = match from {
        Some(raw) => parse_status_or_exit(&raw),
        None => snapshot
            .survey()
            .map(|survey| survey.status)
            .unwrap_or(SurveyStatus::Draft),
    };

    let decision = can_transition(current, next, Some(&snapshot));
    if decision.allowed {
        tracing::info!(from = %current, to = %next, reason = ?decision.reason, "transition allowed");
    } else {
        tracing::warn!(from = %current, to = %next, reason = ?decision.reason, "transition denied");
    }

    if json_output {
        let payload = json!({
            "schema": 1,
            "checkKind": CHECK_KIND,
            "snapshotPath": snapshot_path,
            "result": if decision.allowed { "accepted" } else { "rejected" },
            "from": current,
            "to": next,
            "core": decision,
        });
        print_json_or_exit(&payload, "transition");
    } else {
        println!(
            "[transition] {current} -> {next}: {}",
            if decision.allowed { "allowed" } else { "denied" }
        );
        if let Some(reason) = &decision.reason {
            println!("  {reason}");
        }
    }

    if !decision.allowed {
        std::process::exit(1);
    }
}
