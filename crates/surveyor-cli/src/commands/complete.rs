use crate::support::{load_answers_or_exit, load_snapshot_or_exit, print_json_or_exit};
use serde_json::json;
use surveyor_logic::check_completion;

const CHECK_KIND: &str = "surveyor.completion.v1";

pub fn run(snapshot_path: String, answers_path: String, json_output: bool) {
    let snapshot = load_snapshot_or_exit(&snapshot_path);
    let answers = load_answers_or_exit(&answers_path);
    let report = check_completion(&snapshot, &answers);

    tracing::info!(
        complete = report.complete,
        missing = report.missing_required.len(),
        "completion checked"
    );

    if json_output {
        let payload = json!({
            "schema": 1,
            "checkKind": CHECK_KIND,
            "snapshotPath": snapshot_path,
            "result": if report.complete { "accepted" } else { "rejected" },
            "core": report,
        });
        print_json_or_exit(&payload, "complete");
    } else {
        println!(
            "[complete] {} (missing={})",
            if report.complete { "OK" } else { "FAIL" },
            report.missing_required.len()
        );
        for missing in &report.missing_required {
            println!(
                "  - {} on {} ({})",
                missing.question_id, missing.page_id, missing.title
            );
        }
    }

    if !report.complete {
        std::process::exit(1);
    }
}
