use crate::support::{load_snapshot_or_exit, print_json_or_exit};
use serde_json::json;
use surveyor_logic::{ValidationReport, validate_for_publish};

const CHECK_KIND: &str = "surveyor.publish_validation.v1";

fn print_report(report: &ValidationReport) {
    println!(
        "[validate] {} (errors={}, warnings={})",
        if report.valid { "OK" } else { "FAIL" },
        report.errors.len(),
        report.warnings.len()
    );
    for finding in &report.errors {
        println!(
            "  - {} {} ({})",
            finding.field, finding.class, finding.message
        );
    }
    for finding in &report.warnings {
        println!(
            "  - WARN {} {} ({})",
            finding.field, finding.class, finding.message
        );
    }
}

pub fn run(snapshot_path: String, json_output: bool) {
    let snapshot = load_snapshot_or_exit(&snapshot_path);
    let report = validate_for_publish(Some(&snapshot));

    tracing::info!(
        valid = report.valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "publish validation finished"
    );

    if json_output {
        let payload = json!({
            "schema": 1,
            "checkKind": CHECK_KIND,
            "snapshotPath": snapshot_path,
            "result": if report.valid { "accepted" } else { "rejected" },
            "failureClasses": report.failure_classes(),
            "warningClasses": report.warning_classes(),
            "rulesDigest": snapshot.rules_digest(),
            "core": report,
        });
        print_json_or_exit(&payload, "validate");
    } else {
        print_report(&report);
    }

    if !report.valid {
        std::process::exit(1);
    }
}
