use serde_json::Value;
use std::fs;
use std::path::Path;
use surveyor_model::{AnswerSnapshot, SurveySnapshot, SurveyStatus};

pub fn load_snapshot_or_exit(path: &str) -> SurveySnapshot {
    let path = Path::new(path);
    if !path.exists() {
        eprintln!("error: snapshot file not found: {}", path.display());
        std::process::exit(1);
    }
    let snapshot = SurveySnapshot::load_jsonl(path).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", path.display());
        std::process::exit(1);
    });
    tracing::debug!(
        path = %path.display(),
        survey = snapshot.survey().map(|s| s.id.as_str()).unwrap_or("<none>"),
        pages = snapshot.page_count(),
        questions = snapshot.question_count(),
        rules = snapshot.rule_count(),
        "loaded survey snapshot"
    );
    snapshot
}

pub fn load_answers_or_exit(path: &str) -> AnswerSnapshot {
    let path = Path::new(path);
    let raw = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        std::process::exit(1);
    });
    let value: Value = serde_json::from_str(&raw).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {}: {e}", path.display());
        std::process::exit(1);
    });
    let answers = AnswerSnapshot::from_json(value).unwrap_or_else(|| {
        eprintln!(
            "error: {} must contain a JSON object keyed by question id",
            path.display()
        );
        std::process::exit(1);
    });
    tracing::debug!(path = %path.display(), answers = answers.len(), "loaded answers");
    answers
}

pub fn parse_status_or_exit(raw: &str) -> SurveyStatus {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Print a JSON payload, exiting with status 2 if it cannot be rendered.
pub fn print_json_or_exit(payload: &Value, what: &str) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|error| {
        eprintln!("error: failed to render {what} payload: {error}");
        std::process::exit(2);
    });
    println!("{rendered}");
}
