use crate::support::{load_answers_or_exit, load_snapshot_or_exit, print_json_or_exit};
use serde_json::json;
use surveyor_logic::{
    ResolutionTrace, SurveyResolution, evaluate_conditional_logic, evaluate_survey,
    resolve_with_trace,
};
use surveyor_model::{AnswerSnapshot, RuleTarget, SurveySnapshot};

const CHECK_KIND: &str = "surveyor.evaluate.v1";

pub struct Args {
    pub snapshot: String,
    pub answers: String,
    pub target: Option<String>,
    pub json: bool,
}

/// Per-rule outcomes behind the target's own resolution (page rules of a
/// question's page are not included).
fn own_rule_trace(snapshot: &SurveySnapshot, id: &str, answers: &AnswerSnapshot) -> ResolutionTrace {
    let (target, default_required) = match snapshot.question(id) {
        Some(question) => (RuleTarget::Question(id.to_string()), question.required),
        None => (RuleTarget::Page(id.to_string()), false),
    };
    resolve_with_trace(&target, snapshot.rules_for(&target), answers, default_required)
}

fn print_plan(plan: &SurveyResolution) {
    println!(
        "[evaluate] {} visible question(s)",
        plan.visible_question_ids.len()
    );
    for page in &plan.pages {
        println!(
            "  page {} {}",
            page.page_id,
            if page.visible { "visible" } else { "hidden" }
        );
        for question in &page.questions {
            let state = match (question.visible, question.required) {
                (false, _) => "hidden",
                (true, true) => "required",
                (true, false) => "optional",
            };
            println!("    - {} {state}", question.question_id);
        }
    }
}

pub fn run(args: Args) {
    let snapshot = load_snapshot_or_exit(&args.snapshot);
    let answers = load_answers_or_exit(&args.answers);

    let Some(target) = args.target else {
        let plan = evaluate_survey(&snapshot, &answers);
        tracing::info!(
            pages = plan.pages.len(),
            visible = plan.visible_question_ids.len(),
            "survey evaluated"
        );
        if args.json {
            let payload = json!({
                "schema": 1,
                "checkKind": CHECK_KIND,
                "snapshotPath": args.snapshot,
                "result": "evaluated",
                "rulesDigest": snapshot.rules_digest(),
                "plan": plan,
            });
            print_json_or_exit(&payload, "evaluate");
        } else {
            print_plan(&plan);
        }
        return;
    };

    let resolution = evaluate_conditional_logic(&snapshot, &target, &answers).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let trace = own_rule_trace(&snapshot, &target, &answers);
    for outcome in &trace.rules {
        tracing::debug!(
            rule = %outcome.rule_id,
            action = outcome.action.as_str(),
            order = outcome.order,
            satisfied = outcome.satisfied,
            "rule evaluated"
        );
    }
    tracing::info!(
        id = %target,
        visible = resolution.visible,
        required = resolution.required,
        "target evaluated"
    );

    if args.json {
        let payload = json!({
            "schema": 1,
            "checkKind": CHECK_KIND,
            "snapshotPath": args.snapshot,
            "result": "evaluated",
            "target": target,
            "resolution": resolution,
            "rules": trace.rules,
        });
        print_json_or_exit(&payload, "evaluate");
    } else {
        println!(
            "[evaluate] {target} visible={} required={}",
            resolution.visible, resolution.required
        );
        for outcome in &trace.rules {
            println!(
                "  - {} {} {}",
                outcome.rule_id,
                outcome.action.as_str(),
                if outcome.satisfied { "satisfied" } else { "unsatisfied" }
            );
        }
    }
}
