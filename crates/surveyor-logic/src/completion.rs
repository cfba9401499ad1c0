//! Completion-time check: which required questions still block a response.

use serde::{Deserialize, Serialize};
use surveyor_model::{AnswerSnapshot, SurveySnapshot};

use crate::engine::evaluate_survey;

/// A visible, required question without a usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingAnswer {
    pub question_id: String,
    pub page_id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    pub complete: bool,
    pub missing_required: Vec<MissingAnswer>,
}

/// Check a final answer snapshot against the rules in force for it.
///
/// Resolution is shared with respondent-time evaluation; hidden questions
/// never block.
pub fn check_completion(snapshot: &SurveySnapshot, answers: &AnswerSnapshot) -> CompletionReport {
    let plan = evaluate_survey(snapshot, answers);
    let missing_required: Vec<MissingAnswer> = plan
        .pages
        .iter()
        .flat_map(|page| {
            page.questions
                .iter()
                .filter(move |q| q.visible && q.required && !answers.is_answered(&q.question_id))
                .map(move |q| MissingAnswer {
                    question_id: q.question_id.clone(),
                    page_id: page.page_id.clone(),
                    title: snapshot
                        .question(&q.question_id)
                        .map(|question| question.title.clone())
                        .unwrap_or_default(),
                })
        })
        .collect();

    CompletionReport {
        complete: missing_required.is_empty(),
        missing_required,
    }
}
