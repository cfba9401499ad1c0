//! Respondent-time evaluation over a whole survey snapshot.
//!
//! A question is visible only when both its own rules and its page's rules
//! leave it visible. Page rules only ever control visibility. A page missing
//! from the snapshot is never visible, so its questions are hidden and never
//! required.

use serde::{Deserialize, Serialize};
use surveyor_model::{AnswerSnapshot, Question, RuleTarget, SurveySnapshot};

use crate::aggregate::{Resolution, resolve};
use crate::error::LogicError;

/// Final state of one question for the current answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResolution {
    pub question_id: String,
    pub visible: bool,
    pub required: bool,
}

/// Final state of one page and its questions in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResolution {
    pub page_id: String,
    pub visible: bool,
    pub questions: Vec<QuestionResolution>,
}

/// Display plan for a whole survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResolution {
    pub pages: Vec<PageResolution>,
    pub visible_question_ids: Vec<String>,
}

impl SurveyResolution {
    pub fn question(&self, question_id: &str) -> Option<&QuestionResolution> {
        self.pages
            .iter()
            .flat_map(|page| page.questions.iter())
            .find(|question| question.question_id == question_id)
    }
}

/// Evaluate one question or page against the current answers.
///
/// Question ids take precedence if a page shares the same id. For pages,
/// `required` is always `false`.
pub fn evaluate_conditional_logic(
    snapshot: &SurveySnapshot,
    id: &str,
    answers: &AnswerSnapshot,
) -> Result<Resolution, LogicError> {
    if let Some(question) = snapshot.question(id) {
        let page_visible = page_visibility(snapshot, &question.page_id, answers);
        return Ok(resolve_question(snapshot, question, page_visible, answers));
    }
    if snapshot.page(id).is_some() {
        return Ok(Resolution {
            visible: page_visibility(snapshot, id, answers),
            required: false,
        });
    }
    Err(LogicError::UnknownTarget(id.to_string()))
}

/// Evaluate every page and question of the survey in display order.
///
/// Questions whose page is not part of the snapshot are not displayable and
/// are left out.
pub fn evaluate_survey(snapshot: &SurveySnapshot, answers: &AnswerSnapshot) -> SurveyResolution {
    let mut pages = Vec::new();
    let mut visible_question_ids = Vec::new();

    for page in snapshot.pages() {
        let page_visible = page_visibility(snapshot, &page.id, answers);
        let questions: Vec<QuestionResolution> = snapshot
            .questions_on_page(&page.id)
            .into_iter()
            .map(|question| {
                let resolution = resolve_question(snapshot, question, page_visible, answers);
                QuestionResolution {
                    question_id: question.id.clone(),
                    visible: resolution.visible,
                    required: resolution.required,
                }
            })
            .collect();

        visible_question_ids.extend(
            questions
                .iter()
                .filter(|question| question.visible)
                .map(|question| question.question_id.clone()),
        );
        pages.push(PageResolution {
            page_id: page.id.clone(),
            visible: page_visible,
            questions,
        });
    }

    SurveyResolution {
        pages,
        visible_question_ids,
    }
}

fn page_visibility(snapshot: &SurveySnapshot, page_id: &str, answers: &AnswerSnapshot) -> bool {
    if snapshot.page(page_id).is_none() {
        return false;
    }
    let target = RuleTarget::Page(page_id.to_string());
    resolve(&target, snapshot.rules_for(&target), answers, false).visible
}

fn resolve_question(
    snapshot: &SurveySnapshot,
    question: &Question,
    page_visible: bool,
    answers: &AnswerSnapshot,
) -> Resolution {
    let target = RuleTarget::Question(question.id.clone());
    let own = resolve(&target, snapshot.rules_for(&target), answers, question.required);
    let visible = page_visible && own.visible;
    Resolution {
        visible,
        required: visible && own.required,
    }
}
