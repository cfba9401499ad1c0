//! Immutable in-memory view over one survey's structure and rules.
//!
//! This is the boundary between persistence and the logic engine:
//! - ingest rows (JSONL or already-materialized vectors)
//! - expose deterministic lookups and display ordering
//! - never mutate after construction

use crate::jsonl::{JsonlError, SnapshotRow, read_rows_from_path};
use crate::page::Page;
use crate::question::Question;
use crate::rule::{ConditionalRule, RuleTarget};
use crate::survey::Survey;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors raised while building a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),

    #[error("snapshot contains more than one survey: {first} and {second}")]
    MultipleSurveys { first: String, second: String },
}

/// Indexed, read-only survey snapshot.
///
/// Duplicate page/question/rule IDs are resolved with deterministic
/// last-write-wins semantics, matching overlay behavior of row exports.
#[derive(Debug, Clone, Default)]
pub struct SurveySnapshot {
    survey: Option<Survey>,
    pages: BTreeMap<String, Page>,
    questions: BTreeMap<String, Question>,
    rules: BTreeMap<String, ConditionalRule>,
}

impl SurveySnapshot {
    /// Build a snapshot from fully-materialized rows.
    pub fn new(
        survey: Option<Survey>,
        pages: Vec<Page>,
        questions: Vec<Question>,
        rules: Vec<ConditionalRule>,
    ) -> Self {
        Self {
            survey,
            pages: pages.into_iter().map(|p| (p.id.clone(), p)).collect(),
            questions: questions.into_iter().map(|q| (q.id.clone(), q)).collect(),
            rules: rules.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    /// Build a snapshot from tagged rows.
    ///
    /// At most one distinct survey may appear; repeating the same survey id
    /// overwrites the earlier row.
    pub fn from_rows(rows: Vec<SnapshotRow>) -> Result<Self, SnapshotError> {
        let mut snapshot = Self::default();
        for row in rows {
            match row {
                SnapshotRow::Survey(survey) => {
                    if let Some(existing) = &snapshot.survey
                        && existing.id != survey.id
                    {
                        return Err(SnapshotError::MultipleSurveys {
                            first: existing.id.clone(),
                            second: survey.id,
                        });
                    }
                    snapshot.survey = Some(survey);
                }
                SnapshotRow::Page(page) => {
                    snapshot.pages.insert(page.id.clone(), page);
                }
                SnapshotRow::Question(question) => {
                    snapshot.questions.insert(question.id.clone(), question);
                }
                SnapshotRow::Rule(rule) => {
                    snapshot.rules.insert(rule.id.clone(), rule);
                }
            }
        }
        Ok(snapshot)
    }

    /// Load a snapshot from a JSONL export.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let rows = read_rows_from_path(path)?;
        Self::from_rows(rows)
    }

    pub fn survey(&self) -> Option<&Survey> {
        self.survey.as_ref()
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.get(id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Pages in display order (`order_index`, then id).
    pub fn pages(&self) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self.pages.values().collect();
        pages.sort_by(|a, b| a.order_index.cmp(&b.order_index).then(a.id.cmp(&b.id)));
        pages
    }

    /// Questions on one page in display order.
    pub fn questions_on_page(&self, page_id: &str) -> Vec<&Question> {
        let mut questions: Vec<&Question> = self
            .questions
            .values()
            .filter(|q| q.page_id == page_id)
            .collect();
        questions.sort_by(|a, b| a.order_index.cmp(&b.order_index).then(a.id.cmp(&b.id)));
        questions
    }

    /// All questions in deterministic id order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    /// Questions whose page is not part of this snapshot.
    pub fn orphan_questions(&self) -> Vec<&Question> {
        self.questions
            .values()
            .filter(|q| !self.pages.contains_key(&q.page_id))
            .collect()
    }

    /// All rules in evaluation order (`order`, then id).
    pub fn rules(&self) -> Vec<&ConditionalRule> {
        let mut rules: Vec<&ConditionalRule> = self.rules.values().collect();
        rules.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
        rules
    }

    /// Rules controlling `target`, in evaluation order.
    pub fn rules_for(&self, target: &RuleTarget) -> Vec<&ConditionalRule> {
        self.rules()
            .into_iter()
            .filter(|rule| rule.targets(target))
            .collect()
    }

    /// Whether `target` names a question or page in this snapshot.
    pub fn contains_target(&self, target: &RuleTarget) -> bool {
        match target {
            RuleTarget::Question(id) => self.questions.contains_key(id),
            RuleTarget::Page(id) => self.pages.contains_key(id),
        }
    }

    /// Stable digest of the rule set, usable as a memoization key.
    pub fn rules_digest(&self) -> String {
        let mut hasher = Sha256::new();
        for rule in self.rules() {
            // Struct serialization is infallible for these row types.
            let encoded = serde_json::to_vec(rule).unwrap_or_default();
            hasher.update(&encoded);
            hasher.update([0]);
        }
        format!("rules1_{:x}", hasher.finalize())
    }
}
