//! Deterministic publish-readiness checking.
//!
//! Validation runs in two phases:
//! 1. Survey prerequisites. A missing survey stops immediately. Title and
//!    recipient checks always run; a survey without pages stops after them.
//! 2. Per-item checks over questions, pages and rules, plus cycle analysis.
//!    Every finding is accumulated; nothing short-circuits.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use surveyor_model::{QuestionType, RuleAction, RuleTarget, SurveySnapshot};

use crate::graph::DependencyGraph;

pub const FIELD_SURVEY: &str = "survey";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_PAGES: &str = "pages";
pub const FIELD_QUESTIONS: &str = "questions";
pub const FIELD_RULES: &str = "rules";
pub const FIELD_RECIPIENTS: &str = "recipients";

pub const FAILURE_CLASS_SURVEY_MISSING: &str = "survey.missing";
pub const FAILURE_CLASS_TITLE_MISSING: &str = "survey.title.missing";
pub const FAILURE_CLASS_PAGES_EMPTY: &str = "survey.pages.empty";
pub const FAILURE_CLASS_QUESTIONS_EMPTY: &str = "survey.questions.empty";
pub const FAILURE_CLASS_QUESTION_PAGE_MISSING: &str = "question.page.missing";
pub const FAILURE_CLASS_OPTIONS_EMPTY: &str = "question.options.empty";
pub const FAILURE_CLASS_LOOP_CONFIG_MISSING: &str = "question.loop_config.missing";
pub const FAILURE_CLASS_LOOP_CONFIG_INVALID: &str = "question.loop_config.invalid";
pub const FAILURE_CLASS_RULE_CONDITION_MISSING: &str = "rule.condition.missing";
pub const FAILURE_CLASS_RULE_TARGET_MISSING: &str = "rule.target.missing";
pub const FAILURE_CLASS_RULE_TARGET_AMBIGUOUS: &str = "rule.target.ambiguous";
pub const FAILURE_CLASS_RULE_SELF_REFERENCE: &str = "rule.self_reference";
pub const FAILURE_CLASS_RULE_SURVEY_MISMATCH: &str = "rule.survey.mismatch";
pub const FAILURE_CLASS_RULE_CYCLE: &str = "rules.cycle";
pub const WARNING_CLASS_RECIPIENTS_EMPTY: &str = "survey.recipients.empty";
pub const WARNING_CLASS_PAGE_TITLE_EMPTY: &str = "page.title.empty";
pub const WARNING_CLASS_QUESTION_TITLE_EMPTY: &str = "question.title.empty";
pub const WARNING_CLASS_OPTIONS_DUPLICATE: &str = "question.options.duplicate";
pub const WARNING_CLASS_PAGE_REQUIREMENT_IGNORED: &str = "rule.page_requirement.ignored";

/// Whether a finding blocks publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// One localized validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFinding {
    pub field: String,
    pub message: String,
    pub severity: Severity,
    pub class: String,
    /// The question, page or rule the finding points at, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
}

/// Publish-readiness verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationFinding>,
    pub warnings: Vec<ValidationFinding>,
}

impl ValidationReport {
    /// Distinct failure classes in sorted order.
    pub fn failure_classes(&self) -> Vec<String> {
        collect_classes(&self.errors)
    }

    /// Distinct warning classes in sorted order.
    pub fn warning_classes(&self) -> Vec<String> {
        collect_classes(&self.warnings)
    }

    /// Error messages joined into one line, in report order.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|finding| finding.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn collect_classes(findings: &[ValidationFinding]) -> Vec<String> {
    findings
        .iter()
        .map(|finding| finding.class.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Default)]
struct Findings {
    errors: Vec<ValidationFinding>,
    warnings: Vec<ValidationFinding>,
}

impl Findings {
    fn error(&mut self, field: &str, class: &str, subject: Option<&str>, message: String) {
        self.errors.push(finding(field, class, subject, message, Severity::Error));
    }

    fn warning(&mut self, field: &str, class: &str, subject: Option<&str>, message: String) {
        self.warnings.push(finding(field, class, subject, message, Severity::Warning));
    }

    fn finish(self) -> ValidationReport {
        ValidationReport {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

fn finding(
    field: &str,
    class: &str,
    subject: Option<&str>,
    message: String,
    severity: Severity,
) -> ValidationFinding {
    ValidationFinding {
        field: field.to_string(),
        message,
        severity,
        class: class.to_string(),
        subject_id: subject.map(str::to_string),
    }
}

/// Check whether a survey may be published.
///
/// `None` (or a snapshot without a survey record) reports the survey as
/// missing and checks nothing else.
pub fn validate_for_publish(snapshot: Option<&SurveySnapshot>) -> ValidationReport {
    let mut findings = Findings::default();

    let Some((snapshot, survey)) = snapshot.and_then(|s| s.survey().map(|survey| (s, survey)))
    else {
        findings.error(
            FIELD_SURVEY,
            FAILURE_CLASS_SURVEY_MISSING,
            None,
            "Survey not found".to_string(),
        );
        return findings.finish();
    };

    // Phase 1: survey prerequisites.
    if !survey.has_title() {
        findings.error(
            FIELD_TITLE,
            FAILURE_CLASS_TITLE_MISSING,
            Some(&survey.id),
            "Survey title is required".to_string(),
        );
    }
    if !survey.allow_anonymous && survey.recipients.is_empty() {
        findings.warning(
            FIELD_RECIPIENTS,
            WARNING_CLASS_RECIPIENTS_EMPTY,
            Some(&survey.id),
            "Anonymous access is disabled and the survey has no recipients".to_string(),
        );
    }
    if snapshot.page_count() == 0 {
        findings.error(
            FIELD_PAGES,
            FAILURE_CLASS_PAGES_EMPTY,
            Some(&survey.id),
            "Survey must contain at least one page".to_string(),
        );
        return findings.finish();
    }

    // Phase 2: per-item checks.
    check_pages(snapshot, &mut findings);
    check_questions(snapshot, &mut findings);
    check_rules(snapshot, &survey.id, &mut findings);
    check_cycles(snapshot, &mut findings);

    findings.finish()
}

fn check_pages(snapshot: &SurveySnapshot, findings: &mut Findings) {
    for page in snapshot.pages() {
        if page.title.trim().is_empty() {
            findings.warning(
                FIELD_PAGES,
                WARNING_CLASS_PAGE_TITLE_EMPTY,
                Some(&page.id),
                format!("Page {} has no title", page.id),
            );
        }
    }
}

fn check_questions(snapshot: &SurveySnapshot, findings: &mut Findings) {
    if snapshot.question_count() == 0 {
        findings.error(
            FIELD_QUESTIONS,
            FAILURE_CLASS_QUESTIONS_EMPTY,
            None,
            "Survey must contain at least one question".to_string(),
        );
        return;
    }

    for question in snapshot.orphan_questions() {
        findings.error(
            FIELD_QUESTIONS,
            FAILURE_CLASS_QUESTION_PAGE_MISSING,
            Some(&question.id),
            format!(
                "Question {} belongs to page {}, which is not part of this survey",
                question.id, question.page_id
            ),
        );
    }

    for question in snapshot.questions() {
        let id = question.id.as_str();
        if question.title.trim().is_empty() {
            findings.warning(
                FIELD_QUESTIONS,
                WARNING_CLASS_QUESTION_TITLE_EMPTY,
                Some(id),
                format!("Question {id} has no title"),
            );
        }

        if question.question_type.is_choice() {
            if question.options.is_empty() {
                findings.error(
                    FIELD_QUESTIONS,
                    FAILURE_CLASS_OPTIONS_EMPTY,
                    Some(id),
                    format!(
                        "Question {id} ({}) must have at least one option",
                        question.question_type.as_str()
                    ),
                );
            } else {
                let mut seen = BTreeSet::new();
                let duplicates: BTreeSet<&str> = question
                    .options
                    .iter()
                    .filter(|option| !seen.insert(option.as_str()))
                    .map(String::as_str)
                    .collect();
                if !duplicates.is_empty() {
                    findings.warning(
                        FIELD_QUESTIONS,
                        WARNING_CLASS_OPTIONS_DUPLICATE,
                        Some(id),
                        format!(
                            "Question {id} repeats option(s): {}",
                            duplicates.into_iter().collect::<Vec<_>>().join(", ")
                        ),
                    );
                }
            }
        }

        if question.question_type == QuestionType::LoopGroup {
            match &question.loop_config {
                None => findings.error(
                    FIELD_QUESTIONS,
                    FAILURE_CLASS_LOOP_CONFIG_MISSING,
                    Some(id),
                    format!("Loop question {id} is missing its loop configuration"),
                ),
                Some(config) => {
                    if config.min_iterations > config.max_iterations {
                        findings.error(
                            FIELD_QUESTIONS,
                            FAILURE_CLASS_LOOP_CONFIG_INVALID,
                            Some(id),
                            format!(
                                "Loop question {id} has an invalid repeat range ({}..={})",
                                config.min_iterations, config.max_iterations
                            ),
                        );
                    }
                    if config.subquestions.is_empty() {
                        findings.error(
                            FIELD_QUESTIONS,
                            FAILURE_CLASS_LOOP_CONFIG_INVALID,
                            Some(id),
                            format!("Loop question {id} has no subquestions"),
                        );
                    }
                }
            }
        }
    }
}

fn check_rules(snapshot: &SurveySnapshot, survey_id: &str, findings: &mut Findings) {
    for rule in snapshot.rules() {
        let id = rule.id.as_str();

        if !rule.survey_id.is_empty() && rule.survey_id != survey_id {
            findings.error(
                FIELD_RULES,
                FAILURE_CLASS_RULE_SURVEY_MISMATCH,
                Some(id),
                format!(
                    "Rule {id} belongs to survey {}, not {survey_id}",
                    rule.survey_id
                ),
            );
        }

        if snapshot.question(&rule.condition_question_id).is_none() {
            findings.error(
                FIELD_RULES,
                FAILURE_CLASS_RULE_CONDITION_MISSING,
                Some(id),
                format!(
                    "Rule {id} tests question {}, which does not exist",
                    rule.condition_question_id
                ),
            );
        }

        let Some(target) = rule.target() else {
            findings.error(
                FIELD_RULES,
                FAILURE_CLASS_RULE_TARGET_AMBIGUOUS,
                Some(id),
                format!("Rule {id} must target exactly one question or page"),
            );
            continue;
        };

        if !snapshot.contains_target(&target) {
            let kind = match target {
                RuleTarget::Question(_) => "question",
                RuleTarget::Page(_) => "page",
            };
            findings.error(
                FIELD_RULES,
                FAILURE_CLASS_RULE_TARGET_MISSING,
                Some(id),
                format!("Rule {id} targets {kind} {}, which does not exist", target.id()),
            );
        }

        if rule.is_self_referencing() {
            findings.error(
                FIELD_RULES,
                FAILURE_CLASS_RULE_SELF_REFERENCE,
                Some(id),
                format!(
                    "Rule {id} makes question {} depend on its own answer",
                    rule.condition_question_id
                ),
            );
        }

        if matches!(target, RuleTarget::Page(_)) && !rule.action.affects_visibility() {
            findings.warning(
                FIELD_RULES,
                WARNING_CLASS_PAGE_REQUIREMENT_IGNORED,
                Some(id),
                format!(
                    "Rule {id} applies {} to page {}; page rules only control visibility",
                    rule.action.as_str(),
                    target.id()
                ),
            );
        }
    }
}

fn check_cycles(snapshot: &SurveySnapshot, findings: &mut Findings) {
    let groups = DependencyGraph::from_rules(snapshot.rules()).cycle_groups();
    if groups.is_empty() {
        return;
    }

    let group_of: BTreeMap<&str, usize> = groups
        .iter()
        .enumerate()
        .flat_map(|(index, group)| group.iter().map(move |id| (id.as_str(), index)))
        .collect();

    // Rules whose condition and target sit in the same cyclic component.
    let rule_ids: BTreeSet<&str> = snapshot
        .rules()
        .into_iter()
        .filter(|rule| match rule.target() {
            Some(RuleTarget::Question(target)) => {
                let source = group_of.get(rule.condition_question_id.as_str());
                source.is_some() && source == group_of.get(target.as_str())
            }
            _ => false,
        })
        .map(|rule| rule.id.as_str())
        .collect();
    let participants: BTreeSet<&str> = group_of.keys().copied().collect();

    findings.error(
        FIELD_RULES,
        FAILURE_CLASS_RULE_CYCLE,
        None,
        format!(
            "Conditional rules form a cycle through questions: {} (rules: {})",
            participants.into_iter().collect::<Vec<_>>().join(", "),
            rule_ids.into_iter().collect::<Vec<_>>().join(", ")
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use surveyor_model::{
        ConditionalRule, LoopConfig, Operator, Page, Question, Survey,
    };

    fn snapshot(questions: Vec<Question>, rules: Vec<ConditionalRule>) -> SurveySnapshot {
        SurveySnapshot::new(
            Some(Survey::new("s1", "Customer intake")),
            vec![Page::new("p1", "About you", 0)],
            questions,
            rules,
        )
    }

    fn text(id: &str) -> Question {
        Question::new(id, "p1", format!("Question {id}"), QuestionType::ShortText)
    }

    fn show(id: &str, from: &str, to: &str) -> ConditionalRule {
        ConditionalRule::for_question(id, from, Operator::Equals, json!("yes"), to, RuleAction::Show)
    }

    fn classes(findings: &[ValidationFinding]) -> Vec<&str> {
        findings.iter().map(|f| f.class.as_str()).collect()
    }

    #[test]
    fn missing_survey_short_circuits() {
        let report = validate_for_publish(None);
        assert!(!report.valid);
        assert_eq!(classes(&report.errors), vec![FAILURE_CLASS_SURVEY_MISSING]);
        assert_eq!(report.errors[0].field, FIELD_SURVEY);

        let headless = SurveySnapshot::new(None, vec![Page::new("p1", "", 0)], Vec::new(), Vec::new());
        let report = validate_for_publish(Some(&headless));
        assert_eq!(classes(&report.errors), vec![FAILURE_CLASS_SURVEY_MISSING]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_pages_stops_after_survey_checks() {
        let mut survey = Survey::new("s1", "  ");
        survey.allow_anonymous = false;
        let orphan = Question::new("q1", "p-gone", "", QuestionType::Radio);
        let snapshot = SurveySnapshot::new(Some(survey), Vec::new(), vec![orphan], Vec::new());

        let report = validate_for_publish(Some(&snapshot));
        assert!(!report.valid);
        assert_eq!(
            classes(&report.errors),
            vec![FAILURE_CLASS_TITLE_MISSING, FAILURE_CLASS_PAGES_EMPTY]
        );
        assert_eq!(classes(&report.warnings), vec![WARNING_CLASS_RECIPIENTS_EMPTY]);
    }

    #[test]
    fn valid_survey_has_no_findings() {
        let report = validate_for_publish(Some(&snapshot(
            vec![text("q1"), text("q2")],
            vec![show("r1", "q1", "q2")],
        )));
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn empty_choice_options_yield_exactly_one_error() {
        let choice = Question::new("q1", "p1", "Pick one", QuestionType::MultipleChoice);
        let report = validate_for_publish(Some(&snapshot(vec![choice], Vec::new())));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].field, FIELD_QUESTIONS);
        assert_eq!(report.errors[0].subject_id.as_deref(), Some("q1"));
    }

    #[test]
    fn zero_questions_is_an_error() {
        let report = validate_for_publish(Some(&snapshot(Vec::new(), Vec::new())));
        assert_eq!(classes(&report.errors), vec![FAILURE_CLASS_QUESTIONS_EMPTY]);
        assert!(report.errors[0].message.contains("question"));
    }

    #[test]
    fn loop_groups_need_usable_configuration() {
        let missing = Question::new("q1", "p1", "Children", QuestionType::LoopGroup);
        let inverted = Question::new("q2", "p1", "Pets", QuestionType::LoopGroup).with_loop_config(
            LoopConfig {
                min_iterations: 4,
                max_iterations: 2,
                subquestions: vec!["q3".to_string()],
            },
        );
        let hollow = Question::new("q3", "p1", "Cars", QuestionType::LoopGroup).with_loop_config(
            LoopConfig {
                min_iterations: 0,
                max_iterations: 3,
                subquestions: Vec::new(),
            },
        );

        let report = validate_for_publish(Some(&snapshot(vec![missing, inverted, hollow], Vec::new())));
        assert_eq!(
            classes(&report.errors),
            vec![
                FAILURE_CLASS_LOOP_CONFIG_MISSING,
                FAILURE_CLASS_LOOP_CONFIG_INVALID,
                FAILURE_CLASS_LOOP_CONFIG_INVALID
            ]
        );
    }

    #[test]
    fn zero_length_loop_range_is_allowed() {
        let optional = Question::new("q1", "p1", "Extra drivers", QuestionType::LoopGroup)
            .with_loop_config(LoopConfig {
                min_iterations: 0,
                max_iterations: 0,
                subquestions: vec!["q2".to_string()],
            });
        let report = validate_for_publish(Some(&snapshot(vec![optional, text("q2")], Vec::new())));
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn all_findings_accumulate() {
        let mut survey = Survey::new("s1", "");
        survey.allow_anonymous = false;
        let snapshot = SurveySnapshot::new(
            Some(survey),
            vec![Page::new("p1", "", 0)],
            vec![
                Question::new("q1", "p1", "", QuestionType::Radio),
                Question::new("q2", "p1", "Loop", QuestionType::LoopGroup),
            ],
            vec![show("r1", "q1", "q2"), show("r2", "q2", "q1")],
        );

        let report = validate_for_publish(Some(&snapshot));
        assert_eq!(
            classes(&report.errors),
            vec![
                FAILURE_CLASS_TITLE_MISSING,
                FAILURE_CLASS_OPTIONS_EMPTY,
                FAILURE_CLASS_LOOP_CONFIG_MISSING,
                FAILURE_CLASS_RULE_CYCLE
            ]
        );
        assert_eq!(
            classes(&report.warnings),
            vec![
                WARNING_CLASS_RECIPIENTS_EMPTY,
                WARNING_CLASS_PAGE_TITLE_EMPTY,
                WARNING_CLASS_QUESTION_TITLE_EMPTY
            ]
        );
    }

    #[test]
    fn cycle_error_names_every_question_and_rule() {
        let report = validate_for_publish(Some(&snapshot(
            vec![text("A"), text("B"), text("C"), text("D")],
            vec![
                show("r1", "A", "B"),
                show("r2", "B", "C"),
                show("r3", "C", "A"),
                show("r4", "C", "D"),
            ],
        )));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        let message = &report.errors[0].message;
        assert_eq!(report.errors[0].field, FIELD_RULES);
        assert!(message.contains("A, B, C"), "{message}");
        assert!(message.contains("r1, r2, r3"), "{message}");
        assert!(!message.contains('D'), "{message}");
    }

    #[test]
    fn dangling_and_malformed_rules_are_localized() {
        let mut ambiguous = show("r3", "q1", "q2");
        ambiguous.target_page_id = Some("p1".to_string());
        let mut untargeted = show("r3a", "q1", "q2");
        untargeted.target_question_id = None;
        let mut foreign = show("r5", "q1", "q2");
        foreign.survey_id = "s-other".to_string();
        let page_require = ConditionalRule::for_page(
            "r6",
            "q1",
            Operator::IsNotEmpty,
            json!(null),
            "p1",
            RuleAction::Require,
        );

        let report = validate_for_publish(Some(&snapshot(
            vec![text("q1"), text("q2")],
            vec![
                show("r1", "q-missing", "q2"),
                show("r2", "q1", "q-gone"),
                ambiguous,
                untargeted,
                show("r4", "q2", "q2"),
                foreign,
                page_require,
            ],
        )));

        let located: Vec<(&str, Option<&str>)> = report
            .errors
            .iter()
            .map(|f| (f.class.as_str(), f.subject_id.as_deref()))
            .collect();
        assert_eq!(
            located,
            vec![
                (FAILURE_CLASS_RULE_CONDITION_MISSING, Some("r1")),
                (FAILURE_CLASS_RULE_TARGET_MISSING, Some("r2")),
                (FAILURE_CLASS_RULE_TARGET_AMBIGUOUS, Some("r3")),
                (FAILURE_CLASS_RULE_TARGET_AMBIGUOUS, Some("r3a")),
                (FAILURE_CLASS_RULE_SELF_REFERENCE, Some("r4")),
                (FAILURE_CLASS_RULE_SURVEY_MISMATCH, Some("r5")),
                (FAILURE_CLASS_RULE_CYCLE, None),
            ]
        );
        assert_eq!(classes(&report.warnings), vec![WARNING_CLASS_PAGE_REQUIREMENT_IGNORED]);
    }

    #[test]
    fn duplicate_options_warn_without_blocking() {
        let radio = Question::new("q1", "p1", "Size", QuestionType::Radio)
            .with_options(["S", "M", "S", "L", "M"]);
        let report = validate_for_publish(Some(&snapshot(vec![radio], Vec::new())));
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.ends_with("M, S"));
    }

    #[test]
    fn report_serializes_with_camel_case_findings() {
        let choice = Question::new("q1", "p1", "Pick one", QuestionType::Radio);
        let report = validate_for_publish(Some(&snapshot(vec![choice], Vec::new())));
        insta::assert_json_snapshot!(report, @r#"
        {
          "valid": false,
          "errors": [
            {
              "field": "questions",
              "message": "Question q1 (radio) must have at least one option",
              "severity": "error",
              "class": "question.options.empty",
              "subjectId": "q1"
            }
          ],
          "warnings": []
        }
        "#);
    }
}
