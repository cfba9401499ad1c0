//! Conditional rules: typed edges from a condition question to a target.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Predicate applied to the condition question's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
    Equals,
    #[serde(alias = "not_equals")]
    NotEquals,
    Contains,
    #[serde(alias = "not_contains")]
    NotContains,
    #[serde(alias = "greater_than")]
    GreaterThan,
    #[serde(alias = "less_than")]
    LessThan,
    Between,
    #[serde(alias = "is_empty")]
    IsEmpty,
    #[serde(alias = "is_not_empty")]
    IsNotEmpty,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not-equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not-contains",
            Operator::GreaterThan => "greater-than",
            Operator::LessThan => "less-than",
            Operator::Between => "between",
            Operator::IsEmpty => "is-empty",
            Operator::IsNotEmpty => "is-not-empty",
        }
    }
}

/// Effect a satisfied rule has on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleAction {
    Show,
    Hide,
    Require,
    #[serde(alias = "make_optional")]
    MakeOptional,
}

impl RuleAction {
    /// Show/hide rules affect visibility; the others affect requiredness.
    pub fn affects_visibility(&self) -> bool {
        matches!(self, RuleAction::Show | RuleAction::Hide)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleAction::Show => "show",
            RuleAction::Hide => "hide",
            RuleAction::Require => "require",
            RuleAction::MakeOptional => "make-optional",
        }
    }
}

/// Joins a rule to the rules folded before it on the same target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl LogicalOperator {
    pub fn combine(&self, accumulated: bool, next: bool) -> bool {
        match self {
            LogicalOperator::And => accumulated && next,
            LogicalOperator::Or => accumulated || next,
        }
    }
}

/// The question or page a rule controls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleTarget {
    Question(String),
    Page(String),
}

impl RuleTarget {
    pub fn id(&self) -> &str {
        match self {
            RuleTarget::Question(id) | RuleTarget::Page(id) => id,
        }
    }
}

/// One conditional rule row.
///
/// Rows carry both target columns; exactly one is expected to be set.
/// Rows violating that are kept as-is so the validator can point at them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub survey_id: String,
    pub condition_question_id: String,
    pub operator: Operator,
    #[serde(default)]
    pub condition_value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_page_id: Option<String>,
    pub action: RuleAction,
    #[serde(default)]
    pub logical_operator: LogicalOperator,
    #[serde(default)]
    pub order: i64,
}

impl ConditionalRule {
    /// Build a question-targeted rule with `AND` joining and order 0.
    pub fn for_question(
        id: impl Into<String>,
        condition_question_id: impl Into<String>,
        operator: Operator,
        condition_value: Value,
        target_question_id: impl Into<String>,
        action: RuleAction,
    ) -> Self {
        Self {
            id: id.into(),
            survey_id: String::new(),
            condition_question_id: condition_question_id.into(),
            operator,
            condition_value,
            target_question_id: Some(target_question_id.into()),
            target_page_id: None,
            action,
            logical_operator: LogicalOperator::And,
            order: 0,
        }
    }

    /// Build a page-targeted rule with `AND` joining and order 0.
    pub fn for_page(
        id: impl Into<String>,
        condition_question_id: impl Into<String>,
        operator: Operator,
        condition_value: Value,
        target_page_id: impl Into<String>,
        action: RuleAction,
    ) -> Self {
        Self {
            target_question_id: None,
            target_page_id: Some(target_page_id.into()),
            ..Self::for_question(
                id,
                condition_question_id,
                operator,
                condition_value,
                String::new(),
                action,
            )
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_logical_operator(mut self, logical_operator: LogicalOperator) -> Self {
        self.logical_operator = logical_operator;
        self
    }

    /// The rule's target, or `None` when neither or both target columns are set.
    pub fn target(&self) -> Option<RuleTarget> {
        let question = self.target_question_id.as_deref().filter(|id| !id.is_empty());
        let page = self.target_page_id.as_deref().filter(|id| !id.is_empty());
        match (question, page) {
            (Some(id), None) => Some(RuleTarget::Question(id.to_string())),
            (None, Some(id)) => Some(RuleTarget::Page(id.to_string())),
            _ => None,
        }
    }

    /// Whether this rule controls `target`.
    pub fn targets(&self, target: &RuleTarget) -> bool {
        self.target().as_ref() == Some(target)
    }

    /// Whether the rule's condition is its own target.
    pub fn is_self_referencing(&self) -> bool {
        matches!(self.target(), Some(RuleTarget::Question(id)) if id == self.condition_question_id)
    }
}
