//! Rule aggregation: all rules on one target folded into one decision.
//!
//! Rules are taken in `(order, id)` order and grouped by action. Each group
//! folds left, joining every later rule to the accumulated value with that
//! later rule's logical operator: `((r1 op2 r2) op3 r3) ...`.
//!
//! Group outcomes combine as follows:
//! - a `show` group, when present, decides visibility; otherwise visible
//! - a satisfied `hide` group hides the target even if `show` is satisfied
//! - a satisfied `require` group makes the target required
//! - a satisfied `make-optional` group makes it optional even over `require`
//! - a hidden target is never required

use serde::{Deserialize, Serialize};
use surveyor_model::{AnswerSnapshot, ConditionalRule, RuleAction, RuleTarget};

use crate::condition::evaluate;

/// Visibility and requiredness of one question or page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub visible: bool,
    pub required: bool,
}

impl Resolution {
    /// The state of a target no rule applies to.
    pub fn unconditioned(required: bool) -> Self {
        Self {
            visible: true,
            required,
        }
    }
}

/// How one rule evaluated during a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    pub rule_id: String,
    pub action: RuleAction,
    pub order: i64,
    pub satisfied: bool,
}

/// A resolution together with the per-rule evaluations behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionTrace {
    pub resolution: Resolution,
    pub rules: Vec<RuleOutcome>,
}

/// Resolve `target` given the candidate rules and the current answers.
///
/// Rules that do not control `target` are ignored, so callers may pass the
/// full rule set. `default_required` is the target's static flag.
pub fn resolve<'a>(
    target: &RuleTarget,
    rules: impl IntoIterator<Item = &'a ConditionalRule>,
    answers: &AnswerSnapshot,
    default_required: bool,
) -> Resolution {
    resolve_with_trace(target, rules, answers, default_required).resolution
}

/// Same as [`resolve`], also reporting each applicable rule's outcome.
pub fn resolve_with_trace<'a>(
    target: &RuleTarget,
    rules: impl IntoIterator<Item = &'a ConditionalRule>,
    answers: &AnswerSnapshot,
    default_required: bool,
) -> ResolutionTrace {
    let mut applicable: Vec<&ConditionalRule> =
        rules.into_iter().filter(|rule| rule.targets(target)).collect();
    applicable.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));

    let outcomes: Vec<(&ConditionalRule, bool)> = applicable
        .into_iter()
        .map(|rule| (rule, evaluate(rule, answers)))
        .collect();

    let show = fold_group(&outcomes, RuleAction::Show);
    let hide = fold_group(&outcomes, RuleAction::Hide);
    let require = fold_group(&outcomes, RuleAction::Require);
    let make_optional = fold_group(&outcomes, RuleAction::MakeOptional);

    let visible = show.unwrap_or(true) && hide != Some(true);
    let required = if make_optional == Some(true) {
        false
    } else {
        require == Some(true) || default_required
    };

    ResolutionTrace {
        resolution: Resolution {
            visible,
            required: visible && required,
        },
        rules: outcomes
            .into_iter()
            .map(|(rule, satisfied)| RuleOutcome {
                rule_id: rule.id.clone(),
                action: rule.action,
                order: rule.order,
                satisfied,
            })
            .collect(),
    }
}

/// Left fold of one action group; `None` when the group is empty.
fn fold_group(outcomes: &[(&ConditionalRule, bool)], action: RuleAction) -> Option<bool> {
    outcomes
        .iter()
        .filter(|(rule, _)| rule.action == action)
        .fold(None, |accumulated, (rule, satisfied)| match accumulated {
            None => Some(*satisfied),
            Some(previous) => Some(rule.logical_operator.combine(previous, *satisfied)),
        })
}
