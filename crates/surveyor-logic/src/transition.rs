//! Survey status transitions gated on publish validation.
//!
//! ```text
//! draft ──(valid)──▶ open ◀──▶ closed
//!   ▲                 │          │
//!   └──── (warning) ──┴──────────┘
//! ```

use serde::{Deserialize, Serialize};
use surveyor_model::{SurveySnapshot, SurveyStatus};

use crate::validate::{ValidationReport, validate_for_publish};

/// Outcome of a requested status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDecision {
    pub allowed: bool,
    /// Denial cause, or a non-blocking warning for allowed moves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Publish validation, present when the transition ran it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

impl TransitionDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            validation: None,
        }
    }

    fn allow_with_warning(reason: String) -> Self {
        Self {
            allowed: true,
            reason: Some(reason),
            validation: None,
        }
    }
}

/// Decide whether `current → next` may happen for `snapshot`.
///
/// Only `draft → open` validates; reopening a closed survey does not.
pub fn can_transition(
    current: SurveyStatus,
    next: SurveyStatus,
    snapshot: Option<&SurveySnapshot>,
) -> TransitionDecision {
    match (current, next) {
        (from, to) if from == to => TransitionDecision::allow(),
        (SurveyStatus::Draft, SurveyStatus::Open) => {
            let report = validate_for_publish(snapshot);
            if report.valid {
                TransitionDecision {
                    allowed: true,
                    reason: None,
                    validation: Some(report),
                }
            } else {
                TransitionDecision {
                    allowed: false,
                    reason: Some(format!(
                        "Survey cannot be published: {}",
                        report.error_summary()
                    )),
                    validation: Some(report),
                }
            }
        }
        (SurveyStatus::Open, SurveyStatus::Closed) | (SurveyStatus::Closed, SurveyStatus::Open) => {
            TransitionDecision::allow()
        }
        (from, SurveyStatus::Draft) => TransitionDecision::allow_with_warning(format!(
            "Moving a {from} survey back to draft may affect existing responses"
        )),
        _ => TransitionDecision::allow(),
    }
}
