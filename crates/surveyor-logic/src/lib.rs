//! # Surveyor Logic
//!
//! The conditional-logic and integrity engine for multi-page surveys.
//!
//! Two execution contexts share this crate and must agree exactly:
//! respondent-time evaluation (which questions are visible and required for
//! the current answers) and author-time validation (is the survey
//! structurally sound enough to publish).
//!
//! ## Architecture
//!
//! ```text
//! SurveySnapshot + AnswerSnapshot     ← borrowed inputs (surveyor-model)
//!     │
//! condition::evaluate                 ← one rule against one answer
//!     │
//! aggregate::resolve                  ← all rules on one target → Resolution
//!     │
//! engine::evaluate_conditional_logic  ← question ∧ page composition
//! completion::check_completion        ← required-but-unanswered questions
//!
//! graph::DependencyGraph              ← condition → target edges, cycles
//!     │
//! validate::validate_for_publish      ← publish-readiness report
//!     │
//! transition::can_transition          ← draft/open/closed gating
//! ```
//!
//! Nothing here logs or blocks. Observability belongs to the caller.

pub mod aggregate;
pub mod completion;
pub mod condition;
pub mod engine;
pub mod error;
pub mod graph;
pub mod transition;
pub mod validate;

pub use aggregate::{Resolution, ResolutionTrace, RuleOutcome, resolve, resolve_with_trace};
pub use completion::{CompletionReport, MissingAnswer, check_completion};
pub use condition::{evaluate, evaluate_condition};
pub use engine::{
    PageResolution, QuestionResolution, SurveyResolution, evaluate_conditional_logic,
    evaluate_survey,
};
pub use error::LogicError;
pub use graph::{DependencyGraph, find_cycles};
pub use transition::{TransitionDecision, can_transition};
pub use validate::{Severity, ValidationFinding, ValidationReport, validate_for_publish};
