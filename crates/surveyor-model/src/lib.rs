//! # surveyor-model
//!
//! Data layer for survey structure and respondent answers.
//!
//! This crate provides:
//! - `Survey`, `Page`, `Question` and `ConditionalRule` row types
//! - `AnswerSnapshot` (the per-call evaluation context)
//! - JSONL row ingest (portable interchange with the persistence layer)
//! - `SurveySnapshot` (immutable, indexed view over one survey)
//!
//! It intentionally does not evaluate rules or validate structure.
//! Those concerns live in `surveyor-logic`.
//!
//! ## Data model
//!
//! ```text
//! JSONL rows (survey / page / question / rule)
//!     -> ingest
//! SurveySnapshot (deterministic in-memory projection)
//!     -> borrowed by surveyor-logic
//! ```

pub mod answers;
pub mod jsonl;
pub mod page;
pub mod question;
pub mod rule;
pub mod snapshot;
pub mod survey;

pub use answers::{AnswerSnapshot, is_empty_answer};
pub use jsonl::{JsonlError, SnapshotRow, read_rows, read_rows_from_path};
pub use page::Page;
pub use question::{LoopConfig, Question, QuestionType};
pub use rule::{ConditionalRule, LogicalOperator, Operator, RuleAction, RuleTarget};
pub use snapshot::{SnapshotError, SurveySnapshot};
pub use survey::{Survey, SurveyStatus};

/// Identifier of a question within one survey.
pub type QuestionId = String;

/// Identifier of a page within one survey.
pub type PageId = String;
