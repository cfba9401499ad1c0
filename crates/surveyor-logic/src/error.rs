//! Error types for engine contract violations.
//!
//! Data-quality problems (malformed rules, broken structure, cycles, denied
//! transitions) are reported as values. Only caller mistakes surface here.

/// Errors raised when the caller breaks an engine contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogicError {
    /// The requested id is neither a question nor a page of the snapshot.
    #[error("unknown evaluation target `{0}`: not a question or page of this survey")]
    UnknownTarget(String),
}
