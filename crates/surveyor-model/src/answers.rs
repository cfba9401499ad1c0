//! Answer snapshots: the evaluation context for one response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw answers of one response keyed by question id.
///
/// Values are stored as received (not type-coerced). A question that is
/// unanswered or unreached is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSnapshot {
    answers: BTreeMap<String, Value>,
}

impl AnswerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object. Any other JSON shape yields `None`.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                answers: map.into_iter().collect(),
            }),
            _ => None,
        }
    }

    /// Record or replace one answer.
    pub fn insert(&mut self, question_id: impl Into<String>, value: Value) -> Option<Value> {
        self.answers.insert(question_id.into(), value)
    }

    pub fn with(mut self, question_id: impl Into<String>, value: Value) -> Self {
        self.insert(question_id, value);
        self
    }

    pub fn get(&self, question_id: &str) -> Option<&Value> {
        self.answers.get(question_id)
    }

    /// Whether the question has a non-empty answer.
    pub fn is_answered(&self, question_id: &str) -> bool {
        !is_empty_answer(self.get(question_id))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Iterate answers in deterministic question-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.answers.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for AnswerSnapshot {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Empty means absent, `null`, the empty string, or the empty array.
pub fn is_empty_answer(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emptiness_covers_absent_null_blank_and_empty_array() {
        assert!(is_empty_answer(None));
        assert!(is_empty_answer(Some(&Value::Null)));
        assert!(is_empty_answer(Some(&json!(""))));
        assert!(is_empty_answer(Some(&json!([]))));
        assert!(!is_empty_answer(Some(&json!(" "))));
        assert!(!is_empty_answer(Some(&json!(0))));
        assert!(!is_empty_answer(Some(&json!(false))));
        assert!(!is_empty_answer(Some(&json!({}))));
    }

    #[test]
    fn from_json_accepts_objects_only() {
        let snapshot = AnswerSnapshot::from_json(json!({"q1": "yes", "q2": []}))
            .expect("object should convert");
        assert!(snapshot.is_answered("q1"));
        assert!(!snapshot.is_answered("q2"));
        assert!(!snapshot.is_answered("q3"));
        assert!(AnswerSnapshot::from_json(json!(["q1"])).is_none());
    }
}
