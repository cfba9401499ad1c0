//! Page rows.

use serde::{Deserialize, Serialize};

/// One page of a survey. Owns zero or more questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub survey_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub order_index: i64,
}

impl Page {
    pub fn new(id: impl Into<String>, title: impl Into<String>, order_index: i64) -> Self {
        Self {
            id: id.into(),
            survey_id: String::new(),
            title: title.into(),
            order_index,
        }
    }
}
