//! Survey record: the top-level owner of pages, questions and rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    #[default]
    Draft,
    Open,
    Closed,
}

impl SurveyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyStatus::Draft => "draft",
            SurveyStatus::Open => "open",
            SurveyStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurveyStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(SurveyStatus::Draft),
            "open" => Ok(SurveyStatus::Open),
            "closed" => Ok(SurveyStatus::Closed),
            other => Err(format!(
                "unknown survey status `{other}` (expected draft, open or closed)"
            )),
        }
    }
}

/// A survey as supplied by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub status: SurveyStatus,
    /// Whether respondents may answer without an invitation.
    #[serde(default = "default_allow_anonymous")]
    pub allow_anonymous: bool,
    /// Invited respondents (addresses or account ids; opaque to the engine).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
}

fn default_allow_anonymous() -> bool {
    true
}

impl Survey {
    /// Create a draft survey that accepts anonymous responses.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status: SurveyStatus::Draft,
            allow_anonymous: true,
            recipients: Vec::new(),
        }
    }

    /// Whether the title carries any non-whitespace text.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Open".parse::<SurveyStatus>(), Ok(SurveyStatus::Open));
        assert_eq!(" closed ".parse::<SurveyStatus>(), Ok(SurveyStatus::Closed));
        assert!("archived".parse::<SurveyStatus>().is_err());
    }

    #[test]
    fn survey_defaults_to_anonymous_draft() {
        let raw = r#"{"id":"s-1","title":"Onboarding"}"#;
        let survey: Survey = serde_json::from_str(raw).expect("survey should parse");
        assert_eq!(survey.status, SurveyStatus::Draft);
        assert!(survey.allow_anonymous);
        assert!(survey.recipients.is_empty());
    }
}
