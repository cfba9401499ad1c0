//! Question rows and their type-specific configuration.

use serde::{Deserialize, Serialize};

/// The input kind of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[serde(alias = "short_text")]
    ShortText,
    #[serde(alias = "long_text")]
    LongText,
    #[serde(alias = "multiple_choice")]
    MultipleChoice,
    Radio,
    #[serde(alias = "yes_no")]
    YesNo,
    #[serde(alias = "date_time")]
    DateTime,
    #[serde(alias = "file_upload")]
    FileUpload,
    #[serde(alias = "loop_group")]
    LoopGroup,
}

impl QuestionType {
    /// Whether the question is answered by picking from `options`.
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::Radio)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::ShortText => "short-text",
            QuestionType::LongText => "long-text",
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::Radio => "radio",
            QuestionType::YesNo => "yes-no",
            QuestionType::DateTime => "date-time",
            QuestionType::FileUpload => "file-upload",
            QuestionType::LoopGroup => "loop-group",
        }
    }
}

/// Repeat configuration of a loop-group question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopConfig {
    #[serde(default)]
    pub min_iterations: u32,
    #[serde(default)]
    pub max_iterations: u32,
    /// Ids of the questions repeated on every iteration.
    #[serde(default)]
    pub subquestions: Vec<String>,
}

/// A question on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub page_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_config: Option<LoopConfig>,
    #[serde(default)]
    pub order_index: i64,
}

impl Question {
    /// Create an optional question with no options.
    pub fn new(
        id: impl Into<String>,
        page_id: impl Into<String>,
        title: impl Into<String>,
        question_type: QuestionType,
    ) -> Self {
        Self {
            id: id.into(),
            page_id: page_id.into(),
            title: title.into(),
            question_type,
            required: false,
            options: Vec::new(),
            loop_config: None,
            order_index: 0,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_loop_config(mut self, config: LoopConfig) -> Self {
        self.loop_config = Some(config);
        self
    }

    pub fn with_order_index(mut self, order_index: i64) -> Self {
        self.order_index = order_index;
        self
    }
}
