use once_cell::sync::Lazy;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::domain::{ArticlePlan, Stage3Entry};

static VOICE_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[A-Za-z]{2,3}-[A-Za-z]{2,4}-[A-Za-z0-9]+$")
        .expect("VOICE_REGEX is a valid regex pattern")
});

static RATE_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^(?:[+-]?\d{1,3}(?:\.\d+)?%|x-slow|slow|medium|fast|x-fast|default)$")
        .expect("RATE_REGEX is a valid regex pattern")
});

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

fn validate_voice(value: &str) -> Result<(), ValidationError> {
    if VOICE_REGEX.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("voice").with_message("must look like en-US-JennyNeural".into()))
    }
}

fn validate_rate(value: &str) -> Result<(), ValidationError> {
    if RATE_REGEX.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("rate").with_message("must be a percentage such as -10%".into()))
    }
}

/// Trimmed optional field; blank counts as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExplainRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResearchQuestionsRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub topic: String,

    #[serde(default)]
    pub keywords: Option<String>,
}

impl ResearchQuestionsRequest {
    pub fn keywords(&self) -> Option<&str> {
        present(&self.keywords)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePlanRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub topic: String,

    #[serde(default)]
    pub keywords: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub research_topic: String,
}

impl ArticlePlanRequest {
    pub fn keywords(&self) -> Option<&str> {
        present(&self.keywords)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub research_topic: String,

    #[serde(default)]
    #[validate(range(max = 9))]
    pub index: Option<u8>,
}

/// Everything the slide planner may use. All fields are optional: the prompt
/// substitutes placeholders for anything the student has not written yet.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Stage4Request {
    pub topic_title: String,
    pub research_question: String,
    #[validate(length(max = 10))]
    pub article_titles: Vec<String>,
    pub key_findings_all: String,
    pub summaries_all: String,
    pub glossary_all: String,
    pub articles_all: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TtsRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"), length(max = 5000))]
    pub text: String,

    #[serde(default)]
    #[validate(custom(function = "validate_voice"))]
    pub voice: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_rate"))]
    pub rate: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ArticlePlanInput {
    #[serde(default)]
    pub research_plan: String,

    #[serde(default)]
    #[validate(length(max = 10))]
    pub titles: Vec<String>,
}

impl From<ArticlePlanInput> for ArticlePlan {
    fn from(input: ArticlePlanInput) -> Self {
        ArticlePlan::new(&input.research_plan, input.titles)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub owner_id: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"), length(max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"), length(max = 500))]
    pub research_topic: String,

    #[serde(default)]
    #[validate(nested)]
    pub article_plan: Option<ArticlePlanInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveStage3Request {
    pub full: String,
    pub simple: String,
    pub summary: String,
    pub key_findings: String,
    pub glossary: String,
}

impl From<SaveStage3Request> for Stage3Entry {
    fn from(request: SaveStage3Request) -> Self {
        Stage3Entry {
            full: request.full,
            simple: request.simple,
            summary: request.summary,
            key_findings: request.key_findings,
            glossary: request.glossary,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveStage4Request {
    pub slide_idea: String,
    pub narration: String,
}
