use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Number of articles planned per topic.
pub const ARTICLE_COUNT: usize = 10;

/// Position of an article inside a topic's plan, always in `0..ARTICLE_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ArticleIndex(u8);

impl ArticleIndex {
    pub fn new(index: u8) -> AppResult<Self> {
        if (index as usize) < ARTICLE_COUNT {
            Ok(Self(index))
        } else {
            Err(AppError::ValidationError(format!(
                "article index {} is out of range 0..={}",
                index,
                ARTICLE_COUNT - 1
            )))
        }
    }

    pub fn all() -> impl Iterator<Item = ArticleIndex> {
        (0..ARTICLE_COUNT as u8).map(ArticleIndex)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Key used inside `stage3_data`; document stores need string keys.
    pub fn key(self) -> String {
        self.0.to_string()
    }
}

impl TryFrom<u8> for ArticleIndex {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ArticleIndex::new(value)
    }
}

impl From<ArticleIndex> for u8 {
    fn from(index: ArticleIndex) -> Self {
        index.0
    }
}

impl std::fmt::Display for ArticleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticlePlan {
    pub research_plan: String,
    pub titles: Vec<String>,
}

impl ArticlePlan {
    /// Trims titles, drops blanks and keeps at most `ARTICLE_COUNT`.
    pub fn new(research_plan: &str, titles: impl IntoIterator<Item = String>) -> Self {
        ArticlePlan {
            research_plan: research_plan.trim().to_string(),
            titles: titles
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .take(ARTICLE_COUNT)
                .collect(),
        }
    }

    pub fn title(&self, index: ArticleIndex) -> Option<&str> {
        self.titles.get(index.value() as usize).map(String::as_str)
    }
}

/// A student's reading notes for one article.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stage3Entry {
    pub full: String,
    pub simple: String,
    pub summary: String,
    pub key_findings: String,
    pub glossary: String,
}

impl Stage3Entry {
    pub fn is_empty(&self) -> bool {
        self.full.trim().is_empty()
            && self.simple.trim().is_empty()
            && self.summary.trim().is_empty()
            && self.key_findings.trim().is_empty()
            && self.glossary.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage4Data {
    #[serde(default)]
    pub slide_idea: String,
    #[serde(default)]
    pub narration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Topic {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub research_topic: String,
    pub article_plan: Option<ArticlePlan>,
    #[serde(default)]
    pub stage3_data: BTreeMap<String, Stage3Entry>,
    pub stage4_data: Option<Stage4Data>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Topic {
    pub fn new(
        owner_id: &str,
        title: &str,
        research_topic: &str,
        article_plan: Option<ArticlePlan>,
    ) -> Self {
        let now = Utc::now();
        Topic {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: title.trim().to_string(),
            research_topic: research_topic.trim().to_string(),
            article_plan,
            stage3_data: BTreeMap::new(),
            stage4_data: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn stage3_entry(&self, index: ArticleIndex) -> Option<&Stage3Entry> {
        self.stage3_data.get(&index.key())
    }

    pub fn set_stage3_entry(&mut self, index: ArticleIndex, entry: Stage3Entry) {
        self.stage3_data.insert(index.key(), entry);
        self.touch();
    }

    /// Stage 3 entries in article order, skipping keys outside the valid range.
    pub fn stage3_entries(&self) -> Vec<(ArticleIndex, &Stage3Entry)> {
        ArticleIndex::all()
            .filter_map(|index| self.stage3_entry(index).map(|entry| (index, entry)))
            .collect()
    }

    pub fn article_titles(&self) -> Vec<String> {
        self.article_plan
            .as_ref()
            .map(|plan| plan.titles.clone())
            .unwrap_or_default()
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
