//! Two-tier editing state for a topic's Stage 3 notes. Drafts live in a
//! local store until they are synced into the persisted topic.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{ArticleIndex, Stage3Entry, Topic},
        dto::response::ArticleResponse,
    },
    services::topic_service::TopicService,
};

#[cfg_attr(test, mockall::automock)]
pub trait LocalStage3Store: Send + Sync {
    fn load(&self, topic_id: &str, index: ArticleIndex) -> AppResult<Option<Stage3Entry>>;
    fn save(&self, topic_id: &str, index: ArticleIndex, entry: Stage3Entry) -> AppResult<()>;
    fn remove(&self, topic_id: &str, index: ArticleIndex) -> AppResult<()>;
}

#[derive(Default)]
pub struct InMemoryLocalStore {
    entries: RwLock<HashMap<(String, ArticleIndex), Stage3Entry>>,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::InternalError("local stage 3 store lock poisoned".to_string())
}

impl LocalStage3Store for InMemoryLocalStore {
    fn load(&self, topic_id: &str, index: ArticleIndex) -> AppResult<Option<Stage3Entry>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(&(topic_id.to_string(), index)).cloned())
    }

    fn save(&self, topic_id: &str, index: ArticleIndex, entry: Stage3Entry) -> AppResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert((topic_id.to_string(), index), entry);
        Ok(())
    }

    fn remove(&self, topic_id: &str, index: ArticleIndex) -> AppResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(&(topic_id.to_string(), index));
        Ok(())
    }
}

/// Where a hydrated entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
    Local,
    Remote,
    Empty,
}

/// Editing session over one topic. Only `sync` writes to the topic store.
pub struct Stage3Workspace {
    topic_id: String,
    local: Arc<dyn LocalStage3Store>,
    topics: Arc<TopicService>,
    drafts: HashMap<ArticleIndex, Stage3Entry>,
}

impl Stage3Workspace {
    pub fn new(
        topic_id: impl Into<String>,
        local: Arc<dyn LocalStage3Store>,
        topics: Arc<TopicService>,
    ) -> Self {
        Self {
            topic_id: topic_id.into(),
            local,
            topics,
            drafts: HashMap::new(),
        }
    }

    /// Loads the draft for `index`: local tier first, then the persisted
    /// topic, then an empty entry.
    pub async fn hydrate(&mut self, index: ArticleIndex) -> AppResult<(Stage3Entry, EntrySource)> {
        let (entry, source) = match self.local.load(&self.topic_id, index)? {
            Some(entry) => (entry, EntrySource::Local),
            None => {
                let topic = self.topics.get_topic(&self.topic_id).await?;
                match topic.stage3_entry(index) {
                    Some(entry) => (entry.clone(), EntrySource::Remote),
                    None => (Stage3Entry::default(), EntrySource::Empty),
                }
            }
        };

        self.drafts.insert(index, entry.clone());
        Ok((entry, source))
    }

    pub fn draft(&self, index: ArticleIndex) -> Option<&Stage3Entry> {
        self.drafts.get(&index)
    }

    async fn ensure_draft(&mut self, index: ArticleIndex) -> AppResult<&mut Stage3Entry> {
        if !self.drafts.contains_key(&index) {
            self.hydrate(index).await?;
        }
        Ok(self.drafts.entry(index).or_default())
    }

    /// Applies `apply` to the draft, hydrating it first if needed. The local
    /// tier is only written by `save_local`.
    pub async fn edit(
        &mut self,
        index: ArticleIndex,
        apply: impl FnOnce(&mut Stage3Entry),
    ) -> AppResult<Stage3Entry> {
        let entry = self.ensure_draft(index).await?;
        apply(&mut *entry);
        Ok(entry.clone())
    }

    /// Copies a generated article's texts into the draft, keeping the notes,
    /// and writes the result to the local tier immediately.
    pub async fn accept_generated_article(
        &mut self,
        index: ArticleIndex,
        article: &ArticleResponse,
    ) -> AppResult<Stage3Entry> {
        let entry = self
            .edit(index, |entry| {
                entry.full = article.full.clone();
                entry.simple = article.simple.clone();
            })
            .await?;
        self.save_local(index)?;
        Ok(entry)
    }

    /// Writes the draft to the local tier. Without a draft there is nothing
    /// to save and the local tier is left alone.
    pub fn save_local(&self, index: ArticleIndex) -> AppResult<()> {
        match self.drafts.get(&index) {
            Some(entry) => self.local.save(&self.topic_id, index, entry.clone()),
            None => {
                log::debug!("No draft for entry {} of topic {}", index, self.topic_id);
                Ok(())
            }
        }
    }

    /// Pushes the draft (or the local copy) into the persisted topic and
    /// drops the local copy. With neither, the persisted entry is kept as is.
    pub async fn sync(&mut self, index: ArticleIndex) -> AppResult<Topic> {
        let entry = match self.drafts.get(&index) {
            Some(entry) => Some(entry.clone()),
            None => self.local.load(&self.topic_id, index)?,
        };

        let Some(entry) = entry else {
            log::debug!("Nothing to sync for entry {} of topic {}", index, self.topic_id);
            return self.topics.get_topic(&self.topic_id).await;
        };

        let topic = self
            .topics
            .save_stage3_entry(&self.topic_id, index, entry)
            .await?;
        self.local.remove(&self.topic_id, index)?;
        log::info!("Synced stage 3 entry {} of topic {}", index, self.topic_id);
        Ok(topic)
    }
}
