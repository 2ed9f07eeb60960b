#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use research_coach_server::{
    errors::{AppError, AppResult},
    models::domain::Topic,
    repositories::TopicRepository,
    services::model_service::{ChatModel, ChatRequest},
};

pub struct InMemoryTopicRepository {
    topics: Arc<RwLock<HashMap<String, Topic>>>,
}

impl InMemoryTopicRepository {
    pub fn new() -> Self {
        Self {
            topics: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl TopicRepository for InMemoryTopicRepository {
    async fn create(&self, topic: Topic) -> AppResult<Topic> {
        let mut topics = self.topics.write().await;
        if topics.contains_key(&topic.id) {
            return Err(AppError::DatabaseError(format!(
                "Topic with id '{}' already exists",
                topic.id
            )));
        }
        topics.insert(topic.id.clone(), topic.clone());
        Ok(topic)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Topic>> {
        let topics = self.topics.read().await;
        Ok(topics.get(id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<Topic>> {
        let topics = self.topics.read().await;
        let mut items: Vec<_> = topics
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update(&self, topic: Topic) -> AppResult<Topic> {
        let mut topics = self.topics.write().await;
        match topics.get_mut(&topic.id) {
            Some(existing) => {
                *existing = topic.clone();
                Ok(topic)
            }
            None => Err(AppError::NotFound(format!(
                "Topic with id '{}' not found",
                topic.id
            ))),
        }
    }
}

/// Replays canned replies in order and records every request it saw.
pub struct ScriptedChatModel {
    replies: Mutex<VecDeque<AppResult<String>>>,
    pub seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChatModel {
    pub fn new(replies: impl IntoIterator<Item = AppResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())))
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn complete(&self, request: ChatRequest) -> AppResult<String> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::ProviderError("no scripted reply left".into())))
    }
}
