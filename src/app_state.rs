use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoTopicRepository, TopicRepository},
    services::{
        model_service::{ChatModel, OpenAiChatModel},
        speech_service::{AzureSpeechSynthesizer, SpeechSynthesizer},
        AssistantService, SpeechService, TopicService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub assistant_service: Arc<AssistantService>,
    pub speech_service: Arc<SpeechService>,
    pub topic_service: Arc<TopicService>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let topic_repository = Arc::new(MongoTopicRepository::new(&db, &config.topics_collection));
        topic_repository.ensure_indexes().await?;

        let chat_model = Arc::new(OpenAiChatModel::new(&config));
        let synthesizer = Arc::new(AzureSpeechSynthesizer::new(&config));

        Ok(Self::from_parts(chat_model, synthesizer, topic_repository))
    }

    /// Wires the services around already-built providers.
    pub fn from_parts(
        chat_model: Arc<dyn ChatModel>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        topic_repository: Arc<dyn TopicRepository>,
    ) -> Self {
        Self {
            assistant_service: Arc::new(AssistantService::new(chat_model)),
            speech_service: Arc::new(SpeechService::new(synthesizer)),
            topic_service: Arc::new(TopicService::new(topic_repository)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
