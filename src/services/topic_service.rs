use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{ArticleIndex, ArticlePlan, Stage3Entry, Stage4Data, Topic},
        dto::{
            request::{ArticlePlanInput, CreateTopicRequest, SaveStage4Request, Stage4Request},
            response::Stage4Response,
        },
    },
    repositories::TopicRepository,
    services::stage4_draft::Stage3Digest,
};

pub struct TopicService {
    repository: Arc<dyn TopicRepository>,
}

impl TopicService {
    pub fn new(repository: Arc<dyn TopicRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_topic(&self, request: CreateTopicRequest) -> AppResult<Topic> {
        request.validate()?;

        let topic = Topic::new(
            request.owner_id.trim(),
            &request.title,
            &request.research_topic,
            request.article_plan.map(ArticlePlan::from),
        );
        let topic = self.repository.create(topic).await?;
        log::info!("Created topic {} for owner {}", topic.id, topic.owner_id);
        Ok(topic)
    }

    pub async fn get_topic(&self, id: &str) -> AppResult<Topic> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Topic with id '{}' not found", id)))
    }

    pub async fn list_topics(&self, owner_id: &str) -> AppResult<Vec<Topic>> {
        if owner_id.trim().is_empty() {
            return Err(AppError::ValidationError("ownerId must not be blank".to_string()));
        }
        self.repository.list_by_owner(owner_id.trim()).await
    }

    pub async fn update_article_plan(&self, id: &str, plan: ArticlePlanInput) -> AppResult<Topic> {
        plan.validate()?;

        let mut topic = self.get_topic(id).await?;
        topic.article_plan = Some(plan.into());
        topic.touch();
        self.repository.update(topic).await
    }

    /// Last write wins; an existing entry at `index` is replaced.
    pub async fn save_stage3_entry(
        &self,
        id: &str,
        index: ArticleIndex,
        entry: Stage3Entry,
    ) -> AppResult<Topic> {
        let mut topic = self.get_topic(id).await?;
        topic.set_stage3_entry(index, entry);
        let topic = self.repository.update(topic).await?;
        log::debug!("Saved stage 3 entry {} of topic {}", index, topic.id);
        Ok(topic)
    }

    pub async fn save_stage4(&self, id: &str, request: SaveStage4Request) -> AppResult<Topic> {
        let mut topic = self.get_topic(id).await?;
        topic.stage4_data = Some(Stage4Data {
            slide_idea: request.slide_idea,
            narration: request.narration,
            updated_at: Some(Utc::now()),
        });
        topic.touch();
        self.repository.update(topic).await
    }

    /// Stage 4 input assembled from the topic's saved Stage 3 notes.
    pub async fn stage4_request(&self, id: &str) -> AppResult<Stage4Request> {
        let topic = self.get_topic(id).await?;
        Ok(Stage3Digest::from_topic(&topic).to_stage4_request())
    }

    pub async fn stage4_draft(&self, id: &str) -> AppResult<Stage4Response> {
        let topic = self.get_topic(id).await?;
        Ok(Stage3Digest::from_topic(&topic).draft())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repositories::topic_repository::MockTopicRepository, test_utils::fixtures};

    fn service_with(repository: MockTopicRepository) -> TopicService {
        TopicService::new(Arc::new(repository))
    }

    #[actix_web::test]
    async fn test_create_topic_rejects_blank_title_without_touching_repository() {
        let mut repository = MockTopicRepository::new();
        repository.expect_create().never();
        let service = service_with(repository);

        let result = service
            .create_topic(CreateTopicRequest {
                owner_id: "owner-1".into(),
                title: "  ".into(),
                research_topic: "Why cafes?".into(),
                article_plan: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_create_topic_trims_and_persists() {
        let mut repository = MockTopicRepository::new();
        repository
            .expect_create()
            .withf(|topic| topic.title == "Coffee shops" && topic.article_plan.is_some())
            .times(1)
            .returning(|topic| Ok(topic));
        let service = service_with(repository);

        let topic = service
            .create_topic(CreateTopicRequest {
                owner_id: "owner-1".into(),
                title: " Coffee shops ".into(),
                research_topic: "Why cafes?".into(),
                article_plan: Some(ArticlePlanInput {
                    research_plan: "Plan".into(),
                    titles: vec!["A".into(), "".into()],
                }),
            })
            .await
            .unwrap();

        assert_eq!(topic.article_titles(), vec!["A"]);
        assert!(topic.stage3_data.is_empty());
    }

    #[actix_web::test]
    async fn test_get_missing_topic_is_not_found() {
        let mut repository = MockTopicRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        let service = service_with(repository);

        let result = service.get_topic("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_save_stage3_entry_replaces_existing() {
        let topic = fixtures::topic_with_stage3();
        let id = topic.id.clone();

        let mut repository = MockTopicRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(topic.clone())));
        repository
            .expect_update()
            .times(1)
            .returning(|topic| Ok(topic));
        let service = service_with(repository);

        let index = ArticleIndex::new(0).unwrap();
        let updated = service
            .save_stage3_entry(
                &id,
                index,
                Stage3Entry {
                    summary: "rewritten".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let entry = updated.stage3_entry(index).unwrap();
        assert_eq!(entry.summary, "rewritten");
        assert!(entry.full.is_empty());
    }

    #[actix_web::test]
    async fn test_save_stage4_stamps_time() {
        let topic = fixtures::topic_with_stage3();
        let mut repository = MockTopicRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(topic.clone())));
        repository.expect_update().returning(|topic| Ok(topic));
        let service = service_with(repository);

        let updated = service
            .save_stage4(
                "any",
                SaveStage4Request {
                    slide_idea: "Slide 1".into(),
                    narration: "Hello".into(),
                },
            )
            .await
            .unwrap();

        let stage4 = updated.stage4_data.unwrap();
        assert_eq!(stage4.narration, "Hello");
        assert!(stage4.updated_at.is_some());
    }

    #[actix_web::test]
    async fn test_stage4_request_aggregates_saved_notes() {
        let topic = fixtures::topic_with_stage3();
        let mut repository = MockTopicRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(topic.clone())));
        let service = service_with(repository);

        let request = service.stage4_request("any").await.unwrap();
        assert_eq!(request.research_question, "Why do students prefer specific coffee shops?");
        assert!(request.summaries_all.contains("Students like quiet cafes."));
        assert_eq!(request.glossary_all.matches("wifi").count(), 1);
    }

    #[actix_web::test]
    async fn test_list_topics_requires_owner() {
        let mut repository = MockTopicRepository::new();
        repository.expect_list_by_owner().never();
        let service = service_with(repository);

        let result = service.list_topics(" ").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
