use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Topic,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn create(&self, topic: Topic) -> AppResult<Topic>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Topic>>;
    /// Newest first.
    async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<Topic>>;
    async fn update(&self, topic: Topic) -> AppResult<Topic>;
}

pub struct MongoTopicRepository {
    collection: Collection<Topic>,
}

impl MongoTopicRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for topics collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let owner_index = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("owner_created".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(owner_index).await?;

        log::info!("Successfully created indexes for topics collection");
        Ok(())
    }
}

#[async_trait]
impl TopicRepository for MongoTopicRepository {
    async fn create(&self, topic: Topic) -> AppResult<Topic> {
        self.collection.insert_one(&topic).await?;
        Ok(topic)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Topic>> {
        let topic = self.collection.find_one(doc! { "id": id }).await?;
        Ok(topic)
    }

    async fn list_by_owner(&self, owner_id: &str) -> AppResult<Vec<Topic>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "owner_id": owner_id })
            .with_options(find_options)
            .await?;
        let topics: Vec<Topic> = cursor.try_collect().await?;
        Ok(topics)
    }

    async fn update(&self, topic: Topic) -> AppResult<Topic> {
        let result = self
            .collection
            .replace_one(doc! { "id": &topic.id }, &topic)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Topic with id '{}' not found",
                topic.id
            )));
        }
        Ok(topic)
    }
}
