use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    handlers::log_failure,
    models::{
        domain::ArticleIndex,
        dto::request::{ArticlePlanInput, CreateTopicRequest, SaveStage3Request, SaveStage4Request},
    },
};

pub async fn create_topic(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateTopicRequest>,
) -> Result<HttpResponse, AppError> {
    let topic = state
        .topic_service
        .create_topic(request.into_inner())
        .await
        .inspect_err(log_failure("create-topic"))?;
    Ok(HttpResponse::Created().json(topic))
}

pub async fn get_topic(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let topic = state
        .topic_service
        .get_topic(&id)
        .await
        .inspect_err(log_failure("get-topic"))?;
    Ok(HttpResponse::Ok().json(topic))
}

pub async fn list_owner_topics(
    state: web::Data<Arc<AppState>>,
    owner_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let topics = state
        .topic_service
        .list_topics(&owner_id)
        .await
        .inspect_err(log_failure("list-topics"))?;
    Ok(HttpResponse::Ok().json(topics))
}

pub async fn update_article_plan(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<ArticlePlanInput>,
) -> Result<HttpResponse, AppError> {
    let topic = state
        .topic_service
        .update_article_plan(&id, request.into_inner())
        .await
        .inspect_err(log_failure("update-article-plan"))?;
    Ok(HttpResponse::Ok().json(topic))
}

pub async fn save_stage3_entry(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, u8)>,
    request: web::Json<SaveStage3Request>,
) -> Result<HttpResponse, AppError> {
    let (id, index) = path.into_inner();
    let index = ArticleIndex::new(index)?;

    let topic = state
        .topic_service
        .save_stage3_entry(&id, index, request.into_inner().into())
        .await
        .inspect_err(log_failure("save-stage3"))?;
    Ok(HttpResponse::Ok().json(topic))
}

pub async fn save_stage4(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<SaveStage4Request>,
) -> Result<HttpResponse, AppError> {
    let topic = state
        .topic_service
        .save_stage4(&id, request.into_inner())
        .await
        .inspect_err(log_failure("save-stage4"))?;
    Ok(HttpResponse::Ok().json(topic))
}

pub async fn stage4_draft(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let draft = state
        .topic_service
        .stage4_draft(&id)
        .await
        .inspect_err(log_failure("stage4-draft"))?;
    Ok(HttpResponse::Ok().json(draft))
}

/// Runs the slide planner over the topic's saved Stage 3 notes.
pub async fn generate_stage4_from_topic(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let request = state
        .topic_service
        .stage4_request(&id)
        .await
        .inspect_err(log_failure("generate-stage4"))?;
    let response = state
        .assistant_service
        .stage4(request)
        .await
        .inspect_err(log_failure("generate-stage4"))?;
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        handlers::configure,
        repositories::topic_repository::MockTopicRepository,
        services::{model_service::MockChatModel, speech_service::MockSpeechSynthesizer},
        test_utils::{fixtures, test_helpers::assert_success_status},
    };
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn state_with(repository: MockTopicRepository, model: MockChatModel) -> Arc<AppState> {
        Arc::new(AppState::from_parts(
            Arc::new(model),
            Arc::new(MockSpeechSynthesizer::new()),
            Arc::new(repository),
        ))
    }

    fn repository_with_fixture() -> MockTopicRepository {
        let topic = fixtures::topic_with_stage3();
        let mut repository = MockTopicRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(topic.clone())));
        repository.expect_update().returning(|topic| Ok(topic));
        repository
    }

    #[actix_web::test]
    async fn test_create_topic_returns_201() {
        let mut repository = MockTopicRepository::new();
        repository.expect_create().times(1).returning(|topic| Ok(topic));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(repository, MockChatModel::new())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/topics")
            .set_json(json!({
                "ownerId": "owner-1",
                "title": "Coffee shops",
                "researchTopic": "Why do students prefer specific coffee shops?"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["owner_id"], "owner-1");
        assert!(body["id"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_unknown_topic_is_404() {
        let mut repository = MockTopicRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(repository, MockChatModel::new())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/topics/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_save_stage3_entry_uses_camel_case_body() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(
                    repository_with_fixture(),
                    MockChatModel::new(),
                )))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/topics/any/stage3/4")
            .set_json(json!({ "summary": "New", "keyFindings": "Point" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["stage3_data"]["4"]["keyFindings"], "Point");
    }

    #[actix_web::test]
    async fn test_stage3_index_out_of_range_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(
                    MockTopicRepository::new(),
                    MockChatModel::new(),
                )))
                .configure(configure),
        )
        .await;

        for uri in ["/api/topics/any/stage3/10", "/api/topics/any/stage3/first"] {
            let req = test::TestRequest::put()
                .uri(uri)
                .set_json(json!({ "summary": "x" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_stage4_draft_needs_no_model() {
        let mut model = MockChatModel::new();
        model.expect_complete().never();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(repository_with_fixture(), model)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/topics/any/stage4/draft")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let slides = body["slideIdea"].as_str().unwrap();
        assert!(slides.contains("Why do students prefer specific coffee shops?"));
        assert!(slides.contains("- barista: person who makes coffee"));
        assert_eq!(body["imagePrompts"].as_array().unwrap().len(), 6);
    }

    #[actix_web::test]
    async fn test_generate_stage4_from_topic_sends_saved_notes() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .withf(|chat| {
                chat.label == "stage4"
                    && chat.user.contains("Students like quiet cafes.")
                    && chat.user.contains("1. Coffee shop article 1")
            })
            .times(1)
            .returning(|_| Ok("SLIDE_IDEA\nSlide 1\nNARRATION\nHello".to_string()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(repository_with_fixture(), model)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/topics/any/stage4/generate")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["slideIdea"], "Slide 1");
        assert_eq!(body["narration"], "Hello");
    }

    #[actix_web::test]
    async fn test_topic_routes_reject_wrong_method() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(
                    MockTopicRepository::new(),
                    MockChatModel::new(),
                )))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::delete().uri("/api/topics/any").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let req = test::TestRequest::post().uri("/api/topics/any/stage4").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
