use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    handlers::log_failure,
    models::dto::request::{
        ArticlePlanRequest, ArticleRequest, ExplainRequest, ResearchQuestionsRequest,
        Stage4Request,
    },
};

pub async fn explain(
    state: web::Data<Arc<AppState>>,
    request: web::Json<ExplainRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .assistant_service
        .explain(request.into_inner())
        .await
        .inspect_err(log_failure("explain"))?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn generate_research_questions(
    state: web::Data<Arc<AppState>>,
    request: web::Json<ResearchQuestionsRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .assistant_service
        .research_questions(request.into_inner())
        .await
        .inspect_err(log_failure("generate-research-questions"))?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn generate_article_plan(
    state: web::Data<Arc<AppState>>,
    request: web::Json<ArticlePlanRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .assistant_service
        .article_plan(request.into_inner())
        .await
        .inspect_err(log_failure("generate-article-plan"))?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn generate_article(
    state: web::Data<Arc<AppState>>,
    request: web::Json<ArticleRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .assistant_service
        .article(request.into_inner())
        .await
        .inspect_err(log_failure("generate-article"))?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn generate_stage4(
    state: web::Data<Arc<AppState>>,
    request: web::Json<Stage4Request>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .assistant_service
        .stage4(request.into_inner())
        .await
        .inspect_err(log_failure("generate-stage4"))?;
    Ok(HttpResponse::Ok().json(response))
}
