pub mod assist_handler;
pub mod health_handler;
pub mod speech_handler;
pub mod topic_handler;

use actix_web::{web, HttpRequest, HttpResponse};

use crate::{errors::AppError, middleware::get_request_id};

const MAX_JSON_BODY: usize = 2 * 1024 * 1024;

/// Malformed or missing JSON bodies become validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY)
        .error_handler(|err, req| {
            log::warn!(
                "Rejected body for {} {} (request {}): {}",
                req.method(),
                req.path(),
                get_request_id(req).unwrap_or_default(),
                err
            );
            AppError::ValidationError(err.to_string()).into()
        })
}

/// Unparsable path segments become validation errors.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, AppError> {
    log::warn!(
        "{} {} is not allowed (request {})",
        req.method(),
        req.path(),
        get_request_id(&req).unwrap_or_default()
    );
    Err(AppError::MethodNotAllowed(format!(
        "{} is not supported on {}",
        req.method(),
        req.path()
    )))
}

pub(crate) fn log_failure(operation: &'static str) -> impl Fn(&AppError) {
    move |err: &AppError| log::error!("{} failed: {}", operation, err)
}

fn post_only<F, Args>(path: &str, handler: F) -> actix_web::Resource
where
    F: actix_web::Handler<Args>,
    Args: actix_web::FromRequest + 'static,
    F::Output: actix_web::Responder + 'static,
{
    web::resource(path)
        .route(web::post().to(handler))
        .default_service(web::to(method_not_allowed))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(
            web::resource("/health")
                .route(web::get().to(health_handler::health_check))
                .default_service(web::to(method_not_allowed)),
        )
        .service(post_only("/api/explain", assist_handler::explain))
        .service(post_only(
            "/api/generate-research-questions",
            assist_handler::generate_research_questions,
        ))
        .service(post_only(
            "/api/generate-article-plan",
            assist_handler::generate_article_plan,
        ))
        .service(post_only("/api/generate-article", assist_handler::generate_article))
        .service(post_only("/api/generate-stage4", assist_handler::generate_stage4))
        .service(post_only("/api/tts", speech_handler::text_to_speech))
        .service(post_only("/api/topics", topic_handler::create_topic))
        .service(
            web::resource("/api/topics/{id}")
                .route(web::get().to(topic_handler::get_topic))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/api/owners/{owner_id}/topics")
                .route(web::get().to(topic_handler::list_owner_topics))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/api/topics/{id}/article-plan")
                .route(web::put().to(topic_handler::update_article_plan))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/api/topics/{id}/stage3/{index}")
                .route(web::put().to(topic_handler::save_stage3_entry))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/api/topics/{id}/stage4")
                .route(web::put().to(topic_handler::save_stage4))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/api/topics/{id}/stage4/draft")
                .route(web::get().to(topic_handler::stage4_draft))
                .default_service(web::to(method_not_allowed)),
        )
        .service(post_only(
            "/api/topics/{id}/stage4/generate",
            topic_handler::generate_stage4_from_topic,
        ));
}
