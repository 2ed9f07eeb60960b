use std::sync::Arc;

use actix_web::{http::header, web, HttpResponse};

use crate::{
    app_state::AppState, errors::AppError, handlers::log_failure,
    models::dto::request::TtsRequest,
};

pub async fn text_to_speech(
    state: web::Data<Arc<AppState>>,
    request: web::Json<TtsRequest>,
) -> Result<HttpResponse, AppError> {
    let audio = state
        .speech_service
        .speak(request.into_inner())
        .await
        .inspect_err(log_failure("tts"))?;

    Ok(HttpResponse::Ok()
        .content_type("audio/mpeg")
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(audio))
}
