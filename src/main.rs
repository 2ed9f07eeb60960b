use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use research_coach_server::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    config.report_missing_credentials();

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let allowed_origin = config.cors_allowed_origin.clone();

    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let state = web::Data::new(Arc::new(state));

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                "%a \"%r\" %s %b %T request_id=%{x-request-id}o",
            ))
            .wrap(cors)
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
