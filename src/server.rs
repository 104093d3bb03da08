//! Browser front end: an upload page plus endpoints that run a generation
//! for a raw image body and answer with either an HTML grid or JSON.

use crate::{
    config::ServerConfig,
    error::ViewsError,
    gemini::ImageGenerator,
    orchestrator::ViewOrchestrator,
    render,
};
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{
    get, middleware, post, web, App, HttpResponse, HttpServer, Responder, ResponseError,
};
use std::collections::HashMap;
use std::sync::Arc;

pub type SharedOrchestrator = ViewOrchestrator<Arc<dyn ImageGenerator>>;

/// Upload bodies above this size are rejected before encoding.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug)]
pub struct WebError {
    err: ViewsError,
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let err = HashMap::from([("errors", vec![self.to_string()])]);

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(err)
    }

    fn status_code(&self) -> StatusCode {
        match self.err {
            ViewsError::DecodeError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ViewsError> for WebError {
    fn from(err: ViewsError) -> WebError {
        WebError { err }
    }
}

type Result<T> = std::result::Result<T, WebError>;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render::index_page())
}

#[get("/skeleton")]
pub async fn skeleton() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render::render_skeleton_html())
}

#[get("/health")]
pub async fn health() -> impl Responder {
    web::Json(HashMap::from([("status", "ok")]))
}

/// Generate and answer with the HTML grid, or a lone error message.
#[post("/generate")]
pub async fn generate_html(
    body: web::Bytes,
    state: web::Data<SharedOrchestrator>,
) -> impl Responder {
    match state.generate_from_bytes(&body).await {
        Ok(run) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(render::render_grid_html(&run)),
        Err(e) => {
            log::warn!("Rejected upload: {}", e);
            let err = WebError::from(e);
            HttpResponse::build(err.status_code())
                .content_type(ContentType::html())
                .body(render::render_error_html(&err.to_string()))
        }
    }
}

#[post("/api/views")]
pub async fn generate_json(
    body: web::Bytes,
    state: web::Data<SharedOrchestrator>,
) -> Result<impl Responder> {
    let run = state.generate_from_bytes(&body).await?;
    Ok(web::Json(run))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
        .service(index)
        .service(skeleton)
        .service(health)
        .service(generate_html)
        .service(generate_json);
}

pub async fn run_server(
    orchestrator: SharedOrchestrator,
    config: ServerConfig,
) -> std::io::Result<()> {
    let state = web::Data::new(orchestrator);

    log::info!("🌐 Server will run on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
