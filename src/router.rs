use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::endpoint::Endpoint;
use crate::handlers::{
    chat_handler, edit_image_handler, enhance_prompt_handler, generate_image_handler,
    health_handler, image_to_prompt_handler, metrics_handler, remix_images_handler,
};
use crate::state::SharedState;

pub fn build(state: SharedState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(&Endpoint::Chat.path(), post(chat_handler))
        .route(&Endpoint::EditImage.path(), post(edit_image_handler))
        .route(&Endpoint::GenerateImage.path(), post(generate_image_handler))
        .route(&Endpoint::EnhancePrompt.path(), post(enhance_prompt_handler))
        .route(&Endpoint::ImageToPrompt.path(), post(image_to_prompt_handler))
        .route(&Endpoint::RemixImages.path(), post(remix_images_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // images arrive base64 encoded, axum's 2MB default is far too small
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Browser clients call from any origin. The layer answers every OPTIONS request itself
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}
