use axum::{Extension, Router};
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    add_audio_handler, create_folder_handler, delete_audio_handler, delete_folder_handler,
    get_audio_handler, get_folder_handler, health_handler, liked_folders_handler,
    list_audio_handler, my_audio_handler, random_audio_handler, remove_audio_handler,
    rename_folder_handler, search_audio_handler, search_folder_handler, toggle_like_handler,
    TrustProxyHeaders, upload_file_handler, upload_link_handler,
};
use crate::presentation::state::AppState;

/// Upper bound on a multipart upload body.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let proxy_trust = TrustProxyHeaders(state.trust_proxy_headers);

    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1/audio", audio_routes())
        .nest("/v1/folder", folder_routes())
        .layer(Extension(proxy_trust))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

fn audio_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/file",
            post(upload_file_handler).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/link", post(upload_link_handler))
        .route("/search", get(search_audio_handler))
        .route("/main", get(list_audio_handler))
        .route("/random", get(random_audio_handler))
        .route("/my-audios", get(my_audio_handler))
        .route(
            "/{audio_id}",
            get(get_audio_handler).delete(delete_audio_handler),
        )
}

fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_folder_handler))
        .route("/search", get(search_folder_handler))
        .route("/liked", get(liked_folders_handler))
        .route("/like/{folder_id}", post(toggle_like_handler))
        .route(
            "/{folder_id}",
            get(get_folder_handler)
                .patch(rename_folder_handler)
                .delete(delete_folder_handler),
        )
        .route(
            "/{folder_id}/{audio_id}",
            post(add_audio_handler).delete(remove_audio_handler),
        )
}
