use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

use crate::{
    handlers::{echo, notes, proxy, session, upload},
    middleware, AppState,
};

pub fn router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;

    Router::new()
        .route("/api/login", post(session::login))
        .route("/api/profile", get(session::profile))
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route("/api/proxy", get(proxy::proxy))
        .route(
            "/api/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/echo-yaml", post(echo::echo_yaml))
        .route("/uploads/*path", get(upload::serve_upload))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(middleware::log_request))
                .layer(from_fn(middleware::response_headers))
                .layer(from_fn(middleware::cors)),
        )
        .with_state(state)
}
