//! Router assembly.

mod common;
mod modules;

pub use common::common_routes;
pub use modules::module_routes;

use crate::handlers::chat::chat;
use crate::settings::Settings;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::post, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// POST /api/chat.
pub fn chat_routes() -> Router {
    Router::new().route("/api/chat", post(chat))
}

/// Full application: common routes, `/api/v1` catalogue and records, chat.
pub fn build_router(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/v1", module_routes(state))
        .merge(chat_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(settings.body_limit)),
        )
}
