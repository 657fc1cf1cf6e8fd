//! API 模块
//!
//! 提供 REST API 支持。

pub mod app_state;
pub mod extract;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new().merge(routes::product_routes::create_product_router());

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
