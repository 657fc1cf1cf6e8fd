//! Product Routes
//!
//! 定义产品资源的 CRUD 路由。

use axum::{Router, routing::get};

use crate::api::app_state::AppState;
use crate::api::handlers::product_handler::*;

/// 创建产品路由器
pub fn create_product_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(get_products).post(create_product))
        .route(
            "/products/:productId",
            get(get_product_by_id)
                .put(update_product)
                .delete(delete_product),
        )
}
