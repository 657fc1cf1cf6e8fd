//! Product Handler
//!
//! 产品资源的五个处理器。每个处理器只调用一次仓储：
//! - 仓储返回记录时输出对应的成功响应
//! - 按 ID 查找不到记录时输出 404 空响应
//! - 仓储调用失败时把错误原样返回，由 [`AppError`] 的 `IntoResponse` 统一处理

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::{
    api::{app_state::AppState, extract::ProductBody},
    error::AppError,
    models::product::Product,
    storage::repository::{ProductFilter, UpdateOptions},
};

fn log_failure(operation: &'static str) -> impl FnOnce(&AppError) {
    move |e| error!(operation, error = %e, "Product storage call failed")
}

fn found_or_not_found(product: Option<Product>) -> Response {
    match product {
        Some(product) => (StatusCode::OK, Json(product)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn create_product(
    State(state): State<AppState>,
    ProductBody(draft): ProductBody,
) -> Result<Response, AppError> {
    debug!("Creating product");

    let created = state
        .product_repository
        .create(draft)
        .await
        .inspect_err(log_failure("create"))?;

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn get_products(State(state): State<AppState>) -> Result<Response, AppError> {
    debug!("Listing products");

    let products = state
        .product_repository
        .find(ProductFilter::all())
        .await
        .inspect_err(log_failure("list"))?;

    Ok((StatusCode::OK, Json(products)).into_response())
}

pub async fn get_product_by_id(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Response, AppError> {
    debug!("Getting product: {}", product_id);

    let product = state
        .product_repository
        .find_by_id(&product_id)
        .await
        .inspect_err(log_failure("get"))?;

    Ok(found_or_not_found(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ProductBody(draft): ProductBody,
) -> Result<Response, AppError> {
    debug!("Updating product: {}", product_id);

    let updated = state
        .product_repository
        .find_by_id_and_update(&product_id, draft, UpdateOptions::returning_updated())
        .await
        .inspect_err(log_failure("update"))?;

    Ok(found_or_not_found(updated))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Response, AppError> {
    debug!("Deleting product: {}", product_id);

    let deleted = state
        .product_repository
        .find_by_id_and_delete(&product_id)
        .await
        .inspect_err(log_failure("delete"))?;

    Ok(found_or_not_found(deleted))
}
