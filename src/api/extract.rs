//! 请求体提取
//!
//! 请求体交给存储层校验，这里只负责把它变成 [`ProductDraft`]：
//! 非 JSON 请求和空请求体视为空对象，无法解析的 JSON 转为 [`AppError::Validation`]，
//! 与存储层的失败走同一个错误映射。

use axum::{
    Json, async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use tracing::debug;

use crate::error::AppError;
use crate::models::product::ProductDraft;

/// 产品请求体
#[derive(Debug, Clone, PartialEq)]
pub struct ProductBody(pub ProductDraft);

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

#[async_trait]
impl<S> FromRequest<S> for ProductBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = is_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        if !is_json || bytes.is_empty() {
            debug!("No JSON body, using empty product fields");
            return Ok(Self(ProductDraft::new()));
        }

        let Json(draft) = Json::<ProductDraft>::from_bytes(&bytes)?;
        Ok(Self(draft))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    async fn extract(content_type: Option<&str>, body: &str) -> Result<ProductBody, AppError> {
        let mut builder = Request::builder().method("POST").uri("/products");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        ProductBody::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_json_object_body() {
        let body = extract(Some("application/json; charset=utf-8"), r#"{"name":"Pen"}"#)
            .await
            .unwrap();

        assert_eq!(body.0, json!({"name": "Pen"}).as_object().cloned().unwrap());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_empty_object() {
        let body = extract(None, r#"{"name":"Pen"}"#).await.unwrap();
        assert!(body.0.is_empty());

        let body = extract(Some("text/plain"), "Pen").await.unwrap();
        assert!(body.0.is_empty());
    }

    #[tokio::test]
    async fn test_empty_json_body_is_empty_object() {
        let body = extract(Some("application/json"), "").await.unwrap();
        assert!(body.0.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let err = extract(Some("application/json"), "{\"name\":").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_non_object_json_is_validation_error() {
        let err = extract(Some("application/vnd.api+json"), "[1]").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
