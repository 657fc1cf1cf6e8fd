use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::product::{Product, ProductDraft};

/// 创建产品时必须提供的字符串字段
pub const REQUIRED_FIELDS: [&str; 2] = ["name", "description"];

/// 校验创建产品所需的字段
///
/// 所有存储后端在写入前调用，保证同样的请求体在不同后端得到同样的错误。
pub fn validate_required_fields(draft: &ProductDraft) -> Result<()> {
    for field in REQUIRED_FIELDS {
        match draft.get(field) {
            None | Some(Value::Null) => {
                return Err(AppError::Validation(format!("{field} property missing")));
            }
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(AppError::Validation(format!("{field} must be a string")));
            }
        }
    }
    Ok(())
}

/// 校验更新请求中出现的必填字段仍为字符串，未出现的字段不检查
pub fn validate_updated_fields(draft: &ProductDraft) -> Result<()> {
    for field in REQUIRED_FIELDS {
        match draft.get(field) {
            None | Some(Value::String(_)) => {}
            Some(_) => {
                return Err(AppError::Validation(format!("{field} must be a string")));
            }
        }
    }
    Ok(())
}

/// 查询过滤条件
///
/// 字段等值匹配，空过滤条件匹配全部产品。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub fields: Map<String, Value>,
}

impl ProductFilter {
    /// 匹配全部产品
    pub fn all() -> Self {
        Self::default()
    }

    /// 追加一个字段等值条件
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        product.matches(&self.fields)
    }
}

/// 更新选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// 为 true 时返回更新后的产品，否则返回更新前的产品
    pub return_updated: bool,
}

impl UpdateOptions {
    /// 返回更新后状态的选项
    pub fn returning_updated() -> Self {
        Self {
            return_updated: true,
        }
    }
}

/// 产品仓储 trait
///
/// 存储层拥有产品的权威副本，并负责字段校验。按标识查找不到记录时返回
/// `Ok(None)`，只有操作本身失败时才返回错误。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 创建产品，标识由存储层分配
    async fn create(&self, draft: ProductDraft) -> Result<Product>;

    /// 按过滤条件列出产品
    async fn find(&self, filter: ProductFilter) -> Result<Vec<Product>>;

    /// 根据 ID 获取产品
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>>;

    /// 根据 ID 更新产品
    async fn find_by_id_and_update(
        &self,
        id: &str,
        draft: ProductDraft,
        options: UpdateOptions,
    ) -> Result<Option<Product>>;

    /// 根据 ID 删除产品，返回删除前的状态
    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<Product>>;
}
