use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};
use tracing::debug;
use uuid::Uuid;

use crate::config::config::StorageConfig;
use crate::error::{AppError, Result};
use crate::models::product::{ID_FIELD, Product, ProductDraft};
use crate::storage::repository::{
    ProductFilter, ProductRepository, UpdateOptions, validate_required_fields,
    validate_updated_fields,
};

/// 产品表名
pub const PRODUCT_TABLE: &str = "product";

/// 表结构：name 和 description 为必填字符串，其余字段不限
const SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
    DEFINE FIELD IF NOT EXISTS fields.name ON product TYPE string;
    DEFINE FIELD IF NOT EXISTS fields.description ON product TYPE string;
";

/// SurrealDB 连接池
#[derive(Clone)]
pub struct SurrealPool {
    /// 数据库连接
    db: Surreal<Any>,
}

impl SurrealPool {
    /// 创建新的连接池并确保表结构存在
    ///
    /// 用户名为空时跳过认证，用于 `rocksdb://`、`mem://` 等嵌入式引擎。
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let db: Surreal<Any> = connect(&config.url)
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;

        if !config.username.is_empty() {
            db.signin(Root {
                username: &config.username,
                password: &config.password,
            })
            .await?;
        }

        // 选择命名空间和数据库
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        db.query(SCHEMA).await?.check()?;

        Ok(Self { db })
    }

    /// 获取数据库实例
    pub fn db(&self) -> &Surreal<Any> {
        &self.db
    }
}

/// 表中存储的产品文档
///
/// 记录 ID 为 `product:<uuid>`，uuid 同时保存在 `_id` 中；调用方字段嵌套在
/// `fields` 下，读取时忽略记录 ID，避免把 SurrealDB 的记录 ID 类型混入产品字段。
#[derive(Debug, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    product_id: String,
    fields: Map<String, Value>,
}

impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            fields: product.fields.clone(),
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(document: ProductDocument) -> Self {
        Product {
            id: document.product_id,
            fields: document.fields,
        }
    }
}

/// SurrealDB 产品仓储
///
/// 每个操作都是单条语句，更新和删除通过 `RETURN BEFORE` / `RETURN AFTER`
/// 在同一语句中取回结果。
#[derive(Clone)]
pub struct SurrealProductRepository {
    pool: SurrealPool,
}

impl SurrealProductRepository {
    pub fn new(pool: SurrealPool) -> Self {
        Self { pool }
    }

    fn first(documents: Vec<ProductDocument>) -> Option<Product> {
        documents.into_iter().next().map(Product::from)
    }
}

#[async_trait]
impl ProductRepository for SurrealProductRepository {
    async fn create(&self, draft: ProductDraft) -> Result<Product> {
        validate_required_fields(&draft)?;

        let product = Product::from_draft(Uuid::new_v4().to_string(), draft);
        let content = serde_json::to_value(ProductDocument::from(&product))?;

        let created: Vec<ProductDocument> = self
            .pool
            .db()
            .query("CREATE type::thing($table, $id) CONTENT $content RETURN AFTER")
            .bind(("table", PRODUCT_TABLE))
            .bind(("id", product.id.clone()))
            .bind(("content", content))
            .await?
            .take(0)?;

        debug!("Stored product {}", product.id);
        Self::first(created).ok_or_else(|| {
            AppError::Database(format!("Failed to create product: {}", product.id))
        })
    }

    async fn find(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let documents: Vec<ProductDocument> = self
            .pool
            .db()
            .query("SELECT * FROM type::table($table)")
            .bind(("table", PRODUCT_TABLE))
            .await?
            .take(0)?;

        // 过滤条件的字段名无法参数化，在内存中匹配
        Ok(documents
            .into_iter()
            .map(Product::from)
            .filter(|product| filter.matches(product))
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let documents: Vec<ProductDocument> = self
            .pool
            .db()
            .query("SELECT * FROM type::thing($table, $id)")
            .bind(("table", PRODUCT_TABLE))
            .bind(("id", id.to_owned()))
            .await?
            .take(0)?;

        Ok(Self::first(documents))
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        mut draft: ProductDraft,
        options: UpdateOptions,
    ) -> Result<Option<Product>> {
        validate_updated_fields(&draft)?;
        draft.remove(ID_FIELD);

        // UPDATE 不会创建不存在的记录，找不到时返回空结果
        let query = if options.return_updated {
            "UPDATE type::thing($table, $id) MERGE { fields: $changes } RETURN AFTER"
        } else {
            "UPDATE type::thing($table, $id) MERGE { fields: $changes } RETURN BEFORE"
        };

        let documents: Vec<ProductDocument> = self
            .pool
            .db()
            .query(query)
            .bind(("table", PRODUCT_TABLE))
            .bind(("id", id.to_owned()))
            .bind(("changes", Value::Object(draft)))
            .await?
            .take(0)?;

        Ok(Self::first(documents))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<Product>> {
        let documents: Vec<ProductDocument> = self
            .pool
            .db()
            .query("DELETE type::thing($table, $id) RETURN BEFORE")
            .bind(("table", PRODUCT_TABLE))
            .bind(("id", id.to_owned()))
            .await?
            .take(0)?;

        Ok(Self::first(documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn draft(value: Value) -> ProductDraft {
        value.as_object().cloned().unwrap()
    }

    fn pen() -> ProductDraft {
        draft(json!({"name": "Pen", "description": "Blue ink", "price": 2}))
    }

    /// 在临时目录中打开嵌入式 RocksDB，TempDir 需与仓储同时存活
    async fn repository() -> (TempDir, SurrealProductRepository) {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            url: format!("rocksdb://{}", dir.path().display()),
            username: String::new(),
            password: String::new(),
            ..StorageConfig::default()
        };
        let pool = SurrealPool::new(config).await.unwrap();
        (dir, SurrealProductRepository::new(pool))
    }

    #[tokio::test]
    async fn test_create_then_find_by_id() {
        let (_dir, repo) = repository().await;

        let created = repo.create(pen()).await.unwrap();
        assert_eq!(created.name(), Some("Pen"));
        assert_eq!(created.get("price"), Some(&json!(2)));

        let found = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_field() {
        let (_dir, repo) = repository().await;

        let err = repo
            .create(draft(json!({"name": "Pen"})))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AppError::Validation("description property missing".to_string())
        );
        assert!(repo.find(ProductFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_table_schema_rejects_missing_description() {
        let (_dir, repo) = repository().await;

        let result = repo
            .pool
            .db()
            .query("CREATE product:raw CONTENT { _id: 'raw', fields: { name: 'Pen' } }")
            .await
            .unwrap()
            .check();

        assert!(result.is_err());
        assert!(repo.find_by_id("raw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_with_and_without_filter() {
        let (_dir, repo) = repository().await;
        repo.create(pen()).await.unwrap();
        repo.create(draft(json!({"name": "Cup", "description": "Ceramic"})))
            .await
            .unwrap();

        let all = repo.find(ProductFilter::all()).await.unwrap();
        assert_eq!(all.len(), 2);

        let cups = repo
            .find(ProductFilter::all().with_field("name", "Cup"))
            .await
            .unwrap();
        assert_eq!(cups.len(), 1);
        assert_eq!(cups[0].description(), Some("Ceramic"));
    }

    #[tokio::test]
    async fn test_update_returns_before_or_after() {
        let (_dir, repo) = repository().await;
        let created = repo.create(pen()).await.unwrap();

        let before = repo
            .find_by_id_and_update(
                &created.id,
                draft(json!({"description": "Red ink"})),
                UpdateOptions::default(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before, created);

        let after = repo
            .find_by_id_and_update(
                &created.id,
                draft(json!({"_id": "other", "name": "Marker"})),
                UpdateOptions::returning_updated(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.id, created.id);
        assert_eq!(after.name(), Some("Marker"));
        assert_eq!(after.description(), Some("Red ink"));
        assert_eq!(after.get("price"), Some(&json!(2)));

        assert_eq!(repo.find_by_id(&created.id).await.unwrap(), Some(after));
    }

    #[tokio::test]
    async fn test_update_rejects_non_string_required_field() {
        let (_dir, repo) = repository().await;
        let created = repo.create(pen()).await.unwrap();

        let err = repo
            .find_by_id_and_update(
                &created.id,
                draft(json!({"description": 5})),
                UpdateOptions::returning_updated(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, AppError::Validation("description must be a string".to_string()));
        assert_eq!(repo.find_by_id(&created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_update_absent_does_not_create() {
        let (_dir, repo) = repository().await;

        let result = repo
            .find_by_id_and_update("missing", pen(), UpdateOptions::returning_updated())
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_last_state_once() {
        let (_dir, repo) = repository().await;
        let created = repo.create(pen()).await.unwrap();

        let deleted = repo.find_by_id_and_delete(&created.id).await.unwrap();
        assert_eq!(deleted, Some(created.clone()));
        assert!(repo.find_by_id(&created.id).await.unwrap().is_none());
        assert!(repo.find_by_id_and_delete(&created.id).await.unwrap().is_none());
    }
}
