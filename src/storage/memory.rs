//! 内存存储
//!
//! 基于 DashMap 的进程内产品仓储，用于开发环境和测试。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::models::product::{Product, ProductDraft};
use crate::storage::repository::{
    ProductFilter, ProductRepository, UpdateOptions, validate_required_fields,
    validate_updated_fields,
};

struct StoredProduct {
    /// 插入序号，用于保持列表顺序与创建顺序一致
    seq: u64,
    product: Product,
}

/// 内存产品仓储
#[derive(Default)]
pub struct MemoryProductRepository {
    products: DashMap<String, StoredProduct>,
    next_seq: AtomicU64,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create(&self, draft: ProductDraft) -> Result<Product> {
        validate_required_fields(&draft)?;

        let product = Product::from_draft(Uuid::new_v4().to_string(), draft);
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.products.insert(
            product.id.clone(),
            StoredProduct {
                seq,
                product: product.clone(),
            },
        );

        debug!("Stored product {}", product.id);
        Ok(product)
    }

    async fn find(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        let mut matched: Vec<(u64, Product)> = self
            .products
            .iter()
            .filter(|entry| filter.matches(&entry.product))
            .map(|entry| (entry.seq, entry.product.clone()))
            .collect();
        matched.sort_by_key(|(seq, _)| *seq);

        Ok(matched.into_iter().map(|(_, product)| product).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.products.get(id).map(|entry| entry.product.clone()))
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        draft: ProductDraft,
        options: UpdateOptions,
    ) -> Result<Option<Product>> {
        validate_updated_fields(&draft)?;

        let Some(mut entry) = self.products.get_mut(id) else {
            return Ok(None);
        };

        let before = entry.product.clone();
        entry.product.apply(draft);

        if options.return_updated {
            Ok(Some(entry.product.clone()))
        } else {
            Ok(Some(before))
        }
    }

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.products.remove(id).map(|(_, stored)| stored.product))
    }
}
