//! 存储工厂模块
//!
//! 根据配置创建相应的产品仓储实例。

use crate::config::config::{StorageBackend, StorageConfig};
use crate::error::Result;
use crate::storage::memory::MemoryProductRepository;
use crate::storage::repository::ProductRepository;
use std::sync::Arc;
use tracing::info;

#[cfg(not(feature = "surrealdb"))]
use crate::error::AppError;

#[cfg(feature = "surrealdb")]
use crate::storage::surrealdb::{SurrealPool, SurrealProductRepository};

/// 存储工厂
pub struct StorageFactory;

impl StorageFactory {
    /// 根据配置创建产品仓储
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn ProductRepository>> {
        info!("Creating {} product storage", config.backend);

        match config.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryProductRepository::new())),
            StorageBackend::SurrealDb => Self::create_surrealdb(config).await,
        }
    }

    #[cfg(feature = "surrealdb")]
    async fn create_surrealdb(config: &StorageConfig) -> Result<Arc<dyn ProductRepository>> {
        let pool = SurrealPool::new(config.clone()).await?;
        info!(
            "Connected to SurrealDB at {} ({}/{})",
            config.url, config.namespace, config.database
        );
        Ok(Arc::new(SurrealProductRepository::new(pool)))
    }

    #[cfg(not(feature = "surrealdb"))]
    async fn create_surrealdb(_config: &StorageConfig) -> Result<Arc<dyn ProductRepository>> {
        Err(AppError::Config(
            "SurrealDB feature is not enabled. Enable 'surrealdb' feature to use SurrealDB."
                .into(),
        ))
    }
}
