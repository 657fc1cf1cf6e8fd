//! 存储层模块
//!
//! 产品数据的持久化由这里的仓储实现负责，支持内存存储和 SurrealDB。

pub mod factory;
pub mod memory;
pub mod repository;

#[cfg(feature = "surrealdb")]
pub mod surrealdb;

pub use factory::StorageFactory;
pub use memory::MemoryProductRepository;
pub use repository::{ProductFilter, ProductRepository, UpdateOptions};
