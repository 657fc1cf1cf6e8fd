//! Product Service - 产品资源 REST 服务
//!
//! 对单一的产品资源提供创建、列表、查询、更新和删除五个操作，
//! 所有持久化工作委托给可替换的存储层。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod storage;
