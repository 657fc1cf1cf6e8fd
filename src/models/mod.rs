//! 核心数据模型模块
//!
//! 定义产品资源的数据结构。

pub mod product;

pub use product::*;
