//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod product_handler;

pub use product_handler::*;
