//! 共享库
//!
//! 包含 BadgeDB 各组件共用的配置加载与可观测性初始化。

pub mod config;
pub mod observability;
