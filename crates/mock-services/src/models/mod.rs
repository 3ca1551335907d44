//! 模拟数据模型
//!
//! 远程徽章仓库的文件内容与种子数据。

pub mod badge;

pub use badge::{BadgeSeed, MockBadge};
