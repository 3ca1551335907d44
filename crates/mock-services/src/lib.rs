//! Mock Services
//!
//! 模拟远程徽章数据仓库的 crate，用于开发和测试环境。
//!
//! # 主要模块
//!
//! - `models`: 仓库文件内容与种子数据
//! - `store`: 内存存储实现
//! - `services`: 徽章仓库 HTTP 服务与测试服务器
//! - `generators`: 种子数据生成器
//!
//! # 使用示例
//!
//! ```no_run
//! use mock_services::models::BadgeSeed;
//! use mock_services::services::{BadgeSourceState, MockBadgeServer};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let server = MockBadgeServer::start(BadgeSourceState::with_seed(&BadgeSeed::demo())).await?;
//! println!("badge repository at {}", server.base_url());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod generators;
pub mod models;
pub mod services;
pub mod store;
