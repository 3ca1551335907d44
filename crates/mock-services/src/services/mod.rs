//! Mock 服务模块
//!
//! 提供模拟的远程徽章仓库，用于开发和测试环境。

pub mod badge_source;

pub use badge_source::{BadgeSourceState, Fault, MockBadgeServer, badge_source_routes};
