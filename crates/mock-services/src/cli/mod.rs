//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `server` - 启动 Mock 徽章仓库
//! - `populate` - 批量生成种子数据
//!
//! # 使用示例
//!
//! ```bash
//! # 以演示数据启动
//! mock-badge-server server --port 8091 --demo
//!
//! # 生成种子数据并用它启动
//! mock-badge-server populate -u 50 --badges 1-4 -o seed.json
//! mock-badge-server server --seed seed.json
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::CommandRunner;
