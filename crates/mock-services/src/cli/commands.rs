//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。

use clap::{Parser, Subcommand};

/// Mock 徽章仓库命令行工具
#[derive(Parser, Debug)]
#[command(name = "mock-badge-server")]
#[command(version, about = "模拟远程徽章数据仓库")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// 输出 JSON 格式日志
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 启动 Mock 徽章仓库（HTTP 静态 JSON 文件）
    ///
    /// 提供 `/{user_id}.json` 与 `/data/{badge}.json` 两类文件。
    Server {
        /// 服务端口
        #[arg(short, long, default_value = "8091")]
        port: u16,

        /// 种子数据文件路径（JSON）
        #[arg(short, long)]
        seed: Option<String>,

        /// 加载内置演示数据
        #[arg(long)]
        demo: bool,

        /// 预填充随机用户数量
        #[arg(long, default_value = "0")]
        user_count: usize,
    },

    /// 批量生成种子数据
    Populate {
        /// 用户数量
        #[arg(short, long, default_value = "100")]
        users: usize,

        /// 每用户徽章数量范围（格式：min-max）
        #[arg(long, default_value = "0-5")]
        badges: String,

        /// 输出到文件（JSON 格式）
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// 单元测试
// ============================================================================
