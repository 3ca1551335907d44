//! 命令执行器
//!
//! 负责执行各 CLI 子命令的具体逻辑。

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::generators::{DataGenerator, GenerationStats, GeneratorConfig};
use crate::models::BadgeSeed;
use crate::services::{BadgeSourceState, badge_source_routes};

/// 命令执行器
#[derive(Debug, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// 构建服务状态：种子文件、演示数据、随机用户依次合并
    pub fn build_state(
        &self,
        seed: Option<&str>,
        demo: bool,
        user_count: usize,
    ) -> Result<BadgeSourceState> {
        let state = BadgeSourceState::new();

        if let Some(path) = seed {
            let seed = self.load_seed(path)?;
            state.load_seed(&seed);
            info!(path, users = seed.users.len(), badges = seed.badges.len(), "已加载种子数据");
        }

        if demo {
            state.load_seed(&BadgeSeed::demo());
        }

        if user_count > 0 {
            let generator = DataGenerator::new(GeneratorConfig {
                user_count,
                ..Default::default()
            });
            let stats = GenerationStats::from_seed(&generator.populate(&state));
            info!(
                users = stats.users_count,
                assignments = stats.assignments_count,
                "随机数据预填充完成"
            );
        }

        Ok(state)
    }

    /// 执行 server 命令
    pub async fn run_server(
        &self,
        port: u16,
        seed: Option<String>,
        demo: bool,
        user_count: usize,
    ) -> Result<()> {
        info!(port, demo, user_count, "启动 Mock 徽章仓库");

        let state = Arc::new(self.build_state(seed.as_deref(), demo, user_count)?);
        info!(
            users = state.users.count(),
            badges = state.badges.count(),
            "仓库数据就绪"
        );

        // 健康检查端点独立于仓库文件路由
        let app = Router::new()
            .route("/health", get(health_check))
            .merge(badge_source_routes().with_state(state));

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.context("绑定端口失败")?;

        info!("Mock 徽章仓库已启动: http://{}/", addr);
        info!("可用端点:");
        info!("  GET /health - 健康检查");
        info!("  GET /{{user_id}}.json - 用户徽章列表");
        info!("  GET /data/{{badge}}.json - 徽章详情");
        info!("按 Ctrl+C 停止服务");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("服务器运行失败")?;

        info!("Mock 徽章仓库已停止");
        Ok(())
    }

    /// 执行 populate 命令
    pub async fn run_populate(
        &self,
        users: usize,
        badges: &str,
        output: Option<String>,
    ) -> Result<()> {
        let (min_badges, max_badges) = self.parse_range(badges)?;
        info!(users, min_badges, max_badges, "批量生成种子数据");

        let generator = DataGenerator::new(GeneratorConfig {
            user_count: users,
            badges_per_user: min_badges..max_badges,
        });
        let seed = generator.generate_seed();
        let stats = GenerationStats::from_seed(&seed);

        if let Some(ref path) = output {
            let json = serde_json::to_string_pretty(&seed).context("序列化数据失败")?;
            fs::write(path, json).context("写入文件失败")?;
            info!(path, "数据已输出到文件");
        }

        println!("\n数据生成完成:");
        println!("{}", "-".repeat(30));
        println!("用户数量: {}", stats.users_count);
        println!("徽章种类: {}", stats.badges_count);
        println!("持有总数: {}", stats.assignments_count);
        println!("{}", "-".repeat(30));

        Ok(())
    }

    // ========================================================================
    // 辅助方法
    // ========================================================================

    fn load_seed(&self, path: &str) -> Result<BadgeSeed> {
        let content =
            fs::read_to_string(path).with_context(|| format!("读取种子文件失败: {}", path))?;
        serde_json::from_str(&content).with_context(|| format!("解析种子文件失败: {}", path))
    }

    /// 解析 min-max 格式的范围
    fn parse_range(&self, range_str: &str) -> Result<(usize, usize)> {
        let parts: Vec<&str> = range_str.split('-').collect();
        if parts.len() != 2 {
            bail!("无效的范围格式: {}，预期格式: min-max", range_str);
        }

        let min: usize = parts[0]
            .parse()
            .with_context(|| format!("无效的最小值: {}", parts[0]))?;
        let max: usize = parts[1]
            .parse()
            .with_context(|| format!("无效的最大值: {}", parts[1]))?;

        if min >= max {
            bail!("无效的范围: min ({}) 必须小于 max ({})", min, max);
        }

        Ok((min, max))
    }
}

// ============================================================================
// 辅助函数
// ============================================================================

/// 等待关闭信号
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("安装 CTRL+C 信号处理器失败: {}", e);
        return;
    }
    info!("收到关闭信号，正在停止服务...");
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// 健康检查端点
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

// ============================================================================
// 单元测试
// ============================================================================
