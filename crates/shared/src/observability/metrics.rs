//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标名称集中定义在这里，调用方直接用 `metrics::counter!` 记录。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ObservabilityConfig;

/// 徽章数据查询次数，标签：endpoint、outcome（hit / miss / error）
pub const BADGE_LOOKUPS_TOTAL: &str = "badge_lookups_total";
/// 注入到宿主徽章区域的图标数量
pub const BADGE_INJECTIONS_TOTAL: &str = "badge_injections_total";
/// 解析会话启动次数
pub const BADGE_SESSIONS_STARTED_TOTAL: &str = "badge_sessions_started_total";
/// 单个用户完整解析耗时
pub const BADGE_RESOLUTION_DURATION_SECONDS: &str = "badge_resolution_duration_seconds";

/// 用户徽章列表查询
pub const ENDPOINT_USER_BADGES: &str = "user_badges";
/// 徽章详情查询
pub const ENDPOINT_BADGE_DETAILS: &str = "badge_details";

/// 全局 Prometheus handle，用于渲染指标
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: Option<tokio::task::JoinHandle<()>>,
}

/// 初始化 Prometheus 指标导出
///
/// 配置了端口时启动独立的 HTTP 服务器暴露 `/metrics`。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROMETHEUS_HANDLE.set(handle.clone());

    describe();

    let server_handle = match config.metrics_port {
        Some(port) => {
            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            Some(start_metrics_server(addr, handle).await?)
        }
        None => None,
    };

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册指标描述，出现在 /metrics 端点的 HELP 注释中
pub fn describe() {
    metrics::describe_counter!(BADGE_LOOKUPS_TOTAL, "Total number of badge data lookups");
    metrics::describe_counter!(
        BADGE_INJECTIONS_TOTAL,
        "Total number of badge icons injected into profile rows, counted once per mount"
    );
    metrics::describe_counter!(
        BADGE_SESSIONS_STARTED_TOTAL,
        "Total number of badge resolution sessions started"
    );
    metrics::describe_histogram!(
        BADGE_RESOLUTION_DURATION_SECONDS,
        "Badge resolution duration in seconds"
    );
}

async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    }))
}

/// 获取全局 Prometheus handle（用于自定义渲染）
pub fn get_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}
