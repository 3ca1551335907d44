//! Mock 徽章数据仓库
//!
//! 以静态文件的形式模拟远程徽章仓库：
//!
//! - `GET /{user_id}.json` 返回用户持有的徽章类型数组
//! - `GET /data/{badge}.json` 返回单个徽章的展示信息
//!
//! 支持按路径注入故障（非 JSON 响应体、`null`、指定状态码、延迟），
//! 并记录每个路径的请求次数与最近一次请求携带的 `Cache-Control` 头，供集成测试断言。

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::models::{BadgeSeed, MockBadge};
use crate::store::MemoryStore;

/// 按路径注入的故障
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// 200，响应体不是合法 JSON
    Malformed,
    /// 200，响应体为 `null`
    Null,
    /// 返回指定状态码
    Status(u16),
    /// 延迟后正常响应
    Delay(Duration),
}

/// 徽章仓库服务状态
#[derive(Clone, Default)]
pub struct BadgeSourceState {
    /// 用户 ID -> 徽章类型列表
    pub users: MemoryStore<Vec<String>>,
    /// 徽章类型 -> 徽章详情
    pub badges: MemoryStore<MockBadge>,
    /// 请求路径（不含 `.json`）-> 故障
    pub faults: MemoryStore<Fault>,
    /// 请求路径 -> 请求次数
    pub hits: MemoryStore<u64>,
    /// 请求路径 -> 最近一次请求的 Cache-Control 头
    pub cache_control: MemoryStore<String>,
}

impl BadgeSourceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用种子数据创建
    pub fn with_seed(seed: &BadgeSeed) -> Self {
        let state = Self::new();
        state.load_seed(seed);
        state
    }

    /// 合并种子数据，同名条目被覆盖
    pub fn load_seed(&self, seed: &BadgeSeed) {
        for (user_id, badges) in &seed.users {
            self.users.insert(user_id, badges.clone());
        }
        self.badges
            .insert_many(seed.badges.iter().cloned(), |badge| badge.id.clone());
    }

    pub fn set_user_badges(&self, user_id: &str, badges: &[&str]) {
        self.users
            .insert(user_id, badges.iter().map(|b| b.to_string()).collect());
    }

    pub fn add_badge(&self, badge: MockBadge) {
        self.badges.insert(&badge.id.clone(), badge);
    }

    /// 为用户列表文件注入故障
    pub fn fail_user(&self, user_id: &str, fault: Fault) {
        self.faults.insert(user_id, fault);
    }

    /// 为徽章详情文件注入故障
    pub fn fail_badge(&self, badge: &str, fault: Fault) {
        self.faults.insert(&badge_key(badge), fault);
    }

    pub fn user_hits(&self, user_id: &str) -> u64 {
        self.hits.get(user_id).unwrap_or(0)
    }

    pub fn badge_hits(&self, badge: &str) -> u64 {
        self.hits.get(&badge_key(badge)).unwrap_or(0)
    }

    pub fn total_hits(&self) -> u64 {
        self.hits.total()
    }

    /// 最近一次请求该用户列表时携带的 Cache-Control 头
    pub fn user_cache_control(&self, user_id: &str) -> Option<String> {
        self.cache_control.get(user_id)
    }

    pub fn badge_cache_control(&self, badge: &str) -> Option<String> {
        self.cache_control.get(&badge_key(badge))
    }
}

fn badge_key(badge: &str) -> String {
    format!("data/{}", badge)
}

// ============================================================================
// 路由配置
// ============================================================================

/// 构建徽章仓库路由
pub fn badge_source_routes() -> Router<Arc<BadgeSourceState>> {
    Router::new()
        .route("/{file}", get(get_user_badges))
        .route("/data/{file}", get(get_badge_details))
}

// ============================================================================
// Handler 实现
// ============================================================================

/// 获取用户徽章列表
async fn get_user_badges(
    State(state): State<Arc<BadgeSourceState>>,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(user_id) = file.strip_suffix(".json") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    tracing::info!(user_id = %user_id, "获取用户徽章列表");

    if let Some(response) = observe(&state, user_id, &headers).await {
        return response;
    }

    match state.users.get(user_id) {
        Some(badges) => Json(badges).into_response(),
        None => {
            tracing::warn!(user_id = %user_id, "用户徽章文件不存在");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// 获取徽章详情
async fn get_badge_details(
    State(state): State<Arc<BadgeSourceState>>,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(badge) = file.strip_suffix(".json") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    tracing::info!(badge = %badge, "获取徽章详情");

    if let Some(response) = observe(&state, &badge_key(badge), &headers).await {
        return response;
    }

    match state.badges.get(badge) {
        Some(details) => Json(details).into_response(),
        None => {
            tracing::warn!(badge = %badge, "徽章详情文件不存在");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// 记录请求并应用故障；返回 `Some` 时直接作为响应
async fn observe(state: &BadgeSourceState, key: &str, headers: &HeaderMap) -> Option<Response> {
    state.hits.increment(key);
    if let Some(value) = headers
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
    {
        state.cache_control.insert(key, value.to_string());
    }

    let fault = state.faults.get(key)?;
    tracing::debug!(key = %key, ?fault, "注入故障");

    match fault {
        Fault::Malformed => Some(json_body("{not json")),
        Fault::Null => Some(json_body("null")),
        Fault::Status(code) => Some(
            StatusCode::from_u16(code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response(),
        ),
        Fault::Delay(delay) => {
            tokio::time::sleep(delay).await;
            None
        }
    }
}

fn json_body(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

// ============================================================================
// 测试服务器
// ============================================================================

/// 后台运行的徽章仓库服务，drop 时停止
pub struct MockBadgeServer {
    addr: SocketAddr,
    state: Arc<BadgeSourceState>,
    handle: JoinHandle<()>,
}

impl MockBadgeServer {
    /// 在 127.0.0.1 的随机端口上启动
    pub async fn start(state: BadgeSourceState) -> anyhow::Result<Self> {
        let state = Arc::new(state);
        let app = badge_source_routes().with_state(Arc::clone(&state));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock 徽章仓库运行失败: {}", e);
            }
        });

        tracing::debug!(%addr, "Mock 徽章仓库已启动");
        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// 仓库根地址，以 `/` 结尾
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn state(&self) -> &BadgeSourceState {
        &self.state
    }
}

impl Drop for MockBadgeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ============================================================================
// 单元测试
// ============================================================================
