//! 挂载期解析会话
//!
//! 每个挂载的徽章区域对应一个会话。会话在 `on_attach` 时启动一次解析，
//! 之后的重复渲染只读取记忆化的结果；`on_detach` 取消进行中的任务，
//! 晚到的结果会被直接丢弃。

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use badge_shared::observability::metrics::BADGE_SESSIONS_STARTED_TOTAL;

use super::BadgeResolver;
use crate::models::{BadgeDetails, UserId};

/// 会话状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// 尚未挂载
    Idle,
    /// 解析中
    Resolving,
    /// 解析完成（可能为空）
    Resolved(Arc<Vec<BadgeDetails>>),
    /// 已卸载，不再接受结果
    Detached,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Detached)
    }
}

#[derive(Default)]
struct SessionInner {
    started: bool,
    detached: bool,
    injected: bool,
    task: Option<JoinHandle<()>>,
}

/// 挂载期解析会话
pub struct ResolutionSession {
    user_id: UserId,
    resolver: Arc<BadgeResolver>,
    inner: Arc<Mutex<SessionInner>>,
    state_tx: Arc<watch::Sender<SessionState>>,
}

impl ResolutionSession {
    pub fn new(user_id: impl Into<UserId>, resolver: Arc<BadgeResolver>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            user_id: user_id.into(),
            resolver,
            inner: Arc::new(Mutex::new(SessionInner::default())),
            state_tx: Arc::new(state_tx),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// 挂载：在给定运行时上启动解析
    ///
    /// 每个会话最多启动一次，返回本次调用是否真正启动了解析。
    pub fn on_attach(&self, runtime: &Handle) -> bool {
        let mut inner = self.inner.lock();
        if inner.started || inner.detached {
            return false;
        }
        inner.started = true;
        self.state_tx.send_replace(SessionState::Resolving);

        let resolver = Arc::clone(&self.resolver);
        let user_id = self.user_id.clone();
        let shared = Arc::clone(&self.inner);
        let state_tx = Arc::clone(&self.state_tx);

        inner.task = Some(runtime.spawn(async move {
            let badges = resolver.resolve(&user_id).await;

            let guard = shared.lock();
            if guard.detached {
                debug!(user_id = %user_id, "Session detached before resolution finished, discarding result");
                return;
            }
            state_tx.send_replace(SessionState::Resolved(Arc::new(badges)));
            drop(guard);
        }));

        metrics::counter!(BADGE_SESSIONS_STARTED_TOTAL).increment(1);
        debug!(user_id = %self.user_id, "Badge resolution started");
        true
    }

    /// 卸载：取消进行中的解析并拒绝之后到达的结果
    pub fn on_detach(&self) {
        let mut inner = self.inner.lock();
        if inner.detached {
            return;
        }
        inner.detached = true;
        if let Some(task) = inner.task.take() {
            task.abort();
        }
        self.state_tx.send_replace(SessionState::Detached);
        debug!(user_id = %self.user_id, "Badge session detached");
    }

    /// 标记本会话的徽章已注入渲染结果
    ///
    /// 仅首次调用返回 true，用于每个会话只计一次注入指标。
    pub fn mark_injected(&self) -> bool {
        let mut inner = self.inner.lock();
        !std::mem::replace(&mut inner.injected, true)
    }

    pub fn is_injected(&self) -> bool {
        self.inner.lock().injected
    }

    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// 订阅状态变化，宿主可据此在解析完成后触发重新渲染
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// 当前已解析的徽章；未完成或已卸载时为空
    pub fn badges(&self) -> Arc<Vec<BadgeDetails>> {
        match &*self.state_tx.borrow() {
            SessionState::Resolved(badges) => Arc::clone(badges),
            _ => Arc::new(Vec::new()),
        }
    }

    /// 等待会话进入终态（已解析或已卸载）
    ///
    /// 会话未挂载时会一直等待。
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        match rx.wait_for(SessionState::is_terminal).await {
            Ok(state) => state.clone(),
            Err(_) => SessionState::Detached,
        }
    }
}

impl std::fmt::Debug for ResolutionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionSession")
            .field("user_id", &self.user_id)
            .field("state", &self.state())
            .finish()
    }
}

impl Drop for ResolutionSession {
    fn drop(&mut self) {
        if let Some(task) = self.inner.lock().task.take() {
            task.abort();
        }
    }
}
