//! 徽章注入钩子
//!
//! 每个挂载实例持有一个解析会话。渲染时：
//!
//! 1. 插件自身发起的渲染直接放行
//! 2. 会话尚无可渲染的徽章时原样返回原生结果
//! 3. 原生结果为空时，用 [`EligibleUser`](crate::host::EligibleUser) 重新调用原生渲染构造基线容器，并清空其原生徽章
//! 4. 把渲染好的徽章追加到容器徽章列表末尾

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::runtime::Handle;
use tracing::{debug, info};

use badge_shared::observability::metrics::BADGE_INJECTIONS_TOTAL;

use super::{HookContext, MountId, RenderHook};
use crate::error::{BadgeError, Result};
use crate::host::{BadgeRow, ProfileBadgesProps};
use crate::presentation::render_badges;
use crate::resolution::{BadgeResolver, ResolutionSession};

/// 徽章注入钩子
pub struct BadgeInjector {
    resolver: Arc<BadgeResolver>,
    runtime: Handle,
    sessions: DashMap<MountId, Arc<ResolutionSession>>,
}

impl BadgeInjector {
    pub const NAME: &'static str = "badge-db";

    pub fn new(resolver: Arc<BadgeResolver>, runtime: Handle) -> Self {
        Self {
            resolver,
            runtime,
            sessions: DashMap::new(),
        }
    }

    /// 使用当前线程所在的 Tokio 运行时创建
    pub fn with_current_runtime(resolver: Arc<BadgeResolver>) -> Result<Self> {
        let runtime =
            Handle::try_current().map_err(|e| BadgeError::RuntimeUnavailable(e.to_string()))?;
        Ok(Self::new(resolver, runtime))
    }

    /// 获取挂载实例对应的会话
    pub fn session(&self, mount: MountId) -> Option<Arc<ResolutionSession>> {
        self.sessions.get(&mount).map(|s| Arc::clone(s.value()))
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// 获取或创建会话
    ///
    /// 同一挂载实例的用户 ID 变化时，旧会话被卸载并替换。
    fn ensure_session(&self, mount: MountId, user_id: &str) -> Arc<ResolutionSession> {
        match self.sessions.entry(mount) {
            Entry::Occupied(mut entry) => {
                if entry.get().user_id() == user_id {
                    return Arc::clone(entry.get());
                }
                let session = self.start_session(user_id);
                let previous = entry.insert(Arc::clone(&session));
                previous.on_detach();
                debug!(%mount, user_id = %user_id, "User changed on mounted badge row, restarted session");
                session
            }
            Entry::Vacant(entry) => {
                let session = self.start_session(user_id);
                entry.insert(Arc::clone(&session));
                session
            }
        }
    }

    fn start_session(&self, user_id: &str) -> Arc<ResolutionSession> {
        let session = Arc::new(ResolutionSession::new(user_id, Arc::clone(&self.resolver)));
        session.on_attach(&self.runtime);
        session
    }

    /// 卸载所有会话
    pub fn detach_all(&self) {
        for entry in self.sessions.iter() {
            entry.value().on_detach();
        }
        self.sessions.clear();
    }
}

impl RenderHook for BadgeInjector {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn after(&self, ctx: &HookContext<'_>, result: Option<BadgeRow>) -> Option<BadgeRow> {
        if ctx.props.from_plugin {
            return result;
        }

        let session = self.ensure_session(ctx.mount, ctx.props.user.id());
        let icons = render_badges(&session.badges());
        if icons.is_empty() {
            return result;
        }

        let mut row = match result {
            Some(row) => row,
            None => {
                let mut baseline = ctx.render_original(&ctx.props.for_plugin_baseline())?;
                baseline.badges.clear();
                baseline
            }
        };

        if session.mark_injected() {
            metrics::counter!(BADGE_INJECTIONS_TOTAL).increment(icons.len() as u64);
        }
        row.badges.extend(icons);
        Some(row)
    }

    fn on_attach(&self, mount: MountId, props: &ProfileBadgesProps) {
        if props.from_plugin {
            return;
        }
        self.ensure_session(mount, props.user.id());
    }

    fn on_detach(&self, mount: MountId) {
        if let Some((_, session)) = self.sessions.remove(&mount) {
            session.on_detach();
        }
    }

    fn on_unregister(&self) {
        let count = self.sessions.len();
        self.detach_all();
        info!(sessions = count, "Badge injector unregistered");
    }
}
