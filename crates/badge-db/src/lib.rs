//! BadgeDB
//!
//! 为宿主应用的个人资料徽章区域注入额外徽章：从远程 JSON 仓库读取用户的徽章列表与徽章详情，
//! 渲染成可点击的图标并追加到宿主的徽章列表中。
//!
//! ## 模块结构
//!
//! - `models`: 徽章数据模型
//! - `error`: 错误类型定义
//! - `client`: 远程徽章数据源（失败静默降级）
//! - `resolution`: 两步解析与挂载期会话
//! - `presentation`: 徽章图标渲染
//! - `host`: 宿主契约（用户记录、渲染函数、Toast）
//! - `hook`: 渲染扩展点与徽章注入钩子
//! - `plugin`: 插件生命周期

pub mod client;
pub mod error;
pub mod hook;
pub mod host;
pub mod models;
pub mod plugin;
pub mod presentation;
pub mod resolution;

pub use client::{BadgeDataSource, HttpBadgeSource};
pub use error::{BadgeError, FailureKind, Result};
pub use hook::{BadgeInjector, HookContext, HookId, MountId, PatchedRenderer, RenderHook};
pub use host::{
    BadgeRow, EligibleUser, HostUser, ProfileBadgesProps, ProfileBadgesRenderer, ProfileUser,
    ToastPresenter,
};
pub use models::{BadgeDetails, BadgeRef, UserId};
pub use plugin::{BadgeDbPlugin, PluginManifest};
pub use presentation::{Toast, UiElement, render_badge, render_badges};
pub use resolution::{BadgeResolver, ResolutionSession, SessionState};
