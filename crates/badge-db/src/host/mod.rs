//! 宿主契约
//!
//! 宿主应用拥有个人资料组件与渲染原语，这里只描述插件依赖的最小接口：
//! 用户记录、徽章区域的渲染参数与渲染结果、原生渲染函数，以及 Toast 弹出能力。

mod user;

pub use user::{ALL_FLAGS, EligibleUser, HostUser, ProfileUser};

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::presentation::{Toast, UiElement};

/// 徽章区域渲染参数
#[derive(Debug, Clone)]
pub struct ProfileBadgesProps {
    pub user: Arc<dyn HostUser>,
    /// 是否由插件自身发起（防止钩子递归处理）
    pub from_plugin: bool,
    /// 其余渲染参数，原样透传
    pub extra: Map<String, Value>,
}

impl ProfileBadgesProps {
    pub fn new(user: Arc<dyn HostUser>) -> Self {
        Self {
            user,
            from_plugin: false,
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// 构造基线渲染用的参数：包装用户并标记为插件调用
    pub fn for_plugin_baseline(&self) -> Self {
        Self {
            user: Arc::new(EligibleUser::new(Arc::clone(&self.user))),
            from_plugin: true,
            extra: self.extra.clone(),
        }
    }
}

/// 徽章区域渲染结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadgeRow {
    pub badges: Vec<UiElement>,
}

impl BadgeRow {
    pub fn new(badges: Vec<UiElement>) -> Self {
        Self { badges }
    }

    /// 由插件注入的徽章数量
    pub fn injected_count(&self) -> usize {
        self.badges.iter().filter(|b| b.is_injected()).count()
    }
}

/// 宿主的原生徽章区域渲染函数
///
/// 用户没有可展示的徽章时返回 `None`。
pub trait ProfileBadgesRenderer: Send + Sync {
    fn render(&self, props: &ProfileBadgesProps) -> Option<BadgeRow>;
}

impl<F> ProfileBadgesRenderer for F
where
    F: Fn(&ProfileBadgesProps) -> Option<BadgeRow> + Send + Sync,
{
    fn render(&self, props: &ProfileBadgesProps) -> Option<BadgeRow> {
        self(props)
    }
}

/// 宿主的 Toast 弹出能力
pub trait ToastPresenter: Send + Sync {
    fn open(&self, toast: Toast);
}
