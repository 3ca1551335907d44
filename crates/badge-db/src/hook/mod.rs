//! 渲染扩展点
//!
//! 宿主把原生的徽章区域渲染函数交给 [`PatchedRenderer`]，插件在其上注册
//! [`RenderHook`]。每次渲染先调用原生函数，再依次把结果交给各个钩子改写。
//! 挂载/卸载事件同样转发给所有钩子。

mod injector;

pub use injector::BadgeInjector;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::host::{BadgeRow, ProfileBadgesProps, ProfileBadgesRenderer};

/// 挂载实例标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(Uuid);

impl MountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// 钩子注册句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// 单次渲染的上下文
pub struct HookContext<'a> {
    pub mount: MountId,
    pub props: &'a ProfileBadgesProps,
    original: &'a dyn ProfileBadgesRenderer,
}

impl<'a> HookContext<'a> {
    pub fn new(
        mount: MountId,
        props: &'a ProfileBadgesProps,
        original: &'a dyn ProfileBadgesRenderer,
    ) -> Self {
        Self {
            mount,
            props,
            original,
        }
    }

    /// 调用未经钩子处理的原生渲染函数
    pub fn render_original(&self, props: &ProfileBadgesProps) -> Option<BadgeRow> {
        self.original.render(props)
    }
}

/// 渲染钩子
///
/// `after` 收到上一环节的渲染结果并返回改写后的结果；生命周期回调默认为空实现。
pub trait RenderHook: Send + Sync {
    fn name(&self) -> &str;

    fn after(&self, ctx: &HookContext<'_>, result: Option<BadgeRow>) -> Option<BadgeRow>;

    fn on_attach(&self, _mount: MountId, _props: &ProfileBadgesProps) {}

    fn on_detach(&self, _mount: MountId) {}

    /// 钩子被注销时调用，用于释放所有挂载期资源
    fn on_unregister(&self) {}
}

/// 注册了钩子的渲染扩展点
pub struct PatchedRenderer {
    original: Arc<dyn ProfileBadgesRenderer>,
    hooks: RwLock<Vec<(HookId, Arc<dyn RenderHook>)>>,
    next_id: AtomicU64,
}

impl PatchedRenderer {
    pub fn new(original: Arc<dyn ProfileBadgesRenderer>) -> Self {
        Self {
            original,
            hooks: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// 注册后置钩子
    pub fn after(&self, hook: Arc<dyn RenderHook>) -> HookId {
        let id = HookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(hook = hook.name(), ?id, "Render hook registered");
        self.hooks.write().push((id, hook));
        id
    }

    /// 注销单个钩子，返回是否存在
    pub fn unpatch(&self, id: HookId) -> bool {
        let removed = {
            let mut hooks = self.hooks.write();
            let index = hooks.iter().position(|(hook_id, _)| *hook_id == id);
            index.map(|index| hooks.remove(index).1)
        };

        match removed {
            Some(hook) => {
                hook.on_unregister();
                debug!(hook = hook.name(), ?id, "Render hook unregistered");
                true
            }
            None => false,
        }
    }

    /// 注销全部钩子
    pub fn unpatch_all(&self) {
        let hooks = std::mem::take(&mut *self.hooks.write());
        for (_, hook) in hooks {
            hook.on_unregister();
        }
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.read().len()
    }

    fn snapshot(&self) -> Vec<Arc<dyn RenderHook>> {
        self.hooks
            .read()
            .iter()
            .map(|(_, hook)| Arc::clone(hook))
            .collect()
    }

    pub fn attach(&self, mount: MountId, props: &ProfileBadgesProps) {
        for hook in self.snapshot() {
            hook.on_attach(mount, props);
        }
    }

    pub fn detach(&self, mount: MountId) {
        for hook in self.snapshot() {
            hook.on_detach(mount);
        }
    }

    /// 渲染一次：原生结果依次经过所有钩子
    pub fn render(&self, mount: MountId, props: &ProfileBadgesProps) -> Option<BadgeRow> {
        let ctx = HookContext::new(mount, props, self.original.as_ref());
        self.snapshot()
            .into_iter()
            .fold(self.original.render(props), |result, hook| {
                hook.after(&ctx, result)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ProfileUser;
    use crate::presentation::UiElement;
    use std::sync::atomic::AtomicUsize;

    struct AppendHook {
        label: &'static str,
        unregistered: AtomicUsize,
    }

    impl AppendHook {
        fn new(label: &'static str) -> Arc<Self> {
            Arc::new(Self {
                label,
                unregistered: AtomicUsize::new(0),
            })
        }
    }

    impl RenderHook for AppendHook {
        fn name(&self) -> &str {
            self.label
        }

        fn after(&self, _ctx: &HookContext<'_>, result: Option<BadgeRow>) -> Option<BadgeRow> {
            let mut row = result.unwrap_or_default();
            row.badges.push(UiElement::native(self.label));
            Some(row)
        }

        fn on_unregister(&self) {
            self.unregistered.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn renderer() -> PatchedRenderer {
        PatchedRenderer::new(Arc::new(|_: &ProfileBadgesProps| {
            Some(BadgeRow::new(vec![UiElement::native("native")]))
        }))
    }

    fn props() -> ProfileBadgesProps {
        ProfileBadgesProps::new(Arc::new(ProfileUser::new("u1", 1)))
    }

    fn names(row: &BadgeRow) -> Vec<String> {
        row.badges
            .iter()
            .filter_map(|b| match b {
                UiElement::Native { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let patched = renderer();
        patched.after(AppendHook::new("first"));
        patched.after(AppendHook::new("second"));

        let row = patched.render(MountId::new(), &props()).unwrap();
        assert_eq!(names(&row), vec!["native", "first", "second"]);
    }

    #[test]
    fn test_unpatch_restores_original() {
        let patched = renderer();
        let hook = AppendHook::new("first");
        let id = patched.after(hook.clone());

        assert!(patched.unpatch(id));
        assert!(!patched.unpatch(id));
        assert_eq!(hook.unregistered.load(Ordering::SeqCst), 1);
        assert_eq!(patched.hook_count(), 0);

        let row = patched.render(MountId::new(), &props()).unwrap();
        assert_eq!(names(&row), vec!["native"]);
    }

    #[test]
    fn test_unpatch_all() {
        let patched = renderer();
        let first = AppendHook::new("first");
        let second = AppendHook::new("second");
        patched.after(first.clone());
        patched.after(second.clone());

        patched.unpatch_all();

        assert_eq!(patched.hook_count(), 0);
        assert_eq!(first.unregistered.load(Ordering::SeqCst), 1);
        assert_eq!(second.unregistered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mount_ids_are_unique() {
        assert_ne!(MountId::new(), MountId::new());
    }
}
