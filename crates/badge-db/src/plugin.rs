//! 插件生命周期
//!
//! `on_start` 在宿主的徽章区域扩展点上注册注入钩子，`on_stop` 注销钩子并卸载所有会话。

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use badge_shared::config::AppConfig;

use crate::client::HttpBadgeSource;
use crate::error::Result;
use crate::hook::{BadgeInjector, HookId, PatchedRenderer, RenderHook};
use crate::resolution::BadgeResolver;

/// 插件清单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    pub description: String,
    pub version: String,
    pub authors: Vec<String>,
}

impl Default for PluginManifest {
    fn default() -> Self {
        Self {
            name: "BadgeDB".to_string(),
            description: "Adds custom badges to user profiles.".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            authors: vec!["BadgeDB Contributors".to_string()],
        }
    }
}

struct Registration {
    target: Arc<PatchedRenderer>,
    hook: HookId,
}

/// BadgeDB 插件
pub struct BadgeDbPlugin {
    manifest: PluginManifest,
    injector: Arc<BadgeInjector>,
    registration: Mutex<Option<Registration>>,
}

impl BadgeDbPlugin {
    pub fn new(manifest: PluginManifest, injector: Arc<BadgeInjector>) -> Self {
        Self {
            manifest,
            injector,
            registration: Mutex::new(None),
        }
    }

    /// 按配置构建：HTTP 数据源 + 当前 Tokio 运行时
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source = HttpBadgeSource::from_config(&config.source)?;
        let resolver = Arc::new(BadgeResolver::new(Arc::new(source)));
        let injector = Arc::new(BadgeInjector::with_current_runtime(resolver)?);

        info!(base_url = %config.source.base_url, "BadgeDB plugin configured");
        Ok(Self::new(PluginManifest::default(), injector))
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    pub fn injector(&self) -> &Arc<BadgeInjector> {
        &self.injector
    }

    pub fn is_running(&self) -> bool {
        self.registration.lock().is_some()
    }

    /// 启动插件，返回是否为本次调用完成的注册
    pub fn on_start(&self, target: &Arc<PatchedRenderer>) -> bool {
        let mut registration = self.registration.lock();
        if registration.is_some() {
            warn!(plugin = %self.manifest.name, "Plugin already started");
            return false;
        }

        let injector: Arc<dyn RenderHook> = self.injector.clone();
        let hook = target.after(injector);
        *registration = Some(Registration {
            target: Arc::clone(target),
            hook,
        });

        info!(plugin = %self.manifest.name, version = %self.manifest.version, "Plugin started");
        true
    }

    /// 停止插件
    pub fn on_stop(&self) {
        let Some(registration) = self.registration.lock().take() else {
            return;
        };

        if !registration.target.unpatch(registration.hook) {
            // 钩子已被宿主整体移除，会话仍需释放
            self.injector.detach_all();
        }

        info!(plugin = %self.manifest.name, "Plugin stopped");
    }
}

impl Drop for BadgeDbPlugin {
    fn drop(&mut self) {
        self.on_stop();
    }
}
