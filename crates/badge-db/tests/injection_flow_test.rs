//! 徽章注入全流程集成测试
//!
//! 本地徽章仓库 + HTTP 数据源 + 插件 + 宿主渲染扩展点，
//! 覆盖挂载、解析、渲染、点击与卸载的完整链路。

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use badge_db::client::HttpBadgeSource;
use badge_db::hook::{BadgeInjector, MountId, PatchedRenderer};
use badge_db::host::{BadgeRow, HostUser, ProfileBadgesProps, ProfileUser, ToastPresenter};
use badge_db::plugin::{BadgeDbPlugin, PluginManifest};
use badge_db::presentation::{Toast, UiElement};
use badge_db::resolution::{BadgeResolver, SessionState};
use mock_services::models::BadgeSeed;
use mock_services::services::{BadgeSourceState, Fault, MockBadgeServer};

/// HypeSquad 标志位
const HYPESQUAD: u64 = 1 << 2;

struct Harness {
    server: MockBadgeServer,
    plugin: BadgeDbPlugin,
    target: Arc<PatchedRenderer>,
    native_calls: Arc<Mutex<Vec<u64>>>,
}

impl Harness {
    async fn start() -> anyhow::Result<Self> {
        let server = MockBadgeServer::start(BadgeSourceState::with_seed(&BadgeSeed::demo())).await?;

        let source = HttpBadgeSource::new(&server.base_url())?;
        let resolver = Arc::new(BadgeResolver::new(Arc::new(source)));
        let injector = Arc::new(BadgeInjector::with_current_runtime(resolver)?);
        let plugin = BadgeDbPlugin::new(PluginManifest::default(), injector);

        // 宿主原生渲染：只有带 HypeSquad 标志的用户才有徽章区域
        let native_calls = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::clone(&native_calls);
        let target = Arc::new(PatchedRenderer::new(Arc::new(
            move |props: &ProfileBadgesProps| -> Option<BadgeRow> {
                calls.lock().push(props.user.flags());
                props
                    .user
                    .has_flag(HYPESQUAD)
                    .then(|| BadgeRow::new(vec![UiElement::native("hypesquad")]))
            },
        )));

        assert!(plugin.on_start(&target));
        Ok(Self {
            server,
            plugin,
            target,
            native_calls,
        })
    }

    /// 挂载并等待解析结束
    async fn mount(&self, props: &ProfileBadgesProps) -> MountId {
        let mount = MountId::new();
        self.target.attach(mount, props);
        let session = self
            .plugin
            .injector()
            .session(mount)
            .expect("挂载后应当存在会话");
        tokio::time::timeout(Duration::from_secs(5), session.settled())
            .await
            .expect("解析超时");
        mount
    }
}

fn profile(user_id: &str, flags: u64) -> ProfileBadgesProps {
    let user: Arc<dyn HostUser> = Arc::new(ProfileUser::new(user_id, flags));
    ProfileBadgesProps::new(user)
}

#[derive(Default)]
struct ToastRecorder(Mutex<Vec<Toast>>);

impl ToastPresenter for ToastRecorder {
    fn open(&self, toast: Toast) {
        self.0.lock().push(toast);
    }
}

#[tokio::test]
async fn test_known_badge_rendered_and_unknown_skipped() -> anyhow::Result<()> {
    let harness = Harness::start().await?;
    let props = profile("123", HYPESQUAD);
    let mount = harness.mount(&props).await;

    let row = harness.target.render(mount, &props).unwrap();

    assert_eq!(row.badges.len(), 2);
    assert_eq!(row.badges[0], UiElement::native("hypesquad"));
    assert_eq!(row.injected_count(), 1);
    assert_eq!(row.badges[1].key(), Some("gold"));
    assert_eq!(
        row.badges[1].image_source(),
        Some("https://cdn.example.com/badges/gold.png")
    );

    // staff 没有详情文件：请求过一次但不渲染
    assert_eq!(harness.server.state().badge_hits("gold"), 1);
    assert_eq!(harness.server.state().badge_hits("staff"), 1);
    Ok(())
}

#[tokio::test]
async fn test_baseline_row_for_user_without_native_badges() -> anyhow::Result<()> {
    let harness = Harness::start().await?;
    let props = profile("123", 0);
    let mount = harness.mount(&props).await;

    let row = harness.target.render(mount, &props).unwrap();

    // 基线容器的原生徽章被清空，只剩注入的图标
    assert_eq!(row.badges.len(), 1);
    assert!(row.badges[0].is_injected());

    // 第二次原生调用收到的是放宽后的用户
    let calls = harness.native_calls.lock();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], 0);
    assert_ne!(calls[1], 0);
    Ok(())
}

#[tokio::test]
async fn test_user_without_badges_is_untouched() -> anyhow::Result<()> {
    let harness = Harness::start().await?;

    let plain = profile("456", 0);
    let mount = harness.mount(&plain).await;
    assert!(harness.target.render(mount, &plain).is_none());

    let flagged = profile("456", HYPESQUAD);
    let mount = harness.mount(&flagged).await;
    assert_eq!(
        harness.target.render(mount, &flagged),
        Some(BadgeRow::new(vec![UiElement::native("hypesquad")]))
    );

    assert_eq!(harness.server.state().badge_hits("gold"), 0);
    Ok(())
}

#[tokio::test]
async fn test_unknown_user_is_untouched() -> anyhow::Result<()> {
    let harness = Harness::start().await?;
    let props = profile("404", 0);
    let mount = harness.mount(&props).await;

    assert!(harness.target.render(mount, &props).is_none());
    assert_eq!(harness.server.state().user_hits("404"), 1);
    Ok(())
}

#[tokio::test]
async fn test_pressing_icon_opens_toast() -> anyhow::Result<()> {
    let harness = Harness::start().await?;
    let props = profile("123", HYPESQUAD);
    let mount = harness.mount(&props).await;
    let row = harness.target.render(mount, &props).unwrap();

    let recorder = ToastRecorder::default();
    assert!(!row.badges[0].press(&recorder));
    assert!(row.badges[1].press(&recorder));

    assert_eq!(
        recorder.0.lock().as_slice(),
        &[Toast {
            content: "Gold".to_string(),
            source: "https://cdn.example.com/badges/gold.png".to_string(),
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_rerenders_reuse_resolution() -> anyhow::Result<()> {
    let harness = Harness::start().await?;
    let props = profile("123", HYPESQUAD);
    let mount = harness.mount(&props).await;

    for _ in 0..10 {
        assert_eq!(
            harness.target.render(mount, &props).unwrap().injected_count(),
            1
        );
    }

    assert_eq!(harness.server.state().user_hits("123"), 1);
    assert_eq!(harness.server.state().badge_hits("gold"), 1);
    Ok(())
}

#[tokio::test]
async fn test_each_mount_resolves_independently() -> anyhow::Result<()> {
    let harness = Harness::start().await?;
    let props = profile("123", HYPESQUAD);

    let first = harness.mount(&props).await;
    let second = harness.mount(&props).await;

    assert_ne!(first, second);
    assert_eq!(harness.plugin.injector().active_sessions(), 2);
    assert_eq!(harness.server.state().user_hits("123"), 2);
    Ok(())
}

#[tokio::test]
async fn test_detach_discards_late_result() -> anyhow::Result<()> {
    let harness = Harness::start().await?;
    harness
        .server
        .state()
        .fail_user("123", Fault::Delay(Duration::from_millis(200)));

    let props = profile("123", HYPESQUAD);
    let mount = MountId::new();
    harness.target.attach(mount, &props);
    let session = harness.plugin.injector().session(mount).unwrap();
    assert_eq!(session.state(), SessionState::Resolving);

    harness.target.detach(mount);
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(session.state(), SessionState::Detached);
    assert!(session.badges().is_empty());
    assert_eq!(harness.plugin.injector().active_sessions(), 0);
    assert_eq!(harness.server.state().badge_hits("gold"), 0);
    Ok(())
}

#[tokio::test]
async fn test_source_failure_leaves_row_untouched() -> anyhow::Result<()> {
    let harness = Harness::start().await?;
    harness.server.state().fail_user("123", Fault::Status(500));

    let props = profile("123", HYPESQUAD);
    let mount = harness.mount(&props).await;

    assert_eq!(
        harness.target.render(mount, &props),
        Some(BadgeRow::new(vec![UiElement::native("hypesquad")]))
    );
    Ok(())
}

#[tokio::test]
async fn test_stop_restores_native_rendering() -> anyhow::Result<()> {
    let harness = Harness::start().await?;
    let props = profile("123", HYPESQUAD);
    let mount = harness.mount(&props).await;
    assert_eq!(harness.target.render(mount, &props).unwrap().injected_count(), 1);

    harness.plugin.on_stop();

    assert!(!harness.plugin.is_running());
    assert_eq!(harness.plugin.injector().active_sessions(), 0);
    assert_eq!(harness.target.render(mount, &props).unwrap().injected_count(), 0);
    Ok(())
}
