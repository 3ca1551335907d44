//! HTTP 徽章数据源集成测试
//!
//! 使用 mock-services 提供的本地徽章仓库，覆盖成功、未命中与各种失败路径。

use badge_db::client::{BadgeDataSource, HttpBadgeSource};
use badge_db::error::{BadgeError, FailureKind};
use badge_db::models::{BadgeDetails, BadgeRef};
use mock_services::models::{BadgeSeed, MockBadge};
use mock_services::services::{BadgeSourceState, Fault, MockBadgeServer};

async fn demo_server() -> anyhow::Result<(MockBadgeServer, HttpBadgeSource)> {
    let server = MockBadgeServer::start(BadgeSourceState::with_seed(&BadgeSeed::demo())).await?;
    let source = HttpBadgeSource::new(&server.base_url())?;
    Ok((server, source))
}

#[tokio::test]
async fn test_list_badges_success() -> anyhow::Result<()> {
    let (server, source) = demo_server().await?;

    let refs = source.list_badges("123").await;

    assert_eq!(refs, vec![BadgeRef::from("gold"), BadgeRef::from("staff")]);
    assert_eq!(server.state().user_hits("123"), 1);
    Ok(())
}

#[tokio::test]
async fn test_get_badge_details_success() -> anyhow::Result<()> {
    let (server, source) = demo_server().await?;

    let details = source.get_badge_details(&BadgeRef::from("gold")).await;

    assert_eq!(
        details,
        Some(BadgeDetails::new(
            "Gold",
            "gold",
            "https://cdn.example.com/badges/gold.png"
        ))
    );
    assert_eq!(server.state().badge_hits("gold"), 1);
    Ok(())
}

#[tokio::test]
async fn test_requests_bypass_caches() -> anyhow::Result<()> {
    let (server, source) = demo_server().await?;

    source.list_badges("123").await;
    source.get_badge_details(&BadgeRef::from("gold")).await;

    assert_eq!(
        server.state().user_cache_control("123").as_deref(),
        Some("no-cache")
    );
    assert_eq!(
        server.state().badge_cache_control("gold").as_deref(),
        Some("no-cache")
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_files_degrade_to_empty() -> anyhow::Result<()> {
    let (server, source) = demo_server().await?;

    assert!(source.list_badges("999").await.is_empty());
    assert!(source.get_badge_details(&BadgeRef::from("staff")).await.is_none());

    let err = source.try_list_badges("999").await.unwrap_err();
    assert!(matches!(err, BadgeError::UnexpectedStatus { status: 404, .. }));
    assert_eq!(err.failure_kind(), FailureKind::TransportOrParse);

    // 每次查询只请求一次，不重试
    assert_eq!(server.state().user_hits("999"), 2);
    assert_eq!(server.state().badge_hits("staff"), 1);
    Ok(())
}

#[tokio::test]
async fn test_empty_list_is_not_an_error() -> anyhow::Result<()> {
    let (_server, source) = demo_server().await?;

    let refs = source.try_list_badges("456").await?;
    assert!(refs.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_degrades() -> anyhow::Result<()> {
    let (server, source) = demo_server().await?;
    server.state().fail_user("123", Fault::Malformed);
    server.state().fail_badge("gold", Fault::Malformed);

    assert!(source.list_badges("123").await.is_empty());
    assert!(source.get_badge_details(&BadgeRef::from("gold")).await.is_none());

    let err = source.try_list_badges("123").await.unwrap_err();
    assert!(matches!(err, BadgeError::Parse(_)));
    assert_eq!(err.error_code(), "PARSE_ERROR");
    Ok(())
}

#[tokio::test]
async fn test_null_body_is_lookup_miss() -> anyhow::Result<()> {
    let (server, source) = demo_server().await?;
    server.state().fail_user("123", Fault::Null);
    server.state().fail_badge("gold", Fault::Null);

    assert!(source.list_badges("123").await.is_empty());
    assert!(source.get_badge_details(&BadgeRef::from("gold")).await.is_none());

    let err = source
        .try_get_badge_details(&BadgeRef::from("gold"))
        .await
        .unwrap_err();
    assert_eq!(err.failure_kind(), FailureKind::LookupMiss);
    Ok(())
}

#[tokio::test]
async fn test_server_error_degrades() -> anyhow::Result<()> {
    let (server, source) = demo_server().await?;
    server.state().fail_badge("gold", Fault::Status(503));

    assert!(source.get_badge_details(&BadgeRef::from("gold")).await.is_none());

    let err = source
        .try_get_badge_details(&BadgeRef::from("gold"))
        .await
        .unwrap_err();
    assert!(matches!(err, BadgeError::UnexpectedStatus { status: 503, .. }));
    Ok(())
}

#[tokio::test]
async fn test_partial_details_fill_defaults() -> anyhow::Result<()> {
    let (server, source) = demo_server().await?;
    server
        .state()
        .add_badge(MockBadge::new("Nameless", "nameless", ""));

    let details = source
        .get_badge_details(&BadgeRef::from("nameless"))
        .await
        .unwrap();
    assert_eq!(details.name, "Nameless");
    assert!(!details.has_image());
    Ok(())
}

#[tokio::test]
async fn test_identifiers_are_path_encoded() -> anyhow::Result<()> {
    let (server, source) = demo_server().await?;
    server.state().set_user_badges("a/b", &["gold"]);

    // 斜杠被编码进单个路径段，不会落到其他文件上
    let refs = source.list_badges("a/b").await;
    assert_eq!(refs, vec![BadgeRef::from("gold")]);
    assert_eq!(server.state().user_hits("a/b"), 1);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_source_degrades() -> anyhow::Result<()> {
    // 绑定后立即释放的端口上没有服务在监听
    let addr = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;
    let source = HttpBadgeSource::new(&format!("http://{}/", addr))?;

    let err = source.try_list_badges("123").await.unwrap_err();
    assert!(matches!(err, BadgeError::Transport(_)));
    assert!(source.list_badges("123").await.is_empty());
    assert!(source.get_badge_details(&BadgeRef::from("gold")).await.is_none());
    Ok(())
}
