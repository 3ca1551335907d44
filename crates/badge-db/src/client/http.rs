//! HTTP 徽章数据源
//!
//! 远程数据布局：
//!
//! - `GET <base>/<userId>.json` -> 徽章类型字符串数组
//! - `GET <base>/data/<badgeType>.json` -> `{ name, id, url }`
//!
//! 所有请求都带 `Cache-Control: no-cache`，绕过中间缓存。

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use badge_shared::config::SourceConfig;
use badge_shared::observability::metrics::{ENDPOINT_BADGE_DETAILS, ENDPOINT_USER_BADGES};

use super::{BadgeDataSource, degrade};
use crate::error::{BadgeError, Result};
use crate::models::{BadgeDetails, BadgeRef};

/// 默认的徽章数据仓库地址
pub const DEFAULT_BASE_URL: &str = badge_shared::config::DEFAULT_BADGE_BASE_URL;

/// 基于 reqwest 的徽章数据源
///
/// 单次请求，不重试、不退避，也不设置超时。
#[derive(Debug, Clone)]
pub struct HttpBadgeSource {
    client: Client,
    base_url: Url,
}

impl HttpBadgeSource {
    /// 使用默认 HTTP 客户端创建
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Self::with_client(client, base_url)
    }

    /// 使用调用方提供的 HTTP 客户端创建
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| BadgeError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        if parsed.cannot_be_a_base() {
            return Err(BadgeError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Self::new(&config.base_url)
    }

    /// 在 base 地址后追加路径段，每段都会做百分号编码
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn user_badges_url(&self, user_id: &str) -> Url {
        self.endpoint(&[&format!("{user_id}.json")])
    }

    pub(crate) fn badge_details_url(&self, badge: &BadgeRef) -> Url {
        self.endpoint(&["data", &format!("{badge}.json")])
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BadgeError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// 查询用户徽章列表，失败时返回错误
    ///
    /// 响应体为 `null` 视为查询未命中。
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn try_list_badges(&self, user_id: &str) -> Result<Vec<BadgeRef>> {
        let url = self.user_badges_url(user_id);
        let refs: Option<Vec<BadgeRef>> = self.fetch_json(url.clone()).await?;
        let refs = refs.ok_or_else(|| BadgeError::LookupMiss(url.to_string()))?;

        debug!(count = refs.len(), "Fetched user badge list");
        Ok(refs)
    }

    /// 查询徽章详情，失败时返回错误
    #[instrument(skip(self), fields(badge = %badge))]
    pub async fn try_get_badge_details(&self, badge: &BadgeRef) -> Result<BadgeDetails> {
        let url = self.badge_details_url(badge);
        let details: Option<BadgeDetails> = self.fetch_json(url.clone()).await?;
        details.ok_or_else(|| BadgeError::LookupMiss(url.to_string()))
    }
}

#[async_trait]
impl BadgeDataSource for HttpBadgeSource {
    async fn list_badges(&self, user_id: &str) -> Vec<BadgeRef> {
        degrade(
            ENDPOINT_USER_BADGES,
            user_id,
            self.try_list_badges(user_id).await,
        )
        .unwrap_or_default()
    }

    async fn get_badge_details(&self, badge: &BadgeRef) -> Option<BadgeDetails> {
        degrade(
            ENDPOINT_BADGE_DETAILS,
            badge.as_str(),
            self.try_get_badge_details(badge).await,
        )
    }
}
