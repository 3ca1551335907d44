//! 徽章数据客户端
//!
//! 定义远程徽章数据源的读取接口，并提供基于 HTTP 的实现。
//!
//! 两个读取操作都是"尽力而为"的单次请求：任何失败都降级为空结果，
//! 只在本地记录日志和指标，不向调用方传播。

mod http;

pub use http::{DEFAULT_BASE_URL, HttpBadgeSource};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{BadgeError, FailureKind};
use crate::models::{BadgeDetails, BadgeRef};
use badge_shared::observability::metrics::BADGE_LOOKUPS_TOTAL;

/// 徽章数据源接口
///
/// 实现方必须自行吞掉失败：列表查询失败返回空列表，详情查询失败返回 `None`。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeDataSource: Send + Sync {
    /// 查询用户持有的徽章类型列表
    async fn list_badges(&self, user_id: &str) -> Vec<BadgeRef>;

    /// 查询单个徽章类型的展示信息
    async fn get_badge_details(&self, badge: &BadgeRef) -> Option<BadgeDetails>;
}

/// 将查询结果降级为 Option，同时记录日志和指标
///
/// 404 与 `null` 是常规的"没有数据"，只记 debug；其余失败记 warn。
///
/// `endpoint` 用作指标标签，`key` 为用户 ID 或徽章类型。
pub(crate) fn degrade<T>(
    endpoint: &'static str,
    key: &str,
    result: Result<T, BadgeError>,
) -> Option<T> {
    match result {
        Ok(value) => {
            metrics::counter!(BADGE_LOOKUPS_TOTAL, "endpoint" => endpoint, "outcome" => "hit")
                .increment(1);
            Some(value)
        }
        Err(e) => {
            let outcome = match e.failure_kind() {
                FailureKind::LookupMiss => "miss",
                _ => "error",
            };
            metrics::counter!(BADGE_LOOKUPS_TOTAL, "endpoint" => endpoint, "outcome" => outcome)
                .increment(1);

            if e.is_not_found() {
                debug!(
                    endpoint,
                    key = %key,
                    code = e.error_code(),
                    "Badge data not found, treating as empty"
                );
            } else {
                warn!(
                    endpoint,
                    key = %key,
                    code = e.error_code(),
                    error = %e,
                    "Failed to request/parse badge data, treating as empty"
                );
            }
            None
        }
    }
}
