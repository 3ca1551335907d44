//! 两步徽章解析：先查用户徽章列表，再逐个查询徽章详情

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::{debug, info, instrument};

use badge_shared::observability::metrics::BADGE_RESOLUTION_DURATION_SECONDS;

use crate::client::BadgeDataSource;
use crate::models::{BadgeDetails, BadgeRef};

/// 徽章解析器
///
/// 无状态，多个会话可共享同一个实例。
#[derive(Clone)]
pub struct BadgeResolver {
    source: Arc<dyn BadgeDataSource>,
}

impl BadgeResolver {
    pub fn new(source: Arc<dyn BadgeDataSource>) -> Self {
        Self { source }
    }

    /// 解析用户的全部徽章
    ///
    /// - 列表为空时直接返回，不发起任何详情查询
    /// - 详情查询并发执行，结果按列表顺序输出
    /// - 查询不到详情的徽章被跳过
    /// - 重复的徽章类型原样保留，但同一类型只查询一次
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn resolve(&self, user_id: &str) -> Vec<BadgeDetails> {
        let start = Instant::now();
        let refs = self.source.list_badges(user_id).await;
        if refs.is_empty() {
            debug!("User has no remote badges");
            return Vec::new();
        }

        let mut seen = HashSet::with_capacity(refs.len());
        let distinct: Vec<&BadgeRef> = refs.iter().filter(|r| seen.insert(*r)).collect();

        let lookups = distinct
            .iter()
            .map(|badge| self.source.get_badge_details(badge));
        let results = join_all(lookups).await;

        let details: HashMap<&BadgeRef, BadgeDetails> = distinct
            .into_iter()
            .zip(results)
            .filter_map(|(badge, found)| found.map(|d| (badge, d)))
            .collect();

        let badges: Vec<BadgeDetails> = refs
            .iter()
            .filter_map(|badge| details.get(badge).cloned())
            .collect();

        metrics::histogram!(BADGE_RESOLUTION_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        info!(
            requested = refs.len(),
            resolved = badges.len(),
            "Resolved user badges"
        );
        badges
    }
}
