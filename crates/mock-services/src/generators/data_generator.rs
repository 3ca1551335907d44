//! 数据生成器
//!
//! 批量生成徽章仓库的种子数据：随机用户各自持有若干徽章类型，
//! 其中一部分类型故意没有详情文件，用于覆盖详情缺失的路径。

use crate::models::{BadgeSeed, MockBadge};
use crate::services::BadgeSourceState;
use rand::Rng;
use rand::seq::SliceRandom;
use std::ops::Range;

/// 没有详情文件的徽章类型
const ORPHAN_BADGES: &[&str] = &["staff", "legacy"];

/// 数据生成器配置
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// 生成的用户数量
    pub user_count: usize,
    /// 每个用户持有的徽章数量范围
    pub badges_per_user: Range<usize>,
}

impl Default for GeneratorConfig {
    /// 默认配置：100 用户，每人 0-4 个徽章
    fn default() -> Self {
        Self {
            user_count: 100,
            badges_per_user: 0..5,
        }
    }
}

/// 批量数据生成器
pub struct DataGenerator {
    config: GeneratorConfig,
}

impl DataGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// 为单个用户随机挑选徽章类型
    pub fn generate_badge_list(&self) -> Vec<String> {
        let mut rng = rand::thread_rng();
        let count = if self.config.badges_per_user.is_empty() {
            0
        } else {
            rng.gen_range(self.config.badges_per_user.clone())
        };

        let mut pool: Vec<String> = MockBadge::demo_set().into_iter().map(|b| b.id).collect();
        pool.extend(ORPHAN_BADGES.iter().map(|id| id.to_string()));
        pool.shuffle(&mut rng);
        pool.truncate(count);
        pool
    }

    /// 生成完整的种子数据
    pub fn generate_seed(&self) -> BadgeSeed {
        let mut seed = BadgeSeed {
            badges: MockBadge::demo_set(),
            ..Default::default()
        };

        while seed.users.len() < self.config.user_count {
            seed.users
                .insert(BadgeSeed::random_user_id(), self.generate_badge_list());
        }
        seed
    }

    /// 生成数据并填充到服务状态
    pub fn populate(&self, state: &BadgeSourceState) -> BadgeSeed {
        let seed = self.generate_seed();
        state.load_seed(&seed);
        seed
    }
}

/// 统计数据生成结果
#[derive(Debug, Clone)]
pub struct GenerationStats {
    pub users_count: usize,
    pub badges_count: usize,
    /// 所有用户持有的徽章总数
    pub assignments_count: usize,
}

impl GenerationStats {
    pub fn from_seed(seed: &BadgeSeed) -> Self {
        Self {
            users_count: seed.users.len(),
            badges_count: seed.badges.len(),
            assignments_count: seed.users.values().map(Vec::len).sum(),
        }
    }
}
