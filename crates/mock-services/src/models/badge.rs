//! 模拟徽章数据模型
//!
//! 与远程徽章仓库的 JSON 文件格式一致：`{user_id}.json` 是徽章类型数组，
//! `data/{badge}.json` 是单个徽章的展示信息。

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 模拟徽章详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockBadge {
    pub name: String,
    pub id: String,
    pub url: String,
}

impl MockBadge {
    pub fn new(name: &str, id: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            url: url.to_string(),
        }
    }

    /// 内置的演示徽章
    pub fn demo_set() -> Vec<Self> {
        vec![
            Self::new("Gold", "gold", "https://cdn.example.com/badges/gold.png"),
            Self::new("Developer", "developer", "https://cdn.example.com/badges/developer.png"),
            Self::new("Supporter", "supporter", "https://cdn.example.com/badges/supporter.png"),
            Self::new("Translator", "translator", "https://cdn.example.com/badges/translator.png"),
        ]
    }
}

/// 徽章仓库的种子数据
///
/// `users` 为用户 ID 到徽章类型列表的映射，列表中允许出现没有详情的类型。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeSeed {
    pub users: BTreeMap<String, Vec<String>>,
    pub badges: Vec<MockBadge>,
}

impl BadgeSeed {
    /// 演示数据：一个同时持有已知与未知徽章的用户，一个没有徽章的用户
    pub fn demo() -> Self {
        let mut users = BTreeMap::new();
        users.insert(
            "123".to_string(),
            vec!["gold".to_string(), "staff".to_string()],
        );
        users.insert("456".to_string(), Vec::new());

        Self {
            users,
            badges: MockBadge::demo_set(),
        }
    }

    /// 生成随机的用户 ID（雪花 ID 风格的十八位数字）
    pub fn random_user_id() -> String {
        let mut rng = rand::thread_rng();
        rng.gen_range(100_000_000_000_000_000u64..1_000_000_000_000_000_000)
            .to_string()
    }
}
