//! 徽章数据模型
//!
//! 远程数据源只提供两类数据：用户持有的徽章类型列表，以及单个徽章类型的展示信息。

use serde::{Deserialize, Serialize};

/// 用户 ID（宿主用户记录中的 id 字段）
pub type UserId = String;

/// 徽章类型标识
///
/// 由远程 "用户徽章" 接口返回的不透明字符串，本地不做唯一性约束。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeRef(String);

impl BadgeRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BadgeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BadgeRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BadgeRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 徽章展示信息
///
/// 对应 `<base>/data/<badgeType>.json` 的响应体。缺失的字段按空字符串处理，
/// `url` 为空时展示层不会渲染该徽章。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BadgeDetails {
    /// 展示名称
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    /// 徽章图片地址
    #[serde(default)]
    pub url: String,
}

impl BadgeDetails {
    pub fn new(name: impl Into<String>, id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            url: url.into(),
        }
    }

    /// 是否带有可展示的图片
    pub fn has_image(&self) -> bool {
        !self.url.trim().is_empty()
    }
}
