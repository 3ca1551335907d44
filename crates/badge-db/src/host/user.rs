//! 宿主用户记录

use std::sync::Arc;

/// 所有标志位都置位
pub const ALL_FLAGS: u64 = u64::MAX;

/// 宿主用户记录接口
///
/// 徽章区域只依赖这三个能力：用户 ID、标志位字段和标志位检查。
pub trait HostUser: Send + Sync + std::fmt::Debug {
    fn id(&self) -> &str;

    fn flags(&self) -> u64;

    fn has_flag(&self, flag: u64) -> bool;
}

/// 普通用户记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUser {
    pub id: String,
    pub flags: u64,
}

impl ProfileUser {
    pub fn new(id: impl Into<String>, flags: u64) -> Self {
        Self {
            id: id.into(),
            flags,
        }
    }
}

impl HostUser for ProfileUser {
    fn id(&self) -> &str {
        &self.id
    }

    fn flags(&self) -> u64 {
        self.flags
    }

    fn has_flag(&self, flag: u64) -> bool {
        self.flags & flag == flag
    }
}

/// 强制满足展示条件的用户包装
///
/// 宿主在用户没有任何原生徽章时不会渲染徽章区域。构造基线渲染时用它包装真实用户：
/// `id` 透传，`flags` 恒为全 1，`has_flag` 恒为 true。
#[derive(Debug, Clone)]
pub struct EligibleUser {
    inner: Arc<dyn HostUser>,
}

impl EligibleUser {
    pub fn new(inner: Arc<dyn HostUser>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Arc<dyn HostUser> {
        &self.inner
    }
}

impl HostUser for EligibleUser {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn flags(&self) -> u64 {
        ALL_FLAGS
    }

    fn has_flag(&self, _flag: u64) -> bool {
        true
    }
}
