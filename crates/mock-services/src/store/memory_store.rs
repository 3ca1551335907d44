//! 内存存储
//!
//! 使用 DashMap 实现的高并发内存存储，按字符串 key 保存徽章仓库的文件内容与请求统计。

use dashmap::DashMap;
use std::sync::Arc;

/// 通用内存存储
///
/// 克隆后共享同一份数据，handler 与测试代码可以同时读写。
#[derive(Debug)]
pub struct MemoryStore<T> {
    data: Arc<DashMap<String, T>>,
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// 插入或覆盖
    pub fn insert(&self, id: &str, value: T) {
        self.data.insert(id.to_string(), value);
    }

    /// 获取数据的克隆，不持有锁
    pub fn get(&self, id: &str) -> Option<T> {
        self.data.get(id).map(|v| v.clone())
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        self.data.remove(id).map(|(_, v)| v)
    }

    /// 所有 key，按字典序排列
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn clear(&self) {
        self.data.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.data.contains_key(id)
    }

    /// 批量插入，key 由 `key_fn` 从元素中提取
    pub fn insert_many<I, F>(&self, items: I, key_fn: F)
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> String,
    {
        for item in items {
            let key = key_fn(&item);
            self.data.insert(key, item);
        }
    }
}

impl MemoryStore<u64> {
    /// 原子地把计数加一，返回新值
    pub fn increment(&self, id: &str) -> u64 {
        let mut entry = self.data.entry(id.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 所有计数之和
    pub fn total(&self) -> u64 {
        self.data.iter().map(|e| *e.value()).sum()
    }
}

impl<T: Clone> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}
