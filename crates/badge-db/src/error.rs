//! 徽章查询错误类型
//!
//! 查询链路上的错误只在内部流转：数据客户端记录日志后降级为空结果，
//! 不会向宿主 UI 抛出。只有构造阶段（地址校验、运行时获取）会把错误返回给调用方。

use thiserror::Error;

/// 失败分类
///
/// 两类失败的处理方式完全相同：降级为空结果并记录日志。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 网络错误、非 2xx 响应、JSON 解析失败
    TransportOrParse,
    /// 响应合法但没有可用数据
    LookupMiss,
    /// 构造或运行环境错误，不属于查询失败
    Setup,
}

/// 徽章查询错误
#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("无效的数据源地址: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP 请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("数据源返回非成功状态: url={url}, status={status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("JSON 解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("数据源中没有可用记录: {0}")]
    LookupMiss(String),

    #[error("当前线程没有可用的 Tokio 运行时: {0}")]
    RuntimeUnavailable(String),
}

/// 徽章查询 Result 类型别名
pub type Result<T> = std::result::Result<T, BadgeError>;

impl BadgeError {
    /// 获取错误码（用于日志和指标标签）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidBaseUrl(_) => "INVALID_BASE_URL",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::Parse(_) => "PARSE_ERROR",
            Self::LookupMiss(_) => "LOOKUP_MISS",
            Self::RuntimeUnavailable(_) => "RUNTIME_UNAVAILABLE",
        }
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) | Self::UnexpectedStatus { .. } | Self::Parse(_) => {
                FailureKind::TransportOrParse
            }
            Self::LookupMiss(_) => FailureKind::LookupMiss,
            Self::InvalidBaseUrl(_) | Self::RuntimeUnavailable(_) => FailureKind::Setup,
        }
    }

    /// 是否属于"数据源里没有这条记录"的常规情况（404 或 `null`）
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::LookupMiss(_) | Self::UnexpectedStatus { status: 404, .. }
        )
    }
}
