//! 徽章解析
//!
//! - `resolver`: 列表 -> 详情的两步解析
//! - `session`: 按挂载生命周期记忆化解析结果

mod resolver;
mod session;

pub use resolver::BadgeResolver;
pub use session::{ResolutionSession, SessionState};
