//! Web服务模块
//!
//! 提供HTML快照页面和WebSocket实时推送

use crate::config::SessionConfig;
use crate::health::Poller;
use std::sync::Arc;

pub mod handlers;
pub mod server;
pub mod session;
pub mod template;

// 重新导出主要类型
pub use server::{create_router, WebServer};
pub use session::{PushSession, SessionEnd};
pub use template::SnapshotTemplate;

/// Web应用共享状态
///
/// 所有字段在启动后只读
#[derive(Clone)]
pub struct AppState {
    /// 轮询器
    pub poller: Arc<Poller>,
    /// 快照页面模板
    pub template: Arc<SnapshotTemplate>,
    /// 推送会话配置
    pub session: SessionConfig,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(poller: Arc<Poller>, template: Arc<SnapshotTemplate>, session: SessionConfig) -> Self {
        Self {
            poller,
            template,
            session,
        }
    }
}
