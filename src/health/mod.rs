//! 健康探测模块
//!
//! 提供HTTP端点探测、结果数据结构和并发轮询功能

pub mod poller;
pub mod prober;
pub mod result;

// 重新导出主要类型
pub use poller::Poller;
pub use prober::{HttpProber, Prober};
pub use result::{ProbeResult, Snapshot, STATUS_FAILED, STATUS_PENDING};
