//! 结果发布模块
//!
//! 将失败或非200的探测结果发送到外部告警通道

pub mod http;
pub mod memory;
pub mod sender;

// 重新导出主要类型
pub use http::HttpPublisher;
pub use memory::MemoryPublisher;
pub use sender::{NoOpPublisher, ResultPublisher};
