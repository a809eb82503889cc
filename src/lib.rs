//! Endpoint Vitals - 轻量级端点健康监控工具
//!
//! 这是一个用Rust编写的端点健康监控工具，支持：
//! - 并发HTTP端点探测
//! - WebSocket实时推送快照
//! - HTML快照页面
//! - 失败结果发布
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod notification;
pub mod signal;
pub mod web;

// 重新导出主要类型
pub use config::{EndpointSet, MonitorConfig, SessionConfig};
pub use error::EndpointVitalsError;
pub use health::{HttpProber, Poller, ProbeResult, Prober, Snapshot};
pub use notification::ResultPublisher;

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
