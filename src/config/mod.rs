//! 配置管理模块
//!
//! 提供端点配置解析、验证以及运行时配置结构

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{ConfigLoader, JsonEndpointLoader};
pub use types::{validate_config, EndpointSet, EndpointsConfig, MonitorConfig, SessionConfig};
