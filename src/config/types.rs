//! 配置数据结构定义
//!
//! 定义端点列表、监控配置、推送会话配置及其验证逻辑

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// 端点配置文件结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointsConfig {
    /// 端点URL列表（按配置顺序）
    pub endpoints: Vec<String>,
}

/// 不可变的端点集合
///
/// 启动时加载一次，之后在所有组件之间只读共享。重复的URL只保留第一次出现的位置。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndpointSet {
    endpoints: Arc<[String]>,
}

impl EndpointSet {
    /// 从URL列表创建端点集合，按首次出现顺序去重
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<String> = endpoints
            .into_iter()
            .map(Into::into)
            .filter(|endpoint| seen.insert(endpoint.clone()))
            .collect();

        Self {
            endpoints: unique.into(),
        }
    }

    /// 端点数量
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// 遍历端点
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.endpoints.iter().map(String::as_str)
    }
}

impl From<EndpointsConfig> for EndpointSet {
    fn from(config: EndpointsConfig) -> Self {
        Self::new(config.endpoints)
    }
}

/// 监控运行时配置
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// 单次探测超时时间
    pub probe_timeout: Duration,
    /// 是否跟随重定向
    pub follow_redirects: bool,
    /// 失败结果发布地址（可选）
    pub publish_url: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: default_probe_timeout(),
            follow_redirects: false,
            publish_url: None,
        }
    }
}

/// 推送会话配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// 轮询周期
    pub poll_interval: Duration,
    /// 心跳（Ping）周期，必须小于读超时
    pub ping_period: Duration,
    /// 单次写操作的超时时间
    pub write_wait: Duration,
    /// 读超时（存活窗口），每收到一帧刷新一次
    pub pong_wait: Duration,
    /// 客户端消息大小上限（字节）
    pub max_message_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let pong_wait = default_pong_wait();
        Self {
            poll_interval: default_poll_interval(),
            ping_period: pong_wait * 9 / 10,
            write_wait: default_write_wait(),
            pong_wait,
            max_message_size: 512,
        }
    }
}

impl SessionConfig {
    /// 使用指定轮询周期，其余取默认值
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..Default::default()
        }
    }

    /// 验证会话配置
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval.is_zero() {
            return Err("轮询间隔不能为0".to_string());
        }
        if self.ping_period.is_zero() {
            return Err("心跳周期不能为0".to_string());
        }
        if self.write_wait.is_zero() {
            return Err("写超时不能为0".to_string());
        }
        if self.ping_period >= self.pong_wait {
            return Err(format!(
                "心跳周期 {:?} 必须小于读超时 {:?}",
                self.ping_period, self.pong_wait
            ));
        }
        Ok(())
    }
}

// 默认值函数
fn default_poll_interval() -> Duration {
    Duration::from_secs(10)
}
fn default_probe_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_write_wait() -> Duration {
    Duration::from_secs(10)
}
fn default_pong_wait() -> Duration {
    Duration::from_secs(60)
}

/// 端点配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &EndpointsConfig) -> Result<(), String> {
    for (index, endpoint) in config.endpoints.iter().enumerate() {
        if endpoint.trim().is_empty() {
            return Err(format!("第 {} 个端点为空", index + 1));
        }

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(format!("端点 {} 的URL格式无效", endpoint));
        }
    }

    Ok(())
}
