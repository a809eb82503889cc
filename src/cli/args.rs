//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::config::{MonitorConfig, SessionConfig};
use crate::logging::LogConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Endpoint Vitals - 端点健康监控与实时推送
#[derive(Parser, Debug, Clone)]
#[command(
    name = "endpoint-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 监听地址，`:port` 表示监听所有网卡
    #[arg(
        short,
        long,
        value_name = "ADDR",
        default_value = ":8080",
        help = "HTTP监听地址",
        env = "ENDPOINT_VITALS_ADDR"
    )]
    pub addr: String,

    /// 快照页面模板路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "templates/endpoints.hbs",
        help = "快照页面模板路径",
        env = "ENDPOINT_VITALS_TEMPLATE"
    )]
    pub template: PathBuf,

    /// 推送轮询间隔
    #[arg(
        short,
        long,
        value_name = "DURATION",
        default_value = "10s",
        value_parser = parse_duration,
        help = "推送轮询间隔（如 10s、1m）",
        env = "ENDPOINT_VITALS_INTERVAL"
    )]
    pub interval: Duration,

    /// 是否跟随重定向
    #[arg(
        short,
        long,
        help = "探测时跟随HTTP重定向",
        env = "ENDPOINT_VITALS_FOLLOW_REDIRECTS"
    )]
    pub follow_redirects: bool,

    /// 端点列表文件
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "endpoints.json",
        help = "端点列表文件（JSON）",
        env = "ENDPOINT_VITALS_ENDPOINTS"
    )]
    pub endpoints: PathBuf,

    /// 单次探测超时
    #[arg(
        long,
        value_name = "DURATION",
        default_value = "10s",
        value_parser = parse_duration,
        help = "单次探测超时",
        env = "ENDPOINT_VITALS_TIMEOUT"
    )]
    pub timeout: Duration,

    /// 失败结果上报地址
    #[arg(
        long,
        value_name = "URL",
        help = "失败结果上报地址（HTTP POST）",
        env = "ENDPOINT_VITALS_PUBLISH_URL"
    )]
    pub publish_url: Option<String>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "ENDPOINT_VITALS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 是否输出JSON格式日志
    #[arg(long, help = "输出JSON格式日志", env = "ENDPOINT_VITALS_JSON_LOGS")]
    pub json_logs: bool,

    /// 日志文件路径
    #[arg(
        long,
        value_name = "FILE",
        help = "日志写入文件而不是控制台",
        env = "ENDPOINT_VITALS_LOG_FILE"
    )]
    pub log_file: Option<PathBuf>,

    /// 禁用端点文件中的环境变量替换
    #[arg(long, help = "禁用端点文件中的 ${VAR} 环境变量替换")]
    pub no_env_substitution: bool,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    let duration = humantime::parse_duration(value).map_err(|e| e.to_string())?;
    if duration.is_zero() {
        return Err("时长必须大于0".to_string());
    }
    Ok(duration)
}

impl Args {
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 实际绑定的监听地址
    ///
    /// `:8080` 规范化为 `0.0.0.0:8080`，其他形式原样返回
    pub fn listen_addr(&self) -> String {
        normalize_addr(&self.addr)
    }

    /// 构建监控配置
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            probe_timeout: self.timeout,
            follow_redirects: self.follow_redirects,
            publish_url: self.publish_url.clone(),
        }
    }

    /// 构建推送会话配置
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::with_poll_interval(self.interval)
    }

    /// 构建日志配置
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.into(),
            json_format: self.json_logs,
            file_path: self.log_file.clone(),
            console: self.log_file.is_none(),
            ..LogConfig::default()
        }
    }
}

/// 规范化监听地址
pub fn normalize_addr(addr: &str) -> String {
    match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => addr.to_string(),
    }
}
