//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Endpoint Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum EndpointVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 模板相关错误
    #[error("模板错误: {0}")]
    Template(#[from] TemplateError),

    /// 结果发布相关错误
    #[error("发布错误: {0}")]
    Publish(#[from] PublishError),

    /// HTTP客户端构建错误
    #[error("HTTP客户端错误: {0}")]
    Client(#[from] reqwest::Error),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 模板错误类型
#[derive(Error, Debug)]
pub enum TemplateError {
    /// 模板加载失败
    #[error("无法加载模板 {path}: {reason}")]
    Load { path: String, reason: String },

    /// 模板渲染失败
    #[error("模板渲染失败: {0}")]
    Render(String),
}

/// 结果发布错误类型
#[derive(Error, Debug)]
pub enum PublishError {
    /// 请求发送失败
    #[error("发布请求失败: {0}")]
    Request(#[from] reqwest::Error),

    /// 接收端返回非成功状态码
    #[error("发布目标返回状态码 {0}")]
    Status(u16),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, EndpointVitalsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps_into_top_level() {
        let err: EndpointVitalsError = ConfigError::FileNotFound {
            path: "endpoints.json".to_string(),
        }
        .into();

        let message = err.to_string();
        assert!(message.contains("配置错误"));
        assert!(message.contains("endpoints.json"));
    }

    #[test]
    fn test_publish_status_message() {
        let err = PublishError::Status(502);
        assert_eq!(err.to_string(), "发布目标返回状态码 502");
    }
}
