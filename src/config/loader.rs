//! 配置加载器实现
//!
//! 提供JSON端点配置解析、环境变量替换和错误处理功能

use crate::config::types::{validate_config, EndpointsConfig};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<EndpointsConfig>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<EndpointsConfig>;

    /// 从字符串加载配置
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    ///
    /// # 返回
    /// * `Result<EndpointsConfig>` - 加载的配置或错误
    async fn load_from_string(&self, content: &str) -> Result<EndpointsConfig>;

    /// 验证配置
    fn validate(&self, config: &EndpointsConfig) -> Result<()>;
}

/// JSON端点配置加载器实现
#[derive(Debug, Clone)]
pub struct JsonEndpointLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl JsonEndpointLoader {
    /// 创建新的JSON配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的 `${VAR_NAME}` 环境变量
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 解析JSON内容
    fn parse_json(&self, content: &str) -> Result<EndpointsConfig> {
        let processed_content = self.substitute_env_vars(content)?;

        let config: EndpointsConfig = serde_json::from_str(&processed_content)
            .map_err(|e| ConfigError::ParseError(format!("JSON解析失败: {}", e)))?;

        Ok(config)
    }
}

impl Default for JsonEndpointLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ConfigLoader for JsonEndpointLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<EndpointsConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        let config = self.parse_json(&content)?;
        self.validate(&config)?;

        log::info!(
            "成功加载端点配置: {} ({} 个端点)",
            path.display(),
            config.endpoints.len()
        );
        log::debug!("端点列表: {:?}", config.endpoints);

        Ok(config)
    }

    async fn load_from_string(&self, content: &str) -> Result<EndpointsConfig> {
        let config = self.parse_json(content)?;
        self.validate(&config)?;

        log::debug!("成功解析端点配置字符串");

        Ok(config)
    }

    fn validate(&self, config: &EndpointsConfig) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}
