//! HTTP探测客户端实现
//!
//! 每个端点发送一次GET请求，只关心状态码，不读取响应体

use crate::error::Result;
use crate::health::result::ProbeResult;
use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::Duration;
use tracing::debug;

/// 探测器trait，定义单端点探测接口
#[async_trait]
pub trait Prober: Send + Sync {
    /// 探测单个端点
    ///
    /// 失败以 `-1` 状态码的形式返回，不会返回错误
    async fn probe(&self, endpoint: &str) -> ProbeResult;
}

/// 基于 reqwest 的HTTP探测器
#[derive(Debug, Clone)]
pub struct HttpProber {
    /// HTTP客户端
    client: Client,
}

impl HttpProber {
    /// 创建新的HTTP探测器
    ///
    /// # 参数
    /// * `timeout` - 单次请求超时时间
    /// * `follow_redirects` - 是否跟随重定向；关闭时直接返回 3xx 状态码
    ///
    /// # 返回
    /// * `Result<Self>` - 探测器实例
    pub fn new(timeout: Duration, follow_redirects: bool) -> Result<Self> {
        let policy = if follow_redirects {
            redirect::Policy::default()
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .timeout(timeout)
            .redirect(policy)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()?;

        Ok(Self { client })
    }

    /// 格式化请求错误信息
    fn format_request_error(error: &reqwest::Error) -> &'static str {
        if error.is_timeout() {
            "Request timeout"
        } else if error.is_connect() {
            "Connection refused"
        } else if error.is_redirect() {
            "Redirect error"
        } else if error.is_request() {
            "Invalid request"
        } else {
            "Request failed"
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, endpoint: &str) -> ProbeResult {
        match self.client.get(endpoint).send().await {
            Ok(response) => ProbeResult::new(endpoint, i32::from(response.status().as_u16())),
            Err(e) => {
                debug!(
                    "探测失败 {}: {} ({})",
                    endpoint,
                    Self::format_request_error(&e),
                    e
                );
                ProbeResult::failed(endpoint)
            }
        }
    }
}
