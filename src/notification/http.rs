//! HTTP结果发布器模块
//!
//! 将失败结果以JSON形式POST到外部告警地址

use crate::error::PublishError;
use crate::health::ProbeResult;
use crate::notification::sender::ResultPublisher;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// HTTP转发发布器
pub struct HttpPublisher {
    /// HTTP客户端
    client: Client,
    /// 发布目标地址
    target_url: String,
}

impl HttpPublisher {
    /// 创建新的HTTP发布器
    ///
    /// # 参数
    /// * `target_url` - 发布目标地址
    /// * `timeout` - 单次发布超时时间
    pub fn new(target_url: impl Into<String>, timeout: Duration) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()?;

        Ok(Self {
            client,
            target_url: target_url.into(),
        })
    }

    /// 构建发布消息体
    fn build_message_body(result: &ProbeResult) -> Value {
        json!({
            "endpoint": result.endpoint,
            "status": result.status,
            "failed": result.is_failure(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })
    }
}

#[async_trait]
impl ResultPublisher for HttpPublisher {
    async fn publish(&self, result: &ProbeResult) -> Result<(), PublishError> {
        debug!("发布探测结果到 {}: {:?}", self.target_url, result);

        let response = self
            .client
            .post(&self.target_url)
            .json(&Self::build_message_body(result))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PublishError::Status(response.status().as_u16()))
        }
    }
}
