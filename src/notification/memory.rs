//! 内存结果发布器
//!
//! 记录所有收到的结果，供测试和调试使用

use crate::error::PublishError;
use crate::health::ProbeResult;
use crate::notification::sender::ResultPublisher;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// 内存发布器
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    published: Mutex<Vec<ProbeResult>>,
    /// 为 true 时每次发布都返回错误（结果仍会被记录）
    fail: bool,
}

impl MemoryPublisher {
    /// 创建新的内存发布器
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个总是发布失败的内存发布器
    pub fn failing() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// 已发布结果的副本，按端点排序
    pub fn published(&self) -> Vec<ProbeResult> {
        let mut results = self
            .published
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
        results.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
        results
    }

    /// 等待至少 `count` 个结果被发布，或超时后返回当前记录
    ///
    /// 发布在后台任务中完成，调用方需要等待而不是立即读取
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<ProbeResult> {
        let deadline = Instant::now() + timeout;
        loop {
            let results = self.published();
            if results.len() >= count || Instant::now() >= deadline {
                return results;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl ResultPublisher for MemoryPublisher {
    async fn publish(&self, result: &ProbeResult) -> Result<(), PublishError> {
        match self.published.lock() {
            Ok(mut guard) => guard.push(result.clone()),
            Err(poisoned) => poisoned.into_inner().push(result.clone()),
        }

        if self.fail {
            Err(PublishError::Status(503))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_publisher_records_results() {
        let publisher = MemoryPublisher::new();
        publisher
            .publish(&ProbeResult::new("http://b.test", 500))
            .await
            .unwrap();
        publisher
            .publish(&ProbeResult::failed("http://a.test"))
            .await
            .unwrap();

        let published = publisher.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0], ProbeResult::failed("http://a.test"));
        assert_eq!(published[1].status, 500);
    }

    #[tokio::test]
    async fn test_failing_memory_publisher() {
        let publisher = MemoryPublisher::failing();
        let result = publisher.publish(&ProbeResult::failed("http://a.test")).await;

        assert!(result.is_err());
        assert_eq!(publisher.published().len(), 1);
    }
}
