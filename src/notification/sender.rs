//! 结果发布器模块
//!
//! 定义失败结果发布的trait和基础实现

use crate::error::PublishError;
use crate::health::ProbeResult;
use async_trait::async_trait;

/// 结果发布器trait
///
/// 轮询器对每个失败或非200的探测结果调用一次 `publish`，
/// 发布失败只会被记录，不会影响快照。
#[async_trait]
pub trait ResultPublisher: Send + Sync {
    /// 发布单个探测结果
    ///
    /// # 参数
    /// * `result` - 探测结果
    ///
    /// # 返回
    /// * `Result<(), PublishError>` - 发布结果
    async fn publish(&self, result: &ProbeResult) -> Result<(), PublishError>;
}

/// 空的发布器实现（未配置发布地址时使用）
pub struct NoOpPublisher;

#[async_trait]
impl ResultPublisher for NoOpPublisher {
    async fn publish(&self, _result: &ProbeResult) -> Result<(), PublishError> {
        // 不执行任何操作
        Ok(())
    }
}
