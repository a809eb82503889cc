//! 轮询器模块
//!
//! 一轮探测：并发探测端点集合中的每个端点，在汇聚点收集恰好 N 个结果后生成快照。
//! 任何单个端点的失败都以 `-1` 记录在快照中，轮询本身从不失败。

use crate::config::EndpointSet;
use crate::health::prober::Prober;
use crate::health::result::{ProbeResult, Snapshot, STATUS_FAILED, STATUS_PENDING};
use crate::notification::ResultPublisher;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

/// 轮询器
///
/// 端点集合、探测器和发布器都是只读共享的，多个会话可以同时调用 [`Poller::round`]。
pub struct Poller {
    /// 端点集合
    endpoints: EndpointSet,
    /// 探测器
    prober: Arc<dyn Prober>,
    /// 结果发布器
    publisher: Arc<dyn ResultPublisher>,
}

impl Poller {
    /// 创建新的轮询器
    ///
    /// # 参数
    /// * `endpoints` - 端点集合
    /// * `prober` - 探测器
    /// * `publisher` - 失败结果发布器
    pub fn new(
        endpoints: EndpointSet,
        prober: Arc<dyn Prober>,
        publisher: Arc<dyn ResultPublisher>,
    ) -> Self {
        Self {
            endpoints,
            prober,
            publisher,
        }
    }

    /// 端点集合
    pub fn endpoints(&self) -> &EndpointSet {
        &self.endpoints
    }

    /// 执行一轮探测
    ///
    /// 耗时取决于最慢的端点。若调用方在完成前丢弃返回的 future，
    /// 内部的 `JoinSet` 随之被丢弃，所有尚未完成的探测任务会被中止。
    pub async fn round(&self) -> Snapshot {
        let started = Instant::now();

        let mut data: BTreeMap<String, i32> = self
            .endpoints
            .iter()
            .map(|endpoint| (endpoint.to_string(), STATUS_PENDING))
            .collect();

        let mut probes = JoinSet::new();
        for endpoint in self.endpoints.iter() {
            let endpoint = endpoint.to_string();
            let prober = Arc::clone(&self.prober);
            let publisher = Arc::clone(&self.publisher);

            probes.spawn(async move {
                let result = prober.probe(&endpoint).await;
                if result.needs_publish() {
                    // 发布在独立任务中进行，不计入本轮耗时
                    let published = result.clone();
                    tokio::spawn(async move {
                        Self::publish(publisher.as_ref(), &published).await;
                    });
                }
                result
            });
        }

        // 汇聚：恰好收集 N 个结果
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(result) => {
                    data.insert(result.endpoint, result.status);
                }
                Err(e) => warn!("探测任务异常退出: {}", e),
            }
        }

        // 异常退出的任务没有结果，按请求失败处理
        for (endpoint, status) in data.iter_mut() {
            if *status == STATUS_PENDING {
                debug!("端点 {} 没有返回结果，记为失败", endpoint);
                *status = STATUS_FAILED;
            }
        }

        let failures = data.values().filter(|s| **s == STATUS_FAILED).count();
        debug!(
            "本轮探测完成: {} 个端点, {} 个失败, 耗时 {}ms",
            data.len(),
            failures,
            started.elapsed().as_millis()
        );

        Snapshot::new(data)
    }

    /// 发布单个结果，失败只记录日志
    async fn publish(publisher: &dyn ResultPublisher, result: &ProbeResult) {
        if let Err(e) = publisher.publish(result).await {
            debug!("发布探测结果失败 {}: {}", result.endpoint, e);
        }
    }
}
