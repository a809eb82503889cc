//! Web服务器实现
//!
//! 提供HTTP服务器和路由管理

use super::{handlers, AppState};
use crate::error::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 创建路由
///
/// - `GET /`   快照页面，其他方法返回 405
/// - `GET /ws` WebSocket 推送通道
/// - 其他路径返回 404
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::snapshot_page).fallback(handlers::method_not_allowed),
        )
        .route("/ws", get(handlers::push_channel))
        .fallback(handlers::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Web服务器
pub struct WebServer {
    /// 监听地址
    addr: String,
    /// 应用状态
    state: AppState,
}

impl WebServer {
    /// 创建新的Web服务器
    pub fn new(addr: impl Into<String>, state: AppState) -> Self {
        Self {
            addr: addr.into(),
            state,
        }
    }

    /// 监听地址
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// 绑定监听地址
    pub async fn bind(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind(&self.addr).await?;
        Ok(listener)
    }

    /// 在已绑定的监听器上运行服务器，直到收到关闭信号
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        let local_addr = listener.local_addr()?;
        info!(
            "Web服务器已启动: http://{} ({} 个端点)",
            local_addr,
            self.state.poller.endpoints().len()
        );
        info!("推送通道: ws://{}/ws", local_addr);

        let router = create_router(self.state);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("接收到关闭信号，正在关闭Web服务器...");
            })
            .await?;

        info!("Web服务器已关闭");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EndpointSet, SessionConfig};
    use crate::health::{Poller, ProbeResult, Prober};
    use crate::notification::NoOpPublisher;
    use crate::web::SnapshotTemplate;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct UpProber;

    #[async_trait]
    impl Prober for UpProber {
        async fn probe(&self, endpoint: &str) -> ProbeResult {
            ProbeResult::new(endpoint, 200)
        }
    }

    fn test_state() -> AppState {
        let poller = Poller::new(
            EndpointSet::new(["http://a.test"]),
            Arc::new(UpProber),
            Arc::new(NoOpPublisher),
        );
        AppState::new(
            Arc::new(poller),
            Arc::new(SnapshotTemplate::from_string("{{#each Rows}}{{status}}{{/each}}").unwrap()),
            SessionConfig::default(),
        )
    }

    async fn call(method: &str, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = create_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_root_renders_snapshot() {
        let (status, body) = call("GET", "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "200");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (status, body) = call("GET", "/favicon.ico").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found");
    }

    #[tokio::test]
    async fn test_non_get_root_is_method_not_allowed() {
        let (status, body) = call("POST", "/").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, "Method not allowed");

        let (status, _) = call("DELETE", "/").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_plain_request_to_ws_is_rejected() {
        let (status, _) = call("GET", "/ws").await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_bind_reports_address() {
        let server = WebServer::new("127.0.0.1:0", test_state());
        assert_eq!(server.addr(), "127.0.0.1:0");

        let listener = server.bind().await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
