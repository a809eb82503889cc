//! Web 路由处理函数
//!
//! 实现快照页面、WebSocket升级以及 404/405 响应

use super::session::PushSession;
use super::AppState;
use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, error, warn};

/// 快照页面处理函数
///
/// 每个请求独立执行一轮探测并渲染模板
pub async fn snapshot_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let snapshot = state.poller.round().await;

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match state.template.render(&snapshot, host) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("模板渲染失败: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed").into_response()
        }
    }
}

/// WebSocket 升级处理函数
///
/// 非升级请求直接返回握手错误，只记录调试日志
pub async fn push_channel(
    State(state): State<AppState>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => {
            debug!("WebSocket握手被拒绝: {}", rejection);
            return rejection.into_response();
        }
    };

    let session = PushSession::new(state.poller.clone(), state.session);

    ws.max_message_size(state.session.max_message_size)
        .on_failed_upgrade(|e| warn!("WebSocket升级失败: {}", e))
        .on_upgrade(move |socket| session.run(socket))
}

/// 未知路径
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// 不支持的方法
pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EndpointSet, SessionConfig};
    use crate::health::{Poller, ProbeResult, Prober};
    use crate::notification::NoOpPublisher;
    use crate::web::template::SnapshotTemplate;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedProber;

    #[async_trait]
    impl Prober for FixedProber {
        async fn probe(&self, endpoint: &str) -> ProbeResult {
            if endpoint.contains("down") {
                ProbeResult::failed(endpoint)
            } else {
                ProbeResult::new(endpoint, 200)
            }
        }
    }

    fn test_state(template: &str) -> AppState {
        let poller = Poller::new(
            EndpointSet::new(["http://up.test", "http://down.test"]),
            Arc::new(FixedProber),
            Arc::new(NoOpPublisher),
        );

        AppState {
            poller: Arc::new(poller),
            template: Arc::new(SnapshotTemplate::from_string(template).unwrap()),
            session: SessionConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_snapshot_page_handler() {
        let state = test_state("{{Host}} {{#each Rows}}{{endpoint}}={{status}} {{/each}}");
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "monitor.local".parse().unwrap());

        let response = snapshot_page(State(state), headers).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(body, "monitor.local http://down.test=-1 http://up.test=200 ");
    }

    #[tokio::test]
    async fn test_render_failure_is_internal_error() {
        // 未注册的 helper 在渲染时报错
        let state = test_state("{{no_such_helper Data}}");

        let response = snapshot_page(State(state), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_not_found_and_method_not_allowed() {
        let response = not_found().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = method_not_allowed().await.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
