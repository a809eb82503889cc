//! Endpoint Vitals 主程序入口
//!
//! 端点健康监控与实时推送服务

use anyhow::{Context, Result};
use endpoint_vitals::cli::Args;
use endpoint_vitals::config::{ConfigLoader, EndpointSet, JsonEndpointLoader, MonitorConfig};
use endpoint_vitals::health::{HttpProber, Poller};
use endpoint_vitals::logging::LoggingSystem;
use endpoint_vitals::notification::{HttpPublisher, NoOpPublisher, ResultPublisher};
use endpoint_vitals::signal::setup_signal_handlers;
use endpoint_vitals::web::{AppState, SnapshotTemplate, WebServer};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 初始化日志系统
    let logging_system =
        LoggingSystem::setup_logging(args.log_config()).context("初始化日志系统失败")?;

    info!("Endpoint Vitals v{} 启动", endpoint_vitals::VERSION);
    if let Some(path) = &logging_system.config().file_path {
        info!("日志输出到文件: {}", path.display());
    }

    if let Err(e) = run(args).await {
        error!("启动失败: {:#}", e);
        std::process::exit(1);
    }

    info!("Endpoint Vitals 已退出");
    Ok(())
}

/// 加载配置、组装组件并运行服务直到收到关闭信号
async fn run(args: Args) -> Result<()> {
    let monitor_config = args.monitor_config();
    let session_config = args.session_config();
    session_config
        .validate()
        .map_err(|e| anyhow::anyhow!(e))
        .context("推送会话配置无效")?;

    // 加载端点列表
    let loader = JsonEndpointLoader::new(!args.no_env_substitution);
    let endpoints_config = loader
        .load_from_file(&args.endpoints)
        .await
        .with_context(|| format!("加载端点列表失败: {}", args.endpoints.display()))?;
    let endpoints = EndpointSet::from(endpoints_config);
    if endpoints.is_empty() {
        warn!("端点列表为空，快照将不包含任何条目");
    }

    // 加载页面模板
    let template = SnapshotTemplate::from_file(&args.template)
        .with_context(|| format!("加载模板失败: {}", args.template.display()))?;

    let poller = build_poller(endpoints, &monitor_config)?;

    let state = AppState::new(Arc::new(poller), Arc::new(template), session_config);
    let server = WebServer::new(args.listen_addr(), state);
    let listener = server
        .bind()
        .await
        .with_context(|| format!("绑定监听地址失败: {}", server.addr()))?;

    // 关闭信号
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    setup_signal_handlers(shutdown_tx).context("设置信号处理器失败")?;

    info!(
        "推送间隔 {:?}，心跳间隔 {:?}，探测超时 {:?}",
        session_config.poll_interval, session_config.ping_period, monitor_config.probe_timeout
    );

    server
        .serve(listener, shutdown_rx)
        .await
        .context("Web服务器运行失败")?;

    Ok(())
}

/// 根据监控配置组装轮询器
fn build_poller(endpoints: EndpointSet, config: &MonitorConfig) -> Result<Poller> {
    let prober = HttpProber::new(config.probe_timeout, config.follow_redirects)
        .context("创建HTTP客户端失败")?;

    let publisher: Arc<dyn ResultPublisher> = match &config.publish_url {
        Some(url) => {
            info!("失败结果将上报到: {}", url);
            Arc::new(
                HttpPublisher::new(url.clone(), config.probe_timeout)
                    .context("创建结果发布器失败")?,
            )
        }
        None => Arc::new(NoOpPublisher),
    };

    Ok(Poller::new(endpoints, Arc::new(prober), publisher))
}
