//! WebSocket推送会话
//!
//! 每个连接的客户端对应一个会话，会话内并发运行两个循环：
//! - 写循环：轮询定时器与心跳定时器通过同一个 `select!` 复用，
//!   轮询时执行一轮探测并推送快照，心跳时发送 Ping 帧
//! - 读循环：每次读取都受读超时约束，收到任何帧都会刷新存活窗口
//!
//! 任一循环结束，另一个随之被取消（包括正在进行的探测），随后尝试关闭连接。

use crate::config::SessionConfig;
use crate::health::Poller;
use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// 会话结束原因
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionEnd {
    /// 写操作失败
    #[error("写入失败: {0}")]
    WriteFailed(String),

    /// 写操作超过写超时
    #[error("写入超时")]
    WriteTimeout,

    /// 读超时内没有收到任何数据
    #[error("客户端存活检测超时")]
    ReadTimeout,

    /// 读操作失败
    #[error("读取失败: {0}")]
    ReadFailed(String),

    /// 客户端关闭连接
    #[error("客户端关闭连接")]
    ClientClosed,
}

/// 单个客户端的推送会话
pub struct PushSession {
    poller: Arc<Poller>,
    config: SessionConfig,
    /// 会话ID（用于日志）
    session_id: String,
}

impl PushSession {
    /// 创建新的推送会话
    pub fn new(poller: Arc<Poller>, config: SessionConfig) -> Self {
        let session_id = Uuid::new_v4().to_string()[..8].to_string();

        Self {
            poller,
            config,
            session_id,
        }
    }

    /// 会话ID
    pub fn id(&self) -> &str {
        &self.session_id
    }

    /// 运行会话直到连接结束
    pub async fn run(self, socket: WebSocket) {
        info!("[{}] 推送会话建立", self.session_id);

        let (mut sender, mut receiver) = socket.split();

        let reason = tokio::select! {
            reason = self.write_loop(&mut sender) => reason,
            reason = self.read_loop(&mut receiver) => reason,
        };

        match reason {
            SessionEnd::ClientClosed => info!("[{}] 推送会话结束: {}", self.session_id, reason),
            _ => warn!("[{}] 推送会话结束: {}", self.session_id, reason),
        }

        if timeout(self.config.write_wait, sender.close()).await.is_err() {
            debug!("[{}] 关闭连接超时", self.session_id);
        }
    }

    /// 写循环，返回结束原因
    pub async fn write_loop<S>(&self, sink: &mut S) -> SessionEnd
    where
        S: Sink<Message> + Unpin,
        S::Error: Display,
    {
        // 第一次触发在一个周期之后
        let mut poll_ticker = interval_at(
            Instant::now() + self.config.poll_interval,
            self.config.poll_interval,
        );
        poll_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut ping_ticker = interval_at(
            Instant::now() + self.config.ping_period,
            self.config.ping_period,
        );
        ping_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = poll_ticker.tick() => {
                    let snapshot = self.poller.round().await;
                    let payload = match snapshot.to_json() {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!("[{}] 快照序列化失败: {}", self.session_id, e);
                            continue;
                        }
                    };

                    if let Err(end) = self.send(sink, Message::Text(payload.into())).await {
                        return end;
                    }
                    trace!("[{}] 已推送快照 ({} 个端点)", self.session_id, snapshot.len());
                }
                _ = ping_ticker.tick() => {
                    if let Err(end) = self.send(sink, Message::Ping(Bytes::new())).await {
                        return end;
                    }
                    trace!("[{}] 已发送心跳", self.session_id);
                }
            }
        }
    }

    /// 读循环，返回结束原因
    ///
    /// 只用于存活检测，收到的数据不做解释
    pub async fn read_loop<R, E>(&self, stream: &mut R) -> SessionEnd
    where
        R: Stream<Item = Result<Message, E>> + Unpin,
        E: Display,
    {
        loop {
            match timeout(self.config.pong_wait, stream.next()).await {
                Err(_) => return SessionEnd::ReadTimeout,
                Ok(None) => return SessionEnd::ClientClosed,
                Ok(Some(Err(e))) => return SessionEnd::ReadFailed(e.to_string()),
                Ok(Some(Ok(Message::Close(_)))) => return SessionEnd::ClientClosed,
                Ok(Some(Ok(Message::Pong(_)))) => {
                    trace!("[{}] 收到心跳响应", self.session_id);
                }
                Ok(Some(Ok(_))) => {
                    trace!("[{}] 收到客户端数据", self.session_id);
                }
            }
        }
    }

    /// 在写超时内发送一帧
    async fn send<S>(&self, sink: &mut S, message: Message) -> Result<(), SessionEnd>
    where
        S: Sink<Message> + Unpin,
        S::Error: Display,
    {
        match timeout(self.config.write_wait, sink.send(message)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(SessionEnd::WriteFailed(e.to_string())),
            Err(_) => Err(SessionEnd::WriteTimeout),
        }
    }
}
