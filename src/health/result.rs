//! 探测结果数据结构
//!
//! 定义单个端点的探测结果以及一轮探测产生的快照

use chrono::{DateTime, Local, Timelike};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// 请求在拿到响应之前失败（网络错误、超时、DNS失败等）
pub const STATUS_FAILED: i32 = -1;

/// 尚未探测的初始值，完整快照中不应出现
pub const STATUS_PENDING: i32 = 0;

/// 快照时间戳的秒级部分，之后是可选的小数秒和数字时区偏移
const LAST_UPDATE_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const LAST_UPDATE_OFFSET_FORMAT: &str = "%:z";

/// 格式化快照时间戳
///
/// 小数秒最多保留 6 位并去掉末尾的 0，整秒时不输出小数点，
/// 例如 `2024-03-05T14:07:09.1234+08:00`
pub fn format_last_update(value: &DateTime<Local>) -> String {
    let mut formatted = value.format(LAST_UPDATE_SECONDS_FORMAT).to_string();

    // 闰秒时纳秒可能超过 1e9，只取秒内部分
    let micros = value.nanosecond() % 1_000_000_000 / 1_000;
    if micros != 0 {
        let fraction = format!("{micros:06}");
        formatted.push('.');
        formatted.push_str(fraction.trim_end_matches('0'));
    }

    formatted.push_str(&value.format(LAST_UPDATE_OFFSET_FORMAT).to_string());
    formatted
}

/// 单个端点的探测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// 端点URL
    pub endpoint: String,
    /// HTTP状态码，或 [`STATUS_FAILED`]
    pub status: i32,
}

impl ProbeResult {
    /// 创建拿到响应的结果
    pub fn new(endpoint: impl Into<String>, status: i32) -> Self {
        Self {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// 创建请求失败的结果
    pub fn failed(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, STATUS_FAILED)
    }

    /// 请求是否在拿到响应前失败
    pub fn is_failure(&self) -> bool {
        self.status == STATUS_FAILED
    }

    /// 是否需要通知发布器（失败或非200）
    pub fn needs_publish(&self) -> bool {
        self.status != 200
    }
}

/// 一轮探测产生的不可变快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// 端点 -> 状态码
    #[serde(rename = "Data")]
    data: BTreeMap<String, i32>,
    /// 本轮完成时间
    #[serde(rename = "LastUpdate", serialize_with = "serialize_last_update")]
    last_update: DateTime<Local>,
}

impl Snapshot {
    /// 由完成的结果映射创建快照，时间戳取当前时间
    pub fn new(data: BTreeMap<String, i32>) -> Self {
        Self {
            data,
            last_update: Local::now(),
        }
    }

    /// 端点状态映射
    pub fn data(&self) -> &BTreeMap<String, i32> {
        &self.data
    }

    /// 单个端点的状态
    pub fn status_of(&self, endpoint: &str) -> Option<i32> {
        self.data.get(endpoint).copied()
    }

    /// 端点数量
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 格式化后的完成时间
    pub fn last_update_string(&self) -> String {
        format_last_update(&self.last_update)
    }

    /// 序列化为推送协议使用的JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn serialize_last_update<S>(value: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_last_update(value))
}
