//! 快照页面模板模块
//!
//! 启动时从文件加载 Handlebars 模板，按请求把快照渲染成HTML

use crate::error::TemplateError;
use crate::health::{Snapshot, STATUS_FAILED};
use handlebars::Handlebars;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

const TEMPLATE_NAME: &str = "snapshot";

/// 模板上下文数据
#[derive(Debug, Serialize)]
struct SnapshotContext<'a> {
    #[serde(rename = "Data")]
    data: &'a BTreeMap<String, i32>,
    #[serde(rename = "Rows")]
    rows: Vec<SnapshotRow<'a>>,
    #[serde(rename = "Host")]
    host: &'a str,
    #[serde(rename = "LastUpdate")]
    last_update: String,
}

/// 表格中的一行
#[derive(Debug, Serialize)]
struct SnapshotRow<'a> {
    endpoint: &'a str,
    status: i32,
    healthy: bool,
    failed: bool,
}

/// 快照页面模板
pub struct SnapshotTemplate {
    registry: Handlebars<'static>,
}

impl SnapshotTemplate {
    /// 从文件加载模板
    ///
    /// # 参数
    /// * `path` - 模板文件路径
    ///
    /// # 返回
    /// * `Result<Self, TemplateError>` - 模板实例；文件不存在或语法错误时返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let mut registry = Handlebars::new();
        registry
            .register_template_file(TEMPLATE_NAME, path)
            .map_err(|e| TemplateError::Load {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        log::info!("成功加载模板: {}", path.display());
        Ok(Self { registry })
    }

    /// 从字符串加载模板
    pub fn from_string(source: &str) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| TemplateError::Load {
                path: "<inline>".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { registry })
    }

    /// 渲染快照
    ///
    /// # 参数
    /// * `snapshot` - 快照
    /// * `host` - 请求的 Host 头，用于页面中拼接 WebSocket 地址
    pub fn render(&self, snapshot: &Snapshot, host: &str) -> Result<String, TemplateError> {
        let rows = snapshot
            .data()
            .iter()
            .map(|(endpoint, status)| SnapshotRow {
                endpoint,
                status: *status,
                healthy: *status == 200,
                failed: *status == STATUS_FAILED,
            })
            .collect();

        let context = SnapshotContext {
            data: snapshot.data(),
            rows,
            host,
            last_update: snapshot.last_update_string(),
        };

        self.registry
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| TemplateError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_snapshot() -> Snapshot {
        let mut data = BTreeMap::new();
        data.insert("http://a.test/200".to_string(), 200);
        data.insert("http://a.test/<500>".to_string(), 500);
        data.insert("http://unreachable.invalid".to_string(), -1);
        Snapshot::new(data)
    }

    #[test]
    fn test_render_rows_and_host() {
        let template = SnapshotTemplate::from_string(
            "{{Host}}|{{#each Rows}}{{endpoint}}={{status}}{{#if healthy}}+{{/if}}{{#if failed}}!{{/if}};{{/each}}",
        )
        .unwrap();

        let html = template.render(&sample_snapshot(), "monitor.local:8080").unwrap();

        assert!(html.starts_with("monitor.local:8080|"));
        assert!(html.contains("http://a.test/200=200+;"));
        assert!(html.contains("http://unreachable.invalid=-1!;"));
        // 默认对HTML转义
        assert!(html.contains("http://a.test/&lt;500&gt;=500;"));
    }

    #[test]
    fn test_render_data_map_and_timestamp() {
        let template =
            SnapshotTemplate::from_string(r#"{{lookup Data "http://a.test/200"}} {{LastUpdate}}"#)
                .unwrap();
        let snapshot = sample_snapshot();

        let html = template.render(&snapshot, "").unwrap();
        assert_eq!(html, format!("200 {}", snapshot.last_update_string()));
    }

    #[test]
    fn test_invalid_template_syntax() {
        let result = SnapshotTemplate::from_string("{{#each Rows}}unclosed");
        assert!(matches!(result, Err(TemplateError::Load { .. })));
    }

    #[test]
    fn test_missing_template_file() {
        let result = SnapshotTemplate::from_file("/nonexistent/endpoints.hbs");
        match result {
            Err(TemplateError::Load { path, .. }) => assert!(path.contains("endpoints.hbs")),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"<p>{{LastUpdate}}</p>").unwrap();

        let template = SnapshotTemplate::from_file(file.path()).unwrap();
        let html = template.render(&sample_snapshot(), "").unwrap();
        assert!(html.starts_with("<p>"));
    }
}
