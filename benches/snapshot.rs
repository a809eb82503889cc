//! 快照处理基准测试
//!
//! 测试端点去重、快照序列化和模板渲染的性能

use criterion::{criterion_group, criterion_main, Criterion};
use endpoint_vitals::config::EndpointSet;
use endpoint_vitals::health::Snapshot;
use endpoint_vitals::web::SnapshotTemplate;
use std::collections::BTreeMap;
use std::hint::black_box;

const ENDPOINT_COUNT: usize = 200;

fn sample_urls() -> Vec<String> {
    (0..ENDPOINT_COUNT)
        .map(|i| format!("https://service-{}.example.com/health", i % 150))
        .collect()
}

fn sample_snapshot() -> Snapshot {
    let data: BTreeMap<String, i32> = sample_urls()
        .into_iter()
        .enumerate()
        .map(|(i, url)| {
            let status = match i % 10 {
                0 => -1,
                1 => 503,
                _ => 200,
            };
            (url, status)
        })
        .collect();
    Snapshot::new(data)
}

/// 快照处理基准测试
fn snapshot_benchmark(c: &mut Criterion) {
    let urls = sample_urls();
    c.bench_function("endpoint_set_dedup", |b| {
        b.iter(|| {
            let set = EndpointSet::new(urls.iter().map(String::as_str));
            black_box(set.len())
        })
    });

    let snapshot = sample_snapshot();
    c.bench_function("snapshot_to_json", |b| {
        b.iter(|| black_box(snapshot.to_json()))
    });

    let template_path = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/endpoints.hbs");
    match SnapshotTemplate::from_file(template_path) {
        Ok(template) => {
            c.bench_function("snapshot_render_html", |b| {
                b.iter(|| black_box(template.render(&snapshot, "localhost:8080")))
            });
        }
        Err(e) => eprintln!("跳过模板渲染基准: {e}"),
    }
}

criterion_group!(benches, snapshot_benchmark);
criterion_main!(benches);
