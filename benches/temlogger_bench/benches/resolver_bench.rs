//! Logger resolution benchmarks
//!
//! Measures the bound fast path against a full rebind.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use temlogger::testing::RecordingTransports;
use temlogger::{LoggerManager, LoggingConfig};

fn manager(provider: &str) -> (LoggerManager, Arc<LoggingConfig>) {
    let config = Arc::new(LoggingConfig::new());
    config.set_provider(provider);
    config.set_url("logs.bench");
    config.set_port("5959");
    config.set_environment("bench");
    let manager = LoggerManager::with_transports(config.clone(), Arc::new(RecordingTransports::new()));
    (manager, config)
}

/// Benchmark repeated resolution of an already bound logger
fn bench_fast_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_logger_bound");

    for provider in ["default", "logstash", "unknown"] {
        let (manager, _) = manager(provider);
        manager.get_logger("bench").unwrap();

        group.bench_function(provider, |b| {
            b.iter(|| manager.get_logger(black_box("bench")).unwrap())
        });
    }

    group.finish();
}

/// Benchmark rebinding on every call by alternating providers
fn bench_rebind(c: &mut Criterion) {
    let (manager, config) = manager("logstash");
    let mut flip = false;

    c.bench_function("get_logger_rebind", |b| {
        b.iter(|| {
            flip = !flip;
            config.set_provider(if flip { "stackdriver" } else { "logstash" });
            manager.get_logger(black_box("bench")).unwrap()
        })
    });
}

criterion_group!(benches, bench_fast_path, bench_rebind);
criterion_main!(benches);
