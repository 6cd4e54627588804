//! Record formatting benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use temlogger::{
    Level, LogEvent, LogstashFormatter, RecordFormatter, StackdriverFormatter,
};

fn event(extra_fields: usize) -> LogEvent {
    let mut event = LogEvent::new("bench", Level::Info, "request served")
        .with_location("src/server.rs", 120)
        .with_created(1_700_000_000.123);
    for i in 0..extra_fields {
        event = event.with_field(format!("field_{}", i), json!(i));
    }
    event
}

fn bench_formatters(c: &mut Criterion) {
    let stackdriver = StackdriverFormatter::new("bench").with_host("bench-host");
    let logstash = LogstashFormatter::new("bench").with_host("bench-host");

    let mut group = c.benchmark_group("format");
    for extras in [0, 8, 32] {
        let event = event(extras);
        group.bench_function(format!("stackdriver_{}_extras", extras), |b| {
            b.iter(|| stackdriver.format(black_box(&event)))
        });
        group.bench_function(format!("logstash_{}_extras", extras), |b| {
            b.iter(|| logstash.format(black_box(&event)))
        });
    }
    group.finish();
}

fn bench_with_exception(c: &mut Criterion) {
    let formatter = StackdriverFormatter::new("bench").with_host("bench-host");
    let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
    let event = event(4).with_exception(temlogger::ExceptionInfo::from_error(&err));

    c.bench_function("format_with_exception", |b| {
        b.iter(|| formatter.format(black_box(&event)))
    });
}

fn bench_serialize(c: &mut Criterion) {
    let formatter = StackdriverFormatter::new("bench").with_host("bench-host");
    let event = event(8);

    c.bench_function("format_and_serialize", |b| {
        b.iter(|| serde_json::to_vec(&formatter.format(black_box(&event))).unwrap())
    });
}

criterion_group!(benches, bench_formatters, bench_with_exception, bench_serialize);
criterion_main!(benches);
