// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Benchmarks for header parsing, URL redaction and folding.
//!
//! Run with: `cargo bench --bench fold`

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use url::Url;

use authtel::header;
use authtel::redact::{sanitize_path, KnownHosts};
use authtel::{Aggregator, EventId, HttpEvent};

fn bench_header_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_parse");
    group.throughput(Throughput::Elements(1));

    group.bench_function("v1_valid", |b| {
        b.iter(|| header::parse(black_box("1,50126,0,3.2,Ring:prod,eu")));
    });

    group.bench_function("malformed", |b| {
        b.iter(|| header::parse(black_box("1,not,a,valid")));
    });

    group.finish();
}

fn bench_redact(c: &mut Criterion) {
    let hosts = KnownHosts::from_hosts(["login.example.com"]);
    let url = Url::parse("https://login.example.com/tenant123/oauth2/v2.0/token").unwrap();

    c.bench_function("sanitize_path", |b| {
        b.iter(|| sanitize_path(black_box(&url), &hosts));
    });
}

fn bench_fold(c: &mut Criterion) {
    let mut template = HttpEvent::new(EventId::new(1), "http_event");
    template.set_method("POST");
    template.set_response_code(400);
    template.set_oauth_error_code("invalid_grant");
    template.set_request_id_header("5a8f2c1e");
    template.set_x_ms_cli_telem_data("1,50126,0,3.2,Ring1");

    let mut group = c.benchmark_group("fold");
    group.throughput(Throughput::Elements(100));

    group.bench_function("fold_100_http_events", |b| {
        b.iter(|| {
            let aggregator = Aggregator::new();
            for _ in 0..100 {
                aggregator.fold(template.clone().into());
            }
            black_box(aggregator.take())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_header_parse, bench_redact, bench_fold);
criterion_main!(benches);
