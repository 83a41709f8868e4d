use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_core::query::{self, QueryParams};
use folio_core::Document;
use serde_json::json;

fn catalogue(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| {
            serde_json::from_value(json!({
                "name": format!("item-{}", i),
                "price": (i * 7919) % 1000,
                "color": if i % 3 == 0 { "Red" } else { "blue" },
            }))
            .unwrap()
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let documents = catalogue(10_000);

    let range = QueryParams::parse("price>=100&price<=500");
    c.bench_function("query_range_filter", |b| {
        b.iter(|| query::apply(black_box(documents.clone()), &range))
    });

    let glob = QueryParams::parse("name=item-1*&color=red");
    c.bench_function("query_glob_filter", |b| {
        b.iter(|| query::apply(black_box(documents.clone()), &glob))
    });

    let sorted = QueryParams::parse("_sort=name&_order=desc&_limit=20&_offset=100");
    c.bench_function("query_sort_paginate", |b| {
        b.iter(|| query::apply(black_box(documents.clone()), &sorted))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
