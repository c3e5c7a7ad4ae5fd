use criterion::{criterion_group, criterion_main, Criterion};
use geodb::{ipv4_to_u32, CacheMode, Database};
use std::hint::black_box;
use std::net::IpAddr;

const FIXTURE: &str = "tests/data/GeoIP2-Enterprise-Test.mmdb";

/// Benchmark the resolver paths against the committed test fixture
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for (name, mode) in [
        ("mmap", CacheMode::Standard),
        ("memory", CacheMode::MemoryCache),
    ] {
        let db = Database::open(FIXTURE, mode).unwrap();

        group.bench_function(format!("ipv4_hit_{}", name), |b| {
            b.iter(|| db.record_by_ip(black_box(&[8, 8, 8, 8])))
        });
        group.bench_function(format!("ipv4_miss_{}", name), |b| {
            b.iter(|| db.record_by_ip(black_box(&[127, 0, 0, 1])))
        });
    }

    let db = Database::open(FIXTURE, CacheMode::Standard).unwrap();
    let v6: IpAddr = "2001:4860:4860::8888".parse().unwrap();
    group.bench_function("ipv6_hit", |b| b.iter(|| db.record_by_addr(black_box(v6))));

    group.finish();
}

/// Benchmark the pure numeric-key conversion
fn bench_key_packing(c: &mut Criterion) {
    c.bench_function("ipv4_to_u32", |b| {
        b.iter(|| ipv4_to_u32(black_box([8, 8, 8, 8])))
    });
}

criterion_group!(benches, bench_lookup, bench_key_packing);
criterion_main!(benches);
