//! Benchmarks for rolling window derivation

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crypto_collector::window::{spread, RollingWindow};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn benchmark_observe_and_deltas(c: &mut Criterion) {
    let base = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();

    c.bench_function("window_observe_and_deltas", |b| {
        b.iter(|| {
            let mut window = RollingWindow::new();
            for i in 0..256i64 {
                let ts = base + Duration::seconds(i);
                let price = Decimal::from(100_000 + i);
                let deltas = window.deltas(ts, price);
                black_box(deltas);
                window.observe(ts, price);
            }
        })
    });
}

fn benchmark_spread(c: &mut Criterion) {
    c.bench_function("spread", |b| {
        b.iter(|| spread(black_box(dec!(42500.00)), black_box(dec!(42501.00))))
    });
}

criterion_group!(benches, benchmark_observe_and_deltas, benchmark_spread);
criterion_main!(benches);
