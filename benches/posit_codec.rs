//! Decode/encode/arithmetic throughput for the posit codec, in the style
//! of `fuel-types/benches/bytes.rs` (`criterion`, `black_box`, a single
//! `criterion_group!`).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use unum::types::{Posit16_1, Posit32_2};

pub fn criterion_benchmark(c: &mut Criterion) {
    let a16 = black_box(Posit16_1::from_f64(3.25));
    let b16 = black_box(Posit16_1::from_f64(1.5));

    c.bench_function("posit16_1_multiply", |bencher| {
        bencher.iter(|| black_box(a16) * black_box(b16));
    });

    c.bench_function("posit16_1_decode_encode_round_trip", |bencher| {
        bencher.iter(|| {
            let value = black_box(a16).to_f64();
            black_box(Posit16_1::from_f64(value))
        });
    });

    let a32 = black_box(Posit32_2::from_f64(core::f64::consts::PI));
    let b32 = black_box(Posit32_2::from_f64(2.0));

    c.bench_function("posit32_2_multiply", |bencher| {
        bencher.iter(|| black_box(a32) * black_box(b32));
    });

    c.bench_function("posit32_2_divide", |bencher| {
        bencher.iter(|| black_box(a32) / black_box(b32));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
