//! Benchmarks for derivative geometry and the native transcoder.
//!
//! Run with: cargo bench -p plate-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::DynamicImage;
use plate_core::pipeline::geometry::{primary_dimensions, thumbnail_filter, thumbnail_scale};
use plate_core::transcode::NativeTranscoder;
use plate_core::DerivativeKind;

fn benchmark_geometry(c: &mut Criterion) {
    c.bench_function("primary_dimensions", |b| {
        b.iter(|| primary_dimensions(black_box(6000), black_box(4001), black_box(1600)))
    });

    c.bench_function("thumbnail_scale", |b| {
        b.iter(|| thumbnail_scale(black_box(4001), black_box(6000), black_box(192)))
    });

    c.bench_function("thumbnail_filter", |b| {
        b.iter(|| thumbnail_filter(black_box(192)))
    });
}

fn benchmark_native_thumbnail(c: &mut Criterion) {
    let img = DynamicImage::new_rgb8(1920, 1080);

    c.bench_function("native_thumb_192px", |b| {
        b.iter(|| NativeTranscoder::render(black_box(&img), DerivativeKind::Thumbnail(192)))
    });
}

fn benchmark_native_primary(c: &mut Criterion) {
    let img = DynamicImage::new_rgb8(3000, 2000);

    c.bench_function("native_primary_800px", |b| {
        b.iter(|| NativeTranscoder::render(black_box(&img), DerivativeKind::Primary(800)))
    });
}

criterion_group!(
    benches,
    benchmark_geometry,
    benchmark_native_thumbnail,
    benchmark_native_primary,
);
criterion_main!(benches);
