//! Benchmark suite for sequence normalization and batch building.
//!
//! Run with: `cargo bench`
//!
//! This benchmark measures:
//! - Reshape + truncate/pad of a single payload
//! - Sequential vs parallel batch building

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use landmark_extractor::{BatchBuilder, BatchConfig, SequenceBuilder, FEATURE_WIDTH};
use serde_json::{json, Value};

/// A record with `frames` frames of synthetic landmark values.
fn create_record(frames: usize, label: usize) -> Value {
    let payload: Vec<f32> = (0..frames * FEATURE_WIDTH)
        .map(|i| (i % 97) as f32 / 97.0)
        .collect();
    json!({
        "landmarkData": payload,
        "gestureDefinitionId": format!("gesture_{}", label % 12),
    })
}

/// Records with lengths cycling through short, exact and long clips.
fn create_records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| create_record([8, 30, 55][i % 3], i))
        .collect()
}

/// Benchmark a single payload at different clip lengths.
fn bench_build_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_sequence");
    let builder = SequenceBuilder::default();

    for frames in [5usize, 30, 120] {
        let record = create_record(frames, 0);
        let payload = &record["landmarkData"];

        group.throughput(Throughput::Elements(frames as u64));
        group.bench_with_input(BenchmarkId::from_parameter(frames), payload, |b, payload| {
            b.iter(|| builder.build_sequence(0, black_box(payload)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark sequential and parallel batch building.
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(20);

    for count in [100usize, 1_000] {
        let records = create_records(count);
        group.throughput(Throughput::Elements(count as u64));

        let sequential = BatchBuilder::default();
        group.bench_with_input(BenchmarkId::new("sequential", count), &records, |b, records| {
            b.iter(|| black_box(sequential.build(records).unwrap()));
        });

        let parallel = BatchBuilder::new(SequenceBuilder::default(), BatchConfig::new().with_threads(4));
        group.bench_with_input(BenchmarkId::new("parallel", count), &records, |b, records| {
            b.iter(|| black_box(parallel.build_parallel(records).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_sequence, bench_batch);

criterion_main!(benches);
