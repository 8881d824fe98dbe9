//! Benchmarks for listing, packing and unpacking.
//!
//! Measures throughput across file counts and compression levels.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_possible_truncation)]

use certpack_core::ArchiveBuilder;
use certpack_core::ArchiveExtractor;
use certpack_core::EntryContainer;
use certpack_core::lock::NeverLocked;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use std::fs;
use std::hint::black_box;
use std::path::Path;
use tempfile::TempDir;

/// Fills `dir` with `count` certificate-named files of 1 KB each.
fn populate(dir: &Path, count: usize) {
    let content = "x".repeat(1024);
    for i in 0..count {
        let name = format!("{:04}.{:011}.20220923174555.cer", i % 10_000, i);
        fs::write(dir.join(name), &content).unwrap();
    }
}

fn bench_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("listing");

    for count in [10, 100, 1000] {
        let temp = TempDir::new().unwrap();
        populate(temp.path(), count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("certificates", count), &count, |b, _| {
            b.iter(|| {
                let container = EntryContainer::certificates(temp.path()).unwrap();
                black_box(container.ready_with(&NeverLocked).len())
            });
        });
    }

    group.finish();
}

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack");
    let inbox = TempDir::new().unwrap();
    populate(inbox.path(), 100);
    let container = EntryContainer::open(inbox.path()).unwrap();
    let entries = container.ready_with(&NeverLocked);

    group.throughput(Throughput::Bytes(100 * 1024));
    for level in [1u8, 6, 9] {
        group.bench_with_input(BenchmarkId::new("level", level), &level, |b, &level| {
            b.iter(|| {
                let outbox = TempDir::new().unwrap();
                let report = ArchiveBuilder::new(outbox.path(), "bench.zip")
                    .compression_level(level)
                    .build(entries.iter().copied())
                    .unwrap();
                black_box(report.bytes_compressed)
            });
        });
    }

    group.finish();
}

fn bench_unpack(c: &mut Criterion) {
    let mut group = c.benchmark_group("unpack");
    let inbox = TempDir::new().unwrap();
    let outbox = TempDir::new().unwrap();
    populate(inbox.path(), 100);
    let container = EntryContainer::open(inbox.path()).unwrap();
    ArchiveBuilder::new(outbox.path(), "bench.zip")
        .build(container.entries())
        .unwrap();

    group.throughput(Throughput::Bytes(100 * 1024));
    group.bench_function("100_files", |b| {
        b.iter(|| {
            let restored = TempDir::new().unwrap();
            let report = ArchiveExtractor::new(outbox.path(), "bench.zip", restored.path())
                .extract()
                .unwrap();
            black_box(report.bytes_written)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_listing, bench_pack, bench_unpack);
criterion_main!(benches);
