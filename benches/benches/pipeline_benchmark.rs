//! Benchmarks of the month pipeline on synthetic archives.
//!
//! Run with: `cargo bench --package exfin-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use exfin_bench::SyntheticMonth;
use exfin_lib::prelude::*;
use exfin_lib::url::ArchiveLayout;
use exfin_lib::{extract_entry, parse_frame};
use std::hint::black_box;

const ROW_COUNTS: [usize; 3] = [1_000, 10_000, 100_000];

fn parse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_frame");

    for rows in ROW_COUNTS {
        let csv = SyntheticMonth::new(2024, 1, rows).unwrap().csv();
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &csv, |b, csv| {
            b.iter(|| parse_frame(black_box(csv.as_bytes())).unwrap());
        });
    }

    group.finish();
}

fn extract_benchmark(c: &mut Criterion) {
    let layout = ArchiveLayout::default();
    let pair = Pair::new("EURUSD");
    let mut group = c.benchmark_group("extract_and_parse");

    for rows in ROW_COUNTS {
        let month = SyntheticMonth::new(2024, 1, rows).unwrap();
        let archive = month.archive(&layout).unwrap();
        let entry = layout.entry_name(&pair, month.month);

        group.throughput(Throughput::Bytes(archive.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &archive, |b, archive| {
            b.iter(|| {
                let contents = extract_entry(black_box(archive), &entry).unwrap();
                parse_frame(contents.as_slice()).unwrap()
            });
        });
    }

    group.finish();
}

fn merge_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_months");

    for months in [3_u32, 12] {
        let frames: Vec<TickFrame> = (1..=months)
            .rev()
            .map(|m| {
                let csv = SyntheticMonth::new(2024, m, 10_000).unwrap().csv();
                parse_frame(csv.as_bytes()).unwrap()
            })
            .collect();

        group.throughput(Throughput::Elements(u64::from(months) * 10_000));
        group.bench_with_input(BenchmarkId::from_parameter(months), &frames, |b, frames| {
            b.iter(|| {
                let mut merged = TickFrame::concat(frames.iter().cloned());
                merged.sort_by_index();
                merged
            });
        });
    }

    group.finish();
}

fn write_benchmark(c: &mut Criterion) {
    let csv = SyntheticMonth::new(2024, 1, 10_000).unwrap().csv();
    let frame = parse_frame(csv.as_bytes()).unwrap();

    let mut group = c.benchmark_group("write_frame");
    group.throughput(Throughput::Elements(frame.len() as u64));

    group.bench_function("csv", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            CsvFormatter::new().write_frame(&frame, &mut out).unwrap();
            out
        });
    });
    group.bench_function("ndjson", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            JsonFormatter::ndjson().write_frame(&frame, &mut out).unwrap();
            out
        });
    });
    group.bench_function("parquet", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            ParquetFormatter::new().write_frame(&frame, &mut out).unwrap();
            out
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    parse_benchmark,
    extract_benchmark,
    merge_benchmark,
    write_benchmark
);
criterion_main!(benches);
