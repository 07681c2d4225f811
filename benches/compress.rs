//! Benchmarks for rawflate compression throughput.
//!
//! Covers both table strategies across data patterns, block sizes and
//! match search depths.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rawflate::{compress, CompressConfig, Compressor, Strategy};

/// Generate random (incompressible) data
fn generate_random_data(size: usize) -> Vec<u8> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut data = Vec::with_capacity(size);
    let mut hasher = DefaultHasher::new();

    for i in 0..size {
        i.hash(&mut hasher);
        data.push((hasher.finish() & 0xFF) as u8);
    }
    data
}

/// Generate repetitive (highly compressible) data
fn generate_repetitive_data(size: usize) -> Vec<u8> {
    b"ABCDABCDABCDABCD".iter().copied().cycle().take(size).collect()
}

/// Generate English-like text from a small vocabulary
fn generate_text_data(size: usize) -> Vec<u8> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let words: [&[u8]; 12] = [
        b"the", b"quick", b"brown", b"fox", b"jumps", b"over", b"lazy", b"dog", b"and",
        b"compression", b"stream", b"block",
    ];
    let mut data = Vec::with_capacity(size + 16);
    let mut hasher = DefaultHasher::new();
    let mut i = 0usize;

    while data.len() < size {
        i.hash(&mut hasher);
        let word = words[(hasher.finish() % words.len() as u64) as usize];
        data.extend_from_slice(word);
        data.push(if i % 11 == 10 { b'\n' } else { b' ' });
        i += 1;
    }
    data.truncate(size);
    data
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies");

    for size in [1024, 64 * 1024, 256 * 1024].iter() {
        let data = generate_text_data(*size);
        group.throughput(Throughput::Bytes(*size as u64));

        for strategy in [Strategy::Fixed, Strategy::Dynamic] {
            group.bench_with_input(
                BenchmarkId::new(strategy.as_str(), size),
                &data,
                |b, data| b.iter(|| compress(data, strategy).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_data_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("data_patterns");
    let size = 256 * 1024;

    let patterns = [
        ("random", generate_random_data(size)),
        ("repetitive", generate_repetitive_data(size)),
        ("text", generate_text_data(size)),
    ];

    group.throughput(Throughput::Bytes(size as u64));

    for (name, data) in patterns.iter() {
        group.bench_function(*name, |b| b.iter(|| compress(data, Strategy::Dynamic).unwrap()));
    }

    group.finish();
}

fn bench_block_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_sizes");
    let size = 256 * 1024;
    let data = generate_text_data(size);

    group.throughput(Throughput::Bytes(size as u64));

    for block_size in [4096, 16 * 1024, 64 * 1024].iter() {
        group.bench_with_input(BenchmarkId::new("dynamic", block_size), &data, |b, data| {
            let config = CompressConfig { block_size: Some(*block_size), ..Default::default() };
            b.iter(|| {
                let mut compressor = Compressor::new(config.clone());
                compressor.compress(data).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_max_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_chain");
    let size = 256 * 1024;
    let data = generate_text_data(size);

    group.throughput(Throughput::Bytes(size as u64));

    for max_chain in [0, 16, 256, 4096].iter() {
        group.bench_with_input(BenchmarkId::new("chain", max_chain), &data, |b, data| {
            let config = CompressConfig { max_chain: *max_chain, ..Default::default() };
            b.iter(|| {
                let mut compressor = Compressor::new(config.clone());
                compressor.compress(data).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_strategies,
    bench_data_patterns,
    bench_block_sizes,
    bench_max_chain,
);
criterion_main!(benches);
