//! Chunk adapter benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use parallax_adapter::adapter::{AdapterConfig, ChunkAdapter};
use parallax_adapter::chunk::Chunk;
use std::hint::black_box;

const STREAM_BYTES: usize = 1 << 20;

/// Repacketize a stream of `chunk_size` chunks into 188 byte packets.
fn bench_repacketize(c: &mut Criterion) {
    let mut group = c.benchmark_group("repacketize_188");
    group.throughput(Throughput::Bytes(STREAM_BYTES as u64));

    for chunk_size in [64, 1316, 4096, 65536] {
        let chunks: Vec<Chunk> = (0..STREAM_BYTES / chunk_size)
            .map(|_| Chunk::from_vec(vec![0x47; chunk_size]))
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunks,
            |b, chunks| {
                b.iter(|| {
                    let mut adapter = ChunkAdapter::new();
                    for chunk in chunks {
                        adapter.push(chunk.clone());
                        while adapter.available() >= 188 {
                            let packet = adapter.take_chunk(188).expect("enough data");
                            black_box(packet.as_bytes()[0]);
                        }
                    }
                });
            },
        );
    }

    group.finish();
}

/// Compare merging adjacent slices against copying them.
fn bench_split_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_allocation_peek");

    let whole = Chunk::from_vec(vec![0u8; 64 * 1024]);
    let slices: Vec<Chunk> = (0..64).map(|i| whole.slice(i * 1024, 1024)).collect();
    group.throughput(Throughput::Bytes(whole.len() as u64));

    for merge in [true, false] {
        let config = AdapterConfig::default().with_merge_adjacent(merge);
        group.bench_with_input(
            BenchmarkId::from_parameter(if merge { "merge" } else { "copy" }),
            &slices,
            |b, slices| {
                b.iter(|| {
                    let mut adapter = ChunkAdapter::with_config(config.clone());
                    for slice in slices {
                        adapter.push(slice.clone());
                    }
                    let view = adapter.peek(whole.len()).expect("enough data");
                    black_box(view.len());
                });
            },
        );
    }

    group.finish();
}

fn bench_masked_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("masked_scan_u32");

    let mut adapter = ChunkAdapter::new();
    for _ in 0..256 {
        adapter.push(Chunk::from_vec(vec![0xff; 4096]));
    }
    adapter.push(Chunk::from_vec(vec![0x00, 0x00, 0x01, 0x65]));
    let available = adapter.available();
    group.throughput(Throughput::Bytes(available as u64));

    group.bench_function("start_code_at_end", |b| {
        b.iter(|| {
            let pos = adapter
                .masked_scan_u32(0xffff_ff00, 0x0000_0100, 0, black_box(available))
                .expect("valid pattern");
            black_box(pos);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_repacketize,
    bench_split_allocation,
    bench_masked_scan
);
criterion_main!(benches);
