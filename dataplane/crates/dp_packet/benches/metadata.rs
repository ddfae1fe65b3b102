//! Metadata hot-path benchmarks.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use dp_abi::{MdFlags, VifIndex, is_valid_vif};
use dp_packet::{PacketPool, PoolConfig, metadata_of};

/// Benchmark the buffer-to-record accessor and field updates.
fn bench_accessor(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata/accessor");

    let pool = PacketPool::new(PoolConfig::new("bench", 32)).expect("failed to create pool");
    let mut pkt = pool.alloc().expect("failed to allocate");

    group.bench_function("metadata_of", |b| b.iter(|| metadata_of(black_box(pkt.desc()))));

    let vif = VifIndex::new(42).unwrap();
    group.bench_function("classify", |b| {
        b.iter(|| {
            let md = pkt.metadata_mut();
            md.set_in_vif(black_box(vif));
            md.insert_flags(black_box(MdFlags::SELF));
        })
    });

    group.finish();
}

/// Benchmark allocation with and without clearing the opaque region.
fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata/pool");

    let pool = PacketPool::new(PoolConfig::new("bench", 256)).expect("failed to create pool");
    group.bench_function("alloc_release", |b| b.iter(|| black_box(pool.alloc())));

    let prefix_only = PacketPool::new(PoolConfig::new("bench-prefix", 256).with_zero_udata(false))
        .expect("failed to create pool");
    group.bench_function("alloc_release_prefix_only", |b| b.iter(|| black_box(prefix_only.alloc())));

    group.finish();
}

/// Benchmark the index predicates over the whole 16-bit range.
fn bench_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata/index");
    group.throughput(Throughput::Elements(u16::MAX as u64 + 1));
    group.bench_function("is_valid_vif_u16", |b| {
        b.iter(|| (0..=u16::MAX as u32).filter(|&v| is_valid_vif(black_box(v))).count())
    });
    group.finish();
}

criterion_group!(benches, bench_accessor, bench_pool, bench_predicates);
criterion_main!(benches);
