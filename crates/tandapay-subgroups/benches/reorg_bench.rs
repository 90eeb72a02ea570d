//! Benchmarks for subgroup reorganization
//!
//! Measures:
//! - Engine placement over communities of increasing size
//! - The full record-to-plan pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tandapay_subgroups::{auto_reorg, reorganize, AlgorithmInput, MemberRecord, Partition, ReorgConfig, SubgroupId, WalletAddress};

/// A community with full-ish subgroups of 5 and a tail of joiners.
fn community(members: usize) -> AlgorithmInput {
    let grouped = members * 4 / 5;
    let mut subgroups = Partition::new();
    let wallets: Vec<WalletAddress> = (0..members).map(|i| WalletAddress(format!("0x{:08x}", i))).collect();

    for (i, chunk) in wallets[..grouped].chunks(5).enumerate() {
        if chunk.len() == 5 {
            subgroups.insert(SubgroupId(i as u64 + 1), chunk.to_vec());
        }
    }
    let placed: usize = subgroups.values().map(Vec::len).sum();
    AlgorithmInput::new(subgroups, wallets[placed..].to_vec())
}

/// Benchmark engine placement
fn bench_auto_reorg(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_reorg");

    for &members in &[12usize, 100, 1_000, 10_000] {
        let input = community(members);
        group.throughput(Throughput::Elements(members as u64));
        group.bench_with_input(BenchmarkId::from_parameter(members), &input, |b, input| {
            b.iter(|| auto_reorg(black_box(input)))
        });
    }
    group.finish();
}

/// Benchmark the full pipeline from raw records
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorganize");

    for &members in &[12usize, 100, 1_000] {
        let records: Vec<MemberRecord> = (0..members)
            .map(|i| MemberRecord::new(format!("0x{:08x}", i), ((i / 3) % (members / 6 + 1)).to_string()))
            .collect();
        group.throughput(Throughput::Elements(members as u64));
        group.bench_with_input(BenchmarkId::from_parameter(members), &records, |b, records| {
            b.iter(|| reorganize(black_box(records), &[], &ReorgConfig::default()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_auto_reorg, bench_pipeline);
criterion_main!(benches);
