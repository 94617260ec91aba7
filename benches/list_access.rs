//! List Access Benchmarks - criterion
//!
//! Same matrix as the `list-bench` binary, measured by criterion instead of
//! the fork/warm-up/measurement protocol.
//!
//! Run with: cargo bench
//! Filter:   cargo bench -- "list_access/forIndex/LinkedList"

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use list_bench::{BenchmarkMatrix, LookupMode, Operation, PopulatedList, RunProtocol};

// ============================================================================
// Setup
// ============================================================================

fn populated_lists(matrix: &BenchmarkMatrix) -> Vec<(usize, Vec<PopulatedList>)> {
    matrix
        .element_counts()
        .iter()
        .map(|&n| {
            let lists = matrix
                .list_kinds()
                .iter()
                .map(|&kind| PopulatedList::build(kind, n).expect("element count fits in i32"))
                .collect();
            (n, lists)
        })
        .collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_operation(c: &mut Criterion, operation: Operation) {
    let matrix = BenchmarkMatrix::default();
    let protocol = RunProtocol::default();
    let lists = populated_lists(&matrix);

    let mut group = c.benchmark_group(format!("list_access/{operation}"));
    group.warm_up_time(protocol.warmup_time());
    group.measurement_time(protocol.measurement_time().max(Duration::from_millis(500)));
    group.sample_size(10);

    for (n, by_kind) in &lists {
        for list in by_kind {
            group.bench_with_input(BenchmarkId::new(list.kind().name(), n), list, |b, list| {
                b.iter(|| operation.run(black_box(list), LookupMode::Positional))
            });
        }
    }

    group.finish();
}

fn benchmark_for_index(c: &mut Criterion) {
    bench_operation(c, Operation::ForIndex);
}

fn benchmark_for_each(c: &mut Criterion) {
    bench_operation(c, Operation::ForEach);
}

fn benchmark_iterator(c: &mut Criterion) {
    bench_operation(c, Operation::Iterator);
}

fn benchmark_stream(c: &mut Criterion) {
    bench_operation(c, Operation::Stream);
}

fn benchmark_parallel_stream(c: &mut Criterion) {
    bench_operation(c, Operation::ParallelStream);
}

criterion_group!(
    benches,
    benchmark_for_index,
    benchmark_for_each,
    benchmark_iterator,
    benchmark_stream,
    benchmark_parallel_stream
);
criterion_main!(benches);
