//! Benchmark for Sequence vs standard VecDeque.
//!
//! Compares the persistent finger tree against Rust's standard VecDeque for
//! deque operations, positional lookup and concatenation.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::VecDeque;
use std::hint::black_box;
use strand::Sequence;

// =============================================================================
// push/inject Benchmark
// =============================================================================

fn benchmark_push(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("push");

    for size in [100, 1000, 10000] {
        // Sequence push (amortized O(1))
        group.bench_with_input(
            BenchmarkId::new("Sequence", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sequence = Sequence::new();
                    for index in 0..size {
                        sequence = sequence.push_value(black_box(index));
                    }
                    black_box(sequence)
                });
            },
        );

        // VecDeque push_front
        group.bench_with_input(
            BenchmarkId::new("VecDeque", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut deque = VecDeque::new();
                    for index in 0..size {
                        deque.push_front(black_box(index));
                    }
                    black_box(deque)
                });
            },
        );
    }

    group.finish();
}

fn benchmark_inject(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("inject");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("Sequence", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sequence = Sequence::new();
                    for index in 0..size {
                        sequence = sequence.inject_value(black_box(index));
                    }
                    black_box(sequence)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("VecDeque", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut deque = VecDeque::new();
                    for index in 0..size {
                        deque.push_back(black_box(index));
                    }
                    black_box(deque)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Drain Benchmark
// =============================================================================

fn benchmark_drain(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("drain");

    for size in [100, 1000, 10000] {
        let sequence = Sequence::from_values(0..size);
        let deque: VecDeque<i32> = (0..size).collect();

        // Sequence remove_first until empty
        group.bench_with_input(
            BenchmarkId::new("Sequence", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let mut current = sequence.clone();
                    let mut sum = 0;
                    while let Ok(element) = current.first() {
                        sum += element.as_value().copied().unwrap_or_default();
                        current = match current.remove_first() {
                            Ok(rest) => rest,
                            Err(_) => break,
                        };
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("VecDeque", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let mut current = deque.clone();
                    let mut sum = 0;
                    while let Some(value) = current.pop_front() {
                        sum += value;
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// lookup Benchmark
// =============================================================================

fn benchmark_lookup(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("lookup");

    for size in [100, 1000, 10000, 100_000] {
        let sequence = Sequence::from_values(0..size);
        let deque: VecDeque<usize> = (0..size).collect();

        // Sequence lookup (O(log n))
        group.bench_with_input(
            BenchmarkId::new("Sequence", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    for index in (0..size).step_by(size / 100) {
                        black_box(sequence.lookup(black_box(index)).ok());
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("VecDeque", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    for index in (0..size).step_by(size / 100) {
                        black_box(deque.get(black_box(index)));
                    }
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// append Benchmark
// =============================================================================

fn benchmark_append(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("append");

    for size in [100, 1000, 10000] {
        let left = Sequence::from_values(0..size);
        let right = Sequence::from_values(size..size * 2);
        let left_deque: VecDeque<i32> = (0..size).collect();
        let right_deque: VecDeque<i32> = (size..size * 2).collect();

        // Sequence append (O(log n), shares both operands)
        group.bench_with_input(
            BenchmarkId::new("Sequence", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(left.append(black_box(&right))));
            },
        );

        // VecDeque clone + extend
        group.bench_with_input(
            BenchmarkId::new("VecDeque", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let mut joined = left_deque.clone();
                    joined.extend(black_box(&right_deque).iter().copied());
                    black_box(joined)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(
    benches,
    benchmark_push,
    benchmark_inject,
    benchmark_drain,
    benchmark_lookup,
    benchmark_append
);

criterion_main!(benches);
