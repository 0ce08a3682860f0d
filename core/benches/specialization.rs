//! Benchmarks for tree execution in each specialization state.
//!
//! Run with: `cargo bench` in the core/ directory.
//!
//! Benchmark groups:
//! 1. specialized: every node runs its monomorphic fast path
//! 2. polymorphic: every node walks a two-member chain
//! 3. generic: every node scans the descriptor on each call
//! 4. warmup: build + first execution, i.e. the cost of specializing

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use graft_core::{Descriptor, Frame, Tree, TreeBuilder, TreeOptions, Value, stdlib};

/// Build `x + x + ... + x` with `n` additions, left-associated.
fn build_chain(add: &Arc<Descriptor>, n: usize, options: TreeOptions) -> Tree {
    let mut builder = TreeBuilder::with_options(options);
    let mut node = builder.argument(0);
    for _ in 0..n {
        let x = builder.argument(0);
        node = builder.operation(add, &[node, x]).expect("valid chain");
    }
    builder.finish(node).expect("valid chain")
}

fn warm(tree: &mut Tree, inputs: &[Value]) {
    for input in inputs {
        tree.execute(&Frame::new(std::slice::from_ref(input)))
            .expect("warmup failed");
    }
}

// Sizes chosen to stay under default stack depth limit (1000)
const SIZES: [usize; 3] = [10, 100, 400];

fn bench_specialized(c: &mut Criterion) {
    let add = Arc::new(stdlib::arith::add());
    let mut group = c.benchmark_group("specialized");

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut tree = build_chain(&add, size, TreeOptions::default());
            warm(&mut tree, &[Value::Int(1)]);
            let args = [Value::Int(1)];

            b.iter(|| tree.execute(black_box(&Frame::new(&args))).unwrap());
        });
    }

    group.finish();
}

fn bench_polymorphic(c: &mut Criterion) {
    let add = Arc::new(stdlib::arith::add());
    let mut group = c.benchmark_group("polymorphic");

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut tree = build_chain(&add, size, TreeOptions::default());
            warm(&mut tree, &[Value::Int(1), Value::Float(1.0)]);
            let ints = [Value::Int(1)];
            let floats = [Value::Float(1.0)];

            b.iter(|| {
                tree.execute(black_box(&Frame::new(&ints))).unwrap();
                tree.execute(black_box(&Frame::new(&floats))).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_generic(c: &mut Criterion) {
    let add = Arc::new(stdlib::arith::add());
    let mut group = c.benchmark_group("generic");
    let options = TreeOptions {
        polymorphic_limit: 1,
        ..TreeOptions::default()
    };

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut tree = build_chain(&add, size, options.clone());
            warm(&mut tree, &[Value::Int(1), Value::Float(1.0)]);
            let args = [Value::Int(1)];

            b.iter(|| tree.execute(black_box(&Frame::new(&args))).unwrap());
        });
    }

    group.finish();
}

fn bench_warmup(c: &mut Criterion) {
    let add = Arc::new(stdlib::arith::add());
    let mut group = c.benchmark_group("warmup");

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let args = [Value::Int(1)];
            b.iter(|| {
                let mut tree = build_chain(&add, size, TreeOptions::default());
                tree.execute(black_box(&Frame::new(&args))).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_specialized,
    bench_polymorphic,
    bench_generic,
    bench_warmup
);
criterion_main!(benches);
