//! Evaluate benchmarks: the hot path.
//!
//! Chains are consumed by `exec()`, so every iteration builds and runs one.
//! Measures: single case, first-match-wins scans, multi-value cases, guards,
//! trace overhead and case tables.

use casewise::prelude::*;
use std::collections::BTreeMap;

fn main() {
    divan::main();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Core scenario: one value case (baseline)
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn single_case_hit(bencher: divan::Bencher) {
    bencher.bench_local(|| matcher(divan::black_box(1)).case(1, |_| 0).exec());
}

#[divan::bench]
fn single_case_miss(bencher: divan::Bencher) {
    bencher.bench_local(|| matcher(divan::black_box(2)).case(1, |_| 0).exec());
}

#[divan::bench]
fn single_case_partial_eq(bencher: divan::Bencher) {
    bencher.bench_local(|| {
        matcher(divan::black_box(1))
            .using(PartialEqual)
            .case(1, |_| 0)
            .exec()
    });
}

#[divan::bench]
fn guard_only(bencher: divan::Bencher) {
    bencher.bench_local(|| {
        matcher(divan::black_box(-5))
            .case_guarded(|x| *x < 0, |_| "less")
            .default(|_| "more")
            .exec()
    });
}

// ═══════════════════════════════════════════════════════════════════════════════
// Scaling: case count (first-match-wins scan cost)
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [1, 10, 50, 100, 200])]
fn case_count_last_match(bencher: divan::Bencher, n: usize) {
    bencher.bench_local(|| {
        let mut chain = matcher(divan::black_box(n)).case(usize::MAX, |_| 0);
        for i in 1..n {
            chain = chain.case(i, move |_| i);
        }
        // Worst case: match is at the end, every case is tested
        chain.case(n, |x| x).exec()
    });
}

#[divan::bench(args = [1, 10, 50, 100, 200])]
fn case_count_miss(bencher: divan::Bencher, n: usize) {
    bencher.bench_local(|| {
        let mut chain = matcher(divan::black_box(0usize)).case(usize::MAX, |_| 0);
        for i in 1..n {
            chain = chain.case(i, move |_| i);
        }
        chain.default(|_| 0).exec()
    });
}

#[divan::bench(args = [1, 8, 64])]
fn multi_case_width(bencher: divan::Bencher, width: usize) {
    let candidates: Vec<String> = (0..width).map(|i| format!("value_{i}")).collect();
    let subject = format!("value_{}", width - 1);
    bencher.bench_local(|| {
        matcher(subject.clone())
            .case_multi(candidates.iter().cloned(), |_| true)
            .exec()
    });
}

// ═══════════════════════════════════════════════════════════════════════════════
// Composite subjects
// ═══════════════════════════════════════════════════════════════════════════════

fn record(n: i32) -> BTreeMap<String, Vec<i32>> {
    (0..8).map(|k| (format!("key_{k}"), vec![k, n, k * n])).collect()
}

#[divan::bench]
fn composite_subject_hit(bencher: divan::Bencher) {
    let subject = record(3);
    bencher.bench_local(|| {
        matcher(&subject)
            .case(&record(1), |_| 1)
            .case(&record(2), |_| 2)
            .case(&record(3), |_| 3)
            .exec()
    });
}

// ═══════════════════════════════════════════════════════════════════════════════
// Overhead: trace vs plain exec
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn exec_plain(bencher: divan::Bencher) {
    bencher.bench_local(|| {
        matcher(divan::black_box(7))
            .case(1, |_| "one")
            .case_multi([2, 3], |_| "few")
            .case_guarded(|x| *x > 5, |_| "many")
            .exec()
    });
}

#[divan::bench]
fn exec_with_trace(bencher: divan::Bencher) {
    bencher.bench_local(|| {
        matcher(divan::black_box(7))
            .case(1, |_| "one")
            .case_multi([2, 3], |_| "few")
            .case_guarded(|x| *x > 5, |_| "many")
            .exec_with_trace()
    });
}
