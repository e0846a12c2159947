//! Criterion comparison of batch INSERT cost for raw `rusqlite` vs. the connector's
//! `execute_batch`. Both variants write the same rows into a fresh in-memory
//! table so only binding and execution overhead is measured.

use std::hint::black_box;
use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rusqlite::{Connection, params};
use sql_bindexec::prelude::*;

const CREATE_TABLE: &str = "CREATE TABLE test (
    id      INTEGER NOT NULL,
    name    TEXT NOT NULL,
    score   REAL NOT NULL,
    active  BOOLEAN NOT NULL
)";

/// Resolve how many rows each iteration inserts.
fn batch_row_count() -> usize {
    std::env::var("BENCH_ROWS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(1000)
}

fn rows(count: usize) -> Vec<(i64, String, f64, bool)> {
    (1..=count as i64)
        .map(|id| (id, format!("name-{id}"), id as f64 * 0.5, id % 2 == 0))
        .collect()
}

/// Raw `rusqlite` baseline: one prepared statement, one transaction.
fn benchmark_rusqlite_direct(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    count: usize,
) {
    let data = rows(count);
    group.bench_function(BenchmarkId::new("rusqlite", count), |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::default();
            for _ in 0..iters {
                let mut conn = Connection::open_in_memory().expect("open sqlite connection");
                conn.execute_batch(CREATE_TABLE).expect("create table");
                let start = Instant::now();
                let tx = conn.transaction().expect("begin transaction");
                {
                    let mut stmt = tx
                        .prepare("INSERT INTO test (id, name, score, active) VALUES (?, ?, ?, ?)")
                        .expect("prepare insert");
                    for (id, name, score, active) in &data {
                        black_box(stmt.execute(params![id, name, score, active]).expect("insert"));
                    }
                }
                tx.commit().expect("commit");
                total += start.elapsed();
            }
            total
        });
    });
}

/// Connector variant: the batch is resolved up front and run on one prepared handle.
fn benchmark_connector(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    count: usize,
) {
    let batch: Vec<ParameterSet> = rows(count)
        .into_iter()
        .map(|(id, name, score, active)| params![id, name, score, active])
        .collect();
    let statement = Statement::parse("INSERT INTO test (id, name, score, active) VALUES (?, ?, ?, ?)");

    group.bench_function(BenchmarkId::new("connector", count), |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::default();
            for _ in 0..iters {
                let mut conn =
                    Connector::open(&SqliteOptions::in_memory()).expect("open connector");
                conn.execute_script(CREATE_TABLE).expect("create table");
                let start = Instant::now();
                conn.execute_script("BEGIN").expect("begin transaction");
                let outcome = conn.execute_batch(&statement, &batch);
                assert!(outcome.success(), "batch failed: {:?}", outcome.as_error());
                conn.execute_script("COMMIT").expect("commit");
                black_box(outcome);
                total += start.elapsed();
            }
            total
        });
    });
}

fn sqlite_batch_insert(c: &mut Criterion) {
    let count = batch_row_count();
    let mut group = c.benchmark_group("sqlite_batch_insert");
    group.throughput(Throughput::Elements(count as u64));

    benchmark_rusqlite_direct(&mut group, count);
    benchmark_connector(&mut group, count);

    group.finish();
}

criterion_group!(benches, sqlite_batch_insert);
criterion_main!(benches);
