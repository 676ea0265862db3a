//! Benchmarks for data processing operations
//!
//! Run with: cargo bench

use chrono::FixedOffset;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sensorscope::analysis::{parse_time, segment_states, SeriesStatistics};
use sensorscope::dataset::read_csv;
use sensorscope::frontend::plot::decimate_points;
use sensorscope::{build_plot_model, AxisRole, Dataset, Selection};
use std::path::Path;

const START_EPOCH: i64 = 1_714_536_000;

fn offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

/// One row per second with two sensors, a status column and an AV column
fn synthetic_csv(rows: usize) -> String {
    let mut out = String::from("Timestamp,temp,hum,p-run,av-valve\n");
    for i in 0..rows {
        let x = i as f64 * 0.01;
        let state = if (i / 500) % 2 == 0 { "00" } else { "01" };
        let av = if i % 300 < 150 { "11" } else { "00" };
        let temp = if i % 97 == 0 {
            String::new()
        } else {
            format!("{:.3}", 25.0 + 5.0 * x.sin())
        };
        out.push_str(&format!(
            "{},{},{:.2},{},{}\n",
            START_EPOCH + i as i64,
            temp,
            50.0 + 10.0 * x.cos(),
            state,
            av
        ));
    }
    out
}

fn dataset(rows: usize) -> Dataset {
    read_csv(synthetic_csv(rows).as_bytes(), Path::new("bench.csv"), offset()).unwrap()
}

fn bench_read_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_csv");

    for size in [1_000, 10_000, 100_000].iter() {
        let csv = synthetic_csv(*size);
        group.throughput(Throughput::Bytes(csv.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &csv, |b, csv| {
            b.iter(|| read_csv(black_box(csv.as_bytes()), Path::new("bench.csv"), offset()))
        });
    }

    group.finish();
}

fn bench_window_range(c: &mut Criterion) {
    let ds = dataset(100_000);
    let start = parse_time("2024-05-01 13:00:00").unwrap();
    let end = parse_time("2024-05-01 14:00:00").unwrap();

    c.bench_function("window_range_100k", |b| {
        b.iter(|| ds.window_range(black_box(start), black_box(end)))
    });
}

fn bench_segment_states(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_states");

    for size in [1_000, 100_000].iter() {
        let ds = dataset(*size);
        let states = &ds.column("p-run").unwrap().raw;
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ds, |b, ds| {
            b.iter(|| segment_states(black_box(ds.times()), black_box(states)))
        });
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let ds = dataset(100_000);
    let values = &ds.column("temp").unwrap().numeric;

    c.bench_function("statistics_100k", |b| {
        b.iter(|| SeriesStatistics::from_values(black_box(values)))
    });
}

fn bench_decimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("decimation");

    for size in [10_000, 100_000, 1_000_000].iter() {
        let points: Vec<[f64; 2]> = (0..*size)
            .map(|i| {
                let x = i as f64;
                [x, (x * 0.001).sin()]
            })
            .collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, points| {
            b.iter(|| decimate_points(black_box(points), 4000))
        });
    }

    group.finish();
}

fn bench_plot_model(c: &mut Criterion) {
    let ds = dataset(100_000);
    let mut sel = Selection::default();
    sel.set_selected(AxisRole::Main, "temp", true);
    sel.set_selected(AxisRole::Aux, "hum", true);
    sel.set_selected(AxisRole::Av, "av-valve", true);
    sel.status = Some("p-run".into());

    c.bench_function("build_plot_model_100k", |b| {
        b.iter(|| {
            build_plot_model(
                black_box(&ds),
                black_box(&sel),
                "2024-05-01 12:00:00",
                "2024-05-02 12:00:00",
            )
        })
    });
}

criterion_group!(
    benches,
    bench_read_csv,
    bench_window_range,
    bench_segment_states,
    bench_statistics,
    bench_decimation,
    bench_plot_model,
);
criterion_main!(benches);
