use std::hint::black_box;

use column_probe::{ColumnProfiler, dates, patterns};
use criterion::{Criterion, criterion_group, criterion_main};

fn mixed_values(rows: usize) -> Vec<String> {
    (0..rows)
        .map(|i| match i % 5 {
            0 => format!("{i}"),
            1 => format!("{}.{:02}", i, i % 100),
            2 => format!("POINT ({} {})", i % 180, i % 90),
            3 => format!("2020-{:02}-{:02} 10:30:00", (i % 12) + 1, (i % 28) + 1),
            _ => format!("free text row number {i} with several words"),
        })
        .collect()
}

fn bench_pattern_scan(c: &mut Criterion) {
    let values = mixed_values(10_000);
    c.bench_function("pattern_scan_10k_mixed", |b| {
        b.iter(|| patterns::count_patterns(black_box(&values)))
    });
}

fn bench_date_parsing(c: &mut Criterion) {
    let values: Vec<String> = (0..1_000)
        .map(|i| format!("2020-{:02}-{:02}T10:30:00Z", (i % 12) + 1, (i % 28) + 1))
        .collect();
    c.bench_function("date_parse_1k_iso", |b| {
        b.iter(|| dates::parse_dates(black_box(&values)))
    });
}

fn bench_full_profile(c: &mut Criterion) {
    let values = mixed_values(10_000);
    let profiler = ColumnProfiler::new();
    c.bench_function("profile_10k_mixed_column", |b| {
        b.iter(|| profiler.profile(black_box("values"), black_box(&values), None))
    });
}

criterion_group!(
    benches,
    bench_pattern_scan,
    bench_date_parsing,
    bench_full_profile
);
criterion_main!(benches);
