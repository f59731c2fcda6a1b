use chrono::{DateTime, NaiveDate, TimeDelta};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weatherscrape::{resample_day, Observation, SamplingInterval};

/// One day of readings every 30 seconds, roughly what a chatty station reports.
fn dense_day() -> Vec<Observation> {
    let midnight = DateTime::parse_from_rfc3339("2021-01-01T00:00:00-06:00").unwrap();
    (0..2880)
        .map(|i| {
            Observation::new(
                "KILCHICA679",
                midnight + TimeDelta::seconds(30 * i),
                [("tempAvg", -2.0 + i as f64 * 0.001), ("humidityAvg", 81.0)],
            )
        })
        .collect()
}

fn bench_resample(c: &mut Criterion) {
    let day = dense_day();
    let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();

    for interval in ["1min", "5min", "1h"] {
        let interval: SamplingInterval = interval.parse().unwrap();
        c.bench_function(&format!("resample_day {interval}"), |b| {
            b.iter(|| resample_day(black_box(day.clone()), date, interval))
        });
    }
}

criterion_group!(benches, bench_resample);
criterion_main!(benches);
