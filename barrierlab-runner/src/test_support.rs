use barrierlab_core::domain::PriceBar;
use barrierlab_core::{AssemblyReport, Dataset};
use chrono::{Duration, NaiveDate, NaiveDateTime};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Two-feature dataset with hourly timestamps; row i holds `[i, i + 0.5]`.
pub fn dataset_with_labels(labels: &[u8]) -> Dataset {
    let n = labels.len();
    Dataset::new(
        "TEST".into(),
        vec!["f0".into(), "f1".into()],
        (0..n).map(|i| start() + Duration::hours(i as i64)).collect(),
        (0..n).map(|i| vec![i as f64, i as f64 + 0.5]).collect(),
        labels.to_vec(),
        AssemblyReport {
            rows_in: n,
            rows_out: n,
            ..AssemblyReport::default()
        },
    )
}

/// Hourly bars tracing a drifting wave around 30 000.
pub fn wave_bars(n: usize) -> Vec<PriceBar> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let close = 30_000.0 + (t * 0.21).sin() * 900.0 + (t * 0.05).cos() * 400.0 + t;
            PriceBar {
                timestamp: start() + Duration::hours(i as i64),
                open: close * 0.999,
                high: close * 1.003,
                low: close * 0.996,
                close,
                volume: 10.0 + (i % 7) as f64,
            }
        })
        .collect()
}
