//! Property tests for labeling and assembly invariants.
//!
//! Uses proptest to verify:
//! 1. Monotone series: a steadily rising series labels every eligible bar 1,
//!    a steadily falling one labels every eligible bar 0
//! 2. Eligibility: exactly `len - W` bars receive a label
//! 3. Parallel labeling is identical to sequential labeling
//! 4. Warm-up: every indicator's first defined index is its lookback
//! 5. Assembly: every surviving value is finite, and reassembly is identical
//! 6. Interior gaps: one missing OHLCV cell costs a bounded run of rows

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use barrierlab_core::config::{IndicatorPeriods, LabelingMode, PipelineConfig};
use barrierlab_core::domain::PriceBar;
use barrierlab_core::engine::{BarrierLabeler, DatasetAssembler, IndicatorEngine};
use barrierlab_core::manifest::IndicatorFeature;

fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                timestamp: start + Duration::hours(i as i64),
                open,
                high: open.max(close) * 1.002,
                low: open.min(close) * 0.998,
                close,
                volume: 1000.0 + (i % 17) as f64 * 10.0,
            }
        })
        .collect()
}

fn geometric(start: f64, ratio: f64, n: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(n);
    let mut price = start;
    for _ in 0..n {
        out.push(price);
        price *= ratio;
    }
    out
}

// ── Strategies (proptest) ────────────────────────────────────────────

/// Random walk of strictly positive closes.
fn arb_closes(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (
        10.0..1000.0_f64,
        prop::collection::vec(-0.03..0.03_f64, min_len..max_len),
    )
        .prop_map(|(start, steps)| {
            let mut price = start;
            steps
                .into_iter()
                .map(|r| {
                    price *= 1.0 + r;
                    price
                })
                .collect()
        })
}

fn arb_window() -> impl Strategy<Value = usize> {
    1usize..40
}

// ── 1. Monotone series ───────────────────────────────────────────────

proptest! {
    #[test]
    fn rising_series_labels_all_one(start in 1.0..10_000.0_f64, n in 30usize..200) {
        let closes = geometric(start, 1.01, n);
        let labels = BarrierLabeler::new(0.02, 0.01, 24)
            .label(&closes, LabelingMode::Sequential)
            .unwrap();
        for label in labels.iter().flatten() {
            prop_assert_eq!(*label, 1);
        }
    }

    #[test]
    fn falling_series_labels_all_zero(start in 1.0..10_000.0_f64, n in 30usize..200) {
        let closes = geometric(start, 0.99, n);
        let labels = BarrierLabeler::new(0.02, 0.01, 24)
            .label(&closes, LabelingMode::Sequential)
            .unwrap();
        for label in labels.iter().flatten() {
            prop_assert_eq!(*label, 0);
        }
    }
}

// ── 2. Eligibility ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn only_complete_windows_are_labeled(closes in arb_closes(1, 150), w in arb_window()) {
        let labels = BarrierLabeler::new(0.02, 0.01, w)
            .label(&closes, LabelingMode::Sequential)
            .unwrap();
        prop_assert_eq!(labels.len(), closes.len());
        for (i, label) in labels.iter().enumerate() {
            prop_assert_eq!(label.is_some(), i + w < closes.len());
        }
    }
}

// ── 3. Parallel == sequential ────────────────────────────────────────

proptest! {
    #[test]
    fn parallel_labeling_matches_sequential(
        closes in arb_closes(1, 400),
        w in arb_window(),
        pt in 0.001..0.1_f64,
        sl in 0.001..0.1_f64,
    ) {
        let labeler = BarrierLabeler::new(pt, sl, w);
        prop_assert_eq!(
            labeler.resolve_all(&closes).unwrap(),
            labeler.resolve_all_parallel(&closes).unwrap()
        );
    }
}

// ── 4. Warm-up ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn first_defined_index_is_lookback(
        closes in arb_closes(140, 220),
        sma_short in 2usize..30,
        rsi_period in 2usize..30,
        atr_period in 2usize..30,
    ) {
        let bars = bars_from_closes(&closes);
        let periods = IndicatorPeriods {
            sma_short,
            rsi_period,
            atr_period,
            adx_period: atr_period,
            ..IndicatorPeriods::default()
        };
        for feature in IndicatorFeature::ALL {
            let indicator = feature.build(&periods);
            let values = indicator.compute(&bars);
            let first = values.iter().position(|v| v.is_finite());
            prop_assert_eq!(first, Some(indicator.lookback()), "{}", indicator.name());
        }
    }
}

// ── 5. Assembly ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn assembled_values_are_finite_and_reproducible(closes in arb_closes(100, 300)) {
        let bars = bars_from_closes(&closes);
        let assembler = DatasetAssembler::new(PipelineConfig::default()).unwrap();
        let first = assembler.assemble_bars(bars.clone()).unwrap();
        let second = assembler.assemble_bars(bars).unwrap();

        for row in first.features() {
            prop_assert!(row.iter().all(|v| v.is_finite()));
        }
        prop_assert!(first.len() <= closes.len().saturating_sub(99 + 24));
        prop_assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn parallel_mode_assembles_identically(closes in arb_closes(150, 260)) {
        let bars = bars_from_closes(&closes);
        let sequential = DatasetAssembler::new(PipelineConfig::default())
            .unwrap()
            .assemble_bars(bars.clone())
            .unwrap();
        let parallel = DatasetAssembler::new(PipelineConfig {
            labeling_mode: LabelingMode::Parallel,
            ..PipelineConfig::default()
        })
        .unwrap()
        .assemble_bars(bars)
        .unwrap();
        prop_assert_eq!(sequential.fingerprint(), parallel.fingerprint());
    }
}

// ── 6. Interior gaps ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn single_missing_cell_costs_bounded_rows(
        closes in arb_closes(500, 600),
        at in 120usize..400,
        field in 0u8..3,
    ) {
        let bars = bars_from_closes(&closes);
        let config = PipelineConfig::default();
        let assembler = DatasetAssembler::new(config.clone()).unwrap();
        let clean = assembler.assemble_bars(bars.clone()).unwrap();

        let mut gapped_bars = bars;
        match field {
            0 => gapped_bars[at].volume = f64::NAN,
            1 => gapped_bars[at].high = f64::NAN,
            _ => gapped_bars[at].low = f64::NAN,
        }
        let gapped = assembler.assemble_bars(gapped_bars).unwrap();

        let warmup = IndicatorEngine::new(&config.indicator_periods).warmup();
        let max_lag = config.lag_set.iter().copied().max().unwrap_or(0);
        prop_assert!(gapped.len() < clean.len());
        prop_assert!(clean.len() - gapped.len() <= warmup + 1 + max_lag);
        prop_assert_eq!(gapped.timestamps().last(), clean.timestamps().last());
    }
}
