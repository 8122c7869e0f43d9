//! Property tests for tiering, extraction and report aggregation.

use pricefit_core::{
    EvaluationReport, Evaluator, NamedPredictor, NullSink, PredictionRecord, TestItem, Tier,
    extract_price, format_usd,
};
use proptest::collection::vec;
use proptest::prelude::*;

/// Generate aligned (guess, truth) pairs with positive truths.
fn guess_truth_pairs(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<(f64, f64)>> {
    vec((0.0f64..5_000.0, 0.01f64..5_000.0), len)
}

// =============================================================================
// Tiering
// =============================================================================

proptest! {
    #[test]
    fn prop_exact_guess_is_green(truth in 0.0f64..100_000.0) {
        let r = PredictionRecord::score(0, truth, truth);
        prop_assert_eq!(r.absolute_error, 0.0);
        prop_assert_eq!(r.tier, Tier::Green);
    }

    #[test]
    fn prop_far_off_is_red(truth in 0.01f64..10_000.0, extra in 0.0f64..10_000.0) {
        let error = (80.0f64).max(0.41 * truth) + extra;
        prop_assert_eq!(Tier::classify(error, truth), Tier::Red);
    }

    #[test]
    fn prop_tier_monotonic_in_error(
        truth in 0.01f64..10_000.0,
        a in 0.0f64..10_000.0,
        b in 0.0f64..10_000.0,
    ) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            Tier::classify(small, truth) <= Tier::classify(large, truth),
            "tier went backwards for truth {} errors {} -> {}",
            truth, small, large
        );
    }
}

// =============================================================================
// Extraction
// =============================================================================

proptest! {
    #[test]
    fn prop_extraction_recovers_formatted_price(p in 0.0f64..1_000_000.0) {
        let with_separators = format!("Price is {}", format_usd(p));
        let plain = format!("Price is ${p:.2}");
        prop_assert!((extract_price(&with_separators) - p).abs() < 1e-2);
        prop_assert!((extract_price(&plain) - p).abs() < 1e-2);
    }

    #[test]
    fn prop_no_digits_after_marker_is_zero(tail in "[a-zA-Z !?.]{0,40}") {
        let text = format!("Price is ${tail}");
        prop_assert_eq!(extract_price(&text), 0.0);
    }
}

// =============================================================================
// Aggregation
// =============================================================================

proptest! {
    #[test]
    fn prop_report_idempotent(pairs in guess_truth_pairs(1..60)) {
        let records: Vec<PredictionRecord> = pairs
            .iter()
            .enumerate()
            .map(|(i, &(g, t))| PredictionRecord::score(i, g, t))
            .collect();
        let a = EvaluationReport::from_records("Prop", &records);
        let b = EvaluationReport::from_records("Prop", &records);
        prop_assert_eq!(&a, &b);
        prop_assert!(a.rmsle >= 0.0 && a.rmsle.is_finite());
        prop_assert!((0.0..=1.0).contains(&a.hit_rate));
        prop_assert_eq!(
            a.tier_counts.green + a.tier_counts.orange + a.tier_counts.red,
            records.len()
        );
    }

    #[test]
    fn prop_run_matches_direct_scoring(pairs in guess_truth_pairs(1..40)) {
        let items: Vec<TestItem> = pairs
            .iter()
            .enumerate()
            .map(|(i, &(_, t))| TestItem::new(format!("item {i}"), t))
            .collect();
        let guesses: Vec<f64> = pairs.iter().map(|&(g, _)| g).collect();
        let mut next = 0;
        let predictor = NamedPredictor::from_fn("replay", move |_| {
            let g = guesses[next];
            next += 1;
            Ok(g)
        });

        let mut eval = Evaluator::new(predictor, &items, items.len())
            .unwrap()
            .with_sink(NullSink);
        let report = eval.run().unwrap();

        let mae: f64 = pairs.iter().map(|&(g, t)| (g - t).abs()).sum::<f64>() / pairs.len() as f64;
        prop_assert!((report.mean_absolute_error - mae).abs() < 1e-6);
        for (i, r) in eval.records().iter().enumerate() {
            prop_assert_eq!(r.index, i);
        }
    }
}

#[test]
fn three_item_mean_absolute_error() {
    let records = vec![
        PredictionRecord::score(0, 100.0, 100.0),
        PredictionRecord::score(1, 960.0, 1000.0),
        PredictionRecord::score(2, 50.0, 500.0),
    ];
    let report = EvaluationReport::from_records("Scenario", &records);
    assert!((report.mean_absolute_error - 163.333_333).abs() < 1e-5);
    assert!((report.rmsle - 1.319_329).abs() < 1e-5);
}
