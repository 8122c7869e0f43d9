//! Aggregate statistics over a completed evaluation run.

use crate::evaluator::PredictionRecord;
use crate::extract::format_usd;
use crate::tier::Tier;
use serde::Serialize;

/// One point of the truth-vs-guess scatter chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub truth: f64,
    pub guess: f64,
    pub tier: Tier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub green: usize,
    pub orange: usize,
    pub red: usize,
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::Green => self.green,
            Tier::Orange => self.orange,
            Tier::Red => self.red,
        }
    }

    fn bump(&mut self, tier: Tier) {
        match tier {
            Tier::Green => self.green += 1,
            Tier::Orange => self.orange += 1,
            Tier::Red => self.red += 1,
        }
    }
}

/// Summary of a finished run. A pure function of the record log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub title: String,
    pub size: usize,
    pub mean_absolute_error: f64,
    pub rmsle: f64,
    pub hit_rate: f64,
    pub tier_counts: TierCounts,
    pub points: Vec<ScatterPoint>,
}

impl EvaluationReport {
    pub fn from_records(title: impl Into<String>, records: &[PredictionRecord]) -> Self {
        let size = records.len();
        let mut abs_sum = 0.0;
        let mut sle_sum = 0.0;
        let mut tier_counts = TierCounts::default();
        let mut points = Vec::with_capacity(size);

        for r in records {
            abs_sum += r.absolute_error;
            sle_sum += r.squared_log_error;
            tier_counts.bump(r.tier);
            points.push(ScatterPoint {
                truth: r.truth,
                guess: r.guess,
                tier: r.tier,
            });
        }

        let (mean_absolute_error, rmsle, hit_rate) = if size == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let n = size as f64;
            (
                abs_sum / n,
                (sle_sum / n).sqrt(),
                tier_counts.green as f64 / n,
            )
        };

        Self {
            title: title.into(),
            size,
            mean_absolute_error,
            rmsle,
            hit_rate,
            tier_counts,
            points,
        }
    }

    /// Title with the three aggregates embedded.
    pub fn chart_title(&self) -> String {
        format!(
            "{} Error={} RMSLE={:.2} Hits={:.1}%",
            self.title,
            format_usd(self.mean_absolute_error),
            self.rmsle,
            self.hit_rate * 100.0
        )
    }

    /// Upper bound for both chart axes.
    pub fn axis_max(&self) -> f64 {
        self.points
            .iter()
            .flat_map(|p| [p.truth, p.guess])
            .fold(0.0, f64::max)
    }

    /// `(truth, guess)` pairs of one tier, ready for a chart dataset.
    pub fn points_for(&self, tier: Tier) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter(|p| p.tier == tier)
            .map(|p| (p.truth, p.guess))
            .collect()
    }
}
