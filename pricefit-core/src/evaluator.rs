//! The evaluation harness.
//!
//! An [`Evaluator`] is built per run from a named predictor, a dataset and a
//! sample size. It scores items one at a time in dataset order, hands each
//! result to a [`DiagnosticSink`], and produces an [`EvaluationReport`] once
//! every item has been scored. Evaluation is strictly serial: predictors may
//! hold a single accelerator or rate-limited API key, and per-item output
//! must stay in index order.

use crate::error::{Error, Result};
use crate::extract::format_usd;
use crate::item::TestItem;
use crate::predictor::NamedPredictor;
use crate::report::EvaluationReport;
use crate::tier::Tier;
use serde::Serialize;

/// Number of items scored when the caller does not choose.
pub const DEFAULT_SAMPLE_SIZE: usize = 250;

/// Outcome of scoring a single item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub index: usize,
    pub guess: f64,
    pub truth: f64,
    pub absolute_error: f64,
    pub squared_log_error: f64,
    pub tier: Tier,
}

impl PredictionRecord {
    pub fn score(index: usize, guess: f64, truth: f64) -> Self {
        let absolute_error = (guess - truth).abs();
        let log_error = (truth + 1.0).ln() - (guess + 1.0).ln();
        Self {
            index,
            guess,
            truth,
            absolute_error,
            squared_log_error: log_error * log_error,
            tier: Tier::classify(absolute_error, truth),
        }
    }

    /// One-line human-readable summary, numbered from 1.
    pub fn diagnostic_line(&self, label: &str) -> String {
        format!(
            "{}: Guess: {} Truth: {} Error: {} SLE: {:.2} Item: {}",
            self.index + 1,
            format_usd(self.guess),
            format_usd(self.truth),
            format_usd(self.absolute_error),
            self.squared_log_error,
            label
        )
    }
}

// ---------------------------------------------------------------------------
// Diagnostic sinks
// ---------------------------------------------------------------------------

/// Receives one diagnostic per scored item, in index order.
pub trait DiagnosticSink {
    fn item(&mut self, record: &PredictionRecord, label: &str);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&PredictionRecord, &str),
{
    fn item(&mut self, record: &PredictionRecord, label: &str) {
        self(record, label)
    }
}

/// Uncolored lines on stdout.
#[derive(Debug, Default)]
pub struct PlainSink;

impl DiagnosticSink for PlainSink {
    fn item(&mut self, record: &PredictionRecord, label: &str) {
        println!("{}", record.diagnostic_line(label));
    }
}

/// Discards diagnostics.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn item(&mut self, _record: &PredictionRecord, _label: &str) {}
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalState {
    /// Items are being scored.
    Collecting,
    /// The report has been produced; the log is frozen.
    Reported,
}

pub struct Evaluator<'a> {
    predictor: NamedPredictor,
    items: &'a [TestItem],
    title: String,
    size: usize,
    records: Vec<PredictionRecord>,
    state: EvalState,
    sink: Box<dyn DiagnosticSink + 'a>,
}

impl std::fmt::Debug for Evaluator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("predictor", &self.predictor)
            .field("title", &self.title)
            .field("size", &self.size)
            .field("scored", &self.records.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> Evaluator<'a> {
    /// Bind a predictor to the first `size` items of `items`.
    ///
    /// Fails before any prediction is made when `size` exceeds the dataset.
    pub fn new(predictor: NamedPredictor, items: &'a [TestItem], size: usize) -> Result<Self> {
        if size > items.len() {
            return Err(Error::IndexOutOfRange {
                index: size,
                limit: items.len(),
            });
        }
        Ok(Self {
            title: predictor.display_title(),
            predictor,
            items,
            size,
            records: Vec::with_capacity(size),
            state: EvalState::Collecting,
            sink: Box::new(PlainSink),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'a) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn state(&self) -> EvalState {
        self.state
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    /// Score the item at `index`, which must be the next unscored one.
    pub fn evaluate_one(&mut self, index: usize) -> Result<&PredictionRecord> {
        if self.state == EvalState::Reported {
            return Err(Error::AlreadyReported);
        }
        if index >= self.size {
            return Err(Error::IndexOutOfRange {
                index,
                limit: self.size,
            });
        }
        let expected = self.records.len();
        if index != expected {
            return Err(Error::OutOfOrder {
                expected,
                got: index,
            });
        }

        let item = &self.items[index];
        let guess = self.predictor.predict(&item.prompt)?;
        if !guess.is_finite() {
            return Err(Error::predictor(
                self.predictor.name(),
                format!("non-numeric guess {guess} for item {}", index + 1),
            ));
        }
        // ln(guess + 1) is undefined at or below -1.
        if guess <= -1.0 {
            return Err(Error::predictor(
                self.predictor.name(),
                format!("unusable negative guess {guess} for item {}", index + 1),
            ));
        }
        if guess < 0.0 {
            log::warn!(
                "{} returned negative guess {guess} for item {}",
                self.predictor.name(),
                index + 1
            );
        }

        let record = PredictionRecord::score(index, guess, item.truth);
        log::debug!(
            "item {} guess={} truth={} tier={}",
            index + 1,
            record.guess,
            record.truth,
            record.tier
        );
        self.sink.item(&record, &item.label());
        self.records.push(record);
        Ok(&self.records[index])
    }

    /// Score every remaining item in order, then report.
    ///
    /// The first failure aborts the run; records scored so far stay in the
    /// log but no report is produced.
    pub fn run(&mut self) -> Result<EvaluationReport> {
        if self.state == EvalState::Reported {
            return Err(Error::AlreadyReported);
        }
        log::info!(
            "evaluating {} items with {}",
            self.size,
            self.predictor.name()
        );
        for index in self.records.len()..self.size {
            self.evaluate_one(index)?;
        }
        let report = self.report()?;
        log::info!("{}", report.chart_title());
        Ok(report)
    }

    /// Aggregate the completed log and freeze the evaluator.
    ///
    /// Calling this again returns an equal report.
    pub fn report(&mut self) -> Result<EvaluationReport> {
        if self.records.len() != self.size {
            return Err(Error::Incomplete {
                done: self.records.len(),
                size: self.size,
            });
        }
        self.state = EvalState::Reported;
        Ok(EvaluationReport::from_records(
            self.title.clone(),
            &self.records,
        ))
    }
}
