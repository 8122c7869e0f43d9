use pricefit_core::{EvaluationReport, PredictionRecord, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierFilter {
    All,
    Green,
    Orange,
    Red,
    Misses, // Orange + Red
}

impl TierFilter {
    pub fn label(&self) -> &str {
        match self {
            TierFilter::All => "All",
            TierFilter::Green => "Green",
            TierFilter::Orange => "Orange",
            TierFilter::Red => "Red",
            TierFilter::Misses => "Misses",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            TierFilter::All => TierFilter::Green,
            TierFilter::Green => TierFilter::Orange,
            TierFilter::Orange => TierFilter::Red,
            TierFilter::Red => TierFilter::Misses,
            TierFilter::Misses => TierFilter::All,
        }
    }

    pub fn matches(&self, tier: Tier) -> bool {
        match self {
            TierFilter::All => true,
            TierFilter::Green => tier == Tier::Green,
            TierFilter::Orange => tier == Tier::Orange,
            TierFilter::Red => tier == Tier::Red,
            TierFilter::Misses => tier != Tier::Green,
        }
    }
}

pub struct App {
    pub should_quit: bool,

    // Data
    pub report: EvaluationReport,
    pub records: Vec<PredictionRecord>,
    pub labels: Vec<String>,
    pub filtered: Vec<usize>, // indices into records

    // Filters
    pub tier_filter: TierFilter,

    // Table state
    pub selected_row: usize,

    // Detail view
    pub show_detail: bool,
}

impl App {
    /// `labels[i]` is the display label of `records[i]`.
    pub fn new(report: EvaluationReport, records: Vec<PredictionRecord>, labels: Vec<String>) -> Self {
        let count = records.len();
        let mut app = App {
            should_quit: false,
            report,
            records,
            labels,
            filtered: (0..count).collect(),
            tier_filter: TierFilter::All,
            selected_row: 0,
            show_detail: false,
        };
        app.apply_filters();
        app
    }

    pub fn apply_filters(&mut self) {
        self.filtered = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.tier_filter.matches(r.tier))
            .map(|(i, _)| i)
            .collect();

        // Clamp selection
        if self.filtered.is_empty() {
            self.selected_row = 0;
        } else if self.selected_row >= self.filtered.len() {
            self.selected_row = self.filtered.len() - 1;
        }
    }

    pub fn selected_record(&self) -> Option<&PredictionRecord> {
        self.filtered
            .get(self.selected_row)
            .map(|&idx| &self.records[idx])
    }

    pub fn label_of(&self, record: &PredictionRecord) -> &str {
        self.labels
            .get(record.index)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn move_up(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if !self.filtered.is_empty() && self.selected_row < self.filtered.len() - 1 {
            self.selected_row += 1;
        }
    }

    pub fn page_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(10);
    }

    pub fn page_down(&mut self) {
        if !self.filtered.is_empty() {
            self.selected_row = (self.selected_row + 10).min(self.filtered.len() - 1);
        }
    }

    pub fn home(&mut self) {
        self.selected_row = 0;
    }

    pub fn end(&mut self) {
        if !self.filtered.is_empty() {
            self.selected_row = self.filtered.len() - 1;
        }
    }

    pub fn cycle_tier_filter(&mut self) {
        self.tier_filter = self.tier_filter.next();
        self.apply_filters();
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }
}
