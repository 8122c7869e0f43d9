//! Accuracy tiers for a single price guess.

use serde::{Deserialize, Serialize};

/// Absolute error (currency units) below which a guess is green.
pub const GREEN_ABS: f64 = 40.0;
/// Relative error below which a guess is green.
pub const GREEN_REL: f64 = 0.20;
/// Absolute error below which a guess is orange.
pub const ORANGE_ABS: f64 = 80.0;
/// Relative error below which a guess is orange.
pub const ORANGE_REL: f64 = 0.40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Green,
    Orange,
    Red,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Green, Tier::Orange, Tier::Red];

    /// Classify a guess by its absolute error against `truth`.
    ///
    /// Each tier is reached when either the absolute or the relative error is
    /// under its threshold, with the absolute check evaluated first. A truth
    /// of zero (or below) has no meaningful ratio, so only the absolute
    /// thresholds apply there.
    pub fn classify(absolute_error: f64, truth: f64) -> Tier {
        let ratio = if truth > 0.0 {
            absolute_error / truth
        } else {
            f64::INFINITY
        };

        if absolute_error < GREEN_ABS || ratio < GREEN_REL {
            Tier::Green
        } else if absolute_error < ORANGE_ABS || ratio < ORANGE_REL {
            Tier::Orange
        } else {
            Tier::Red
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Green => "green",
            Tier::Orange => "orange",
            Tier::Red => "red",
        }
    }

    pub fn is_hit(&self) -> bool {
        *self == Tier::Green
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_guess_is_green() {
        assert_eq!(Tier::classify(0.0, 100.0), Tier::Green);
    }

    #[test]
    fn large_absolute_but_small_relative_is_green() {
        // truth 1000, guess 960
        assert_eq!(Tier::classify(40.0, 1000.0), Tier::Green);
    }

    #[test]
    fn zero_guess_on_cheap_item_is_orange() {
        // truth 50, guess 0
        assert_eq!(Tier::classify(50.0, 50.0), Tier::Orange);
    }

    #[test]
    fn far_off_guess_is_red() {
        // truth 500, guess 50
        assert_eq!(Tier::classify(450.0, 500.0), Tier::Red);
    }

    #[test]
    fn boundaries_are_exclusive() {
        // 40 is not < 40 and 40/100 is not < 0.2
        assert_eq!(Tier::classify(40.0, 100.0), Tier::Orange);
        // 80 is not < 80 and 80/150 is not < 0.4
        assert_eq!(Tier::classify(80.0, 150.0), Tier::Red);
        // 80/250 = 0.32 rescues the item into orange
        assert_eq!(Tier::classify(80.0, 250.0), Tier::Orange);
    }

    #[test]
    fn zero_truth_uses_absolute_thresholds_only() {
        assert_eq!(Tier::classify(10.0, 0.0), Tier::Green);
        assert_eq!(Tier::classify(60.0, 0.0), Tier::Orange);
        assert_eq!(Tier::classify(100.0, 0.0), Tier::Red);
    }

    #[test]
    fn only_green_counts_as_hit() {
        assert!(Tier::Green.is_hit());
        assert!(!Tier::Orange.is_hit());
        assert!(!Tier::Red.is_hit());
    }

    #[test]
    fn labels_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Orange).unwrap(), "\"orange\"");
        assert_eq!(Tier::Red.to_string(), "red");
    }
}
