//! Price extraction from raw model output.
//!
//! Every predictor turns free text into a number through these helpers. A
//! reply with no usable number scores as a zero guess instead of failing,
//! so one bad completion cannot abort a whole evaluation run.

use regex::Regex;
use std::sync::LazyLock;

/// Marker that precedes the price in prompts and completions.
pub const PRICE_MARKER: &str = "Price is $";

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d*\.\d+|\d+").expect("valid number pattern"));

fn first_number(text: &str) -> Option<f64> {
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Extract the first number following [`PRICE_MARKER`].
///
/// Thousands separators are stripped before matching. Returns `0.0` when the
/// marker is missing or nothing numeric follows it.
pub fn extract_price(text: &str) -> f64 {
    let Some((_, after)) = text.split_once(PRICE_MARKER) else {
        log::debug!("no price marker in model output");
        return 0.0;
    };
    let cleaned = after.replace(',', "");
    first_number(&cleaned).unwrap_or_else(|| {
        log::debug!("no number after price marker");
        0.0
    })
}

/// Extract the first number anywhere in `text`, ignoring `$` and `,`.
pub fn extract_price_loose(text: &str) -> f64 {
    let cleaned = text.replace(['$', ','], "");
    first_number(&cleaned).unwrap_or_else(|| {
        log::debug!("no number in model output");
        0.0
    })
}

/// Probability-weighted price over top-k decoded tokens.
///
/// Candidates are `(token, probability)` pairs. Non-numeric tokens are
/// dropped and the remaining probabilities renormalised.
pub fn weighted_price(candidates: &[(String, f64)]) -> f64 {
    let mut total = 0.0;
    let mut weighted = 0.0;
    for (token, prob) in candidates {
        let Ok(value) = token.trim().parse::<f64>() else {
            continue;
        };
        if !value.is_finite() || !prob.is_finite() || *prob <= 0.0 {
            continue;
        }
        weighted += value * prob;
        total += prob;
    }
    if total > 0.0 {
        weighted / total
    } else {
        log::debug!("no numeric token among top-k candidates");
        0.0
    }
}

/// Format as US dollars with two decimals and thousands separators.
pub fn format_usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}
