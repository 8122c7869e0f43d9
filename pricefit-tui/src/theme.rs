use pricefit_core::Tier;
use ratatui::style::Color;

/// Console color for a tier.
pub fn tier_color(tier: Tier) -> colored::Color {
    match tier {
        Tier::Green => colored::Color::Green,
        Tier::Orange => colored::Color::Yellow,
        Tier::Red => colored::Color::Red,
    }
}

/// Chart and table color for a tier in the TUI.
pub fn tier_chart_color(tier: Tier) -> Color {
    match tier {
        Tier::Green => Color::Green,
        Tier::Orange => Color::Yellow,
        Tier::Red => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_tier_has_a_distinct_color() {
        let colors: Vec<Color> = Tier::ALL.iter().map(|&t| tier_chart_color(t)).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_eq!(tier_color(Tier::Orange), colored::Color::Yellow);
    }
}
