//! Derived price analytics for finance-flavored briefings
//!
//! Simple deterministic derivations over a price series. These are
//! reference levels for conversation, not predictions.

use chrono::DateTime;

/// Multipliers applied to the window minimum for support levels.
const SUPPORT_FACTORS: [f64; 2] = [0.98, 0.95];

/// Multipliers applied to the window maximum for resistance levels.
const RESISTANCE_FACTORS: [f64; 2] = [1.02, 1.05];

/// Two support levels from the most recent `window` samples:
/// `min × 0.98` and `min × 0.95`. None for an empty series.
pub fn support_levels(prices: &[f64], window: usize) -> Option<[f64; 2]> {
    let recent = recent_window(prices, window)?;
    let min = recent.iter().cloned().fold(f64::INFINITY, f64::min);
    Some([min * SUPPORT_FACTORS[0], min * SUPPORT_FACTORS[1]])
}

/// Two resistance levels from the most recent `window` samples:
/// `max × 1.02` and `max × 1.05`. None for an empty series.
pub fn resistance_levels(prices: &[f64], window: usize) -> Option<[f64; 2]> {
    let recent = recent_window(prices, window)?;
    let max = recent.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some([max * RESISTANCE_FACTORS[0], max * RESISTANCE_FACTORS[1]])
}

fn recent_window(prices: &[f64], window: usize) -> Option<&[f64]> {
    if prices.is_empty() || window == 0 {
        return None;
    }
    Some(&prices[prices.len().saturating_sub(window)..])
}

/// Monetary value formatted to 2 decimal places.
pub fn format_money(value: f64) -> String {
    format!("${:.2}", value)
}

/// Percentage formatted to 2 decimal places.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Millisecond epoch timestamp rendered as a calendar date.
pub fn format_date(timestamp_ms: f64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms as i64)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_support_and_resistance_levels() {
        let prices = [100.0, 90.0, 80.0, 110.0, 95.0];

        let support = support_levels(&prices, 30).unwrap();
        assert_close(support[0], 78.4);
        assert_close(support[1], 76.0);

        let resistance = resistance_levels(&prices, 30).unwrap();
        assert_close(resistance[0], 112.2);
        assert_close(resistance[1], 115.5);
    }

    #[test]
    fn test_window_restricts_samples() {
        // Only the last 2 samples should be considered.
        let prices = [1.0, 1000.0, 100.0, 200.0];

        let support = support_levels(&prices, 2).unwrap();
        assert_close(support[0], 98.0);

        let resistance = resistance_levels(&prices, 2).unwrap();
        assert_close(resistance[0], 204.0);
    }

    #[test]
    fn test_empty_series() {
        assert!(support_levels(&[], 30).is_none());
        assert!(resistance_levels(&[], 30).is_none());
        assert!(support_levels(&[100.0], 0).is_none());
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_money(78.4), "$78.40");
        assert_eq!(format_money(112.196), "$112.20");
        assert_eq!(format_percent(3.14159), "3.14%");
        // 2021-01-01T00:00:00Z
        assert_eq!(format_date(1609459200000.0), "2021-01-01");
    }
}
