//! Weekly performance signal over the recorded value history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of points spanned by the weekly window, latest point included.
pub const WEEKLY_WINDOW: usize = 7;
pub const DECLINE_THRESHOLD_PCT: f64 = 3.0;
pub const RISE_THRESHOLD_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub value_try: f64,
    pub value_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TrendSignal {
    /// Weekly change at or below -3%. Holds the (negative) change.
    Decline(f64),
    /// Weekly change at or above +5%.
    Rise(f64),
}

impl TrendSignal {
    pub fn change_pct(&self) -> f64 {
        match self {
            TrendSignal::Decline(pct) | TrendSignal::Rise(pct) => *pct,
        }
    }
}

/// Percentage change between `points[len - 7]` and the latest point.
pub fn weekly_change(history: &[HistoryPoint]) -> Option<f64> {
    if history.len() < WEEKLY_WINDOW {
        return None;
    }
    let baseline = history[history.len() - WEEKLY_WINDOW].value_try;
    let latest = history[history.len() - 1].value_try;
    if baseline == 0.0 || !baseline.is_finite() || !latest.is_finite() {
        return None;
    }
    Some((latest - baseline) * 100.0 / baseline)
}

/// Thresholds are asymmetric: declines fire earlier than rises.
pub fn analyze(history: &[HistoryPoint]) -> Option<TrendSignal> {
    let pct = weekly_change(history)?;
    if pct <= -DECLINE_THRESHOLD_PCT {
        Some(TrendSignal::Decline(pct))
    } else if pct >= RISE_THRESHOLD_PCT {
        Some(TrendSignal::Rise(pct))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn series(values: &[f64]) -> Vec<HistoryPoint> {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 18, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| HistoryPoint {
                timestamp: start + Duration::days(i as i64),
                value_try: *v,
                value_usd: *v / 35.0,
            })
            .collect()
    }

    #[test]
    fn test_weekly_decline() {
        let history = series(&[
            90_000.0, 100_000.0, 99_000.0, 98_000.0, 97_500.0, 97_000.0, 96_500.0, 96_000.0,
        ]);
        let signal = analyze(&history).expect("expected a signal");
        assert!(matches!(signal, TrendSignal::Decline(_)));
        assert!((signal.change_pct() + 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_rise() {
        let history = series(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0]);
        let signal = analyze(&history).expect("expected a signal");
        assert!(matches!(signal, TrendSignal::Rise(pct) if (pct - 6.0).abs() < 1e-9));
    }

    #[test]
    fn test_dead_band_is_silent() {
        // -2.9% and +4.9%
        assert_eq!(analyze(&series(&[100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 97.1])), None);
        assert_eq!(analyze(&series(&[100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 104.9])), None);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        assert!(matches!(
            analyze(&series(&[100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 97.0])),
            Some(TrendSignal::Decline(_))
        ));
        assert!(matches!(
            analyze(&series(&[100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 105.0])),
            Some(TrendSignal::Rise(_))
        ));
    }

    #[test]
    fn test_short_history_has_no_signal() {
        assert_eq!(analyze(&[]), None);
        assert_eq!(analyze(&series(&[100.0, 50.0, 10.0, 5.0, 1.0, 1.0])), None);
    }

    #[test]
    fn test_zero_baseline_has_no_signal() {
        let history = series(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(weekly_change(&history), None);
        assert_eq!(analyze(&history), None);
    }
}
