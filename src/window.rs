//! Rolling price window
//!
//! Short-horizon price history used to derive delta and spread fields

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Short delta lookback in seconds
const SHORT_HORIZON_SECS: i64 = 10;

/// Long delta lookback in seconds
const LONG_HORIZON_SECS: i64 = 60;

/// Samples older than this are dropped; comfortably above the longest lookback
const RETENTION_SECS: i64 = 300;

/// Hard cap on buffered samples
const MAX_SAMPLES: usize = 2048;

/// Delta fields derived from the rolling window.
///
/// Fields stay `None` until a reading at the required horizon exists.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowDeltas {
    pub delta_10s: Option<Decimal>,
    pub pct_10s: Option<Decimal>,
    pub delta_1m: Option<Decimal>,
    pub pct_1m: Option<Decimal>,
}

/// Rolling buffer of (timestamp, price) samples for one (exchange, symbol).
///
/// Owned exclusively by the collector loop; samples are keyed by wall-clock
/// time so lookbacks survive irregular poll cadence.
#[derive(Debug, Default)]
pub struct RollingWindow {
    samples: VecDeque<(DateTime<Utc>, Decimal)>,
}

impl RollingWindow {
    /// Create an empty window
    pub fn new() -> Self {
        Self {
            samples: VecDeque::new(),
        }
    }

    /// Append a price observation and trim expired samples
    pub fn observe(&mut self, ts: DateTime<Utc>, price: Decimal) {
        self.samples.push_back((ts, price));

        let cutoff = ts - Duration::seconds(RETENTION_SECS);
        while let Some((front_ts, _)) = self.samples.front() {
            if *front_ts < cutoff || self.samples.len() > MAX_SAMPLES {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Most recent price observed at or before `ts`
    pub fn price_at_or_before(&self, ts: DateTime<Utc>) -> Option<Decimal> {
        self.samples
            .iter()
            .rev()
            .find(|(t, _)| *t <= ts)
            .map(|(_, p)| *p)
    }

    /// Derive delta fields for a new reading against the existing history.
    ///
    /// Call before `observe` so the current reading cannot serve as its own
    /// reference.
    pub fn deltas(&self, now: DateTime<Utc>, price: Decimal) -> WindowDeltas {
        let (delta_10s, pct_10s) = self.delta_at(now, price, SHORT_HORIZON_SECS);
        let (delta_1m, pct_1m) = self.delta_at(now, price, LONG_HORIZON_SECS);
        WindowDeltas {
            delta_10s,
            pct_10s,
            delta_1m,
            pct_1m,
        }
    }

    fn delta_at(
        &self,
        now: DateTime<Utc>,
        price: Decimal,
        horizon_secs: i64,
    ) -> (Option<Decimal>, Option<Decimal>) {
        let reference = match self.price_at_or_before(now - Duration::seconds(horizon_secs)) {
            Some(p) if !p.is_zero() => p,
            _ => return (None, None),
        };

        let delta = price - reference;
        (Some(delta), delta.checked_div(reference))
    }

    /// Number of buffered samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples are buffered
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Compute spread fields from a two-sided quote.
///
/// `spread_abs = ask - bid`; `spread_pct = spread_abs / mid` with
/// `mid = (bid + ask) / 2`, so bid=100, ask=101 yields 1/100.5. The
/// percentage is `None` when the mid is zero.
pub fn spread(bid: Decimal, ask: Decimal) -> (Decimal, Option<Decimal>) {
    let spread_abs = ask - bid;
    let mid = (ask + bid) / Decimal::TWO;
    let spread_pct = if mid.is_zero() {
        None
    } else {
        spread_abs.checked_div(mid)
    };
    (spread_abs, spread_pct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_window_has_no_deltas() {
        let window = RollingWindow::new();
        let deltas = window.deltas(base_time(), dec!(100));
        assert_eq!(deltas, WindowDeltas::default());
    }

    #[test]
    fn test_deltas_require_horizon() {
        let mut window = RollingWindow::new();
        let t0 = base_time();
        window.observe(t0, dec!(100));

        // 5 seconds later: nothing at or before now-10s yet
        let deltas = window.deltas(t0 + Duration::seconds(5), dec!(101));
        assert!(deltas.delta_10s.is_none());
        assert!(deltas.delta_1m.is_none());
    }

    #[test]
    fn test_delta_exactly_ten_seconds() {
        let mut window = RollingWindow::new();
        let t0 = base_time();
        window.observe(t0, dec!(100.0));

        let deltas = window.deltas(t0 + Duration::seconds(10), dec!(101.0));
        assert_eq!(deltas.delta_10s, Some(dec!(1.0)));
        assert_eq!(deltas.pct_10s, Some(dec!(0.01)));
        // One-minute horizon still unseeded
        assert!(deltas.delta_1m.is_none());
        assert!(deltas.pct_1m.is_none());
    }

    #[test]
    fn test_delta_one_minute() {
        let mut window = RollingWindow::new();
        let t0 = base_time();
        for i in 0..5 {
            window.observe(t0 + Duration::seconds(i * 15), dec!(200) + Decimal::from(i));
        }

        // 75s after t0: 60s lookback resolves to the sample at t0+15s (204 is current)
        let deltas = window.deltas(t0 + Duration::seconds(75), dec!(210));
        assert_eq!(deltas.delta_1m, Some(dec!(9)));
        assert_eq!(deltas.pct_1m, dec!(9).checked_div(dec!(201)));
    }

    #[test]
    fn test_lookback_uses_most_recent_at_or_before() {
        let mut window = RollingWindow::new();
        let t0 = base_time();
        window.observe(t0, dec!(100));
        window.observe(t0 + Duration::seconds(4), dec!(104));
        window.observe(t0 + Duration::seconds(8), dec!(108));

        // now-10s = t0+8s: the sample at exactly t0+8s is the reference
        let deltas = window.deltas(t0 + Duration::seconds(18), dec!(110));
        assert_eq!(deltas.delta_10s, Some(dec!(2)));
    }

    #[test]
    fn test_negative_delta() {
        let mut window = RollingWindow::new();
        let t0 = base_time();
        window.observe(t0, dec!(100));

        let deltas = window.deltas(t0 + Duration::seconds(10), dec!(99));
        assert_eq!(deltas.delta_10s, Some(dec!(-1)));
        assert_eq!(deltas.pct_10s, Some(dec!(-0.01)));
    }

    #[test]
    fn test_zero_reference_price_gives_no_pct() {
        let mut window = RollingWindow::new();
        let t0 = base_time();
        window.observe(t0, dec!(0));

        let deltas = window.deltas(t0 + Duration::seconds(10), dec!(5));
        assert!(deltas.delta_10s.is_none());
        assert!(deltas.pct_10s.is_none());
    }

    #[test]
    fn test_retention_trim() {
        let mut window = RollingWindow::new();
        let t0 = base_time();
        window.observe(t0, dec!(100));
        // A sample far past retention evicts the first one
        window.observe(t0 + Duration::seconds(RETENTION_SECS + 60), dec!(105));
        assert_eq!(window.len(), 1);
        assert!(window.price_at_or_before(t0).is_none());
    }

    #[test]
    fn test_sample_cap() {
        let mut window = RollingWindow::new();
        let t0 = base_time();
        for i in 0..(MAX_SAMPLES as i64 + 100) {
            window.observe(t0 + Duration::milliseconds(i * 10), dec!(100));
        }
        assert!(window.len() <= MAX_SAMPLES);
    }

    #[test]
    fn test_spread_mid_convention() {
        let (abs, pct) = spread(dec!(100), dec!(101));
        assert_eq!(abs, dec!(1));
        assert_eq!(pct, dec!(1).checked_div(dec!(100.5)));
    }

    #[test]
    fn test_spread_zero_mid() {
        let (abs, pct) = spread(dec!(-1), dec!(1));
        assert_eq!(abs, dec!(2));
        assert!(pct.is_none());
    }

    #[test]
    fn test_spread_inverted_quote() {
        // Crossed books happen; the sign carries through
        let (abs, pct) = spread(dec!(101), dec!(100));
        assert_eq!(abs, dec!(-1));
        assert!(pct.unwrap() < Decimal::ZERO);
    }
}
