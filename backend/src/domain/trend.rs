//! Short and long window percentage trends over a price history.
//!
//! A window of `N` days is anchored at the latest observation: a point is in
//! the window when its date is no earlier than `latest_date - N days`. The
//! change is `(latest - earliest_in_window) / earliest_in_window * 100`.
//! Windows with fewer than two points have no trend.

use chrono::Duration;

use super::price::{PriceSnapshot, round_to};

/// Short trend window in days.
pub const SHORT_WINDOW_DAYS: i64 = 7;
/// Long trend window in days.
pub const LONG_WINDOW_DAYS: i64 = 30;

/// Movement below this magnitude (in percent) reads as "stable".
const STABLE_BAND_PCT: f64 = 0.1;

/// Percentage change over the `days`-day window ending at the last snapshot.
///
/// `snapshots` must be sorted ascending by date.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use kuber::domain::{PriceSnapshot, window_change};
///
/// let today = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
/// let week_ago = NaiveDate::from_ymd_opt(2025, 8, 8).unwrap();
/// let points = [
///     PriceSnapshot::try_new(week_ago, 60.0).unwrap(),
///     PriceSnapshot::try_new(today, 63.0).unwrap(),
/// ];
/// assert_eq!(window_change(&points, 7), Some(5.0));
/// assert_eq!(window_change(&points[1..], 7), None);
/// ```
#[must_use]
pub fn window_change(snapshots: &[PriceSnapshot], days: i64) -> Option<f64> {
    let latest = snapshots.last()?;
    let cutoff = latest.date() - Duration::days(days);
    let mut window = snapshots
        .iter()
        .filter(|point| point.date() >= cutoff && point.date() <= latest.date());

    let earliest = window.next()?;
    // A lone point cannot express a change.
    window.next()?;

    let start = earliest.price();
    if start <= 0.0 {
        return None;
    }
    Some((latest.price() - start) / start * 100.0)
}

/// Phrase a percentage move for prose.
///
/// # Examples
/// ```
/// use kuber::domain::describe_change;
///
/// assert_eq!(describe_change(2.5), "increased by 2.50%");
/// assert_eq!(describe_change(-0.75), "decreased by 0.75%");
/// assert_eq!(describe_change(0.05), "been relatively stable");
/// ```
#[must_use]
pub fn describe_change(pct: f64) -> String {
    if pct > STABLE_BAND_PCT {
        format!("increased by {pct:.2}%")
    } else if pct < -STABLE_BAND_PCT {
        format!("decreased by {:.2}%", pct.abs())
    } else {
        "been relatively stable".to_owned()
    }
}

/// Short and long window trends for one history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrendSummary {
    seven_day_pct: Option<f64>,
    thirty_day_pct: Option<f64>,
}

impl TrendSummary {
    /// Compute both windows from date-ordered snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: &[PriceSnapshot]) -> Self {
        Self {
            seven_day_pct: window_change(snapshots, SHORT_WINDOW_DAYS),
            thirty_day_pct: window_change(snapshots, LONG_WINDOW_DAYS),
        }
    }

    /// Seven-day change in percent, if computable.
    pub fn seven_day_pct(&self) -> Option<f64> {
        self.seven_day_pct
    }

    /// Thirty-day change in percent, if computable.
    pub fn thirty_day_pct(&self) -> Option<f64> {
        self.thirty_day_pct
    }

    /// Both figures rounded to two decimal places for presentation.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            seven_day_pct: self.seven_day_pct.map(|pct| round_to(pct, 2)),
            thirty_day_pct: self.thirty_day_pct.map(|pct| round_to(pct, 2)),
        }
    }

    /// True when at least one window produced a figure.
    pub fn is_available(&self) -> bool {
        self.seven_day_pct.is_some() || self.thirty_day_pct.is_some()
    }

    /// One-line insight appended to advisor answers; `None` when neither
    /// window has data.
    #[must_use]
    pub fn insight(&self) -> Option<String> {
        if !self.is_available() {
            return None;
        }
        let short = self
            .seven_day_pct
            .map_or_else(unavailable, |pct| format!("changed by {pct:.2}%"));
        let long = self
            .thirty_day_pct
            .map_or_else(unavailable, |pct| format!("changed by {pct:.2}%"));
        Some(format!(
            "Over the last 7 days, gold has {short}. Over the last 30 days, it {long}."
        ))
    }

    /// Qualitative narrative used as prompt context.
    #[must_use]
    pub fn narrative(&self) -> String {
        match (self.seven_day_pct, self.thirty_day_pct) {
            (None, None) => "No sufficient data to determine trend.".to_owned(),
            (short, long) => {
                let short = short.map_or_else(unknown, describe_change);
                let long = long.map_or_else(unknown, describe_change);
                format!(
                    "Gold prices have {short} over the last 7 days and have {long} over the last 30 days."
                )
            }
        }
    }
}

fn unavailable() -> String {
    "no trend data (unavailable)".to_owned()
}

fn unknown() -> String {
    "an unknown trend".to_owned()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 15).expect("valid date")
    }

    fn point(today: NaiveDate, days_ago: i64, price: f64) -> PriceSnapshot {
        PriceSnapshot::try_new(today - Duration::days(days_ago), price).expect("valid snapshot")
    }

    #[rstest]
    fn seven_day_trend_matches_worked_example(today: NaiveDate) {
        let points = [point(today, 7, 60.0), point(today, 0, 63.0)];

        let summary = TrendSummary::from_snapshots(&points);

        assert_eq!(summary.seven_day_pct(), Some(5.0));
        assert_eq!(summary.thirty_day_pct(), Some(5.0));
    }

    #[rstest]
    fn single_point_has_no_trend(today: NaiveDate) {
        let summary = TrendSummary::from_snapshots(&[point(today, 0, 63.0)]);

        assert_eq!(summary.seven_day_pct(), None);
        assert_eq!(summary.thirty_day_pct(), None);
        assert!(summary.insight().is_none());
    }

    #[rstest]
    fn empty_history_has_no_trend() {
        assert_eq!(TrendSummary::from_snapshots(&[]), TrendSummary::default());
    }

    #[rstest]
    fn points_outside_the_short_window_only_feed_the_long_one(today: NaiveDate) {
        let points = [point(today, 20, 50.0), point(today, 0, 55.0)];

        let summary = TrendSummary::from_snapshots(&points);

        assert_eq!(summary.seven_day_pct(), None);
        assert_eq!(summary.thirty_day_pct(), Some(10.0));
    }

    #[rstest]
    fn window_boundary_is_inclusive(today: NaiveDate) {
        let points = [
            point(today, 31, 10.0),
            point(today, 30, 100.0),
            point(today, 0, 90.0),
        ];

        assert_eq!(window_change(&points, LONG_WINDOW_DAYS), Some(-10.0));
    }

    #[rstest]
    fn insight_marks_missing_windows(today: NaiveDate) {
        let points = [point(today, 20, 50.0), point(today, 0, 55.0)];

        let insight = TrendSummary::from_snapshots(&points)
            .insight()
            .expect("long window available");

        assert_eq!(
            insight,
            "Over the last 7 days, gold has no trend data (unavailable). \
             Over the last 30 days, it changed by 10.00%."
        );
    }

    #[rstest]
    fn narrative_uses_qualitative_phrases(today: NaiveDate) {
        let points = [
            point(today, 25, 100.0),
            point(today, 7, 110.0),
            point(today, 0, 110.05),
        ];

        let narrative = TrendSummary::from_snapshots(&points).narrative();

        assert_eq!(
            narrative,
            "Gold prices have been relatively stable over the last 7 days \
             and have increased by 10.05% over the last 30 days."
        );
    }

    #[rstest]
    fn rounded_keeps_two_places(today: NaiveDate) {
        let points = [point(today, 3, 3.0), point(today, 0, 4.0)];

        let summary = TrendSummary::from_snapshots(&points).rounded();

        assert_eq!(summary.seven_day_pct(), Some(33.33));
    }
}
