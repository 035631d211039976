//! Daily availability aggregation over status-change events.

use crate::data::{ServerStatus, StatusChangeEvent};

use super::day::{day_key, short_label, trailing_days, DayBoundary};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Default length of the availability window.
pub const DEFAULT_WINDOW_DAYS: u32 = 90;

/// Longest accepted availability window (about ten years).
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// Every bar is drawn full height; severity is carried by color alone.
pub const BAR_HEIGHT: u32 = 100;

/// Availability lost per unit of downtime ratio.
const DOWNTIME_PENALTY: f64 = 20.0;

/// Visual severity of one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Healthy,
    Degraded,
    Critical,
}

impl Severity {
    /// `>= 99` is healthy, `[90, 99)` degraded, anything lower critical.
    pub fn classify(availability: f64) -> Self {
        if availability >= 99.0 {
            Severity::Healthy
        } else if availability >= 90.0 {
            Severity::Degraded
        } else {
            Severity::Critical
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Healthy => "#22c55e",
            Severity::Degraded => "#f59e0b",
            Severity::Critical => "#ef4444",
        }
    }
}

/// Change counters for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyBucket {
    pub downtime_count: u32,
    pub total_changes: u32,
}

impl DailyBucket {
    /// Coarse availability estimate for the day.
    ///
    /// Every DOWN transition costs a share of the penalty regardless of how
    /// long the outage lasted; this is not an uptime percentage.
    pub fn availability(&self) -> f64 {
        if self.total_changes == 0 {
            return 100.0;
        }
        let ratio = self.downtime_count as f64 / self.total_changes as f64;
        (100.0 - ratio * DOWNTIME_PENALTY).max(0.0)
    }
}

/// One bar of the availability chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityPoint {
    pub day: NaiveDate,
    pub label: String,
    pub bar_height: u32,
    pub availability: f64,
    pub severity: Severity,
}

/// Aggregation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOptions {
    pub window_days: u32,
    /// Offset used for labels, and for day keys under [`DayBoundary::Display`].
    pub label_offset: FixedOffset,
    pub day_boundary: DayBoundary,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            label_offset: Utc.fix(),
            day_boundary: DayBoundary::Utc,
        }
    }
}

/// Count changes and DOWN transitions per calendar day.
///
/// Events outside any later window are still counted; they are simply never
/// looked up.
pub fn bucket_events(
    events: &[StatusChangeEvent],
    boundary: DayBoundary,
    offset: FixedOffset,
) -> HashMap<NaiveDate, DailyBucket> {
    let mut buckets: HashMap<NaiveDate, DailyBucket> = HashMap::new();

    for event in events {
        let bucket = buckets
            .entry(day_key(event.changed_at, boundary, offset))
            .or_default();
        bucket.total_changes += 1;
        if event.current_status == ServerStatus::Down {
            bucket.downtime_count += 1;
        }
    }

    buckets
}

/// Build the per-day availability series ending at `now`, oldest first.
///
/// Always returns exactly `options.window_days` points; days without events
/// are healthy.
pub fn aggregate(
    events: &[StatusChangeEvent],
    options: &AggregateOptions,
    now: DateTime<Utc>,
) -> Vec<AvailabilityPoint> {
    let buckets = bucket_events(events, options.day_boundary, options.label_offset);

    trailing_days(now, options.window_days)
        .map(|instant| {
            let day = day_key(instant, options.day_boundary, options.label_offset);
            let availability = buckets
                .get(&day)
                .map(DailyBucket::availability)
                .unwrap_or(100.0);

            AvailabilityPoint {
                day,
                label: short_label(instant, options.label_offset),
                bar_height: BAR_HEIGHT,
                availability,
                severity: Severity::classify(availability),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn event(at: DateTime<Utc>, current: ServerStatus) -> StatusChangeEvent {
        StatusChangeEvent {
            server_id: "web".to_string(),
            server_name: "Web".to_string(),
            previous_status: ServerStatus::Unknown,
            current_status: current,
            changed_at: at,
            response_time: None,
            error_message: None,
        }
    }

    /// `total` events on the day of `at`, the first `down` of them DOWN.
    fn day_of_events(at: DateTime<Utc>, total: usize, down: usize) -> Vec<StatusChangeEvent> {
        (0..total)
            .map(|i| {
                let status = if i < down { ServerStatus::Down } else { ServerStatus::Up };
                event(at + ChronoDuration::minutes(i as i64), status)
            })
            .collect()
    }

    fn point_for(points: &[AvailabilityPoint], day: NaiveDate) -> &AvailabilityPoint {
        points.iter().find(|p| p.day == day).unwrap()
    }

    #[test]
    fn test_window_length_and_order() {
        let points = aggregate(&[], &AggregateOptions::default(), now());
        assert_eq!(points.len(), 90);
        assert_eq!(points.last().unwrap().day, now().date_naive());
        assert_eq!(
            points.first().unwrap().day,
            (now() - ChronoDuration::days(89)).date_naive()
        );
        assert!(points.windows(2).all(|w| w[0].day < w[1].day));

        let options = AggregateOptions { window_days: 7, ..Default::default() };
        assert_eq!(aggregate(&[], &options, now()).len(), 7);
    }

    #[test]
    fn test_empty_events_all_healthy() {
        let points = aggregate(&[], &AggregateOptions::default(), now());
        assert!(points.iter().all(|p| p.severity == Severity::Healthy));
        assert!(points.iter().all(|p| p.bar_height == 100));
        assert!(points.iter().all(|p| p.availability == 100.0));
    }

    #[test]
    fn test_all_down_is_critical() {
        let day = now() - ChronoDuration::days(3);
        let events = day_of_events(day, 5, 5);
        let points = aggregate(&events, &AggregateOptions::default(), now());

        let point = point_for(&points, day.date_naive());
        assert_eq!(point.availability, 80.0);
        assert_eq!(point.severity, Severity::Critical);
        assert_eq!(point.bar_height, 100);
    }

    #[test]
    fn test_one_in_ten_down_is_degraded() {
        let day = now() - ChronoDuration::days(10);
        let events = day_of_events(day, 10, 1);
        let points = aggregate(&events, &AggregateOptions::default(), now());

        let point = point_for(&points, day.date_naive());
        assert!((point.availability - 98.0).abs() < 1e-9);
        assert_eq!(point.severity, Severity::Degraded);
    }

    #[test]
    fn test_no_down_is_healthy() {
        let day = now() - ChronoDuration::days(1);
        let events = day_of_events(day, 10, 0);
        let points = aggregate(&events, &AggregateOptions::default(), now());

        let point = point_for(&points, day.date_naive());
        assert_eq!(point.availability, 100.0);
        assert_eq!(point.severity, Severity::Healthy);
    }

    #[test]
    fn test_idempotent() {
        let mut events = day_of_events(now() - ChronoDuration::days(2), 4, 2);
        events.extend(day_of_events(now() - ChronoDuration::days(40), 3, 1));
        let before = events.clone();

        let options = AggregateOptions::default();
        let first = aggregate(&events, &options, now());
        let second = aggregate(&events, &options, now());
        assert_eq!(first, second);
        assert_eq!(events, before);
    }

    #[test]
    fn test_no_cross_day_leakage() {
        let busy = now() - ChronoDuration::days(5);
        let events = day_of_events(busy, 50, 50);
        let points = aggregate(&events, &AggregateOptions::default(), now());

        for point in &points {
            if point.day == busy.date_naive() {
                assert_eq!(point.severity, Severity::Critical);
            } else {
                assert_eq!(point.severity, Severity::Healthy);
            }
        }
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        let mut events = day_of_events(now() - ChronoDuration::days(1), 4, 1);
        events.extend(day_of_events(now() - ChronoDuration::days(8), 2, 2));
        let mut reversed = events.clone();
        reversed.reverse();

        let options = AggregateOptions::default();
        assert_eq!(aggregate(&events, &options, now()), aggregate(&reversed, &options, now()));
    }

    #[test]
    fn test_events_outside_window_ignored() {
        let events = day_of_events(now() - ChronoDuration::days(200), 3, 3);
        let points = aggregate(&events, &AggregateOptions::default(), now());
        assert!(points.iter().all(|p| p.severity == Severity::Healthy));
    }

    #[test]
    fn test_utc_boundary_keeps_label_mismatch() {
        // 20:00 UTC is already the next day at +09:00
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap();
        let options = AggregateOptions {
            window_days: 2,
            label_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
            day_boundary: DayBoundary::Utc,
        };
        let events = day_of_events(Utc.with_ymd_and_hms(2024, 3, 10, 1, 0, 0).unwrap(), 1, 1);

        let points = aggregate(&events, &options, now);
        let last = points.last().unwrap();
        assert_eq!(last.day, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(last.label, "Mar 11");
        assert_eq!(last.severity, Severity::Critical);
    }

    #[test]
    fn test_display_boundary_aligns_keys_and_labels() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap();
        let options = AggregateOptions {
            window_days: 2,
            label_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
            day_boundary: DayBoundary::Display,
        };
        // 16:00 UTC on the 10th is 01:00 on the 11th at +09:00
        let events = day_of_events(Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 0).unwrap(), 1, 1);

        let points = aggregate(&events, &options, now);
        let last = points.last().unwrap();
        assert_eq!(last.day, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(last.label, "Mar 11");
        assert_eq!(last.severity, Severity::Critical);
        assert_eq!(points[0].severity, Severity::Healthy);
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(Severity::classify(100.0), Severity::Healthy);
        assert_eq!(Severity::classify(99.0), Severity::Healthy);
        assert_eq!(Severity::classify(98.9), Severity::Degraded);
        assert_eq!(Severity::classify(90.0), Severity::Degraded);
        assert_eq!(Severity::classify(89.9), Severity::Critical);
        assert_eq!(Severity::classify(0.0), Severity::Critical);
    }

    #[test]
    fn test_bucket_counts() {
        let day = now() - ChronoDuration::days(1);
        let events = day_of_events(day, 3, 2);
        let buckets = bucket_events(&events, DayBoundary::Utc, Utc.fix());
        assert_eq!(
            buckets[&day.date_naive()],
            DailyBucket { downtime_count: 2, total_changes: 3 }
        );
        assert_eq!(DailyBucket::default().availability(), 100.0);
    }
}
