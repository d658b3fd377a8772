use chrono::{DateTime, TimeDelta, Utc};

/// Textual timestamp format handed to the query engine.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A date range split at its midpoint into a "before" (`start..middle`) and
/// an "after" (`middle..end`) window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub middle: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The three boundaries of a [`TimeWindow`] rendered with [`DATE_FORMAT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: String,
    pub middle: String,
    pub end: String,
}

/// Split `[start, end]` at fraction 0.5 of its duration.
///
/// The caller guarantees `start <= end`. Sub-microsecond remainders are
/// truncated, so `middle - start` and `end - middle` differ by at most one
/// microsecond.
pub fn split_window(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeWindow {
    let span = end - start;
    let half = match span.num_microseconds() {
        Some(us) => TimeDelta::microseconds((us as f64 * 0.5) as i64),
        // Spans beyond ~292k years overflow microseconds; seconds suffice.
        None => TimeDelta::seconds((span.num_seconds() as f64 * 0.5) as i64),
    };
    TimeWindow {
        start,
        middle: start + half,
        end,
    }
}

impl TimeWindow {
    pub fn bounds(&self) -> WindowBounds {
        WindowBounds {
            start: self.start.format(DATE_FORMAT).to_string(),
            middle: self.middle.format(DATE_FORMAT).to_string(),
            end: self.end.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn two_day_range_splits_at_midnight() {
        let w = split_window(ts("2020-01-01T00:00:00Z"), ts("2020-01-03T00:00:00Z"));
        assert_eq!(w.middle, ts("2020-01-02T00:00:00Z"));
        let b = w.bounds();
        assert_eq!(b.start, "2020-01-01T00:00:00");
        assert_eq!(b.middle, "2020-01-02T00:00:00");
        assert_eq!(b.end, "2020-01-03T00:00:00");
    }

    #[test]
    fn odd_second_range() {
        let w = split_window(ts("2020-01-01T00:00:00Z"), ts("2020-01-01T00:00:03Z"));
        assert_eq!(w.middle, ts("2020-01-01T00:00:01.500Z"));
        // Formatting drops the fractional part.
        assert_eq!(w.bounds().middle, "2020-01-01T00:00:01");
    }

    #[test]
    fn empty_range() {
        let t = ts("2021-06-01T12:00:00Z");
        let w = split_window(t, t);
        assert_eq!(w.start, t);
        assert_eq!(w.middle, t);
        assert_eq!(w.end, t);
    }

    #[test]
    fn midpoint_is_ordered_and_centered() {
        let start = ts("2019-03-10T07:13:02Z");
        for secs in [1_i64, 7, 59, 3_601, 86_399, 2_592_001, 31_536_007] {
            let end = start + TimeDelta::seconds(secs);
            let w = split_window(start, end);
            assert!(w.start <= w.middle && w.middle <= w.end);
            let left = (w.middle - w.start).num_microseconds().unwrap();
            let right = (w.end - w.middle).num_microseconds().unwrap();
            assert!((left - right).abs() <= 1, "{secs}s: {left} vs {right}");
        }
    }
}
