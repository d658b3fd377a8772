use chrono::TimeDelta;

use tr_config::HumanDuration;

use crate::error::{CoreResult, invalid_request};

const DAY: i64 = 86_400;

/// Default bucket width by range length, widest first.
const DEFAULT_ROLLUPS: [(i64, u64); 3] = [
    (60 * DAY, 4 * 3600),
    (30 * DAY, 3600),
    (DAY + 1, 30 * 60),
];
const SHORT_RANGE_ROLLUP: u64 = 5 * 60;

/// Pick the stats rollup for a date range.
///
/// An explicit `requested` interval wins; otherwise the width is derived from
/// the range. Either way the resulting bucket count may not exceed
/// `max_points`.
pub fn resolve_rollup(
    range: TimeDelta,
    requested: Option<HumanDuration>,
    max_points: u64,
) -> CoreResult<HumanDuration> {
    let range_secs = range.num_seconds().max(0);
    let rollup = match requested {
        Some(r) if r.as_secs() == 0 => {
            return Err(invalid_request("interval must be at least 1s"));
        }
        Some(r) => r,
        None => HumanDuration::from_secs(
            DEFAULT_ROLLUPS
                .iter()
                .find(|(min_range, _)| range_secs >= *min_range)
                .map_or(SHORT_RANGE_ROLLUP, |(_, rollup)| *rollup),
        ),
    };

    let buckets = (range_secs as u64).div_ceil(rollup.as_secs());
    if buckets > max_points {
        return Err(invalid_request(format!(
            "interval {rollup} yields {buckets} buckets over the range, limit is {max_points}"
        )));
    }
    Ok(rollup)
}
