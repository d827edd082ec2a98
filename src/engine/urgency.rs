use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Number of days out at which a request stops being urgent at all.
pub const DEFAULT_HORIZON_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days from `now` until the start of `target` (UTC), rounded up.
///
/// A target later today counts as zero days away; tomorrow at any time
/// after midnight counts as one.
pub fn days_until(target: NaiveDate, now: DateTime<Utc>) -> i64 {
    let target_start = target.and_time(NaiveTime::MIN).and_utc();
    let millis = (target_start - now).num_milliseconds();

    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        whole
    } else {
        whole + 1
    }
}

/// Maps a target date onto [0, 1]: due or overdue is 1, beyond the horizon
/// is 0, linear in between.
pub fn urgency(target: NaiveDate, now: DateTime<Utc>, horizon_days: i64) -> f64 {
    let diff_days = days_until(target, now);

    if diff_days <= 0 {
        return 1.0;
    }
    if diff_days > horizon_days {
        return 0.0;
    }

    (horizon_days - diff_days) as f64 / horizon_days as f64
}
