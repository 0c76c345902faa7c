//! Claim Window Policy
//!
//! Pure date arithmetic deciding whether a calendar anniversary
//! (birthday, member anniversary, relationship anniversary) is currently
//! claimable. No I/O; the claim service feeds it merchant settings and
//! membership state.
//!
//! The anniversary is projected onto the *current* year only. An
//! anniversary that just occurred in the neighboring year (Dec 29
//! anniversary checked on Jan 2, say) is therefore not claimable even
//! when it falls inside `window_days` across the year boundary.
//! 年末年初的跨年窗口是已知缺口, see DESIGN.md.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use shared::models::MonthDay;

/// Project a month/day onto `year`. Feb 29 rolls forward to Mar 1 in
/// non-leap years (the next real day, so the window stays anchored).
fn project_onto_year(anniversary: MonthDay, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, anniversary.month, anniversary.day).unwrap_or_else(|| {
        let (y, m) = if anniversary.month == 12 {
            (year + 1, 1)
        } else {
            (year, anniversary.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1).expect("first of month is always a valid date")
    })
}

/// Is `now` within ±`window_days` of this year's occurrence of the
/// anniversary?
///
/// `diff_days` counts whole days from today to the projected date
/// (negative once the date has passed).
pub fn is_within_window(anniversary: MonthDay, window_days: i64, now: DateTime<Utc>) -> bool {
    let today = now.date_naive();
    let target = project_onto_year(anniversary, today.year());
    let diff_days = (target - today).num_days();
    diff_days.abs() <= window_days
}

/// Has this member already claimed in `now`'s calendar year?
pub fn has_claimed_this_year(last_claim_year: Option<i64>, now: DateTime<Utc>) -> bool {
    last_claim_year == Some(i64::from(now.year()))
}

/// A claim is allowed iff the window is open and the year is unclaimed.
pub fn claim_allowed(
    anniversary: MonthDay,
    window_days: i64,
    last_claim_year: Option<i64>,
    now: DateTime<Utc>,
) -> bool {
    is_within_window(anniversary, window_days, now) && !has_claimed_this_year(last_claim_year, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn md(month: u32, day: u32) -> MonthDay {
        MonthDay { month, day }
    }

    #[test]
    fn window_is_symmetric_around_anniversary() {
        let anniversary = md(3, 10);
        // Exactly window_days before and after → claimable
        assert!(is_within_window(anniversary, 7, at(2025, 3, 3)));
        assert!(is_within_window(anniversary, 7, at(2025, 3, 17)));
        // One day beyond in either direction → not claimable
        assert!(!is_within_window(anniversary, 7, at(2025, 3, 2)));
        assert!(!is_within_window(anniversary, 7, at(2025, 3, 18)));
    }

    #[test]
    fn anniversary_day_itself_is_claimable() {
        assert!(is_within_window(md(3, 10), 0, at(2025, 3, 10)));
        assert!(!is_within_window(md(3, 10), 0, at(2025, 3, 11)));
    }

    #[test]
    fn five_days_after_march_10_inside_seven_day_window() {
        // Anniversary March 10, window 7,
        // checked on March 15.
        assert!(is_within_window(md(3, 10), 7, at(2025, 3, 15)));
    }

    #[test]
    fn december_anniversary_not_claimable_in_early_january() {
        // Known year-boundary gap: only the current-year occurrence is
        // checked, so a Dec 29 anniversary seen on Jan 2 is ~361 days
        // away, not -4.
        assert!(!is_within_window(md(12, 29), 7, at(2026, 1, 2)));
        // And the mirror image: a Jan 2 anniversary seen on Dec 29.
        assert!(!is_within_window(md(1, 2), 7, at(2025, 12, 29)));
    }

    #[test]
    fn feb_29_rolls_to_mar_1_off_leap_years() {
        // 2025 is not a leap year: Feb 29 anchors at Mar 1
        assert!(is_within_window(md(2, 29), 0, at(2025, 3, 1)));
        assert!(!is_within_window(md(2, 29), 0, at(2025, 2, 28)));
        // 2024 is a leap year: the real date is used
        assert!(is_within_window(md(2, 29), 0, at(2024, 2, 29)));
    }

    #[test]
    fn claimed_this_year_blocks() {
        let now = at(2025, 3, 10);
        assert!(has_claimed_this_year(Some(2025), now));
        assert!(!has_claimed_this_year(Some(2024), now));
        assert!(!has_claimed_this_year(None, now));

        assert!(claim_allowed(md(3, 10), 7, None, now));
        assert!(claim_allowed(md(3, 10), 7, Some(2024), now));
        assert!(!claim_allowed(md(3, 10), 7, Some(2025), now));
        assert!(!claim_allowed(md(6, 1), 7, None, now));
    }
}
