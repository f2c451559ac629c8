//! Day-unlock policy.
//!
//! # Responsibility
//! - Compute the highest open door day for a given calendar date.
//!
//! # Invariants
//! - Pure function of the supplied date; no I/O, no hidden state.
//! - Callers re-evaluate on every render so doors unlock as the clock
//!   advances, without timers.

use crate::model::card::DOOR_COUNT;
use chrono::{Datelike, NaiveDate};

const DECEMBER: u32 = 12;

/// Returns the highest unlocked door day for `today`.
///
/// # Contract
/// - Within December: `min(day_of_month, 24)`.
/// - Any other month: `24` (preview mode, every door open).
pub fn max_open_day(today: NaiveDate) -> u8 {
    if today.month() == DECEMBER {
        today.day().min(u32::from(DOOR_COUNT)) as u8
    } else {
        DOOR_COUNT
    }
}

/// Returns whether `day` is locked under the given policy result.
pub fn is_locked(day: u8, max_open_day: u8) -> bool {
    day > max_open_day
}

#[cfg(test)]
mod tests {
    use super::{is_locked, max_open_day};
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn december_unlocks_up_to_current_day() {
        assert_eq!(max_open_day(date(2025, 12, 1)), 1);
        assert_eq!(max_open_day(date(2025, 12, 10)), 10);
        assert_eq!(max_open_day(date(2025, 12, 24)), 24);
    }

    #[test]
    fn late_december_caps_at_door_count() {
        assert_eq!(max_open_day(date(2025, 12, 25)), 24);
        assert_eq!(max_open_day(date(2025, 12, 31)), 24);
    }

    #[test]
    fn non_december_unlocks_everything() {
        assert_eq!(max_open_day(date(2025, 7, 15)), 24);
        assert_eq!(max_open_day(date(2026, 1, 1)), 24);
        assert_eq!(max_open_day(date(2025, 11, 30)), 24);
    }

    #[test]
    fn lock_predicate_is_strictly_greater_than() {
        assert!(!is_locked(3, 3));
        assert!(is_locked(4, 3));
        assert!(!is_locked(1, 24));
    }
}
