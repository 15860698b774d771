use chrono::{Datelike, NaiveDate};

use crate::models::SpecialDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Today,
    Upcoming { days_left: u32 },
}

/// Decides whether `day` fires on `today`.
///
/// A day-of match always wins over the reminder check, so a record fires at
/// most once per run. Days without a readable date never fire.
pub fn check_occurrence(day: &SpecialDay, today: NaiveDate) -> Option<Occurrence> {
    let date = day.date?;

    let is_today = if day.is_recurring {
        date.month() == today.month() && date.day() == today.day()
    } else {
        date == today
    };
    if is_today {
        return Some(Occurrence::Today);
    }

    if day.reminder_days_before == 0 {
        return None;
    }

    let target = if day.is_recurring {
        next_occurrence(date, today)?
    } else {
        date
    };

    let days_left = (target - today).num_days();
    if days_left == i64::from(day.reminder_days_before) {
        Some(Occurrence::Upcoming {
            days_left: day.reminder_days_before,
        })
    } else {
        None
    }
}

/// First date on or after `today` carrying `date`'s month and day.
///
/// This year's occurrence is used unless it already passed, in which case the
/// next year's is taken.
pub fn next_occurrence(date: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    [today.year(), today.year() + 1]
        .into_iter()
        .filter_map(|year| occurrence_in(date, year))
        .find(|candidate| *candidate >= today)
}

/// `date`'s month and day in `year`; Feb 29 falls on Mar 1 in common years.
fn occurrence_in(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day()).or_else(|| {
        if date.month() == 2 && date.day() == 29 {
            NaiveDate::from_ymd_opt(year, 3, 1)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(date: Option<NaiveDate>, is_recurring: bool, reminder_days_before: u32) -> SpecialDay {
        SpecialDay {
            id: "sd-1".into(),
            title: "Kuruluş Yıldönümü".into(),
            description: None,
            date,
            is_recurring,
            reminder_days_before,
            union_id: None,
            created_at: "2024-01-01T00:00:00Z".into(),
            union: None,
        }
    }

    #[test]
    fn recurring_matches_month_and_day_in_any_year() {
        let d = day(Some(ymd(1999, 4, 23)), true, 0);
        assert_eq!(check_occurrence(&d, ymd(2025, 4, 23)), Some(Occurrence::Today));
        assert_eq!(check_occurrence(&d, ymd(1999, 4, 23)), Some(Occurrence::Today));
        assert_eq!(check_occurrence(&d, ymd(2025, 4, 24)), None);
        assert_eq!(check_occurrence(&d, ymd(2025, 5, 23)), None);
    }

    #[test]
    fn one_off_matches_only_the_exact_date() {
        let d = day(Some(ymd(2025, 4, 23)), false, 0);
        assert_eq!(check_occurrence(&d, ymd(2025, 4, 23)), Some(Occurrence::Today));
        assert_eq!(check_occurrence(&d, ymd(2026, 4, 23)), None);
    }

    #[test]
    fn zero_reminder_never_reports_upcoming() {
        let d = day(Some(ymd(2020, 6, 10)), true, 0);
        let mut t = ymd(2025, 1, 1);
        while t < ymd(2026, 1, 1) {
            assert_ne!(
                check_occurrence(&d, t).map(|o| matches!(o, Occurrence::Upcoming { .. })),
                Some(true)
            );
            t = t.succ_opt().unwrap();
        }
    }

    #[test]
    fn reminder_fires_exactly_n_days_before() {
        let d = day(Some(ymd(2020, 6, 10)), true, 5);
        assert_eq!(
            check_occurrence(&d, ymd(2025, 6, 5)),
            Some(Occurrence::Upcoming { days_left: 5 })
        );
        assert_eq!(check_occurrence(&d, ymd(2025, 6, 4)), None);
        assert_eq!(check_occurrence(&d, ymd(2025, 6, 6)), None);
        assert_eq!(check_occurrence(&d, ymd(2025, 6, 10)), Some(Occurrence::Today));
    }

    #[test]
    fn reminder_rolls_into_next_year() {
        let d = day(Some(ymd(2024, 1, 2)), true, 3);
        assert_eq!(
            check_occurrence(&d, ymd(2024, 12, 30)),
            Some(Occurrence::Upcoming { days_left: 3 })
        );
    }

    #[test]
    fn one_off_reminder_uses_literal_date() {
        let d = day(Some(ymd(2025, 3, 1)), false, 2);
        assert_eq!(
            check_occurrence(&d, ymd(2025, 2, 27)),
            Some(Occurrence::Upcoming { days_left: 2 })
        );
        // same month/day a year later is a different day entirely
        assert_eq!(check_occurrence(&d, ymd(2026, 2, 27)), None);
    }

    #[test]
    fn missing_date_never_matches() {
        let d = day(None, true, 3);
        assert_eq!(check_occurrence(&d, ymd(2025, 4, 23)), None);
    }

    #[test]
    fn leap_day_falls_on_march_first_in_common_years() {
        let leap = ymd(2024, 2, 29);
        assert_eq!(next_occurrence(leap, ymd(2025, 2, 1)), Some(ymd(2025, 3, 1)));
        assert_eq!(next_occurrence(leap, ymd(2028, 2, 1)), Some(ymd(2028, 2, 29)));
        // already past in 2027, so the 2028 leap day is next
        assert_eq!(next_occurrence(leap, ymd(2027, 3, 2)), Some(ymd(2028, 2, 29)));

        let d = day(Some(leap), true, 1);
        assert_eq!(
            check_occurrence(&d, ymd(2025, 2, 28)),
            Some(Occurrence::Upcoming { days_left: 1 })
        );
        assert_eq!(
            check_occurrence(&d, ymd(2028, 2, 28)),
            Some(Occurrence::Upcoming { days_left: 1 })
        );
        // the day-of match still needs a real Feb 29
        assert_eq!(check_occurrence(&d, ymd(2025, 3, 1)), None);
    }
}
