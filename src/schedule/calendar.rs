//! Month grid generation and per-day event grouping.

use serde::Serialize;
use time::{util::days_in_year_month, Date, Duration, Weekday};

use super::repo_types::ScheduledEvent;
use crate::timefmt::iso_date;

pub const WEEK_START: Weekday = Weekday::Sunday;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    None,
    Completed,
    Pending,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub in_month: bool,
    pub status: DayStatus,
    pub events: Vec<ScheduledEvent>,
}

/// First and last calendar day of the month containing `reference`.
pub fn month_bounds(reference: Date) -> (Date, Date) {
    let first = reference - Duration::days(i64::from(reference.day()) - 1);
    let len = days_in_year_month(first.year(), first.month());
    let last = first + Duration::days(i64::from(len) - 1);
    (first, last)
}

fn days_back_to(day: Weekday, week_start: Weekday) -> i64 {
    let d = i64::from(day.number_days_from_monday());
    let s = i64::from(week_start.number_days_from_monday());
    (d - s).rem_euclid(7)
}

/// First and last grid day for the month containing `reference`, clamped
/// to the representable date range.
pub fn grid_span(reference: Date, week_start: Weekday) -> (Date, Date) {
    let (first, last) = month_bounds(reference);
    let start = first
        .checked_sub(Duration::days(days_back_to(first.weekday(), week_start)))
        .unwrap_or(Date::MIN);
    let end = last
        .checked_add(Duration::days(6 - days_back_to(last.weekday(), week_start)))
        .unwrap_or(Date::MAX);
    (start, end)
}

/// Dates covering whole weeks from the week holding the month's first day
/// through the week holding its last day. Only the very first and last
/// representable months can yield a partial week.
pub fn month_grid_from(reference: Date, week_start: Weekday) -> Vec<Date> {
    let (start, end) = grid_span(reference, week_start);

    let mut days = Vec::with_capacity(42);
    let mut day = start;
    while day <= end {
        days.push(day);
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

pub fn month_grid(reference: Date) -> Vec<Date> {
    month_grid_from(reference, WEEK_START)
}

pub fn events_for_day(events: &[ScheduledEvent], day: Date) -> Vec<&ScheduledEvent> {
    events.iter().filter(|e| e.date == day).collect()
}

/// Any pending event wins over completed ones.
pub fn day_status(day_events: &[&ScheduledEvent]) -> DayStatus {
    if day_events.is_empty() {
        DayStatus::None
    } else if day_events.iter().any(|e| !e.completed) {
        DayStatus::Pending
    } else {
        DayStatus::Completed
    }
}

pub fn build_calendar(reference: Date, events: &[ScheduledEvent]) -> Vec<CalendarDay> {
    let (first, _) = month_bounds(reference);
    month_grid(reference)
        .into_iter()
        .map(|date| {
            let day_events = events_for_day(events, date);
            CalendarDay {
                date,
                in_month: date.month() == first.month() && date.year() == first.year(),
                status: day_status(&day_events),
                events: day_events.into_iter().cloned().collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::repo_types::tests::{exercise, medication};
    use time::macros::date;

    #[test]
    fn grid_is_whole_weeks_for_every_month_of_a_year() {
        for year in [2023, 2024, 2025] {
            for month in 1..=12u8 {
                let month = time::Month::try_from(month).unwrap();
                let reference = Date::from_calendar_date(year, month, 15).unwrap();
                let grid = month_grid(reference);
                assert_eq!(grid.len() % 7, 0, "{year}-{month}");
                assert_eq!(grid[0].weekday(), WEEK_START);
                assert_eq!(grid.last().unwrap().weekday(), Weekday::Saturday);
                let first = Date::from_calendar_date(year, month, 1).unwrap();
                assert!(grid.contains(&first));
                assert!(grid.windows(2).all(|w| w[1] == w[0].next_day().unwrap()));
            }
        }
    }

    #[test]
    fn june_2024_grid() {
        // June 1st 2024 is a Saturday, June 30th a Sunday.
        let grid = month_grid(date!(2024 - 06 - 18));
        assert_eq!(grid.first(), Some(&date!(2024 - 05 - 26)));
        assert_eq!(grid.last(), Some(&date!(2024 - 07 - 06)));
        assert_eq!(grid.len(), 42);
    }

    #[test]
    fn february_starting_on_sunday_fits_four_weeks() {
        let grid = month_grid(date!(2015 - 02 - 10));
        assert_eq!(grid.len(), 28);
        assert_eq!(grid[0], date!(2015 - 02 - 01));
    }

    #[test]
    fn grid_is_pure() {
        let r = date!(2024 - 11 - 05);
        assert_eq!(month_grid(r), month_grid(r));
    }

    #[test]
    fn edge_months_clamp_to_representable_range() {
        let last_month = month_grid(Date::MAX);
        assert_eq!(last_month.last(), Some(&Date::MAX));
        assert!(last_month.contains(&date!(9999 - 12 - 01)));
        assert_eq!(last_month[0].weekday(), WEEK_START);

        let first_month = month_grid(Date::MIN);
        assert_eq!(first_month.first(), Some(&Date::MIN));
        assert!(first_month.contains(&Date::MIN.replace_day(31).unwrap()));
        assert_eq!(first_month.last().unwrap().weekday(), Weekday::Saturday);

        assert_eq!(grid_span(date!(9999 - 12 - 15), WEEK_START).1, Date::MAX);
    }

    #[test]
    fn monday_week_start() {
        let grid = month_grid_from(date!(2024 - 06 - 01), Weekday::Monday);
        assert_eq!(grid[0], date!(2024 - 05 - 27));
        assert_eq!(grid.last().unwrap().weekday(), Weekday::Sunday);
        assert_eq!(grid.len() % 7, 0);
    }

    #[test]
    fn pending_beats_completed() {
        let day = date!(2024 - 06 - 12);
        let events = vec![
            medication(day, true, None),
            medication(day, true, None),
            exercise(day, true, Some(30), None),
            exercise(day, false, Some(30), None),
            medication(date!(2024 - 06 - 13), false, None),
        ];
        let today = events_for_day(&events, day);
        assert_eq!(today.len(), 4);
        assert_eq!(day_status(&today), DayStatus::Pending);
    }

    #[test]
    fn status_none_and_completed() {
        let day = date!(2024 - 06 - 12);
        let events = vec![medication(day, true, None)];
        assert_eq!(day_status(&events_for_day(&events, date!(2024 - 06 - 11))), DayStatus::None);
        assert_eq!(day_status(&events_for_day(&events, day)), DayStatus::Completed);
    }

    #[test]
    fn calendar_marks_days_outside_month() {
        let events = vec![medication(date!(2024 - 06 - 12), false, None)];
        let cal = build_calendar(date!(2024 - 06 - 01), &events);
        assert!(!cal[0].in_month);
        let cell = cal.iter().find(|c| c.date == date!(2024 - 06 - 12)).unwrap();
        assert!(cell.in_month);
        assert_eq!(cell.status, DayStatus::Pending);
        assert_eq!(cell.events.len(), 1);
    }
}
