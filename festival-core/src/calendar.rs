//! Calendar bucketing: upcoming/past partitions, month windows, day groups.
//!
//! Everything here is a pure function of its arguments. The caller owns the
//! viewed month, selected day and "show all" toggles and passes them in.
//!
//! Two notions of "day" are used:
//! - upcoming/past compares against the day of `now`, in `now`'s own zone, so
//!   the two partitions are always complementary;
//! - month windows, day groups and day lookups use [`Event::start_date`],
//!   the start date in the event's own display zone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::event::Event;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthRef {
    year: i32,
    month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| MonthRef { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        MonthRef {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.trim().split_once('-')?;
        MonthRef::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            MonthRef { year: self.year + 1, month: 1 }
        } else {
            MonthRef { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            MonthRef { year: self.year - 1, month: 12 }
        } else {
            MonthRef { year: self.year, month: self.month - 1 }
        }
    }

    /// Inclusive of the first and last day.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.first_day().format("%B %Y"))
    }
}

/// Events sorted by start instant; ties keep their input order.
pub fn sort_by_start<'a>(events: &[&'a Event]) -> Vec<&'a Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.start_utc());
    sorted
}

/// Result of [`partition_temporal`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemporalPartition<'a> {
    pub upcoming: Vec<&'a Event>,
    pub past: Vec<&'a Event>,
}

/// Split events into upcoming and past relative to `now`.
///
/// An event is upcoming when it starts after `now` or on the same calendar
/// day as `now`, even if its start time has already passed today. Everything
/// else (a start day strictly before today) is past.
pub fn partition_temporal<'a, T: TimeZone>(events: &[&'a Event], now: &DateTime<T>) -> TemporalPartition<'a> {
    let zone = now.timezone();
    let now_utc = now.with_timezone(&Utc);
    let today = now.date_naive();

    let (upcoming, past): (Vec<&'a Event>, Vec<&'a Event>) = events.iter().copied().partition(|event| {
        event.start_utc() > now_utc || event.start.with_timezone(&zone).date_naive() == today
    });

    TemporalPartition { upcoming, past }
}

/// Events whose start date falls within `month`.
pub fn partition_by_month<'a>(events: &[&'a Event], month: MonthRef) -> Vec<&'a Event> {
    events
        .iter()
        .copied()
        .filter(|e| month.contains(e.start_date()))
        .collect()
}

/// Events grouped by start date, input order kept within each day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayGroups<'a> {
    groups: BTreeMap<NaiveDate, Vec<&'a Event>>,
}

impl<'a> DayGroups<'a> {
    pub fn get(&self, day: NaiveDate) -> Option<&[&'a Event]> {
        self.groups.get(&day).map(Vec::as_slice)
    }

    /// Number of distinct days.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of events across all days.
    pub fn event_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Earliest day first (upcoming lists).
    pub fn ascending(&self) -> impl Iterator<Item = (NaiveDate, &[&'a Event])> {
        self.groups.iter().map(|(day, events)| (*day, events.as_slice()))
    }

    /// Latest day first (past lists).
    pub fn descending(&self) -> impl Iterator<Item = (NaiveDate, &[&'a Event])> {
        self.groups.iter().rev().map(|(day, events)| (*day, events.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<NaiveDate, Vec<&'a Event>> {
        self.groups
    }
}

/// Group events by [`Event::start_date`]. Only days with events get an entry.
pub fn group_by_day<'a>(events: &[&'a Event]) -> DayGroups<'a> {
    let mut groups: BTreeMap<NaiveDate, Vec<&'a Event>> = BTreeMap::new();
    for event in events {
        groups.entry(event.start_date()).or_default().push(*event);
    }
    DayGroups { groups }
}

pub fn has_events_on(events: &[&Event], day: NaiveDate) -> bool {
    events.iter().any(|e| e.start_date() == day)
}

/// The events starting on `day`, in input order.
pub fn events_on<'a>(events: &[&'a Event], day: NaiveDate) -> Vec<&'a Event> {
    events
        .iter()
        .copied()
        .filter(|e| e.start_date() == day)
        .collect()
}

/// First column of the month grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    fn offset(&self, date: NaiveDate) -> i64 {
        let days = match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        };
        i64::from(days)
    }
}

/// One cell of the mini calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub has_events: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Whole weeks covering `month`, from the week holding the 1st through the week
/// holding the last day. Cells outside the month are flagged `in_month: false`.
pub fn month_grid(
    month: MonthRef,
    week_start: WeekStart,
    events: &[&Event],
    today: NaiveDate,
    selected: Option<NaiveDate>,
) -> Vec<[DayCell; 7]> {
    let first = month.first_day() - Duration::days(week_start.offset(month.first_day()));
    let last = month.last_day();

    let mut weeks = Vec::new();
    let mut week_start_day = first;
    while week_start_day <= last {
        let week = std::array::from_fn(|i| {
            let date = week_start_day + Duration::days(i as i64);
            DayCell {
                date,
                in_month: month.contains(date),
                has_events: has_events_on(events, date),
                is_today: date == today,
                is_selected: selected == Some(date),
            }
        });
        weeks.push(week);
        week_start_day += Duration::days(7);
    }
    weeks
}

/// Caller-owned toggles for [`CalendarView::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewToggles {
    /// List every upcoming event, not only those in the viewed month
    pub show_all_upcoming: bool,
    /// List every past event, not only those in the viewed month
    pub show_all_past: bool,
}

/// Everything the calendar page lists for one viewed month.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView<'a> {
    pub month: MonthRef,
    pub total: usize,
    pub upcoming_total: usize,
    pub past_total: usize,
    /// Iterate with [`DayGroups::ascending`]
    pub upcoming: DayGroups<'a>,
    /// Iterate with [`DayGroups::descending`]
    pub past: DayGroups<'a>,
}

impl<'a> CalendarView<'a> {
    pub fn build<T: TimeZone>(
        events: &[&'a Event],
        now: &DateTime<T>,
        month: MonthRef,
        toggles: ViewToggles,
    ) -> Self {
        let sorted = sort_by_start(events);
        let TemporalPartition { upcoming, past } = partition_temporal(&sorted, now);

        let upcoming_shown = if toggles.show_all_upcoming {
            upcoming.clone()
        } else {
            partition_by_month(&upcoming, month)
        };
        let past_shown = if toggles.show_all_past {
            past.clone()
        } else {
            partition_by_month(&past, month)
        };

        CalendarView {
            month,
            total: sorted.len(),
            upcoming_total: upcoming.len(),
            past_total: past.len(),
            upcoming: group_by_day(&upcoming_shown),
            past: group_by_day(&past_shown),
        }
    }

    /// Upcoming events not listed because they fall outside the viewed month.
    pub fn hidden_upcoming(&self) -> usize {
        self.upcoming_total - self.upcoming.event_count()
    }

    pub fn hidden_past(&self) -> usize {
        self.past_total - self.past.event_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn manila() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        manila().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: &str, start: DateTime<FixedOffset>) -> Event {
        Event::new(id, id, start, start + Duration::hours(2))
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn month_bounds_and_navigation() {
        let feb = MonthRef::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), date(2024, 2, 1));
        assert_eq!(feb.last_day(), date(2024, 2, 29));
        assert_eq!(MonthRef::new(2024, 12).unwrap().next(), MonthRef::new(2025, 1).unwrap());
        assert_eq!(MonthRef::new(2025, 1).unwrap().prev(), MonthRef::new(2024, 12).unwrap());
        assert_eq!(MonthRef::parse("2025-07"), MonthRef::new(2025, 7));
        assert_eq!(MonthRef::parse("2025-13"), None);
        assert_eq!(MonthRef::new(2025, 7).unwrap().to_string(), "July 2025");
    }

    #[test]
    fn same_day_event_that_already_started_is_upcoming() {
        let now = at(2025, 7, 5, 15, 0);
        let events = [
            event("this-morning", at(2025, 7, 5, 8, 0)),
            event("yesterday", at(2025, 7, 4, 23, 30)),
            event("tonight", at(2025, 7, 5, 19, 0)),
            event("next-week", at(2025, 7, 12, 9, 0)),
        ];
        let refs: Vec<&Event> = events.iter().collect();

        let partition = partition_temporal(&refs, &now);
        assert_eq!(ids(&partition.upcoming), ["this-morning", "tonight", "next-week"]);
        assert_eq!(ids(&partition.past), ["yesterday"]);
    }

    #[test]
    fn every_event_lands_in_exactly_one_partition() {
        let now = at(2025, 7, 5, 0, 0);
        let events: Vec<Event> = (0..48)
            .map(|h| event(&format!("e{h}"), now - Duration::hours(24) + Duration::hours(h)))
            .collect();
        let refs: Vec<&Event> = events.iter().collect();

        let partition = partition_temporal(&refs, &now);
        assert_eq!(partition.upcoming.len() + partition.past.len(), events.len());
        for e in &events {
            let in_upcoming = partition.upcoming.iter().any(|u| u.id == e.id);
            let in_past = partition.past.iter().any(|p| p.id == e.id);
            assert!(in_upcoming ^ in_past, "{} in both or neither", e.id);
        }
    }

    #[test]
    fn month_window_includes_both_boundary_days() {
        let events = [
            event("jun-30-late", at(2025, 6, 30, 23, 59)),
            event("jul-1-midnight", at(2025, 7, 1, 0, 0)),
            event("jul-31-late", at(2025, 7, 31, 23, 59)),
            event("aug-1-midnight", at(2025, 8, 1, 0, 0)),
        ];
        let refs: Vec<&Event> = events.iter().collect();

        let july = partition_by_month(&refs, MonthRef::new(2025, 7).unwrap());
        assert_eq!(ids(&july), ["jul-1-midnight", "jul-31-late"]);
    }

    #[test]
    fn day_groups_keep_order_and_skip_empty_days() {
        let events = [
            event("b", at(2025, 7, 5, 14, 0)),
            event("a", at(2025, 7, 5, 9, 0)),
            event("c", at(2025, 7, 7, 9, 0)),
        ];
        let refs: Vec<&Event> = events.iter().collect();

        let groups = group_by_day(&refs);
        assert_eq!(groups.len(), 2);
        assert_eq!(ids(groups.get(date(2025, 7, 5)).unwrap()), ["b", "a"]);
        assert!(groups.get(date(2025, 7, 6)).is_none());

        let days: Vec<NaiveDate> = groups.descending().map(|(d, _)| d).collect();
        assert_eq!(days, [date(2025, 7, 7), date(2025, 7, 5)]);
        assert_eq!(groups.event_count(), 3);
    }

    #[test]
    fn day_lookup_helpers() {
        let events = [event("a", at(2025, 7, 5, 9, 0)), event("b", at(2025, 7, 6, 9, 0))];
        let refs: Vec<&Event> = events.iter().collect();

        assert!(has_events_on(&refs, date(2025, 7, 5)));
        assert!(!has_events_on(&refs, date(2025, 7, 8)));
        assert_eq!(ids(&events_on(&refs, date(2025, 7, 6))), ["b"]);
    }

    #[test]
    fn sort_is_stable_by_start() {
        let events = [
            event("late", at(2025, 7, 6, 9, 0)),
            event("tie-1", at(2025, 7, 5, 9, 0)),
            event("tie-2", at(2025, 7, 5, 9, 0)),
        ];
        let refs: Vec<&Event> = events.iter().collect();
        assert_eq!(ids(&sort_by_start(&refs)), ["tie-1", "tie-2", "late"]);
    }

    #[test]
    fn grid_covers_whole_weeks() {
        // July 2025 starts on a Tuesday and ends on a Thursday
        let july = MonthRef::new(2025, 7).unwrap();
        let events = [event("a", at(2025, 7, 5, 9, 0))];
        let refs: Vec<&Event> = events.iter().collect();

        let grid = month_grid(july, WeekStart::Sunday, &refs, date(2025, 7, 10), Some(date(2025, 7, 5)));
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][0].date, date(2025, 6, 29));
        assert!(!grid[0][0].in_month);
        assert_eq!(grid[4][6].date, date(2025, 8, 2));

        let cell = grid[0][6];
        assert_eq!(cell.date, date(2025, 7, 5));
        assert!(cell.has_events && cell.is_selected && !cell.is_today);
        assert!(grid[1][4].is_today);

        let monday_grid = month_grid(july, WeekStart::Monday, &refs, date(2025, 7, 10), None);
        assert_eq!(monday_grid[0][0].date, date(2025, 6, 30));
        assert_eq!(monday_grid.last().unwrap()[6].date, date(2025, 8, 3));
    }

    #[test]
    fn calendar_view_restricts_to_month_unless_toggled() {
        let now = at(2025, 7, 15, 12, 0);
        let events = [
            event("aug", at(2025, 8, 2, 9, 0)),
            event("jul-past", at(2025, 7, 3, 9, 0)),
            event("jul-upcoming", at(2025, 7, 20, 9, 0)),
            event("jun", at(2025, 6, 10, 9, 0)),
            event("today-early", at(2025, 7, 15, 7, 0)),
        ];
        let refs: Vec<&Event> = events.iter().collect();
        let july = MonthRef::new(2025, 7).unwrap();

        let view = CalendarView::build(&refs, &now, july, ViewToggles::default());
        assert_eq!(view.total, 5);
        assert_eq!(view.upcoming_total, 3);
        assert_eq!(view.past_total, 2);
        let upcoming_days: Vec<NaiveDate> = view.upcoming.ascending().map(|(d, _)| d).collect();
        assert_eq!(upcoming_days, [date(2025, 7, 15), date(2025, 7, 20)]);
        assert_eq!(view.hidden_upcoming(), 1);
        assert_eq!(view.hidden_past(), 1);

        let all = CalendarView::build(
            &refs,
            &now,
            july,
            ViewToggles {
                show_all_upcoming: true,
                show_all_past: true,
            },
        );
        let past_days: Vec<NaiveDate> = all.past.descending().map(|(d, _)| d).collect();
        assert_eq!(past_days, [date(2025, 7, 3), date(2025, 6, 10)]);
        assert_eq!(all.hidden_upcoming(), 0);
    }
}
