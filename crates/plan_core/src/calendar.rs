use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::filter::{self, FilterConfiguration};
use crate::record::TaskRecord;

/// A calendar month. Months are 1-based, like chrono.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// Parses `YYYY-MM`.
    pub fn parse(value: &str) -> Option<Self> {
        let (year, month) = value.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    pub fn last_day(self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(self.first)
    }

    pub fn days_in_month(self) -> u32 {
        self.last_day().day()
    }

    /// Inclusive bounds used when querying the store for a month.
    pub fn date_range(self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.last_day())
    }

    /// December rolls over into January of the following year.
    pub fn next(self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(self)
    }

    /// January rolls back into December of the previous year.
    pub fn prev(self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(self)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn title(self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "date", rename_all = "snake_case")]
pub enum GridCell {
    Blank,
    Day(NaiveDate),
}

impl GridCell {
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            GridCell::Blank => None,
            GridCell::Day(date) => Some(date),
        }
    }
}

/// Column of `date` in a week that begins on `week_start`.
pub fn weekday_column(date: NaiveDate, week_start: Weekday) -> u32 {
    (7 + date.weekday().num_days_from_sunday() - week_start.num_days_from_sunday()) % 7
}

/// Header order for a week beginning on `week_start`.
pub fn weekday_headers(week_start: Weekday) -> [Weekday; 7] {
    let mut days = [week_start; 7];
    for idx in 1..7 {
        days[idx] = days[idx - 1].succ();
    }
    days
}

/// Distance of a date from today in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelativeDay {
    DaysAgo(u32),
    Today,
    DaysAhead(u32),
}

impl RelativeDay {
    pub fn between(today: NaiveDate, date: NaiveDate) -> Self {
        let days = (date - today).num_days();
        let magnitude = u32::try_from(days.unsigned_abs()).unwrap_or(u32::MAX);
        match days {
            0 => RelativeDay::Today,
            d if d < 0 => RelativeDay::DaysAgo(magnitude),
            _ => RelativeDay::DaysAhead(magnitude),
        }
    }
}

impl fmt::Display for RelativeDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeDay::Today => f.write_str("today"),
            RelativeDay::DaysAgo(1) => f.write_str("yesterday"),
            RelativeDay::DaysAhead(1) => f.write_str("tomorrow"),
            RelativeDay::DaysAgo(n) => write!(f, "{n} days ago"),
            RelativeDay::DaysAhead(n) => write!(f, "in {n} days"),
        }
    }
}

/// Leading blanks so day 1 sits in its weekday column, then one cell per day.
/// The tail is not padded.
pub fn month_grid(cursor: MonthCursor, week_start: Weekday) -> Vec<GridCell> {
    let blanks = weekday_column(cursor.first_day(), week_start);
    let days = cursor.days_in_month();
    let mut cells = Vec::with_capacity((blanks + days) as usize);
    cells.extend((0..blanks).map(|_| GridCell::Blank));
    cells.extend(
        cursor
            .first_day()
            .iter_days()
            .take(days as usize)
            .map(GridCell::Day),
    );
    cells
}

/// One bucket per date cell of `grid`. Records without a due date, or due
/// outside the grid, land in no bucket.
pub fn bucket_by_date<'a, I>(records: I, grid: &[GridCell]) -> BTreeMap<NaiveDate, Vec<&'a TaskRecord>>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let mut buckets: BTreeMap<NaiveDate, Vec<&'a TaskRecord>> = grid
        .iter()
        .filter_map(|cell| cell.date())
        .map(|date| (date, Vec::new()))
        .collect();
    for record in records {
        let Some(due) = record.due_date else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(&due) {
            bucket.push(record);
        }
    }
    buckets
}

pub fn tasks_for_date<'a, I>(records: I, date: NaiveDate) -> Vec<&'a TaskRecord>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    records
        .into_iter()
        .filter(|record| record.due_date == Some(date))
        .collect()
}

pub fn undated<'a, I>(records: I) -> Vec<&'a TaskRecord>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    records
        .into_iter()
        .filter(|record| record.due_date.is_none())
        .collect()
}

/// Everything a month grid needs: filtered records bucketed by day, plus the
/// filtered records that carry no due date.
#[derive(Debug, Clone)]
pub struct MonthView<'a> {
    pub cursor: MonthCursor,
    pub week_start: Weekday,
    pub cells: Vec<GridCell>,
    pub buckets: BTreeMap<NaiveDate, Vec<&'a TaskRecord>>,
    pub undated: Vec<&'a TaskRecord>,
}

impl<'a> MonthView<'a> {
    pub fn build<I>(
        records: I,
        cursor: MonthCursor,
        config: &FilterConfiguration,
        week_start: Weekday,
    ) -> Self
    where
        I: IntoIterator<Item = &'a TaskRecord>,
    {
        let visible = filter::filter(records, config);
        let cells = month_grid(cursor, week_start);
        let buckets = bucket_by_date(visible.iter().copied(), &cells);
        Self {
            cursor,
            week_start,
            cells,
            buckets,
            undated: undated(visible.iter().copied()),
        }
    }

    pub fn tasks_on(&self, date: NaiveDate) -> &[&'a TaskRecord] {
        self.buckets.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Grid rows of seven cells; the last row may be short.
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(7)
    }

    pub fn scheduled_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
