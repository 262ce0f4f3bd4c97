use std::{cmp::Ordering, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use clap::ValueEnum;

use crate::entry::entities::{LogEntry, Mood, WorkType};

/// Either every value passes, or just one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

impl<T: Display> Display for Selection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(v) => v.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    #[default]
    Date,
    Energy,
    Meaning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterQuery {
    pub search_text: String,
    pub mood: Selection<Mood>,
    pub work_type: Selection<WorkType>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

/// Returns the entries matching `query`, sorted by its key. The sort is stable in both
/// directions. Entries whose date can't be parsed go after all the others.
pub fn filter_and_sort(entries: &[LogEntry], query: &FilterQuery) -> Vec<LogEntry> {
    let needle = query.search_text.to_lowercase();

    let mut keyed = entries
        .iter()
        .filter(|v| matches_text(v, &needle))
        .filter(|v| query.mood.matches(&v.mood))
        .filter(|v| query.work_type.matches(&v.work_type))
        .map(|v| (v.instant(), v))
        .collect::<Vec<_>>();

    let order = query.sort_order;
    match query.sort_by {
        SortKey::Date => keyed.sort_by(|(a, _), (b, _)| compare_dates(*a, *b, order)),
        SortKey::Energy => {
            keyed.sort_by(|(_, a), (_, b)| order.apply(a.energy_level.cmp(&b.energy_level)))
        }
        SortKey::Meaning => {
            keyed.sort_by(|(_, a), (_, b)| order.apply(a.meaning_level.cmp(&b.meaning_level)))
        }
    }

    keyed.into_iter().map(|(_, v)| v.clone()).collect()
}

fn matches_text(entry: &LogEntry, needle: &str) -> bool {
    needle.is_empty()
        || entry.title.to_lowercase().contains(needle)
        || entry.description.to_lowercase().contains(needle)
}

fn compare_dates(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
    order: SortOrder,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => order.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
