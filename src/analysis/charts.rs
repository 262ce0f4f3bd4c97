use std::{cmp::Ordering, collections::BTreeMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    entry::entities::{EntryId, LogEntry, Mood, WorkType},
    utils::{
        percentage::{count_percentage, Percentage},
        time::parse_calendar_day,
    },
};

use super::tally;

/// How many entries carry `value`, and their share of the whole input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Share<T> {
    pub value: T,
    pub count: usize,
    pub percentage: Percentage,
}

pub fn mood_distribution(entries: &[LogEntry]) -> Vec<Share<Mood>> {
    distribution(&Mood::ALL, entries.iter().map(|v| v.mood))
}

pub fn work_type_distribution(entries: &[LogEntry]) -> Vec<Share<WorkType>> {
    distribution(&WorkType::ALL, entries.iter().map(|v| v.work_type))
}

/// Shares listed in `canonical` order. Values nobody picked are left out.
fn distribution<T: Copy + PartialEq>(
    canonical: &[T],
    values: impl ExactSizeIterator<Item = T>,
) -> Vec<Share<T>> {
    let total = values.len();
    let counts = tally(values);
    canonical
        .iter()
        .filter_map(|value| {
            let count = counts.iter().find(|(v, _)| v == value).map(|(_, c)| *c)?;
            Some(Share {
                value: *value,
                count,
                percentage: count_percentage(count, total),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodPoint {
    pub id: EntryId,
    pub date: String,
    pub mood: Mood,
    pub score: u8,
}

/// One point per entry, oldest first. Undated entries trail in input order.
pub fn mood_trend(entries: &[LogEntry]) -> Vec<MoodPoint> {
    let mut keyed = entries
        .iter()
        .map(|v| (v.instant(), v))
        .collect::<Vec<_>>();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed
        .into_iter()
        .map(|(_, v)| MoodPoint {
            id: v.id.clone(),
            date: v.date.clone(),
            mood: v.mood,
            score: v.mood.score(),
        })
        .collect()
}

/// Entries of one calendar day. `day` is `None` for the group of entries whose date can't be
/// read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub day: Option<NaiveDate>,
    pub entries: Vec<LogEntry>,
}

/// Groups by the day as written, newest day first.
pub fn group_by_day(entries: &[LogEntry]) -> Vec<DayGroup> {
    let mut days = BTreeMap::<NaiveDate, Vec<LogEntry>>::new();
    let mut undated = Vec::new();

    for v in entries {
        match parse_calendar_day(&v.date) {
            Some(day) => days.entry(day).or_default().push(v.clone()),
            None => undated.push(v.clone()),
        }
    }

    let mut groups = days
        .into_iter()
        .rev()
        .map(|(day, entries)| DayGroup {
            day: Some(day),
            entries,
        })
        .collect::<Vec<_>>();
    if !undated.is_empty() {
        groups.push(DayGroup {
            day: None,
            entries: undated,
        });
    }
    groups
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::entry::entities::{
        test_entries::{entry, with_type},
        Mood, WorkType,
    };

    use super::{group_by_day, mood_distribution, mood_trend, work_type_distribution};

    #[test]
    fn distribution_uses_canonical_order_and_skips_zeroes() {
        let entries = vec![
            entry("1", Mood::Sad, 3, 3, "2024-04-01"),
            entry("2", Mood::Happy, 3, 3, "2024-04-02"),
            entry("3", Mood::Sad, 3, 3, "2024-04-03"),
            entry("4", Mood::Excited, 3, 3, "2024-04-04"),
        ];
        let shares = mood_distribution(&entries);
        let summary = shares
            .iter()
            .map(|v| (v.value, v.count, *v.percentage))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                (Mood::Excited, 1, 25.),
                (Mood::Happy, 1, 25.),
                (Mood::Sad, 2, 50.)
            ]
        );
    }

    #[test]
    fn distribution_of_nothing_is_empty() {
        assert!(mood_distribution(&[]).is_empty());
        assert!(work_type_distribution(&[]).is_empty());
    }

    #[test]
    fn work_type_shares() {
        let entries = vec![
            with_type(entry("1", Mood::Happy, 3, 3, "2024-04-01"), WorkType::Leisure),
            with_type(entry("2", Mood::Happy, 3, 3, "2024-04-02"), WorkType::Learning),
        ];
        let shares = work_type_distribution(&entries);
        assert_eq!(shares[0].value, WorkType::Learning);
        assert_eq!(shares[1].value, WorkType::Leisure);
        assert_eq!(shares[1].percentage.to_string(), "50%");
    }

    #[test]
    fn trend_is_ascending_with_undated_last() {
        let entries = vec![
            entry("late", Mood::Sad, 3, 3, "2024-04-09"),
            entry("broken", Mood::Excited, 3, 3, "?"),
            entry("early", Mood::Frustrated, 3, 3, "2024-04-01"),
        ];
        let trend = mood_trend(&entries);
        let points = trend
            .iter()
            .map(|v| (v.id.as_str(), v.score))
            .collect::<Vec<_>>();
        assert_eq!(points, vec![("early", 1), ("late", 0), ("broken", 5)]);
    }

    #[test]
    fn groups_newest_day_first() {
        let entries = vec![
            entry("1", Mood::Happy, 3, 3, "2024-04-01"),
            entry("2", Mood::Happy, 3, 3, "someday"),
            entry("3", Mood::Happy, 3, 3, "2024-04-03T08:00:00Z"),
            entry("4", Mood::Happy, 3, 3, "2024-04-01T21:00:00+02:00"),
            entry("5", Mood::Happy, 3, 3, "2024-04-03"),
        ];
        let groups = group_by_day(&entries);
        let layout = groups
            .iter()
            .map(|g| {
                (
                    g.day,
                    g.entries.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            layout,
            vec![
                (NaiveDate::from_ymd_opt(2024, 4, 3), vec!["3", "5"]),
                (NaiveDate::from_ymd_opt(2024, 4, 1), vec!["1", "4"]),
                (None, vec!["2"]),
            ]
        );
    }
}
