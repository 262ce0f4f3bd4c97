use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::entry::entities::{LogEntry, Mood, WorkType};

use super::dominant;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

const KEEP_IT_UP_MEANING: f64 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    KeepItUp,
    SeekMeaning,
}

/// Dashboard numbers for a trailing window. Every field is computed from the same set of
/// entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub window_days: u32,
    pub entry_count: usize,
    pub avg_energy: f64,
    pub avg_meaning: f64,
    pub dominant_mood: Option<Mood>,
    pub dominant_work_type: Option<WorkType>,
    pub top_meaning_entry: Option<LogEntry>,
    pub recommendation: Recommendation,
}

/// Summarizes the entries dated within `window_days` before `reference_now`. Entries with
/// unparseable dates never fall inside a window. A window reaching past the representable
/// range covers every dated entry.
pub fn summarize(
    entries: &[LogEntry],
    window_days: u32,
    reference_now: DateTime<Utc>,
) -> SummaryStats {
    let cutoff = Duration::try_days(window_days.into())
        .and_then(|window| reference_now.checked_sub_signed(window));
    let retained = entries
        .iter()
        .filter(|v| {
            v.instant()
                .is_some_and(|date| cutoff.map_or(true, |cutoff| date >= cutoff))
        })
        .collect::<Vec<_>>();

    let avg_energy = mean(retained.iter().map(|v| v.energy_level));
    let avg_meaning = mean(retained.iter().map(|v| v.meaning_level));

    let mut top_meaning_entry: Option<&LogEntry> = None;
    for &v in &retained {
        if top_meaning_entry.map_or(true, |top| v.meaning_level > top.meaning_level) {
            top_meaning_entry = Some(v);
        }
    }

    SummaryStats {
        window_days,
        entry_count: retained.len(),
        avg_energy,
        avg_meaning,
        dominant_mood: dominant(retained.iter().map(|v| v.mood)).map(|(v, _)| v),
        dominant_work_type: dominant(retained.iter().map(|v| v.work_type)).map(|(v, _)| v),
        top_meaning_entry: top_meaning_entry.cloned(),
        recommendation: if avg_meaning > KEEP_IT_UP_MEANING {
            Recommendation::KeepItUp
        } else {
            Recommendation::SeekMeaning
        },
    }
}

fn mean(levels: impl ExactSizeIterator<Item = u8>) -> f64 {
    let len = levels.len();
    if len == 0 {
        return 0.;
    }
    levels.map(f64::from).sum::<f64>() / len as f64
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::entry::entities::{
        test_entries::{entry, with_type},
        Mood, WorkType,
    };

    use super::{summarize, Recommendation, DEFAULT_WINDOW_DAYS};

    #[test]
    fn empty_input_has_zero_averages() {
        let stats = summarize(&[], DEFAULT_WINDOW_DAYS, Utc::now());
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.avg_energy, 0.);
        assert_eq!(stats.avg_meaning, 0.);
        assert_eq!(stats.dominant_mood, None);
        assert_eq!(stats.dominant_work_type, None);
        assert_eq!(stats.top_meaning_entry, None);
        assert_eq!(stats.recommendation, Recommendation::SeekMeaning);
    }

    #[test]
    fn four_happy_one_sad() {
        let now = Utc.with_ymd_and_hms(2024, 4, 7, 12, 0, 0).unwrap();
        let entries = vec![
            entry("1", Mood::Happy, 4, 4, "2024-04-03"),
            entry("2", Mood::Happy, 4, 4, "2024-04-04"),
            entry("3", Mood::Sad, 1, 1, "2024-04-05"),
            entry("4", Mood::Happy, 4, 4, "2024-04-06"),
            entry("5", Mood::Happy, 2, 2, "2024-04-07"),
        ];
        let stats = summarize(&entries, 7, now);
        assert_eq!(stats.entry_count, 5);
        assert_eq!(stats.dominant_mood, Some(Mood::Happy));
        assert_eq!(stats.avg_energy, 3.);
        assert_eq!(stats.avg_meaning, 3.);
        assert_eq!(stats.recommendation, Recommendation::SeekMeaning);
    }

    #[test]
    fn window_excludes_old_and_undated_entries() {
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 0, 0, 0).unwrap();
        let entries = vec![
            entry("old", Mood::Sad, 1, 5, "2024-03-01"),
            entry("edge", Mood::Happy, 5, 4, "2024-04-03"),
            entry("undated", Mood::Sad, 1, 5, "last week"),
            entry("recent", Mood::Excited, 3, 4, "2024-04-09"),
        ];
        let stats = summarize(&entries, 7, now);
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.avg_energy, 4.);
        assert_eq!(stats.avg_meaning, 4.);
        assert_eq!(stats.recommendation, Recommendation::KeepItUp);
        assert_eq!(
            stats.top_meaning_entry.map(|v| v.id.as_str().to_owned()),
            Some("edge".to_owned())
        );
    }

    #[test]
    fn huge_window_covers_every_dated_entry() {
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 0, 0, 0).unwrap();
        assert_eq!(summarize(&[], u32::MAX, now).entry_count, 0);

        let entries = vec![
            entry("ancient", Mood::Sad, 1, 2, "1901-01-01"),
            entry("undated", Mood::Sad, 1, 5, "long ago"),
            entry("recent", Mood::Happy, 3, 4, "2024-04-09"),
        ];
        let stats = summarize(&entries, u32::MAX, now);
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.avg_meaning, 3.);
    }

    #[test]
    fn ties_go_to_first_encountered() {
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 0, 0, 0).unwrap();
        let entries = vec![
            with_type(entry("1", Mood::Tired, 2, 3, "2024-04-08"), WorkType::Learning),
            with_type(entry("2", Mood::Happy, 2, 3, "2024-04-09"), WorkType::Health),
            with_type(entry("3", Mood::Happy, 2, 1, "2024-04-09"), WorkType::Learning),
            with_type(entry("4", Mood::Tired, 2, 1, "2024-04-09"), WorkType::Health),
        ];
        let stats = summarize(&entries, 7, now);
        assert_eq!(stats.dominant_mood, Some(Mood::Tired));
        assert_eq!(stats.dominant_work_type, Some(WorkType::Learning));
        assert_eq!(
            stats.top_meaning_entry.map(|v| v.id.as_str().to_owned()),
            Some("1".to_owned())
        );
    }
}
