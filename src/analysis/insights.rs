use serde::Serialize;
use tracing::debug;

use crate::{
    entry::entities::{LogEntry, Mood, WorkType, MAX_LEVEL, MIN_LEVEL},
    utils::time::{is_weekend, parse_calendar_day},
};

use super::dominant;

pub const MIN_ENTRIES: usize = 3;
pub const MIN_INSIGHTS: usize = 3;

const DOMINANT_MOOD_SHARE: f64 = 0.5;
const DOMINANT_WORK_TYPE_SHARE: f64 = 0.4;
const CORRELATION_THRESHOLD: f64 = 1.;
const WEEKEND_MARGIN: f64 = 0.3;
const MIN_WEEKEND_ENTRIES: usize = 2;

/// Observation derived from a set of entries. Carries no text; the presentation layer decides
/// how to phrase it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    NotEnoughData,
    DominantMood { mood: Mood },
    DominantWorkType { work_type: WorkType },
    PositiveCorrelation,
    NegativeCorrelation,
    WeekendHappier,
    GeneralInsight,
}

/// Runs every heuristic over `entries`. The rules are independent, so several can fire at
/// once. With at least [MIN_ENTRIES] entries the result is padded with
/// [Insight::GeneralInsight] up to [MIN_INSIGHTS].
pub fn generate_insights(entries: &[LogEntry]) -> Vec<Insight> {
    if entries.len() < MIN_ENTRIES {
        return vec![Insight::NotEnoughData];
    }

    let total = entries.len() as f64;
    let mut insights = Vec::new();

    if let Some((mood, count)) = dominant(entries.iter().map(|v| v.mood)) {
        if count as f64 / total > DOMINANT_MOOD_SHARE {
            insights.push(Insight::DominantMood { mood });
        }
    }

    if let Some((work_type, count)) = dominant(entries.iter().map(|v| v.work_type)) {
        if count as f64 / total > DOMINANT_WORK_TYPE_SHARE {
            insights.push(Insight::DominantWorkType { work_type });
        }
    }

    let correlation = energy_meaning_correlation(entries);
    debug!("Energy/meaning correlation {correlation:.2}");
    if correlation > CORRELATION_THRESHOLD {
        insights.push(Insight::PositiveCorrelation);
    } else if correlation < -CORRELATION_THRESHOLD {
        insights.push(Insight::NegativeCorrelation);
    }

    if weekend_happier(entries) {
        insights.push(Insight::WeekendHappier);
    }

    while insights.len() < MIN_INSIGHTS {
        insights.push(Insight::GeneralInsight);
    }
    insights
}

/// Mean product of both levels' distances from the middle of the scale. Not a real
/// correlation coefficient, only its sign and rough size matter.
fn energy_meaning_correlation(entries: &[LogEntry]) -> f64 {
    let middle = f64::from(MIN_LEVEL + MAX_LEVEL) / 2.;
    let sum = entries
        .iter()
        .map(|v| (f64::from(v.energy_level) - middle) * (f64::from(v.meaning_level) - middle))
        .sum::<f64>();
    sum / entries.len() as f64
}

fn weekend_happier(entries: &[LogEntry]) -> bool {
    let (mut weekend, mut weekend_positive) = (0usize, 0usize);
    let (mut weekday, mut weekday_positive) = (0usize, 0usize);

    for v in entries {
        let Some(day) = parse_calendar_day(&v.date) else {
            continue;
        };
        if is_weekend(day) {
            weekend += 1;
            weekend_positive += usize::from(v.mood.is_positive());
        } else {
            weekday += 1;
            weekday_positive += usize::from(v.mood.is_positive());
        }
    }

    let weekend_ratio = weekend_positive as f64 / weekend.max(1) as f64;
    let weekday_ratio = weekday_positive as f64 / weekday.max(1) as f64;
    weekend_ratio > weekday_ratio + WEEKEND_MARGIN && weekend >= MIN_WEEKEND_ENTRIES
}
