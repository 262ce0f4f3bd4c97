//! Text rendering for the terminal. Everything here returns strings so commands only decide
//! what to print.

use crate::{
    analysis::{
        charts::{DayGroup, MoodPoint, Share},
        insights::Insight,
        matrix::{MatrixPoint, Quadrant},
        summary::{Recommendation, SummaryStats},
        words::DerivedWord,
    },
    entry::entities::{LogEntry, Mood, WorkType},
};

const UNDATED_HEADER: &str = "Undated";

pub fn insight_text(insight: &Insight) -> String {
    match insight {
        Insight::NotEnoughData => "Not enough data to generate insights. Add more logs!".into(),
        Insight::DominantMood { mood } => {
            format!("You've been feeling {} a lot lately.", mood_label(*mood))
        }
        Insight::DominantWorkType { work_type } => format!(
            "Most of your activities are related to {}.",
            work_type_label(*work_type)
        ),
        Insight::PositiveCorrelation => {
            "You find more meaning in high-energy activities.".into()
        }
        Insight::NegativeCorrelation => "You find more meaning in low-energy activities.".into(),
        Insight::WeekendHappier => "You tend to be happier on weekends.".into(),
        Insight::GeneralInsight => {
            "Try to balance high-energy and high-meaning activities for better well-being.".into()
        }
    }
}

pub fn mood_label(mood: Mood) -> &'static str {
    match mood {
        Mood::Excited => "Excited",
        Mood::Happy => "Happy",
        Mood::Neutral => "Neutral",
        Mood::Tired => "Tired",
        Mood::Frustrated => "Frustrated",
        Mood::Sad => "Sad",
    }
}

pub fn work_type_label(work_type: WorkType) -> &'static str {
    match work_type {
        WorkType::Work => "Work",
        WorkType::Learning => "Learning",
        WorkType::Personal => "Personal",
        WorkType::Health => "Health",
        WorkType::Social => "Social",
        WorkType::Leisure => "Leisure",
    }
}

pub fn entry_row(entry: &LogEntry) -> String {
    format!(
        "{}\t{}\t{}\tE{} M{}\t{}\t{}",
        entry.date,
        entry.mood,
        entry.work_type,
        entry.energy_level,
        entry.meaning_level,
        entry.title,
        entry.id
    )
}

pub fn entry_details(entry: &LogEntry) -> String {
    format!(
        "{}\n\n{}\n\nid:       {}\ndate:     {}\nmood:     {}\ntype:     {}\nenergy:   {}/5\nmeaning:  {}/5\ncreated:  {}\nupdated:  {}",
        entry.title,
        entry.description,
        entry.id,
        entry.date,
        mood_label(entry.mood),
        work_type_label(entry.work_type),
        entry.energy_level,
        entry.meaning_level,
        entry.created_at.to_rfc3339(),
        entry.updated_at.to_rfc3339(),
    )
}

pub fn timeline(groups: &[DayGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let header = match group.day {
            Some(day) => day.format("%A, %d %B %Y").to_string(),
            None => UNDATED_HEADER.to_string(),
        };
        out.push_str(&header);
        out.push('\n');
        for entry in &group.entries {
            out.push_str(&format!("  {}\n", entry_row(entry)));
        }
        out.push('\n');
    }
    out
}

/// Points listed under their quadrant. Empty quadrants are skipped.
pub fn matrix(points: &[MatrixPoint]) -> String {
    let mut out = String::new();
    for quadrant in Quadrant::ALL {
        let inside = points
            .iter()
            .filter(|v| v.quadrant() == quadrant)
            .collect::<Vec<_>>();
        if inside.is_empty() {
            continue;
        }
        out.push_str(quadrant.label());
        out.push('\n');
        for v in inside {
            out.push_str(&format!(
                "  E{} M{}\t{}\t{}\t{}\n",
                v.x, v.y, v.mood, v.title, v.id
            ));
        }
        out.push('\n');
    }
    out
}

pub fn summary(stats: &SummaryStats) -> String {
    let mut out = format!(
        "Last {} days: {} entries\nAverage energy:\t{:.1}\nAverage meaning:\t{:.1}\nMost common mood:\t{}\nMost common activity:\t{}\n",
        stats.window_days,
        stats.entry_count,
        stats.avg_energy,
        stats.avg_meaning,
        stats.dominant_mood.map(mood_label).unwrap_or("-"),
        stats
            .dominant_work_type
            .map(work_type_label)
            .unwrap_or("-"),
    );
    if let Some(top) = &stats.top_meaning_entry {
        out.push_str(&format!(
            "Most meaningful:\t{} ({}/5)\n",
            top.title, top.meaning_level
        ));
    }
    out.push_str(recommendation_text(stats.recommendation));
    out.push('\n');
    out
}

pub fn recommendation_text(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::KeepItUp => "You're finding meaning in your activities. Keep it up!",
        Recommendation::SeekMeaning => "Try to focus more on activities that bring you meaning and joy.",
    }
}

pub fn shares<T: Copy>(shares: &[Share<T>], label: impl Fn(T) -> &'static str) -> String {
    shares
        .iter()
        .map(|v| format!("{}\t{}\t{}\n", v.percentage, v.count, label(v.value)))
        .collect()
}

pub fn mood_trend(points: &[MoodPoint]) -> String {
    points
        .iter()
        .map(|v| {
            format!(
                "{}\t{:<5}\t{}\n",
                v.date,
                "#".repeat(usize::from(v.score) + 1),
                mood_label(v.mood)
            )
        })
        .collect()
}

pub fn words(words: &[DerivedWord]) -> String {
    words
        .iter()
        .map(|v| format!("{}\t{}\n", v.value, v.text))
        .collect()
}
