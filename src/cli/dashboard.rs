use std::num::NonZeroUsize;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::{
    analysis::{
        charts::{mood_distribution, mood_trend, work_type_distribution, Share},
        insights::generate_insights,
        summary::{summarize, DEFAULT_WINDOW_DAYS},
        words::{top_words, DEFAULT_WORD_LIMIT},
    },
    entry::{entities::LogEntry, log_storage::LogStorage, store::EntryStore},
    utils::{clock::Clock, percentage::Percentage},
};

use super::output;

#[derive(Debug, Parser)]
pub struct DashboardCommand {
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS, help = "Size of the summary window in days")]
    days: u32,
    #[arg(long, default_value_t = DEFAULT_WORD_LIMIT, help = "How many frequent words to show")]
    words: NonZeroUsize,
    #[arg(short = 'p', long = "percentage", default_value_t = Percentage::zero(), help = "Hide moods and activity types with a smaller share")]
    min_percentage: Percentage,
}

pub async fn process_dashboard_command(
    store: &EntryStore<impl LogStorage>,
    clock: &dyn Clock,
    DashboardCommand {
        days,
        words,
        min_percentage,
    }: DashboardCommand,
) -> Result<()> {
    let entries = store.snapshot().await;
    debug!("Building dashboard over {} entries", entries.len());

    println!("{}", output::summary(&summarize(&entries, days, clock.time())));

    println!("Moods");
    let moods = above(mood_distribution(&entries), min_percentage);
    println!("{}", output::shares(&moods, output::mood_label));

    println!("Activity types");
    let work_types = above(work_type_distribution(&entries), min_percentage);
    println!("{}", output::shares(&work_types, output::work_type_label));

    println!("Mood trend");
    println!("{}", output::mood_trend(&mood_trend(&entries)));

    println!("Frequent words");
    println!("{}", output::words(&top_words(&descriptions(&entries), words)));

    println!("Insights");
    print_insights(&entries);
    Ok(())
}

pub async fn process_insights_command(store: &EntryStore<impl LogStorage>) -> Result<()> {
    print_insights(&store.snapshot().await);
    Ok(())
}

pub async fn process_words_command(
    store: &EntryStore<impl LogStorage>,
    limit: NonZeroUsize,
) -> Result<()> {
    let entries = store.snapshot().await;
    print!("{}", output::words(&top_words(&descriptions(&entries), limit)));
    Ok(())
}

fn print_insights(entries: &[LogEntry]) {
    for insight in generate_insights(entries) {
        println!("- {}", output::insight_text(&insight));
    }
}

fn descriptions(entries: &[LogEntry]) -> Vec<&str> {
    entries.iter().map(|v| v.description.as_str()).collect()
}

fn above<T>(shares: Vec<Share<T>>, min_percentage: Percentage) -> Vec<Share<T>> {
    shares
        .into_iter()
        .filter(|v| v.percentage >= min_percentage)
        .collect()
}
