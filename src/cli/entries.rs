use std::fmt::Display;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use now::DateTimeNow;

use crate::{
    analysis::{
        charts::group_by_day,
        filter::{filter_and_sort, FilterQuery, Selection, SortKey, SortOrder},
        matrix::to_matrix_points,
    },
    entry::{
        entities::{EntryId, LogDraft, LogPatch, Mood, WorkType},
        log_storage::LogStorage,
        store::EntryStore,
    },
    utils::time::{date_to_entry_date, parse_calendar_day},
};

use super::{output, Args};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

const DATE_HELP: &str = "Day of the activity. Examples are \"today\", \"yesterday\", \"last friday\", \"2024-04-05\", \"05/04/2024\"";

#[derive(Debug, Parser)]
pub struct AddCommand {
    #[arg(long, short, help = "Short name of the activity")]
    title: String,
    #[arg(long, short, help = "What happened and how it went")]
    description: String,
    #[arg(long, short, value_enum, default_value_t = Mood::Neutral)]
    mood: Mood,
    #[arg(long = "type", short = 'w', value_enum, default_value_t = WorkType::Work)]
    work_type: WorkType,
    #[arg(long, default_value_t = 3, help = "Energy spent, 1 to 5")]
    energy: u8,
    #[arg(long, default_value_t = 3, help = "How meaningful it felt, 1 to 5")]
    meaning: u8,
    #[arg(long, help = DATE_HELP)]
    date: Option<String>,
    #[arg(long, value_enum, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Debug, Parser)]
pub struct EditCommand {
    id: String,
    #[arg(long, short)]
    title: Option<String>,
    #[arg(long, short)]
    description: Option<String>,
    #[arg(long, short, value_enum)]
    mood: Option<Mood>,
    #[arg(long = "type", short = 'w', value_enum)]
    work_type: Option<WorkType>,
    #[arg(long)]
    energy: Option<u8>,
    #[arg(long)]
    meaning: Option<u8>,
    #[arg(long, help = DATE_HELP)]
    date: Option<String>,
    #[arg(long, value_enum, default_value_t = DateStyle::Uk)]
    date_style: DateStyle,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ListView {
    #[default]
    List,
    Timeline,
    Matrix,
}

#[derive(Debug, Parser)]
pub struct ListCommand {
    #[arg(long, short, default_value = "", help = "Only entries whose title or description contain this text")]
    search: String,
    #[arg(long, short, default_value_t = Selection::All, help = "Mood to keep, or \"all\"")]
    mood: Selection<Mood>,
    #[arg(long = "type", short = 'w', default_value_t = Selection::All, help = "Activity type to keep, or \"all\"")]
    work_type: Selection<WorkType>,
    #[arg(long, value_enum, default_value_t = SortKey::Date)]
    sort: SortKey,
    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    order: SortOrder,
    #[arg(long, value_enum, default_value_t = ListView::List)]
    view: ListView,
}

pub async fn process_add_command(
    store: &EntryStore<impl LogStorage>,
    AddCommand {
        title,
        description,
        mood,
        work_type,
        energy,
        meaning,
        date,
        date_style,
    }: AddCommand,
) -> Result<()> {
    let date = match date {
        Some(date) => parse_entry_date(&date, date_style, Local::now())?,
        None => date_to_entry_date(Local::now().date_naive()),
    };
    let created = store
        .create(LogDraft {
            title,
            description,
            mood,
            work_type,
            energy_level: energy,
            meaning_level: meaning,
            date,
        })
        .await?;
    println!("{}", output::entry_row(&created));
    Ok(())
}

pub async fn process_edit_command(
    store: &EntryStore<impl LogStorage>,
    EditCommand {
        id,
        title,
        description,
        mood,
        work_type,
        energy,
        meaning,
        date,
        date_style,
    }: EditCommand,
) -> Result<()> {
    let date = date
        .map(|v| parse_entry_date(&v, date_style, Local::now()))
        .transpose()?;
    let patch = LogPatch {
        title,
        description,
        mood,
        work_type,
        energy_level: energy,
        meaning_level: meaning,
        date,
    };
    if patch.is_empty() {
        return Err(Args::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "Nothing to change, pass at least one field",
            )
            .into());
    }

    let updated = store.update(&EntryId::from(id.as_str()), patch).await?;
    println!("{}", output::entry_row(&updated));
    Ok(())
}

pub async fn process_delete_command(store: &EntryStore<impl LogStorage>, id: &str) -> Result<()> {
    store.delete(&EntryId::from(id)).await?;
    println!("Deleted {id}");
    Ok(())
}

pub async fn process_show_command(store: &EntryStore<impl LogStorage>, id: &str) -> Result<()> {
    let entry = store
        .get(&EntryId::from(id))
        .await
        .ok_or_else(|| anyhow!("Entry {id} not found"))?;
    println!("{}", output::entry_details(&entry));
    Ok(())
}

pub async fn process_list_command(
    store: &EntryStore<impl LogStorage>,
    ListCommand {
        search,
        mood,
        work_type,
        sort,
        order,
        view,
    }: ListCommand,
) -> Result<()> {
    let snapshot = store.snapshot().await;
    let entries = filter_and_sort(
        &snapshot,
        &FilterQuery {
            search_text: search,
            mood,
            work_type,
            sort_by: sort,
            sort_order: order,
        },
    );

    if entries.is_empty() {
        println!("No entries found for {}", store.owner());
        return Ok(());
    }

    match view {
        ListView::List => {
            for entry in &entries {
                println!("{}", output::entry_row(entry));
            }
        }
        ListView::Timeline => print!("{}", output::timeline(&group_by_day(&entries))),
        ListView::Matrix => print!("{}", output::matrix(&to_matrix_points(&entries))),
    }
    Ok(())
}

/// Turns user input into a stored entry date. ISO dates are kept as written, everything else
/// goes through natural language parsing and is reduced to its day.
fn parse_entry_date(input: &str, date_style: DateStyle, now: DateTime<Local>) -> Result<String> {
    if parse_calendar_day(input).is_some() {
        return Ok(input.trim().to_string());
    }
    match parse_date_string(input, now, date_style.into()) {
        Ok(v) => Ok(date_to_entry_date(v.beginning_of_day().date_naive())),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {e}"),
            )
            .into()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::{parse_entry_date, DateStyle};

    #[test]
    fn keeps_iso_dates_as_written() {
        let now = Local.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
        assert_eq!(
            parse_entry_date(" 2024-04-05 ", DateStyle::Uk, now).unwrap(),
            "2024-04-05"
        );
        assert_eq!(
            parse_entry_date("2024-04-05T10:00:00Z", DateStyle::Uk, now).unwrap(),
            "2024-04-05T10:00:00Z"
        );
    }

    #[test]
    fn natural_language_reduces_to_a_day() {
        let now = Local.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
        assert_eq!(
            parse_entry_date("yesterday", DateStyle::Uk, now).unwrap(),
            "2024-04-09"
        );
    }

    #[test]
    fn dialect_decides_day_and_month_order() {
        let now = Local.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
        assert_eq!(
            parse_entry_date("05/04/2024", DateStyle::Uk, now).unwrap(),
            "2024-04-05"
        );
        assert_eq!(
            parse_entry_date("05/04/2024", DateStyle::Us, now).unwrap(),
            "2024-05-04"
        );
    }

    #[test]
    fn rejects_nonsense() {
        let now = Local.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
        assert!(parse_entry_date("when pigs fly", DateStyle::Uk, now).is_err());
    }
}
