pub mod dashboard;
pub mod entries;
pub mod output;

use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use dashboard::{
    process_dashboard_command, process_insights_command, process_words_command, DashboardCommand,
};
use entries::{
    process_add_command, process_delete_command, process_edit_command, process_list_command,
    process_show_command, AddCommand, EditCommand, ListCommand,
};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    analysis::words::DEFAULT_WORD_LIMIT,
    entry::{log_storage::LogStorageImpl, store::EntryStore},
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

pub const DEFAULT_OWNER: &str = "local";
pub const LOGS_DIR: &str = "logs";
pub const ENTRIES_DIR: &str = "entries";

#[derive(Parser, Debug)]
#[command(name = "meaningful", version, long_about = None)]
#[command(about = "Journal of daily activities with mood, energy and meaning analytics", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        env = "MEANINGFUL_TRACKER_DIR",
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "MEANINGFUL_TRACKER_OWNER",
        default_value = DEFAULT_OWNER,
        help = "Whose journal to open"
    )]
    owner: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Record a new activity")]
    Add {
        #[command(flatten)]
        command: AddCommand,
    },
    #[command(about = "Change fields of an existing activity")]
    Edit {
        #[command(flatten)]
        command: EditCommand,
    },
    #[command(about = "Remove an activity")]
    Delete { id: String },
    #[command(about = "Print a single activity")]
    Show { id: String },
    #[command(about = "Search, filter and sort activities")]
    List {
        #[command(flatten)]
        command: ListCommand,
    },
    #[command(about = "Summary, charts, frequent words and insights")]
    Dashboard {
        #[command(flatten)]
        command: DashboardCommand,
    },
    #[command(about = "Observations about your moods and activities")]
    Insights {},
    #[command(about = "Most frequent words of activity descriptions")]
    Words {
        #[arg(long, short, default_value_t = DEFAULT_WORD_LIMIT)]
        limit: NonZeroUsize,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = match args.dir {
        Some(dir) => ensure_dir(dir)?,
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(
        CLI_PREFIX,
        &ensure_dir(dir.join(LOGS_DIR))?,
        logging_level,
        args.log,
    )?;
    debug!("Using application directory {dir:?}");

    let storage = LogStorageImpl::new(dir.join(ENTRIES_DIR), Box::new(DefaultClock))?;
    let store = EntryStore::new(storage, args.owner);
    store.load().await?;

    match args.commands {
        Commands::Add { command } => process_add_command(&store, command).await,
        Commands::Edit { command } => process_edit_command(&store, command).await,
        Commands::Delete { id } => process_delete_command(&store, &id).await,
        Commands::Show { id } => process_show_command(&store, &id).await,
        Commands::List { command } => process_list_command(&store, command).await,
        Commands::Dashboard { command } => {
            process_dashboard_command(&store, &DefaultClock, command).await
        }
        Commands::Insights {} => process_insights_command(&store).await,
        Commands::Words { limit } => process_words_command(&store, limit).await,
    }
}
