//! Terminal host for the adventcal core.
//!
//! # Responsibility
//! - Wire content source, unlock policy and reveal store into a small
//!   interactive surface for previewing and driving the calendar.
//! - Fail fast on content schema errors before anything renders.

use adventcal_core::db::open_db;
use adventcal_core::{
    calendar_fragment, default_log_level, init_logging, load_content, max_open_day, Activation,
    CardService, CardState, CardViewModel, SqliteRevealRepository,
};
use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "adventcal", version, about = "Advent calendar door widget")]
struct Cli {
    /// CSV content source with day,text[,title,person,image_url] columns.
    #[arg(long, default_value = "advent_content.csv")]
    content: PathBuf,

    /// Reveal-state database path.
    #[arg(long, default_value = "adventcal_state.sqlite3")]
    db: PathBuf,

    /// Override the current date (YYYY-MM-DD) for preview.
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Directory for rolling log files; logging stays off when absent.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one status line per door.
    Show,
    /// Activate one door, toggling its reveal state.
    Toggle { day: u8 },
    /// Remove every reveal record.
    Reset,
    /// Dump the escaped calendar HTML fragment to stdout.
    Html,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = if log_dir.is_absolute() {
            log_dir.clone()
        } else {
            std::env::current_dir()?.join(log_dir)
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| anyhow!("log directory path is not valid UTF-8"))?;
        init_logging(default_log_level(), log_dir).map_err(|message| anyhow!(message))?;
    }

    let content = load_content(&cli.content).with_context(|| {
        format!(
            "failed to load door content from `{}`; fix the source before rendering",
            cli.content.display()
        )
    })?;

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open reveal-state database `{}`", cli.db.display()))?;
    let repo = SqliteRevealRepository::try_new(&conn)?;
    let service = CardService::new(repo);

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let open = max_open_day(today);

    match cli.command {
        Command::Show => {
            for card in service.build_cards(&content, open) {
                print_card(&card);
            }
        }
        Command::Toggle { day } => match service.activate_card(day, open) {
            Activation::Rejected { day } => {
                println!("door {day} is locked or out of range; nothing happened");
            }
            Activation::Toggled {
                day,
                revealed,
                persisted,
            } => {
                let state = if revealed { "open" } else { "closed" };
                println!("door {day} is now {state}");
                if !persisted {
                    eprintln!("warning: reveal state could not be persisted and will not survive a restart");
                }
            }
        },
        Command::Reset => {
            service.reset()?;
            println!("all doors closed");
        }
        Command::Html => {
            println!("{}", calendar_fragment(&service.build_cards(&content, open)));
        }
    }

    Ok(())
}

fn print_card(card: &CardViewModel) {
    match card.state() {
        CardState::Locked => println!("door {:>2} [locked]", card.day),
        CardState::Collapsed => println!("door {:>2} [closed] {}", card.day, card.title),
        CardState::Revealed => {
            println!("door {:>2} [open  ] {}", card.day, card.title);
            for line in card.text.lines() {
                println!("           {line}");
            }
            if !card.person.is_empty() {
                println!("           - {}", card.person);
            }
        }
    }
}
