//! Command-line front end for a local Al-Hikmah library.
//!
//! # Responsibility
//! - Exercise the core crate without a GUI shell: import, list, inspect
//!   reading history, flip favorites and delete.
//! - Keep output line-oriented and stable for scripting.

use alhikmah_core::{
    init_logging_for, Book, BookId, Library, LibraryConfig, LibraryRepository, LocalFileSource,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "alhikmah")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Library data directory (database, book copies, logs)
    #[arg(long, global = true, default_value = "alhikmah-library")]
    data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core linkage and version
    Ping,

    /// Copy a PDF or EPUB into the library and register it
    Import {
        /// File to import
        path: PathBuf,
    },

    /// List books, most recently read first
    List {
        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Show the reading snapshots of a book, newest first
    History {
        id: BookId,
    },

    /// Toggle the favorite flag of a book
    Favorite {
        id: BookId,
    },

    /// Remove a book record (history rows and the copied file are kept)
    Delete {
        id: BookId,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Import { .. } => "import",
            Self::List { .. } => "list",
            Self::History { .. } => "history",
            Self::Favorite { .. } => "favorite",
            Self::Delete { .. } => "delete",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Ping = cli.command {
        println!("alhikmah_core ping={}", alhikmah_core::ping());
        println!("alhikmah_core version={}", alhikmah_core::core_version());
        return Ok(());
    }

    let data_dir = std::path::absolute(&cli.data_dir)
        .with_context(|| format!("failed to resolve {}", cli.data_dir.display()))?;
    let mut config = LibraryConfig::new(data_dir);
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Err(err) = init_logging_for(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let library = Library::open(config).context("failed to open library")?;
    let command = cli.command.name();
    match run(&library, cli.command) {
        Ok(()) => {
            info!("event=cli_command module=cli status=ok command={command}");
            Ok(())
        }
        Err(err) => {
            error!("event=cli_command module=cli status=error command={command}");
            Err(err)
        }
    }
}

fn run(library: &Library, command: Commands) -> Result<()> {
    let repo = library.repository();

    match command {
        Commands::Ping => {}
        Commands::Import { path } => {
            let book = library
                .import_service()
                .import(&LocalFileSource::new(&path))
                .with_context(|| format!("failed to import {}", path.display()))?;
            println!("imported {}", describe(&book));
        }
        Commands::List { favorites } => {
            let books = if favorites {
                repo.favorite_books()?
            } else {
                repo.all_books()?
            };
            for book in &books {
                println!("{}", describe(book));
            }
        }
        Commands::History { id } => {
            for progress in repo.reading_history(id)? {
                println!(
                    "{}\tpage={}\t{:.1}%\tat={}",
                    progress.id,
                    progress.page_number + 1,
                    progress.percentage,
                    progress.timestamp
                );
            }
        }
        Commands::Favorite { id } => {
            let mut book = repo
                .find_book(id)?
                .ok_or_else(|| anyhow!("no book with id {id}"))?;
            book.is_favorite = !book.is_favorite;
            repo.update_book(&book)?;
            println!("{}", describe(&book));
        }
        Commands::Delete { id } => {
            let book = repo
                .find_book(id)?
                .ok_or_else(|| anyhow!("no book with id {id}"))?;
            repo.delete_book(&book)?;
            println!("deleted {}", book.id);
        }
    }

    Ok(())
}

fn describe(book: &Book) -> String {
    let star = if book.is_favorite { "*" } else { " " };
    format!(
        "{}{}\t{}\t{}\t{}\t{}%",
        star,
        book.id,
        book.file_type,
        book.title,
        book.author,
        book.progress_percent()
    )
}
