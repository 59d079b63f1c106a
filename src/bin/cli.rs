//! ShelfDB CLI
//!
//! Command-line interface over a local catalog file.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use shelfdb::config::SyncStrategy;
use shelfdb::{exchange, BookView, Catalog, Config, SearchField};
use tracing_subscriber::{fmt, EnvFilter};

/// ShelfDB CLI
#[derive(Parser, Debug)]
#[command(name = "shelfdb-cli")]
#[command(about = "CLI for the ShelfDB book catalog")]
#[command(version)]
struct Args {
    /// Catalog file
    #[arg(short, long, default_value = "data/books.db")]
    db: PathBuf,

    /// fsync after every slot write
    #[arg(long)]
    sync_every_write: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new book
    Add {
        id: i32,
        title: String,
        author: String,
        year: i32,
        copies: i32,
    },

    /// Replace an existing book
    Update {
        id: i32,
        title: String,
        author: String,
        year: i32,
        copies: i32,
    },

    /// Delete a book by id
    Delete { id: i32 },

    /// Show one book by id
    Get { id: i32 },

    /// List every book ordered by id
    List,

    /// Search a field (ID, Название, Автор, Год издания, Тираж or English names)
    Find { field: String, value: String },

    /// Show record count and file size
    Stats,

    /// Import a pipe-delimited text file (or a JSON array with --json)
    Import {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Export every book to a pipe-delimited text file (or a JSON array with --json)
    Export {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Remove every book
    Clear,
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,shelfdb=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let sync_strategy = if args.sync_every_write {
        SyncStrategy::EveryWrite
    } else {
        SyncStrategy::OnClose
    };
    let config = Config::builder()
        .db_path(&args.db)
        .sync_strategy(sync_strategy)
        .build();

    let mut catalog = match Catalog::open(config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to open catalog {}: {}", args.db.display(), e);
            process::exit(1);
        }
    };

    let outcome = run(&mut catalog, args.command);
    let closed = catalog.close();

    if let Err(e) = outcome.and(closed) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(catalog: &mut Catalog, command: Commands) -> shelfdb::Result<()> {
    match command {
        Commands::Add {
            id,
            title,
            author,
            year,
            copies,
        } => {
            catalog.add(&BookView::new(id, title, author, year, copies))?;
            println!("Added book {}", id);
        }
        Commands::Update {
            id,
            title,
            author,
            year,
            copies,
        } => {
            catalog.update(&BookView::new(id, title, author, year, copies))?;
            println!("Updated book {}", id);
        }
        Commands::Delete { id } => {
            catalog.delete(id)?;
            println!("Deleted book {}", id);
        }
        Commands::Get { id } => {
            let record = catalog.find_by_id(id)?;
            print_views(&[record.to_view()]);
        }
        Commands::List => print_views(&catalog.get_all()?),
        Commands::Find { field, value } => {
            let field: SearchField = field.parse()?;
            print_views(&catalog.find(field, &value)?);
        }
        Commands::Stats => {
            let stats = catalog.stats()?;
            println!("Records:   {}", stats.records);
            println!("File size: {} bytes", stats.file_size);
        }
        Commands::Import { file, json } => {
            let count = if json {
                exchange::import_json_file(catalog, &file)?
            } else {
                exchange::import_text_file(catalog, &file)?
            };
            println!("Imported {} books", count);
        }
        Commands::Export { file, json } => {
            let count = if json {
                exchange::export_json_file(catalog, &file)?
            } else {
                exchange::export_text_file(catalog, &file)?
            };
            println!("Exported {} books to {}", count, file.display());
        }
        Commands::Clear => {
            catalog.clear()?;
            println!("Catalog cleared");
        }
    }
    Ok(())
}

fn print_views(views: &[BookView]) {
    println!(
        "{:>6}  {:<40}  {:<25}  {:>6}  {:>8}",
        "ID", "Title", "Author", "Year", "Copies"
    );
    for view in views {
        println!(
            "{:>6}  {:<40}  {:<25}  {:>6}  {:>8}",
            view.id, view.title, view.author, view.year, view.copies
        );
    }
}
