// Book Inventory - Personal book inventory manager
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


use anyhow::Context;
use book_inventory::storage::{parse_authors, Book, NewBook, NewUser, SearchField};
use book_inventory::translations::keys;
use book_inventory::{AuthFlow, Inventory, InventoryConfig, InventoryError, Session, Translations};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const BUNDLED_TRANSLATIONS: &str = include_str!("../../translations.json");

#[derive(Parser)]
#[command(name = "book-inventory-cli")]
#[command(about = "Book Inventory - manage a personal book collection", long_about = None)]
struct Cli {
    /// Username to log in with
    #[arg(global = true, short, long)]
    user: Option<String>,

    /// Password to log in with
    #[arg(global = true, short, long)]
    password: Option<String>,

    /// Database file (overrides BOOK_INVENTORY_DATABASE)
    #[arg(global = true, long)]
    database: Option<PathBuf>,

    /// Message language (overrides BOOK_INVENTORY_LANGUAGE)
    #[arg(global = true, long)]
    language: Option<String>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account (does not log in)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        new_password: String,
        #[arg(long, default_value = "")]
        email: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        dob: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Search books
    Search {
        /// isbn, authors, title, page_num, price or available
        #[arg(short, long, default_value = "title")]
        field: String,
        /// Search term (empty lists everything)
        #[arg(default_value = "")]
        term: String,
    },
    /// Add a book
    Add {
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        title: String,
        /// Comma-separated author list
        #[arg(long)]
        authors: String,
        #[arg(long)]
        pages: i64,
        #[arg(long)]
        price: i64,
        #[arg(long, default_value_t = 0)]
        available: i64,
    },
    /// Edit a book; omitted fields keep their current value
    Edit {
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        authors: Option<String>,
        #[arg(long)]
        pages: Option<i64>,
        #[arg(long)]
        price: Option<i64>,
        #[arg(long)]
        available: Option<i64>,
    },
    /// Delete a book
    Delete {
        isbn: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show book count and total pages
    Stats,
    /// Show the price chart
    Chart,
}

/// Messages resolved for the configured language
struct Messages {
    translations: Translations,
    language: String,
}

impl Messages {
    fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations.get(&self.language, key)
    }

    /// Message for an error shown to the user
    fn error(&self, err: &InventoryError) -> String {
        match err {
            InventoryError::PermissionDenied { .. } => {
                self.get(keys::PERMISSION_ERROR_MESSAGE).to_string()
            }
            InventoryError::AuthenticationFailed(_) => self.get(keys::LOGIN_FAILURE).to_string(),
            other => other.user_message(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let mut config = InventoryConfig::from_env().context("Failed to read configuration")?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }

    let translations = match &config.translations_path {
        Some(path) => Translations::load(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "translations unavailable, showing message keys");
            Translations::empty()
        }),
        None => Translations::from_json(BUNDLED_TRANSLATIONS).unwrap_or_default(),
    };
    let messages = Messages {
        translations,
        language: config.language.clone(),
    };

    let inventory = Inventory::open(&config).await.with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })?;
    let pool = inventory.database().pool().clone();

    let mut flow = AuthFlow::new();

    if let Commands::Register {
        username,
        new_password,
        email,
        dob,
        phone,
    } = cli.command
    {
        let user = NewUser {
            username,
            password: new_password,
            email,
            date_of_birth: dob,
            phone_number: phone,
        };
        return match flow.register(&pool, &user).await {
            Ok(()) => {
                println!("{}", messages.get(keys::REGISTER_SUCCESS));
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("{}: {}", messages.get(keys::REGISTER_FAILURE), messages.error(&e));
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let (Some(username), Some(password)) = (cli.user, cli.password) else {
        flow.cancel();
        anyhow::bail!("--user and --password are required");
    };

    let session = match flow.login(&pool, &username, &password).await {
        Ok(session) => session,
        Err(e) if e.is_user_facing() => {
            flow.cancel();
            eprintln!("{}", messages.error(&e));
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("Login failed"),
    };

    let code = execute(&inventory, &session, &messages, cli.command).await?;
    inventory.close().await?;
    Ok(code)
}

async fn execute(
    inventory: &Inventory,
    session: &Session,
    messages: &Messages,
    command: Commands,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Register { .. } => anyhow::bail!("register runs without logging in"),

        Commands::Search { field, term } => {
            let field: SearchField = match field.parse() {
                Ok(field) => field,
                Err(e) => {
                    eprintln!("{}", messages.error(&e));
                    return Ok(ExitCode::FAILURE);
                }
            };

            let outcome = inventory.search_books(&term, field).await;
            if let Some(cause) = outcome.cause().filter(|c| c.is_user_facing()) {
                eprintln!("{}", messages.error(cause));
                return Ok(ExitCode::FAILURE);
            }

            let books = outcome.into_value();
            if books.is_empty() {
                println!("{}", messages.get(keys::NO_RESULTS));
            }
            for book in &books {
                print_book(book);
            }
        }

        Commands::Add {
            isbn,
            title,
            authors,
            pages,
            price,
            available,
        } => {
            let book = NewBook {
                isbn,
                title,
                authors: parse_authors(&authors),
                page_count: pages,
                price,
                available,
            };
            match inventory.add_book(session, book).await {
                Ok(()) => println!("{}", messages.get(keys::ADD_SUCCESS)),
                Err(e) => {
                    eprintln!("{} ({})", messages.get(keys::ADD_ERROR), messages.error(&e));
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Edit {
            isbn,
            title,
            authors,
            pages,
            price,
            available,
        } => {
            let Some(mut book) = inventory.find_book(&isbn).await? else {
                eprintln!("{}", messages.get(keys::UPDATE_NOT_FOUND));
                return Ok(ExitCode::FAILURE);
            };

            if let Some(title) = title {
                book.title = title;
            }
            if let Some(authors) = authors {
                book.authors = parse_authors(&authors);
            }
            if let Some(pages) = pages {
                book.page_count = pages;
            }
            if let Some(price) = price {
                book.price = price;
            }
            if let Some(available) = available {
                book.available = available;
            }

            let updated = inventory.update_book(session, &book).await?;
            if updated == 0 {
                eprintln!("{}", messages.get(keys::UPDATE_NOT_FOUND));
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", messages.get(keys::SUCCESS_MESSAGE));
        }

        Commands::Delete { isbn, yes } => {
            if !yes && !confirm(&format!("Delete book {}? [y/N] ", isbn))? {
                return Ok(ExitCode::SUCCESS);
            }

            match inventory.delete_book(session, &isbn).await {
                Ok(removed) if removed > 0 => println!("{}", messages.get(keys::DELETE_SUCCESS)),
                Ok(_) => {
                    eprintln!("{}", messages.get(keys::DELETE_FAILURE));
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => {
                    eprintln!("{}", messages.error(&e));
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Stats => {
            let stats = inventory.get_stats().await.into_value();
            println!("{}: {}", messages.get(keys::BOOK_COUNT), stats.book_count);
            println!("{}: {}", messages.get(keys::TOTAL_PAGES), stats.total_pages);
        }

        Commands::Chart => {
            let chart = inventory.price_chart().await.into_value();
            println!("{}", messages.get(keys::BOOK_PRICE_CHART_TITLE));

            const WIDTH: usize = 40;
            for bar in &chart.bars {
                let len = chart.bar_length(bar.price, WIDTH);
                println!(
                    "{:<30.30} {:>8} {}",
                    bar.title,
                    bar.price,
                    "#".repeat(len)
                );
            }
            println!(
                "{}: {:.2}",
                messages.get(keys::AVERAGE_PRICE),
                chart.average_price
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_book(book: &Book) {
    println!(
        "{:<20} {:<40} {:<30} {:>6} {:>8} {:>4}",
        book.isbn,
        book.title,
        book.authors_display(),
        book.page_count,
        book.price,
        book.available
    );
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
