mod clean;
mod crawl;
mod db;
mod emploi_ma;
mod export;
mod fetch;
mod models;
mod rekrute;
mod site;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use db::Database;
use emploi_ma::EmploiMa;
use fetch::Fetcher;
use rekrute::Rekrute;
use site::Site;

#[derive(Parser)]
#[command(name = "jobharvest")]
#[command(about = "Harvest job offers from Moroccan job boards into JSON and SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the offers database
    Init {
        /// Database file (defaults to the user data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Scrape a job board and write the offers to a JSON file
    Scrape {
        /// Which job board to scrape
        #[arg(short, long, value_enum)]
        site: SiteKind,

        /// Results-page URL to start from (defaults to the board's listing page)
        #[arg(short, long)]
        url: Option<String>,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Keep raw field values (skip vocabulary normalization)
        #[arg(long)]
        raw: bool,
    },

    /// Normalize the field vocabularies of a previously scraped JSON file
    Clean {
        /// Input JSON file
        input: PathBuf,

        /// Output JSON file (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a JSON file of offers into the database
    Load {
        /// Input JSON file
        input: PathBuf,

        /// Database file (defaults to the user data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SiteKind {
    Rekrute,
    EmploiMa,
}

fn make_site(kind: SiteKind, url: Option<&str>) -> Result<Box<dyn Site>> {
    match kind {
        SiteKind::Rekrute => Ok(Box::new(Rekrute::new(
            url.unwrap_or(rekrute::DEFAULT_URL),
        )?)),
        SiteKind::EmploiMa => Ok(Box::new(EmploiMa::new(
            url.unwrap_or(emploi_ma::DEFAULT_URL),
        )?)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db } => {
            let database = Database::open(db.as_deref())?;
            database.init()?;
            println!("Database initialized at {}", database.path().display());
        }

        Commands::Scrape {
            site,
            url,
            output,
            raw,
        } => {
            let site = make_site(site, url.as_deref())?;
            let fetcher = Fetcher::new()?;

            let mut offers = crawl::crawl(site.as_ref(), &fetcher);
            if offers.is_empty() {
                println!(
                    "No offers scraped from {}. Check the URL, the network, or whether the board blocked the request.",
                    site.name()
                );
                return Ok(());
            }

            if !raw {
                clean::normalize(&mut offers);
            }

            export::write_offers(&output, &offers)?;
            println!(
                "Scraped {} offers from {} into {}",
                offers.len(),
                site.name(),
                output.display()
            );
        }

        Commands::Clean { input, output } => {
            let mut offers = export::read_offers(&input)?;
            clean::normalize(&mut offers);
            let output = output.unwrap_or(input);
            export::write_offers(&output, &offers)?;
            println!("Cleaned {} offers into {}", offers.len(), output.display());
        }

        Commands::Load { input, db } => {
            let offers = export::read_offers(&input)?;
            let mut database = Database::open(db.as_deref())?;
            database.ensure_initialized()?;

            let stats = database.load_offers(&offers)?;
            println!(
                "Loaded {} offer(s) ({} skipped, {} failed).",
                stats.inserted, stats.skipped, stats.failed
            );
            println!(
                "The offers table now holds {} row(s).",
                database.count_offers()?
            );
        }
    }

    Ok(())
}
