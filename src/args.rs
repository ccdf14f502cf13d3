use clap::{Parser, Subcommand};
use page_scrape::ScraperType;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-scrape")]
#[command(about = "Extracts main-content text and in-scope links from web pages")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve GET /api over HTTP
    Serve {
        /// Address to listen on (overrides config and PAGE_SCRAPE_BIND)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Scrape a single URL and print the JSON response
    Scrape {
        /// Page to scrape
        url: String,

        /// Only keep links below the page's own path
        #[arg(short, long)]
        strict: bool,

        /// How to load the page
        #[arg(short = 't', long = "type", value_enum, default_value_t = ScraperType::Fetch)]
        type_: ScraperType,
    },
}
