use clap::Parser;
use page_scrape::{ScrapeError, Scraper, ServerConfig, server};

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    if let Err(e) = run(args).await {
        ::log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ScrapeError> {
    let config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    let mut config = config.apply_env_overrides();

    match args.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_address = bind;
            }
            server::serve(&config).await
        }
        Command::Scrape { url, strict, type_ } => {
            let scraper = Scraper::from_config(&config)?;
            let response = scraper.scrape(&url, strict, type_).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
