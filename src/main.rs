//! Photo search - Entry Point

use clap::Parser;
use photosearch::config::CliOverrides;
use photosearch::integration::{print_updates, run_commands};
use photosearch::model::AppError;
use photosearch::source::FlickrSource;
use photosearch::state::{SearchSession, SessionOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

/// Photo search - debounced Flickr search driven from stdin
#[derive(Parser, Debug)]
#[command(name = "photosearch")]
#[command(version)]
#[command(about = "Debounced, paginated Flickr photo search driven by stdin lines")]
pub struct Args {
    /// Initial query to search for
    #[arg(short, long)]
    pub query: Option<String>,

    /// Results per page (must be positive)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: Option<u32>,

    /// Quiet period before a query is searched, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Flickr API key (overrides config file and PHOTOSEARCH_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            api_key: self.api_key.clone(),
            per_page: self.per_page,
            debounce_ms: self.debounce_ms,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = photosearch::config::resolve(args.config.clone(), args.overrides())?;

    photosearch::logging::init(&config.log_file_path)?;

    info!(
        base_url = %config.base_url,
        per_page = config.per_page,
        debounce_ms = config.debounce_ms,
        "Configuration loaded and resolved"
    );

    let source = FlickrSource::from_config(&config)?;
    let session = SearchSession::spawn(Arc::new(source), SessionOptions::from_config(&config));

    let printer = {
        let updates = session.subscribe();
        tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            print_updates(updates, &mut stdout).await
        })
    };

    if let Some(query) = args.query {
        session.set_query(query);
    }
    run_commands(&session, BufReader::new(tokio::io::stdin())).await?;

    // Dropping the session closes the update stream, which ends the printer.
    drop(session);
    printer.await.map_err(std::io::Error::other)??;

    info!("Exiting");
    Ok(())
}
