use std::io::Read;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, ensure, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use year_overview::cleaner::{clean_event_line, CleanOptions};
use year_overview::config::Settings;
use year_overview::server::{self, YearResponse, YEAR_RANGE};
use year_overview::wiki::{build_summary, MediaWikiClient};

#[derive(Parser)]
#[command(name = "year_overview", about = "Month-by-month events from Wikipedia year pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the event summary for one year as JSON
    Summary {
        year: i32,
        /// Max events per month
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Max section fetches in flight
        #[arg(short, long)]
        concurrency: Option<usize>,
        /// Max characters per event
        #[arg(long)]
        max_len: Option<usize>,
        /// Keep "Jan 5 - " style date prefixes
        #[arg(long)]
        keep_dates: bool,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Serve the HTTP API
    Serve {
        /// Listen address (default: WIKICAP_BIND or 127.0.0.1:8000)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Clean wikitext read from stdin, one event per output line
    Clean {
        #[arg(long, default_value = "200")]
        max_len: usize,
        #[arg(long)]
        keep_dates: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;

    match cli.command {
        Commands::Summary {
            year,
            limit,
            concurrency,
            max_len,
            keep_dates,
            pretty,
        } => {
            ensure!(
                YEAR_RANGE.contains(&year),
                "Year must be between {} and {}",
                YEAR_RANGE.start(),
                YEAR_RANGE.end()
            );
            if let Some(limit) = limit {
                settings.per_month_limit = limit;
            }
            if let Some(concurrency) = concurrency {
                settings.max_concurrent_fetches = concurrency;
            }
            if let Some(max_len) = max_len {
                settings.max_event_len = max_len;
            }
            settings.keep_date_prefix |= keep_dates;

            let client = MediaWikiClient::new(&settings)?;
            let events_by_month = build_summary(Arc::new(client), year, settings.summary_options())
                .await
                .with_context(|| format!("Failed to build summary for {}", year))?;
            if events_by_month.is_empty() {
                bail!("No events found for {}", year);
            }

            let response = YearResponse {
                year,
                events_by_month,
            };
            let out = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", out);
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            server::serve(&settings).await?;
        }
        Commands::Clean {
            max_len,
            keep_dates,
        } => {
            let mut wikitext = String::new();
            std::io::stdin()
                .read_to_string(&mut wikitext)
                .context("Failed to read wikitext from stdin")?;

            let opts = CleanOptions {
                max_len,
                keep_date_prefix: keep_dates,
            };
            let mut kept = 0usize;
            for event in wikitext.lines().filter_map(|line| clean_event_line(line, opts)) {
                println!("{}", event);
                kept += 1;
            }
            info!("Kept {} of {} lines", kept, wikitext.lines().count());
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {}", format_duration(elapsed));
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
