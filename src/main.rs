use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use listing_scout::config::{self, Config};
use listing_scout::mailbox::{ImapSource, MailSource};
use listing_scout::parsers;
use listing_scout::scoring::{self, ScoreBands};
use listing_scout::store::{SaveOutcome, SnapshotStore};
use listing_scout::{dedup, filters, report};
use scraper::Html;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "listing-scout",
    version,
    about = "Mailbox-driven real-estate listing scout"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch alert emails, score the listings, replace the snapshot
    Scrape,
    /// Write the static report page
    Render,
    /// Scrape then render (the scheduled-job entry point)
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    dotenvy::dotenv().ok();

    match Cli::parse().command.unwrap_or(Command::Run) {
        Command::Scrape => {
            let config = Config::from_env()?;
            scrape(&config).await?;
        }
        Command::Render => {
            report::write_report(
                Path::new(config::DEFAULT_REPORT_PATH),
                &ScoreBands::default(),
            )
            .await?;
        }
        Command::Run => {
            let config = Config::from_env()?;
            scrape(&config).await?;
            report::write_report(&config.report_path, &config.bands).await?;
        }
    }

    Ok(())
}

/// One full ingest → validate → dedup → score → save pass.
/// Stages run strictly in sequence; the snapshot is replaced wholesale.
async fn scrape(config: &Config) -> Result<()> {
    info!("🏠 listing-scout — scanning {}", config.mailbox.server);

    let source = ImapSource::new(config.mailbox.clone(), &config.senders);
    let emails = source.fetch().await?;
    info!(
        "📬 {} alert emails to process via {}",
        emails.len(),
        source.source_name()
    );

    let parsers = parsers::all();
    let now = Utc::now();
    let mut deduper = dedup::Deduper::new(config.similarity_word_sequence);
    let mut candidates = Vec::new();
    let mut parsed_total = 0usize;

    for email in &emails {
        let document = Html::parse_document(&email.html);
        for parser in &parsers {
            let raws = parser.parse(&document, email.received);
            if !raws.is_empty() {
                debug!(portal = parser.portal_name(), count = raws.len(), "listings parsed");
            }
            for raw in raws {
                parsed_total += 1;
                let Some(candidate) = filters::validate(raw, &config.criteria, now) else {
                    continue;
                };
                if !deduper.insert(&candidate.link, &candidate.name) {
                    debug!(name = %candidate.name, "duplicate within run, skipping");
                    continue;
                }
                candidates.push(candidate);
            }
        }
    }
    info!(
        "✅ {} unique valid listings out of {} parsed",
        candidates.len(),
        parsed_total
    );

    let listings = scoring::score_and_rank(candidates, &config.weights);
    for listing in &listings {
        println!(
            "{:>3}. [{:<4}] {:>5} €/m²  {:>4}  {}",
            listing.rank,
            config.bands.classify(listing.score),
            report::rounded_price_per_sqm(listing.price_per_sqm),
            report::format_age(now, listing.received_time),
            listing.name,
        );
    }

    let store = SnapshotStore::new(&config.snapshot_path);
    let previous = store.load().await?;
    debug!(
        "previous snapshot had {} listings, replacing with {}",
        previous.len(),
        listings.len()
    );
    match store.save(&listings).await? {
        SaveOutcome::Written => info!(
            "💾 snapshot replaced: {} listings in {}",
            listings.len(),
            store.path().display()
        ),
        SaveOutcome::Unchanged => info!("💤 snapshot unchanged, nothing to commit"),
    }

    Ok(())
}
