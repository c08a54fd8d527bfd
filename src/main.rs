use clap::{Parser, Subcommand};
use quotidian::compose::{AssetComposer, Composer};
use quotidian::config::{AppConfig, parse_post_time};
use quotidian::dispatch::{CancelToken, Dispatcher, Outcome};
use quotidian::ledger::{Ledger, QuotesStore};
use quotidian::prepare;
use quotidian::remote::{
    HttpPoster, Orientation, PhotoFilters, PhotoSize, QuoteSource, UnsplashClient, WebQuoteSource,
    fetch_photos,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "quotidian")]
#[command(about = "Daily quote-over-photo poster")]
#[command(long_about = "\
Daily quote-over-photo poster

Your filesystem is the queue: a photo directory, a quotes CSV, and an
append-only posted-history CSV. Each day at the configured time the next
quote is composited onto the next photo and published with a credited
caption.

Typical cycle:

  quotidian fetch -q forest -o landscape --count 7   # stock the photo queue
  quotidian scrape-quotes --out quotes.csv           # stock the quote queue
  quotidian schedule --photos-dir random-regular-landscape-forest-photos \\
                     --quotes-path quotes.csv --count 7

Credentials come from quotidian.toml or the environment
(QUOTIDIAN_PROVIDER_ACCESS_KEY, QUOTIDIAN_POSTER_TOKEN); `compose` needs
neither.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (missing file falls back to built-in defaults)
    #[arg(long, default_value = "quotidian.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download random stock photos into a per-filter directory
    Fetch {
        /// Collection ids to draw from
        #[arg(long)]
        collections: Vec<String>,
        /// Search term filter
        #[arg(short, long)]
        query: Option<String>,
        /// Orientation filter
        #[arg(short, long, value_enum)]
        orientation: Option<Orientation>,
        /// Which rendition to download
        #[arg(short, long, value_enum, default_value = "regular")]
        size: PhotoSize,
        /// How many photos to request
        #[arg(long, default_value_t = 1)]
        count: u32,
        /// Directory the per-filter photo directories live under
        #[arg(long, default_value = "photos")]
        photos_root: PathBuf,
    },
    /// Scrape quote/author pairs from the configured page into a CSV
    ScrapeQuotes {
        /// Destination CSV (overwritten)
        #[arg(long, default_value = "quotes.csv")]
        out: PathBuf,
    },
    /// Compose a single quote-over-photo image, no posting
    Compose {
        /// Source photo
        #[arg(short, long)]
        image: PathBuf,
        /// Quotation text, without surrounding quotation marks
        #[arg(short, long)]
        quote: String,
        /// Attribution line
        #[arg(short, long)]
        author: String,
        /// Watermark image (defaults to the configured one)
        #[arg(short, long)]
        watermark: Option<PathBuf>,
        /// TrueType font (defaults to the configured one)
        #[arg(long)]
        font: Option<PathBuf>,
        /// Where to save the composed image
        #[arg(short, long)]
        save: PathBuf,
    },
    /// Prepare a batch and post one job per day at the configured time
    Schedule {
        /// Photo directory (as created by `fetch`)
        #[arg(long)]
        photos_dir: PathBuf,
        /// Quotes CSV (as created by `scrape-quotes`)
        #[arg(long)]
        quotes_path: PathBuf,
        /// How many daily posts to prepare
        #[arg(short, long)]
        count: usize,
        /// Daily fire time HH:MM, overriding the configured one
        #[arg(short, long)]
        time: Option<String>,
        /// Posted-history CSV
        #[arg(long, default_value = "tweeted.csv")]
        tweeted_path: PathBuf,
        /// Scratch directory for composed images
        #[arg(long, default_value = ".quotidian-media")]
        media_dir: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = AppConfig::load(&cli.config)?;

    match cli.command {
        Command::Fetch {
            collections,
            query,
            orientation,
            size,
            count,
            photos_root,
        } => {
            let access_key = cfg.provider.require_access_key()?;
            let provider = UnsplashClient::new(&cfg.provider.random_photo_url, access_key);
            let filters = PhotoFilters {
                collections,
                query,
                orientation,
                size,
                count,
            };
            let report = fetch_photos(&provider, &photos_root, &filters)?;
            println!(
                "Downloaded {} photo(s) into {} ({} already present)",
                report.downloaded,
                photos_root.join(filters.directory_name()).display(),
                report.skipped,
            );
        }
        Command::ScrapeQuotes { out } => {
            let source = WebQuoteSource::new(&cfg.content.quotes_page);
            let quotes = source.scrape()?;
            QuotesStore::new(&out).save(&quotes)?;
            println!("Saved {} quote(s) to {}", quotes.len(), out.display());
        }
        Command::Compose {
            image,
            quote,
            author,
            watermark,
            font,
            save,
        } => {
            let composer = Composer::load(
                font.as_deref().unwrap_or(&cfg.content.font),
                watermark.as_deref().unwrap_or(&cfg.content.watermark),
            )?;
            composer.compose_file(&image, &quote, &author, &save)?;
            println!("Composed {}", save.display());
        }
        Command::Schedule {
            photos_dir,
            quotes_path,
            count,
            time,
            tweeted_path,
            media_dir,
        } => {
            let token = cfg.poster.require_token()?;
            let fire_time = parse_post_time(time.as_deref().unwrap_or(&cfg.content.post_time))?;

            let mut ledger = Ledger::open(&photos_dir, &quotes_path, &tweeted_path)?;
            let composer = Composer::load(&cfg.content.font, &cfg.content.watermark)?;
            let jobs = prepare::prepare_jobs(
                &ledger,
                &composer,
                &media_dir,
                count,
                &cfg.content.hashtags,
            )?;
            info!(count = jobs.len(), "batch prepared");

            let cancel = CancelToken::new();
            let handler_token = cancel.clone();
            ctrlc::set_handler(move || handler_token.cancel())?;

            let poster = HttpPoster::new(&cfg.poster.upload_url, &cfg.poster.post_url, token);
            let mut dispatcher = Dispatcher::new(&mut ledger, &poster, fire_time, cancel);
            let stdin = std::io::stdin();
            let report = dispatcher.run(jobs, &media_dir, &mut stdin.lock())?;
            match report.outcome {
                Outcome::Drained => println!("Done: {} post(s) published", report.fired),
                Outcome::Cancelled => {
                    println!("Cancelled after {} post(s)", report.fired)
                }
            }
        }
    }

    Ok(())
}
