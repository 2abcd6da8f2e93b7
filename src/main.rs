//! Websift CLI: crawl a web subgraph and search it by keyword.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use websift::progress::{CrawlStage, ProgressListener};
use websift::{Config, Engine};

#[derive(Parser)]
#[command(name = "websift")]
#[command(about = "Keyword search over a crawled web subgraph")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "websift.toml")]
    config: PathBuf,

    /// Data directory (overrides the config file)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter configuration and create the data directory
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Crawl from a seed URL, replacing any previous index
    Crawl {
        /// Seed URL where the crawl begins
        seed: String,

        /// Maximum pages to visit (0 = unlimited; overrides the config)
        #[arg(short, long)]
        max_pages: Option<usize>,
    },

    /// Search the crawled index
    Search {
        /// Search query
        query: String,

        /// Scale scores by PageRank
        #[arg(short, long)]
        boost: bool,

        /// Number of results
        #[arg(short, long)]
        top_k: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show statistics for the current index
    Stats,

    /// Show outgoing and incoming links of an indexed page
    Links {
        /// Page URL
        url: String,
    },
}

/// Logs crawl stage transitions for the terminal user
struct ConsoleProgress;

impl ProgressListener for ConsoleProgress {
    fn update(&self, stage: CrawlStage, done: usize, pending: usize) {
        match stage {
            CrawlStage::Retrieving if done > 0 => {
                info!(visited = done, queued = pending, "retrieving pages")
            }
            CrawlStage::Retrieving => info!("retrieving pages"),
            CrawlStage::Parsing => info!("parsing pages"),
            CrawlStage::Linking => info!("processing hyperlinks"),
            CrawlStage::Ranking => info!("crunching page ranks"),
            CrawlStage::Done => info!("index ready"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    match cli.command {
        Commands::Init { path } => init_config(path),
        Commands::Crawl { seed, max_pages } => crawl(config, seed, max_pages).await,
        Commands::Search {
            query,
            boost,
            top_k,
            format,
        } => search(config, query, boost, top_k, format),
        Commands::Stats => show_stats(config),
        Commands::Links { url } => show_links(config, url),
    }
}

fn init_config(path: PathBuf) -> Result<()> {
    let config_path = path.join("websift.toml");

    let defaults = Config::default();
    let toml_content = format!(
        r#"# Websift configuration

[crawl]
page_cap = {}
max_retries = {}
user_agent = "{}"
timeout_secs = {}

[search]
top_k = {}

[storage]
data_dir = "./data"
"#,
        defaults.crawl.page_cap,
        defaults.crawl.max_retries,
        defaults.crawl.user_agent,
        defaults.crawl.timeout_secs,
        defaults.search.top_k,
    );

    std::fs::write(&config_path, toml_content)?;
    println!("Created configuration file: {}", config_path.display());

    let data_dir = path.join("data");
    std::fs::create_dir_all(&data_dir)?;
    println!("Created data directory: {}", data_dir.display());

    Ok(())
}

async fn crawl(mut config: Config, seed: String, max_pages: Option<usize>) -> Result<()> {
    if let Some(cap) = max_pages {
        config.crawl.page_cap = cap;
    }

    let mut engine = Engine::new(config);
    engine.initialize()?;
    engine
        .crawl_with_progress(&seed, Some(&ConsoleProgress))
        .await?;

    let stats = engine.stats().expect("crawl just completed");
    println!("\nCrawl complete!");
    println!("===============");
    println!("Seed URL:        {}", stats.seed_url);
    println!("Pages indexed:   {}", stats.total_docs);
    println!("Words indexed:   {}", stats.total_words);
    println!(
        "Snapshot:        {}",
        engine
            .config()
            .storage
            .data_dir
            .join(websift::storage::SNAPSHOT_FILE)
            .display()
    );

    Ok(())
}

fn load_engine(config: Config) -> Result<Option<Engine>> {
    let mut engine = Engine::new(config);
    if engine.load()? {
        Ok(Some(engine))
    } else {
        println!("No crawl data found. Run `websift crawl <seed-url>` first.");
        Ok(None)
    }
}

fn search(
    config: Config,
    query: String,
    boost: bool,
    top_k: Option<usize>,
    format: String,
) -> Result<()> {
    let top_k = top_k.unwrap_or(config.search.top_k);
    let Some(engine) = load_engine(config)? else {
        return Ok(());
    };

    let results = engine.search_detailed(&query, boost, top_k);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&results)?),
        _ => {
            println!("\nSearch results ({} found):\n", results.len());
            for (i, result) in results.iter().enumerate() {
                println!("{}. [{:.3}] {}", i + 1, result.score, result.title);
                println!("   URL:  {}", result.url);
                println!("   Rank: {:.5}{}", result.page_rank, if result.boosted { " (boosted)" } else { "" });
                println!();
            }
        }
    }

    Ok(())
}

fn show_stats(config: Config) -> Result<()> {
    let Some(engine) = load_engine(config)? else {
        return Ok(());
    };
    let stats = engine.stats().expect("index just loaded");

    println!("\nIndex statistics");
    println!("================");
    println!("Seed URL:      {}", stats.seed_url);
    println!("Crawl time:    {}", stats.crawl_time.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Total pages:   {}", stats.total_docs);
    println!("Total words:   {}", stats.total_words);

    Ok(())
}

fn show_links(config: Config, url: String) -> Result<()> {
    let Some(engine) = load_engine(config)? else {
        return Ok(());
    };

    let Some(outgoing) = engine.outgoing_links(&url) else {
        println!("Page is not in the index: {}", url);
        return Ok(());
    };
    let incoming = engine.incoming_links(&url).unwrap_or_default();

    println!("\nPageRank: {:.5}", engine.page_rank(&url));
    println!("\nOutgoing links ({}):", outgoing.len());
    for link in &outgoing {
        println!("  {}", link);
    }
    println!("\nIncoming links ({}):", incoming.len());
    for link in &incoming {
        println!("  {}", link);
    }

    Ok(())
}
