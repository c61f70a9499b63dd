//! Webtable main entry point
//!
//! Command-line front end for encoding row keys, seeding sample data and
//! inspecting or repairing link edges.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webtable::config::{load_config_with_hash, Config};
use webtable::families::TABLE_NAME;
use webtable::page::DomainScope;
use webtable::seed::{seed_all, DEFAULT_PAGES};
use webtable::{decode, KeyEncoder, LinkGraphWriter, LinkWriteResult, PageTable};

/// Webtable: salted row keys and a link graph for crawled pages
///
/// Without a configuration file every command runs against an in-memory
/// store that is discarded on exit.
#[derive(Parser, Debug)]
#[command(name = "webtable")]
#[command(version = "1.0.0")]
#[command(about = "Salted row keys and link graph for a web table", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the row key for each URL
    Encode {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Split a row key into its parts
    Decode { key: String },

    /// Load the sample site and generated pages for popular domains
    Seed {
        /// Pages generated per domain
        #[arg(long, default_value_t = DEFAULT_PAGES)]
        pages: usize,
    },

    /// Add one link and report which halves were written
    Link {
        source: String,
        target: String,
        anchor: String,
    },

    /// Write whichever halves of a link are missing
    Repair {
        source: String,
        target: String,
        anchor: String,
    },

    /// List the pages stored under a domain
    Scan {
        domain: String,

        /// Include pages on subdomains
        #[arg(long)]
        subdomains: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let encoder = config.key_encoder().context("Invalid salt digest")?;

    match cli.command {
        Command::Encode { urls } => handle_encode(encoder, &urls),
        Command::Decode { key } => handle_decode(&key),
        command => {
            let store = config.open_store().context("Failed to open store")?;
            tracing::info!("Opened {} with {} families", TABLE_NAME, store.families().len());

            let table = PageTable::with_encoder(store.clone(), encoder);
            let writer = LinkGraphWriter::with_encoder(store, encoder);
            handle_store_command(command, &table, &writer)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webtable=info,warn"),
            1 => EnvFilter::new("webtable=debug,info"),
            2 => EnvFilter::new("webtable=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn handle_encode(encoder: KeyEncoder, urls: &[String]) -> Result<()> {
    for url in urls {
        let key = encoder
            .encode(url)
            .with_context(|| format!("Cannot encode {}", url))?;
        println!("{}\t{}", url, key);
    }
    Ok(())
}

fn handle_decode(key: &str) -> Result<()> {
    let decoded = decode(key).with_context(|| format!("Cannot decode {}", key))?;
    println!("Salt:            {}", decoded.salt);
    println!("Reversed domain: {}", decoded.reversed_domain);
    println!("Domain:          {}", decoded.domain());
    println!("Path:            {}", decoded.path);
    Ok(())
}

fn handle_store_command(
    command: Command,
    table: &PageTable,
    writer: &LinkGraphWriter,
) -> Result<()> {
    match command {
        Command::Seed { pages } => {
            let summary = seed_all(table, writer, pages).context("Seeding failed")?;
            println!("✓ Wrote {} pages and {} links", summary.pages, summary.links);
            if summary.half_edges > 0 {
                println!("! {} links are half-edges, run repair", summary.half_edges);
            }
        }
        Command::Link {
            source,
            target,
            anchor,
        } => {
            let result = writer
                .add_link(&source, &target, &anchor)
                .context("Cannot add link")?;
            print_link_result(&result);
        }
        Command::Repair {
            source,
            target,
            anchor,
        } => {
            let result = writer
                .repair_link(&source, &target, &anchor)
                .context("Cannot repair link")?;
            print_link_result(&result);
        }
        Command::Scan { domain, subdomains } => {
            let scope = if subdomains {
                DomainScope::IncludeSubdomains
            } else {
                DomainScope::Exact
            };
            let pages = table
                .pages_in_domain(&domain, scope)
                .with_context(|| format!("Domain scan of {} failed", domain))?;

            println!("{} pages under {}\n", pages.len(), domain);
            for page in &pages {
                println!(
                    "{}  status={} type={} out={} in={}",
                    page.key,
                    page.status.map_or_else(|| "-".to_string(), |s| s.to_string()),
                    page.content_type.as_deref().unwrap_or("-"),
                    page.outlinks.len(),
                    page.inlinks.len()
                );
            }
        }
        Command::Encode { .. } | Command::Decode { .. } => {}
    }

    Ok(())
}

fn print_link_result(result: &LinkWriteResult) {
    println!("{} -> {}: {}", result.source_key, result.target_key, result.state);
    if let Some(e) = &result.forward_error {
        println!("  outlink failed: {}", e);
    }
    if let Some(e) = &result.backward_error {
        println!("  inlink failed: {}", e);
    }
}
