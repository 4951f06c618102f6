// Copyright 2026 Gatherer Access Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{Parser, Subcommand};
use gatherer_access::{CacheBackend, GathererResponse};
use std::collections::BTreeMap;

#[derive(Parser)]
#[command(
    name = "gatherer",
    about = "Fetch pages from the Gatherer card database",
    version
)]
struct Cli {
    /// Print the full response (status, headers, body) as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable response caching for this run
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the details page for a card by multiverse ID
    Card {
        /// The multiverse ID to look up (eg. 193871)
        multiverse_id: String,
    },
    /// Search for cards
    Search {
        /// Card name to search for (eg. "Jace Beleren")
        #[arg(long)]
        name: Option<String>,
        /// Set to search for (eg. "Darksteel")
        #[arg(long)]
        set: Option<String>,
        /// Format or block to search for (eg. "Legacy")
        #[arg(long)]
        format: Option<String>,
        /// Results page output (standard, compact, checklist, spoiler)
        #[arg(long)]
        output: Option<String>,
        /// Output method for spoiler output (text, visual)
        #[arg(long)]
        method: Option<String>,
    },
    /// Fetch the homepage (lists all formats, sets and card types)
    Homepage,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("gatherer_access=debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_cache {
        gatherer_access::configure(|cfg| cfg.cache = CacheBackend::Disabled);
    }

    let access = gatherer_access::instance();
    let response = match cli.command {
        Commands::Card { multiverse_id } => access.card(&multiverse_id).await?,
        Commands::Search {
            name,
            set,
            format,
            output,
            method,
        } => {
            let mut options = BTreeMap::new();
            for (key, value) in [
                ("name", name),
                ("set", set),
                ("format", format),
                ("output", output),
                ("method", method),
            ] {
                if let Some(value) = value {
                    options.insert(key.to_string(), value);
                }
            }
            access.search(&options).await?
        }
        Commands::Homepage => access.homepage().await?,
    };

    print_response(&response, cli.json)?;
    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_response(response: &GathererResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        println!("{}", response.body);
    }
    Ok(())
}
