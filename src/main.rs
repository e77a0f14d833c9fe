//! # catalog_scrape
//!
//! Extracts structured catalog metadata from adult-video catalog sites: movie
//! records from HEYZO, performer profiles and performer search from xslist.
//!
//! ## Usage
//!
//! ```sh
//! catalog_scrape movie heyzo-1234
//! catalog_scrape --output-dir ./out actor 5589
//! catalog_scrape search-actor "Jane Doe"
//! ```
//!
//! ## Architecture
//!
//! Every lookup follows the same pipeline:
//! 1. **Normalize**: turn the input into a provider id, or take a homepage URL as-is
//! 2. **Fetch**: download the primary page through [`fetch::RetryFetch`]
//! 3. **Extract**: run the provider's ordered rule table over the parsed page
//! 4. **Resolve**: fetch any nested manifest discovered during extraction
//! 5. **Output**: print pretty JSON, optionally also writing one file per record

use clap::Parser;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod document;
mod error;
mod fetch;
mod m3u8;
mod models;
mod outputs;
mod parser;
mod pipeline;
mod providers;
mod resolve;
mod script;
mod utils;

use cli::{Cli, Command};
use config::{FetchConfig, load_config};
use error::ScrapeError;
use fetch::{HttpSource, RetryFetch};
use models::{ActorInfo, MovieInfo};
use outputs::json;
use providers::heyzo::{self, Heyzo};
use providers::xslist::{self, XsList};
use providers::{
    ACTOR_PROVIDERS, ActorProvider, ActorSearcher, MOVIE_PROVIDERS, MovieProvider, lookup, looks_like_url,
};
use utils::{ensure_writable_dir, slugify};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // stdout carries the JSON records, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("catalog_scrape starting up");

    let args = Cli::parse();
    debug!(?args.command, ?args.output_dir, "Parsed CLI arguments");

    // ---- Configuration ----
    let base = match &args.config {
        Some(path) => load_config(path).await?,
        None => FetchConfig::default(),
    };
    let fetch_config = args.fetch_config(base);
    debug!(?fetch_config, "Effective fetch configuration");

    // Early check: ensure output dir is writable
    if let Some(dir) = &args.output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let source = RetryFetch::new(
        HttpSource::new(&fetch_config)?,
        fetch_config.max_retries,
        Duration::from_millis(fetch_config.retry_base_ms),
    );

    let output_dir = args.output_dir.as_deref();
    let concurrency = args.concurrency.max(1);

    let (total, failed) = match &args.command {
        Command::Movie { inputs, provider } => match lookup(MOVIE_PROVIDERS, provider) {
            Some(heyzo::NAME) => run_movies(&Heyzo::new(&source), inputs, concurrency, output_dir).await,
            _ => return Err(format!("unknown movie provider: {provider}").into()),
        },
        Command::Actor { inputs, provider } => match lookup(ACTOR_PROVIDERS, provider) {
            Some(xslist::NAME) => run_actors(&XsList::new(&source), inputs, concurrency, output_dir).await,
            _ => return Err(format!("unknown actor provider: {provider}").into()),
        },
        Command::SearchActor { keyword, provider } => match lookup(ACTOR_PROVIDERS, provider) {
            Some(xslist::NAME) => run_search(&XsList::new(&source), keyword, output_dir).await,
            _ => return Err(format!("unknown actor search provider: {provider}").into()),
        },
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        total,
        successful = total - failed,
        failed,
        "Execution complete"
    );

    if failed > 0 {
        return Err(format!("{failed} of {total} lookups failed").into());
    }
    Ok(())
}

async fn movie_for_input<P: MovieProvider>(provider: &P, input: &str) -> Result<MovieInfo, ScrapeError> {
    if looks_like_url(input) {
        return provider.get_movie_info_by_url(input.trim()).await;
    }
    let id = provider
        .normalize_id(input)
        .ok_or_else(|| ScrapeError::NotFound(input.to_string()))?;
    provider.get_movie_info_by_id(&id).await
}

async fn actor_for_input<P: ActorProvider>(provider: &P, input: &str) -> Result<ActorInfo, ScrapeError> {
    if looks_like_url(input) {
        return provider.get_actor_info_by_url(input.trim()).await;
    }
    let id = provider
        .normalize_id(input)
        .ok_or_else(|| ScrapeError::NotFound(input.to_string()))?;
    provider.get_actor_info_by_id(&id).await
}

/// Look up every input concurrently. Returns `(total, failed)`.
#[instrument(level = "info", skip_all, fields(provider = provider.name(), priority = provider.priority(), inputs = inputs.len()))]
async fn run_movies<P: MovieProvider>(
    provider: &P,
    inputs: &[String],
    concurrency: usize,
    output_dir: Option<&str>,
) -> (usize, usize) {
    let results: Vec<(&String, Result<MovieInfo, ScrapeError>)> = stream::iter(inputs)
        .map(|input| async move { (input, movie_for_input(provider, input).await) })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut failed = 0;
    for (input, result) in results {
        let emitted = match result {
            Ok(movie) => emit(&movie, &movie.provider, &movie.id, output_dir).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = emitted {
            error!(%input, error = %e, "Movie lookup failed; skipping input");
            failed += 1;
        }
    }
    (inputs.len(), failed)
}

/// Look up every input concurrently. Returns `(total, failed)`.
#[instrument(level = "info", skip_all, fields(provider = provider.name(), priority = provider.priority(), inputs = inputs.len()))]
async fn run_actors<P: ActorProvider>(
    provider: &P,
    inputs: &[String],
    concurrency: usize,
    output_dir: Option<&str>,
) -> (usize, usize) {
    let results: Vec<(&String, Result<ActorInfo, ScrapeError>)> = stream::iter(inputs)
        .map(|input| async move { (input, actor_for_input(provider, input).await) })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut failed = 0;
    for (input, result) in results {
        let emitted = match result {
            Ok(actor) => emit(&actor, &actor.provider, &actor.id, output_dir).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = emitted {
            error!(%input, error = %e, "Actor lookup failed; skipping input");
            failed += 1;
        }
    }
    (inputs.len(), failed)
}

#[instrument(level = "info", skip(provider, output_dir), fields(provider = provider.name(), priority = provider.priority()))]
async fn run_search<P: ActorSearcher>(provider: &P, keyword: &str, output_dir: Option<&str>) -> (usize, usize) {
    let emitted = match provider.search_actor(keyword).await {
        Ok(results) => {
            let slug = slugify(keyword);
            let stem = if slug.is_empty() {
                "search".to_string()
            } else {
                format!("search-{slug}")
            };
            emit(&results, provider.name(), &stem, output_dir).await
        }
        Err(e) => Err(e.into()),
    };

    match emitted {
        Ok(()) => (1, 0),
        Err(e) => {
            error!(%keyword, error = %e, "Actor search failed");
            (1, 1)
        }
    }
}

/// Print `record` as pretty JSON and, with an output directory, write it to disk.
async fn emit<T: Serialize>(
    record: &T,
    provider: &str,
    file_stem: &str,
    output_dir: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    println!("{}", json::to_pretty_json(record)?);
    if let Some(dir) = output_dir {
        json::write_record(dir, provider, file_stem, record).await?;
    }
    Ok(())
}
