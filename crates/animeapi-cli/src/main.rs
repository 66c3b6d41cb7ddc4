mod config;
mod error;

use std::process::ExitCode;

use animeapi::known_changes::latest_revision;
use animeapi::{
    AnimeApiClient, ApiVersion, ClientConfig, MediaType, Platform, RequestSpec, KNOWN_CHANGES,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::error::CliError;

/// Look up anime IDs across cataloging platforms through AnimeAPI.
#[derive(Debug, Parser)]
#[command(name = "animeapi", version)]
struct Cli {
    /// Base URL of the AnimeAPI instance.
    #[arg(long, global = true, conflicts_with = "legacy")]
    base_url: Option<String>,

    /// Use the V2 (legacy) endpoint.
    #[arg(long, global = true)]
    legacy: bool,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Do not warn when the server runs an older revision than expected.
    #[arg(long, global = true)]
    no_drift_warning: bool,

    /// Enable debug logging for the client, on top of any RUST_LOG filter.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Get the relations of one title.
    Lookup {
        platform: Platform,
        id: String,
        /// Media type, required for trakt and themoviedb.
        #[arg(long)]
        media_type: Option<MediaType>,
        #[arg(long)]
        season: Option<u32>,
        /// Print the resolved request path instead of fetching it.
        #[arg(long)]
        path_only: bool,
        /// Print only the ID on this platform.
        #[arg(long)]
        to: Option<Platform>,
    },
    /// Dump every relation on a platform.
    Dump {
        platform: Platform,
        /// Fetch the list form instead of the keyed mapping.
        #[arg(long)]
        list: bool,
    },
    /// Dump the full index of known titles.
    Index,
    Status,
    Heartbeat,
    /// Show when the dataset was last refreshed.
    Updated,
    /// Print the server revisions this client expects.
    Changes,
}

fn log_filter(base: EnvFilter, verbose: bool) -> EnvFilter {
    if !verbose {
        return base;
    }
    match "animeapi=debug".parse::<Directive>() {
        Ok(directive) => base.add_directive(directive),
        Err(_) => base,
    }
}

fn init_tracing(verbose: bool) {
    let base = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,animeapi=info"));
    let filter = log_filter(base, verbose);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn client_config(cli: &Cli, file: CliConfig) -> Result<ClientConfig, CliError> {
    let mut config = file.client;
    if cli.legacy {
        config.base_url = ClientConfig::from(ApiVersion::V2).base_url;
    }
    if let Some(base_url) = &cli.base_url {
        config.base_url = ClientConfig::with_base_url(base_url)?.base_url;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if cli.no_drift_warning {
        config.warn_on_drift = false;
    }
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = client_config(&cli, CliConfig::load()?)?;
    tracing::debug!(base_url = %config.base_url, version = ?config.version(), "Using AnimeAPI");
    let client = AnimeApiClient::new(config)?;

    match cli.command {
        Command::Lookup {
            platform,
            id,
            media_type,
            season,
            path_only,
            to,
        } => {
            let mut spec = RequestSpec::new(platform, id);
            spec.media_type = media_type;
            spec.season = season;

            if path_only {
                println!("{}", client.resolve_path(&spec).await?);
                return Ok(());
            }

            let relation = client.get_anime_relations(&spec).await?;
            match to {
                Some(target) => {
                    let id = relation.id(target).ok_or_else(|| CliError::NoRelation {
                        title: relation.title().to_string(),
                        platform: target.to_string(),
                    })?;
                    println!("{id}");
                }
                None => print_json(&relation)?,
            }
        }
        Command::Dump { platform, list } => {
            if list {
                print_json(&client.get_list_anime_relations(platform).await?)?;
            } else {
                print_json(&client.get_dict_anime_relations(platform).await?)?;
            }
        }
        Command::Index => print_json(&client.get_list_index().await?)?,
        Command::Status => print_json(&client.get_status().await?)?,
        Command::Heartbeat => print_json(&client.get_heartbeat().await?)?,
        Command::Updated => {
            let updated = client.get_updated_time().await?;
            let datetime = updated.datetime()?;
            print_json(&serde_json::json!({
                "message": updated.message(),
                "datetime": datetime.to_rfc3339(),
            }))?;
        }
        Command::Changes => print_json(&serde_json::json!({
            "revision": latest_revision(),
            "changes": KNOWN_CHANGES,
        }))?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
