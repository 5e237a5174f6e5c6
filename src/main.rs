// repocard CLI.
// Preload, serve, and manage the GitHub repository cache.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use repocard::cache::{CacheStore, Persisted};
use repocard::cache::default_cache_file;
use repocard::config::{Config, DEFAULT_EXTENSIONS, DEFAULT_RESPONSE_TTL};
use repocard::github::{GITHUB_API_BASE, GitHubClient};
use repocard::preload::Preloader;
use repocard::resolver::{CachedResolver, Resolver};
use repocard::scan::{ContentSource, DirectorySource, FileSource};
use repocard::{prerender, server};

#[derive(Parser, Debug)]
#[command(name = "repocard")]
#[command(about = "Caching proxy for GitHub repository cards")]
struct Args {
    /// GitHub token used for API requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Path of the JSON cache file
    #[arg(
        long,
        env = "REPOCARD_CACHE_FILE",
        default_value_os_t = default_cache_file(),
        global = true
    )]
    cache_file: PathBuf,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_BASE", default_value = GITHUB_API_BASE, global = true)]
    api_base: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct ContentArgs {
    /// Content directory scanned recursively
    #[arg(long, default_value = "content")]
    content_dir: PathBuf,

    /// Scan a single file instead of the content directory
    #[arg(long, conflicts_with = "content_dir")]
    file: Option<PathBuf>,

    /// Recognized content file extensions
    #[arg(
        long = "ext",
        default_values_t = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect::<Vec<_>>()
    )]
    extensions: Vec<String>,
}

impl ContentArgs {
    fn source(&self) -> Box<dyn ContentSource> {
        match &self.file {
            Some(file) => Box::new(FileSource::new(file)),
            None => Box::new(
                DirectorySource::new(&self.content_dir).with_extensions(self.extensions.clone()),
            ),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan content and fetch every referenced repository into the cache
    Preload(ContentArgs),
    /// Build hook: preload only when no cache exists yet; never fails
    Prerender(ContentArgs),
    /// Serve cache-first repository lookups over HTTP
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Seconds responses stay in the in-memory cache (0 disables it)
        #[arg(long, default_value_t = DEFAULT_RESPONSE_TTL.as_secs())]
        response_ttl: u64,
    },
    /// Resolve one repository and print it as JSON
    Get {
        /// Repository as owner/name
        repo: String,
    },
    /// Delete the cache file
    Clear,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    let config = Config {
        token: args.token,
        cache_file: args.cache_file,
        api_base: args.api_base,
    }
    .normalized();

    match run(config, args.command).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, command: Command) -> Result<ExitCode> {
    let store = CacheStore::file(&config.cache_file);
    let client = GitHubClient::from_config(&config)?;

    match command {
        Command::Preload(content) => {
            let source = content.source();
            match Preloader::new(&client, &store).run(source.as_ref()).await {
                Ok(_) => Ok(ExitCode::SUCCESS),
                // Already logged by the pipeline
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }
        Command::Prerender(content) => {
            let source = content.source();
            prerender::run(&client, &store, source.as_ref()).await;
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve {
            host,
            port,
            response_ttl,
        } => {
            info!(cache_file = %config.cache_file.display(), "Starting repocard server");
            let resolver = Resolver::new(store, Arc::new(client));
            let resolver = CachedResolver::new(resolver, Duration::from_secs(response_ttl));
            server::serve(resolver, &host, port).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Get { repo } => {
            let resolver = Resolver::new(store, Arc::new(client));
            let resolved = resolver.resolve(&repo).await?;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Clear => match store.clear() {
            Persisted::Written => {
                info!(path = %config.cache_file.display(), "Cache cleared");
                Ok(ExitCode::SUCCESS)
            }
            Persisted::Failed { .. } => Ok(ExitCode::FAILURE),
        },
    }
}
