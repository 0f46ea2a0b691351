use clap::{Parser, Subcommand};
use series_resolver::{
    CacheError, CacheStorage, CachedCatalogClient, CatalogClient, FetchOptions, ResolverError,
    SeriesResolver, Series, TVMAZE_BASE_URL, TvMazeClient,
};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Resolve TV series titles against the TVMaze catalog
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Base URL of the TVMaze-compatible API
    #[arg(long, global = true, default_value = TVMAZE_BASE_URL)]
    base_url: String,

    /// Always query the catalog instead of the local cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Hours until cached catalog responses expire
    #[arg(long, global = true, default_value_t = 24)]
    cache_ttl_hours: u64,

    /// Increase log output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List catalog search results for a title
    Search { title: String },
    /// Find the catalog entry matching a title
    Resolve { title: String },
    /// Print the id of the best guess for a title
    BestId { title: String },
    /// Fetch a series by catalog id
    Fetch {
        id: u32,
        /// Include the (corrected) episode list
        #[arg(long)]
        episodes: bool,
        /// Include cast members
        #[arg(long)]
        actors: bool,
        /// Include banner images
        #[arg(long)]
        banners: bool,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("series_resolver=debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_series(series: &Series) {
    println!("{} [{}]", series.name, series.id);
    if let Some(language) = &series.language {
        println!("  Language: {}", language);
    }
    if !series.actors.is_empty() {
        println!("  Actors: {}", series.actors.join(", "));
    }
    for banner in &series.banners {
        println!("  Banner: {}", banner);
    }

    let Some(episodes) = &series.episodes else {
        return;
    };

    println!("\n=== Episodes ({}) ===\n", episodes.len());
    for episode in episodes {
        println!(
            "S{:02}E{:02} - {} ({})",
            episode.season_number,
            episode.episode_number,
            episode.episode_name.as_deref().unwrap_or("Unknown"),
            episode
                .first_aired
                .map(|d| d.to_string())
                .unwrap_or_else(|| "not aired".to_string())
        );
    }
}

fn run<C: CatalogClient>(resolver: &SeriesResolver<C>, command: Command) -> Result<(), ResolverError> {
    match command {
        Command::Search { title } => {
            let results = resolver.search(&title)?;
            if results.is_empty() {
                println!("No results for '{}'.", title);
            }
            for result in results {
                println!("{:>8}  {}", result.id, result.series_name);
            }
        }
        Command::Resolve { title } => match resolver.resolve_by_title(&title)? {
            Some(result) => println!("{:>8}  {}", result.id, result.series_name),
            None => println!("No match for '{}'.", title),
        },
        Command::BestId { title } => {
            println!("{}", resolver.best_id(&title)?);
        }
        Command::Fetch {
            id,
            episodes,
            actors,
            banners,
        } => {
            let options = FetchOptions {
                include_episodes: episodes,
                include_actors: actors,
                include_banners: banners,
            };
            match resolver.fetch_with(id, &options)? {
                Some(series) => print_series(&series),
                None => println!("No series with id {}.", id),
            }
        }
    }

    Ok(())
}

/// Converts the TTL flag to a duration, saturating on absurd values
fn cache_ttl(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(60 * 60))
}

fn cached_client(
    client: TvMazeClient,
    ttl: Duration,
) -> Result<CachedCatalogClient<TvMazeClient>, CacheError> {
    Ok(CachedCatalogClient::new(
        client,
        CacheStorage::open("searches", Some(ttl))?,
        CacheStorage::open("series", Some(ttl))?,
    ))
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client = TvMazeClient::with_base_url(&cli.base_url);

    let result = if cli.no_cache {
        run(&SeriesResolver::new(client), cli.command)
    } else {
        match cached_client(client, cache_ttl(cli.cache_ttl_hours)) {
            Ok(cached) => run(&SeriesResolver::new(cached), cli.command),
            Err(e) => {
                eprintln!("Error: Failed to open cache: {}", e);
                eprintln!("Hint: use --no-cache to bypass the local cache");
                process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_ttl() {
        assert_eq!(cache_ttl(24), Duration::from_secs(24 * 60 * 60));
        assert_eq!(cache_ttl(0), Duration::ZERO);
        assert_eq!(cache_ttl(u64::MAX), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_cli_parses_fetch_flags() {
        let cli = Cli::parse_from([
            "series-resolver",
            "--cache-ttl-hours",
            "2",
            "fetch",
            "7",
            "--episodes",
        ]);
        assert_eq!(cli.cache_ttl_hours, 2);
        assert!(matches!(
            cli.command,
            Command::Fetch {
                id: 7,
                episodes: true,
                actors: false,
                banners: false
            }
        ));
    }
}
