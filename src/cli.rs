//! Command-line interface definitions.
//!
//! Global options configure the fetch layer and output; each subcommand names
//! what to look up. Fetch options override values read from `--config`.

use crate::config::FetchConfig;
use clap::{Parser, Subcommand};

/// Look up catalog metadata from supported sites.
///
/// # Examples
///
/// ```sh
/// # Movie by id or homepage
/// catalog_scrape movie heyzo-1234
/// catalog_scrape movie https://www.heyzo.com/moviepages/1234/index.html
///
/// # Performer profile, also written to ./out/xslist/5589.json
/// catalog_scrape --output-dir ./out actor 5589
///
/// # Performer search through a proxy
/// catalog_scrape --proxy socks5://127.0.0.1:1080 search-actor "Jane Doe"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML fetch configuration file
    #[arg(short, long, global = true, env = "CATALOG_SCRAPE_CONFIG")]
    pub config: Option<String>,

    /// Also write each record as JSON under this directory
    #[arg(short, long, global = true, env = "CATALOG_SCRAPE_OUTPUT_DIR")]
    pub output_dir: Option<String>,

    /// Fixed user agent; a random browser agent is used otherwise
    #[arg(long, global = true, env = "CATALOG_SCRAPE_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Retries for transient fetch failures
    #[arg(long, global = true)]
    pub retries: Option<usize>,

    /// HTTP or SOCKS proxy URL
    #[arg(long, global = true, env = "CATALOG_SCRAPE_PROXY")]
    pub proxy: Option<String>,

    /// Inputs processed at the same time
    #[arg(long, global = true, default_value_t = 4)]
    pub concurrency: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Fetch movie records by id or homepage URL
    Movie {
        #[arg(required = true, value_name = "ID_OR_URL")]
        inputs: Vec<String>,

        #[arg(short, long, default_value = "heyzo")]
        provider: String,
    },

    /// Fetch performer profiles by id or homepage URL
    Actor {
        #[arg(required = true, value_name = "ID_OR_URL")]
        inputs: Vec<String>,

        #[arg(short, long, default_value = "xslist")]
        provider: String,
    },

    /// Search a provider's performer catalog
    SearchActor {
        keyword: String,

        #[arg(short, long, default_value = "xslist")]
        provider: String,
    },
}

impl Cli {
    /// Apply command-line fetch overrides on top of `base`.
    pub fn fetch_config(&self, base: FetchConfig) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone().or(base.user_agent),
            timeout_secs: self.timeout_secs.unwrap_or(base.timeout_secs),
            max_retries: self.retries.unwrap_or(base.max_retries),
            proxy: self.proxy.clone().or(base.proxy),
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_command_defaults() {
        let cli = Cli::parse_from(["catalog_scrape", "movie", "heyzo-1234", "5678"]);

        assert_eq!(
            cli.command,
            Command::Movie {
                inputs: vec!["heyzo-1234".to_string(), "5678".to_string()],
                provider: "heyzo".to_string(),
            }
        );
        assert_eq!(cli.output_dir, None);
        assert_eq!(cli.concurrency, 4);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "catalog_scrape",
            "actor",
            "5589",
            "-p",
            "XsList",
            "--output-dir",
            "/tmp/out",
            "--retries",
            "0",
        ]);

        assert_eq!(
            cli.command,
            Command::Actor {
                inputs: vec!["5589".to_string()],
                provider: "XsList".to_string(),
            }
        );
        assert_eq!(cli.output_dir.as_deref(), Some("/tmp/out"));
        assert_eq!(cli.retries, Some(0));
    }

    #[test]
    fn test_search_actor_command() {
        let cli = Cli::parse_from(["catalog_scrape", "search-actor", "Jane Doe"]);
        assert_eq!(
            cli.command,
            Command::SearchActor {
                keyword: "Jane Doe".to_string(),
                provider: "xslist".to_string(),
            }
        );
    }

    #[test]
    fn test_movie_requires_input() {
        assert!(Cli::try_parse_from(["catalog_scrape", "movie"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let cli = Cli::parse_from([
            "catalog_scrape",
            "--timeout-secs",
            "5",
            "--user-agent",
            "test-agent",
            "movie",
            "1",
        ]);
        let base = FetchConfig {
            timeout_secs: 60,
            max_retries: 7,
            proxy: Some("http://127.0.0.1:8080".to_string()),
            ..FetchConfig::default()
        };
        let merged = cli.fetch_config(base);

        assert_eq!(merged.timeout_secs, 5);
        assert_eq!(merged.user_agent.as_deref(), Some("test-agent"));
        assert_eq!(merged.max_retries, 7);
        assert_eq!(merged.accept_language, FetchConfig::default().accept_language);
        // only overridden when the flag or env var is present
        if std::env::var_os("CATALOG_SCRAPE_PROXY").is_none() {
            assert_eq!(merged.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        }
    }
}
