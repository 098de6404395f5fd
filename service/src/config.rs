use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default timeout for a single token endpoint request.
pub const DEFAULT_TOKEN_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// Postgresql URL of the durable account store. When unset, accounts are
    /// kept in process memory only.
    #[arg(short, long, env)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool
    #[arg(long, env, default_value_t = 20)]
    pub db_max_connections: u32,

    /// Minimum number of idle database connections to maintain
    #[arg(long, env, default_value_t = 2)]
    pub db_min_connections: u32,

    /// Timeout in seconds for establishing a new database connection
    #[arg(long, env, default_value_t = 8)]
    pub db_connect_timeout_secs: u64,

    /// Timeout in seconds for acquiring a connection from the pool
    #[arg(long, env, default_value_t = 8)]
    pub db_acquire_timeout_secs: u64,

    /// Seconds before an idle connection is closed
    #[arg(long, env, default_value_t = 600)]
    pub db_idle_timeout_secs: u64,

    /// Maximum lifetime in seconds for any connection in the pool
    #[arg(long, env, default_value_t = 1800)]
    pub db_max_lifetime_secs: u64,

    /// Timeout in seconds for a single request to a platform token endpoint
    #[arg(long, env, default_value_t = DEFAULT_TOKEN_REQUEST_TIMEOUT_SECS)]
    pub token_request_timeout_secs: u64,

    #[arg(long, env)]
    youtube_client_id: Option<String>,
    #[arg(long, env)]
    youtube_client_secret: Option<String>,

    #[arg(long, env)]
    twitter_client_id: Option<String>,
    #[arg(long, env)]
    twitter_client_secret: Option<String>,

    #[arg(long, env)]
    instagram_client_id: Option<String>,
    #[arg(long, env)]
    instagram_client_secret: Option<String>,

    #[arg(long, env)]
    linkedin_client_id: Option<String>,
    #[arg(long, env)]
    linkedin_client_secret: Option<String>,

    #[arg(long, env)]
    tiktok_client_id: Option<String>,
    #[arg(long, env)]
    tiktok_client_secret: Option<String>,

    #[arg(long, env)]
    facebook_client_id: Option<String>,
    #[arg(long, env)]
    facebook_client_secret: Option<String>,

    #[arg(long, env)]
    pinterest_client_id: Option<String>,
    #[arg(long, env)]
    pinterest_client_secret: Option<String>,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap_or(LevelFilter::Info)),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap_or(RustEnv::Development)),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// The durable store URL, if one was configured. Blank values count as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// OAuth client id and secret for a platform identifier such as `"youtube"`.
    ///
    /// Returns `None` unless both halves are present and non-blank.
    pub fn client_credentials(&self, platform: &str) -> Option<(String, String)> {
        let (id, secret) = match platform.to_lowercase().as_str() {
            "youtube" => (&self.youtube_client_id, &self.youtube_client_secret),
            "twitter" => (&self.twitter_client_id, &self.twitter_client_secret),
            "instagram" => (&self.instagram_client_id, &self.instagram_client_secret),
            "linkedin" => (&self.linkedin_client_id, &self.linkedin_client_secret),
            "tiktok" => (&self.tiktok_client_id, &self.tiktok_client_secret),
            "facebook" => (&self.facebook_client_id, &self.facebook_client_secret),
            "pinterest" => (&self.pinterest_client_id, &self.pinterest_client_secret),
            _ => return None,
        };

        match (id.as_deref(), secret.as_deref()) {
            (Some(id), Some(secret)) if !id.trim().is_empty() && !secret.trim().is_empty() => {
                Some((id.to_string(), secret.to_string()))
            }
            _ => None,
        }
    }

    pub fn token_request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.token_request_timeout_secs)
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["repurpose_platform"];
        argv.extend_from_slice(args);
        Config::parse_from(argv)
    }

    #[test]
    fn token_request_timeout_defaults_to_thirty_seconds() {
        let config = parse(&[]);
        assert_eq!(
            config.token_request_timeout(),
            std::time::Duration::from_secs(DEFAULT_TOKEN_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn token_request_timeout_is_configurable() {
        let config = parse(&["--token-request-timeout-secs", "5"]);
        assert_eq!(config.token_request_timeout(), std::time::Duration::from_secs(5));
    }

    #[test]
    fn blank_database_url_counts_as_unset() {
        let config = parse(&["--database-url", "  "]);
        assert_eq!(config.database_url(), None);

        let config = parse(&["--database-url", "postgres://localhost/repurpose"]);
        assert_eq!(config.database_url(), Some("postgres://localhost/repurpose"));
    }

    #[test]
    fn client_credentials_require_both_halves() {
        let config = parse(&[
            "--twitter-client-id",
            "tw-id",
            "--twitter-client-secret",
            "tw-secret",
            "--tiktok-client-id",
            "tt-id",
            "--tiktok-client-secret",
            " ",
        ]);

        assert_eq!(
            config.client_credentials("twitter"),
            Some(("tw-id".to_string(), "tw-secret".to_string()))
        );
        assert_eq!(config.client_credentials("TikTok"), None);
        assert_eq!(config.client_credentials("myspace"), None);
    }

    #[test]
    fn runtime_env_parses_case_insensitively() {
        assert_eq!("PRODUCTION".parse::<RustEnv>(), Ok(RustEnv::Production));
        assert_eq!("staging".parse::<RustEnv>(), Ok(RustEnv::Staging));
        assert_eq!("qa".parse::<RustEnv>(), Err(RustEnvParseError));
    }

    #[test]
    fn runtime_env_flag_accepts_either_case() {
        assert_eq!(parse(&["--runtime-env", "PRODUCTION"]).runtime_env(), RustEnv::Production);
        assert_eq!(parse(&[]).runtime_env(), RustEnv::Development);
    }
}
