use anyhow::{Context, Result};
use clap::Parser;
use std::{env, time::Duration};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3093;
const DEFAULT_URL_ARBITER: &str = "http://url-arbiter.dev.gov.uk";
const DEFAULT_CONTENT_STORE: &str = "http://content-store.dev.gov.uk";
const DEFAULT_DOWNSTREAM_TIMEOUT_SECS: u64 = 15;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub url_arbiter_url: String,
    pub content_store_url: String,
    pub downstream_timeout: Duration,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Publishing gateway in front of the URL arbiter and content store")]
pub struct Args {
    /// Host to bind to (overrides PUBLISHING_API_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Base URL of the URL arbiter (overrides URL_ARBITER)
    #[arg(long = "url-arbiter")]
    pub url_arbiter: Option<String>,

    /// Base URL of the content store (overrides CONTENT_STORE)
    #[arg(long = "content-store")]
    pub content_store: Option<String>,

    /// Timeout applied to every downstream call (overrides DOWNSTREAM_TIMEOUT_SECS)
    #[arg(long)]
    pub downstream_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::resolve(Args::parse(), |key| env::var(key))
    }

    /// Merge parsed CLI args over values read through `lookup`.
    pub fn resolve<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        // --- Environment fallback ---
        let env_host = lookup("PUBLISHING_API_HOST").unwrap_or_else(|_| DEFAULT_HOST.into());
        let env_port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let env_arbiter = lookup("URL_ARBITER").unwrap_or_else(|_| DEFAULT_URL_ARBITER.into());
        let env_store = lookup("CONTENT_STORE").unwrap_or_else(|_| DEFAULT_CONTENT_STORE.into());
        let env_timeout = parse_var(
            &lookup,
            "DOWNSTREAM_TIMEOUT_SECS",
            DEFAULT_DOWNSTREAM_TIMEOUT_SECS,
        )?;

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            url_arbiter_url: args.url_arbiter.unwrap_or(env_arbiter),
            content_store_url: args.content_store.unwrap_or(env_store),
            downstream_timeout: Duration::from_secs(
                args.downstream_timeout_secs.unwrap_or(env_timeout),
            ),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Result<String, env::VarError>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", key)),
    }
}
