use std::time::Duration;

const ENV_HOST: &str = "PAPERTRAIL_HOST";
const ENV_PORT: &str = "PAPERTRAIL_PORT";
const ENV_TTL_SECONDS: &str = "PAPERTRAIL_TTL_SECONDS";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Sliding TTL window applied to all job-scoped state (2 hours).
pub const DEFAULT_TTL_SECONDS: u64 = 7200;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Sliding expiration window for jobs, claim buffers and verifications
    pub ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// - `PAPERTRAIL_HOST` - bind host (default: 127.0.0.1)
    /// - `PAPERTRAIL_PORT` - bind port (default: 8080)
    /// - `PAPERTRAIL_TTL_SECONDS` - sliding TTL window (default: 7200)
    pub fn from_env() -> Self {
        let host = std::env::var(ENV_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = std::env::var(ENV_PORT)
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let ttl_seconds = std::env::var(ENV_TTL_SECONDS)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECONDS);

        Self {
            host,
            port,
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
