//! Command line and environment configuration.

use clap::Parser;
use identicon_common::Rgb;
use renderer::DEFAULT_PATCH_SIZE;

/// Default lifetime of identicons requested with an explicit code.
pub const DEFAULT_EXPIRES_SECS: u64 = 24 * 60 * 60;

#[derive(Parser, Debug, Clone)]
#[command(name = "identicon-api")]
#[command(about = "Nine-block identicon HTTP server")]
pub struct Args {
    /// Listen address
    #[arg(short, long, env = "IDENTICON_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Log level
    #[arg(long, env = "IDENTICON_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "TOKIO_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Salt for codes derived from client addresses. Should be fairly long.
    #[arg(long, env = "IDENTICON_SALT", hide_env_values = true)]
    pub salt: String,

    /// Second version field in ETags. Bump it to make clients refetch every
    /// identicon.
    #[arg(long, env = "IDENTICON_CACHE_VERSION", default_value_t = 0)]
    pub cache_version: u32,

    /// Seconds until identicons with an explicit code expire on the client
    #[arg(long, env = "IDENTICON_EXPIRES_SECS", default_value_t = DEFAULT_EXPIRES_SECS)]
    pub expires_secs: u64,

    /// Patch size in pixels of the source canvas (3x3 patches)
    #[arg(long, env = "IDENTICON_PATCH_SIZE", default_value_t = DEFAULT_PATCH_SIZE)]
    pub patch_size: u32,

    /// Background color (#rrggbb)
    #[arg(long, env = "IDENTICON_BACKGROUND", default_value = "#ffffff")]
    pub background: Rgb,

    /// In-memory PNG cache size in MB (0 disables caching)
    #[arg(long, env = "IDENTICON_CACHE_SIZE_MB", default_value_t = 64)]
    pub cache_size_mb: usize,

    /// Seconds a cached PNG stays valid
    #[arg(long, env = "IDENTICON_CACHE_TTL_SECS", default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Use the first X-Forwarded-For address as the client address
    #[arg(long, env = "IDENTICON_TRUST_FORWARDED_FOR")]
    pub trust_forwarded_for: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["identicon-api", "--salt", "pepper"]).unwrap();
        assert_eq!(args.listen, "0.0.0.0:8080");
        assert_eq!(args.patch_size, DEFAULT_PATCH_SIZE);
        assert_eq!(args.background, Rgb::WHITE);
        assert_eq!(args.expires_secs, DEFAULT_EXPIRES_SECS);
        assert_eq!(args.cache_version, 0);
        assert!(!args.trust_forwarded_for);
    }

    #[test]
    fn test_background_parsing() {
        let args = Args::try_parse_from([
            "identicon-api",
            "--salt",
            "pepper",
            "--background",
            "#102030",
        ])
        .unwrap();
        assert_eq!(args.background, Rgb::new(0x10, 0x20, 0x30));

        let bad = Args::try_parse_from([
            "identicon-api",
            "--salt",
            "pepper",
            "--background",
            "not-a-color",
        ]);
        assert!(bad.is_err());
    }
}
