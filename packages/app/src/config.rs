//! Environment-driven configuration.

use std::path::PathBuf;

use anyhow::Result;

const DEFAULT_SESSION_FILE: &str = ".entagen-session.json";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the durable session (user id + verification flag) lives.
    pub session_file: PathBuf,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let session_file = std::env::var("ENTAGEN_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));

        Ok(Self { session_file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_file_env_override() {
        std::env::set_var("ENTAGEN_SESSION_FILE", "/tmp/custom-session.json");
        let config = Config::from_env().unwrap();
        assert_eq!(
            config.session_file,
            PathBuf::from("/tmp/custom-session.json")
        );
        std::env::remove_var("ENTAGEN_SESSION_FILE");
    }
}
