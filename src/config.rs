//! Process configuration from environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_WORDS_PATH: &str = "data/words.json";
const DEFAULT_PROGRESS_PATH: &str = "data/progress.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: IpAddr,
    pub port: u16,
    /// Optional word list; the built-in list is used when unusable
    pub words_path: PathBuf,
    /// Durable conversation progress
    pub progress_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            words_path: PathBuf::from(DEFAULT_WORDS_PATH),
            progress_path: PathBuf::from(DEFAULT_PROGRESS_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind: lookup("DAILY_WORD_BIND")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind),
            port: lookup("DAILY_WORD_PORT")
                .or_else(|| lookup("PORT"))
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            words_path: lookup("DAILY_WORD_WORDS_PATH")
                .map_or(defaults.words_path, PathBuf::from),
            progress_path: lookup("DAILY_WORD_PROGRESS_PATH")
                .map_or(defaults.progress_path, PathBuf::from),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
