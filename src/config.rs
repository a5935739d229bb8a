//! Environment-driven server settings.

use std::env;
use std::net::{Ipv4Addr, SocketAddr};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB: &str = "todos.redb";

/// Server settings, resolved once at boot.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub db_path: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            db_path: DEFAULT_DB.to_string(),
        }
    }
}

impl Config {
    /// Read `TICKLIST_ADDR` and `TICKLIST_DB`, falling back to defaults.
    /// A malformed address is reported and replaced, never fatal.
    pub fn from_env() -> Config {
        let defaults = Config::default();

        let bind = match env::var("TICKLIST_ADDR") {
            Ok(raw) => match raw.parse() {
                Ok(addr) => addr,
                Err(_) => {
                    tracing::warn!(
                        "TICKLIST_ADDR {raw:?} is not a socket address, using {}",
                        defaults.bind
                    );
                    defaults.bind
                }
            },
            Err(_) => defaults.bind,
        };

        let db_path = env::var("TICKLIST_DB").unwrap_or(defaults.db_path);

        Config { bind, db_path }
    }
}

// ── Tests ──────────────────────────────────────────────────────
