#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::Level;

use crate::{
    constants::DEFAULT_UPCOMING_DAYS,
    gradebook::Gradebook,
    store::{PostgrestStore, RecordStore},
};

/// Supabase credentials loaded from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupabaseEnv {
    /// Fully qualified PostgREST endpoint.
    rest_endpoint: String,
    /// API key used for PostgREST requests.
    api_key:       String,
}

impl SupabaseEnv {
    /// Builds a Supabase credential bundle from the project URL and key.
    pub fn new(url: &str, key: &str) -> Self {
        let rest_endpoint = format!("{}/rest/v1", url.trim().trim_end_matches('/'));
        Self {
            rest_endpoint,
            api_key: key.trim().to_owned(),
        }
    }

    /// Returns the PostgREST endpoint.
    pub fn rest_endpoint(&self) -> &str {
        &self.rest_endpoint
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// Runtime configuration, built once at startup and passed to whatever needs
/// it.
#[derive(Clone, Debug)]
pub struct Config {
    /// Record store credentials.
    supabase:      SupabaseEnv,
    /// Look-ahead window for upcoming assignments, in days.
    upcoming_days: i64,
    /// Most verbose level the binary logs at.
    log_level:     Level,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    ///
    /// * `SUPABASE_URL`, `SUPABASE_ANON_KEY`: required
    /// * `COURSEBOOK_UPCOMING_DAYS`: optional, defaults to 7
    /// * `COURSEBOOK_LOG`: optional level name, defaults to `info`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let supabase = match (non_empty("SUPABASE_URL"), non_empty("SUPABASE_ANON_KEY")) {
            (Some(url), Some(key)) => SupabaseEnv::new(&url, &key),
            _ => {
                return Err(anyhow!(
                    "SUPABASE_URL and SUPABASE_ANON_KEY must be set to reach the record store."
                ));
            }
        };

        let upcoming_days = match non_empty("COURSEBOOK_UPCOMING_DAYS") {
            Some(v) => v
                .trim()
                .parse::<i64>()
                .with_context(|| format!("COURSEBOOK_UPCOMING_DAYS is not a number: {v}"))?,
            None => DEFAULT_UPCOMING_DAYS,
        };

        let log_level = match non_empty("COURSEBOOK_LOG") {
            Some(v) => v
                .trim()
                .parse::<Level>()
                .map_err(|_| anyhow!("COURSEBOOK_LOG is not a log level: {v}"))?,
            None => Level::INFO,
        };

        Ok(Self {
            supabase,
            upcoming_days,
            log_level,
        })
    }

    /// Returns the record store credentials.
    pub fn supabase(&self) -> &SupabaseEnv {
        &self.supabase
    }

    /// Returns the upcoming-assignments window in days.
    pub fn upcoming_days(&self) -> i64 {
        self.upcoming_days
    }

    /// Returns the configured log level.
    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// Builds a PostgREST store from the configured credentials.
    pub fn record_store(&self) -> PostgrestStore {
        PostgrestStore::new(self.supabase.rest_endpoint(), self.supabase.api_key())
    }

    /// Builds a gradebook over the configured record store.
    pub fn gradebook(&self) -> Gradebook {
        let store: Arc<dyn RecordStore> = Arc::new(self.record_store());
        Gradebook::new(store)
    }
}
