use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Table holding the animal records
pub const DEFAULT_TABLE: &str = "kambing";

/// Connection settings for the hosted Supabase project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL without trailing slash, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Public anon key sent as `apikey` on every request
    pub anon_key: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Supabase URL is not configured")]
    MissingUrl,
    #[error("Supabase anon key is not configured")]
    MissingAnonKey,
    #[error("Supabase URL must start with http:// or https://, got {0}")]
    InvalidUrl(String),
    #[error("Table name must not be empty")]
    MissingTable,
}

impl SupabaseConfig {
    /// Validate and normalize the settings
    pub fn new(url: &str, anon_key: &str, table: Option<&str>) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }

        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return Err(ConfigError::MissingAnonKey);
        }

        let table = match table.map(str::trim) {
            None => DEFAULT_TABLE,
            Some("") => return Err(ConfigError::MissingTable),
            Some(table) => table,
        };

        Ok(Self {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
            table: table.to_string(),
        })
    }

    /// PostgREST endpoint of the records table
    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }

    /// GoTrue endpoint, `path` without leading slash (e.g. `token`)
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url, path)
    }
}
