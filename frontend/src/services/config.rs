use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use shared::SupabaseConfig;

/// Settings baked into the bundle at build time.
///
/// A wasm bundle has no process environment, so values come from `option_env!`
/// when `trunk build` runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub supabase: SupabaseConfig,
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            option_env!("FARMLOG_SUPABASE_URL"),
            option_env!("FARMLOG_SUPABASE_ANON_KEY"),
            option_env!("FARMLOG_TABLE"),
            option_env!("FARMLOG_LOG_LEVEL"),
        )
    }

    pub fn from_values(
        url: Option<&str>,
        anon_key: Option<&str>,
        table: Option<&str>,
        log_level: Option<&str>,
    ) -> Result<Self> {
        let supabase = SupabaseConfig::new(url.unwrap_or_default(), anon_key.unwrap_or_default(), table)
            .context("Invalid Supabase configuration")?;

        let log_level = match log_level.map(str::trim).filter(|level| !level.is_empty()) {
            Some(level) => level
                .parse::<LevelFilter>()
                .map_err(|_| anyhow!("Unknown log level: {}", level))?,
            None => LevelFilter::Info,
        };

        Ok(Self { supabase, log_level })
    }
}
