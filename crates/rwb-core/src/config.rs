use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

pub const DEFAULT_RATES_URL: &str = "https://query.yahooapis.com/v1/public/yql";
pub const DEFAULT_WEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

/// Which deployment the process runs as. Only affects logging defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Production,
}

impl RuntimeEnv {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

/// Typed configuration for the bot.
#[derive(Clone, Debug)]
pub struct Config {
    pub env: RuntimeEnv,

    // Credentials
    pub telegram_bot_token: Option<String>,
    pub openweathermap_api_key: String,

    // Update loop
    pub poll_timeout: Duration,
    pub poll_retry_base: Duration,
    pub poll_retry_max: Duration,

    // Secondary APIs
    pub http_timeout: Duration,
    pub rates_url: String,
    pub weather_url: String,
    pub weather_city: String,
    pub weather_city_label: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(env_str)
    }

    /// Build the config from an arbitrary variable lookup (the process env in `load`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = match lookup("RWB_ENV") {
            Some(raw) => RuntimeEnv::parse(&raw)
                .ok_or_else(|| Error::Config(format!("RWB_ENV has unknown value: {raw}")))?,
            None => RuntimeEnv::Production,
        };

        // Both credentials are optional: no token disables polling, no weather key
        // surfaces later as a handler-level fetch failure.
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").and_then(non_empty);
        let openweathermap_api_key = lookup("OPENWEATHERMAP_API_KEY").unwrap_or_default();

        let poll_timeout =
            Duration::from_secs(parse_u64(&lookup, "POLL_TIMEOUT_SECS")?.unwrap_or(5));
        let poll_retry_base =
            Duration::from_millis(parse_u64(&lookup, "POLL_RETRY_BASE_MS")?.unwrap_or(250));
        let poll_retry_max =
            Duration::from_millis(parse_u64(&lookup, "POLL_RETRY_MAX_MS")?.unwrap_or(5_000));
        if poll_retry_max < poll_retry_base {
            return Err(Error::Config(
                "POLL_RETRY_MAX_MS must not be lower than POLL_RETRY_BASE_MS".to_string(),
            ));
        }

        let http_timeout =
            Duration::from_secs(parse_u64(&lookup, "HTTP_TIMEOUT_SECS")?.unwrap_or(10));

        let rates_url = lookup("RATES_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_RATES_URL.to_string());
        let weather_url = lookup("WEATHER_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_WEATHER_URL.to_string());
        let weather_city = lookup("WEATHER_CITY")
            .and_then(non_empty)
            .unwrap_or_else(|| "Moscow".to_string());
        let weather_city_label = lookup("WEATHER_CITY_LABEL")
            .and_then(non_empty)
            .unwrap_or_else(|| "Москве".to_string());

        Ok(Self {
            env,
            telegram_bot_token,
            openweathermap_api_key,
            poll_timeout,
            poll_retry_base,
            poll_retry_max,
            http_timeout,
            rates_url,
            weather_url,
            weather_city,
            weather_city_label,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| Error::Config(format!("{key} must be a non-negative integer: {e}")))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
