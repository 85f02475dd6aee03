use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::RuntimeEnv, errors::Error, Result};

/// Initialize logging/tracing for the bot.
///
/// Default: debug for our crates in development, info in production, warn for
/// everything else. Can be overridden with `RUST_LOG`.
pub fn init(service_name: &str, env: RuntimeEnv) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name, env)));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(env == RuntimeEnv::Development)
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {e}")))
}

fn default_directives(service_name: &str, env: RuntimeEnv) -> String {
    let level = match env {
        RuntimeEnv::Development => "debug",
        RuntimeEnv::Production => "info",
    };
    format!(
        "warn,audit=info,{service_name}={level},rwb_core={level},rwb_http={level},rwb_telegram={level}"
    )
}
