use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use rwb_core::{
    config::Config,
    dispatcher::Dispatcher,
    features::{RatesFeature, WeatherFeature},
    messaging::port::MessagingPort,
    poller::{RetryBackoff, UpdateLoop},
    ports::{JsonTransport, UpdateSource},
    router::CommandRouter,
};
use rwb_http::HttpTransport;
use rwb_telegram::TelegramClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load().context("failed to load config")?;
    rwb_core::logging::init("rwb", cfg.env)?;

    let Some(token) = cfg.telegram_bot_token.clone() else {
        tracing::info!("No telegram bot token found");
        return Ok(());
    };

    let telegram = Arc::new(TelegramClient::new(token, cfg.poll_timeout)?);
    let messenger: Arc<dyn MessagingPort> = telegram.clone();
    let source: Arc<dyn UpdateSource> = telegram;
    let transport: Arc<dyn JsonTransport> = Arc::new(HttpTransport::new(cfg.http_timeout)?);

    let rates = Arc::new(RatesFeature::new(transport.clone(), cfg.rates_url.clone()));
    let weather = Arc::new(WeatherFeature::new(
        transport,
        cfg.weather_url.clone(),
        cfg.weather_city.clone(),
        cfg.weather_city_label.clone(),
        cfg.openweathermap_api_key.clone(),
    ));
    let router = CommandRouter::new(messenger.clone(), rates, weather);
    let dispatcher = Dispatcher::new(messenger, router);

    let mut poller = UpdateLoop::new(
        source,
        dispatcher,
        cfg.poll_timeout,
        RetryBackoff::new(cfg.poll_retry_base, cfg.poll_retry_max),
    );

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                return;
            }
            tracing::info!("shutdown requested");
            shutdown.cancel();
        });
    }

    tracing::info!(
        env = ?cfg.env,
        poll_timeout = ?cfg.poll_timeout,
        weather_city = %cfg.weather_city,
        "rwb started, polling for updates"
    );
    poller.run(shutdown).await;

    Ok(())
}
