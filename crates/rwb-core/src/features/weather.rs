use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    errors::Error,
    features::{decode, Feature},
    formatting::{format_reading, hpa_to_mmhg},
    ports::{HttpRequest, JsonTransport},
    Result,
};

/// `/weather`: current conditions for one fixed city.
pub struct WeatherFeature {
    transport: Arc<dyn JsonTransport>,
    url: String,
    city: String,
    city_label: String,
    api_key: String,
}

impl WeatherFeature {
    pub fn new(
        transport: Arc<dyn JsonTransport>,
        url: impl Into<String>,
        city: impl Into<String>,
        city_label: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            url: url.into(),
            city: city.into(),
            city_label: city_label.into(),
            api_key: api_key.into(),
        }
    }

    fn request(&self) -> HttpRequest {
        HttpRequest::get(&self.url)
            .param("q", &self.city)
            .param("units", "metric")
            .param("APPID", &self.api_key)
    }
}

#[async_trait]
impl Feature for WeatherFeature {
    fn resource_label(&self) -> &'static str {
        "погоды"
    }

    async fn fetch_report(&self) -> Result<String> {
        let body = self.transport.get_json(&self.request()).await?;

        // Error bodies look like {"cod": 401, "message": "Invalid API key"}.
        if body.get("main").is_none() {
            if let Some(message) = body.get("message").and_then(|m| m.as_str()) {
                return Err(Error::Payload(message.to_string()));
            }
        }

        let current: CurrentWeather = decode(body)?;

        Ok(format!(
            "Погода в {}:\nТемпература: <b>{}</b> °\nВлажность: <b>{}</b> %\nАтмосферное давление: <b>{}</b> мм",
            self.city_label,
            format_reading(current.main.temp),
            format_reading(current.main.humidity),
            hpa_to_mmhg(current.main.pressure),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainReadings,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    pressure: f64,
    humidity: f64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedTransport;

    fn feature(transport: Arc<ScriptedTransport>) -> WeatherFeature {
        WeatherFeature::new(transport, "http://weather.test/data", "Moscow", "Москве", "k3y")
    }

    #[tokio::test]
    async fn formats_three_line_report() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_ok(json!({
            "name": "Moscow",
            "main": { "temp": 12.5, "pressure": 1013, "humidity": 81 }
        }));

        let report = feature(transport.clone()).fetch_report().await.unwrap();
        assert_eq!(
            report,
            "Погода в Москве:\nТемпература: <b>12.5</b> °\nВлажность: <b>81</b> %\nАтмосферное давление: <b>760</b> мм"
        );

        let reqs = transport.requests();
        assert_eq!(
            reqs[0].query,
            vec![
                ("q".to_string(), "Moscow".to_string()),
                ("units".to_string(), "metric".to_string()),
                ("APPID".to_string(), "k3y".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn float_readings_print_like_integers_when_whole() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_ok(json!({
            "main": { "temp": 3.0, "pressure": 1012.5, "humidity": 70.0 }
        }));

        let report = feature(transport).fetch_report().await.unwrap();
        assert!(report.contains("Температура: <b>3</b> °"));
        assert!(report.contains("Влажность: <b>70</b> %"));
        assert!(report.contains("Атмосферное давление: <b>759</b> мм"));
    }

    #[tokio::test]
    async fn provider_error_message_becomes_payload_error() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_ok(json!({ "cod": 401, "message": "Invalid API key" }));

        let err = feature(transport).fetch_report().await.unwrap_err();
        assert!(matches!(err, Error::Payload(ref m) if m == "Invalid API key"));
    }

    #[tokio::test]
    async fn missing_fields_are_payload_errors() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_ok(json!({ "main": { "temp": 1 } }));

        let err = feature(transport).fetch_report().await.unwrap_err();
        assert!(matches!(err, Error::Payload(_)));
    }
}
