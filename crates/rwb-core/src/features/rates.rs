use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    errors::Error,
    features::{decode, Feature},
    formatting::{format_decimal, round_half_up},
    ports::{HttpRequest, JsonTransport},
    Result,
};

const PAIRS_QUERY: &str =
    r#"select * from yahoo.finance.xchange where pair = "USDRUB,EURRUB""#;
const DATATABLES_ENV: &str = "store://datatables.org/alltableswithkeys";

/// `/ruble`: USD and EUR quotes against the ruble.
pub struct RatesFeature {
    transport: Arc<dyn JsonTransport>,
    url: String,
}

impl RatesFeature {
    pub fn new(transport: Arc<dyn JsonTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    fn request(&self) -> HttpRequest {
        HttpRequest::get(&self.url)
            .param("q", PAIRS_QUERY)
            .param("format", "json")
            .param("env", DATATABLES_ENV)
            .param("callback", "")
    }
}

#[async_trait]
impl Feature for RatesFeature {
    fn resource_label(&self) -> &'static str {
        "курса рубля"
    }

    async fn fetch_report(&self) -> Result<String> {
        let body = self.transport.get_json(&self.request()).await?;
        let quotes: QuoteResponse = decode(body)?;
        render(&quotes)
    }
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    query: QuoteQuery,
}

#[derive(Debug, Deserialize)]
struct QuoteQuery {
    results: Option<QuoteResults>,
}

#[derive(Debug, Deserialize)]
struct QuoteResults {
    rate: OneOrMany<Quote>,
}

/// The provider collapses a single-element array into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

#[derive(Debug, Deserialize)]
struct Quote {
    id: String,
    /// Sent as a numeric string; plain numbers are accepted too.
    #[serde(rename = "Rate")]
    rate: serde_json::Value,
}

fn render(resp: &QuoteResponse) -> Result<String> {
    let results = resp
        .query
        .results
        .as_ref()
        .ok_or_else(|| Error::Payload("quote source returned no results".to_string()))?;
    let quotes: Vec<&Quote> = match &results.rate {
        OneOrMany::Many(qs) => qs.iter().collect(),
        OneOrMany::One(q) => vec![q],
    };

    let usd = pair_rate(&quotes, "USDRUB")?;
    let eur = pair_rate(&quotes, "EURRUB")?;

    Ok(format!(
        "Доллар: <b>{}</b>,\nЕвро: <b>{}</b>",
        format_decimal(round_half_up(usd, 2)),
        format_decimal(round_half_up(eur, 2)),
    ))
}

fn pair_rate(quotes: &[&Quote], pair: &str) -> Result<f64> {
    let quote = quotes
        .iter()
        .find(|q| q.id == pair)
        .ok_or_else(|| Error::Payload(format!("no quote for {pair}")))?;

    let value = match &quote.rate {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Payload(format!("unusable rate for {pair}: {}", quote.rate)))
}
