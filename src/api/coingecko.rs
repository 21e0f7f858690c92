// ============================================================================
// API Client : CoinGecko (taux des devises additionnelles)
// ============================================================================
// Une seule requête groupée pour toutes les devises sélectionnées :
//   GET {base}/simple/price?ids=bitcoin&vs_currencies=jpy,chf,gbp
//   → { "bitcoin": { "jpy": 9800000, "chf": 58000, ... } }
//
// Les codes absents de la réponse valent 0 (taux inconnu).
// ============================================================================

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Réponse de /simple/price pour l'id "bitcoin"
#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: Option<HashMap<String, f64>>,
}

/// Client CoinGecko
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Prix de 1 BTC dans chacune des devises `codes`
    ///
    /// Les clés du résultat sont les codes en majuscules (ex: "JPY").
    #[instrument(skip(self), fields(count = codes.len()))]
    pub async fn bitcoin_prices(&self, codes: &[String]) -> Result<HashMap<String, f64>> {
        if codes.is_empty() {
            return Ok(HashMap::new());
        }

        let url = build_simple_price_url(&self.base_url, codes);
        debug!(url = %url, "Built CoinGecko URL");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Échec de la requête HTTP vers CoinGecko")?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "CoinGecko returned error status");
            anyhow::bail!("CoinGecko a retourné une erreur : HTTP {}", status);
        }

        let body: SimplePriceResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse CoinGecko")?;

        let rates = parse_simple_price(body, codes)?;
        info!(currencies = rates.len(), "Additional rates received");
        Ok(rates)
    }
}

/// Construit l'URL groupée (codes en minuscules, séparés par des virgules)
fn build_simple_price_url(base_url: &str, codes: &[String]) -> String {
    let vs_currencies = codes
        .iter()
        .map(|code| code.to_lowercase())
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{}/simple/price?ids=bitcoin&vs_currencies={}",
        base_url, vs_currencies
    )
}

/// Associe chaque code demandé à son taux (0 si absent)
fn parse_simple_price(response: SimplePriceResponse, codes: &[String]) -> Result<HashMap<String, f64>> {
    let prices = response
        .bitcoin
        .context("Pas de cotation \"bitcoin\" dans la réponse CoinGecko")?;

    Ok(codes
        .iter()
        .map(|code| {
            let rate = prices.get(&code.to_lowercase()).copied().unwrap_or(0.0);
            (code.to_uppercase(), rate)
        })
        .collect())
}

// ============================================================================
// Tests unitaires
// ============================================================================
