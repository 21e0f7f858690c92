// ============================================================================
// API Client : backend de prix
// ============================================================================
// Endpoints utilisés :
// - GET  {base}/prices/latest  → derniers taux BTC/USD et BTC/EUR
// - POST {base}/convert        → conversion d'un montant BTC (arrondi backend)
// - GET  {base}/health         → statut et version (sonde au démarrage)
//
// Toutes les réponses métier sont enveloppées :
//   { "success": bool, "data": {...}, "error": "..." }
// Un statut HTTP hors 2xx OU success=false est un échec.
// ============================================================================

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::models::{ConversionResult, RatePair};

/// Enveloppe commune des réponses du backend
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// Corps de la requête de conversion
#[derive(Debug, Serialize)]
struct ConvertRequest {
    btc_amount: f64,
}

/// Réponse de /health (non enveloppée)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Client du backend de prix
///
/// CONCEPT RUST : Clone bon marché
/// - reqwest::Client est un Arc interne : cloner partage le pool de connexions
/// - Le worker clone le client pour chaque tâche
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Récupère les derniers taux
    #[instrument(skip(self), fields(base = %self.base_url))]
    pub async fn latest_prices(&self) -> Result<RatePair> {
        let url = self.url("prices/latest");
        debug!(url = %url, "Fetching latest prices");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Échec de la requête HTTP vers /prices/latest")?;

        let rates: RatePair = read_envelope(response, "/prices/latest").await?;
        info!(btc_usd = rates.btc_usd, btc_eur = rates.btc_eur, "Latest prices received");
        Ok(rates)
    }

    /// Demande au backend la contre-valeur USD/EUR de `btc_amount`
    #[instrument(skip(self), fields(base = %self.base_url))]
    pub async fn convert(&self, btc_amount: f64) -> Result<ConversionResult> {
        let url = self.url("convert");
        debug!(url = %url, "Sending conversion request");

        let response = self
            .http
            .post(&url)
            .json(&ConvertRequest { btc_amount })
            .send()
            .await
            .context("Échec de la requête HTTP vers /convert")?;

        let result: ConversionResult = read_envelope(response, "/convert").await?;
        info!(usd = result.usd_amount, eur = result.eur_amount, "Conversion received");
        Ok(result)
    }

    /// Sonde de santé du backend
    #[instrument(skip(self), fields(base = %self.base_url))]
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .http
            .get(self.url("health"))
            .send()
            .await
            .context("Échec de la requête HTTP vers /health")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Le backend a retourné une erreur : HTTP {}", status);
        }

        response
            .json()
            .await
            .context("Échec du parsing JSON de /health")
    }
}

/// Vérifie le statut HTTP puis déballe l'enveloppe { success, data, error }
///
/// CONCEPT RUST : DeserializeOwned
/// - Le type T est désérialisé sans emprunter le buffer de la réponse
async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response, endpoint: &str) -> Result<T> {
    let status = response.status();
    debug!(status = %status, endpoint, "Received HTTP response");

    let body = response
        .text()
        .await
        .with_context(|| format!("Échec de la lecture de la réponse {}", endpoint))?;

    if !status.is_success() {
        // Le backend renvoie souvent une enveloppe d'erreur même en 4xx/5xx
        let detail = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or(body);
        error!(status = %status, endpoint, detail = %detail, "Backend returned error status");
        anyhow::bail!("{} a retourné HTTP {} : {}", endpoint, status, detail);
    }

    let envelope: Envelope<T> = serde_json::from_str(&body)
        .with_context(|| format!("Échec du parsing JSON de la réponse {}", endpoint))?;

    unwrap_envelope(envelope, endpoint)
}

fn unwrap_envelope<T>(envelope: Envelope<T>, endpoint: &str) -> Result<T> {
    if !envelope.success {
        let detail = envelope.error.unwrap_or_else(|| "raison inconnue".to_string());
        anyhow::bail!("{} a répondu success=false : {}", endpoint, detail);
    }

    envelope
        .data
        .with_context(|| format!("{} a répondu success=true sans data", endpoint))
}

// ============================================================================
// Tests unitaires
// ============================================================================
