// ============================================================================
// Module : api
// ============================================================================
// Clients HTTP des deux collaborateurs externes :
// - le backend de prix (taux principaux + conversion)
// - CoinGecko (taux des devises additionnelles)
// ============================================================================

pub mod backend;    // Client du backend de prix
pub mod coingecko;  // Client CoinGecko

// Re-export des clients
pub use backend::{BackendClient, HealthStatus};
pub use coingecko::CoinGeckoClient;

use anyhow::{Context, Result};

use crate::config::Config;

/// Construit le client HTTP partagé par les deux APIs
///
/// Pas de timeout explicite : on garde ceux du transport.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .context("Échec de la création du client HTTP")
}
