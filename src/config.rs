// ============================================================================
// Configuration
// ============================================================================
// Une seule variable d'environnement : l'URL du backend de prix.
// Le reste (CoinGecko, délais) a des valeurs fixes, regroupées ici pour que
// les tests puissent les raccourcir.
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

/// Variable d'environnement pour l'URL du backend
pub const API_URL_ENV: &str = "BTCCONVERT_API_URL";

/// URL du backend par défaut
pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

/// API publique CoinGecko
pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

/// Délai de debounce avant d'envoyer une conversion
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

/// Période de rafraîchissement des taux principaux
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Paramètres d'exécution
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base du backend (sans "/" final), ex: http://localhost:5001/api
    pub api_url: String,

    /// Base de l'API CoinGecko
    pub coingecko_url: String,

    pub debounce: Duration,

    pub refresh_interval: Duration,

    /// User-Agent envoyé avec chaque requête
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            coingecko_url: DEFAULT_COINGECKO_URL.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            user_agent: format!("btcconvert/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Charge la configuration depuis l'environnement du process
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Charge la configuration via une fonction de lookup
    ///
    /// CONCEPT RUST : impl Fn en paramètre
    /// - from_env() passe std::env::var
    /// - les tests passent une closure, sans toucher à l'environnement global
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_ENV) {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                config.api_url = url.to_string();
            }
        }

        config
    }
}

/// Répertoire des logs
///
/// - Linux : ~/.local/share/btcconvert/logs
/// - macOS : ~/Library/Application Support/btcconvert/logs
/// - Fallback : ./logs
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("btcconvert").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}
