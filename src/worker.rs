// ============================================================================
// Worker : exécution des appels réseau en arrière-plan
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - Le contrôleur (App) produit des AppCommand
// - Le worker exécute chaque commande sur son runtime tokio
// - Les résultats reviennent sous forme d'AppResult via un autre channel
//
// Chaque commande devient une tâche tokio indépendante : le rafraîchissement
// des taux, la conversion et les taux additionnels peuvent être en vol en
// même temps sans se bloquer mutuellement.
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::{build_http_client, BackendClient, CoinGeckoClient};
use crate::config::Config;
use crate::error::Failure;
use crate::models::{ConversionResult, RatePair};

/// Identifiant d'une conversion, croissant
///
/// Sert à écarter les réponses obsolètes (l'utilisateur a retapé entre-temps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commandes envoyées au worker
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Rafraîchir les taux principaux (GET /prices/latest)
    FetchLatestPrices,

    /// Convertir un montant en BTC (POST /convert)
    Convert { request: RequestId, btc_amount: f64 },

    /// Récupérer en une requête les taux des devises additionnelles
    FetchAdditionalRates {
        request: RequestId,
        btc_amount: f64,
        codes: Vec<String>,
    },
}

/// Résultats renvoyés par le worker
#[derive(Debug, Clone, PartialEq)]
pub enum AppResult {
    PricesLoaded(RatePair),

    Converted {
        request: RequestId,
        result: ConversionResult,
    },

    AdditionalRatesLoaded {
        request: RequestId,
        btc_amount: f64,
        rates: HashMap<String, f64>,
    },

    /// Échec d'une commande (`request` absent pour le rafraîchissement)
    Failed {
        request: Option<RequestId>,
        failure: Failure,
    },
}

/// Clients utilisés par le worker
#[derive(Debug, Clone)]
pub struct Services {
    pub backend: BackendClient,
    pub coingecko: CoinGeckoClient,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = build_http_client(config)?;
        Ok(Self {
            backend: BackendClient::new(http.clone(), config.api_url.clone()),
            coingecko: CoinGeckoClient::new(http, config.coingecko_url.clone()),
        })
    }
}

/// Exécute une commande et la traduit en résultat
///
/// Les erreurs anyhow sont rendues en texte ici : le contrôleur ne voit
/// que la catégorie d'échec et un message pour les logs.
pub async fn execute(services: &Services, command: AppCommand) -> AppResult {
    match command {
        AppCommand::FetchLatestPrices => match services.backend.latest_prices().await {
            Ok(rates) => AppResult::PricesLoaded(rates),
            Err(e) => AppResult::Failed {
                request: None,
                failure: Failure::Prices(format!("{:#}", e)),
            },
        },

        AppCommand::Convert { request, btc_amount } => {
            match services.backend.convert(btc_amount).await {
                Ok(result) => AppResult::Converted { request, result },
                Err(e) => AppResult::Failed {
                    request: Some(request),
                    failure: Failure::Conversion(format!("{:#}", e)),
                },
            }
        }

        AppCommand::FetchAdditionalRates {
            request,
            btc_amount,
            codes,
        } => match services.coingecko.bitcoin_prices(&codes).await {
            Ok(rates) => AppResult::AdditionalRatesLoaded {
                request,
                btc_amount,
                rates,
            },
            Err(e) => AppResult::Failed {
                request: Some(request),
                failure: Failure::AdditionalRates(format!("{:#}", e)),
            },
        },
    }
}

/// Lance le worker thread
///
/// CONCEPT RUST : Thread + runtime tokio
/// - std::thread::spawn() : thread OS dédié aux I/O
/// - Le runtime est créé AVANT le thread pour remonter l'erreur à l'appelant
/// - Channel fermé (command_tx droppé) → fin de boucle → runtime droppé,
///   ce qui annule les requêtes encore en vol
pub fn spawn_worker(
    services: Services,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) -> Result<thread::JoinHandle<()>> {
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    let handle = thread::Builder::new()
        .name("btcconvert-worker".to_string())
        .spawn(move || {
            while let Ok(command) = command_rx.recv() {
                debug!(?command, "Worker received command");

                let services = services.clone();
                let result_tx = result_tx.clone();
                runtime.spawn(async move {
                    let result = execute(&services, command).await;
                    // L'UI peut être déjà fermée : rien à faire dans ce cas
                    let _ = result_tx.send(result);
                });
            }

            info!("Worker thread exiting (channel closed)");
        })
        .context("Échec du lancement du worker thread")?;

    Ok(handle)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        matchers::{body_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    /// Adresse où rien n'écoute (port discard)
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn services(backend_url: &str, coingecko_url: &str) -> Services {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        Services {
            backend: BackendClient::new(http.clone(), backend_url),
            coingecko: CoinGeckoClient::new(http, coingecko_url),
        }
    }

    async fn mock_backend(method_name: &str, route: &str, status: u16, body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method(method_name))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_request_id_display() {
        assert_eq!(RequestId(42).to_string(), "#42");
    }

    #[tokio::test]
    async fn test_execute_convert_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/convert"))
            .and(body_json(json!({"btc_amount": 1.0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"usd_amount": 65000, "eur_amount": 60000}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = execute(
            &services(&server.uri(), UNREACHABLE),
            AppCommand::Convert {
                request: RequestId(3),
                btc_amount: 1.0,
            },
        )
        .await;

        assert_eq!(
            result,
            AppResult::Converted {
                request: RequestId(3),
                result: ConversionResult {
                    usd_amount: 65000.0,
                    eur_amount: 60000.0
                },
            }
        );
    }

    #[tokio::test]
    async fn test_execute_convert_failure_is_tagged() {
        let server =
            mock_backend("POST", "/convert", 500, json!({"success": false, "error": "boom"})).await;

        let result = execute(
            &services(&server.uri(), UNREACHABLE),
            AppCommand::Convert {
                request: RequestId(8),
                btc_amount: 2.0,
            },
        )
        .await;

        match result {
            AppResult::Failed {
                request,
                failure: Failure::Conversion(detail),
            } => {
                assert_eq!(request, Some(RequestId(8)));
                assert!(detail.contains("boom"));
            }
            other => panic!("résultat inattendu : {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_prices_failure() {
        let result = execute(
            &services(UNREACHABLE, UNREACHABLE),
            AppCommand::FetchLatestPrices,
        )
        .await;

        assert!(matches!(
            result,
            AppResult::Failed {
                request: None,
                failure: Failure::Prices(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_execute_additional_rates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .and(query_param("vs_currencies", "jpy"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"bitcoin": {"jpy": 9800000}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = execute(
            &services(UNREACHABLE, &server.uri()),
            AppCommand::FetchAdditionalRates {
                request: RequestId(1),
                btc_amount: 1.0,
                codes: vec!["JPY".to_string()],
            },
        )
        .await;

        match result {
            AppResult::AdditionalRatesLoaded {
                request,
                btc_amount,
                rates,
            } => {
                assert_eq!(request, RequestId(1));
                assert_eq!(btc_amount, 1.0);
                assert_eq!(rates["JPY"], 9_800_000.0);
            }
            other => panic!("résultat inattendu : {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_spawn_worker_round_trip() {
        let server = mock_backend(
            "GET",
            "/prices/latest",
            200,
            json!({
                "success": true,
                "data": {"btc_usd": 65000, "btc_eur": 60000, "timestamp": "2024-01-01T00:00:00Z"}
            }),
        )
        .await;

        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = spawn_worker(services(&server.uri(), UNREACHABLE), command_rx, result_tx).unwrap();

        command_tx.send(AppCommand::FetchLatestPrices).unwrap();

        let result = tokio::task::spawn_blocking(move || {
            result_rx.recv_timeout(Duration::from_secs(10))
        })
        .await
        .unwrap()
        .unwrap();

        match result {
            AppResult::PricesLoaded(rates) => assert_eq!(rates.btc_usd, 65000.0),
            other => panic!("résultat inattendu : {:?}", other),
        }

        // Fermer le channel arrête le worker
        drop(command_tx);
        tokio::task::spawn_blocking(move || handle.join())
            .await
            .unwrap()
            .unwrap();
    }
}
