// ============================================================================
// BTC Converter - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;     // Backend de conversion + CoinGecko
pub mod app;     // Contrôleur (état, minuteries, requêtes)
pub mod config;  // Configuration (variables d'environnement)
pub mod error;   // Erreurs affichées et échecs du worker
pub mod models;  // Structures de données
pub mod timer;   // Debounce et intervalle
pub mod ui;      // Interface utilisateur
pub mod worker;  // Worker thread + runtime tokio
