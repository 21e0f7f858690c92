// ============================================================================
// Module : models
// ============================================================================
// Structures de données du convertisseur
// ============================================================================

pub mod amount;     // Saisie du montant + curseur
pub mod currency;   // Catalogue et devises additionnelles
pub mod rates;      // Taux principaux et résultat de conversion
pub mod unit;       // BTC / SATS, validation et bascule

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use btcconvert::models::unit::Unit;
// On peut faire : use btcconvert::models::Unit;
pub use amount::{AmountInput, InputEdit};
pub use currency::{find_currency, format_amount, AdditionalCurrency, Currency, CurrencyList, CATALOG};
pub use rates::{ConversionResult, RatePair};
pub use unit::{Unit, SATS_PER_BTC};
