// ============================================================================
// Structures : RatePair / ConversionResult
// ============================================================================
// Taux principaux (BTC → USD / EUR) et résultat d'une conversion backend
//
// CONCEPTS RUST :
// 1. Serde : désérialisation directe depuis le JSON du backend
// 2. deserialize_with : parsing personnalisé du timestamp
// 3. DateTime<Utc> : horodatage sans ambiguïté de fuseau
// ============================================================================

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Taux BTC courants, remplacés en bloc à chaque rafraîchissement réussi
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatePair {
    /// Prix de 1 BTC en dollars
    pub btc_usd: f64,

    /// Prix de 1 BTC en euros
    pub btc_eur: f64,

    /// Date de la cotation côté backend
    #[serde(rename = "timestamp", deserialize_with = "deserialize_timestamp")]
    pub as_of: DateTime<Utc>,
}

impl RatePair {
    pub fn new(btc_usd: f64, btc_eur: f64, as_of: DateTime<Utc>) -> Self {
        Self {
            btc_usd,
            btc_eur,
            as_of,
        }
    }
}

/// Montants calculés par le backend (il fait autorité sur l'arrondi)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ConversionResult {
    pub usd_amount: f64,
    pub eur_amount: f64,
}

/// Parse un timestamp ISO 8601
///
/// Le backend stocke des dates UTC naïves : "2024-01-01T00:00:00.123456"
/// sans suffixe de fuseau. On accepte les deux formes.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("timestamp invalide : {}", raw)))
}

// ============================================================================
// Tests
// ============================================================================
