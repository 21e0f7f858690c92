// ============================================================================
// Erreurs visibles et politique de traitement des échecs
// ============================================================================
// Deux catégories seulement apparaissent dans le bandeau d'erreur.
// Les échecs des devises additionnelles sont best-effort : log uniquement.
//
// CONCEPT RUST : Enums pour une taxonomie fermée
// - Le compilateur force à traiter chaque catégorie dans les match
// - Ajouter une catégorie = erreur de compilation partout où elle manque
// ============================================================================

use std::fmt;

/// Erreur affichée dans le bandeau (jusqu'au prochain succès ou erreur)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterError {
    /// Échec du rafraîchissement périodique des taux
    PriceFetch,
    /// Échec de la conversion principale
    Conversion,
}

impl ConverterError {
    pub fn message(&self) -> &'static str {
        match self {
            ConverterError::PriceFetch => "Failed to fetch latest prices",
            ConverterError::Conversion => "Conversion failed",
        }
    }
}

impl fmt::Display for ConverterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Un échec remonté par le worker, avec son message technique
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Prices(String),
    Conversion(String),
    AdditionalRates(String),
}

impl Failure {
    /// Bandeau à afficher, ou None si l'échec se contente d'un log
    pub fn banner(&self) -> Option<ConverterError> {
        match self {
            Failure::Prices(_) => Some(ConverterError::PriceFetch),
            Failure::Conversion(_) => Some(ConverterError::Conversion),
            Failure::AdditionalRates(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_routing() {
        assert_eq!(
            Failure::Prices("timeout".into()).banner(),
            Some(ConverterError::PriceFetch)
        );
        assert_eq!(
            Failure::Conversion("HTTP 500".into()).banner(),
            Some(ConverterError::Conversion)
        );
        assert_eq!(Failure::AdditionalRates("429".into()).banner(), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ConverterError::PriceFetch.to_string(), "Failed to fetch latest prices");
        assert_eq!(ConverterError::Conversion.to_string(), "Conversion failed");
    }
}
