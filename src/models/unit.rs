// ============================================================================
// Enum : Unit
// ============================================================================
// Unité d'affichage du montant saisi : BTC (unité majeure) ou satoshis
//
// CONCEPTS RUST :
// 1. Enum Copy : deux variants sans données, copiés librement
// 2. Arithmétique entière exacte : u64 + checked_* au lieu de f64
// 3. Option : valeur non parsable = None (pas de panic)
// ============================================================================

/// Nombre de satoshis dans 1 BTC
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Nombre maximal de décimales pour un montant en BTC
pub const MAX_BTC_DECIMALS: usize = 8;

/// Unité du montant saisi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    /// Unité majeure (1 BTC)
    #[default]
    Btc,
    /// Plus petite subdivision (1 sat = 0.00000001 BTC)
    Sats,
}

impl Unit {
    /// Label court (ex: "Enter BTC Amount")
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Btc => "BTC",
            Unit::Sats => "SATS",
        }
    }

    /// Retourne l'autre unité
    pub fn toggled(&self) -> Unit {
        match self {
            Unit::Btc => Unit::Sats,
            Unit::Sats => Unit::Btc,
        }
    }

    /// Texte du bouton de bascule
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Unit::Btc => "Switch to Sats",
            Unit::Sats => "Switch to BTC",
        }
    }

    /// Exemple affiché quand le champ est vide
    pub fn placeholder(&self) -> &'static str {
        match self {
            Unit::Btc => "0.00001",
            Unit::Sats => "1000",
        }
    }

    /// Vérifie qu'une saisie (éventuellement partielle) est acceptable
    ///
    /// - BTC : chiffres, au plus un point, au plus 8 décimales ("0." est accepté)
    /// - SATS : chiffres uniquement
    /// - Dans les deux unités, au plus u64::MAX satoshis : la bascule reste
    ///   toujours exprimable dans l'autre unité
    /// - La chaîne vide est toujours acceptée
    pub fn accepts(&self, value: &str) -> bool {
        let has_digit = value.chars().any(|c| c.is_ascii_digit());
        match self {
            Unit::Btc => is_partial_btc(value) && (!has_digit || btc_str_to_sats(value).is_some()),
            Unit::Sats => {
                value.chars().all(|c| c.is_ascii_digit())
                    && (!has_digit || value.parse::<u64>().is_ok())
            }
        }
    }

    /// Interprète la saisie comme un montant en BTC
    ///
    /// Retourne None si la chaîne ne contient aucun chiffre ou déborde.
    pub fn to_btc(&self, value: &str) -> Option<f64> {
        match self {
            Unit::Btc => {
                // Même borne que la bascule : au-delà de u64::MAX sats, non parsable
                btc_str_to_sats(value)?;
                value.parse::<f64>().ok()
            }
            Unit::Sats => {
                let sats = value.parse::<u64>().ok()?;
                Some(sats as f64 / SATS_PER_BTC as f64)
            }
        }
    }

    /// Réexprime une saisie de cette unité dans l'autre unité, sans perte
    ///
    /// CONCEPT : Conversion exacte
    /// - BTC → SATS : partie entière × 10^8 + décimales complétées à 8 chiffres
    /// - SATS → BTC : division entière, décimales sur 8 chiffres sans zéros finaux
    ///
    /// Une valeur vide ou non parsable donne une chaîne vide.
    pub fn convert_input(&self, value: &str) -> String {
        match self {
            Unit::Btc => btc_str_to_sats(value)
                .map(|sats| sats.to_string())
                .unwrap_or_default(),
            Unit::Sats => value
                .parse::<u64>()
                .map(sats_to_btc_string)
                .unwrap_or_default(),
        }
    }
}

/// Valide le motif "chiffres, point optionnel, 0 à 8 décimales"
fn is_partial_btc(value: &str) -> bool {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (value, ""),
    };

    whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit())
        && fraction.len() <= MAX_BTC_DECIMALS
}

/// Convertit une chaîne BTC validée en satoshis (arithmétique entière)
pub fn btc_str_to_sats(value: &str) -> Option<u64> {
    if !is_partial_btc(value) || !value.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    // "5" → "50000000" : complète à droite jusqu'à 8 chiffres
    let fraction: u64 = format!("{:0<width$}", fraction, width = MAX_BTC_DECIMALS)
        .parse()
        .ok()?;

    whole.checked_mul(SATS_PER_BTC)?.checked_add(fraction)
}

/// Formate un nombre de satoshis en BTC, sans zéros finaux ni point final
///
/// Exemple : 100000 → "0.001", 100000000 → "1"
pub fn sats_to_btc_string(sats: u64) -> String {
    let whole = sats / SATS_PER_BTC;
    let fraction = sats % SATS_PER_BTC;

    if fraction == 0 {
        return whole.to_string();
    }

    let digits = format!("{:08}", fraction);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_btc_accepts_up_to_eight_decimals() {
        for value in ["", "0", "0.", ".", ".5", "12.3", "0.12345678", "21000000"] {
            assert!(Unit::Btc.accepts(value), "devrait accepter {:?}", value);
        }
    }

    #[test]
    fn test_btc_rejects_ninth_decimal_and_garbage() {
        for value in ["0.123456789", "1.2.3", "1,5", "-1", "1e5", " 1", "abc"] {
            assert!(!Unit::Btc.accepts(value), "devrait rejeter {:?}", value);
        }
    }

    #[test]
    fn test_sats_accepts_digits_only() {
        assert!(Unit::Sats.accepts(""));
        assert!(Unit::Sats.accepts("0012345"));
        assert!(!Unit::Sats.accepts("1.5"));
        assert!(!Unit::Sats.accepts("12a"));
        assert!(!Unit::Sats.accepts("-3"));
    }

    #[test]
    fn test_to_btc() {
        assert_eq!(Unit::Btc.to_btc("1"), Some(1.0));
        assert_eq!(Unit::Btc.to_btc("0."), Some(0.0));
        assert_eq!(Unit::Btc.to_btc(".5"), Some(0.5));
        assert_eq!(Unit::Btc.to_btc("."), None);
        assert_eq!(Unit::Btc.to_btc(""), None);
        assert_eq!(Unit::Sats.to_btc("100000000"), Some(1.0));
        assert_eq!(Unit::Sats.to_btc("50000"), Some(0.0005));
        assert_eq!(Unit::Sats.to_btc(""), None);
    }

    #[test]
    fn test_convert_btc_to_sats() {
        assert_eq!(Unit::Btc.convert_input("0.001"), "100000");
        assert_eq!(Unit::Btc.convert_input("1"), "100000000");
        assert_eq!(Unit::Btc.convert_input("0.29"), "29000000");
        assert_eq!(Unit::Btc.convert_input("0.00000001"), "1");
        assert_eq!(Unit::Btc.convert_input("0."), "0");
        assert_eq!(Unit::Btc.convert_input("."), "");
        assert_eq!(Unit::Btc.convert_input(""), "");
    }

    #[test]
    fn test_convert_sats_to_btc_trims_zeros() {
        assert_eq!(Unit::Sats.convert_input("100000"), "0.001");
        assert_eq!(Unit::Sats.convert_input("100000000"), "1");
        assert_eq!(Unit::Sats.convert_input("150000000"), "1.5");
        assert_eq!(Unit::Sats.convert_input("1"), "0.00000001");
        assert_eq!(Unit::Sats.convert_input("0"), "0");
        assert_eq!(Unit::Sats.convert_input(""), "");
    }

    #[test]
    fn test_round_trip_btc_sats_btc() {
        for value in ["0.001", "1", "21.5", "0.12345678", "3.1"] {
            let sats = Unit::Btc.convert_input(value);
            let back = Unit::Sats.convert_input(&sats);
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_overflow_is_unparseable() {
        let huge = "99999999999999999999999";
        assert_eq!(Unit::Sats.to_btc(huge), None);
        assert_eq!(Unit::Sats.convert_input(huge), "");
        assert_eq!(btc_str_to_sats("999999999999999"), None);
        assert_eq!(Unit::Btc.to_btc("999999999999999"), None);
    }

    #[test]
    fn test_rejects_amounts_beyond_u64_sats() {
        // u64::MAX = 18446744073709551615 sats ≈ 184467440737.09551615 BTC
        assert!(Unit::Btc.accepts("184467440737.09551615"));
        assert!(!Unit::Btc.accepts("184467440737.09551616"));
        assert!(!Unit::Btc.accepts("200000000000"));
        assert!(Unit::Sats.accepts("18446744073709551615"));
        assert!(!Unit::Sats.accepts("18446744073709551616"));
    }
}
