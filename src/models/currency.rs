// ============================================================================
// Catalogue de devises et liste des devises additionnelles
// ============================================================================
// Le catalogue est statique (code, symbole, nom). L'utilisateur choisit
// des devises dans ce catalogue, affichées sous USD/EUR.
//
// CONCEPTS RUST :
// 1. &'static str : données connues à la compilation, aucune allocation
// 2. Vec ordonné + unicité par code (pas de HashMap : l'ordre d'ajout compte)
// 3. HashMap en entrée : taux renvoyés par CoinGecko indexés par code
// ============================================================================

use std::collections::HashMap;

/// Une devise du catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    /// Code ISO 4217 (ex: "JPY")
    pub code: &'static str,
    /// Symbole affiché (ex: "¥")
    pub symbol: &'static str,
    /// Nom complet (ex: "Japanese Yen")
    pub name: &'static str,
}

const fn currency(code: &'static str, symbol: &'static str, name: &'static str) -> Currency {
    Currency { code, symbol, name }
}

/// Devises proposées par le sélecteur, triées par nom
pub static CATALOG: [Currency; 24] = [
    currency("ARS", "$", "Argentine Peso"),
    currency("AUD", "A$", "Australian Dollar"),
    currency("BRL", "R$", "Brazilian Real"),
    currency("GBP", "£", "British Pound"),
    currency("CAD", "C$", "Canadian Dollar"),
    currency("CNY", "¥", "Chinese Yuan"),
    currency("CZK", "Kč", "Czech Koruna"),
    currency("DKK", "kr", "Danish Krone"),
    currency("HKD", "HK$", "Hong Kong Dollar"),
    currency("INR", "₹", "Indian Rupee"),
    currency("JPY", "¥", "Japanese Yen"),
    currency("MXN", "$", "Mexican Peso"),
    currency("NZD", "NZ$", "New Zealand Dollar"),
    currency("NOK", "kr", "Norwegian Krone"),
    currency("PYG", "₲", "Paraguayan Guarani"),
    currency("PLN", "zł", "Polish Zloty"),
    currency("RUB", "₽", "Russian Ruble"),
    currency("SGD", "S$", "Singapore Dollar"),
    currency("ZAR", "R", "South African Rand"),
    currency("KRW", "₩", "South Korean Won"),
    currency("SEK", "kr", "Swedish Krona"),
    currency("CHF", "Fr", "Swiss Franc"),
    currency("THB", "฿", "Thai Baht"),
    currency("TRY", "₺", "Turkish Lira"),
];

/// Cherche une devise du catalogue par code (insensible à la casse)
pub fn find_currency(code: &str) -> Option<&'static Currency> {
    CATALOG.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Formate un montant avec exactement 2 décimales
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

// ============================================================================
// Structure : AdditionalCurrency
// ============================================================================

/// Une devise ajoutée par l'utilisateur, avec son dernier taux connu
#[derive(Debug, Clone, PartialEq)]
pub struct AdditionalCurrency {
    pub code: String,
    pub symbol: String,
    pub name: String,

    /// Prix de 1 BTC dans cette devise (0 = inconnu)
    pub rate: f64,

    /// Montant converti, déjà formaté (vide = rien à afficher)
    pub amount: String,
}

impl AdditionalCurrency {
    /// Crée l'entrée sans taux ni montant
    pub fn new(currency: &Currency) -> Self {
        Self {
            code: currency.code.to_string(),
            symbol: currency.symbol.to_string(),
            name: currency.name.to_string(),
            rate: 0.0,
            amount: String::new(),
        }
    }

    /// Vérifie si un taux a été chargé
    pub fn has_rate(&self) -> bool {
        self.rate > 0.0
    }

    /// Applique un taux et recalcule le montant pour `btc_amount`
    pub fn set_rate(&mut self, rate: f64, btc_amount: Option<f64>) {
        self.rate = rate;
        self.amount = btc_amount
            .map(|btc| format_amount(rate * btc))
            .unwrap_or_default();
    }
}

// ============================================================================
// Structure : CurrencyList
// ============================================================================

/// Liste ordonnée des devises additionnelles, unique par code
#[derive(Debug, Clone, Default)]
pub struct CurrencyList {
    items: Vec<AdditionalCurrency>,
}

impl CurrencyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[AdditionalCurrency] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.items.iter().any(|c| c.code == code)
    }

    pub fn get(&self, code: &str) -> Option<&AdditionalCurrency> {
        self.items.iter().find(|c| c.code == code)
    }

    /// Ajoute une devise en fin de liste
    ///
    /// Retourne false (et ne fait rien) si le code est déjà présent.
    pub fn add(&mut self, currency: &Currency) -> bool {
        if self.contains(currency.code) {
            return false;
        }
        self.items.push(AdditionalCurrency::new(currency));
        true
    }

    /// Supprime une devise ; retourne false si absente
    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|c| c.code != code);
        self.items.len() != before
    }

    /// Codes sélectionnés, dans l'ordre d'ajout
    pub fn codes(&self) -> Vec<String> {
        self.items.iter().map(|c| c.code.clone()).collect()
    }

    /// Écrase taux et montant de chaque entrée présente dans `rates`
    ///
    /// Les entrées absentes de `rates` (ajoutées après la requête) ne bougent pas.
    pub fn apply_rates(&mut self, rates: &HashMap<String, f64>, btc_amount: f64) {
        for item in self.items.iter_mut() {
            if let Some(&rate) = rates.get(&item.code) {
                item.set_rate(rate, Some(btc_amount));
            }
        }
    }

    /// Efface les montants en gardant les derniers taux connus
    pub fn clear_amounts(&mut self) {
        for item in self.items.iter_mut() {
            item.amount.clear();
        }
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut AdditionalCurrency> {
        self.items.iter_mut().find(|c| c.code == code)
    }

    /// Devises du catalogue pas encore sélectionnées (options du sélecteur)
    pub fn available(&self) -> Vec<&'static Currency> {
        CATALOG.iter().filter(|c| !self.contains(c.code)).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
