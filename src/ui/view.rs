// ============================================================================
// Projection état → vue
// ============================================================================
// Fonction pure : &App → ConverterView (uniquement des String et des bool).
// Le dessin ratatui (dashboard.rs) ne fait que placer ces textes ; toute la
// logique d'affichage (labels, formats, conditions) est ici et se teste sans
// terminal.
// ============================================================================

use chrono::Local;

use crate::app::{App, Focus};
use crate::ui::format::rate_line;

/// Titre de l'application
pub const TITLE: &str = "BTC Converter";

/// Un champ de sortie (USD, EUR ou devise additionnelle)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputField {
    pub code: String,
    pub icon: String,
    pub label: String,
    /// Montant formaté, vide si rien à afficher
    pub value: String,
    /// "1 BTC = $65,000.00", absent tant que le taux est inconnu
    pub rate_line: Option<String>,
    /// Ligne surlignée (navigation dans les devises additionnelles)
    pub selected: bool,
}

/// Une option du sélecteur de devise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub symbol: String,
    pub label: String,
    pub highlighted: bool,
}

/// Tout ce qu'il faut pour dessiner un écran
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterView {
    pub title: String,
    pub banner: Option<String>,

    pub input_label: String,
    pub input_value: String,
    pub input_placeholder: String,
    /// Position du curseur dans input_value (None = champ sans focus)
    pub input_cursor: Option<usize>,
    pub toggle_label: String,
    pub ratio_hint: String,

    pub usd: OutputField,
    pub eur: OutputField,
    pub additional: Vec<OutputField>,

    /// Options du sélecteur, None s'il est fermé
    pub picker: Option<Vec<PickerOption>>,

    pub loading: Option<String>,
    pub confirm_quit: bool,
    pub version: String,
    pub last_update: Option<String>,
}

/// Projette l'état du contrôleur en vue
pub fn project(app: &App) -> ConverterView {
    let rates = app.rates.as_ref();

    let usd = OutputField {
        code: "USD".to_string(),
        icon: "$".to_string(),
        label: "USD Value".to_string(),
        value: app.usd_amount.clone(),
        rate_line: rates
            .filter(|r| r.btc_usd > 0.0)
            .map(|r| rate_line("$", r.btc_usd)),
        selected: false,
    };

    let eur = OutputField {
        code: "EUR".to_string(),
        icon: "€".to_string(),
        label: "EUR Value".to_string(),
        value: app.eur_amount.clone(),
        rate_line: rates
            .filter(|r| r.btc_eur > 0.0)
            .map(|r| rate_line("€", r.btc_eur)),
        selected: false,
    };

    let additional = app
        .currencies
        .items()
        .iter()
        .enumerate()
        .map(|(index, currency)| OutputField {
            code: currency.code.clone(),
            icon: currency.symbol.clone(),
            label: format!("{} ({})", currency.name, currency.code),
            value: currency.amount.clone(),
            rate_line: currency
                .has_rate()
                .then(|| rate_line(&currency.symbol, currency.rate)),
            selected: app.focus == Focus::Currencies && index == app.selected_currency,
        })
        .collect();

    let picker = app.is_picker_open().then(|| {
        app.picker_options()
            .iter()
            .enumerate()
            .map(|(index, currency)| PickerOption {
                symbol: currency.symbol.to_string(),
                label: format!("{} - {}", currency.code, currency.name),
                highlighted: index == app.picker_index,
            })
            .collect()
    });

    ConverterView {
        title: TITLE.to_string(),
        banner: app.error.map(|e| e.message().to_string()),
        input_label: format!("Enter {} Amount", app.unit.label()),
        input_value: app.input.value().to_string(),
        input_placeholder: app.unit.placeholder().to_string(),
        input_cursor: (app.focus == Focus::Input).then(|| app.input.cursor()),
        toggle_label: app.unit.toggle_label().to_string(),
        ratio_hint: "1 BTC = 100,000,000 satoshis".to_string(),
        usd,
        eur,
        additional,
        picker,
        loading: app.loading.then(|| "Converting...".to_string()),
        confirm_quit: app.is_awaiting_quit_confirmation(),
        version: format!("v{}", env!("CARGO_PKG_VERSION")),
        last_update: rates.map(|r| {
            format!(
                "Last updated: {}",
                r.as_of.with_timezone(&Local).format("%H:%M:%S")
            )
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
