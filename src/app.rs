// ============================================================================
// Structure : App
// ============================================================================
// Contrôleur du convertisseur : tout l'état de l'écran et toutes les
// transitions passent par ici.
//
// PATTERN : "Application State" sans I/O
// - Les méthodes modifient l'état et RETOURNENT des AppCommand
// - La boucle principale envoie ces commandes au worker
// - Les AppResult reviennent par handle_result()
// - Le temps est injecté (now: Instant) : tout est testable sans réseau
//   ni horloge réelle
//
// RÈGLE DES RÉPONSES OBSOLÈTES :
// - Chaque conversion reçoit un RequestId croissant
// - Toute saisie acceptée invalide la requête active
// - Une réponse dont l'id n'est pas celui de la requête active est ignorée
// ============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{Config, DEFAULT_DEBOUNCE, DEFAULT_REFRESH_INTERVAL};
use crate::error::{ConverterError, Failure};
use crate::models::{
    find_currency, format_amount, AmountInput, CurrencyList, Currency, InputEdit, RatePair, Unit,
};
use crate::timer::{Debouncer, Interval};
use crate::worker::{AppCommand, AppResult, RequestId};

// ============================================================================
// Enum : Focus
// ============================================================================

/// Zone de l'écran qui reçoit le clavier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Champ de saisie du montant
    Input,

    /// Liste des devises additionnelles (suppression avec 'x')
    Currencies,

    /// Sélecteur de devise ouvert
    Picker,
}

/// Position du curseur capturée au lancement d'une conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CaretSnapshot {
    focused: bool,
    cursor: usize,
}

/// Conversion en cours (ou dernière conversion non invalidée)
#[derive(Debug, Clone, Copy)]
struct ActiveRequest {
    id: RequestId,
    btc_amount: f64,
    caret: CaretSnapshot,
}

/// État principal du convertisseur
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Two-step quit : première pression de 'q' = confirmation demandée
    pub confirm_quit: bool,

    pub focus: Focus,

    /// Unité de la saisie (BTC ou SATS)
    pub unit: Unit,

    /// Montant saisi, dans `unit`
    pub input: AmountInput,

    /// Contre-valeurs formatées (vides = rien à afficher)
    pub usd_amount: String,
    pub eur_amount: String,

    /// Derniers taux principaux (None avant le premier rafraîchissement réussi)
    pub rates: Option<RatePair>,

    /// Bandeau d'erreur courant
    pub error: Option<ConverterError>,

    /// Devises additionnelles choisies par l'utilisateur
    pub currencies: CurrencyList,

    /// Index de la devise sélectionnée quand focus == Currencies
    pub selected_currency: usize,

    /// Index de l'option surlignée dans le sélecteur
    pub picker_index: usize,

    /// Une conversion est en vol
    pub loading: bool,

    /// Derniers taux additionnels connus, par code
    known_rates: HashMap<String, f64>,

    /// Minuterie de debounce (au plus une conversion en attente)
    debounce: Debouncer<f64>,

    /// Rafraîchissement périodique des taux principaux
    refresh: Interval,

    next_request: u64,
    active: Option<ActiveRequest>,
}

impl App {
    /// Crée un contrôleur avec les délais par défaut (800ms / 30s)
    pub fn new() -> Self {
        Self::with_timings(DEFAULT_DEBOUNCE, DEFAULT_REFRESH_INTERVAL)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_timings(config.debounce, config.refresh_interval)
    }

    pub fn with_timings(debounce: Duration, refresh_interval: Duration) -> Self {
        Self {
            running: true,
            confirm_quit: false,
            focus: Focus::Input,
            unit: Unit::default(),
            input: AmountInput::new(),
            usd_amount: String::new(),
            eur_amount: String::new(),
            rates: None,
            error: None,
            currencies: CurrencyList::new(),
            selected_currency: 0,
            picker_index: 0,
            loading: false,
            known_rates: HashMap::new(),
            debounce: Debouncer::new(debounce),
            refresh: Interval::new(refresh_interval),
            next_request: 0,
            active: None,
        }
    }

    // ========================================================================
    // Cycle de vie
    // ========================================================================

    /// Montage : arme le rafraîchissement (premier tick immédiat)
    pub fn mount(&mut self, now: Instant) {
        info!(period = ?self.refresh.period(), "Starting price refresh");
        self.refresh.start(now);
    }

    /// Démontage : annule les deux minuteries et oublie la requête active
    pub fn teardown(&mut self) {
        debug!("Tearing down converter timers");
        self.debounce.cancel();
        self.refresh.stop();
        self.active = None;
        self.loading = false;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn has_pending_conversion(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn is_refresh_active(&self) -> bool {
        self.refresh.is_active()
    }

    // ========================================================================
    // Saisie du montant
    // ========================================================================

    /// Montant courant en BTC, seulement s'il est strictement positif
    pub fn current_btc_amount(&self) -> Option<f64> {
        self.unit
            .to_btc(self.input.value())
            .filter(|value| value.is_finite() && *value > 0.0)
    }

    /// Applique une frappe ; retourne false si elle est rejetée
    ///
    /// Rejet = aucun changement d'état. Acceptation = la requête active
    /// devient obsolète, puis debounce (montant > 0) ou effacement immédiat.
    pub fn edit_input(&mut self, edit: InputEdit, now: Instant) -> bool {
        if !self.input.apply(edit, self.unit) {
            debug!(?edit, unit = self.unit.label(), "Input edit rejected");
            return false;
        }

        self.amount_changed(now);
        true
    }

    fn amount_changed(&mut self, now: Instant) {
        self.invalidate_active();

        match self.current_btc_amount() {
            Some(btc_amount) => {
                debug!(btc_amount, "Scheduling conversion");
                self.debounce.schedule(btc_amount, now);
            }
            None => {
                self.debounce.cancel();
                self.clear_outputs();
            }
        }
    }

    /// Efface USD/EUR et les montants additionnels (les taux restent)
    fn clear_outputs(&mut self) {
        self.usd_amount.clear();
        self.eur_amount.clear();
        self.currencies.clear_amounts();
    }

    fn invalidate_active(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(request = %active.id, "Invalidating active conversion");
            self.loading = false;
        }
    }

    /// Bascule BTC ↔ SATS en réexprimant la valeur sans perte
    ///
    /// Le montant ne change pas : la conversion en attente ou en vol reste
    /// valide. Le curseur passe en fin de valeur.
    pub fn toggle_unit(&mut self) {
        let converted = self.unit.convert_input(self.input.value());
        self.unit = self.unit.toggled();
        self.input.replace(converted);

        if self.focus != Focus::Picker {
            self.focus = Focus::Input;
        }

        info!(unit = self.unit.label(), value = self.input.value(), "Unit toggled");

        if self.current_btc_amount().is_none() {
            self.invalidate_active();
            self.debounce.cancel();
            self.clear_outputs();
        }
    }

    // ========================================================================
    // Minuteries
    // ========================================================================

    /// Appelé à chaque itération de la boucle : déclenche les minuteries échues
    pub fn tick(&mut self, now: Instant) -> Vec<AppCommand> {
        let mut commands = Vec::new();

        if self.refresh.poll(now) {
            debug!("Price refresh due");
            commands.push(AppCommand::FetchLatestPrices);
        }

        if let Some(btc_amount) = self.debounce.poll(now) {
            commands.push(self.start_conversion(btc_amount));
        }

        commands
    }

    /// Crée la commande de conversion et en fait la requête active
    fn start_conversion(&mut self, btc_amount: f64) -> AppCommand {
        self.next_request += 1;
        let id = RequestId(self.next_request);

        let caret = CaretSnapshot {
            focused: self.focus == Focus::Input,
            cursor: self.input.cursor(),
        };

        self.active = Some(ActiveRequest {
            id,
            btc_amount,
            caret,
        });
        self.loading = true;

        info!(request = %id, btc_amount, "Issuing conversion");
        AppCommand::Convert {
            request: id,
            btc_amount,
        }
    }

    fn active_for(&self, request: RequestId) -> Option<ActiveRequest> {
        self.active.filter(|active| active.id == request)
    }

    /// Remet le focus et le curseur tels qu'au lancement de la requête
    fn restore_caret(&mut self, caret: CaretSnapshot) {
        if caret.focused && self.focus != Focus::Picker {
            self.focus = Focus::Input;
            self.input.set_cursor(caret.cursor);
        }
    }

    // ========================================================================
    // Résultats du worker
    // ========================================================================

    /// Applique un résultat ; peut produire des commandes de suite
    /// (taux additionnels après une conversion réussie)
    pub fn handle_result(&mut self, result: AppResult) -> Vec<AppCommand> {
        match result {
            AppResult::PricesLoaded(rates) => {
                info!(btc_usd = rates.btc_usd, btc_eur = rates.btc_eur, as_of = %rates.as_of, "Rates refreshed");
                self.rates = Some(rates);
                self.error = None;
                Vec::new()
            }

            AppResult::Converted { request, result } => {
                let Some(active) = self.active_for(request) else {
                    debug!(request = %request, "Discarding stale conversion result");
                    return Vec::new();
                };

                self.usd_amount = format_amount(result.usd_amount);
                self.eur_amount = format_amount(result.eur_amount);
                self.loading = false;
                self.error = None;
                self.restore_caret(active.caret);

                if self.currencies.is_empty() {
                    return Vec::new();
                }

                vec![AppCommand::FetchAdditionalRates {
                    request,
                    btc_amount: active.btc_amount,
                    codes: self.currencies.codes(),
                }]
            }

            AppResult::AdditionalRatesLoaded {
                request,
                btc_amount,
                rates,
            } => {
                self.known_rates.extend(
                    rates
                        .iter()
                        .filter(|(_, rate)| **rate > 0.0)
                        .map(|(code, rate)| (code.clone(), *rate)),
                );

                if self.active_for(request).is_none() {
                    debug!(request = %request, "Discarding stale additional rates");
                    return Vec::new();
                }

                self.currencies.apply_rates(&rates, btc_amount);
                Vec::new()
            }

            AppResult::Failed { request, failure } => {
                self.handle_failure(request, failure);
                Vec::new()
            }
        }
    }

    fn handle_failure(&mut self, request: Option<RequestId>, failure: Failure) {
        match &failure {
            Failure::Prices(detail) => {
                warn!(error = %detail, "Price refresh failed, keeping previous rates");
            }
            Failure::Conversion(detail) => {
                let Some(active) = request.and_then(|id| self.active_for(id)) else {
                    debug!(error = %detail, "Ignoring failure of stale conversion");
                    return;
                };
                warn!(request = %active.id, error = %detail, "Conversion failed");
                self.loading = false;
                self.restore_caret(active.caret);
            }
            Failure::AdditionalRates(detail) => {
                // Best-effort : log uniquement, pas de bandeau
                warn!(error = %detail, "Additional currency rates unavailable");
            }
        }

        if let Some(banner) = failure.banner() {
            self.error = Some(banner);
        }
    }

    // ========================================================================
    // Devises additionnelles
    // ========================================================================

    /// Ajoute une devise du catalogue
    ///
    /// - Déjà présente ou inconnue : aucun effet
    /// - Taux déjà connu : rempli tout de suite
    /// - Montant > 0 saisi : conversion immédiate (sans debounce)
    pub fn add_currency(&mut self, code: &str) -> Vec<AppCommand> {
        let Some(currency) = find_currency(code) else {
            warn!(code, "Unknown currency code");
            return Vec::new();
        };

        if !self.currencies.add(currency) {
            debug!(code = currency.code, "Currency already selected");
            return Vec::new();
        }

        info!(code = currency.code, "Currency added");
        let btc_amount = self.current_btc_amount();

        if let Some(&rate) = self.known_rates.get(currency.code) {
            if let Some(item) = self.currencies.get_mut(currency.code) {
                item.set_rate(rate, btc_amount);
            }
        }

        self.close_picker();

        match btc_amount {
            Some(btc_amount) => {
                self.debounce.cancel();
                vec![self.start_conversion(btc_amount)]
            }
            None => Vec::new(),
        }
    }

    /// Retire une devise ; retourne false si elle n'était pas sélectionnée
    pub fn remove_currency(&mut self, code: &str) -> bool {
        if !self.currencies.remove(code) {
            return false;
        }

        info!(code, "Currency removed");

        if self.currencies.is_empty() {
            self.selected_currency = 0;
            if self.focus == Focus::Currencies {
                self.focus = Focus::Input;
            }
        } else {
            self.selected_currency = self.selected_currency.min(self.currencies.len() - 1);
        }

        true
    }

    /// Retire la devise surlignée (focus == Currencies)
    pub fn remove_selected_currency(&mut self) -> bool {
        let code = match self.currencies.items().get(self.selected_currency) {
            Some(item) => item.code.clone(),
            None => return false,
        };
        self.remove_currency(&code)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Descend : saisie → première devise → devises suivantes
    pub fn navigate_down(&mut self) {
        match self.focus {
            Focus::Input if !self.currencies.is_empty() => {
                self.focus = Focus::Currencies;
                self.selected_currency = 0;
            }
            Focus::Currencies => {
                let max_index = self.currencies.len().saturating_sub(1);
                self.selected_currency = (self.selected_currency + 1).min(max_index);
            }
            Focus::Picker => {
                let max_index = self.picker_options().len().saturating_sub(1);
                self.picker_index = (self.picker_index + 1).min(max_index);
            }
            Focus::Input => {}
        }
    }

    /// Monte : devises → saisie
    pub fn navigate_up(&mut self) {
        match self.focus {
            Focus::Currencies if self.selected_currency == 0 => self.focus = Focus::Input,
            Focus::Currencies => self.selected_currency -= 1,
            Focus::Picker => self.picker_index = self.picker_index.saturating_sub(1),
            Focus::Input => {}
        }
    }

    pub fn focus_input(&mut self) {
        self.focus = Focus::Input;
    }

    // ========================================================================
    // Sélecteur de devise
    // ========================================================================

    pub fn is_picker_open(&self) -> bool {
        self.focus == Focus::Picker
    }

    pub fn open_picker(&mut self) {
        self.focus = Focus::Picker;
        self.picker_index = 0;
    }

    pub fn close_picker(&mut self) {
        if self.focus == Focus::Picker {
            self.focus = Focus::Input;
        }
    }

    pub fn toggle_picker(&mut self) {
        if self.is_picker_open() {
            self.close_picker();
        } else {
            self.open_picker();
        }
    }

    /// Devises proposées : catalogue moins les devises déjà choisies
    pub fn picker_options(&self) -> Vec<&'static Currency> {
        self.currencies.available()
    }

    /// Ajoute l'option surlignée
    pub fn confirm_picker(&mut self) -> Vec<AppCommand> {
        let code = match self.picker_options().get(self.picker_index) {
            Some(currency) => currency.code,
            None => return Vec::new(),
        };
        self.add_currency(code)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversionResult;
    use chrono::{TimeZone, Utc};

    const DEBOUNCE: Duration = Duration::from_millis(800);

    fn type_text(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.edit_input(InputEdit::Insert(c), now);
        }
    }

    fn clear_text(app: &mut App, now: Instant) {
        app.input.move_end();
        while !app.input.is_empty() {
            app.edit_input(InputEdit::Backspace, now);
        }
    }

    /// Tape `text`, attend le debounce, retourne l'id de la conversion émise
    fn convert(app: &mut App, text: &str, now: Instant) -> RequestId {
        type_text(app, text, now);
        match app.tick(now + DEBOUNCE).as_slice() {
            [AppCommand::Convert { request, .. }] => *request,
            other => panic!("conversion attendue, reçu {:?}", other),
        }
    }

    fn converted(request: RequestId, usd: f64, eur: f64) -> AppResult {
        AppResult::Converted {
            request,
            result: ConversionResult {
                usd_amount: usd,
                eur_amount: eur,
            },
        }
    }

    fn sample_rates() -> RatePair {
        RatePair::new(65000.0, 60000.0, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert_eq!(app.unit, Unit::Btc);
        assert_eq!(app.focus, Focus::Input);
        assert!(app.currencies.is_empty());
        assert!(!app.is_refresh_active());
    }

    #[test]
    fn test_mount_fetches_immediately_then_every_period() {
        let start = Instant::now();
        let mut app = App::new();
        app.mount(start);

        assert_eq!(app.tick(start), vec![AppCommand::FetchLatestPrices]);
        assert!(app.tick(start + Duration::from_secs(29)).is_empty());
        assert_eq!(
            app.tick(start + Duration::from_secs(30)),
            vec![AppCommand::FetchLatestPrices]
        );
    }

    #[test]
    fn test_teardown_cancels_both_timers() {
        let start = Instant::now();
        let mut app = App::new();
        app.mount(start);
        type_text(&mut app, "1", start);
        assert!(app.has_pending_conversion());

        app.teardown();
        assert!(!app.has_pending_conversion());
        assert!(!app.is_refresh_active());
        assert!(app.tick(start + Duration::from_secs(120)).is_empty());
    }

    #[test]
    fn test_rejected_edit_leaves_state_unchanged() {
        let start = Instant::now();
        let mut app = App::new();
        type_text(&mut app, "0.12345678", start);

        assert!(!app.edit_input(InputEdit::Insert('9'), start));
        assert_eq!(app.input.value(), "0.12345678");
    }

    #[test]
    fn test_debounce_burst_issues_one_request_with_last_value() {
        let start = Instant::now();
        let mut app = App::new();

        // "1.25" tapé à 100ms d'intervalle
        let mut commands = Vec::new();
        for (i, c) in "1.25".chars().enumerate() {
            let now = start + Duration::from_millis(100 * i as u64);
            commands.extend(app.tick(now));
            app.edit_input(InputEdit::Insert(c), now);
        }

        for step in 0..40 {
            commands.extend(app.tick(start + Duration::from_millis(100 * step)));
        }

        assert_eq!(
            commands,
            vec![AppCommand::Convert {
                request: RequestId(1),
                btc_amount: 1.25
            }]
        );
    }

    #[test]
    fn test_sats_amount_is_sent_in_btc() {
        let start = Instant::now();
        let mut app = App::new();
        app.toggle_unit();
        type_text(&mut app, "50000", start);

        assert_eq!(
            app.tick(start + DEBOUNCE),
            vec![AppCommand::Convert {
                request: RequestId(1),
                btc_amount: 0.0005
            }]
        );
    }

    #[test]
    fn test_empty_input_clears_synchronously_without_request() {
        let start = Instant::now();
        let mut app = App::new();
        app.add_currency("JPY");
        let request = convert(&mut app, "1", start);
        app.handle_result(converted(request, 65000.0, 60000.0));
        app.handle_result(AppResult::AdditionalRatesLoaded {
            request,
            btc_amount: 1.0,
            rates: HashMap::from([("JPY".to_string(), 9_800_000.0)]),
        });

        clear_text(&mut app, start + Duration::from_secs(2));

        assert!(app.usd_amount.is_empty());
        assert!(app.eur_amount.is_empty());
        let jpy = app.currencies.get("JPY").unwrap();
        assert!(jpy.amount.is_empty());
        assert_eq!(jpy.rate, 9_800_000.0);
        assert!(app.tick(start + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn test_zero_cancels_pending_conversion() {
        let start = Instant::now();
        let mut app = App::new();
        type_text(&mut app, "0.5", start);
        assert!(app.has_pending_conversion());

        // "0.5" → "0." : montant nul
        app.edit_input(InputEdit::Backspace, start);
        assert!(!app.has_pending_conversion());
        assert!(app.tick(start + DEBOUNCE * 2).is_empty());
    }

    #[test]
    fn test_stale_conversion_is_discarded() {
        let start = Instant::now();
        let mut app = App::new();
        let first = convert(&mut app, "1", start);

        // Nouvelle frappe avant la réponse : "1" → "12"
        let later = start + Duration::from_secs(1);
        app.edit_input(InputEdit::Insert('2'), later);

        app.handle_result(converted(first, 65000.0, 60000.0));
        assert!(app.usd_amount.is_empty());

        let second = match app.tick(later + DEBOUNCE).as_slice() {
            [AppCommand::Convert { request, btc_amount }] => {
                assert_eq!(*btc_amount, 12.0);
                *request
            }
            other => panic!("conversion attendue, reçu {:?}", other),
        };
        assert!(second > first);

        app.handle_result(converted(second, 780000.0, 720000.0));
        assert_eq!(app.usd_amount, "780000.00");
    }

    #[test]
    fn test_conversion_failure_keeps_previous_amounts() {
        let start = Instant::now();
        let mut app = App::new();
        let first = convert(&mut app, "1", start);
        app.handle_result(converted(first, 65000.0, 60000.0));

        let later = start + Duration::from_secs(2);
        let second = convert(&mut app, "5", later);
        app.handle_result(AppResult::Failed {
            request: Some(second),
            failure: Failure::Conversion("HTTP 500".into()),
        });

        assert_eq!(app.error, Some(ConverterError::Conversion));
        assert_eq!(app.usd_amount, "65000.00");
        assert!(!app.loading);
    }

    #[test]
    fn test_caret_restored_after_round_trip() {
        let start = Instant::now();
        let mut app = App::new();
        type_text(&mut app, "12", start);
        app.input.move_left();
        let request = match app.tick(start + DEBOUNCE).as_slice() {
            [AppCommand::Convert { request, .. }] => *request,
            other => panic!("conversion attendue, reçu {:?}", other),
        };

        // Le curseur bouge pendant la requête, il est restauré à la réponse
        app.input.move_home();
        app.handle_result(converted(request, 1.0, 1.0));
        assert_eq!(app.input.cursor(), 1);
        assert_eq!(app.focus, Focus::Input);

        // Idem en cas d'échec
        app.edit_input(InputEdit::Insert('5'), start + Duration::from_secs(2));
        let request = match app.tick(start + Duration::from_secs(3)).as_slice() {
            [AppCommand::Convert { request, .. }] => *request,
            other => panic!("conversion attendue, reçu {:?}", other),
        };
        app.input.move_end();
        app.handle_result(AppResult::Failed {
            request: Some(request),
            failure: Failure::Conversion("timeout".into()),
        });
        assert_eq!(app.input.cursor(), 2);
    }

    #[test]
    fn test_price_refresh_failure_keeps_rates() {
        let mut app = App::new();
        app.handle_result(AppResult::PricesLoaded(sample_rates()));

        app.handle_result(AppResult::Failed {
            request: None,
            failure: Failure::Prices("connection refused".into()),
        });

        assert_eq!(app.error, Some(ConverterError::PriceFetch));
        assert_eq!(app.rates, Some(sample_rates()));

        // Un succès suivant efface le bandeau
        app.handle_result(AppResult::PricesLoaded(sample_rates()));
        assert!(app.error.is_none());
    }

    #[test]
    fn test_additional_rates_failure_is_silent() {
        let start = Instant::now();
        let mut app = App::new();
        app.add_currency("CHF");
        let request = convert(&mut app, "1", start);
        app.handle_result(converted(request, 65000.0, 60000.0));

        app.handle_result(AppResult::Failed {
            request: Some(request),
            failure: Failure::AdditionalRates("HTTP 429".into()),
        });

        assert!(app.error.is_none());
        assert_eq!(app.usd_amount, "65000.00");
    }

    #[test]
    fn test_conversion_requests_additional_rates() {
        let start = Instant::now();
        let mut app = App::new();
        app.add_currency("JPY");
        app.add_currency("GBP");
        let request = convert(&mut app, "1", start);
        assert!(app.loading);

        let follow_up = app.handle_result(converted(request, 65000.0, 60000.0));
        assert_eq!(app.usd_amount, "65000.00");
        assert_eq!(app.eur_amount, "60000.00");
        assert!(!app.loading);
        assert_eq!(
            follow_up,
            vec![AppCommand::FetchAdditionalRates {
                request,
                btc_amount: 1.0,
                codes: vec!["JPY".to_string(), "GBP".to_string()],
            }]
        );

        app.handle_result(AppResult::AdditionalRatesLoaded {
            request,
            btc_amount: 1.0,
            rates: HashMap::from([
                ("JPY".to_string(), 9_800_000.0),
                ("GBP".to_string(), 0.0),
            ]),
        });

        assert_eq!(app.currencies.get("JPY").unwrap().amount, "9800000.00");
        assert_eq!(app.currencies.get("GBP").unwrap().rate, 0.0);
    }

    #[test]
    fn test_add_currency_with_active_amount_converts_immediately() {
        let start = Instant::now();
        let mut app = App::new();
        let request = convert(&mut app, "1", start);
        app.handle_result(converted(request, 65000.0, 60000.0));

        app.open_picker();
        let commands = app.add_currency("JPY");

        assert!(!app.is_picker_open());
        assert_eq!(
            commands,
            vec![AppCommand::Convert {
                request: RequestId(2),
                btc_amount: 1.0
            }]
        );
    }

    #[test]
    fn test_add_currency_uses_known_rate_immediately() {
        let start = Instant::now();
        let mut app = App::new();
        app.add_currency("JPY");
        let request = convert(&mut app, "1", start);
        app.handle_result(converted(request, 65000.0, 60000.0));
        app.handle_result(AppResult::AdditionalRatesLoaded {
            request,
            btc_amount: 1.0,
            rates: HashMap::from([("JPY".to_string(), 9_800_000.0)]),
        });

        app.remove_currency("JPY");
        assert!(app.currencies.is_empty());

        // Ré-ajout : le montant est recalculé sans attendre de frappe
        let commands = app.add_currency("JPY");
        assert_eq!(app.currencies.get("JPY").unwrap().amount, "9800000.00");
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_add_currency_without_amount() {
        let mut app = App::new();
        assert!(app.add_currency("CHF").is_empty());
        assert!(app.add_currency("CHF").is_empty());
        assert!(app.add_currency("XXX").is_empty());
        assert_eq!(app.currencies.len(), 1);
        assert!(app.currencies.get("CHF").unwrap().amount.is_empty());
    }

    #[test]
    fn test_stale_additional_rates_are_cached_but_not_applied() {
        let start = Instant::now();
        let mut app = App::new();
        app.add_currency("JPY");
        let request = convert(&mut app, "1", start);
        app.handle_result(converted(request, 65000.0, 60000.0));

        // L'utilisateur retape avant l'arrivée des taux
        app.edit_input(InputEdit::Insert('0'), start + Duration::from_secs(2));
        app.handle_result(AppResult::AdditionalRatesLoaded {
            request,
            btc_amount: 1.0,
            rates: HashMap::from([("JPY".to_string(), 9_800_000.0)]),
        });
        assert!(app.currencies.get("JPY").unwrap().amount.is_empty());

        app.remove_currency("JPY");
        app.add_currency("JPY");
        assert_eq!(app.currencies.get("JPY").unwrap().rate, 9_800_000.0);
    }

    #[test]
    fn test_toggle_unit_round_trip() {
        let start = Instant::now();
        let mut app = App::new();
        type_text(&mut app, "0.001", start);

        app.toggle_unit();
        assert_eq!(app.unit, Unit::Sats);
        assert_eq!(app.input.value(), "100000");
        assert_eq!(app.input.cursor(), 6);

        app.toggle_unit();
        assert_eq!(app.unit, Unit::Btc);
        assert_eq!(app.input.value(), "0.001");
    }

    #[test]
    fn test_toggle_keeps_pending_conversion() {
        let start = Instant::now();
        let mut app = App::new();
        type_text(&mut app, "0.5", start);
        app.toggle_unit();

        assert_eq!(
            app.tick(start + DEBOUNCE),
            vec![AppCommand::Convert {
                request: RequestId(1),
                btc_amount: 0.5
            }]
        );
    }

    #[test]
    fn test_huge_btc_amount_stays_within_toggle_range() {
        let start = Instant::now();
        let mut app = App::new();

        // Le 12e chiffre dépasserait u64::MAX satoshis : frappe rejetée
        type_text(&mut app, "200000000000", start);
        assert_eq!(app.input.value(), "20000000000");
        assert!(app.has_pending_conversion());

        app.toggle_unit();
        assert_eq!(app.input.value(), "2000000000000000000");
        app.toggle_unit();
        assert_eq!(app.unit, Unit::Btc);
        assert_eq!(app.input.value(), "20000000000");
        assert!(app.has_pending_conversion());
    }

    #[test]
    fn test_toggle_unparseable_clears_input() {
        let start = Instant::now();
        let mut app = App::new();
        type_text(&mut app, ".", start);
        app.toggle_unit();
        assert_eq!(app.input.value(), "");
        assert!(!app.has_pending_conversion());
    }

    #[test]
    fn test_navigation_and_remove_selected() {
        let mut app = App::new();
        app.navigate_down();
        assert_eq!(app.focus, Focus::Input);

        app.add_currency("JPY");
        app.add_currency("CHF");
        app.navigate_down();
        assert_eq!(app.focus, Focus::Currencies);
        app.navigate_down();
        app.navigate_down();
        assert_eq!(app.selected_currency, 1);

        assert!(app.remove_selected_currency());
        assert_eq!(app.selected_currency, 0);
        assert!(app.remove_selected_currency());
        assert_eq!(app.focus, Focus::Input);
        assert!(!app.remove_selected_currency());
    }

    #[test]
    fn test_picker_offers_only_unselected() {
        let mut app = App::new();
        app.add_currency("ARS");
        app.open_picker();

        let options = app.picker_options();
        assert!(options.iter().all(|c| c.code != "ARS"));

        // Première option restante : AUD
        app.confirm_picker();
        assert!(app.currencies.contains("AUD"));
        assert!(!app.is_picker_open());
    }
}
