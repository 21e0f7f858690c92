// ============================================================================
// Gestion des événements
// ============================================================================
// Lit les événements clavier de crossterm et les convertit en Event.
// Les prédicats is_*_event() décrivent le clavier de l'application.
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching : matches! sur le KeyCode
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Pas d'événement pendant `tick_rate` : l'occasion de faire avancer les minuteries
    Tick,
}

/// Gestionnaire d'événements
///
/// Le tick_rate borne la précision des minuteries : un debounce de 800ms
/// part au plus tick_rate après son échéance.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Lit le prochain événement (bloquant au plus tick_rate)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                // Resize, souris, Release : un simple redessin suffit
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

// ============================================================================
// Helpers : KeyEvent → intention
// ============================================================================

fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        Event::Tick => None,
    }
}

/// 'q' (quitter, en deux temps)
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q') | KeyCode::Char('Q')))
}

/// Ctrl+C : sortie immédiate
pub fn is_interrupt_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    } else {
        false
    }
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

/// Flèche haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Up | KeyCode::Char('k')))
}

/// Flèche bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Down | KeyCode::Char('j')))
}

pub fn is_left_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Left))
}

pub fn is_right_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Right))
}

pub fn is_home_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Home))
}

pub fn is_end_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::End))
}

pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// Touche Suppr
pub fn is_delete_key_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Delete))
}

/// 'u' ou Tab : bascule BTC ↔ SATS
pub fn is_toggle_unit_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Char('u') | KeyCode::Char('U') | KeyCode::Tab)
    )
}

/// 'a' ou '+' : ouvre/ferme le sélecteur de devise
pub fn is_add_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+'))
    )
}

/// 'x' ou 'd' : retire la devise sélectionnée
pub fn is_remove_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Char('d') | KeyCode::Char('D'))
    )
}

/// Chiffre ou point décimal (la validation fine est faite par Unit)
pub fn is_amount_char_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char(c)) if c.is_ascii_digit() || c == '.')
}

/// Extrait le caractère d'un événement clavier si c'est un caractère
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_code(event) {
        Some(KeyCode::Char(c)) => Some(c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
