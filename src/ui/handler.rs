// ============================================================================
// Traitement des événements
// ============================================================================
// Traduit chaque touche en opération du contrôleur selon le focus courant.
// Retourne les commandes à envoyer au worker (conversion immédiate après
// un ajout de devise, par exemple).
//
// CONCEPT RUST : Pattern matching avec guards
// - Un bras par (touche, contexte)
// - L'ordre des bras compte : le premier qui matche gagne
// ============================================================================

use std::time::Instant;

use tracing::{debug, info};

use crate::app::{App, Focus};
use crate::models::InputEdit;
use crate::ui::events::{
    get_char_from_event, is_add_event, is_amount_char_event, is_backspace_event,
    is_delete_key_event, is_down_event, is_end_event, is_enter_event, is_escape_event,
    is_home_event, is_interrupt_event, is_left_event, is_quit_event, is_remove_event,
    is_right_event, is_toggle_unit_event, is_up_event, Event,
};
use crate::worker::AppCommand;

/// Traite un événement et met à jour l'état de l'application
pub fn handle_event(app: &mut App, event: Event, now: Instant) -> Vec<AppCommand> {
    // Toute touche autre que 'q' annule une demande de quit
    if matches!(event, Event::Key(_)) && !is_quit_event(&event) {
        app.cancel_quit();
    }

    match event {
        Event::Tick => {}

        Event::Key(_) if is_interrupt_event(&event) => {
            info!("User interrupted");
            app.quit();
        }

        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // ========================================
        // Sélecteur de devise
        // ========================================
        Event::Key(_) if is_add_event(&event) => {
            app.toggle_picker();
            debug!(open = app.is_picker_open(), "Picker toggled");
        }
        Event::Key(_) if app.focus == Focus::Picker && is_escape_event(&event) => {
            debug!("Picker closed");
            app.close_picker();
        }
        Event::Key(_) if app.focus == Focus::Picker && is_enter_event(&event) => {
            return app.confirm_picker();
        }
        Event::Key(_) if app.focus == Focus::Picker && is_up_event(&event) => app.navigate_up(),
        Event::Key(_) if app.focus == Focus::Picker && is_down_event(&event) => app.navigate_down(),
        Event::Key(_) if app.focus == Focus::Picker => {}

        // ========================================
        // Commandes globales (saisie et liste)
        // ========================================
        Event::Key(_) if is_toggle_unit_event(&event) => app.toggle_unit(),

        Event::Key(_) if is_up_event(&event) => app.navigate_up(),
        Event::Key(_) if is_down_event(&event) => app.navigate_down(),

        // ========================================
        // Liste des devises additionnelles
        // ========================================
        Event::Key(_) if app.focus == Focus::Currencies && is_remove_event(&event) => {
            app.remove_selected_currency();
        }
        Event::Key(_) if app.focus == Focus::Currencies && is_escape_event(&event) => {
            app.focus_input();
        }

        // ========================================
        // Champ de saisie
        // ========================================
        Event::Key(_) if is_amount_char_event(&event) => {
            if let Some(c) = get_char_from_event(&event) {
                app.focus_input();
                app.edit_input(InputEdit::Insert(c), now);
            }
        }
        Event::Key(_) if app.focus == Focus::Input && is_backspace_event(&event) => {
            app.edit_input(InputEdit::Backspace, now);
        }
        Event::Key(_) if app.focus == Focus::Input && is_delete_key_event(&event) => {
            app.edit_input(InputEdit::Delete, now);
        }
        Event::Key(_) if app.focus == Focus::Input && is_left_event(&event) => app.input.move_left(),
        Event::Key(_) if app.focus == Focus::Input && is_right_event(&event) => app.input.move_right(),
        Event::Key(_) if app.focus == Focus::Input && is_home_event(&event) => app.input.move_home(),
        Event::Key(_) if app.focus == Focus::Input && is_end_event(&event) => app.input.move_end(),

        Event::Key(_) => {
            // Toute autre touche : ignorée
        }
    }

    Vec::new()
}

// ============================================================================
// Tests
// ============================================================================
