// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod handler;   // Touche → opération du contrôleur
pub mod view;      // Projection pure App → ConverterView
pub mod format;    // Formatage des nombres
pub mod dashboard; // Rendu ratatui d'un ConverterView

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
pub use handler::handle_event;
pub use view::{project, ConverterView};
