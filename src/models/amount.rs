// ============================================================================
// Structure : AmountInput
// ============================================================================
// Buffer de saisie du montant avec position du curseur (caret)
//
// CONCEPT : Édition atomique
// - Chaque touche construit une chaîne candidate
// - La candidate est validée selon l'unité active
// - Rejet = aucun changement d'état (l'ancienne valeur reste affichée)
//
// Les caractères acceptés sont tous ASCII, donc index de caractère = index d'octet.
// ============================================================================

use crate::models::Unit;

/// Une modification élémentaire demandée par l'utilisateur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEdit {
    /// Insère un caractère au curseur
    Insert(char),
    /// Supprime le caractère avant le curseur
    Backspace,
    /// Supprime le caractère sous le curseur
    Delete,
}

/// Montant saisi dans l'unité active
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountInput {
    value: String,
    cursor: usize,
}

impl AmountInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Applique une modification si le résultat est valide pour `unit`
    ///
    /// Retourne true si la saisie a été acceptée et a changé la valeur.
    pub fn apply(&mut self, edit: InputEdit, unit: Unit) -> bool {
        let mut candidate = self.value.clone();
        let mut cursor = self.cursor;

        match edit {
            InputEdit::Insert(c) => {
                if !c.is_ascii() {
                    return false;
                }
                candidate.insert(cursor, c);
                cursor += 1;
            }
            InputEdit::Backspace => {
                if cursor == 0 {
                    return false;
                }
                cursor -= 1;
                candidate.remove(cursor);
            }
            InputEdit::Delete => {
                if cursor >= candidate.len() {
                    return false;
                }
                candidate.remove(cursor);
            }
        }

        if !unit.accepts(&candidate) {
            return false;
        }

        self.value = candidate;
        self.cursor = cursor;
        true
    }

    /// Remplace toute la valeur (bascule d'unité) et place le curseur à la fin
    pub fn replace(&mut self, value: String) {
        self.cursor = value.len();
        self.value = value;
    }

    /// Repositionne le curseur, borné à la longueur de la valeur
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.value.len());
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.len();
    }
}

// ============================================================================
// Tests
// ============================================================================
