// ============================================================================
// Minuteries possédées : Debouncer et Interval
// ============================================================================
// Les minuteries sont des champs du contrôleur, pas des globales :
// - au plus UNE conversion en attente (Debouncer)
// - au plus UN rafraîchissement périodique (Interval)
// - teardown = cancel()/stop(), rien ne fuit
//
// CONCEPT : Temps injecté
// - Chaque méthode reçoit `now: Instant` au lieu d'appeler Instant::now()
// - La boucle principale passe l'heure réelle, les tests passent des
//   instants fabriqués (tests déterministes, sans sleep)
// ============================================================================

use std::time::{Duration, Instant};

// ============================================================================
// Structure : Debouncer
// ============================================================================

/// Debounce "trailing" : seule la dernière valeur d'une rafale est livrée
///
/// CONCEPT RUST : Générique <T>
/// - Le Debouncer transporte la valeur à livrer (ici le montant en BTC)
/// - schedule() remplace la valeur ET repousse l'échéance
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Programme `value` pour `now + delay`, en remplaçant toute attente précédente
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Annule l'attente en cours (sans effet s'il n'y en a pas)
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Livre la valeur si l'échéance est atteinte
    ///
    /// CONCEPT RUST : Option::take()
    /// - Sort la valeur de l'Option et laisse None à la place
    /// - Une valeur n'est livrée qu'une seule fois
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => {
                self.pending.take().map(|(_, value)| value)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Structure : Interval
// ============================================================================

/// Minuterie périodique à période fixe
///
/// - start() arme un premier déclenchement immédiat
/// - poll() déclenche au plus une fois par appel ; les périodes manquées
///   ne s'accumulent pas (la prochaine échéance repart de `now`)
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Démarre (ou redémarre) la minuterie ; premier tick dû immédiatement
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Retourne true si un tick est dû, et réarme pour `now + period`
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
