// src/noyau/reglages.rs
//
// Réglages d’évaluation : une seule molette, la précision interne
// (chiffres significatifs). Le résultat présenté en garde un de moins.

pub const PRECISION_DEFAUT: usize = 21;
pub const PRECISION_MIN: usize = 2;
pub const PRECISION_MAX: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reglages {
    precision: usize,
}

impl Reglages {
    /// Précision ramenée dans [PRECISION_MIN, PRECISION_MAX].
    pub fn new(precision: usize) -> Self {
        Reglages {
            precision: precision.clamp(PRECISION_MIN, PRECISION_MAX),
        }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn precision_affichee(&self) -> usize {
        self.precision - 1
    }
}

impl Default for Reglages {
    fn default() -> Self {
        Reglages::new(PRECISION_DEFAUT)
    }
}
