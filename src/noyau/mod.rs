//! Noyau de la calculatrice précise
//!
//! Organisation interne :
//! - registre.rs     : tables immuables opérateurs + constantes (π, e)
//! - jetons.rs       : tokenisation (moins unaire, multiplication implicite)
//! - rpn.rs          : shunting-yard -> file RPN
//! - eval.rs         : pipeline complet + pile de valeurs
//! - operations.rs   : sémantique numérique de chaque opérateur
//! - decimal.rs      : décimal à précision arbitraire (mantisse BigInt × 10^exposant)
//! - virgule_fixe.rs : séries en entiers scalés (π, ln, exp, atan, sin/cos, sinh)
//! - format.rs       : rendu décimal / scientifique
//! - reglages.rs     : précision de travail
//! - erreur.rs       : Syntaxe / Math

pub mod decimal;
pub mod erreur;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod operations;
pub mod registre;
pub mod reglages;
pub mod rpn;
pub mod virgule_fixe;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use decimal::Decimal;
pub use erreur::ExpressionError;
pub use eval::{eval_expression, eval_expression_avec};
pub use reglages::Reglages;
