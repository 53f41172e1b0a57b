// src/lib.rs
//
// Calculatrice précise : expression texte -> résultat décimal formaté.
// Aucune interface ici : la couche de présentation appelle eval_expression
// et affiche la chaîne (ou le message d’erreur) telle quelle.

pub mod noyau;

pub use noyau::{eval_expression, eval_expression_avec, Decimal, ExpressionError, Reglages};
