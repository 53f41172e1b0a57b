// src/noyau/erreur.rs
//
// Erreurs du noyau : deux familles seulement.
// - Syntaxe : jeton inconnu (index du caractère) ou structure invalide (index inconnu)
// - Math    : opération indéfinie pour ses opérandes
//
// Le message (Display) est affichable tel quel par la couche de présentation.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("{}", message_syntaxe(.index))]
    Syntaxe { index: Option<usize> },

    #[error("Erreur mathématique : {message}.")]
    Math { message: String },
}

impl ExpressionError {
    /// Erreur de syntaxe localisée (index en caractères, pas en octets).
    pub fn syntaxe_a(index: usize) -> Self {
        ExpressionError::Syntaxe { index: Some(index) }
    }

    /// Erreur de syntaxe structurelle (parenthèses, pile, opérandes en trop).
    pub fn syntaxe() -> Self {
        ExpressionError::Syntaxe { index: None }
    }

    pub fn math(message: impl Into<String>) -> Self {
        ExpressionError::Math {
            message: message.into(),
        }
    }

    /// Dépassement de l’exposant décimal (cf. `decimal::EXPOSANT_MAX`).
    pub fn depassement() -> Self {
        Self::math("dépassement de capacité")
    }

    /// Résultat trop proche de zéro pour l’exposant décimal.
    pub fn sous_depassement() -> Self {
        Self::math("sous-dépassement de capacité")
    }

    pub fn est_syntaxe(&self) -> bool {
        matches!(self, ExpressionError::Syntaxe { .. })
    }

    pub fn est_math(&self) -> bool {
        matches!(self, ExpressionError::Math { .. })
    }
}

fn message_syntaxe(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("Erreur de syntaxe à l’index [{i}]."),
        None => "Erreur de syntaxe.".to_string(),
    }
}
