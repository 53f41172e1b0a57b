// src/noyau/format.rs
//
// Rendu final d’une valeur :
// - arrondi demi vers le haut à (précision − 1) chiffres significatifs
// - forme décimale minimale ("17.8", "-12", "0.05")
// - notation scientifique ("1E102", "-3.5E-30") si la forme décimale dépasse précision + 3 caractères
//
// Le rendu est relisible tel quel par tokenize (même valeur, même rendu).

use super::decimal::Decimal;

pub fn format_resultat(valeur: &Decimal, precision: usize) -> String {
    let presentee = precision.saturating_sub(1).max(1);
    let v = valeur.arrondir(presentee);

    if v.longueur_en_clair() > (precision + 3) as u64 {
        v.en_scientifique()
    } else {
        v.en_clair()
    }
}
