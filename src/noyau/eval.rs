//! Noyau : évaluation (pipeline réel)
//!
//! tokenize -> RPN -> pile de valeurs (Decimal) -> format_resultat
//!
//! Chaque appel possède ses propres jetons, file RPN et pile : aucun état partagé
//! hormis le registre (lecture seule).

use log::{debug, trace};

use super::decimal::Decimal;
use super::erreur::ExpressionError;
use super::format::format_resultat;
use super::jetons::{format_tokens, tokenize, Tok};
use super::operations::{binaire, unaire};
use super::registre::{registre, Arite};
use super::reglages::Reglages;
use super::rpn::to_rpn;

/// API publique : évalue une expression avec les réglages par défaut.
///
/// Retourne le résultat formaté ("17.8", "1E102") ou une erreur affichable telle quelle.
pub fn eval_expression(expr_str: &str) -> Result<String, ExpressionError> {
    eval_expression_avec(expr_str, &Reglages::default())
}

/// Même pipeline, précision choisie.
pub fn eval_expression_avec(
    expr_str: &str,
    reglages: &Reglages,
) -> Result<String, ExpressionError> {
    let resultat = evaluer(expr_str, reglages);
    if let Err(e) = &resultat {
        debug!("échec: expr={expr_str:?} err={e}");
    }
    resultat
}

fn evaluer(expr_str: &str, reglages: &Reglages) -> Result<String, ExpressionError> {
    // Entrée vide (ou blanche) : 0
    if expr_str.trim().is_empty() {
        return Ok("0".to_string());
    }

    // 1) Jetons
    let jetons = tokenize(expr_str)?;
    debug!("jetons: {}", format_tokens(&jetons));

    // 2) RPN
    let rpn = to_rpn(&jetons)?;
    debug!("rpn: {}", format_tokens(&rpn));

    // 3) Pile
    let valeur = eval_rpn(&rpn, reglages)?;

    // 4) Rendu
    Ok(format_resultat(&valeur, reglages.precision()))
}

/// Exécute une file RPN.
/// - Num : littéral exact, arrondi à la précision
/// - Const : valeur stockée (tous ses chiffres)
/// - Op : dépile 1 ou 2 opérandes (droite d’abord), empile le résultat
///
/// Pile insuffisante ou opérandes en trop => erreur de syntaxe (sans index).
pub fn eval_rpn(rpn: &[Tok], reglages: &Reglages) -> Result<Decimal, ExpressionError> {
    let reg = registre();
    let prec = reglages.precision();
    let mut pile: Vec<Decimal> = Vec::with_capacity(rpn.len());

    for tok in rpn {
        match tok {
            Tok::Num(txt) => {
                let v = Decimal::parse(txt).ok_or_else(ExpressionError::syntaxe)?;
                pile.push(v.arrondir(prec));
            }

            Tok::Const(c) => pile.push(reg.valeur(*c).clone()),

            Tok::Op(op) => {
                let desc = reg.descripteur(*op);
                let v = match desc.arite {
                    Arite::Unaire => {
                        let x = pile.pop().ok_or_else(ExpressionError::syntaxe)?;
                        let v = unaire(*op, &x, prec)?;
                        trace!("{} {x} = {v}", desc.symbole);
                        v
                    }
                    Arite::Binaire => {
                        let d = pile.pop().ok_or_else(ExpressionError::syntaxe)?;
                        let g = pile.pop().ok_or_else(ExpressionError::syntaxe)?;
                        let v = binaire(*op, &g, &d, prec)?;
                        trace!("{g} {} {d} = {v}", desc.symbole);
                        v
                    }
                };
                pile.push(v);
            }

            // to_rpn n’émet jamais de parenthèse
            Tok::Par(_) => return Err(ExpressionError::syntaxe()),
        }
    }

    match (pile.pop(), pile.is_empty()) {
        (Some(v), true) => Ok(v),
        _ => Err(ExpressionError::syntaxe()),
    }
}
