// src/noyau/rpn.rs
//
// Shunting-yard : suite de Tok (infixe) -> RPN (postfix)
//
// Règles:
// - Num / Const : sortie directe
// - '(' : empilée ; ')' : dépile jusqu’à '(' (jetée, jamais émise)
// - opérateur entrant : dépile chaque sommet qui lie plus fort (cf. doit_depiler), puis s’empile
// - fin : tout ce qui reste sur la pile sort, dans l’ordre de dépilement
//
// NOTE:
// - Un opérateur préfixé (fonction, négation) occupe une place d’opérande :
//   rien à sa gauche n’est complet, il ne dépile donc jamais.
//   C’est ce qui rend valides "1E-5", "2^-1", "2*sqrt4".

use super::erreur::ExpressionError;
use super::jetons::{Parenthese, Tok};
use super::registre::{registre, Descripteur};

/// Le sommet `sommet` doit-il sortir avant d’empiler `entrant` ?
fn doit_depiler(entrant: &Descripteur, sommet: &Descripteur) -> bool {
    if entrant.est_prefixe() {
        return false;
    }

    (entrant.est_binaire_gauche() && entrant.precedence <= sommet.precedence)
        || entrant.precedence < sommet.precedence
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Op(Sin), Par(Gauche), Const(Pi), Op(Divise), Num("2"), Par(Droite)]
///   rpn:    [Const(Pi), Num("2"), Op(Divise), Op(Sin)]
///
/// Parenthèses déséquilibrées => erreur de syntaxe (sans index).
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, ExpressionError> {
    let reg = registre();
    let mut out: Vec<Tok> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Tok> = Vec::new();

    for tok in tokens {
        match tok {
            Tok::Num(_) | Tok::Const(_) => out.push(tok.clone()),

            Tok::Par(Parenthese::Gauche) => ops.push(tok.clone()),

            Tok::Par(Parenthese::Droite) => loop {
                match ops.pop() {
                    Some(Tok::Par(Parenthese::Gauche)) => break,
                    Some(top) => out.push(top),
                    // ')' sans '(' correspondante
                    None => return Err(ExpressionError::syntaxe()),
                }
            },

            Tok::Op(op) => {
                let entrant = reg.descripteur(*op);

                // '(' sur la pile arrête la boucle (motif non Op)
                while let Some(&Tok::Op(sommet)) = ops.last() {
                    if !doit_depiler(entrant, reg.descripteur(sommet)) {
                        break;
                    }
                    ops.pop();
                    out.push(Tok::Op(sommet));
                }

                ops.push(tok.clone());
            }
        }
    }

    // vide la pile ops
    while let Some(top) = ops.pop() {
        if matches!(top, Tok::Par(_)) {
            return Err(ExpressionError::syntaxe());
        }
        out.push(top);
    }

    Ok(out)
}
