// src/noyau/jetons.rs

use std::fmt;

use super::decimal::Decimal;
use super::erreur::ExpressionError;
use super::registre::{registre, Constante, Operateur};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parenthese {
    Gauche,
    Droite,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    // Littéral tel qu’écrit (le texte donne aussi la largeur consommée)
    Num(String),
    Const(Constante),
    Op(Operateur),
    Par(Parenthese),
}

impl Tok {
    /// Symbole rendu : c’est aussi ce que le jeton consomme dans la source.
    pub fn symbole(&self) -> &str {
        match self {
            Tok::Num(txt) => txt,
            Tok::Const(c) => registre().constante(*c).symbole,
            Tok::Op(op) => registre().descripteur(*op).symbole,
            Tok::Par(Parenthese::Gauche) => "(",
            Tok::Par(Parenthese::Droite) => ")",
        }
    }

    /// Largeur en caractères (pas en octets).
    pub fn largeur(&self) -> usize {
        self.symbole().chars().count()
    }

    /// Jeton qui termine une valeur : nombre, constante, ')' ou opérateur postfixé.
    fn termine_valeur(&self) -> bool {
        match self {
            Tok::Num(_) | Tok::Const(_) | Tok::Par(Parenthese::Droite) => true,
            Tok::Op(op) => registre().descripteur(*op).est_postfixe(),
            Tok::Par(Parenthese::Gauche) => false,
        }
    }
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbole())
    }
}

/// Tokenize une chaîne en jetons.
/// Ordre d’essai à chaque position :
/// - nombre : suite maximale de chiffres et de '.' (au plus un point valide)
/// - parenthèses ( )
/// - constantes (pi, e)
/// - opérateurs, dans l’ordre du registre (symboles longs avant leurs préfixes)
///
/// Puis deux décisions de contexte :
/// - '-' en tête, après un opérateur (sauf '!') ou après '(' => négation
/// - multiplication implicite entre une valeur (nombre, constante, ')')
///   et ce qui ouvre une valeur sans opérateur infixe (fonction, constante, '(')
///
/// Les index d’erreur comptent les caractères.
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ExpressionError> {
    let reg = registre();
    let chars: Vec<char> = s.chars().collect();
    let mut out: Vec<Tok> = Vec::new();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let tok = if c.is_ascii_digit() || c == '.' {
            let fin = chars[i..]
                .iter()
                .position(|ch| !(ch.is_ascii_digit() || *ch == '.'))
                .map_or(chars.len(), |n| i + n);
            let txt: String = chars[i..fin].iter().collect();
            if Decimal::parse(&txt).is_none() {
                return Err(ExpressionError::syntaxe_a(i));
            }
            Tok::Num(txt)
        } else if c == '(' {
            Tok::Par(Parenthese::Gauche)
        } else if c == ')' {
            Tok::Par(Parenthese::Droite)
        } else if let Some(def) = reg
            .constantes()
            .iter()
            .find(|d| commence_par(&chars, i, d.symbole))
        {
            Tok::Const(def.constante)
        } else if let Some(desc) = reg
            .operateurs()
            .iter()
            .filter(|d| d.operateur != Operateur::Negation)
            .find(|d| commence_par(&chars, i, d.symbole))
        {
            if desc.operateur == Operateur::Moins && attend_operande(out.last()) {
                Tok::Op(Operateur::Negation)
            } else {
                Tok::Op(desc.operateur)
            }
        } else {
            return Err(ExpressionError::syntaxe_a(i));
        };

        if multiplication_implicite(out.last(), &tok) {
            out.push(Tok::Op(Operateur::Fois));
        }

        i += tok.largeur();
        out.push(tok);
    }

    Ok(out)
}

fn commence_par(chars: &[char], i: usize, symbole: &str) -> bool {
    let mut k = i;
    for c in symbole.chars() {
        if chars.get(k) != Some(&c) {
            return false;
        }
        k += 1;
    }
    true
}

/// Vrai si la position courante attend un opérande (un '-' y est une négation).
fn attend_operande(precedent: Option<&Tok>) -> bool {
    match precedent {
        None => true,
        Some(t) => !t.termine_valeur(),
    }
}

fn multiplication_implicite(precedent: Option<&Tok>, courant: &Tok) -> bool {
    let apres_valeur = matches!(
        precedent,
        Some(Tok::Num(_) | Tok::Const(_) | Tok::Par(Parenthese::Droite))
    );
    let ouvre_valeur = match courant {
        Tok::Const(_) | Tok::Par(Parenthese::Gauche) => true,
        Tok::Op(op) => registre().descripteur(*op).est_prefixe(),
        _ => false,
    };
    apres_valeur && ouvre_valeur
}

/// Format utilitaire (debug) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    for t in tokens {
        let s = match t {
            // distinguer la négation du moins binaire à la lecture
            Tok::Op(Operateur::Negation) => "u-".to_string(),
            _ => t.to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
