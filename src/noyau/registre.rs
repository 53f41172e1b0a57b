// src/noyau/registre.rs
//
// Tables immuables : opérateurs (arité, associativité, précédence) + constantes.
// Construites une seule fois (OnceLock), lues ensuite sans verrou.
//
// IMPORTANT : l’ordre des opérateurs est l’ordre de reconnaissance lexicale.
// Un symbole qui est préfixe d’un autre ("rt" / "r", "sin" / "sinh") doit venir APRÈS lui.

use std::sync::OnceLock;

use super::decimal::Decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operateur {
    Plus,
    Moins,
    Negation,
    Fois,
    Divise,
    Modulo,
    Puissance,
    Scientifique,
    Factorielle,
    Racine,
    Radians,
    Degres,
    RacineCarree,
    Log,
    Ln,
    Sinh,
    Cosh,
    Tanh,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arite {
    Unaire,
    Binaire,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativite {
    Gauche,
    Droite,
}

/// Rang de liaison, du plus faible au plus fort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Addition,
    Multiplication,
    Exposant,
    Fonction,
    Factorielle,
    Scientifique,
}

#[derive(Clone, Debug)]
pub struct Descripteur {
    pub operateur: Operateur,
    pub symbole: &'static str,
    pub arite: Arite,
    pub associativite: Associativite,
    pub precedence: Precedence,
}

impl Descripteur {
    /// Unaire à droite : fonction ou négation, écrite devant son argument.
    pub fn est_prefixe(&self) -> bool {
        self.arite == Arite::Unaire && self.associativite == Associativite::Droite
    }

    /// Unaire à gauche : écrit après son argument ("!").
    pub fn est_postfixe(&self) -> bool {
        self.arite == Arite::Unaire && self.associativite == Associativite::Gauche
    }

    pub fn est_binaire_gauche(&self) -> bool {
        self.arite == Arite::Binaire && self.associativite == Associativite::Gauche
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constante {
    Pi,
    E,
}

#[derive(Clone, Debug)]
pub struct DefConstante {
    pub constante: Constante,
    pub symbole: &'static str,
    pub valeur: Decimal,
}

/// Chiffres stockés : bien au-delà de PRECISION_MAX (cf. reglages.rs).
const PI_64: &str = "3.1415926535897932384626433832795028841971693993751058209749445923";
const E_64: &str = "2.7182818284590452353602874713526624977572470936999595749669676277";

pub struct Registre {
    operateurs: Vec<Descripteur>,
    constantes: Vec<DefConstante>,
}

fn op(
    operateur: Operateur,
    symbole: &'static str,
    arite: Arite,
    associativite: Associativite,
    precedence: Precedence,
) -> Descripteur {
    Descripteur {
        operateur,
        symbole,
        arite,
        associativite,
        precedence,
    }
}

fn constante(constante: Constante, symbole: &'static str, chiffres: &str) -> DefConstante {
    DefConstante {
        constante,
        symbole,
        // littéraux constants ci-dessus : toujours valides
        valeur: Decimal::parse(chiffres).unwrap_or_else(Decimal::zero),
    }
}

impl Registre {
    fn construire() -> Self {
        use Arite::*;
        use Associativite::*;
        use Operateur::*;
        use Precedence as P;

        let operateurs = vec![
            op(Plus, "+", Binaire, Gauche, P::Addition),
            op(Moins, "-", Binaire, Gauche, P::Addition),
            // même symbole que Moins : jamais reconnu lexicalement, choisi par le contexte
            op(Negation, "-", Unaire, Droite, P::Exposant),
            op(Fois, "*", Binaire, Gauche, P::Multiplication),
            op(Divise, "/", Binaire, Gauche, P::Multiplication),
            op(Modulo, "%", Binaire, Gauche, P::Multiplication),
            op(Puissance, "^", Binaire, Droite, P::Exposant),
            op(Scientifique, "E", Binaire, Droite, P::Scientifique),
            op(Factorielle, "!", Unaire, Gauche, P::Factorielle),
            op(Racine, "rt", Binaire, Droite, P::Exposant),
            op(Radians, "r", Unaire, Droite, P::Fonction),
            op(Degres, "d", Unaire, Droite, P::Fonction),
            op(RacineCarree, "sqrt", Unaire, Droite, P::Exposant),
            op(Log, "log", Unaire, Droite, P::Fonction),
            op(Ln, "ln", Unaire, Droite, P::Fonction),
            op(Sinh, "sinh", Unaire, Droite, P::Fonction),
            op(Cosh, "cosh", Unaire, Droite, P::Fonction),
            op(Tanh, "tanh", Unaire, Droite, P::Fonction),
            op(Sin, "sin", Unaire, Droite, P::Fonction),
            op(Cos, "cos", Unaire, Droite, P::Fonction),
            op(Tan, "tan", Unaire, Droite, P::Fonction),
            op(Asin, "asin", Unaire, Droite, P::Fonction),
            op(Acos, "acos", Unaire, Droite, P::Fonction),
            op(Atan, "atan", Unaire, Droite, P::Fonction),
        ];

        let constantes = vec![
            constante(Constante::Pi, "pi", PI_64),
            constante(Constante::E, "e", E_64),
        ];

        Registre {
            operateurs,
            constantes,
        }
    }

    /// Ordre de reconnaissance lexicale.
    pub fn operateurs(&self) -> &[Descripteur] {
        &self.operateurs
    }

    pub fn descripteur(&self, op: Operateur) -> &Descripteur {
        // construit dans l’ordre de déclaration de l’enum
        &self.operateurs[op as usize]
    }

    pub fn constantes(&self) -> &[DefConstante] {
        &self.constantes
    }

    pub fn constante(&self, c: Constante) -> &DefConstante {
        &self.constantes[c as usize]
    }

    pub fn valeur(&self, c: Constante) -> &Decimal {
        &self.constante(c).valeur
    }
}

static REGISTRE: OnceLock<Registre> = OnceLock::new();

pub fn registre() -> &'static Registre {
    REGISTRE.get_or_init(Registre::construire)
}
