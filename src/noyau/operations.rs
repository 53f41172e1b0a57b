// src/noyau/operations.rs
//
// Sémantique numérique de chaque opérateur (un seul dispatch par match).
// - arithmétique : déléguée à Decimal (arrondi à `prec`)
// - transcendantes : noyaux virgule_fixe + GARDE chiffres, puis arrondi à `prec`
// - toute opération indéfinie => ExpressionError::Math, jamais NaN/infini
//
// Résultats proches de zéro (sin π, ln 1.0000…, acos 0.9999…) : l’échelle est
// augmentée jusqu’à obtenir assez de chiffres significatifs (precision_relative).

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use super::decimal::Decimal;
use super::erreur::ExpressionError;
use super::registre::Operateur;
use super::virgule_fixe::{self as vf, div_arrondie, div_floor, pow10};

/// Chiffres de garde des calculs intermédiaires.
const GARDE: usize = 10;

/// Nombre maximal d’échelles essayées par precision_relative.
const TENTATIVES: usize = 4;

/// |x| ≥ 10^1000 : réduction modulo π/2 hors de portée.
const MAGNITUDE_TRIG_MAX: i64 = 1000;

/// exp(x) pour |x| ≥ 10^17 dépasse forcément l’exposant maximal.
const MAGNITUDE_EXP_MAX: i64 = 16;

/// Au-delà, rt passe par exp(ln(x)/n) au lieu de BigInt::nth_root.
const DEGRE_RACINE_ENTIERE: u64 = 100;

/// |x| ≥ 100 : tanh(x) = ±1 à toute précision admise.
const TANH_SATURE: i64 = 100;

pub fn unaire(op: Operateur, x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    match op {
        Operateur::Negation => Ok((-x).arrondir(prec)),
        Operateur::Factorielle => factorielle(x, prec),
        Operateur::RacineCarree => racine_carree(x, prec),
        Operateur::Log => log10(x, prec),
        Operateur::Ln => ln(x, prec),
        Operateur::Sin => sin(x, prec),
        Operateur::Cos => cos(x, prec),
        Operateur::Tan => tan(x, prec),
        Operateur::Asin => asin(x, prec),
        Operateur::Acos => acos(x, prec),
        Operateur::Atan => atan(x, prec),
        Operateur::Sinh => sinh(x, prec),
        Operateur::Cosh => cosh(x, prec),
        Operateur::Tanh => tanh(x, prec),
        Operateur::Radians => radians(x, prec),
        Operateur::Degres => degres(x, prec),
        // opérateur binaire avec un seul opérande : RPN mal formée
        _ => Err(ExpressionError::syntaxe()),
    }
}

/// `g op d` (g = opérande de gauche dans la source).
pub fn binaire(
    op: Operateur,
    g: &Decimal,
    d: &Decimal,
    prec: usize,
) -> Result<Decimal, ExpressionError> {
    match op {
        Operateur::Plus => Ok(g.somme(d, prec)),
        Operateur::Moins => Ok(g.difference(d, prec)),
        Operateur::Fois => g.produit(d, prec),
        Operateur::Divise => g.quotient(d, prec),
        Operateur::Modulo => g.reste(d, prec),
        Operateur::Puissance => puissance(g, d, prec),
        Operateur::Scientifique => scientifique(g, d, prec),
        // "3rt27" : racine 3e de 27
        Operateur::Racine => racine_n(g, d, prec),
        _ => Err(ExpressionError::syntaxe()),
    }
}

/* ------------------------ Outils ------------------------ */

/// |x| < 10^-(prec+GARDE) : f(x) = x (ou 1) à la précision voulue.
fn quasi_nul(x: &Decimal, prec: usize) -> bool {
    !x.est_zero() && x.magnitude() < -((prec + GARDE) as i64)
}

/// Ramène un entier scalé ×10^de à l’échelle ×10^vers (vers ≤ de).
fn reduire(n: &BigInt, de: usize, vers: usize) -> BigInt {
    div_arrondie(n, &pow10(de - vers))
}

fn nb_chiffres_u64(n: u64) -> usize {
    n.to_string().len()
}

/// Évalue `calcul(w)` (entier scalé ×10^w) en augmentant w tant que le résultat
/// n’a pas prec+GARDE chiffres au-dessus du dernier rang calculé.
fn precision_relative<F>(prec: usize, mut calcul: F) -> Result<Decimal, ExpressionError>
where
    F: FnMut(usize) -> Result<BigInt, ExpressionError>,
{
    let voulu = (prec + GARDE) as i64;
    let mut w = prec + GARDE;

    for _ in 1..TENTATIVES {
        let valeur = Decimal::depuis_echelle(calcul(w)?, w);
        let disponibles = w as i64 + valeur.magnitude();
        if !valeur.est_zero() && disponibles >= voulu {
            return Ok(valeur.arrondir(prec));
        }
        w += if valeur.est_zero() {
            w
        } else {
            (voulu - disponibles) as usize + GARDE
        };
    }

    Ok(Decimal::depuis_echelle(calcul(w)?, w).arrondir(prec))
}

/// precision_relative, sauf qu’un résultat sous 10^plancher vaut zéro
/// (au voisinage de kπ, l’écart restant est celui de la valeur stockée de π).
fn precision_relative_plancher<F>(
    prec: usize,
    plancher: i64,
    mut calcul: F,
) -> Result<Decimal, ExpressionError>
where
    F: FnMut(usize) -> Result<BigInt, ExpressionError>,
{
    let w = (GARDE as i64 - plancher).max((prec + GARDE) as i64) as usize;
    let approche = Decimal::depuis_echelle(calcul(w)?, w);
    if approche.est_zero() || approche.magnitude() < plancher {
        return Ok(Decimal::zero());
    }
    precision_relative(prec, calcul)
}

/// Seuil du zéro trigonométrique : 10^-(prec+GARDE), abaissé avec |x| quand |x| < 1.
fn plancher_trig(x: &Decimal, prec: usize) -> i64 {
    x.magnitude().min(0) - (prec + GARDE) as i64
}

fn pi_decimal(prec: usize) -> Decimal {
    Decimal::depuis_echelle(vf::pi(prec), prec)
}

/* ------------------------ exp / ln / log ------------------------ */

/// exp(x) = 10^n · exp(x − n·ln 10), avec 0 ≤ x − n·ln 10 < ln 10.
fn exp_decimal(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_zero() {
        return Ok(Decimal::un());
    }
    let hors_bornes = || {
        if x.est_negatif() {
            ExpressionError::sous_depassement()
        } else {
            ExpressionError::depassement()
        }
    };
    if x.magnitude() > MAGNITUDE_EXP_MAX {
        return Err(hors_bornes());
    }

    // la partie entière de x consomme des chiffres de ln 10
    let s = prec + GARDE + x.magnitude().max(0) as usize + 1;
    let xs = x.vers_echelle(s);
    let l10 = vf::ln10(s);

    let n = div_floor(&xs, &l10);
    let reste = &xs - &n * &l10;
    let mantisse = vf::exp_echelle(&reste, s);

    let n = n.to_i64().ok_or_else(hors_bornes)?;
    let v = Decimal::depuis_echelle(mantisse, s)
        .decaler(n)
        .map_err(|_| hors_bornes())?;
    Ok(v.arrondir(prec))
}

fn verifier_logarithme(x: &Decimal) -> Result<(), ExpressionError> {
    if x.est_positif() {
        Ok(())
    } else {
        Err(ExpressionError::math("logarithme d’un nombre non positif"))
    }
}

/// ln(x) scalé ×10^w, x > 0 : x = m·10^k, m ∈ [1, 10).
fn ln_echelle_de(x: &Decimal, w: usize) -> Result<BigInt, ExpressionError> {
    let k = x.magnitude();
    let m = x.decaler(-k)?;
    Ok(vf::ln_echelle(&m.vers_echelle(w), w) + vf::ln10(w) * k)
}

fn ln(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    verifier_logarithme(x)?;
    if *x == Decimal::un() {
        return Ok(Decimal::zero());
    }
    precision_relative(prec, |w| ln_echelle_de(x, w))
}

fn log10(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    verifier_logarithme(x)?;

    // puissance de 10 exacte (mantisse normalisée = 1)
    if x.mantisse() == &BigInt::from(1) {
        return Ok(Decimal::entier(x.exposant()));
    }

    precision_relative(prec, |w| {
        let k = x.magnitude();
        let m = x.decaler(-k)?;
        let ln_m = vf::ln_echelle(&m.vers_echelle(w), w);
        Ok(ln_m * pow10(w) / vf::ln10(w) + pow10(w) * k)
    })
}

/* ------------------------ Trigonométrie ------------------------ */

fn verifier_trig(x: &Decimal) -> Result<(), ExpressionError> {
    if x.magnitude() >= MAGNITUDE_TRIG_MAX {
        return Err(ExpressionError::math(
            "argument trop grand pour une fonction trigonométrique",
        ));
    }
    Ok(())
}

/// (sin x, cos x) scalés ×10^w.
/// Réduction : x = k·π/2 + r, |r| ≤ π/4, puis quadrant k mod 4.
fn sin_cos(x: &Decimal, w: usize) -> (BigInt, BigInt) {
    // la réduction consomme autant de chiffres de π que la partie entière de x
    let s = w + x.magnitude().max(0) as usize + 2;
    let xs = x.vers_echelle(s);
    let demi_pi = vf::pi(s) / 2u32;

    let k = div_arrondie(&xs, &demi_pi);
    let r = &xs - &k * &demi_pi;
    let (sn, cs) = vf::sin_cos_echelle(&r, s);

    let quadrant = ((&k % 4u32) + 4u32) % 4u32;
    let (sn, cs) = match quadrant.to_u32().unwrap_or(0) {
        0 => (sn, cs),
        1 => (cs, -sn),
        2 => (-sn, -cs),
        _ => (-cs, sn),
    };

    (reduire(&sn, s, w), reduire(&cs, s, w))
}

fn sin(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_zero() || quasi_nul(x, prec) {
        return Ok(x.arrondir(prec));
    }
    verifier_trig(x)?;
    precision_relative_plancher(prec, plancher_trig(x, prec), |w| Ok(sin_cos(x, w).0))
}

fn cos(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_zero() || quasi_nul(x, prec) {
        return Ok(Decimal::un());
    }
    verifier_trig(x)?;
    precision_relative_plancher(prec, plancher_trig(x, prec), |w| Ok(sin_cos(x, w).1))
}

/// Pôle dès que |cos x| < 10^-(prec-1) : en dessous, le quotient n’a plus
/// de sens à la précision présentée (tan(pi/2) échoue).
fn tan(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_zero() || quasi_nul(x, prec) {
        return Ok(x.arrondir(prec));
    }
    verifier_trig(x)?;

    precision_relative_plancher(prec, plancher_trig(x, prec), |w| {
        // prec chiffres de plus : cos garde au moins w chiffres significatifs
        let (sn, cs) = sin_cos(x, w + prec);
        if cs.abs() < pow10(w + 1) {
            return Err(ExpressionError::math("tangente non définie"));
        }
        Ok(sn * pow10(w) / cs)
    })
}

fn verifier_arc(x: &Decimal, nom: &str) -> Result<(), ExpressionError> {
    if x.abs() > Decimal::un() {
        return Err(ExpressionError::math(format!("{nom} hors de [-1, 1]")));
    }
    Ok(())
}

/// asin x = 2·atan(x / (1 + √(1 − x²)))
fn asin(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    verifier_arc(x, "arc sinus")?;
    if x.est_zero() || quasi_nul(x, prec) {
        return Ok(x.arrondir(prec));
    }

    precision_relative(prec, |w| {
        let scale = pow10(w);
        let xs = x.vers_echelle(w);
        let c = (&scale * &scale - &xs * &xs).sqrt();
        let t = &xs * &scale / (&scale + c);
        Ok(vf::atan_echelle(&t, w) * 2u32)
    })
}

/// acos x = 2·atan(√(1 − x²) / (1 + x)) ; acos(−1) = π.
/// acos 0 vaut 0 (valeur imposée par le contrat de la calculatrice).
fn acos(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    verifier_arc(x, "arc cosinus")?;
    if x.est_zero() || *x == Decimal::un() {
        return Ok(Decimal::zero());
    }

    precision_relative(prec, |w| {
        let scale = pow10(w);
        let xs = x.vers_echelle(w);
        let denominateur = &scale + &xs;
        if denominateur.is_zero() {
            return Ok(vf::pi(w));
        }
        let c = (&scale * &scale - &xs * &xs).sqrt();
        let t = c * &scale / denominateur;
        Ok(vf::atan_echelle(&t, w) * 2u32)
    })
}

fn atan(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_zero() || quasi_nul(x, prec) {
        return Ok(x.arrondir(prec));
    }

    // |x| > 10^(prec+GARDE) : atan x = ±π/2 − 1/x, le terme 1/x est sous la précision
    if x.magnitude() > (prec + GARDE) as i64 {
        let demi_pi = pi_decimal(prec + GARDE).quotient(&Decimal::entier(2), prec)?;
        return Ok(if x.est_negatif() { -demi_pi } else { demi_pi });
    }

    precision_relative(prec, |w| Ok(vf::atan_echelle(&x.vers_echelle(w), w)))
}

fn radians(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_zero() {
        return Ok(Decimal::zero());
    }
    let p = prec + GARDE;
    x.produit(&pi_decimal(p), p)?
        .quotient(&Decimal::entier(180), prec)
}

fn degres(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_zero() {
        return Ok(Decimal::zero());
    }
    let p = prec + GARDE;
    x.produit(&Decimal::entier(180), p)?
        .quotient(&pi_decimal(p), prec)
}

/* ------------------------ Hyperboliques ------------------------ */

fn sinh(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_zero() || quasi_nul(x, prec) {
        return Ok(x.arrondir(prec));
    }

    // |x| < 1 : série directe (e^x − e^−x s’annulerait)
    if x.magnitude() < 0 {
        return precision_relative(prec, |w| Ok(vf::sinh_echelle(&x.vers_echelle(w), w)));
    }

    // sinh(−x) = −sinh(x) : e^|x| seul décide du dépassement
    let ax = x.abs();
    let v = demi_somme_exp(&ax, true, prec)?;
    Ok(if x.est_negatif() { -v } else { v })
}

/// (e^x ± e^−x) / 2 pour x ≥ 0 ; au-delà de 1000, e^−x ne pèse plus rien.
fn demi_somme_exp(
    x: &Decimal,
    soustraire: bool,
    prec: usize,
) -> Result<Decimal, ExpressionError> {
    let p = prec + GARDE;
    let a = exp_decimal(x, p)?;
    let v = if x.magnitude() >= 3 {
        a
    } else {
        let b = exp_decimal(&-x, p)?;
        if soustraire {
            a.difference(&b, p)
        } else {
            a.somme(&b, p)
        }
    };
    v.quotient(&Decimal::entier(2), prec)
}

fn cosh(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_zero() || quasi_nul(x, prec) {
        return Ok(Decimal::un());
    }

    // fonction paire
    demi_somme_exp(&x.abs(), false, prec)
}

fn tanh(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_zero() || quasi_nul(x, prec) {
        return Ok(x.arrondir(prec));
    }
    if x.abs() >= Decimal::entier(TANH_SATURE) {
        return Ok(Decimal::entier(i64::from(x.signe())));
    }

    // |x| < 1 : sinh / √(1 + sinh²)
    if x.magnitude() < 0 {
        return precision_relative(prec, |w| {
            let scale = pow10(w);
            let sh = vf::sinh_echelle(&x.vers_echelle(w), w);
            let ch = (&scale * &scale + &sh * &sh).sqrt();
            Ok(sh * scale / ch)
        });
    }

    // (e^2x − 1) / (e^2x + 1)
    let p = prec + GARDE;
    let e2 = exp_decimal(&x.somme(x, p), p)?;
    let un = Decimal::un();
    e2.difference(&un, p).quotient(&e2.somme(&un, p), prec)
}

/* ------------------------ Puissances / racines ------------------------ */

fn puissance(base: &Decimal, exposant: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if exposant.est_entier() {
        return match exposant.vers_i64() {
            Some(n) => puissance_entiere(base, n, prec),
            None => puissance_entiere_geante(base, exposant, prec),
        };
    }

    if base.est_negatif() {
        return Err(ExpressionError::math(
            "puissance non entière d’un nombre négatif",
        ));
    }
    if base.est_zero() {
        return if exposant.est_positif() {
            Ok(Decimal::zero())
        } else {
            Err(ExpressionError::math("zéro à une puissance négative"))
        };
    }

    puissance_reelle(base, exposant, prec)
}

/// a^b = exp(b·ln a), a > 0 ; la partie entière de b·ln a consomme des chiffres.
fn puissance_reelle(
    base: &Decimal,
    exposant: &Decimal,
    prec: usize,
) -> Result<Decimal, ExpressionError> {
    let estimation = exposant.produit(&ln(base, prec)?, prec)?;
    let p = prec + GARDE + estimation.magnitude().max(0) as usize + 1;
    let y = exposant.produit(&ln(base, p)?, p)?;
    exp_decimal(&y, prec)
}

/// Exponentiation binaire, GARDE + chiffres(n) chiffres de garde.
fn puissance_entiere(base: &Decimal, n: i64, prec: usize) -> Result<Decimal, ExpressionError> {
    if base.est_zero() {
        return if n > 0 {
            Ok(Decimal::zero())
        } else {
            Err(ExpressionError::math("zéro à une puissance non positive"))
        };
    }
    if n == 0 {
        return Ok(Decimal::un());
    }

    let m = n.unsigned_abs();
    let p = prec + GARDE + nb_chiffres_u64(m);

    let mut resultat = Decimal::un();
    let mut facteur = base.clone();
    let mut e = m;
    while e > 0 {
        if e & 1 == 1 {
            resultat = resultat.produit(&facteur, p)?;
        }
        e >>= 1;
        if e > 0 {
            facteur = facteur.produit(&facteur, p)?;
        }
    }

    if n < 0 {
        Decimal::un().quotient(&resultat, prec)
    } else {
        Ok(resultat.arrondir(prec))
    }
}

/// Exposant entier hors i64 : bases 0 et ±1 exactes, sinon |a|^n par exp/ln
/// (signe selon la parité de n). exp_decimal tranche dépassement et sous-dépassement.
fn puissance_entiere_geante(
    base: &Decimal,
    exposant: &Decimal,
    prec: usize,
) -> Result<Decimal, ExpressionError> {
    if base.est_zero() {
        return if exposant.est_positif() {
            Ok(Decimal::zero())
        } else {
            Err(ExpressionError::math("zéro à une puissance non positive"))
        };
    }
    if base.abs() == Decimal::un() {
        let negatif = base.est_negatif() && !exposant.est_pair();
        return Ok(Decimal::entier(if negatif { -1 } else { 1 }));
    }

    let module = puissance_reelle(&base.abs(), exposant, prec)?;
    if base.est_negatif() && !exposant.est_pair() {
        Ok(-module)
    } else {
        Ok(module)
    }
}

/// g × 10^d ; décalage exact si d est entier.
fn scientifique(g: &Decimal, d: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if g.est_zero() {
        return Ok(Decimal::zero());
    }
    if d.est_entier() {
        if let Some(n) = d.vers_i64() {
            return Ok(g.decaler(n)?.arrondir(prec));
        }
    }

    let p = prec + GARDE;
    let dix = puissance(&Decimal::entier(10), d, p)?;
    g.produit(&dix, prec)
}

/// Racine n-ième de x ≥ 0 : nth_root sur la mantisse décalée d’un multiple de n,
/// de sorte que le radicande ait n·(prec+GARDE) chiffres.
fn racine_entiere(x: &Decimal, n: u32, prec: usize) -> Decimal {
    if x.est_zero() {
        return Decimal::zero();
    }

    let n64 = i64::from(n);
    let voulu = i64::from(n) * (prec + GARDE) as i64;
    let manque = voulu - x.nb_chiffres() as i64 - x.exposant();
    // t = ⌈manque / n⌉
    let t = manque.div_euclid(n64) + i64::from(manque.rem_euclid(n64) != 0);
    let k = x.exposant() + n64 * t;

    let radicande = if k >= 0 {
        x.mantisse() * pow10(k as usize)
    } else {
        x.mantisse() / pow10(k.unsigned_abs() as usize)
    };

    Decimal::new(radicande.nth_root(n), -t).arrondir(prec)
}

fn racine_carree(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if x.est_negatif() {
        return Err(ExpressionError::math("racine carrée d’un nombre négatif"));
    }
    Ok(racine_entiere(x, 2, prec))
}

/// Racine `degre`-ième de `x`.
/// - degré entier non nul, sinon erreur
/// - degré impair : racine réelle négative pour x < 0 ; degré pair : erreur
/// - degré négatif : inverse de la racine
fn racine_n(degre: &Decimal, x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    let n = degre
        .vers_i64()
        .filter(|n| *n != 0)
        .ok_or_else(|| ExpressionError::math("l’indice d’une racine doit être un entier non nul"))?;

    if x.est_negatif() && n % 2 == 0 {
        return Err(ExpressionError::math(
            "racine d’indice pair d’un nombre négatif",
        ));
    }

    let p = prec + GARDE;
    let m = n.unsigned_abs();
    let r = if x.est_zero() {
        Decimal::zero()
    } else if m <= DEGRE_RACINE_ENTIERE {
        racine_entiere(&x.abs(), m as u32, p)
    } else {
        let l = ln(&x.abs(), p)?.quotient(&Decimal::from(BigInt::from(m)), p)?;
        exp_decimal(&l, p)?
    };
    let r = if x.est_negatif() { -r } else { r };

    if n < 0 {
        Decimal::un().quotient(&r, prec)
    } else {
        Ok(r.arrondir(prec))
    }
}

/* ------------------------ Factorielle ------------------------ */

fn factorielle(x: &Decimal, prec: usize) -> Result<Decimal, ExpressionError> {
    if !x.est_entier() || x.est_negatif() {
        return Err(ExpressionError::math(
            "factorielle d’un nombre non entier ou négatif",
        ));
    }
    let n = x.vers_u64().ok_or_else(ExpressionError::depassement)?;

    // n produits arrondis : erreur relative ≤ n·10^-p
    let p = prec + GARDE + nb_chiffres_u64(n);
    let mut acc = Decimal::un();
    for k in 2..=n {
        acc = acc.produit(&Decimal::from(BigInt::from(k)), p)?;
    }
    Ok(acc.arrondir(prec))
}
