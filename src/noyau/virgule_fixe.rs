// src/noyau/virgule_fixe.rs
//
// Noyaux en virgule fixe (BigInt “scalé” ×10^digits).
// - constantes : π (Machin), ln 2, ln 10 (séries argth)
// - séries     : exp, ln, atan, sin/cos, sinh
//
// Toutes les fonctions travaillent en troncature : l’appelant prévoit des
// chiffres de garde et arrondit à la fin (cf. operations.rs).

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// Chiffres supplémentaires pour amortir les erreurs de troncature des séries.
const EXTRA: usize = 10;

/// Nombre de divisions par 2 avant la série de Taylor de exp.
const DEMI_EXP: usize = 4;

pub fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// ⌊a / b⌋ pour b > 0.
pub fn div_floor(a: &BigInt, b: &BigInt) -> BigInt {
    let q = a / b;
    if a.is_negative() && !(a % b).is_zero() {
        q - 1u32
    } else {
        q
    }
}

/// a / b arrondi au plus proche, demi en s’éloignant de zéro (b > 0).
pub fn div_arrondie(a: &BigInt, b: &BigInt) -> BigInt {
    let abs = a.abs();
    let q = &abs / b;
    let r = abs - &q * b;
    let q = if r * 2u32 >= *b { q + 1u32 } else { q };
    if a.is_negative() {
        -q
    } else {
        q
    }
}

/* ------------------------ Constantes (séries rapides) ------------------------ */

/// Σ 1/((2k+1)·q^(2k+1)) en entier scalé.
/// - alternée     : arctan(1/q)
/// - non alternée : argth(1/q)
fn serie_inv_q(q: u32, scale: &BigInt, alternee: bool) -> BigInt {
    let q = BigInt::from(q);
    let q2 = &q * &q;

    let mut k: u64 = 0;
    let mut q_pow = q;
    let mut sum = BigInt::zero();

    loop {
        let term = scale / (&q_pow * (2 * k + 1));
        if term.is_zero() {
            break;
        }

        if alternee && k % 2 == 1 {
            sum -= &term;
        } else {
            sum += &term;
        }

        q_pow *= &q2;
        k += 1;
    }

    sum
}

/// π scalé (Machin : π = 16·atan(1/5) − 4·atan(1/239)).
pub fn pi(digits: usize) -> BigInt {
    let scale = pow10(digits + EXTRA);

    let a = serie_inv_q(5, &scale, true);
    let b = serie_inv_q(239, &scale, true);

    (a * 16u32 - b * 4u32) / pow10(EXTRA)
}

/// ln 2 = 2·argth(1/3)
pub fn ln2(digits: usize) -> BigInt {
    let scale = pow10(digits + EXTRA);
    serie_inv_q(3, &scale, false) * 2u32 / pow10(EXTRA)
}

/// ln 10 = 3·ln 2 + ln(5/4) = 6·argth(1/3) + 2·argth(1/9)
pub fn ln10(digits: usize) -> BigInt {
    let scale = pow10(digits + EXTRA);
    let a = serie_inv_q(3, &scale, false);
    let b = serie_inv_q(9, &scale, false);
    (a * 6u32 + b * 2u32) / pow10(EXTRA)
}

/* ------------------------ Séries ------------------------ */

/// exp(x) scalé. Prévu pour |x| de l’ordre de quelques unités (|x| ≤ ln 10 chez l’appelant).
pub fn exp_echelle(x: &BigInt, digits: usize) -> BigInt {
    let scale = pow10(digits);

    // exp(x) = exp(x / 2^4)^(2^4)
    let y: BigInt = x / (1u32 << DEMI_EXP);

    let mut somme = scale.clone();
    let mut terme = scale.clone();
    let mut k: u32 = 1;

    loop {
        terme = &terme * &y / (&scale * k);
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        k += 1;
    }

    for _ in 0..DEMI_EXP {
        somme = &somme * &somme / &scale;
    }
    somme
}

/// ln(y) scalé pour y ∈ [1, 10) (scalé).
/// Réduction par puissances de 2 vers [0.75, 1.5], puis ln y = 2·argth((y−1)/(y+1)).
pub fn ln_echelle(y: &BigInt, digits: usize) -> BigInt {
    let scale = pow10(digits);
    let seuil = &scale * 3u32 / 2u32;

    let mut y = y.clone();
    let mut k: u32 = 0;
    while y > seuil {
        y /= 2u32;
        k += 1;
    }

    let z = (&y - &scale) * &scale / (&y + &scale);
    let z2 = &z * &z / &scale;

    let mut puissance = z;
    let mut somme = BigInt::zero();
    let mut n: u32 = 1;

    loop {
        let terme = &puissance / n;
        if terme.is_zero() {
            break;
        }
        somme += terme;
        puissance = &puissance * &z2 / &scale;
        n += 2;
    }

    somme * 2u32 + ln2(digits) * k
}

/// atan(x) scalé, x quelconque.
pub fn atan_echelle(x: &BigInt, digits: usize) -> BigInt {
    let scale = pow10(digits);

    if x.is_negative() {
        return -atan_echelle(&-x, digits);
    }

    // |x| > 1 : atan(x) = π/2 − atan(1/x)
    if x > &scale {
        let inverse = &scale * &scale / x;
        return pi(digits) / 2u32 - atan_echelle(&inverse, digits);
    }

    // atan(t) = 2·atan(t / (1 + √(1+t²))), trois fois : |t| ≤ tan(π/32)
    let carre = &scale * &scale;
    let mut t = x.clone();
    for _ in 0..3 {
        let r = (&carre + &t * &t).sqrt();
        t = &t * &scale / (&scale + r);
    }

    let t2 = &t * &t / &scale;
    let mut puissance = t;
    let mut somme = BigInt::zero();
    let mut n: u32 = 1;
    let mut signe_pos = true;

    loop {
        let terme = &puissance / n;
        if terme.is_zero() {
            break;
        }
        if signe_pos {
            somme += terme;
        } else {
            somme -= terme;
        }
        puissance = &puissance * &t2 / &scale;
        n += 2;
        signe_pos = !signe_pos;
    }

    somme * 8u32
}

/// (sin r, cos r) scalés pour |r| ≤ π/4.
pub fn sin_cos_echelle(r: &BigInt, digits: usize) -> (BigInt, BigInt) {
    let scale = pow10(digits);
    let r2 = r * r / &scale;

    let mut sin = r.clone();
    let mut terme = r.clone();
    let mut k: u64 = 1;
    loop {
        terme = -(&terme * &r2) / (&scale * ((2 * k) * (2 * k + 1)));
        if terme.is_zero() {
            break;
        }
        sin += &terme;
        k += 1;
    }

    let mut cos = scale.clone();
    let mut terme = scale.clone();
    let mut k: u64 = 1;
    loop {
        terme = -(&terme * &r2) / (&scale * ((2 * k - 1) * (2 * k)));
        if terme.is_zero() {
            break;
        }
        cos += &terme;
        k += 1;
    }

    (sin, cos)
}

/// sinh(x) scalé par la série directe (pas d’annulation pour |x| < 1).
pub fn sinh_echelle(x: &BigInt, digits: usize) -> BigInt {
    let scale = pow10(digits);
    let x2 = x * x / &scale;

    let mut somme = x.clone();
    let mut terme = x.clone();
    let mut k: u64 = 1;
    loop {
        terme = &terme * &x2 / (&scale * ((2 * k) * (2 * k + 1)));
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        k += 1;
    }
    somme
}
