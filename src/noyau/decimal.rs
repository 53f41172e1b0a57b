// src/noyau/decimal.rs
//
// Décimal à précision arbitraire : valeur = mantisse × 10^exposant.
// - mantisse BigInt, normalisée (pas de zéros de queue) => égalité structurelle = égalité numérique
// - précision exprimée en chiffres significatifs, arrondi demi vers le haut (en valeur absolue)
// - exposant borné (EXPOSANT_MAX) : au-delà, dépassement de capacité

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::erreur::ExpressionError;
use super::virgule_fixe::{div_arrondie, pow10};

/// Borne sur |exposant|.
pub const EXPOSANT_MAX: i64 = 1_000_000_000_000_000;

/// Exposant au-delà duquel une valeur entière n’est plus convertie en BigInt.
const EXPOSANT_ENTIER_MAX: i64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantisse: BigInt,
    exposant: i64,
}

fn nb_chiffres(n: &BigInt) -> usize {
    if n.is_zero() {
        1
    } else {
        n.magnitude().to_string().len()
    }
}

fn borne(e: i64) -> Result<i64, ExpressionError> {
    if e.abs() > EXPOSANT_MAX {
        Err(ExpressionError::depassement())
    } else {
        Ok(e)
    }
}

impl Decimal {
    pub fn new(mantisse: BigInt, exposant: i64) -> Self {
        if mantisse.is_zero() {
            return Self::zero();
        }

        let txt = mantisse.magnitude().to_string();
        let zeros = txt.len() - txt.trim_end_matches('0').len();
        if zeros == 0 {
            return Decimal { mantisse, exposant };
        }

        Decimal {
            mantisse: mantisse / pow10(zeros),
            exposant: exposant.saturating_add(zeros as i64),
        }
    }

    pub fn zero() -> Self {
        Decimal {
            mantisse: BigInt::zero(),
            exposant: 0,
        }
    }

    pub fn un() -> Self {
        Decimal {
            mantisse: BigInt::one(),
            exposant: 0,
        }
    }

    pub fn entier(n: i64) -> Self {
        Self::new(BigInt::from(n), 0)
    }

    pub fn mantisse(&self) -> &BigInt {
        &self.mantisse
    }

    pub fn exposant(&self) -> i64 {
        self.exposant
    }

    /// Littéral décimal non signé : chiffres avec au plus un point ("12", "12.5", ".5", "5.").
    pub fn parse(txt: &str) -> Option<Self> {
        let (ent, frac) = txt.split_once('.').unwrap_or((txt, ""));
        if frac.contains('.') || (ent.is_empty() && frac.is_empty()) {
            return None;
        }
        if !ent.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }

        let chiffres = format!("{ent}{frac}");
        let m = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
        Some(Self::new(m, -(frac.len() as i64)))
    }

    /* ------------------------ Signe / forme ------------------------ */

    pub fn est_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    pub fn est_negatif(&self) -> bool {
        self.mantisse.is_negative()
    }

    pub fn est_positif(&self) -> bool {
        self.mantisse.is_positive()
    }

    pub fn est_entier(&self) -> bool {
        self.exposant >= 0
    }

    /// −1, 0 ou 1.
    pub fn signe(&self) -> i8 {
        if self.est_negatif() {
            -1
        } else if self.est_zero() {
            0
        } else {
            1
        }
    }

    pub fn abs(&self) -> Self {
        Decimal {
            mantisse: self.mantisse.abs(),
            exposant: self.exposant,
        }
    }

    pub fn nb_chiffres(&self) -> usize {
        nb_chiffres(&self.mantisse)
    }

    /// ⌊log10 |x|⌋ (rang du premier chiffre significatif). Zéro => 0.
    pub fn magnitude(&self) -> i64 {
        if self.est_zero() {
            return 0;
        }
        self.exposant + self.nb_chiffres() as i64 - 1
    }

    /* ------------------------ Arrondi / conversions ------------------------ */

    /// Arrondi à `prec` chiffres significatifs, demi vers le haut (en valeur absolue).
    pub fn arrondir(&self, prec: usize) -> Self {
        let n = self.nb_chiffres();
        if n <= prec {
            return self.clone();
        }

        let coupe = n - prec;
        let q = div_arrondie(&self.mantisse, &pow10(coupe));
        Self::new(q, self.exposant.saturating_add(coupe as i64))
    }

    /// Entier exact, si la valeur est entière (et d’un ordre de grandeur raisonnable).
    pub fn vers_bigint(&self) -> Option<BigInt> {
        if !self.est_entier() || self.exposant > EXPOSANT_ENTIER_MAX {
            return None;
        }
        Some(&self.mantisse * pow10(self.exposant as usize))
    }

    pub fn vers_i64(&self) -> Option<i64> {
        if self.magnitude() > 18 {
            return None;
        }
        self.vers_bigint()?.to_i64()
    }

    pub fn vers_u64(&self) -> Option<u64> {
        if self.magnitude() > 19 {
            return None;
        }
        self.vers_bigint()?.to_u64()
    }

    /// Vrai si la valeur est un entier pair (les très grands entiers sont pairs).
    pub fn est_pair(&self) -> bool {
        if !self.est_entier() {
            return false;
        }
        if self.exposant > 0 {
            return true;
        }
        (&self.mantisse % 2u32).is_zero()
    }

    /// round(x × 10^echelle) : entier “scalé” pour les noyaux en virgule fixe.
    pub fn vers_echelle(&self, echelle: usize) -> BigInt {
        let t = self.exposant + echelle as i64;
        if t >= 0 {
            return &self.mantisse * pow10(t as usize);
        }

        let coupe = (-t) as usize;
        if coupe > self.nb_chiffres() + 1 {
            return BigInt::zero();
        }
        div_arrondie(&self.mantisse, &pow10(coupe))
    }

    pub fn depuis_echelle(n: BigInt, echelle: usize) -> Self {
        Self::new(n, -(echelle as i64))
    }

    /* ------------------------ Arithmétique (arrondie à `prec`) ------------------------ */

    /// x × 10^n, exact.
    pub fn decaler(&self, n: i64) -> Result<Self, ExpressionError> {
        if self.est_zero() {
            return Ok(Self::zero());
        }
        let e = self
            .exposant
            .checked_add(n)
            .ok_or_else(ExpressionError::depassement)?;
        Ok(Decimal {
            mantisse: self.mantisse.clone(),
            exposant: borne(e)?,
        })
    }

    pub fn somme(&self, autre: &Self, prec: usize) -> Self {
        if self.est_zero() {
            return autre.arrondir(prec);
        }
        if autre.est_zero() {
            return self.arrondir(prec);
        }

        let (grand, petit) = if self.magnitude() >= autre.magnitude() {
            (self, autre)
        } else {
            (autre, self)
        };

        // Un terme trop petit pour influencer l’arrondi est remplacé par un chiffre
        // “collant” juste sous tous les chiffres utiles : même arrondi, alignement borné.
        let plancher = grand.exposant.min(grand.magnitude() - prec as i64 - 2) - 1;
        let collant;
        let petit = if petit.magnitude() < plancher {
            collant = Decimal {
                mantisse: petit.mantisse.signum(),
                exposant: plancher,
            };
            &collant
        } else {
            petit
        };

        let e = grand.exposant.min(petit.exposant);
        let a = &grand.mantisse * pow10((grand.exposant - e) as usize);
        let b = &petit.mantisse * pow10((petit.exposant - e) as usize);
        Self::new(a + b, e).arrondir(prec)
    }

    pub fn difference(&self, autre: &Self, prec: usize) -> Self {
        self.somme(&-autre, prec)
    }

    pub fn produit(&self, autre: &Self, prec: usize) -> Result<Self, ExpressionError> {
        if self.est_zero() || autre.est_zero() {
            return Ok(Self::zero());
        }
        let e = borne(self.exposant + autre.exposant)?;
        Ok(Self::new(&self.mantisse * &autre.mantisse, e).arrondir(prec))
    }

    pub fn quotient(&self, autre: &Self, prec: usize) -> Result<Self, ExpressionError> {
        if autre.est_zero() {
            return Err(ExpressionError::math("division par zéro"));
        }
        if self.est_zero() {
            return Ok(Self::zero());
        }

        // Au moins prec+2 chiffres au quotient tronqué : la troncature ne change pas
        // un arrondi demi vers le haut.
        let k = (prec + 2 + autre.nb_chiffres()).saturating_sub(self.nb_chiffres());
        let q = &self.mantisse * pow10(k) / &autre.mantisse;
        let e = borne(self.exposant - autre.exposant - k as i64)?;
        Ok(Self::new(q, e).arrondir(prec))
    }

    /// Reste de la division tronquée : signe du dividende.
    pub fn reste(&self, autre: &Self, prec: usize) -> Result<Self, ExpressionError> {
        if autre.est_zero() {
            return Err(ExpressionError::math("modulo par zéro"));
        }
        if self.abs() < autre.abs() {
            return Ok(self.arrondir(prec));
        }

        // |a| ≥ |b| : le décalage du diviseur est borné par la longueur de la
        // mantisse du dividende, seul celui du dividende peut être énorme.
        let e = self.exposant.min(autre.exposant);
        let b = autre.mantisse.magnitude() * pow10((autre.exposant - e) as usize).magnitude();
        let decalage = BigUint::from((self.exposant - e) as u64);
        let facteur = BigUint::from(10u32).modpow(&decalage, &b);
        let r = (self.mantisse.magnitude() % &b) * facteur % &b;

        let r = BigInt::from_biguint(self.mantisse.sign(), r);
        Ok(Self::new(r, e).arrondir(prec))
    }

    /* ------------------------ Rendu ------------------------ */

    /// Longueur de `en_clair()` sans construire la chaîne.
    pub fn longueur_en_clair(&self) -> u64 {
        if self.est_zero() {
            return 1;
        }
        let n = self.nb_chiffres() as u64;
        let signe = u64::from(self.est_negatif());
        let corps = if self.exposant >= 0 {
            n + self.exposant as u64
        } else {
            let k = self.exposant.unsigned_abs();
            if n > k {
                n + 1
            } else {
                k + 2
            }
        };
        signe + corps
    }

    /// Forme décimale complète, minimale ("0.05", "-12", "1500").
    pub fn en_clair(&self) -> String {
        if self.est_zero() {
            return "0".to_string();
        }

        let chiffres = self.mantisse.magnitude().to_string();
        let signe = if self.est_negatif() { "-" } else { "" };

        if self.exposant >= 0 {
            return format!("{signe}{chiffres}{}", "0".repeat(self.exposant as usize));
        }

        let k = self.exposant.unsigned_abs() as usize;
        if chiffres.len() > k {
            let (ent, frac) = chiffres.split_at(chiffres.len() - k);
            format!("{signe}{ent}.{frac}")
        } else {
            format!("{signe}0.{}{chiffres}", "0".repeat(k - chiffres.len()))
        }
    }

    /// Notation scientifique, marqueur 'E' ("1E102", "-3.5E-7").
    pub fn en_scientifique(&self) -> String {
        if self.est_zero() {
            return "0".to_string();
        }

        let chiffres = self.mantisse.magnitude().to_string();
        let signe = if self.est_negatif() { "-" } else { "" };
        let exp10 = self.magnitude();

        let (tete, queue) = chiffres.split_at(1);
        if queue.is_empty() {
            format!("{signe}{tete}E{exp10}")
        } else {
            format!("{signe}{tete}.{queue}E{exp10}")
        }
    }
}

impl From<BigInt> for Decimal {
    fn from(n: BigInt) -> Self {
        Decimal::new(n, 0)
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Decimal::entier(n)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal {
            mantisse: -self.mantisse,
            exposant: self.exposant,
        }
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal {
            mantisse: -&self.mantisse,
            exposant: self.exposant,
        }
    }
}

impl Ord for Decimal {
    fn cmp(&self, autre: &Self) -> Ordering {
        let (sa, sb) = (self.signe(), autre.signe());
        if sa != sb {
            return sa.cmp(&sb);
        }
        if sa == 0 {
            return Ordering::Equal;
        }

        // Même signe : ordre de grandeur, puis mantisses alignées.
        let absolu = self.magnitude().cmp(&autre.magnitude()).then_with(|| {
            let e = self.exposant.min(autre.exposant);
            let a = self.mantisse.abs() * pow10((self.exposant - e) as usize);
            let b = autre.mantisse.abs() * pow10((autre.exposant - e) as usize);
            a.cmp(&b)
        });

        if sa < 0 {
            absolu.reverse()
        } else {
            absolu
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, autre: &Self) -> Option<Ordering> {
        Some(self.cmp(autre))
    }
}

/// Au-delà, Display passe en notation scientifique.
const LONGUEUR_CLAIR_MAX: u64 = 64;

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.longueur_en_clair() > LONGUEUR_CLAIR_MAX {
            f.write_str(&self.en_scientifique())
        } else {
            f.write_str(&self.en_clair())
        }
    }
}
