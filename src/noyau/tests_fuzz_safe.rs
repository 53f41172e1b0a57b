//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - expressions bien formées : jamais d’erreur de syntaxe (les erreurs
//!   mathématiques, elles, sont normales : division par zéro, domaine, dépassement)
//! - invariants clés : espaces neutres, rendu relu stable, aucune panique sur du bruit

use std::time::{Duration, Instant};

use super::{eval_expression, ExpressionError};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choisir<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */
//
// Chaque expression est produite morceau par morceau (un morceau = un jeton),
// pour pouvoir la recoller avec ou sans espaces.
// Règles anti-fusion : jamais deux nombres contigus, fonctions toujours suivies de '(',
// '!' seulement sur un petit entier littéral.

const FONCTIONS: &[&str] = &[
    "sqrt", "log", "ln", "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh",
    "r", "d",
];

const BINAIRES: &[&str] = &["+", "-", "*", "/", "%"];

fn gen_nombre(rng: &mut Rng, out: &mut Vec<String>) {
    let s = match rng.pick(7) {
        0 => format!("{}", rng.pick(10)),
        1 => format!("{}", 10 + rng.pick(990)),
        2 => format!("{}.{}", rng.pick(10), 1 + rng.pick(99)),
        3 => format!("0.00{}", 1 + rng.pick(9)),
        4 => "pi".to_string(),
        5 => "e".to_string(),
        _ => format!("{}", 1 + rng.pick(3)),
    };
    out.push(s);
}

fn gen_atome(rng: &mut Rng, out: &mut Vec<String>) {
    match rng.pick(5) {
        0 => {
            // factorielle bornée
            out.push(format!("{}", rng.pick(13)));
            out.push("!".to_string());
        }
        1 => {
            // notation scientifique : entier E [-]entier
            out.push(format!("{}", 1 + rng.pick(9)));
            out.push("E".to_string());
            if rng.coin() {
                out.push("-".to_string());
            }
            out.push(format!("{}", rng.pick(40)));
        }
        _ => gen_nombre(rng, out),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize, out: &mut Vec<String>) {
    if depth == 0 {
        gen_atome(rng, out);
        return;
    }

    match rng.pick(8) {
        0 => gen_atome(rng, out),
        1 | 2 => {
            gen_expr(rng, depth - 1, out);
            out.push(rng.choisir(BINAIRES).to_string());
            gen_expr(rng, depth - 1, out);
        }
        3 => {
            // puissance à petit exposant entier (éventuellement négatif)
            out.push("(".to_string());
            gen_expr(rng, depth - 1, out);
            out.push(")".to_string());
            out.push("^".to_string());
            if rng.coin() {
                out.push("-".to_string());
            }
            out.push(format!("{}", rng.pick(5)));
        }
        4 | 5 => {
            out.push(rng.choisir(FONCTIONS).to_string());
            out.push("(".to_string());
            gen_expr(rng, depth - 1, out);
            out.push(")".to_string());
        }
        6 => {
            out.push("-".to_string());
            out.push("(".to_string());
            gen_expr(rng, depth - 1, out);
            out.push(")".to_string());
        }
        _ => {
            out.push(format!("{}", 2 + rng.pick(4)));
            out.push("rt".to_string());
            out.push("(".to_string());
            gen_expr(rng, depth - 1, out);
            out.push(")".to_string());
        }
    }
}

fn gen_morceaux(rng: &mut Rng, depth: usize) -> Vec<String> {
    let mut out = Vec::new();
    gen_expr(rng, depth, &mut out);
    out
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_bien_formees_jamais_syntaxe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let morceaux = gen_morceaux(&mut rng, 4);
        let expr = morceaux.concat();

        match eval_expression(&expr) {
            Ok(_) => seen_ok += 1,
            Err(e @ ExpressionError::Syntaxe { .. }) => {
                panic!("erreur de syntaxe sur une expression bien formée: expr={expr:?} err={e}")
            }
            Err(e) => {
                assert!(!e.to_string().is_empty());
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 30, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_espaces_neutres_et_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..150 {
        budget(t0, max);

        let morceaux = gen_morceaux(&mut rng, 3);
        let serre = morceaux.concat();
        let aere = morceaux.join(" ");
        let large = format!("  {}\t", morceaux.join("   "));

        let a = eval_expression(&serre);
        assert_eq!(a, eval_expression(&aere), "expr={serre:?}");
        assert_eq!(a, eval_expression(&large), "expr={serre:?}");
        // même entrée => même sortie
        assert_eq!(a, eval_expression(&serre), "expr={serre:?}");
    }
}

#[test]
fn fuzz_safe_rendu_relu_stable() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    let mut rng = Rng::new(0x5EED_u64);
    let mut relus = 0usize;

    for _ in 0..200 {
        budget(t0, max);

        let expr = gen_morceaux(&mut rng, 3).concat();
        let Ok(v1) = eval_expression(&expr) else {
            continue;
        };

        let v2 = eval_expression(&v1)
            .unwrap_or_else(|e| panic!("rendu non relisible: expr={expr:?} rendu={v1:?} err={e}"));
        assert_eq!(v1, v2, "expr={expr:?}");
        relus += 1;
    }

    assert!(relus > 20, "trop peu de rendus relus: {relus}");
}

#[test]
fn fuzz_safe_bruit_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    // pas de '!' : "99999!" est légitime mais coûteux
    let alphabet: Vec<char> = "0123456789.+-*/%^E()rtsqinlogcehapd #é".chars().collect();
    let mut rng = Rng::new(0xDEADBEEF_u64);

    for _ in 0..500 {
        budget(t0, max);

        let n = 1 + rng.pick(12) as usize;
        let expr: String = (0..n)
            .map(|_| alphabet[rng.pick(alphabet.len() as u32) as usize])
            .collect();

        // Ok ou Err, mais jamais de panique ; une erreur localisée pointe dans l’entrée
        if let Err(ExpressionError::Syntaxe { index: Some(i) }) = eval_expression(&expr) {
            assert!(i < expr.chars().count(), "expr={expr:?} index={i}");
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let expr = somme_balancee("1/2", 800);
    let v = eval_expression(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800*(1/2) = 400
    assert_eq!(v, "400");

    // longue chaîne à plat : la pile d’opérateurs reste bornée
    let plat = vec!["0.5"; 2000].join("+");
    assert_eq!(eval_expression(&plat).unwrap_or_else(|e| panic!("err: {e}")), "1000");
}
