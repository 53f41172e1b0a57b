//! Tests scientifiques (campagne) : propriétés du pipeline + identités numériques.
//!
//! But : vérifier les propriétés observables sans faire chauffer la machine.
//! - espaces neutres, entrée vide, associativités
//! - moins unaire / multiplication implicite
//! - bascule scientifique + stabilité du rendu relu
//! - identités (sin² + cos², ln∘exp, cosh² − sinh²) à la précision présentée
//!
//! Notes :
//! - La précision interne est de 21 chiffres, le rendu en garde 20 : une identité
//!   vraie doit retomber exactement sur sa valeur après arrondi.
//! - Les calculs lourds (grandes factorielles, grands arguments trig) restent sous budget.

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use super::{eval_expression, eval_expression_avec, ExpressionError, Reglages};

fn eval_ok(expr: &str) -> String {
    eval_expression(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_eval_eq(expr: &str, attendu: &str) {
    assert_eq!(eval_ok(expr), attendu, "expr={expr:?}");
}

fn assert_erreur_math(expr: &str) {
    match eval_expression(expr) {
        Err(ExpressionError::Math { .. }) => {}
        autre => panic!("expr={expr:?} : erreur mathématique attendue, obtenu {autre:?}"),
    }
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Lexique / syntaxe ------------------------ */

#[test]
fn sci_espaces_neutres() {
    assert_eval_eq("2+2", "4");
    assert_eval_eq("2 + 2", "4");
    assert_eval_eq("  2   +  2  ", "4");
    assert_eq!(eval_ok("sin ( pi / 2 )"), eval_ok("sin(pi/2)"));
    assert_eq!(eval_ok("3 rt 27"), eval_ok("3rt27"));
}

#[test]
fn sci_entree_vide() {
    assert_eval_eq("", "0");
    assert_eval_eq(" \t ", "0");
}

#[test]
fn sci_associativites() {
    // droite : 2^(3^2)
    assert_eval_eq("2^3^2", "512");
    assert_eval_eq("(2^3)^2", "64");
    // gauche, même précédence
    assert_eval_eq("3-2-2", "-1");
    assert_eval_eq("64/4/2", "8");
    assert_eval_eq("2+3*4", "14");
    assert_eval_eq("-2^2", "-4");
}

#[test]
fn sci_multiplication_implicite() {
    assert_eval_eq("2sinr90", "2");
    assert_eval_eq("2log1000", "6");
    assert_eval_eq("2pi", "6.2831853071795864769");
    assert_eval_eq("2(3)", "6");
    assert_eval_eq("(1+1)(2)", "4");
    assert_eval_eq("3sinpi", eval_ok("3*sinpi").as_str());
}

#[test]
fn sci_moins_unaire_binaire() {
    assert_eval_eq("-5", "-5");
    assert_eval_eq("4*-3", "-12");
    assert_eval_eq("-log100", "-2");
    assert_eval_eq("2^-1", "0.5");
    assert_eval_eq("1E-3", "0.001");
    assert_eval_eq("-3!", "-6");
    assert_eval_eq("-2rt4", "-2");
}

/* ------------------------ Rendu ------------------------ */

#[test]
fn sci_bascule_scientifique() {
    assert_eval_eq("100E100", "1E102");
    assert_eval_eq("pi*100", "314.15926535897932385");
    assert_eval_eq("1E-30", "1E-30");
    assert_eval_eq("-1.5E-30", "-1.5E-30");
    assert_eval_eq("100!", "9.3326215443944152682E157");
    assert_eval_eq("e^50", "5184705528587072464100");
}

#[test]
fn sci_rendu_relu_stable() {
    let exprs = [
        "1/3",
        "-1/7",
        "2/3",
        "pi*100",
        "100E100",
        "1E-30",
        "-1.5E-30",
        "sqrt2",
        "-sqrt2",
        "e^50",
        "e^-50",
        "100!",
        "2^0.5",
        "ln0.001",
        "atan(-1000)",
    ];
    for e in exprs {
        let v1 = eval_ok(e);
        let v2 = eval_ok(&v1);
        assert_eq!(v1, v2, "expr={e:?}");
    }
}

/* ------------------------ Domaines / zéros ------------------------ */

#[test]
fn sci_domaines() {
    assert_erreur_math("asin2");
    assert_erreur_math("acos2");
    assert_erreur_math("asin(-1.0001)");
    assert_erreur_math("tan(pi/2)");
    assert_erreur_math("tan(-pi/2)");
    assert_erreur_math("tan(3*pi/2)");
    assert_erreur_math("1%0");
    assert_erreur_math("0^0");
    assert_erreur_math("0^-1");
    assert_erreur_math("log0");
    assert_erreur_math("ln(-1)");
    assert_erreur_math("sqrt(-4)");
    assert_erreur_math("2rt(-4)");
    assert_erreur_math("0.5rt4");
    assert_erreur_math("(-1)!");
    assert_erreur_math("10^(10^20)");
}

#[test]
fn sci_zeros_exacts() {
    assert_eval_eq("d0", "0");
    assert_eval_eq("r0", "0");
    assert_eval_eq("acos0", "0");
    assert_eval_eq("sin0", "0");
    assert_eval_eq("ln1", "0");
    assert_eval_eq("0!", "1");
}

/* ------------------------ Identités ------------------------ */

#[test]
fn sci_identites() {
    assert_eval_eq("sin(1)^2+cos(1)^2", "1");
    assert_eval_eq("cosh1^2-sinh1^2", "1");
    assert_eval_eq("ln(e^3)", "3");
    assert_eval_eq("e^(ln2)", "2");
    assert_eval_eq("10^log7", "7");
    assert_eval_eq("atan(tan0.5)", "0.5");
    assert_eval_eq("asin(sin0.3)", "0.3");
    assert_eval_eq("d(r45)", "45");
    assert_eval_eq("3rt(2^3)", "2");
    assert_eval_eq("(-2)^3", "-8");
    assert_eval_eq("3rt(-8)", "-2");
    assert_eval_eq("(-2)rt4", "0.5");
}

#[test]
fn sci_precision_reglable() {
    let r = Reglages::new(40);
    assert_eq!(
        eval_expression_avec("pi", &r).unwrap(),
        "3.1415926535897932384626433832795028842"
    );
    assert_eq!(
        eval_expression_avec("sqrt2", &r).unwrap(),
        "1.41421356237309504880168872420969807857"
    );
    // bornée à PRECISION_MAX : la valeur stockée de π suffit toujours
    let r = Reglages::new(500);
    assert!(eval_expression_avec("pi", &r).unwrap().starts_with("3.14159265358979"));
}

/* ------------------------ Stress sous budget ------------------------ */

#[test]
fn sci_stress_budget() {
    let start = Instant::now();
    let max = Duration::from_secs(20);

    for e in [
        "1000!",
        "sin(1E100)",
        "cos(123456789.123)",
        "e^1000",
        "1000rt2",
        "200rt2",
        "tanh50",
        "2^0.5^0.5",
        "atan(1E25)",
        "ln(1E-300)",
    ] {
        assert!(eval_expression(e).is_ok(), "expr={e:?}");
        budget(start, max);
    }
}
