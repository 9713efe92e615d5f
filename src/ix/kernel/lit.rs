use crate::ix::env::*;

use super::expr::{foldl_apps, mk_name, mk_name2};

/// Expand a literal one layer into constructor form so that recursors and
/// projections can match on it: `0` becomes `Nat.zero`, `n+1` becomes
/// `Nat.succ n` (the argument stays a literal), and a string becomes
/// `String.mk` of its character list. Anything else is returned unchanged.
pub fn to_ctor_if_lit(e: &Expr) -> Expr {
  match e.as_data() {
    ExprData::Lit(Literal::NatVal(n), _) => match n.pred() {
      None => Expr::cnst(mk_name2("Nat", "zero"), vec![]),
      Some(pred) => {
        let succ = Expr::cnst(mk_name2("Nat", "succ"), vec![]);
        Expr::app(succ, Expr::nat_lit(pred))
      },
    },
    ExprData::Lit(Literal::StrVal(s), _) => string_to_ctor(s),
    _ => e.clone(),
  }
}

/// `String.mk [Char.ofNat c0, Char.ofNat c1, ...]` with `List` at level 0.
fn string_to_ctor(s: &str) -> Expr {
  let char_type = Expr::cnst(mk_name("Char"), vec![]);
  let char_of_nat = Expr::cnst(mk_name2("Char", "ofNat"), vec![]);
  let nil = Expr::app(
    Expr::cnst(mk_name2("List", "nil"), vec![Level::zero()]),
    char_type.clone(),
  );
  let cons = Expr::cnst(mk_name2("List", "cons"), vec![Level::zero()]);
  let list = s.chars().rev().fold(nil, |tail, c| {
    let code = Expr::nat_lit(u64::from(u32::from(c)).into());
    let ch = Expr::app(char_of_nat.clone(), code);
    foldl_apps(cons.clone(), [char_type.clone(), ch, tail].into_iter())
  });
  Expr::app(Expr::cnst(mk_name2("String", "mk"), vec![]), list)
}
