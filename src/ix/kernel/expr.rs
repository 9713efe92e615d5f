//! Term manipulation used by the reducers: bound-variable instantiation,
//! abstraction, universe substitution and application spines.
//!
//! All traversals run on explicit work stacks so that deeply nested terms
//! do not exhaust the native stack.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ix::env::*;

use super::level::subst_level;

// ============================================================================
// Generic rebuild
// ============================================================================

/// Rebuild `e` bottom-up, letting `visit` replace any subterm. It receives the
/// subterm and the number of binders it sits under; returning `None`
/// descends into its children. Shared subterms are rebuilt once per binder
/// depth.
pub fn replace<F>(e: &Expr, mut visit: F) -> Expr
where
  F: FnMut(&Expr, u64) -> Option<Expr>,
{
  enum Frame<'a> {
    Visit(&'a Expr, u64),
    Cache(*const ExprData, u64),
    App,
    Lam(Name, BinderInfo),
    All(Name, BinderInfo),
    LetE(Name, bool),
    Proj(Name, u64),
    Mdata(Vec<(Name, DataValue)>),
  }

  fn pop(results: &mut Vec<Expr>) -> Expr {
    results.pop().expect("replace: every frame pushes exactly one result")
  }

  let mut cache: FxHashMap<(*const ExprData, u64), Expr> =
    FxHashMap::default();
  let mut work: Vec<Frame<'_>> = vec![Frame::Visit(e, 0)];
  let mut results: Vec<Expr> = Vec::new();

  while let Some(frame) = work.pop() {
    match frame {
      Frame::Visit(e, offset) => {
        let key = (Arc::as_ptr(&e.0), offset);
        if let Some(cached) = cache.get(&key) {
          results.push(cached.clone());
          continue;
        }
        if let Some(r) = visit(e, offset) {
          results.push(r);
          continue;
        }
        match e.as_data() {
          ExprData::App(fun, a, _) => {
            work.push(Frame::Cache(key.0, offset));
            work.push(Frame::App);
            work.push(Frame::Visit(a, offset));
            work.push(Frame::Visit(fun, offset));
          },
          ExprData::Lam(n, t, b, bi, _) => {
            work.push(Frame::Cache(key.0, offset));
            work.push(Frame::Lam(n.clone(), bi.clone()));
            work.push(Frame::Visit(b, offset + 1));
            work.push(Frame::Visit(t, offset));
          },
          ExprData::ForallE(n, t, b, bi, _) => {
            work.push(Frame::Cache(key.0, offset));
            work.push(Frame::All(n.clone(), bi.clone()));
            work.push(Frame::Visit(b, offset + 1));
            work.push(Frame::Visit(t, offset));
          },
          ExprData::LetE(n, t, v, b, nd, _) => {
            work.push(Frame::Cache(key.0, offset));
            work.push(Frame::LetE(n.clone(), *nd));
            work.push(Frame::Visit(b, offset + 1));
            work.push(Frame::Visit(v, offset));
            work.push(Frame::Visit(t, offset));
          },
          ExprData::Proj(n, i, s, _) => {
            work.push(Frame::Cache(key.0, offset));
            work.push(Frame::Proj(n.clone(), *i));
            work.push(Frame::Visit(s, offset));
          },
          ExprData::Mdata(kvs, inner, _) => {
            work.push(Frame::Cache(key.0, offset));
            work.push(Frame::Mdata(kvs.clone()));
            work.push(Frame::Visit(inner, offset));
          },
          ExprData::Bvar(..)
          | ExprData::Fvar(..)
          | ExprData::Mvar(..)
          | ExprData::Sort(..)
          | ExprData::Const(..)
          | ExprData::Lit(..) => results.push(e.clone()),
        }
      },
      Frame::Cache(ptr, offset) => {
        if let Some(last) = results.last() {
          cache.insert((ptr, offset), last.clone());
        }
      },
      Frame::App => {
        let a = pop(&mut results);
        let f = pop(&mut results);
        results.push(Expr::app(f, a));
      },
      Frame::Lam(n, bi) => {
        let b = pop(&mut results);
        let t = pop(&mut results);
        results.push(Expr::lam(n, t, b, bi));
      },
      Frame::All(n, bi) => {
        let b = pop(&mut results);
        let t = pop(&mut results);
        results.push(Expr::all(n, t, b, bi));
      },
      Frame::LetE(n, nd) => {
        let b = pop(&mut results);
        let v = pop(&mut results);
        let t = pop(&mut results);
        results.push(Expr::letE(n, t, v, b, nd));
      },
      Frame::Proj(n, i) => {
        let s = pop(&mut results);
        results.push(Expr::proj(n, i, s));
      },
      Frame::Mdata(kvs) => {
        let inner = pop(&mut results);
        results.push(Expr::mdata(kvs, inner));
      },
    }
  }

  pop(&mut results)
}

// ============================================================================
// Instantiate / abstract
// ============================================================================

/// Instantiate bound variables:
/// `body[0 := substs[n-1], 1 := substs[n-2], ...]`.
/// `substs[0]` is the outermost variable and replaces `Bvar(n-1)`, while
/// `substs[n-1]` is the innermost and replaces `Bvar(0)`. Loose variables
/// beyond the substituted range are lowered by `n`.
pub fn inst(body: &Expr, substs: &[Expr]) -> Expr {
  if substs.is_empty() {
    return body.clone();
  }
  let n = substs.len() as u64;
  replace(body, |e, offset| match e.as_data() {
    ExprData::Bvar(idx, _) if *idx >= offset => {
      let adjusted = idx - offset;
      if adjusted < n {
        Some(substs[(n - 1 - adjusted) as usize].clone())
      } else {
        Some(Expr::bvar(idx - n))
      }
    },
    ExprData::Bvar(..) => Some(e.clone()),
    _ => None,
  })
}

/// Instantiate the single innermost bound variable (zeta, one-binder beta).
pub fn inst1(body: &Expr, value: &Expr) -> Expr {
  inst(body, std::slice::from_ref(value))
}

/// Abstract: replace free variables with bound variables.
/// `fvars[0]` (outermost) maps to `Bvar(n-1+offset)`, `fvars[n-1]`
/// (innermost) maps to `Bvar(0+offset)`.
pub fn abstr(e: &Expr, fvars: &[Expr]) -> Expr {
  if fvars.is_empty() {
    return e.clone();
  }
  let n = fvars.len();
  replace(e, |e, offset| match e.as_data() {
    ExprData::Fvar(..) => {
      let found = fvars.iter().position(|fv| fv == e);
      Some(match found {
        Some(i) => Expr::bvar((n - 1 - i) as u64 + offset),
        None => e.clone(),
      })
    },
    _ => None,
  })
}

/// Substitute universe level parameters in an expression.
pub fn subst_expr_levels(e: &Expr, params: &[Name], values: &[Level]) -> Expr {
  if params.is_empty() {
    return e.clone();
  }
  replace(e, |e, _| match e.as_data() {
    ExprData::Sort(level, _) => {
      Some(Expr::sort(subst_level(level, params, values)))
    },
    ExprData::Const(name, levels, _) => {
      let new_levels: Vec<Level> =
        levels.iter().map(|l| subst_level(l, params, values)).collect();
      Some(Expr::cnst(name.clone(), new_levels))
    },
    _ => None,
  })
}

// ============================================================================
// Application spines
// ============================================================================

/// Decompose `f a1 a2 ... an` into `(f, [a1, a2, ..., an])`.
pub fn unfold_apps(e: &Expr) -> (Expr, Vec<Expr>) {
  let mut args = Vec::new();
  let mut cursor = e.clone();
  while let ExprData::App(f, a, _) = cursor.as_data() {
    args.push(a.clone());
    let next = f.clone();
    cursor = next;
  }
  args.reverse();
  (cursor, args)
}

/// Reconstruct `f a1 a2 ... an`.
pub fn foldl_apps(mut fun: Expr, args: impl Iterator<Item = Expr>) -> Expr {
  for arg in args {
    fun = Expr::app(fun, arg);
  }
  fun
}

/// Replace the head of an application spine, keeping its arguments.
pub fn update_fn(e: &Expr, new_fn: Expr) -> Expr {
  let (_, args) = unfold_apps(e);
  foldl_apps(new_fn, args.into_iter())
}

/// Beta-reduce `f` against the whole spine `args` at once: peel as many
/// leading lambdas as there are arguments, instantiate the body with one
/// substitution, and reapply what is left over.
pub fn beta(f: &Expr, args: &[Expr]) -> Expr {
  let mut body = f;
  let mut consumed = 0;
  while consumed < args.len() {
    match body.as_data() {
      ExprData::Lam(_, _, b, _, _) => {
        body = b;
        consumed += 1;
      },
      _ => break,
    }
  }
  let body = inst(body, &args[..consumed]);
  foldl_apps(body, args[consumed..].iter().cloned())
}

// ============================================================================
// Queries
// ============================================================================

/// Check if an expression has any loose bound variables.
pub fn has_loose_bvars(e: &Expr) -> bool {
  has_loose_bvars_above(e, 0)
}

fn has_loose_bvars_above(e: &Expr, depth: u64) -> bool {
  let mut stack: Vec<(&Expr, u64)> = vec![(e, depth)];
  while let Some((e, depth)) = stack.pop() {
    match e.as_data() {
      ExprData::Bvar(idx, _) => {
        if *idx >= depth {
          return true;
        }
      },
      ExprData::App(f, a, _) => {
        stack.push((f, depth));
        stack.push((a, depth));
      },
      ExprData::Lam(_, t, b, _, _) | ExprData::ForallE(_, t, b, _, _) => {
        stack.push((t, depth));
        stack.push((b, depth + 1));
      },
      ExprData::LetE(_, t, v, b, _, _) => {
        stack.push((t, depth));
        stack.push((v, depth));
        stack.push((b, depth + 1));
      },
      ExprData::Proj(_, _, s, _) => stack.push((s, depth)),
      ExprData::Mdata(_, inner, _) => stack.push((inner, depth)),
      _ => {},
    }
  }
  false
}

fn any_leaf(e: &Expr, pred: impl Fn(&ExprData) -> bool) -> bool {
  let mut stack: Vec<&Expr> = vec![e];
  while let Some(e) = stack.pop() {
    if pred(e.as_data()) {
      return true;
    }
    match e.as_data() {
      ExprData::App(f, a, _) => {
        stack.push(f);
        stack.push(a);
      },
      ExprData::Lam(_, t, b, _, _) | ExprData::ForallE(_, t, b, _, _) => {
        stack.push(t);
        stack.push(b);
      },
      ExprData::LetE(_, t, v, b, _, _) => {
        stack.push(t);
        stack.push(v);
        stack.push(b);
      },
      ExprData::Proj(_, _, s, _) => stack.push(s),
      ExprData::Mdata(_, inner, _) => stack.push(inner),
      _ => {},
    }
  }
  false
}

/// Check if expression contains any free variables (Fvar).
pub fn has_fvars(e: &Expr) -> bool {
  any_leaf(e, |d| matches!(d, ExprData::Fvar(..)))
}

/// Check if expression contains any expression metavariables, assigned or
/// not.
pub fn has_mvars(e: &Expr) -> bool {
  any_leaf(e, |d| matches!(d, ExprData::Mvar(..)))
}

// ============================================================================
// Name helpers
// ============================================================================

pub(crate) fn mk_name(a: &str) -> Name {
  Name::str(Name::anon(), a.into())
}

pub(crate) fn mk_name2(a: &str, b: &str) -> Name {
  Name::str(mk_name(a), b.into())
}
