//! Iota reduction: a recursor applied to a constructor application steps
//! to the matching computation rule.

use tracing::{debug, trace};

use crate::ix::env::*;

use super::context::{ReductionContext, has_unassigned_mvars};
use super::error::{ReduceResult, Step};
use super::expr::{foldl_apps, subst_expr_levels, unfold_apps};
use super::lit::to_ctor_if_lit;

/// Resolve the head of `e` as a recursor and try one iota step.
pub fn reduce_recursor<C>(ctx: &C, e: &Expr) -> ReduceResult<Step>
where
  C: ReductionContext + ?Sized,
{
  let (head, args) = unfold_apps(e);
  let ExprData::Const(name, levels, _) = head.as_data() else {
    return Ok(Step::MISMATCH);
  };
  match ctx.find_constant(name) {
    Some(ConstantInfo::RecInfo(rec)) => reduce_rec(ctx, rec, levels, &args),
    _ => Ok(Step::MISMATCH),
  }
}

/// One iota step of `rec.{levels} args`.
pub(crate) fn reduce_rec<C>(
  ctx: &C,
  rec: &RecursorVal,
  levels: &[Level],
  args: &[Expr],
) -> ReduceResult<Step>
where
  C: ReductionContext + ?Sized,
{
  let major_idx = rec.major_idx();
  if major_idx >= args.len() {
    // A partially applied recursor is a value, not an error.
    return Ok(Step::MISMATCH);
  }

  let mut major = ctx.whnf(&args[major_idx])?;
  if rec.k {
    major = to_ctor_when_k(ctx, rec, major)?;
  }
  let major = to_ctor_if_lit(&major);

  let (major_fn, major_args) = unfold_apps(&major);
  let ExprData::Const(ctor_name, _, _) = major_fn.as_data() else {
    return Ok(Step::MISMATCH);
  };
  let Some(rule) = rec.rule_for(ctor_name) else {
    return Ok(Step::MISMATCH);
  };

  if levels.len() != rec.cnst.level_params.len() {
    debug!(
      rec = %rec.cnst.name,
      expected = rec.cnst.level_params.len(),
      got = levels.len(),
      "reduce_rec: universe arity mismatch"
    );
    return Ok(Step::MALFORMED);
  }
  if major_args.len() < rule.n_fields {
    debug!(
      ctor = %ctor_name,
      fields = rule.n_fields,
      got = major_args.len(),
      "reduce_rec: constructor application too short"
    );
    return Ok(Step::MALFORMED);
  }

  let rhs = subst_expr_levels(&rule.rhs, &rec.cnst.level_params, levels);
  let rhs = foldl_apps(rhs, args[..rec.prefix_len()].iter().cloned());
  // Fields are the trailing arguments of the constructor application. For
  // nested inductives the constructor may carry more parameters than the
  // recursor declares, so the offset comes from the application itself.
  let first_field = major_args.len() - rule.n_fields;
  let rhs = foldl_apps(rhs, major_args[first_field..].iter().cloned());
  let rhs = foldl_apps(rhs, args[major_idx + 1..].iter().cloned());

  debug!(rec = %rec.cnst.name, ctor = %ctor_name, "reduce_rec: iota");
  Ok(Step::Reduced(rhs))
}

/// For a K-like recursor, replace a major premise whose type is an
/// instance of the eliminated inductive by that inductive's nullary
/// constructor, provided the two types are definitionally equal. The
/// major premise is returned unchanged whenever the shortcut does not
/// apply.
pub fn to_ctor_when_k<C>(
  ctx: &C,
  rec: &RecursorVal,
  major: Expr,
) -> ReduceResult<Expr>
where
  C: ReductionContext + ?Sized,
{
  let Some(induct) = rec.major_induct() else {
    return Ok(major);
  };
  let major_type = ctx.whnf(&ctx.infer_type(&major)?)?;
  let (type_fn, type_args) = unfold_apps(&major_type);
  match type_fn.as_data() {
    ExprData::Const(name, _, _) if name == induct => {},
    _ => return Ok(major),
  }
  // Index arguments still waiting on unification could later be solved
  // differently; do not commit to the constructor yet.
  let nparams = rec.num_params.min(type_args.len());
  if type_args[nparams..].iter().any(|a| has_unassigned_mvars(ctx, a)) {
    trace!(induct = %induct, "to_ctor_when_k: unresolved index metavariable");
    return Ok(major);
  }
  let Some(ctor_app) = mk_nullary_ctor(ctx, &major_type, rec.num_params)
  else {
    return Ok(major);
  };
  let ctor_type = ctx.infer_type(&ctor_app)?;
  if ctx.is_def_eq(&major_type, &ctor_type)? {
    debug!(induct = %induct, "to_ctor_when_k: using nullary constructor");
    Ok(ctor_app)
  } else {
    Ok(major)
  }
}

/// The first constructor of the inductive heading `typ`, applied to the
/// first `nparams` arguments of `typ` at the same universe levels.
pub fn mk_nullary_ctor<C>(ctx: &C, typ: &Expr, nparams: usize) -> Option<Expr>
where
  C: ReductionContext + ?Sized,
{
  let (head, args) = unfold_apps(typ);
  let ExprData::Const(name, levels, _) = head.as_data() else {
    return None;
  };
  let ConstantInfo::InductInfo(ind) = ctx.find_constant(name)? else {
    return None;
  };
  let ctor = ind.ctors.first()?;
  let params = args.iter().take(nparams).cloned();
  Some(foldl_apps(Expr::cnst(ctor.clone(), levels.clone()), params))
}

/// The term blocking `e` if it is a recursor application whose major
/// premise does not normalize to a constructor. K-like recursors never
/// report a blocker since they can fire on any well-typed major.
pub fn is_recursor_stuck<C>(ctx: &C, e: &Expr) -> ReduceResult<Option<Expr>>
where
  C: ReductionContext + ?Sized,
{
  let (head, args) = unfold_apps(e);
  let ExprData::Const(name, _, _) = head.as_data() else {
    return Ok(None);
  };
  let Some(ConstantInfo::RecInfo(rec)) = ctx.find_constant(name) else {
    return Ok(None);
  };
  if rec.k {
    return Ok(None);
  }
  let Some(major) = args.get(rec.major_idx()) else {
    return Ok(None);
  };
  let major = ctx.whnf(major)?;
  ctx.get_stuck(&major)
}
