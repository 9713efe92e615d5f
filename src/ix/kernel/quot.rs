use tracing::debug;

use crate::ix::env::*;

use super::context::ReductionContext;
use super::error::{ReduceResult, Step};
use super::expr::{foldl_apps, unfold_apps};

/// Argument positions of the major premise and the function argument for
/// the two eliminators, `None` for the other quotient primitives.
///
/// `Quot.lift {α} {r} {β} f h q` and `Quot.ind {α} {r} {β} mk q`.
fn positions(kind: QuotKind) -> Option<(usize, usize)> {
  match kind {
    QuotKind::Lift => Some((5, 3)),
    QuotKind::Ind => Some((4, 3)),
    QuotKind::Type | QuotKind::Ctor => None,
  }
}

/// Resolve the head of `e` as a quotient eliminator and try one step.
pub fn reduce_quotient<C>(ctx: &C, e: &Expr) -> ReduceResult<Step>
where
  C: ReductionContext + ?Sized,
{
  let (head, args) = unfold_apps(e);
  let ExprData::Const(name, _, _) = head.as_data() else {
    return Ok(Step::MISMATCH);
  };
  match ctx.find_constant(name) {
    Some(ConstantInfo::QuotInfo(q)) => reduce_quot(ctx, q, &args),
    _ => Ok(Step::MISMATCH),
  }
}

/// `Quot.lift f h (Quot.mk r a) ~> f a` and
/// `Quot.ind mk (Quot.mk r a) ~> mk a`, reapplying trailing arguments.
pub(crate) fn reduce_quot<C>(
  ctx: &C,
  quot: &QuotVal,
  args: &[Expr],
) -> ReduceResult<Step>
where
  C: ReductionContext + ?Sized,
{
  let Some((major_idx, fn_idx)) = positions(quot.kind) else {
    return Ok(Step::MISMATCH);
  };
  if major_idx >= args.len() {
    return Ok(Step::MISMATCH);
  }
  let major = ctx.whnf(&args[major_idx])?;
  let Some(payload) = quot_mk_payload(ctx, &major) else {
    return Ok(Step::MISMATCH);
  };
  debug!(elim = %quot.cnst.name, "reduce_quot: fired");
  let r = Expr::app(args[fn_idx].clone(), payload);
  Ok(Step::Reduced(foldl_apps(r, args[major_idx + 1..].iter().cloned())))
}

/// `a` when `e` is exactly `Quot.mk α r a`.
fn quot_mk_payload<C>(ctx: &C, e: &Expr) -> Option<Expr>
where
  C: ReductionContext + ?Sized,
{
  let (head, mut args) = unfold_apps(e);
  let name = head.const_name()?;
  match ctx.find_constant(name)? {
    ConstantInfo::QuotInfo(QuotVal { kind: QuotKind::Ctor, .. })
      if args.len() == 3 =>
    {
      args.pop()
    },
    _ => None,
  }
}

/// The term blocking `e` if it is a quotient eliminator whose major premise
/// does not normalize to `Quot.mk`.
pub fn is_quotient_stuck<C>(ctx: &C, e: &Expr) -> ReduceResult<Option<Expr>>
where
  C: ReductionContext + ?Sized,
{
  let (head, args) = unfold_apps(e);
  let ExprData::Const(name, _, _) = head.as_data() else {
    return Ok(None);
  };
  let Some(ConstantInfo::QuotInfo(q)) = ctx.find_constant(name) else {
    return Ok(None);
  };
  let Some((major_idx, _)) = positions(q.kind) else {
    return Ok(None);
  };
  let Some(major) = args.get(major_idx) else {
    return Ok(None);
  };
  let major = ctx.whnf(major)?;
  ctx.get_stuck(&major)
}
