//! Structure projections: registered projection functions applied to a
//! structure instance, and the primitive projection node.

use tracing::debug;

use crate::ix::env::*;

use super::context::ReductionContext;
use super::error::{ReduceResult, Step};
use super::expr::{foldl_apps, unfold_apps};
use super::lit::to_ctor_if_lit;

/// Field `idx` of an already normalized structure value, when it is a
/// constructor application (after literal coercion).
pub fn project_ctor<C>(ctx: &C, structure: &Expr, idx: usize) -> Option<Expr>
where
  C: ReductionContext + ?Sized,
{
  let structure = to_ctor_if_lit(structure);
  let (head, args) = unfold_apps(&structure);
  let ConstantInfo::CtorInfo(ctor) = ctx.find_constant(head.const_name()?)?
  else {
    return None;
  };
  args.get(ctor.num_params + idx).cloned()
}

/// Resolve the head of `e` as a registered projection function and, when
/// its structure argument normalizes to a constructor, select the field and
/// reapply the remaining arguments.
pub fn reduce_projection_function<C>(ctx: &C, e: &Expr) -> ReduceResult<Step>
where
  C: ReductionContext + ?Sized,
{
  let (head, args) = unfold_apps(e);
  let Some(name) = head.const_name() else {
    return Ok(Step::MISMATCH);
  };
  let Some(info) = ctx.get_projection_function_info(name) else {
    return Ok(Step::MISMATCH);
  };
  if ctx.find_constant(name).is_none() {
    return Ok(Step::MISMATCH);
  }
  let major_idx = info.num_params;
  if major_idx >= args.len() {
    return Ok(Step::MISMATCH);
  }
  let major = ctx.whnf(&args[major_idx])?;
  let Some(field) = project_ctor(ctx, &major, info.field_idx) else {
    return Ok(Step::MISMATCH);
  };
  debug!(proj = %name, field = info.field_idx, "reduce_projection_function");
  Ok(Step::Reduced(foldl_apps(field, args[major_idx + 1..].iter().cloned())))
}

/// Reduce a primitive `Proj` node. Returns `None` for any other term and
/// when the scrutinee does not normalize to a constructor application.
pub fn project<C>(ctx: &C, e: &Expr) -> ReduceResult<Option<Expr>>
where
  C: ReductionContext + ?Sized,
{
  let ExprData::Proj(_, idx, structure, _) = e.as_data() else {
    return Ok(None);
  };
  let Ok(idx) = usize::try_from(*idx) else {
    return Ok(None);
  };
  let structure = ctx.whnf(structure)?;
  Ok(project_ctor(ctx, &structure, idx))
}

/// [`project`], handing back the node itself when it is stuck.
pub fn reduce_proj<C>(ctx: &C, e: &Expr) -> ReduceResult<Expr>
where
  C: ReductionContext + ?Sized,
{
  Ok(project(ctx, e)?.unwrap_or_else(|| e.clone()))
}
