use crate::ix::env::*;

use super::context::ReductionContext;
use super::error::ReduceResult;
use super::expr::{beta, foldl_apps, unfold_apps};
use super::{quot, recursor};

/// Find the subterm that keeps `e` from reducing further: an unassigned
/// metavariable or an opaque free variable at the head, or reached through
/// the major premise of a recursor or quotient eliminator, or through the
/// scrutinee of a projection. `None` when nothing blocks.
pub fn get_stuck<C>(ctx: &C, e: &Expr) -> ReduceResult<Option<Expr>>
where
  C: ReductionContext + ?Sized,
{
  let mut cursor = e.clone();
  loop {
    let next = match cursor.as_data() {
      ExprData::Mdata(_, inner, _) => inner.clone(),
      ExprData::Mvar(name, _) => match ctx.get_mvar_assignment(name) {
        Some(v) => v,
        None => return Ok(Some(cursor)),
      },
      ExprData::Fvar(name, _) => match ctx.get_local_decl(name)?.value {
        Some(v) => v,
        None => return Ok(Some(cursor)),
      },
      ExprData::Proj(_, _, s, _) => ctx.whnf(s)?,
      ExprData::App(..) => {
        let (head, args) = unfold_apps(&cursor);
        match head.as_data() {
          ExprData::Mvar(name, _) => match ctx.get_mvar_assignment(name) {
            Some(v) => beta(&v, &args),
            None => return Ok(Some(head)),
          },
          ExprData::Fvar(name, _) => match ctx.get_local_decl(name)?.value {
            Some(v) => beta(&v, &args),
            None => return Ok(Some(head)),
          },
          ExprData::Const(name, _, _) => {
            return match ctx.find_constant(name) {
              Some(ConstantInfo::RecInfo(_)) => {
                recursor::is_recursor_stuck(ctx, &cursor)
              },
              Some(ConstantInfo::QuotInfo(_)) => {
                quot::is_quotient_stuck(ctx, &cursor)
              },
              _ => Ok(None),
            };
          },
          ExprData::Proj(_, _, s, _) => ctx.whnf(s)?,
          ExprData::Mdata(_, inner, _) => {
            foldl_apps(inner.clone(), args.into_iter())
          },
          _ => return Ok(None),
        }
      },
      _ => return Ok(None),
    };
    cursor = next;
  }
}
