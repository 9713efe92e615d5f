use crate::ix::env::*;

use super::error::ReduceResult;
use super::stuck;

/// The capabilities reduction calls back into. Kernel checking and
/// speculative elaboration supply different implementations; the reducers
/// never hold global state, so one implementation may be shared across
/// threads and re-entered recursively (`whnf` typically calls back into
/// [`whnf_core`](super::whnf::whnf_core)).
pub trait ReductionContext {
  /// Full weak head normalization, free to unfold definitions by name.
  fn whnf(&self, e: &Expr) -> ReduceResult<Expr>;

  fn infer_type(&self, e: &Expr) -> ReduceResult<Expr>;

  fn is_def_eq(&self, a: &Expr, b: &Expr) -> ReduceResult<bool>;

  /// Fails with `UnknownLocal` for free variables outside the context.
  fn get_local_decl(&self, name: &Name) -> ReduceResult<LocalDecl>;

  fn get_mvar_assignment(&self, name: &Name) -> Option<Expr>;

  fn find_constant(&self, name: &Name) -> Option<&ConstantInfo>;

  fn is_auxiliary_recursor(&self, name: &Name) -> bool;

  fn get_projection_function_info(
    &self,
    name: &Name,
  ) -> Option<ProjectionFunctionInfo>;

  /// The subterm blocking reduction of `e`, if any. Used by the recursor
  /// and quotient stuck probes on their normalized major premise.
  fn get_stuck(&self, e: &Expr) -> ReduceResult<Option<Expr>> {
    stuck::get_stuck(self, e)
  }
}

/// Whether `e` mentions a metavariable with no assignment, looking through
/// assigned ones.
pub fn has_unassigned_mvars<C>(ctx: &C, e: &Expr) -> bool
where
  C: ReductionContext + ?Sized,
{
  let mut stack: Vec<Expr> = vec![e.clone()];
  while let Some(e) = stack.pop() {
    match e.as_data() {
      ExprData::Mvar(name, _) => match ctx.get_mvar_assignment(name) {
        Some(v) => stack.push(v),
        None => return true,
      },
      ExprData::App(f, a, _) => {
        stack.push(f.clone());
        stack.push(a.clone());
      },
      ExprData::Lam(_, t, b, _, _) | ExprData::ForallE(_, t, b, _, _) => {
        stack.push(t.clone());
        stack.push(b.clone());
      },
      ExprData::LetE(_, t, v, b, _, _) => {
        stack.push(t.clone());
        stack.push(v.clone());
        stack.push(b.clone());
      },
      ExprData::Proj(_, _, s, _) => stack.push(s.clone()),
      ExprData::Mdata(_, inner, _) => stack.push(inner.clone()),
      _ => {},
    }
  }
  false
}
