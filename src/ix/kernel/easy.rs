use tracing::trace;

use crate::ix::env::*;

use super::context::ReductionContext;
use super::error::{ReduceError, ReduceResult};

/// Classification of a term by [`whnf_easy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EasyCase {
  /// Already in weak head normal form.
  Normal(Expr),
  /// A let, constant, application or projection that needs real work.
  Hard(Expr),
}

/// Settle the cases that need no reduction rule. Metadata is stripped,
/// valued locals and assigned metavariables are followed (through chains),
/// and whatever remains is either normal or handed back as hard.
pub fn whnf_easy<C>(ctx: &C, e: &Expr) -> ReduceResult<EasyCase>
where
  C: ReductionContext + ?Sized,
{
  let mut cursor = e.clone();
  loop {
    let next = match cursor.as_data() {
      ExprData::ForallE(..)
      | ExprData::Lam(..)
      | ExprData::Sort(..)
      | ExprData::Lit(..) => return Ok(EasyCase::Normal(cursor)),
      ExprData::Bvar(idx, _) => {
        return Err(ReduceError::LooseBoundVariable { idx: *idx });
      },
      ExprData::LetE(..)
      | ExprData::Const(..)
      | ExprData::App(..)
      | ExprData::Proj(..) => return Ok(EasyCase::Hard(cursor)),
      ExprData::Mdata(_, inner, _) => inner.clone(),
      ExprData::Fvar(name, _) => match ctx.get_local_decl(name)?.value {
        Some(value) => {
          trace!(local = %name, "whnf_easy: unfolding let-bound local");
          value
        },
        None => return Ok(EasyCase::Normal(cursor)),
      },
      ExprData::Mvar(name, _) => match ctx.get_mvar_assignment(name) {
        Some(value) => {
          trace!(mvar = %name, "whnf_easy: instantiating assigned mvar");
          value
        },
        None => return Ok(EasyCase::Normal(cursor)),
      },
    };
    cursor = next;
  }
}

/// Continuation form of [`whnf_easy`]: normal terms are returned directly,
/// hard ones are passed to `hard`.
pub fn whnf_easy_cases<C, K>(ctx: &C, e: &Expr, hard: K) -> ReduceResult<Expr>
where
  C: ReductionContext + ?Sized,
  K: FnOnce(Expr) -> ReduceResult<Expr>,
{
  match whnf_easy(ctx, e)? {
    EasyCase::Normal(e) => Ok(e),
    EasyCase::Hard(e) => hard(e),
  }
}
