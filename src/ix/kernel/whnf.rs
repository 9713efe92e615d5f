//! The weak-head reduction loop without delta: beta, zeta, iota
//! (recursors and quotients), projections, and optionally auxiliary
//! recursors and projection functions.

use tracing::{debug, trace};

use crate::ix::env::*;

use super::context::ReductionContext;
use super::easy::{EasyCase, whnf_easy};
use super::error::{ReduceResult, Step};
use super::expr::{
  beta, foldl_apps, inst1, mk_name, subst_expr_levels, unfold_apps, update_fn,
};
use super::proj::{project, reduce_projection_function};
use super::quot::reduce_quot;
use super::recursor::reduce_rec;

// ============================================================================
// Configuration
// ============================================================================

/// Which definitions [`whnf_core`] may unfold even though it performs no
/// general delta reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhnfCoreConfig {
  /// Unfold definitions registered as auxiliary recursors (`casesOn`,
  /// `recOn`, `brecOn`, ...) when they head an application.
  pub unfold_aux_recursors: bool,
  /// Reduce registered structure projection functions applied to a
  /// constructor.
  pub unfold_projection_functions: bool,
}

impl Default for WhnfCoreConfig {
  fn default() -> Self {
    Self { unfold_aux_recursors: true, unfold_projection_functions: true }
  }
}

impl WhnfCoreConfig {
  /// Trusted checking: projection functions are ordinary definitions there
  /// and only unfold by delta.
  pub const fn kernel() -> Self {
    Self { unfold_aux_recursors: true, unfold_projection_functions: false }
  }

  pub const fn elaborator() -> Self {
    Self { unfold_aux_recursors: true, unfold_projection_functions: true }
  }
}

// ============================================================================
// WHNF core
// ============================================================================

/// Reduce `e` to weak head normal form without unfolding definitions by
/// name (beyond what `config` allows). The loop is iterative; only the head
/// of an application is normalized by a nested call.
pub fn whnf_core<C>(
  ctx: &C,
  e: &Expr,
  config: WhnfCoreConfig,
) -> ReduceResult<Expr>
where
  C: ReductionContext + ?Sized,
{
  let mut cursor = e.clone();
  loop {
    let hard = match whnf_easy(ctx, &cursor)? {
      EasyCase::Normal(e) => return Ok(e),
      EasyCase::Hard(e) => e,
    };
    let next = match hard.as_data() {
      ExprData::LetE(_, _, val, body, _, _) => inst1(body, val),
      ExprData::App(..) => {
        let (f, args) = unfold_apps(&hard);
        let f_nf = whnf_core(ctx, &f, config)?;
        if f_nf.is_lambda() {
          beta(&f_nf, &args)
        } else if f_nf == f {
          match reduce_matcher(ctx, &f_nf, &args, config)? {
            Some(r) => r,
            None => return Ok(hard),
          }
        } else {
          // The new head may itself be an application: re-flatten the spine
          // so the eliminator sees all of its arguments.
          update_fn(&hard, f_nf)
        }
      },
      ExprData::Proj(..) => match project(ctx, &hard)? {
        Some(field) => field,
        None => return Ok(hard),
      },
      _ => return Ok(hard),
    };
    trace!("whnf_core: step");
    cursor = next;
  }
}

/// [`whnf_core`] with the two unfolding flags passed positionally.
pub fn whnf_core_with<C>(
  ctx: &C,
  e: &Expr,
  unfold_aux_recursors: bool,
  unfold_projection_functions: bool,
) -> ReduceResult<Expr>
where
  C: ReductionContext + ?Sized,
{
  let config =
    WhnfCoreConfig { unfold_aux_recursors, unfold_projection_functions };
  whnf_core(ctx, e, config)
}

/// Dispatch on a constant head: recursor, quotient eliminator, auxiliary
/// recursor, projection function, in that order.
fn reduce_matcher<C>(
  ctx: &C,
  head: &Expr,
  args: &[Expr],
  config: WhnfCoreConfig,
) -> ReduceResult<Option<Expr>>
where
  C: ReductionContext + ?Sized,
{
  let ExprData::Const(name, levels, _) = head.as_data() else {
    return Ok(None);
  };
  let step = match ctx.find_constant(name) {
    Some(ConstantInfo::RecInfo(rec)) => reduce_rec(ctx, rec, levels, args)?,
    Some(ConstantInfo::QuotInfo(quot)) => reduce_quot(ctx, quot, args)?,
    Some(ConstantInfo::DefnInfo(defn))
      if config.unfold_aux_recursors && ctx.is_auxiliary_recursor(name) =>
    {
      return Ok(unfold_aux_recursor(defn, levels, args));
    },
    Some(_) if config.unfold_projection_functions => {
      let e = foldl_apps(head.clone(), args.iter().cloned());
      reduce_projection_function(ctx, &e)?
    },
    _ => return Ok(None),
  };
  Ok(step.reduced())
}

/// Delta-beta an auxiliary recursor and strip a leading `idRhs` wrapper.
fn unfold_aux_recursor(
  defn: &DefinitionVal,
  levels: &[Level],
  args: &[Expr],
) -> Option<Expr> {
  if levels.len() != defn.cnst.level_params.len() {
    debug!(
      defn = %defn.cnst.name,
      expected = defn.cnst.level_params.len(),
      got = levels.len(),
      "unfold_aux_recursor: universe arity mismatch"
    );
    return None;
  }
  let value = subst_expr_levels(&defn.value, &defn.cnst.level_params, levels);
  debug!(defn = %defn.cnst.name, "unfold_aux_recursor");
  Some(strip_id_rhs(beta(&value, args)))
}

/// `idRhs α x` is an identity marker left on compiled equations; its
/// argument is the real right-hand side.
fn strip_id_rhs(e: Expr) -> Expr {
  let (head, mut args) = unfold_apps(&e);
  match head.as_data() {
    ExprData::Const(name, _, _)
      if *name == mk_name("idRhs") && args.len() == 2 =>
    {
      args.pop().unwrap_or(e)
    },
    _ => e,
  }
}

// ============================================================================
// Delta
// ============================================================================

/// Unfold the definition or theorem heading `e`, instantiating its universe
/// parameters and beta-reducing against the spine. Opaque definitions,
/// other constants and universe-arity mismatches give `None`.
pub fn unfold_definition<C>(ctx: &C, e: &Expr) -> Option<Expr>
where
  C: ReductionContext + ?Sized,
{
  let (head, args) = unfold_apps(e);
  let ExprData::Const(name, levels, _) = head.as_data() else {
    return None;
  };
  let (params, value) = match ctx.find_constant(name)? {
    ConstantInfo::DefnInfo(d) if d.hints != ReducibilityHints::Opaque => {
      (&d.cnst.level_params, &d.value)
    },
    ConstantInfo::ThmInfo(t) => (&t.cnst.level_params, &t.value),
    _ => return None,
  };
  if levels.len() != params.len() {
    return None;
  }
  let value = subst_expr_levels(value, params, levels);
  Some(beta(&value, &args))
}
