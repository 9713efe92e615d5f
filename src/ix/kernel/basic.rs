//! A self-contained [`ReductionContext`] over a plain environment: full
//! `whnf` with delta and literal arithmetic, a non-checking type inferrer
//! and a work-stack definitional equality (universes compared up to
//! antisymmetry after simplification). Callers with a real type checker
//! or elaborator plug in their own context instead.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use num_bigint::BigUint;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::ix::env::*;
use crate::ix::nat::Nat;

use super::context::ReductionContext;
use super::error::{ReduceError, ReduceResult};
use super::expr::*;
use super::level::{eq_antisymm, eq_antisymm_many};
use super::lit::to_ctor_if_lit;
use super::whnf::{WhnfCoreConfig, unfold_definition, whnf_core};

pub struct BasicContext {
  pub env: Env,
  /// Locals are shared across threads: entering a binder during inference
  /// or definitional equality registers a fresh name here.
  locals: DashMap<Name, LocalDecl>,
  mvar_types: FxHashMap<Name, Expr>,
  mvar_assignments: FxHashMap<Name, Expr>,
  aux_recursors: FxHashSet<Name>,
  projections: FxHashMap<Name, ProjectionFunctionInfo>,
  config: WhnfCoreConfig,
  local_counter: AtomicU64,
}

impl BasicContext {
  pub fn new(env: Env) -> Self {
    BasicContext {
      env,
      locals: DashMap::new(),
      mvar_types: FxHashMap::default(),
      mvar_assignments: FxHashMap::default(),
      aux_recursors: FxHashSet::default(),
      projections: FxHashMap::default(),
      config: WhnfCoreConfig::default(),
      local_counter: AtomicU64::new(0),
    }
  }

  pub fn with_config(mut self, config: WhnfCoreConfig) -> Self {
    self.config = config;
    self
  }

  pub fn config(&self) -> WhnfCoreConfig {
    self.config
  }

  // ==========================================================================
  // Local context management
  // ==========================================================================

  /// Create a fresh free variable of type `ty`.
  pub fn mk_local(&self, name: &Name, ty: &Expr) -> Expr {
    self.mk_local_decl(name, ty, None)
  }

  /// Create a fresh let-bound free variable that unfolds to `value`.
  pub fn mk_let(&self, name: &Name, ty: &Expr, value: &Expr) -> Expr {
    self.mk_local_decl(name, ty, Some(value.clone()))
  }

  fn mk_local_decl(&self, name: &Name, ty: &Expr, value: Option<Expr>) -> Expr {
    let id = self.local_counter.fetch_add(1, Ordering::Relaxed);
    let fvar_name = Name::num(name.clone(), Nat::from(id));
    let decl = LocalDecl {
      fvar_name: fvar_name.clone(),
      user_name: name.clone(),
      typ: ty.clone(),
      value,
    };
    self.locals.insert(fvar_name.clone(), decl);
    Expr::fvar(fvar_name)
  }

  pub fn declare_mvar(&mut self, name: Name, ty: Expr) {
    self.mvar_types.insert(name, ty);
  }

  pub fn assign_mvar(&mut self, name: Name, value: Expr) {
    self.mvar_assignments.insert(name, value);
  }

  pub fn register_aux_recursor(&mut self, name: Name) {
    self.aux_recursors.insert(name);
  }

  pub fn register_projection(
    &mut self,
    name: Name,
    info: ProjectionFunctionInfo,
  ) {
    self.projections.insert(name, info);
  }

  // ==========================================================================
  // Ensure helpers
  // ==========================================================================

  fn ensure_sort(&self, e: &Expr) -> ReduceResult<Level> {
    let whnfd = self.whnf(e)?;
    match whnfd.as_data() {
      ExprData::Sort(level, _) => Ok(level.clone()),
      _ => Err(ReduceError::TypeExpected { expr: e.clone(), inferred: whnfd }),
    }
  }

  fn ensure_pi(&self, e: &Expr) -> ReduceResult<Expr> {
    if let ExprData::ForallE(..) = e.as_data() {
      return Ok(e.clone());
    }
    let whnfd = self.whnf(e)?;
    match whnfd.as_data() {
      ExprData::ForallE(..) => Ok(whnfd),
      _ => {
        Err(ReduceError::FunctionExpected { expr: e.clone(), inferred: whnfd })
      },
    }
  }

  fn infer_sort_of(&self, e: &Expr) -> ReduceResult<Level> {
    let ty = self.infer(e)?;
    self.ensure_sort(&ty)
  }

  // ==========================================================================
  // Type inference (no checking)
  // ==========================================================================

  fn infer(&self, e: &Expr) -> ReduceResult<Expr> {
    let mut cursor = e.clone();
    loop {
      let next = match cursor.as_data() {
        ExprData::Mdata(_, inner, _) => inner.clone(),
        ExprData::LetE(_, _, val, body, _, _) => inst1(body, val),
        ExprData::Bvar(idx, _) => {
          return Err(ReduceError::LooseBoundVariable { idx: *idx });
        },
        ExprData::Fvar(name, _) => return Ok(self.get_local_decl(name)?.typ),
        ExprData::Mvar(name, _) => {
          return self
            .mvar_types
            .get(name)
            .cloned()
            .ok_or_else(|| ReduceError::UnknownMVar { name: name.clone() });
        },
        ExprData::Sort(level, _) => {
          return Ok(Expr::sort(Level::succ(level.clone())));
        },
        ExprData::Const(name, levels, _) => {
          return self.infer_const(name, levels);
        },
        ExprData::App(..) => return self.infer_app(&cursor),
        ExprData::Lam(..) => return self.infer_lambda(&cursor),
        ExprData::ForallE(..) => return self.infer_pi(&cursor),
        ExprData::Lit(Literal::NatVal(_), _) => {
          return Ok(Expr::cnst(mk_name("Nat"), vec![]));
        },
        ExprData::Lit(Literal::StrVal(_), _) => {
          return Ok(Expr::cnst(mk_name("String"), vec![]));
        },
        ExprData::Proj(_, idx, structure, _) => {
          return self.infer_proj(*idx, structure);
        },
      };
      cursor = next;
    }
  }

  fn infer_const(&self, name: &Name, levels: &[Level]) -> ReduceResult<Expr> {
    let ci = self
      .env
      .get(name)
      .ok_or_else(|| ReduceError::UnknownConst { name: name.clone() })?;
    let params = ci.get_level_params();
    if levels.len() != params.len() {
      return Err(ReduceError::KernelException {
        msg: format!("universe parameter count mismatch for {name}"),
      });
    }
    Ok(subst_expr_levels(ci.get_type(), params, levels))
  }

  /// Walk the function type's telescope, normalizing only when a binder is
  /// not syntactically exposed.
  fn infer_app(&self, e: &Expr) -> ReduceResult<Expr> {
    let (fun, args) = unfold_apps(e);
    let mut fun_ty = self.infer(&fun)?;
    let mut j = 0;
    for i in 0..args.len() {
      fun_ty = match fun_ty.as_data() {
        ExprData::ForallE(_, _, body, _, _) => body.clone(),
        _ => {
          let pending = inst(&fun_ty, &args[j..i]);
          j = i;
          match self.ensure_pi(&pending)?.as_data() {
            ExprData::ForallE(_, _, body, _, _) => body.clone(),
            _ => unreachable!("ensure_pi returns a pi"),
          }
        },
      };
    }
    Ok(inst(&fun_ty, &args[j..]))
  }

  fn infer_lambda(&self, e: &Expr) -> ReduceResult<Expr> {
    let mut cursor = e.clone();
    let mut locals = Vec::new();
    let mut binders = Vec::new();
    while let ExprData::Lam(name, binder_type, body, bi, _) = cursor.as_data()
    {
      let binder_type = inst(binder_type, &locals);
      locals.push(self.mk_local(name, &binder_type));
      binders.push((name.clone(), binder_type, bi.clone()));
      let next = body.clone();
      cursor = next;
    }
    let body_ty = self.infer(&inst(&cursor, &locals))?;
    let mut result = abstr(&body_ty, &locals);
    for (i, (name, binder_type, bi)) in binders.into_iter().enumerate().rev() {
      result = Expr::all(name, abstr(&binder_type, &locals[..i]), result, bi);
    }
    Ok(result)
  }

  fn infer_pi(&self, e: &Expr) -> ReduceResult<Expr> {
    let mut cursor = e.clone();
    let mut locals = Vec::new();
    let mut universes = Vec::new();
    while let ExprData::ForallE(name, binder_type, body, _, _) =
      cursor.as_data()
    {
      let binder_type = inst(binder_type, &locals);
      universes.push(self.infer_sort_of(&binder_type)?);
      locals.push(self.mk_local(name, &binder_type));
      let next = body.clone();
      cursor = next;
    }
    let mut level = self.infer_sort_of(&inst(&cursor, &locals))?;
    for univ in universes.into_iter().rev() {
      level = Level::imax(univ, level);
    }
    Ok(Expr::sort(level))
  }

  fn infer_proj(&self, idx: u64, structure: &Expr) -> ReduceResult<Expr> {
    let structure_ty = self.whnf(&self.infer(structure)?)?;
    let (head, params) = unfold_apps(&structure_ty);
    let ExprData::Const(type_name, levels, _) = head.as_data() else {
      return Err(ReduceError::KernelException {
        msg: "projection structure type is not a constant".into(),
      });
    };
    let ctor_name = match self.find_constant(type_name) {
      Some(ConstantInfo::InductInfo(ind)) => {
        ind.ctors.first().cloned().ok_or_else(|| {
          ReduceError::KernelException {
            msg: format!("{type_name} has no constructors"),
          }
        })?
      },
      Some(_) => {
        return Err(ReduceError::KernelException {
          msg: format!("{type_name} is not an inductive type"),
        });
      },
      None => {
        return Err(ReduceError::UnknownConst { name: type_name.clone() });
      },
    };
    let mut ctor_ty = self.infer_const(&ctor_name, levels)?;
    // Parameters first, then each earlier field as a projection of its own.
    let fields =
      (0..idx).map(|i| Expr::proj(type_name.clone(), i, structure.clone()));
    for arg in params.into_iter().chain(fields) {
      ctor_ty = match self.ensure_pi(&ctor_ty)?.as_data() {
        ExprData::ForallE(_, _, body, _, _) => inst1(body, &arg),
        _ => unreachable!("ensure_pi returns a pi"),
      };
    }
    match self.ensure_pi(&ctor_ty)?.as_data() {
      ExprData::ForallE(_, binder_type, _, _, _) => Ok(binder_type.clone()),
      _ => unreachable!("ensure_pi returns a pi"),
    }
  }

  // ==========================================================================
  // Definitional equality
  // ==========================================================================

  /// Conjunction work stack: every pushed pair must be equal.
  fn def_eq(&self, x: &Expr, y: &Expr) -> ReduceResult<bool> {
    let mut work: Vec<(Expr, Expr)> = vec![(x.clone(), y.clone())];
    while let Some((x, y)) = work.pop() {
      if !self.def_eq_step(&x, &y, &mut work)? {
        return Ok(false);
      }
    }
    Ok(true)
  }

  fn def_eq_step(
    &self,
    x: &Expr,
    y: &Expr,
    work: &mut Vec<(Expr, Expr)>,
  ) -> ReduceResult<bool> {
    if x == y {
      return Ok(true);
    }
    let x = self.whnf(x)?;
    let y = self.whnf(y)?;
    if x == y {
      return Ok(true);
    }
    match (x.as_data(), y.as_data()) {
      (ExprData::Sort(l, _), ExprData::Sort(r, _)) => Ok(eq_antisymm(l, r)),
      (ExprData::Const(xn, xl, _), ExprData::Const(yn, yl, _)) => {
        Ok(xn == yn && eq_antisymm_many(xl, yl))
      },
      (ExprData::Lam(n, t1, b1, ..), ExprData::Lam(_, t2, b2, ..))
      | (
        ExprData::ForallE(n, t1, b1, ..),
        ExprData::ForallE(_, t2, b2, ..),
      ) => {
        let local = self.mk_local(n, t1);
        work.push((t1.clone(), t2.clone()));
        work.push((inst1(b1, &local), inst1(b2, &local)));
        Ok(true)
      },
      (ExprData::Proj(_, i, s1, _), ExprData::Proj(_, j, s2, _)) if i == j => {
        work.push((s1.clone(), s2.clone()));
        Ok(true)
      },
      (ExprData::App(..), ExprData::App(..)) => {
        let (f1, args1) = unfold_apps(&x);
        let (f2, args2) = unfold_apps(&y);
        if args1.len() != args2.len() {
          return Ok(false);
        }
        work.push((f1, f2));
        work.extend(args1.into_iter().zip(args2));
        Ok(true)
      },
      (ExprData::Lit(Literal::NatVal(_), _), _) => {
        work.push((to_ctor_if_lit(&x), y.clone()));
        Ok(true)
      },
      (_, ExprData::Lit(Literal::NatVal(_), _)) => {
        work.push((x.clone(), to_ctor_if_lit(&y)));
        Ok(true)
      },
      _ => Ok(false),
    }
  }

  // ==========================================================================
  // Literal arithmetic
  // ==========================================================================

  /// Evaluate `Nat` primitives on closed literal arguments.
  fn reduce_nat(&self, e: &Expr) -> ReduceResult<Option<Expr>> {
    if has_fvars(e) || has_mvars(e) {
      return Ok(None);
    }
    let (head, args) = unfold_apps(e);
    let ExprData::Const(name, _, _) = head.as_data() else {
      return Ok(None);
    };
    if name.prefix() != mk_name("Nat") || args.len() != 2 {
      return Ok(None);
    }
    let Some(a) = self.nat_value(&args[0])? else { return Ok(None) };
    let Some(b) = self.nat_value(&args[1])? else { return Ok(None) };
    let nat = |n: BigUint| Some(Expr::nat_lit(Nat(n)));
    let result = match name.pretty().as_str() {
      "Nat.add" => nat(a + b),
      "Nat.sub" => nat(if a >= b { a - b } else { BigUint::ZERO }),
      "Nat.mul" => nat(a * b),
      "Nat.div" => {
        nat(if b == BigUint::ZERO { BigUint::ZERO } else { a / b })
      },
      "Nat.mod" => nat(if b == BigUint::ZERO { a } else { a % b }),
      "Nat.beq" => Some(bool_to_expr(a == b)),
      "Nat.ble" => Some(bool_to_expr(a <= b)),
      _ => None,
    };
    if result.is_some() {
      trace!(op = %name, "reduce_nat");
    }
    Ok(result)
  }

  fn nat_value(&self, e: &Expr) -> ReduceResult<Option<BigUint>> {
    let e = self.whnf(e)?;
    Ok(match e.as_data() {
      ExprData::Lit(Literal::NatVal(n), _) => Some(n.0.clone()),
      ExprData::Const(name, _, _) if *name == mk_name2("Nat", "zero") => {
        Some(BigUint::ZERO)
      },
      _ => None,
    })
  }
}

fn bool_to_expr(b: bool) -> Expr {
  let name =
    if b { mk_name2("Bool", "true") } else { mk_name2("Bool", "false") };
  Expr::cnst(name, vec![])
}

impl ReductionContext for BasicContext {
  fn whnf(&self, e: &Expr) -> ReduceResult<Expr> {
    let mut cursor = e.clone();
    loop {
      let reduced = whnf_core(self, &cursor, self.config)?;
      if let Some(lit) = self.reduce_nat(&reduced)? {
        return Ok(lit);
      }
      match unfold_definition(self, &reduced) {
        Some(unfolded) => cursor = unfolded,
        None => return Ok(reduced),
      }
    }
  }

  fn infer_type(&self, e: &Expr) -> ReduceResult<Expr> {
    self.infer(e)
  }

  fn is_def_eq(&self, a: &Expr, b: &Expr) -> ReduceResult<bool> {
    self.def_eq(a, b)
  }

  fn get_local_decl(&self, name: &Name) -> ReduceResult<LocalDecl> {
    self
      .locals
      .get(name)
      .map(|decl| decl.value().clone())
      .ok_or_else(|| ReduceError::UnknownLocal { name: name.clone() })
  }

  fn get_mvar_assignment(&self, name: &Name) -> Option<Expr> {
    self.mvar_assignments.get(name).cloned()
  }

  fn find_constant(&self, name: &Name) -> Option<&ConstantInfo> {
    self.env.get(name)
  }

  fn is_auxiliary_recursor(&self, name: &Name) -> bool {
    self.aux_recursors.contains(name)
  }

  fn get_projection_function_info(
    &self,
    name: &Name,
  ) -> Option<ProjectionFunctionInfo> {
    self.projections.get(name).copied()
  }
}
