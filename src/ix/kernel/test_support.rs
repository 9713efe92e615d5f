//! Environments and term builders shared by the kernel tests.

use crate::ix::env::*;

pub use super::basic::BasicContext;
pub use super::context::ReductionContext;
use super::expr::{beta, foldl_apps, unfold_apps};

// ============================================================================
// Names, levels, binders
// ============================================================================

pub fn mk(s: &str) -> Name {
  Name::from_dotted(s)
}

pub fn one() -> Level {
  Level::succ(Level::zero())
}

fn param(s: &str) -> Level {
  Level::param(mk(s))
}

fn cnst(s: &str, levels: Vec<Level>) -> Expr {
  Expr::cnst(mk(s), levels)
}

fn apps(f: Expr, args: impl IntoIterator<Item = Expr>) -> Expr {
  foldl_apps(f, args.into_iter())
}

fn lam(n: &str, ty: Expr, body: Expr) -> Expr {
  Expr::lam(mk(n), ty, body, BinderInfo::Default)
}

fn pi(n: &str, ty: Expr, body: Expr) -> Expr {
  Expr::all(mk(n), ty, body, BinderInfo::Default)
}

fn bv(i: u64) -> Expr {
  Expr::bvar(i)
}

/// Non-dependent function type. `b` is not lifted.
pub fn arrow(a: Expr, b: Expr) -> Expr {
  Expr::all(Name::anon(), a, b, BinderInfo::Default)
}

pub fn prop() -> Expr {
  Expr::sort(Level::zero())
}

fn type0() -> Expr {
  Expr::sort(one())
}

// ============================================================================
// Declarations
// ============================================================================

fn cval(name: &str, params: &[&str], typ: Expr) -> ConstantVal {
  ConstantVal {
    name: mk(name),
    level_params: params.iter().map(|p| mk(p)).collect(),
    typ,
  }
}

fn add_induct(
  env: &mut Env,
  name: &str,
  params: &[&str],
  typ: Expr,
  num_params: usize,
  num_indices: usize,
  ctors: &[&str],
) {
  let val = InductiveVal {
    cnst: cval(name, params, typ),
    num_params,
    num_indices,
    all: vec![mk(name)],
    ctors: ctors.iter().map(|c| mk(c)).collect(),
    num_nested: 0,
    is_rec: false,
    is_unsafe: false,
    is_reflexive: false,
  };
  env.insert(mk(name), ConstantInfo::InductInfo(val));
}

fn add_ctor(
  env: &mut Env,
  name: &str,
  params: &[&str],
  typ: Expr,
  induct: &str,
  cidx: usize,
  num_params: usize,
  num_fields: usize,
) {
  let val = ConstructorVal {
    cnst: cval(name, params, typ),
    induct: mk(induct),
    cidx,
    num_params,
    num_fields,
    is_unsafe: false,
  };
  env.insert(mk(name), ConstantInfo::CtorInfo(val));
}

fn add_defn(
  env: &mut Env,
  name: &str,
  params: &[&str],
  typ: Expr,
  value: Expr,
) {
  let val = DefinitionVal {
    cnst: cval(name, params, typ),
    value,
    hints: ReducibilityHints::Regular(1),
    safety: DefinitionSafety::Safe,
    all: vec![mk(name)],
  };
  env.insert(mk(name), ConstantInfo::DefnInfo(val));
}

fn add_quot(
  env: &mut Env,
  name: &str,
  params: &[&str],
  typ: Expr,
  kind: QuotKind,
) {
  let val = QuotVal { cnst: cval(name, params, typ), kind };
  env.insert(mk(name), ConstantInfo::QuotInfo(val));
}

fn rule(ctor: &str, n_fields: usize, rhs: Expr) -> RecursorRule {
  RecursorRule { ctor: mk(ctor), n_fields, rhs }
}

// ============================================================================
// Nat and friends
// ============================================================================

pub fn nat() -> Expr {
  cnst("Nat", vec![])
}

pub fn nat_zero() -> Expr {
  cnst("Nat.zero", vec![])
}

pub fn nat_succ() -> Expr {
  cnst("Nat.succ", vec![])
}

pub fn nat_lit(n: u64) -> Expr {
  Expr::nat_lit(n.into())
}

/// `Nat.succ (... (Nat.succ Nat.zero))` with `n` successors.
pub fn peano(n: u64) -> Expr {
  (0..n).fold(nat_zero(), |acc, _| Expr::app(nat_succ(), acc))
}

pub fn nat_rec_const() -> Expr {
  cnst("Nat.rec", vec![one()])
}

pub fn nat_rec(motive: Expr, zero: Expr, succ: Expr, major: Expr) -> Expr {
  apps(nat_rec_const(), [motive, zero, succ, major])
}

pub fn nat_cases_on(motive: Expr, major: Expr, zero: Expr, succ: Expr) -> Expr {
  apps(cnst("Nat.casesOn", vec![one()]), [motive, major, zero, succ])
}

pub fn nat_add(a: Expr, b: Expr) -> Expr {
  apps(cnst("Nat.add", vec![]), [a, b])
}

pub fn double() -> Expr {
  cnst("Nat.double", vec![])
}

/// A one-argument function whose body is wrapped in `idRhs`.
pub fn wrapped_id() -> Expr {
  cnst("wrappedId", vec![])
}

/// `fun (_ : Nat) => ty`
pub fn const_motive(ty: Expr) -> Expr {
  lam("n", nat(), ty)
}

/// `fun (_ : Nat) (ih : Nat) => Nat.succ ih`
pub fn succ_step() -> Expr {
  lam("n", nat(), lam("ih", nat(), Expr::app(nat_succ(), bv(0))))
}

pub fn list_of(ty: Expr) -> Expr {
  Expr::app(cnst("List", vec![Level::zero()]), ty)
}

pub fn list_cons(ty: Expr, head: Expr, tail: Expr) -> Expr {
  apps(cnst("List.cons", vec![Level::zero()]), [ty, head, tail])
}

fn nat_env() -> Env {
  let mut env = Env::default();
  let u = || param("u");

  add_induct(&mut env, "Nat", &[], type0(), 0, 0, &["Nat.zero", "Nat.succ"]);
  add_ctor(&mut env, "Nat.zero", &[], nat(), "Nat", 0, 0, 0);
  add_ctor(&mut env, "Nat.succ", &[], arrow(nat(), nat()), "Nat", 1, 0, 1);

  // Nat.rec.{u} : (motive : Nat → Sort u) → motive Nat.zero →
  //   ((n : Nat) → motive n → motive (Nat.succ n)) →
  //   (t : Nat) → motive t
  let rec_ty = pi(
    "motive",
    arrow(nat(), Expr::sort(u())),
    pi(
      "zero",
      Expr::app(bv(0), nat_zero()),
      pi(
        "succ",
        pi(
          "n",
          nat(),
          pi(
            "n_ih",
            Expr::app(bv(2), bv(0)),
            Expr::app(bv(3), Expr::app(nat_succ(), bv(1))),
          ),
        ),
        pi("t", nat(), Expr::app(bv(3), bv(0))),
      ),
    ),
  );
  let rec_u = || cnst("Nat.rec", vec![param("u")]);
  let binders = |body: Expr| {
    lam("motive", nat(), lam("zero", nat(), lam("succ", nat(), body)))
  };
  let zero_rhs = binders(bv(1));
  let succ_rhs = binders(lam(
    "n",
    nat(),
    apps(bv(1), [bv(0), apps(rec_u(), [bv(3), bv(2), bv(1), bv(0)])]),
  ));
  let rec = RecursorVal {
    cnst: cval("Nat.rec", &["u"], rec_ty),
    all: vec![mk("Nat")],
    num_params: 0,
    num_indices: 0,
    num_motives: 1,
    num_minors: 2,
    rules: vec![rule("Nat.zero", 0, zero_rhs), rule("Nat.succ", 1, succ_rhs)],
    k: false,
    is_unsafe: false,
  };
  env.insert(mk("Nat.rec"), ConstantInfo::RecInfo(rec));

  // Nat.casesOn.{u} motive t zero succ :=
  //   Nat.rec motive zero (fun n _ => succ n) t
  let cases_ty = pi(
    "motive",
    arrow(nat(), Expr::sort(u())),
    pi(
      "t",
      nat(),
      pi(
        "zero",
        Expr::app(bv(1), nat_zero()),
        pi(
          "succ",
          pi("n", nat(), Expr::app(bv(3), Expr::app(nat_succ(), bv(0)))),
          Expr::app(bv(3), bv(2)),
        ),
      ),
    ),
  );
  let succ_case = lam("n", nat(), lam("ih", nat(), Expr::app(bv(2), bv(1))));
  let cases_val = lam(
    "motive",
    nat(),
    lam(
      "t",
      nat(),
      lam(
        "zero",
        nat(),
        lam(
          "succ",
          nat(),
          apps(rec_u(), [bv(3), bv(1), succ_case, bv(2)]),
        ),
      ),
    ),
  );
  add_defn(&mut env, "Nat.casesOn", &["u"], cases_ty, cases_val);

  // Nat.add n m := Nat.rec (fun _ => Nat) n (fun _ ih => Nat.succ ih) m
  let add_val = lam(
    "n",
    nat(),
    lam("m", nat(), nat_rec(const_motive(nat()), bv(1), succ_step(), bv(0))),
  );
  let add_ty = arrow(nat(), arrow(nat(), nat()));
  add_defn(&mut env, "Nat.add", &[], add_ty, add_val);
  let double_val = lam("n", nat(), nat_add(bv(0), bv(0)));
  add_defn(&mut env, "Nat.double", &[], arrow(nat(), nat()), double_val);

  // idRhs.{u} (α : Sort u) (a : α) : α := a
  let id_rhs_ty = pi("α", Expr::sort(u()), pi("a", bv(0), bv(1)));
  let id_rhs_val = lam("α", Expr::sort(u()), lam("a", bv(0), bv(0)));
  add_defn(&mut env, "idRhs", &["u"], id_rhs_ty, id_rhs_val);
  let wrapped_val =
    lam("x", nat(), apps(cnst("idRhs", vec![one()]), [nat(), bv(0)]));
  add_defn(&mut env, "wrappedId", &[], arrow(nat(), nat()), wrapped_val);

  let bool_ctors = ["Bool.false", "Bool.true"];
  add_induct(&mut env, "Bool", &[], type0(), 0, 0, &bool_ctors);
  add_ctor(&mut env, "Bool.false", &[], cnst("Bool", vec![]), "Bool", 0, 0, 0);
  add_ctor(&mut env, "Bool.true", &[], cnst("Bool", vec![]), "Bool", 1, 0, 0);

  // List.{u} (α : Type u)
  let type_u = Expr::sort(Level::succ(u()));
  let list_u = |a: Expr| Expr::app(cnst("List", vec![u()]), a);
  add_induct(
    &mut env,
    "List",
    &["u"],
    arrow(type_u.clone(), type_u.clone()),
    1,
    0,
    &["List.nil", "List.cons"],
  );
  add_ctor(
    &mut env,
    "List.nil",
    &["u"],
    pi("α", type_u.clone(), list_u(bv(0))),
    "List",
    0,
    1,
    0,
  );
  let cons_ty = pi(
    "α",
    type_u,
    pi("head", bv(0), pi("tail", list_u(bv(1)), list_u(bv(2)))),
  );
  add_ctor(&mut env, "List.cons", &["u"], cons_ty, "List", 1, 1, 2);

  add_induct(&mut env, "Char", &[], type0(), 0, 0, &[]);
  let char_of_nat = arrow(nat(), cnst("Char", vec![]));
  add_defn(&mut env, "Char.ofNat", &[], char_of_nat, lam("n", nat(), bv(0)));
  add_induct(&mut env, "String", &[], type0(), 0, 0, &["String.mk"]);
  let string_mk = arrow(list_of(cnst("Char", vec![])), cnst("String", vec![]));
  add_ctor(&mut env, "String.mk", &[], string_mk, "String", 0, 0, 1);

  env
}

fn ctx_with(env: Env) -> BasicContext {
  let mut ctx = BasicContext::new(env);
  ctx.register_aux_recursor(mk("Nat.casesOn"));
  ctx.register_aux_recursor(mk("wrappedId"));
  ctx
}

pub fn nat_ctx() -> BasicContext {
  ctx_with(nat_env())
}

// ============================================================================
// Eq (a K-like recursor)
// ============================================================================

pub fn eq(ty: Expr, a: Expr, b: Expr) -> Expr {
  apps(cnst("Eq", vec![one()]), [ty, a, b])
}

pub fn eq_refl(ty: Expr, a: Expr) -> Expr {
  apps(cnst("Eq.refl", vec![one()]), [ty, a])
}

/// `@Eq.rec Nat a (fun b _ => Nat) refl_case b h`
pub fn eq_rec(a: Expr, refl_case: Expr, b: Expr, h: Expr) -> Expr {
  let motive = lam("b", nat(), lam("h", eq(nat(), a.clone(), bv(0)), nat()));
  let levels = vec![one(), one()];
  apps(cnst("Eq.rec", levels), [nat(), a, motive, refl_case, b, h])
}

pub fn eq_ctx() -> BasicContext {
  let mut env = nat_env();
  let u = || param("u");
  let u1 = || param("u_1");
  let eq_at = |l: Level, ty: Expr, a: Expr, b: Expr| {
    apps(cnst("Eq", vec![l]), [ty, a, b])
  };

  // Eq.{u} : {α : Sort u} → α → α → Prop
  let eq_ty =
    pi("α", Expr::sort(u()), pi("a", bv(0), pi("b", bv(1), prop())));
  add_induct(&mut env, "Eq", &["u"], eq_ty, 2, 1, &["Eq.refl"]);
  // Eq.refl.{u} : {α : Sort u} → (a : α) → Eq a a
  let refl_ty =
    pi("α", Expr::sort(u()), pi("a", bv(0), eq_at(u(), bv(1), bv(0), bv(0))));
  add_ctor(&mut env, "Eq.refl", &["u"], refl_ty, "Eq", 0, 2, 0);

  // Eq.rec.{u, u_1} : {α : Sort u_1} → {a : α} →
  //   {motive : (b : α) → Eq a b → Sort u} → motive a (Eq.refl a) →
  //   {b : α} → (t : Eq a b) → motive b t
  let sort_u = Expr::sort(u());
  let motive_b_t = apps(bv(3), [bv(1), bv(0)]);
  let refl_at = apps(cnst("Eq.refl", vec![u1()]), [bv(2), bv(1)]);
  let rec_ty = pi(
    "α",
    Expr::sort(u1()),
    pi(
      "a",
      bv(0),
      pi(
        "motive",
        pi("b", bv(1), pi("h", eq_at(u1(), bv(2), bv(1), bv(0)), sort_u)),
        pi(
          "refl",
          apps(bv(0), [bv(1), refl_at]),
          pi(
            "b",
            bv(3),
            pi("t", eq_at(u1(), bv(4), bv(3), bv(0)), motive_b_t),
          ),
        ),
      ),
    ),
  );
  let refl_rhs = lam(
    "α",
    nat(),
    lam("a", nat(), lam("motive", nat(), lam("refl", nat(), bv(0)))),
  );
  let rec = RecursorVal {
    cnst: cval("Eq.rec", &["u", "u_1"], rec_ty),
    all: vec![mk("Eq")],
    num_params: 2,
    num_indices: 1,
    num_motives: 1,
    num_minors: 1,
    rules: vec![rule("Eq.refl", 0, refl_rhs)],
    k: true,
    is_unsafe: false,
  };
  env.insert(mk("Eq.rec"), ConstantInfo::RecInfo(rec));
  ctx_with(env)
}

// ============================================================================
// Quotients
// ============================================================================

pub fn quot_type(alpha: Expr, r: Expr) -> Expr {
  apps(cnst("Quot", vec![one()]), [alpha, r])
}

pub fn quot_mk(alpha: Expr, r: Expr, a: Expr) -> Expr {
  apps(cnst("Quot.mk", vec![one()]), [alpha, r, a])
}

/// Universe arguments of `Quot.lift`: the quotient's and the target's.
pub fn lift_levels() -> Vec<Level> {
  vec![one(), one()]
}

pub fn quot_lift(
  alpha: Expr,
  r: Expr,
  beta: Expr,
  f: Expr,
  h: Expr,
  q: Expr,
) -> Expr {
  apps(cnst("Quot.lift", lift_levels()), [alpha, r, beta, f, h, q])
}

pub fn quot_ind(
  alpha: Expr,
  r: Expr,
  motive: Expr,
  case: Expr,
  q: Expr,
) -> Expr {
  apps(cnst("Quot.ind", vec![one()]), [alpha, r, motive, case, q])
}

pub fn quot_ctx() -> BasicContext {
  let mut env = eq_ctx().env;
  let u = || param("u");
  let v = || param("v");
  let quot_u = |a: Expr, r: Expr| apps(cnst("Quot", vec![u()]), [a, r]);
  // r : α → α → Prop, with α at index 0 just outside the binder
  let rel = || arrow(bv(0), arrow(bv(1), prop()));

  let quot_ty = pi("α", Expr::sort(u()), pi("r", rel(), Expr::sort(u())));
  add_quot(&mut env, "Quot", &["u"], quot_ty, QuotKind::Type);

  let mk_ty = pi(
    "α",
    Expr::sort(u()),
    pi("r", rel(), pi("a", bv(1), quot_u(bv(2), bv(1)))),
  );
  add_quot(&mut env, "Quot.mk", &["u"], mk_ty, QuotKind::Ctor);

  // Quot.lift.{u, v} {α} {r} {β : Sort v} (f : α → β)
  //   (h : ∀ a b, r a b → f a = f b) (q : Quot r) : β
  let sound = pi(
    "a",
    bv(3),
    pi(
      "b",
      bv(4),
      arrow(
        apps(bv(4), [bv(1), bv(0)]),
        apps(cnst("Eq", vec![v()]), [
          bv(4),
          Expr::app(bv(3), bv(2)),
          Expr::app(bv(3), bv(1)),
        ]),
      ),
    ),
  );
  let lift_ty = pi(
    "α",
    Expr::sort(u()),
    pi(
      "r",
      rel(),
      pi(
        "β",
        Expr::sort(v()),
        pi(
          "f",
          arrow(bv(2), bv(1)),
          pi("h", sound, pi("q", quot_u(bv(4), bv(3)), bv(3))),
        ),
      ),
    ),
  );
  add_quot(&mut env, "Quot.lift", &["u", "v"], lift_ty, QuotKind::Lift);

  // Quot.ind.{u} {α} {r} {β : Quot r → Prop}
  //   (mk : ∀ a, β (Quot.mk r a)) (q : Quot r) : β q
  let mk_u = |a: Expr, r: Expr, x: Expr| {
    apps(cnst("Quot.mk", vec![u()]), [a, r, x])
  };
  let ind_ty = pi(
    "α",
    Expr::sort(u()),
    pi(
      "r",
      rel(),
      pi(
        "β",
        arrow(quot_u(bv(1), bv(0)), prop()),
        pi(
          "mk",
          pi("a", bv(2), Expr::app(bv(1), mk_u(bv(3), bv(2), bv(0)))),
          pi("q", quot_u(bv(3), bv(2)), Expr::app(bv(2), bv(0))),
        ),
      ),
    ),
  );
  add_quot(&mut env, "Quot.ind", &["u"], ind_ty, QuotKind::Ind);
  ctx_with(env)
}

// ============================================================================
// Structures
// ============================================================================

pub fn pair() -> Expr {
  cnst("Pair", vec![])
}

pub fn mk_pair(a: Expr, b: Expr) -> Expr {
  apps(cnst("Pair.mk", vec![]), [a, b])
}

pub fn pair_fst() -> Expr {
  cnst("Pair.fst", vec![])
}

pub fn pair_snd() -> Expr {
  cnst("Pair.snd", vec![])
}

pub fn mk_fn_pair(f: Expr, g: Expr) -> Expr {
  apps(cnst("FnPair.mk", vec![]), [f, g])
}

pub fn fn_pair_fst() -> Expr {
  cnst("FnPair.fst", vec![])
}

/// A two-field structure over `field`, with registered projections.
fn add_structure(ctx: &mut BasicContext, name: &str, field: Expr) {
  let ty = cnst(name, vec![]);
  let ctor = format!("{name}.mk");
  add_induct(&mut ctx.env, name, &[], type0(), 0, 0, &[ctor.as_str()]);
  let ctor_ty = arrow(field.clone(), arrow(field.clone(), ty.clone()));
  add_ctor(&mut ctx.env, &ctor, &[], ctor_ty, name, 0, 0, 2);
  for (idx, proj) in ["fst", "snd"].into_iter().enumerate() {
    let proj_name = format!("{name}.{proj}");
    let field_of = Expr::proj(mk(name), idx as u64, bv(0));
    let value = lam("self", ty.clone(), field_of);
    let proj_ty = arrow(ty.clone(), field.clone());
    add_defn(&mut ctx.env, &proj_name, &[], proj_ty, value);
    let info = ProjectionFunctionInfo { num_params: 0, field_idx: idx };
    ctx.register_projection(mk(&proj_name), info);
  }
}

pub fn pair_ctx() -> BasicContext {
  let mut ctx = nat_ctx();
  add_structure(&mut ctx, "Pair", nat());
  add_structure(&mut ctx, "FnPair", arrow(nat(), nat()));
  ctx
}

// ============================================================================
// A nested inductive: Tree := node (List Tree)
// ============================================================================

pub fn tree() -> Expr {
  cnst("Tree", vec![])
}

/// `Tree.rec_1 (fun _ => Nat) (fun _ => Nat) 0 0 cons major`, eliminating
/// the nested `List Tree` occurrence.
pub fn tree_rec_1(cons: Expr, major: Expr) -> Expr {
  let m1 = lam("t", tree(), nat());
  let m2 = lam("ts", list_of(tree()), nat());
  apps(
    cnst("Tree.rec_1", vec![one()]),
    [m1, m2, nat_zero(), nat_zero(), cons, major],
  )
}

pub fn tree_ctx() -> BasicContext {
  let mut env = nat_env();
  let u = || param("u");
  let list_tree = || list_of(tree());

  add_induct(&mut env, "Tree", &[], type0(), 0, 0, &["Tree.node"]);
  let node_ty = arrow(list_tree(), tree());
  add_ctor(&mut env, "Tree.node", &[], node_ty, "Tree", 0, 0, 1);

  let nil_tree = Expr::app(cnst("List.nil", vec![Level::zero()]), tree());
  let rec_ty = pi(
    "motive_1",
    arrow(tree(), Expr::sort(u())),
    pi(
      "motive_2",
      arrow(list_tree(), Expr::sort(u())),
      pi(
        "node",
        pi(
          "c",
          list_tree(),
          arrow(
            Expr::app(bv(1), bv(0)),
            Expr::app(bv(3), Expr::app(cnst("Tree.node", vec![]), bv(1))),
          ),
        ),
        pi(
          "nil",
          Expr::app(bv(1), nil_tree),
          pi(
            "cons",
            pi(
              "head",
              tree(),
              pi(
                "tail",
                list_tree(),
                arrow(
                  Expr::app(bv(5), bv(1)),
                  arrow(
                    Expr::app(bv(5), bv(1)),
                    Expr::app(bv(6), list_cons(tree(), bv(3), bv(2))),
                  ),
                ),
              ),
            ),
            pi("t", list_tree(), Expr::app(bv(4), bv(0))),
          ),
        ),
      ),
    ),
  );
  let minors = |body: Expr| {
    ["motive_1", "motive_2", "node", "nil", "cons"]
      .into_iter()
      .rev()
      .fold(body, |acc, n| lam(n, nat(), acc))
  };
  let nil_rhs = minors(bv(1));
  let cons_case = apps(bv(2), [bv(1), bv(0)]);
  let cons_rhs = minors(lam("t", tree(), lam("ts", list_tree(), cons_case)));
  let rec = RecursorVal {
    cnst: cval("Tree.rec_1", &["u"], rec_ty),
    all: vec![mk("Tree")],
    num_params: 0,
    num_indices: 0,
    num_motives: 2,
    num_minors: 3,
    rules: vec![rule("List.nil", 0, nil_rhs), rule("List.cons", 2, cons_rhs)],
    k: false,
    is_unsafe: false,
  };
  env.insert(mk("Tree.rec_1"), ConstantInfo::RecInfo(rec));
  ctx_with(env)
}

// ============================================================================
// Helpers
// ============================================================================

/// Fresh locals by user-facing name.
pub trait LocalsExt {
  fn push_local(&self, name: &str, ty: Expr) -> Expr;
  fn push_let(&self, name: &str, ty: Expr, value: Expr) -> Expr;
}

impl LocalsExt for BasicContext {
  fn push_local(&self, name: &str, ty: Expr) -> Expr {
    self.mk_local(&mk(name), &ty)
  }

  fn push_let(&self, name: &str, ty: Expr, value: Expr) -> Expr {
    self.mk_let(&mk(name), &ty, &value)
  }
}

/// Beta-reduce the head of an application spine once.
pub fn head_beta(e: &Expr) -> Expr {
  let (f, args) = unfold_apps(e);
  beta(&f, &args)
}

/// Replace the universe arguments of the constant heading `e`.
pub fn with_head_levels(e: &Expr, levels: Vec<Level>) -> Expr {
  let (f, args) = unfold_apps(e);
  match f.as_data() {
    ExprData::Const(name, _, _) => apps(Expr::cnst(name.clone(), levels), args),
    _ => e.clone(),
  }
}

/// Peel `Nat.succ` layers off the full normal form of `e`, returning how
/// many there were and what remained.
pub fn count_succs(ctx: &BasicContext, e: &Expr) -> (usize, Expr) {
  let mut n = 0;
  let mut cursor = e.clone();
  loop {
    let e = ctx.whnf(&cursor).unwrap();
    let (head, mut args) = unfold_apps(&e);
    match args.pop() {
      Some(arg) if head == nat_succ() && args.is_empty() => {
        n += 1;
        cursor = arg;
      },
      _ => return (n, e),
    }
  }
}
