use std::{
  fmt,
  hash::{Hash, Hasher},
  sync::Arc,
};

use crate::ix::nat::Nat;
use rustc_hash::{FxHashMap, FxHasher};

// ============================================================================
// Names
// ============================================================================

#[derive(PartialEq, Eq, Debug, PartialOrd, Ord, Clone)]
pub struct Name(pub Arc<NameData>);

#[derive(PartialEq, Eq, Debug, PartialOrd, Ord)]
pub enum NameData {
  Anonymous,
  Str(Name, String, u64),
  Num(Name, Nat, u64),
}

impl Name {
  pub fn as_data(&self) -> &NameData {
    &self.0
  }

  pub fn get_hash(&self) -> u64 {
    match *self.0 {
      NameData::Anonymous => 0,
      NameData::Str(.., h) | NameData::Num(.., h) => h,
    }
  }

  pub fn anon() -> Self {
    Name(Arc::new(NameData::Anonymous))
  }

  pub fn str(pre: Name, s: String) -> Self {
    let hasher = &mut FxHasher::default();
    (7, pre.get_hash(), &s).hash(hasher);
    Name(Arc::new(NameData::Str(pre, s, hasher.finish())))
  }

  pub fn num(pre: Name, n: Nat) -> Name {
    let hasher = &mut FxHasher::default();
    (11, pre.get_hash(), &n).hash(hasher);
    Name(Arc::new(NameData::Num(pre, n, hasher.finish())))
  }

  /// Build a hierarchical name from dot-separated string components,
  /// e.g. `Name::from_dotted("Nat.succ")`.
  pub fn from_dotted(s: &str) -> Self {
    s.split('.').fold(Name::anon(), |pre, part| Name::str(pre, part.into()))
  }

  /// The prefix of this name, `Name::anon()` for the root.
  pub fn prefix(&self) -> Name {
    match self.as_data() {
      NameData::Anonymous => self.clone(),
      NameData::Str(pre, ..) | NameData::Num(pre, ..) => pre.clone(),
    }
  }

  pub fn pretty(&self) -> String {
    match self.as_data() {
      NameData::Anonymous => "[anonymous]".to_string(),
      NameData::Str(pre, s, _) => match pre.as_data() {
        NameData::Anonymous => s.clone(),
        _ => format!("{}.{}", pre.pretty(), s),
      },
      NameData::Num(pre, n, _) => match pre.as_data() {
        NameData::Anonymous => n.to_string(),
        _ => format!("{}.{}", pre.pretty(), n),
      },
    }
  }
}

impl Hash for Name {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.get_hash().hash(state);
  }
}

impl fmt::Display for Name {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.pretty())
  }
}

// ============================================================================
// Universe levels
// ============================================================================

#[derive(PartialEq, Eq, Debug, Hash, Clone)]
pub struct Level(pub Arc<LevelData>);

#[derive(Debug, PartialEq, Eq, Hash)]
pub enum LevelData {
  Zero,
  Succ(Level),
  Max(Level, Level),
  Imax(Level, Level),
  Param(Name),
  Mvar(Name),
}

impl Level {
  pub fn as_data(&self) -> &LevelData {
    &self.0
  }
  pub fn zero() -> Self {
    Level(Arc::new(LevelData::Zero))
  }
  pub fn succ(x: Level) -> Self {
    Level(Arc::new(LevelData::Succ(x)))
  }
  pub fn max(x: Level, y: Level) -> Self {
    Level(Arc::new(LevelData::Max(x, y)))
  }
  pub fn imax(x: Level, y: Level) -> Self {
    Level(Arc::new(LevelData::Imax(x, y)))
  }
  pub fn param(x: Name) -> Self {
    Level(Arc::new(LevelData::Param(x)))
  }
  pub fn mvar(x: Name) -> Self {
    Level(Arc::new(LevelData::Mvar(x)))
  }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Literal {
  NatVal(Nat),
  StrVal(String),
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum BinderInfo {
  Default,
  Implicit,
  StrictImplicit,
  InstImplicit,
}

/// Values carried by metadata annotations. Reduction never inspects them.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum DataValue {
  OfString(String),
  OfBool(bool),
  OfName(Name),
  OfNat(Nat),
}

/// An immutable, reference-counted kernel term. Every node caches a
/// structural hash in its last field.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Expr(pub Arc<ExprData>);

#[derive(Debug, PartialEq, Eq)]
pub enum ExprData {
  Bvar(u64, u64),
  Fvar(Name, u64),
  Mvar(Name, u64),
  Sort(Level, u64),
  Const(Name, Vec<Level>, u64),
  App(Expr, Expr, u64),
  Lam(Name, Expr, Expr, BinderInfo, u64),
  ForallE(Name, Expr, Expr, BinderInfo, u64),
  LetE(Name, Expr, Expr, Expr, bool, u64),
  Lit(Literal, u64),
  Mdata(Vec<(Name, DataValue)>, Expr, u64),
  Proj(Name, u64, Expr, u64),
}

fn hash_of<T: Hash>(tag: u8, x: T) -> u64 {
  let hasher = &mut FxHasher::default();
  (tag, x).hash(hasher);
  hasher.finish()
}

impl Expr {
  pub fn as_data(&self) -> &ExprData {
    &self.0
  }

  pub fn get_hash(&self) -> u64 {
    match self.as_data() {
      ExprData::Bvar(_, h)
      | ExprData::Fvar(_, h)
      | ExprData::Mvar(_, h)
      | ExprData::Sort(_, h)
      | ExprData::Const(.., h)
      | ExprData::App(.., h)
      | ExprData::Lam(.., h)
      | ExprData::ForallE(.., h)
      | ExprData::LetE(.., h)
      | ExprData::Lit(_, h)
      | ExprData::Mdata(.., h)
      | ExprData::Proj(.., h) => *h,
    }
  }

  pub fn bvar(idx: u64) -> Self {
    let h = hash_of(0, idx);
    Expr(Arc::new(ExprData::Bvar(idx, h)))
  }
  pub fn fvar(x: Name) -> Self {
    let h = hash_of(1, x.get_hash());
    Expr(Arc::new(ExprData::Fvar(x, h)))
  }
  pub fn mvar(x: Name) -> Self {
    let h = hash_of(2, x.get_hash());
    Expr(Arc::new(ExprData::Mvar(x, h)))
  }
  pub fn sort(x: Level) -> Self {
    let h = hash_of(3, &x);
    Expr(Arc::new(ExprData::Sort(x, h)))
  }
  pub fn cnst(x: Name, us: Vec<Level>) -> Self {
    let h = hash_of(4, (x.get_hash(), &us));
    Expr(Arc::new(ExprData::Const(x, us, h)))
  }
  pub fn app(f: Expr, a: Expr) -> Self {
    let h = hash_of(5, (f.get_hash(), a.get_hash()));
    Expr(Arc::new(ExprData::App(f, a, h)))
  }
  pub fn lam(n: Name, t: Expr, b: Expr, bi: BinderInfo) -> Self {
    let h = hash_of(6, (t.get_hash(), b.get_hash()));
    Expr(Arc::new(ExprData::Lam(n, t, b, bi, h)))
  }
  pub fn all(n: Name, t: Expr, b: Expr, bi: BinderInfo) -> Self {
    let h = hash_of(7, (t.get_hash(), b.get_hash()));
    Expr(Arc::new(ExprData::ForallE(n, t, b, bi, h)))
  }
  #[allow(non_snake_case)]
  pub fn letE(n: Name, t: Expr, v: Expr, b: Expr, nd: bool) -> Self {
    let h = hash_of(8, (t.get_hash(), v.get_hash(), b.get_hash()));
    Expr(Arc::new(ExprData::LetE(n, t, v, b, nd, h)))
  }
  pub fn lit(x: Literal) -> Self {
    let h = hash_of(9, &x);
    Expr(Arc::new(ExprData::Lit(x, h)))
  }
  pub fn mdata(kvs: Vec<(Name, DataValue)>, x: Expr) -> Self {
    let h = hash_of(10, x.get_hash());
    Expr(Arc::new(ExprData::Mdata(kvs, x, h)))
  }
  pub fn proj(n: Name, i: u64, x: Expr) -> Self {
    let h = hash_of(11, (n.get_hash(), i, x.get_hash()));
    Expr(Arc::new(ExprData::Proj(n, i, x, h)))
  }

  pub fn nat_lit(n: Nat) -> Self {
    Expr::lit(Literal::NatVal(n))
  }

  pub fn is_lambda(&self) -> bool {
    matches!(self.as_data(), ExprData::Lam(..))
  }

  /// The head of an application spine (the term itself if not an `App`).
  pub fn get_app_fn(&self) -> &Expr {
    let mut cursor = self;
    while let ExprData::App(f, _, _) = cursor.as_data() {
      cursor = f;
    }
    cursor
  }

  pub fn get_app_num_args(&self) -> usize {
    let mut n = 0;
    let mut cursor = self;
    while let ExprData::App(f, _, _) = cursor.as_data() {
      n += 1;
      cursor = f;
    }
    n
  }

  /// The constant name at the head of the spine, if any.
  pub fn const_name(&self) -> Option<&Name> {
    match self.get_app_fn().as_data() {
      ExprData::Const(name, _, _) => Some(name),
      _ => None,
    }
  }
}

impl Hash for Expr {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.get_hash().hash(state);
  }
}

// ============================================================================
// Constants
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducibilityHints {
  Opaque,
  Abbrev,
  Regular(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionSafety {
  Unsafe,
  Safe,
  Partial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantVal {
  pub name: Name,
  pub level_params: Vec<Name>,
  pub typ: Expr,
}

#[derive(Debug, Clone)]
pub struct AxiomVal {
  pub cnst: ConstantVal,
  pub is_unsafe: bool,
}

#[derive(Debug, Clone)]
pub struct DefinitionVal {
  pub cnst: ConstantVal,
  pub value: Expr,
  pub hints: ReducibilityHints,
  pub safety: DefinitionSafety,
  pub all: Vec<Name>,
}

#[derive(Debug, Clone)]
pub struct TheoremVal {
  pub cnst: ConstantVal,
  pub value: Expr,
  pub all: Vec<Name>,
}

#[derive(Debug, Clone)]
pub struct OpaqueVal {
  pub cnst: ConstantVal,
  pub value: Expr,
  pub is_unsafe: bool,
  pub all: Vec<Name>,
}

/// Which of the four quotient primitives a `QuotVal` declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotKind {
  Type,
  Ctor,
  Lift,
  Ind,
}

#[derive(Debug, Clone)]
pub struct QuotVal {
  pub cnst: ConstantVal,
  pub kind: QuotKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InductiveVal {
  pub cnst: ConstantVal,
  pub num_params: usize,
  pub num_indices: usize,
  pub all: Vec<Name>,
  pub ctors: Vec<Name>,
  pub num_nested: usize,
  pub is_rec: bool,
  pub is_unsafe: bool,
  pub is_reflexive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorVal {
  pub cnst: ConstantVal,
  pub induct: Name,
  pub cidx: usize,
  pub num_params: usize,
  pub num_fields: usize,
  pub is_unsafe: bool,
}

/// One computation rule of a recursor: `rhs` expects the recursor's
/// parameters, motives and minor premises followed by `n_fields` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursorRule {
  pub ctor: Name,
  pub n_fields: usize,
  pub rhs: Expr,
}

/// A recursor declaration. `k` marks recursors eligible for the
/// proof-irrelevance (K-like) shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursorVal {
  pub cnst: ConstantVal,
  pub all: Vec<Name>,
  pub num_params: usize,
  pub num_indices: usize,
  pub num_motives: usize,
  pub num_minors: usize,
  pub rules: Vec<RecursorRule>,
  pub k: bool,
  pub is_unsafe: bool,
}

impl RecursorVal {
  /// Position of the major premise in the recursor's argument spine.
  pub fn major_idx(&self) -> usize {
    self.num_params + self.num_motives + self.num_minors + self.num_indices
  }

  /// Number of leading arguments (params, motives, minors) every rule rhs
  /// receives before the constructor fields.
  pub fn prefix_len(&self) -> usize {
    self.num_params + self.num_motives + self.num_minors
  }

  /// The inductive type eliminated through the major premise: the head
  /// constant of the major premise's binder type, falling back to the first
  /// type of the mutual block when the type is not a plain telescope.
  pub fn major_induct(&self) -> Option<&Name> {
    let mut ty = &self.cnst.typ;
    for _ in 0..self.major_idx() {
      match ty.as_data() {
        ExprData::ForallE(_, _, body, _, _) => ty = body,
        _ => return self.all.first(),
      }
    }
    match ty.as_data() {
      ExprData::ForallE(_, dom, _, _, _) => {
        dom.const_name().or_else(|| self.all.first())
      },
      _ => self.all.first(),
    }
  }

  pub fn rule_for(&self, ctor: &Name) -> Option<&RecursorRule> {
    self.rules.iter().find(|r| r.ctor == *ctor)
  }
}

#[derive(Debug, Clone)]
pub enum ConstantInfo {
  AxiomInfo(AxiomVal),
  DefnInfo(DefinitionVal),
  ThmInfo(TheoremVal),
  OpaqueInfo(OpaqueVal),
  QuotInfo(QuotVal),
  InductInfo(InductiveVal),
  CtorInfo(ConstructorVal),
  RecInfo(RecursorVal),
}

impl ConstantInfo {
  pub fn cnst(&self) -> &ConstantVal {
    match self {
      ConstantInfo::AxiomInfo(v) => &v.cnst,
      ConstantInfo::DefnInfo(v) => &v.cnst,
      ConstantInfo::ThmInfo(v) => &v.cnst,
      ConstantInfo::OpaqueInfo(v) => &v.cnst,
      ConstantInfo::QuotInfo(v) => &v.cnst,
      ConstantInfo::InductInfo(v) => &v.cnst,
      ConstantInfo::CtorInfo(v) => &v.cnst,
      ConstantInfo::RecInfo(v) => &v.cnst,
    }
  }

  pub fn get_level_params(&self) -> &[Name] {
    &self.cnst().level_params
  }

  pub fn get_type(&self) -> &Expr {
    &self.cnst().typ
  }
}

/// Registry entry for a user-facing structure projection function:
/// `S.field : (params...) → (self : S params) → ...` extracts field
/// `field_idx` from its argument at position `num_params`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionFunctionInfo {
  pub num_params: usize,
  pub field_idx: usize,
}

// ============================================================================
// Local context
// ============================================================================

/// A free variable's declaration. `value` is set for let-bound locals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDecl {
  pub fvar_name: Name,
  pub user_name: Name,
  pub typ: Expr,
  pub value: Option<Expr>,
}

pub type Env = FxHashMap<Name, ConstantInfo>;
