use crate::ix::env::{Expr, Name};

/// Errors that escape a reduction: references the capability context could
/// not resolve, and violated term invariants. Being stuck is not an error;
/// see [`Step`].
#[derive(Debug, thiserror::Error)]
pub enum ReduceError {
  #[error("unknown free variable: {name}")]
  UnknownLocal { name: Name },
  #[error("unknown constant: {name}")]
  UnknownConst { name: Name },
  #[error("unknown metavariable: {name}")]
  UnknownMVar { name: Name },
  #[error("loose bound variable at index {idx}")]
  LooseBoundVariable { idx: u64 },
  #[error("type expected")]
  TypeExpected { expr: Expr, inferred: Expr },
  #[error("function expected")]
  FunctionExpected { expr: Expr, inferred: Expr },
  #[error("{msg}")]
  KernelException { msg: String },
}

pub type ReduceResult<T> = Result<T, ReduceError>;

/// Why a reduction probe did not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepFailure {
  /// No computation rule applies to the current head.
  StructuralMismatch,
  /// Argument or universe-level counts disagree with the declaration.
  MalformedApplication,
}

/// Outcome of a single reduction probe.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Step {
  Reduced(Expr),
  Stuck(StepFailure),
}

impl Step {
  pub const MISMATCH: Step = Step::Stuck(StepFailure::StructuralMismatch);
  pub const MALFORMED: Step = Step::Stuck(StepFailure::MalformedApplication);

  pub fn reduced(self) -> Option<Expr> {
    match self {
      Step::Reduced(e) => Some(e),
      Step::Stuck(_) => None,
    }
  }

  pub fn failure(&self) -> Option<StepFailure> {
    match self {
      Step::Reduced(_) => None,
      Step::Stuck(f) => Some(*f),
    }
  }
}
