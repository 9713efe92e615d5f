#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod ix;

pub use ix::kernel::context::ReductionContext;
pub use ix::kernel::error::{ReduceError, ReduceResult, Step, StepFailure};
pub use ix::kernel::whnf::{WhnfCoreConfig, whnf_core, whnf_core_with};
