//! Weak-head normalization for Lean kernel expressions.
//!
//! [`whnf::whnf_core`] drives the structural reductions (beta, zeta, iota,
//! quotients, projections) over any [`context::ReductionContext`]. Delta
//! unfolding and type inference belong to the context; [`basic`] provides a
//! self-contained one over a plain environment.

pub mod basic;
pub mod context;
pub mod easy;
pub mod error;
pub mod expr;
pub mod level;
pub mod lit;
pub mod proj;
pub mod quot;
pub mod recursor;
pub mod stuck;
pub mod whnf;

#[cfg(test)]
pub(crate) mod test_support;
