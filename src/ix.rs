//! Ix: Lean kernel terms and their reduction.
//!
//! This module contains the Lean type representation (`env`), arbitrary
//! precision naturals for literals (`nat`) and the weak-head normalizer
//! (`kernel`).

pub mod env;
pub mod kernel;
pub mod nat;
