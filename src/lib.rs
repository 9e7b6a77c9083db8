//! Compiler core turning regular expressions into minimal deterministic
//! automata, by way of Thompson's construction or Brzozowski derivatives

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alphabet;
pub mod closure_builder;
pub mod dfa;
pub mod dot;
pub mod nfa;
pub mod re;
