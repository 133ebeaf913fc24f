//! Permanent-portfolio allocation: target tables, the rebalancing engine and
//! the advice renderer.

mod allocation_advice;
mod allocation_engine;
mod allocation_model;
mod allocation_targets;

pub use allocation_advice::*;
pub use allocation_engine::*;
pub use allocation_model::*;
pub use allocation_targets::*;



#[cfg(test)]
mod allocation_advice_tests;
