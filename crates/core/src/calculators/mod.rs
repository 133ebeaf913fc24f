//! Stand-alone financial calculators: futures P&L, interest-rate conversion,
//! USDT round trips, cost averaging and the household volatility index.

mod cost_average_calculator;
mod futures_calculator;
mod interest_calculator;
mod usdt_calculator;
mod volatility_calculator;

pub use cost_average_calculator::*;
pub use futures_calculator::*;
pub use interest_calculator::*;
pub use usdt_calculator::*;
pub use volatility_calculator::*;

#[cfg(test)]
mod cost_average_calculator_tests;

#[cfg(test)]
mod futures_calculator_tests;

#[cfg(test)]
mod interest_calculator_tests;
