pub mod decimal_utils;

#[cfg(test)]
mod decimal_utils_tests;
