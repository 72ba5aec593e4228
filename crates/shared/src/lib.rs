pub mod domain;
pub mod error;
pub mod itinerary;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
