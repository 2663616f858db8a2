//! Integration tests for the detection-to-countermeasure pipeline
//!
//! This test suite validates:
//! - End-to-end fusion, classification and response scenarios
//! - The GNSS-trust navigation law through the full pipeline
//! - Fault injection through the flight command channel and the link adapter
//! - Configuration-driven guards and fleet isolation

pub mod test_utils;

#[cfg(test)]
mod end_to_end_tests;

#[cfg(test)]
mod fault_injection_tests;

#[cfg(test)]
mod fleet_tests;
