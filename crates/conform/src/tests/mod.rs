//! Test module for conform
//!
//! Unit tests for the combinators plus property-based tests (proptest)
//! for the aggregation, suspension and refinement guarantees.

#[cfg(test)]
pub mod support;


#[cfg(test)]
pub mod keyed_tests;
