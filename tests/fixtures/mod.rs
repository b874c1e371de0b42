//! Test fixtures for quickdeliver.
//!
//! Real Harare suburbs around the sample depot, plus small builders for
//! points and fleets.

pub mod harare_locations;

pub use harare_locations::*;
