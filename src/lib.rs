//! quickdeliver: nearest-neighbour route planning for a parcel collection fleet.
//!
//! Builds one capacity-bounded route per vehicle over a shared pool of
//! collection points, and reports distance, time, cost, fuel and CO2.

pub mod config;
pub mod csv_io;
pub mod haversine;
pub mod metrics;
pub mod model;
pub mod osrm;
pub mod polyline;
pub mod report;
pub mod sample;
pub mod solver;
pub mod traffic;
pub mod traits;
