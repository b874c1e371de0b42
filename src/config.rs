//! Planner configuration and construction of the distance source.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::haversine::{DEFAULT_SPEED_KMH, HaversineMatrix};
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::solver::{RouteBuilder, SolveOptions};
use crate::traffic::{DEFAULT_MAX_FACTOR, DEFAULT_MIN_FACTOR, TrafficFactor};
use crate::traits::{DistanceMatrixProvider, TimeWindowPolicy};

pub const ENV_SPEED_KMH: &str = "QUICKDELIVER_SPEED_KMH";
pub const ENV_STRICT_WINDOWS: &str = "QUICKDELIVER_STRICT_WINDOWS";
pub const ENV_TRAFFIC_SEED: &str = "QUICKDELIVER_TRAFFIC_SEED";
pub const ENV_OSRM_URL: &str = "QUICKDELIVER_OSRM_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficConfig {
    pub seed: u64,
    pub min_factor: f64,
    pub max_factor: f64,
}

impl TrafficConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            min_factor: DEFAULT_MIN_FACTOR,
            max_factor: DEFAULT_MAX_FACTOR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub speed_kmh: f64,
    pub time_windows: TimeWindowPolicy,
    /// Seeded perturbation of leg distances. Off by default.
    pub traffic: Option<TrafficConfig>,
    /// Road distances from OSRM instead of great-circle distances.
    pub osrm: Option<OsrmConfig>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            time_windows: TimeWindowPolicy::Advisory,
            traffic: None,
            osrm: None,
        }
    }
}

impl PlannerConfig {
    /// Defaults overlaid with `QUICKDELIVER_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_vars(|key| env::var(key).ok())
    }

    /// Overlay values looked up through `var`. Unparseable values are ignored.
    pub fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(speed) = parse_var::<f64>(&var, ENV_SPEED_KMH) {
            if speed > 0.0 && speed.is_finite() {
                self.speed_kmh = speed;
            } else {
                warn!(key = ENV_SPEED_KMH, speed, "ignoring non-positive speed");
            }
        }
        if let Some(strict) = var(ENV_STRICT_WINDOWS) {
            match strict.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.time_windows = TimeWindowPolicy::Strict,
                "0" | "false" | "no" | "" => self.time_windows = TimeWindowPolicy::Advisory,
                other => warn!(key = ENV_STRICT_WINDOWS, value = other, "ignoring unrecognised flag"),
            }
        }
        if let Some(seed) = parse_var::<u64>(&var, ENV_TRAFFIC_SEED) {
            self.traffic = Some(TrafficConfig::seeded(seed));
        }
        if let Some(url) = var(ENV_OSRM_URL).filter(|url| !url.trim().is_empty()) {
            self.osrm = Some(OsrmConfig {
                base_url: url.trim().to_string(),
                ..OsrmConfig::default()
            });
        }
        self
    }

    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            speed_kmh: self.speed_kmh,
            time_windows: self.time_windows,
        }
    }

    /// Haversine or OSRM distances, optionally wrapped in simulated traffic.
    pub fn distance_provider(&self) -> Result<Box<dyn DistanceMatrixProvider>, reqwest::Error> {
        let base: Box<dyn DistanceMatrixProvider> = match &self.osrm {
            Some(osrm) => Box::new(OsrmClient::new(osrm.clone())?),
            None => Box::new(HaversineMatrix),
        };

        Ok(match &self.traffic {
            Some(traffic) => Box::new(
                TrafficFactor::new(base, traffic.seed).with_range(traffic.min_factor, traffic.max_factor),
            ),
            None => base,
        })
    }

    pub fn route_builder(&self) -> Result<RouteBuilder<Box<dyn DistanceMatrixProvider>>, reqwest::Error> {
        Ok(RouteBuilder::with_provider(self.distance_provider()?, self.solve_options()))
    }
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable environment value");
            None
        }
    }
}
