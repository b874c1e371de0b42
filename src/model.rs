//! Collection points, vehicles and their time windows.
//!
//! These are the immutable inputs to the route builder. A data source (the
//! sample generator or the CSV loader) constructs them before optimisation.

use jiff::civil::{self, Time};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Clock format used for time windows in CSV files and reports.
pub const CLOCK_FORMAT: &str = "%H:%M";

#[derive(Debug, Error)]
pub enum TimeWindowError {
    #[error(transparent)]
    Parse(#[from] jiff::Error),

    #[error("window closes before it opens")]
    Reversed,
}

/// Availability window of a collection point.
///
/// Advisory unless the builder runs with strict windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Time,
    pub end: Time,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            start: civil::time(9, 0, 0, 0),
            end: civil::time(17, 0, 0, 0),
        }
    }
}

impl TimeWindow {
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Parse a window from two `HH:MM` strings. The end may not precede the start.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeWindowError> {
        let start = Time::strptime(CLOCK_FORMAT, start.trim())?;
        let end = Time::strptime(CLOCK_FORMAT, end.trim())?;
        if end < start {
            return Err(TimeWindowError::Reversed);
        }
        Ok(Self { start, end })
    }

    /// Window start in minutes after midnight.
    pub fn start_minutes(&self) -> f64 {
        minutes_of_day(self.start)
    }

    /// Window end in minutes after midnight.
    pub fn end_minutes(&self) -> f64 {
        minutes_of_day(self.end)
    }

    /// `HH:MM-HH:MM`, the form used by the route export.
    pub fn label(&self) -> String {
        format!(
            "{}-{}",
            self.start.strftime(CLOCK_FORMAT),
            self.end.strftime(CLOCK_FORMAT)
        )
    }
}

/// Minutes after midnight, seconds included.
pub(crate) fn minutes_of_day(time: Time) -> f64 {
    f64::from(time.hour()) * 60.0 + f64::from(time.minute()) + f64::from(time.second()) / 60.0
}

/// A collection point. The first point of a loaded data set is the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Parcel demand. Zero for the depot.
    pub parcels: u32,
    pub window: TimeWindow,
}

impl Point {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64, parcels: u32, window: TimeWindow) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            parcels,
            window,
        }
    }

    /// A zero-demand point, the usual shape of a depot.
    pub fn depot(name: impl Into<String>, lat: f64, lon: f64, window: TimeWindow) -> Self {
        Self::new(name, lat, lon, 0, window)
    }

    /// Location coordinates (lat, lon).
    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// Check the coordinates are finite and on the globe.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.lat.is_finite() || self.lat.abs() > 90.0 {
            return Err("lat must be a number between -90 and 90");
        }
        if !self.lon.is_finite() || self.lon.abs() > 180.0 {
            return Err("lon must be a number between -180 and 180");
        }
        Ok(())
    }
}

/// A delivery vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    /// Maximum parcels per route.
    pub capacity: u32,
    /// Kilometres per litre.
    pub fuel_efficiency: f64,
    /// Currency per kilometre.
    pub cost_per_km: f64,
}

impl Vehicle {
    pub fn new(id: impl Into<String>, capacity: u32, fuel_efficiency: f64, cost_per_km: f64) -> Self {
        Self {
            id: id.into(),
            capacity,
            fuel_efficiency,
            cost_per_km,
        }
    }

    /// Check the rate fields. Capacity may be zero; such a vehicle serves nothing.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.fuel_efficiency.is_finite() || self.fuel_efficiency <= 0.0 {
            return Err("fuel_efficiency must be a positive number");
        }
        if !self.cost_per_km.is_finite() || self.cost_per_km <= 0.0 {
            return Err("cost_per_km must be a positive number");
        }
        Ok(())
    }
}

/// Everything one optimisation run consumes: the depot, the remaining
/// collection points and the fleet in dispatch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub depot: Point,
    pub points: Vec<Point>,
    pub vehicles: Vec<Vehicle>,
}

impl Dataset {
    /// Split a point list whose first entry is the depot. `None` if empty.
    pub fn from_points(points: Vec<Point>, vehicles: Vec<Vehicle>) -> Option<Self> {
        let mut points = points.into_iter();
        let depot = points.next()?;
        Some(Self {
            depot,
            points: points.collect(),
            vehicles,
        })
    }

    /// Depot followed by the collection points, the order used in CSV files.
    pub fn all_points(&self) -> impl Iterator<Item = &Point> {
        std::iter::once(&self.depot).chain(self.points.iter())
    }
}
