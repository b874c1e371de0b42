//! Harare suburbs for realistic test fixtures.
//!
//! Coordinates are approximate suburb centres, all within the area the
//! sample generator covers around the central depot.

use quickdeliver::model::{Point, TimeWindow, Vehicle};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    pub fn point(&self, parcels: u32) -> Point {
        Point::new(self.name, self.lat, self.lon, parcels, TimeWindow::default())
    }
}

pub const DEPOT: Location = Location::new("Central Depot", -17.8252, 31.0335);

pub const SUBURBS: &[Location] = &[
    Location::new("Avondale", -17.7986, 31.0375),
    Location::new("Borrowdale", -17.7560, 31.0960),
    Location::new("Mbare", -17.8560, 31.0380),
    Location::new("Highfield", -17.8900, 30.9980),
    Location::new("Belvedere", -17.8290, 31.0160),
    Location::new("Mount Pleasant", -17.7720, 31.0480),
    Location::new("Eastlea", -17.8300, 31.0700),
    Location::new("Msasa", -17.8420, 31.1180),
    Location::new("Greendale", -17.8150, 31.1200),
    Location::new("Waterfalls", -17.8850, 31.0300),
    Location::new("Marlborough", -17.7600, 30.9980),
    Location::new("Hatfield", -17.8580, 31.0900),
];

pub fn depot() -> Point {
    let window = TimeWindow::parse("06:00", "20:00").expect("valid depot window");
    Point::depot(DEPOT.name, DEPOT.lat, DEPOT.lon, window)
}

/// Every suburb with a demand cycling through 5..=30.
pub fn suburb_points() -> Vec<Point> {
    SUBURBS
        .iter()
        .enumerate()
        .map(|(i, location)| location.point(5 + (i as u32 * 7) % 26))
        .collect()
}

pub fn fleet() -> Vec<Vehicle> {
    vec![
        Vehicle::new("V1", 100, 8.5, 2.5),
        Vehicle::new("V2", 80, 9.2, 2.0),
        Vehicle::new("V3", 120, 7.8, 3.0),
    ]
}
