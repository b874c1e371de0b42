//! Synthetic data set around a central depot.

use jiff::civil;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::model::{Dataset, Point, TimeWindow, Vehicle};

pub const DEPOT_NAME: &str = "Central Depot";
pub const DEPOT_LOCATION: (f64, f64) = (-17.8252, 31.0335);
pub const DEFAULT_POINT_COUNT: usize = 15;

/// Maximum latitude/longitude offset of a generated point from the depot.
const JITTER_DEGREES: f64 = 0.1;

/// The fixed demonstration fleet.
pub fn sample_fleet() -> Vec<Vehicle> {
    vec![
        Vehicle::new("V1", 100, 8.5, 2.5),
        Vehicle::new("V2", 80, 9.2, 2.0),
        Vehicle::new("V3", 120, 7.8, 3.0),
    ]
}

/// A depot plus `count` collection points and the sample fleet.
///
/// Points get 5 to 30 parcels and a window opening between 08:00 and 10:00
/// and closing between 16:00 and 18:00, on the hour.
pub fn generate_sample(count: usize, seed: u64) -> Dataset {
    let mut rng = SmallRng::seed_from_u64(seed);
    let (depot_lat, depot_lon) = DEPOT_LOCATION;

    let depot = Point::depot(
        DEPOT_NAME,
        depot_lat,
        depot_lon,
        TimeWindow::new(civil::time(6, 0, 0, 0), civil::time(20, 0, 0, 0)),
    );

    let points = (1..=count)
        .map(|i| {
            let lat = depot_lat + rng.random_range(-JITTER_DEGREES..=JITTER_DEGREES);
            let lon = depot_lon + rng.random_range(-JITTER_DEGREES..=JITTER_DEGREES);
            let parcels = rng.random_range(5..=30);
            let opens = rng.random_range(8..=10);
            let closes = rng.random_range(16..=18);
            Point::new(
                format!("Collection Point {}", i),
                lat,
                lon,
                parcels,
                TimeWindow::new(civil::time(opens, 0, 0, 0), civil::time(closes, 0, 0, 0)),
            )
        })
        .collect();

    Dataset {
        depot,
        points,
        vehicles: sample_fleet(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_data() {
        assert_eq!(generate_sample(15, 11), generate_sample(15, 11));
        assert_ne!(generate_sample(15, 11), generate_sample(15, 12));
    }

    #[test]
    fn test_ranges() {
        let dataset = generate_sample(200, 5);
        assert_eq!(dataset.points.len(), 200);
        assert_eq!(dataset.depot.parcels, 0);
        assert_eq!(dataset.depot.window.label(), "06:00-20:00");

        for (i, point) in dataset.points.iter().enumerate() {
            assert_eq!(point.name, format!("Collection Point {}", i + 1));
            assert!((point.lat - DEPOT_LOCATION.0).abs() <= JITTER_DEGREES + 1e-12);
            assert!((point.lon - DEPOT_LOCATION.1).abs() <= JITTER_DEGREES + 1e-12);
            assert!((5..=30).contains(&point.parcels));
            assert!((8..=10).contains(&point.window.start.hour()));
            assert!((16..=18).contains(&point.window.end.hour()));
            assert_eq!(point.window.start.minute(), 0);
        }
    }

    #[test]
    fn test_fleet() {
        let fleet = sample_fleet();
        let ids: Vec<&str> = fleet.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["V1", "V2", "V3"]);
        assert_eq!(fleet.iter().map(|v| v.capacity).sum::<u32>(), 300);
        assert!(fleet.iter().all(|v| v.validate().is_ok()));
    }

    #[test]
    fn test_zero_points() {
        let dataset = generate_sample(0, 1);
        assert!(dataset.points.is_empty());
        assert_eq!(dataset.vehicles.len(), 3);
    }
}
