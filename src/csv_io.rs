//! CSV ingestion of points and vehicles, and CSV export of routes.
//!
//! Points: `name,lat,lon,parcels,time_start,time_end`, depot first.
//! Vehicles: `id,capacity,fuel_efficiency,cost_per_km`.
//! Routes: `Vehicle_ID,Stop_Number,Location,Latitude,Longitude,Parcels,Time_Window`.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CLOCK_FORMAT, Dataset, Point, TimeWindow, TimeWindowError, Vehicle};
use crate::solver::Route;

pub const POINTS_FILE: &str = "points.csv";
pub const VEHICLES_FILE: &str = "vehicles.csv";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: invalid time window {start:?}-{end:?}: {source}")]
    InvalidTimeWindow {
        row: usize,
        start: String,
        end: String,
        source: TimeWindowError,
    },

    #[error("row {row}: point {name:?}: {reason}")]
    InvalidPoint {
        row: usize,
        name: String,
        reason: &'static str,
    },

    #[error("row {row}: vehicle {id:?}: {reason}")]
    InvalidVehicle {
        row: usize,
        id: String,
        reason: &'static str,
    },

    #[error("points table is empty, its first row must be the depot")]
    MissingDepot,
}

#[derive(Debug, Serialize, Deserialize)]
struct PointRecord {
    name: String,
    lat: f64,
    lon: f64,
    parcels: u32,
    time_start: String,
    time_end: String,
}

#[derive(Debug, Serialize)]
struct StopRecord<'a> {
    #[serde(rename = "Vehicle_ID")]
    vehicle_id: &'a str,
    #[serde(rename = "Stop_Number")]
    stop_number: usize,
    #[serde(rename = "Location")]
    location: &'a str,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Parcels")]
    parcels: u32,
    #[serde(rename = "Time_Window")]
    time_window: String,
}

/// Data rows are numbered from 2; row 1 is the header.
fn data_row(index: usize) -> usize {
    index + 2
}

pub fn read_points<R: Read>(reader: R) -> Result<Vec<Point>, DataError> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<PointRecord>()
        .enumerate()
        .map(|(index, record)| -> Result<Point, DataError> {
            let record = record?;
            let window = TimeWindow::parse(&record.time_start, &record.time_end).map_err(|source| {
                DataError::InvalidTimeWindow {
                    row: data_row(index),
                    start: record.time_start.clone(),
                    end: record.time_end.clone(),
                    source,
                }
            })?;
            let point = Point::new(record.name, record.lat, record.lon, record.parcels, window);
            point.validate().map_err(|reason| DataError::InvalidPoint {
                row: data_row(index),
                name: point.name.clone(),
                reason,
            })?;
            Ok(point)
        })
        .collect()
}

pub fn read_vehicles<R: Read>(reader: R) -> Result<Vec<Vehicle>, DataError> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<Vehicle>()
        .enumerate()
        .map(|(index, vehicle)| -> Result<Vehicle, DataError> {
            let vehicle = vehicle?;
            vehicle.validate().map_err(|reason| DataError::InvalidVehicle {
                row: data_row(index),
                id: vehicle.id.clone(),
                reason,
            })?;
            Ok(vehicle)
        })
        .collect()
}

pub fn read_dataset<P: Read, V: Read>(points: P, vehicles: V) -> Result<Dataset, DataError> {
    let points = read_points(points)?;
    let vehicles = read_vehicles(vehicles)?;
    Dataset::from_points(points, vehicles).ok_or(DataError::MissingDepot)
}

pub fn load_dataset(points_path: &Path, vehicles_path: &Path) -> Result<Dataset, DataError> {
    read_dataset(File::open(points_path)?, File::open(vehicles_path)?)
}

pub fn write_points<'a, W: Write>(
    writer: W,
    points: impl IntoIterator<Item = &'a Point>,
) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in points {
        wtr.serialize(PointRecord {
            name: point.name.clone(),
            lat: point.lat,
            lon: point.lon,
            parcels: point.parcels,
            time_start: point.window.start.strftime(CLOCK_FORMAT).to_string(),
            time_end: point.window.end.strftime(CLOCK_FORMAT).to_string(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_vehicles<W: Write>(writer: W, vehicles: &[Vehicle]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for vehicle in vehicles {
        wtr.serialize(vehicle)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `points.csv` and `vehicles.csv` into `dir`, creating it if needed.
pub fn save_dataset(dataset: &Dataset, dir: &Path) -> Result<(), DataError> {
    fs::create_dir_all(dir)?;
    write_points(File::create(dir.join(POINTS_FILE))?, dataset.all_points())?;
    write_vehicles(File::create(dir.join(VEHICLES_FILE))?, &dataset.vehicles)?;
    Ok(())
}

/// One row per stop of every route, depot visits included, numbered from 0.
pub fn write_routes<W: Write>(writer: W, routes: &[Route]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for route in routes {
        for (stop_number, point) in route.points.iter().enumerate() {
            wtr.serialize(StopRecord {
                vehicle_id: &route.vehicle_id,
                stop_number,
                location: &point.name,
                latitude: point.lat,
                longitude: point.lon,
                parcels: point.parcels,
                time_window: point.window.label(),
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_routes(path: &Path, routes: &[Route]) -> Result<(), DataError> {
    write_routes(File::create(path)?, routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: &str = "\
name,lat,lon,parcels,time_start,time_end
Central Depot,-17.8252,31.0335,0,06:00,20:00
Avondale,-17.798,31.037,12,08:00,16:00
Borrowdale,-17.756,31.095,20,09:00,17:00
";

    const VEHICLES: &str = "\
id,capacity,fuel_efficiency,cost_per_km
V1,100,8.5,2.5
V2,80,9.2,2.0
";

    #[test]
    fn test_read_dataset() {
        let dataset = read_dataset(POINTS.as_bytes(), VEHICLES.as_bytes()).unwrap();
        assert_eq!(dataset.depot.name, "Central Depot");
        assert_eq!(dataset.points.len(), 2);
        assert_eq!(dataset.points[1].parcels, 20);
        assert_eq!(dataset.points[1].window.label(), "09:00-17:00");
        assert_eq!(dataset.vehicles[1], Vehicle::new("V2", 80, 9.2, 2.0));
    }

    #[test]
    fn test_bad_time_window_reports_row() {
        let points = "name,lat,lon,parcels,time_start,time_end\nDepot,0,0,0,06:00,20:00\nA,0,0,5,nine,17:00\n";
        let err = read_points(points.as_bytes()).unwrap_err();
        match err {
            DataError::InvalidTimeWindow { row, start, .. } => {
                assert_eq!(row, 3);
                assert_eq!(start, "nine");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reversed_time_window_reports_row() {
        let points = "name,lat,lon,parcels,time_start,time_end\nDepot,0,0,0,06:00,20:00\nA,0,0,5,17:00,08:00\n";
        let err = read_points(points.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidTimeWindow { row: 3, source: TimeWindowError::Reversed, .. }
        ));
        assert!(err.to_string().contains("closes before it opens"));
    }

    #[test]
    fn test_bad_coordinates_report_row() {
        let points = "name,lat,lon,parcels,time_start,time_end\nDepot,0,0,0,06:00,20:00\nFar,NaN,0,5,09:00,17:00\nNear,0.01,0,5,09:00,17:00\n";
        let err = read_points(points.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::InvalidPoint { row: 3, ref name, .. } if name == "Far"));

        let points = "name,lat,lon,parcels,time_start,time_end\nDepot,200,0,0,06:00,20:00\n";
        assert!(matches!(
            read_points(points.as_bytes()),
            Err(DataError::InvalidPoint { row: 2, .. })
        ));
    }

    #[test]
    fn test_bad_vehicle_reports_row() {
        let vehicles = "id,capacity,fuel_efficiency,cost_per_km\nV1,100,8.5,2.5\nV2,80,0,2.0\n";
        let err = read_vehicles(vehicles.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::InvalidVehicle { row: 3, ref id, .. } if id == "V2"));
        assert!(err.to_string().contains("fuel_efficiency"));
    }

    #[test]
    fn test_negative_parcels_is_a_csv_error() {
        let points = "name,lat,lon,parcels,time_start,time_end\nDepot,0,0,-1,06:00,20:00\n";
        assert!(matches!(read_points(points.as_bytes()), Err(DataError::Csv(_))));
    }

    #[test]
    fn test_missing_column_is_a_csv_error() {
        let vehicles = "id,capacity\nV1,100\n";
        assert!(matches!(read_vehicles(vehicles.as_bytes()), Err(DataError::Csv(_))));
    }

    #[test]
    fn test_empty_points_table_has_no_depot() {
        let points = "name,lat,lon,parcels,time_start,time_end\n";
        let err = read_dataset(points.as_bytes(), VEHICLES.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingDepot));
    }

    #[test]
    fn test_written_points_read_back() {
        let dataset = read_dataset(POINTS.as_bytes(), VEHICLES.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_points(&mut buf, dataset.all_points()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), POINTS);
    }
}
