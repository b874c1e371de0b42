//! Fleet totals, per-vehicle efficiency and the savings estimate.
//!
//! Everything here is derived from built routes by multiplying their totals
//! with constant factors.

use serde::{Deserialize, Serialize};

use crate::solver::Route;

/// Kilograms of CO2 emitted per litre of diesel burned.
pub const CO2_KG_PER_LITRE: f64 = 2.68;

/// Assumed cost of unplanned routes relative to the built ones.
pub const UNOPTIMIZED_COST_FACTOR: f64 = 1.35;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total_distance: f64,
    pub total_cost: f64,
    pub total_time: f64,
    pub total_fuel: f64,
    pub total_parcels: u32,
    pub total_stops: usize,
    pub co2_kg: f64,
}

impl FleetSummary {
    pub fn from_routes(routes: &[Route]) -> Self {
        let mut summary = routes.iter().fold(Self::default(), |mut acc, route| {
            acc.total_distance += route.total_distance;
            acc.total_cost += route.total_cost;
            acc.total_time += route.total_time;
            acc.total_fuel += route.fuel_used;
            acc.total_parcels += route.total_parcels;
            acc.total_stops += route.stop_count();
            acc
        });
        summary.co2_kg = summary.total_fuel * CO2_KG_PER_LITRE;
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleEfficiency {
    pub vehicle_id: String,
    /// Zero when the route carries no parcels.
    pub cost_per_parcel: f64,
    /// Zero when the route carries no parcels.
    pub distance_per_parcel: f64,
    /// Share of capacity used, 0.0 to 1.0. Zero for zero-capacity vehicles.
    pub utilization: f64,
}

impl VehicleEfficiency {
    pub fn for_route(route: &Route) -> Self {
        let parcels = f64::from(route.total_parcels);
        let per_parcel = |value: f64| if route.total_parcels > 0 { value / parcels } else { 0.0 };
        Self {
            vehicle_id: route.vehicle_id.clone(),
            cost_per_parcel: per_parcel(route.total_cost),
            distance_per_parcel: per_parcel(route.total_distance),
            utilization: if route.capacity > 0 {
                parcels / f64::from(route.capacity)
            } else {
                0.0
            },
        }
    }

    pub fn for_routes(routes: &[Route]) -> Vec<Self> {
        routes.iter().map(Self::for_route).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub baseline_cost: f64,
    pub optimized_cost: f64,
    pub savings: f64,
    /// Savings relative to the baseline, in percent.
    pub savings_percent: f64,
}

impl SavingsEstimate {
    pub fn from_cost(optimized_cost: f64) -> Self {
        let baseline_cost = optimized_cost * UNOPTIMIZED_COST_FACTOR;
        let savings = baseline_cost - optimized_cost;
        let savings_percent = if baseline_cost > 0.0 {
            savings / baseline_cost * 100.0
        } else {
            0.0
        };
        Self {
            baseline_cost,
            optimized_cost,
            savings,
            savings_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Point, TimeWindow};

    fn route(id: &str, capacity: u32, parcels: u32, distance: f64, cost: f64, fuel: f64) -> Route {
        let depot = Point::depot("Depot", 0.0, 0.0, TimeWindow::default());
        let stop = Point::new("A", 0.1, 0.0, parcels, TimeWindow::default());
        Route {
            vehicle_id: id.to_string(),
            capacity,
            points: vec![depot.clone(), stop, depot.clone()],
            arrivals: vec![0.0, 10.0, 20.0],
            departure: depot.window.start,
            total_parcels: parcels,
            total_distance: distance,
            total_time: distance * 1.5,
            total_cost: cost,
            fuel_used: fuel,
        }
    }

    #[test]
    fn test_summary_totals() {
        let routes = vec![route("V1", 100, 40, 20.0, 50.0, 2.0), route("V2", 80, 30, 10.0, 20.0, 1.0)];
        let summary = FleetSummary::from_routes(&routes);
        assert_eq!(summary.total_distance, 30.0);
        assert_eq!(summary.total_cost, 70.0);
        assert_eq!(summary.total_time, 45.0);
        assert_eq!(summary.total_parcels, 70);
        assert_eq!(summary.total_stops, 2);
        assert!((summary.co2_kg - 3.0 * CO2_KG_PER_LITRE).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(FleetSummary::from_routes(&[]), FleetSummary::default());
    }

    #[test]
    fn test_efficiency() {
        let efficiency = VehicleEfficiency::for_route(&route("V1", 100, 40, 20.0, 50.0, 2.0));
        assert_eq!(efficiency.cost_per_parcel, 1.25);
        assert_eq!(efficiency.distance_per_parcel, 0.5);
        assert_eq!(efficiency.utilization, 0.4);
    }

    #[test]
    fn test_efficiency_without_parcels() {
        let efficiency = VehicleEfficiency::for_route(&route("V0", 0, 0, 0.0, 0.0, 0.0));
        assert_eq!(efficiency.cost_per_parcel, 0.0);
        assert_eq!(efficiency.distance_per_parcel, 0.0);
        assert_eq!(efficiency.utilization, 0.0);
    }

    #[test]
    fn test_savings() {
        let savings = SavingsEstimate::from_cost(100.0);
        assert!((savings.baseline_cost - 135.0).abs() < 1e-9);
        assert!((savings.savings - 35.0).abs() < 1e-9);
        assert!((savings.savings_percent - 25.925925925925927).abs() < 1e-9);
    }

    #[test]
    fn test_savings_on_zero_cost() {
        let savings = SavingsEstimate::from_cost(0.0);
        assert_eq!(savings.savings, 0.0);
        assert_eq!(savings.savings_percent, 0.0);
    }
}
