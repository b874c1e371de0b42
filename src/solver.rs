//! Route builder: greedy nearest-neighbour construction with a capacity cutoff.
//!
//! Vehicles are dispatched in the order given. Each one starts at the depot and
//! keeps extending its route to the closest remaining point that still fits its
//! capacity, then returns to the depot. All vehicles draw from one shared pool,
//! so a point is served at most once. Whatever is left when the fleet runs out
//! is reported as unassigned together with the reason.

use jiff::civil::Time;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::haversine::{DEFAULT_SPEED_KMH, HaversineMatrix};
use crate::model::{Dataset, Point, Vehicle, minutes_of_day};
use crate::traits::{DistanceMatrixProvider, TimeWindowPolicy, UnassignedReason};

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Average speed used to turn kilometres into minutes.
    pub speed_kmh: f64,
    /// Whether time windows restrict which stops are eligible.
    pub time_windows: TimeWindowPolicy,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            time_windows: TimeWindowPolicy::Advisory,
        }
    }
}

/// One vehicle's tour: depot, collection points in visiting order, depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub vehicle_id: String,
    pub capacity: u32,
    pub points: Vec<Point>,
    /// Minutes after departure at which each entry of `points` is reached,
    /// including any waiting for a window to open.
    pub arrivals: Vec<f64>,
    /// Clock time the vehicle leaves the depot.
    pub departure: Time,
    pub total_parcels: u32,
    /// Kilometres.
    pub total_distance: f64,
    /// Travel minutes, waiting excluded.
    pub total_time: f64,
    pub total_cost: f64,
    /// Litres.
    pub fuel_used: f64,
}

impl Route {
    /// Number of collection points visited, depot excluded.
    pub fn stop_count(&self) -> usize {
        self.points.len().saturating_sub(2)
    }

    /// Collection points between the two depot visits.
    pub fn stops(&self) -> &[Point] {
        match self.points.len() {
            0..=2 => &[],
            n => &self.points[1..n - 1],
        }
    }

    pub fn is_depot_only(&self) -> bool {
        self.stop_count() == 0
    }

    /// Stops reached after their window closed.
    pub fn late_stops(&self) -> Vec<&Point> {
        let departure = minutes_of_day(self.departure);
        self.stops()
            .iter()
            .zip(self.arrivals.iter().skip(1))
            .filter(|(point, arrival)| departure + **arrival > point.window.end_minutes())
            .map(|(point, _)| point)
            .collect()
    }

    /// `Depot → A → B → Depot`
    pub fn sequence(&self) -> String {
        self.points
            .iter()
            .map(|point| point.name.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedPoint {
    pub point: Point,
    pub reason: UnassignedReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerResult {
    /// One route per vehicle, in fleet order.
    pub routes: Vec<Route>,
    /// Points no route serves, in input order.
    pub unassigned: Vec<UnassignedPoint>,
}

impl PlannerResult {
    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(Route::stop_count).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct RouteBuilder<M = HaversineMatrix> {
    matrix_provider: M,
    options: SolveOptions,
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self::new(SolveOptions::default())
    }
}

impl RouteBuilder {
    /// Great-circle distances at the configured speed.
    pub fn new(options: SolveOptions) -> Self {
        Self {
            matrix_provider: HaversineMatrix,
            options,
        }
    }
}

impl<M: DistanceMatrixProvider> RouteBuilder<M> {
    pub fn with_provider(matrix_provider: M, options: SolveOptions) -> Self {
        Self {
            matrix_provider,
            options,
        }
    }

    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    pub fn optimize_dataset(&self, dataset: &Dataset) -> PlannerResult {
        self.optimize(&dataset.depot, &dataset.points, &dataset.vehicles)
    }

    pub fn optimize(&self, depot: &Point, points: &[Point], vehicles: &[Vehicle]) -> PlannerResult {
        let locations: Vec<(f64, f64)> = std::iter::once(depot.location())
            .chain(points.iter().map(Point::location))
            .collect();
        let matrix = self.distance_matrix(&locations);

        let largest_capacity = vehicles.iter().map(|vehicle| vehicle.capacity).max();
        if let Some(largest) = largest_capacity {
            for point in points.iter().filter(|point| point.parcels > largest) {
                warn!(point = %point.name, parcels = point.parcels, largest, "point exceeds every vehicle's capacity");
            }
        }

        let departure = depot.window.start_minutes();
        let strict = self.options.time_windows == TimeWindowPolicy::Strict;

        // Indices into `points`, kept in input order for stable tie-breaking.
        let mut remaining: Vec<usize> = (0..points.len()).collect();
        // Strict windows: whether some vehicle found the point too late, and
        // whether some vehicle could have arrived in time.
        let mut window_late = vec![false; points.len()];
        let mut window_reachable = vec![false; points.len()];
        let mut routes = Vec::with_capacity(vehicles.len());

        for vehicle in vehicles {
            if remaining.is_empty() && !points.is_empty() {
                break;
            }
            if vehicle.capacity == 0 {
                warn!(vehicle = %vehicle.id, "vehicle has zero capacity and will serve nothing");
            }

            let mut route = Route {
                vehicle_id: vehicle.id.clone(),
                capacity: vehicle.capacity,
                points: vec![depot.clone()],
                arrivals: vec![0.0],
                departure: depot.window.start,
                total_parcels: 0,
                total_distance: 0.0,
                total_time: 0.0,
                total_cost: 0.0,
                fuel_used: 0.0,
            };
            // Matrix index of the last stop; 0 is the depot.
            let mut current = 0;
            let mut elapsed = 0.0;

            while !remaining.is_empty() && route.total_parcels < vehicle.capacity {
                let mut nearest: Option<(usize, f64)> = None;

                for (position, &index) in remaining.iter().enumerate() {
                    let point = &points[index];
                    if route.total_parcels.saturating_add(point.parcels) > vehicle.capacity {
                        continue;
                    }

                    let distance = matrix[current][index + 1];
                    if strict {
                        let arrival = departure + elapsed + self.minutes(distance);
                        if arrival > point.window.end_minutes() {
                            window_late[index] = true;
                            continue;
                        }
                        window_reachable[index] = true;
                    }

                    if nearest.is_none_or(|(_, best)| distance < best) {
                        nearest = Some((position, distance));
                    }
                }

                let Some((position, distance)) = nearest else {
                    break;
                };

                let index = remaining.remove(position);
                let point = &points[index];
                let minutes = self.minutes(distance);

                elapsed += minutes;
                if strict {
                    elapsed = elapsed.max(point.window.start_minutes() - departure);
                }

                route.points.push(point.clone());
                route.arrivals.push(elapsed);
                route.total_parcels += point.parcels;
                route.total_distance += distance;
                route.total_time += minutes;
                current = index + 1;

                debug!(
                    vehicle = %vehicle.id,
                    point = %point.name,
                    leg_km = distance,
                    load = route.total_parcels,
                    capacity = vehicle.capacity,
                    "stop appended"
                );
            }

            let return_distance = matrix[current][0];
            let return_minutes = self.minutes(return_distance);
            route.points.push(depot.clone());
            route.arrivals.push(elapsed + return_minutes);
            route.total_distance += return_distance;
            route.total_time += return_minutes;
            route.total_cost = route.total_distance * vehicle.cost_per_km;
            route.fuel_used = route.total_distance / vehicle.fuel_efficiency;

            routes.push(route);
        }

        let unassigned: Vec<UnassignedPoint> = remaining
            .into_iter()
            .map(|index| {
                let point = &points[index];
                let reason = if largest_capacity.is_some_and(|largest| point.parcels > largest) {
                    UnassignedReason::ExceedsFleetCapacity
                } else if window_late[index] && !window_reachable[index] {
                    UnassignedReason::NoFeasibleWindow
                } else {
                    UnassignedReason::FleetExhausted
                };
                UnassignedPoint {
                    point: point.clone(),
                    reason,
                }
            })
            .collect();

        let result = PlannerResult { routes, unassigned };
        info!(
            routes = result.routes.len(),
            assigned = result.assigned_count(),
            unassigned = result.unassigned.len(),
            total_km = result.routes.iter().map(|route| route.total_distance).sum::<f64>(),
            "routes built"
        );
        result
    }

    fn minutes(&self, km: f64) -> f64 {
        km / self.options.speed_kmh * 60.0
    }

    fn distance_matrix(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>> {
        let matrix = self.matrix_provider.matrix_for(locations);
        let n = locations.len();
        if matrix.len() == n && matrix.iter().all(|row| row.len() == n) {
            return matrix;
        }

        warn!(
            expected = n,
            rows = matrix.len(),
            "distance matrix has the wrong shape, using haversine distances"
        );
        HaversineMatrix.matrix_for(locations)
    }
}
