//! Terminal and JSON rendering of a built plan.

use std::fmt::Write as _;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;

use crate::metrics::{FleetSummary, SavingsEstimate, VehicleEfficiency};
use crate::polyline::Polyline;
use crate::solver::{PlannerResult, Route};
use crate::traits::UnassignedReason;

/// A plan with every figure derived from it, ready for output.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub plan: PlannerResult,
    pub summary: FleetSummary,
    pub efficiency: Vec<VehicleEfficiency>,
    pub savings: SavingsEstimate,
    /// Map geometry per route, in route order.
    pub geometry: Vec<Polyline>,
}

impl PlanReport {
    pub fn new(plan: PlannerResult) -> Self {
        let summary = FleetSummary::from_routes(&plan.routes);
        let efficiency = VehicleEfficiency::for_routes(&plan.routes);
        let savings = SavingsEstimate::from_cost(summary.total_cost);
        let geometry = plan.routes.iter().map(Polyline::from_route).collect();
        Self {
            plan,
            summary,
            efficiency,
            savings,
            geometry,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// All tables and route sequences as one printable block.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Routes\n{}", routes_table(&self.plan.routes));

        for route in self.plan.routes.iter().filter(|route| !route.is_depot_only()) {
            let _ = writeln!(out, "{}: {}", route.vehicle_id, route.sequence());
            let late = route.late_stops();
            if !late.is_empty() {
                let names: Vec<&str> = late.iter().map(|point| point.name.as_str()).collect();
                let _ = writeln!(out, "  arrives after window: {}", names.join(", "));
            }
        }

        let _ = writeln!(out, "\nEfficiency\n{}", efficiency_table(&self.efficiency));
        let _ = writeln!(out, "\nTotals\n{}", summary_table(&self.summary, &self.savings));

        if !self.plan.unassigned.is_empty() {
            let _ = writeln!(out, "\nUnassigned\n{}", unassigned_table(&self.plan));
        }
        out
    }
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn routes_table(routes: &[Route]) -> Table {
    let mut table = table(vec!["Vehicle", "Stops", "Parcels", "Distance (km)", "Time (min)", "Cost ($)", "Fuel (L)"]);
    for route in routes {
        table.add_row(vec![
            route.vehicle_id.clone(),
            route.stop_count().to_string(),
            format!("{}/{}", route.total_parcels, route.capacity),
            format!("{:.2}", route.total_distance),
            format!("{:.1}", route.total_time),
            format!("{:.2}", route.total_cost),
            format!("{:.2}", route.fuel_used),
        ]);
    }
    table
}

pub fn efficiency_table(efficiency: &[VehicleEfficiency]) -> Table {
    let mut table = table(vec!["Vehicle", "Cost per parcel", "Distance per parcel", "Utilization"]);
    for row in efficiency {
        table.add_row(vec![
            row.vehicle_id.clone(),
            format!("{:.2}", row.cost_per_parcel),
            format!("{:.2}", row.distance_per_parcel),
            format!("{:.0}%", row.utilization * 100.0),
        ]);
    }
    table
}

pub fn summary_table(summary: &FleetSummary, savings: &SavingsEstimate) -> Table {
    let mut table = table(vec!["Metric", "Value"]);
    let rows = [
        ("Total distance", format!("{:.2} km", summary.total_distance)),
        ("Total cost", format!("${:.2}", summary.total_cost)),
        ("Total time", format!("{:.1} min", summary.total_time)),
        ("Fuel used", format!("{:.2} L", summary.total_fuel)),
        ("CO2 emitted", format!("{:.2} kg", summary.co2_kg)),
        ("Parcels collected", summary.total_parcels.to_string()),
        ("Before optimization", format!("${:.2}", savings.baseline_cost)),
        ("Savings", format!("${:.2} ({:.1}%)", savings.savings, savings.savings_percent)),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    table
}

pub fn unassigned_table(plan: &PlannerResult) -> Table {
    let mut table = table(vec!["Location", "Parcels", "Reason"]);
    for unassigned in &plan.unassigned {
        table.add_row(vec![
            unassigned.point.name.clone(),
            unassigned.point.parcels.to_string(),
            reason_label(unassigned.reason).to_string(),
        ]);
    }
    table
}

pub fn reason_label(reason: UnassignedReason) -> &'static str {
    match reason {
        UnassignedReason::ExceedsFleetCapacity => "larger than any vehicle",
        UnassignedReason::FleetExhausted => "no vehicle capacity left",
        UnassignedReason::NoFeasibleWindow => "time window unreachable",
    }
}
