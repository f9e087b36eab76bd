//! Output formatting for command results.
//!
//! Every command renders either human-readable text or pretty-printed JSON.
//! Renderers write to any [`Write`] so they can be exercised without a
//! terminal.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use trafficnet_lib::{
    Edge, IntersectionId, NetworkSummary, PathResult, RoadClosure, RoadLoad, RoutePlan,
    TrafficSignal, TravelTime, Vehicle, VehicleRoute,
};

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

/// One intersection and its outgoing roads.
#[derive(Debug, Serialize)]
pub struct IntersectionView<'a> {
    pub id: &'a str,
    pub roads: Vec<&'a Edge>,
}

#[derive(Debug, Serialize)]
pub struct NetworkView<'a> {
    pub summary: NetworkSummary,
    pub intersections: Vec<IntersectionView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PathsView<'a> {
    pub start: &'a str,
    pub goal: &'a str,
    pub paths: &'a [PathResult],
}

#[derive(Debug, Serialize)]
pub struct ReachableEntry<'a> {
    pub intersection: &'a str,
    pub route: &'a [IntersectionId],
}

#[derive(Debug, Serialize)]
pub struct ReachableView<'a> {
    pub start: &'a str,
    pub reachable: Vec<ReachableEntry<'a>>,
}

/// An emergency route and the intersections whose signals are switched to
/// green along it.
#[derive(Debug, Serialize)]
pub struct EmergencyView<'a> {
    #[serde(flatten)]
    pub plan: &'a RoutePlan,
    pub overridden_signals: Vec<&'a str>,
}

/// A newly added vehicle and the signals after green times were adjusted.
#[derive(Debug, Serialize)]
pub struct AddedVehicleView<'a> {
    pub vehicle: &'a Vehicle,
    pub signals: Vec<&'a TrafficSignal>,
}

/// Result of a road mutation.
#[derive(Debug, Serialize)]
pub struct RoadChange<'a> {
    pub action: &'static str,
    pub from: &'a str,
    pub to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time: Option<TravelTime>,
}

fn join_steps(steps: &[IntersectionId]) -> String {
    steps.join(" -> ")
}

pub fn render_network<W: Write>(
    out: &mut W,
    view: &NetworkView<'_>,
    palette: &ColorPalette,
) -> io::Result<()> {
    let summary = &view.summary;
    writeln!(
        out,
        "{}Road network:{} {} intersections, {} roads, {} blocked",
        palette.white_bold,
        palette.reset,
        summary.intersections,
        summary.roads,
        summary.closures
    )?;
    for intersection in &view.intersections {
        let roads: Vec<String> = intersection
            .roads
            .iter()
            .map(|edge| format!("({}, {})", edge.target, edge.travel_time))
            .collect();
        writeln!(out, "{} -> {}", intersection.id, roads.join(" "))?;
    }
    if summary.skipped_records > 0 {
        writeln!(
            out,
            "{}{} malformed records skipped{}",
            palette.yellow, summary.skipped_records, palette.reset
        )?;
    }
    Ok(())
}

pub fn render_route<W: Write>(
    out: &mut W,
    plan: &RoutePlan,
    palette: &ColorPalette,
) -> io::Result<()> {
    writeln!(
        out,
        "Route from {} to {} ({} hops; algorithm: {}):",
        plan.start,
        plan.goal,
        plan.hop_count(),
        plan.algorithm
    )?;
    writeln!(out, "{}{}{}", palette.white_bold, join_steps(&plan.steps), palette.reset)?;
    writeln!(out, "Total travel time: {}", plan.total_time)
}

pub fn render_emergency<W: Write>(
    out: &mut W,
    view: &EmergencyView<'_>,
    palette: &ColorPalette,
) -> io::Result<()> {
    writeln!(
        out,
        "{}Emergency route{} from {} to {} ({} hops):",
        palette.red,
        palette.reset,
        view.plan.start,
        view.plan.goal,
        view.plan.hop_count()
    )?;
    writeln!(out, "{}", join_steps(&view.plan.steps))?;
    writeln!(out, "Total travel time: {}", view.plan.total_time)?;
    writeln!(
        out,
        "{}Signals overridden:{} {}",
        palette.green,
        palette.reset,
        view.overridden_signals.join(", ")
    )
}

pub fn render_paths<W: Write>(out: &mut W, view: &PathsView<'_>) -> io::Result<()> {
    if view.paths.is_empty() {
        return writeln!(out, "No paths from {} to {}.", view.start, view.goal);
    }
    writeln!(
        out,
        "{} paths from {} to {}:",
        view.paths.len(),
        view.start,
        view.goal
    )?;
    for path in view.paths {
        writeln!(
            out,
            "{} | total travel time: {}",
            join_steps(&path.steps),
            path.total_time
        )?;
    }
    Ok(())
}

pub fn render_reachable<W: Write>(out: &mut W, view: &ReachableView<'_>) -> io::Result<()> {
    writeln!(out, "Reachable from {}:", view.start)?;
    for entry in &view.reachable {
        writeln!(out, "{}: {}", entry.intersection, join_steps(entry.route))?;
    }
    Ok(())
}

pub fn render_closures<W: Write>(
    out: &mut W,
    closures: &[&RoadClosure],
    palette: &ColorPalette,
) -> io::Result<()> {
    if closures.is_empty() {
        return writeln!(out, "No blocked roads.");
    }
    writeln!(out, "Blocked roads:")?;
    for closure in closures {
        writeln!(
            out,
            "{} to {} is {}blocked{}",
            closure.first, closure.second, palette.red, palette.reset
        )?;
    }
    Ok(())
}

pub fn render_signals<W: Write>(
    out: &mut W,
    signals: &[&TrafficSignal],
    palette: &ColorPalette,
) -> io::Result<()> {
    if signals.is_empty() {
        return writeln!(out, "No traffic signals.");
    }
    writeln!(out, "Intersections by density (high to low):")?;
    for signal in signals {
        let colour = if signal.density > 0 {
            palette.yellow
        } else {
            palette.gray
        };
        writeln!(
            out,
            "{}: green time {}, {}density {}{}",
            signal.intersection, signal.green_time, colour, signal.density, palette.reset
        )?;
    }
    Ok(())
}

pub fn render_vehicle_routes<W: Write>(
    out: &mut W,
    routes: &[VehicleRoute],
    palette: &ColorPalette,
) -> io::Result<()> {
    if routes.is_empty() {
        return writeln!(out, "No vehicles.");
    }
    for entry in routes {
        let vehicle = &entry.vehicle;
        match &entry.route {
            Some(route) => writeln!(
                out,
                "{}: {} -> {} | route: {} ({})",
                vehicle.id,
                vehicle.start,
                vehicle.end,
                join_steps(&route.steps),
                route.total_time
            )?,
            None => writeln!(
                out,
                "{}: {} -> {} | {}no route{}",
                vehicle.id, vehicle.start, vehicle.end, palette.red, palette.reset
            )?,
        }
    }
    Ok(())
}

pub fn render_added_vehicle<W: Write>(
    out: &mut W,
    view: &AddedVehicleView<'_>,
    palette: &ColorPalette,
) -> io::Result<()> {
    writeln!(
        out,
        "Vehicle {} added: {} -> {}.",
        view.vehicle.id, view.vehicle.start, view.vehicle.end
    )?;
    render_signals(out, &view.signals, palette)
}

pub fn render_congestion<W: Write>(
    out: &mut W,
    loads: &[RoadLoad],
    palette: &ColorPalette,
) -> io::Result<()> {
    if loads.is_empty() {
        return writeln!(out, "No vehicles on the road network.");
    }
    writeln!(out, "Vehicles per road:")?;
    for load in loads {
        let noun = if load.vehicles == 1 { "vehicle" } else { "vehicles" };
        if load.congested {
            writeln!(
                out,
                "{} <-> {}: {} {} {}(congested){}",
                load.first, load.second, load.vehicles, noun, palette.red, palette.reset
            )?;
        } else {
            writeln!(
                out,
                "{} <-> {}: {} {}",
                load.first, load.second, load.vehicles, noun
            )?;
        }
    }
    if !loads.iter().any(|load| load.congested) {
        writeln!(out, "No congested roads detected.")?;
    }
    Ok(())
}

pub fn render_road_change<W: Write>(out: &mut W, change: &RoadChange<'_>) -> io::Result<()> {
    match (change.action, change.travel_time) {
        ("add-road", Some(travel_time)) => writeln!(
            out,
            "Road {} <-> {} added (travel time {}).",
            change.from, change.to, travel_time
        ),
        ("remove-road", _) => writeln!(out, "Road {} <-> {} removed.", change.from, change.to),
        _ => writeln!(out, "Road {} to {} is now blocked.", change.from, change.to),
    }
}
