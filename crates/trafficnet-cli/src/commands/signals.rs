//! Traffic signal and vehicle reports.

use anyhow::Result;

use trafficnet_cli::output::{
    render_added_vehicle, render_congestion, render_signals, render_vehicle_routes,
    AddedVehicleView,
};
use trafficnet_lib::TravelTime;

use super::CommandContext;

/// Recount densities from the vehicle file, shorten green times by
/// `density * factor`, and list signals busiest first.
pub fn handle_signals(ctx: &CommandContext, factor: TravelTime) -> Result<()> {
    let mut network = ctx.open_network()?;
    let vehicles = ctx.load_vehicles()?;
    let signals = network.signals_mut();
    signals.apply_vehicle_density(&vehicles);
    signals.adjust_green_times(factor);

    let ordered = network.signals().by_density();
    ctx.emit(&ordered, |out, palette| render_signals(out, &ordered, palette))
}

pub fn handle_vehicles(ctx: &CommandContext) -> Result<()> {
    let network = ctx.open_network()?;
    let vehicles = ctx.load_vehicles()?;
    let routes = network.vehicle_routes(&vehicles);
    ctx.emit(&routes, |out, palette| {
        render_vehicle_routes(out, &routes, palette)
    })
}

/// Append a vehicle to the vehicle file, then recount densities and adjust
/// green times the same way `signals` does.
pub fn handle_add_vehicle(
    ctx: &CommandContext,
    id: &str,
    from: &str,
    to: &str,
    factor: TravelTime,
) -> Result<()> {
    let mut network = ctx.open_network()?;
    let mut vehicles = ctx.load_vehicles()?;
    let vehicle = network.add_vehicle(&mut vehicles, id, from, to)?;

    let signals = network.signals_mut();
    signals.apply_vehicle_density(&vehicles);
    signals.adjust_green_times(factor);

    let view = AddedVehicleView {
        vehicle: &vehicle,
        signals: network.signals().by_density(),
    };
    ctx.emit(&view, |out, palette| render_added_vehicle(out, &view, palette))
}

pub fn handle_congestion(ctx: &CommandContext) -> Result<()> {
    let network = ctx.open_network()?;
    let vehicles = ctx.load_vehicles()?;
    let loads = network.congestion(&vehicles);
    ctx.emit(&loads, |out, palette| render_congestion(out, &loads, palette))
}
