//! Road mutations. Each one is written back to the data directory before
//! the command reports success.

use anyhow::Result;

use trafficnet_cli::output::{render_road_change, RoadChange};

use super::CommandContext;

pub fn handle_add_road(ctx: &CommandContext, from: &str, to: &str, travel_time: i64) -> Result<()> {
    let mut network = ctx.open_network()?;
    network.add_road(from, to, travel_time)?;
    let change = RoadChange {
        action: "add-road",
        from: from.trim(),
        to: to.trim(),
        travel_time: Some(travel_time.unsigned_abs()),
    };
    ctx.emit(&change, |out, _| render_road_change(out, &change))
}

pub fn handle_remove_road(ctx: &CommandContext, from: &str, to: &str) -> Result<()> {
    let mut network = ctx.open_network()?;
    network.remove_road(from, to)?;
    let change = RoadChange {
        action: "remove-road",
        from: from.trim(),
        to: to.trim(),
        travel_time: None,
    };
    ctx.emit(&change, |out, _| render_road_change(out, &change))
}

pub fn handle_block_road(ctx: &CommandContext, from: &str, to: &str) -> Result<()> {
    let mut network = ctx.open_network()?;
    network.block_road(from, to)?;
    let change = RoadChange {
        action: "block-road",
        from: from.trim(),
        to: to.trim(),
        travel_time: None,
    };
    ctx.emit(&change, |out, _| render_road_change(out, &change))
}
