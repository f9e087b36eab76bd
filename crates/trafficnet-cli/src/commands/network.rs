//! Network and closure listings.

use anyhow::Result;

use trafficnet_cli::output::{render_closures, render_network, IntersectionView, NetworkView};

use super::CommandContext;

pub fn handle_network(ctx: &CommandContext) -> Result<()> {
    let network = ctx.open_network()?;
    let view = NetworkView {
        summary: network.summary(),
        intersections: network
            .adjacency()
            .into_iter()
            .map(|(id, roads)| IntersectionView { id, roads })
            .collect(),
    };
    ctx.emit(&view, |out, palette| render_network(out, &view, palette))
}

pub fn handle_closures(ctx: &CommandContext) -> Result<()> {
    let network = ctx.open_network()?;
    let blocked = network.blocked_roads();
    ctx.emit(&blocked, |out, palette| render_closures(out, &blocked, palette))
}
