//! Route queries: single routes, emergency routes, path enumeration and
//! reachability.

use anyhow::Result;
use tracing::info;

use trafficnet_cli::output::{
    render_emergency, render_paths, render_reachable, render_route, EmergencyView, PathsView,
    ReachableEntry, ReachableView,
};
use trafficnet_lib::{plan_route, RouteAlgorithm, RouteRequest};

use super::CommandContext;

pub fn handle_route(
    ctx: &CommandContext,
    from: &str,
    to: &str,
    algorithm: RouteAlgorithm,
) -> Result<()> {
    let network = ctx.open_network()?;
    let plan = plan_route(&network, &RouteRequest::new(from, to, algorithm))?;
    ctx.emit(&plan, |out, palette| render_route(out, &plan, palette))
}

/// Route an emergency vehicle with A* and override the signal at every
/// intersection on the route.
pub fn handle_emergency(ctx: &CommandContext, from: &str, to: &str) -> Result<()> {
    let network = ctx.open_network()?;
    let plan = plan_route(&network, &RouteRequest::a_star(from, to))?;
    let overridden_signals: Vec<&str> = plan.steps.iter().map(String::as_str).collect();
    info!(
        signals = overridden_signals.len(),
        "signals overridden for emergency vehicle"
    );

    let view = EmergencyView {
        plan: &plan,
        overridden_signals,
    };
    ctx.emit(&view, |out, palette| render_emergency(out, &view, palette))
}

pub fn handle_all_paths(
    ctx: &CommandContext,
    from: &str,
    to: &str,
    limit: Option<usize>,
) -> Result<()> {
    let network = ctx.open_network()?;
    let limit = limit.unwrap_or(network.limits().max_paths);
    let paths = network.all_paths_limited(from, to, limit)?;
    let view = PathsView {
        start: from.trim(),
        goal: to.trim(),
        paths: &paths,
    };
    ctx.emit(&view, |out, _| render_paths(out, &view))
}

pub fn handle_reachable(ctx: &CommandContext, from: &str) -> Result<()> {
    let network = ctx.open_network()?;
    let reachable = network.reachable_from(from)?;
    let view = ReachableView {
        start: from.trim(),
        reachable: reachable
            .iter()
            .map(|(intersection, route)| ReachableEntry {
                intersection,
                route,
            })
            .collect(),
    };
    ctx.emit(&view, |out, _| render_reachable(out, &view))
}
