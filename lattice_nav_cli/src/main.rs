// lattice-nav: run scripted path queries against a lattice from the shell.
//
// Usage:
//   lattice-nav --scenario scenario.json [--config nav.json] [--print-events]
//
// The config file is a `NavConfig` in JSON (missing fields take defaults;
// no file means `NavConfig::default()`). The scenario file has two lists,
// both optional:
//
//   {
//     "commands": [ { "SetWalkable": { "coord": { "d": 1, "w": 0, "h": 1 },
//                                      "walkable": false } }, "ReloadGrid" ],
//     "queries":  [ { "origin": { "x": 0, "y": 0, "z": 0 },
//                     "target": { "x": 0, "y": 2, "z": 2 } } ]
//   }
//
// Commands are applied in order, then each query prints one line: the node
// route with its length and cost, or the reason no route exists. Config,
// scenario, and command errors exit with status 1. A query without a route
// is an ordinary outcome and does not change the exit status.

use clap::Parser;
use lattice_nav_core::{LatticeNavigator, NavCommand, NavConfig, NavResult, PathResult, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "lattice-nav")]
#[command(about = "Run path queries on a 3D navigation lattice")]
struct Args {
    /// Navigation config (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenario file (JSON) with `commands` and `queries` lists.
    #[arg(long)]
    scenario: PathBuf,

    /// Print emitted navigation events as JSON lines.
    #[arg(long)]
    print_events: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Scenario {
    commands: Vec<NavCommand>,
    queries: Vec<Query>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Query {
    origin: Vec3,
    target: Vec3,
}

fn parse_scenario(json: &str) -> NavResult<Scenario> {
    Ok(serde_json::from_str(json)?)
}

fn load_scenario(path: &Path) -> NavResult<Scenario> {
    let text = std::fs::read_to_string(path)?;
    parse_scenario(&text)
}

fn describe_route(nav: &LatticeNavigator, path: &PathResult) -> String {
    let coords: Vec<String> = path
        .nodes
        .iter()
        .map(|&id| nav.graph().node(id).coord().to_string())
        .collect();
    format!(
        "{} nodes, length {:.3}, cost {:.3}: {}",
        path.nodes.len(),
        path.length(),
        path.total_cost,
        coords.join(" -> ")
    )
}

fn print_events(nav: &mut LatticeNavigator) {
    for event in nav.drain_events() {
        match serde_json::to_string(&event) {
            Ok(json) => println!("event: {json}"),
            Err(e) => log::warn!("could not serialize event {event:?}: {e}"),
        }
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{context}: {err}");
    process::exit(1);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => NavConfig::load(path)
            .unwrap_or_else(|e| fail(&format!("Failed to load config {}", path.display()), e)),
        None => NavConfig::default(),
    };
    if !args.print_events {
        config.events.capacity = 0;
    }
    let scenario = load_scenario(&args.scenario).unwrap_or_else(|e| {
        fail(
            &format!("Failed to load scenario {}", args.scenario.display()),
            e,
        )
    });

    let mut nav =
        LatticeNavigator::new(config).unwrap_or_else(|e| fail("Failed to build lattice", e));
    let (depth, width, height) = nav.graph().dimensions();
    log::info!(
        "lattice {depth}x{width}x{height}: {} nodes, {} walkable",
        nav.node_count(),
        nav.walkable_count()
    );

    for (i, command) in scenario.commands.iter().enumerate() {
        if let Err(e) = nav.apply_command(command) {
            fail(&format!("Command {i} ({command:?}) failed"), e);
        }
    }
    if args.print_events {
        print_events(&mut nav);
    }

    log::info!("running {} queries", scenario.queries.len());
    for (i, query) in scenario.queries.iter().enumerate() {
        let outcome = match nav.find_path(query.origin, query.target) {
            Ok(path) => describe_route(&nav, &path),
            Err(e) => e.to_string(),
        };
        println!("query {i}: {} -> {}: {outcome}", query.origin, query.target);
    }
    if args.print_events {
        print_events(&mut nav);
    }
}
