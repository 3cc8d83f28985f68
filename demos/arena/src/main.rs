//! arena — runs a handful of `move_to` scenarios against a simulated world.
//!
//! Usage: `arena [config.json]`.  The optional file overrides any subset of
//! `NavConfig` fields.  Log verbosity follows `RUST_LOG` (default `info`);
//! try `RUST_LOG=tn_motion=debug,tn_router=debug`.
//!
//! Time is virtual (`ManualClock`), so the multi-second fault thresholds
//! elapse instantly.

mod world;

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tn_core::{AgentId, Clock, ManualClock, NavConfig, NavRng, Position};
use tn_motion::{LocomotionProfile, MotionExecutor, MotionResult, MoveOutcome, MoveRequest};
use tn_router::{Fixup, FixupTable};
use tn_world::{Ability, RegionCatalog};

use world::{ArenaWorld, HALL, SKELETON, arena_regions};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:    u64      = 42;
const WALKER:  AgentId  = AgentId(0);
const BLINKER: AgentId  = AgentId(1);

// ── Reporting ─────────────────────────────────────────────────────────────────

struct Row {
    scenario: &'static str,
    outcome:  String,
    at:       Position,
    commands: usize,
    elapsed:  Duration,
}

fn run(
    exec:     &mut MotionExecutor<&ManualClock>,
    world:    &mut ArenaWorld,
    scenario: &'static str,
    req:      &MoveRequest,
) -> (MotionResult<MoveOutcome>, Row) {
    let t0 = exec.clock().now();
    let commands0 = world.commands;
    let result = exec.move_to(world, req);
    let outcome = match &result {
        Ok(o) => format!("{o:?}"),
        Err(e) => format!("fault: {e}"),
    };
    info!(target: "arena", scenario, %outcome, position = %world.position, "move finished");
    let row = Row {
        scenario,
        outcome,
        at: world.position,
        commands: world.commands - commands0,
        elapsed: exec.clock().since(t0),
    };
    (result, row)
}

fn load_config(path: Option<String>) -> Result<NavConfig> {
    let cfg = match path {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => NavConfig::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cfg = load_config(std::env::args().nth(1))?;

    // 1. Regions.
    let mut catalog = RegionCatalog::new();
    catalog.sync_seed(SEED);
    let regions = arena_regions(&mut catalog, &cfg)?;
    info!(target: "arena", regions = catalog.len(), seed = SEED, "arena built");

    // A rubble pile in the hall that the map data does not know about.
    let fixups = FixupTable::new().with(HALL, Fixup::SealTile(Position::new(14, 6)));

    let clock = ManualClock::new();
    let mut rows = Vec::new();

    // 2. A walker: door, region change, ambush.
    let mut walker = MotionExecutor::new(cfg.clone(), NavRng::new(SEED, WALKER), &clock)
        .with_profile(LocomotionProfile::aura_walker())
        .with_fixups(fixups.clone());
    let mut world = ArenaWorld::new(regions.clone(), Position::new(3, 3));
    world.bound = vec![Ability::Vigor, Ability::Conviction];

    let (_, row) = run(&mut walker, &mut world, "through the crypt door", &MoveRequest::to(Position::new(24, 2)));
    rows.push(row);
    info!(target: "arena", door_open = world.door_open(), "crypt door");

    let (_, row) = run(&mut walker, &mut world, "into the hall", &MoveRequest::to(Position::new(42, 5)));
    rows.push(row);

    world.spawn(100, SKELETON, world.position.offset(4, 0));
    let req = MoveRequest::to(Position::new(45, 2));
    let (result, row) = run(&mut walker, &mut world, "skeleton ambush", &req);
    rows.push(row);
    if result.is_err() {
        let killed = world.kill_hostiles();
        info!(target: "arena", killed, "cleared the way");
        let (_, row) = run(&mut walker, &mut world, "after the fight", &req);
        rows.push(row);
    }

    let (_, row) = run(&mut walker, &mut world, "off the map", &MoveRequest::to(Position::new(200, 200)));
    rows.push(row);

    // 3. A teleporter hops the inner crypt wall without touching the door.
    let mut blinker = MotionExecutor::new(cfg, NavRng::new(SEED, BLINKER), &clock)
        .with_fixups(fixups);
    let mut world = ArenaWorld::new(regions, Position::new(3, 9));
    world.can_teleport = true;
    world.bound = vec![Ability::Teleport, Ability::Vigor];

    let req = MoveRequest::to(Position::new(25, 9)).tolerance(1);
    let (_, row) = run(&mut blinker, &mut world, "teleport across", &req);
    rows.push(row);

    // 4. Summary.
    println!();
    println!("{:<24} {:<40} {:<10} {:>8} {:>10}", "Scenario", "Outcome", "Position", "Commands", "Sim time");
    println!("{}", "-".repeat(96));
    for r in &rows {
        println!(
            "{:<24} {:<40} {:<10} {:>8} {:>9.2}s",
            r.scenario,
            r.outcome,
            r.at.to_string(),
            r.commands,
            r.elapsed.as_secs_f64(),
        );
    }
    println!();
    println!("Total simulated time: {:.2} s", clock.now().as_secs_f64());

    Ok(())
}
